use std::cell::RefCell;
use std::io::{ErrorKind, Write};

use bytes::{BufMut, BytesMut};
use serde_json::Value;

use crate::error::{ChannelError, Result};
use crate::port::ParentPort;

const INITIAL_BUFFER_CAPACITY: usize = 8 * 1024;

/// Port that writes each posted message to a byte stream as one line of JSON.
///
/// This is how a frame hosted out of process (for example behind a pipe or on
/// stdio) reaches its parent: the parent reads newline-delimited JSON.
pub struct WriterPort<W> {
    state: RefCell<WriterState<W>>,
}

struct WriterState<W> {
    inner: W,
    buf: BytesMut,
}

impl<W: Write> WriterPort<W> {
    /// Wrap a byte stream.
    pub fn new(inner: W) -> Self {
        Self {
            state: RefCell::new(WriterState {
                inner,
                buf: BytesMut::with_capacity(INITIAL_BUFFER_CAPACITY),
            }),
        }
    }

    /// Consume the port and return the inner stream.
    pub fn into_inner(self) -> W {
        self.state.into_inner().inner
    }
}

impl<W: Write> WriterState<W> {
    fn write_line(&mut self, message: &Value) -> Result<()> {
        self.buf.clear();
        serde_json::to_writer((&mut self.buf).writer(), message)?;
        self.buf.put_u8(b'\n');

        let mut offset = 0usize;
        while offset < self.buf.len() {
            match self.inner.write(&self.buf[offset..]) {
                Ok(0) => return Err(ChannelError::Closed),
                Ok(n) => offset += n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(ChannelError::Io(err)),
            }
        }

        loop {
            match self.inner.flush() {
                Ok(()) => return Ok(()),
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(ChannelError::Io(err)),
            }
        }
    }
}

impl<W: Write> ParentPort for WriterPort<W> {
    fn post_message(&self, message: &Value) -> Result<()> {
        self.state.borrow_mut().write_line(message)
    }
}

impl<W> std::fmt::Debug for WriterPort<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WriterPort").finish_non_exhaustive()
    }
}
