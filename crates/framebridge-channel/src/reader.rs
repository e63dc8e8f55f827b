use std::io::{ErrorKind, Read};

use bytes::{Buf, Bytes, BytesMut};

use crate::error::{ChannelError, Result};

const INITIAL_BUFFER_CAPACITY: usize = 8 * 1024;
const READ_CHUNK_SIZE: usize = 8 * 1024;

/// Default maximum inbound line length: 16 MiB.
pub const DEFAULT_MAX_LINE_LEN: usize = 16 * 1024 * 1024;

/// Configuration for [`LineReader`].
#[derive(Debug, Clone)]
pub struct LineReaderConfig {
    /// Maximum length of one line, excluding the terminator. Default: 16 MiB.
    pub max_line_len: usize,
}

impl Default for LineReaderConfig {
    fn default() -> Self {
        Self {
            max_line_len: DEFAULT_MAX_LINE_LEN,
        }
    }
}

/// Reads newline-delimited records from any `Read` stream.
///
/// Handles partial reads internally: callers always get complete lines with
/// the `\n` (and an optional preceding `\r`) stripped. Blank lines are skipped.
/// A final line without a terminator is still returned before EOF.
///
/// A line that outgrows `max_line_len` is reported once as
/// [`ChannelError::LineTooLong`]; the rest of it, up to and including its
/// `\n`, is dropped before the next line is returned.
pub struct LineReader<T> {
    inner: T,
    buf: BytesMut,
    config: LineReaderConfig,
    eof: bool,
    discarding: bool,
}

impl<T: Read> LineReader<T> {
    /// Create a new line reader with default configuration.
    pub fn new(inner: T) -> Self {
        Self::with_config(inner, LineReaderConfig::default())
    }

    /// Create a new line reader with explicit configuration.
    pub fn with_config(inner: T, config: LineReaderConfig) -> Self {
        Self {
            inner,
            buf: BytesMut::with_capacity(INITIAL_BUFFER_CAPACITY),
            config,
            eof: false,
            discarding: false,
        }
    }

    /// Read the next non-blank line (blocking).
    ///
    /// Returns `Err(ChannelError::Closed)` once the stream is exhausted.
    pub fn read_line(&mut self) -> Result<Bytes> {
        loop {
            if self.discarding {
                match self.buf.iter().position(|b| *b == b'\n') {
                    Some(pos) => {
                        self.buf.advance(pos + 1);
                        self.discarding = false;
                        continue;
                    }
                    None => {
                        self.buf.clear();
                        if self.eof {
                            return Err(ChannelError::Closed);
                        }
                    }
                }
            } else if let Some(pos) = self.buf.iter().position(|b| *b == b'\n') {
                let mut line = self.buf.split_to(pos + 1);
                line.truncate(pos);
                if let Some(line) = self.finish_line(line)? {
                    return Ok(line);
                }
                continue;
            } else if self.buf.len() > self.config.max_line_len {
                let len = self.buf.len();
                self.buf.clear();
                self.discarding = true;
                return Err(ChannelError::LineTooLong {
                    len,
                    max: self.config.max_line_len,
                });
            }

            if self.eof {
                if self.buf.is_empty() {
                    return Err(ChannelError::Closed);
                }
                let rest = self.buf.split();
                if let Some(line) = self.finish_line(rest)? {
                    return Ok(line);
                }
                return Err(ChannelError::Closed);
            }

            let mut chunk = [0u8; READ_CHUNK_SIZE];
            let read = match self.inner.read(&mut chunk) {
                Ok(n) => n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(ChannelError::Io(err)),
            };

            if read == 0 {
                self.eof = true;
                continue;
            }

            self.buf.extend_from_slice(&chunk[..read]);
        }
    }

    fn finish_line(&self, mut line: BytesMut) -> Result<Option<Bytes>> {
        if line.last() == Some(&b'\r') {
            line.truncate(line.len() - 1);
        }
        if line.iter().all(u8::is_ascii_whitespace) {
            return Ok(None);
        }
        if line.len() > self.config.max_line_len {
            return Err(ChannelError::LineTooLong {
                len: line.len(),
                max: self.config.max_line_len,
            });
        }
        Ok(Some(line.freeze()))
    }

    /// Borrow the underlying stream.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    /// Consume the reader and return the inner stream.
    pub fn into_inner(self) -> T {
        self.inner
    }

    /// Current reader configuration.
    pub fn config(&self) -> &LineReaderConfig {
        &self.config
    }
}

impl<T> std::fmt::Debug for LineReader<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LineReader")
            .field("buffered", &self.buf.len())
            .field("eof", &self.eof)
            .field("discarding", &self.discarding)
            .field("config", &self.config)
            .finish()
    }
}
