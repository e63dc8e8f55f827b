use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use serde_json::Value;

use crate::error::Result;

/// The outbound half of the cross-frame channel.
///
/// A port posts one message toward the parent context. Posting is a single
/// best-effort attempt: there is no acknowledgement and no retry. A port with
/// no parent behind it must accept every message and do nothing.
pub trait ParentPort {
    /// Post a message to the parent context.
    fn post_message(&self, message: &Value) -> Result<()>;

    /// Whether a parent context is attached to this port.
    fn is_connected(&self) -> bool {
        true
    }
}

impl<P: ParentPort + ?Sized> ParentPort for Box<P> {
    fn post_message(&self, message: &Value) -> Result<()> {
        (**self).post_message(message)
    }

    fn is_connected(&self) -> bool {
        (**self).is_connected()
    }
}

impl<P: ParentPort + ?Sized> ParentPort for Rc<P> {
    fn post_message(&self, message: &Value) -> Result<()> {
        (**self).post_message(message)
    }

    fn is_connected(&self) -> bool {
        (**self).is_connected()
    }
}

/// Port for a frame loaded standalone. Every post is inert.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoParent;

impl ParentPort for NoParent {
    fn post_message(&self, _message: &Value) -> Result<()> {
        Ok(())
    }

    fn is_connected(&self) -> bool {
        false
    }
}

/// In-memory port that records every posted message.
///
/// Clones share the same buffer, so a caller can hand one clone to a bridge
/// and keep another to inspect what the parent would have received.
#[derive(Clone, Default)]
pub struct MemoryPort {
    posted: Rc<RefCell<Vec<Value>>>,
}

impl MemoryPort {
    /// Create an empty recording port.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all messages posted so far, in post order.
    pub fn messages(&self) -> Vec<Value> {
        self.posted.borrow().clone()
    }

    /// Drain and return all recorded messages.
    pub fn take(&self) -> Vec<Value> {
        std::mem::take(&mut *self.posted.borrow_mut())
    }

    /// Number of messages posted so far.
    pub fn len(&self) -> usize {
        self.posted.borrow().len()
    }

    /// Returns true if nothing has been posted.
    pub fn is_empty(&self) -> bool {
        self.posted.borrow().is_empty()
    }
}

impl ParentPort for MemoryPort {
    fn post_message(&self, message: &Value) -> Result<()> {
        self.posted.borrow_mut().push(message.clone());
        Ok(())
    }
}

impl fmt::Debug for MemoryPort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryPort")
            .field("posted", &self.posted.borrow().len())
            .finish()
    }
}
