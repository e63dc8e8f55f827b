use std::cell::{Cell, RefCell};
use std::fmt;
use std::io::Read;
use std::rc::Rc;

use serde_json::Value;
use tracing::{debug, trace, warn};

use crate::error::{ChannelError, Result};
use crate::reader::LineReader;

/// Identity of one raw subscription on a [`MessageChannel`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

type RawListener = Rc<dyn Fn(&Value)>;

#[derive(Default)]
struct Inner {
    next_id: Cell<u64>,
    subscribers: RefCell<Vec<(SubscriptionId, RawListener)>>,
}

/// The inbound half of the cross-frame channel.
///
/// Every delivered message reaches every subscriber, whoever sent it and
/// whatever it contains. Filtering is the subscriber's business. Clones are
/// handles to the same channel.
///
/// The channel is single-threaded: delivery runs each subscriber to
/// completion, in subscription order, before returning.
#[derive(Clone, Default)]
pub struct MessageChannel {
    inner: Rc<Inner>,
}

impl MessageChannel {
    /// Create a channel with no subscribers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe to every raw message delivered on this channel.
    pub fn subscribe<F>(&self, listener: F) -> SubscriptionId
    where
        F: Fn(&Value) + 'static,
    {
        let id = SubscriptionId(self.inner.next_id.get());
        self.inner.next_id.set(id.0 + 1);
        self.inner
            .subscribers
            .borrow_mut()
            .push((id, Rc::new(listener)));
        trace!(subscription = id.0, "raw subscriber added");
        id
    }

    /// Remove a subscription. Returns false if it was already gone.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut subscribers = self.inner.subscribers.borrow_mut();
        let before = subscribers.len();
        subscribers.retain(|(sub, _)| *sub != id);
        before != subscribers.len()
    }

    /// Number of live subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.inner.subscribers.borrow().len()
    }

    /// Deliver one message to every subscriber.
    ///
    /// Returns the number of subscribers reached. Subscribers added or removed
    /// while the message is being delivered take effect from the next one.
    pub fn deliver(&self, message: &Value) -> usize {
        let snapshot: Vec<RawListener> = self
            .inner
            .subscribers
            .borrow()
            .iter()
            .map(|(_, listener)| Rc::clone(listener))
            .collect();

        for listener in &snapshot {
            listener(message);
        }
        snapshot.len()
    }

    /// Parse raw bytes as JSON and deliver the result.
    ///
    /// Input that is not JSON is not a message; it is dropped and 0 is
    /// returned.
    pub fn deliver_bytes(&self, raw: &[u8]) -> usize {
        match serde_json::from_slice::<Value>(raw) {
            Ok(message) => self.deliver(&message),
            Err(err) => {
                trace!(len = raw.len(), error = %err, "dropping non-JSON message");
                0
            }
        }
    }

    /// Deliver every line read from `reader` until EOF.
    ///
    /// Returns the number of lines that parsed as JSON and were delivered.
    /// Oversized lines are skipped; I/O errors end the pump.
    pub fn pump<R: Read>(&self, reader: &mut LineReader<R>) -> Result<usize> {
        self.pump_while(reader, || true)
    }

    /// Like [`MessageChannel::pump`], but stops as soon as `keep_going`
    /// returns false. It is checked before every read, including the first.
    pub fn pump_while<R, F>(&self, reader: &mut LineReader<R>, mut keep_going: F) -> Result<usize>
    where
        R: Read,
        F: FnMut() -> bool,
    {
        let mut delivered = 0usize;
        while keep_going() {
            let line = match reader.read_line() {
                Ok(line) => line,
                Err(ChannelError::Closed) => {
                    debug!(delivered, "inbound stream closed");
                    return Ok(delivered);
                }
                Err(err @ ChannelError::LineTooLong { .. }) => {
                    warn!(error = %err, "skipping inbound line");
                    continue;
                }
                Err(err) => return Err(err),
            };

            let Ok(message) = serde_json::from_slice::<Value>(&line) else {
                trace!(len = line.len(), "dropping non-JSON line");
                continue;
            };
            self.deliver(&message);
            delivered = delivered.saturating_add(1);
        }
        debug!(delivered, "pump stopped");
        Ok(delivered)
    }
}

impl fmt::Debug for MessageChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MessageChannel")
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}
