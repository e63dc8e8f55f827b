//! Raw cross-frame message channel.
//!
//! This is the lowest layer of framebridge. It knows nothing about message
//! kinds; it moves untyped JSON values in two directions:
//! - inbound, through a [`MessageChannel`] that fans every delivered value
//!   out to its raw subscribers
//! - outbound, through a [`ParentPort`] that posts values toward the parent
//!
//! Everything else builds on top of these two types.

pub mod channel;
pub mod error;
pub mod port;
pub mod reader;
pub mod writer;

pub use channel::{MessageChannel, SubscriptionId};
pub use error::{ChannelError, Result};
pub use port::{MemoryPort, NoParent, ParentPort};
pub use reader::{LineReader, LineReaderConfig, DEFAULT_MAX_LINE_LEN};
pub use writer::WriterPort;
