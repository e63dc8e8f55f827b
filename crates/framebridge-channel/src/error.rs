/// Errors that can occur while moving raw messages across the channel.
#[derive(Debug, thiserror::Error)]
pub enum ChannelError {
    /// An I/O error occurred on the underlying byte stream.
    #[error("channel I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A message could not be serialized for posting.
    #[error("message encoding failed: {0}")]
    Encode(#[from] serde_json::Error),

    /// The stream reached EOF.
    #[error("channel closed")]
    Closed,

    /// An inbound line exceeded the configured maximum length.
    #[error("line too long ({len} bytes, max {max})")]
    LineTooLong { len: usize, max: usize },
}

pub type Result<T> = std::result::Result<T, ChannelError>;
