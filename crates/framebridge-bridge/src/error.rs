/// Errors raised while moving a message through the bridge.
///
/// Public bridge operations never return these; they are logged and dropped.
/// They surface only from the lower-level send path.
#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    /// Channel-level error.
    #[error("channel error: {0}")]
    Channel(#[from] framebridge_channel::ChannelError),

    /// Protocol-level error.
    #[error("protocol error: {0}")]
    Protocol(#[from] framebridge_protocol::ProtocolError),
}

pub type Result<T> = std::result::Result<T, BridgeError>;
