use std::fmt;

/// Readiness of a bridge.
///
/// The transition is tracked, not enforced: reporting before readiness and
/// announcing twice are both allowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BridgeState {
    /// `announce_ready` has not been called yet.
    #[default]
    NotReady,
    /// `announce_ready` has been called at least once.
    Ready,
}

impl BridgeState {
    pub fn as_str(self) -> &'static str {
        match self {
            BridgeState::NotReady => "not_ready",
            BridgeState::Ready => "ready",
        }
    }
}

impl fmt::Display for BridgeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
