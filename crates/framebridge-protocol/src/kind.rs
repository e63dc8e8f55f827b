//! Message kinds and protocol constants.

use std::fmt;

/// Protocol revision announced in `componentReady`. There is no negotiation:
/// an incompatible revision gets new discriminators instead.
pub const API_VERSION: u32 = 1;

/// JSON field holding the discriminator.
pub const TYPE_FIELD: &str = "type";

/// Prefix shared by every discriminator on the wire.
pub const TYPE_PREFIX: &str = "streamlit:";

/// Wire discriminator of the inbound render event.
pub const RENDER_EVENT: &str = "streamlit:render";

/// Which way a message travels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Frame to parent.
    Outbound,
    /// Parent to frame.
    Inbound,
}

/// The four message kinds of the protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKind {
    ComponentReady,
    SetFrameHeight,
    SetComponentValue,
    Render,
}

impl MessageKind {
    pub const ALL: [MessageKind; 4] = [
        MessageKind::ComponentReady,
        MessageKind::SetFrameHeight,
        MessageKind::SetComponentValue,
        MessageKind::Render,
    ];

    /// Bare kind name, e.g. `setFrameHeight`.
    pub fn as_str(self) -> &'static str {
        match self {
            MessageKind::ComponentReady => "componentReady",
            MessageKind::SetFrameHeight => "setFrameHeight",
            MessageKind::SetComponentValue => "setComponentValue",
            MessageKind::Render => "render",
        }
    }

    /// Discriminator as it appears in the `type` field.
    pub fn wire_type(self) -> &'static str {
        match self {
            MessageKind::ComponentReady => "streamlit:componentReady",
            MessageKind::SetFrameHeight => "streamlit:setFrameHeight",
            MessageKind::SetComponentValue => "streamlit:setComponentValue",
            MessageKind::Render => RENDER_EVENT,
        }
    }

    /// Look up a kind by its wire discriminator.
    pub fn from_wire_type(wire: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.wire_type() == wire)
    }

    pub fn direction(self) -> Direction {
        match self {
            MessageKind::Render => Direction::Inbound,
            _ => Direction::Outbound,
        }
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}
