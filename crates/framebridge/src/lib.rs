//! Messaging bridge between an embedded component frame and its host page.
//!
//! framebridge implements the component side of the frame messaging protocol:
//! readiness announcement, frame height and value reports going out, render
//! events with opaque arguments coming in.
//!
//! # Crate Structure
//!
//! - [`channel`]: raw cross-frame channel, parent ports, NDJSON line reader
//! - [`protocol`]: message kinds, typed messages and the JSON codec
//! - [`bridge`]: the typed component bridge (behind `bridge` feature)

/// Re-export channel types.
pub mod channel {
    pub use framebridge_channel::*;
}

/// Re-export protocol types.
pub mod protocol {
    pub use framebridge_protocol::*;
}

/// Re-export bridge types (requires `bridge` feature).
#[cfg(feature = "bridge")]
pub mod bridge {
    pub use framebridge_bridge::*;
}
