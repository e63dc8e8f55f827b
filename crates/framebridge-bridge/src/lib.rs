//! Typed component bridge.
//!
//! This is the layer application code talks to. A [`Bridge`] subscribes once
//! to a raw [`MessageChannel`](framebridge_channel::MessageChannel), turns
//! render events into typed [`RenderEvent`]s for its own listener list, and
//! turns API calls into protocol messages posted through a
//! [`ParentPort`](framebridge_channel::ParentPort).

pub mod bridge;
pub mod error;
pub mod event;
pub mod listeners;
pub mod state;

pub use bridge::{Bridge, BridgeConfig};
pub use error::{BridgeError, Result};
pub use event::RenderEvent;
pub use listeners::{ListenerId, RenderListeners};
pub use state::BridgeState;
