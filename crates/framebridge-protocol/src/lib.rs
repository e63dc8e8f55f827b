//! Component messaging protocol.
//!
//! Four message kinds cross the frame boundary, each a JSON object whose
//! `type` field carries the discriminator:
//! - `streamlit:componentReady` (frame to parent) with `apiVersion`
//! - `streamlit:setFrameHeight` (frame to parent) with `height`
//! - `streamlit:setComponentValue` (frame to parent) with `value`
//! - `streamlit:render` (parent to frame) with `args`
//!
//! Payloads are opaque. Messages carry no sequence numbers or correlation
//! ids; every send is fire-and-forget.

pub mod codec;
pub mod error;
pub mod kind;
pub mod message;

pub use codec::{decode_inbound, decode_outbound, encode_outbound, peek_kind};
pub use error::{ProtocolError, Result};
pub use kind::{Direction, MessageKind, API_VERSION, RENDER_EVENT, TYPE_FIELD, TYPE_PREFIX};
pub use message::{InboundMessage, OutboundMessage, RenderArgs};
