use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::Result;
use crate::kind::{Direction, MessageKind, TYPE_FIELD};
use crate::message::{InboundMessage, OutboundMessage};

/// Encode an outbound message as a JSON value ready to post.
pub fn encode_outbound<V: Serialize>(message: &OutboundMessage<V>) -> Result<Value> {
    Ok(serde_json::to_value(message)?)
}

/// Read the discriminator of a raw message.
///
/// Returns `None` for anything that is not an object with a known `type`.
pub fn peek_kind(raw: &Value) -> Option<MessageKind> {
    raw.get(TYPE_FIELD)
        .and_then(Value::as_str)
        .and_then(MessageKind::from_wire_type)
}

/// Decode a raw message addressed to the frame.
///
/// `Ok(None)` means the message is not a render event and is not for us.
/// A render event without `args` decodes with an empty record. An error is
/// returned only when `args` is present but does not fit `A`.
pub fn decode_inbound<A: DeserializeOwned>(raw: &Value) -> Result<Option<InboundMessage<A>>> {
    if peek_kind(raw) != Some(MessageKind::Render) {
        return Ok(None);
    }

    let args = match raw.get("args") {
        Some(Value::Null) | None => Value::Object(Map::new()),
        Some(args) => args.clone(),
    };
    let args: A = serde_json::from_value(args)?;
    Ok(Some(InboundMessage::Render { args }))
}

/// Decode a raw message addressed to the parent.
///
/// This is the host side of the protocol; tooling and tests use it to read
/// what a frame posted. `Ok(None)` for inbound or unrecognized messages.
pub fn decode_outbound<V: DeserializeOwned>(raw: &Value) -> Result<Option<OutboundMessage<V>>> {
    match peek_kind(raw) {
        Some(kind) if kind.direction() == Direction::Outbound => {
            Ok(Some(serde_json::from_value(raw.clone())?))
        }
        _ => Ok(None),
    }
}
