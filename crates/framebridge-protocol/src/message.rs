use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::kind::{MessageKind, API_VERSION};

/// Default render argument record: string keys to arbitrary JSON.
pub type RenderArgs = Map<String, Value>;

/// Messages the frame sends to its parent.
///
/// `V` is the application's component value type. It is passed through
/// unchanged; the protocol never looks inside it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum OutboundMessage<V = Value> {
    /// The frame finished initializing and may receive render events.
    #[serde(rename = "streamlit:componentReady")]
    ComponentReady {
        #[serde(rename = "apiVersion")]
        api_version: u32,
    },
    /// Desired visual height of the frame in pixels.
    #[serde(rename = "streamlit:setFrameHeight")]
    SetFrameHeight { height: f64 },
    /// The component's current output.
    #[serde(rename = "streamlit:setComponentValue")]
    SetComponentValue { value: V },
}

impl<V> OutboundMessage<V> {
    pub fn component_ready() -> Self {
        OutboundMessage::ComponentReady {
            api_version: API_VERSION,
        }
    }

    pub fn frame_height(height: f64) -> Self {
        OutboundMessage::SetFrameHeight { height }
    }

    pub fn component_value(value: V) -> Self {
        OutboundMessage::SetComponentValue { value }
    }

    pub fn kind(&self) -> MessageKind {
        match self {
            OutboundMessage::ComponentReady { .. } => MessageKind::ComponentReady,
            OutboundMessage::SetFrameHeight { .. } => MessageKind::SetFrameHeight,
            OutboundMessage::SetComponentValue { .. } => MessageKind::SetComponentValue,
        }
    }
}

/// Messages the parent sends to the frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum InboundMessage<A = RenderArgs> {
    /// New render arguments for the component.
    #[serde(rename = "streamlit:render")]
    Render { args: A },
}

impl<A> InboundMessage<A> {
    pub fn render(args: A) -> Self {
        InboundMessage::Render { args }
    }

    pub fn kind(&self) -> MessageKind {
        match self {
            InboundMessage::Render { .. } => MessageKind::Render,
        }
    }

    /// Consume the message and return its render arguments.
    pub fn into_args(self) -> A {
        match self {
            InboundMessage::Render { args } => args,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn ready_wire_shape() {
        let msg = OutboundMessage::<Value>::component_ready();
        assert_eq!(
            serde_json::to_value(&msg).unwrap(),
            json!({"type": "streamlit:componentReady", "apiVersion": 1})
        );
        assert_eq!(msg.kind(), MessageKind::ComponentReady);
    }

    #[test]
    fn height_wire_shape() {
        let msg = OutboundMessage::<Value>::frame_height(312.5);
        assert_eq!(
            serde_json::to_value(&msg).unwrap(),
            json!({"type": "streamlit:setFrameHeight", "height": 312.5})
        );
    }

    #[test]
    fn value_wire_shape_with_typed_payload() {
        #[derive(Serialize)]
        struct Selection {
            start: String,
            all_day: bool,
        }

        let msg = OutboundMessage::component_value(Selection {
            start: "2024-05-01".to_string(),
            all_day: true,
        });
        assert_eq!(
            serde_json::to_value(&msg).unwrap(),
            json!({
                "type": "streamlit:setComponentValue",
                "value": {"start": "2024-05-01", "all_day": true}
            })
        );
        assert_eq!(msg.kind(), MessageKind::SetComponentValue);
    }

    #[test]
    fn render_parses_from_wire() {
        let raw = json!({"type": "streamlit:render", "args": {"locale": "fr", "editable": true}});
        let msg: InboundMessage = serde_json::from_value(raw).unwrap();

        assert_eq!(msg.kind(), MessageKind::Render);
        let args = msg.into_args();
        assert_eq!(args.get("locale"), Some(&json!("fr")));
        assert_eq!(args.get("editable"), Some(&json!(true)));
    }
}
