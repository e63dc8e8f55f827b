use std::cell::Cell;
use std::fmt;
use std::rc::{Rc, Weak};

use framebridge_channel::{MessageChannel, NoParent, ParentPort, SubscriptionId};
use framebridge_protocol::{
    decode_inbound, encode_outbound, peek_kind, OutboundMessage, RenderArgs,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, trace, warn};

use crate::error::Result;
use crate::event::RenderEvent;
use crate::listeners::{ListenerId, RenderListeners};
use crate::state::BridgeState;

/// Configuration for a [`Bridge`].
#[derive(Debug, Clone, Default)]
pub struct BridgeConfig {
    /// Log a warning when a height or value is reported before
    /// `announce_ready`. The report is still sent.
    pub warn_before_ready: bool,
}

/// Bidirectional relay between frame application code and its parent.
///
/// Outbound calls are fire-and-forget: they never fail, never block and are
/// never deduplicated. With no parent attached they are inert.
///
/// Inbound, the bridge holds one subscription on its [`MessageChannel`].
/// Render messages are decoded into `A` and published to every listener
/// registered with [`Bridge::on_render`]; everything else is ignored.
///
/// A bridge is single-threaded (`!Send`). Dropping it removes its channel
/// subscription.
pub struct Bridge<A = RenderArgs> {
    channel: MessageChannel,
    subscription: SubscriptionId,
    port: Box<dyn ParentPort>,
    listeners: Rc<RenderListeners<A>>,
    state: Cell<BridgeState>,
    config: BridgeConfig,
}

impl Bridge {
    /// Create a bridge with untyped render arguments.
    pub fn new<P>(channel: &MessageChannel, port: P) -> Self
    where
        P: ParentPort + 'static,
    {
        Self::with_config(channel, port, BridgeConfig::default())
    }

    /// Create an independent bridge for a frame with no parent.
    ///
    /// The bridge gets its own fresh channel, reachable through
    /// [`Bridge::channel`], and all outbound calls are inert.
    pub fn standalone() -> Self {
        Self::new(&MessageChannel::new(), NoParent)
    }
}

impl<A> Bridge<A>
where
    A: DeserializeOwned + 'static,
{
    /// Create a bridge with explicit configuration and render argument type.
    pub fn with_config<P>(channel: &MessageChannel, port: P, config: BridgeConfig) -> Self
    where
        P: ParentPort + 'static,
    {
        let listeners = Rc::new(RenderListeners::new());
        let weak = Rc::downgrade(&listeners);
        let subscription = channel.subscribe(move |raw| handle_inbound(&weak, raw));

        debug!(connected = port.is_connected(), "component bridge attached");

        Self {
            channel: channel.clone(),
            subscription,
            port: Box::new(port),
            listeners,
            state: Cell::new(BridgeState::NotReady),
            config,
        }
    }
}

impl<A> Bridge<A> {
    /// Tell the parent this frame has initialized and may receive renders.
    pub fn announce_ready(&self) {
        if self.state.get() == BridgeState::Ready {
            debug!("component ready announced again");
        }
        self.state.set(BridgeState::Ready);
        self.post(&OutboundMessage::<()>::component_ready());
    }

    /// Report the desired frame height in pixels.
    ///
    /// The value is passed through as is; clamping is the parent's business.
    pub fn report_frame_height(&self, height: f64) {
        self.check_ready("frame height");
        self.post(&OutboundMessage::<()>::frame_height(height));
    }

    /// Report the component's current value.
    pub fn report_value<V>(&self, value: &V)
    where
        V: Serialize + ?Sized,
    {
        self.check_ready("component value");
        self.post(&OutboundMessage::component_value(value));
    }

    /// Register a render listener. Listeners run in registration order.
    pub fn on_render<F>(&self, listener: F) -> ListenerId
    where
        F: Fn(&RenderEvent<A>) + 'static,
    {
        self.listeners.add(listener)
    }

    /// Remove a listener registered with [`Bridge::on_render`].
    ///
    /// Returns false if the id was not registered on this bridge.
    pub fn remove_render_listener(&self, id: ListenerId) -> bool {
        self.listeners.remove(id)
    }

    /// Number of registered render listeners.
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Current readiness state.
    pub fn state(&self) -> BridgeState {
        self.state.get()
    }

    /// Whether a parent is attached to the outbound port.
    pub fn has_parent(&self) -> bool {
        self.port.is_connected()
    }

    /// The raw channel this bridge listens on.
    pub fn channel(&self) -> &MessageChannel {
        &self.channel
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    /// Encode and post one message, returning any failure.
    pub fn send<V: Serialize>(&self, message: &OutboundMessage<V>) -> Result<()> {
        let encoded = encode_outbound(message)?;
        self.port.post_message(&encoded)?;
        debug!(kind = %message.kind(), "posted message to parent");
        Ok(())
    }

    fn post<V: Serialize>(&self, message: &OutboundMessage<V>) {
        if let Err(err) = self.send(message) {
            warn!(kind = %message.kind(), error = %err, "dropping outbound message");
        }
    }

    fn check_ready(&self, what: &str) {
        if self.config.warn_before_ready && self.state.get() == BridgeState::NotReady {
            warn!(report = what, "reporting before component ready was announced");
        }
    }
}

fn handle_inbound<A: DeserializeOwned>(listeners: &Weak<RenderListeners<A>>, raw: &Value) {
    let Some(listeners) = listeners.upgrade() else {
        return;
    };

    match decode_inbound::<A>(raw) {
        Ok(Some(message)) => {
            let event = RenderEvent::new(message.into_args());
            let invoked = listeners.dispatch(&event);
            if invoked == 0 {
                trace!("render event dropped: no listeners");
            } else {
                debug!(listeners = invoked, "render event dispatched");
            }
        }
        Ok(None) => {
            trace!(kind = ?peek_kind(raw), "ignoring message not addressed to component");
        }
        Err(err) => {
            debug!(error = %err, "dropping render event with unusable args");
        }
    }
}

impl<A> Drop for Bridge<A> {
    fn drop(&mut self) {
        self.channel.unsubscribe(self.subscription);
    }
}

impl<A> fmt::Debug for Bridge<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bridge")
            .field("state", &self.state.get())
            .field("listeners", &self.listeners.len())
            .field("has_parent", &self.port.is_connected())
            .field("config", &self.config)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    use framebridge_channel::{ChannelError, MemoryPort};
    use serde::Deserialize;
    use serde_json::json;

    fn bridge_with_port() -> (Bridge, MessageChannel, MemoryPort) {
        let channel = MessageChannel::new();
        let port = MemoryPort::new();
        let bridge = Bridge::new(&channel, port.clone());
        (bridge, channel, port)
    }

    fn args(value: Value) -> RenderArgs {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    #[test]
    fn announce_ready_sends_versioned_message() {
        let (bridge, _channel, port) = bridge_with_port();
        assert_eq!(bridge.state(), BridgeState::NotReady);

        bridge.announce_ready();

        assert_eq!(
            port.take(),
            vec![json!({"type": "streamlit:componentReady", "apiVersion": 1})]
        );
        assert_eq!(bridge.state(), BridgeState::Ready);
    }

    #[test]
    fn announce_ready_twice_sends_twice() {
        let (bridge, _channel, port) = bridge_with_port();
        bridge.announce_ready();
        bridge.announce_ready();

        let sent = port.take();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0], sent[1]);
        assert_eq!(bridge.state(), BridgeState::Ready);
    }

    #[test]
    fn frame_height_passes_through_unmodified() {
        let (bridge, _channel, port) = bridge_with_port();
        let heights = [0.0, 1.0, 240.5, 1.0e9, -15.0];
        for height in heights {
            bridge.report_frame_height(height);
        }

        let sent = port.take();
        assert_eq!(sent.len(), heights.len());
        for (message, height) in sent.iter().zip(heights) {
            assert_eq!(message["type"], "streamlit:setFrameHeight");
            assert_eq!(message["height"].as_f64(), Some(height));
        }
    }

    #[test]
    fn repeated_heights_are_not_deduplicated() {
        let (bridge, _channel, port) = bridge_with_port();
        bridge.report_frame_height(100.0);
        bridge.report_frame_height(100.0);
        assert_eq!(port.len(), 2);
    }

    #[test]
    fn report_value_preserves_payload() {
        let (bridge, _channel, port) = bridge_with_port();
        let values = [
            Value::Null,
            json!(42),
            json!("text"),
            json!(false),
            json!([1, [2, [3]]]),
            json!({"event": {"id": "e1", "start": "2024-01-01", "tags": []}}),
        ];
        for value in &values {
            bridge.report_value(value);
        }

        let sent = port.take();
        assert_eq!(sent.len(), values.len());
        for (message, value) in sent.iter().zip(&values) {
            assert_eq!(message["type"], "streamlit:setComponentValue");
            assert_eq!(&message["value"], value);
        }
    }

    #[test]
    fn report_value_accepts_typed_and_unsized_values() {
        #[derive(Serialize)]
        struct Outcome {
            result: u32,
        }

        let (bridge, _channel, port) = bridge_with_port();
        bridge.report_value(&Outcome { result: 42 });
        bridge.report_value("plain str");
        bridge.report_value(&[1u8, 2, 3][..]);

        let values: Vec<Value> = port
            .take()
            .into_iter()
            .map(|message| message["value"].clone())
            .collect();
        assert_eq!(
            values,
            vec![json!({"result": 42}), json!("plain str"), json!([1, 2, 3])]
        );
    }

    #[test]
    fn value_before_ready_is_sent_in_call_order() {
        let channel = MessageChannel::new();
        let port = MemoryPort::new();
        let config = BridgeConfig {
            warn_before_ready: true,
        };
        let bridge: Bridge = Bridge::with_config(&channel, port.clone(), config);

        bridge.report_value(&json!({"result": 42}));
        bridge.announce_ready();

        assert_eq!(
            port.take(),
            vec![
                json!({"type": "streamlit:setComponentValue", "value": {"result": 42}}),
                json!({"type": "streamlit:componentReady", "apiVersion": 1}),
            ]
        );
    }

    #[test]
    fn render_reaches_all_listeners_in_order() {
        let (bridge, channel, _port) = bridge_with_port();
        let calls = Rc::new(RefCell::new(Vec::new()));
        for n in 0..3 {
            let calls = Rc::clone(&calls);
            bridge.on_render(move |event: &RenderEvent<RenderArgs>| {
                calls.borrow_mut().push((n, event.clone()));
            });
        }

        channel.deliver(&json!({"type": "streamlit:render", "args": {"a": 1}}));

        let expected = RenderEvent::new(args(json!({"a": 1})));
        assert_eq!(
            *calls.borrow(),
            vec![
                (0, expected.clone()),
                (1, expected.clone()),
                (2, expected),
            ]
        );
    }

    #[test]
    fn unrecognized_messages_are_ignored() {
        let (bridge, channel, port) = bridge_with_port();
        let hits = Rc::new(Cell::new(0));
        let counter = Rc::clone(&hits);
        bridge.on_render(move |_| counter.set(counter.get() + 1));

        for raw in [
            json!({"type": "unknown", "args": {"a": 1}}),
            json!({"type": "render", "args": {"a": 1}}),
            json!({"type": "streamlit:setComponentValue", "value": 1}),
            json!({"hello": "world"}),
            json!(17),
        ] {
            channel.deliver(&raw);
        }
        channel.deliver_bytes(b"<html>not json</html>");

        assert_eq!(hits.get(), 0);
        assert!(port.is_empty());
        assert_eq!(bridge.state(), BridgeState::NotReady);
    }

    #[test]
    fn render_without_listeners_is_silent() {
        let (bridge, channel, port) = bridge_with_port();
        assert_eq!(bridge.listener_count(), 0);

        channel.deliver(&json!({"type": "streamlit:render", "args": {"a": 1}}));

        assert!(port.is_empty());
    }

    #[test]
    fn removed_listener_stops_receiving() {
        let (bridge, channel, _port) = bridge_with_port();
        let seen = Rc::new(RefCell::new(Vec::new()));

        let first_seen = Rc::clone(&seen);
        let first = bridge.on_render(move |_| first_seen.borrow_mut().push("first"));
        let second_seen = Rc::clone(&seen);
        bridge.on_render(move |_| second_seen.borrow_mut().push("second"));

        assert!(bridge.remove_render_listener(first));
        assert!(!bridge.remove_render_listener(first));
        channel.deliver(&json!({"type": "streamlit:render", "args": {}}));

        assert_eq!(*seen.borrow(), vec!["second"]);
        assert_eq!(bridge.listener_count(), 1);
    }

    #[test]
    fn typed_args_are_decoded() {
        #[derive(Debug, Clone, Deserialize, PartialEq)]
        struct CalendarArgs {
            locale: String,
            editable: bool,
        }

        let channel = MessageChannel::new();
        let bridge: Bridge<CalendarArgs> =
            Bridge::with_config(&channel, NoParent, BridgeConfig::default());
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        bridge.on_render(move |event| sink.borrow_mut().push(event.args.clone()));

        channel.deliver(&json!({
            "type": "streamlit:render",
            "args": {"locale": "fr", "editable": false}
        }));
        // Args that do not fit the type are dropped.
        channel.deliver(&json!({"type": "streamlit:render", "args": {"locale": 3}}));

        assert_eq!(
            *seen.borrow(),
            vec![CalendarArgs {
                locale: "fr".to_string(),
                editable: false
            }]
        );
    }

    #[test]
    fn listener_can_reply_through_bridge() {
        let channel = MessageChannel::new();
        let port = MemoryPort::new();
        let bridge = Rc::new(Bridge::new(&channel, port.clone()));

        let weak = Rc::downgrade(&bridge);
        bridge.on_render(move |event| {
            if let Some(bridge) = weak.upgrade() {
                bridge.report_value(&event.args);
                bridge.report_frame_height(event.args.len() as f64);
            }
        });

        channel.deliver(&json!({"type": "streamlit:render", "args": {"x": 1, "y": 2}}));

        assert_eq!(
            port.take(),
            vec![
                json!({"type": "streamlit:setComponentValue", "value": {"x": 1, "y": 2}}),
                json!({"type": "streamlit:setFrameHeight", "height": 2.0}),
            ]
        );
    }

    #[test]
    fn standalone_bridge_never_fails() {
        let bridge = Bridge::standalone();
        assert!(!bridge.has_parent());

        bridge.announce_ready();
        bridge.report_frame_height(-1.0);
        bridge.report_value(&json!({"a": [1, 2]}));

        let hits = Rc::new(Cell::new(0));
        let counter = Rc::clone(&hits);
        bridge.on_render(move |_| counter.set(counter.get() + 1));
        bridge
            .channel()
            .deliver(&json!({"type": "streamlit:render", "args": {}}));
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn independent_bridges_do_not_share_state() {
        let first = Bridge::standalone();
        let second = Bridge::standalone();
        first.on_render(|_| {});
        first.announce_ready();

        assert_eq!(first.listener_count(), 1);
        assert_eq!(second.listener_count(), 0);
        assert_eq!(second.state(), BridgeState::NotReady);
    }

    #[test]
    fn drop_removes_channel_subscription() {
        let channel = MessageChannel::new();
        let bridge = Bridge::new(&channel, NoParent);
        assert_eq!(channel.subscriber_count(), 1);

        drop(bridge);

        assert_eq!(channel.subscriber_count(), 0);
        assert_eq!(
            channel.deliver(&json!({"type": "streamlit:render", "args": {}})),
            0
        );
    }

    #[test]
    fn port_failures_are_swallowed() {
        let channel = MessageChannel::new();
        let bridge = Bridge::new(&channel, FailingPort);

        bridge.announce_ready();
        bridge.report_frame_height(10.0);
        bridge.report_value(&json!(1));

        assert_eq!(bridge.state(), BridgeState::Ready);
        assert!(matches!(
            bridge.send(&OutboundMessage::<()>::component_ready()),
            Err(crate::BridgeError::Channel(ChannelError::Closed))
        ));
    }

    #[test]
    fn unserializable_value_is_dropped() {
        use std::collections::BTreeMap;

        let (bridge, _channel, port) = bridge_with_port();
        let mut bad = BTreeMap::new();
        bad.insert((1, 2), "tuple keys are not valid JSON object keys");

        bridge.report_value(&bad);

        assert!(port.is_empty());
    }

    struct FailingPort;

    impl ParentPort for FailingPort {
        fn post_message(&self, _message: &Value) -> framebridge_channel::Result<()> {
            Err(ChannelError::Closed)
        }
    }
}
