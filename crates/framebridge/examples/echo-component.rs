//! Minimal component: echoes every render's args back as its value.
//!
//! The parent side is simulated in-process: render events are delivered on the
//! channel directly and the messages the component posts are read back from a
//! recording port.
//!
//! Run with:
//!   cargo run --example echo-component

use std::rc::Rc;

use framebridge::bridge::Bridge;
use framebridge::channel::{MemoryPort, MessageChannel};
use framebridge::protocol::decode_outbound;
use serde_json::{json, Value};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let channel = MessageChannel::new();
    let parent = MemoryPort::new();
    let bridge = Rc::new(Bridge::new(&channel, parent.clone()));

    let replier = Rc::downgrade(&bridge);
    bridge.on_render(move |event| {
        eprintln!("render with {} args", event.args.len());
        if let Some(bridge) = replier.upgrade() {
            bridge.report_value(&event.args);
            bridge.report_frame_height(48.0 * event.args.len() as f64);
        }
    });
    bridge.announce_ready();

    channel.deliver(&json!({"type": "streamlit:render", "args": {"locale": "fr"}}));
    channel.deliver(&json!({"type": "someOtherLibrary:ping"}));
    channel.deliver(&json!({
        "type": "streamlit:render",
        "args": {"locale": "en", "editable": true}
    }));

    for raw in parent.take() {
        let message = decode_outbound::<Value>(&raw)?;
        match message {
            Some(message) => println!("{:<18} {raw}", message.kind()),
            None => println!("{:<18} {raw}", "?"),
        }
    }

    Ok(())
}
