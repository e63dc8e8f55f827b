use std::fs;
use std::io;

use framebridge_bridge::Bridge;
use framebridge_channel::{MessageChannel, WriterPort};
use framebridge_protocol::OutboundMessage;
use serde_json::Value;

use crate::cmd::{HeightArgs, ValueArgs};
use crate::exit::{bridge_error, io_error, json_error, CliError, CliResult, SUCCESS, USAGE};

/// Bridge whose parent is this process's stdout.
fn stdout_bridge() -> Bridge {
    Bridge::new(&MessageChannel::new(), WriterPort::new(io::stdout()))
}

fn emit<V: serde::Serialize>(message: &OutboundMessage<V>) -> CliResult<i32> {
    stdout_bridge()
        .send(message)
        .map_err(|err| bridge_error("send failed", err))?;
    Ok(SUCCESS)
}

pub fn ready() -> CliResult<i32> {
    emit(&OutboundMessage::<()>::component_ready())
}

pub fn height(args: HeightArgs) -> CliResult<i32> {
    emit(&OutboundMessage::<()>::frame_height(args.height))
}

pub fn value(args: ValueArgs) -> CliResult<i32> {
    let value = resolve_value(&args)?;
    emit(&OutboundMessage::component_value(value))
}

fn resolve_value(args: &ValueArgs) -> CliResult<Value> {
    if let Some(json) = &args.json {
        return serde_json::from_str(json)
            .map_err(|err| CliError::new(USAGE, format!("--json is not valid JSON: {err}")));
    }
    if let Some(data) = &args.data {
        return Ok(Value::String(data.clone()));
    }
    if let Some(path) = &args.file {
        let context = format!("failed reading {}", path.display());
        let raw = fs::read(path).map_err(|err| io_error(&context, err))?;
        return serde_json::from_slice(&raw).map_err(|err| json_error(&context, err));
    }
    Ok(Value::Null)
}
