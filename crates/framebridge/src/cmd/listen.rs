use std::cell::Cell;
use std::io;
use std::rc::Rc;

use framebridge_bridge::{Bridge, BridgeConfig};
use framebridge_channel::{LineReader, LineReaderConfig, MessageChannel, WriterPort};
use tracing::{debug, info};

use crate::cmd::ListenArgs;
use crate::exit::{channel_error, CliResult, SUCCESS};
use crate::output::{print_render, OutputFormat};

pub fn run(args: ListenArgs, format: OutputFormat) -> CliResult<i32> {
    let channel = MessageChannel::new();
    let config = BridgeConfig {
        warn_before_ready: args.warn_before_ready,
    };
    let bridge = Rc::new(Bridge::with_config(
        &channel,
        WriterPort::new(io::stdout()),
        config,
    ));

    let renders = Rc::new(Cell::new(0usize));
    let seen = Rc::clone(&renders);
    let replier = Rc::downgrade(&bridge);
    let (echo, height) = (args.echo, args.height);
    bridge.on_render(move |event| {
        let seq = seen.get() + 1;
        seen.set(seq);
        print_render(event, seq, format);

        let Some(bridge) = replier.upgrade() else {
            return;
        };
        if echo {
            bridge.report_value(&event.args);
        }
        if let Some(height) = height {
            bridge.report_frame_height(height);
        }
    });

    if args.ready {
        bridge.announce_ready();
    }
    info!(ready = args.ready, echo, "listening for render events on stdin");

    let count = args.count;
    let mut reader = LineReader::with_config(
        io::stdin().lock(),
        LineReaderConfig {
            max_line_len: args.max_line_len,
        },
    );
    channel
        .pump_while(&mut reader, || match count {
            Some(count) if renders.get() >= count => {
                debug!(count, "render count reached");
                false
            }
            _ => true,
        })
        .map_err(|err| channel_error("read failed", err))?;

    info!(renders = renders.get(), "input closed");
    Ok(SUCCESS)
}
