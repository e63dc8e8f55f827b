use std::io::IsTerminal;
use std::time::{SystemTime, UNIX_EPOCH};

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use framebridge_bridge::RenderEvent;
use framebridge_protocol::{MessageKind, RenderArgs};
use serde::Serialize;
use serde_json::Value;

const PREVIEW_LIMIT: usize = 80;

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
}

impl OutputFormat {
    /// Render reports go to stderr, so the default follows stderr.
    pub fn default_for_stderr() -> Self {
        if std::io::stderr().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

#[derive(Serialize)]
struct RenderOutput<'a> {
    kind: &'static str,
    seq: usize,
    arg_count: usize,
    args: &'a RenderArgs,
    timestamp: String,
}

pub fn print_render(event: &RenderEvent<RenderArgs>, seq: usize, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            let out = RenderOutput {
                kind: MessageKind::Render.as_str(),
                seq,
                arg_count: event.args.len(),
                args: &event.args,
                timestamp: now_unix_seconds(),
            };
            eprintln!(
                "{}",
                serde_json::to_string(&out).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec![format!("RENDER #{seq}"), "VALUE".to_string()]);
            if event.args.is_empty() {
                table.add_row(vec!["(no args)".to_string(), String::new()]);
            }
            for (key, value) in &event.args {
                table.add_row(vec![key.clone(), value_preview(value)]);
            }
            eprintln!("{table}");
        }
        OutputFormat::Pretty => {
            eprintln!(
                "render #{} args={} {}",
                seq,
                event.args.len(),
                value_preview(&Value::Object(event.args.clone()))
            );
        }
    }
}

fn value_preview(value: &Value) -> String {
    let text = value.to_string();
    if text.chars().count() <= PREVIEW_LIMIT {
        return text;
    }
    let mut cut: String = text.chars().take(PREVIEW_LIMIT).collect();
    cut.push('…');
    cut
}

fn now_unix_seconds() -> String {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs().to_string())
        .unwrap_or_else(|_| "0".to_string())
}
