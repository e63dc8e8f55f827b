use clap::{Args, Subcommand};
use framebridge_channel::DEFAULT_MAX_LINE_LEN;
use std::path::PathBuf;

use crate::exit::CliResult;
use crate::output::OutputFormat;

pub mod emit;
pub mod listen;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print a componentReady message.
    Ready,
    /// Print a setFrameHeight message.
    Height(HeightArgs),
    /// Print a setComponentValue message.
    Value(ValueArgs),
    /// Run a bridge on stdio: render events in on stdin, messages out on stdout.
    Listen(ListenArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Ready => emit::ready(),
        Command::Height(args) => emit::height(args),
        Command::Value(args) => emit::value(args),
        Command::Listen(args) => listen::run(args, format),
        Command::Version(args) => version::run(args),
    }
}

#[derive(Args, Debug)]
pub struct HeightArgs {
    /// Frame height in pixels. Sent as given, without clamping.
    #[arg(allow_negative_numbers = true)]
    pub height: f64,
}

#[derive(Args, Debug)]
pub struct ValueArgs {
    /// JSON value.
    #[arg(long, conflicts_with_all = ["data", "file"])]
    pub json: Option<String>,
    /// Plain string value.
    #[arg(long, conflicts_with_all = ["json", "file"])]
    pub data: Option<String>,
    /// Read a JSON value from file.
    #[arg(long, conflicts_with_all = ["json", "data"])]
    pub file: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct ListenArgs {
    /// Announce readiness before reading input.
    #[arg(long)]
    pub ready: bool,
    /// Report this frame height after every render.
    #[arg(long, value_name = "PX", allow_negative_numbers = true)]
    pub height: Option<f64>,
    /// Report each render's args back as the component value.
    #[arg(long)]
    pub echo: bool,
    /// Exit after N render events. With 0, no input is read.
    #[arg(long)]
    pub count: Option<usize>,
    /// Skip inbound lines longer than this many bytes.
    #[arg(long, value_name = "BYTES", default_value_t = DEFAULT_MAX_LINE_LEN)]
    pub max_line_len: usize,
    /// Warn when a report is sent before readiness was announced.
    #[arg(long, env = "FRAMEBRIDGE_WARN_BEFORE_READY")]
    pub warn_before_ready: bool,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}
