use std::time::Duration;

use camview_frame::FrameGeometry;
use camview_transport::{SerialConfig, DEFAULT_PORT};
use clap::{Args, Subcommand};

use crate::exit::{frame_error, CliError, CliResult, USAGE};
use crate::output::OutputFormat;

pub mod ports;
pub mod probe;
pub mod version;
pub mod view;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Open the live preview window.
    View(ViewArgs),
    /// Read frames without a window and print per-frame statistics.
    Probe(ProbeArgs),
    /// List available serial ports.
    Ports(PortsArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::View(args) => view::run(args, format),
        Command::Probe(args) => probe::run(args, format),
        Command::Ports(args) => ports::run(args, format),
        Command::Version(args) => version::run(args),
    }
}

/// Connection and geometry options shared by commands that open the camera.
#[derive(Args, Debug, Clone)]
pub struct SerialArgs {
    /// Serial port the camera is attached to.
    #[arg(long, short = 'p', env = "CAMVIEW_PORT", default_value = DEFAULT_PORT)]
    pub port: String,
    /// Line rate in baud.
    #[arg(long, short = 'b', env = "CAMVIEW_BAUD", default_value_t = camview_transport::DEFAULT_BAUD_RATE)]
    pub baud: u32,
    /// Time allowed for one frame to arrive (e.g. 10s, 500ms).
    #[arg(long, env = "CAMVIEW_TIMEOUT", default_value = "10s")]
    pub timeout: String,
    /// Frame width in pixels.
    #[arg(long, default_value_t = camview_frame::DEFAULT_WIDTH)]
    pub width: usize,
    /// Frame height in pixels.
    #[arg(long, default_value_t = camview_frame::DEFAULT_HEIGHT)]
    pub height: usize,
}

impl SerialArgs {
    pub fn serial_config(&self) -> CliResult<SerialConfig> {
        Ok(SerialConfig {
            port: self.port.clone(),
            baud_rate: self.baud,
            read_timeout: parse_timeout(&self.timeout)?,
        })
    }

    pub fn geometry(&self) -> CliResult<FrameGeometry> {
        FrameGeometry::new(self.width, self.height)
            .map_err(|err| frame_error("invalid geometry", err))
    }
}

#[derive(Args, Debug)]
pub struct ViewArgs {
    #[command(flatten)]
    pub serial: SerialArgs,
    /// Magnify each pixel into a SCALE×SCALE block (1 shows the native grid).
    #[arg(long, default_value_t = 1)]
    pub scale: usize,
    /// Window title.
    #[arg(long, default_value = camview_viewer::config::DEFAULT_TITLE)]
    pub title: String,
    /// Exit after rendering N frames.
    #[arg(long, value_name = "N")]
    pub frames: Option<u64>,
}

#[derive(Args, Debug)]
pub struct ProbeArgs {
    #[command(flatten)]
    pub serial: SerialArgs,
    /// Number of frame reads to attempt.
    #[arg(long, default_value_t = 1)]
    pub count: usize,
}

#[derive(Args, Debug, Default)]
pub struct PortsArgs {}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}

pub fn parse_timeout(input: &str) -> CliResult<Duration> {
    let input = input.trim();
    if input.is_empty() {
        return Err(CliError::new(USAGE, "timeout must not be empty"));
    }

    let (number, unit) = if let Some(num) = input.strip_suffix("ms") {
        (num, "ms")
    } else if let Some(num) = input.strip_suffix('s') {
        (num, "s")
    } else {
        (input, "s")
    };

    let value: u64 = number
        .parse()
        .map_err(|_| CliError::new(USAGE, format!("invalid timeout value: {input}")))?;

    if value == 0 {
        return Err(CliError::new(USAGE, "timeout must be greater than zero"));
    }

    match unit {
        "ms" => Ok(Duration::from_millis(value)),
        "s" => Ok(Duration::from_secs(value)),
        _ => Err(CliError::new(
            USAGE,
            format!("unsupported timeout unit: {unit}"),
        )),
    }
}
