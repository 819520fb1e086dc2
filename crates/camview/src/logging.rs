use clap::ValueEnum;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::filter::Targets;
use tracing_subscriber::prelude::*;

#[derive(Copy, Clone, Debug, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn as_filter(self) -> LevelFilter {
        match self {
            LogLevel::Error => LevelFilter::ERROR,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Trace => LevelFilter::TRACE,
        }
    }
}

/// Crates whose events follow `--log-level` directly.
const CAMVIEW_TARGETS: [&str; 5] = [
    "camview",
    "camview_transport",
    "camview_frame",
    "camview_display",
    "camview_viewer",
];

/// Windowing and GPU crates log heavily at debug; they never go below warn.
const BACKEND_CEILING: LevelFilter = LevelFilter::WARN;

/// Per-target filter for the chosen level.
pub fn log_filter(level: LogLevel) -> Targets {
    let level = level.as_filter();
    Targets::new()
        .with_targets(CAMVIEW_TARGETS.map(|target| (target, level)))
        .with_default(level.min(BACKEND_CEILING))
}

/// Install the stderr subscriber. The frame loop logs every incomplete read
/// at warn level, so `--log-level error` silences those diagnostics.
pub fn init_logging(format: LogFormat, level: LogLevel) {
    let builder = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(LevelFilter::TRACE)
        .with_ansi(false)
        .with_target(false);
    let filter = log_filter(level);

    match format {
        LogFormat::Text => {
            let _ = builder.finish().with(filter).try_init();
        }
        LogFormat::Json => {
            let _ = builder.json().finish().with(filter).try_init();
        }
    }
}
