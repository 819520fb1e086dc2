use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use camview_viewer::{open_serial_window, ViewerConfig};

use crate::cmd::ViewArgs;
use crate::exit::{viewer_error, CliError, CliResult, INTERNAL, SUCCESS, USAGE};
use crate::output::{print_summary, OutputFormat};

pub fn run(args: ViewArgs, format: OutputFormat) -> CliResult<i32> {
    let config = viewer_config(&args)?;
    let port = config.serial.port.clone();

    let running = Arc::new(AtomicBool::new(true));
    install_ctrlc_handler(running.clone())?;

    let mut viewer = open_serial_window(config)
        .map_err(|err| viewer_error("open failed", err))?
        .with_running_flag(running);
    let summary = viewer
        .run()
        .map_err(|err| viewer_error("view failed", err))?;

    print_summary(&port, &summary, format);
    Ok(SUCCESS)
}

fn viewer_config(args: &ViewArgs) -> CliResult<ViewerConfig> {
    if args.scale == 0 {
        return Err(CliError::new(USAGE, "scale must be at least 1"));
    }
    Ok(ViewerConfig {
        serial: args.serial.serial_config()?,
        geometry: args.serial.geometry()?,
        title: args.title.clone(),
        scale: args.scale,
        frame_limit: args.frames,
        ..ViewerConfig::default()
    })
}

fn install_ctrlc_handler(running: Arc<AtomicBool>) -> CliResult<()> {
    ctrlc::set_handler(move || {
        running.store(false, Ordering::SeqCst);
    })
    .map_err(|err| CliError::new(INTERNAL, format!("failed to install Ctrl-C handler: {err}")))
}
