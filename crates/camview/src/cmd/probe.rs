use camview_frame::{FrameConfig, FrameReader, ReadOutcome};
use camview_transport::{SerialTransport, Transport};
use tracing::{info, warn};

use crate::cmd::ProbeArgs;
use crate::exit::{frame_error, transport_error, CliError, CliResult, FAILURE, SUCCESS, USAGE};
use crate::output::{print_probe, OutputFormat, ProbeRecord};

/// Read `count` frames without opening a window.
///
/// Exits non-zero when no attempt produced a complete frame.
pub fn run(args: ProbeArgs, format: OutputFormat) -> CliResult<i32> {
    if args.count == 0 {
        return Err(CliError::new(USAGE, "count must be greater than zero"));
    }

    let serial = args.serial.serial_config()?;
    let geometry = args.serial.geometry()?;
    let transport =
        SerialTransport::open(&serial).map_err(|err| transport_error("open failed", err))?;

    let mut reader = FrameReader::with_config(
        transport,
        FrameConfig {
            geometry,
            read_timeout: serial.read_timeout,
        },
    );

    let expected = geometry.frame_size();
    let mut records = Vec::with_capacity(args.count);
    for attempt in 1..=args.count {
        let outcome = reader
            .read_frame()
            .map_err(|err| frame_error("read failed", err))?;
        if let ReadOutcome::Incomplete(incomplete) = &outcome {
            warn!(
                attempt,
                received = incomplete.received,
                expected = incomplete.expected,
                "incomplete frame"
            );
        }
        records.push(ProbeRecord::from_outcome(attempt, expected, &outcome));
    }

    let mut transport = reader.into_inner();
    transport
        .close()
        .map_err(|err| transport_error("close failed", err))?;

    let complete = records.iter().filter(|r| r.status == "complete").count();
    info!(complete, attempts = records.len(), "probe finished");

    print_probe(&serial.port, &geometry.to_string(), &records, format);

    if complete == 0 {
        Ok(FAILURE)
    } else {
        Ok(SUCCESS)
    }
}
