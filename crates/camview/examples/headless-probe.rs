//! Read one frame from a serial camera and print it as ASCII art.
//!
//! Run with:
//!   cargo run --example headless-probe -- /dev/ttyUSB0 4000000
//!
//! Useful on machines without a display to check that the wiring and line
//! rate are right before opening the preview window.

use camview::frame::{FrameConfig, FrameReader, ReadOutcome};
use camview::transport::{SerialConfig, SerialTransport, Transport, DEFAULT_BAUD_RATE, DEFAULT_PORT};

const RAMP: &[u8] = b" .:-=+*#%@";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut args = std::env::args().skip(1);
    let port = args.next().unwrap_or_else(|| DEFAULT_PORT.to_string());
    let baud_rate = match args.next() {
        Some(baud) => baud.parse()?,
        None => DEFAULT_BAUD_RATE,
    };

    let serial = SerialConfig {
        port,
        baud_rate,
        ..SerialConfig::default()
    };
    let transport = SerialTransport::open(&serial)?;
    eprintln!("Waiting for a frame on {}", transport.describe());

    let mut reader = FrameReader::with_config(
        transport,
        FrameConfig {
            read_timeout: serial.read_timeout,
            ..FrameConfig::default()
        },
    );

    match reader.read_frame()? {
        ReadOutcome::Complete(frame) => {
            for row in frame.rows() {
                let line: String = row
                    .iter()
                    .map(|&px| RAMP[px as usize * (RAMP.len() - 1) / 255] as char)
                    .collect();
                println!("{line}");
            }
            let stats = frame.stats();
            eprintln!(
                "{} min={} max={} mean={:.2}",
                frame.geometry(),
                stats.min,
                stats.max,
                stats.mean
            );
        }
        ReadOutcome::Incomplete(incomplete) => {
            eprintln!(
                "Incomplete frame: {} of {} bytes",
                incomplete.received, incomplete.expected
            );
        }
    }

    reader.into_inner().close()?;
    Ok(())
}
