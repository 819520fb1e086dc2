use std::io::IsTerminal;
use std::time::{SystemTime, UNIX_EPOCH};

use camview_frame::{FrameStats, ReadOutcome};
use camview_transport::PortSummary;
use camview_viewer::ViewerSummary;
use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use serde::Serialize;

/// Versioned identifiers for each JSON document shape.
pub const PORTS_SCHEMA_ID: &str = "camview.ports.v1";
pub const PROBE_SCHEMA_ID: &str = "camview.probe.v1";
pub const SUMMARY_SCHEMA_ID: &str = "camview.view-summary.v1";

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

#[derive(Serialize)]
struct PortOutput<'a> {
    name: &'a str,
    kind: &'static str,
    vid: Option<String>,
    pid: Option<String>,
    manufacturer: Option<&'a str>,
    product: Option<&'a str>,
    serial_number: Option<&'a str>,
}

impl<'a> PortOutput<'a> {
    fn from_summary(port: &'a PortSummary) -> Self {
        Self {
            name: &port.name,
            kind: port.kind.as_str(),
            vid: port.vid.map(|vid| format!("{vid:04x}")),
            pid: port.pid.map(|pid| format!("{pid:04x}")),
            manufacturer: port.manufacturer.as_deref(),
            product: port.product.as_deref(),
            serial_number: port.serial_number.as_deref(),
        }
    }
}

#[derive(Serialize)]
struct PortsOutput<'a> {
    schema_id: &'static str,
    ports: Vec<PortOutput<'a>>,
}

pub fn print_ports(ports: &[PortSummary], format: OutputFormat) {
    let rows: Vec<PortOutput<'_>> = ports.iter().map(PortOutput::from_summary).collect();

    match format {
        OutputFormat::Json => {
            let out = PortsOutput {
                schema_id: PORTS_SCHEMA_ID,
                ports: rows,
            };
            println!(
                "{}",
                serde_json::to_string(&out).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["PORT", "KIND", "VID:PID", "PRODUCT"]);
            for row in &rows {
                table.add_row(vec![
                    row.name.to_string(),
                    row.kind.to_string(),
                    usb_id(row),
                    row.product.unwrap_or("-").to_string(),
                ]);
            }
            println!("{table}");
        }
        OutputFormat::Pretty => {
            if rows.is_empty() {
                println!("no serial ports found");
            }
            for row in &rows {
                println!(
                    "{} ({}) {} {}",
                    row.name,
                    row.kind,
                    usb_id(row),
                    row.product.unwrap_or("-")
                );
            }
        }
    }
}

fn usb_id(row: &PortOutput<'_>) -> String {
    match (&row.vid, &row.pid) {
        (Some(vid), Some(pid)) => format!("{vid}:{pid}"),
        _ => "-".to_string(),
    }
}

/// One probe attempt, flattened for output.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ProbeRecord {
    pub attempt: usize,
    pub status: &'static str,
    pub received: usize,
    pub expected: usize,
    pub min: Option<u8>,
    pub max: Option<u8>,
    pub mean: Option<f64>,
}

impl ProbeRecord {
    pub fn from_outcome(attempt: usize, expected: usize, outcome: &ReadOutcome) -> Self {
        match outcome {
            ReadOutcome::Complete(frame) => {
                let FrameStats { min, max, mean } = frame.stats();
                Self {
                    attempt,
                    status: "complete",
                    received: frame.as_bytes().len(),
                    expected,
                    min: Some(min),
                    max: Some(max),
                    mean: Some((mean * 100.0).round() / 100.0),
                }
            }
            ReadOutcome::Incomplete(incomplete) => Self {
                attempt,
                status: incomplete.shortfall().as_str(),
                received: incomplete.received,
                expected: incomplete.expected,
                min: None,
                max: None,
                mean: None,
            },
        }
    }
}

#[derive(Serialize)]
struct ProbeOutput<'a> {
    schema_id: &'static str,
    port: &'a str,
    geometry: String,
    attempts: &'a [ProbeRecord],
    timestamp: String,
}

pub fn print_probe(port: &str, geometry: &str, records: &[ProbeRecord], format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            let out = ProbeOutput {
                schema_id: PROBE_SCHEMA_ID,
                port,
                geometry: geometry.to_string(),
                attempts: records,
                timestamp: now_unix_seconds(),
            };
            println!(
                "{}",
                serde_json::to_string(&out).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["#", "STATUS", "BYTES", "MIN", "MAX", "MEAN"]);
            for record in records {
                table.add_row(vec![
                    record.attempt.to_string(),
                    record.status.to_string(),
                    format!("{}/{}", record.received, record.expected),
                    optional(record.min),
                    optional(record.max),
                    record
                        .mean
                        .map(|mean| format!("{mean:.2}"))
                        .unwrap_or_else(|| "-".to_string()),
                ]);
            }
            println!("{table}");
        }
        OutputFormat::Pretty => {
            println!("Probe {port} ({geometry}):");
            for record in records {
                match (record.min, record.max, record.mean) {
                    (Some(min), Some(max), Some(mean)) => println!(
                        "  #{} {} {}/{} min={min} max={max} mean={mean:.2}",
                        record.attempt, record.status, record.received, record.expected
                    ),
                    _ => println!(
                        "  #{} {} {}/{}",
                        record.attempt, record.status, record.received, record.expected
                    ),
                }
            }
        }
    }
}

#[derive(Serialize)]
struct SummaryOutput<'a> {
    schema_id: &'static str,
    port: &'a str,
    frames_rendered: u64,
    incomplete_frames: u64,
    stop_reason: &'static str,
}

pub fn print_summary(port: &str, summary: &ViewerSummary, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            let out = SummaryOutput {
                schema_id: SUMMARY_SCHEMA_ID,
                port,
                frames_rendered: summary.frames_rendered,
                incomplete_frames: summary.incomplete_frames,
                stop_reason: summary.stop_reason.as_str(),
            };
            println!(
                "{}",
                serde_json::to_string(&out).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table | OutputFormat::Pretty => {
            println!("View Summary:");
            println!("  Port:              {port}");
            println!("  Frames rendered:   {}", summary.frames_rendered);
            println!("  Incomplete frames: {}", summary.incomplete_frames);
            println!("  Stopped by:        {}", summary.stop_reason.as_str());
        }
    }
}

fn optional(value: Option<u8>) -> String {
    value
        .map(|v| v.to_string())
        .unwrap_or_else(|| "-".to_string())
}

fn now_unix_seconds() -> String {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs().to_string())
        .unwrap_or_else(|_| "0".to_string())
}

#[cfg(test)]
mod tests {
    use camview_frame::{Frame, FrameGeometry, IncompleteFrame};

    use super::*;

    #[test]
    fn probe_record_for_complete_frame() {
        let geometry = FrameGeometry::new(2, 2).unwrap();
        let frame = Frame::decode(geometry, &[0, 10, 20, 31]).unwrap();
        let record = ProbeRecord::from_outcome(1, 4, &ReadOutcome::Complete(frame));

        assert_eq!(record.status, "complete");
        assert_eq!(record.received, 4);
        assert_eq!(record.min, Some(0));
        assert_eq!(record.max, Some(31));
        assert_eq!(record.mean, Some(15.25));
    }

    #[test]
    fn probe_record_for_incomplete_reads() {
        let empty = ProbeRecord::from_outcome(
            2,
            3600,
            &ReadOutcome::Incomplete(IncompleteFrame {
                received: 0,
                expected: 3600,
            }),
        );
        assert_eq!(empty.status, "empty");
        assert_eq!(empty.mean, None);

        let partial = ProbeRecord::from_outcome(
            3,
            3600,
            &ReadOutcome::Incomplete(IncompleteFrame {
                received: 3599,
                expected: 3600,
            }),
        );
        assert_eq!(partial.status, "partial");
        assert_eq!(partial.received, 3599);
    }

    #[test]
    fn summary_json_carries_schema_id() {
        let out = SummaryOutput {
            schema_id: SUMMARY_SCHEMA_ID,
            port: "/dev/ttyUSB0",
            frames_rendered: 3,
            incomplete_frames: 1,
            stop_reason: "cancel-key",
        };
        let value = serde_json::to_value(&out).unwrap();
        assert_eq!(value["schema_id"], "camview.view-summary.v1");
        assert_eq!(value["frames_rendered"], 3);
    }

    #[test]
    fn port_output_formats_usb_ids() {
        let port = PortSummary {
            name: "/dev/ttyUSB0".to_string(),
            kind: camview_transport::PortKind::Usb,
            vid: Some(0x1a86),
            pid: Some(0x7523),
            manufacturer: None,
            product: Some("CH340".to_string()),
            serial_number: None,
        };
        let row = PortOutput::from_summary(&port);
        assert_eq!(usb_id(&row), "1a86:7523");
        assert_eq!(row.kind, "usb");
    }
}
