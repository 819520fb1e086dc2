//! Live preview loop for serial grayscale camera modules.
//!
//! This is the "just works" layer: hand [`FrameViewer`] a transport and a
//! display surface and it reads, decodes, renders, and polls for the
//! cancellation key until told to stop.

pub mod config;
pub mod error;
pub mod viewer;

pub use config::{ViewerConfig, DEFAULT_CANCEL_KEY, DEFAULT_POLL_INTERVAL};
pub use error::{Result, ViewerError};
pub use viewer::{FrameViewer, StopReason, ViewerState, ViewerSummary};

#[cfg(feature = "window")]
pub use viewer::open_serial_window;
