use std::time::Duration;

use camview_frame::{FrameConfig, FrameGeometry};
use camview_transport::SerialConfig;

use crate::error::{Result, ViewerError};

pub use camview_display::DEFAULT_TITLE;

/// Key that ends the preview loop.
pub const DEFAULT_CANCEL_KEY: char = 'q';

/// How long each cancellation check waits for input.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(1);

/// Everything a viewer session needs, passed in explicitly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewerConfig {
    /// Port, line rate, and per-frame read timeout.
    pub serial: SerialConfig,
    /// Frame dimensions on the wire.
    pub geometry: FrameGeometry,
    /// Display window title.
    pub title: String,
    /// Nearest-neighbour magnification applied before rendering. 1 renders natively.
    pub scale: usize,
    /// Key that ends the loop when pressed in the window.
    pub cancel_key: char,
    /// Input wait after each rendered frame.
    pub poll_interval: Duration,
    /// Stop after this many rendered frames.
    pub frame_limit: Option<u64>,
}

impl ViewerConfig {
    /// Check the combination is usable before any device is opened.
    pub fn validate(&self) -> Result<()> {
        self.serial.validate()?;
        if self.scale == 0 {
            return Err(ViewerError::InvalidConfig(
                "scale must be at least 1".to_string(),
            ));
        }
        self.geometry.magnified(self.scale)?;
        if self.frame_limit == Some(0) {
            return Err(ViewerError::InvalidConfig(
                "frame limit must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Reader settings derived from the geometry and serial timeout.
    pub fn frame_config(&self) -> FrameConfig {
        FrameConfig {
            geometry: self.geometry,
            read_timeout: self.serial.read_timeout,
        }
    }

    /// Dimensions of what actually reaches the display.
    pub fn display_geometry(&self) -> Result<FrameGeometry> {
        Ok(self.geometry.magnified(self.scale)?)
    }
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            serial: SerialConfig::default(),
            geometry: FrameGeometry::default(),
            title: DEFAULT_TITLE.to_string(),
            scale: 1,
            cancel_key: DEFAULT_CANCEL_KEY,
            poll_interval: DEFAULT_POLL_INTERVAL,
            frame_limit: None,
        }
    }
}
