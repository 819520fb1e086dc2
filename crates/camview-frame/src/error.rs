/// Errors that can occur while building or reading frames.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// Width or height is zero, or the pixel count does not fit in memory.
    #[error("invalid frame geometry {width}x{height}")]
    InvalidGeometry { width: usize, height: usize },

    /// The byte count does not match the geometry.
    #[error("frame size mismatch (expected {expected} bytes, got {actual})")]
    SizeMismatch { expected: usize, actual: usize },

    /// Magnification factor is zero or overflows the geometry.
    #[error("invalid magnification factor {0}")]
    InvalidScale(usize),

    /// The transport refused a read setting.
    #[error("transport error: {0}")]
    Transport(#[from] camview_transport::TransportError),

    /// An I/O error occurred while reading frames.
    #[error("frame I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, FrameError>;
