use camview_frame::FrameGeometry;

/// Errors that can occur while presenting frames.
#[derive(Debug, thiserror::Error)]
pub enum DisplayError {
    /// The platform event loop could not be created or driven.
    #[cfg(feature = "window")]
    #[error("event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),

    /// The OS refused to create the window.
    #[cfg(feature = "window")]
    #[error("failed to create window: {0}")]
    CreateWindow(#[from] winit::error::OsError),

    /// The pixel buffer could not be created or presented.
    #[cfg(feature = "window")]
    #[error("pixel buffer error: {0}")]
    Pixels(#[from] pixels::Error),

    /// The surface texture could not be resized.
    #[cfg(feature = "window")]
    #[error("surface resize failed: {0}")]
    Texture(#[from] pixels::TextureError),

    /// The frame does not match the surface's dimensions.
    #[error("frame is {actual}, surface expects {expected}")]
    GeometryMismatch {
        expected: FrameGeometry,
        actual: FrameGeometry,
    },

    /// The frame dimensions do not fit a window surface.
    #[error("frame {0} is too large for a display surface")]
    SurfaceTooLarge(FrameGeometry),

    /// The platform never delivered the window.
    #[error("display surface was not created")]
    NotCreated,

    /// The surface has been closed.
    #[error("display surface closed")]
    Closed,
}

pub type Result<T> = std::result::Result<T, DisplayError>;
