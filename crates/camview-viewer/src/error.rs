/// Errors that can end a viewer session.
#[derive(Debug, thiserror::Error)]
pub enum ViewerError {
    /// Transport-level error.
    #[error("transport error: {0}")]
    Transport(#[from] camview_transport::TransportError),

    /// Frame-level error.
    #[error("frame error: {0}")]
    Frame(#[from] camview_frame::FrameError),

    /// Display-level error.
    #[error("display error: {0}")]
    Display(#[from] camview_display::DisplayError),

    /// The configuration cannot drive a session.
    #[error("invalid viewer config: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, ViewerError>;
