use std::fmt;
use std::io;

use camview_display::DisplayError;
use camview_frame::FrameError;
use camview_transport::TransportError;
use camview_viewer::ViewerError;

// Process exit codes. 64 follows sysexits EX_USAGE, 124 follows timeout(1).
pub const SUCCESS: i32 = 0;
pub const FAILURE: i32 = 1;
pub const TRANSPORT_ERROR: i32 = 3;
pub const PERMISSION_DENIED: i32 = 50;
pub const DATA_INVALID: i32 = 60;
pub const USAGE: i32 = 64;
pub const TIMEOUT: i32 = 124;
pub const INTERNAL: i32 = 125;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug)]
pub struct CliError {
    pub code: i32,
    pub message: String,
}

impl CliError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

pub fn io_error(context: &str, err: io::Error) -> CliError {
    let code = io_kind_code(err.kind());
    CliError::new(code, format!("{context}: {err}"))
}

fn io_kind_code(kind: io::ErrorKind) -> i32 {
    match kind {
        io::ErrorKind::PermissionDenied => PERMISSION_DENIED,
        io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock => TIMEOUT,
        io::ErrorKind::NotFound | io::ErrorKind::NotConnected => TRANSPORT_ERROR,
        _ => INTERNAL,
    }
}

pub fn transport_error(context: &str, err: TransportError) -> CliError {
    match err {
        TransportError::Io(source) => io_error(context, source),
        TransportError::InvalidConfig(_) => CliError::new(USAGE, format!("{context}: {err}")),
        TransportError::Open { .. } | TransportError::Enumerate(_) => {
            let code = match err.io_kind() {
                Some(io::ErrorKind::PermissionDenied) => PERMISSION_DENIED,
                _ => TRANSPORT_ERROR,
            };
            CliError::new(code, format!("{context}: {err}"))
        }
        TransportError::Closed => CliError::new(FAILURE, format!("{context}: {err}")),
    }
}

pub fn frame_error(context: &str, err: FrameError) -> CliError {
    match err {
        FrameError::Io(source) => io_error(context, source),
        FrameError::Transport(source) => transport_error(context, source),
        FrameError::InvalidGeometry { .. } | FrameError::InvalidScale(_) => {
            CliError::new(USAGE, format!("{context}: {err}"))
        }
        FrameError::SizeMismatch { .. } => CliError::new(DATA_INVALID, format!("{context}: {err}")),
    }
}

pub fn display_error(context: &str, err: DisplayError) -> CliError {
    match err {
        DisplayError::GeometryMismatch { .. } => {
            CliError::new(DATA_INVALID, format!("{context}: {err}"))
        }
        DisplayError::SurfaceTooLarge(_) => CliError::new(USAGE, format!("{context}: {err}")),
        DisplayError::Closed => CliError::new(FAILURE, format!("{context}: {err}")),
        other => CliError::new(INTERNAL, format!("{context}: {other}")),
    }
}

pub fn viewer_error(context: &str, err: ViewerError) -> CliError {
    match err {
        ViewerError::Transport(err) => transport_error(context, err),
        ViewerError::Frame(err) => frame_error(context, err),
        ViewerError::Display(err) => display_error(context, err),
        ViewerError::InvalidConfig(_) => CliError::new(USAGE, format!("{context}: {err}")),
    }
}
