/// Errors that can occur in transport operations.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The transport configuration is unusable.
    #[error("invalid transport config: {0}")]
    InvalidConfig(String),

    /// Failed to open the specified port.
    #[error("failed to open {port}: {source}")]
    Open {
        port: String,
        source: serialport::Error,
    },

    /// Failed to enumerate the available ports.
    #[error("failed to enumerate serial ports: {0}")]
    Enumerate(serialport::Error),

    /// An I/O error occurred on the transport stream.
    #[error("transport I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The transport has been closed.
    #[error("transport closed")]
    Closed,
}

impl TransportError {
    /// The underlying I/O error kind, when one is known.
    pub fn io_kind(&self) -> Option<std::io::ErrorKind> {
        match self {
            Self::Open { source, .. } | Self::Enumerate(source) => match source.kind() {
                serialport::ErrorKind::Io(kind) => Some(kind),
                serialport::ErrorKind::NoDevice => Some(std::io::ErrorKind::NotFound),
                _ => None,
            },
            Self::Io(err) => Some(err.kind()),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, TransportError>;
