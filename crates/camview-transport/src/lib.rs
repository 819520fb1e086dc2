//! Byte-oriented transport abstraction for serial camera modules.
//!
//! Provides a single interface over the channel a camera streams raw pixels on:
//! - Serial ports (USB CDC, UART bridges) via [`SerialTransport`]
//! - Anything else implementing [`Transport`] (test doubles, pipes)
//!
//! This is the lowest layer of camview. Frame reading builds on top of
//! the [`Transport`] trait provided here.

pub mod error;
pub mod serial;
pub mod traits;

pub use error::{Result, TransportError};
pub use serial::{
    available_ports, PortKind, PortSummary, SerialConfig, SerialTransport, DEFAULT_BAUD_RATE,
    DEFAULT_PORT, DEFAULT_READ_TIMEOUT,
};
pub use traits::Transport;
