use std::io::Read;
use std::time::Duration;

use crate::error::Result;

/// A connected byte stream the camera writes pixels into.
///
/// The viewer owns exactly one transport for its lifetime and calls
/// [`Transport::close`] once on shutdown. Implementations must make `close`
/// idempotent and fail subsequent reads with `NotConnected`.
pub trait Transport: Read {
    /// Human-readable endpoint name for diagnostics (e.g. the port path).
    fn describe(&self) -> &str;

    /// Release the underlying handle.
    fn close(&mut self) -> Result<()>;

    /// Whether [`Transport::close`] has already run.
    fn is_closed(&self) -> bool;

    /// Bound how long the next `read` may block.
    ///
    /// Streams without a native timeout keep the default, which ignores it.
    fn set_read_timeout(&mut self, _timeout: Duration) -> Result<()> {
        Ok(())
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn describe(&self) -> &str {
        (**self).describe()
    }

    fn close(&mut self) -> Result<()> {
        (**self).close()
    }

    fn is_closed(&self) -> bool {
        (**self).is_closed()
    }

    fn set_read_timeout(&mut self, timeout: Duration) -> Result<()> {
        (**self).set_read_timeout(timeout)
    }
}
