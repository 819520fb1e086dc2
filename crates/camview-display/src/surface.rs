use std::time::Duration;

use camview_frame::Frame;

use crate::error::Result;

/// Title shown on the preview surface unless configured otherwise.
pub const DEFAULT_TITLE: &str = "OV7670";

/// Input observed on a display surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceSignal {
    /// A character key was pressed while the surface had focus.
    Key(char),
    /// The user asked to close the surface (window close button).
    CloseRequested,
}

/// A rendering target for decoded frames.
///
/// The viewer owns one surface for the duration of its loop and calls
/// [`DisplaySurface::close`] exactly once on shutdown. `close` must be
/// idempotent.
pub trait DisplaySurface {
    /// Present `frame`, replacing whatever was shown before.
    fn render(&mut self, frame: &Frame) -> Result<()>;

    /// Wait up to `wait` for input and return the first signal seen.
    fn poll_signal(&mut self, wait: Duration) -> Result<Option<SurfaceSignal>>;

    /// Tear the surface down.
    fn close(&mut self) -> Result<()>;
}

impl<S: DisplaySurface + ?Sized> DisplaySurface for Box<S> {
    fn render(&mut self, frame: &Frame) -> Result<()> {
        (**self).render(frame)
    }

    fn poll_signal(&mut self, wait: Duration) -> Result<Option<SurfaceSignal>> {
        (**self).poll_signal(wait)
    }

    fn close(&mut self) -> Result<()> {
        (**self).close()
    }
}

/// Expand 8-bit gray pixels into opaque RGBA.
///
/// Writes `min(src.len(), dst.len() / 4)` pixels; extra destination bytes
/// are left untouched.
pub fn gray_to_rgba(src: &[u8], dst: &mut [u8]) {
    for (&gray, rgba) in src.iter().zip(dst.chunks_exact_mut(4)) {
        rgba.copy_from_slice(&[gray, gray, gray, 0xff]);
    }
}
