//! Display surfaces for live grayscale camera previews.
//!
//! - [`DisplaySurface`] is the seam the viewer renders through
//! - [`gray_to_rgba`] expands 8-bit gray pixels for RGBA framebuffers
//! - [`WindowSurface`] is a desktop window (behind the `window` feature)

pub mod error;
pub mod surface;

#[cfg(feature = "window")]
pub mod window;

pub use error::{DisplayError, Result};
pub use surface::{gray_to_rgba, DisplaySurface, SurfaceSignal, DEFAULT_TITLE};

#[cfg(feature = "window")]
pub use window::{WindowConfig, WindowSurface};
