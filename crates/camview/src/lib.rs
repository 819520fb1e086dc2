//! Live preview of raw grayscale frames from serial camera modules.
//!
//! camview reads fixed-size frames (one byte per pixel, no framing) from a
//! serial port and shows them in a window until the user presses `q`.
//!
//! # Crate Structure
//!
//! - [`transport`]: Serial transport abstraction and port enumeration
//! - [`frame`]: Frame geometry, decoding, and fixed-size reads
//! - [`display`]: Display surfaces (window behind the `window` feature)
//! - [`viewer`]: The preview loop tying the layers together

/// Re-export transport types.
pub mod transport {
    pub use camview_transport::*;
}

/// Re-export frame types.
pub mod frame {
    pub use camview_frame::*;
}

/// Re-export display types.
pub mod display {
    pub use camview_display::*;
}

/// Re-export viewer types.
pub mod viewer {
    pub use camview_viewer::*;
}
