//! Fixed-size grayscale frame decoding for raw camera byte streams.
//!
//! The wire carries no framing at all: a frame is exactly
//! `width * height` consecutive bytes, one unsigned byte per pixel,
//! row-major, no padding. This crate turns such a stream into [`Frame`]s:
//! - [`FrameGeometry`] fixes the grid dimensions
//! - [`FrameReader`] reads exactly one frame's worth of bytes within a deadline
//! - [`Frame`] is the immutable `height × width` grid

pub mod codec;
pub mod error;
pub mod geometry;
pub mod reader;

pub use codec::{Frame, FrameStats};
pub use error::{FrameError, Result};
pub use geometry::{FrameGeometry, DEFAULT_HEIGHT, DEFAULT_WIDTH};
pub use reader::{FrameConfig, FrameReader, IncompleteFrame, ReadOutcome, Shortfall};
