use bytes::{BufMut, Bytes, BytesMut};

use crate::error::{FrameError, Result};
use crate::geometry::FrameGeometry;

/// One decoded grayscale frame.
///
/// Pixel layout:
/// ```text
/// byte i  ──►  row i / width, column i % width
///
///            col 0    col 1   ...  col w-1
/// row 0    │ b[0]   │ b[1]   │ ... │ b[w-1]   │
/// row 1    │ b[w]   │ b[w+1] │ ... │ b[2w-1]  │
/// ...
/// ```
///
/// Frames are immutable; cloning shares the pixel buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    geometry: FrameGeometry,
    pixels: Bytes,
}

/// Summary statistics over a frame's pixel values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameStats {
    pub min: u8,
    pub max: u8,
    pub mean: f64,
}

impl Frame {
    /// Build a frame from exactly `geometry.frame_size()` bytes.
    pub fn from_bytes(geometry: FrameGeometry, pixels: impl Into<Bytes>) -> Result<Self> {
        let pixels = pixels.into();
        if pixels.len() != geometry.frame_size() {
            return Err(FrameError::SizeMismatch {
                expected: geometry.frame_size(),
                actual: pixels.len(),
            });
        }
        Ok(Self { geometry, pixels })
    }

    /// Reshape `data` into a frame, or `None` if the length does not match.
    ///
    /// Pure: the same input always yields an identical frame.
    pub fn decode(geometry: FrameGeometry, data: &[u8]) -> Option<Self> {
        Self::from_bytes(geometry, Bytes::copy_from_slice(data)).ok()
    }

    pub fn geometry(&self) -> FrameGeometry {
        self.geometry
    }

    pub fn width(&self) -> usize {
        self.geometry.width()
    }

    pub fn height(&self) -> usize {
        self.geometry.height()
    }

    /// Raw row-major pixel bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.pixels
    }

    /// Pixel at `(row, col)`, if in bounds.
    pub fn get(&self, row: usize, col: usize) -> Option<u8> {
        if row >= self.height() || col >= self.width() {
            return None;
        }
        Some(self.pixels[row * self.width() + col])
    }

    /// One row of pixels, if in bounds.
    pub fn row(&self, row: usize) -> Option<&[u8]> {
        if row >= self.height() {
            return None;
        }
        let start = row * self.width();
        Some(&self.pixels[start..start + self.width()])
    }

    /// Iterate rows top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[u8]> + '_ {
        self.pixels.chunks_exact(self.width())
    }

    /// Copy into a nested `height × width` grid.
    pub fn to_grid(&self) -> Vec<Vec<u8>> {
        self.rows().map(<[u8]>::to_vec).collect()
    }

    /// Nearest-neighbour upscale: every pixel becomes a `scale × scale` block.
    pub fn magnify(&self, scale: usize) -> Result<Self> {
        let geometry = self.geometry.magnified(scale)?;
        if scale == 1 {
            return Ok(self.clone());
        }

        let mut out = BytesMut::with_capacity(geometry.frame_size());
        for row in self.rows() {
            let start = out.len();
            for &pixel in row {
                out.put_bytes(pixel, scale);
            }
            let scaled_row = out[start..].to_vec();
            for _ in 1..scale {
                out.put_slice(&scaled_row);
            }
        }

        Self::from_bytes(geometry, out.freeze())
    }

    /// Min, max, and mean pixel value.
    pub fn stats(&self) -> FrameStats {
        let mut min = u8::MAX;
        let mut max = u8::MIN;
        let mut sum = 0u64;
        for &pixel in self.pixels.iter() {
            min = min.min(pixel);
            max = max.max(pixel);
            sum += u64::from(pixel);
        }
        FrameStats {
            min,
            max,
            mean: sum as f64 / self.pixels.len() as f64,
        }
    }
}
