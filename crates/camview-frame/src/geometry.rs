use crate::error::{FrameError, Result};

/// Default frame width in pixels.
pub const DEFAULT_WIDTH: usize = 60;

/// Default frame height in pixels.
pub const DEFAULT_HEIGHT: usize = 60;

/// Dimensions of a frame grid. Always non-zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameGeometry {
    width: usize,
    height: usize,
}

impl FrameGeometry {
    /// Create a geometry, rejecting zero dimensions and overflowing pixel counts.
    pub fn new(width: usize, height: usize) -> Result<Self> {
        if width == 0 || height == 0 || width.checked_mul(height).is_none() {
            return Err(FrameError::InvalidGeometry { width, height });
        }
        Ok(Self { width, height })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Bytes in one frame (one byte per pixel).
    pub fn frame_size(&self) -> usize {
        self.width * self.height
    }

    /// Geometry after nearest-neighbour magnification by `scale`.
    pub fn magnified(&self, scale: usize) -> Result<Self> {
        if scale == 0 {
            return Err(FrameError::InvalidScale(scale));
        }
        let width = self
            .width
            .checked_mul(scale)
            .ok_or(FrameError::InvalidScale(scale))?;
        let height = self
            .height
            .checked_mul(scale)
            .ok_or(FrameError::InvalidScale(scale))?;
        Self::new(width, height).map_err(|_| FrameError::InvalidScale(scale))
    }
}

impl Default for FrameGeometry {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
        }
    }
}

impl std::fmt::Display for FrameGeometry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_sixty_square() {
        let geometry = FrameGeometry::default();
        assert_eq!(geometry.width(), 60);
        assert_eq!(geometry.height(), 60);
        assert_eq!(geometry.frame_size(), 3600);
    }

    #[test]
    fn rejects_zero_dimensions() {
        assert!(matches!(
            FrameGeometry::new(0, 10),
            Err(FrameError::InvalidGeometry { width: 0, height: 10 })
        ));
        assert!(FrameGeometry::new(10, 0).is_err());
    }

    #[test]
    fn rejects_overflowing_pixel_count() {
        assert!(FrameGeometry::new(usize::MAX, 2).is_err());
    }

    #[test]
    fn non_square_frame_size() {
        let geometry = FrameGeometry::new(4, 3).unwrap();
        assert_eq!(geometry.frame_size(), 12);
        assert_eq!(geometry.to_string(), "4x3");
    }

    #[test]
    fn magnified_multiplies_both_axes() {
        let geometry = FrameGeometry::new(60, 40).unwrap().magnified(30).unwrap();
        assert_eq!(geometry.width(), 1800);
        assert_eq!(geometry.height(), 1200);
    }

    #[test]
    fn magnified_rejects_zero_and_overflow() {
        let geometry = FrameGeometry::default();
        assert!(matches!(
            geometry.magnified(0),
            Err(FrameError::InvalidScale(0))
        ));
        assert!(geometry.magnified(usize::MAX).is_err());
    }
}
