//! Core types for zenmdec

use crate::error::Error;
use crate::Result;

/// Tile mode selecting how the image is split into transform blocks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TileMode {
    /// 16x16 macroblocks with 4:2:0 chroma subsampling (full color)
    #[default]
    Color,
    /// 8x8 luma-only blocks
    Monochrome,
}

impl TileMode {
    /// Tile edge length in pixels
    #[must_use]
    pub const fn tile_size(self) -> usize {
        match self {
            TileMode::Color => 16,
            TileMode::Monochrome => 8,
        }
    }
}

/// Planar YCbCr raster, the encoder's input.
///
/// All three planes are full resolution and share the same dimensions;
/// chroma subsampling happens inside the macroblock encoder.
#[derive(Debug, Clone)]
pub struct YCbCrImage {
    y: Vec<u8>,
    cb: Vec<u8>,
    cr: Vec<u8>,
    width: usize,
    height: usize,
}

impl YCbCrImage {
    /// Create an image from three equally sized planes.
    pub fn new(
        y: Vec<u8>,
        cb: Vec<u8>,
        cr: Vec<u8>,
        width: usize,
        height: usize,
    ) -> Result<Self> {
        let expected = width * height;
        for (plane, data) in [("luma", &y), ("chroma-blue", &cb), ("chroma-red", &cr)] {
            if data.len() != expected {
                return Err(Error::InvalidPlaneData {
                    plane,
                    expected,
                    actual: data.len(),
                });
            }
        }
        Ok(Self {
            y,
            cb,
            cr,
            width,
            height,
        })
    }

    /// Image width in pixels
    #[must_use]
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Image height in pixels
    #[must_use]
    pub const fn height(&self) -> usize {
        self.height
    }

    /// Luma plane, row-major
    #[must_use]
    pub fn y(&self) -> &[u8] {
        &self.y
    }

    /// Chroma-blue plane, row-major
    #[must_use]
    pub fn cb(&self) -> &[u8] {
        &self.cb
    }

    /// Chroma-red plane, row-major
    #[must_use]
    pub fn cr(&self) -> &[u8] {
        &self.cr
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tile_sizes() {
        assert_eq!(TileMode::Color.tile_size(), 16);
        assert_eq!(TileMode::Monochrome.tile_size(), 8);
    }

    #[test]
    fn test_plane_size_validation() {
        let ok = YCbCrImage::new(vec![0; 64], vec![0; 64], vec![0; 64], 8, 8);
        assert!(ok.is_ok());

        let bad = YCbCrImage::new(vec![0; 64], vec![0; 63], vec![0; 64], 8, 8);
        assert!(matches!(
            bad,
            Err(Error::InvalidPlaneData {
                plane: "chroma-blue",
                ..
            })
        ));
    }
}
