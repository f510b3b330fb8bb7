//! Color space conversion for MDEC encoding
//!
//! RGB to YCbCr with full-swing BT.601 coefficients, matching what the
//! decoder's output stage inverts.

use crate::types::YCbCrImage;
use crate::Result;

/// Convert one RGB pixel to YCbCr using full-swing BT.601 coefficients
///
/// The conversion formula is:
/// - Y  =  0.299 * R + 0.587 * G + 0.114 * B
/// - Cb = -0.168736 * R - 0.331264 * G + 0.5 * B + 128
/// - Cr =  0.5 * R - 0.418688 * G - 0.081312 * B + 128
#[inline]
pub fn rgb_to_ycbcr(r: u8, g: u8, b: u8) -> (u8, u8, u8) {
    let r = r as f32;
    let g = g as f32;
    let b = b as f32;

    let y = 0.299 * r + 0.587 * g + 0.114 * b;
    let cb = -0.168736 * r - 0.331264 * g + 0.5 * b + 128.0;
    let cr = 0.5 * r - 0.418688 * g - 0.081312 * b + 128.0;

    (
        y.round().clamp(0.0, 255.0) as u8,
        cb.round().clamp(0.0, 255.0) as u8,
        cr.round().clamp(0.0, 255.0) as u8,
    )
}

/// Convert YCbCr back to RGB (for verification/testing)
#[inline]
pub fn ycbcr_to_rgb(y: u8, cb: u8, cr: u8) -> (u8, u8, u8) {
    let y = y as f32;
    let cb = cb as f32 - 128.0;
    let cr = cr as f32 - 128.0;

    let r = y + 1.402 * cr;
    let g = y - 0.344136 * cb - 0.714136 * cr;
    let b = y + 1.772 * cb;

    (
        r.round().clamp(0.0, 255.0) as u8,
        g.round().clamp(0.0, 255.0) as u8,
        b.round().clamp(0.0, 255.0) as u8,
    )
}

/// Convert an interleaved RGB buffer into planar YCbCr.
pub fn convert_rgb_planar(rgb: &[u8], width: usize, height: usize) -> Result<YCbCrImage> {
    let pixel_count = width * height;
    let mut y_plane = Vec::with_capacity(pixel_count);
    let mut cb_plane = Vec::with_capacity(pixel_count);
    let mut cr_plane = Vec::with_capacity(pixel_count);

    for chunk in rgb.chunks_exact(3) {
        let (y, cb, cr) = rgb_to_ycbcr(chunk[0], chunk[1], chunk[2]);
        y_plane.push(y);
        cb_plane.push(cb);
        cr_plane.push(cr);
    }

    YCbCrImage::new(y_plane, cb_plane, cr_plane, width, height)
}
