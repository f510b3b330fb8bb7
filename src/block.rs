//! Block and macroblock encoders
//!
//! An 8x8 block goes through level shift, forward DCT, quantization, zigzag
//! reordering, and run-length packing into 16-bit codewords. A 16x16
//! macroblock is six such blocks in the fixed order the decoder expects:
//! Cr, Cb (both 4:2:0 subsampled), then the four luma quadrants.

use crate::codeword::{ac_word, dc_word, EOB_WORD};
use crate::consts::{DCTSIZE, SCAN_ORDER};
use crate::dct::{forward_dct_8x8, level_shift, quantize_coefficients};
use crate::quant::{QuantTable, QuantTableSet};
use crate::types::YCbCrImage;

/// Encode one 8x8 block of samples, appending its codewords to `output`.
///
/// Returns the number of words written. The count is always even: one or
/// two end-of-block markers keep every block 32-bit aligned, which the
/// decoder's DMA path requires.
///
/// `scale` must already be validated to the 0..=63 range by the caller.
pub fn encode_block(
    output: &mut Vec<u16>,
    samples: &[u8; 64],
    quant: &QuantTable,
    scale: u8,
) -> usize {
    debug_assert!(scale <= 63, "quantization scale must be pre-validated");

    let shifted = level_shift(samples);
    let dct = forward_dct_8x8(&shifted);
    let coeffs = quantize_coefficients(&dct, &quant.values);

    // Reorder into the diagonal scan order before run-length packing.
    let mut scanned = [0.0f32; 64];
    for i in 0..64 {
        scanned[i] = coeffs[SCAN_ORDER[i]];
    }

    let start = output.len();

    // The DC term is not divided by the scale; the scale rides along in the
    // top bits of the word instead.
    output.push(dc_word(scale, scanned[0].round() as i32));

    // AC terms are scaled by 8 / scale and packed as (zero-run, value)
    // pairs.
    let ac_scale = 8.0 / scale as f32;
    let mut run_length: u16 = 0;

    for &coeff in &scanned[1..] {
        let ac = (coeff * ac_scale).round() as i32;
        if ac != 0 {
            output.push(ac_word(run_length as u8, ac));
            run_length = 0;
        } else {
            run_length += 1;
        }
    }

    // A trailing all-zero run is folded into a single word storing one less
    // than the run length, with an empty value field. The stored bias is a
    // decoder contract; do not change it.
    if run_length > 0 {
        output.push((run_length - 1) << 10);
    }

    output.push(EOB_WORD);
    if (output.len() - start) % 2 == 1 {
        output.push(EOB_WORD);
    }

    output.len() - start
}

/// Copy an 8x8 window out of a plane, sampling every `step`-th row and
/// column. `step` 2 performs the nearest-neighbor 4:2:0 chroma pick.
fn copy_block(plane: &[u8], stride: usize, x0: usize, y0: usize, step: usize) -> [u8; 64] {
    let mut block = [0u8; 64];
    for by in 0..DCTSIZE {
        for bx in 0..DCTSIZE {
            block[by * DCTSIZE + bx] = plane[(y0 + by * step) * stride + x0 + bx * step];
        }
    }
    block
}

/// Encode one 16x16 macroblock at `(x0, y0)`, appending its codewords to
/// `output`. Returns the number of words written.
///
/// Chroma planes are sampled at even rows and columns (nearest neighbor,
/// not averaged) to produce the two half-resolution blocks, followed by the
/// four luma quadrants in raster order.
pub fn encode_macroblock(
    output: &mut Vec<u16>,
    image: &YCbCrImage,
    x0: usize,
    y0: usize,
    quant: &QuantTableSet,
    luma_scale: u8,
    chroma_scale: u8,
) -> usize {
    let stride = image.width();
    let mut words = 0;

    let cr = copy_block(image.cr(), stride, x0, y0, 2);
    words += encode_block(output, &cr, &quant.chroma, chroma_scale);
    let cb = copy_block(image.cb(), stride, x0, y0, 2);
    words += encode_block(output, &cb, &quant.chroma, chroma_scale);

    for (dx, dy) in [(0, 0), (8, 0), (0, 8), (8, 8)] {
        let luma = copy_block(image.y(), stride, x0 + dx, y0 + dy, 1);
        words += encode_block(output, &luma, &quant.luma, luma_scale);
    }

    words
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codeword::from_int10;

    fn encode_one(samples: &[u8; 64], scale: u8) -> Vec<u16> {
        let mut words = Vec::new();
        let count = encode_block(&mut words, samples, &QuantTable::default(), scale);
        assert_eq!(count, words.len());
        words
    }

    #[test]
    fn test_uniform_block_shape() {
        // DC word, one trailing-fill word for the 63-zero AC run, then EOB
        // markers to even length.
        let words = encode_one(&[200u8; 64], 8);
        assert_eq!(words.len(), 4);
        assert_eq!(words[0] >> 10, 8, "scale field");
        assert_eq!(from_int10(words[0]), (576.0f32 / 2.0).round() as i32);
        assert_eq!(words[1], 62 << 10, "trailing fill stores run - 1");
        assert_eq!(words[2], EOB_WORD);
        assert_eq!(words[3], EOB_WORD);
    }

    #[test]
    fn test_mid_gray_block_has_zero_dc() {
        let words = encode_one(&[128u8; 64], 1);
        assert_eq!(from_int10(words[0]), 0);
        assert_eq!(words[0] >> 10, 1);
    }

    #[test]
    fn test_block_word_count_is_even() {
        // Several block contents, all must come out 32-bit aligned.
        let mut gradient = [0u8; 64];
        for (i, s) in gradient.iter_mut().enumerate() {
            *s = (i * 4) as u8;
        }
        let mut checker = [0u8; 64];
        for (i, s) in checker.iter_mut().enumerate() {
            *s = if (i + i / 8) % 2 == 0 { 30 } else { 220 };
        }

        for samples in [[128u8; 64], gradient, checker] {
            for scale in [1u8, 8, 63] {
                let words = encode_one(&samples, scale);
                assert_eq!(words.len() % 2, 0, "scale {}", scale);
                assert_eq!(*words.last().unwrap(), EOB_WORD);
            }
        }
    }

    #[test]
    fn test_ac_positions_account_for_63() {
        // Expanding the run-length records must cover exactly the 63 AC
        // positions: each AC word stands for run zeros plus one nonzero
        // value, and a trailing fill word stands for run + 1 zeros.
        let mut samples = [0u8; 64];
        for (i, s) in samples.iter_mut().enumerate() {
            *s = ((i * 37) % 251) as u8;
        }
        let words = encode_one(&samples, 8);

        let mut positions = 0u32;
        let mut i = 1;
        while words[i] != EOB_WORD {
            let run = (words[i] >> 10) as u32;
            if words[i] & 0x3ff != 0 {
                positions += run + 1;
            } else {
                // Trailing fill: value field empty, run stored minus one.
                positions += run + 1;
                assert_eq!(words[i + 1], EOB_WORD, "fill word must be last");
            }
            i += 1;
        }
        assert_eq!(positions, 63);
    }

    #[test]
    fn test_dc_saturates_to_int10() {
        // Scale 63 with an extreme block cannot push the DC field past the
        // 10-bit two's-complement range.
        let words = encode_one(&[255u8; 64], 63);
        let dc = from_int10(words[0]);
        assert!((-512..=511).contains(&dc));
    }

    #[test]
    fn test_macroblock_is_six_blocks() {
        let image = YCbCrImage::new(
            vec![128; 16 * 16],
            vec![128; 16 * 16],
            vec![128; 16 * 16],
            16,
            16,
        )
        .unwrap();

        let mut words = Vec::new();
        let count = encode_macroblock(
            &mut words,
            &image,
            0,
            0,
            &QuantTableSet::default(),
            8,
            16,
        );
        assert_eq!(count, words.len());
        // Six uniform blocks at 4 words each.
        assert_eq!(count, 24);
    }

    #[test]
    fn test_macroblock_chroma_subsampling_picks_even_samples() {
        // Chroma plane where even rows/columns are 128 and odd ones are 255.
        // Nearest-neighbor subsampling must only see the even samples, so
        // both chroma blocks encode as flat zero-DC blocks.
        let mut cr = vec![0u8; 16 * 16];
        for y in 0..16 {
            for x in 0..16 {
                cr[y * 16 + x] = if x % 2 == 0 && y % 2 == 0 { 128 } else { 255 };
            }
        }
        let image = YCbCrImage::new(vec![128; 256], vec![128; 256], cr, 16, 16).unwrap();

        let mut words = Vec::new();
        encode_macroblock(&mut words, &image, 0, 0, &QuantTableSet::default(), 8, 16);
        // First block is Cr; a flat 128 block has DC 0.
        assert_eq!(from_int10(words[0]), 0);
    }
}
