//! Forward DCT (Discrete Cosine Transform) for MDEC encoding
//!
//! The forward transform is expressed as the separable matrix product
//! `M * B * M^T` over the fixed orthogonal basis in [`crate::consts`],
//! which is the formulation the fixed-function decoder inverts.

use crate::consts::{DCTSIZE, DCT_BASIS};

/// Level-shift a block of samples for the DCT (subtract 128)
pub fn level_shift(samples: &[u8; 64]) -> [f32; 64] {
    let mut output = [0.0f32; 64];
    for i in 0..64 {
        output[i] = samples[i] as f32 - 128.0;
    }
    output
}

/// Forward 8x8 DCT on a level-shifted block.
///
/// Computes `M * B * M^T` in two passes: rows first, then columns.
pub fn forward_dct_8x8(block: &[f32; 64]) -> [f32; 64] {
    // tmp = B * M^T, i.e. tmp[y][u] = sum_x B[y][x] * M[u][x]
    let mut tmp = [0.0f32; 64];
    for y in 0..DCTSIZE {
        for u in 0..DCTSIZE {
            let mut sum = 0.0f32;
            for x in 0..DCTSIZE {
                sum += block[y * DCTSIZE + x] * DCT_BASIS[u][x];
            }
            tmp[y * DCTSIZE + u] = sum;
        }
    }

    // out = M * tmp, i.e. out[v][u] = sum_y M[v][y] * tmp[y][u]
    let mut output = [0.0f32; 64];
    for v in 0..DCTSIZE {
        for u in 0..DCTSIZE {
            let mut sum = 0.0f32;
            for y in 0..DCTSIZE {
                sum += DCT_BASIS[v][y] * tmp[y * DCTSIZE + u];
            }
            output[v * DCTSIZE + u] = sum;
        }
    }

    output
}

/// Divide DCT coefficients element-wise by a quantization table.
///
/// No rounding happens here; the block encoder rounds after the per-block
/// quantization scale has been applied.
pub fn quantize_coefficients(dct: &[f32; 64], quant: &[u16; 64]) -> [f32; 64] {
    let mut output = [0.0f32; 64];
    for i in 0..64 {
        output[i] = dct[i] / quant[i] as f32;
    }
    output
}
