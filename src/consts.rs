//! Constants and tables for MDEC encoding
//!
//! All tables here are process-wide immutable constants: the zigzag scan
//! order, the DCT basis matrix, and the default quantization values.

/// DCT block dimension
pub const DCTSIZE: usize = 8;

/// DCT block size (8x8 = 64)
pub const DCTSIZE2: usize = 64;

/// Macroblock dimension (16x16 pixels, 4:2:0 subsampled)
pub const MACROBLOCK_SIZE: usize = 16;

/// DMA chunk granularity in 16-bit words (128 bytes per chunk)
pub const CHUNK_WORDS: usize = 64;

/// Largest quantization scale representable in the DC word's top 6 bits
pub const MAX_QUANT_SCALE: u8 = 63;

/// Zigzag scan order: maps scan position to natural (row-major) position.
/// Use this when reordering DCT coefficients into the 1-D transmission
/// order: `scanned[i] = flat[SCAN_ORDER[i]]`.
pub const SCAN_ORDER: [usize; 64] = [
    0, 1, 8, 16, 9, 2, 3, 10, 17, 24, 32, 25, 18, 11, 4, 5, 12, 19, 26, 33, 40, 48, 41, 34, 27, 20,
    13, 6, 7, 14, 21, 28, 35, 42, 49, 56, 57, 50, 43, 36, 29, 22, 15, 23, 30, 37, 44, 51, 58, 59,
    52, 45, 38, 31, 39, 46, 53, 60, 61, 54, 47, 55, 62, 63,
];

/// Default MDEC quantization table, row-major.
///
/// This is the MPEG-1 intra quantization matrix with the DC divisor lowered
/// from 8 to 2, which is what the decoder's ROM tables use for both luma and
/// chroma.
pub const MDEC_QUANT_TBL: [u16; 64] = [
    2, 16, 19, 22, 26, 27, 29, 34, 16, 16, 22, 24, 27, 29, 34, 37, 19, 22, 26, 27, 29, 34, 34, 38,
    22, 22, 26, 27, 29, 34, 37, 40, 22, 26, 27, 29, 32, 35, 40, 48, 26, 27, 29, 32, 35, 40, 48, 58,
    26, 27, 29, 34, 38, 46, 56, 69, 27, 29, 35, 38, 46, 56, 69, 83,
];

// Scaled cosines cos(k * pi / 16) / 2 used to build the DCT basis.
// S0 uses k = 4 so that the first basis row is the flat DC row.
const S0: f32 = 0.353_553_39;
const S1: f32 = 0.490_392_64;
const S2: f32 = 0.461_939_77;
const S3: f32 = 0.415_734_81;
const S4: f32 = 0.353_553_39;
const S5: f32 = 0.277_785_12;
const S6: f32 = 0.191_341_72;
const S7: f32 = 0.097_545_16;

/// Orthonormal 8x8 DCT basis matrix `M`. The forward transform of a
/// level-shifted block `B` is `M * B * M^T`.
#[rustfmt::skip]
pub const DCT_BASIS: [[f32; 8]; 8] = [
    [ S0,  S0,  S0,  S0,  S0,  S0,  S0,  S0],
    [ S1,  S3,  S5,  S7, -S7, -S5, -S3, -S1],
    [ S2,  S6, -S6, -S2, -S2, -S6,  S6,  S2],
    [ S3, -S7, -S1, -S5,  S5,  S1,  S7, -S3],
    [ S4, -S4, -S4,  S4,  S4, -S4, -S4,  S4],
    [ S5, -S1,  S7,  S3, -S3, -S7,  S1, -S5],
    [ S6, -S2,  S2, -S6, -S6,  S2, -S2,  S6],
    [ S7, -S5,  S3, -S1,  S1, -S3,  S5, -S7],
];
