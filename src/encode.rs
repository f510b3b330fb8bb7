//! Main encoder implementation
//!
//! Tiles an image into blocks or macroblocks, concatenates their codewords
//! in the decoder's column-major scan order, and pads the stream to the DMA
//! chunk granularity.

use log::warn;

use crate::block::{encode_block, encode_macroblock};
use crate::codeword::EOB_WORD;
use crate::color::convert_rgb_planar;
use crate::consts::{CHUNK_WORDS, DCTSIZE, MAX_QUANT_SCALE};
use crate::error::Error;
use crate::quant::QuantTableSet;
use crate::types::{TileMode, YCbCrImage};
use crate::Result;

/// Default quantization scale for luma and monochrome blocks
pub const DEFAULT_LUMA_SCALE: u8 = 8;

/// Default quantization scale for chroma blocks
pub const DEFAULT_CHROMA_SCALE: u8 = 16;

// The decoder's transfer length field counts 32-bit units in 16 bits, so
// anything past this many 16-bit words cannot be described in one transfer.
const MAX_SINGLE_TRANSFER_WORDS: usize = 0xffff * 2;

/// MDEC bitstream encoder with configurable tile mode and quantization
#[derive(Clone, Debug)]
pub struct Encoder {
    mode: TileMode,
    luma_scale: u8,
    chroma_scale: u8,
    quant: QuantTableSet,
}

impl Default for Encoder {
    fn default() -> Self {
        Self::new()
    }
}

impl Encoder {
    /// Create a new encoder with default settings (color macroblocks,
    /// luma scale 8, chroma scale 16, stock quantization tables)
    pub fn new() -> Self {
        Self {
            mode: TileMode::Color,
            luma_scale: DEFAULT_LUMA_SCALE,
            chroma_scale: DEFAULT_CHROMA_SCALE,
            quant: QuantTableSet::mdec_default(),
        }
    }

    /// Set the tile mode
    pub fn mode(mut self, mode: TileMode) -> Self {
        self.mode = mode;
        self
    }

    /// Set the quantization scale for luma/monochrome blocks (0-63)
    pub fn luma_scale(mut self, scale: u8) -> Self {
        self.luma_scale = scale;
        self
    }

    /// Set the quantization scale for chroma blocks (0-63)
    pub fn chroma_scale(mut self, scale: u8) -> Self {
        self.chroma_scale = scale;
        self
    }

    /// Replace the quantization table profiles
    pub fn quant_tables(mut self, quant: QuantTableSet) -> Self {
        self.quant = quant;
        self
    }

    /// Encode a planar YCbCr image into an MDEC word stream.
    ///
    /// Tiles are visited column-major: the outer loop advances along the
    /// horizontal axis, the inner loop along the vertical axis. This order
    /// is part of the output format. Trailing rows and columns that do not
    /// fill a whole tile are dropped with a warning, since partial tiles
    /// are not representable.
    pub fn encode(&self, image: &YCbCrImage) -> Result<EncodedImage> {
        self.validate_scales()?;

        let size = self.mode.tile_size();
        let width = image.width();
        let height = image.height();

        if width % size != 0 {
            warn!("image width {} is not a multiple of {}, trimming", width, size);
        }
        if height % size != 0 {
            warn!("image height {} is not a multiple of {}, trimming", height, size);
        }

        // Truncate to whole tiles before scanning.
        let mut words = Vec::new();
        for x in (0..(width / size) * size).step_by(size) {
            for y in (0..(height / size) * size).step_by(size) {
                match self.mode {
                    TileMode::Color => {
                        encode_macroblock(
                            &mut words,
                            image,
                            x,
                            y,
                            &self.quant,
                            self.luma_scale,
                            self.chroma_scale,
                        );
                    }
                    TileMode::Monochrome => {
                        let mut block = [0u8; 64];
                        for by in 0..DCTSIZE {
                            let row = &image.y()[(y + by) * width + x..];
                            block[by * DCTSIZE..(by + 1) * DCTSIZE]
                                .copy_from_slice(&row[..DCTSIZE]);
                        }
                        encode_block(&mut words, &block, &self.quant.luma, self.luma_scale);
                    }
                }
            }
        }

        // Pad to the DMA chunk granularity with end-of-block markers.
        let padded = (words.len() + CHUNK_WORDS - 1) & !(CHUNK_WORDS - 1);
        words.resize(padded, EOB_WORD);

        if words.len() > MAX_SINGLE_TRANSFER_WORDS {
            warn!(
                "encoded stream of {} words exceeds the decoder's single-transfer limit",
                words.len()
            );
        }

        Ok(EncodedImage { words })
    }

    /// Convert an interleaved RGB buffer and encode it.
    pub fn encode_rgb(&self, rgb: &[u8], width: usize, height: usize) -> Result<EncodedImage> {
        if rgb.len() != width * height * 3 {
            return Err(Error::InvalidPlaneData {
                plane: "rgb",
                expected: width * height * 3,
                actual: rgb.len(),
            });
        }
        self.encode(&convert_rgb_planar(rgb, width, height)?)
    }

    fn validate_scales(&self) -> Result<()> {
        for scale in [self.luma_scale, self.chroma_scale] {
            if scale > MAX_QUANT_SCALE {
                return Err(Error::InvalidScale {
                    value: scale as u32,
                });
            }
        }
        Ok(())
    }
}

/// An encoded MDEC word stream, padded to the chunk granularity
#[derive(Clone, Debug)]
pub struct EncodedImage {
    words: Vec<u16>,
}

impl EncodedImage {
    /// The encoded 16-bit words. The length is always a multiple of 64.
    #[must_use]
    pub fn words(&self) -> &[u16] {
        &self.words
    }

    /// Number of 128-byte DMA chunks in the stream
    #[must_use]
    pub fn chunk_count(&self) -> usize {
        self.words.len() / CHUNK_WORDS
    }

    /// Serialize to bytes in the decoder's little-endian word order.
    #[must_use]
    pub fn to_le_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.words.len() * 2);
        for word in &self.words {
            bytes.extend_from_slice(&word.to_le_bytes());
        }
        bytes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codeword::from_int10;

    fn flat_image(width: usize, height: usize, y: u8) -> YCbCrImage {
        YCbCrImage::new(
            vec![y; width * height],
            vec![128; width * height],
            vec![128; width * height],
            width,
            height,
        )
        .unwrap()
    }

    #[test]
    fn test_invalid_scale_rejected() {
        let image = flat_image(16, 16, 128);
        let result = Encoder::new().luma_scale(64).encode(&image);
        assert!(matches!(result, Err(Error::InvalidScale { value: 64 })));
    }

    #[test]
    fn test_output_is_chunk_aligned() {
        for (w, h) in [(16, 16), (32, 16), (48, 32)] {
            let encoded = Encoder::new().encode(&flat_image(w, h, 70)).unwrap();
            assert_eq!(encoded.words().len() % CHUNK_WORDS, 0);
            assert!(encoded.chunk_count() >= 1);
        }
    }

    #[test]
    fn test_padding_filler_is_eob() {
        let encoded = Encoder::new().encode(&flat_image(16, 16, 70)).unwrap();
        // One flat macroblock is 24 words; the remaining 40 are filler.
        let words = encoded.words();
        assert_eq!(words.len(), CHUNK_WORDS);
        assert!(words[24..].iter().all(|&w| w == EOB_WORD));
    }

    #[test]
    fn test_column_major_scan_order() {
        // 16x32 color image, two vertically stacked macroblocks: the tile
        // at (0, 0) must precede the tile at (0, 16). Distinct luma values
        // give the two tiles distinct DC terms.
        let width = 16;
        let height = 32;
        let mut y = vec![0u8; width * height];
        for (row, chunk) in y.chunks_mut(width).enumerate() {
            chunk.fill(if row < 16 { 50 } else { 200 });
        }
        let image = YCbCrImage::new(
            y,
            vec![128; width * height],
            vec![128; width * height],
            width,
            height,
        )
        .unwrap();

        let encoded = Encoder::new().encode(&image).unwrap();
        let words = encoded.words();

        // Each flat macroblock is 24 words: Cr and Cb blocks (4 words each)
        // then four luma blocks. The first luma DC of each macroblock sits
        // right after the chroma pair.
        let dc_first = from_int10(words[8]);
        let dc_second = from_int10(words[24 + 8]);
        assert!(dc_first < 0, "top tile is darker than mid-gray");
        assert!(dc_second > 0, "bottom tile is brighter than mid-gray");
    }

    #[test]
    fn test_monochrome_tiles_two_blocks() {
        // 16x8 monochrome image: tiles at x=0 then x=8.
        let width = 16;
        let height = 8;
        let mut y = vec![0u8; width * height];
        for (row, chunk) in y.chunks_mut(width).enumerate() {
            let _ = row;
            chunk[..8].fill(50);
            chunk[8..].fill(200);
        }
        let image = YCbCrImage::new(
            y,
            vec![128; width * height],
            vec![128; width * height],
            width,
            height,
        )
        .unwrap();

        let encoded = Encoder::new()
            .mode(TileMode::Monochrome)
            .encode(&image)
            .unwrap();
        let words = encoded.words();

        // Two flat blocks, 4 words each.
        assert!(from_int10(words[0]) < 0, "left tile first");
        assert!(from_int10(words[4]) > 0, "right tile second");
        assert!(words[8..].iter().all(|&w| w == EOB_WORD));
    }

    #[test]
    fn test_partial_tiles_dropped() {
        // 20x20 color image holds exactly one 16x16 tile.
        let encoded = Encoder::new().encode(&flat_image(20, 20, 128)).unwrap();
        assert_eq!(encoded.words().len(), CHUNK_WORDS);
        // A mid-gray flat tile: every block is DC 0 + fill + EOBs.
        assert_eq!(from_int10(encoded.words()[0]), 0);
    }

    #[test]
    fn test_image_smaller_than_tile_is_empty_stream() {
        let encoded = Encoder::new().encode(&flat_image(8, 8, 128)).unwrap();
        assert!(encoded.words().is_empty());
        assert_eq!(encoded.chunk_count(), 0);
    }

    #[test]
    fn test_encode_rgb_length_check() {
        let result = Encoder::new().encode_rgb(&[0u8; 10], 16, 16);
        assert!(matches!(result, Err(Error::InvalidPlaneData { .. })));
    }

    #[test]
    fn test_le_byte_serialization() {
        let encoded = Encoder::new().encode(&flat_image(16, 16, 70)).unwrap();
        let bytes = encoded.to_le_bytes();
        assert_eq!(bytes.len(), encoded.words().len() * 2);
        assert_eq!(
            u16::from_le_bytes([bytes[0], bytes[1]]),
            encoded.words()[0]
        );
    }
}
