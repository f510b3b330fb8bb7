//! Minimal binary PNM (P5/P6) reader for the command-line frontend.
//!
//! Only the binary variants with 8-bit samples are accepted. Grayscale
//! input maps to a luma plane with neutral chroma, so it can feed either
//! tile mode.

use std::fs;
use std::path::Path;

use crate::color::convert_rgb_planar;
use crate::error::Error;
use crate::types::YCbCrImage;
use crate::Result;

/// A decoded PNM image, 8 bits per sample.
#[derive(Clone, Debug)]
pub struct PnmImage {
    pub width: usize,
    pub height: usize,
    /// 1 for grayscale (P5), 3 for RGB (P6)
    pub channels: usize,
    /// Interleaved samples, `width * height * channels` bytes
    pub data: Vec<u8>,
}

impl PnmImage {
    /// Read and parse a binary PNM file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::parse(&fs::read(path)?)
    }

    /// Parse a binary PNM byte buffer.
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        let mut parser = HeaderParser { bytes, pos: 0 };

        let channels = match parser.magic()? {
            b'5' => 1,
            b'6' => 3,
            _ => return Err(Error::UnsupportedFormat),
        };
        let width = parser.number()?;
        let height = parser.number()?;
        let maxval = parser.number()?;
        if maxval != 255 {
            return Err(Error::UnsupportedFormat);
        }
        // A single whitespace byte separates the header from the samples.
        parser.pos += 1;

        let expected = width * height * channels;
        let data = parser
            .bytes
            .get(parser.pos..parser.pos + expected)
            .ok_or(Error::InvalidData)?;

        Ok(Self {
            width,
            height,
            channels,
            data: data.to_vec(),
        })
    }

    /// Convert to planar YCbCr. Grayscale input keeps its samples as luma
    /// with both chroma planes at the neutral 128.
    pub fn to_ycbcr(&self) -> Result<YCbCrImage> {
        match self.channels {
            1 => {
                let neutral = vec![128u8; self.width * self.height];
                YCbCrImage::new(
                    self.data.clone(),
                    neutral.clone(),
                    neutral,
                    self.width,
                    self.height,
                )
            }
            3 => convert_rgb_planar(&self.data, self.width, self.height),
            _ => Err(Error::UnsupportedFormat),
        }
    }
}

struct HeaderParser<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl HeaderParser<'_> {
    fn magic(&mut self) -> Result<u8> {
        if self.bytes.len() < 2 || self.bytes[0] != b'P' {
            return Err(Error::UnsupportedFormat);
        }
        self.pos = 2;
        Ok(self.bytes[1])
    }

    /// Parse the next decimal field, skipping whitespace and `#` comments.
    fn number(&mut self) -> Result<usize> {
        loop {
            match self.bytes.get(self.pos) {
                Some(b) if b.is_ascii_whitespace() => self.pos += 1,
                Some(&b'#') => {
                    while self.bytes.get(self.pos).is_some_and(|&b| b != b'\n') {
                        self.pos += 1;
                    }
                }
                Some(b) if b.is_ascii_digit() => break,
                _ => return Err(Error::InvalidData),
            }
        }
        let mut value: usize = 0;
        while let Some(b) = self.bytes.get(self.pos).filter(|b| b.is_ascii_digit()) {
            value = value
                .checked_mul(10)
                .and_then(|v| v.checked_add((b - b'0') as usize))
                .ok_or(Error::InvalidData)?;
            self.pos += 1;
        }
        Ok(value)
    }
}
