//! # zenmdec - MDEC Bitstream Encoder & VLC Table Generator
//!
//! zenmdec converts raster images into the uncompressed bitstream format
//! consumed by the PlayStation MDEC, the fixed-function DCT decoder in the
//! console's video pipeline. It also flattens the MDEC Huffman (VLC) code
//! tree into the fixed-width lookup tables a software or firmware front end
//! needs to expand variable-length-coded streams into the same word format.
//!
//! ## Encoding
//!
//! ```rust,ignore
//! use zenmdec::{Encoder, YCbCrImage};
//!
//! let image = YCbCrImage::new(y_plane, cb_plane, cr_plane, width, height)?;
//! let encoded = Encoder::new()
//!     .luma_scale(8)
//!     .chroma_scale(16)
//!     .encode(&image)?;
//!
//! std::fs::write("image.bin", encoded.to_le_bytes())?;
//! ```
//!
//! The output is a flat sequence of 16-bit words, padded to the 64-word DMA
//! chunk granularity, ready to be fed to the decoder with no further
//! processing.
//!
//! ## Lookup tables
//!
//! ```rust,ignore
//! use zenmdec::{build_tables, compress_table, CodeTree, TableLayout};
//!
//! let tables = build_tables(&CodeTree::default(), &TableLayout::default())?;
//! let compressed = compress_table(&tables.concatenated())?;
//! ```
//!
//! Both halves share one binary contract: the 10-bit two's-complement
//! coefficient packing in `codeword`, so the encoder's output and the
//! decoder's tables always agree on bit layout.

// Core tables and shared word layout
mod codeword;
pub mod consts;
mod error;
mod types;

// Encoding pipeline
mod block;
mod color;
mod dct;
mod encode;
mod quant;

// Lookup table generation
mod lut;
mod rle;
mod tree;

// CLI support
pub mod pnm;

// Public API
pub use block::{encode_block, encode_macroblock};
pub use codeword::{from_int10, to_int10, EOB_WORD};
pub use color::rgb_to_ycbcr;
pub use encode::{EncodedImage, Encoder};
pub use error::Error;
pub use lut::{build_tables, FlatTable, LookupTables, TableLayout};
pub use quant::{QuantTable, QuantTableSet};
pub use rle::{compress_table, expand_table};
pub use tree::{Code, CodeTree, Node};
pub use types::{TileMode, YCbCrImage};

/// Result type for zenmdec operations
pub type Result<T> = std::result::Result<T, Error>;
