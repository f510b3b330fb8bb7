//! Error types for zenmdec

use std::fmt;

/// Error type for zenmdec operations
#[derive(Debug)]
#[non_exhaustive]
pub enum Error {
    /// Quantization scale outside the 6-bit range accepted by the decoder
    InvalidScale {
        value: u32,
    },
    /// Plane sizes do not match the stated image dimensions
    InvalidPlaneData {
        plane: &'static str,
        expected: usize,
        actual: usize,
    },
    /// A code tree fragment or JSON node is not well formed
    MalformedTree {
        reason: String,
    },
    /// Two codes (or a code and a reserved prefix) map to the same table slot
    OverlappingCodes {
        stage: usize,
        index: usize,
    },
    /// The flattened code set leaves a table slot unclaimed
    IncompleteCode {
        stage: usize,
        index: usize,
    },
    /// A table entry does not fit the 21-bit compressed record payload
    EntryOverflow {
        index: usize,
        entry: u32,
    },
    /// Unsupported input file format
    UnsupportedFormat,
    /// Malformed input file contents
    InvalidData,
    /// I/O error
    Io(std::io::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidScale { value } => {
                write!(f, "Quantization scale {} out of range [0, 63]", value)
            }
            Error::InvalidPlaneData { plane, expected, actual } => {
                write!(
                    f,
                    "Expected {} samples in {} plane, got {}",
                    expected, plane, actual
                )
            }
            Error::MalformedTree { reason } => write!(f, "Malformed code tree: {}", reason),
            Error::OverlappingCodes { stage, index } => {
                write!(f, "Overlapping codes at stage {} slot {:#x}", stage, index)
            }
            Error::IncompleteCode { stage, index } => {
                write!(f, "No code covers stage {} slot {:#x}", stage, index)
            }
            Error::EntryOverflow { index, entry } => {
                write!(f, "Table entry {:#010x} at {} exceeds 21 bits", entry, index)
            }
            Error::UnsupportedFormat => write!(f, "Unsupported input file format"),
            Error::InvalidData => write!(f, "Malformed input file contents"),
            Error::Io(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e)
    }
}
