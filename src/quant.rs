//! Quantization table handling for MDEC encoding

use crate::consts::MDEC_QUANT_TBL;

/// An 8x8 table of quantization divisors, row-major.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuantTable {
    /// Divisor for each coefficient in natural (row-major) order
    pub values: [u16; 64],
}

impl QuantTable {
    /// The MPEG-1 derived table the decoder ships with.
    #[must_use]
    pub const fn mdec_default() -> Self {
        Self {
            values: MDEC_QUANT_TBL,
        }
    }
}

impl Default for QuantTable {
    fn default() -> Self {
        Self::mdec_default()
    }
}

/// Luma and chroma quantization profiles.
///
/// The decoder holds two independent divisor tables. The stock firmware
/// loads the same MPEG-1 derived values into both, but callers targeting
/// custom decoder setups can substitute either profile.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct QuantTableSet {
    pub luma: QuantTable,
    pub chroma: QuantTable,
}

impl QuantTableSet {
    /// Both profiles set to the decoder's stock table.
    #[must_use]
    pub const fn mdec_default() -> Self {
        Self {
            luma: QuantTable::mdec_default(),
            chroma: QuantTable::mdec_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_profiles_match_stock_table() {
        let set = QuantTableSet::default();
        assert_eq!(set.luma.values[0], 2);
        assert_eq!(set.luma, set.chroma);
    }
}
