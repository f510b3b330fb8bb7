//! Lookup table flattening for VLC decoding.
//!
//! A prefix code of length `L` inserted into a table indexed by `W` bits
//! occupies the top `L` bits of the index; all `2^(W-L)` combinations of the
//! remaining low bits receive the identical entry `(L << 16) | value`. The
//! consuming decoder reads a full `W`-bit window, so every matching-prefix
//! slot must hold the correct length/value pair for it to know how many
//! bits were actually consumed.
//!
//! One dense table covering the longest code would dwarf the useful data,
//! because the longest codes share a long all-zero prefix. Codes are
//! instead routed through an ordered list of stages, each claiming codes
//! that start with a given number of zero bits and indexing by the bits
//! that follow. The default layout is the classic short/long split: stage 0
//! takes everything, stage 8 takes codes opening with eight zeros.

use crate::error::Error;
use crate::tree::{Code, CodeTree};
use crate::Result;

/// Ordered list of table stages, each an all-zero prefix length.
///
/// A code routes to the deepest stage whose zero prefix it carries. The
/// first stage must be 0 so every code has a home.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TableLayout {
    stages: Vec<u8>,
}

impl Default for TableLayout {
    fn default() -> Self {
        Self { stages: vec![0, 8] }
    }
}

impl TableLayout {
    /// Create a layout from ascending zero-prefix lengths starting at 0.
    pub fn new(prefix_lens: Vec<u8>) -> Result<Self> {
        let ascending = prefix_lens.windows(2).all(|w| w[0] < w[1]);
        if prefix_lens.first() != Some(&0) || !ascending {
            return Err(Error::MalformedTree {
                reason: "stage prefixes must be ascending and start at 0".into(),
            });
        }
        Ok(Self {
            stages: prefix_lens,
        })
    }

    /// A single dense table with no split.
    #[must_use]
    pub fn single() -> Self {
        Self { stages: vec![0] }
    }

    /// The stage index a code routes to.
    fn route(&self, code: Code) -> usize {
        let zeros = code.leading_zeros();
        let mut stage = 0;
        for (i, &prefix) in self.stages.iter().enumerate() {
            if zeros >= prefix && code.len > prefix {
                stage = i;
            }
        }
        stage
    }
}

/// One flattened fixed-width table
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FlatTable {
    /// Number of all-zero prefix bits consumed before indexing
    pub prefix_len: u8,
    /// Index width in bits; the table holds `2^index_bits` entries
    pub index_bits: u8,
    /// Dense entries, `(code_length << 16) | packed_value` each
    pub entries: Vec<u32>,
}

/// The full set of stage tables for one code tree
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LookupTables {
    pub tables: Vec<FlatTable>,
}

impl LookupTables {
    /// All stage tables concatenated in stage order, the layout used for
    /// persisting and compressing.
    #[must_use]
    pub fn concatenated(&self) -> Vec<u32> {
        let mut out = Vec::new();
        for table in &self.tables {
            out.extend_from_slice(&table.entries);
        }
        out
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Slot {
    Empty,
    Claimed,
    Reserved,
}

struct StageBuilder {
    prefix_len: u8,
    index_bits: u8,
    entries: Vec<u32>,
    slots: Vec<Slot>,
}

impl StageBuilder {
    fn new(prefix_len: u8, index_bits: u8, populated: bool) -> Self {
        let len = if populated { 1usize << index_bits } else { 0 };
        Self {
            prefix_len,
            index_bits,
            entries: vec![0; len],
            slots: vec![Slot::Empty; len],
        }
    }

    /// Claim every slot whose index starts with the code's post-prefix
    /// bits, filling `entry` (or zero for reserved regions).
    fn claim(&mut self, stage: usize, code: Code, entry: Option<u32>) -> Result<()> {
        if self.entries.is_empty() {
            return Ok(());
        }
        let used_bits = code.len - self.prefix_len;
        if used_bits > self.index_bits {
            // Reserved prefixes deeper than the table are unreachable.
            debug_assert!(entry.is_none(), "codes define the table width");
            return Ok(());
        }
        let free_bits = self.index_bits - used_bits;
        let base = (code.bits as usize) << free_bits;

        for index in base..base + (1 << free_bits) {
            match (self.slots[index], entry) {
                (Slot::Empty, Some(value)) => {
                    self.slots[index] = Slot::Claimed;
                    self.entries[index] = value;
                }
                (Slot::Empty, None) | (Slot::Reserved, None) => {
                    self.slots[index] = Slot::Reserved;
                }
                _ => return Err(Error::OverlappingCodes { stage, index }),
            }
        }
        Ok(())
    }

    fn finish(self, stage: usize) -> Result<FlatTable> {
        if let Some(index) = self.slots.iter().position(|&s| s == Slot::Empty) {
            return Err(Error::IncompleteCode { stage, index });
        }
        Ok(FlatTable {
            prefix_len: self.prefix_len,
            index_bits: self.index_bits,
            entries: self.entries,
        })
    }
}

/// Flatten a code tree into the layout's stage tables.
///
/// Fails if the flattened code set is not a complete, non-overlapping
/// prefix code over every slot not claimed by a deeper stage or a reserved
/// prefix.
pub fn build_tables(tree: &CodeTree, layout: &TableLayout) -> Result<LookupTables> {
    let codes = tree.codes()?;
    let reserved = tree.reserved_codes()?;

    // Route codes and derive each stage's index width from its own codes.
    let mut routed: Vec<Vec<(Code, u16)>> = vec![Vec::new(); layout.stages.len()];
    for (code, value) in codes {
        routed[layout.route(code)].push((code, value));
    }

    let mut builders: Vec<StageBuilder> = Vec::with_capacity(layout.stages.len());
    for (i, &prefix_len) in layout.stages.iter().enumerate() {
        let width = routed[i]
            .iter()
            .map(|(code, _)| code.len - prefix_len)
            .max();
        builders.push(StageBuilder::new(
            prefix_len,
            width.unwrap_or(0),
            width.is_some(),
        ));
    }

    for (i, stage_codes) in routed.iter().enumerate() {
        for &(code, value) in stage_codes {
            let entry = ((code.len as u32) << 16) | value as u32;
            builders[i].claim(i, code, Some(entry))?;
        }
    }

    // Deeper stages reserve their zero-prefix region in shallower tables.
    for (i, &prefix_len) in layout.stages.iter().enumerate() {
        for &deeper in &layout.stages[i + 1..] {
            let region = Code {
                bits: 0,
                len: deeper,
            };
            if deeper - prefix_len <= builders[i].index_bits {
                builders[i].claim(i, region, None)?;
            }
        }
    }

    // Declared reserved prefixes must stay empty wherever they land.
    for code in reserved {
        let stage = layout.route(code);
        builders[stage].claim(stage, code, None)?;
    }

    let mut tables = Vec::with_capacity(builders.len());
    for (i, builder) in builders.into_iter().enumerate() {
        tables.push(builder.finish(i)?);
    }
    Ok(LookupTables { tables })
}
