//! Run-length compression of flattened lookup tables.
//!
//! Flattened VLC tables are dominated by repeated entries: every code
//! shorter than the index width is replicated across a power-of-two block
//! of slots, and reserved regions are long runs of zeros. Each compressed
//! record packs a repeat count into the bits above the entry,
//! `(run << 21) | entry`, and expands to `run + 1` copies. Entries must
//! therefore fit in 21 bits, which the 16-bit value plus 5-bit length
//! budget of real tables always satisfies.

use crate::error::Error;
use crate::Result;

/// Maximum repeat count one record can carry (the stored field is `run`,
/// meaning `run + 1` copies).
pub const MAX_RUN: u32 = 0x7ff;

const ENTRY_MASK: u32 = (1 << 21) - 1;

/// Compress a table into run-length records.
///
/// Fails with [`Error::EntryOverflow`] if any entry does not fit in the
/// 21-bit entry field.
pub fn compress_table(entries: &[u32]) -> Result<Vec<u32>> {
    let mut out = Vec::new();
    let mut iter = entries.iter().enumerate();

    let Some((_, &first)) = iter.next() else {
        return Ok(out);
    };
    if first > ENTRY_MASK {
        return Err(Error::EntryOverflow {
            index: 0,
            entry: first,
        });
    }
    let mut current = first;
    let mut run: u32 = 0;

    for (index, &entry) in iter {
        if entry > ENTRY_MASK {
            return Err(Error::EntryOverflow { index, entry });
        }
        if entry == current && run < MAX_RUN {
            run += 1;
        } else {
            out.push((run << 21) | current);
            current = entry;
            run = 0;
        }
    }
    out.push((run << 21) | current);
    Ok(out)
}

/// Expand run-length records back into the dense table.
#[must_use]
pub fn expand_table(records: &[u32]) -> Vec<u32> {
    let mut out = Vec::new();
    for &record in records {
        let run = record >> 21;
        let entry = record & ENTRY_MASK;
        out.extend(std::iter::repeat(entry).take(run as usize + 1));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_table() {
        assert_eq!(compress_table(&[]).unwrap(), Vec::<u32>::new());
        assert_eq!(expand_table(&[]), Vec::<u32>::new());
    }

    #[test]
    fn test_single_run() {
        let table = vec![0x2fe00u32; 5];
        let compressed = compress_table(&table).unwrap();
        assert_eq!(compressed, vec![(4 << 21) | 0x2fe00]);
        assert_eq!(expand_table(&compressed), table);
    }

    #[test]
    fn test_mixed_runs() {
        let table = vec![0, 0, 0, 0x10001, 0x10001, 0x20002];
        let compressed = compress_table(&table).unwrap();
        assert_eq!(
            compressed,
            vec![2 << 21, (1 << 21) | 0x10001, 0x20002]
        );
        assert_eq!(expand_table(&compressed), table);
    }

    #[test]
    fn test_run_split_at_field_limit() {
        // A run longer than the field splits into multiple records.
        let table = vec![7u32; MAX_RUN as usize + 3];
        let compressed = compress_table(&table).unwrap();
        assert_eq!(compressed, vec![(MAX_RUN << 21) | 7, (1 << 21) | 7]);
        assert_eq!(expand_table(&compressed), table);
    }

    #[test]
    fn test_entry_overflow_rejected() {
        let result = compress_table(&[0, 1 << 21]);
        assert!(matches!(
            result,
            Err(Error::EntryOverflow { index: 1, .. })
        ));
    }

    #[test]
    fn test_roundtrip_default_tables() {
        use crate::lut::{build_tables, TableLayout};
        use crate::tree::CodeTree;

        let tables = build_tables(&CodeTree::default(), &TableLayout::default()).unwrap();
        let dense = tables.concatenated();
        let compressed = compress_table(&dense).unwrap();
        assert!(compressed.len() < dense.len() / 4);
        assert_eq!(expand_table(&compressed), dense);
    }
}
