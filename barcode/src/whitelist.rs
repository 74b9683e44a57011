//! The set of cell barcodes called by the upstream stage.

use crate::io_utils::open_with_gz;
use anyhow::{Context, Result};
use metric::TxHashMap;
use serde::{Deserialize, Serialize};
use std::io::BufRead;
use std::path::Path;

/// Position of a barcode in the whitelist. The whitelist order defines the
/// column order of every matrix written downstream.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CellIdx(pub u32);

impl CellIdx {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Immutable, ordered set of valid cell barcodes.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Whitelist {
    barcodes: Vec<String>,
    index: TxHashMap<String, CellIdx>,
}

impl Whitelist {
    /// Load a one column file of barcodes, optionally gzipped.
    /// Blank lines are skipped and repeated barcodes keep their first position.
    pub fn from_path(path: &Path) -> Result<Self> {
        let reader = open_with_gz(path)?;
        let mut lines = Vec::new();
        for line in reader.lines() {
            let line = line.with_context(|| format!("Error reading {}", path.display()))?;
            lines.push(line);
        }
        Ok(Self::from_iter(lines))
    }

    pub fn index_of(&self, barcode: &str) -> Option<CellIdx> {
        self.index.get(barcode).copied()
    }

    pub fn contains(&self, barcode: &str) -> bool {
        self.index.contains_key(barcode)
    }

    /// The barcode at `idx`.
    pub fn barcode(&self, idx: CellIdx) -> &str {
        &self.barcodes[idx.index()]
    }

    /// Barcodes in whitelist order.
    pub fn barcodes(&self) -> &[String] {
        &self.barcodes
    }

    pub fn len(&self) -> usize {
        self.barcodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.barcodes.is_empty()
    }
}

impl<S: AsRef<str>> FromIterator<S> for Whitelist {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut whitelist = Whitelist::default();
        for bc in iter {
            let bc = bc.as_ref().trim();
            if bc.is_empty() || whitelist.index.contains_key(bc) {
                continue;
            }
            let idx = CellIdx(whitelist.barcodes.len() as u32);
            whitelist.index.insert(bc.to_string(), idx);
            whitelist.barcodes.push(bc.to_string());
        }
        whitelist
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_whitelist_order_and_dedup() {
        let wl: Whitelist = ["BC2", "BC1", "", "BC2", "BC3"].into_iter().collect();
        assert_eq!(wl.barcodes(), ["BC2", "BC1", "BC3"]);
        assert_eq!(wl.len(), 3);
        assert_eq!(wl.index_of("BC1"), Some(CellIdx(1)));
        assert_eq!(wl.barcode(CellIdx(2)), "BC3");
        assert!(!wl.contains("BC4"));
    }

    #[test]
    fn test_whitelist_from_file() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("matched_barcodes.txt");
        std::fs::write(&path, "AAACCTGA\n\nAAACCTGC\r\nAAACCTGA\n")?;
        let wl = Whitelist::from_path(&path)?;
        assert_eq!(wl.barcodes(), ["AAACCTGA", "AAACCTGC"]);
        Ok(())
    }
}
