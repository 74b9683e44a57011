//! Crate for dealing with UMI related types and functionalities.
//!
//! Raw read observations are tallied in a `UmiCountTable` keyed by
//! (cell, antibody, UMI). Collapsing the table counts distinct UMIs per
//! (cell, antibody) pair, which removes PCR and sequencing duplicates.
use barcode::{CellIdx, TagIdx};
use itertools::Itertools;
use metric::{CountMetric, Metric, TxHashMap};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

/// A UMI as it appears in the read name.
#[derive(Clone, Debug, Default, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Umi {
    sequence: String,
}

impl Umi {
    pub fn new(sequence: &str) -> Umi {
        Umi {
            sequence: sequence.to_string(),
        }
    }

    pub fn seq(&self) -> &str {
        &self.sequence
    }
}

impl Display for Umi {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.sequence)
    }
}

/// Composite key of one raw observation.
#[derive(Clone, Debug, Hash, Eq, PartialEq, Ord, PartialOrd)]
pub struct UmiKey {
    pub cell: CellIdx,
    pub tag: TagIdx,
    pub umi: Umi,
}

/// Read tallies per (cell, antibody, UMI). Shards built on different
/// workers are combined with `Metric::merge`, which sums the tallies.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct UmiCountTable {
    counts: TxHashMap<UmiKey, CountMetric>,
}

impl Metric for UmiCountTable {
    fn merge(&mut self, other: Self) {
        self.counts.merge(other.counts);
    }
}

impl UmiCountTable {
    /// Record one read.
    pub fn increment(&mut self, cell: CellIdx, tag: TagIdx, umi: Umi) {
        self.counts
            .entry(UmiKey { cell, tag, umi })
            .or_default()
            .increment();
    }

    /// Reads observed for a given key.
    pub fn reads(&self, cell: CellIdx, tag: TagIdx, umi: &Umi) -> i64 {
        self.counts
            .get(&UmiKey {
                cell,
                tag,
                umi: umi.clone(),
            })
            .map_or(0, |c| c.count())
    }

    /// Total number of reads recorded.
    pub fn total_reads(&self) -> i64 {
        self.counts.values().map(|c| c.count()).sum()
    }

    /// Number of distinct (cell, antibody, UMI) keys.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Count distinct UMIs per (cell, antibody), discarding read tallies.
    pub fn collapse(&self) -> CollapsedTable {
        let mut counts = BTreeMap::new();
        for key in self.counts.keys() {
            *counts.entry((key.cell, key.tag)).or_insert(0) += 1;
        }
        CollapsedTable { counts }
    }
}

/// Total unique UMIs per antibody across every cell.
pub type AntibodyTotals = BTreeMap<TagIdx, u64>;

/// Unique UMI count per (cell, antibody), iterated in whitelist order and
/// then reference order. Cells without any in-cell read are absent.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CollapsedTable {
    counts: BTreeMap<(CellIdx, TagIdx), u64>,
}

impl FromIterator<((CellIdx, TagIdx), u64)> for CollapsedTable {
    fn from_iter<I: IntoIterator<Item = ((CellIdx, TagIdx), u64)>>(iter: I) -> Self {
        CollapsedTable {
            counts: iter.into_iter().collect(),
        }
    }
}

impl CollapsedTable {
    pub fn get(&self, cell: CellIdx, tag: TagIdx) -> u64 {
        self.counts.get(&(cell, tag)).copied().unwrap_or(0)
    }

    /// Overwrite the count of a pair, adding it if absent.
    pub fn set(&mut self, cell: CellIdx, tag: TagIdx, count: u64) {
        self.counts.insert((cell, tag), count);
    }

    pub fn iter(&self) -> impl Iterator<Item = (CellIdx, TagIdx, u64)> + '_ {
        self.counts.iter().map(|(&(cell, tag), &n)| (cell, tag, n))
    }

    /// Cells present in the table, in whitelist order.
    pub fn cells(&self) -> impl Iterator<Item = CellIdx> + '_ {
        self.counts.keys().map(|&(cell, _)| cell).dedup()
    }

    /// Sum of unique UMI counts over the antibodies of one cell.
    pub fn per_cell_total(&self, cell: CellIdx) -> u64 {
        self.counts
            .range((cell, TagIdx(0))..=(cell, TagIdx(u16::MAX)))
            .map(|(_, n)| n)
            .sum()
    }

    /// `per_cell_total` for every cell present, in whitelist order.
    pub fn per_cell_totals(&self) -> Vec<(CellIdx, u64)> {
        self.counts
            .iter()
            .map(|(&(cell, _), &n)| (cell, n))
            .group_by(|&(cell, _)| cell)
            .into_iter()
            .map(|(cell, group)| (cell, group.map(|(_, n)| n).sum()))
            .collect()
    }

    pub fn antibody_totals(&self) -> AntibodyTotals {
        let mut totals = AntibodyTotals::new();
        for (&(_, tag), &n) in &self.counts {
            *totals.entry(tag).or_insert(0) += n;
        }
        totals
    }

    /// Number of (cell, antibody) pairs held.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}
