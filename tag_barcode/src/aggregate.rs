//! Detection of aggregate barcodes: (cell, antibody) pairs holding an
//! outsized share of all UMIs of an antibody.

use barcode::{CellIdx, TagIdx};
use log::info;
use metric::TxHashSet;
use umi::{AntibodyTotals, CollapsedTable};

/// One zeroed (cell, antibody) pair.
#[derive(Clone, Debug, PartialEq)]
pub struct AggregateRemoval {
    pub cell: CellIdx,
    pub tag: TagIdx,
    pub umi_count: u64,
    /// Unique UMIs of the antibody across every cell, before filtering.
    pub total_umi_count: u64,
    /// `umi_count / total_umi_count`, rounded.
    pub fraction: f64,
}

/// Removed pairs, in whitelist order and then reference order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AggregateRemovals(pub Vec<AggregateRemoval>);

impl AggregateRemovals {
    /// Number of distinct cells with at least one removed pair.
    pub fn num_barcodes(&self) -> usize {
        self.0.iter().map(|r| r.cell).collect::<TxHashSet<_>>().len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

#[derive(Clone, Copy, Debug)]
pub struct AggregateFilter {
    count_threshold: u64,
    fraction_threshold: f64,
    fraction_decimals: u32,
}

impl AggregateFilter {
    pub fn new(count_threshold: u64, fraction_threshold: f64) -> Self {
        AggregateFilter {
            count_threshold,
            fraction_threshold,
            fraction_decimals: 3,
        }
    }

    /// Decimal places kept for the reported fraction.
    pub fn fraction_decimals(self, fraction_decimals: u32) -> Self {
        AggregateFilter {
            fraction_decimals,
            ..self
        }
    }

    /// Zero every pair whose count exceeds the count threshold and whose
    /// share of the antibody total exceeds the fraction threshold.
    ///
    /// `totals` are taken as given and never updated while filtering, so
    /// the decision for one pair does not depend on any other pair.
    pub fn filter(
        &self,
        table: &CollapsedTable,
        totals: &AntibodyTotals,
    ) -> (CollapsedTable, AggregateRemovals) {
        let mut filtered = table.clone();
        let mut removals = Vec::new();
        for (cell, tag, umi_count) in table.iter() {
            let total_umi_count = totals.get(&tag).copied().unwrap_or(0);
            if umi_count <= self.count_threshold || total_umi_count == 0 {
                continue;
            }
            let fraction = umi_count as f64 / total_umi_count as f64;
            if fraction > self.fraction_threshold {
                filtered.set(cell, tag, 0);
                removals.push(AggregateRemoval {
                    cell,
                    tag,
                    umi_count,
                    total_umi_count,
                    fraction: stats::round_to(fraction, self.fraction_decimals),
                });
            }
        }
        let removals = AggregateRemovals(removals);
        info!(
            "{} aggregate barcode(s) found, {} (cell, antibody) pair(s) zeroed",
            removals.num_barcodes(),
            removals.len()
        );
        (filtered, removals)
    }
}
