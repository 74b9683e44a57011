//! Sample level statistics of a tag barcode run.

use crate::aggregate::AggregateRemovals;
use crate::classifier::ScanShard;
use crate::errors::TagBarcodeError;
use metric::{JsonReport, JsonReporter};
use serde_json::Value;
use umi::CollapsedTable;

pub const NUMBER_OF_CELLS: &str = "Number of Cells";
pub const FRACTION_TAG_READS: &str = "Fraction Tag Reads";
pub const FRACTION_TAG_READS_IN_CELL: &str = "Fraction Tag Reads in Cell";
pub const MEDIAN_UMI_PER_CELL: &str = "Median UMI per Cell";
pub const AGGREGATE_BARCODES: &str = "Aggregate Barcodes";

/// Raw values; fractions are ratios in [0, 1]. The statistics file shows
/// them as percentages.
#[derive(Clone, Debug, PartialEq)]
pub struct SummaryStats {
    pub number_of_cells: usize,
    pub fraction_tag_reads: f64,
    pub fraction_tag_reads_in_cell: f64,
    /// `None` when no read landed in a whitelisted cell.
    pub median_umi_per_cell: Option<f64>,
    pub aggregate_barcodes: usize,
    percent_decimals: u32,
}

impl SummaryStats {
    /// `collapsed` is the table before aggregate filtering. Cells without
    /// in-cell reads are not part of the median. Only zero reads or zero
    /// tag reads make the statistics degenerate; a run without in-cell reads
    /// has an undefined median but is otherwise valid.
    pub fn compute(
        scan: &ScanShard,
        collapsed: &CollapsedTable,
        num_whitelisted: usize,
        removals: &AggregateRemovals,
        percent_decimals: u32,
    ) -> Result<Self, TagBarcodeError> {
        let degenerate = |metric: &'static str, denominator: &'static str| {
            TagBarcodeError::DegenerateStatistic {
                metric,
                denominator,
            }
        };
        let fraction_tag_reads = scan
            .tag_fraction()
            .fraction()
            .ok_or_else(|| degenerate(FRACTION_TAG_READS, "reads"))?;
        let fraction_tag_reads_in_cell = scan
            .incell_fraction()
            .fraction()
            .ok_or_else(|| degenerate(FRACTION_TAG_READS_IN_CELL, "tag reads"))?;
        let median_umi_per_cell =
            stats::median(collapsed.per_cell_totals().into_iter().map(|(_, n)| n));

        Ok(SummaryStats {
            number_of_cells: num_whitelisted,
            fraction_tag_reads,
            fraction_tag_reads_in_cell,
            median_umi_per_cell,
            aggregate_barcodes: removals.num_barcodes(),
            percent_decimals,
        })
    }
}

impl JsonReport for SummaryStats {
    fn to_json_reporter(&self) -> JsonReporter {
        let mut reporter = JsonReporter::default();
        reporter.insert(NUMBER_OF_CELLS, self.number_of_cells);
        reporter.insert(
            FRACTION_TAG_READS,
            stats::as_percent(self.fraction_tag_reads, self.percent_decimals),
        );
        reporter.insert(
            FRACTION_TAG_READS_IN_CELL,
            stats::as_percent(self.fraction_tag_reads_in_cell, self.percent_decimals),
        );
        reporter.insert(
            MEDIAN_UMI_PER_CELL,
            self.median_umi_per_cell
                .map_or_else(|| Value::from("NaN"), Value::from),
        );
        reporter.insert(AGGREGATE_BARCODES, self.aggregate_barcodes);
        reporter
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::AggregateRemoval;
    use barcode::{CellIdx, TagIdx};
    use metric::CountMetric;
    use pretty_assertions::assert_eq;

    fn scan(total: i64, tag: i64, incell: i64) -> ScanShard {
        ScanShard {
            total_reads: CountMetric::from(total),
            tag_reads: CountMetric::from(tag),
            incell_reads: CountMetric::from(incell),
            ..Default::default()
        }
    }

    fn collapsed(entries: &[(u32, u16, u64)]) -> CollapsedTable {
        entries
            .iter()
            .map(|&(c, t, n)| ((CellIdx(c), TagIdx(t)), n))
            .collect()
    }

    fn removal(cell: u32, tag: u16) -> AggregateRemoval {
        AggregateRemoval {
            cell: CellIdx(cell),
            tag: TagIdx(tag),
            umi_count: 20000,
            total_umi_count: 40000,
            fraction: 0.5,
        }
    }

    #[test]
    fn test_compute() {
        // A:10, B:20, C:30 split over two antibodies
        let table = collapsed(&[(0, 0, 4), (0, 1, 6), (1, 0, 20), (2, 1, 30)]);
        let removals = AggregateRemovals(vec![removal(2, 0), removal(2, 1)]);
        let stats = SummaryStats::compute(&scan(5, 4, 3), &table, 3000, &removals, 2).unwrap();
        assert_eq!(stats.number_of_cells, 3000);
        assert_eq!(stats.fraction_tag_reads, 0.8);
        assert_eq!(stats.fraction_tag_reads_in_cell, 0.75);
        assert_eq!(stats.median_umi_per_cell, Some(20.0));
        assert_eq!(stats.aggregate_barcodes, 1);

        let reporter = stats.to_json_reporter();
        assert_eq!(reporter.get(NUMBER_OF_CELLS), Some(&Value::from(3000)));
        assert_eq!(reporter.get(FRACTION_TAG_READS), Some(&Value::from(80.0)));
        assert_eq!(reporter.get(FRACTION_TAG_READS_IN_CELL), Some(&Value::from(75.0)));
        assert_eq!(reporter.get(MEDIAN_UMI_PER_CELL), Some(&Value::from(20.0)));
        assert_eq!(reporter.get(AGGREGATE_BARCODES), Some(&Value::from(1)));
    }

    #[test]
    fn test_degenerate() {
        let table = collapsed(&[(0, 0, 1)]);
        let none = AggregateRemovals::default();
        assert_eq!(
            SummaryStats::compute(&scan(0, 0, 0), &table, 1, &none, 2),
            Err(TagBarcodeError::DegenerateStatistic {
                metric: FRACTION_TAG_READS,
                denominator: "reads"
            })
        );
        assert_eq!(
            SummaryStats::compute(&scan(10, 0, 0), &table, 1, &none, 2),
            Err(TagBarcodeError::DegenerateStatistic {
                metric: FRACTION_TAG_READS_IN_CELL,
                denominator: "tag reads"
            })
        );
    }

    #[test]
    fn test_no_incell_reads_has_undefined_median() {
        let none = AggregateRemovals::default();
        let stats =
            SummaryStats::compute(&scan(10, 2, 0), &CollapsedTable::default(), 1, &none, 2)
                .unwrap();
        assert_eq!(stats.median_umi_per_cell, None);
        assert_eq!(stats.fraction_tag_reads_in_cell, 0.0);
        let reporter = stats.to_json_reporter();
        assert_eq!(reporter.get(MEDIAN_UMI_PER_CELL), Some(&Value::from("NaN")));
        assert_eq!(reporter.get(FRACTION_TAG_READS_IN_CELL), Some(&Value::from(0.0)));
    }
}
