//! Assign each read to one of three nested buckets and tally the in-cell
//! ones by UMI.

use crate::errors::TagBarcodeError;
use crate::io::ReadRecord;
use anyhow::Result;
use barcode::{CellIdx, MismatchTable, TagIdx, Whitelist};
use itertools::Itertools;
use log::debug;
use metric::{CountMetric, Metric, PercentMetric};
use rayon::prelude::*;
use std::ops::Range;
use umi::{Umi, UmiCountTable};

/// Split a read name of the form `BARCODE:UMI[:...]` into the cell barcode
/// and the UMI.
pub fn parse_read_name(read_name: &str) -> Result<(&str, &str), TagBarcodeError> {
    let mut fields = read_name.split(':');
    match (fields.next(), fields.next()) {
        // an empty barcode or UMI is rejected too, e.g. `BC1:`
        (Some(bc), Some(umi)) if !bc.is_empty() && !umi.is_empty() => Ok((bc, umi)),
        _ => Err(TagBarcodeError::MalformedReadName {
            read_name: read_name.to_string(),
        }),
    }
}

/// Buckets of increasing specificity. A read lands in exactly one.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ReadClass {
    /// The tag barcode matches no antibody.
    NoTag,
    /// Tag read whose cell barcode is not in the whitelist.
    TagNotInCell { tag: TagIdx },
    InCell { cell: CellIdx, tag: TagIdx, umi: Umi },
}

pub struct TagClassifier<'a> {
    table: &'a MismatchTable,
    whitelist: &'a Whitelist,
    slice: Range<usize>,
}

impl<'a> TagClassifier<'a> {
    /// `slice` is the position of the tag barcode in the read. Its length has
    /// to match `barcode_len`, the length shared by the reference sequences.
    pub fn new(
        table: &'a MismatchTable,
        whitelist: &'a Whitelist,
        slice: Range<usize>,
        barcode_len: usize,
        pattern: &str,
    ) -> Result<Self, TagBarcodeError> {
        if slice.len() != barcode_len {
            return Err(TagBarcodeError::SliceLengthMismatch {
                pattern: pattern.to_string(),
                slice_len: slice.len(),
                barcode_len,
            });
        }
        Ok(TagClassifier {
            table,
            whitelist,
            slice,
        })
    }

    pub fn classify(&self, read_name: &str, seq: &[u8]) -> Result<ReadClass, TagBarcodeError> {
        let (bc, umi) = parse_read_name(read_name)?;
        let Some(tag) = seq.get(self.slice.clone()).and_then(|s| self.table.get(s)) else {
            return Ok(ReadClass::NoTag);
        };
        Ok(match self.whitelist.index_of(bc) {
            Some(cell) => ReadClass::InCell {
                cell,
                tag,
                umi: Umi::new(umi),
            },
            None => ReadClass::TagNotInCell { tag },
        })
    }
}

/// Counters and UMI tallies of one part of the read stream.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ScanShard {
    pub total_reads: CountMetric,
    pub tag_reads: CountMetric,
    pub incell_reads: CountMetric,
    pub umis: UmiCountTable,
}

impl Metric for ScanShard {
    fn merge(&mut self, other: Self) {
        self.total_reads.merge(other.total_reads);
        self.tag_reads.merge(other.tag_reads);
        self.incell_reads.merge(other.incell_reads);
        self.umis.merge(other.umis);
    }
}

impl ScanShard {
    pub fn observe(&mut self, class: ReadClass) {
        self.total_reads.increment();
        match class {
            ReadClass::NoTag => {}
            ReadClass::TagNotInCell { .. } => self.tag_reads.increment(),
            ReadClass::InCell { cell, tag, umi } => {
                self.tag_reads.increment();
                self.incell_reads.increment();
                self.umis.increment(cell, tag, umi);
            }
        }
    }

    /// Tag reads over all reads.
    pub fn tag_fraction(&self) -> PercentMetric {
        PercentMetric::from_parts(self.tag_reads, self.total_reads)
    }

    /// In-cell reads over tag reads.
    pub fn incell_fraction(&self) -> PercentMetric {
        PercentMetric::from_parts(self.incell_reads, self.tag_reads)
    }
}

/// Classify every read, `chunk_size` reads at a time, each chunk in parallel
/// on the current rayon pool. The result does not depend on the chunking.
pub fn scan_reads<I>(
    reads: I,
    classifier: &TagClassifier<'_>,
    chunk_size: usize,
) -> Result<ScanShard>
where
    I: IntoIterator<Item = Result<ReadRecord>>,
{
    let mut scanned = ScanShard::default();
    let chunks = reads.into_iter().chunks(chunk_size.max(1));
    for (i, chunk) in (&chunks).into_iter().enumerate() {
        let chunk: Vec<ReadRecord> = chunk.collect::<Result<_>>()?;
        let shard = chunk
            .par_iter()
            .try_fold(ScanShard::default, |mut shard, read| {
                shard.observe(classifier.classify(&read.name, &read.seq)?);
                Ok::<_, TagBarcodeError>(shard)
            })
            .try_reduce(ScanShard::default, |mut a, b| {
                a.merge(b);
                Ok(a)
            })?;
        scanned.merge(shard);
        debug!("scanned chunk {i}: {} reads so far", scanned.total_reads.count());
    }
    Ok(scanned)
}

#[cfg(test)]
mod tests {
    use super::*;
    use barcode::TagReference;
    use pretty_assertions::assert_eq;

    fn read(name: &str, seq: &str) -> Result<ReadRecord> {
        Ok(ReadRecord {
            name: name.to_string(),
            seq: seq.as_bytes().to_vec(),
        })
    }

    fn fixtures() -> (MismatchTable, Whitelist) {
        let reference =
            TagReference::from_pairs([("CD3", b"AAAA".to_vec()), ("CD19", b"CCCC".to_vec())])
                .unwrap();
        let whitelist: Whitelist = ["BC1"].into_iter().collect();
        (MismatchTable::build(&reference, 2), whitelist)
    }

    #[test]
    fn test_parse_read_name() {
        assert_eq!(parse_read_name("BC1:UMI1"), Ok(("BC1", "UMI1")));
        assert_eq!(parse_read_name("BC1:UMI1:read42"), Ok(("BC1", "UMI1")));
        for bad in ["BC1", "", ":UMI1", "BC1:"] {
            assert_eq!(
                parse_read_name(bad),
                Err(TagBarcodeError::MalformedReadName {
                    read_name: bad.to_string()
                })
            );
        }
    }

    #[test]
    fn test_slice_length_must_match() {
        let (table, whitelist) = fixtures();
        assert!(TagClassifier::new(&table, &whitelist, 2..6, 4, "L2C4").is_ok());
        assert_eq!(
            TagClassifier::new(&table, &whitelist, 2..7, 4, "L2C5").err(),
            Some(TagBarcodeError::SliceLengthMismatch {
                pattern: "L2C5".to_string(),
                slice_len: 5,
                barcode_len: 4
            })
        );
    }

    #[test]
    fn test_classify() {
        let (table, whitelist) = fixtures();
        let classifier = TagClassifier::new(&table, &whitelist, 2..6, 4, "L2C4").unwrap();
        assert_eq!(
            classifier.classify("BC1:UMI1", b"TTAAATTT").unwrap(),
            ReadClass::InCell {
                cell: CellIdx(0),
                tag: TagIdx(0),
                umi: Umi::new("UMI1")
            }
        );
        assert_eq!(
            classifier.classify("BC2:UMI1", b"TTCCCC").unwrap(),
            ReadClass::TagNotInCell { tag: TagIdx(1) }
        );
        assert_eq!(
            classifier.classify("BC1:UMI1", b"TTGGGG").unwrap(),
            ReadClass::NoTag
        );
        // too short to hold the tag barcode
        assert_eq!(classifier.classify("BC1:UMI1", b"TTAAA").unwrap(), ReadClass::NoTag);
        assert!(classifier.classify("BC1", b"TTAAAA").is_err());
    }

    #[test]
    fn test_scan_buckets() -> Result<()> {
        let (table, whitelist) = fixtures();
        let classifier = TagClassifier::new(&table, &whitelist, 0..4, 4, "C4")?;
        let reads = vec![
            read("BC1:UMI1", "AAAA"),
            read("BC1:UMI1", "AAAA"),
            read("BC1:UMI2", "AAAT"),
            read("BC1:UMI3", "GGGG"),
            read("BC2:UMI4", "CCCC"),
        ];
        for chunk_size in [1, 2, 100] {
            let shard = scan_reads(reads.iter().map(clone_read), &classifier, chunk_size)?;
            assert_eq!(shard.total_reads.count(), 5);
            assert_eq!(shard.tag_reads.count(), 4);
            assert_eq!(shard.incell_reads.count(), 3);
            assert_eq!(shard.tag_fraction().fraction(), Some(0.8));
            assert_eq!(shard.incell_fraction().fraction(), Some(0.75));
            let collapsed = shard.umis.collapse();
            assert_eq!(collapsed.len(), 1);
            assert_eq!(collapsed.get(CellIdx(0), TagIdx(0)), 2);
        }
        Ok(())
    }

    #[test]
    fn test_scan_aborts_on_malformed_name() {
        let (table, whitelist) = fixtures();
        let classifier = TagClassifier::new(&table, &whitelist, 0..4, 4, "C4").unwrap();
        let reads = vec![read("BC1:UMI1", "AAAA"), read("BC1", "AAAA")];
        let err = scan_reads(reads, &classifier, 10).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<TagBarcodeError>(),
            Some(TagBarcodeError::MalformedReadName { .. })
        ));
    }

    fn clone_read(r: &Result<ReadRecord>) -> Result<ReadRecord> {
        match r {
            Ok(r) => Ok(r.clone()),
            Err(e) => Err(anyhow::anyhow!("{e}")),
        }
    }
}
