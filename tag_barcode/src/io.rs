//! Reading the tag read FASTQ and writing the tabular outputs.

use crate::aggregate::AggregateRemoval;
use anyhow::{Context, Result};
use barcode::io_utils::open_with_gz;
use barcode::{TagReference, Whitelist};
use bio::io::fastq;
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// The part of a FASTQ record the classifier needs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReadRecord {
    /// First whitespace-delimited token of the header.
    pub name: String,
    pub seq: Vec<u8>,
}

/// Iterate over the records of a (possibly gzipped) FASTQ file.
pub fn fastq_records(path: &Path) -> Result<impl Iterator<Item = Result<ReadRecord>> + Send> {
    let reader = fastq::Reader::from_bufread(open_with_gz(path)?);
    let path = path.to_path_buf();
    Ok(reader.records().map(move |record| {
        let record = record.with_context(|| format!("Error reading {}", path.display()))?;
        Ok(ReadRecord {
            name: record.id().to_string(),
            seq: record.seq().to_vec(),
        })
    }))
}

#[derive(Serialize)]
struct AggregateRow<'a> {
    barcode: &'a str,
    antibody: &'a str,
    umi_count: u64,
    total_umi_count: u64,
    fraction: f64,
}

/// Write the aggregate barcode report as CSV, one row per removed pair.
pub fn write_aggregate_report(
    path: &Path,
    removals: &[AggregateRemoval],
    whitelist: &Whitelist,
    reference: &TagReference,
) -> Result<()> {
    let file = File::create(path).with_context(|| path.display().to_string())?;
    let mut writer = csv::Writer::from_writer(BufWriter::new(file));
    if removals.is_empty() {
        writer.write_record([
            "barcode",
            "antibody",
            "umi_count",
            "total_umi_count",
            "fraction",
        ])?;
    }
    for removal in removals {
        writer.serialize(AggregateRow {
            barcode: whitelist.barcode(removal.cell),
            antibody: reference.id(removal.tag),
            umi_count: removal.umi_count,
            total_umi_count: removal.total_umi_count,
            fraction: removal.fraction,
        })?;
    }
    writer
        .flush()
        .with_context(|| path.display().to_string())?;
    Ok(())
}
