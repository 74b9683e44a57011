//! Dense antibody by cell matrix of unique UMI counts.

use anyhow::{Context, Result};
use barcode::{CellIdx, TagIdx, TagReference, Whitelist};
use flate2::write::GzEncoder;
use flate2::Compression;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use umi::CollapsedTable;

/// Rows follow the reference order, columns the whitelist order. Pairs
/// absent from the table are zero.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CountMatrix {
    antibodies: Vec<String>,
    barcodes: Vec<String>,
    rows: Vec<Vec<u64>>,
}

impl CountMatrix {
    pub fn new(table: &CollapsedTable, reference: &TagReference, whitelist: &Whitelist) -> Self {
        let mut rows = vec![vec![0; whitelist.len()]; reference.len()];
        for (cell, tag, count) in table.iter() {
            rows[tag.index()][cell.index()] = count;
        }
        CountMatrix {
            antibodies: reference.ids().to_vec(),
            barcodes: whitelist.barcodes().to_vec(),
            rows,
        }
    }

    pub fn get(&self, antibody: TagIdx, barcode: CellIdx) -> u64 {
        self.rows[antibody.index()][barcode.index()]
    }

    pub fn row(&self, antibody: TagIdx) -> &[u64] {
        &self.rows[antibody.index()]
    }

    /// Unique UMIs of one cell over every antibody.
    pub fn column_total(&self, barcode: CellIdx) -> u64 {
        self.rows.iter().map(|row| row[barcode.index()]).sum()
    }

    /// (rows, columns)
    pub fn shape(&self) -> (usize, usize) {
        (self.antibodies.len(), self.barcodes.len())
    }

    /// Write the matrix as CSV with a header of barcodes and one line per
    /// antibody.
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<()> {
        let mut writer = csv::Writer::from_writer(writer);
        writer.write_record(std::iter::once("").chain(self.barcodes.iter().map(String::as_str)))?;
        for (antibody, row) in self.antibodies.iter().zip(&self.rows) {
            writer.write_field(antibody)?;
            for count in row {
                writer.write_field(count.to_string())?;
            }
            writer.write_record(None::<&[u8]>)?;
        }
        writer.flush()?;
        Ok(())
    }

    /// `write_csv` into a gzipped file.
    pub fn write_csv_gz(&self, path: &Path) -> Result<()> {
        let file = File::create(path).with_context(|| path.display().to_string())?;
        let mut encoder = GzEncoder::new(file, Compression::default());
        self.write_csv(&mut encoder)
            .with_context(|| path.display().to_string())?;
        encoder
            .finish()
            .with_context(|| path.display().to_string())?;
        Ok(())
    }
}
