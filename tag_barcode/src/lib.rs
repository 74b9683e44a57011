//! Counting of antibody tag reads per cell.
//!
//! Each read of the tag library is matched to an antibody by its tag
//! barcode, tolerating a few substitutions, and kept when its cell barcode
//! was called as a cell upstream. Reads are deduplicated by UMI into an
//! antibody by cell matrix. Cells whose UMIs are concentrated on a single
//! antibody far beyond what the rest of the sample shows are reported as
//! aggregate barcodes and zeroed in the filtered matrix.

pub mod aggregate;
pub mod classifier;
mod errors;
pub mod io;
pub mod matrix;
pub mod parameters;
pub mod pipeline;
pub mod summary;

pub use aggregate::{AggregateFilter, AggregateRemoval, AggregateRemovals};
pub use classifier::{scan_reads, ReadClass, ScanShard, TagClassifier};
pub use errors::TagBarcodeError;
pub use matrix::CountMatrix;
pub use parameters::TagParameters;
pub use pipeline::{TagBarcodeArgs, TagBarcodeOutputs, TagBarcodePipeline};
pub use summary::SummaryStats;
