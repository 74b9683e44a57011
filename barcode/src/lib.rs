//! Crate for dealing with tag barcodes and cell barcodes.
//!
//! Contains tools for loading the antibody tag reference and the cell barcode
//! whitelist, expanding tag barcodes into a mismatch-tolerant lookup and
//! locating the tag barcode inside a read.

mod errors;
pub mod io_utils;
pub mod mismatch;
pub mod pattern;
pub mod reference;
pub mod whitelist;

pub use errors::BarcodeError;
pub use mismatch::MismatchTable;
pub use pattern::ReadPattern;
pub use reference::{TagIdx, TagReference};
pub use whitelist::{CellIdx, Whitelist};

/* ---------------------------------------------------------------------------------------------- */

/// Maximum number of substituted bases tolerated when matching a tag barcode.
pub const DEFAULT_MAX_MISMATCHES: usize = 2;

/// Pattern code of the segment holding the tag barcode.
pub const TAG_BARCODE_CODE: char = 'C';
