use std::path::PathBuf;

/// Input shape errors detected while loading the barcode references and the
/// read layout. All of them are fatal and are raised before any read is scanned.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum BarcodeError {
    #[error(
        "Tag barcode sequences must all have the same length, but {id} has length {len} \
         while {first_id} has length {expected}"
    )]
    UnequalReferenceLength {
        id: String,
        len: usize,
        first_id: String,
        expected: usize,
    },

    #[error("No tag barcode sequences were found in {path:?}")]
    EmptyReference { path: PathBuf },

    #[error("At most {max} distinct tag barcodes are supported")]
    TooManyTagBarcodes { max: usize },

    #[error("Tag barcode {id} has an empty sequence")]
    EmptySequence { id: String },

    #[error(
        "Invalid read pattern {pattern:?}: expected a sequence of segments such as L25C15, \
         each being one of the codes C, L, U, T or N followed by a positive length"
    )]
    InvalidPattern { pattern: String },

    #[error("The read pattern {pattern:?} has no {code} segment")]
    MissingPatternSegment { pattern: String, code: char },
}
