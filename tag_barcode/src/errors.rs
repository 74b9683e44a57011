/// Fatal conditions met while scanning reads or summarizing the scan.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum TagBarcodeError {
    #[error(
        "The length of the tag barcode in the read pattern {pattern:?} ({slice_len}) does not \
         match the length of the tag barcodes in the reference ({barcode_len})"
    )]
    SliceLengthMismatch {
        pattern: String,
        slice_len: usize,
        barcode_len: usize,
    },

    #[error(
        "Malformed read name {read_name:?}: expected the cell barcode and the UMI as the first \
         two colon-separated fields, e.g. BARCODE:UMI:..."
    )]
    MalformedReadName { read_name: String },

    #[error("{metric} is undefined because there are no {denominator}")]
    DegenerateStatistic {
        metric: &'static str,
        denominator: &'static str,
    },
}
