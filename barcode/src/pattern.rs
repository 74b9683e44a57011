//! Read layout patterns such as `L25C15`, describing which stretches of a
//! read hold linker, cell barcode, UMI, poly-T or unused bases.

use crate::errors::BarcodeError;
use lazy_static::lazy_static;
use regex::Regex;
use std::ops::Range;
use std::str::FromStr;

lazy_static! {
    static ref WHOLE_PATTERN: Regex = Regex::new(r"^(?:[CLUTN][0-9]+)+$").unwrap();
    static ref SEGMENT: Regex = Regex::new(r"([CLUTN])([0-9]+)").unwrap();
}

/// A parsed read pattern: segments of `(code, length)` laid end to end.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReadPattern {
    pattern: String,
    segments: Vec<(char, usize)>,
}

impl FromStr for ReadPattern {
    type Err = BarcodeError;

    fn from_str(pattern: &str) -> Result<Self, Self::Err> {
        let invalid = || BarcodeError::InvalidPattern {
            pattern: pattern.to_string(),
        };
        if !WHOLE_PATTERN.is_match(pattern) {
            return Err(invalid());
        }
        let mut segments = Vec::new();
        // the total length must fit in usize so that slice ends never overflow
        let mut total: usize = 0;
        for cap in SEGMENT.captures_iter(pattern) {
            let code = cap[1].chars().next().ok_or_else(invalid)?;
            let len: usize = cap[2].parse().map_err(|_| invalid())?;
            if len == 0 {
                return Err(invalid());
            }
            total = total.checked_add(len).ok_or_else(invalid)?;
            segments.push((code, len));
        }
        Ok(ReadPattern {
            pattern: pattern.to_string(),
            segments,
        })
    }
}

impl ReadPattern {
    /// Every `[start, stop)` range carrying `code`, in read order.
    pub fn slices(&self, code: char) -> Vec<Range<usize>> {
        let mut start = 0;
        let mut ranges = Vec::new();
        for &(c, len) in &self.segments {
            if c == code {
                ranges.push(start..start + len);
            }
            start += len;
        }
        ranges
    }

    /// The first range carrying `code`.
    pub fn first_slice(&self, code: char) -> Result<Range<usize>, BarcodeError> {
        self.slices(code)
            .into_iter()
            .next()
            .ok_or_else(|| BarcodeError::MissingPatternSegment {
                pattern: self.pattern.clone(),
                code,
            })
    }

    /// Total number of bases the pattern covers.
    pub fn len(&self) -> usize {
        self.segments.iter().map(|(_, len)| len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.pattern
    }
}
