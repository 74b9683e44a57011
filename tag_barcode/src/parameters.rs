//! Tunable parameters of the tag barcode counting, with optional overrides
//! from a TOML file.

use anyhow::{Context, Result};
use log::warn;
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct TagParameters {
    /// Substitutions tolerated when matching a tag barcode to the reference.
    pub max_mismatches: usize,
    /// A (cell, antibody) pair must exceed this many UMIs to be called aggregate.
    pub aggregate_count_threshold: u64,
    /// ...and hold more than this fraction of all UMIs of the antibody.
    pub aggregate_fraction_threshold: f64,
    /// Decimal places kept for the fraction in the aggregate barcode report.
    pub removal_fraction_decimals: u32,
    /// Decimal places kept for the percentages of the statistics file.
    pub percent_decimals: u32,
    /// Reads per parallel work unit.
    pub chunk_size: usize,
    /// Worker threads, 0 lets rayon decide.
    pub threads: usize,
}

pub const DEFAULT_PARAMETERS: TagParameters = TagParameters {
    max_mismatches: barcode::DEFAULT_MAX_MISMATCHES,
    aggregate_count_threshold: 10_000,
    aggregate_fraction_threshold: 0.01,
    removal_fraction_decimals: 3,
    percent_decimals: 2,
    chunk_size: 100_000,
    threads: 0,
};

impl Default for TagParameters {
    fn default() -> Self {
        DEFAULT_PARAMETERS
    }
}

macro_rules! warn_non_default {
    ($params:expr, $($field:ident),+) => {
        $(
            if DEFAULT_PARAMETERS.$field != $params.$field {
                warn!("using non-default {} = {:?}", stringify!($field), $params.$field);
            }
        )+
    };
}

impl TagParameters {
    /// Load parameters from a TOML file. Keys that are absent keep their default.
    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let s = std::fs::read_to_string(path).with_context(|| path.display().to_string())?;
        let params: TagParameters =
            toml::from_str(&s).with_context(|| path.display().to_string())?;
        params.warn_non_default();
        Ok(params)
    }

    /// Defaults unless a parameters file is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_toml_file(path),
            None => Ok(Self::default()),
        }
    }

    fn warn_non_default(&self) {
        warn_non_default!(
            self,
            max_mismatches,
            aggregate_count_threshold,
            aggregate_fraction_threshold,
            removal_fraction_decimals,
            percent_decimals,
            chunk_size,
            threads
        );
    }
}
