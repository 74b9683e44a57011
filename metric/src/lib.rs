#![deny(
    missing_docs,
    missing_copy_implementations,
    non_upper_case_globals,
    trivial_casts,
    trivial_numeric_casts,
    unsafe_code,
    unstable_features,
    unused_extern_crates,
    unused_import_braces,
    unused_qualifications
)]

//!
//! Mergeable counters for the tag barcode pipeline.
//!
//! Every counter accumulated during the read scan implements `Metric`, so that
//! per-worker shards can be combined with `merge` once the scan is finished.
//! Named statistics destined for the sample report are collected in a
//! `JsonReporter`, which serializes with sorted keys so the output is stable
//! from run to run.
//!

use ahash::AHasher;
use anyhow::{Context, Result};
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::borrow::Borrow;
use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::hash::{BuildHasher, Hash};
use std::io::Write;
use std::path::Path;

pub mod collections;
pub mod count_metric;
pub use crate::count_metric::CountMetric;
pub mod percent_metric;
pub use crate::percent_metric::PercentMetric;

/// A deterministic and fast hasher, so that runs hash barcodes identically.
#[derive(Clone, Copy, Default)]
pub struct TxHasher;

impl BuildHasher for TxHasher {
    type Hasher = AHasher;

    fn build_hasher(&self) -> Self::Hasher {
        ahash::RandomState::with_seeds(0, 0, 0, 0).build_hasher()
    }
}

/// A default HashMap using some faster hashing scheme
pub type TxHashMap<K, V> = HashMap<K, V, TxHasher>;

/// A default HashSet using some faster hashing scheme
pub type TxHashSet<K> = HashSet<K, TxHasher>;

/// Anything accumulated independently by several workers and combined
/// afterwards. Merging must be commutative and associative, so that the
/// combined value does not depend on how the input was split.
pub trait Metric {
    /// Combine two Metric objects, modifying self in place,
    /// consuming the `other`
    fn merge(&mut self, other: Self);

    /// Merge metrics from an iterator
    fn from_chunks<I>(chunks: I) -> Self
    where
        I: IntoIterator<Item = Self>,
        Self: Default + Sized,
    {
        chunks
            .into_iter()
            .fold(Default::default(), |mut merged, this| {
                merged.merge(this);
                merged
            })
    }
}

/// Map from statistic name to its value. A serialized `JsonReporter` is
/// exactly the statistics file handed to the sample report.
#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
#[serde(transparent)]
pub struct JsonReporter {
    hashmap: TxHashMap<String, Value>,
}

impl Serialize for JsonReporter {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut xs: Vec<_> = self.hashmap.iter().collect();
        xs.sort_by_key(|&(k, _v)| k);
        let mut map = serializer.serialize_map(Some(xs.len()))?;
        for (k, v) in xs {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

/// `JsonReport` defines how a structure is written out to the statistics
/// file.
pub trait JsonReport {
    /// Convert `self` into a `JsonReporter` object
    fn to_json_reporter(&self) -> JsonReporter;

    /// Write the statistics of `self` to `filename`
    fn report(&self, filename: &dyn AsRef<Path>) -> Result<()> {
        self.to_json_reporter().to_file(filename)
    }
}

impl<K: ToString, V: Into<Value>> Extend<(K, V)> for JsonReporter {
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        self.hashmap
            .extend(iter.into_iter().map(|(k, v)| (k.to_string(), v.into())));
    }
}

impl<K: ToString, V: Into<Value>> FromIterator<(K, V)> for JsonReporter {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> JsonReporter {
        let mut reporter = JsonReporter::default();
        reporter.extend(iter);
        reporter
    }
}

impl JsonReporter {
    /// Insert a new (key, value) pair. Panics if the key is already present,
    /// since two statistics sharing a name is a programming error.
    pub fn insert(&mut self, key: impl ToString, value: impl Into<Value>) {
        let key_str = key.to_string();
        assert!(
            !self.hashmap.contains_key(&key_str),
            "Duplicate metric name {key_str}"
        );
        self.hashmap.insert(key_str, value.into());
    }

    /// Value of a statistic
    pub fn get<Q>(&self, key: &Q) -> Option<&Value>
    where
        String: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.hashmap.get(key)
    }

    /// Write the reporter as pretty-printed json with sorted keys.
    pub fn to_writer<W: Write>(&self, writer: W) -> Result<()> {
        serde_json::to_writer_pretty(writer, &self)
            .context("Could not write JSON in JsonReporter::to_writer()")
    }

    /// Write the reporter to a json file.
    pub fn to_file(&self, filename: &dyn AsRef<Path>) -> Result<()> {
        let path = filename.as_ref();
        let writer = File::create(path)
            .with_context(|| format!("Could not open file '{}' for writing", path.display()))?;
        self.to_writer(writer)
    }
}
