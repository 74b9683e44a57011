//! `Metric` for the map types used to hold per-shard tallies.

use crate::Metric;
use std::collections::HashMap;
use std::hash::{BuildHasher, Hash};

/// Merging two maps merges the values for keys present in both and copies
/// any new (key, value) pair from `other` into `self`.
impl<K, V, S> Metric for HashMap<K, V, S>
where
    K: Eq + Hash,
    V: Metric,
    S: BuildHasher,
{
    fn merge(&mut self, other: Self) {
        use std::collections::hash_map::Entry::{Occupied, Vacant};
        for (key, value) in other {
            match self.entry(key) {
                Vacant(e) => {
                    e.insert(value);
                }
                Occupied(mut e) => {
                    e.get_mut().merge(value);
                }
            }
        }
    }
}
