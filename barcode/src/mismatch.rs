//! Lookup from every sequence within a small Hamming distance of a tag
//! barcode back to the antibody it came from.

use crate::reference::{TagIdx, TagReference};
use log::warn;
use metric::TxHashMap;
use std::collections::BTreeMap;

const BASE_OPTS: [u8; 4] = [b'A', b'C', b'G', b'T'];

/// Eagerly built variant table. Immutable once built, so it can be shared
/// between scan workers without locking.
#[derive(Clone, Debug, Default)]
pub struct MismatchTable {
    max_mismatches: usize,
    lookup: TxHashMap<Vec<u8>, TagIdx>,
    collisions: BTreeMap<(TagIdx, TagIdx), usize>,
}

impl MismatchTable {
    /// Enumerate every substitution variant of each reference sequence with
    /// up to `max_mismatches` changed positions, the sequence itself included.
    ///
    /// References are processed in reference order and a variant shared by
    /// two references maps to the later one. Each such overwrite is counted
    /// and reported once per pair of antibodies.
    pub fn build(reference: &TagReference, max_mismatches: usize) -> Self {
        let mut table = MismatchTable {
            max_mismatches,
            ..Default::default()
        };
        for (idx, _, seq) in reference.iter() {
            let mut buf = seq.to_vec();
            table.insert_variants(&mut buf, seq, 0, max_mismatches, idx);
        }
        for (&(overwritten, overwriting), &n) in &table.collisions {
            warn!(
                "{n} sequence(s) within {max_mismatches} mismatches of tag barcode {} are also \
                 within {max_mismatches} mismatches of {} and will be assigned to {}",
                reference.id(overwritten),
                reference.id(overwriting),
                reference.id(overwriting),
            );
        }
        table
    }

    fn insert_variants(
        &mut self,
        buf: &mut [u8],
        original: &[u8],
        start: usize,
        remaining: usize,
        idx: TagIdx,
    ) {
        if let Some(prev) = self.lookup.insert(buf.to_vec(), idx) {
            if prev != idx {
                *self.collisions.entry((prev, idx)).or_default() += 1;
            }
        }
        if remaining == 0 {
            return;
        }
        for pos in start..buf.len() {
            for &base in BASE_OPTS.iter().filter(|&&b| b != original[pos]) {
                buf[pos] = base;
                self.insert_variants(buf, original, pos + 1, remaining - 1, idx);
            }
            buf[pos] = original[pos];
        }
    }

    /// The antibody a (possibly mismatched) tag barcode resolves to.
    pub fn get(&self, seq: &[u8]) -> Option<TagIdx> {
        self.lookup.get(seq).copied()
    }

    pub fn max_mismatches(&self) -> usize {
        self.max_mismatches
    }

    /// Number of overwritten variants keyed by (overwritten, overwriting).
    pub fn collisions(&self) -> &BTreeMap<(TagIdx, TagIdx), usize> {
        &self.collisions
    }

    pub fn len(&self) -> usize {
        self.lookup.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lookup.is_empty()
    }
}
