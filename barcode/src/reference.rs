//! Antibody tag barcode reference, loaded from FASTA.

use crate::errors::BarcodeError;
use crate::io_utils::open_with_gz;
use anyhow::{Context, Result};
use bio::io::fasta;
use metric::TxHashMap;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Position of an antibody in the reference. Reference order is the row
/// order of the count matrices.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TagIdx(pub u16);

impl TagIdx {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Ordered mapping from antibody id to its tag barcode sequence.
/// Every sequence has the same length.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TagReference {
    ids: Vec<String>,
    seqs: Vec<Vec<u8>>,
    index: TxHashMap<String, TagIdx>,
}

impl TagReference {
    /// Read a FASTA file of tag barcodes, optionally gzipped.
    pub fn from_fasta(path: &Path) -> Result<Self> {
        let reader = fasta::Reader::from_bufread(open_with_gz(path)?);
        let mut pairs = Vec::new();
        for record in reader.records() {
            let record = record.with_context(|| format!("Error reading {}", path.display()))?;
            pairs.push((record.id().to_string(), record.seq().to_vec()));
        }
        if pairs.is_empty() {
            return Err(BarcodeError::EmptyReference {
                path: path.to_path_buf(),
            }
            .into());
        }
        Ok(Self::from_pairs(pairs)?)
    }

    /// Build the reference from (id, sequence) pairs in encounter order.
    /// A repeated id replaces the earlier sequence but keeps its position.
    pub fn from_pairs<I, S>(pairs: I) -> Result<Self, BarcodeError>
    where
        I: IntoIterator<Item = (S, Vec<u8>)>,
        S: Into<String>,
    {
        let mut reference = TagReference {
            ids: Vec::new(),
            seqs: Vec::new(),
            index: TxHashMap::default(),
        };
        for (id, seq) in pairs {
            let id = id.into();
            if seq.is_empty() {
                return Err(BarcodeError::EmptySequence { id });
            }
            match reference.index.get(&id) {
                Some(&idx) => reference.seqs[idx.index()] = seq,
                None => {
                    let idx = u16::try_from(reference.ids.len())
                        .map(TagIdx)
                        .map_err(|_| BarcodeError::TooManyTagBarcodes {
                            max: usize::from(u16::MAX) + 1,
                        })?;
                    reference.index.insert(id.clone(), idx);
                    reference.ids.push(id);
                    reference.seqs.push(seq);
                }
            }
        }
        reference.check_lengths()?;
        Ok(reference)
    }

    fn check_lengths(&self) -> Result<(), BarcodeError> {
        let Some(expected) = self.seqs.first().map(Vec::len) else {
            return Ok(());
        };
        for (id, seq) in self.ids.iter().zip(&self.seqs) {
            if seq.len() != expected {
                return Err(BarcodeError::UnequalReferenceLength {
                    id: id.clone(),
                    len: seq.len(),
                    first_id: self.ids[0].clone(),
                    expected,
                });
            }
        }
        Ok(())
    }

    /// Length shared by every tag barcode, zero if the reference is empty.
    pub fn barcode_len(&self) -> usize {
        self.seqs.first().map_or(0, Vec::len)
    }

    pub fn id(&self, idx: TagIdx) -> &str {
        &self.ids[idx.index()]
    }

    pub fn seq(&self, idx: TagIdx) -> &[u8] {
        &self.seqs[idx.index()]
    }

    pub fn index_of(&self, id: &str) -> Option<TagIdx> {
        self.index.get(id).copied()
    }

    /// Antibody ids in reference order.
    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    /// (index, id, sequence) in reference order.
    pub fn iter(&self) -> impl Iterator<Item = (TagIdx, &str, &[u8])> {
        self.ids
            .iter()
            .zip(&self.seqs)
            .enumerate()
            // indices were bounded to u16 on insert
            .map(|(i, (id, seq))| (TagIdx(i as u16), id.as_str(), seq.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_duplicate_id_keeps_position() {
        let reference = TagReference::from_pairs([
            ("CD3", b"AAAA".to_vec()),
            ("CD19", b"CCCC".to_vec()),
            ("CD3", b"GGGG".to_vec()),
        ])
        .unwrap();
        assert_eq!(reference.ids(), ["CD3", "CD19"]);
        assert_eq!(reference.seq(TagIdx(0)), b"GGGG");
        assert_eq!(reference.index_of("CD19"), Some(TagIdx(1)));
        assert_eq!(reference.barcode_len(), 4);
    }

    #[test]
    fn test_unequal_lengths() {
        let err = TagReference::from_pairs([("CD3", b"AAAA".to_vec()), ("CD4", b"CCCCC".to_vec())])
            .unwrap_err();
        assert_eq!(
            err,
            BarcodeError::UnequalReferenceLength {
                id: "CD4".to_string(),
                len: 5,
                first_id: "CD3".to_string(),
                expected: 4,
            }
        );
    }

    #[test]
    fn test_too_many_tag_barcodes() {
        let max = usize::from(u16::MAX) + 1;
        let pairs = (0..=max).map(|i| (format!("tag{i}"), format!("{i:08}").into_bytes()));
        assert_eq!(
            TagReference::from_pairs(pairs),
            Err(BarcodeError::TooManyTagBarcodes { max })
        );

        let pairs = (0..max).map(|i| (format!("tag{i}"), format!("{i:08}").into_bytes()));
        let reference = TagReference::from_pairs(pairs).unwrap();
        assert_eq!(reference.index_of("tag65535"), Some(TagIdx(u16::MAX)));
        assert_eq!(reference.iter().last().map(|(idx, _, _)| idx), Some(TagIdx(u16::MAX)));
    }

    #[test]
    fn test_from_fasta() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("tags.fa");
        std::fs::write(&path, ">CD3 anti-human\nAAAA\n>CD19\nCCCC\n")?;
        let reference = TagReference::from_fasta(&path)?;
        assert_eq!(reference.ids(), ["CD3", "CD19"]);
        assert_eq!(reference.seq(TagIdx(1)), b"CCCC");

        let empty = dir.path().join("empty.fa");
        std::fs::write(&empty, "")?;
        let err = TagReference::from_fasta(&empty).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<BarcodeError>(),
            Some(BarcodeError::EmptyReference { .. })
        ));
        Ok(())
    }
}
