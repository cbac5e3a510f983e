//! Flat exact-search vector index.

use docdex_core::IndexError;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

/// Exact nearest-neighbor index over fixed-dimension vectors.
///
/// Vectors are stored in insertion order and every search scans all of
/// them. Distances are squared L2, so 0.0 means identical and larger
/// means farther apart. Fine for the corpus sizes this serves; swap for
/// an ANN structure if that ever changes.
#[derive(Debug, Serialize, Deserialize)]
pub struct FlatIndex {
    dimension: usize,
    vectors: Vec<Vec<f32>>,
}

impl FlatIndex {
    /// Create an empty index for `dimension`-sized vectors.
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension,
            vectors: Vec::new(),
        }
    }

    /// The fixed vector dimension.
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Number of stored vectors.
    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    /// Append a vector and return its ordinal.
    ///
    /// Ordinals are assigned in insertion order and never reused; they
    /// are the join key into the document store.
    pub fn insert(&mut self, vector: &[f32]) -> Result<usize, IndexError> {
        if vector.len() != self.dimension {
            return Err(IndexError::DimensionMismatch {
                got: vector.len(),
                expected: self.dimension,
            });
        }
        self.vectors.push(vector.to_vec());
        Ok(self.vectors.len() - 1)
    }

    /// Find the `k` nearest vectors to `query`.
    ///
    /// Returns `(distance, ordinal)` pairs sorted by ascending distance,
    /// at most `min(k, len)` of them. An empty index returns no hits.
    pub fn search(&self, query: &[f32], k: usize) -> Result<Vec<(f32, usize)>, IndexError> {
        if query.len() != self.dimension {
            return Err(IndexError::DimensionMismatch {
                got: query.len(),
                expected: self.dimension,
            });
        }

        let mut scored: Vec<(f32, usize)> = self
            .vectors
            .iter()
            .enumerate()
            .map(|(ordinal, v)| (squared_l2(query, v), ordinal))
            .collect();

        scored.sort_by(|a, b| a.0.total_cmp(&b.0));
        scored.truncate(k.min(self.vectors.len()));
        Ok(scored)
    }

    /// Drop every vector past `len`. Inserts only ever extend the
    /// index, so this rewinds it to an earlier snapshot.
    pub fn truncate(&mut self, len: usize) {
        self.vectors.truncate(len);
    }

    /// Persist the index to `path`.
    ///
    /// Writes to a sibling temp file and renames it into place, so a
    /// crash mid-write never leaves a truncated artifact.
    pub fn save(&self, path: &Path) -> Result<(), IndexError> {
        let tmp = path.with_extension("bin.tmp");
        let file =
            File::create(&tmp).map_err(|e| IndexError::Persist(format!("create {tmp:?}: {e}")))?;
        bincode::serialize_into(BufWriter::new(file), self)
            .map_err(|e| IndexError::Persist(format!("encode {tmp:?}: {e}")))?;
        std::fs::rename(&tmp, path)
            .map_err(|e| IndexError::Persist(format!("rename {tmp:?} -> {path:?}: {e}")))?;
        Ok(())
    }

    /// Load an index from `path`, or an empty one if the file is absent.
    ///
    /// A present artifact with a different dimension than `dimension`
    /// is an error rather than a silent reset.
    pub fn load(path: &Path, dimension: usize) -> Result<Self, IndexError> {
        if !path.exists() {
            return Ok(Self::new(dimension));
        }
        let file =
            File::open(path).map_err(|e| IndexError::Load(format!("open {path:?}: {e}")))?;
        let index: FlatIndex = bincode::deserialize_from(BufReader::new(file))
            .map_err(|e| IndexError::Load(format!("decode {path:?}: {e}")))?;
        if index.dimension != dimension {
            return Err(IndexError::DimensionMismatch {
                got: index.dimension,
                expected: dimension,
            });
        }
        Ok(index)
    }
}

fn squared_l2(a: &[f32], b: &[f32]) -> f32 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| {
            let d = x - y;
            d * d
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_insert_assigns_sequential_ordinals() {
        let mut index = FlatIndex::new(3);
        assert_eq!(index.insert(&[1.0, 0.0, 0.0]).unwrap(), 0);
        assert_eq!(index.insert(&[0.0, 1.0, 0.0]).unwrap(), 1);
        assert_eq!(index.insert(&[0.0, 0.0, 1.0]).unwrap(), 2);
        assert_eq!(index.len(), 3);
    }

    #[test]
    fn test_insert_rejects_wrong_dimension() {
        let mut index = FlatIndex::new(3);
        let err = index.insert(&[1.0, 2.0]).unwrap_err();
        assert!(matches!(
            err,
            IndexError::DimensionMismatch {
                got: 2,
                expected: 3
            }
        ));
        assert!(index.is_empty());
    }

    #[test]
    fn test_search_orders_by_distance() {
        let mut index = FlatIndex::new(2);
        index.insert(&[0.0, 0.0]).unwrap();
        index.insert(&[3.0, 4.0]).unwrap();
        index.insert(&[1.0, 0.0]).unwrap();

        let hits = index.search(&[0.0, 0.0], 3).unwrap();
        assert_eq!(hits.len(), 3);
        assert_eq!(hits[0], (0.0, 0));
        assert_eq!(hits[1], (1.0, 2));
        assert_eq!(hits[2], (25.0, 1));
    }

    #[test]
    fn test_search_clamps_k_to_len() {
        let mut index = FlatIndex::new(2);
        index.insert(&[0.0, 0.0]).unwrap();
        index.insert(&[1.0, 1.0]).unwrap();

        let hits = index.search(&[0.0, 0.0], 10).unwrap();
        assert_eq!(hits.len(), 2);
    }

    #[test]
    fn test_search_empty_index() {
        let index = FlatIndex::new(4);
        let hits = index.search(&[0.0; 4], 3).unwrap();
        assert!(hits.is_empty());
    }

    #[test]
    fn test_search_rejects_wrong_dimension_query() {
        let index = FlatIndex::new(4);
        assert!(index.search(&[0.0; 3], 1).is_err());
    }

    #[test]
    fn test_truncate_rewinds_to_prefix() {
        let mut index = FlatIndex::new(2);
        index.insert(&[0.0, 0.0]).unwrap();
        index.insert(&[5.0, 5.0]).unwrap();

        index.truncate(1);

        assert_eq!(index.len(), 1);
        let hits = index.search(&[5.0, 5.0], 2).unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].1, 0);
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("vectors.bin");

        let mut index = FlatIndex::new(2);
        index.insert(&[1.0, 2.0]).unwrap();
        index.insert(&[3.0, 4.0]).unwrap();
        index.save(&path).unwrap();

        let loaded = FlatIndex::load(&path, 2).unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded.dimension(), 2);

        let hits = loaded.search(&[1.0, 2.0], 1).unwrap();
        assert_eq!(hits[0], (0.0, 0));
    }

    #[test]
    fn test_load_missing_file_is_empty() {
        let dir = tempdir().unwrap();
        let index = FlatIndex::load(&dir.path().join("vectors.bin"), 8).unwrap();
        assert!(index.is_empty());
        assert_eq!(index.dimension(), 8);
    }

    #[test]
    fn test_load_dimension_conflict() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("vectors.bin");

        let mut index = FlatIndex::new(2);
        index.insert(&[1.0, 2.0]).unwrap();
        index.save(&path).unwrap();

        let err = FlatIndex::load(&path, 4).unwrap_err();
        assert!(matches!(
            err,
            IndexError::DimensionMismatch {
                got: 2,
                expected: 4
            }
        ));
    }

    #[test]
    fn test_save_leaves_no_temp_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("vectors.bin");

        let mut index = FlatIndex::new(2);
        index.insert(&[0.5, 0.5]).unwrap();
        index.save(&path).unwrap();

        assert!(path.exists());
        assert!(!path.with_extension("bin.tmp").exists());
    }
}
