//! Shared index state: flat index plus document store under one lock.

use docdex_core::{IndexError, Result};
use std::path::Path;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::flat::FlatIndex;
use crate::store::DocumentStore;

/// Artifact file name for the serialized vector index.
pub const VECTORS_FILE: &str = "vectors.bin";

struct Inner {
    index: FlatIndex,
    store: DocumentStore,
}

/// The index and store behind a single lock.
///
/// All writes go through this type, which is what keeps the ordinal of
/// every vector equal to the position of its text and name. Readers see
/// either the state before an append or after it, never a half-applied
/// one.
pub struct IndexState {
    inner: RwLock<Inner>,
}

impl IndexState {
    /// Create empty state for `dimension`-sized vectors.
    pub fn new(dimension: usize) -> Self {
        Self {
            inner: RwLock::new(Inner {
                index: FlatIndex::new(dimension),
                store: DocumentStore::new(),
            }),
        }
    }

    /// Load state from the artifacts under `dir`, or start empty if
    /// none exist.
    ///
    /// The three artifacts are renamed into place one at a time, so a
    /// crash mid-persist can leave them at unequal lengths. Appends only
    /// ever extend the artifacts, which makes the shorter one a prefix
    /// of the longer; loading keeps that common prefix, the last state
    /// every artifact agreed on.
    pub fn load(dir: &Path, dimension: usize) -> Result<Self> {
        let mut index = FlatIndex::load(&dir.join(VECTORS_FILE), dimension)?;
        let mut store = DocumentStore::load(dir)?;

        if index.len() != store.len() {
            let keep = index.len().min(store.len());
            warn!(
                vectors = index.len(),
                units = store.len(),
                keep,
                "artifacts disagree after interrupted persist, keeping common prefix"
            );
            index.truncate(keep);
            store.truncate(keep);
        }

        debug!(units = store.len(), "loaded index state");
        Ok(Self {
            inner: RwLock::new(Inner { index, store }),
        })
    }

    /// Number of indexed units.
    pub async fn len(&self) -> usize {
        self.inner.read().await.store.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.store.is_empty()
    }

    /// Number of distinct ingested files.
    pub async fn document_count(&self) -> usize {
        self.inner.read().await.store.document_count()
    }

    /// Distinct file names currently indexed.
    pub async fn document_names(&self) -> Vec<String> {
        self.inner
            .read()
            .await
            .store
            .document_names()
            .map(String::from)
            .collect()
    }

    /// Whether a file with this display name was already ingested.
    pub async fn contains_document(&self, name: &str) -> bool {
        self.inner.read().await.store.contains_document(name)
    }

    /// Append all units of one file.
    ///
    /// Every vector is validated against the index dimension before
    /// anything is written, so a bad batch leaves the state untouched.
    pub async fn append_units(
        &self,
        name: &str,
        units: Vec<(String, Vec<f32>)>,
    ) -> Result<usize> {
        let mut inner = self.inner.write().await;

        let expected = inner.index.dimension();
        for (_, vector) in &units {
            if vector.len() != expected {
                return Err(IndexError::DimensionMismatch {
                    got: vector.len(),
                    expected,
                }
                .into());
            }
        }

        let count = units.len();
        for (text, vector) in units {
            let ordinal = inner.index.insert(&vector)?;
            let position = inner.store.append(name.to_string(), text);
            debug_assert_eq!(ordinal, position);
        }
        Ok(count)
    }

    /// Append one image unit with an all-zero placeholder vector.
    ///
    /// Images with no readable text still occupy an index slot so the
    /// alignment with the store holds; the zero vector keeps them out
    /// of any realistic query neighborhood.
    pub async fn append_image_unit(&self, name: &str, sentinel: String) -> Result<()> {
        let mut inner = self.inner.write().await;
        let zero = vec![0.0; inner.index.dimension()];
        let ordinal = inner.index.insert(&zero)?;
        let position = inner.store.append(name.to_string(), sentinel);
        debug_assert_eq!(ordinal, position);
        Ok(())
    }

    /// Nearest-neighbor search over the current snapshot.
    ///
    /// Returns `(distance, name, text)` triples in ascending distance
    /// order, at most `min(k, len)` of them.
    pub async fn search(&self, query: &[f32], k: usize) -> Result<Vec<(f32, String, String)>> {
        let inner = self.inner.read().await;
        let hits = inner.index.search(query, k)?;
        Ok(hits
            .into_iter()
            .filter_map(|(distance, ordinal)| {
                inner
                    .store
                    .get(ordinal)
                    .map(|(name, text)| (distance, name.to_string(), text.to_string()))
            })
            .collect())
    }

    /// All units as `(name, text)` pairs, in insertion order.
    pub async fn all_units(&self) -> Vec<(String, String)> {
        self.inner
            .read()
            .await
            .store
            .iter()
            .map(|(_, name, text)| (name.to_string(), text.to_string()))
            .collect()
    }

    /// Write all three artifacts under `dir`.
    ///
    /// Each artifact goes through its own temp-file-and-rename, so a
    /// crash between renames can leave them at unequal lengths. [`load`]
    /// reconciles that by rewinding to the common prefix.
    ///
    /// [`load`]: IndexState::load
    pub async fn persist(&self, dir: &Path) -> Result<()> {
        let inner = self.inner.read().await;
        inner.index.save(&dir.join(VECTORS_FILE))?;
        inner.store.save(dir)?;
        debug!(units = inner.store.len(), "persisted index state");
        Ok(())
    }
}
