//! Deterministic hash-based embedder.

use async_trait::async_trait;
use docdex_core::{EmbedError, Embedder};

use crate::DEFAULT_DIMENSION;

/// Deterministic embedder that derives vectors from a blake3 digest of
/// the input text.
///
/// Identical inputs always produce identical vectors, so indexing and
/// retrieval behave reproducibly without a model runtime. Similar texts
/// do not map to nearby vectors; this provider is for local operation
/// and testing, not semantic quality.
pub struct HashEmbedder {
    dimension: usize,
}

impl HashEmbedder {
    pub fn new() -> Self {
        Self {
            dimension: DEFAULT_DIMENSION,
        }
    }

    pub fn with_dimension(dimension: usize) -> Self {
        Self { dimension }
    }

    fn embed_one(&self, text: &str) -> Vec<f32> {
        let digest = blake3::hash(text.as_bytes());
        let bytes = digest.as_bytes();
        (0..self.dimension)
            .map(|i| (f32::from(bytes[i % 32]) / 255.0) - 0.5)
            .collect()
    }
}

impl Default for HashEmbedder {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Embedder for HashEmbedder {
    fn model_name(&self) -> &str {
        "hash-blake3"
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    async fn embed(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbedError> {
        Ok(texts.iter().map(|t| self.embed_one(t)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_deterministic() {
        let embedder = HashEmbedder::new();
        let a = embedder.embed(&["the weather is sunny"]).await.unwrap();
        let b = embedder.embed(&["the weather is sunny"]).await.unwrap();
        assert_eq!(a, b);
    }

    #[tokio::test]
    async fn test_distinct_inputs_differ() {
        let embedder = HashEmbedder::new();
        let vectors = embedder.embed(&["alpha", "beta"]).await.unwrap();
        assert_ne!(vectors[0], vectors[1]);
    }

    #[tokio::test]
    async fn test_values_bounded() {
        let embedder = HashEmbedder::with_dimension(64);
        let vectors = embedder.embed(&["bounded"]).await.unwrap();
        assert_eq!(vectors[0].len(), 64);
        assert!(vectors[0].iter().all(|&x| (-0.5..=0.5).contains(&x)));
    }
}
