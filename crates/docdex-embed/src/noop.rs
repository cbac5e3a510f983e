//! No-op embedder producing zero vectors.

use async_trait::async_trait;
use docdex_core::{EmbedError, Embedder};

use crate::DEFAULT_DIMENSION;

/// An embedder that returns all-zero vectors.
///
/// Useful for tests and for running the ingestion pipeline without an
/// embedding provider.
pub struct NoopEmbedder {
    dimension: usize,
}

impl NoopEmbedder {
    pub fn new() -> Self {
        Self {
            dimension: DEFAULT_DIMENSION,
        }
    }

    pub fn with_dimension(dimension: usize) -> Self {
        Self { dimension }
    }
}

impl Default for NoopEmbedder {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Embedder for NoopEmbedder {
    fn model_name(&self) -> &str {
        "noop"
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    async fn embed(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbedError> {
        Ok(texts.iter().map(|_| vec![0.0; self.dimension]).collect())
    }
}
