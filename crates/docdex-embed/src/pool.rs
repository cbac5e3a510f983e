//! Embedder pool with concurrency limiting and per-call timeouts.

use docdex_core::{EmbedError, Embedder};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;

/// Wraps an embedder with a concurrency cap and a per-call timeout.
///
/// The embedding provider is an external service; a hung call must not
/// stall ingestion forever, so every call is raced against a deadline.
pub struct EmbedderPool {
    embedder: Arc<dyn Embedder>,
    /// Semaphore limiting concurrent provider calls
    semaphore: Semaphore,
    max_concurrent: usize,
    timeout: Duration,
}

impl EmbedderPool {
    /// Create a new pool around `embedder`.
    pub fn new(embedder: Arc<dyn Embedder>, max_concurrent: usize, timeout: Duration) -> Self {
        Self {
            embedder,
            semaphore: Semaphore::new(max_concurrent),
            max_concurrent,
            timeout,
        }
    }

    /// Get the embedding dimension.
    pub fn dimension(&self) -> usize {
        self.embedder.dimension()
    }

    /// Get the model name.
    pub fn model_name(&self) -> &str {
        self.embedder.model_name()
    }

    /// Get the underlying embedder.
    pub fn embedder(&self) -> Arc<dyn Embedder> {
        Arc::clone(&self.embedder)
    }

    /// Embed a batch of texts.
    ///
    /// Each returned vector has [`dimension`](Self::dimension) entries,
    /// or the call fails with [`EmbedError::Timeout`] if the provider
    /// does not answer within the deadline.
    pub async fn embed(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbedError> {
        let _permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|e| EmbedError::Provider(format!("semaphore error: {e}")))?;

        match tokio::time::timeout(self.timeout, self.embedder.embed(texts)).await {
            Ok(result) => result,
            Err(_) => Err(EmbedError::Timeout(self.timeout.as_millis() as u64)),
        }
    }

    /// Embed a single query.
    pub async fn embed_query(&self, query: &str) -> Result<Vec<f32>, EmbedError> {
        let _permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|e| EmbedError::Provider(format!("semaphore error: {e}")))?;

        match tokio::time::timeout(self.timeout, self.embedder.embed_query(query)).await {
            Ok(result) => result,
            Err(_) => Err(EmbedError::Timeout(self.timeout.as_millis() as u64)),
        }
    }

    /// Get currently available permits.
    pub fn available_permits(&self) -> usize {
        self.semaphore.available_permits()
    }

    /// Get max concurrent operations.
    pub fn max_concurrent(&self) -> usize {
        self.max_concurrent
    }
}
