//! Ingestion pipeline: extract, chunk, embed, append, persist.

use docdex_chunker::ParagraphChunker;
use docdex_core::{is_image_sentinel, Error, Result};
use docdex_embed::EmbedderPool;
use docdex_extract::ExtractorRegistry;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::state::IndexState;

/// What happened to a file offered for ingestion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IngestOutcome {
    /// Appended this many units
    Indexed(usize),
    /// A file with the same name was ingested before
    SkippedDuplicate,
    /// Extraction yielded no text
    SkippedEmpty,
}

/// Turns files into indexed units.
///
/// Dedup is by file name: a second file named `Report.pdf` is skipped
/// even if its content differs. Each successful ingestion appends units
/// and rewrites the on-disk artifacts before returning.
pub struct IngestionPipeline {
    state: Arc<IndexState>,
    extractors: Arc<ExtractorRegistry>,
    chunker: ParagraphChunker,
    embedder: Arc<EmbedderPool>,
    data_dir: PathBuf,
    /// Serializes the dedup check, append and persist across callers
    persist_lock: Mutex<()>,
}

impl IngestionPipeline {
    pub fn new(
        state: Arc<IndexState>,
        extractors: Arc<ExtractorRegistry>,
        chunker: ParagraphChunker,
        embedder: Arc<EmbedderPool>,
        data_dir: PathBuf,
    ) -> Self {
        Self {
            state,
            extractors,
            chunker,
            embedder,
            data_dir,
            persist_lock: Mutex::new(()),
        }
    }

    /// Shared index state.
    pub fn state(&self) -> Arc<IndexState> {
        Arc::clone(&self.state)
    }

    /// Ingest one file.
    ///
    /// Extraction failures are absorbed as empty text and reported as
    /// [`IngestOutcome::SkippedEmpty`]; embedding failures propagate and
    /// leave the index unchanged.
    pub async fn ingest(&self, path: &Path) -> Result<IngestOutcome> {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| Error::Other(format!("path has no file name: {path:?}")))?;

        if self.state.contains_document(&name).await {
            info!(file = %name, "already indexed, skipping");
            return Ok(IngestOutcome::SkippedDuplicate);
        }

        let text = self.extractors.extract_or_empty(path).await;
        if text.trim().is_empty() {
            warn!(file = %name, "no extractable text, skipping");
            return Ok(IngestOutcome::SkippedEmpty);
        }

        // Image with no readable text: one placeholder unit, zero vector.
        if is_image_sentinel(&text) {
            let _guard = self.persist_lock.lock().await;
            if self.state.contains_document(&name).await {
                info!(file = %name, "already indexed, skipping");
                return Ok(IngestOutcome::SkippedDuplicate);
            }
            self.state.append_image_unit(&name, text).await?;
            self.state.persist(&self.data_dir).await?;
            info!(file = %name, "indexed image placeholder");
            return Ok(IngestOutcome::Indexed(1));
        }

        let chunks = self.chunker.chunk(&text);
        if chunks.is_empty() {
            warn!(file = %name, "text produced no chunks, skipping");
            return Ok(IngestOutcome::SkippedEmpty);
        }

        let chunk_refs: Vec<&str> = chunks.iter().map(String::as_str).collect();
        let vectors = self
            .embedder
            .embed(&chunk_refs)
            .await
            .map_err(Error::Embedding)?;

        debug!(file = %name, units = chunks.len(), "embedding complete");

        let units: Vec<(String, Vec<f32>)> = chunks.into_iter().zip(vectors).collect();

        let _guard = self.persist_lock.lock().await;
        // Re-check under the lock: a concurrent ingestion of the same name
        // may have appended while this one was extracting and embedding.
        if self.state.contains_document(&name).await {
            info!(file = %name, "already indexed, skipping");
            return Ok(IngestOutcome::SkippedDuplicate);
        }
        let count = self.state.append_units(&name, units).await?;
        self.state.persist(&self.data_dir).await?;

        info!(file = %name, units = count, "indexed");
        Ok(IngestOutcome::Indexed(count))
    }
}
