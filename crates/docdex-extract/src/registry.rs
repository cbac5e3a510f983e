//! Extractor registry: the extraction boundary used by ingestion.

use docdex_core::{ContentExtractor, ExtractError};
use std::path::Path;
use std::sync::Arc;
use tracing::warn;

/// Registry of content extractors, dispatching by file extension.
pub struct ExtractorRegistry {
    extractors: Vec<Arc<dyn ContentExtractor>>,
}

impl ExtractorRegistry {
    /// Create a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            extractors: Vec::new(),
        }
    }

    /// Register an extractor. Earlier registrations win on overlap.
    pub fn register<E: ContentExtractor + 'static>(&mut self, extractor: E) {
        self.extractors.push(Arc::new(extractor));
    }

    /// Find an extractor for the given file, if any.
    #[must_use]
    pub fn get_for_file(&self, path: &Path) -> Option<Arc<dyn ContentExtractor>> {
        self.extractors
            .iter()
            .find(|e| e.can_extract(path))
            .cloned()
    }

    /// Extract text from a file, surfacing extractor errors.
    pub async fn extract(&self, path: &Path) -> Result<String, ExtractError> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default();
        let extractor = self
            .get_for_file(path)
            .ok_or_else(|| ExtractError::UnsupportedType(extension.to_string()))?;

        extractor.extract(path).await
    }

    /// Extract text for ingestion: unsupported extensions and extraction
    /// failures both collapse to an empty string so batch imports keep
    /// going past one bad file.
    pub async fn extract_or_empty(&self, path: &Path) -> String {
        match self.extract(path).await {
            Ok(text) => text,
            Err(ExtractError::UnsupportedType(ext)) => {
                warn!("Skipping {:?}: unsupported extension {:?}", path, ext);
                String::new()
            }
            Err(e) => {
                warn!("Extraction failed for {:?}: {e}", path);
                String::new()
            }
        }
    }
}

impl Default for ExtractorRegistry {
    fn default() -> Self {
        Self::new()
    }
}
