//! Plain text extractor.

use async_trait::async_trait;
use docdex_core::{ContentExtractor, ExtractError};
use std::path::Path;
use tokio::fs;

/// Extractor for plain text files.
pub struct TextExtractor;

impl TextExtractor {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Default for TextExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ContentExtractor for TextExtractor {
    fn supported_extensions(&self) -> &[&str] {
        &["txt", "md"]
    }

    async fn extract(&self, path: &Path) -> Result<String, ExtractError> {
        let bytes = fs::read(path).await?;
        // Uploaded text files are not always clean UTF-8; keep what we can.
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}
