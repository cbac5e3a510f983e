//! Trait seams for the docdex pipeline.
//!
//! - [`ContentExtractor`]: turn a file into plain text
//! - [`Embedder`]: map text to fixed-dimension dense vectors
//! - [`OcrBackend`]: external OCR collaborator used by PDF/image extraction
//!
//! These traits keep the pipeline pluggable: the index and query crates
//! only ever see the trait objects.

use async_trait::async_trait;
use std::path::Path;

use crate::error::{EmbedError, ExtractError};

/// Trait for extracting plain text from files.
#[async_trait]
pub trait ContentExtractor: Send + Sync {
    /// File extensions (lowercase, without dot) this extractor handles.
    fn supported_extensions(&self) -> &[&str];

    /// Check if this extractor can handle the given file.
    fn can_extract(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| {
                self.supported_extensions()
                    .contains(&ext.to_lowercase().as_str())
            })
    }

    /// Extract text from a file. May return an empty string.
    async fn extract(&self, path: &Path) -> Result<String, ExtractError>;
}

/// Trait for generating embeddings.
///
/// Implementations must be deterministic for identical input and produce
/// the same dimensionality for every call within a process lifetime; the
/// index relies on both.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Model name/identifier.
    fn model_name(&self) -> &str;

    /// Embedding dimension.
    fn dimension(&self) -> usize;

    /// Embed a batch of texts, one vector per input.
    async fn embed(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbedError>;

    /// Embed a single query.
    async fn embed_query(&self, query: &str) -> Result<Vec<f32>, EmbedError> {
        let mut results = self.embed(&[query]).await?;
        results
            .pop()
            .ok_or_else(|| EmbedError::Provider("empty embedding result".to_string()))
    }
}

/// External OCR collaborator.
///
/// The underlying service may be submit/poll/fetch; implementations hide
/// that behind a single async call. `Ok(None)` means the backend could
/// not read any text from the file.
#[async_trait]
pub trait OcrBackend: Send + Sync {
    /// Read text from a file, if the backend can.
    async fn read(&self, path: &Path) -> Result<Option<String>, ExtractError>;
}

/// OCR backend that never reads anything.
///
/// Used when no OCR service is configured: PDFs fall through to the
/// page-text extractor and images fall through to the sentinel.
pub struct NoopOcr;

#[async_trait]
impl OcrBackend for NoopOcr {
    async fn read(&self, _path: &Path) -> Result<Option<String>, ExtractError> {
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    struct FixedExtractor;

    #[async_trait]
    impl ContentExtractor for FixedExtractor {
        fn supported_extensions(&self) -> &[&str] {
            &["txt", "md"]
        }

        async fn extract(&self, _path: &Path) -> Result<String, ExtractError> {
            Ok("fixed".to_string())
        }
    }

    #[test]
    fn test_can_extract_by_extension() {
        let extractor = FixedExtractor;
        assert!(extractor.can_extract(&PathBuf::from("/a/notes.txt")));
        assert!(extractor.can_extract(&PathBuf::from("/a/README.MD")));
        assert!(!extractor.can_extract(&PathBuf::from("/a/photo.png")));
        assert!(!extractor.can_extract(&PathBuf::from("/a/no_extension")));
    }

    struct ConstEmbedder;

    #[async_trait]
    impl Embedder for ConstEmbedder {
        fn model_name(&self) -> &str {
            "const"
        }

        fn dimension(&self) -> usize {
            3
        }

        async fn embed(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbedError> {
            Ok(texts.iter().map(|_| vec![1.0, 0.0, 0.0]).collect())
        }
    }

    #[tokio::test]
    async fn test_embed_query_default_impl() {
        let embedder = ConstEmbedder;
        let vec = embedder.embed_query("hello").await.unwrap();
        assert_eq!(vec, vec![1.0, 0.0, 0.0]);
    }

    #[tokio::test]
    async fn test_noop_ocr_reads_nothing() {
        let ocr = NoopOcr;
        let result = ocr.read(Path::new("/a/scan.pdf")).await.unwrap();
        assert!(result.is_none());
    }
}
