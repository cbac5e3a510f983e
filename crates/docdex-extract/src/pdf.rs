//! PDF extractor.
//!
//! Tries the OCR backend first (scanned PDFs carry no text layer), then
//! falls back to `pdf-extract` page text.

use async_trait::async_trait;
use docdex_core::{ContentExtractor, ExtractError, OcrBackend};
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

/// Extractor for PDF files.
pub struct PdfExtractor {
    ocr: Arc<dyn OcrBackend>,
}

impl PdfExtractor {
    /// Create a PDF extractor backed by the given OCR service.
    pub fn new(ocr: Arc<dyn OcrBackend>) -> Self {
        Self { ocr }
    }
}

#[async_trait]
impl ContentExtractor for PdfExtractor {
    fn supported_extensions(&self) -> &[&str] {
        &["pdf"]
    }

    async fn extract(&self, path: &Path) -> Result<String, ExtractError> {
        debug!("Extracting PDF: {:?}", path);

        // OCR pass: covers scanned documents without a text layer.
        if let Some(text) = self.ocr.read(path).await? {
            if !text.trim().is_empty() {
                return Ok(text);
            }
        }

        // Fallback: embedded page text.
        let path = path.to_path_buf();
        let text = tokio::task::spawn_blocking(move || pdf_extract::extract_text(&path))
            .await
            .map_err(|e| ExtractError::Failed(format!("task join error: {e}")))?
            .map_err(|e| ExtractError::Parse(format!("pdf text extraction failed: {e}")))?;

        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docdex_core::NoopOcr;

    struct FixedOcr(Option<String>);

    #[async_trait]
    impl OcrBackend for FixedOcr {
        async fn read(&self, _path: &Path) -> Result<Option<String>, ExtractError> {
            Ok(self.0.clone())
        }
    }

    #[test]
    fn test_supported_extensions() {
        let extractor = PdfExtractor::new(Arc::new(NoopOcr));
        assert!(extractor.can_extract(Path::new("/a/report.pdf")));
        assert!(extractor.can_extract(Path::new("/a/REPORT.PDF")));
        assert!(!extractor.can_extract(Path::new("/a/report.txt")));
    }

    #[tokio::test]
    async fn test_ocr_text_wins() {
        let extractor = PdfExtractor::new(Arc::new(FixedOcr(Some("ocr text".to_string()))));
        let text = extractor.extract(Path::new("/a/scan.pdf")).await.unwrap();
        assert_eq!(text, "ocr text");
    }

    #[tokio::test]
    async fn test_whitespace_ocr_falls_through_to_page_text() {
        // OCR that returns whitespace is treated as no result; the page-text
        // pass then fails on this nonexistent file, which is what we assert.
        let extractor = PdfExtractor::new(Arc::new(FixedOcr(Some("   \n ".to_string()))));
        let result = extractor.extract(Path::new("/nonexistent/scan.pdf")).await;
        assert!(result.is_err());
    }
}
