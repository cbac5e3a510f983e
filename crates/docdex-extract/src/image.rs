//! Image extractor.
//!
//! Runs the OCR backend over raster images; when nothing is readable the
//! extractor returns an image sentinel instead of text, so the file is
//! still indexed as a reference.

use async_trait::async_trait;
use docdex_core::{image_sentinel, ContentExtractor, ExtractError, OcrBackend};
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

/// Extractor for raster image files.
pub struct ImageExtractor {
    ocr: Arc<dyn OcrBackend>,
}

impl ImageExtractor {
    /// Create an image extractor backed by the given OCR service.
    pub fn new(ocr: Arc<dyn OcrBackend>) -> Self {
        Self { ocr }
    }
}

#[async_trait]
impl ContentExtractor for ImageExtractor {
    fn supported_extensions(&self) -> &[&str] {
        &["png", "jpg", "jpeg"]
    }

    async fn extract(&self, path: &Path) -> Result<String, ExtractError> {
        debug!("Extracting image: {:?}", path);

        match self.ocr.read(path).await? {
            Some(text) if !text.trim().is_empty() => Ok(text),
            _ => Ok(image_sentinel(path)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docdex_core::{is_image_sentinel, parse_image_sentinel, NoopOcr};

    struct FixedOcr(Option<String>);

    #[async_trait]
    impl OcrBackend for FixedOcr {
        async fn read(&self, _path: &Path) -> Result<Option<String>, ExtractError> {
            Ok(self.0.clone())
        }
    }

    #[test]
    fn test_supported_extensions() {
        let extractor = ImageExtractor::new(Arc::new(NoopOcr));
        assert!(extractor.can_extract(Path::new("/a/photo.png")));
        assert!(extractor.can_extract(Path::new("/a/photo.jpg")));
        assert!(extractor.can_extract(Path::new("/a/photo.JPEG")));
        assert!(!extractor.can_extract(Path::new("/a/photo.gif")));
    }

    #[tokio::test]
    async fn test_ocr_text_returned_when_readable() {
        let extractor = ImageExtractor::new(Arc::new(FixedOcr(Some("scanned words".to_string()))));
        let text = extractor.extract(Path::new("/a/scan.png")).await.unwrap();
        assert_eq!(text, "scanned words");
    }

    #[tokio::test]
    async fn test_sentinel_when_ocr_empty() {
        let extractor = ImageExtractor::new(Arc::new(NoopOcr));
        let text = extractor.extract(Path::new("/a/diagram.png")).await.unwrap();

        assert!(is_image_sentinel(&text));
        assert_eq!(parse_image_sentinel(&text), Some("/a/diagram.png"));
    }

    #[tokio::test]
    async fn test_sentinel_when_ocr_whitespace() {
        let extractor = ImageExtractor::new(Arc::new(FixedOcr(Some("  \n".to_string()))));
        let text = extractor.extract(Path::new("/a/blank.jpg")).await.unwrap();
        assert!(is_image_sentinel(&text));
    }
}
