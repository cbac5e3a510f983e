//! Error types for docdex.

use thiserror::Error;

/// Main error type for docdex operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Content extraction failed
    #[error("extraction error: {0}")]
    Extraction(#[from] ExtractError),

    /// Chunking failed
    #[error("chunking error: {0}")]
    Chunking(#[from] ChunkError),

    /// Embedding generation failed
    #[error("embedding error: {0}")]
    Embedding(#[from] EmbedError),

    /// Index or document store operation failed
    #[error("index error: {0}")]
    Index(#[from] IndexError),

    /// I/O error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration error
    #[error("config error: {0}")]
    Config(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

/// Content extraction errors.
///
/// These are recovered at the registry boundary: a file that fails to
/// extract yields empty text and the batch continues.
#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("unsupported file type: {0}")]
    UnsupportedType(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("ocr error: {0}")]
    Ocr(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("extraction failed: {0}")]
    Failed(String),
}

/// Chunking errors.
#[derive(Error, Debug)]
pub enum ChunkError {
    #[error("chunking failed: {0}")]
    Failed(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Embedding errors.
///
/// The provider is an external collaborator: a failed or timed-out call
/// fails the current ingestion or query but never corrupts index state.
#[derive(Error, Debug)]
pub enum EmbedError {
    #[error("provider error: {0}")]
    Provider(String),

    #[error("embedding call timed out after {0} ms")]
    Timeout(u64),

    #[error("dimension mismatch: got {got}, index expects {expected}")]
    DimensionMismatch { got: usize, expected: usize },
}

/// Vector index / document store errors.
#[derive(Error, Debug)]
pub enum IndexError {
    #[error("index load failed: {0}")]
    Load(String),

    #[error("index persistence failed: {0}")]
    Persist(String),

    #[error("dimension mismatch: got {got}, index expects {expected}")]
    DimensionMismatch { got: usize, expected: usize },
}

/// Result type alias for docdex operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_error_unsupported_type_display() {
        let err = ExtractError::UnsupportedType("docx".to_string());
        assert_eq!(err.to_string(), "unsupported file type: docx");
    }

    #[test]
    fn test_extract_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let err: ExtractError = io_err.into();
        assert!(matches!(err, ExtractError::Io(_)));
    }

    #[test]
    fn test_embed_error_timeout_display() {
        let err = EmbedError::Timeout(5000);
        assert_eq!(err.to_string(), "embedding call timed out after 5000 ms");
    }

    #[test]
    fn test_embed_error_dimension_mismatch_display() {
        let err = EmbedError::DimensionMismatch {
            got: 512,
            expected: 384,
        };
        assert_eq!(
            err.to_string(),
            "dimension mismatch: got 512, index expects 384"
        );
    }

    #[test]
    fn test_index_error_persist_display() {
        let err = IndexError::Persist("disk full".to_string());
        assert_eq!(err.to_string(), "index persistence failed: disk full");
    }

    #[test]
    fn test_error_from_extract_error() {
        let extract_err = ExtractError::Parse("bad pdf".to_string());
        let err: Error = extract_err.into();
        assert!(matches!(err, Error::Extraction(_)));
        assert!(err.to_string().contains("bad pdf"));
    }

    #[test]
    fn test_error_from_embed_error() {
        let embed_err = EmbedError::Provider("connection refused".to_string());
        let err: Error = embed_err.into();
        assert!(matches!(err, Error::Embedding(_)));
        assert!(err.to_string().contains("connection refused"));
    }

    #[test]
    fn test_error_from_index_error() {
        let index_err = IndexError::Load("corrupt artifact".to_string());
        let err: Error = index_err.into();
        assert!(matches!(err, Error::Index(_)));
    }

    #[test]
    fn test_error_chain_io_to_extract_to_main() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file.txt not found");
        let extract_err: ExtractError = io_err.into();
        let main_err: Error = extract_err.into();

        assert!(matches!(main_err, Error::Extraction(ExtractError::Io(_))));
        assert!(main_err.to_string().contains("extraction error"));
    }

    #[test]
    fn test_result_type_alias() {
        fn ok_fn() -> Result<i32> {
            Ok(42)
        }

        fn err_fn() -> Result<i32> {
            Err(Error::Other("test failure".to_string()))
        }

        assert!(ok_fn().is_ok());
        assert!(err_fn().is_err());
    }
}
