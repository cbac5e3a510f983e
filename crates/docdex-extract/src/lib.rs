//! # docdex-extract
//!
//! Content extraction for the docdex ingestion pipeline.
//!
//! Files are dispatched by extension to one of three extractors:
//!
//! | Extractor | Formats | Strategy |
//! |-----------|---------|----------|
//! | [`TextExtractor`] | `.txt`, `.md` | UTF-8 read (lossy on invalid bytes) |
//! | [`PdfExtractor`] | `.pdf` | OCR backend first, page-text fallback |
//! | [`ImageExtractor`] | `.png`, `.jpg`, `.jpeg` | OCR backend, sentinel fallback |
//!
//! The [`ExtractorRegistry`] is the boundary used by ingestion: it returns
//! plain text, mapping unsupported extensions and extraction failures to
//! an empty string so one bad file never aborts a batch.

pub mod image;
pub mod pdf;
pub mod registry;
pub mod text;

pub use image::ImageExtractor;
pub use pdf::PdfExtractor;
pub use registry::ExtractorRegistry;
pub use text::TextExtractor;
