//! # docdex-chunker
//!
//! Paragraph-based chunking for the docdex ingestion pipeline.
//!
//! The [`ParagraphChunker`] splits extracted text into bounded-size chunks
//! along paragraph boundaries, keeping each chunk below a configured
//! maximum length.

pub mod paragraph;

pub use paragraph::ParagraphChunker;
