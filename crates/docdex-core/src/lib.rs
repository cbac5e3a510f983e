//! # docdex-core
//!
//! Core types and traits for docdex, a document indexing and retrieval
//! engine for retrieval-augmented chat assistants.
//!
//! This crate provides the foundational abstractions used throughout docdex:
//!
//! - **Content Extraction**: [`ContentExtractor`] trait for turning files into text
//! - **Embedding Generation**: [`Embedder`] trait for mapping text to dense vectors
//! - **OCR Backend**: [`OcrBackend`] trait, the seam to an external OCR service
//!
//! ## Architecture
//!
//! The crates are organized around a pipeline:
//!
//! ```text
//! File → ContentExtractor → ParagraphChunker → Embedder → IndexState
//!                                                             ↓
//!                                                   retrieve / multi_topic_search
//! ```
//!
//! Every indexed unit is a position-aligned (vector, document name, text)
//! triple; the index crate enforces that alignment by construction.
//!
//! ## Related Crates
//!
//! - `docdex-extract`: content extraction implementations
//! - `docdex-chunker`: paragraph-based chunking
//! - `docdex-embed`: embedding providers and the concurrency pool
//! - `docdex-index`: flat vector index, document store, ingestion pipeline
//! - `docdex-query`: retrieval engine with multi-topic search

pub mod error;
pub mod traits;
pub mod types;

pub use error::{ChunkError, EmbedError, Error, ExtractError, IndexError, Result};
pub use traits::*;
pub use types::*;
