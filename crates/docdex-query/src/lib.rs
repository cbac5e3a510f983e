//! # docdex-query
//!
//! Query-time retrieval for docdex: single vector queries with
//! similarity thresholding, and multi-topic queries with exact and
//! fuzzy name/content shortcuts.

pub mod engine;
pub mod fuzzy;

pub use engine::{RetrievalConfig, RetrievalEngine};
