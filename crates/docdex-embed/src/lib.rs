//! # docdex-embed
//!
//! Embedding providers for docdex.
//!
//! The real provider is an external service behind the
//! [`Embedder`](docdex_core::Embedder) trait; this crate ships:
//!
//! - [`HashEmbedder`]: deterministic blake3-derived vectors, the default
//!   local provider when no external service is configured
//! - [`NoopEmbedder`]: zero vectors, for tests and development
//! - [`EmbedderPool`]: concurrency limiting and per-call timeouts around
//!   any provider

pub mod hash;
pub mod noop;
pub mod pool;

pub use hash::HashEmbedder;
pub use noop::NoopEmbedder;
pub use pool::EmbedderPool;

/// Default embedding dimension (all-MiniLM class models).
pub const DEFAULT_DIMENSION: usize = 384;
