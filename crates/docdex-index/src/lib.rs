//! # docdex-index
//!
//! Vector index, document store, and the ingestion side of docdex.
//!
//! - [`FlatIndex`]: exact squared-L2 search over fixed-dimension vectors
//! - [`DocumentStore`]: per-unit names and texts, position-aligned with
//!   the index
//! - [`IndexState`]: both behind one lock, with persistence
//! - [`IngestionPipeline`]: extract, chunk, embed, append, persist
//! - [`IngestService`]: directory watcher plus a single ingestion worker

pub mod flat;
pub mod pipeline;
pub mod service;
pub mod state;
pub mod store;
pub mod watcher;

pub use flat::FlatIndex;
pub use pipeline::{IngestOutcome, IngestionPipeline};
pub use service::{IngestService, IngestUpdate};
pub use state::{IndexState, VECTORS_FILE};
pub use store::DocumentStore;
pub use watcher::FileWatcher;
