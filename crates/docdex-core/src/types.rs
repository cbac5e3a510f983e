//! Core types shared across the docdex crates.
//!
//! - [`RetrievedDocument`]: a ranked retrieval hit
//! - [`IndexStats`]: counters for the ingestion service
//! - [`FileEvent`]: file system events for the arrival watcher
//! - image sentinel helpers: the marker text stored for image files that
//!   yield no OCR text

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Prefix of the sentinel text stored for image units.
const IMAGE_SENTINEL_PREFIX: &str = "[[image:";
const IMAGE_SENTINEL_SUFFIX: &str = "]]";

/// A retrieval hit: one indexed unit with its derived similarity.
///
/// `similarity` is `1.0 / (1.0 + distance)` for vector hits, or a fixed
/// tier (1.0 / 0.9 / 0.85) for name and content shortcut matches.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievedDocument {
    /// Display name of the owning file (not unique across units)
    pub document_name: String,
    /// Chunk text, or an image sentinel
    pub text: String,
    /// Score in (0, 1], higher is more relevant
    pub similarity: f32,
}

/// Counters kept by the ingestion service.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IndexStats {
    /// Files successfully turned into units
    pub indexed_files: u64,
    /// Files skipped because their name was already indexed
    pub skipped_duplicates: u64,
    /// Files skipped because extraction yielded no text
    pub skipped_empty: u64,
    /// Files that failed ingestion
    pub error_files: u64,
    /// Total units appended
    pub total_units: u64,
    /// Last successful ingestion
    pub last_update: Option<DateTime<Utc>>,
}

/// File system event fed to the ingestion worker.
#[derive(Debug, Clone)]
pub enum FileEvent {
    Created(PathBuf),
    Modified(PathBuf),
}

impl FileEvent {
    /// The path the event refers to.
    pub fn path(&self) -> &Path {
        match self {
            FileEvent::Created(p) | FileEvent::Modified(p) => p,
        }
    }
}

/// Build the sentinel text stored for an image file with no readable text.
pub fn image_sentinel(path: &Path) -> String {
    format!(
        "{IMAGE_SENTINEL_PREFIX}{}{IMAGE_SENTINEL_SUFFIX}",
        path.display()
    )
}

/// Returns the embedded path if `text` is an image sentinel.
pub fn parse_image_sentinel(text: &str) -> Option<&str> {
    text.strip_prefix(IMAGE_SENTINEL_PREFIX)?
        .strip_suffix(IMAGE_SENTINEL_SUFFIX)
}

/// Whether `text` is an image sentinel rather than free text.
pub fn is_image_sentinel(text: &str) -> bool {
    parse_image_sentinel(text).is_some()
}

/// Map a distance (squared L2) to a similarity in (0, 1].
///
/// Distance 0 maps to 1.0 and the score decreases monotonically; this
/// derived score, not the raw distance, is compared against thresholds.
pub fn similarity_from_distance(distance: f32) -> f32 {
    1.0 / (1.0 + distance)
}
