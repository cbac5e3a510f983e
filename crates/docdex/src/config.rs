//! Configuration handling for docdex.

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Storage locations
    #[serde(default)]
    pub storage: StorageConfig,

    /// Index configuration
    #[serde(default)]
    pub index: IndexConfig,

    /// Chunking configuration
    #[serde(default)]
    pub chunking: ChunkingConfig,

    /// Embedding configuration
    #[serde(default)]
    pub embedding: EmbeddingConfig,

    /// Query configuration
    #[serde(default)]
    pub query: QueryConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Where artifacts and uploads live.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StorageConfig {
    /// Directory for index artifacts (default: XDG data dir)
    pub data_dir: Option<PathBuf>,

    /// Directory watched for new documents (default: `<data_dir>/uploads`)
    pub upload_dir: Option<PathBuf>,
}

/// Index-related configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexConfig {
    /// Embedding vector dimension
    #[serde(default = "default_dimension")]
    pub dimension: usize,

    /// Debounce duration for the file watcher (ms)
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
}

fn default_dimension() -> usize {
    384
}

fn default_debounce_ms() -> u64 {
    500
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            dimension: default_dimension(),
            debounce_ms: default_debounce_ms(),
        }
    }
}

/// Chunking-related configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkingConfig {
    /// Maximum chunk length (characters)
    #[serde(default = "default_max_length")]
    pub max_length: usize,
}

fn default_max_length() -> usize {
    500
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            max_length: default_max_length(),
        }
    }
}

/// Embedding-related configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    /// Max concurrent embedding calls
    #[serde(default = "default_max_concurrent")]
    pub max_concurrent: usize,

    /// Per-call timeout (ms)
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_max_concurrent() -> usize {
    4
}

fn default_timeout_ms() -> u64 {
    30_000
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            max_concurrent: default_max_concurrent(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

/// Query-related configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryConfig {
    /// Neighbors fetched per vector search
    #[serde(default = "default_k")]
    pub k: usize,

    /// Minimum similarity for vector hits
    #[serde(default = "default_threshold")]
    pub threshold: f32,

    /// Minimum edit similarity for fuzzy shortcuts
    #[serde(default = "default_cutoff")]
    pub cutoff: f32,
}

fn default_k() -> usize {
    3
}

fn default_threshold() -> f32 {
    0.5
}

fn default_cutoff() -> f32 {
    0.6
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            k: default_k(),
            threshold: default_threshold(),
            cutoff: default_cutoff(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Config {
    /// Load from the default config path, falling back to defaults if
    /// no file exists.
    pub fn load() -> anyhow::Result<Self> {
        Self::load_from(Self::config_path())
    }

    /// Load from an explicit path, falling back to defaults if `path`
    /// is `None` or the file does not exist.
    pub fn load_from(path: Option<PathBuf>) -> anyhow::Result<Self> {
        match path {
            Some(p) if p.exists() => {
                let raw = std::fs::read_to_string(&p)?;
                Ok(toml::from_str(&raw)?)
            }
            _ => Ok(Self::default()),
        }
    }

    /// Default config file path.
    pub fn config_path() -> Option<PathBuf> {
        config_dir().map(|d| d.join("config.toml"))
    }

    /// Sample configuration file with all defaults spelled out.
    pub fn sample_toml() -> String {
        // Defaults always serialize
        toml::to_string_pretty(&Self::default()).unwrap_or_default()
    }

    /// Resolved artifact directory.
    pub fn data_dir(&self) -> anyhow::Result<PathBuf> {
        if let Some(ref dir) = self.storage.data_dir {
            return Ok(dir.clone());
        }
        data_dir().ok_or_else(|| anyhow::anyhow!("could not determine data directory"))
    }

    /// Resolved upload directory.
    pub fn upload_dir(&self) -> anyhow::Result<PathBuf> {
        if let Some(ref dir) = self.storage.upload_dir {
            return Ok(dir.clone());
        }
        Ok(self.data_dir()?.join("uploads"))
    }
}

/// Get the XDG data directory for docdex.
pub fn data_dir() -> Option<PathBuf> {
    if let Ok(dir) = std::env::var("DOCDEX_DATA_DIR") {
        return Some(PathBuf::from(dir));
    }

    ProjectDirs::from("", "", "docdex").map(|dirs| dirs.data_dir().to_path_buf())
}

/// Get the XDG config directory for docdex.
pub fn config_dir() -> Option<PathBuf> {
    if let Ok(dir) = std::env::var("DOCDEX_CONFIG_DIR") {
        return Some(PathBuf::from(dir));
    }

    ProjectDirs::from("", "", "docdex").map(|dirs| dirs.config_dir().to_path_buf())
}
