//! # docdex CLI
//!
//! Command-line interface for docdex, a document indexing and retrieval
//! core for retrieval-augmented assistants.
//!
//! ## Commands
//!
//! - `docdex ingest <PATH>` - Index a file or every file in a directory
//! - `docdex watch` - Watch the upload directory and index arrivals
//! - `docdex query <QUERY>` - Retrieve ranked document fragments
//! - `docdex status` - Show index statistics
//! - `docdex config` - Manage configuration
//!
//! ## Examples
//!
//! ```bash
//! # Index a directory of documents
//! docdex ingest ~/Documents/reports
//!
//! # Single-query retrieval
//! docdex query "quarterly revenue forecast"
//!
//! # Multi-topic retrieval with JSON output
//! docdex query --multi "weather and time" --format json
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use docdex_chunker::ParagraphChunker;
use docdex_core::NoopOcr;
use docdex_embed::{EmbedderPool, HashEmbedder};
use docdex_extract::{ExtractorRegistry, ImageExtractor, PdfExtractor, TextExtractor};
use docdex_index::{IndexState, IngestOutcome, IngestService, IngestUpdate, IngestionPipeline};
use docdex_query::{RetrievalConfig, RetrievalEngine};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

mod config;

use config::Config;

#[derive(Parser)]
#[command(name = "docdex")]
#[command(about = "Document indexing and retrieval for RAG assistants")]
#[command(version)]
struct Cli {
    /// Path to config file (default: ~/.config/docdex/config.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Output format (text, json)
    #[arg(short, long, default_value = "text")]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, Default, clap::ValueEnum)]
enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Index a file, or every file in a directory
    Ingest {
        /// File or directory to ingest
        path: PathBuf,
    },

    /// Watch the upload directory and index arrivals
    Watch {
        /// Directory to watch (default: configured upload dir)
        #[arg(short, long)]
        dir: Option<PathBuf>,
    },

    /// Query the index
    Query {
        /// Query string
        query: String,

        /// Number of nearest neighbors to fetch
        #[arg(short, long)]
        k: Option<usize>,

        /// Minimum similarity for results
        #[arg(short, long)]
        threshold: Option<f32>,

        /// Decompose into sub-topics with name/content shortcuts
        #[arg(short, long)]
        multi: bool,
    },

    /// Show index status
    Status,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show current configuration
    Show,
    /// Print sample configuration file
    Init,
    /// Show config file path
    Path,
}

/// Output structure for query results.
#[derive(Serialize)]
struct QueryOutput {
    query: String,
    results: Vec<ResultItem>,
}

#[derive(Serialize)]
struct ResultItem {
    document: String,
    similarity: f32,
    text: String,
}

/// Output structure for status.
#[derive(Serialize)]
struct StatusOutput {
    data_dir: String,
    documents: usize,
    units: usize,
}

/// The shared component stack behind every command.
struct Components {
    state: Arc<IndexState>,
    pipeline: Arc<IngestionPipeline>,
    engine: RetrievalEngine,
}

fn create_components(config: &Config) -> Result<Components> {
    let data_dir = config.data_dir()?;
    std::fs::create_dir_all(&data_dir)
        .with_context(|| format!("Failed to create data directory {}", data_dir.display()))?;

    let state = Arc::new(
        IndexState::load(&data_dir, config.index.dimension)
            .context("Failed to load index artifacts")?,
    );

    let ocr: Arc<dyn docdex_core::OcrBackend> = Arc::new(NoopOcr);
    let mut extractors = ExtractorRegistry::new();
    extractors.register(TextExtractor::new());
    extractors.register(PdfExtractor::new(Arc::clone(&ocr)));
    extractors.register(ImageExtractor::new(ocr));
    let extractors = Arc::new(extractors);

    let chunker = ParagraphChunker::new(config.chunking.max_length)
        .context("Invalid chunking configuration")?;

    let embedder = Arc::new(EmbedderPool::new(
        Arc::new(HashEmbedder::with_dimension(config.index.dimension)),
        config.embedding.max_concurrent,
        Duration::from_millis(config.embedding.timeout_ms),
    ));

    let pipeline = Arc::new(IngestionPipeline::new(
        Arc::clone(&state),
        extractors,
        chunker,
        Arc::clone(&embedder),
        data_dir,
    ));

    let engine = RetrievalEngine::new(
        Arc::clone(&state),
        embedder,
        RetrievalConfig {
            k: config.query.k,
            threshold: config.query.threshold,
            cutoff: config.query.cutoff,
        },
    );

    Ok(Components {
        state,
        pipeline,
        engine,
    })
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")?;

    let config = if let Some(ref path) = cli.config {
        Config::load_from(Some(path.clone()))
            .with_context(|| format!("Failed to load config from {}", path.display()))?
    } else {
        Config::load().context("Failed to load config")?
    };

    match cli.command {
        Commands::Ingest { path } => {
            if !path.exists() {
                anyhow::bail!("Path does not exist: {}", path.display());
            }

            let components = create_components(&config)?;
            let mut indexed = 0u64;
            let mut skipped = 0u64;
            let mut errors = 0u64;

            let files: Vec<PathBuf> = if path.is_dir() {
                let mut files: Vec<PathBuf> = std::fs::read_dir(&path)
                    .with_context(|| format!("Failed to read {}", path.display()))?
                    .filter_map(|entry| entry.ok().map(|e| e.path()))
                    .filter(|p| p.is_file())
                    .collect();
                files.sort();
                files
            } else {
                vec![path.clone()]
            };

            for file in &files {
                match components.pipeline.ingest(file).await {
                    Ok(IngestOutcome::Indexed(units)) => {
                        indexed += 1;
                        info!("Indexed {:?} ({} units)", file, units);
                    }
                    Ok(IngestOutcome::SkippedDuplicate) => {
                        skipped += 1;
                        info!("Skipped {:?}: duplicate file name", file);
                    }
                    Ok(IngestOutcome::SkippedEmpty) => {
                        skipped += 1;
                        info!("Skipped {:?}: no extractable text", file);
                    }
                    Err(e) => {
                        errors += 1;
                        warn!("Failed to ingest {:?}: {}", file, e);
                    }
                }
            }

            info!(
                "Ingestion complete: {} indexed, {} skipped, {} errors",
                indexed, skipped, errors
            );
        }

        Commands::Watch { dir } => {
            let upload_dir = match dir {
                Some(d) => d,
                None => config.upload_dir()?,
            };
            std::fs::create_dir_all(&upload_dir).with_context(|| {
                format!("Failed to create upload directory {}", upload_dir.display())
            })?;

            let components = create_components(&config)?;
            let service = IngestService::new(
                upload_dir,
                Arc::clone(&components.pipeline),
                Duration::from_millis(config.index.debounce_ms),
            );

            let mut updates = service.subscribe();
            let progress_handle = tokio::spawn(async move {
                while let Ok(update) = updates.recv().await {
                    match update {
                        IngestUpdate::FileIndexed { path, unit_count } => {
                            info!("Indexed: {:?} ({} units)", path, unit_count);
                        }
                        IngestUpdate::FileSkipped { path, reason } => {
                            info!("Skipped: {:?} ({})", path, reason);
                        }
                        IngestUpdate::FileError { path, error } => {
                            warn!("Error: {:?}: {}", path, error);
                        }
                        IngestUpdate::IngestStarted { .. } => {}
                    }
                }
            });

            service.start().await.context("Failed to start watcher")?;

            info!("Watching for documents. Press Ctrl+C to stop.");
            tokio::signal::ctrl_c()
                .await
                .context("Failed to wait for Ctrl+C")?;
            service.stop().await?;
            progress_handle.abort();
        }

        Commands::Query {
            query,
            k,
            threshold,
            multi,
        } => {
            let components = create_components(&config)?;

            let results = if multi {
                components
                    .engine
                    .multi_topic_search(&query)
                    .await
                    .context("Query execution failed")?
            } else {
                components
                    .engine
                    .retrieve(
                        &query,
                        k.unwrap_or(config.query.k),
                        threshold.unwrap_or(config.query.threshold),
                    )
                    .await
                    .context("Query execution failed")?
            };

            match cli.format {
                OutputFormat::Json => {
                    let output = QueryOutput {
                        query: query.clone(),
                        results: results
                            .iter()
                            .map(|r| ResultItem {
                                document: r.document_name.clone(),
                                similarity: r.similarity,
                                text: truncate(&r.text, 200),
                            })
                            .collect(),
                    };
                    println!("{}", serde_json::to_string_pretty(&output)?);
                }
                OutputFormat::Text => {
                    println!("Query: {query}\n");
                    if results.is_empty() {
                        println!("No results found.");
                    } else {
                        for (i, result) in results.iter().enumerate() {
                            println!(
                                "{}. {} (similarity: {:.3})",
                                i + 1,
                                result.document_name,
                                result.similarity
                            );
                            println!("   {}", truncate(&result.text, 100));
                            println!();
                        }
                    }
                }
            }
        }

        Commands::Status => {
            let data_dir = config.data_dir()?;
            let components = create_components(&config)?;

            let documents = components.state.document_count().await;
            let units = components.state.len().await;

            match cli.format {
                OutputFormat::Json => {
                    let output = StatusOutput {
                        data_dir: data_dir.to_string_lossy().to_string(),
                        documents,
                        units,
                    };
                    println!("{}", serde_json::to_string_pretty(&output)?);
                }
                OutputFormat::Text => {
                    println!("Index status ({})", data_dir.display());
                    println!("  Documents: {documents}");
                    println!("  Units:     {units}");
                }
            }
        }

        Commands::Config { action } => match action {
            ConfigAction::Show => match cli.format {
                OutputFormat::Json => {
                    println!(
                        "{}",
                        serde_json::to_string_pretty(&config)
                            .context("Failed to serialize config")?
                    );
                }
                OutputFormat::Text => {
                    println!(
                        "{}",
                        toml::to_string_pretty(&config).context("Failed to serialize config")?
                    );
                }
            },
            ConfigAction::Init => {
                println!("{}", Config::sample_toml());
            }
            ConfigAction::Path => {
                if let Some(path) = Config::config_path() {
                    println!("{}", path.display());
                } else {
                    println!("Could not determine config directory");
                }
            }
        },
    }

    Ok(())
}

/// Truncate a string to max length, adding ellipsis if needed.
fn truncate(s: &str, max_len: usize) -> String {
    let s = s.replace('\n', " ").replace('\r', "");
    if s.chars().count() <= max_len {
        s
    } else {
        let head: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{head}...")
    }
}
