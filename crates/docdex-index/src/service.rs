//! Ingestion service: watcher, queue, and worker.

use chrono::Utc;
use docdex_core::{Error, FileEvent, IndexStats, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, mpsc, RwLock};
use tracing::{debug, error, info, warn};

use crate::pipeline::{IngestOutcome, IngestionPipeline};
use crate::watcher::FileWatcher;

/// Ingestion progress events.
#[derive(Debug, Clone)]
pub enum IngestUpdate {
    IngestStarted { path: PathBuf },
    FileIndexed { path: PathBuf, unit_count: usize },
    FileSkipped { path: PathBuf, reason: String },
    FileError { path: PathBuf, error: String },
}

/// Watches the upload directory and feeds arrivals through the pipeline.
///
/// A single worker drains the event queue, so files are ingested one at
/// a time in arrival order. Subscribers get an [`IngestUpdate`] per
/// file.
pub struct IngestService {
    upload_dir: PathBuf,
    pipeline: Arc<IngestionPipeline>,
    debounce: Duration,
    stats: Arc<RwLock<IndexStats>>,
    event_tx: mpsc::Sender<FileEvent>,
    event_rx: Arc<RwLock<mpsc::Receiver<FileEvent>>>,
    update_tx: broadcast::Sender<IngestUpdate>,
    watcher: Arc<RwLock<Option<FileWatcher>>>,
    running: Arc<RwLock<bool>>,
}

impl IngestService {
    pub fn new(upload_dir: PathBuf, pipeline: Arc<IngestionPipeline>, debounce: Duration) -> Self {
        let (event_tx, event_rx) = mpsc::channel(1024);
        let (update_tx, _) = broadcast::channel(256);

        Self {
            upload_dir,
            pipeline,
            debounce,
            stats: Arc::new(RwLock::new(IndexStats::default())),
            event_tx,
            event_rx: Arc::new(RwLock::new(event_rx)),
            update_tx,
            watcher: Arc::new(RwLock::new(None)),
            running: Arc::new(RwLock::new(false)),
        }
    }

    /// Subscribe to ingestion updates.
    pub fn subscribe(&self) -> broadcast::Receiver<IngestUpdate> {
        self.update_tx.subscribe()
    }

    /// The watched directory.
    pub fn upload_dir(&self) -> &Path {
        &self.upload_dir
    }

    /// Current counters.
    pub async fn stats(&self) -> IndexStats {
        self.stats.read().await.clone()
    }

    /// Queue a file for ingestion.
    pub async fn enqueue(&self, path: &Path) -> Result<()> {
        self.event_tx
            .send(FileEvent::Created(path.to_path_buf()))
            .await
            .map_err(|e| Error::Other(format!("send error: {e}")))?;
        Ok(())
    }

    /// Start the watcher and the worker task, then scan the upload
    /// directory so files that arrived while the service was down get
    /// indexed too.
    pub async fn start(&self) -> Result<()> {
        let mut running = self.running.write().await;
        if *running {
            return Ok(());
        }
        *running = true;
        drop(running);

        info!("Starting ingestion service for {:?}", self.upload_dir);

        let watcher = FileWatcher::new(self.event_tx.clone(), self.debounce)
            .map_err(|e| Error::Other(format!("watcher error: {e}")))?;
        {
            let mut w = self.watcher.write().await;
            *w = Some(watcher);
        }
        {
            let mut w = self.watcher.write().await;
            if let Some(ref mut watcher) = *w {
                watcher
                    .watch(&self.upload_dir)
                    .map_err(|e| Error::Other(format!("watch error: {e}")))?;
            }
        }

        let event_rx = Arc::clone(&self.event_rx);
        let update_tx = self.update_tx.clone();
        let running = Arc::clone(&self.running);
        let pipeline = Arc::clone(&self.pipeline);
        let stats = Arc::clone(&self.stats);

        tokio::spawn(async move {
            let mut rx = event_rx.write().await;
            while *running.read().await {
                match rx.recv().await {
                    Some(event) => {
                        let path = event.path().to_path_buf();
                        debug!("Received file event: {:?}", event);

                        if !path.is_file() {
                            continue;
                        }

                        let _ = update_tx.send(IngestUpdate::IngestStarted { path: path.clone() });

                        match pipeline.ingest(&path).await {
                            Ok(outcome) => {
                                let mut s = stats.write().await;
                                record_outcome(&mut s, &outcome);
                                drop(s);

                                let update = match outcome {
                                    IngestOutcome::Indexed(unit_count) => {
                                        info!("Indexed {:?} ({} units)", path, unit_count);
                                        IngestUpdate::FileIndexed { path, unit_count }
                                    }
                                    IngestOutcome::SkippedDuplicate => IngestUpdate::FileSkipped {
                                        path,
                                        reason: "duplicate file name".to_string(),
                                    },
                                    IngestOutcome::SkippedEmpty => IngestUpdate::FileSkipped {
                                        path,
                                        reason: "no extractable text".to_string(),
                                    },
                                };
                                let _ = update_tx.send(update);
                            }
                            Err(e) => {
                                error!("Failed to ingest {:?}: {}", path, e);
                                let mut s = stats.write().await;
                                s.error_files += 1;
                                drop(s);
                                let _ = update_tx.send(IngestUpdate::FileError {
                                    path,
                                    error: e.to_string(),
                                });
                            }
                        }
                    }
                    None => break,
                }
            }
        });

        self.scan().await?;

        Ok(())
    }

    /// Stop processing events.
    pub async fn stop(&self) -> Result<()> {
        let mut running = self.running.write().await;
        *running = false;
        info!("Ingestion service stopped");
        Ok(())
    }

    /// Queue every existing file in the upload directory.
    async fn scan(&self) -> Result<()> {
        info!("Scanning {:?}", self.upload_dir);

        let root = self.upload_dir.clone();
        let event_tx = self.event_tx.clone();

        // Directory walk is blocking I/O
        tokio::task::spawn_blocking(move || {
            scan_directory(&root, &event_tx);
        })
        .await
        .map_err(|e| Error::Other(format!("scan task failed: {e}")))?;

        Ok(())
    }
}

/// Fold one ingestion outcome into the counters.
fn record_outcome(stats: &mut IndexStats, outcome: &IngestOutcome) {
    match outcome {
        IngestOutcome::Indexed(unit_count) => {
            stats.indexed_files += 1;
            stats.total_units += *unit_count as u64;
            stats.last_update = Some(Utc::now());
        }
        IngestOutcome::SkippedDuplicate => stats.skipped_duplicates += 1,
        IngestOutcome::SkippedEmpty => stats.skipped_empty += 1,
    }
}

/// Walk `root` and queue every visible file as a Created event.
fn scan_directory(root: &Path, event_tx: &mpsc::Sender<FileEvent>) {
    let entries = match std::fs::read_dir(root) {
        Ok(e) => e,
        Err(e) => {
            warn!("Cannot read directory {:?}: {}", root, e);
            return;
        }
    };

    for entry in entries.flatten() {
        let path = entry.path();

        if path
            .file_name()
            .is_some_and(|name| name.to_string_lossy().starts_with('.'))
        {
            continue;
        }

        if path.is_dir() {
            scan_directory(&path, event_tx);
        } else if path.is_file() {
            if let Err(e) = event_tx.blocking_send(FileEvent::Created(path.clone())) {
                warn!("Failed to queue file {:?}: {}", path, e);
            }
        }
    }
}
