//! File system watcher for upload arrivals.

use docdex_core::FileEvent;
use notify_debouncer_full::notify::{RecommendedWatcher, RecursiveMode};
use notify_debouncer_full::{new_debouncer, DebounceEventResult, Debouncer, RecommendedCache};
use std::path::Path;
use std::sync::mpsc;
use std::time::Duration;
use tokio::sync::mpsc as tokio_mpsc;
use tracing::{debug, error, warn};

/// Debounced watcher over the upload directory.
///
/// Events arrive on a std channel from the notify backend thread and
/// are bridged onto a tokio channel for the ingestion worker.
pub struct FileWatcher {
    debouncer: Debouncer<RecommendedWatcher, RecommendedCache>,
}

impl FileWatcher {
    /// Create a new watcher feeding `event_tx`.
    pub fn new(
        event_tx: tokio_mpsc::Sender<FileEvent>,
        debounce_duration: Duration,
    ) -> Result<Self, notify_debouncer_full::notify::Error> {
        let (tx, rx) = mpsc::channel();

        std::thread::spawn(move || {
            while let Ok(result) = rx.recv() {
                forward_debounced_events(result, &event_tx);
            }
        });

        let debouncer = new_debouncer(debounce_duration, None, move |result| {
            let _ = tx.send(result);
        })?;

        Ok(Self { debouncer })
    }

    /// Start watching a directory.
    pub fn watch(&mut self, path: &Path) -> Result<(), notify_debouncer_full::notify::Error> {
        debug!("Starting to watch: {:?}", path);
        self.debouncer.watch(path, RecursiveMode::Recursive)?;
        Ok(())
    }

    /// Stop watching a directory.
    pub fn unwatch(&mut self, path: &Path) -> Result<(), notify_debouncer_full::notify::Error> {
        debug!("Stopping watch: {:?}", path);
        self.debouncer.unwatch(path)?;
        Ok(())
    }
}

fn forward_debounced_events(
    result: DebounceEventResult,
    event_tx: &tokio_mpsc::Sender<FileEvent>,
) {
    match result {
        Ok(events) => {
            for event in events {
                if let Some(file_event) = convert_event(&event) {
                    // Blocking send: we run on a std thread
                    if event_tx.blocking_send(file_event).is_err() {
                        warn!("Event channel closed");
                        break;
                    }
                }
            }
        }
        Err(errors) => {
            for error in errors {
                error!("Watch error: {error}");
            }
        }
    }
}

fn convert_event(event: &notify_debouncer_full::DebouncedEvent) -> Option<FileEvent> {
    use notify_debouncer_full::notify::EventKind;

    let path = event.paths.first()?.clone();

    // Skip hidden files and directories
    if path
        .file_name()
        .is_some_and(|name| name.to_string_lossy().starts_with('.'))
    {
        return None;
    }

    match &event.kind {
        EventKind::Create(_) => Some(FileEvent::Created(path)),
        EventKind::Modify(_) => Some(FileEvent::Modified(path)),
        _ => None,
    }
}
