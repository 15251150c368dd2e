//! File system watcher that keeps the index fresh.
//!
//! Every debounced batch that touches an indexable file triggers a full
//! rebuild, so the persisted index is always a complete snapshot.

pub mod changes;

use anyhow::{Context, Result};
use notify::RecursiveMode;
use notify_debouncer_full::{new_debouncer, DebouncedEvent};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::config::Config;
use crate::error::IndexError;
use crate::indexing::{BuildOutcome, IndexBuilder};

pub use changes::{ChangeFilter, ChangeType, FileChange};

/// Default debounce delay in milliseconds
pub const DEFAULT_DEBOUNCE_MS: u64 = 500;

/// Counters accumulated over a watch session
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WatchStats {
    /// Debounced batches that contained at least one relevant change
    pub batches: usize,
    /// Relevant file changes seen across all batches
    pub files_changed: usize,
    pub rebuilds: usize,
    pub failed_rebuilds: usize,
    /// Files in the most recent successful build
    pub last_file_count: usize,
}

impl WatchStats {
    pub fn record_batch(&mut self, changes: &[FileChange]) {
        self.batches += 1;
        self.files_changed += changes.len();
    }
}

/// Watches a project root and rebuilds its index on change
pub struct IndexWatcher {
    root: PathBuf,
    config: Config,
    debounce_ms: u64,
    filter: ChangeFilter,
}

impl IndexWatcher {
    /// Create a watcher for `root`.
    ///
    /// The root is canonicalized because notify reports absolute event paths.
    pub fn new(root: impl AsRef<Path>, config: Config, debounce_ms: u64) -> Result<Self> {
        let root = std::fs::canonicalize(root.as_ref())
            .with_context(|| format!("Failed to resolve watch root {:?}", root.as_ref()))?;
        let filter = ChangeFilter::new(root.clone(), &config.indexer);
        Ok(Self {
            root,
            config,
            debounce_ms,
            filter,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn filter(&self) -> &ChangeFilter {
        &self.filter
    }

    /// Start watching for file changes
    ///
    /// This runs until the shutdown signal is received. A rebuild in flight
    /// at shutdown is cancelled and does not write the index.
    pub async fn run(self, mut shutdown_rx: oneshot::Receiver<()>) -> Result<WatchStats> {
        let debounce_duration = Duration::from_millis(self.debounce_ms);

        // Create channel for receiving debounced events
        let (tx, mut rx) = mpsc::channel::<Vec<DebouncedEvent>>(100);

        let mut debouncer = new_debouncer(
            debounce_duration,
            None,
            move |result: std::result::Result<Vec<DebouncedEvent>, Vec<notify::Error>>| {
                match result {
                    Ok(events) => {
                        if !events.is_empty() {
                            if let Err(e) = tx.blocking_send(events) {
                                error!("Failed to send debounced events: {}", e);
                            }
                        }
                    }
                    Err(errors) => {
                        for error in errors {
                            error!("Watch error: {}", error);
                        }
                    }
                }
            },
        )
        .with_context(|| "Failed to create file watcher debouncer")?;

        debouncer
            .watch(&self.root, RecursiveMode::Recursive)
            .with_context(|| format!("Failed to watch directory: {:?}", self.root))?;

        info!("Watching directory: {:?}", self.root);
        info!("Debounce delay: {}ms", self.debounce_ms);

        let cancel = CancellationToken::new();
        let mut stats = WatchStats::default();

        loop {
            tokio::select! {
                _ = &mut shutdown_rx => {
                    info!("Shutdown signal received, stopping watcher");
                    cancel.cancel();
                    break;
                }

                Some(events) = rx.recv() => {
                    let changes = self.filter.classify(&events);
                    if changes.is_empty() {
                        debug!("Ignoring batch of {} irrelevant events", events.len());
                        continue;
                    }

                    stats.record_batch(&changes);
                    for change in &changes {
                        debug!("{} {}", change.change_type, change.path.display());
                    }
                    info!("{} file changes, rebuilding index", changes.len());

                    tokio::select! {
                        _ = &mut shutdown_rx => {
                            info!("Shutdown signal received during rebuild");
                            cancel.cancel();
                            break;
                        }
                        result = self.rebuild(cancel.child_token()) => {
                            Self::record_rebuild(&mut stats, result);
                        }
                    }
                }
            }
        }

        Ok(stats)
    }

    /// Run one full rebuild on the blocking pool
    pub async fn rebuild(&self, cancel: CancellationToken) -> Result<BuildOutcome> {
        let builder = IndexBuilder::new(self.root.clone(), self.config.clone())
            .with_cancellation(cancel);

        let outcome = tokio::task::spawn_blocking(move || builder.build(None))
            .await
            .with_context(|| "Index rebuild task panicked")??;
        Ok(outcome)
    }

    fn record_rebuild(stats: &mut WatchStats, result: Result<BuildOutcome>) {
        match result {
            Ok(outcome) => {
                stats.rebuilds += 1;
                stats.last_file_count = outcome.index.len();
                if let Some(e) = &outcome.persist_error {
                    warn!("Rebuilt index could not be saved: {}", e);
                    stats.failed_rebuilds += 1;
                } else {
                    info!("{}", outcome.report.summary());
                }
            }
            Err(e) if matches!(e.downcast_ref::<IndexError>(), Some(IndexError::Cancelled)) => {
                debug!("Rebuild cancelled");
            }
            Err(e) => {
                error!("Failed to rebuild index: {:#}", e);
                stats.failed_rebuilds += 1;
            }
        }
    }
}

/// Handle to control a watcher running on a background task
pub struct WatcherHandle {
    shutdown_tx: Option<oneshot::Sender<()>>,
    task: Option<tokio::task::JoinHandle<Result<WatchStats>>>,
}

impl WatcherHandle {
    /// Spawn `watcher` onto the current runtime
    pub fn spawn(watcher: IndexWatcher) -> Self {
        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let task = tokio::spawn(watcher.run(shutdown_rx));
        Self {
            shutdown_tx: Some(shutdown_tx),
            task: Some(task),
        }
    }

    /// Request graceful shutdown
    pub fn shutdown(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }

    /// Wait for the watcher to finish and get the final stats
    pub async fn wait(mut self) -> Result<WatchStats> {
        match self.task.take() {
            Some(task) => task.await.with_context(|| "Watcher task panicked")?,
            None => Ok(WatchStats::default()),
        }
    }
}
