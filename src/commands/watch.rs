//! Watch command implementation
//!
//! Builds the index once, then rebuilds it whenever source files change.

use anyhow::{Context, Result};
use std::path::Path;
use tokio::signal;
use tracing::{info, warn};

use crate::config::Config;
use crate::indexing::IndexBuilder;
use crate::watcher::{IndexWatcher, WatcherHandle};

/// Run the watch command
///
/// # Arguments
/// * `debounce_ms` - Debounce delay in milliseconds
pub async fn run(root: &Path, config: Config, debounce_ms: u64) -> Result<()> {
    let watcher = IndexWatcher::new(root, config.clone(), debounce_ms)?;

    println!("Starting watch mode...");
    println!("Watching directory: {:?}", watcher.root());
    println!("Debounce delay: {}ms", debounce_ms);
    println!("Extensions: {:?}", config.indexer.extensions);
    println!();

    let builder = IndexBuilder::new(watcher.root(), config);
    let initial = tokio::task::spawn_blocking(move || builder.build(None))
        .await
        .context("Initial build task panicked")?
        .context("Initial index build failed")?;
    println!("{}", initial.report.summary());
    if let Some(e) = &initial.persist_error {
        warn!("Initial index could not be saved: {}", e);
    }

    println!();
    println!("Press Ctrl+C to stop.");
    println!();

    let mut handle = WatcherHandle::spawn(watcher);

    // Wait for Ctrl+C
    signal::ctrl_c().await?;

    println!();
    println!("Shutting down...");

    handle.shutdown();
    let stats = handle.wait().await?;

    println!();
    println!("Watch session complete!");
    println!("----------------------------------------");
    println!("  Change batches:  {}", stats.batches);
    println!("  Files changed:   {}", stats.files_changed);
    println!("  Rebuilds:        {}", stats.rebuilds);
    println!("  Indexed files:   {}", stats.last_file_count);
    if stats.failed_rebuilds > 0 {
        println!("  Failed rebuilds: {}", stats.failed_rebuilds);
    }
    println!("----------------------------------------");

    info!("Watch session ended");

    Ok(())
}
