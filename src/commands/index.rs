//! Index command implementation.
//!
//! Runs a full build with a progress bar. Ctrl+C cancels the build before
//! anything is written.

use anyhow::{bail, Context, Result};
use std::path::{Path, PathBuf};
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::config::Config;
use crate::indexing::IndexBuilder;

/// Run the index command.
///
/// # Arguments
///
/// * `root` - Project root to scan
/// * `config` - Loaded project configuration
/// * `output` - Alternative index location
pub async fn run(root: &Path, config: Config, output: Option<PathBuf>) -> Result<()> {
    let cancel = CancellationToken::new();
    let ctrl_c_token = cancel.clone();
    let ctrl_c = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            eprintln!("Cancelling index build...");
            ctrl_c_token.cancel();
        }
    });

    let builder = IndexBuilder::new(root, config)
        .with_cancellation(cancel)
        .with_progress(true);

    println!("Project root: {}", root.display());

    let outcome = tokio::task::spawn_blocking(move || builder.build(output.as_deref()))
        .await
        .context("Index build task panicked")?
        .context("Index build failed")?;
    ctrl_c.abort();

    outcome.report.print_summary();
    println!("Symbols: {}", outcome.index.symbol_count());

    if let Some(e) = outcome.persist_error {
        bail!("Index was built but could not be saved: {}", e);
    }

    println!("Index written to {}", outcome.output_path.display());
    info!("Index command finished");
    Ok(())
}
