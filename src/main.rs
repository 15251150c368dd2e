use anyhow::{Context, Result};
use clap::Parser;

use swarm_index::cli::{Cli, Commands};
use swarm_index::commands;
use swarm_index::config::Config;
use swarm_index::logging::{init_early_logging, init_logging};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let project_root = match cli.root {
        Some(root) => root,
        None => std::env::current_dir().context("Cannot determine current directory")?,
    };

    // A broken config file is reported rather than silently ignored
    let config = match Config::load(&project_root) {
        Ok(config) => config,
        Err(e) => {
            init_early_logging();
            tracing::error!("{:#}", e);
            return Err(e);
        }
    };

    // The guard MUST be held until program exit to ensure logs are flushed
    let _logging_guard = init_logging(&config.logging, &project_root)?;

    tracing::debug!("Project root: {}", project_root.display());

    match cli.command {
        Commands::Index { output } => {
            commands::index::run(&project_root, config, output).await?;
        }
        Commands::Symbol { name, json } => {
            commands::lookup::symbol(&project_root, &config, &name, json)?;
        }
        Commands::Path { path, json } => {
            commands::lookup::path(&project_root, &config, &path, json)?;
        }
        Commands::Search { query, limit, json } => {
            commands::search::run(&project_root, &config, &query, limit, json)?;
        }
        Commands::Watch { debounce_ms } => {
            commands::watch::run(&project_root, config, debounce_ms).await?;
        }
    }

    Ok(())
}
