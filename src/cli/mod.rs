use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::watcher::DEFAULT_DEBOUNCE_MS;

#[derive(Parser)]
#[command(name = "swarm-index")]
#[command(author, version, about = "Structural and lexical index of a source tree")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Project root (defaults to the current directory)
    #[arg(long, global = true)]
    pub root: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build the index from scratch
    Index {
        /// Write the index here instead of .cswarm/index.json
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Find declarations of a symbol by exact name
    Symbol {
        /// Symbol name (case-sensitive)
        name: String,

        /// Print results as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the indexed summary and head of one file
    Path {
        /// Path relative to the project root, as stored in the index
        path: String,

        /// Print results as JSON
        #[arg(long)]
        json: bool,
    },

    /// Rank files by how often they use the query's words
    Search {
        /// Search query
        query: String,

        /// Maximum number of results to return
        #[arg(short, long)]
        limit: Option<usize>,

        /// Print results as JSON
        #[arg(long)]
        json: bool,
    },

    /// Watch for file changes and rebuild the index
    Watch {
        /// Debounce delay in milliseconds
        #[arg(short, long, default_value_t = DEFAULT_DEBOUNCE_MS)]
        debounce_ms: u64,
    },
}
