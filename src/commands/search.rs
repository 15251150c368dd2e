use anyhow::Result;
use std::path::Path;

use crate::config::Config;
use crate::search::QueryEngine;

use super::{format_preview, print_json};

/// Run the search command
///
/// # Arguments
///
/// * `query` - Free text; only words of three or more letters count
/// * `limit` - Maximum number of results (defaults to `query.default_limit`)
/// * `json` - Print machine-readable output
pub fn run(root: &Path, config: &Config, query: &str, limit: Option<usize>, json: bool) -> Result<()> {
    let limit = limit.unwrap_or(config.query.default_limit);
    let engine = QueryEngine::open_with_config(root, config);
    let results = engine.by_text(query, limit);

    if json {
        return print_json(&results);
    }

    if results.is_empty() {
        println!("No results found for: {}", query);
        println!("\nMake sure you have indexed the codebase with 'swarm-index index'");
        return Ok(());
    }

    println!("Found {} results for: \"{}\"\n", results.len(), query);

    for (i, result) in results.iter().enumerate() {
        println!("{}. {} (score: {})", i + 1, result.path, result.score);
        if let Some(first) = result.summary.lines().next() {
            println!("   {}", first);
        }
        println!("{}", format_preview(&result.snippet, 5));
        println!();
    }

    Ok(())
}
