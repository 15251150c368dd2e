//! `symbol` and `path` lookups against the persisted index.

use anyhow::Result;
use std::path::Path;

use crate::config::Config;
use crate::search::QueryEngine;

use super::{format_preview, print_json, validate_relative};

const PREVIEW_LINES: usize = 20;

/// Print every declaration of `name`
pub fn symbol(root: &Path, config: &Config, name: &str, json: bool) -> Result<()> {
    let engine = QueryEngine::open_with_config(root, config);
    let hits = engine.by_symbol(name);

    if json {
        return print_json(&hits);
    }

    if hits.is_empty() {
        println!("No symbol named '{}'", name);
        if engine.index().is_empty() {
            println!("\nThe index is empty. Run 'swarm-index index' first.");
        }
        return Ok(());
    }

    for hit in &hits {
        println!("{}:{}  {}", hit.path, hit.symbol.lineno, hit.symbol.name);
        if let Some(first) = hit.symbol.doc.lines().next() {
            println!("   {}", first);
        }
        println!("{}", format_preview(&hit.snippet, PREVIEW_LINES));
        println!();
    }

    Ok(())
}

/// Print the summary and head of one indexed file
pub fn path(root: &Path, config: &Config, rel_path: &str, json: bool) -> Result<()> {
    let key = validate_relative(rel_path)?;
    let engine = QueryEngine::open_with_config(root, config);
    let hits = engine.by_path(&key);

    if json {
        return print_json(&hits);
    }

    let Some(hit) = hits.first() else {
        println!("'{}' is not in the index", key);
        return Ok(());
    };

    println!("{}", hit.path);
    if !hit.summary.is_empty() {
        println!("\n{}\n", hit.summary);
    }
    println!("{}", format_preview(&hit.snippet, PREVIEW_LINES));

    Ok(())
}
