//! Command implementations behind the CLI.
//!
//! Each command resolves nothing on its own: the project root and config are
//! loaded once in `main` and passed in.

pub mod index;
pub mod lookup;
pub mod search;
pub mod watch;

use anyhow::{bail, Context, Result};
use serde::Serialize;
use std::path::{Component, Path};

/// Print any serializable value as pretty JSON on stdout
pub(crate) fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let text = serde_json::to_string_pretty(value).context("Failed to serialize results")?;
    println!("{}", text);
    Ok(())
}

/// Format a preview of the content, limiting to max_lines
pub(crate) fn format_preview(content: &str, max_lines: usize) -> String {
    let lines: Vec<&str> = content.lines().collect();
    let preview_lines = if lines.len() > max_lines {
        let mut preview: Vec<&str> = lines.iter().take(max_lines).copied().collect();
        preview.push("...");
        preview
    } else {
        lines
    };

    preview_lines
        .iter()
        .map(|line| format!("   {}", line))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Reject paths that are absolute or climb out of the project root.
///
/// Backslashes are accepted and normalized to the index's `/` separator.
pub(crate) fn validate_relative(path: &str) -> Result<String> {
    let normalized = path.replace('\\', "/");
    let trimmed = normalized.trim_start_matches("./");

    if trimmed.is_empty() {
        bail!("Empty path");
    }
    for component in Path::new(trimmed).components() {
        match component {
            Component::Normal(_) => {}
            _ => bail!("Path must be relative to the project root: {}", path),
        }
    }
    Ok(trimmed.to_string())
}
