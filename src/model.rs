//! Persisted index data model.
//!
//! Field names match the on-disk JSON layout:
//! `{"files": {"<rel path>": {"summary", "symbols": [{name, lineno, doc}], "imports", "terms"}}}`.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

/// A declared construct (function, class, type...) in one file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Symbol {
    pub name: String,
    /// 1-based declaration line
    pub lineno: usize,
    #[serde(default)]
    pub doc: String,
}

impl Symbol {
    pub fn new(name: impl Into<String>, lineno: usize, doc: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            lineno,
            doc: doc.into(),
        }
    }
}

/// Structural and lexical summary of one source file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileSummary {
    /// File-level description (module docstring or leading doc comment)
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub symbols: Vec<Symbol>,
    /// Top-level module names, serialized as a sorted list
    #[serde(default)]
    pub imports: BTreeSet<String>,
    #[serde(default)]
    pub terms: BTreeMap<String, u64>,
}

impl FileSummary {
    /// Summary carrying only lexical data
    pub fn terms_only(terms: BTreeMap<String, u64>) -> Self {
        Self {
            terms,
            ..Default::default()
        }
    }

    pub fn term_count(&self, token: &str) -> u64 {
        self.terms.get(token).copied().unwrap_or(0)
    }
}

/// Snapshot mapping relative path to its summary
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Index {
    #[serde(default)]
    pub files: BTreeMap<String, FileSummary>,
}

impl Index {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn get(&self, rel_path: &str) -> Option<&FileSummary> {
        self.files.get(rel_path)
    }

    pub fn symbol_count(&self) -> usize {
        self.files.values().map(|f| f.symbols.len()).sum()
    }
}

/// Render a root-relative path as an index key (`/`-separated on every platform).
pub fn index_key(rel_path: &Path) -> String {
    rel_path
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
