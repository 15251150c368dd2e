//! Read-only lookups over a loaded index.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::debug;

use crate::config::Config;
use crate::indexer::tokenize;
use crate::model::{Index, Symbol};
use crate::storage::IndexStore;

use super::postings::Postings;
use super::snippet::{SourceReader, PATH_WINDOW, TEXT_WINDOW};

/// Default number of free-text results
pub const DEFAULT_TEXT_LIMIT: usize = 5;

/// A symbol declaration matching a name lookup
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SymbolHit {
    pub path: String,
    pub symbol: Symbol,
    pub snippet: String,
}

/// The entry for an exact path lookup
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileHit {
    pub path: String,
    pub summary: String,
    pub snippet: String,
}

/// A ranked free-text match
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TextHit {
    pub path: String,
    pub summary: String,
    pub score: u64,
    pub snippet: String,
}

/// Query engine over one immutable index snapshot.
///
/// A rebuild never changes a running engine; open a new one to see it.
pub struct QueryEngine {
    index: Index,
    postings: Postings,
    source: SourceReader,
}

impl QueryEngine {
    /// Wrap an in-memory index for the project at `root`
    pub fn new(root: impl Into<PathBuf>, index: Index) -> Self {
        let postings = Postings::from_index(&index);
        debug!(
            "Query engine ready: {} files, {} distinct terms",
            index.len(),
            postings.vocabulary_len()
        );
        Self {
            index,
            postings,
            source: SourceReader::new(root),
        }
    }

    /// Load the persisted index for `root`; a missing or unreadable index is empty.
    pub fn open(root: &Path) -> Self {
        Self::open_with_config(root, &Config::load(root).unwrap_or_default())
    }

    pub fn open_with_config(root: &Path, config: &Config) -> Self {
        let index = IndexStore::for_project(root, config).load_or_empty();
        Self::new(root, index)
    }

    pub fn index(&self) -> &Index {
        &self.index
    }

    /// Every symbol named exactly `name`, in index key order then declaration order.
    pub fn by_symbol(&self, name: &str) -> Vec<SymbolHit> {
        self.index
            .files
            .iter()
            .flat_map(|(path, summary)| {
                summary
                    .symbols
                    .iter()
                    .filter(|symbol| symbol.name == name)
                    .map(move |symbol| (path, symbol))
            })
            .map(|(path, symbol)| SymbolHit {
                path: path.clone(),
                symbol: symbol.clone(),
                snippet: self.source.around_line(path, symbol.lineno),
            })
            .collect()
    }

    /// Exact key lookup; zero or one hit.
    pub fn by_path(&self, rel_path: &str) -> Vec<FileHit> {
        self.index
            .get(rel_path)
            .map(|summary| FileHit {
                path: rel_path.to_string(),
                summary: summary.summary.clone(),
                snippet: self.source.head(rel_path, PATH_WINDOW),
            })
            .into_iter()
            .collect()
    }

    /// Rank files by the summed frequency of the query's tokens.
    pub fn by_text(&self, query: &str, limit: usize) -> Vec<TextHit> {
        let tokens = tokenize(query);
        if tokens.is_empty() || limit == 0 {
            return Vec::new();
        }

        self.postings
            .score(&tokens)
            .into_iter()
            .take(limit)
            .filter_map(|(ordinal, score)| {
                let path = self.postings.path(ordinal)?;
                let summary = self.index.get(path)?;
                Some(TextHit {
                    path: path.to_string(),
                    summary: summary.summary.clone(),
                    score,
                    snippet: self.source.head(path, TEXT_WINDOW),
                })
            })
            .collect()
    }
}
