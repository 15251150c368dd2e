//! Per-file analysis: structural outline via tree-sitter plus lexical terms.
//!
//! Structure is best effort. When a file does not parse cleanly its
//! description, symbols and imports are left empty and the file is reported
//! as degraded, but its term table is always computed from the raw text.

pub mod parser_pool;
pub mod parsers;

use std::borrow::Cow;
use std::path::Path;
use std::sync::Arc;

use tracing::debug;

use crate::error::{DegradedFile, ProcessingStage};
use crate::indexer::terms::term_frequencies;
use crate::model::FileSummary;

pub use parser_pool::ParserPool;
pub use parsers::{Outline, ParserRegistry, StructuralParser};

/// Result of analyzing one file
#[derive(Debug, Clone)]
pub struct Analysis {
    pub summary: FileSummary,
    /// Set when structural extraction was skipped for this file
    pub degraded: Option<DegradedFile>,
    /// Language whose grammar was applied, if any
    pub language: Option<&'static str>,
}

/// Turns file contents into [`FileSummary`] values.
///
/// Holds mutable parser state, so each worker thread needs its own instance.
/// The registry itself is shared.
pub struct Analyzer {
    registry: Arc<ParserRegistry>,
    pool: ParserPool,
}

impl Analyzer {
    /// Analyzer with all built-in languages
    pub fn new() -> Self {
        Self::with_registry(Arc::new(ParserRegistry::new()))
    }

    pub fn with_registry(registry: Arc<ParserRegistry>) -> Self {
        Self {
            registry,
            pool: ParserPool::new(),
        }
    }

    /// Analyze `content`, using `path` (root-relative) for language detection
    /// and degradation reports.
    pub fn analyze(&mut self, path: &Path, content: &str) -> Analysis {
        let terms = term_frequencies(content);

        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        let Some(structural) = self.registry.for_extension(ext) else {
            debug!("No structural parser for {:?}, indexing terms only", path);
            return Analysis {
                summary: FileSummary::terms_only(terms),
                degraded: None,
                language: None,
            };
        };
        let language = Some(structural.language_id());

        let degrade = |reason: String| Analysis {
            summary: FileSummary::terms_only(terms.clone()),
            degraded: Some(DegradedFile::new(path, ProcessingStage::Parse, reason)),
            language,
        };

        let Some(parser) = self.pool.get_parser(structural) else {
            return degrade(format!("{} grammar unavailable", structural.language_id()));
        };

        let source = normalize_line_endings(content);
        let Some(tree) = parser.parse(source.as_bytes(), None) else {
            return degrade("parser returned no tree".to_string());
        };

        let rejected = parsers::first_error_line(&tree)
            .or_else(|| structural.first_rejected_line(&tree, source.as_bytes()));
        if let Some(line) = rejected {
            debug!("Syntax error in {:?} at line {}", path, line);
            return degrade(format!("syntax error near line {}", line));
        }

        let outline = structural.outline(&tree, source.as_bytes());
        let mut symbols = outline.symbols;
        // Stable: equal lines keep discovery order
        symbols.sort_by_key(|s| s.lineno);

        Analysis {
            summary: FileSummary {
                summary: outline.description,
                symbols,
                imports: outline.imports,
                terms,
            },
            degraded: None,
            language,
        }
    }
}

impl Default for Analyzer {
    fn default() -> Self {
        Self::new()
    }
}

/// Rewrite `\r\n` and lone `\r` as `\n` so every grammar counts lines the same way.
fn normalize_line_endings(content: &str) -> Cow<'_, str> {
    if content.contains('\r') {
        Cow::Owned(content.replace("\r\n", "\n").replace('\r', "\n"))
    } else {
        Cow::Borrowed(content)
    }
}
