//! Per-worker cache of configured tree-sitter parsers.
//!
//! `tree_sitter::Parser` is not `Sync`, so each analysis worker owns its own
//! pool and parsers are created lazily on first use of a language.

use std::collections::HashMap;

use tree_sitter::Parser;
use tracing::debug;

use super::parsers::StructuralParser;

/// Manages tree-sitter parsers for the languages a worker has seen.
#[derive(Default)]
pub struct ParserPool {
    /// Map of language identifier to configured parser
    parsers: HashMap<&'static str, Parser>,
}

impl ParserPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a parser configured for `structural`'s grammar.
    ///
    /// Creates the parser on first access and caches it for reuse.
    /// Returns `None` if the grammar cannot be loaded.
    pub fn get_parser(&mut self, structural: &dyn StructuralParser) -> Option<&mut Parser> {
        let id = structural.language_id();
        if self.parsers.contains_key(id) {
            return self.parsers.get_mut(id);
        }

        let mut parser = Parser::new();
        if let Err(e) = parser.set_language(&structural.grammar()) {
            debug!("Failed to set language '{}' for parser: {:?}", id, e);
            return None;
        }

        self.parsers.insert(id, parser);
        self.parsers.get_mut(id)
    }

    /// Number of languages with a live parser
    #[cfg(test)]
    fn len(&self) -> usize {
        self.parsers.len()
    }

    #[cfg(test)]
    fn is_empty(&self) -> bool {
        self.parsers.is_empty()
    }
}
