//! Language-specific structural parsers.
//!
//! Each parser knows how to read a tree-sitter tree for one grammar and
//! produce an [`Outline`]: the file description, declared symbols and
//! imported top-level modules.

pub mod go;
pub mod python;
pub mod rust;

use std::collections::{BTreeSet, HashMap};

use tree_sitter::{Language, Node, Tree};

use crate::model::Symbol;

pub use go::GoParser;
pub use python::PythonParser;
pub use rust::RustParser;

/// Structural facts extracted from one parsed file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Outline {
    pub description: String,
    /// In declaration order
    pub symbols: Vec<Symbol>,
    pub imports: BTreeSet<String>,
}

/// Trait for language-specific structural parsers.
///
/// Implementations only see syntactically valid trees; files with syntax
/// errors are degraded by the analyzer before `outline` is called.
pub trait StructuralParser: Send + Sync {
    /// Language identifier (e.g. "python")
    fn language_id(&self) -> &'static str;

    /// File extensions handled by this parser, without the dot
    fn extensions(&self) -> &[&'static str];

    /// Tree-sitter grammar for this language
    fn grammar(&self) -> Language;

    /// Extract the outline from a parsed tree.
    fn outline(&self, tree: &Tree, source: &[u8]) -> Outline;

    /// 1-based line of a construct the grammar accepts but the language
    /// itself rejects. Such files are degraded like syntax errors.
    fn first_rejected_line(&self, _tree: &Tree, _source: &[u8]) -> Option<usize> {
        None
    }
}

/// Registry of structural parsers keyed by file extension.
pub struct ParserRegistry {
    parsers: Vec<Box<dyn StructuralParser>>,
    by_extension: HashMap<&'static str, usize>,
}

impl ParserRegistry {
    /// Create a registry with all built-in parsers.
    pub fn new() -> Self {
        let mut registry = Self::empty();
        registry.register(Box::new(PythonParser));
        registry.register(Box::new(RustParser));
        registry.register(Box::new(GoParser));
        registry
    }

    /// Registry without any parsers (every file is indexed lexically)
    pub fn empty() -> Self {
        Self {
            parsers: Vec::new(),
            by_extension: HashMap::new(),
        }
    }

    /// Register a parser; later registrations win for shared extensions.
    pub fn register(&mut self, parser: Box<dyn StructuralParser>) {
        let slot = self.parsers.len();
        for ext in parser.extensions() {
            self.by_extension.insert(ext, slot);
        }
        self.parsers.push(parser);
    }

    pub fn for_extension(&self, ext: &str) -> Option<&dyn StructuralParser> {
        self.by_extension
            .get(ext)
            .map(|&slot| self.parsers[slot].as_ref())
    }
}

impl Default for ParserRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Text of a node, empty if the range is not valid UTF-8.
pub fn node_text<'a>(node: &Node, source: &'a [u8]) -> &'a str {
    node.utf8_text(source).unwrap_or("")
}

/// 1-based start line of a node
pub fn node_line(node: &Node) -> usize {
    node.start_position().row + 1
}

/// Visit every node of `tree` in document order without recursion.
pub fn walk_preorder<'t>(tree: &'t Tree, mut visit: impl FnMut(Node<'t>)) {
    let mut cursor = tree.walk();
    loop {
        visit(cursor.node());
        if cursor.goto_first_child() {
            continue;
        }
        loop {
            if cursor.goto_next_sibling() {
                break;
            }
            if !cursor.goto_parent() {
                return;
            }
        }
    }
}

/// 1-based line of the first error or missing node, if any.
pub fn first_error_line(tree: &Tree) -> Option<usize> {
    if !tree.root_node().has_error() {
        return None;
    }
    let mut line = None;
    walk_preorder(tree, |node| {
        if line.is_none() && (node.is_error() || node.is_missing()) {
            line = Some(node_line(&node));
        }
    });
    line.or(Some(1))
}

/// Normalize a block of documentation text.
///
/// Expands tabs, strips the first line's leading whitespace, removes the
/// common indentation of the remaining lines and drops blank lines at both
/// ends.
pub fn clean_doc(raw: &str) -> String {
    let expanded = raw.replace('\t', "        ");
    let mut lines: Vec<&str> = expanded.lines().collect();
    if lines.is_empty() {
        return String::new();
    }

    let margin = lines
        .iter()
        .skip(1)
        .filter(|l| !l.trim().is_empty())
        .map(|l| l.len() - l.trim_start().len())
        .min()
        .unwrap_or(0);

    let mut cleaned: Vec<String> = Vec::with_capacity(lines.len());
    cleaned.push(lines.remove(0).trim_start().to_string());
    for line in lines {
        let cut = margin.min(line.len() - line.trim_start().len());
        let rest = line.get(cut..).unwrap_or_else(|| line.trim_start());
        cleaned.push(rest.trim_end().to_string());
    }

    while cleaned.last().is_some_and(|l| l.trim().is_empty()) {
        cleaned.pop();
    }
    while cleaned.first().is_some_and(|l| l.trim().is_empty()) {
        cleaned.remove(0);
    }

    cleaned.join("\n")
}
