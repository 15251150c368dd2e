//! Rust structural parser.
//!
//! Symbols: fn (including trait method signatures), struct, enum, union, trait,
//! mod, type, const, static, macro_rules. Imports: first segment of `use`
//! paths and `extern crate` names.

use tree_sitter::{Language, Node, Tree};

use super::{clean_doc, node_line, node_text, walk_preorder, Outline, StructuralParser};
use crate::model::Symbol;

const ITEM_KINDS: &[&str] = &[
    "function_item",
    "function_signature_item",
    "struct_item",
    "enum_item",
    "union_item",
    "trait_item",
    "mod_item",
    "type_item",
    "const_item",
    "static_item",
    "macro_definition",
];

/// Rust language structural parser.
pub struct RustParser;

impl StructuralParser for RustParser {
    fn language_id(&self) -> &'static str {
        "rust"
    }

    fn extensions(&self) -> &[&'static str] {
        &["rs"]
    }

    fn grammar(&self) -> Language {
        tree_sitter_rust::LANGUAGE.into()
    }

    fn outline(&self, tree: &Tree, source: &[u8]) -> Outline {
        let mut outline = Outline {
            description: crate_doc(&tree.root_node(), source),
            ..Default::default()
        };

        walk_preorder(tree, |node| {
            let kind = node.kind();
            if ITEM_KINDS.contains(&kind) {
                if let Some(name) = node.child_by_field_name("name") {
                    outline.symbols.push(Symbol::new(
                        node_text(&name, source),
                        node_line(&node),
                        outer_doc(&node, source),
                    ));
                }
            } else if kind == "use_declaration" {
                if let Some(root) = node
                    .child_by_field_name("argument")
                    .and_then(|arg| use_root(node_text(&arg, source)))
                {
                    outline.imports.insert(root);
                }
            } else if kind == "extern_crate_declaration" {
                if let Some(name) = node.child_by_field_name("name") {
                    outline.imports.insert(node_text(&name, source).to_string());
                }
            }
        });

        outline
    }
}

/// Leading `//!` / `/*! */` comments of the file.
fn crate_doc(root: &Node, source: &[u8]) -> String {
    let mut lines = Vec::new();
    let mut cursor = root.walk();

    for child in root.children(&mut cursor) {
        let text = node_text(&child, source).trim_end();
        match child.kind() {
            "line_comment" => {
                if let Some(rest) = text.strip_prefix("//!") {
                    lines.push(strip_one_space(rest).to_string());
                }
            }
            "block_comment" => {
                if let Some(inner) = block_inner(text, "/*!") {
                    lines.push(inner);
                }
            }
            "inner_attribute_item" | "shebang" => {}
            _ => break,
        }
    }

    lines.join("\n").trim().to_string()
}

/// `///` or `/** */` docs directly above an item, skipping attributes.
fn outer_doc(item: &Node, source: &[u8]) -> String {
    let mut lines = Vec::new();
    let mut current = item.prev_sibling();

    while let Some(sibling) = current {
        let text = node_text(&sibling, source).trim_end();
        match sibling.kind() {
            "attribute_item" => {}
            "line_comment" => match text.strip_prefix("///") {
                Some(rest) if !rest.starts_with('/') => {
                    lines.push(strip_one_space(rest).to_string());
                }
                _ => break,
            },
            "block_comment" if !text.starts_with("/***") => match block_inner(text, "/**") {
                Some(inner) => lines.push(inner),
                None => break,
            },
            _ => break,
        }
        current = sibling.prev_sibling();
    }

    lines.reverse();
    lines.join("\n").trim().to_string()
}

fn strip_one_space(s: &str) -> &str {
    s.strip_prefix(' ').unwrap_or(s)
}

fn block_inner(text: &str, opener: &str) -> Option<String> {
    let inner = text.strip_prefix(opener)?.strip_suffix("*/")?;
    let cleaned = clean_doc(inner)
        .lines()
        .map(|line| {
            let line = line.trim_start();
            line.strip_prefix("* ")
                .or_else(|| line.strip_prefix('*'))
                .unwrap_or(line)
        })
        .collect::<Vec<_>>()
        .join("\n");
    Some(cleaned)
}

/// First path segment of a `use` argument, ignoring crate-relative roots.
fn use_root(path: &str) -> Option<String> {
    let trimmed = path.trim_start().trim_start_matches("::");
    let end = trimmed
        .find(|c: char| !(c.is_alphanumeric() || c == '_'))
        .unwrap_or(trimmed.len());
    let segment = &trimmed[..end];

    if segment.is_empty() || matches!(segment, "crate" | "self" | "super") {
        None
    } else {
        Some(segment.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tree_sitter::Parser;

    fn outline(source: &str) -> Outline {
        let mut parser = Parser::new();
        parser
            .set_language(&RustParser.grammar())
            .expect("Failed to set Rust language");
        let tree = parser.parse(source, None).expect("Failed to parse");
        assert!(!tree.root_node().has_error(), "fixture must be valid Rust");
        RustParser.outline(&tree, source.as_bytes())
    }

    #[test]
    fn test_items_with_lines_and_docs() {
        let source = r#"//! Inventory tracking.
//!
//! Keeps stock levels.

use std::collections::HashMap;

/// A stock keeping unit.
#[derive(Debug)]
pub struct Sku {
    id: u32,
}

// plain comment
fn undocumented() {}

/// Restock everything.
pub fn restock(map: &mut HashMap<u32, u32>) {}
"#;
        let outline = outline(source);

        assert_eq!(outline.description, "Inventory tracking.\n\nKeeps stock levels.");
        assert_eq!(
            outline.symbols,
            vec![
                Symbol::new("Sku", 9, "A stock keeping unit."),
                Symbol::new("undocumented", 14, ""),
                Symbol::new("restock", 17, "Restock everything."),
            ]
        );
    }

    #[test]
    fn test_methods_traits_and_macros() {
        let source = r#"
trait Shape {
    fn area(&self) -> f64;
}

impl Shape for Square {
    fn area(&self) -> f64 { 1.0 }
}

macro_rules! square {
    ($x:expr) => { $x * $x };
}

const LIMIT: usize = 3;
type Id = u64;
mod nested {}
"#;
        let outline = outline(source);
        let names: Vec<_> = outline.symbols.iter().map(|s| s.name.as_str()).collect();

        assert_eq!(
            names,
            vec!["Shape", "area", "area", "square", "LIMIT", "Id", "nested"]
        );
    }

    #[test]
    fn test_use_roots() {
        let source = r#"
use std::fmt;
use std::io::{self, Read};
use serde::Serialize;
use crate::model::Index;
use super::helpers;
use ::tokio::sync::mpsc;
extern crate alloc;

fn inner() {
    use regex::Regex;
}
"#;
        let outline = outline(source);
        let imports: Vec<_> = outline.imports.iter().map(String::as_str).collect();

        assert_eq!(imports, vec!["alloc", "regex", "serde", "std", "tokio"]);
    }

    #[test]
    fn test_block_doc_comment() {
        let source = "/**\n * Adds numbers.\n */\nfn add() {}\n";
        let outline = outline(source);
        assert_eq!(outline.symbols[0].doc, "Adds numbers.");
    }

    #[test]
    fn test_use_root_helper() {
        assert_eq!(use_root("std::fmt"), Some("std".to_string()));
        assert_eq!(use_root("self::a"), None);
        assert_eq!(use_root("{a, b}"), None);
        assert_eq!(use_root("anyhow"), Some("anyhow".to_string()));
    }
}
