//! Python structural parser.
//!
//! Symbols: `def`, `async def`, `class` at any nesting depth.
//! Imports: `import a.b`, `from a.b import c`, `from .a import c`, `from __future__ import x`.

use std::collections::BTreeSet;

use tree_sitter::{Language, Node, Tree};

use super::{clean_doc, node_line, node_text, walk_preorder, Outline, StructuralParser};
use crate::model::Symbol;

/// Python language structural parser.
pub struct PythonParser;

impl StructuralParser for PythonParser {
    fn language_id(&self) -> &'static str {
        "python"
    }

    fn extensions(&self) -> &[&'static str] {
        &["py", "pyi"]
    }

    fn grammar(&self) -> Language {
        tree_sitter_python::LANGUAGE.into()
    }

    fn outline(&self, tree: &Tree, source: &[u8]) -> Outline {
        let mut outline = Outline {
            description: docstring(&tree.root_node(), source).unwrap_or_default(),
            ..Default::default()
        };

        walk_preorder(tree, |node| match node.kind() {
            "function_definition" | "class_definition" => {
                if let Some(name) = node.child_by_field_name("name") {
                    let doc = node
                        .child_by_field_name("body")
                        .and_then(|body| docstring(&body, source))
                        .unwrap_or_default();
                    // The def/class keyword line, not the first decorator
                    outline
                        .symbols
                        .push(Symbol::new(node_text(&name, source), node_line(&node), doc));
                }
            }
            "import_statement" => collect_imported_names(&node, source, &mut outline.imports),
            "import_from_statement" => {
                if let Some(root) = node
                    .child_by_field_name("module_name")
                    .and_then(|module| module_root(&module, source))
                {
                    outline.imports.insert(root);
                }
            }
            "future_import_statement" => {
                outline.imports.insert("__future__".to_string());
            }
            _ => {}
        });

        outline
    }

    /// Python 2 statements are in the grammar but are not valid Python 3.
    fn first_rejected_line(&self, tree: &Tree, _source: &[u8]) -> Option<usize> {
        let mut line = None;
        walk_preorder(tree, |node| {
            if line.is_none() && matches!(node.kind(), "print_statement" | "exec_statement") {
                line = Some(node_line(&node));
            }
        });
        line
    }
}

/// Docstring of a module or block: its first statement, if that is a plain string.
fn docstring(container: &Node, source: &[u8]) -> Option<String> {
    let mut cursor = container.walk();
    let first = container
        .named_children(&mut cursor)
        .find(|n| n.kind() != "comment")?;
    if first.kind() != "expression_statement" {
        return None;
    }

    let mut inner = first.walk();
    let mut exprs = first.named_children(&mut inner);
    let expr = exprs.next()?;
    if exprs.next().is_some() || expr.kind() != "string" {
        return None;
    }

    string_literal_value(node_text(&expr, source)).map(|s| clean_doc(&s))
}

/// Value of a str literal; `None` for bytes and f-strings.
fn string_literal_value(raw: &str) -> Option<String> {
    let quote_pos = raw.find(|c| c == '"' || c == '\'')?;
    let prefix = raw[..quote_pos].to_ascii_lowercase();
    if prefix.contains('b') || prefix.contains('f') {
        return None;
    }

    let body = &raw[quote_pos..];
    let delim = if body.starts_with("\"\"\"") || body.starts_with("'''") {
        3
    } else {
        1
    };
    if body.len() < 2 * delim {
        return None;
    }
    let inner = &body[delim..body.len() - delim];

    if prefix.contains('r') {
        Some(inner.to_string())
    } else {
        Some(unescape(inner))
    }
}

fn unescape(body: &str) -> String {
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('\\') => out.push('\\'),
            Some('\'') => out.push('\''),
            Some('"') => out.push('"'),
            // line continuation
            Some('\n') => {}
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

fn collect_imported_names(node: &Node, source: &[u8], imports: &mut BTreeSet<String>) {
    let mut cursor = node.walk();
    for name in node.children_by_field_name("name", &mut cursor) {
        let dotted = match name.kind() {
            "aliased_import" => name.child_by_field_name("name"),
            _ => Some(name),
        };
        if let Some(root) = dotted.and_then(|d| first_segment(node_text(&d, source))) {
            imports.insert(root);
        }
    }
}

/// Root module of a `from X import ...` target. Bare relative imports have none.
fn module_root(module: &Node, source: &[u8]) -> Option<String> {
    match module.kind() {
        "dotted_name" => first_segment(node_text(module, source)),
        "relative_import" => {
            let mut cursor = module.walk();
            let dotted = module
                .named_children(&mut cursor)
                .find(|n| n.kind() == "dotted_name")?;
            first_segment(node_text(&dotted, source))
        }
        _ => None,
    }
}

fn first_segment(dotted: &str) -> Option<String> {
    let segment = dotted.split('.').next()?.trim();
    (!segment.is_empty()).then(|| segment.to_string())
}
