//! Go structural parser.
//!
//! Symbols: functions, methods, type specs and aliases. Imports: first `/`
//! segment of each import path.

use tree_sitter::{Language, Node, Tree};

use super::{clean_doc, node_line, node_text, walk_preorder, Outline, StructuralParser};
use crate::model::Symbol;

/// Go language structural parser.
pub struct GoParser;

impl StructuralParser for GoParser {
    fn language_id(&self) -> &'static str {
        "go"
    }

    fn extensions(&self) -> &[&'static str] {
        &["go"]
    }

    fn grammar(&self) -> Language {
        tree_sitter_go::LANGUAGE.into()
    }

    fn outline(&self, tree: &Tree, source: &[u8]) -> Outline {
        let mut outline = Outline::default();

        walk_preorder(tree, |node| match node.kind() {
            "package_clause" => {
                outline.description = leading_comments(&node, source);
            }
            "function_declaration" | "method_declaration" => {
                if let Some(name) = node.child_by_field_name("name") {
                    outline.symbols.push(Symbol::new(
                        node_text(&name, source),
                        node_line(&node),
                        leading_comments(&node, source),
                    ));
                }
            }
            "type_spec" | "type_alias" => {
                if let Some(name) = node.child_by_field_name("name") {
                    let mut doc = leading_comments(&node, source);
                    if doc.is_empty() {
                        if let Some(decl) = node.parent().filter(|p| p.kind() == "type_declaration") {
                            doc = leading_comments(&decl, source);
                        }
                    }
                    outline
                        .symbols
                        .push(Symbol::new(node_text(&name, source), node_line(&node), doc));
                }
            }
            "import_spec" => {
                if let Some(root) = node
                    .child_by_field_name("path")
                    .and_then(|path| import_root(node_text(&path, source)))
                {
                    outline.imports.insert(root);
                }
            }
            _ => {}
        });

        outline
    }
}

/// Comment lines ending on the line directly above `node`, without gaps.
fn leading_comments(node: &Node, source: &[u8]) -> String {
    let mut lines = Vec::new();
    let mut expected_row = node.start_position().row;
    let mut current = node.prev_named_sibling();

    while let Some(sibling) = current {
        if sibling.kind() != "comment" || sibling.end_position().row + 1 != expected_row {
            break;
        }
        lines.push(comment_body(node_text(&sibling, source)));
        expected_row = sibling.start_position().row;
        current = sibling.prev_named_sibling();
    }

    lines.reverse();
    lines.join("\n").trim().to_string()
}

fn comment_body(text: &str) -> String {
    let text = text.trim_end();
    if let Some(rest) = text.strip_prefix("//") {
        rest.strip_prefix(' ').unwrap_or(rest).to_string()
    } else if let Some(inner) = text.strip_prefix("/*").and_then(|t| t.strip_suffix("*/")) {
        clean_doc(inner)
    } else {
        text.to_string()
    }
}

fn import_root(literal: &str) -> Option<String> {
    let path = literal.trim_matches(|c| c == '"' || c == '`');
    let segment = path.split('/').next()?.trim();
    (!segment.is_empty()).then(|| segment.to_string())
}
