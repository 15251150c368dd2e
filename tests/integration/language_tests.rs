use anyhow::Result;

use crate::helpers::test_harness::TestHarness;

#[test]
fn test_python_project() -> Result<()> {
    let harness = TestHarness::new()?;
    harness.create_test_file(
        "service/api.py",
        r#""""HTTP handlers."""
from __future__ import annotations

import json
from .models import User
from . import helpers

class Router:
    """Dispatch requests."""

    @staticmethod
    def route(path):
        return json.dumps(path)

async def serve():
    pass
"#,
    )?;

    let outcome = harness.build()?;
    let api = outcome.index.get("service/api.py").unwrap();

    assert_eq!(api.summary, "HTTP handlers.");
    let symbols: Vec<_> = api.symbols.iter().map(|s| (s.name.as_str(), s.lineno)).collect();
    assert_eq!(symbols, vec![("Router", 8), ("route", 12), ("serve", 15)]);
    assert_eq!(api.symbols[0].doc, "Dispatch requests.");

    let imports: Vec<_> = api.imports.iter().map(String::as_str).collect();
    assert_eq!(imports, vec!["__future__", "json", "models"]);
    Ok(())
}

#[test]
fn test_rust_project() -> Result<()> {
    let harness = TestHarness::new()?;
    harness.create_test_file(
        "src/lib.rs",
        r#"//! Order book.

use std::collections::BTreeMap;
use serde::Serialize;
use crate::util::helper;

/// Price level.
#[derive(Serialize)]
pub struct Level {
    price: u64,
}

pub enum Side {
    Bid,
    Ask,
}

impl Level {
    /// Create a level.
    pub fn new(price: u64) -> Self {
        Self { price }
    }
}
"#,
    )?;

    let outcome = harness.build()?;
    let lib = outcome.index.get("src/lib.rs").unwrap();

    assert_eq!(lib.summary, "Order book.");
    let symbols: Vec<_> = lib.symbols.iter().map(|s| (s.name.as_str(), s.lineno)).collect();
    assert_eq!(symbols, vec![("Level", 9), ("Side", 13), ("new", 20)]);
    assert_eq!(lib.symbols[0].doc, "Price level.");
    assert_eq!(lib.symbols[2].doc, "Create a level.");

    let imports: Vec<_> = lib.imports.iter().map(String::as_str).collect();
    assert_eq!(imports, vec!["serde", "std"]);
    Ok(())
}

#[test]
fn test_go_project() -> Result<()> {
    let harness = TestHarness::new()?;
    harness.create_test_file(
        "cmd/server/main.go",
        r#"// Command server runs the API.
package main

import (
	"net/http"
	"github.com/example/app/handlers"
)

// Config holds settings.
type Config struct {
	Addr string
}

// Start launches the server.
func (c Config) Start() error {
	return http.ListenAndServe(c.Addr, handlers.New())
}

func main() {}
"#,
    )?;

    let outcome = harness.build()?;
    let main = outcome.index.get("cmd/server/main.go").unwrap();

    assert_eq!(main.summary, "Command server runs the API.");
    let symbols: Vec<_> = main.symbols.iter().map(|s| (s.name.as_str(), s.lineno)).collect();
    assert_eq!(symbols, vec![("Config", 10), ("Start", 15), ("main", 19)]);
    assert_eq!(main.symbols[1].doc, "Start launches the server.");

    let imports: Vec<_> = main.imports.iter().map(String::as_str).collect();
    assert_eq!(imports, vec!["github.com", "net"]);
    Ok(())
}

#[test]
fn test_mixed_project_symbol_lookup() -> Result<()> {
    let harness = TestHarness::new()?;
    harness.create_test_file("a.py", "def handle():\n    pass\n")?;
    harness.create_test_file("b.rs", "fn handle() {}\n")?;
    harness.create_test_file("c.go", "package c\n\nfunc handle() {}\n")?;
    harness.create_test_file("notes.txt", "def handle(): not indexed\n")?;
    harness.build()?;

    let hits = harness.engine().by_symbol("handle");
    let found: Vec<_> = hits.iter().map(|h| (h.path.as_str(), h.symbol.lineno)).collect();
    assert_eq!(found, vec![("a.py", 1), ("b.rs", 1), ("c.go", 3)]);
    Ok(())
}

#[test]
fn test_line_endings_and_python2_sources() -> Result<()> {
    let harness = TestHarness::new()?;
    harness.create_test_file("mac.py", "x = 1\r\ry = 2\rdef foo():\r    pass\r")?;
    harness.create_test_file("legacy.py", "print \"hello\"\n\ndef bar():\n    pass\n")?;

    let outcome = harness.build()?;

    let mac = outcome.index.get("mac.py").unwrap();
    assert_eq!(mac.symbols[0].name, "foo");
    assert_eq!(mac.symbols[0].lineno, 4);

    let legacy = outcome.index.get("legacy.py").unwrap();
    assert!(legacy.symbols.is_empty());
    assert_eq!(legacy.term_count("hello"), 1);
    assert_eq!(outcome.report.degraded.len(), 1);
    assert_eq!(outcome.report.degraded[0].path, std::path::PathBuf::from("legacy.py"));

    let hits = harness.engine().by_symbol("foo");
    assert!(hits[0].snippet.starts_with("x = 1\n\ny = 2\ndef foo():"));
    Ok(())
}
