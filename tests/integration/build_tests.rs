use anyhow::Result;
use std::fs;

use swarm_index::{build_index, load_index, IndexBuilder, IndexError, ProcessingStage};

use crate::helpers::test_harness::TestHarness;

#[test]
fn test_rebuild_is_byte_identical() -> Result<()> {
    let harness = TestHarness::new()?;
    harness.create_test_file("app/main.py", "import os\n\ndef run():\n    \"\"\"Run it.\"\"\"\n    return os.getcwd()\n")?;
    harness.create_test_file("app/util.py", "class Helper:\n    def help(self):\n        pass\n")?;
    harness.create_test_file("lib.rs", "//! Library.\nuse std::fmt;\npub struct Thing;\n")?;
    harness.create_test_file("cmd/main.go", "package main\n\nimport \"fmt\"\n\nfunc main() { fmt.Println() }\n")?;

    harness.build()?;
    let first = fs::read(harness.index_path())?;
    harness.build()?;
    let second = fs::read(harness.index_path())?;

    assert_eq!(first, second);
    Ok(())
}

#[test]
fn test_excluded_directories_never_indexed() -> Result<()> {
    let harness = TestHarness::new()?;
    harness.create_test_file("keep.py", "x = 1\n")?;
    harness.create_test_file("src/keep_too.py", "x = 1\n")?;
    harness.create_test_file("a/.hidden/b/file.py", "x = 1\n")?;
    harness.create_test_file("deep/er/venv/lib/site.py", "x = 1\n")?;
    harness.create_test_file("pkg/__pycache__/mod.py", "x = 1\n")?;
    harness.create_test_file(".git/hooks/post.py", "x = 1\n")?;
    harness.create_test_file(".cswarm/stray.py", "x = 1\n")?;

    let outcome = harness.build()?;
    let keys: Vec<_> = outcome.index.files.keys().map(String::as_str).collect();

    assert_eq!(keys, vec!["keep.py", "src/keep_too.py"]);
    Ok(())
}

#[test]
fn test_malformed_file_does_not_block_others() -> Result<()> {
    let harness = TestHarness::new()?;
    harness.create_test_file("good.py", "def fine():\n    return 1\n")?;
    harness.create_test_file("bad.py", "def broken(:\n    widget = 'still counted'\n")?;
    harness.create_test_file("other.py", "class Other:\n    pass\n")?;

    let outcome = harness.build()?;

    assert_eq!(outcome.index.len(), 3);
    assert_eq!(outcome.index.get("good.py").unwrap().symbols[0].name, "fine");
    assert_eq!(outcome.index.get("other.py").unwrap().symbols[0].name, "Other");

    let bad = outcome.index.get("bad.py").unwrap();
    assert!(bad.symbols.is_empty());
    assert!(!bad.terms.is_empty());
    assert_eq!(bad.term_count("widget"), 1);

    assert_eq!(outcome.report.degraded.len(), 1);
    assert_eq!(outcome.report.degraded[0].stage, ProcessingStage::Parse);
    assert!(outcome.persisted());
    Ok(())
}

#[test]
fn test_explicit_output_creates_parents() -> Result<()> {
    let harness = TestHarness::new()?;
    harness.create_test_file("a.py", "def foo():\n    pass\n")?;

    let output = harness.path().join("out/nested/index.json");
    let index = build_index(harness.path(), Some(&output))?;

    assert!(output.exists());
    assert!(!harness.index_path().exists());
    assert_eq!(index.len(), 1);
    Ok(())
}

#[test]
fn test_failed_save_still_returns_index() -> Result<()> {
    let harness = TestHarness::new()?;
    harness.create_test_file("a.py", "def foo():\n    pass\n")?;
    harness.create_test_file("not_a_dir", "plain file")?;

    let output = harness.path().join("not_a_dir/index.json");
    let outcome = IndexBuilder::new(harness.path(), harness.config.clone()).build(Some(&output))?;

    assert!(matches!(outcome.persist_error, Some(IndexError::Persistence { .. })));
    assert_eq!(outcome.index.get("a.py").unwrap().symbols[0].lineno, 1);

    // build_index swallows the save failure the same way
    let index = build_index(harness.path(), Some(&output))?;
    assert_eq!(index, outcome.index);
    Ok(())
}

#[test]
fn test_missing_root_is_fatal() -> Result<()> {
    let harness = TestHarness::new()?;
    let missing = harness.path().join("nope");

    let err = build_index(&missing, None).unwrap_err();
    assert!(matches!(err, IndexError::NotFound { .. }));
    assert!(load_index(&missing).is_empty());
    Ok(())
}

#[test]
fn test_project_config_is_honoured() -> Result<()> {
    let harness = TestHarness::new()?;
    harness.create_test_file("a.py", "x = 1\n")?;
    harness.create_test_file("b.rs", "fn b() {}\n")?;
    harness.create_test_file("vendor/c.py", "x = 1\n")?;
    harness.create_test_file(
        ".cswarm/config.toml",
        "[indexer]\nextensions = [\"py\"]\nexclude_dirs = [\"vendor\"]\n\n[storage]\nindex_file = \"custom.json\"\n",
    )?;

    let index = build_index(harness.path(), None)?;
    let keys: Vec<_> = index.files.keys().map(String::as_str).collect();

    assert_eq!(keys, vec!["a.py"]);
    assert!(harness.path().join(".cswarm/custom.json").exists());
    assert_eq!(load_index(harness.path()), index);
    Ok(())
}

#[test]
fn test_rebuild_drops_deleted_files() -> Result<()> {
    let harness = TestHarness::new()?;
    harness.create_test_file("a.py", "x = 1\n")?;
    harness.create_test_file("b.py", "y = 2\n")?;
    assert_eq!(harness.build()?.index.len(), 2);

    harness.remove_test_file("b.py")?;
    let outcome = harness.build()?;

    assert_eq!(outcome.index.len(), 1);
    assert_eq!(load_index(harness.path()).len(), 1);
    Ok(())
}
