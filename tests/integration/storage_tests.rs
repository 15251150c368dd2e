use anyhow::Result;
use std::fs;

use swarm_index::{load_index, Index, IndexStore, QueryEngine};

use crate::helpers::test_harness::TestHarness;

#[test]
fn test_persisted_layout() -> Result<()> {
    let harness = TestHarness::new()?;
    harness.create_test_file(
        "a.py",
        "\"\"\"Mod.\"\"\"\nimport os.path\n\ndef foo():\n    \"\"\"Foo doc.\"\"\"\n    return os.sep\n",
    )?;
    harness.build()?;

    let raw: serde_json::Value = serde_json::from_str(&fs::read_to_string(harness.index_path())?)?;
    let entry = &raw["files"]["a.py"];

    assert_eq!(entry["summary"], "Mod.");
    assert_eq!(entry["symbols"][0]["name"], "foo");
    assert_eq!(entry["symbols"][0]["lineno"], 4);
    assert_eq!(entry["symbols"][0]["doc"], "Foo doc.");
    assert_eq!(entry["imports"], serde_json::json!(["os"]));
    assert_eq!(entry["terms"]["foo"], 2);
    assert_eq!(entry["terms"]["return"], 1);
    Ok(())
}

#[test]
fn test_truncated_index_reads_as_empty() -> Result<()> {
    let harness = TestHarness::new()?;
    harness.create_test_file("a.py", "def foo():\n    pass\n")?;
    harness.build()?;

    let full = fs::read_to_string(harness.index_path())?;
    fs::write(harness.index_path(), &full[..full.len() / 2])?;

    assert!(IndexStore::at(harness.index_path()).load().is_err());
    assert!(load_index(harness.path()).is_empty());
    assert!(QueryEngine::open(harness.path()).by_symbol("foo").is_empty());
    Ok(())
}

#[test]
fn test_no_temp_file_left_behind() -> Result<()> {
    let harness = TestHarness::new()?;
    harness.create_test_file("a.py", "x = 1\n")?;
    harness.build()?;
    harness.build()?;

    let names: Vec<_> = fs::read_dir(harness.path().join(".cswarm"))?
        .filter_map(|e| e.ok())
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["index.json"]);
    Ok(())
}

#[test]
fn test_hand_written_index_is_accepted() -> Result<()> {
    let harness = TestHarness::new()?;
    harness.create_test_file(
        ".cswarm/index.json",
        r#"{"files": {"x.py": {"symbols": [{"name": "legacy", "lineno": 7}]}}}"#,
    )?;

    let index: Index = load_index(harness.path());
    let entry = index.get("x.py").unwrap();
    assert_eq!(entry.symbols[0].name, "legacy");
    assert_eq!(entry.symbols[0].doc, "");
    assert!(entry.terms.is_empty());
    Ok(())
}
