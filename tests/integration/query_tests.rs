use anyhow::Result;

use swarm_index::{QueryEngine, TextHit};

use crate::helpers::test_harness::TestHarness;

fn paths(hits: &[TextHit]) -> Vec<&str> {
    hits.iter().map(|h| h.path.as_str()).collect()
}

#[test]
fn test_end_to_end_widget_scenario() -> Result<()> {
    let harness = TestHarness::new()?;
    harness.create_test_file(
        "a.py",
        "\"\"\"Widget module.\"\"\"\n\ndef foo():\n    return 'widget'\n",
    )?;
    harness.create_test_file("b.py", "label = 'widget'\n")?;
    harness.build()?;

    let engine = harness.engine();

    // a.py: "Widget" in the docstring plus 'widget' in the body
    let hits = engine.by_text("widget", 5);
    assert_eq!(paths(&hits), vec!["a.py", "b.py"]);
    assert_eq!(hits[0].score, 2);
    assert_eq!(hits[1].score, 1);
    assert_eq!(hits[0].summary, "Widget module.");

    let symbols = engine.by_symbol("foo");
    assert_eq!(symbols.len(), 1);
    assert_eq!(symbols[0].path, "a.py");
    assert_eq!(symbols[0].symbol.lineno, 3);
    assert!(symbols[0].snippet.starts_with("\"\"\"Widget module.\"\"\""));
    Ok(())
}

#[test]
fn test_by_path_present_and_absent() -> Result<()> {
    let harness = TestHarness::new()?;
    harness.create_test_file("pkg/mod.py", "\"\"\"Package module.\"\"\"\nvalue = 1\n")?;
    harness.build()?;

    let engine = harness.engine();
    let hits = engine.by_path("pkg/mod.py");
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].summary, "Package module.");
    assert_eq!(hits[0].snippet, "\"\"\"Package module.\"\"\"\nvalue = 1");

    assert!(engine.by_path("pkg/missing.py").is_empty());
    assert!(engine.by_path("mod.py").is_empty());
    Ok(())
}

#[test]
fn test_scores_grow_with_more_occurrences() -> Result<()> {
    let harness = TestHarness::new()?;
    harness.create_test_file("a.py", "gizmo = 1\n")?;
    harness.build()?;
    let before = harness.engine().by_text("gizmo", 5)[0].score;

    harness.create_test_file("a.py", "gizmo = 1\ngizmo_count = gizmo + gizmo\n")?;
    harness.build()?;
    let after = harness.engine().by_text("gizmo", 5)[0].score;

    assert_eq!(before, 1);
    assert!(after >= before);
    assert_eq!(after, 3);
    Ok(())
}

#[test]
fn test_ties_break_by_path_and_limit_truncates() -> Result<()> {
    let harness = TestHarness::new()?;
    for name in ["d.py", "b.py", "c.py", "a.py"] {
        harness.create_test_file(name, "token_here = 1\n")?;
    }
    harness.build()?;

    let engine = harness.engine();
    assert_eq!(paths(&engine.by_text("token_here", 10)), vec!["a.py", "b.py", "c.py", "d.py"]);
    assert_eq!(paths(&engine.by_text("token_here", 2)), vec!["a.py", "b.py"]);
    assert!(engine.by_text("absent", 10).is_empty());
    Ok(())
}

#[test]
fn test_snippets_follow_working_tree() -> Result<()> {
    let harness = TestHarness::new()?;
    harness.create_test_file("a.py", "def foo():\n    pass\n")?;
    harness.create_test_file("b.py", "def foo():\n    return 2\n")?;
    harness.build()?;

    harness.create_test_file("a.py", "# edited\ndef foo():\n    pass\n")?;
    harness.remove_test_file("b.py")?;

    let hits = harness.engine().by_symbol("foo");
    assert_eq!(hits.len(), 2);
    assert!(hits[0].snippet.starts_with("# edited"));
    // stale entry, file gone: empty snippet rather than an error
    assert_eq!(hits[1].path, "b.py");
    assert_eq!(hits[1].snippet, "");
    Ok(())
}

#[test]
fn test_open_engine_keeps_its_snapshot() -> Result<()> {
    let harness = TestHarness::new()?;
    harness.create_test_file("a.py", "def first():\n    pass\n")?;
    harness.build()?;
    let engine = harness.engine();

    harness.create_test_file("b.py", "def second():\n    pass\n")?;
    harness.build()?;

    assert!(engine.by_symbol("second").is_empty());
    assert_eq!(harness.engine().by_symbol("second").len(), 1);
    Ok(())
}

#[test]
fn test_without_index_everything_is_empty() -> Result<()> {
    let harness = TestHarness::new()?;
    harness.create_test_file("a.py", "def foo():\n    pass\n")?;

    let engine = QueryEngine::open(harness.path());
    assert!(engine.by_symbol("foo").is_empty());
    assert!(engine.by_path("a.py").is_empty());
    assert!(engine.by_text("foo", 5).is_empty());
    Ok(())
}

#[test]
fn test_hits_serialize_with_stable_fields() -> Result<()> {
    let harness = TestHarness::new()?;
    harness.create_test_file("a.py", "def foo():\n    \"\"\"Doc.\"\"\"\n")?;
    harness.build()?;

    let hits = harness.engine().by_symbol("foo");
    let json = serde_json::to_value(&hits)?;
    assert_eq!(json[0]["path"], "a.py");
    assert_eq!(json[0]["symbol"]["name"], "foo");
    assert_eq!(json[0]["symbol"]["lineno"], 1);
    assert_eq!(json[0]["symbol"]["doc"], "Doc.");
    Ok(())
}
