//! End-to-end rule tests.
//!
//! Drives rules through the public handlers against the in-memory document,
//! and loads rule files from disk.

use std::io::Write;
use std::sync::{Arc, Mutex};

use oa_autoreplace::{
    AutoReplace, Document, EditorState, InputData, InputEvent, Offsets, Outcome, ReplaceError,
    RulesFile, SideMatch, Transform, get_matches, get_offsets,
};
use regex::Regex;

#[test]
fn test_dash_space_scenario() {
    let captured: Arc<Mutex<Option<SideMatch>>> = Arc::new(Mutex::new(None));
    let sink = Arc::clone(&captured);

    let rule = AutoReplace::<Document>::builder()
        .trigger(" ")
        .before(Regex::new("^(-)$").expect("pattern should compile"))
        .transform(move |t, _, _, m| {
            *sink.lock().expect("lock should not be poisoned") = m.before.clone();
            t.set_block_type("list-item").insert_text("• ");
            Ok(())
        })
        .build()
        .expect("rule should build");

    let state = Document::single("paragraph", "-", 1);
    let m = rule.find_match(&state).expect("dash should match");
    assert_eq!(get_offsets(&m, 1), Offsets { start: 0, end: 1 });

    let mut event = InputEvent::insert(" ");
    let outcome = rule
        .on_before_input(&mut event, &InputData::default(), &state)
        .expect("should not error");

    assert!(event.default_prevented());
    assert!(outcome.is_replaced());
    let doc = outcome.unwrap_or(state);
    assert_eq!(doc.start_text(), "• ");
    assert_eq!(doc.start_block_type(), "list-item");

    let before = captured
        .lock()
        .expect("lock should not be poisoned")
        .clone()
        .expect("transform should see the before match");
    assert_eq!(before.capture.as_deref(), Some("-"));
}

#[test]
fn test_bold_scenario_between_markers() {
    let rule = AutoReplace::<Document>::builder()
        .name("bold")
        .trigger("*")
        .before(Regex::new(r"\*\*(\w+)$").expect("pattern should compile"))
        .after(Regex::new(r"^\*\*").expect("pattern should compile"))
        .transform(|t, _, _, m| {
            let word = m.before.as_ref().and_then(|b| b.capture.as_deref()).unwrap_or("");
            t.insert_text(&format!("<b>{word}</b>"));
            Ok(())
        })
        .build()
        .expect("rule should build");

    let state = Document::single("paragraph", "**bold**", 6);
    let mut event = InputEvent::default();
    let doc = rule
        .on_key_down(&mut event, &InputData::key("*"), &state)
        .expect("should not error")
        .unwrap_or(state);

    // Only group 1 of `before` is deleted; the `after` side has no group.
    assert_eq!(doc.start_text(), "**<b>bold</b>**");
}

#[test]
fn test_both_patterns_all_or_nothing() {
    let before = Regex::new(r"\*\*(\w+)$").expect("pattern should compile");
    let after = Regex::new(r"^\*\*").expect("pattern should compile");

    assert!(get_matches("**bold**", 6, Some(&before), Some(&after)).is_some());
    assert!(get_matches("**bold", 6, Some(&before), Some(&after)).is_none());
    assert!(get_matches("bold**", 4, Some(&before), Some(&after)).is_none());
}

#[test]
fn test_expanded_selection_always_noop() {
    let rule = AutoReplace::<Document>::builder()
        .trigger(" ")
        .before(Regex::new("(.*)").expect("pattern should compile"))
        .transform(|t, _, _, _| {
            t.insert_text("!");
            Ok(())
        })
        .build()
        .expect("rule should build");

    let state = Document::single("paragraph", "anything", 0).with_selection(0, 3);
    let mut event = InputEvent::insert(" ");
    let out = rule
        .on_before_input(&mut event, &InputData::default(), &state)
        .expect("should not error");
    assert_eq!(out, Outcome::Unchanged);
    assert!(!event.default_prevented());
}

#[test]
fn test_rejection_is_idempotent() {
    let rule = AutoReplace::<Document>::builder()
        .trigger(" ")
        .before(Regex::new("^(-)$").expect("pattern should compile"))
        .ignore_in("code")
        .transform(|_, _, _, _| Ok(()))
        .build()
        .expect("rule should build");

    let state = Document::single("code", "-", 1);
    let first = rule
        .on_key_down(&mut InputEvent::default(), &InputData::key(" "), &state)
        .expect("should not error");
    let second = rule
        .on_key_down(&mut InputEvent::default(), &InputData::key(" "), &state)
        .expect("should not error");
    assert_eq!(first, Outcome::Unchanged);
    assert_eq!(first, second);
}

#[test]
fn test_rules_file_from_disk() {
    let mut file = tempfile::NamedTempFile::new().expect("should create temp file");
    write!(
        file,
        r#"{{ "rules": [
            {{ "name": "heading", "trigger": " ", "before": "^(#)$",
               "ignoreIn": "code", "action": {{ "setBlock": "heading-one" }} }},
            {{ "name": "arrow", "trigger": {{ "pattern": ">" }}, "before": "(-)$",
               "action": {{ "insert": "→" }} }}
        ] }}"#
    )
    .expect("should write rule file");

    let rules = RulesFile::load(file.path())
        .expect("should load rule file")
        .build::<Document>()
        .expect("should build rule set");
    assert_eq!(rules.len(), 2);
    let names: Vec<_> = rules.iter().filter_map(AutoReplace::name).collect();
    assert_eq!(names, ["heading", "arrow"]);

    let state = Document::single("paragraph", "a -", 3);
    let mut event = InputEvent::insert(">");
    let doc = rules
        .on_before_input(&mut event, &InputData::default(), &state)
        .expect("should not error")
        .unwrap_or(state);
    assert_eq!(doc.start_text(), "a →");

    let code = Document::single("code", "#", 1);
    let out = rules
        .on_key_down(&mut InputEvent::default(), &InputData::key(" "), &code)
        .expect("should not error");
    assert_eq!(out, Outcome::Unchanged);
}

#[test]
fn test_rules_file_missing() {
    let dir = tempfile::tempdir().expect("should create temp dir");
    let err = RulesFile::load(&dir.path().join("nope.json")).expect_err("missing file should fail");
    assert!(matches!(err, ReplaceError::Io { .. }));
}

#[test]
fn test_handle_state_is_untouched_by_transform() {
    let state = Document::single("paragraph", "keep", 4);
    let mut t = state.transform();
    t.move_to_offsets(0, 4).delete().insert_text("gone");
    drop(t);
    assert_eq!(state.start_text(), "keep");
}
