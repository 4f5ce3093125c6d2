#![allow(clippy::unwrap_used, clippy::expect_used)]

//! Preview/commit protocol across schemas

mod common;

use common::{commit_fixture, entries, load_fixture, preview_fixture, run, run_with};
use schemaport_core::errors::SchemaPortError;
use schemaport_core::import::{reconcile, Mode, Schema};
use schemaport_core::ledger::Ledger;
use schemaport_core::model::{Condition, OptionItem, OptionSet, View};
use schemaport_core::ops::{MemoryStore, Store};
use schemaport_core::policy::{ImportPolicy, ViewWalkPolicy};
use schemaport_core::xml::parse_document;

const YES_NO: &str = "http://example.com/terms/options/yes_no";
const YES: &str = "http://example.com/terms/options/yes_no/yes";
const NO: &str = "http://example.com/terms/options/yes_no/no";

#[test]
fn test_preview_then_commit_then_preview_is_idempotent() {
    let mut store = MemoryStore::new();

    let preview = preview_fixture(Schema::Options, "options.xml", &mut store);
    assert!(store.is_empty());

    let commit = run(
        Schema::Options,
        &load_fixture("options.xml"),
        &mut store,
        preview.ledger,
        Mode::Commit,
    );
    assert_eq!(commit.report.saved.len(), 3);

    let again = preview_fixture(Schema::Options, "options.xml", &mut store);
    assert_eq!(
        entries(&again.ledger),
        vec![
            (YES_NO.to_string(), false),
            (NO.to_string(), false),
            (YES.to_string(), false),
        ]
    );
}

#[test]
fn test_declined_entry_is_not_written() {
    let mut store = MemoryStore::new();
    let preview = preview_fixture(Schema::Options, "options.xml", &mut store);

    let mut decisions = preview.ledger.into_decisions();
    decisions.insert(NO.to_string(), false);

    let commit = run(
        Schema::Options,
        &load_fixture("options.xml"),
        &mut store,
        Ledger::from_decisions(decisions),
        Mode::Commit,
    );

    assert!(store.load::<OptionSet>(YES_NO).unwrap().is_some());
    assert!(store.load::<OptionItem>(YES).unwrap().is_some());
    assert_eq!(store.load::<OptionItem>(NO).unwrap(), None);

    // The returned ledger carries this run's change flag, not the decision
    assert_eq!(commit.ledger.get(NO), Some(true));
    assert!(!commit.report.saved_uris().any(|uri| uri == NO));
}

#[test]
fn test_uri_missing_from_supplied_ledger_is_approved() {
    let mut store = MemoryStore::new();
    let mut decisions = std::collections::BTreeMap::new();
    decisions.insert("http://example.com/terms/views/unrelated".to_string(), false);

    let commit = run(
        Schema::Views,
        &load_fixture("views.xml"),
        &mut store,
        Ledger::from_decisions(decisions),
        Mode::Commit,
    );

    assert!(store
        .load::<View>("http://example.com/terms/views/summary")
        .unwrap()
        .is_some());
    // Supplied entries the walk never touched are carried through
    assert_eq!(
        commit.ledger.get("http://example.com/terms/views/unrelated"),
        Some(false)
    );
}

#[test]
fn test_first_record_of_a_uri_wins() {
    let doc = parse_document(
        br#"<views xmlns:dc="http://purl.org/dc/elements/1.1/">
  <view>
    <dc:uri>http://example.com/terms/views/twice</dc:uri>
    <title lang="en">Same</title>
  </view>
  <view>
    <dc:uri>http://example.com/terms/views/twice</dc:uri>
    <title lang="en">Different</title>
  </view>
</views>"#,
    )
    .unwrap();

    let mut store = MemoryStore::new();
    let stored = View {
        uri: "http://example.com/terms/views/twice".to_string(),
        uri_prefix: "http://example.com/terms".to_string(),
        key: "twice".to_string(),
        title: schemaport_core::model::LocalizedText::new().with("en", "Same"),
        ..View::default()
    };
    store.save(&stored).unwrap();

    let policy = ImportPolicy {
        view_walk: ViewWalkPolicy::All,
        ..ImportPolicy::default()
    };
    let run = run_with(Schema::Views, &doc, &mut store, Ledger::new(), Mode::Preview, &policy);

    assert_eq!(run.ledger.get("http://example.com/terms/views/twice"), Some(false));
    assert_eq!(run.report.changes.len(), 1);
}

#[test]
fn test_commit_without_changes_still_rewrites_approved_records() {
    let mut store = MemoryStore::new();
    commit_fixture(Schema::Views, "views.xml", &mut store);
    let second = commit_fixture(Schema::Views, "views.xml", &mut store);

    assert_eq!(
        second.ledger.get("http://example.com/terms/views/summary"),
        Some(false)
    );
    assert_eq!(second.report.saved.len(), 1);
}

#[test]
fn test_wrong_root_is_rejected_before_any_work() {
    let mut store = MemoryStore::new();
    let err = reconcile(
        Schema::Tasks,
        &load_fixture("views.xml"),
        &mut store,
        Ledger::new(),
        Mode::Commit,
        &ImportPolicy::default(),
    )
    .unwrap_err();

    assert_eq!(
        err,
        SchemaPortError::UnexpectedRoot {
            expected: "tasks".to_string(),
            found: "views".to_string(),
        }
    );
    assert!(store.is_empty());
}

#[test]
fn test_declined_uri_repeated_in_document_is_never_written() {
    let doc = parse_document(
        br#"<conditions xmlns:dc="http://purl.org/dc/elements/1.1/">
  <condition><dc:uri>http://example.com/terms/conditions/repeated</dc:uri></condition>
  <condition><dc:uri>http://example.com/terms/conditions/repeated</dc:uri></condition>
</conditions>"#,
    )
    .unwrap();
    let mut decisions = std::collections::BTreeMap::new();
    decisions.insert("http://example.com/terms/conditions/repeated".to_string(), false);

    let mut store = MemoryStore::new();
    let commit = run(
        Schema::Conditions,
        &doc,
        &mut store,
        Ledger::from_decisions(decisions),
        Mode::Commit,
    );

    assert!(commit.report.saved.is_empty());
    assert_eq!(
        store
            .load::<Condition>("http://example.com/terms/conditions/repeated")
            .unwrap(),
        None
    );
}
