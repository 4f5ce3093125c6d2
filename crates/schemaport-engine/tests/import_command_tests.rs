#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::path::PathBuf;

use schemaport_core::import::{Mode, Schema};
use schemaport_core::model::{EntityKind, View};
use schemaport_core::ops::{MemoryStore, Store};
use schemaport_core::policy::{ImportPolicy, ViewWalkPolicy};
use schemaport_engine::commands::import::document_digest;
use schemaport_engine::commands::ledger_file::{read_ledger, write_ledger};
use schemaport_engine::{import_document, import_file, ImportOptions};
use schemaport_store::db::open_migrated;
use schemaport_store::SqliteStore;

fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../schemaport-core/tests/fixtures")
        .join(name)
}

fn fixture_bytes(name: &str) -> Vec<u8> {
    std::fs::read(fixture_path(name)).unwrap()
}

#[test]
fn test_preview_detects_schema_and_digests_document() {
    let mut store = MemoryStore::new();
    let bytes = fixture_bytes("catalog.xml");

    let outcome = import_document(&bytes, &mut store, ImportOptions::preview()).unwrap();

    assert_eq!(outcome.schema, Schema::Questions);
    assert_eq!(outcome.mode, Mode::Preview);
    assert_eq!(outcome.document_digest, document_digest(&bytes));
    assert_eq!(outcome.ledger.len(), 7);
    assert!(store.is_empty());
}

#[test]
fn test_two_phase_workflow_through_ledger_file() {
    let dir = tempfile::tempdir().unwrap();
    let conn = open_migrated(dir.path().join("store.db")).unwrap();
    let ledger_path = dir.path().join("ledger.json");

    let preview = import_file(fixture_path("options.xml"), &conn, ImportOptions::preview()).unwrap();
    write_ledger(&ledger_path, &preview.ledger).unwrap();

    // Reviewer declines one option
    let text = std::fs::read_to_string(&ledger_path)
        .unwrap()
        .replace(
            "\"http://example.com/terms/options/yes_no/no\": true",
            "\"http://example.com/terms/options/yes_no/no\": false",
        );
    std::fs::write(&ledger_path, text).unwrap();

    let decisions = read_ledger(&ledger_path).unwrap();
    let commit = import_file(
        fixture_path("options.xml"),
        &conn,
        ImportOptions::commit(decisions),
    )
    .unwrap();

    assert_eq!(commit.report.saved.len(), 2);
    let store = SqliteStore::new(&conn);
    assert_eq!(store.count(EntityKind::Option).unwrap(), 1);
    assert_eq!(store.count(EntityKind::OptionSet).unwrap(), 1);
}

#[test]
fn test_malformed_document_aborts_before_reconciling() {
    let mut store = MemoryStore::new();
    let err = import_document(b"<views><view>", &mut store, ImportOptions::preview()).unwrap_err();

    assert_eq!(err.code(), "ERR_PARSE_FAILURE");
    assert_eq!(err.op(), Some("import_document"));
    assert!(err.run_id().is_some());
    assert!(store.is_empty());
}

#[test]
fn test_expected_schema_must_match_root() {
    let mut store = MemoryStore::new();
    let err = import_document(
        &fixture_bytes("views.xml"),
        &mut store,
        ImportOptions::commit(Default::default()).with_schema(Schema::Tasks),
    )
    .unwrap_err();

    assert_eq!(err.code(), "ERR_UNEXPECTED_ROOT");
    assert!(store.is_empty());
}

#[test]
fn test_unknown_root_is_rejected() {
    let mut store = MemoryStore::new();
    let err = import_document(b"<html/>", &mut store, ImportOptions::preview()).unwrap_err();
    assert_eq!(err.code(), "ERR_UNEXPECTED_ROOT");
}

#[test]
fn test_policy_reaches_the_walk() {
    let mut store = MemoryStore::new();
    let policy = ImportPolicy {
        view_walk: ViewWalkPolicy::All,
        ..ImportPolicy::default()
    };

    let outcome = import_document(
        &fixture_bytes("views.xml"),
        &mut store,
        ImportOptions::commit(Default::default()).with_policy(policy),
    )
    .unwrap();

    assert_eq!(outcome.ledger.len(), 2);
    assert!(store
        .load::<View>("http://example.com/terms/views/dmp")
        .unwrap()
        .is_some());
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let conn = open_migrated(dir.path().join("store.db")).unwrap();

    let err = import_file(dir.path().join("absent.xml"), &conn, ImportOptions::preview()).unwrap_err();
    assert_eq!(err.code(), "ERR_IO");
}
