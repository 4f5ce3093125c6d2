#![allow(clippy::unwrap_used, clippy::expect_used)]

//! Reconciliation against a real SQLite file

use std::path::PathBuf;

use schemaport_core::import::{reconcile, Mode, Schema};
use schemaport_core::ledger::Ledger;
use schemaport_core::model::{AttributeEntity, EntityKind, OptionItem, VerboseName};
use schemaport_core::ops::Store;
use schemaport_core::policy::ImportPolicy;
use schemaport_core::xml::{parse_document, XmlDocument};
use schemaport_store::db::open_migrated;
use schemaport_store::SqliteStore;

fn fixture(name: &str) -> XmlDocument {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../schemaport-core/tests/fixtures")
        .join(name);
    parse_document(&std::fs::read(path).unwrap()).unwrap()
}

fn run(schema: Schema, name: &str, store: &mut SqliteStore<'_>, mode: Mode) -> Ledger {
    reconcile(
        schema,
        &fixture(name),
        store,
        Ledger::new(),
        mode,
        &ImportPolicy::default(),
    )
    .unwrap()
    .ledger
}

#[test]
fn test_commit_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("store.db");

    {
        let conn = open_migrated(&path).unwrap();
        let mut store = SqliteStore::new(&conn);
        run(Schema::Options, "options.xml", &mut store, Mode::Commit);
        run(Schema::Domain, "domain.xml", &mut store, Mode::Commit);
    }

    let conn = open_migrated(&path).unwrap();
    let mut store = SqliteStore::new(&conn);

    let yes: OptionItem = store
        .load("http://example.com/terms/options/yes_no/yes")
        .unwrap()
        .unwrap();
    assert_eq!(yes.path, "yes_no/yes");

    let name: VerboseName = store
        .load("http://example.com/terms/domain/project")
        .unwrap()
        .unwrap();
    assert_eq!(name.name.get("de"), Some("Projekt"));

    let ledger = run(Schema::Domain, "domain.xml", &mut store, Mode::Preview);
    assert_eq!(ledger.len(), 6);
    assert!(ledger.iter().all(|(_, changed)| !changed));
}

#[test]
fn test_preview_leaves_database_empty() {
    let dir = tempfile::tempdir().unwrap();
    let conn = open_migrated(dir.path().join("store.db")).unwrap();
    let mut store = SqliteStore::new(&conn);

    let ledger = run(Schema::Questions, "catalog.xml", &mut store, Mode::Preview);
    assert_eq!(ledger.len(), 7);
    for kind in EntityKind::ALL {
        assert_eq!(store.count(kind).unwrap(), 0);
    }
}

#[test]
fn test_path_uniqueness_uses_indexed_lookup() {
    let dir = tempfile::tempdir().unwrap();
    let conn = open_migrated(dir.path().join("store.db")).unwrap();
    let mut store = SqliteStore::new(&conn);

    let mut squatter = AttributeEntity {
        uri: "http://other.org/terms/domain/project".to_string(),
        uri_prefix: "http://other.org/terms".to_string(),
        key: "project".to_string(),
        ..AttributeEntity::default()
    };
    squatter.place_under(None);
    store.save(&squatter).unwrap();

    let ledger = run(Schema::Domain, "domain.xml", &mut store, Mode::Commit);
    assert!(!ledger.contains("http://example.com/terms/domain/project"));
    assert_eq!(
        store
            .identities_with_path(EntityKind::AttributeEntity, "project")
            .unwrap(),
        vec!["http://other.org/terms/domain/project".to_string()]
    );
}
