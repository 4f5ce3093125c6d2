use std::path::PathBuf;

use schemaport_core::import::{reconcile, Mode, Reconciliation, Schema};
use schemaport_core::ledger::Ledger;
use schemaport_core::ops::MemoryStore;
use schemaport_core::policy::ImportPolicy;
use schemaport_core::xml::{parse_document, XmlDocument};

/// Directory holding the XML fixtures
#[allow(dead_code)]
pub fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
}

/// Raw fixture text, for tests that tweak a document before parsing
#[allow(dead_code)]
pub fn fixture_text(name: &str) -> String {
    std::fs::read_to_string(fixtures_dir().join(name)).unwrap()
}

#[allow(dead_code)]
pub fn load_fixture(name: &str) -> XmlDocument {
    parse_document(fixture_text(name).as_bytes()).unwrap()
}

/// Reconcile a document with the default policy
#[allow(dead_code)]
pub fn run(
    schema: Schema,
    doc: &XmlDocument,
    store: &mut MemoryStore,
    ledger: Ledger,
    mode: Mode,
) -> Reconciliation {
    run_with(schema, doc, store, ledger, mode, &ImportPolicy::default())
}

#[allow(dead_code)]
pub fn run_with(
    schema: Schema,
    doc: &XmlDocument,
    store: &mut MemoryStore,
    ledger: Ledger,
    mode: Mode,
    policy: &ImportPolicy,
) -> Reconciliation {
    reconcile(schema, doc, store, ledger, mode, policy).unwrap()
}

/// Preview a fixture with an empty ledger
#[allow(dead_code)]
pub fn preview_fixture(schema: Schema, name: &str, store: &mut MemoryStore) -> Reconciliation {
    run(schema, &load_fixture(name), store, Ledger::new(), Mode::Preview)
}

/// Commit a fixture with an empty ledger (everything approved)
#[allow(dead_code)]
pub fn commit_fixture(schema: Schema, name: &str, store: &mut MemoryStore) -> Reconciliation {
    run(schema, &load_fixture(name), store, Ledger::new(), Mode::Commit)
}

/// Store with options and the domain tree committed, in that order
#[allow(dead_code)]
pub fn seeded_store() -> MemoryStore {
    let mut store = MemoryStore::new();
    commit_fixture(Schema::Options, "options.xml", &mut store);
    commit_fixture(Schema::Domain, "domain.xml", &mut store);
    store
}

/// Ledger entries as (uri, flag) pairs, sorted by URI
#[allow(dead_code)]
pub fn entries(ledger: &Ledger) -> Vec<(String, bool)> {
    ledger.iter().map(|(u, f)| (u.to_string(), f)).collect()
}
