//! CLI import integration tests
//!
//! Drive the `schemaport` binary through the two-phase workflow against a
//! scratch SQLite file.

use rusqlite::Connection;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../schemaport-core/tests/fixtures")
        .join(name)
}

fn schemaport(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_schemaport"))
        .current_dir(dir)
        .args(args)
        .output()
        .expect("Failed to execute CLI")
}

fn row_count(db: &Path) -> i64 {
    let conn = Connection::open(db).unwrap();
    conn.query_row("SELECT COUNT(*) FROM entities", [], |row| row.get(0))
        .unwrap()
}

#[test]
fn test_preview_prints_sorted_ledger_and_writes_nothing() {
    let temp_dir = TempDir::new().unwrap();
    let db = temp_dir.path().join("store.db");
    let views = fixture("views.xml");

    let output = schemaport(
        temp_dir.path(),
        &["import", views.to_str().unwrap(), "--db", db.to_str().unwrap()],
    );
    assert!(
        output.status.success(),
        "Preview should succeed. Stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let ledger: BTreeMap<String, bool> = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(
        ledger.get("http://example.com/terms/views/summary"),
        Some(&true)
    );
    assert_eq!(row_count(&db), 0);

    // The URI-less view is reported, not fatal
    assert!(String::from_utf8_lossy(&output.stderr).contains("Skipped view"));
}

#[test]
fn test_edited_ledger_gates_commit() {
    let temp_dir = TempDir::new().unwrap();
    let db = temp_dir.path().join("store.db");
    let ledger_path = temp_dir.path().join("ledger.json");
    let options = fixture("options.xml");

    let preview = schemaport(
        temp_dir.path(),
        &[
            "import",
            options.to_str().unwrap(),
            "--db",
            db.to_str().unwrap(),
            "--write-ledger",
            ledger_path.to_str().unwrap(),
        ],
    );
    assert!(preview.status.success());

    let mut decisions: BTreeMap<String, bool> =
        serde_json::from_str(&fs::read_to_string(&ledger_path).unwrap()).unwrap();
    assert_eq!(decisions.len(), 3);
    decisions.insert("http://example.com/terms/options/yes_no/no".to_string(), false);
    fs::write(&ledger_path, serde_json::to_string(&decisions).unwrap()).unwrap();

    let commit = schemaport(
        temp_dir.path(),
        &[
            "import",
            options.to_str().unwrap(),
            "--db",
            db.to_str().unwrap(),
            "--ledger",
            ledger_path.to_str().unwrap(),
            "--commit",
        ],
    );
    assert!(
        commit.status.success(),
        "Commit should succeed. Stderr: {}",
        String::from_utf8_lossy(&commit.stderr)
    );
    let stdout = String::from_utf8_lossy(&commit.stdout);
    assert!(stdout.contains("saved: 2"));
    assert_eq!(row_count(&db), 2);
}

#[test]
fn test_schema_mismatch_fails() {
    let temp_dir = TempDir::new().unwrap();
    let db = temp_dir.path().join("store.db");
    let tasks = fixture("tasks.xml");

    let output = schemaport(
        temp_dir.path(),
        &[
            "import",
            tasks.to_str().unwrap(),
            "--db",
            db.to_str().unwrap(),
            "--schema",
            "views",
            "--commit",
        ],
    );

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("ERR_UNEXPECTED_ROOT"));
    assert_eq!(row_count(&db), 0);
}

#[test]
fn test_config_file_supplies_database_and_policy() {
    let temp_dir = TempDir::new().unwrap();
    let config = temp_dir.path().join("schemaport.toml");
    fs::write(
        &config,
        "database = \"data/terms.db\"\n\n[policy]\nview_walk = \"all\"\n",
    )
    .unwrap();
    let views = fixture("views.xml");

    let output = schemaport(
        temp_dir.path(),
        &[
            "import",
            views.to_str().unwrap(),
            "--config",
            config.to_str().unwrap(),
            "--commit",
        ],
    );
    assert!(
        output.status.success(),
        "Stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    // Relative database path resolves against the working directory
    assert_eq!(row_count(&temp_dir.path().join("data/terms.db")), 2);
}

#[test]
fn test_unknown_schema_name_is_a_usage_error() {
    let temp_dir = TempDir::new().unwrap();
    let views = fixture("views.xml");

    let output = schemaport(
        temp_dir.path(),
        &["import", views.to_str().unwrap(), "--schema", "catalogs"],
    );
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("unknown schema"));
}
