//! Document import orchestration.
//!
//! ## Pipeline (in order):
//! 1. Digest the uploaded bytes
//! 2. Parse (malformed XML aborts, nothing reconciled)
//! 3. Detect the schema from the root tag and check it against the expected one
//! 4. Reconcile against the store in preview or commit mode
//!
//! Only steps 2 and 3 can fail the import. Per-node problems end up in the
//! outcome's report.

use std::path::Path;
use std::time::Instant;

use rusqlite::Connection;
use serde::Serialize;
use sha2::{Digest, Sha256};

use schemaport_core::errors::{ExError, ExResult, SchemaPortError};
use schemaport_core::import::{reconcile, ImportReport, Mode, Schema};
use schemaport_core::ledger::Ledger;
use schemaport_core::ops::Store;
use schemaport_core::policy::ImportPolicy;
use schemaport_core::xml::{parse_document, XmlDocument};
use schemaport_core::{log_op_end, log_op_error, log_op_start};
use schemaport_core_types::RunId;
use schemaport_store::errors::io_error;
use schemaport_store::SqliteStore;

/// How to run one import
#[derive(Debug, Clone)]
pub struct ImportOptions {
    /// Schema the caller expects; `None` accepts whatever the root names
    pub expected_schema: Option<Schema>,
    pub mode: Mode,
    /// Decisions from an earlier preview; empty approves everything
    pub ledger: Ledger,
    pub policy: ImportPolicy,
}

impl ImportOptions {
    /// Preview with no decisions and the default policy
    pub fn preview() -> Self {
        Self {
            expected_schema: None,
            mode: Mode::Preview,
            ledger: Ledger::new(),
            policy: ImportPolicy::default(),
        }
    }

    /// Commit gated by `ledger`
    pub fn commit(ledger: Ledger) -> Self {
        Self {
            mode: Mode::Commit,
            ledger,
            ..Self::preview()
        }
    }

    pub fn with_schema(mut self, schema: Schema) -> Self {
        self.expected_schema = Some(schema);
        self
    }

    pub fn with_policy(mut self, policy: ImportPolicy) -> Self {
        self.policy = policy;
        self
    }
}

/// Result of a completed import
#[derive(Debug, Clone, Serialize)]
pub struct ImportOutcome {
    pub run_id: RunId,
    pub schema: Schema,
    pub mode: Mode,
    /// SHA-256 of the uploaded bytes, hex encoded
    pub document_digest: String,
    /// URI to change flag for every URI the walk visited
    pub ledger: Ledger,
    pub report: ImportReport,
}

/// SHA-256 of a document, hex encoded
pub fn document_digest(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

/// Map the root tag to a schema
///
/// # Errors
///
/// Returns `UnsupportedRoot` if the root names no schema, or
/// `UnexpectedRoot` if it names a different schema than `expected`.
pub fn detect_schema(
    document: &XmlDocument,
    expected: Option<Schema>,
) -> Result<Schema, SchemaPortError> {
    let found = document.root().local_name();
    let schema = Schema::from_root_tag(found).ok_or_else(|| SchemaPortError::UnsupportedRoot {
        found: found.to_string(),
    })?;

    match expected {
        Some(expected) if expected != schema => Err(SchemaPortError::UnexpectedRoot {
            expected: expected.root_tag().to_string(),
            found: found.to_string(),
        }),
        _ => Ok(schema),
    }
}

/// Import an uploaded document into `store`
///
/// # Errors
///
/// Returns `ERR_PARSE_FAILURE` for malformed XML and `ERR_UNEXPECTED_ROOT`
/// for an unknown or unexpected root element. Nothing is reconciled in
/// either case.
pub fn import_document<S: Store>(
    bytes: &[u8],
    store: &mut S,
    options: ImportOptions,
) -> ExResult<ImportOutcome> {
    let start = Instant::now();
    let run_id = RunId::new();
    log_op_start!("import_document", run_id = %run_id, mode = %options.mode);

    match run_import(bytes, store, options, run_id.clone()) {
        Ok(outcome) => {
            log_op_end!(
                "import_document",
                duration_ms = elapsed_ms(start),
                run_id = %run_id,
                schema = outcome.schema.as_str(),
                ledger_len = outcome.ledger.len(),
                saved = outcome.report.saved.len(),
                rejected = outcome.report.rejected.len()
            );
            Ok(outcome)
        }
        Err(err) => {
            let ex_err = ExError::from(err)
                .with_op("import_document")
                .with_run_id(run_id.clone());
            log_op_error!(
                "import_document",
                ex_err.clone(),
                duration_ms = elapsed_ms(start),
                run_id = %run_id
            );
            Err(ex_err)
        }
    }
}

fn run_import<S: Store>(
    bytes: &[u8],
    store: &mut S,
    options: ImportOptions,
    run_id: RunId,
) -> Result<ImportOutcome, SchemaPortError> {
    let document_digest = document_digest(bytes);
    let document = parse_document(bytes)?;
    let schema = detect_schema(&document, options.expected_schema)?;
    tracing::debug!(schema = schema.as_str(), digest = %document_digest, "document accepted");

    let run = reconcile(
        schema,
        &document,
        store,
        options.ledger,
        options.mode,
        &options.policy,
    )?;

    Ok(ImportOutcome {
        run_id,
        schema,
        mode: options.mode,
        document_digest,
        ledger: run.ledger,
        report: run.report,
    })
}

/// Read `path` and import it into the SQLite store on `conn`
///
/// # Errors
///
/// Returns `ERR_IO` if the file cannot be read, otherwise as
/// [`import_document`].
pub fn import_file<P: AsRef<Path>>(
    path: P,
    conn: &Connection,
    options: ImportOptions,
) -> ExResult<ImportOutcome> {
    let bytes = std::fs::read(path.as_ref()).map_err(|e| io_error("read_document", e))?;
    let mut store = SqliteStore::new(conn);
    import_document(&bytes, &mut store, options)
}

fn elapsed_ms(start: Instant) -> u64 {
    u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX)
}
