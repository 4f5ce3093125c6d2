//! Import command
//!
//! Without `--commit` the document is previewed and the ledger is printed as
//! sorted JSON: the checklist of URIs with their change flags. Saving that
//! JSON (`--write-ledger`), editing it and passing it back with
//! `--ledger FILE --commit` writes exactly what was approved.

use std::path::PathBuf;

use clap::{Args, ValueEnum};
use schemaport_core::import::Schema;
use schemaport_core::ledger::Ledger;
use schemaport_core::logging_facility::{init, Profile};
use schemaport_engine::commands::ledger_file::{ledger_to_json, read_ledger, write_ledger};
use schemaport_engine::{import_file, EngineConfig, ImportOptions, ImportOutcome};
use schemaport_store::db::open_migrated;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LogProfile {
    /// Human-readable, debug level
    Dev,
    /// JSON lines, info level
    Prod,
}

#[derive(Debug, Args)]
pub struct ImportArgs {
    /// XML document to import
    pub file: PathBuf,

    /// Write approved records (default is a preview)
    #[arg(long)]
    pub commit: bool,

    /// Decisions from an earlier preview (JSON object of URI to bool)
    #[arg(long, value_name = "FILE")]
    pub ledger: Option<PathBuf>,

    /// Also write the resulting ledger to this file
    #[arg(long, value_name = "FILE")]
    pub write_ledger: Option<PathBuf>,

    /// Expected schema; the document root must match
    #[arg(long, value_parser = parse_schema)]
    pub schema: Option<Schema>,

    /// SQLite store (overrides the config file)
    #[arg(long)]
    pub db: Option<PathBuf>,

    /// TOML configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Emit logs to stderr
    #[arg(long, value_enum)]
    pub log: Option<LogProfile>,
}

fn parse_schema(raw: &str) -> Result<Schema, String> {
    Schema::parse(raw).ok_or_else(|| {
        let names: Vec<&str> = Schema::ALL.iter().map(|s| s.as_str()).collect();
        format!("unknown schema '{}', expected one of: {}", raw, names.join(", "))
    })
}

pub fn execute(args: ImportArgs) -> Result<(), Box<dyn std::error::Error>> {
    match args.log {
        Some(LogProfile::Dev) => init(Profile::Development),
        Some(LogProfile::Prod) => init(Profile::Production),
        None => {}
    }

    let mut config = EngineConfig::load_or_default(args.config.as_deref())?;
    if let Some(db) = args.db {
        config.database = db;
    }

    let ledger = match &args.ledger {
        Some(path) => read_ledger(path)?,
        None => Ledger::new(),
    };
    if args.ledger.is_some() && !args.commit {
        eprintln!("Note: --ledger has no effect on a preview");
    }

    let mut options = if args.commit {
        ImportOptions::commit(ledger)
    } else {
        ImportOptions::preview()
    }
    .with_policy(config.policy);
    if let Some(schema) = args.schema {
        options = options.with_schema(schema);
    }

    let conn = open_migrated(&config.database)?;
    let outcome = import_file(&args.file, &conn, options)?;

    if let Some(path) = &args.write_ledger {
        write_ledger(path, &outcome.ledger)?;
    }

    if args.commit {
        print_commit_summary(&outcome);
    } else {
        println!("{}", ledger_to_json(&outcome.ledger)?);
    }
    for rejection in &outcome.report.rejected {
        eprintln!(
            "Skipped {} '{}': {}",
            rejection.kind, rejection.uri, rejection.reason
        );
    }

    Ok(())
}

fn print_commit_summary(outcome: &ImportOutcome) {
    println!("Import committed:");
    println!("  schema: {}", outcome.schema);
    println!("  document_digest: {}", outcome.document_digest);
    println!("  ledger_entries: {}", outcome.ledger.len());
    println!("  saved: {}", outcome.report.saved.len());
    println!("  rejected: {}", outcome.report.rejected.len());
}
