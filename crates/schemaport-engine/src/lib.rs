//! SchemaPort Engine - Orchestration layer
//!
//! Provides the import command that coordinates document parsing, schema
//! detection, reconciliation and persistence, plus the engine's TOML
//! configuration.

pub mod commands;
pub mod config;

pub use commands::import::{import_document, import_file, ImportOptions, ImportOutcome};
pub use config::EngineConfig;
