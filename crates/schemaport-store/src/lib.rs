//! SchemaPort Store - SQLite persistence for reconciled records
//!
//! Provides:
//! - SQLite schema with a checksummed migrations framework
//! - `SqliteStore`, the `Store` implementation used by the engine

pub mod db;
pub mod errors;
pub mod migrations;
pub mod repo;

// Re-export key types
pub use errors::Result;
pub use repo::SqliteStore;
