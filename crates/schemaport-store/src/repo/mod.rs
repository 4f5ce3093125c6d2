//! Repository layer for persisting reconciled records to SQLite

pub mod sqlite_repo;

pub use sqlite_repo::SqliteStore;
