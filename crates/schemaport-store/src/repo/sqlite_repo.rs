//! SQLite-backed `Store`
//!
//! Every record lands in the `entities` table. The body is the entity's JSON
//! encoding; key, path and parent are duplicated into columns for lookups.

use crate::errors::{corrupt_row, from_rusqlite, Result};
use rusqlite::{Connection, OptionalExtension, Row};
use schemaport_core::errors::ExResult;
use schemaport_core::model::EntityKind;
use schemaport_core::ops::{Store, StoredRecord};

const SELECT_COLUMNS: &str = "SELECT kind, identity, key, path, parent, body FROM entities";

/// Store over a borrowed, already migrated connection
pub struct SqliteStore<'c> {
    conn: &'c Connection,
}

impl<'c> SqliteStore<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }

    /// Number of rows of one kind
    ///
    /// # Errors
    ///
    /// Returns `ERR_PERSISTENCE` if the query fails.
    pub fn count(&self, kind: EntityKind) -> Result<usize> {
        let count: i64 = self
            .conn
            .query_row(
                "SELECT COUNT(*) FROM entities WHERE kind = ?1",
                [kind.as_str()],
                |row| row.get(0),
            )
            .map_err(from_rusqlite)?;
        Ok(usize::try_from(count).unwrap_or(0))
    }

    fn identities_where(&self, sql: &str, kind: EntityKind, value: &str) -> Result<Vec<String>> {
        let mut stmt = self.conn.prepare(sql).map_err(from_rusqlite)?;
        let rows = stmt
            .query_map(rusqlite::params![kind.as_str(), value], |row| row.get(0))
            .map_err(from_rusqlite)?;
        rows.collect::<std::result::Result<Vec<String>, _>>()
            .map_err(from_rusqlite)
    }
}

/// Raw column values of one row, decoded after the statement is done
struct RawRow {
    kind: String,
    identity: String,
    key: String,
    path: Option<String>,
    parent: Option<String>,
    body: String,
}

impl RawRow {
    fn read(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            kind: row.get(0)?,
            identity: row.get(1)?,
            key: row.get(2)?,
            path: row.get(3)?,
            parent: row.get(4)?,
            body: row.get(5)?,
        })
    }

    fn into_record(self, expected: EntityKind) -> Result<StoredRecord> {
        let kind = EntityKind::parse(&self.kind).ok_or_else(|| {
            corrupt_row(
                expected,
                &self.identity,
                &format!("unknown kind '{}'", self.kind),
            )
        })?;
        let body = serde_json::from_str(&self.body)
            .map_err(|e| corrupt_row(kind, &self.identity, &e.to_string()))?;

        Ok(StoredRecord {
            kind,
            identity: self.identity,
            key: self.key,
            path: self.path,
            parent: self.parent,
            body,
        })
    }
}

impl Store for SqliteStore<'_> {
    fn load_record(&self, kind: EntityKind, identity: &str) -> ExResult<Option<StoredRecord>> {
        let raw = self
            .conn
            .query_row(
                &format!("{} WHERE kind = ?1 AND identity = ?2", SELECT_COLUMNS),
                rusqlite::params![kind.as_str(), identity],
                RawRow::read,
            )
            .optional()
            .map_err(from_rusqlite)?;

        raw.map(|r| r.into_record(kind)).transpose()
    }

    fn save_record(&mut self, record: StoredRecord) -> ExResult<()> {
        let body = serde_json::to_string(&record.body)
            .map_err(|e| corrupt_row(record.kind, &record.identity, &e.to_string()))?;

        self.conn
            .execute(
                "INSERT INTO entities (kind, identity, key, path, parent, body, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                 ON CONFLICT(kind, identity) DO UPDATE SET
                    key = excluded.key,
                    path = excluded.path,
                    parent = excluded.parent,
                    body = excluded.body,
                    updated_at = excluded.updated_at",
                rusqlite::params![
                    record.kind.as_str(),
                    record.identity,
                    record.key,
                    record.path,
                    record.parent,
                    body,
                    chrono::Utc::now().timestamp(),
                ],
            )
            .map_err(from_rusqlite)?;

        tracing::debug!(kind = record.kind.as_str(), uri = %record.identity, "row written");
        Ok(())
    }

    fn list_records(&self, kind: EntityKind) -> ExResult<Vec<StoredRecord>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{} WHERE kind = ?1 ORDER BY identity", SELECT_COLUMNS))
            .map_err(from_rusqlite)?;
        let raw = stmt
            .query_map([kind.as_str()], RawRow::read)
            .map_err(from_rusqlite)?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(from_rusqlite)?;

        raw.into_iter().map(|r| r.into_record(kind)).collect()
    }

    fn identities_with_key(&self, kind: EntityKind, key: &str) -> ExResult<Vec<String>> {
        self.identities_where(
            "SELECT identity FROM entities WHERE kind = ?1 AND key = ?2 ORDER BY identity",
            kind,
            key,
        )
    }

    fn identities_with_path(&self, kind: EntityKind, path: &str) -> ExResult<Vec<String>> {
        self.identities_where(
            "SELECT identity FROM entities WHERE kind = ?1 AND path = ?2 ORDER BY identity",
            kind,
            path,
        )
    }
}
