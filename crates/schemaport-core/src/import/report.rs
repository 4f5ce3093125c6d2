use serde::{Deserialize, Serialize};

use crate::diff::EntityChange;
use crate::ledger::Ledger;
use crate::model::EntityKind;

/// A record written during a commit run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedRecord {
    pub kind: EntityKind,
    pub uri: String,
}

/// A candidate skipped because it failed validation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rejection {
    pub kind: EntityKind,
    pub uri: String,
    pub reason: String,
}

/// What a walk saw and did, in document order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImportReport {
    /// One entry per valid candidate, with its change status
    pub changes: Vec<EntityChange>,
    pub saved: Vec<SavedRecord>,
    pub rejected: Vec<Rejection>,
}

impl ImportReport {
    pub fn saved_uris(&self) -> impl Iterator<Item = &str> {
        self.saved.iter().map(|s| s.uri.as_str())
    }

    pub fn rejected_uris(&self) -> impl Iterator<Item = &str> {
        self.rejected.iter().map(|r| r.uri.as_str())
    }

    pub fn was_saved(&self, kind: EntityKind, uri: &str) -> bool {
        self.saved.iter().any(|s| s.kind == kind && s.uri == uri)
    }
}

/// Result of one walk over a document
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Reconciliation {
    pub ledger: Ledger,
    pub report: ImportReport,
}
