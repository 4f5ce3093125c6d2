//! Change detection types.
//!
//! `EntityChange` is what a preview reports per visited record. Its changed
//! fields follow the record's field table, with the languages of a localized
//! field in sorted order.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::model::{EntityKind, LocalizedText};

/// A borrowed view of one tracked field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldValue<'a> {
    Text(&'a str),
    Flag(bool),
    Number(i64),
    Count(Option<u32>),
    /// Reference to another record, by URI
    Ref(Option<&'a str>),
    /// Unordered membership references, by URI
    RefSet(&'a BTreeSet<String>),
    Localized(&'a LocalizedText),
}

/// Static field table for change detection
pub trait Tracked {
    /// Names of the fields that participate in equality
    const FIELDS: &'static [&'static str];

    /// Report one field by name. `None` means the record cannot report it.
    fn field(&self, name: &str) -> Option<FieldValue<'_>>;
}

/// Outcome of comparing one candidate with its stored snapshot
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ChangeStatus {
    New,
    Changed,
    Unchanged,
}

/// Per-record entry in a preview
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EntityChange {
    pub kind: EntityKind,
    pub uri: String,
    pub status: ChangeStatus,
    /// Changed field names; localized fields appear as `{field}_{lang}`
    pub fields: Vec<String>,
}
