//! Importable record types
//!
//! Every record is identified by its URI. Sub-records (verbose names, time
//! frames) have no URI of their own and are identified by their owner's.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::diff::Tracked;

pub mod condition;
pub mod domain;
pub mod localized;
pub mod options;
pub mod questions;
pub mod tasks;
pub mod views;

pub use condition::Condition;
pub use domain::{AttributeEntity, VerboseName};
pub use localized::LocalizedText;
pub use options::{OptionItem, OptionSet};
pub use questions::{Catalog, Question, QuestionSet, Section, Subsection};
pub use tasks::{Task, TimeFrame};
pub use views::View;

/// Record type discriminator, also the store's `kind` column
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Condition,
    AttributeEntity,
    VerboseName,
    OptionSet,
    Option,
    Catalog,
    Section,
    Subsection,
    QuestionSet,
    Question,
    Task,
    TimeFrame,
    View,
}

impl EntityKind {
    pub const ALL: [EntityKind; 13] = [
        EntityKind::Condition,
        EntityKind::AttributeEntity,
        EntityKind::VerboseName,
        EntityKind::OptionSet,
        EntityKind::Option,
        EntityKind::Catalog,
        EntityKind::Section,
        EntityKind::Subsection,
        EntityKind::QuestionSet,
        EntityKind::Question,
        EntityKind::Task,
        EntityKind::TimeFrame,
        EntityKind::View,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Condition => "condition",
            EntityKind::AttributeEntity => "attribute_entity",
            EntityKind::VerboseName => "verbose_name",
            EntityKind::OptionSet => "option_set",
            EntityKind::Option => "option",
            EntityKind::Catalog => "catalog",
            EntityKind::Section => "section",
            EntityKind::Subsection => "subsection",
            EntityKind::QuestionSet => "question_set",
            EntityKind::Question => "question",
            EntityKind::Task => "task",
            EntityKind::TimeFrame => "time_frame",
            EntityKind::View => "view",
        }
    }

    /// Inverse of [`as_str`](Self::as_str)
    pub fn parse(raw: &str) -> Option<EntityKind> {
        EntityKind::ALL.into_iter().find(|k| k.as_str() == raw)
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A persistable record
///
/// `key`, `path` and `parent` are mirrored into indexed store columns so
/// validators and domain lookups do not need to decode bodies.
pub trait Entity: Tracked + Serialize + DeserializeOwned + Clone {
    const KIND: EntityKind;

    /// Store identity: the URI, or the owner's URI for sub-records
    fn identity(&self) -> &str;

    fn key(&self) -> &str {
        ""
    }

    fn path(&self) -> Option<&str> {
        None
    }

    /// Structural owner, by URI
    fn parent(&self) -> Option<&str> {
        None
    }
}

/// `parent_path/key`, or just `key` at the top
pub(crate) fn join_path(parent_path: Option<&str>, key: &str) -> String {
    match parent_path {
        Some(parent) if !parent.is_empty() => format!("{}/{}", parent, key),
        _ => key.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_names_round_trip() {
        for kind in EntityKind::ALL {
            assert_eq!(EntityKind::parse(kind.as_str()), Some(kind));
        }
        assert_eq!(EntityKind::parse("widget"), None);
    }

    #[test]
    fn test_kind_serializes_like_its_name() {
        let json = serde_json::to_string(&EntityKind::QuestionSet).unwrap();
        assert_eq!(json, "\"question_set\"");
    }

    #[test]
    fn test_join_path() {
        assert_eq!(join_path(None, "project"), "project");
        assert_eq!(join_path(Some(""), "project"), "project");
        assert_eq!(join_path(Some("project"), "title"), "project/title");
    }
}
