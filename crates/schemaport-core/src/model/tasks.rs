use serde::{Deserialize, Serialize};

use super::{Entity, EntityKind, LocalizedText};
use crate::diff::{FieldValue, Tracked};

/// Task - a reminder tied to a project attribute
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Task {
    pub uri: String,
    pub uri_prefix: String,
    pub key: String,
    pub comment: String,
    pub attribute: Option<String>,
    pub title: LocalizedText,
    pub text: LocalizedText,
}

impl Tracked for Task {
    const FIELDS: &'static [&'static str] = &[
        "uri_prefix",
        "key",
        "comment",
        "attribute",
        "title",
        "text",
    ];

    fn field(&self, name: &str) -> Option<FieldValue<'_>> {
        Some(match name {
            "uri_prefix" => FieldValue::Text(&self.uri_prefix),
            "key" => FieldValue::Text(&self.key),
            "comment" => FieldValue::Text(&self.comment),
            "attribute" => FieldValue::Ref(self.attribute.as_deref()),
            "title" => FieldValue::Localized(&self.title),
            "text" => FieldValue::Localized(&self.text),
            _ => return None,
        })
    }
}

impl Entity for Task {
    const KIND: EntityKind = EntityKind::Task;

    fn identity(&self) -> &str {
        &self.uri
    }

    fn key(&self) -> &str {
        &self.key
    }
}

/// TimeFrame - when a task is due, relative to attribute values
///
/// Keyed by the owning task's URI.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TimeFrame {
    pub task: String,
    pub start_attribute: Option<String>,
    pub end_attribute: Option<String>,
    pub days_before: Option<u32>,
    pub days_after: Option<u32>,
}

impl TimeFrame {
    pub fn for_task(task_uri: impl Into<String>) -> Self {
        Self {
            task: task_uri.into(),
            ..Self::default()
        }
    }
}

impl Tracked for TimeFrame {
    const FIELDS: &'static [&'static str] = &[
        "task",
        "start_attribute",
        "end_attribute",
        "days_before",
        "days_after",
    ];

    fn field(&self, name: &str) -> Option<FieldValue<'_>> {
        Some(match name {
            "task" => FieldValue::Ref(Some(&self.task)),
            "start_attribute" => FieldValue::Ref(self.start_attribute.as_deref()),
            "end_attribute" => FieldValue::Ref(self.end_attribute.as_deref()),
            "days_before" => FieldValue::Count(self.days_before),
            "days_after" => FieldValue::Count(self.days_after),
            _ => return None,
        })
    }
}

impl Entity for TimeFrame {
    const KIND: EntityKind = EntityKind::TimeFrame;

    fn identity(&self) -> &str {
        &self.task
    }
}
