use serde::{Deserialize, Serialize};

use super::{Entity, EntityKind, LocalizedText};
use crate::diff::{FieldValue, Tracked};

/// View - a named output template; only its metadata is imported
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct View {
    pub uri: String,
    pub uri_prefix: String,
    pub key: String,
    pub comment: String,
    pub title: LocalizedText,
    pub help: LocalizedText,
}

impl Tracked for View {
    const FIELDS: &'static [&'static str] = &["uri_prefix", "key", "comment", "title", "help"];

    fn field(&self, name: &str) -> Option<FieldValue<'_>> {
        Some(match name {
            "uri_prefix" => FieldValue::Text(&self.uri_prefix),
            "key" => FieldValue::Text(&self.key),
            "comment" => FieldValue::Text(&self.comment),
            "title" => FieldValue::Localized(&self.title),
            "help" => FieldValue::Localized(&self.help),
            _ => return None,
        })
    }
}

impl Entity for View {
    const KIND: EntityKind = EntityKind::View;

    fn identity(&self) -> &str {
        &self.uri
    }

    fn key(&self) -> &str {
        &self.key
    }
}
