use serde::{Deserialize, Serialize};

use super::{Entity, EntityKind};
use crate::diff::{FieldValue, Tracked};

/// Condition - a predicate over one attribute's value
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Condition {
    pub uri: String,
    pub uri_prefix: String,
    pub key: String,
    pub comment: String,

    /// Attribute the condition inspects (must be an attribute, not an entity)
    pub source: Option<String>,

    /// Comparison operator, e.g. `eq`, `neq`, `contains`
    pub relation: String,

    pub target_text: String,

    /// Option the source value is compared against
    pub target_option: Option<String>,
}

impl Tracked for Condition {
    const FIELDS: &'static [&'static str] = &[
        "uri_prefix",
        "key",
        "comment",
        "source",
        "relation",
        "target_text",
        "target_option",
    ];

    fn field(&self, name: &str) -> Option<FieldValue<'_>> {
        Some(match name {
            "uri_prefix" => FieldValue::Text(&self.uri_prefix),
            "key" => FieldValue::Text(&self.key),
            "comment" => FieldValue::Text(&self.comment),
            "source" => FieldValue::Ref(self.source.as_deref()),
            "relation" => FieldValue::Text(&self.relation),
            "target_text" => FieldValue::Text(&self.target_text),
            "target_option" => FieldValue::Ref(self.target_option.as_deref()),
            _ => return None,
        })
    }
}

impl Entity for Condition {
    const KIND: EntityKind = EntityKind::Condition;

    fn identity(&self) -> &str {
        &self.uri
    }

    fn key(&self) -> &str {
        &self.key
    }
}
