use serde::{Deserialize, Serialize};

use super::{join_path, Entity, EntityKind, LocalizedText};
use crate::diff::{FieldValue, Tracked};

/// OptionSet - an ordered group of answer options
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct OptionSet {
    pub uri: String,
    pub uri_prefix: String,
    pub key: String,
    pub comment: String,
    pub order: i64,
}

impl Tracked for OptionSet {
    const FIELDS: &'static [&'static str] = &["uri_prefix", "key", "comment", "order"];

    fn field(&self, name: &str) -> Option<FieldValue<'_>> {
        Some(match name {
            "uri_prefix" => FieldValue::Text(&self.uri_prefix),
            "key" => FieldValue::Text(&self.key),
            "comment" => FieldValue::Text(&self.comment),
            "order" => FieldValue::Number(self.order),
            _ => return None,
        })
    }
}

impl Entity for OptionSet {
    const KIND: EntityKind = EntityKind::OptionSet;

    fn identity(&self) -> &str {
        &self.uri
    }

    fn key(&self) -> &str {
        &self.key
    }
}

/// One answer option of an option set
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct OptionItem {
    pub uri: String,
    pub uri_prefix: String,
    pub key: String,
    pub comment: String,

    /// `optionset.key/key`
    pub path: String,

    pub optionset: Option<String>,
    pub order: i64,
    pub text: LocalizedText,

    /// Whether choosing this option asks for free text
    pub additional_input: bool,
}

impl OptionItem {
    pub fn place_under(&mut self, optionset: &OptionSet) {
        self.optionset = Some(optionset.uri.clone());
        self.path = join_path(Some(&optionset.key), &self.key);
    }
}

impl Tracked for OptionItem {
    const FIELDS: &'static [&'static str] = &[
        "uri_prefix",
        "key",
        "comment",
        "path",
        "optionset",
        "order",
        "text",
        "additional_input",
    ];

    fn field(&self, name: &str) -> Option<FieldValue<'_>> {
        Some(match name {
            "uri_prefix" => FieldValue::Text(&self.uri_prefix),
            "key" => FieldValue::Text(&self.key),
            "comment" => FieldValue::Text(&self.comment),
            "path" => FieldValue::Text(&self.path),
            "optionset" => FieldValue::Ref(self.optionset.as_deref()),
            "order" => FieldValue::Number(self.order),
            "text" => FieldValue::Localized(&self.text),
            "additional_input" => FieldValue::Flag(self.additional_input),
            _ => return None,
        })
    }
}

impl Entity for OptionItem {
    const KIND: EntityKind = EntityKind::Option;

    fn identity(&self) -> &str {
        &self.uri
    }

    fn key(&self) -> &str {
        &self.key
    }

    fn path(&self) -> Option<&str> {
        Some(&self.path)
    }

    fn parent(&self) -> Option<&str> {
        self.optionset.as_deref()
    }
}
