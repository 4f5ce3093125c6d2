use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::{join_path, Entity, EntityKind, LocalizedText};
use crate::diff::{FieldValue, Tracked};

/// AttributeEntity - a node of the domain tree
///
/// Entities group attributes; attributes (`is_attribute`) are the leaves
/// that carry answers. Both share one record type and one table, so a path
/// is unique across the two.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AttributeEntity {
    pub uri: String,
    pub uri_prefix: String,
    pub key: String,
    pub comment: String,

    /// `parent.path/key`
    pub path: String,

    /// Parent entity URI (None at the root of the tree)
    pub parent: Option<String>,

    pub is_collection: bool,
    pub is_attribute: bool,

    /// Attribute only: `text`, `integer`, `boolean`, ...
    pub value_type: String,
    /// Attribute only
    pub unit: String,

    /// Option set memberships, by URI
    pub optionsets: BTreeSet<String>,
    /// Condition memberships, by URI
    pub conditions: BTreeSet<String>,
}

impl AttributeEntity {
    /// Recompute `path` from the parent's path
    pub fn place_under(&mut self, parent: Option<&AttributeEntity>) {
        self.parent = parent.map(|p| p.uri.clone());
        self.path = join_path(parent.map(|p| p.path.as_str()), &self.key);
    }
}

impl Tracked for AttributeEntity {
    const FIELDS: &'static [&'static str] = &[
        "uri_prefix",
        "key",
        "comment",
        "path",
        "parent",
        "is_collection",
        "is_attribute",
        "value_type",
        "unit",
        "optionsets",
        "conditions",
    ];

    fn field(&self, name: &str) -> Option<FieldValue<'_>> {
        Some(match name {
            "uri_prefix" => FieldValue::Text(&self.uri_prefix),
            "key" => FieldValue::Text(&self.key),
            "comment" => FieldValue::Text(&self.comment),
            "path" => FieldValue::Text(&self.path),
            "parent" => FieldValue::Ref(self.parent.as_deref()),
            "is_collection" => FieldValue::Flag(self.is_collection),
            "is_attribute" => FieldValue::Flag(self.is_attribute),
            "value_type" => FieldValue::Text(&self.value_type),
            "unit" => FieldValue::Text(&self.unit),
            "optionsets" => FieldValue::RefSet(&self.optionsets),
            "conditions" => FieldValue::RefSet(&self.conditions),
            _ => return None,
        })
    }
}

impl Entity for AttributeEntity {
    const KIND: EntityKind = EntityKind::AttributeEntity;

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
        self.parent.as_deref()
    }
}

/// VerboseName - display names of an attribute entity
///
/// Keyed by the owning entity's URI; there is at most one per entity.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct VerboseName {
    pub attribute_entity: String,
    pub name: LocalizedText,
    pub name_plural: LocalizedText,
}

impl VerboseName {
    pub fn for_owner(owner_uri: impl Into<String>) -> Self {
        Self {
            attribute_entity: owner_uri.into(),
            ..Self::default()
        }
    }
}

impl Tracked for VerboseName {
    const FIELDS: &'static [&'static str] = &["attribute_entity", "name", "name_plural"];

    fn field(&self, name: &str) -> Option<FieldValue<'_>> {
        Some(match name {
            "attribute_entity" => FieldValue::Ref(Some(&self.attribute_entity)),
            "name" => FieldValue::Localized(&self.name),
            "name_plural" => FieldValue::Localized(&self.name_plural),
            _ => return None,
        })
    }
}

impl Entity for VerboseName {
    const KIND: EntityKind = EntityKind::VerboseName;

    fn identity(&self) -> &str {
        &self.attribute_entity
    }
}
