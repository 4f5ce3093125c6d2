//! Question catalog records
//!
//! catalog → section → subsection → (question set | question), with
//! question sets owning further questions. Paths are rooted at the catalog
//! key so the same section key can appear in two catalogs.

use serde::{Deserialize, Serialize};

use super::{join_path, Entity, EntityKind, LocalizedText};
use crate::diff::{FieldValue, Tracked};

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Catalog {
    pub uri: String,
    pub uri_prefix: String,
    pub key: String,
    pub comment: String,
    pub order: i64,
    pub title: LocalizedText,
}

impl Tracked for Catalog {
    const FIELDS: &'static [&'static str] = &["uri_prefix", "key", "comment", "order", "title"];

    fn field(&self, name: &str) -> Option<FieldValue<'_>> {
        Some(match name {
            "uri_prefix" => FieldValue::Text(&self.uri_prefix),
            "key" => FieldValue::Text(&self.key),
            "comment" => FieldValue::Text(&self.comment),
            "order" => FieldValue::Number(self.order),
            "title" => FieldValue::Localized(&self.title),
            _ => return None,
        })
    }
}

impl Entity for Catalog {
    const KIND: EntityKind = EntityKind::Catalog;

    fn identity(&self) -> &str {
        &self.uri
    }

    fn key(&self) -> &str {
        &self.key
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Section {
    pub uri: String,
    pub uri_prefix: String,
    pub key: String,
    pub comment: String,
    pub path: String,
    pub catalog: Option<String>,
    pub order: i64,
    pub title: LocalizedText,
}

impl Section {
    pub fn place_under(&mut self, catalog: &Catalog) {
        self.catalog = Some(catalog.uri.clone());
        self.path = join_path(Some(&catalog.key), &self.key);
    }
}

impl Tracked for Section {
    const FIELDS: &'static [&'static str] = &[
        "uri_prefix",
        "key",
        "comment",
        "path",
        "catalog",
        "order",
        "title",
    ];

    fn field(&self, name: &str) -> Option<FieldValue<'_>> {
        Some(match name {
            "uri_prefix" => FieldValue::Text(&self.uri_prefix),
            "key" => FieldValue::Text(&self.key),
            "comment" => FieldValue::Text(&self.comment),
            "path" => FieldValue::Text(&self.path),
            "catalog" => FieldValue::Ref(self.catalog.as_deref()),
            "order" => FieldValue::Number(self.order),
            "title" => FieldValue::Localized(&self.title),
            _ => return None,
        })
    }
}

impl Entity for Section {
    const KIND: EntityKind = EntityKind::Section;

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
        self.catalog.as_deref()
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Subsection {
    pub uri: String,
    pub uri_prefix: String,
    pub key: String,
    pub comment: String,
    pub path: String,
    pub section: Option<String>,
    pub order: i64,
    pub title: LocalizedText,
}

impl Subsection {
    pub fn place_under(&mut self, section: &Section) {
        self.section = Some(section.uri.clone());
        self.path = join_path(Some(&section.path), &self.key);
    }
}

impl Tracked for Subsection {
    const FIELDS: &'static [&'static str] = &[
        "uri_prefix",
        "key",
        "comment",
        "path",
        "section",
        "order",
        "title",
    ];

    fn field(&self, name: &str) -> Option<FieldValue<'_>> {
        Some(match name {
            "uri_prefix" => FieldValue::Text(&self.uri_prefix),
            "key" => FieldValue::Text(&self.key),
            "comment" => FieldValue::Text(&self.comment),
            "path" => FieldValue::Text(&self.path),
            "section" => FieldValue::Ref(self.section.as_deref()),
            "order" => FieldValue::Number(self.order),
            "title" => FieldValue::Localized(&self.title),
            _ => return None,
        })
    }
}

impl Entity for Subsection {
    const KIND: EntityKind = EntityKind::Subsection;

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
        self.section.as_deref()
    }
}

/// QuestionSet - a group of questions, optionally bound to a domain entity
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct QuestionSet {
    pub uri: String,
    pub uri_prefix: String,
    pub key: String,
    pub comment: String,
    pub path: String,
    pub subsection: Option<String>,
    pub order: i64,
    pub help: LocalizedText,
    pub attribute_entity: Option<String>,
}

impl QuestionSet {
    pub fn place_under(&mut self, subsection: &Subsection) {
        self.subsection = Some(subsection.uri.clone());
        self.path = join_path(Some(&subsection.path), &self.key);
    }
}

impl Tracked for QuestionSet {
    const FIELDS: &'static [&'static str] = &[
        "uri_prefix",
        "key",
        "comment",
        "path",
        "subsection",
        "order",
        "help",
        "attribute_entity",
    ];

    fn field(&self, name: &str) -> Option<FieldValue<'_>> {
        Some(match name {
            "uri_prefix" => FieldValue::Text(&self.uri_prefix),
            "key" => FieldValue::Text(&self.key),
            "comment" => FieldValue::Text(&self.comment),
            "path" => FieldValue::Text(&self.path),
            "subsection" => FieldValue::Ref(self.subsection.as_deref()),
            "order" => FieldValue::Number(self.order),
            "help" => FieldValue::Localized(&self.help),
            "attribute_entity" => FieldValue::Ref(self.attribute_entity.as_deref()),
            _ => return None,
        })
    }
}

impl Entity for QuestionSet {
    const KIND: EntityKind = EntityKind::QuestionSet;

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
        self.subsection.as_deref()
    }
}

/// Question - sits directly in a subsection or inside a question set
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Question {
    pub uri: String,
    pub uri_prefix: String,
    pub key: String,
    pub comment: String,
    pub path: String,
    pub subsection: Option<String>,

    /// Owning question set, if any
    pub parent: Option<String>,

    pub order: i64,
    pub text: LocalizedText,
    pub help: LocalizedText,
    pub widget_type: String,
    pub attribute_entity: Option<String>,
}

impl Question {
    /// Place under a subsection and, when given, a question set of it
    pub fn place_under(&mut self, subsection: &Subsection, questionset: Option<&QuestionSet>) {
        self.subsection = Some(subsection.uri.clone());
        self.parent = questionset.map(|qs| qs.uri.clone());
        let base = questionset.map_or(subsection.path.as_str(), |qs| qs.path.as_str());
        self.path = join_path(Some(base), &self.key);
    }
}

impl Tracked for Question {
    const FIELDS: &'static [&'static str] = &[
        "uri_prefix",
        "key",
        "comment",
        "path",
        "subsection",
        "parent",
        "order",
        "text",
        "help",
        "widget_type",
        "attribute_entity",
    ];

    fn field(&self, name: &str) -> Option<FieldValue<'_>> {
        Some(match name {
            "uri_prefix" => FieldValue::Text(&self.uri_prefix),
            "key" => FieldValue::Text(&self.key),
            "comment" => FieldValue::Text(&self.comment),
            "path" => FieldValue::Text(&self.path),
            "subsection" => FieldValue::Ref(self.subsection.as_deref()),
            "parent" => FieldValue::Ref(self.parent.as_deref()),
            "order" => FieldValue::Number(self.order),
            "text" => FieldValue::Localized(&self.text),
            "help" => FieldValue::Localized(&self.help),
            "widget_type" => FieldValue::Text(&self.widget_type),
            "attribute_entity" => FieldValue::Ref(self.attribute_entity.as_deref()),
            _ => return None,
        })
    }
}

impl Entity for Question {
    const KIND: EntityKind = EntityKind::Question;

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
        self.parent.as_deref().or(self.subsection.as_deref())
    }
}
