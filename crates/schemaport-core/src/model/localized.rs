use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One value per language code
///
/// Stored flat as `{field}_{lang}` in exports and in change reports; see
/// [`field_name`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocalizedText(BTreeMap<String, String>);

impl LocalizedText {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: set one language
    pub fn with(mut self, lang: impl Into<String>, text: impl Into<String>) -> Self {
        self.set(lang, text);
        self
    }

    pub fn get(&self, lang: &str) -> Option<&str> {
        self.0.get(lang).map(String::as_str)
    }

    pub fn set(&mut self, lang: impl Into<String>, text: impl Into<String>) {
        self.0.insert(lang.into(), text.into());
    }

    /// Overlay `other`: languages it carries replace ours, the rest stay
    pub fn merge(&mut self, other: LocalizedText) {
        self.0.extend(other.0);
    }

    pub fn languages(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(l, t)| (l.as_str(), t.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// `title` + `en` -> `title_en`
pub fn field_name(field: &str, lang: &str) -> String {
    format!("{}_{}", field, lang)
}
