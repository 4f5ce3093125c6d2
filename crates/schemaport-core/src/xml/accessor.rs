//! Tolerant value extraction from element trees
//!
//! Absence is the normal case here: a missing child, a missing attribute or
//! an element without text all come back as an empty value.

use std::collections::BTreeMap;

use crate::model::LocalizedText;
use crate::xml::node::XmlNode;

/// What to pull out of the selected child
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Extract {
    Text,
    Tag,
    Attributes,
}

/// Extracted content. Text covers both `Extract::Text` and `Extract::Tag`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeValue {
    Text(String),
    Attributes(BTreeMap<String, String>),
}

impl NodeValue {
    fn empty(mode: Extract) -> Self {
        match mode {
            Extract::Attributes => NodeValue::Attributes(BTreeMap::new()),
            Extract::Text | Extract::Tag => NodeValue::Text(String::new()),
        }
    }

    pub fn into_text(self) -> String {
        match self {
            NodeValue::Text(text) => text,
            NodeValue::Attributes(_) => String::new(),
        }
    }

    pub fn into_attributes(self) -> BTreeMap<String, String> {
        match self {
            NodeValue::Attributes(attributes) => attributes,
            NodeValue::Text(_) => BTreeMap::new(),
        }
    }
}

/// Extract content from the first child of `node` matching `selector`
///
/// `node` may itself be absent (e.g. the result of an earlier failed
/// lookup); that is treated exactly like a missing child.
pub fn value_of(node: Option<&XmlNode>, selector: &str, mode: Extract) -> NodeValue {
    let Some(child) = node.and_then(|n| n.child(selector)) else {
        tracing::trace!(selector, "value not present, using empty default");
        return NodeValue::empty(mode);
    };

    match mode {
        Extract::Text => NodeValue::Text(child.text().unwrap_or_default().to_string()),
        Extract::Tag => NodeValue::Text(child.tag().to_string()),
        Extract::Attributes => NodeValue::Attributes(child.attributes().clone()),
    }
}

/// Text of the first `selector` child, empty when absent
pub fn text_of(node: &XmlNode, selector: &str) -> String {
    value_of(Some(node), selector, Extract::Text).into_text()
}

/// Resolved tag of the first `selector` child, empty when absent
pub fn tag_of(node: &XmlNode, selector: &str) -> String {
    value_of(Some(node), selector, Extract::Tag).into_text()
}

/// Attributes of the first `selector` child, empty when absent
pub fn attributes_of(node: &XmlNode, selector: &str) -> BTreeMap<String, String> {
    value_of(Some(node), selector, Extract::Attributes).into_attributes()
}

/// `True`/`true` and `False`/`false`; anything else is unset
pub fn parse_flag(raw: &str) -> Option<bool> {
    match raw {
        "True" | "true" => Some(true),
        "False" | "false" => Some(false),
        _ => None,
    }
}

/// Ordering index. Empty or malformed values order first (0).
pub fn parse_order(raw: &str) -> i64 {
    raw.trim().parse().unwrap_or(0)
}

/// A well-formed non-negative integer made of ASCII digits only
pub fn parse_count(raw: &str) -> Option<u32> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    match raw.parse() {
        Ok(count) => Some(count),
        Err(e) => {
            tracing::debug!(raw, error = %e, "count out of range, left unset");
            None
        }
    }
}

/// Collect every `tag` child carrying a `lang` attribute into a localized
/// value, keeping only `languages`. A child without text stores "".
pub fn read_localized(node: &XmlNode, tag: &str, languages: &[String]) -> LocalizedText {
    let mut value = LocalizedText::default();
    for element in node.children_named(tag) {
        let Some(lang) = element.attribute("lang") else {
            tracing::debug!(tag, "localized element without lang attribute ignored");
            continue;
        };
        if !languages.iter().any(|l| l == lang) {
            tracing::debug!(tag, lang, "language not configured, value dropped");
            continue;
        }
        value.set(lang, element.text().unwrap_or_default());
    }
    value
}

/// Decode bytes as UTF-8, dropping invalid sequences instead of failing
pub(crate) fn sanitize_utf8(bytes: &[u8]) -> String {
    bytes.utf8_chunks().map(|chunk| chunk.valid()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn condition() -> XmlNode {
        XmlNode::new("condition")
            .with_child(XmlNode::new("relation").with_text("eq"))
            .with_child(XmlNode::new("target_text"))
            .with_child(XmlNode::new("source").with_attribute("uri", "http://a/domain/x"))
    }

    #[test]
    fn test_text_of_present_child() {
        assert_eq!(text_of(&condition(), "relation"), "eq");
    }

    #[test]
    fn test_text_of_absent_child_is_empty() {
        assert_eq!(text_of(&condition(), "nope"), "");
    }

    #[test]
    fn test_text_of_child_without_text_is_empty() {
        assert_eq!(text_of(&condition(), "target_text"), "");
    }

    #[test]
    fn test_tag_and_attribute_modes() {
        assert_eq!(tag_of(&condition(), "source"), "source");
        let attrs = attributes_of(&condition(), "source");
        assert_eq!(attrs.get("uri").map(String::as_str), Some("http://a/domain/x"));
        assert!(attributes_of(&condition(), "relation").is_empty());
        assert!(attributes_of(&condition(), "missing").is_empty());
    }

    #[test]
    fn test_absent_node_is_tolerated() {
        assert_eq!(
            value_of(None, "relation", Extract::Text),
            NodeValue::Text(String::new())
        );
        assert_eq!(
            value_of(None, "relation", Extract::Attributes),
            NodeValue::Attributes(BTreeMap::new())
        );
    }

    #[test]
    fn test_parse_flag() {
        assert_eq!(parse_flag("True"), Some(true));
        assert_eq!(parse_flag("false"), Some(false));
        assert_eq!(parse_flag("yes"), None);
        assert_eq!(parse_flag(""), None);
    }

    #[test]
    fn test_parse_order_defaults_to_zero() {
        assert_eq!(parse_order("3"), 3);
        assert_eq!(parse_order(""), 0);
        assert_eq!(parse_order("x"), 0);
    }

    #[test]
    fn test_parse_count_accepts_digits_only() {
        assert_eq!(parse_count("7"), Some(7));
        assert_eq!(parse_count("0"), Some(0));
        assert_eq!(parse_count("-1"), None);
        assert_eq!(parse_count("1.5"), None);
        assert_eq!(parse_count(""), None);
        assert_eq!(parse_count("4294967295"), Some(u32::MAX));
        assert_eq!(parse_count("4294967296"), None);
    }

    #[test]
    fn test_read_localized_filters_languages() {
        let node = XmlNode::new("view")
            .with_child(XmlNode::new("title").with_attribute("lang", "en").with_text("Age"))
            .with_child(XmlNode::new("title").with_attribute("lang", "de").with_text("Alter"))
            .with_child(XmlNode::new("title").with_attribute("lang", "fr").with_text("Âge"))
            .with_child(XmlNode::new("title").with_text("no lang"));
        let languages = vec!["en".to_string(), "de".to_string()];
        let title = read_localized(&node, "title", &languages);
        assert_eq!(title.get("en"), Some("Age"));
        assert_eq!(title.get("de"), Some("Alter"));
        assert_eq!(title.get("fr"), None);
        assert_eq!(title.len(), 2);
    }

    #[test]
    fn test_sanitize_utf8_drops_invalid_sequences() {
        assert_eq!(sanitize_utf8(b"a\xffb\xc3"), "ab");
        assert_eq!(sanitize_utf8("Grüße".as_bytes()), "Grüße");
    }
}
