//! Identity URI resolution
//!
//! An entity node names itself with a `<dc:uri>` child; a reference names its
//! target with a `dc:uri` attribute. Neither being present is not an error,
//! the caller just ends up with no identity.

use serde::{Deserialize, Serialize};

use crate::xml::node::{ns_tag, NamespaceMap, XmlNode};

/// Where on a node the `dc:uri` lives
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UriSource<'a> {
    /// Text of the `<dc:uri>` child (entity identity)
    Element,
    /// `dc:uri` attribute on the node itself (reference element)
    Attribute,
    /// `dc:uri` attribute on the first child with this tag
    Child(&'a str),
}

/// Resolve the URI a node carries, `None` when absent or blank
pub fn resolve_uri(node: &XmlNode, namespaces: &NamespaceMap, source: UriSource<'_>) -> Option<String> {
    let uri_tag = ns_tag("dc:uri", namespaces);
    let raw = match source {
        UriSource::Element => node.child(&uri_tag).and_then(XmlNode::text),
        UriSource::Attribute => node.attribute(&uri_tag),
        UriSource::Child(tag) => node.child(tag).and_then(|c| c.attribute(&uri_tag)),
    };

    match raw.map(str::trim) {
        Some(uri) if !uri.is_empty() => Some(uri.to_string()),
        _ => None,
    }
}

/// Shorthand for a reference held by child `tag`
pub fn resolve_reference(node: &XmlNode, namespaces: &NamespaceMap, tag: &str) -> Option<String> {
    resolve_uri(node, namespaces, UriSource::Child(tag))
}

/// A URI split into its stable parts
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Identity {
    pub uri: String,
    pub uri_prefix: String,
    pub key: String,
}

/// Split `uri` on the last `/{marker}/` for the prefix; the key is the final
/// `/`-delimited segment. A URI without the marker keeps itself as prefix.
pub fn split_identity(uri: &str, marker: &str) -> Identity {
    let needle = format!("/{}/", marker);
    let uri_prefix = match uri.rfind(&needle) {
        Some(at) => &uri[..at],
        None => uri,
    };
    let key = match uri.rsplit_once('/') {
        Some((_, key)) => key,
        None => uri,
    };

    Identity {
        uri: uri.to_string(),
        uri_prefix: uri_prefix.to_string(),
        key: key.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xml::node::DC_NAMESPACE;
    use proptest::prelude::*;

    fn namespaces() -> NamespaceMap {
        let mut ns = NamespaceMap::new();
        ns.insert("dc".to_string(), DC_NAMESPACE.to_string());
        ns
    }

    fn uri_tag() -> String {
        ns_tag("dc:uri", &namespaces())
    }

    #[test]
    fn test_resolve_from_element() {
        let node = XmlNode::new("view")
            .with_child(XmlNode::new(uri_tag()).with_text(" http://a/views/v1 "));
        assert_eq!(
            resolve_uri(&node, &namespaces(), UriSource::Element).as_deref(),
            Some("http://a/views/v1")
        );
    }

    #[test]
    fn test_resolve_from_child_attribute() {
        let node = XmlNode::new("condition")
            .with_child(XmlNode::new("source").with_attribute(uri_tag(), "http://a/domain/x"));
        assert_eq!(
            resolve_reference(&node, &namespaces(), "source").as_deref(),
            Some("http://a/domain/x")
        );
        assert_eq!(resolve_reference(&node, &namespaces(), "target_option"), None);
    }

    #[test]
    fn test_blank_uri_is_absent() {
        let node = XmlNode::new("view").with_child(XmlNode::new(uri_tag()));
        assert_eq!(resolve_uri(&node, &namespaces(), UriSource::Element), None);
        let node = XmlNode::new("condition").with_attribute(uri_tag(), "  ");
        assert_eq!(resolve_uri(&node, &namespaces(), UriSource::Attribute), None);
    }

    #[test]
    fn test_unbound_prefix_finds_nothing() {
        let node = XmlNode::new("view")
            .with_child(XmlNode::new(uri_tag()).with_text("http://a/views/v1"));
        assert_eq!(resolve_uri(&node, &NamespaceMap::new(), UriSource::Element), None);
    }

    #[test]
    fn test_split_uses_last_marker() {
        let id = split_identity("http://example.com/domain/terms/domain/project/title", "domain");
        assert_eq!(id.uri_prefix, "http://example.com/domain/terms");
        assert_eq!(id.key, "title");
    }

    #[test]
    fn test_split_without_marker() {
        let id = split_identity("urn:thing", "views");
        assert_eq!(id.uri_prefix, "urn:thing");
        assert_eq!(id.key, "urn:thing");
        assert_eq!(split_identity("", "views").key, "");
    }

    proptest! {
        #[test]
        fn prop_split_recovers_prefix_and_key(
            prefix in "http://[a-z]{1,8}\\.org(/[a-z]{1,6}){0,3}",
            key in "[a-z0-9_-]{1,12}",
        ) {
            let uri = format!("{}/options/{}", prefix, key);
            let id = split_identity(&uri, "options");
            prop_assert_eq!(id.uri_prefix, prefix);
            prop_assert_eq!(id.key, key);
            prop_assert_eq!(id.uri, uri);
        }
    }
}
