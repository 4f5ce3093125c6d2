//! Owned XML element tree
//!
//! Documents are small (one exported schema), so roxmltree parses the whole
//! document and the tree is copied into owned nodes the reconcilers can hold
//! on to. Element and attribute names in a namespace are stored in
//! `{namespace}local` form, which is also what [`ns_tag`] produces for
//! lookups.

use std::collections::BTreeMap;

use roxmltree::{Document, ParsingOptions};

use crate::errors::{Result, SchemaPortError};
use crate::xml::accessor::sanitize_utf8;

/// Dublin Core namespace used for `dc:uri` and `dc:comment`
pub const DC_NAMESPACE: &str = "http://purl.org/dc/elements/1.1/";

/// Prefix to namespace URI. The default namespace, if declared, sits under "".
pub type NamespaceMap = BTreeMap<String, String>;

/// One element: resolved tag, attributes, text content and children
#[derive(Debug, Clone, PartialEq, Default)]
pub struct XmlNode {
    tag: String,
    attributes: BTreeMap<String, String>,
    text: Option<String>,
    children: Vec<XmlNode>,
}

impl XmlNode {
    /// Create an empty element with the given (already resolved) tag
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Self::default()
        }
    }

    /// Builder: set text content
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Builder: add an attribute
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Builder: append a child element
    pub fn with_child(mut self, child: XmlNode) -> Self {
        self.children.push(child);
        self
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Tag without its `{namespace}` part
    pub fn local_name(&self) -> &str {
        match self.tag.rsplit_once('}') {
            Some((_, local)) => local,
            None => &self.tag,
        }
    }

    /// Text content, `None` when the element had none
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    pub fn attributes(&self) -> &BTreeMap<String, String> {
        &self.attributes
    }

    pub fn children(&self) -> &[XmlNode] {
        &self.children
    }

    /// First child with the given tag
    pub fn child(&self, tag: &str) -> Option<&XmlNode> {
        self.children.iter().find(|c| c.tag == tag)
    }

    /// All children with the given tag, in document order
    pub fn children_named<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a XmlNode> + 'a {
        self.children.iter().filter(move |c| c.tag == tag)
    }

    /// Children with `tag` found under the first `container` child.
    /// A missing container yields nothing.
    pub fn nested<'a>(
        &'a self,
        container: &'a str,
        tag: &'a str,
    ) -> impl Iterator<Item = &'a XmlNode> + 'a {
        self.child(container)
            .into_iter()
            .flat_map(move |c| c.children_named(tag))
    }
}

/// A parsed document: the root element plus the namespaces it declares
#[derive(Debug, Clone, PartialEq)]
pub struct XmlDocument {
    root: XmlNode,
    namespaces: NamespaceMap,
}

impl XmlDocument {
    pub fn root(&self) -> &XmlNode {
        &self.root
    }

    /// Namespaces in scope on the root element
    pub fn namespaces(&self) -> &NamespaceMap {
        &self.namespaces
    }
}

/// Resolve a `prefix:local` name against `namespaces`
///
/// Returns `{namespace}local` when the prefix is bound; otherwise the name is
/// returned unchanged so that a lookup with it simply finds nothing.
pub fn ns_tag(qualified: &str, namespaces: &NamespaceMap) -> String {
    match qualified.split_once(':') {
        Some((prefix, local)) => match namespaces.get(prefix) {
            Some(ns) => format!("{{{}}}{}", ns, local),
            None => qualified.to_string(),
        },
        None => qualified.to_string(),
    }
}

fn expanded(namespace: Option<&str>, local: &str) -> String {
    match namespace {
        Some(ns) => format!("{{{}}}{}", ns, local),
        None => local.to_string(),
    }
}

fn malformed(reason: impl Into<String>) -> SchemaPortError {
    SchemaPortError::MalformedDocument {
        reason: reason.into(),
    }
}

/// Copy an element and its subtree out of the parsed document
///
/// Text is the element's own text and CDATA, trimmed; whitespace-only
/// content counts as no text.
fn to_owned_node(node: roxmltree::Node<'_, '_>) -> XmlNode {
    let tag = node.tag_name();
    let mut owned = XmlNode::new(expanded(tag.namespace(), tag.name()));

    for attr in node.attributes() {
        owned
            .attributes
            .insert(expanded(attr.namespace(), attr.name()), attr.value().to_string());
    }

    let text: String = node
        .children()
        .filter(|c| c.is_text())
        .filter_map(|c| c.text())
        .collect();
    let text = text.trim();
    if !text.is_empty() {
        owned.text = Some(text.to_string());
    }

    owned.children = node
        .children()
        .filter(|c| c.is_element())
        .map(to_owned_node)
        .collect();
    owned
}

/// Parse a complete document
///
/// Invalid UTF-8 is dropped before parsing. A DOCTYPE is tolerated. Anything
/// that is not a single well-formed root element is a `MalformedDocument`
/// error.
pub fn parse_document(bytes: &[u8]) -> Result<XmlDocument> {
    let source = sanitize_utf8(bytes);
    let source = source.trim_start_matches('\u{feff}');

    let options = ParsingOptions {
        allow_dtd: true,
        ..ParsingOptions::default()
    };
    let document =
        Document::parse_with_options(source, options).map_err(|e| malformed(e.to_string()))?;
    let root = document.root_element();

    let namespaces = root
        .namespaces()
        .map(|ns| (ns.name().unwrap_or_default().to_string(), ns.uri().to_string()))
        .collect();

    Ok(XmlDocument {
        root: to_owned_node(root),
        namespaces,
    })
}
