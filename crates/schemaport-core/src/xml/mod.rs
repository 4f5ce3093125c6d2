//! XML document access
//!
//! - `node`: an owned element tree copied out of a roxmltree document, with
//!   namespace-qualified names in `{namespace}local` form
//! - `accessor`: tolerant value extraction (absent means empty)
//! - `uri`: identity URI resolution and `uri_prefix`/`key` splitting

pub mod accessor;
pub mod node;
pub mod uri;

pub use accessor::{
    attributes_of, parse_count, parse_flag, parse_order, read_localized, tag_of, text_of,
    value_of, Extract, NodeValue,
};
pub use node::{ns_tag, parse_document, NamespaceMap, XmlDocument, XmlNode, DC_NAMESPACE};
pub use uri::{resolve_uri, resolve_reference, split_identity, Identity, UriSource};
