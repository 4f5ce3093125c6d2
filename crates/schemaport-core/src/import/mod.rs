//! Import reconciliation
//!
//! One reconciler per schema walks the document depth-first in document
//! order. For every node it matches the stored record by URI, populates a
//! candidate, resolves references, validates, records the change flag in the
//! ledger and, in commit mode, writes what the ledger approves.
//!
//! An invalid node is skipped on its own; its children are still visited.

use serde::{Deserialize, Serialize};

use crate::errors::{Result, SchemaPortError};
use crate::ledger::Ledger;
use crate::ops::Store;
use crate::policy::ImportPolicy;
use crate::xml::node::XmlDocument;

mod conditions;
mod domain;
mod options;
mod questions;
pub mod report;
mod session;
mod tasks;
mod views;

pub use report::{ImportReport, Reconciliation, Rejection, SavedRecord};

use session::Session;

/// The six exchange schemas
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Schema {
    Conditions,
    Domain,
    Options,
    Questions,
    Tasks,
    Views,
}

impl Schema {
    pub const ALL: [Schema; 6] = [
        Schema::Conditions,
        Schema::Domain,
        Schema::Options,
        Schema::Questions,
        Schema::Tasks,
        Schema::Views,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Schema::Conditions => "conditions",
            Schema::Domain => "domain",
            Schema::Options => "options",
            Schema::Questions => "questions",
            Schema::Tasks => "tasks",
            Schema::Views => "views",
        }
    }

    /// Root element of an exported document
    pub fn root_tag(&self) -> &'static str {
        match self {
            Schema::Questions => "catalog",
            other => other.as_str(),
        }
    }

    /// URI path segment that separates `uri_prefix` from the rest
    pub fn path_marker(&self) -> &'static str {
        self.as_str()
    }

    pub fn from_root_tag(tag: &str) -> Option<Schema> {
        Schema::ALL.into_iter().find(|s| s.root_tag() == tag)
    }

    /// Parse a schema name (`as_str` form)
    pub fn parse(name: &str) -> Option<Schema> {
        Schema::ALL.into_iter().find(|s| s.as_str() == name)
    }
}

impl std::fmt::Display for Schema {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Preview never writes; commit writes what the ledger approves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    Preview,
    Commit,
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Mode::Preview => f.write_str("preview"),
            Mode::Commit => f.write_str("commit"),
        }
    }
}

/// Reconcile one parsed document against `store`
///
/// `ledger` is the caller's decision map: empty for a preview, the edited
/// preview result for a commit. It is consumed and returned filled in.
///
/// # Errors
///
/// Returns `UnexpectedRoot` if the document root is not `schema`'s root tag.
/// Nothing else aborts a walk; per-node problems end up in the report.
///
/// # Example
///
/// ```
/// use schemaport_core::import::{reconcile, Mode, Schema};
/// use schemaport_core::ledger::Ledger;
/// use schemaport_core::ops::MemoryStore;
/// use schemaport_core::policy::ImportPolicy;
/// use schemaport_core::xml::parse_document;
///
/// let doc = parse_document(br#"<views xmlns:dc="http://purl.org/dc/elements/1.1/">
///   <view><dc:uri>http://example.com/terms/views/summary</dc:uri></view>
/// </views>"#).unwrap();
///
/// let mut store = MemoryStore::new();
/// let run = reconcile(Schema::Views, &doc, &mut store, Ledger::new(), Mode::Preview,
///     &ImportPolicy::default()).unwrap();
///
/// assert_eq!(run.ledger.get("http://example.com/terms/views/summary"), Some(true));
/// assert!(store.is_empty());
/// ```
pub fn reconcile<S: Store>(
    schema: Schema,
    document: &XmlDocument,
    store: &mut S,
    ledger: Ledger,
    mode: Mode,
    policy: &ImportPolicy,
) -> Result<Reconciliation> {
    let root = document.root();
    if root.local_name() != schema.root_tag() {
        return Err(SchemaPortError::UnexpectedRoot {
            expected: schema.root_tag().to_string(),
            found: root.local_name().to_string(),
        });
    }

    tracing::info!(schema = schema.as_str(), mode = %mode, "reconciling document");

    let mut session = Session::new(
        store,
        ledger,
        mode,
        policy,
        document.namespaces().clone(),
        schema.path_marker(),
    );

    match schema {
        Schema::Conditions => conditions::walk(&mut session, root),
        Schema::Domain => domain::walk(&mut session, root),
        Schema::Options => options::walk(&mut session, root),
        Schema::Questions => questions::walk(&mut session, root),
        Schema::Tasks => tasks::walk(&mut session, root),
        Schema::Views => views::walk(&mut session, root),
    }

    let run = session.finish();
    tracing::info!(
        schema = schema.as_str(),
        ledger_len = run.ledger.len(),
        saved = run.report.saved.len(),
        rejected = run.report.rejected.len(),
        "document reconciled"
    );
    Ok(run)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_tags() {
        assert_eq!(Schema::from_root_tag("catalog"), Some(Schema::Questions));
        assert_eq!(Schema::from_root_tag("questions"), None);
        assert_eq!(Schema::from_root_tag("domain"), Some(Schema::Domain));
        assert_eq!(Schema::Questions.path_marker(), "questions");
    }

    #[test]
    fn test_parse_schema_name() {
        for schema in Schema::ALL {
            assert_eq!(Schema::parse(schema.as_str()), Some(schema));
        }
        assert_eq!(Schema::parse("catalog"), None);
    }
}
