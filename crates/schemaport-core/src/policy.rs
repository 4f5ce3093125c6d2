//! Import policy
//!
//! Knobs that change how a walk treats certain nodes. The defaults reproduce
//! the long-standing behaviour of the exchange format, quirks included.

use serde::{Deserialize, Serialize};

/// How an option's save decision is made
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OptionDecisionPolicy {
    /// Reuse the owning option set's validation and change result
    #[default]
    ParentOptionSet,
    /// Validate the option's own path and diff its own fields
    OwnFields,
}

/// How far a views document is walked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ViewWalkPolicy {
    /// Stop after the first view that passes validation
    #[default]
    FirstValid,
    /// Reconcile every view
    All,
}

/// Per-import settings
///
/// # Example
///
/// ```
/// use schemaport_core::policy::{ImportPolicy, ViewWalkPolicy};
///
/// let policy: ImportPolicy = serde_json::from_str(r#"{"view_walk":"all"}"#).unwrap();
/// assert_eq!(policy.view_walk, ViewWalkPolicy::All);
/// assert_eq!(policy.languages, vec!["en".to_string(), "de".to_string()]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportPolicy {
    /// Language codes kept in localized fields; others are dropped
    pub languages: Vec<String>,
    pub option_decision: OptionDecisionPolicy,
    pub view_walk: ViewWalkPolicy,
}

impl Default for ImportPolicy {
    fn default() -> Self {
        Self {
            languages: vec!["en".to_string(), "de".to_string()],
            option_decision: OptionDecisionPolicy::default(),
            view_walk: ViewWalkPolicy::default(),
        }
    }
}
