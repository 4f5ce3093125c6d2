//! Decision ledger
//!
//! Maps entity URI to "should this be saved". A preview run starts empty and
//! fills it with change flags; the caller shows that as a checklist and hands
//! the edited map back to a commit run, where it gates the writes.
//!
//! Supplied decisions are kept apart from the flags recorded during the run,
//! so a repeated node is gated by the caller's decision and never by a flag
//! an earlier node of the same run produced. Within one run each URI is
//! recorded at most once; the first record wins.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Ledger {
    /// What the run returns: supplied entries overlaid with recorded flags
    entries: BTreeMap<String, bool>,

    /// Caller decisions; never written during a run
    supplied: BTreeMap<String, bool>,

    /// URIs recorded during the current run
    recorded: BTreeSet<String>,
}

impl Ledger {
    /// Fresh, empty ledger for a preview run
    pub fn new() -> Self {
        Self::default()
    }

    /// Ledger seeded with externally supplied decisions (e.g. an edited preview)
    pub fn from_decisions(decisions: BTreeMap<String, bool>) -> Self {
        Self {
            entries: decisions.clone(),
            supplied: decisions,
            recorded: BTreeSet::new(),
        }
    }

    /// Supplied decision for `uri`; approve when nothing was supplied
    pub fn decision(&self, uri: &str) -> bool {
        self.supplied.get(uri).copied().unwrap_or(true)
    }

    /// Record the change flag for `uri`
    ///
    /// Returns false, leaving the entry untouched, when `uri` was already
    /// recorded in this run. The supplied decision is never touched.
    pub fn record(&mut self, uri: &str, changed: bool) -> bool {
        if !self.recorded.insert(uri.to_string()) {
            tracing::debug!(uri, "ledger entry already recorded in this run, kept");
            return false;
        }
        self.entries.insert(uri.to_string(), changed);
        true
    }

    pub fn get(&self, uri: &str) -> Option<bool> {
        self.entries.get(uri).copied()
    }

    pub fn contains(&self, uri: &str) -> bool {
        self.entries.contains_key(uri)
    }

    /// Whether `uri` was recorded during this run (as opposed to supplied)
    pub fn was_recorded(&self, uri: &str) -> bool {
        self.recorded.contains(uri)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, bool)> {
        self.entries.iter().map(|(uri, flag)| (uri.as_str(), *flag))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn into_decisions(self) -> BTreeMap<String, bool> {
        self.entries
    }
}

impl Serialize for Ledger {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.entries.serialize(serializer)
    }
}

/// A deserialized ledger is a set of supplied decisions
impl<'de> Deserialize<'de> for Ledger {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        BTreeMap::<String, bool>::deserialize(deserializer).map(Self::from_decisions)
    }
}
