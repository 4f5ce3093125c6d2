//! Per-run reconciliation state
//!
//! A `Session` owns the ledger for one walk and holds the store, the run
//! mode and the policy. Reconcilers call into it for every lookup, for the
//! validate/diff step and for the ledger-gated write.

use std::collections::BTreeSet;

use crate::diff::{classify, ChangeStatus, EntityChange};
use crate::errors::SchemaPortError;
use crate::import::report::{ImportReport, Reconciliation, Rejection, SavedRecord};
use crate::import::Mode;
use crate::ledger::Ledger;
use crate::model::{AttributeEntity, Entity, EntityKind, LocalizedText};
use crate::ops::Store;
use crate::policy::ImportPolicy;
use crate::rules::Validate;
use crate::xml::accessor::{read_localized, text_of};
use crate::xml::node::{ns_tag, NamespaceMap, XmlNode};
use crate::xml::uri::{resolve_uri, split_identity, Identity, UriSource};

/// Validation plus change detection for one candidate
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Judgement {
    Valid {
        status: ChangeStatus,
        fields: Vec<String>,
    },
    Invalid(SchemaPortError),
}

impl Judgement {
    pub(crate) fn is_valid(&self) -> bool {
        matches!(self, Judgement::Valid { .. })
    }
}

pub(crate) struct Session<'a, S: Store> {
    store: &'a mut S,
    ledger: Ledger,
    mode: Mode,
    policy: &'a ImportPolicy,
    namespaces: NamespaceMap,
    marker: &'static str,
    report: ImportReport,
}

impl<'a, S: Store> Session<'a, S> {
    pub(crate) fn new(
        store: &'a mut S,
        ledger: Ledger,
        mode: Mode,
        policy: &'a ImportPolicy,
        namespaces: NamespaceMap,
        marker: &'static str,
    ) -> Self {
        Self {
            store,
            ledger,
            mode,
            policy,
            namespaces,
            marker,
            report: ImportReport::default(),
        }
    }

    pub(crate) fn policy(&self) -> &ImportPolicy {
        self.policy
    }

    pub(crate) fn finish(self) -> Reconciliation {
        Reconciliation {
            ledger: self.ledger,
            report: self.report,
        }
    }

    // ===== Node access =====

    /// Identity of an entity node, empty when it carries no URI
    pub(crate) fn identity(&self, node: &XmlNode) -> Identity {
        let uri = resolve_uri(node, &self.namespaces, UriSource::Element).unwrap_or_default();
        split_identity(&uri, self.marker)
    }

    /// URI held by the reference child `tag`
    pub(crate) fn reference(&self, node: &XmlNode, tag: &str) -> Option<String> {
        resolve_uri(node, &self.namespaces, UriSource::Child(tag))
    }

    pub(crate) fn comment(&self, node: &XmlNode) -> String {
        text_of(node, &ns_tag("dc:comment", &self.namespaces))
    }

    pub(crate) fn localized(&self, node: &XmlNode, tag: &str) -> LocalizedText {
        read_localized(node, tag, &self.policy.languages)
    }

    // ===== Store lookups =====

    /// Stored snapshot for `uri`; a failed read counts as not found
    pub(crate) fn existing<E: Entity>(&self, uri: &str) -> Option<E> {
        if uri.is_empty() {
            return None;
        }
        match self.store.load::<E>(uri) {
            Ok(Some(entity)) => {
                tracing::debug!(kind = E::KIND.as_str(), uri, "loaded from store");
                Some(entity)
            }
            Ok(None) => {
                tracing::debug!(kind = E::KIND.as_str(), uri, "not in store, creating");
                None
            }
            Err(e) => {
                tracing::warn!(kind = E::KIND.as_str(), uri, error = %e, "store read failed, treating as not found");
                None
            }
        }
    }

    /// Keep `uri` only if a record of kind `E` exists for it
    pub(crate) fn resolve<E: Entity>(&self, uri: Option<String>) -> Option<String> {
        let uri = uri?;
        match self.store.load_record(E::KIND, &uri) {
            Ok(Some(_)) => Some(uri),
            Ok(None) => {
                tracing::debug!(kind = E::KIND.as_str(), uri = %uri, "reference target missing, left unset");
                None
            }
            Err(e) => {
                tracing::warn!(kind = E::KIND.as_str(), uri = %uri, error = %e, "reference lookup failed, left unset");
                None
            }
        }
    }

    /// Keep `uri` only if it names a stored attribute (not a plain entity)
    pub(crate) fn resolve_attribute(&self, uri: Option<String>) -> Option<String> {
        let uri = uri?;
        match self.existing::<AttributeEntity>(&uri) {
            Some(target) if target.is_attribute => Some(uri),
            Some(_) => {
                tracing::debug!(uri = %uri, "reference names an entity, not an attribute; left unset");
                None
            }
            None => None,
        }
    }

    /// Resolve every `dc:uri` reference node, dropping missing targets
    pub(crate) fn resolve_all<'n, E: Entity>(
        &self,
        nodes: impl Iterator<Item = &'n XmlNode>,
    ) -> BTreeSet<String> {
        nodes
            .filter_map(|n| self.resolve::<E>(resolve_uri(n, &self.namespaces, UriSource::Attribute)))
            .collect()
    }

    // ===== Decide and persist =====

    /// Validate `candidate` and compare it with the snapshot taken before
    /// population
    pub(crate) fn judge<E: Validate>(&self, before: Option<&E>, candidate: &E) -> Judgement {
        match candidate.validate(&*self.store) {
            Ok(()) => {
                let (status, fields) = classify(before, candidate);
                Judgement::Valid { status, fields }
            }
            Err(e) => Judgement::Invalid(e),
        }
    }

    /// Record the ledger entry and, when committing an approved candidate,
    /// write it
    ///
    /// An invalid candidate is neither recorded nor written.
    pub(crate) fn settle<E: Entity>(&mut self, candidate: &E, judgement: &Judgement) {
        let uri = candidate.identity();

        let (status, fields) = match judgement {
            Judgement::Invalid(reason) => {
                tracing::info!(kind = E::KIND.as_str(), uri, reason = %reason, "not saving due to validation error");
                self.report.rejected.push(Rejection {
                    kind: E::KIND,
                    uri: uri.to_string(),
                    reason: reason.to_string(),
                });
                return;
            }
            Judgement::Valid { status, fields } => (*status, fields),
        };

        // Read before recording: the supplied decision gates this write
        let approved = self.ledger.decision(uri);
        let changed = status != ChangeStatus::Unchanged;
        if self.ledger.record(uri, changed) {
            self.report.changes.push(EntityChange {
                kind: E::KIND,
                uri: uri.to_string(),
                status,
                fields: fields.clone(),
            });
        }

        if self.mode != Mode::Commit {
            return;
        }
        if !approved {
            tracing::debug!(kind = E::KIND.as_str(), uri, "declined in ledger, not saving");
            return;
        }

        match self.store.save(candidate) {
            Ok(()) => {
                tracing::info!(kind = E::KIND.as_str(), uri, parent = candidate.parent(), "saved");
                self.report.saved.push(SavedRecord {
                    kind: E::KIND,
                    uri: uri.to_string(),
                });
            }
            Err(e) => {
                tracing::warn!(kind = E::KIND.as_str(), uri, error = %e, "save failed");
            }
        }
    }

    /// Write a sub-record that bypasses the ledger
    ///
    /// Only in commit mode, and only when its owner (`owner_kind` with the
    /// record's identity) is already stored.
    pub(crate) fn save_sub_record<E: Entity>(&mut self, owner_kind: EntityKind, record: &E) {
        let owner = record.identity();
        if self.mode != Mode::Commit {
            tracing::debug!(kind = E::KIND.as_str(), uri = owner, "preview, sub-record not written");
            return;
        }

        match self.store.load_record(owner_kind, owner) {
            Ok(Some(_)) => {}
            Ok(None) => {
                tracing::info!(kind = E::KIND.as_str(), uri = owner, "owner not stored, sub-record skipped");
                return;
            }
            Err(e) => {
                tracing::warn!(kind = E::KIND.as_str(), uri = owner, error = %e, "owner lookup failed, sub-record skipped");
                return;
            }
        }

        match self.store.save(record) {
            Ok(()) => {
                tracing::info!(kind = E::KIND.as_str(), uri = owner, "saved");
                self.report.saved.push(SavedRecord {
                    kind: E::KIND,
                    uri: owner.to_string(),
                });
            }
            Err(e) => {
                tracing::warn!(kind = E::KIND.as_str(), uri = owner, error = %e, "save failed");
            }
        }
    }
}
