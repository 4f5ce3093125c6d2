use crate::errors::{Result, SchemaPortError};
use crate::model::{
    AttributeEntity, Catalog, Condition, Entity, OptionItem, OptionSet, Question, QuestionSet,
    Section, Subsection, Task, View,
};
use crate::ops::Store;

/// Structural uniqueness check for a not-yet-saved candidate
///
/// Another stored record of the same kind with a different identity and the
/// same key (or path) makes the candidate invalid. The candidate's own
/// stored version never conflicts with it.
pub trait Validate: Entity {
    /// # Errors
    ///
    /// Returns `MissingKey`, `DuplicateKey` or `DuplicatePath`.
    fn validate<S: Store>(&self, store: &S) -> Result<()>;
}

/// Identities other than `own`
fn others<'a>(identities: Vec<String>, own: &'a str) -> impl Iterator<Item = String> + 'a {
    identities.into_iter().filter(move |id| id != own)
}

fn require_key<E: Entity>(candidate: &E) -> Result<()> {
    if candidate.key().is_empty() {
        return Err(SchemaPortError::MissingKey {
            kind: E::KIND,
            uri: candidate.identity().to_string(),
        });
    }
    Ok(())
}

/// Key must be non-empty and unique within the kind
///
/// # Errors
///
/// Returns `MissingKey` or `DuplicateKey`.
pub fn unique_key<E: Entity, S: Store>(candidate: &E, store: &S) -> Result<()> {
    require_key(candidate)?;

    let identities = store
        .identities_with_key(E::KIND, candidate.key())
        .unwrap_or_else(|e| {
            tracing::warn!(kind = E::KIND.as_str(), error = %e, "key lookup failed, assuming unique");
            Vec::new()
        });

    match others(identities, candidate.identity()).next() {
        Some(other_uri) => Err(SchemaPortError::DuplicateKey {
            kind: E::KIND,
            uri: candidate.identity().to_string(),
            key: candidate.key().to_string(),
            other_uri,
        }),
        None => Ok(()),
    }
}

/// Key must be non-empty and the path unique within the kind
///
/// # Errors
///
/// Returns `MissingKey` or `DuplicatePath`.
pub fn unique_path<E: Entity, S: Store>(candidate: &E, store: &S) -> Result<()> {
    require_key(candidate)?;

    let path = candidate.path().unwrap_or_default();
    let identities = store
        .identities_with_path(E::KIND, path)
        .unwrap_or_else(|e| {
            tracing::warn!(kind = E::KIND.as_str(), error = %e, "path lookup failed, assuming unique");
            Vec::new()
        });

    match others(identities, candidate.identity()).next() {
        Some(other_uri) => Err(SchemaPortError::DuplicatePath {
            kind: E::KIND,
            uri: candidate.identity().to_string(),
            path: path.to_string(),
            other_uri,
        }),
        None => Ok(()),
    }
}

impl Validate for Condition {
    fn validate<S: Store>(&self, store: &S) -> Result<()> {
        unique_key(self, store)
    }
}

impl Validate for AttributeEntity {
    fn validate<S: Store>(&self, store: &S) -> Result<()> {
        unique_path(self, store)
    }
}

impl Validate for OptionSet {
    fn validate<S: Store>(&self, store: &S) -> Result<()> {
        unique_key(self, store)
    }
}

impl Validate for OptionItem {
    fn validate<S: Store>(&self, store: &S) -> Result<()> {
        unique_path(self, store)
    }
}

impl Validate for Catalog {
    fn validate<S: Store>(&self, store: &S) -> Result<()> {
        unique_key(self, store)
    }
}

impl Validate for Section {
    fn validate<S: Store>(&self, store: &S) -> Result<()> {
        unique_path(self, store)
    }
}

impl Validate for Subsection {
    fn validate<S: Store>(&self, store: &S) -> Result<()> {
        unique_path(self, store)
    }
}

impl Validate for QuestionSet {
    fn validate<S: Store>(&self, store: &S) -> Result<()> {
        unique_path(self, store)
    }
}

impl Validate for Question {
    fn validate<S: Store>(&self, store: &S) -> Result<()> {
        unique_path(self, store)
    }
}

impl Validate for Task {
    fn validate<S: Store>(&self, store: &S) -> Result<()> {
        unique_key(self, store)
    }
}

impl Validate for View {
    fn validate<S: Store>(&self, store: &S) -> Result<()> {
        unique_key(self, store)
    }
}
