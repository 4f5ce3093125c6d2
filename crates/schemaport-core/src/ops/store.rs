use std::collections::BTreeMap;

use serde_json::Value;

use crate::errors::{ExError, ExErrorKind, ExResult};
use crate::model::{Entity, EntityKind};

/// A record as the store sees it: indexed columns plus an opaque JSON body
#[derive(Debug, Clone, PartialEq)]
pub struct StoredRecord {
    pub kind: EntityKind,
    pub identity: String,
    pub key: String,
    pub path: Option<String>,
    pub parent: Option<String>,
    pub body: Value,
}

impl StoredRecord {
    /// Flatten an entity into its stored form
    ///
    /// # Errors
    ///
    /// Returns `ERR_SERIALIZATION` if the entity cannot be encoded.
    pub fn from_entity<E: Entity>(entity: &E) -> ExResult<Self> {
        let body = serde_json::to_value(entity).map_err(|e| {
            ExError::new(ExErrorKind::Serialization)
                .with_op("encode_record")
                .with_entity_kind(E::KIND)
                .with_uri(entity.identity())
                .with_message(e.to_string())
        })?;

        Ok(Self {
            kind: E::KIND,
            identity: entity.identity().to_string(),
            key: entity.key().to_string(),
            path: entity.path().map(str::to_string),
            parent: entity.parent().map(str::to_string),
            body,
        })
    }

    /// Decode the body back into an entity
    ///
    /// # Errors
    ///
    /// Returns `ERR_SERIALIZATION` if the body does not match `E`.
    pub fn decode<E: Entity>(&self) -> ExResult<E> {
        serde_json::from_value(self.body.clone()).map_err(|e| {
            ExError::new(ExErrorKind::Serialization)
                .with_op("decode_record")
                .with_entity_kind(self.kind)
                .with_uri(self.identity.clone())
                .with_message(e.to_string())
        })
    }
}

/// Persistence collaborator for reconciliation
///
/// Implementations provide record-level primitives; the typed helpers are
/// layered on top. Every save is an independent point write keyed by
/// `(kind, identity)`, so saving the same identity twice updates in place.
pub trait Store {
    /// # Errors
    ///
    /// Returns an error if the backend read fails.
    fn load_record(&self, kind: EntityKind, identity: &str) -> ExResult<Option<StoredRecord>>;

    /// Insert or update by `(kind, identity)`
    ///
    /// # Errors
    ///
    /// Returns an error if the backend write fails.
    fn save_record(&mut self, record: StoredRecord) -> ExResult<()>;

    /// All records of a kind, ordered by identity
    ///
    /// # Errors
    ///
    /// Returns an error if the backend read fails.
    fn list_records(&self, kind: EntityKind) -> ExResult<Vec<StoredRecord>>;

    /// Identities of `kind` records whose key equals `key`
    ///
    /// # Errors
    ///
    /// Returns an error if the backend read fails.
    fn identities_with_key(&self, kind: EntityKind, key: &str) -> ExResult<Vec<String>> {
        Ok(self
            .list_records(kind)?
            .into_iter()
            .filter(|r| r.key == key)
            .map(|r| r.identity)
            .collect())
    }

    /// Identities of `kind` records whose path equals `path`
    ///
    /// # Errors
    ///
    /// Returns an error if the backend read fails.
    fn identities_with_path(&self, kind: EntityKind, path: &str) -> ExResult<Vec<String>> {
        Ok(self
            .list_records(kind)?
            .into_iter()
            .filter(|r| r.path.as_deref() == Some(path))
            .map(|r| r.identity)
            .collect())
    }

    /// Typed load
    ///
    /// # Errors
    ///
    /// Returns an error if the read fails or the body does not decode.
    fn load<E: Entity>(&self, identity: &str) -> ExResult<Option<E>>
    where
        Self: Sized,
    {
        self.load_record(E::KIND, identity)?
            .map(|record| record.decode())
            .transpose()
    }

    /// Typed save
    ///
    /// # Errors
    ///
    /// Returns an error if encoding or the write fails.
    fn save<E: Entity>(&mut self, entity: &E) -> ExResult<()>
    where
        Self: Sized,
    {
        self.save_record(StoredRecord::from_entity(entity)?)
    }

    /// Typed list, ordered by identity
    ///
    /// # Errors
    ///
    /// Returns an error if the read fails or any body does not decode.
    fn list<E: Entity>(&self) -> ExResult<Vec<E>>
    where
        Self: Sized,
    {
        self.list_records(E::KIND)?
            .iter()
            .map(|record| record.decode::<E>())
            .collect()
    }
}

/// In-memory store
///
/// Backs unit tests and dry runs that should not touch a database.
/// Not thread-safe; single-threaded use only.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    records: BTreeMap<(EntityKind, String), StoredRecord>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records across all kinds
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of records of one kind
    pub fn count(&self, kind: EntityKind) -> usize {
        self.records.keys().filter(|(k, _)| *k == kind).count()
    }
}

impl Store for MemoryStore {
    fn load_record(&self, kind: EntityKind, identity: &str) -> ExResult<Option<StoredRecord>> {
        Ok(self.records.get(&(kind, identity.to_string())).cloned())
    }

    fn save_record(&mut self, record: StoredRecord) -> ExResult<()> {
        self.records
            .insert((record.kind, record.identity.clone()), record);
        Ok(())
    }

    fn list_records(&self, kind: EntityKind) -> ExResult<Vec<StoredRecord>> {
        Ok(self
            .records
            .range((kind, String::new())..)
            .take_while(|((k, _), _)| *k == kind)
            .map(|(_, record)| record.clone())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AttributeEntity, View};

    fn view(uri: &str, key: &str) -> View {
        View {
            uri: uri.to_string(),
            key: key.to_string(),
            ..View::default()
        }
    }

    #[test]
    fn test_save_then_load() {
        let mut store = MemoryStore::new();
        store.save(&view("http://a/views/v1", "v1")).unwrap();

        let loaded: Option<View> = store.load("http://a/views/v1").unwrap();
        assert_eq!(loaded.map(|v| v.key), Some("v1".to_string()));
        assert_eq!(store.load::<View>("http://a/views/none").unwrap(), None);
    }

    #[test]
    fn test_save_same_identity_updates_in_place() {
        let mut store = MemoryStore::new();
        store.save(&view("http://a/views/v1", "v1")).unwrap();
        store.save(&view("http://a/views/v1", "renamed")).unwrap();

        assert_eq!(store.count(EntityKind::View), 1);
        assert_eq!(
            store.identities_with_key(EntityKind::View, "renamed").unwrap(),
            vec!["http://a/views/v1".to_string()]
        );
    }

    #[test]
    fn test_kinds_are_separate() {
        let mut store = MemoryStore::new();
        store.save(&view("http://a/x", "x")).unwrap();
        assert_eq!(store.load::<AttributeEntity>("http://a/x").unwrap(), None);
        assert!(store.list::<AttributeEntity>().unwrap().is_empty());
        assert_eq!(store.list::<View>().unwrap().len(), 1);
    }

    #[test]
    fn test_path_lookup() {
        let mut store = MemoryStore::new();
        let mut entity = AttributeEntity {
            uri: "http://a/domain/project".to_string(),
            key: "project".to_string(),
            ..AttributeEntity::default()
        };
        entity.place_under(None);
        store.save(&entity).unwrap();

        let record = store
            .load_record(EntityKind::AttributeEntity, "http://a/domain/project")
            .unwrap()
            .unwrap();
        assert_eq!(record.path.as_deref(), Some("project"));
        assert_eq!(
            store
                .identities_with_path(EntityKind::AttributeEntity, "project")
                .unwrap()
                .len(),
            1
        );
    }
}
