//! Typed access to the collection backends.
//!
//! `Store` turns the raw JSON documents of a [`CollectionStorage`] into domain
//! types and serializes read-modify-write cycles behind one process-wide lock,
//! so operations like "append to paymentHistory" cannot interleave.

use std::sync::{Arc, Mutex};

use log::debug;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error_handling::types::StorageError;
use crate::storage::memory_storage::MemoryStorage;
use crate::storage::storage_trait::CollectionStorage;
use crate::storage::types::Collection;

pub struct Store {
    backend: Arc<dyn CollectionStorage>,
    write_lock: Mutex<()>,
}

impl Store {
    pub fn new(backend: Arc<dyn CollectionStorage>) -> Self {
        Self {
            backend,
            write_lock: Mutex::new(()),
        }
    }

    /// A store over a fresh [`MemoryStorage`].
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStorage::new()))
    }

    pub fn backend(&self) -> &Arc<dyn CollectionStorage> {
        &self.backend
    }

    /// Reads a collection, falling back to `T::default()` only when it was never written.
    pub fn read<T>(&self, collection: Collection) -> Result<T, StorageError>
    where
        T: DeserializeOwned + Default,
    {
        Ok(self.read_existing(collection)?.unwrap_or_default())
    }

    /// Reads a collection, returning `None` when it was never written.
    pub fn read_existing<T>(&self, collection: Collection) -> Result<Option<T>, StorageError>
    where
        T: DeserializeOwned,
    {
        let Some(value) = self.backend.load(collection.name())? else {
            return Ok(None);
        };
        serde_json::from_value(value)
            .map(Some)
            .map_err(|e| StorageError::Serialization {
                collection: collection.name().to_string(),
                source: e,
            })
    }

    /// Replaces a whole collection.
    pub fn write<T>(&self, collection: Collection, document: &T) -> Result<(), StorageError>
    where
        T: Serialize,
    {
        let _guard = self.write_lock.lock().map_err(|_| StorageError::LockPoisoned)?;
        self.write_unlocked(collection, document)
    }

    pub fn contains(&self, collection: Collection) -> Result<bool, StorageError> {
        Ok(self.backend.load(collection.name())?.is_some())
    }

    /// Read-modify-write of one collection under the store lock.
    ///
    /// The document is written back only when `apply` succeeds, so a rejected
    /// mutation leaves the persisted collection untouched.
    pub fn update<T, R, E, F>(&self, collection: Collection, apply: F) -> Result<R, E>
    where
        T: Serialize + DeserializeOwned + Default,
        E: From<StorageError>,
        F: FnOnce(&mut T) -> Result<R, E>,
    {
        let _guard = self.write_lock.lock().map_err(|_| StorageError::LockPoisoned)?;
        let mut document: T = self.read(collection)?;
        let out = apply(&mut document)?;
        self.write_unlocked(collection, &document)?;
        debug!("Updated collection {}", collection);
        Ok(out)
    }

    fn write_unlocked<T: Serialize>(&self, collection: Collection, document: &T) -> Result<(), StorageError> {
        let value = serde_json::to_value(document).map_err(|e| StorageError::Serialization {
            collection: collection.name().to_string(),
            source: e,
        })?;
        self.backend.save(collection.name(), &value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error_handling::types::DataError;
    use crate::models::{Lesson, Module, Resource, ResourceType};
    use crate::seeding::catalogue;
    use crate::storage::{DatabaseStorage, FileStorage};
    use crate::test_support::failing_store;
    use serde_json::{json, Value};
    use std::collections::BTreeMap;
    use tempfile::TempDir;

    /// The baseline catalogue plus a module whose lessons were inserted out
    /// of order and whose resources mix linked and unlinked entries.
    fn modules_fixture() -> Vec<Module> {
        let mut modules = catalogue::baseline_modules();
        let mut extra = modules[0].clone();
        extra.id = "module-extra".into();
        extra.assigned_teacher_ids.clear();
        extra.lessons = vec![
            Lesson {
                id: "extra-l3".into(),
                title: "Third".into(),
                duration_minutes: 25,
                media_ref: None,
                order: 3,
            },
            Lesson {
                id: "extra-l1".into(),
                title: "First".into(),
                duration_minutes: 10,
                media_ref: Some("media/extra/01.mp4".into()),
                order: 1,
            },
        ];
        extra.resources = vec![
            Resource {
                id: "extra-r1".into(),
                title: "Worksheet".into(),
                kind: ResourceType::Pdf,
                url: "files/extra/worksheet.pdf".into(),
                lesson_ref: Some("extra-l1".into()),
            },
            Resource {
                id: "extra-r2".into(),
                title: "Reading".into(),
                kind: ResourceType::Link,
                url: "https://example.org/reading".into(),
                lesson_ref: None,
            },
        ];
        modules.push(extra);
        modules
    }

    fn assert_modules_round_trip(store: &Store) {
        let modules = modules_fixture();
        store.write(Collection::Modules, &modules).unwrap();
        let back: Vec<Module> = store.read(Collection::Modules).unwrap();
        assert_eq!(back, modules);
        let orders: Vec<u32> = back.last().unwrap().lessons.iter().map(|l| l.order).collect();
        assert_eq!(orders, vec![3, 1]);
    }

    #[test]
    fn test_modules_round_trip_through_file_backend() {
        let dir = TempDir::new().unwrap();
        let store = Store::new(Arc::new(FileStorage::new(dir.path()).unwrap()));
        assert_modules_round_trip(&store);

        let raw = std::fs::read_to_string(dir.path().join("collections/modules.json")).unwrap();
        assert!(raw.contains("\"type\": \"pdf\""));
    }

    #[test]
    fn test_modules_round_trip_through_database_backend() {
        let dir = TempDir::new().unwrap();
        let db_path = dir.path().join("learnhub.sqlite3");
        let store = Store::new(Arc::new(DatabaseStorage::new_file(&db_path).unwrap()));
        assert_modules_round_trip(&store);
        drop(store);

        let reopened = Store::new(Arc::new(DatabaseStorage::new_file(&db_path).unwrap()));
        let back: Vec<Module> = reopened.read(Collection::Modules).unwrap();
        assert_eq!(back, modules_fixture());
    }

    #[test]
    fn test_read_defaults_only_on_absence() {
        let store = Store::in_memory();
        let users: Vec<Value> = store.read(Collection::Users).unwrap();
        assert!(users.is_empty());
        assert!(!store.contains(Collection::Users).unwrap());

        let err = failing_store().read::<Vec<Value>>(Collection::Users).unwrap_err();
        assert!(matches!(err, StorageError::ReadFailed { .. }));
    }

    #[test]
    fn test_update_writes_only_on_success() {
        let store = Store::in_memory();
        store.write(Collection::Users, &vec![json!({"id": "u1"})]).unwrap();

        let res: Result<(), DataError> = store.update(Collection::Users, |users: &mut Vec<Value>| {
            users.clear();
            Err(DataError::Malformed("rejected".into()))
        });
        assert!(res.is_err());
        let users: Vec<Value> = store.read(Collection::Users).unwrap();
        assert_eq!(users.len(), 1);

        let count: usize = store
            .update(Collection::Users, |users: &mut Vec<Value>| {
                users.push(json!({"id": "u2"}));
                Ok::<_, StorageError>(users.len())
            })
            .unwrap();
        assert_eq!(count, 2);
    }

    #[test]
    fn test_shape_mismatch_is_serialization_error() {
        let store = Store::in_memory();
        store.write(Collection::Subscriptions, &json!([1, 2])).unwrap();
        let err = store
            .read::<BTreeMap<String, Value>>(Collection::Subscriptions)
            .unwrap_err();
        assert!(matches!(err, StorageError::Serialization { .. }));
    }
}
