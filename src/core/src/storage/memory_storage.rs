use std::collections::HashMap;
use std::sync::Mutex;

use log::{debug, info};
use serde_json::Value;

use crate::error_handling::types::StorageError;
use crate::storage::storage_trait::CollectionStorage;

/// Volatile backend keeping every document in process memory.
///
/// Used by tests and by the `memory` backend setting; nothing survives a
/// restart.
#[derive(Default)]
pub struct MemoryStorage {
    documents: Mutex<HashMap<String, Value>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        info!("MemoryStorage initialized");
        Self::default()
    }
}

impl CollectionStorage for MemoryStorage {
    fn load(&self, name: &str) -> Result<Option<Value>, StorageError> {
        let docs = self.documents.lock().map_err(|_| StorageError::LockPoisoned)?;
        debug!("Loaded collection {} from memory (present: {})", name, docs.contains_key(name));
        Ok(docs.get(name).cloned())
    }

    fn save(&self, name: &str, document: &Value) -> Result<(), StorageError> {
        let mut docs = self.documents.lock().map_err(|_| StorageError::LockPoisoned)?;
        docs.insert(name.to_string(), document.clone());
        info!("Saved collection {} in memory", name);
        Ok(())
    }

    fn remove(&self, name: &str) -> Result<bool, StorageError> {
        let mut docs = self.documents.lock().map_err(|_| StorageError::LockPoisoned)?;
        Ok(docs.remove(name).is_some())
    }

    fn names(&self) -> Result<Vec<String>, StorageError> {
        let docs = self.documents.lock().map_err(|_| StorageError::LockPoisoned)?;
        let mut names: Vec<String> = docs.keys().cloned().collect();
        names.sort();
        Ok(names)
    }
}
