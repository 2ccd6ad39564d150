//! Collection Storage Trait
//!
//! This module defines the `CollectionStorage` trait, the single persistence
//! seam every backend implements.
//!
//! Implementors of this trait are responsible for:
//! - Returning the whole document persisted under a collection name
//! - Replacing a whole document atomically from the caller's point of view
//! - Reporting an absent collection as `None` rather than as an error
//!
//! All methods return a `Result` so that medium failures (I/O, database,
//! corruption) reach the caller unmodified.

use serde_json::Value;

use crate::error_handling::types::StorageError;

/// Namespaced key → document persistence.
///
/// Backends store opaque JSON documents and know nothing about the shape of
/// the records inside them. Typed access goes through [`crate::storage::Store`].
pub trait CollectionStorage: Send + Sync {
    /// Loads the document stored under `name`.
    ///
    /// Returns `Ok(None)` when the collection has never been written.
    fn load(&self, name: &str) -> Result<Option<Value>, StorageError>;

    /// Replaces the document stored under `name`.
    fn save(&self, name: &str, document: &Value) -> Result<(), StorageError>;

    /// Drops the document stored under `name`. Returns whether one existed.
    fn remove(&self, name: &str) -> Result<bool, StorageError>;

    /// Lists the names of every collection written so far, sorted.
    fn names(&self) -> Result<Vec<String>, StorageError>;
}
