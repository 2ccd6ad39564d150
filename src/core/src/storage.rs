//! Storage subsystem
//!
//! This module provides the Collection Store: a namespaced key → document
//! persistence abstraction and its implementations.
//!
//! Components:
//! - `storage_trait`: the CollectionStorage trait defining a uniform API.
//! - `types`: the `Collection` names shared by all backends.
//! - `store`: typed facade with whole-document reads/writes and locked updates.
//! - `memory_storage`: volatile in-process backend.
//! - `file_storage`: filesystem-backed implementation, one JSON file per collection.
//! - `database_storage`: ORM-based SQLite implementation using SeaORM.
//! - `db_entities`: SeaORM entity model for the database backend.

pub mod database_storage;
pub mod db_entities;
pub mod file_storage;
pub mod memory_storage;
pub mod storage_trait;
pub mod store;
pub mod types;

pub use database_storage::DatabaseStorage;
pub use file_storage::FileStorage;
pub use memory_storage::MemoryStorage;
pub use storage_trait::CollectionStorage;
pub use store::Store;
pub use types::Collection;
