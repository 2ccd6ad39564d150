//! SeaORM entity model used by the database storage backend.
//!
//! Maps to the single SQLite table created by `database_storage`:
//! - `collections`: one row per named collection holding its JSON document

use sea_orm::entity::prelude::*;

/// Collections table entity model.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "collections")]
pub struct Model {
    /// Collection name (e.g. "users")
    #[sea_orm(primary_key, auto_increment = false)]
    pub name: String,
    /// Serialized JSON document
    pub document: String,
    /// RFC3339 timestamp of the last write
    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
