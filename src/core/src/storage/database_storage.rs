use std::env;
use std::path::{Path, PathBuf};

use chrono::Utc;
use log::{debug, error, info};
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ActiveValue::Set, ConnectionTrait, Database, DatabaseConnection, EntityTrait, QueryOrder,
};
use serde_json::Value;

use crate::error_handling::types::StorageError;
use crate::storage::db_entities::{ActiveModel, Column, Entity};
use crate::storage::storage_trait::CollectionStorage;

const CREATE_COLLECTIONS_TABLE: &str = "CREATE TABLE IF NOT EXISTS collections (
    name TEXT PRIMARY KEY NOT NULL,
    document TEXT NOT NULL,
    updated_at TEXT NOT NULL
);";

/// SQLite backend storing each collection as one row of the `collections` table.
///
/// The trait is synchronous, so the backend owns a current-thread runtime and
/// blocks on SeaORM futures. Call it from plain threads or from
/// `tokio::task::spawn_blocking`, never directly from async code.
pub struct DatabaseStorage {
    rt: tokio::runtime::Runtime,
    db: DatabaseConnection,
    path: PathBuf,
}

impl DatabaseStorage {
    /// Default database filename used in the application's working directory
    const DEFAULT_DB_FILE: &'static str = "learnhub.sqlite3";

    /// Create or open the database in the current working directory with the default filename
    pub fn new() -> Result<Self, StorageError> {
        let cwd = env::current_dir().map_err(|e| StorageError::ConnectionFailed(e.to_string()))?;
        Self::new_file(cwd.join(Self::DEFAULT_DB_FILE))
    }

    pub fn new_file<P: AsRef<Path>>(path: P) -> Result<Self, StorageError> {
        let path = path.as_ref().to_path_buf();
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| StorageError::ConnectionFailed(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                error!("Failed to create database dir {}: {}", parent.display(), e);
                StorageError::ConnectionFailed(e.to_string())
            })?;
        }
        let url = format!("sqlite://{}?mode=rwc", path.display());
        let db = rt.block_on(async {
            let db = Database::connect(&url).await.map_err(|e| {
                error!("Failed to open database {}: {}", url, e);
                StorageError::ConnectionFailed(e.to_string())
            })?;
            db.execute_unprepared(CREATE_COLLECTIONS_TABLE)
                .await
                .map_err(|e| StorageError::ConnectionFailed(e.to_string()))?;
            Ok::<_, StorageError>(db)
        })?;
        info!("DatabaseStorage initialized at {}", path.display());
        Ok(Self { rt, db, path })
    }
}

impl CollectionStorage for DatabaseStorage {
    fn load(&self, name: &str) -> Result<Option<Value>, StorageError> {
        let row = self
            .rt
            .block_on(Entity::find_by_id(name.to_string()).one(&self.db))
            .map_err(|e| {
                error!("Query failed for collection {}: {}", name, e);
                StorageError::read(name, e)
            })?;
        let Some(row) = row else {
            debug!("Collection {} has no row yet", name);
            return Ok(None);
        };
        let value = serde_json::from_str(&row.document).map_err(|e| StorageError::Serialization {
            collection: name.to_string(),
            source: e,
        })?;
        debug!("Loaded collection {} (updated {})", name, row.updated_at);
        Ok(Some(value))
    }

    fn save(&self, name: &str, document: &Value) -> Result<(), StorageError> {
        let json = serde_json::to_string(document).map_err(|e| StorageError::Serialization {
            collection: name.to_string(),
            source: e,
        })?;
        let row = ActiveModel {
            name: Set(name.to_string()),
            document: Set(json),
            updated_at: Set(Utc::now().to_rfc3339()),
        };
        self.rt
            .block_on(
                Entity::insert(row)
                    .on_conflict(
                        OnConflict::column(Column::Name)
                            .update_columns([Column::Document, Column::UpdatedAt])
                            .to_owned(),
                    )
                    .exec_without_returning(&self.db),
            )
            .map_err(|e| {
                error!("Upsert failed for collection {}: {}", name, e);
                StorageError::write(name, e)
            })?;
        info!("Saved collection {} to {}", name, self.path.display());
        Ok(())
    }

    fn remove(&self, name: &str) -> Result<bool, StorageError> {
        let res = self
            .rt
            .block_on(Entity::delete_by_id(name.to_string()).exec(&self.db))
            .map_err(|e| StorageError::write(name, e))?;
        Ok(res.rows_affected > 0)
    }

    fn names(&self) -> Result<Vec<String>, StorageError> {
        let rows = self
            .rt
            .block_on(Entity::find().order_by_asc(Column::Name).all(&self.db))
            .map_err(|e| StorageError::read("*", e))?;
        Ok(rows.into_iter().map(|r| r.name).collect())
    }
}
