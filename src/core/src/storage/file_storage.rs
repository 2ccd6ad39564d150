use std::fs::{self, File};
use std::io::{ErrorKind, Read, Write};
use std::path::{Path, PathBuf};

use log::{debug, error, info};
use serde_json::Value;
use tempfile::NamedTempFile;

use crate::error_handling::types::StorageError;
use crate::storage::storage_trait::CollectionStorage;

/// Filesystem backend: one pretty-printed `<name>.json` file per collection.
///
/// Writes land in a temporary file inside the same directory and are renamed
/// over the target, so readers only ever observe a complete document.
pub struct FileStorage {
    collections_dir: PathBuf,
}

impl FileStorage {
    pub fn new<P: AsRef<Path>>(base_path: P) -> Result<Self, StorageError> {
        let base_path = base_path.as_ref().to_path_buf();
        let collections_dir = base_path.join("collections");

        fs::create_dir_all(&collections_dir).map_err(|e| {
            error!("Failed to create collections dir {}: {}", collections_dir.display(), e);
            StorageError::ConnectionFailed(format!("{}: {}", collections_dir.display(), e))
        })?;
        info!("FileStorage initialized at {}", base_path.display());

        Ok(Self { collections_dir })
    }

    /// Construct FileStorage using env var LEARNHUB_DATA_DIR if set, otherwise current directory.
    pub fn new_default() -> Result<Self, StorageError> {
        if let Ok(dir) = std::env::var("LEARNHUB_DATA_DIR") {
            info!("Using FileStorage from LEARNHUB_DATA_DIR: {}", dir);
            return Self::new(PathBuf::from(dir));
        }
        let cwd = std::env::current_dir().map_err(|e| {
            error!("Failed to get current dir: {}", e);
            StorageError::ConnectionFailed(e.to_string())
        })?;
        info!("Using FileStorage at current directory: {}", cwd.display());
        Self::new(cwd)
    }

    fn collection_path(&self, name: &str) -> PathBuf {
        self.collections_dir.join(format!("{}.json", name))
    }
}

impl CollectionStorage for FileStorage {
    fn load(&self, name: &str) -> Result<Option<Value>, StorageError> {
        let path = self.collection_path(name);
        let mut content = String::new();
        match File::open(&path) {
            Ok(mut f) => f.read_to_string(&mut content).map_err(|e| {
                error!("Failed to read collection file {}: {}", path.display(), e);
                StorageError::read(name, e)
            })?,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("Collection {} has no file yet", name);
                return Ok(None);
            }
            Err(e) => {
                error!("Failed to open collection file {}: {}", path.display(), e);
                return Err(StorageError::read(name, e));
            }
        };
        let value = serde_json::from_str(&content).map_err(|e| {
            error!("Corrupted collection file {}: {}", path.display(), e);
            StorageError::Serialization {
                collection: name.to_string(),
                source: e,
            }
        })?;
        debug!("Read {} byte(s) from {}", content.len(), path.display());
        Ok(Some(value))
    }

    fn save(&self, name: &str, document: &Value) -> Result<(), StorageError> {
        let path = self.collection_path(name);
        let body = serde_json::to_vec_pretty(document).map_err(|e| StorageError::Serialization {
            collection: name.to_string(),
            source: e,
        })?;
        let mut tmp = NamedTempFile::new_in(&self.collections_dir).map_err(|e| {
            error!("Failed to create temp file in {}: {}", self.collections_dir.display(), e);
            StorageError::write(name, e)
        })?;
        tmp.write_all(&body).map_err(|e| {
            error!("Write failed for {}: {}", path.display(), e);
            StorageError::write(name, e)
        })?;
        tmp.as_file().sync_all().map_err(|e| StorageError::write(name, e))?;
        tmp.persist(&path).map_err(|e| {
            error!("Failed to move temp file over {}: {}", path.display(), e.error);
            StorageError::write(name, e.error)
        })?;
        info!("Saved collection {} to {}", name, path.display());
        Ok(())
    }

    fn remove(&self, name: &str) -> Result<bool, StorageError> {
        let path = self.collection_path(name);
        match fs::remove_file(&path) {
            Ok(()) => {
                info!("Removed collection file {}", path.display());
                Ok(true)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => {
                error!("Failed to remove {}: {}", path.display(), e);
                Err(StorageError::write(name, e))
            }
        }
    }

    fn names(&self) -> Result<Vec<String>, StorageError> {
        let mut names = Vec::new();
        let entries = fs::read_dir(&self.collections_dir).map_err(|e| {
            error!("Failed to read collections dir {}: {}", self.collections_dir.display(), e);
            StorageError::read("*", e)
        })?;
        for entry in entries {
            let path = entry.map_err(|e| StorageError::read("*", e))?.path();
            if path.extension().and_then(|s| s.to_str()) != Some("json") {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                names.push(stem.to_string());
            }
        }
        names.sort();
        Ok(names)
    }
}
