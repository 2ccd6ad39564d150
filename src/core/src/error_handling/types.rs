use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),
    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),
}

/// Failures of the persistence medium itself.
///
/// These always propagate unmodified to the caller; a missing collection is
/// not an error and is answered with a default value instead.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Storage connection failed: {0}")]
    ConnectionFailed(String),
    #[error("Storage read failed for collection `{collection}`: {reason}")]
    ReadFailed { collection: String, reason: String },
    #[error("Storage write failed for collection `{collection}`: {reason}")]
    WriteFailed { collection: String, reason: String },
    #[error("Collection `{collection}` could not be (de)serialized: {source}")]
    Serialization {
        collection: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("Storage lock poisoned")]
    LockPoisoned,
}

impl StorageError {
    pub(crate) fn read(collection: &str, reason: impl ToString) -> Self {
        StorageError::ReadFailed {
            collection: collection.to_string(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn write(collection: &str, reason: impl ToString) -> Self {
        StorageError::WriteFailed {
            collection: collection.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// Errors surfaced by the query, aggregation, history and mutation operations.
#[derive(Debug, Error)]
pub enum DataError {
    /// The addressed id does not exist in its target collection. Recoverable.
    #[error("{kind} `{id}` not found")]
    NotFound { kind: &'static str, id: String },
    /// The caller supplied a document or argument that cannot be applied.
    #[error("Malformed input: {0}")]
    Malformed(String),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl DataError {
    pub(crate) fn not_found(kind: &'static str, id: impl Into<String>) -> Self {
        DataError::NotFound {
            kind,
            id: id.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, DataError::NotFound { .. })
    }
}

#[derive(Debug, Error)]
pub enum WebError {
    #[error("Unable to bind the web server to {addr}: {reason}")]
    BindFailed { addr: String, reason: String },
}

#[derive(Debug, Error)]
pub enum ControllerError {
    #[error("Configuration error: {0}")]
    ConfigurationError(#[from] ConfigError),
    #[error("Storage error: {0}")]
    StorageError(#[from] StorageError),
    #[error("Web server error: {0}")]
    WebError(#[from] WebError),
    #[error("Runtime I/O error: {0}")]
    RuntimeError(#[from] std::io::Error),
}
