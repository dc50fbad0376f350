//! Storage error types.

use thiserror::Error;

/// Errors that can occur when using the store.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Failed to open the backing store.
    #[error("Failed to open store: {0}")]
    Open(String),

    /// Failed to serialize or deserialize a value.
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Filesystem failure in a file-backed store.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Backend operation failed.
    #[error("Store operation failed: {0}")]
    Backend(String),
}
