//! Storage error types

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while reading or writing persisted client state
#[derive(Error, Debug)]
pub enum StorageError {
    /// The backing file could not be read or written
    #[error("IO error on {path:?}: {error}")]
    Io { path: PathBuf, error: std::io::Error },

    /// The backing file exists but does not hold a JSON object of strings
    #[error("Corrupt storage file {path:?}: {error}")]
    Corrupt { path: PathBuf, error: String },

    /// The entries could not be serialized for writing
    #[error("Failed to encode storage entries for {path:?}: {error}")]
    Encode { path: PathBuf, error: String },
}

/// Result type alias for storage operations
pub type StorageResult<T> = Result<T, StorageError>;
