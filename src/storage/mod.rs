//! Persisted Client State
//!
//! The admin panel keeps exactly one durable value: the bearer token. It is
//! stored through a small key-value interface so the slot can live in a file
//! for the terminal front-end and in memory for tests.
//!
//! - **file**: JSON file standing in for browser `localStorage`
//! - **memory**: process-local map
//! - **token**: the fixed-key token slot built on either
//! - **error**: Error types

mod error;
mod file;
mod memory;
mod token;

pub use error::{StorageError, StorageResult};
pub use file::FileStore;
pub use memory::MemoryStore;
pub use token::{TokenSlot, TOKEN_KEY};

/// Durable string key-value persistence
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`
    fn get(&self, key: &str) -> StorageResult<Option<String>>;

    /// Store `value` under `key`, replacing any previous value
    fn set(&self, key: &str, value: &str) -> StorageResult<()>;

    /// Delete `key`. Removing a missing key is not an error.
    fn remove(&self, key: &str) -> StorageResult<()>;
}
