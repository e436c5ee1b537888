//! The credential slot
//!
//! A single fixed-key entry holding the bearer token. Absence of the entry
//! means "not logged in".

use std::sync::Arc;

use super::error::StorageResult;
use super::KeyValueStore;

/// Key under which the bearer token is persisted
pub const TOKEN_KEY: &str = "token";

/// Handle to the token entry of a [`KeyValueStore`]
#[derive(Clone)]
pub struct TokenSlot {
    store: Arc<dyn KeyValueStore>,
}

impl TokenSlot {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Read the persisted token, if any. Empty strings count as absent.
    pub fn get(&self) -> StorageResult<Option<String>> {
        Ok(self.store.get(TOKEN_KEY)?.filter(|t| !t.is_empty()))
    }

    pub fn set(&self, token: &str) -> StorageResult<()> {
        self.store.set(TOKEN_KEY, token)
    }

    pub fn clear(&self) -> StorageResult<()> {
        self.store.remove(TOKEN_KEY)
    }

    /// Read the token for attaching to a request.
    ///
    /// A storage failure is logged and treated as "no token"; the server
    /// then answers 401 and the caller surfaces that.
    pub fn current(&self) -> Option<String> {
        match self.get() {
            Ok(token) => token,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read persisted token");
                None
            }
        }
    }
}

impl std::fmt::Debug for TokenSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenSlot").field("key", &TOKEN_KEY).finish()
    }
}
