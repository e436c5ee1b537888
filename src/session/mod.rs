//! Admin Session
//!
//! Holds the identity of the logged-in administrator and the one durable
//! artifact behind it, the bearer token. Every mutation is published on a
//! `watch` channel so the route guard can re-evaluate.
//!
//! ## Lifecycle
//!
//! 1. Start: `{ user: None, loading: true }`
//! 2. `initialize()` validates any persisted token and clears `loading`
//! 3. `login()` / `logout()` mutate the user and the token slot

mod store;

pub use store::SessionStore;

use crate::client::{ClientError, User};
use crate::storage::StorageError;
use thiserror::Error;

/// Client-side record of the authenticated administrator
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    /// Present only for a token validated as belonging to an admin account
    pub user: Option<User>,
    /// True until the persisted token has been checked
    pub loading: bool,
}

impl Session {
    /// State at application start, before token validation
    pub fn initial() -> Self {
        Self {
            user: None,
            loading: true,
        }
    }

    /// Settled, nobody logged in
    pub fn anonymous() -> Self {
        Self {
            user: None,
            loading: false,
        }
    }

    /// Settled with `user` logged in
    pub fn authenticated(user: User) -> Self {
        Self {
            user: Some(user),
            loading: false,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::initial()
    }
}

/// Errors from explicit session actions
#[derive(Error, Debug)]
pub enum SessionError {
    /// The account is valid but lacks administrator rights
    #[error("Authorization error: {0} is not an administrator")]
    Authorization(String),

    #[error(transparent)]
    Client(#[from] ClientError),

    #[error("Could not persist the session: {0}")]
    Storage(#[from] StorageError),
}

impl SessionError {
    /// Text shown on the login form
    pub fn user_message(&self) -> String {
        match self {
            SessionError::Authorization(_) => {
                "You do not have administrator permissions".to_string()
            }
            SessionError::Client(e) => e.user_message(),
            SessionError::Storage(_) => "Could not save the session on this device".to_string(),
        }
    }
}
