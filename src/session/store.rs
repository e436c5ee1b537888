//! Session Store
//!
//! Owns the [`Session`] and the token slot. The only writer of the slot.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::watch;

use super::{Session, SessionError};
use crate::client::{AdminApi, User};
use crate::storage::TokenSlot;

/// Observable session state backed by a persisted token
pub struct SessionStore {
    api: Arc<dyn AdminApi>,
    tokens: TokenSlot,
    state: watch::Sender<Session>,
    initialized: AtomicBool,
}

impl SessionStore {
    /// Create a store in the initial loading state
    pub fn new(api: Arc<dyn AdminApi>, tokens: TokenSlot) -> Self {
        let (state, _) = watch::channel(Session::initial());

        Self {
            api,
            tokens,
            state,
            initialized: AtomicBool::new(false),
        }
    }

    /// Current session state
    pub fn snapshot(&self) -> Session {
        self.state.borrow().clone()
    }

    /// Receive a notification on every session mutation
    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.state.subscribe()
    }

    /// The persisted token, for callers that attach it to requests
    pub fn token(&self) -> Option<String> {
        self.tokens.current()
    }

    /// Slot the token lives in
    pub fn token_slot(&self) -> &TokenSlot {
        &self.tokens
    }

    /// Validate the persisted token and settle the session
    ///
    /// Only an admin account is accepted. A non-admin account or any failure
    /// clears the token silently. The loading flag is cleared exactly once;
    /// later calls do nothing.
    pub async fn initialize(&self) {
        if self.initialized.swap(true, Ordering::SeqCst) {
            tracing::debug!("Session already initialized");
            return;
        }

        let settled = match self.tokens.current() {
            None => {
                tracing::debug!("No persisted token, starting anonymous");
                Session::anonymous()
            }
            Some(token) => match self.api.current_user(&token).await {
                Ok(user) if user.is_admin => {
                    tracing::info!(user_id = %user.id, "Restored admin session");
                    Session::authenticated(user)
                }
                Ok(user) => {
                    tracing::warn!(
                        user_id = %user.id,
                        "Persisted token belongs to a non-admin account, discarding it"
                    );
                    self.discard_token();
                    Session::anonymous()
                }
                Err(e) => {
                    tracing::info!(error = %e, "Persisted token rejected, discarding it");
                    self.discard_token();
                    Session::anonymous()
                }
            },
        };

        self.state.send_replace(settled);
    }

    /// Log in with email and password
    ///
    /// A non-admin account yields [`SessionError::Authorization`]; the
    /// token is not persisted and the session is left as it was.
    pub async fn login(&self, email: &str, password: &str) -> Result<User, SessionError> {
        let response = self.api.authenticate(email, password).await?;

        if !response.user.is_admin {
            tracing::warn!(user_id = %response.user.id, "Login refused: not an administrator");
            return Err(SessionError::Authorization(response.user.email));
        }

        self.tokens.set(&response.token)?;

        tracing::info!(user_id = %response.user.id, "Admin logged in");
        self.state
            .send_replace(Session::authenticated(response.user.clone()));

        Ok(response.user)
    }

    /// Forget the token and the user. Safe to call repeatedly.
    pub fn logout(&self) {
        self.discard_token();
        self.state.send_replace(Session::anonymous());
        tracing::info!("Logged out");
    }

    fn discard_token(&self) {
        if let Err(e) = self.tokens.clear() {
            tracing::warn!(error = %e, "Failed to clear persisted token");
        }
    }
}
