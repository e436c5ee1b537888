//! Login View

use std::sync::Arc;
use thiserror::Error;

use crate::client::User;
use crate::session::{SessionError, SessionStore};

#[derive(Error, Debug)]
pub enum LoginError {
    #[error("{0} is required")]
    Missing(&'static str),

    #[error(transparent)]
    Session(#[from] SessionError),
}

impl LoginError {
    pub fn user_message(&self) -> String {
        match self {
            LoginError::Missing(_) => self.to_string(),
            LoginError::Session(e) => e.user_message(),
        }
    }
}

/// Contents of the login form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl LoginForm {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    fn check(&self) -> Result<(), LoginError> {
        if self.email.trim().is_empty() {
            return Err(LoginError::Missing("Email"));
        }
        if self.password.trim().is_empty() {
            return Err(LoginError::Missing("Password"));
        }
        Ok(())
    }
}

/// Public entry form; on success the guard moves the visitor on
pub struct LoginView {
    session: Arc<SessionStore>,
    pub form: LoginForm,
    error: Option<String>,
}

impl LoginView {
    pub fn new(session: Arc<SessionStore>) -> Self {
        Self {
            session,
            form: LoginForm::default(),
            error: None,
        }
    }

    /// Message from the last failed attempt
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub async fn submit(&mut self) -> Result<User, LoginError> {
        let result = match self.form.check() {
            Ok(()) => self
                .session
                .login(self.form.email.trim(), &self.form.password)
                .await
                .map_err(LoginError::from),
            Err(e) => Err(e),
        };

        match &result {
            Ok(_) => self.error = None,
            Err(e) => {
                tracing::debug!(error = %e, "Login attempt failed");
                self.error = Some(e.user_message());
            }
        }
        result
    }
}
