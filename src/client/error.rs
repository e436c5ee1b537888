//! API client errors

use thiserror::Error;

/// Errors surfaced by calls to the store API
#[derive(Error, Debug)]
pub enum ClientError {
    /// Bad credentials, or a missing/invalid/expired token (HTTP 401)
    #[error("Authentication failed: {message}")]
    Authentication { status: u16, message: String },

    /// The request never got an HTTP answer
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Any other non-2xx answer
    #[error("Server error {status}: {message}")]
    Server { status: u16, message: String },

    /// A 2xx answer whose body did not have the expected shape
    #[error("Invalid response: {0}")]
    Decode(String),
}

impl ClientError {
    /// HTTP status of the failed answer, when there was one
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Authentication { status, .. } | ClientError::Server { status, .. } => {
                Some(*status)
            }
            ClientError::Network(e) => e.status().map(|s| s.as_u16()),
            ClientError::Decode(_) => None,
        }
    }

    /// Text shown to the person operating the panel
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Authentication { message, .. } | ClientError::Server { message, .. } => {
                message.clone()
            }
            ClientError::Network(_) => "Could not reach the server".to_string(),
            ClientError::Decode(_) => "The server sent an unexpected response".to_string(),
        }
    }
}

/// Result type for API client calls
pub type ClientResult<T> = Result<T, ClientError>;
