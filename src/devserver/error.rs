//! Development API error types
//!
//! Every failure answers `{"message": "..."}`, the shape the panel's client
//! reads.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DevApiError {
    /// Malformed or invalid request body
    #[error("{0}")]
    Validation(String),

    /// Missing, unknown or bad credentials
    #[error("{0}")]
    Unauthorized(String),

    /// Authenticated but not an administrator
    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Internal(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Error response body
#[derive(Serialize)]
pub struct ErrorBody {
    pub message: String,
}

impl DevApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            DevApiError::Validation(_) => StatusCode::BAD_REQUEST,
            DevApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            DevApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            DevApiError::NotFound(_) => StatusCode::NOT_FOUND,
            DevApiError::Internal(_) | DevApiError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<JsonRejection> for DevApiError {
    fn from(rejection: JsonRejection) -> Self {
        DevApiError::Validation(rejection.body_text())
    }
}

impl IntoResponse for DevApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            tracing::error!(error_message = %self, "Dev API error occurred");
        } else {
            tracing::debug!(status = status.as_u16(), error_message = %self, "Request rejected");
        }

        let body = ErrorBody {
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

pub type DevApiResult<T> = Result<T, DevApiError>;
