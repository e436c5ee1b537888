//! Route handlers of the development API

pub mod auth;
pub mod health;
pub mod products;
pub mod stats;

use axum::http::{header::AUTHORIZATION, HeaderMap};

use super::error::{DevApiError, DevApiResult};
use super::state::DevState;
use crate::client::User;

/// Resolve the bearer token of the request to an account
pub(crate) async fn authenticate(state: &DevState, headers: &HeaderMap) -> DevApiResult<User> {
    let token = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| DevApiError::Unauthorized("Not authorized, no token".to_string()))?;

    state
        .user_for_token(token)
        .await
        .ok_or_else(|| DevApiError::Unauthorized("Not authorized, token failed".to_string()))
}

/// Like [`authenticate`], and the account must be an administrator
pub(crate) async fn require_admin(state: &DevState, headers: &HeaderMap) -> DevApiResult<User> {
    let user = authenticate(state, headers).await?;
    if !user.is_admin {
        return Err(DevApiError::Forbidden("Not authorized as an admin".to_string()));
    }
    Ok(user)
}
