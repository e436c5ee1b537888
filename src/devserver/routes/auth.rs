//! Auth Routes
//!
//! - POST /api/auth/login - Exchange credentials for a token
//! - GET /api/auth/me - Account owning the bearer token

use axum::{extract::rejection::JsonRejection, extract::State, http::HeaderMap, Json};
use std::sync::Arc;

use super::authenticate;
use crate::client::{LoginRequest, LoginResponse, MeResponse};
use crate::devserver::error::{DevApiError, DevApiResult};
use crate::devserver::state::DevState;

/// POST /api/auth/login
pub async fn login(
    State(state): State<Arc<DevState>>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> DevApiResult<Json<LoginResponse>> {
    let Json(req) = body?;

    if req.email.trim().is_empty() || req.password.is_empty() {
        return Err(DevApiError::Validation(
            "Email and password are required".to_string(),
        ));
    }

    let (token, user) = state.login(req.email.trim(), &req.password).await?;
    Ok(Json(LoginResponse { token, user }))
}

/// GET /api/auth/me
pub async fn me(
    State(state): State<Arc<DevState>>,
    headers: HeaderMap,
) -> DevApiResult<Json<MeResponse>> {
    let user = authenticate(&state, &headers).await?;
    Ok(Json(MeResponse { user }))
}
