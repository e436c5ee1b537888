//! Stats Routes
//!
//! - GET /api/stats - Dashboard aggregates (admin)

use axum::{extract::State, http::HeaderMap, Json};
use std::sync::Arc;

use super::require_admin;
use crate::client::Stats;
use crate::devserver::error::DevApiResult;
use crate::devserver::state::DevState;

/// GET /api/stats
pub async fn get_stats(
    State(state): State<Arc<DevState>>,
    headers: HeaderMap,
) -> DevApiResult<Json<Stats>> {
    require_admin(&state, &headers).await?;
    Ok(Json(state.stats().await))
}
