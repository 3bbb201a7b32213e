//! Machine-to-machine handlers gated by the static API key.

use axum::extract::{Path, State};
use axum::Json;
use myorder_core::types::DbId;
use serde::Serialize;

use crate::error::AppResult;
use crate::middleware::service_key::ServiceKey;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct SignOutResponse {
    /// Number of sessions ended.
    pub revoked: u64,
}

/// POST /api/v1/internal/users/{id}/sign-out
///
/// End every session of a user, e.g. after a back-office suspension.
pub async fn sign_out_user(
    State(state): State<AppState>,
    _key: ServiceKey,
    Path(id): Path<DbId>,
) -> AppResult<Json<SignOutResponse>> {
    let revoked = state.auth.sign_out_everywhere(id).await?;
    Ok(Json(SignOutResponse { revoked }))
}
