//! Access guard: bearer token validation plus a live user re-fetch.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use myorder_core::error::CoreError;
use myorder_core::types::SessionId;
use myorder_db::models::user::User;

use crate::auth::jwt::validate_access_token;
use crate::error::AppError;
use crate::state::AppState;

/// The caller behind a valid access token, freshly loaded from storage.
///
/// The user row is re-read on every request, so a role change, deactivation
/// or deletion takes effect before the token expires:
///
/// ```ignore
/// async fn my_handler(current: CurrentUser) -> AppResult<Json<UserResponse>> {
///     Ok(Json(UserResponse::from(&current.user)))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub user: User,
    /// The session the access token is bound to.
    pub session_id: SessionId,
}

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        // Another guard on this request may already have resolved the caller.
        if let Some(current) = parts.extensions.get::<CurrentUser>() {
            return Ok(current.clone());
        }

        let auth_header = parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized(
                    "Missing Authorization header".into(),
                ))
            })?;

        let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Invalid Authorization format. Expected: Bearer <token>".into(),
            ))
        })?;

        let claims = validate_access_token(token, state.auth.jwt()).map_err(|_| {
            AppError::Core(CoreError::Unauthorized("Invalid or expired token".into()))
        })?;

        let user = state.auth.resolve_current_user(&claims).await.map_err(|e| {
            tracing::debug!(user_id = claims.sub, session_id = %claims.session_id, "Rejected stale access token");
            AppError::from(e)
        })?;

        let current = CurrentUser {
            user,
            session_id: claims.session_id,
        };
        parts.extensions.insert(current.clone());
        Ok(current)
    }
}
