//! API-key gate for machine-to-machine routes.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use myorder_core::error::CoreError;

use crate::auth::api_key::api_key_matches;
use crate::error::AppError;
use crate::state::AppState;

/// Header carrying the static service key.
pub const API_KEY_HEADER: &str = "x-api-key";

/// Proof that the caller presented the configured `API_KEY`.
///
/// Carries no identity; these routes sit outside the user/session model.
#[derive(Debug, Clone, Copy)]
pub struct ServiceKey;

impl FromRequestParts<AppState> for ServiceKey {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let presented = parts
            .headers
            .get(API_KEY_HEADER)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default();

        if api_key_matches(presented, state.config.api_key.as_deref()) {
            Ok(ServiceKey)
        } else {
            tracing::warn!("Rejected request with missing or invalid API key");
            Err(AppError::Core(CoreError::Unauthorized(
                "Invalid API key".into(),
            )))
        }
    }
}
