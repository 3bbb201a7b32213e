//! Route definitions for machine-to-machine endpoints.

use axum::routing::post;
use axum::Router;

use crate::handlers::internal;
use crate::state::AppState;

/// Routes mounted at `/internal`. Every route requires `x-api-key`.
pub fn router() -> Router<AppState> {
    Router::new().route("/users/{id}/sign-out", post(internal::sign_out_user))
}
