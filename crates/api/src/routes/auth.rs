//! Route definitions for the `/auth` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::auth;
use crate::state::AppState;

/// Routes mounted at `/auth`.
///
/// ```text
/// POST   /email/login     -> email_login
/// POST   /email/register  -> register
/// POST   /apple/login     -> apple_login
/// POST   /google/login    -> google_login
/// POST   /refresh         -> refresh
/// POST   /logout          -> logout (requires auth)
/// POST   /logout/others   -> logout_others (requires auth)
/// GET    /me              -> me (requires auth)
/// PATCH  /me              -> update_me (requires auth)
/// DELETE /me              -> delete_me (requires auth)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/email/login", post(auth::email_login))
        .route("/email/register", post(auth::register))
        .route("/apple/login", post(auth::apple_login))
        .route("/google/login", post(auth::google_login))
        .route("/refresh", post(auth::refresh))
        .route("/logout", post(auth::logout))
        .route("/logout/others", post(auth::logout_others))
        .route(
            "/me",
            get(auth::me).patch(auth::update_me).delete(auth::delete_me),
        )
}
