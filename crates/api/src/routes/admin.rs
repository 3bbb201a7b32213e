//! Route definitions for the `/admin` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::admin;
use crate::state::AppState;

/// Routes mounted at `/admin`.
///
/// All routes require the `admin` role (enforced by handler extractors).
///
/// ```text
/// GET    /users        -> list_users
/// GET    /users/{id}   -> get_user
/// PATCH  /users/{id}   -> update_user
/// DELETE /users/{id}   -> delete_user
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/users", get(admin::list_users)).route(
        "/users/{id}",
        get(admin::get_user)
            .patch(admin::update_user)
            .delete(admin::delete_user),
    )
}
