pub mod admin;
pub mod auth;
pub mod health;
pub mod internal;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/email/login                      password login (public)
/// /auth/email/register                   create account (public)
/// /auth/apple/login                      Sign in with Apple (public)
/// /auth/google/login                     Google Sign-In (public)
/// /auth/refresh                          rotate tokens (public)
/// /auth/logout                           end current session (auth)
/// /auth/logout/others                    end other sessions (auth)
/// /auth/me                               get, update, delete (auth)
///
/// /admin/users                           list (admin only)
/// /admin/users/{id}                      get, update, delete (admin only)
///
/// /internal/users/{id}/sign-out          end all sessions (API key)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/admin", admin::router())
        .nest("/internal", internal::router())
}
