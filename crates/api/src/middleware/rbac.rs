//! Role-based access control (RBAC) extractors.
//!
//! Each guard resolves [`CurrentUser`] and then checks the caller's role
//! against the set a route declares. Roles are flat: listing `admin` does not
//! admit `user`, and listing `user` does not admit `admin`.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use myorder_core::roles::{role_permitted, Role};

use super::auth::CurrentUser;
use crate::auth::AuthError;
use crate::error::AppError;
use crate::state::AppState;

/// Resolve the caller and require their role to be in `allowed`.
///
/// An empty `allowed` only requires authentication.
pub async fn authorize(
    parts: &mut Parts,
    state: &AppState,
    allowed: &[Role],
) -> Result<CurrentUser, AppError> {
    let current = CurrentUser::from_request_parts(parts, state).await?;
    if !role_permitted(allowed, current.user.role_id) {
        tracing::debug!(user_id = current.user.id, role_id = current.user.role_id, ?allowed, "Role not permitted");
        return Err(AuthError::Forbidden(forbidden_message(allowed)).into());
    }
    Ok(current)
}

fn forbidden_message(allowed: &[Role]) -> String {
    match allowed {
        [Role::Admin] => "Admin role required".to_string(),
        _ => {
            let names: Vec<_> = allowed.iter().map(|r| r.name()).collect();
            format!("One of these roles is required: {}", names.join(", "))
        }
    }
}

/// Requires the `admin` role. Rejects with 403 Forbidden otherwise.
///
/// ```ignore
/// async fn admin_only(RequireAdmin(admin): RequireAdmin) -> AppResult<Json<()>> {
///     Ok(Json(()))
/// }
/// ```
pub struct RequireAdmin(pub CurrentUser);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        authorize(parts, state, &[Role::Admin]).await.map(RequireAdmin)
    }
}

/// Requires any authenticated user (any valid role).
///
/// Functionally equivalent to [`CurrentUser`] but named explicitly for route
/// definitions where "this route requires authentication" should be
/// self-documenting.
pub struct RequireAuth(pub CurrentUser);

impl FromRequestParts<AppState> for RequireAuth {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        authorize(parts, state, &[]).await.map(RequireAuth)
    }
}
