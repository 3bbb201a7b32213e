//! Handlers for the `/admin` resource (user management).
//!
//! All handlers require the `admin` role via [`RequireAdmin`].

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use myorder_core::error::CoreError;
use myorder_core::roles::{Role, Status};
use myorder_core::types::DbId;
use myorder_db::models::user::{UpdateUser, UserResponse};
use serde::Deserialize;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::state::AppState;

/// Request body for `PATCH /admin/users/{id}`.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateUserRequest {
    #[validate(length(max = 100))]
    pub first_name: Option<String>,
    #[validate(length(max = 100))]
    pub last_name: Option<String>,
    pub role: Option<Role>,
    pub status: Option<Status>,
}

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound { entity: "User", id })
}

/// GET /api/v1/admin/users
///
/// List all live users, newest first.
pub async fn list_users(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> AppResult<Json<Vec<UserResponse>>> {
    let users = state.users.list().await?;
    Ok(Json(users.iter().map(UserResponse::from).collect()))
}

/// GET /api/v1/admin/users/{id}
pub async fn get_user(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<Json<UserResponse>> {
    let user = state
        .users
        .find_by_id(id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(UserResponse::from(&user)))
}

/// PATCH /api/v1/admin/users/{id}
///
/// Change names, role or status. Takes effect on the user's next request.
pub async fn update_user(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateUserRequest>,
) -> AppResult<Json<UserResponse>> {
    input.validate()?;

    let patch = UpdateUser {
        first_name: input.first_name,
        last_name: input.last_name,
        role_id: input.role.map(Role::id),
        status_id: input.status.map(Status::id),
        ..Default::default()
    };

    let user = state
        .users
        .update(id, patch)
        .await?
        .ok_or_else(|| not_found(id))?;

    tracing::info!(
        admin_id = admin.user.id,
        user_id = id,
        role_id = user.role_id,
        status_id = user.status_id,
        "User updated by admin"
    );
    Ok(Json(UserResponse::from(&user)))
}

/// DELETE /api/v1/admin/users/{id}
///
/// Soft-delete a user. Returns 204 No Content.
pub async fn delete_user(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if !state.users.soft_delete(id).await? {
        return Err(not_found(id));
    }
    tracing::info!(admin_id = admin.user.id, user_id = id, "User deleted by admin");
    Ok(StatusCode::NO_CONTENT)
}
