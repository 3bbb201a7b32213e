//! Handlers for the `/auth` resource (login, refresh, logout, profile).

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::{DateTime, Utc};
use myorder_db::models::user::{User, UserResponse};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::auth::error::AuthError;
use crate::auth::jwt::TokenPair;
use crate::auth::service::{NewAccount, ProfileNames, ProfileUpdate};
use crate::auth::social::SocialProvider;
use crate::error::AppResult;
use crate::middleware::rbac::RequireAuth;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/email/login`.
#[derive(Debug, Deserialize, Validate)]
pub struct EmailLoginRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

/// Request body for `POST /auth/email/register`.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(email)]
    pub email: String,
    pub password: String,
    #[validate(length(max = 100))]
    pub first_name: Option<String>,
    #[validate(length(max = 100))]
    pub last_name: Option<String>,
}

/// Request body for `POST /auth/apple/login`.
#[derive(Debug, Deserialize, Validate)]
pub struct AppleLoginRequest {
    #[validate(length(min = 1))]
    pub id_token: String,
    #[validate(length(max = 100))]
    pub first_name: Option<String>,
    #[validate(length(max = 100))]
    pub last_name: Option<String>,
}

/// Request body for `POST /auth/google/login`.
#[derive(Debug, Deserialize, Validate)]
pub struct GoogleLoginRequest {
    #[validate(length(min = 1))]
    pub id_token: String,
}

/// Request body for `POST /auth/refresh`.
#[derive(Debug, Deserialize, Validate)]
pub struct RefreshRequest {
    #[validate(length(min = 1))]
    pub refresh_token: String,
}

/// Request body for `PATCH /auth/me`.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateMeRequest {
    #[validate(length(max = 100))]
    pub first_name: Option<String>,
    #[validate(length(max = 100))]
    pub last_name: Option<String>,
    pub password: Option<String>,
    pub old_password: Option<String>,
}

/// Successful authentication response returned by every login and by refresh.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub access_token_expires_at: DateTime<Utc>,
    pub user: UserResponse,
}

impl AuthResponse {
    fn new(tokens: TokenPair, user: &User) -> Self {
        Self {
            access_token: tokens.access_token,
            refresh_token: tokens.refresh_token,
            access_token_expires_at: tokens.access_token_expires_at,
            user: UserResponse::from(user),
        }
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/auth/email/login
pub async fn email_login(
    State(state): State<AppState>,
    Json(input): Json<EmailLoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    input.validate()?;

    // Unknown and wrong-password look the same to the caller.
    let user = state
        .auth
        .validate_password(&input.email, &input.password)
        .await
        .map_err(|e| match e {
            AuthError::UserNotFound => AuthError::InvalidCredentials,
            other => other,
        })?;
    start_session(&state, user).await
}

/// POST /api/v1/auth/email/register
///
/// Creates the account only; the client logs in afterwards.
pub async fn register(
    State(state): State<AppState>,
    Json(input): Json<RegisterRequest>,
) -> AppResult<(StatusCode, Json<UserResponse>)> {
    input.validate()?;

    let user = state
        .auth
        .register(NewAccount {
            email: input.email,
            password: input.password,
            first_name: input.first_name,
            last_name: input.last_name,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(UserResponse::from(&user))))
}

/// POST /api/v1/auth/apple/login
pub async fn apple_login(
    State(state): State<AppState>,
    Json(input): Json<AppleLoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    input.validate()?;

    let names = ProfileNames {
        first_name: input.first_name,
        last_name: input.last_name,
    };
    let user = state
        .auth
        .social_login(SocialProvider::Apple, &input.id_token, names)
        .await?;
    start_session(&state, user).await
}

/// POST /api/v1/auth/google/login
pub async fn google_login(
    State(state): State<AppState>,
    Json(input): Json<GoogleLoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    input.validate()?;

    let user = state
        .auth
        .social_login(SocialProvider::Google, &input.id_token, ProfileNames::default())
        .await?;
    start_session(&state, user).await
}

/// POST /api/v1/auth/refresh
///
/// Exchange a valid refresh token for a new pair bound to the same session.
pub async fn refresh(
    State(state): State<AppState>,
    Json(input): Json<RefreshRequest>,
) -> AppResult<Json<AuthResponse>> {
    input.validate()?;

    let (tokens, user) = state.auth.refresh(&input.refresh_token).await?;
    Ok(Json(AuthResponse::new(tokens, &user)))
}

/// POST /api/v1/auth/logout
///
/// End the session the access token belongs to. Returns 204 No Content.
pub async fn logout(
    State(state): State<AppState>,
    RequireAuth(current): RequireAuth,
) -> AppResult<StatusCode> {
    state.auth.logout(current.session_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/auth/logout/others
///
/// End every other session of the caller. Returns 204 No Content.
pub async fn logout_others(
    State(state): State<AppState>,
    RequireAuth(current): RequireAuth,
) -> AppResult<StatusCode> {
    state
        .auth
        .logout_others(current.user.id, current.session_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/auth/me
pub async fn me(RequireAuth(current): RequireAuth) -> Json<UserResponse> {
    Json(UserResponse::from(&current.user))
}

/// PATCH /api/v1/auth/me
pub async fn update_me(
    State(state): State<AppState>,
    RequireAuth(current): RequireAuth,
    Json(input): Json<UpdateMeRequest>,
) -> AppResult<Json<UserResponse>> {
    input.validate()?;

    let user = state
        .auth
        .update_profile(
            &current.user,
            current.session_id,
            ProfileUpdate {
                first_name: input.first_name,
                last_name: input.last_name,
                password: input.password,
                old_password: input.old_password,
            },
        )
        .await?;
    Ok(Json(UserResponse::from(&user)))
}

/// DELETE /api/v1/auth/me
pub async fn delete_me(
    State(state): State<AppState>,
    RequireAuth(current): RequireAuth,
) -> AppResult<StatusCode> {
    state.auth.delete_account(current.user.id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn start_session(state: &AppState, user: User) -> AppResult<Json<AuthResponse>> {
    let (tokens, _session) = state.auth.login(&user).await?;
    Ok(Json(AuthResponse::new(tokens, &user)))
}
