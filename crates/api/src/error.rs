use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use myorder_core::error::CoreError;
use myorder_db::StoreError;
use serde_json::json;

use crate::auth::AuthError;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] and [`AuthError`] for domain errors and adds
/// HTTP-specific variants. Implements [`IntoResponse`] to produce consistent
/// JSON error responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `myorder_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A failure of the authentication or session flow.
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// A storage error from `myorder_db`.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::Core(CoreError::Validation(errors.to_string()))
    }
}

const INTERNAL_MESSAGE: &str = "An internal error occurred";

fn internal(context: &str, err: &dyn std::fmt::Display) -> (StatusCode, &'static str, String) {
    tracing::error!(error = %err, "{context}");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR",
        INTERNAL_MESSAGE.to_string(),
    )
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::NotFound { entity, id } => (
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    format!("{entity} with id {id} not found"),
                ),
                CoreError::Validation(msg) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
                }
                CoreError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
                CoreError::Unauthorized(msg) => {
                    (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone())
                }
                CoreError::Forbidden(msg) => (StatusCode::FORBIDDEN, "FORBIDDEN", msg.clone()),
                CoreError::Internal(msg) => internal("Internal core error", msg),
            },

            // --- AuthError variants ---
            AppError::Auth(auth) => classify_auth_error(auth),

            // --- Storage errors ---
            AppError::Store(err) => classify_store_error(err),

            // --- HTTP-specific errors ---
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::InternalError(msg) => internal("Internal error", msg),
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

/// Map an [`AuthError`] to status, code and message.
///
/// The password login handler folds `UserNotFound` into
/// `InvalidCredentials` before it gets here.
fn classify_auth_error(err: &AuthError) -> (StatusCode, &'static str, String) {
    match err {
        AuthError::InvalidCredentials => {
            (StatusCode::UNAUTHORIZED, "INVALID_CREDENTIALS", err.to_string())
        }
        AuthError::UserNotFound => (StatusCode::UNAUTHORIZED, "USER_NOT_FOUND", err.to_string()),
        AuthError::SessionNotFound => {
            (StatusCode::UNAUTHORIZED, "SESSION_NOT_FOUND", err.to_string())
        }
        AuthError::InvalidToken => (StatusCode::UNAUTHORIZED, "INVALID_TOKEN", err.to_string()),
        AuthError::InvalidProviderToken(_) => (
            StatusCode::UNAUTHORIZED,
            "INVALID_PROVIDER_TOKEN",
            err.to_string(),
        ),
        AuthError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone()),
        AuthError::Forbidden(msg) => (StatusCode::FORBIDDEN, "FORBIDDEN", msg.clone()),
        AuthError::EmailTaken => (StatusCode::CONFLICT, "EMAIL_TAKEN", err.to_string()),
        AuthError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
        AuthError::ProviderNotConfigured(_) => (
            StatusCode::BAD_REQUEST,
            "PROVIDER_NOT_CONFIGURED",
            err.to_string(),
        ),
        AuthError::Store(store) => classify_store_error(store),
        AuthError::Internal(msg) => internal("Internal auth error", msg),
    }
}

/// Map a [`StoreError`]: unique violations are 409, everything else is a
/// sanitized 500.
fn classify_store_error(err: &StoreError) -> (StatusCode, &'static str, String) {
    match err {
        StoreError::Conflict(constraint) => (
            StatusCode::CONFLICT,
            "CONFLICT",
            format!("Duplicate value violates unique constraint: {constraint}"),
        ),
        StoreError::Database(db_err) => internal("Database error", db_err),
    }
}
