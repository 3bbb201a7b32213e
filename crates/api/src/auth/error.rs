use myorder_db::StoreError;

use crate::auth::social::SocialProvider;

/// Failures of the authentication and session flow.
///
/// Every variant is terminal for the request that raised it.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Password or email did not match. Never says which.
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// The resolved identity no longer exists, is soft-deleted or inactive.
    #[error("User not found")]
    UserNotFound,

    /// The refresh token's session was ended.
    #[error("Session not found")]
    SessionNotFound,

    /// Signature, expiry or shape check on one of our tokens failed.
    #[error("Invalid or expired token")]
    InvalidToken,

    /// A social identity token failed verification.
    #[error("Invalid {0} identity token")]
    InvalidProviderToken(SocialProvider),

    #[error("{0} sign-in is not configured")]
    ProviderNotConfigured(SocialProvider),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("Email is already registered")]
    EmailTaken,

    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("{0}")]
    Internal(String),
}

pub type AuthResult<T> = Result<T, AuthError>;
