//! Access and refresh token issuance and validation.
//!
//! Both tokens are HS256-signed JWTs with distinct secrets. The refresh token
//! carries only the session id; it is honoured while that session row is live,
//! so it needs no server-side hash or blacklist.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use myorder_core::types::{DbId, SessionId};
use myorder_db::models::session::Session;
use myorder_db::models::user::User;
use serde::{Deserialize, Serialize};

/// Claims embedded in every access token.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct AccessClaims {
    /// Subject -- the user's internal database id.
    pub sub: DbId,
    /// The user's role id at issuance time.
    pub role: DbId,
    #[serde(rename = "sessionId")]
    pub session_id: SessionId,
    pub iat: i64,
    pub exp: i64,
}

/// Claims embedded in every refresh token.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct RefreshClaims {
    #[serde(rename = "sessionId")]
    pub session_id: SessionId,
    pub iat: i64,
    pub exp: i64,
}

/// Secrets and lifetimes for both token kinds.
#[derive(Clone)]
pub struct JwtConfig {
    pub access_secret: String,
    pub refresh_secret: String,
    /// Access token lifetime in minutes.
    pub access_token_expiry_mins: i64,
    /// Refresh token lifetime in days.
    pub refresh_token_expiry_days: i64,
}

impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("access_secret", &"[REDACTED]")
            .field("refresh_secret", &"[REDACTED]")
            .field("access_token_expiry_mins", &self.access_token_expiry_mins)
            .field("refresh_token_expiry_days", &self.refresh_token_expiry_days)
            .finish()
    }
}

/// A freshly minted access/refresh pair.
#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    pub access_token_expires_at: DateTime<Utc>,
}

/// Mint an access/refresh pair for `user` bound to `session`.
pub fn issue_token_pair(
    user: &User,
    session: &Session,
    config: &JwtConfig,
) -> Result<TokenPair, jsonwebtoken::errors::Error> {
    let now = Utc::now();
    let access_expires_at = now + Duration::minutes(config.access_token_expiry_mins);
    let refresh_expires_at = now + Duration::days(config.refresh_token_expiry_days);

    let access = AccessClaims {
        sub: user.id,
        role: user.role_id,
        session_id: session.id,
        iat: now.timestamp(),
        exp: access_expires_at.timestamp(),
    };
    let refresh = RefreshClaims {
        session_id: session.id,
        iat: now.timestamp(),
        exp: refresh_expires_at.timestamp(),
    };

    Ok(TokenPair {
        access_token: encode(
            &Header::default(),
            &access,
            &EncodingKey::from_secret(config.access_secret.as_bytes()),
        )?,
        refresh_token: encode(
            &Header::default(),
            &refresh,
            &EncodingKey::from_secret(config.refresh_secret.as_bytes()),
        )?,
        access_token_expires_at: access_expires_at,
    })
}

/// Validate an access token's signature and expiry and decode its claims.
pub fn validate_access_token(
    token: &str,
    config: &JwtConfig,
) -> Result<AccessClaims, jsonwebtoken::errors::Error> {
    let data = decode::<AccessClaims>(
        token,
        &DecodingKey::from_secret(config.access_secret.as_bytes()),
        &Validation::default(),
    )?;
    Ok(data.claims)
}

/// Validate a refresh token's signature and expiry and decode its claims.
pub fn validate_refresh_token(
    token: &str,
    config: &JwtConfig,
) -> Result<RefreshClaims, jsonwebtoken::errors::Error> {
    let data = decode::<RefreshClaims>(
        token,
        &DecodingKey::from_secret(config.refresh_secret.as_bytes()),
        &Validation::default(),
    )?;
    Ok(data.claims)
}
