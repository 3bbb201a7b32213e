//! Server configuration, loaded and validated once at process start.

use axum::http::HeaderValue;

use crate::auth::jwt::JwtConfig;

/// Default access token expiry in minutes.
const DEFAULT_ACCESS_EXPIRY_MINS: i64 = 15;
/// Default refresh token expiry in days.
const DEFAULT_REFRESH_EXPIRY_DAYS: i64 = 30;
/// Longest accepted access token lifetime (one day).
const MAX_ACCESS_EXPIRY_MINS: i64 = 24 * 60;
/// Longest accepted refresh token lifetime (one year).
const MAX_REFRESH_EXPIRY_DAYS: i64 = 365;
/// Default minimum password length.
const DEFAULT_PASSWORD_MIN_LENGTH: usize = 8;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}

/// Client ids accepted as the `aud` of social identity tokens.
///
/// An empty list disables sign-in with that provider.
#[derive(Debug, Clone, Default)]
pub struct SocialConfig {
    pub apple_audiences: Vec<String>,
    pub google_client_ids: Vec<String>,
}

/// Server configuration loaded from environment variables.
///
/// Everything except the two token secrets has a default suitable for local
/// development.
#[derive(Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// PostgreSQL URL. `None` runs against the in-memory store.
    pub database_url: Option<String>,
    /// Token secrets and lifetimes.
    pub jwt: JwtConfig,
    /// Static secret for machine-to-machine endpoints. `None` rejects all callers.
    pub api_key: Option<String>,
    pub social: SocialConfig,
    pub password_min_length: usize,
    /// Emit logs as JSON lines instead of human-readable text.
    pub log_json: bool,
}

impl std::fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("cors_origins", &self.cors_origins)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("database_url", &self.database_url.as_ref().map(|_| "[REDACTED]"))
            .field("jwt", &self.jwt)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("social", &self.social)
            .field("password_min_length", &self.password_min_length)
            .field("log_json", &self.log_json)
            .finish()
    }
}

impl ServerConfig {
    /// Load configuration from the process environment.
    ///
    /// | Env Var                           | Default                 |
    /// |-----------------------------------|-------------------------|
    /// | `HOST`                            | `0.0.0.0`               |
    /// | `PORT`                            | `3000`                  |
    /// | `CORS_ORIGINS`                    | `http://localhost:5173` |
    /// | `REQUEST_TIMEOUT_SECS`            | `30`                    |
    /// | `DATABASE_URL`                    | unset (in-memory)       |
    /// | `AUTH_JWT_SECRET`                 | **required**            |
    /// | `AUTH_REFRESH_SECRET`             | **required**            |
    /// | `AUTH_JWT_TOKEN_EXPIRES_MINS`     | `15` (1 to 1440)        |
    /// | `AUTH_REFRESH_TOKEN_EXPIRES_DAYS` | `30` (1 to 365)         |
    /// | `API_KEY`                         | unset                   |
    /// | `APPLE_APP_AUDIENCE`              | empty                   |
    /// | `GOOGLE_CLIENT_ID`                | empty                   |
    /// | `PASSWORD_MIN_LENGTH`             | `8`                     |
    /// | `LOG_FORMAT`                      | `text` (or `json`)      |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let host = var("HOST").unwrap_or_else(|| "0.0.0.0".into());
        let port = parse_or("PORT", var("PORT"), 3000u16)?;

        let cors_origins = split_list(var("CORS_ORIGINS").as_deref().unwrap_or("http://localhost:5173"));
        for origin in &cors_origins {
            origin.parse::<HeaderValue>().map_err(|e| {
                ConfigError::InvalidValue("CORS_ORIGINS", format!("'{origin}': {e}"))
            })?;
        }

        let request_timeout_secs = parse_or("REQUEST_TIMEOUT_SECS", var("REQUEST_TIMEOUT_SECS"), 30u64)?;

        let access_secret =
            var("AUTH_JWT_SECRET").ok_or(ConfigError::MissingVar("AUTH_JWT_SECRET"))?;
        let refresh_secret =
            var("AUTH_REFRESH_SECRET").ok_or(ConfigError::MissingVar("AUTH_REFRESH_SECRET"))?;
        if access_secret == refresh_secret {
            return Err(ConfigError::InvalidValue(
                "AUTH_REFRESH_SECRET",
                "must differ from AUTH_JWT_SECRET".into(),
            ));
        }

        let access_token_expiry_mins = parse_or(
            "AUTH_JWT_TOKEN_EXPIRES_MINS",
            var("AUTH_JWT_TOKEN_EXPIRES_MINS"),
            DEFAULT_ACCESS_EXPIRY_MINS,
        )?;
        let refresh_token_expiry_days = parse_or(
            "AUTH_REFRESH_TOKEN_EXPIRES_DAYS",
            var("AUTH_REFRESH_TOKEN_EXPIRES_DAYS"),
            DEFAULT_REFRESH_EXPIRY_DAYS,
        )?;
        check_range(
            "AUTH_JWT_TOKEN_EXPIRES_MINS",
            access_token_expiry_mins,
            MAX_ACCESS_EXPIRY_MINS,
        )?;
        check_range(
            "AUTH_REFRESH_TOKEN_EXPIRES_DAYS",
            refresh_token_expiry_days,
            MAX_REFRESH_EXPIRY_DAYS,
        )?;

        let password_min_length = parse_or(
            "PASSWORD_MIN_LENGTH",
            var("PASSWORD_MIN_LENGTH"),
            DEFAULT_PASSWORD_MIN_LENGTH,
        )?;

        let log_json = match var("LOG_FORMAT").as_deref() {
            None | Some("text") => false,
            Some("json") => true,
            Some(other) => {
                return Err(ConfigError::InvalidValue(
                    "LOG_FORMAT",
                    format!("expected 'text' or 'json', got '{other}'"),
                ))
            }
        };

        Ok(Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            database_url: var("DATABASE_URL"),
            jwt: JwtConfig {
                access_secret,
                refresh_secret,
                access_token_expiry_mins,
                refresh_token_expiry_days,
            },
            api_key: var("API_KEY"),
            social: SocialConfig {
                apple_audiences: var("APPLE_APP_AUDIENCE")
                    .map(|v| split_list(&v))
                    .unwrap_or_default(),
                google_client_ids: var("GOOGLE_CLIENT_ID")
                    .map(|v| split_list(&v))
                    .unwrap_or_default(),
            },
            password_min_length,
            log_json,
        })
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn check_range(key: &'static str, value: i64, max: i64) -> Result<(), ConfigError> {
    if (1..=max).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::InvalidValue(
            key,
            format!("must be between 1 and {max}, got {value}"),
        ))
    }
}

fn parse_or<T>(key: &'static str, raw: Option<String>, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match raw {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|e| ConfigError::InvalidValue(key, format!("{e}: {value}"))),
        None => Ok(default),
    }
}
