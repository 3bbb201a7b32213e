#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;

use myorder_api::auth::jwt::JwtConfig;
use myorder_api::auth::password::hash_password;
use myorder_api::auth::social::{IdentityVerifier, ProviderIdentity, SocialProvider, VerifyError};
use myorder_api::config::{ServerConfig, SocialConfig};
use myorder_api::router::build_app_router;
use myorder_api::state::AppState;
use myorder_core::roles::{Role, Status};
use myorder_db::models::session::Session;
use myorder_db::models::user::{CreateUser, User, PROVIDER_EMAIL};
use myorder_db::MemoryStore;

pub const TEST_API_KEY: &str = "test-service-key";
pub const TEST_PASSWORD: &str = "test_password_123!";

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        database_url: None,
        jwt: JwtConfig {
            access_secret: "integration-access-secret".to_string(),
            refresh_secret: "integration-refresh-secret".to_string(),
            access_token_expiry_mins: 15,
            refresh_token_expiry_days: 30,
        },
        api_key: Some(TEST_API_KEY.to_string()),
        social: SocialConfig {
            apple_audiences: vec!["io.myorder.app".to_string()],
            google_client_ids: vec!["web.apps.googleusercontent.com".to_string()],
        },
        password_min_length: 8,
        log_json: false,
    }
}

/// Identity verifier that trusts tokens of the form `sub|email|verified`.
///
/// Any token starting with `bad` is rejected.
pub struct StubVerifier(pub SocialProvider);

#[async_trait]
impl IdentityVerifier for StubVerifier {
    fn provider(&self) -> SocialProvider {
        self.0
    }

    async fn verify(&self, id_token: &str) -> Result<ProviderIdentity, VerifyError> {
        if id_token.starts_with("bad") {
            return Err(VerifyError::UnknownKey("stub".into()));
        }
        let mut parts = id_token.split('|');
        let sub = parts.next().unwrap_or_default().to_string();
        Ok(ProviderIdentity {
            provider_user_id: sub,
            email: parts.next().filter(|s| !s.is_empty()).map(str::to_string),
            email_verified: parts.next() == Some("true"),
        })
    }
}

/// Application state over fresh in-memory stores with stub social verifiers.
pub fn test_state() -> AppState {
    AppState::new(
        test_config(),
        Arc::new(MemoryStore::<User>::new()),
        Arc::new(MemoryStore::<Session>::new()),
        vec![
            Arc::new(StubVerifier(SocialProvider::Apple)),
            Arc::new(StubVerifier(SocialProvider::Google)),
        ],
    )
}

/// Build the full application router with all middleware layers.
pub fn build_test_app(state: AppState) -> Router {
    build_app_router(state)
}

/// Insert an active email/password user directly through the repository.
pub async fn create_test_user(state: &AppState, email: &str, role: Role) -> User {
    let hashed = hash_password(TEST_PASSWORD).expect("hashing should succeed");
    state
        .users
        .create(CreateUser {
            email: Some(email.to_string()),
            password_hash: Some(hashed),
            provider: PROVIDER_EMAIL.to_string(),
            social_id: None,
            first_name: None,
            last_name: None,
            role_id: role.id(),
            status_id: Status::Active.id(),
        })
        .await
        .expect("user creation should succeed")
}

/// Log in via the API and return the `AuthResponse` JSON.
pub async fn login(app: &Router, email: &str) -> serde_json::Value {
    let body = serde_json::json!({ "email": email, "password": TEST_PASSWORD });
    let response = post_json(app, "/api/v1/auth/email/login", body).await;
    assert_eq!(response.status(), 200, "login should succeed");
    body_json(response).await
}

pub fn access_token(auth: &serde_json::Value) -> String {
    auth["access_token"].as_str().expect("access_token").to_string()
}

pub fn refresh_token(auth: &serde_json::Value) -> String {
    auth["refresh_token"].as_str().expect("refresh_token").to_string()
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.clone().oneshot(request).await.unwrap()
}

pub async fn get(app: &Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None, None).await
}

pub async fn get_auth(app: &Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::GET, uri, Some(token), None).await
}

pub async fn post_json(app: &Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(app, Method::POST, uri, None, Some(body)).await
}

pub async fn post_auth(app: &Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::POST, uri, Some(token), None).await
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
