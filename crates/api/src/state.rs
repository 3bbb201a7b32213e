use std::sync::Arc;

use myorder_db::models::session::Session;
use myorder_db::models::user::User;
use myorder_db::repositories::{SessionRepo, UserRepo};
use myorder_db::Store;

use crate::auth::social::IdentityVerifier;
use crate::auth::AuthService;
use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Server configuration, validated at startup.
    pub config: Arc<ServerConfig>,
    pub users: UserRepo,
    pub sessions: SessionRepo,
    /// Login, refresh and logout lifecycle.
    pub auth: Arc<AuthService>,
}

impl AppState {
    /// Wire repositories and the auth service over the given store backends.
    pub fn new(
        config: ServerConfig,
        user_store: Arc<dyn Store<User>>,
        session_store: Arc<dyn Store<Session>>,
        verifiers: Vec<Arc<dyn IdentityVerifier>>,
    ) -> Self {
        let users = UserRepo::new(user_store);
        let sessions = SessionRepo::new(session_store);

        let auth = verifiers.into_iter().fold(
            AuthService::new(
                users.clone(),
                sessions.clone(),
                config.jwt.clone(),
                config.password_min_length,
            ),
            AuthService::with_verifier,
        );

        Self {
            config: Arc::new(config),
            users,
            sessions,
            auth: Arc::new(auth),
        }
    }
}
