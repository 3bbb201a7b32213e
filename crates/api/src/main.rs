use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use myorder_api::auth::social::{IdentityVerifier, JwksVerifier, SocialProvider};
use myorder_api::config::ServerConfig;
use myorder_api::router::build_app_router;
use myorder_api::state::AppState;
use myorder_db::models::session::Session;
use myorder_db::models::user::User;
use myorder_db::{MemoryStore, PgStore, Store};

/// Timeout for fetching identity provider signing keys.
const JWKS_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Configuration ---
    let config = ServerConfig::from_env().unwrap_or_else(|e| {
        eprintln!("Invalid configuration: {e}");
        std::process::exit(1);
    });

    // --- Tracing ---
    let json = config.log_json;
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "myorder_api=debug,tower_http=debug".into()),
        )
        .with(json.then(|| tracing_subscriber::fmt::layer().json()))
        .with((!json).then(tracing_subscriber::fmt::layer))
        .init();

    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Storage ---
    let (user_store, session_store): (Arc<dyn Store<User>>, Arc<dyn Store<Session>>) =
        match &config.database_url {
            Some(database_url) => {
                let pool = myorder_db::create_pool(database_url)
                    .await
                    .expect("Failed to connect to database");
                tracing::info!("Database connection pool created");

                myorder_db::health_check(&pool)
                    .await
                    .expect("Database health check failed");

                myorder_db::run_migrations(&pool)
                    .await
                    .expect("Failed to run database migrations");
                tracing::info!("Database migrations applied");

                (
                    Arc::new(PgStore::<User>::new(pool.clone())),
                    Arc::new(PgStore::<Session>::new(pool)),
                )
            }
            None => {
                tracing::warn!("DATABASE_URL not set, using in-memory storage; data is lost on exit");
                (
                    Arc::new(MemoryStore::<User>::new()),
                    Arc::new(MemoryStore::<Session>::new()),
                )
            }
        };

    // --- Social sign-in ---
    let http = reqwest::Client::builder()
        .timeout(JWKS_FETCH_TIMEOUT)
        .build()
        .expect("Failed to build reqwest HTTP client");

    let mut verifiers: Vec<Arc<dyn IdentityVerifier>> = Vec::new();
    for (provider, audiences) in [
        (SocialProvider::Apple, &config.social.apple_audiences),
        (SocialProvider::Google, &config.social.google_client_ids),
    ] {
        if audiences.is_empty() {
            tracing::info!(%provider, "Sign-in disabled (no client ids configured)");
            continue;
        }
        verifiers.push(Arc::new(JwksVerifier::new(
            provider,
            audiences.clone(),
            http.clone(),
        )));
    }

    if config.api_key.is_none() {
        tracing::warn!("API_KEY not set, internal endpoints will reject every request");
    }

    // --- App ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    let state = AppState::new(config, user_store, session_store, verifiers);
    let app = build_app_router(state);

    tracing::info!(%addr, "Starting server");
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    tracing::info!("Graceful shutdown complete");
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
