use dotenvy::dotenv;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use std::net::SocketAddr;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use volley_lineup::config::AppConfig;
use volley_lineup::database::schema;
use volley_lineup::services::session_service::{SessionStore, SqliteSessionStore};
use volley_lineup::web::{self, state::AppState};

#[tokio::main]
async fn main() {
    dotenv().ok();

    // 1. Logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // 2. Config + database
    let config = AppConfig::from_env().expect("Invalid configuration");
    info!(database_url = %config.database_url, policy = ?config.admission_policy, "starting");

    let connect_options = SqliteConnectOptions::from_str(&config.database_url)
        .expect("DATABASE_URL is not a valid SQLite URL")
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal);
    let pool = SqlitePoolOptions::new()
        .connect_with(connect_options)
        .await
        .expect("Cannot connect to the database");

    schema::ensure_schema(&pool)
        .await
        .expect("Cannot prepare the database schema");

    let sessions = SqliteSessionStore::new(pool.clone());
    match sessions.purge_expired().await {
        Ok(purged) => info!(purged, "expired sessions removed"),
        Err(e) => warn!("Session purge failed: {}", e),
    }

    // 3. Router
    let state = AppState::new(pool, &config, Arc::new(sessions));
    let app = web::app(state);

    // 4. Serve (with fallback port)
    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .expect("Cannot parse host/port");

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(l) => l,
        Err(e) => {
            let Some(fallback_port) = config.fallback_port() else {
                panic!("Cannot bind {}: {}", addr, e);
            };
            warn!(
                "Could not bind {}: {}. Trying fallback {}:{}",
                addr, e, config.host, fallback_port
            );
            let fallback: SocketAddr = format!("{}:{}", config.host, fallback_port)
                .parse()
                .expect("Cannot parse fallback address");
            tokio::net::TcpListener::bind(fallback)
                .await
                .expect("Cannot bind fallback port")
        }
    };

    let bound_addr = listener.local_addr().expect("Listener has no local address");
    info!("Server running on http://{}", bound_addr);

    axum::serve(listener, app).await.expect("Server error");
}
