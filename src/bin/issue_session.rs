use dotenvy::dotenv;
use sqlx::sqlite::SqlitePoolOptions;
use std::env;
use std::time::Duration;

use volley_lineup::database::{schema, tenant_repo};
use volley_lineup::models::{Principal, Role};
use volley_lineup::services::session_service::{SessionStore, SqliteSessionStore};

#[tokio::main]
async fn main() {
    dotenv().ok();
    tracing_subscriber::fmt::init();

    let db_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set in .env");
    let pool = SqlitePoolOptions::new()
        .connect(&db_url)
        .await
        .expect("Cannot connect to the database");
    schema::ensure_schema(&pool)
        .await
        .expect("Cannot prepare the database schema");

    let subdomain = env::var("SESSION_TENANT").unwrap_or_else(|_| "principal".to_string());
    let subject = env::var("SESSION_SUBJECT").unwrap_or_else(|_| "operator".to_string());
    let role = env::var("SESSION_ROLE")
        .ok()
        .and_then(|v| Role::parse(&v))
        .unwrap_or(Role::TenantAdmin);
    let ttl_secs: u64 = env::var("SESSION_TTL_SECS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(12 * 60 * 60);

    let tenant = match tenant_repo::load_tenant_by_subdomain(&pool, &subdomain).await {
        Ok(Some(t)) => t,
        Ok(None) => {
            eprintln!("unknown tenant subdomain: {}", subdomain);
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("tenant lookup failed: {}", e);
            std::process::exit(1);
        }
    };

    let principal = Principal {
        subject,
        tenant_id: tenant.id,
        role,
    };
    let store = SqliteSessionStore::new(pool);
    match store.issue(&principal, Duration::from_secs(ttl_secs)).await {
        Ok(token) => {
            println!(
                "session for {} ({}) on tenant {}: {}",
                principal.subject,
                principal.role.as_str(),
                principal.tenant_id,
                token
            );
        }
        Err(e) => {
            eprintln!("session issue failed: {}", e);
            std::process::exit(1);
        }
    }
}
