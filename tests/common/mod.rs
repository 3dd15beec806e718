#![allow(dead_code)]

use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use std::collections::HashMap;

use volley_lineup::config::AppConfig;
use volley_lineup::database::schema;
use volley_lineup::database::tenant_repo::{self, NewTenant};
use volley_lineup::services::admission_service::ConfirmRequest;

/// Single shared connection so every query sees the same in-memory database.
pub async fn memory_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .min_connections(1)
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .expect("in-memory sqlite");
    schema::ensure_schema(&pool).await.expect("schema");
    pool
}

pub fn test_config(pairs: &[(&str, &str)]) -> AppConfig {
    let mut map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    map.entry("DATABASE_URL".to_string())
        .or_insert_with(|| "sqlite::memory:".to_string());
    AppConfig::from_lookup(|name| map.get(name).cloned()).expect("test config")
}

pub async fn add_tenant(pool: &SqlitePool, id: &str, status: &str, expires_on: Option<&str>) {
    tenant_repo::insert_tenant(
        pool,
        NewTenant {
            id,
            name: id,
            subdomain: id,
            whatsapp_number: None,
            status,
            plan: Some("monthly"),
            expires_on,
        },
    )
    .await
    .expect("insert tenant");
}

pub fn request(name: &str, category: &str, gender: Option<&str>) -> ConfirmRequest {
    ConfirmRequest {
        name: name.to_string(),
        category: category.to_string(),
        gender: gender.map(str::to_string),
    }
}

/// The seven-player Friday scenario: (name, gender).
pub const SEVEN: [(&str, &str); 7] = [
    ("Ana", "female"),
    ("Beto", "male"),
    ("Caio", "male"),
    ("Diana", "female"),
    ("Edu", "male"),
    ("Fabi", "female"),
    ("Gui", "male"),
];
