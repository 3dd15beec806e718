//! Bearer sessions.
//!
//! A session maps an opaque token to a [`Principal`] until its TTL runs out.
//! The store is a trait so the web layer does not care whether sessions live
//! in SQLite or in process memory.

use async_trait::async_trait;
use base64::{engine::general_purpose, Engine as _};
use dashmap::DashMap;
use rand::RngCore;
use sqlx::SqlitePool;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::warn;

use crate::database::session_repo::{self, NewSession};
use crate::models::Principal;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("session store failed: {0}")]
    Store(#[from] sqlx::Error),
    #[error("stored session is unreadable: {0}")]
    Corrupt(String),
}

#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Creates a session for `principal` and returns its bearer token.
    async fn issue(&self, principal: &Principal, ttl: Duration) -> Result<String, SessionError>;

    /// Returns the principal of a live session. Unknown and expired tokens yield `None`.
    async fn resolve(&self, token: &str) -> Result<Option<Principal>, SessionError>;

    async fn revoke(&self, token: &str) -> Result<(), SessionError>;

    /// Drops expired sessions and returns how many were removed.
    async fn purge_expired(&self) -> Result<u64, SessionError>;
}

pub fn generate_token() -> String {
    let mut bytes = [0u8; 32];
    rand::rng().fill_bytes(&mut bytes);
    general_purpose::URL_SAFE_NO_PAD.encode(bytes)
}

#[derive(Clone)]
pub struct SqliteSessionStore {
    pool: SqlitePool,
}

impl SqliteSessionStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SessionStore for SqliteSessionStore {
    async fn issue(&self, principal: &Principal, ttl: Duration) -> Result<String, SessionError> {
        let token = generate_token();
        session_repo::insert_session(
            &self.pool,
            NewSession {
                token: &token,
                tenant_id: &principal.tenant_id,
                subject: &principal.subject,
                role: principal.role.as_str(),
                ttl_secs: ttl.as_secs() as i64,
            },
        )
        .await?;
        Ok(token)
    }

    async fn resolve(&self, token: &str) -> Result<Option<Principal>, SessionError> {
        let Some(row) = session_repo::load_live_session(&self.pool, token).await? else {
            return Ok(None);
        };
        Principal::try_from(row).map(Some).map_err(|e| {
            warn!("Session row rejected: {}", e);
            SessionError::Corrupt(e)
        })
    }

    async fn revoke(&self, token: &str) -> Result<(), SessionError> {
        session_repo::delete_session(&self.pool, token).await?;
        Ok(())
    }

    async fn purge_expired(&self) -> Result<u64, SessionError> {
        Ok(session_repo::delete_expired(&self.pool).await?)
    }
}

/// Process-local store for single-node runs and tests.
#[derive(Default)]
pub struct MemorySessionStore {
    sessions: DashMap<String, (Principal, Instant)>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn issue(&self, principal: &Principal, ttl: Duration) -> Result<String, SessionError> {
        let token = generate_token();
        self.sessions
            .insert(token.clone(), (principal.clone(), Instant::now() + ttl));
        Ok(token)
    }

    async fn resolve(&self, token: &str) -> Result<Option<Principal>, SessionError> {
        let live = self.sessions.get(token).and_then(|entry| {
            let (principal, expires_at) = entry.value();
            (*expires_at > Instant::now()).then(|| principal.clone())
        });
        if live.is_none() {
            self.sessions
                .remove_if(token, |_, (_, expires_at)| *expires_at <= Instant::now());
        }
        Ok(live)
    }

    async fn revoke(&self, token: &str) -> Result<(), SessionError> {
        self.sessions.remove(token);
        Ok(())
    }

    async fn purge_expired(&self) -> Result<u64, SessionError> {
        let before = self.sessions.len();
        let now = Instant::now();
        self.sessions.retain(|_, (_, expires_at)| *expires_at > now);
        Ok(before.saturating_sub(self.sessions.len()) as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;

    fn member() -> Principal {
        Principal {
            subject: "ana@example.com".to_string(),
            tenant_id: "principal".to_string(),
            role: Role::Member,
        }
    }

    #[test]
    fn tokens_are_url_safe_and_unique() {
        let a = generate_token();
        let b = generate_token();
        assert_ne!(a, b);
        assert_eq!(a.len(), 43);
        assert!(a.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
    }

    #[tokio::test]
    async fn memory_store_resolves_until_expiry() {
        let store = MemorySessionStore::new();
        let live = store.issue(&member(), Duration::from_secs(60)).await.unwrap();
        let dead = store.issue(&member(), Duration::ZERO).await.unwrap();

        assert_eq!(store.resolve(&live).await.unwrap(), Some(member()));
        assert_eq!(store.resolve(&dead).await.unwrap(), None);
        assert_eq!(store.resolve("nope").await.unwrap(), None);
        assert_eq!(store.len(), 1);

        store.revoke(&live).await.unwrap();
        assert_eq!(store.resolve(&live).await.unwrap(), None);
    }

    #[tokio::test]
    async fn memory_store_purges_expired() {
        let store = MemorySessionStore::new();
        store.issue(&member(), Duration::ZERO).await.unwrap();
        store.issue(&member(), Duration::ZERO).await.unwrap();
        store.issue(&member(), Duration::from_secs(60)).await.unwrap();

        assert_eq!(store.purge_expired().await.unwrap(), 2);
        assert_eq!(store.len(), 1);
    }
}
