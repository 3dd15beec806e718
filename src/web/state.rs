use sqlx::SqlitePool;
use std::sync::Arc;
use std::time::Duration;

use crate::config::AppConfig;
use crate::services::admission_service::AdmissionLedger;
use crate::services::session_service::SessionStore;

#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub ledger: AdmissionLedger,
    pub sessions: Arc<dyn SessionStore>,
    pub session_ttl: Duration,
    pub share_phone: Option<String>,
    pub session_title: String,
}

impl AppState {
    pub fn new(pool: SqlitePool, config: &AppConfig, sessions: Arc<dyn SessionStore>) -> Self {
        Self {
            ledger: AdmissionLedger::new(pool.clone(), config.admission_policy),
            pool,
            sessions,
            session_ttl: config.session_ttl,
            share_phone: config.share_phone.clone(),
            session_title: config.session_title.clone(),
        }
    }
}
