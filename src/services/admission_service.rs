//! Admission ledger for the active session of each tenant.
//!
//! Arrival order `(confirmed_at, seq)` is the only input to the confirmed/waitlist
//! split: the first [`CAPACITY`] records are confirmed and every later one waits.

use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::info;
use uuid::Uuid;

use crate::database::history_repo::{self, NewHistoryEntry};
use crate::database::participant_repo::{self, NewParticipant};
use crate::models::{name_key, Category, Gender, Participant};
use crate::services::team_draw_service::CAPACITY;

#[derive(Debug, Error)]
pub enum AdmissionError {
    #[error("{0}")]
    Validation(String),
    #[error("name already confirmed: {0}")]
    DuplicateName(String),
    #[error("session is full: {capacity} participants already confirmed")]
    CapacityExceeded { capacity: usize },
    #[error("participant not found: {0}")]
    NotFound(String),
    #[error("participant store failed: {0}")]
    Store(#[from] sqlx::Error),
}

/// What to do with a valid submission once `CAPACITY` records exist.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AdmissionPolicy {
    /// Accept and place on the waitlist.
    #[default]
    Waitlist,
    /// Refuse with [`AdmissionError::CapacityExceeded`].
    RejectWhenFull,
}

impl AdmissionPolicy {
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_lowercase().as_str() {
            "waitlist" => Some(AdmissionPolicy::Waitlist),
            "reject" => Some(AdmissionPolicy::RejectWhenFull),
            _ => None,
        }
    }
}

/// Raw confirmation input as submitted by a caller.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfirmRequest {
    #[serde(default, alias = "nome")]
    pub name: String,
    #[serde(default, alias = "tipo")]
    pub category: String,
    #[serde(default, alias = "genero")]
    pub gender: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Admission {
    pub participant: Participant,
    pub position: usize,
    pub is_waitlisted: bool,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Roster {
    pub confirmed: Vec<Participant>,
    pub waitlist: Vec<Participant>,
}

impl Roster {
    pub fn total(&self) -> usize {
        self.confirmed.len() + self.waitlist.len()
    }
}

struct ValidatedConfirm {
    name: String,
    name_key: String,
    category: Category,
    gender: Option<Gender>,
}

fn validate(request: &ConfirmRequest) -> Result<ValidatedConfirm, AdmissionError> {
    let name = request.name.trim();
    if name.is_empty() {
        return Err(AdmissionError::Validation("name is required".to_string()));
    }
    let category = request.category.trim();
    if category.is_empty() {
        return Err(AdmissionError::Validation("category is required".to_string()));
    }
    let category = Category::parse(category)
        .ok_or_else(|| AdmissionError::Validation(format!("unknown category: {}", category)))?;
    let gender = match request.gender.as_deref().map(str::trim).filter(|g| !g.is_empty()) {
        Some(raw) => Some(
            Gender::parse(raw)
                .ok_or_else(|| AdmissionError::Validation(format!("unknown gender: {}", raw)))?,
        ),
        None => None,
    };
    Ok(ValidatedConfirm {
        name: name.to_string(),
        name_key: name_key(name),
        category,
        gender,
    })
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .map(|db| db.is_unique_violation())
        .unwrap_or(false)
}

/// Splits records already in arrival order into the confirmed and waitlist views.
pub fn split_roster(ordered: Vec<Participant>) -> Roster {
    let mut confirmed = ordered;
    let waitlist = if confirmed.len() > CAPACITY {
        confirmed.split_off(CAPACITY)
    } else {
        Vec::new()
    };
    Roster {
        confirmed,
        waitlist,
    }
}

/// Serializes writers so the duplicate/capacity check and the insert are atomic.
#[derive(Clone)]
pub struct AdmissionLedger {
    pool: SqlitePool,
    policy: AdmissionPolicy,
    write_lock: Arc<Mutex<()>>,
}

impl AdmissionLedger {
    pub fn new(pool: SqlitePool, policy: AdmissionPolicy) -> Self {
        Self {
            pool,
            policy,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn policy(&self) -> AdmissionPolicy {
        self.policy
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub async fn confirm(
        &self,
        tenant_id: &str,
        request: &ConfirmRequest,
    ) -> Result<Admission, AdmissionError> {
        let input = validate(request)?;

        let _guard = self.write_lock.lock().await;
        let mut tx = self.pool.begin().await?;

        if participant_repo::find_id_by_name(&mut tx, tenant_id, &input.name_key)
            .await?
            .is_some()
        {
            return Err(AdmissionError::DuplicateName(input.name));
        }

        if self.policy == AdmissionPolicy::RejectWhenFull {
            let active = participant_repo::count_active(&mut tx, tenant_id).await?;
            if active >= CAPACITY as i64 {
                return Err(AdmissionError::CapacityExceeded { capacity: CAPACITY });
            }
        }

        let id = Uuid::new_v4().to_string();
        let inserted = participant_repo::insert_participant(
            &mut tx,
            NewParticipant {
                id: &id,
                tenant_id,
                name: &input.name,
                name_key: &input.name_key,
                category: input.category.as_str(),
                gender: input.gender.map(Gender::as_str),
            },
        )
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AdmissionError::DuplicateName(input.name.clone())
            } else {
                AdmissionError::Store(e)
            }
        })?;

        history_repo::insert_history_entry(
            &mut tx,
            NewHistoryEntry {
                tenant_id,
                name: &inserted.name,
                name_key: &input.name_key,
                category: &inserted.category,
                gender: inserted.gender.as_deref(),
                confirmed_at: &inserted.confirmed_at,
            },
        )
        .await?;

        let position = participant_repo::position_of(&mut tx, tenant_id, &inserted).await? as usize;
        tx.commit().await?;

        let is_waitlisted = position > CAPACITY;
        info!(
            tenant_id,
            participant_id = %inserted.id,
            position,
            is_waitlisted,
            "participant confirmed"
        );

        Ok(Admission {
            participant: inserted.into(),
            position,
            is_waitlisted,
        })
    }

    pub async fn list(&self, tenant_id: &str) -> Result<Roster, AdmissionError> {
        let mut conn = self.pool.acquire().await?;
        let rows = participant_repo::list_ordered(&mut conn, tenant_id).await?;
        Ok(split_roster(rows.into_iter().map(Participant::from).collect()))
    }

    pub async fn remove(&self, tenant_id: &str, id: &str) -> Result<(), AdmissionError> {
        let _guard = self.write_lock.lock().await;
        let mut conn = self.pool.acquire().await?;
        let removed = participant_repo::delete_by_id(&mut conn, tenant_id, id).await?;
        if removed == 0 {
            return Err(AdmissionError::NotFound(id.to_string()));
        }
        info!(tenant_id, participant_id = id, "participant removed");
        Ok(())
    }

    /// Empties the active session. The history log is left alone.
    pub async fn clear(&self, tenant_id: &str) -> Result<u64, AdmissionError> {
        let _guard = self.write_lock.lock().await;
        let mut conn = self.pool.acquire().await?;
        let removed = participant_repo::delete_all(&mut conn, tenant_id).await?;
        info!(tenant_id, removed, "session cleared");
        Ok(removed)
    }
}
