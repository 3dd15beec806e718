use sqlx::SqlitePool;
use thiserror::Error;

use crate::database::tenant_repo;
use crate::models::{TenantRow, TenantStatus};

#[derive(Debug, Error)]
pub enum TenantError {
    #[error("unknown tenant: {0}")]
    Unknown(String),
    #[error("subscription is {}", .0.as_str())]
    Inactive(TenantStatus),
    #[error("subscription expired on {0}")]
    Expired(String),
    #[error("tenant store failed: {0}")]
    Store(#[from] sqlx::Error),
}

/// Tenant as seen by request handlers once the gate let it through.
#[derive(Debug, Clone)]
pub struct ActiveTenant {
    pub id: String,
    pub name: String,
    pub status: TenantStatus,
    pub whatsapp_number: Option<String>,
}

/// Active and trial tenants pass unless their end date is behind us.
pub fn check_access(row: TenantRow) -> Result<ActiveTenant, TenantError> {
    let status = TenantStatus::parse(&row.status).unwrap_or(TenantStatus::Suspended);
    match status {
        TenantStatus::Suspended | TenantStatus::Canceled => {
            return Err(TenantError::Inactive(status));
        }
        TenantStatus::Active | TenantStatus::Trial => {}
    }
    if row.is_expired == 1 {
        return Err(TenantError::Expired(row.expires_on.unwrap_or_default()));
    }
    Ok(ActiveTenant {
        id: row.id,
        name: row.name,
        status,
        whatsapp_number: row
            .whatsapp_number
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty()),
    })
}

pub async fn load_active_tenant(
    pool: &SqlitePool,
    tenant_id: &str,
) -> Result<ActiveTenant, TenantError> {
    let Some(row) = tenant_repo::load_tenant(pool, tenant_id).await? else {
        return Err(TenantError::Unknown(tenant_id.to_string()));
    };
    check_access(row)
}
