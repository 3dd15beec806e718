use serde::Serialize;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct TenantRow {
    pub id: String,
    pub name: String,
    pub subdomain: Option<String>,
    pub whatsapp_number: Option<String>,
    pub status: String,
    pub plan: Option<String>,
    pub started_on: Option<String>,
    pub expires_on: Option<String>,
    // 1 when expires_on lies before today (computed in SQL)
    pub is_expired: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TenantStatus {
    Active,
    Trial,
    Suspended,
    Canceled,
}

impl TenantStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            TenantStatus::Active => "active",
            TenantStatus::Trial => "trial",
            TenantStatus::Suspended => "suspended",
            TenantStatus::Canceled => "canceled",
        }
    }

    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_lowercase().as_str() {
            "active" => Some(TenantStatus::Active),
            "trial" => Some(TenantStatus::Trial),
            "suspended" => Some(TenantStatus::Suspended),
            "canceled" | "cancelled" => Some(TenantStatus::Canceled),
            _ => None,
        }
    }
}
