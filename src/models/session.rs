use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct SessionRow {
    pub tenant_id: String,
    pub subject: String,
    pub role: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    SuperAdmin,
    TenantAdmin,
    Member,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::SuperAdmin => "super_admin",
            Role::TenantAdmin => "tenant_admin",
            Role::Member => "member",
        }
    }

    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_lowercase().as_str() {
            "super_admin" => Some(Role::SuperAdmin),
            "tenant_admin" => Some(Role::TenantAdmin),
            "member" => Some(Role::Member),
            _ => None,
        }
    }

    pub fn can_manage_roster(self) -> bool {
        matches!(self, Role::SuperAdmin | Role::TenantAdmin)
    }
}

/// Caller identity carried by a session token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub subject: String,
    pub tenant_id: String,
    pub role: Role,
}

impl TryFrom<SessionRow> for Principal {
    type Error = String;

    fn try_from(row: SessionRow) -> Result<Self, Self::Error> {
        let role = Role::parse(&row.role).ok_or_else(|| format!("unknown role {}", row.role))?;
        Ok(Principal {
            subject: row.subject,
            tenant_id: row.tenant_id,
            role,
        })
    }
}
