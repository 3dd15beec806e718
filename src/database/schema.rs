use sqlx::SqlitePool;

const SQL_CREATE_TENANTS: &str = r#"
CREATE TABLE IF NOT EXISTS tenants (
  id TEXT PRIMARY KEY,
  name TEXT NOT NULL,
  subdomain TEXT UNIQUE,
  whatsapp_number TEXT,
  status TEXT NOT NULL DEFAULT 'active'
    CHECK (status IN ('active', 'trial', 'suspended', 'canceled')),
  plan TEXT CHECK (plan IN ('monthly', 'quarterly', 'yearly')),
  started_on TEXT DEFAULT (date('now')),
  expires_on TEXT,
  created_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
)
"#;

const SQL_CREATE_PARTICIPANTS: &str = r#"
CREATE TABLE IF NOT EXISTS participants (
  seq INTEGER PRIMARY KEY AUTOINCREMENT,
  id TEXT NOT NULL UNIQUE,
  tenant_id TEXT NOT NULL REFERENCES tenants(id),
  name TEXT NOT NULL,
  name_key TEXT NOT NULL,
  category TEXT NOT NULL,
  gender TEXT,
  confirmed_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
)
"#;

const SQL_CREATE_PARTICIPANTS_NAME_INDEX: &str = r#"
CREATE UNIQUE INDEX IF NOT EXISTS idx_participants_tenant_name
ON participants (tenant_id, name_key)
"#;

const SQL_CREATE_PARTICIPANTS_ORDER_INDEX: &str = r#"
CREATE INDEX IF NOT EXISTS idx_participants_tenant_order
ON participants (tenant_id, confirmed_at, seq)
"#;

const SQL_CREATE_HISTORY: &str = r#"
CREATE TABLE IF NOT EXISTS confirmation_history (
  seq INTEGER PRIMARY KEY AUTOINCREMENT,
  tenant_id TEXT NOT NULL REFERENCES tenants(id),
  name TEXT NOT NULL,
  name_key TEXT NOT NULL,
  category TEXT NOT NULL,
  gender TEXT,
  confirmed_at TEXT NOT NULL
)
"#;

const SQL_CREATE_HISTORY_INDEX: &str = r#"
CREATE INDEX IF NOT EXISTS idx_history_tenant
ON confirmation_history (tenant_id, name_key)
"#;

const SQL_CREATE_SESSIONS: &str = r#"
CREATE TABLE IF NOT EXISTS sessions (
  token TEXT PRIMARY KEY,
  tenant_id TEXT NOT NULL REFERENCES tenants(id),
  subject TEXT NOT NULL,
  role TEXT NOT NULL CHECK (role IN ('super_admin', 'tenant_admin', 'member')),
  expires_at INTEGER NOT NULL
)
"#;

const SQL_SEED_DEFAULT_TENANT: &str = r#"
INSERT OR IGNORE INTO tenants (id, name, subdomain, status, plan)
VALUES (?, 'Main team', 'principal', 'active', 'monthly')
"#;

/// Tenant that owns rows created before any tenant was configured.
pub const DEFAULT_TENANT_ID: &str = "principal";

/// Creates every table and index when missing and seeds the default tenant.
/// Safe to run on every start.
pub async fn ensure_schema(pool: &SqlitePool) -> sqlx::Result<()> {
    let mut tx = pool.begin().await?;
    for statement in [
        SQL_CREATE_TENANTS,
        SQL_CREATE_PARTICIPANTS,
        SQL_CREATE_PARTICIPANTS_NAME_INDEX,
        SQL_CREATE_PARTICIPANTS_ORDER_INDEX,
        SQL_CREATE_HISTORY,
        SQL_CREATE_HISTORY_INDEX,
        SQL_CREATE_SESSIONS,
    ] {
        sqlx::query(statement).execute(&mut *tx).await?;
    }
    sqlx::query(SQL_SEED_DEFAULT_TENANT)
        .bind(DEFAULT_TENANT_ID)
        .execute(&mut *tx)
        .await?;
    tx.commit().await
}
