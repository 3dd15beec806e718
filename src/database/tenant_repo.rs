use sqlx::SqlitePool;

use crate::models::TenantRow;

const SQL_TENANT_COLUMNS: &str = r#"
SELECT
  id,
  name,
  subdomain,
  whatsapp_number,
  status,
  plan,
  started_on,
  expires_on,
  CASE WHEN expires_on IS NOT NULL AND expires_on < date('now') THEN 1 ELSE 0 END AS is_expired
FROM tenants
"#;

const SQL_INSERT_TENANT: &str = r#"
INSERT INTO tenants (
  id,
  name,
  subdomain,
  whatsapp_number,
  status,
  plan,
  expires_on
) VALUES (?, ?, ?, ?, ?, ?, ?)
"#;

pub async fn load_tenant(pool: &SqlitePool, tenant_id: &str) -> sqlx::Result<Option<TenantRow>> {
    let sql = format!("{SQL_TENANT_COLUMNS} WHERE id = ?1 LIMIT 1");
    sqlx::query_as::<_, TenantRow>(&sql)
        .bind(tenant_id)
        .fetch_optional(pool)
        .await
}

pub async fn load_tenant_by_subdomain(
    pool: &SqlitePool,
    subdomain: &str,
) -> sqlx::Result<Option<TenantRow>> {
    let sql = format!("{SQL_TENANT_COLUMNS} WHERE lower(subdomain) = lower(?1) LIMIT 1");
    sqlx::query_as::<_, TenantRow>(&sql)
        .bind(subdomain)
        .fetch_optional(pool)
        .await
}

pub struct NewTenant<'a> {
    pub id: &'a str,
    pub name: &'a str,
    pub subdomain: &'a str,
    pub whatsapp_number: Option<&'a str>,
    pub status: &'a str,
    pub plan: Option<&'a str>,
    pub expires_on: Option<&'a str>,
}

pub async fn insert_tenant(pool: &SqlitePool, tenant: NewTenant<'_>) -> sqlx::Result<u64> {
    let res = sqlx::query(SQL_INSERT_TENANT)
        .bind(tenant.id)
        .bind(tenant.name)
        .bind(tenant.subdomain)
        .bind(tenant.whatsapp_number)
        .bind(tenant.status)
        .bind(tenant.plan)
        .bind(tenant.expires_on)
        .execute(pool)
        .await?;
    Ok(res.rows_affected())
}
