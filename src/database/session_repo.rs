use sqlx::SqlitePool;

use crate::models::SessionRow;

const SQL_INSERT_SESSION: &str = r#"
INSERT INTO sessions (
  token,
  tenant_id,
  subject,
  role,
  expires_at
) VALUES (?, ?, ?, ?, CAST(strftime('%s', 'now') AS INTEGER) + ?)
"#;

const SQL_LOAD_LIVE_SESSION: &str = r#"
SELECT tenant_id, subject, role
FROM sessions
WHERE token = ?1
  AND expires_at > CAST(strftime('%s', 'now') AS INTEGER)
LIMIT 1
"#;

const SQL_DELETE_SESSION: &str = r#"
DELETE FROM sessions
WHERE token = ?1
"#;

const SQL_DELETE_EXPIRED: &str = r#"
DELETE FROM sessions
WHERE expires_at <= CAST(strftime('%s', 'now') AS INTEGER)
"#;

pub struct NewSession<'a> {
    pub token: &'a str,
    pub tenant_id: &'a str,
    pub subject: &'a str,
    pub role: &'a str,
    pub ttl_secs: i64,
}

pub async fn insert_session(pool: &SqlitePool, session: NewSession<'_>) -> sqlx::Result<u64> {
    let res = sqlx::query(SQL_INSERT_SESSION)
        .bind(session.token)
        .bind(session.tenant_id)
        .bind(session.subject)
        .bind(session.role)
        .bind(session.ttl_secs)
        .execute(pool)
        .await?;
    Ok(res.rows_affected())
}

pub async fn load_live_session(pool: &SqlitePool, token: &str) -> sqlx::Result<Option<SessionRow>> {
    sqlx::query_as::<_, SessionRow>(SQL_LOAD_LIVE_SESSION)
        .bind(token)
        .fetch_optional(pool)
        .await
}

pub async fn delete_session(pool: &SqlitePool, token: &str) -> sqlx::Result<u64> {
    let res = sqlx::query(SQL_DELETE_SESSION)
        .bind(token)
        .execute(pool)
        .await?;
    Ok(res.rows_affected())
}

pub async fn delete_expired(pool: &SqlitePool) -> sqlx::Result<u64> {
    let res = sqlx::query(SQL_DELETE_EXPIRED).execute(pool).await?;
    Ok(res.rows_affected())
}
