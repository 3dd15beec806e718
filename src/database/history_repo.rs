use sqlx::{SqliteConnection, SqlitePool};

use crate::models::AttendanceRow;

const SQL_INSERT_HISTORY: &str = r#"
INSERT INTO confirmation_history (
  tenant_id,
  name,
  name_key,
  category,
  gender,
  confirmed_at
) VALUES (?, ?, ?, ?, ?, ?)
"#;

const SQL_ATTENDANCE_RANKING: &str = r#"
SELECT
  MAX(name) AS name,
  COUNT(*) AS confirmations,
  MAX(confirmed_at) AS last_confirmed_at
FROM confirmation_history
WHERE tenant_id = ?1
GROUP BY name_key
ORDER BY confirmations DESC, name_key ASC
LIMIT ?2
"#;

pub struct NewHistoryEntry<'a> {
    pub tenant_id: &'a str,
    pub name: &'a str,
    pub name_key: &'a str,
    pub category: &'a str,
    pub gender: Option<&'a str>,
    pub confirmed_at: &'a str,
}

pub async fn insert_history_entry(
    conn: &mut SqliteConnection,
    entry: NewHistoryEntry<'_>,
) -> sqlx::Result<u64> {
    let res = sqlx::query(SQL_INSERT_HISTORY)
        .bind(entry.tenant_id)
        .bind(entry.name)
        .bind(entry.name_key)
        .bind(entry.category)
        .bind(entry.gender)
        .bind(entry.confirmed_at)
        .execute(conn)
        .await?;
    Ok(res.rows_affected())
}

pub async fn attendance_ranking(
    pool: &SqlitePool,
    tenant_id: &str,
    limit: i64,
) -> sqlx::Result<Vec<AttendanceRow>> {
    sqlx::query_as::<_, AttendanceRow>(SQL_ATTENDANCE_RANKING)
        .bind(tenant_id)
        .bind(limit)
        .fetch_all(pool)
        .await
}
