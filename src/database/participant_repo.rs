use sqlx::SqliteConnection;

use crate::models::ParticipantRow;

const SQL_FIND_ID_BY_NAME: &str = r#"
SELECT id
FROM participants
WHERE tenant_id = ?1
  AND name_key = ?2
LIMIT 1
"#;

const SQL_COUNT_ACTIVE: &str = r#"
SELECT COUNT(*)
FROM participants
WHERE tenant_id = ?1
"#;

const SQL_INSERT_PARTICIPANT: &str = r#"
INSERT INTO participants (
  id,
  tenant_id,
  name,
  name_key,
  category,
  gender
) VALUES (?, ?, ?, ?, ?, ?)
RETURNING id, seq, name, category, gender, confirmed_at
"#;

const SQL_POSITION_OF: &str = r#"
SELECT COUNT(*)
FROM participants
WHERE tenant_id = ?1
  AND (confirmed_at < ?2 OR (confirmed_at = ?2 AND seq <= ?3))
"#;

const SQL_LIST_ORDERED: &str = r#"
SELECT id, seq, name, category, gender, confirmed_at
FROM participants
WHERE tenant_id = ?1
ORDER BY confirmed_at ASC, seq ASC
"#;

const SQL_DELETE_BY_ID: &str = r#"
DELETE FROM participants
WHERE tenant_id = ?1
  AND id = ?2
"#;

const SQL_DELETE_ALL: &str = r#"
DELETE FROM participants
WHERE tenant_id = ?1
"#;

pub struct NewParticipant<'a> {
    pub id: &'a str,
    pub tenant_id: &'a str,
    pub name: &'a str,
    pub name_key: &'a str,
    pub category: &'a str,
    pub gender: Option<&'a str>,
}

/// Looks up a record by [`name_key`](crate::models::name_key).
pub async fn find_id_by_name(
    conn: &mut SqliteConnection,
    tenant_id: &str,
    name_key: &str,
) -> sqlx::Result<Option<String>> {
    sqlx::query_scalar::<_, String>(SQL_FIND_ID_BY_NAME)
        .bind(tenant_id)
        .bind(name_key)
        .fetch_optional(conn)
        .await
}

pub async fn count_active(conn: &mut SqliteConnection, tenant_id: &str) -> sqlx::Result<i64> {
    sqlx::query_scalar::<_, i64>(SQL_COUNT_ACTIVE)
        .bind(tenant_id)
        .fetch_one(conn)
        .await
}

pub async fn insert_participant(
    conn: &mut SqliteConnection,
    new: NewParticipant<'_>,
) -> sqlx::Result<ParticipantRow> {
    sqlx::query_as::<_, ParticipantRow>(SQL_INSERT_PARTICIPANT)
        .bind(new.id)
        .bind(new.tenant_id)
        .bind(new.name)
        .bind(new.name_key)
        .bind(new.category)
        .bind(new.gender)
        .fetch_one(conn)
        .await
}

/// 1-based rank of `row` in the tenant's arrival order.
pub async fn position_of(
    conn: &mut SqliteConnection,
    tenant_id: &str,
    row: &ParticipantRow,
) -> sqlx::Result<i64> {
    sqlx::query_scalar::<_, i64>(SQL_POSITION_OF)
        .bind(tenant_id)
        .bind(&row.confirmed_at)
        .bind(row.seq)
        .fetch_one(conn)
        .await
}

pub async fn list_ordered(
    conn: &mut SqliteConnection,
    tenant_id: &str,
) -> sqlx::Result<Vec<ParticipantRow>> {
    sqlx::query_as::<_, ParticipantRow>(SQL_LIST_ORDERED)
        .bind(tenant_id)
        .fetch_all(conn)
        .await
}

pub async fn delete_by_id(
    conn: &mut SqliteConnection,
    tenant_id: &str,
    id: &str,
) -> sqlx::Result<u64> {
    let res = sqlx::query(SQL_DELETE_BY_ID)
        .bind(tenant_id)
        .bind(id)
        .execute(conn)
        .await?;
    Ok(res.rows_affected())
}

pub async fn delete_all(conn: &mut SqliteConnection, tenant_id: &str) -> sqlx::Result<u64> {
    let res = sqlx::query(SQL_DELETE_ALL)
        .bind(tenant_id)
        .execute(conn)
        .await?;
    Ok(res.rows_affected())
}
