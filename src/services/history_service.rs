use serde::Serialize;
use sqlx::SqlitePool;

use crate::database::history_repo;

const DEFAULT_RANKING_LIMIT: i64 = 50;
const MAX_RANKING_LIMIT: i64 = 500;

#[derive(Debug, Serialize)]
pub struct AttendanceEntry {
    pub rank: usize,
    pub name: String,
    pub confirmations: i64,
    pub last_confirmed_at: String,
}

/// Most frequent attendees first. Names are grouped by their Unicode-lowercased key.
pub async fn attendance_ranking(
    pool: &SqlitePool,
    tenant_id: &str,
    limit: Option<i64>,
) -> sqlx::Result<Vec<AttendanceEntry>> {
    let limit = limit
        .unwrap_or(DEFAULT_RANKING_LIMIT)
        .clamp(1, MAX_RANKING_LIMIT);
    let rows = history_repo::attendance_ranking(pool, tenant_id, limit).await?;
    Ok(rows
        .into_iter()
        .enumerate()
        .map(|(i, row)| AttendanceEntry {
            rank: i + 1,
            name: row.name,
            confirmations: row.confirmations,
            last_confirmed_at: row.last_confirmed_at,
        })
        .collect())
}
