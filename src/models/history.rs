use serde::Serialize;

// Aggregated attendance per name over the append-only history log.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct AttendanceRow {
    pub name: String,
    pub confirmations: i64,
    pub last_confirmed_at: String,
}
