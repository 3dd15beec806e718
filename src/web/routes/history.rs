use axum::{
    extract::{Query, State},
    Extension, Json,
};
use serde::Deserialize;

use crate::services::history_service::{self, AttendanceEntry};
use crate::web::error::AppError;
use crate::web::middleware::auth::AuthenticatedUser;
use crate::web::state::AppState;

#[derive(Debug, Deserialize, Default)]
pub struct RankingQuery {
    pub limit: Option<i64>,
}

pub async fn ranking_handler(
    Extension(auth_user): Extension<AuthenticatedUser>,
    Query(query): Query<RankingQuery>,
    State(state): State<AppState>,
) -> Result<Json<Vec<AttendanceEntry>>, AppError> {
    let ranking =
        history_service::attendance_ranking(&state.pool, auth_user.tenant_id(), query.limit)
            .await?;
    Ok(Json(ranking))
}
