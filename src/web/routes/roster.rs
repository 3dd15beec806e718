use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Serialize;
use serde_json::{json, Value};

use crate::models::Participant;
use crate::services::admission_service::{Admission, ConfirmRequest};
use crate::services::team_draw_service::CAPACITY;
use crate::web::error::AppError;
use crate::web::middleware::auth::AuthenticatedUser;
use crate::web::state::AppState;

#[derive(Debug, Serialize)]
pub struct RosterResponse {
    pub capacity: usize,
    pub confirmed: Vec<Participant>,
    pub waitlist: Vec<Participant>,
}

pub async fn confirm_handler(
    Extension(auth_user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
    Json(request): Json<ConfirmRequest>,
) -> Result<(StatusCode, Json<Admission>), AppError> {
    let admission = state.ledger.confirm(auth_user.tenant_id(), &request).await?;
    Ok((StatusCode::CREATED, Json(admission)))
}

pub async fn list_handler(
    Extension(auth_user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
) -> Result<Json<RosterResponse>, AppError> {
    let roster = state.ledger.list(auth_user.tenant_id()).await?;
    Ok(Json(RosterResponse {
        capacity: CAPACITY,
        confirmed: roster.confirmed,
        waitlist: roster.waitlist,
    }))
}

pub async fn remove_handler(
    Extension(auth_user): Extension<AuthenticatedUser>,
    Path(participant_id): Path<String>,
    State(state): State<AppState>,
) -> Result<StatusCode, AppError> {
    auth_user.require_manager()?;
    state
        .ledger
        .remove(auth_user.tenant_id(), &participant_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn clear_handler(
    Extension(auth_user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
) -> Result<Json<Value>, AppError> {
    auth_user.require_manager()?;
    let removed = state.ledger.clear(auth_user.tenant_id()).await?;
    Ok(Json(json!({ "removed": removed })))
}
