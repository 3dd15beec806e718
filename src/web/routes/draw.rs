use axum::{
    extract::State,
    response::{IntoResponse, Response},
    Extension, Json,
};
use serde::Serialize;
use tracing::info;

use crate::services::share_service::{self, ShareExport};
use crate::services::team_draw_service::{self, Team};
use crate::web::error::AppError;
use crate::web::middleware::auth::AuthenticatedUser;
use crate::web::state::AppState;

#[derive(Serialize)]
struct DrawResponse<'a> {
    confirmed_count: usize,
    teams: &'a [Team<'a>],
    share: ShareExport,
}

/// Share target for a tenant: its own number, else the deployment default.
pub fn share_number<'a>(auth_user: &'a AuthenticatedUser, state: &'a AppState) -> Option<&'a str> {
    auth_user
        .tenant
        .whatsapp_number
        .as_deref()
        .or(state.share_phone.as_deref())
}

pub async fn draw_handler(
    Extension(auth_user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
) -> Result<Response, AppError> {
    let roster = state.ledger.list(auth_user.tenant_id()).await?;
    let draw = team_draw_service::draw(&roster.confirmed);
    let share = share_service::export(
        &draw,
        &state.session_title,
        share_number(&auth_user, &state),
    );

    info!(
        tenant_id = %auth_user.tenant_id(),
        confirmed = roster.confirmed.len(),
        open_slots = draw.open_slots(),
        "teams drawn"
    );

    Ok(Json(DrawResponse {
        confirmed_count: roster.confirmed.len(),
        teams: &draw.teams,
        share,
    })
    .into_response())
}
