use askama::Template;
use axum::{extract::State, response::Html, Extension};

use crate::models::{Category, Participant};
use crate::services::team_draw_service::{self, Slot, CAPACITY};
use crate::services::share_service;
use crate::web::error::AppError;
use crate::web::middleware::auth::AuthenticatedUser;
use crate::web::routes::draw::share_number;
use crate::web::state::AppState;

const BUILD_ID: &str = env!("VOLLEY_BUILD_ID");

pub struct ParticipantView {
    pub position: usize,
    pub id: String,
    pub name: String,
    pub category_label: &'static str,
    pub gender_label: &'static str,
}

fn participant_view(position: usize, p: &Participant) -> ParticipantView {
    ParticipantView {
        position,
        id: p.id.clone(),
        name: p.name.clone(),
        category_label: match p.category {
            Category::Monthly => "M",
            Category::Casual => "C",
        },
        gender_label: p.gender.as_str(),
    }
}

#[derive(Template)]
#[template(path = "lineup.html")]
pub struct LineupTemplate {
    pub title: String,
    pub tenant_name: String,
    pub capacity: usize,
    pub confirmed: Vec<ParticipantView>,
    pub waitlist: Vec<ParticipantView>,
    pub can_manage: bool,
    pub build_id: &'static str,
}

pub async fn lineup_page(
    Extension(auth_user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
) -> Result<Html<String>, AppError> {
    let roster = state.ledger.list(auth_user.tenant_id()).await?;
    let confirmed: Vec<ParticipantView> = roster
        .confirmed
        .iter()
        .enumerate()
        .map(|(i, p)| participant_view(i + 1, p))
        .collect();
    let waitlist = roster
        .waitlist
        .iter()
        .enumerate()
        .map(|(i, p)| participant_view(CAPACITY + i + 1, p))
        .collect();

    let template = LineupTemplate {
        title: state.session_title.clone(),
        tenant_name: auth_user.tenant.name.clone(),
        capacity: CAPACITY,
        confirmed,
        waitlist,
        can_manage: auth_user.principal.role.can_manage_roster(),
        build_id: BUILD_ID,
    };
    Ok(Html(template.render()?))
}

pub struct TeamView {
    pub number: usize,
    pub entries: Vec<String>,
}

#[derive(Template)]
#[template(path = "draw.html")]
pub struct DrawTemplate {
    pub title: String,
    pub teams: Vec<TeamView>,
    pub share_link: String,
    pub build_id: &'static str,
}

pub async fn draw_page(
    Extension(auth_user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
) -> Result<Html<String>, AppError> {
    let roster = state.ledger.list(auth_user.tenant_id()).await?;
    let draw = team_draw_service::draw(&roster.confirmed);
    let share = share_service::export(
        &draw,
        &state.session_title,
        share_number(&auth_user, &state),
    );

    let teams = draw
        .teams
        .iter()
        .map(|team| TeamView {
            number: team.number,
            entries: team
                .slots
                .iter()
                .map(|slot| match slot {
                    Slot::Player(p) => format!("{} ({})", p.name, p.gender.as_str()),
                    Slot::Open => "Open slot".to_string(),
                })
                .collect(),
        })
        .collect();

    let template = DrawTemplate {
        title: state.session_title.clone(),
        teams,
        share_link: share.link,
        build_id: BUILD_ID,
    };
    Ok(Html(template.render()?))
}
