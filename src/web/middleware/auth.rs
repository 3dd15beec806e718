use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use cookie::Cookie;
use tracing::warn;

use crate::models::Principal;
use crate::services::tenant_service::{self, ActiveTenant};
use crate::web::error::AppError;
use crate::web::state::AppState;

pub const ACCESS_TOKEN_COOKIE: &str = "access_token";

#[derive(Clone, Debug)]
pub struct AuthenticatedUser {
    pub principal: Principal,
    pub tenant: ActiveTenant,
}

impl AuthenticatedUser {
    pub fn tenant_id(&self) -> &str {
        &self.principal.tenant_id
    }

    pub fn require_manager(&self) -> Result<(), AppError> {
        if self.principal.role.can_manage_roster() {
            Ok(())
        } else {
            Err(AppError::Forbidden("only tenant admins can change the roster"))
        }
    }
}

/// Bearer header first, `access_token` cookie second.
fn extract_token(request: &Request) -> Option<String> {
    let headers = request.headers();
    let bearer = headers
        .get(header::AUTHORIZATION)
        .and_then(|hv| hv.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty());
    if bearer.is_some() {
        return bearer;
    }

    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|hv| hv.to_str().ok())
        .flat_map(|raw| Cookie::split_parse(raw.to_string()))
        .filter_map(Result::ok)
        .find(|c| c.name() == ACCESS_TOKEN_COOKIE)
        .map(|c| c.value().to_string())
        .filter(|t| !t.is_empty())
}

pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let Some(token) = extract_token(&request) else {
        return Err(AppError::Unauthorized);
    };

    let Some(principal) = state.sessions.resolve(&token).await? else {
        return Err(AppError::Unauthorized);
    };

    let tenant = match tenant_service::load_active_tenant(&state.pool, &principal.tenant_id).await
    {
        Ok(t) => t,
        Err(e) => {
            warn!(tenant_id = %principal.tenant_id, "Tenant gate refused request: {}", e);
            return Err(e.into());
        }
    };

    request
        .extensions_mut()
        .insert(AuthenticatedUser { principal, tenant });

    Ok(next.run(request).await)
}
