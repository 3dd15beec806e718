use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::services::admission_service::AdmissionError;
use crate::services::session_service::SessionError;
use crate::services::tenant_service::TenantError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Admission(#[from] AdmissionError),
    #[error(transparent)]
    Tenant(#[from] TenantError),
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error("unauthorized - please sign in")]
    Unauthorized,
    #[error("{0}")]
    Forbidden(&'static str),
    #[error("store failed: {0}")]
    Store(#[from] sqlx::Error),
    #[error("template failed: {0}")]
    Template(#[from] askama::Error),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Admission(e) => match e {
                AdmissionError::Validation(_) => StatusCode::BAD_REQUEST,
                AdmissionError::DuplicateName(_) => StatusCode::CONFLICT,
                AdmissionError::CapacityExceeded { .. } => StatusCode::CONFLICT,
                AdmissionError::NotFound(_) => StatusCode::NOT_FOUND,
                AdmissionError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            AppError::Tenant(e) => match e {
                TenantError::Unknown(_) => StatusCode::UNAUTHORIZED,
                TenantError::Inactive(_) | TenantError::Expired(_) => StatusCode::PAYMENT_REQUIRED,
                TenantError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            AppError::Session(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::Store(_) | AppError::Template(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = if status.is_server_error() {
            error!("Request failed: {}", self);
            "internal error".to_string()
        } else {
            self.to_string()
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}
