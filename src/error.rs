use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use common::FormErrors;
use sea_orm::DbErr;
use thiserror::Error;
use tracing::{error, warn};

use crate::schemas::ErrorResponse;
use crate::services::ServiceError;

/// Errors that end a request with an error body instead of a view model.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    NotFound(String),
    #[error("invalid request: {0}")]
    BadRequest(String),
    #[error("validation failed: {0}")]
    Validation(FormErrors),
    #[error("invalid credentials")]
    Unauthorized,
    #[error("database error: {0}")]
    Database(#[from] DbErr),
    #[error("session error: {0}")]
    Session(#[from] tower_sessions::session::Error),
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<ServiceError> for AppError {
    fn from(error: ServiceError) -> Self {
        match error {
            ServiceError::NotFound { entity, id } => {
                Self::NotFound(format!("{entity} with ID {id} not found"))
            }
            ServiceError::Validation(errors) => Self::Validation(errors),
            ServiceError::Scan(rejection) => Self::BadRequest(rejection.message().to_string()),
            ServiceError::InvalidCredentials => Self::Unauthorized,
            ServiceError::PasswordHash => Self::Internal("password hashing failed".to_string()),
            ServiceError::Database(db_error) => Self::Database(db_error),
        }
    }
}

impl AppError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            Self::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            Self::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            Self::Validation(_) => (StatusCode::UNPROCESSABLE_ENTITY, "VALIDATION_ERROR"),
            Self::Unauthorized => (StatusCode::UNAUTHORIZED, "INVALID_CREDENTIALS"),
            Self::Database(_) => (StatusCode::INTERNAL_SERVER_ERROR, "DATABASE_ERROR"),
            Self::Session(_) => (StatusCode::INTERNAL_SERVER_ERROR, "SESSION_ERROR"),
            Self::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        // Internal details stay in the log.
        let message = if status.is_server_error() {
            error!("Request failed: {}", self);
            "Internal server error".to_string()
        } else {
            warn!("Request rejected: {}", self);
            self.to_string()
        };

        let body = ErrorResponse {
            error: message,
            code: code.to_string(),
            success: false,
        };
        (status, Json(body)).into_response()
    }
}
