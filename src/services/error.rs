use common::{FormErrors, ScanRejection};
use sea_orm::DbErr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("validation failed: {0}")]
    Validation(FormErrors),

    #[error("{entity} with ID {id} not found")]
    NotFound { entity: &'static str, id: i32 },

    #[error("barcode scan rejected: {0}")]
    Scan(ScanRejection),

    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("failed to hash password")]
    PasswordHash,

    #[error("database error: {0}")]
    Database(#[from] DbErr),
}

impl From<FormErrors> for ServiceError {
    fn from(errors: FormErrors) -> Self {
        Self::Validation(errors)
    }
}

impl From<ScanRejection> for ServiceError {
    fn from(rejection: ScanRejection) -> Self {
        Self::Scan(rejection)
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;
