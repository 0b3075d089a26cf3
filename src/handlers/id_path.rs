//! Numeric `:id` path segment.

use axum::{
    async_trait,
    extract::{FromRequestParts, Path, rejection::PathRejection},
    http::request::Parts,
};
use tracing::debug;

use crate::error::AppError;

/// The `:id` of a row. A segment that is not an integer cannot name any
/// row, so it is answered like a missing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdPath(pub i32);

#[async_trait]
impl<S> FromRequestParts<S> for IdPath
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Path::<i32>::from_request_parts(parts, state).await {
            Ok(Path(id)) => Ok(Self(id)),
            Err(PathRejection::FailedToDeserializePathParams(e)) => {
                debug!("Unparseable id in {}: {}", parts.uri.path(), e);
                Err(AppError::NotFound(format!("No row matches {}", parts.uri.path())))
            }
            Err(e) => Err(AppError::Internal(e.to_string())),
        }
    }
}
