//! Authentication extractors.
//!
//! Handlers receive the logged in user as an explicit value and pass its id
//! into every service call.

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Redirect, Response},
};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::{debug, warn};
use utoipa::ToSchema;

pub const LOGIN_PATH: &str = "/login/";
const CURRENT_USER_KEY: &str = "current_user";

/// The user owning the current session.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CurrentUser {
    pub id: i32,
    pub username: String,
}

/// Extractor that requires a logged in user.
pub struct RequireAuth(pub CurrentUser);

/// Rejection of [`RequireAuth`].
#[derive(Debug)]
pub enum AuthRejection {
    /// Not logged in; carries the login URL with `next` set.
    RedirectToLogin(String),
    /// The session layer is missing from the router.
    SessionUnavailable,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        match self {
            Self::RedirectToLogin(location) => Redirect::to(&location).into_response(),
            Self::SessionUnavailable => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
        }
    }
}

/// `/login/?next=<path>` for the request being rejected.
fn login_redirect(parts: &Parts) -> String {
    let next = parts
        .uri
        .path_and_query()
        .map_or_else(|| parts.uri.path(), |pq| pq.as_str());
    match serde_urlencoded::to_string(&[("next", next)]) {
        Ok(query) => format!("{LOGIN_PATH}?{query}"),
        Err(_) => LOGIN_PATH.to_string(),
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for RequireAuth
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let session = parts.extensions.get::<Session>().ok_or_else(|| {
            warn!("Session layer missing on {}", parts.uri.path());
            AuthRejection::SessionUnavailable
        })?;

        let user: Option<CurrentUser> = session.get(CURRENT_USER_KEY).await.ok().flatten();
        match user {
            Some(user) => Ok(Self(user)),
            None => {
                debug!("Anonymous request to {}, redirecting to login", parts.uri.path());
                Err(AuthRejection::RedirectToLogin(login_redirect(parts)))
            }
        }
    }
}

/// Extractor that optionally gets the current user.
pub struct OptionalAuth(pub Option<CurrentUser>);

#[async_trait]
impl<S> FromRequestParts<S> for OptionalAuth
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = match parts.extensions.get::<Session>() {
            Some(session) => session
                .get::<CurrentUser>(CURRENT_USER_KEY)
                .await
                .ok()
                .flatten(),
            None => None,
        };

        Ok(Self(user))
    }
}

/// Logs `user` into `session`, issuing a new session id first.
pub async fn set_current_user(
    session: &Session,
    user: &CurrentUser,
) -> Result<(), tower_sessions::session::Error> {
    session.cycle_id().await?;
    session.insert(CURRENT_USER_KEY, user).await
}

/// Ends the session entirely, flash messages included.
pub async fn clear_current_user(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session.flush().await
}
