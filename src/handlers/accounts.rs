use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Redirect, Response},
    Form,
};
use common::{FormErrors, LoginForm, SignupForm};
use model::entities::user;
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::{debug, info, instrument, warn};
use utoipa::{IntoParams, ToSchema};

use crate::error::AppError;
use crate::middleware::{CurrentUser, LOGIN_PATH, OptionalAuth, clear_current_user, set_current_user};
use crate::schemas::{ApiResponse, AppState, ErrorResponse};
use crate::services::{ServiceError, accounts};

pub const DASHBOARD_PATH: &str = "/dashboard/";
const INVALID_CREDENTIALS: &str = "Invalid credentials";

#[derive(Debug, Deserialize, IntoParams)]
pub struct NextQuery {
    /// Local path to return to after logging in
    pub next: Option<String>,
}

/// Landing page
#[derive(Debug, Serialize, ToSchema)]
pub struct HomeView {
    pub authenticated: bool,
    pub username: Option<String>,
}

/// Login page
#[derive(Debug, Serialize, ToSchema)]
pub struct LoginView {
    pub username: String,
    pub next: Option<String>,
    /// Set after a failed attempt
    pub error: Option<String>,
}

/// Signup page
#[derive(Debug, Serialize, ToSchema)]
pub struct SignupView {
    pub username: String,
    pub email: String,
    #[schema(value_type = Option<Object>)]
    pub errors: Option<FormErrors>,
}

/// Only same-site absolute paths are followed after login.
fn safe_next(next: Option<&str>) -> Option<&str> {
    next.map(str::trim).filter(|next| {
        next.starts_with('/') && !next.starts_with("//") && !next.contains('\\')
    })
}

fn session_user(user: &user::Model) -> CurrentUser {
    CurrentUser {
        id: user.id,
        username: user.username.clone(),
    }
}

/// Landing page
#[utoipa::path(
    get,
    path = "/",
    tag = "accounts",
    responses((status = 200, description = "Landing page", body = HomeView))
)]
#[instrument(skip_all)]
pub async fn home(OptionalAuth(user): OptionalAuth) -> Json<ApiResponse<HomeView>> {
    Json(ApiResponse::ok(HomeView {
        authenticated: user.is_some(),
        username: user.map(|u| u.username),
    }))
}

/// Login form
#[utoipa::path(
    get,
    path = "/login/",
    tag = "accounts",
    params(NextQuery),
    responses((status = 200, description = "Login form", body = LoginView))
)]
#[instrument]
pub async fn login_page(Query(query): Query<NextQuery>) -> Json<ApiResponse<LoginView>> {
    Json(ApiResponse::ok(LoginView {
        username: String::new(),
        next: safe_next(query.next.as_deref()).map(str::to_string),
        error: None,
    }))
}

/// Log in
#[utoipa::path(
    post,
    path = "/login/",
    tag = "accounts",
    request_body(content = LoginForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Logged in; redirect to `next` or the dashboard"),
        (status = 401, description = "Invalid credentials", body = LoginView),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state, session))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Result<Response, AppError> {
    match accounts::authenticate(&state.db, &form.username, &form.password).await {
        Ok(user) => {
            set_current_user(&session, &session_user(&user)).await?;
            let target = safe_next(form.next.as_deref()).unwrap_or(DASHBOARD_PATH);
            info!("User {} logged in, redirecting to {}", user.id, target);
            Ok(Redirect::to(target).into_response())
        }
        Err(ServiceError::InvalidCredentials) => {
            warn!("Failed login for '{}'", form.username);
            let view = LoginView {
                username: form.username.trim().to_string(),
                next: safe_next(form.next.as_deref()).map(str::to_string),
                error: Some(INVALID_CREDENTIALS.to_string()),
            };
            let body = ApiResponse {
                data: view,
                message: INVALID_CREDENTIALS.to_string(),
                success: false,
            };
            Ok((StatusCode::UNAUTHORIZED, Json(body)).into_response())
        }
        Err(e) => Err(e.into()),
    }
}

/// Signup form
#[utoipa::path(
    get,
    path = "/signup/",
    tag = "accounts",
    responses((status = 200, description = "Signup form", body = SignupView))
)]
#[instrument]
pub async fn signup_page() -> Json<ApiResponse<SignupView>> {
    Json(ApiResponse::ok(SignupView {
        username: String::new(),
        email: String::new(),
        errors: None,
    }))
}

/// Create an account and log it in
#[utoipa::path(
    post,
    path = "/signup/",
    tag = "accounts",
    request_body(content = SignupForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Account created; redirect to the dashboard"),
        (status = 422, description = "Invalid signup data", body = SignupView),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state, session))]
pub async fn signup(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<SignupForm>,
) -> Result<Response, AppError> {
    let username = form.username.trim().to_string();
    let email = form.email.trim().to_string();

    match accounts::signup(&state.db, form).await {
        Ok(user) => {
            set_current_user(&session, &session_user(&user)).await?;
            info!("User {} signed up and logged in", user.id);
            Ok(Redirect::to(DASHBOARD_PATH).into_response())
        }
        Err(ServiceError::Validation(errors)) => {
            debug!("Signup rejected: {}", errors);
            let view = SignupView {
                username,
                email,
                errors: Some(errors),
            };
            Ok((StatusCode::UNPROCESSABLE_ENTITY, Json(ApiResponse::invalid(view))).into_response())
        }
        Err(e) => Err(e.into()),
    }
}

/// Log out
#[utoipa::path(
    post,
    path = "/logout/",
    tag = "accounts",
    responses((status = 303, description = "Session ended; redirect to the login page"))
)]
#[instrument(skip(session))]
pub async fn logout(session: Session) -> Result<Redirect, AppError> {
    clear_current_user(&session).await?;
    debug!("Session flushed");
    Ok(Redirect::to(LOGIN_PATH))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_local_paths_are_followed() {
        assert_eq!(safe_next(Some("/goods/")), Some("/goods/"));
        assert_eq!(safe_next(Some("/search/?q=cola")), Some("/search/?q=cola"));
        assert_eq!(safe_next(Some("https://evil.example/")), None);
        assert_eq!(safe_next(Some("//evil.example/")), None);
        assert_eq!(safe_next(Some("/\\evil.example")), None);
        assert_eq!(safe_next(None), None);
    }
}
