//! Session and authentication plumbing shared by every handler.

mod auth;
mod session;

pub use auth::{
    AuthRejection, CurrentUser, LOGIN_PATH, OptionalAuth, RequireAuth, clear_current_user,
    set_current_user,
};
pub use session::{SESSION_COOKIE_NAME, create_session_layer};
