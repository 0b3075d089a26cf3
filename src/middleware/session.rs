//! Session layer configuration.
//!
//! Sessions live in an in-process store; a restart logs everyone out.

use tower_sessions::cookie::{SameSite, time::Duration};
use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer};

use crate::config::Settings;

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "supplychain_session";

/// Create the session layer backed by a fresh in-memory store.
#[must_use]
pub fn create_session_layer(settings: &Settings) -> SessionManagerLayer<MemoryStore> {
    SessionManagerLayer::new(MemoryStore::default())
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(Duration::days(
            settings.session_expiry_days,
        )))
        .with_secure(settings.session_secure)
        .with_same_site(SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
}
