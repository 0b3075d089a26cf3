use anyhow::Result;
use config::{Config, Environment, File};
use sea_orm::Database;
use serde::Deserialize;
use tracing::{debug, info, trace};

use crate::schemas::AppState;

pub const DEFAULT_DATABASE_URL: &str = "sqlite://supplychain.db?mode=rwc";
pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:3000";
const DEFAULT_SESSION_EXPIRY_DAYS: i64 = 14;

/// Runtime settings, layered as defaults, `config/default.toml`, then
/// `SUPPLYCHAIN__*` environment variables.
#[derive(Clone, Debug, Deserialize)]
pub struct Settings {
    pub database_url: String,
    pub bind_address: String,
    /// Marks the session cookie `Secure`; enable behind TLS.
    pub session_secure: bool,
    /// Sessions expire after this many days without a request.
    pub session_expiry_days: i64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            bind_address: DEFAULT_BIND_ADDRESS.to_string(),
            session_secure: false,
            session_expiry_days: DEFAULT_SESSION_EXPIRY_DAYS,
        }
    }
}

impl Settings {
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();

        let settings = Config::builder()
            .set_default("database_url", DEFAULT_DATABASE_URL)?
            .set_default("bind_address", DEFAULT_BIND_ADDRESS)?
            .set_default("session_secure", false)?
            .set_default("session_expiry_days", DEFAULT_SESSION_EXPIRY_DAYS)?
            .add_source(File::with_name("config/default").required(false))
            .add_source(Environment::with_prefix("SUPPLYCHAIN").separator("__"))
            .build()?
            .try_deserialize::<Settings>()?;

        debug!("Loaded settings: {:?}", settings);
        Ok(settings)
    }

    /// Applies command line overrides on top of the loaded settings.
    pub fn with_overrides(mut self, database_url: Option<String>, bind_address: Option<String>) -> Self {
        if let Some(database_url) = database_url {
            self.database_url = database_url;
        }
        if let Some(bind_address) = bind_address {
            self.bind_address = bind_address;
        }
        self
    }
}

/// Connects to the configured database and builds the shared state.
pub async fn initialize_app_state(settings: Settings) -> Result<AppState> {
    trace!("Initializing application state");
    info!("Connecting to database: {}", settings.database_url);
    let db = Database::connect(&settings.database_url).await?;
    debug!("Database connection established");

    Ok(AppState { db, settings })
}
