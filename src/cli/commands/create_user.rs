use anyhow::{Result, anyhow};
use common::SignupForm;
use sea_orm::Database;
use tracing::{debug, error, info, trace};

use crate::services::{ServiceError, accounts};

/// Creates an account with the same validation as the signup page.
pub async fn create_user(database_url: &str, username: String, email: String, password: String) -> Result<()> {
    trace!("Entering create_user function");
    debug!("Database URL: {}", database_url);

    let db = match Database::connect(database_url).await {
        Ok(connection) => connection,
        Err(e) => {
            error!("Failed to connect to database '{}': {}", database_url, e);
            return Err(e.into());
        }
    };

    let form = SignupForm { username, email, password };
    match accounts::signup(&db, form).await {
        Ok(user) => {
            info!("Created user '{}' with ID {}", user.username, user.id);
            Ok(())
        }
        Err(ServiceError::Validation(errors)) => {
            error!("Invalid user details: {}", errors);
            Err(anyhow!("invalid user details: {errors}"))
        }
        Err(e) => {
            error!("Failed to create user: {}", e);
            Err(e.into())
        }
    }
}
