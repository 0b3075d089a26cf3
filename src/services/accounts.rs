use argon2::{
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
    password_hash::{SaltString, rand_core::OsRng},
};
use chrono::Utc;
use common::{FormErrors, SignupForm};
use model::entities::user;
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set, SqlErr};
use tracing::{debug, error, info, instrument, trace, warn};

use super::{ServiceError, ServiceResult};

pub const USERNAME_TAKEN: &str = "A user with that username already exists.";

/// Registers a new user with an Argon2 password hash.
#[instrument(skip(db, form), fields(username = %form.username))]
pub async fn signup(db: &DatabaseConnection, form: SignupForm) -> ServiceResult<user::Model> {
    trace!("Validating signup form");
    let input = form.parse()?;

    let existing = user::Entity::find_by_username(&input.username).one(db).await?;
    if existing.is_some() {
        warn!("Signup rejected, username '{}' is taken", input.username);
        return Err(FormErrors::single("username", USERNAME_TAKEN).into());
    }

    let password_hash = hash_password(&input.password)?;
    let new_user = user::ActiveModel {
        username: Set(input.username.clone()),
        email: Set(input.email),
        password_hash: Set(password_hash),
        date_joined: Set(Utc::now()),
        ..Default::default()
    };

    match new_user.insert(db).await {
        Ok(user) => {
            info!("Created user '{}' with ID {}", user.username, user.id);
            Ok(user)
        }
        Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
            warn!("Username '{}' was taken concurrently", input.username);
            Err(FormErrors::single("username", USERNAME_TAKEN).into())
        }
        Err(e) => {
            error!("Failed to create user '{}': {}", input.username, e);
            Err(e.into())
        }
    }
}

/// Checks a username/password pair. Unknown users and wrong passwords
/// yield the same error.
#[instrument(skip(db, password))]
pub async fn authenticate(
    db: &DatabaseConnection,
    username: &str,
    password: &str,
) -> ServiceResult<user::Model> {
    let Some(user) = user::Entity::find_by_username(username.trim()).one(db).await? else {
        debug!("Login attempt for unknown user");
        // Same Argon2 cost as a wrong password, so response time does not
        // reveal which usernames exist.
        let _ = hash_password(password);
        return Err(ServiceError::InvalidCredentials);
    };

    verify_password(password, &user.password_hash)?;
    info!("User '{}' authenticated", user.username);
    Ok(user)
}

fn hash_password(password: &str) -> ServiceResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| {
            error!("Password hashing failed: {}", e);
            ServiceError::PasswordHash
        })
}

fn verify_password(password: &str, hash: &str) -> ServiceResult<()> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| ServiceError::InvalidCredentials)?;

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| ServiceError::InvalidCredentials)
}
