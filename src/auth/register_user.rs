//! Handles registering new users.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    http::StatusCode,
};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::{
    AppState, Error,
    auth::{Email, PasswordHash, UserData, create_user},
    json::Json,
};

/// The state needed to register a user.
#[derive(Debug, Clone)]
pub struct RegistrationState {
    /// The database connection for storing users.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The bcrypt cost used to hash new passwords.
    pub password_hash_cost: u32,
}

impl FromRef<AppState> for RegistrationState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            password_hash_cost: PasswordHash::DEFAULT_COST,
        }
    }
}

/// The data sent by the client to create an account.
#[derive(Clone, Serialize, Deserialize)]
pub struct RegisterData {
    /// The email address the user will log in with.
    pub email: String,
    /// The raw password, checked for strength before it is hashed.
    pub password: String,
}

/// Create a new user and respond with their ID and email.
///
/// The user still has to log in afterwards.
///
/// # Errors
///
/// Responds with:
/// - [Error::InvalidEmail] if the email is malformed.
/// - [Error::TooWeak] if the password is too easy to guess.
/// - [Error::DuplicateEmail] if the email is already registered.
pub async fn register_user(
    State(state): State<RegistrationState>,
    Json(data): Json<RegisterData>,
) -> Result<(StatusCode, Json<UserData>), Error> {
    let email = Email::new(&data.email)?;
    let password_hash = PasswordHash::from_raw_password(
        &data.password,
        &[email.as_ref()],
        state.password_hash_cost,
    )?;

    let connection = state.db_connection.lock().map_err(|error| {
        tracing::error!("could not acquire database lock: {error}");
        Error::DatabaseLockError
    })?;

    let user = create_user(email, password_hash, &connection)?;
    tracing::info!("Registered user {}", user.id);

    Ok((StatusCode::CREATED, Json(UserData::from(&user))))
}
