//! The state shared by the handlers that work on a user's banks.

use std::sync::{Arc, Mutex, MutexGuard};

use axum::extract::FromRef;
use rusqlite::Connection;
use time::OffsetDateTime;

use crate::{AppState, Error, timezone::local_now};

/// The state needed to load, change and save a user's banks.
#[derive(Debug, Clone)]
pub struct BankState {
    /// The database connection holding the banks.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The canonical name of the local timezone, used for dates.
    pub local_timezone: String,
}

impl FromRef<AppState> for BankState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

impl BankState {
    /// Lock the database connection for the rest of the request.
    pub fn lock_connection(&self) -> Result<MutexGuard<'_, Connection>, Error> {
        self.db_connection.lock().map_err(|error| {
            tracing::error!("could not acquire database lock: {error}");
            Error::DatabaseLockError
        })
    }

    /// The current time in the local timezone.
    pub fn now(&self) -> Result<OffsetDateTime, Error> {
        local_now(&self.local_timezone)
            .ok_or_else(|| Error::InvalidTimezoneError(self.local_timezone.clone()))
    }
}
