//! Ledgerlane is the backend for a personal banking dashboard.
//!
//! Users log in, connect virtual bank cards, organise spending into
//! categories, browse their transaction history with filters and move money
//! between their own accounts.
//!
//! This library provides a JSON API that a client-rendered dashboard talks to.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use serde::Serialize;
use tokio::signal;

mod app_state;
mod auth;
mod bank;
mod category;
mod db;
mod endpoints;
mod json;
mod logging;
mod money;
mod routing;
mod timezone;
mod transaction;
mod transfer;

#[cfg(test)]
mod test_utils;

pub use app_state::AppState;
pub use auth::{
    Email, PasswordHash, User, UserID, ValidatedPassword, create_user, get_user_by_email,
};
pub use bank::{Bank, BankId, flush_banks, load_banks};
pub use category::{Category, CategoryName, HexColor};
pub use db::initialize as initialize_db;
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use money::Money;
pub use routing::build_router;
pub use timezone::local_now;
pub use transaction::{Transaction, TransactionId, TransactionStatus};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The email and password combination did not match a registered user.
    #[error("invalid email or password")]
    InvalidCredentials,

    /// The request did not carry a valid session cookie.
    #[error("you must be logged in to do that")]
    Unauthorized,

    /// The user named in a request body is not the user that is logged in.
    #[error("the request was made on behalf of a different user")]
    UserMismatch,

    /// There was an error parsing or formatting a date time.
    ///
    /// Callers should pass in the original error as a string and the date
    /// string that caused the error.
    #[error("could not format date-time string \"{1}\": {0}")]
    InvalidDateFormat(String, String),

    /// The user provided a password that is too easy to guess.
    #[error("password is too weak: {0}")]
    TooWeak(String),

    /// An unexpected error occurred with the underlying hashing library.
    ///
    /// The error string should only be logged for debugging on the server.
    /// When communicating with the application client this error should be
    /// replaced with a general error type indicating an internal server error.
    #[error("hashing failed: {0}")]
    HashingError(String),

    /// The email address is not in a valid format.
    #[error("\"{0}\" is not a valid email address")]
    InvalidEmail(String),

    /// Another user has already registered with the email address.
    #[error("the email address is already in use")]
    DuplicateEmail,

    /// A string could not be read as an amount of money, or an amount was not
    /// valid where it was used (e.g., a transfer of zero dollars).
    #[error("\"{0}\" is not a valid amount")]
    InvalidAmount(String),

    /// The source bank cannot cover a transfer.
    ///
    /// The balance must be strictly greater than the amount being sent.
    #[error("insufficient balance: cannot send {amount} from a balance of {balance}")]
    InsufficientBalance {
        /// The balance of the source bank.
        balance: money::Money,
        /// The amount that was requested.
        amount: money::Money,
    },

    /// The source and recipient of a transfer are the same bank.
    #[error("cannot transfer money from a bank to itself")]
    SelfTransfer,

    /// The bank ID does not refer to one of the user's banks.
    #[error("could not find the bank \"{0}\"")]
    BankNotFound(BankId),

    /// A bank with the same ID already exists.
    #[error("the bank \"{0}\" is already connected")]
    DuplicateBankId(BankId),

    /// An empty string was used as a bank ID.
    #[error("bank ID cannot be empty")]
    EmptyBankId,

    /// An empty string was used to create a category name.
    #[error("category name cannot be empty")]
    EmptyCategoryName,

    /// Two categories of the same bank would share a name.
    ///
    /// Names are compared after trimming whitespace and ignoring case.
    #[error("a category named \"{0}\" already exists")]
    DuplicateCategoryName(String),

    /// A category color is not a hex color such as `#a1b2c3`.
    #[error("\"{0}\" is not a valid hex color")]
    InvalidColor(String),

    /// Both a date preset and an explicit date range were given.
    #[error("choose either a date preset or a date range, not both")]
    ConflictingDateFilters,

    /// A date in a filter query is not in the form `YYYY-MM-DD`.
    #[error("\"{0}\" is not a valid date, expected YYYY-MM-DD")]
    InvalidFilterDate(String),

    /// A JSON request body is well formed but does not match what the
    /// endpoint expects, e.g. an amount that is not a number.
    #[error("{0}")]
    InvalidJson(String),

    /// A request body is not JSON, or is not sent as `application/json`.
    #[error("{0}")]
    MalformedJson(String),

    /// The start of a date range is after its end.
    #[error("the start of the date range must not be after its end")]
    InvalidDateRange,

    /// The requested resource was not found.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// An error occurred while getting the local timezone from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezoneError(String),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            // Code 2067 occurs when a UNIQUE constraint failed.
            rusqlite::Error::SqliteFailure(sql_error, Some(ref desc))
                if sql_error.extended_code == 2067 && desc.ends_with("user.email") =>
            {
                Error::DuplicateEmail
            }
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

/// The JSON body sent to the client when a request fails.
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

impl Error {
    fn status_code(&self) -> StatusCode {
        match self {
            Error::InvalidCredentials | Error::Unauthorized => StatusCode::UNAUTHORIZED,
            Error::UserMismatch => StatusCode::FORBIDDEN,
            Error::NotFound | Error::BankNotFound(_) => StatusCode::NOT_FOUND,
            Error::DuplicateEmail | Error::DuplicateBankId(_) => StatusCode::CONFLICT,
            Error::TooWeak(_)
            | Error::InvalidEmail(_)
            | Error::EmptyBankId
            | Error::ConflictingDateFilters
            | Error::InvalidFilterDate(_)
            | Error::MalformedJson(_)
            | Error::InvalidDateRange => StatusCode::BAD_REQUEST,
            Error::InvalidAmount(_)
            | Error::InsufficientBalance { .. }
            | Error::SelfTransfer
            | Error::EmptyCategoryName
            | Error::DuplicateCategoryName(_)
            | Error::InvalidColor(_)
            | Error::InvalidJson(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Error::InvalidDateFormat(_, _)
            | Error::HashingError(_)
            | Error::SqlError(_)
            | Error::DatabaseLockError
            | Error::InvalidTimezoneError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            // Internal errors are not intended to be shown to the client.
            tracing::error!("An unexpected error occurred: {}", self);
            "An unexpected error occurred, check the server logs for more details.".to_owned()
        } else {
            self.to_string()
        };

        (status, Json(ErrorBody { error: message })).into_response()
    }
}
