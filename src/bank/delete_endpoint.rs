//! Disconnecting a bank account.

use axum::{
    Extension,
    extract::{Path, State},
    http::StatusCode,
};

use crate::{
    Error,
    auth::UserID,
    bank::{BankId, BankState, update_bank_store},
};

/// Delete one of the logged in user's banks, its categories and its transactions.
///
/// # Errors
///
/// Responds with [Error::BankNotFound] if the user has no bank with the ID.
pub async fn delete_bank_endpoint(
    State(state): State<BankState>,
    Extension(user_id): Extension<UserID>,
    Path(bank_id): Path<BankId>,
) -> Result<StatusCode, Error> {
    let mut connection = state.lock_connection()?;

    update_bank_store(user_id, &mut connection, |store| {
        store.delete_bank(&bank_id)
    })?;
    tracing::info!("User {user_id} deleted bank {bank_id}");

    Ok(StatusCode::NO_CONTENT)
}
