//! Connecting a new bank account.

use axum::{Extension, extract::State, http::StatusCode};

use crate::{
    Error,
    auth::UserID,
    bank::{Bank, BankState, NewBank, bank_id_taken, update_bank_store},
    json::Json,
};

/// Connect a bank account for the logged in user and respond with it.
///
/// # Errors
///
/// Responds with:
/// - [Error::EmptyBankId] if the ID is blank.
/// - [Error::DuplicateBankId] if any user already has a bank with the ID.
pub async fn connect_bank_endpoint(
    State(state): State<BankState>,
    Extension(user_id): Extension<UserID>,
    Json(new_bank): Json<NewBank>,
) -> Result<(StatusCode, Json<Bank>), Error> {
    let bank = Bank::try_from(new_bank)?;

    let mut connection = state.lock_connection()?;

    if bank_id_taken(&bank.id, &connection)? {
        return Err(Error::DuplicateBankId(bank.id));
    }

    let bank = update_bank_store(user_id, &mut connection, |store| {
        store.connect_bank(bank).cloned()
    })?;
    tracing::info!("User {user_id} connected bank {}", bank.id);

    Ok((StatusCode::CREATED, Json(bank)))
}
