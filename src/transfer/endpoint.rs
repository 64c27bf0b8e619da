//! Moving money between the user's banks over HTTP.

use axum::{Extension, extract::State, http::StatusCode};

use crate::{
    Error,
    auth::UserID,
    bank::{BankState, TransferReceipt, update_bank_store},
    json::Json,
    transfer::TransferRequest,
};

/// Transfer money between two of the logged in user's banks and save the result.
///
/// # Errors
///
/// Responds with the errors of [crate::transfer::transfer]. Nothing is saved
/// when the transfer is rejected.
pub async fn create_transfer_endpoint(
    State(state): State<BankState>,
    Extension(user_id): Extension<UserID>,
    Json(request): Json<TransferRequest>,
) -> Result<(StatusCode, Json<TransferReceipt>), Error> {
    let now = state.now()?;
    let mut connection = state.lock_connection()?;

    let receipt = update_bank_store(user_id, &mut connection, |store| {
        store.transfer(&request, now)
    })?;
    tracing::info!(
        "User {user_id} sent {} from {} to {} ({})",
        receipt.amount,
        receipt.source_bank_id,
        receipt.recipient_bank_id,
        receipt.id
    );

    Ok((StatusCode::CREATED, Json(receipt)))
}
