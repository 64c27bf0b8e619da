//! Saving the client's copy of the user's banks.

use axum::{Extension, extract::State};
use serde::{Deserialize, Serialize};

use crate::{
    Error,
    auth::{UserData, UserID},
    bank::{Bank, BankState, flush_banks},
    json::Json,
};

/// The request body of a bank flush.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncRequest {
    /// The user the banks belong to.
    pub user_data: UserData,
    /// The complete bank collection to store.
    pub user_banks: Vec<Bank>,
}

/// The response body of a successful bank flush.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncResponse {
    /// Always `"ok"`.
    pub status: String,
}

/// Replace the stored banks of the logged in user with the client's copy.
///
/// # Errors
///
/// Responds with:
/// - [Error::UserMismatch] if `userData.id` is not the logged in user.
/// - The errors of [flush_banks] otherwise.
pub async fn sync_banks_endpoint(
    State(state): State<BankState>,
    Extension(user_id): Extension<UserID>,
    Json(request): Json<SyncRequest>,
) -> Result<Json<SyncResponse>, Error> {
    if request.user_data.id != user_id {
        tracing::warn!(
            "User {user_id} tried to save banks for user {}",
            request.user_data.id
        );
        return Err(Error::UserMismatch);
    }

    let mut connection = state.lock_connection()?;
    flush_banks(user_id, &request.user_banks, &mut connection)?;
    tracing::info!(
        "Saved {} banks for user {user_id}",
        request.user_banks.len()
    );

    Ok(Json(SyncResponse {
        status: "ok".to_owned(),
    }))
}
