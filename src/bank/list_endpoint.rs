//! Listing the user's connected banks.

use axum::{Extension, Json, extract::State};

use crate::{
    Error,
    auth::UserID,
    bank::{Bank, BankState, load_banks},
};

/// Respond with every bank of the logged in user, or an empty list if there are none.
pub async fn get_banks_endpoint(
    State(state): State<BankState>,
    Extension(user_id): Extension<UserID>,
) -> Result<Json<Vec<Bank>>, Error> {
    let connection = state.lock_connection()?;
    let banks = load_banks(user_id, &connection)?;

    Ok(Json(banks))
}
