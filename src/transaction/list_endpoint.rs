//! Listing the user's transactions across all banks.

use axum::{Extension, Json, extract::State};
use axum_extra::extract::Query;

use crate::{
    Error,
    auth::UserID,
    bank::{BankState, BankStore, LedgerEntry, load_banks},
    transaction::{FilterQuery, FilterState},
};

/// Respond with the transactions of every bank that match the query, bank by bank.
///
/// # Errors
///
/// Responds with [Error::ConflictingDateFilters], [Error::InvalidDateRange],
/// [Error::InvalidFilterDate] or [Error::InvalidAmount] if the query is not a
/// valid filter.
pub async fn get_transactions_endpoint(
    State(state): State<BankState>,
    Extension(user_id): Extension<UserID>,
    Query(query): Query<FilterQuery>,
) -> Result<Json<Vec<LedgerEntry>>, Error> {
    let filter = FilterState::try_from(query)?;
    let now = state.now()?;

    let connection = state.lock_connection()?;
    let store = BankStore::new(load_banks(user_id, &connection)?);

    Ok(Json(store.ledger(&filter, now)))
}
