//! Replacing all categories of a bank at once.

use axum::{
    Extension, extract::{Path, State},
};

use crate::{
    Error,
    auth::UserID,
    bank::{BankId, BankState, update_bank_store},
    category::{Category, Reconciliation},
    json::Json,
};

/// Reconcile a bank's categories with the list sent by the client.
///
/// Responds with the new list and which names were created, updated and deleted.
///
/// # Errors
///
/// Responds with:
/// - [Error::BankNotFound] if the user has no bank with the ID.
/// - [Error::DuplicateCategoryName] if the list names a category twice.
pub async fn replace_categories_endpoint(
    State(state): State<BankState>,
    Extension(user_id): Extension<UserID>,
    Path(bank_id): Path<BankId>,
    Json(categories): Json<Vec<Category>>,
) -> Result<Json<Reconciliation>, Error> {
    let mut connection = state.lock_connection()?;

    let reconciliation = update_bank_store(user_id, &mut connection, |store| {
        store.replace_categories(&bank_id, &categories)
    })?;
    tracing::debug!(
        "Reconciled categories of bank {bank_id}: {} created, {} updated, {} deleted",
        reconciliation.created.len(),
        reconciliation.updated.len(),
        reconciliation.deleted.len()
    );

    Ok(Json(reconciliation))
}

#[cfg(test)]
mod replace_categories_endpoint_tests {
    use axum::{
        Extension, extract::{Path, State},
    };

    use crate::{
        Error,
        bank::{BankId, BankState, load_banks},
        json::Json,
        test_utils::{get_test_state, sample_bank, sample_category},
    };

    use super::replace_categories_endpoint;

    #[tokio::test]
    async fn reconciles_and_saves_categories() {
        let mut bank = sample_bank("a", 10);
        bank.categories = vec![
            sample_category("Food", "#111", 10),
            sample_category("Gas", "#222", 20),
        ];
        let (db_connection, user) = get_test_state(&[bank]);
        let state = BankState {
            db_connection: db_connection.clone(),
            local_timezone: "Etc/UTC".to_owned(),
        };

        let Json(got) = replace_categories_endpoint(
            State(state),
            Extension(user.id),
            Path(BankId::new_unchecked("a")),
            Json(vec![
                sample_category("food", "#333", 15),
                sample_category("Rent", "#444", 0),
            ]),
        )
        .await
        .unwrap();

        let want = vec![
            sample_category("Food", "#333", 15),
            sample_category("Rent", "#444", 0),
        ];
        assert_eq!(got.categories, want);
        let stored = load_banks(user.id, &db_connection.lock().unwrap()).unwrap();
        assert_eq!(stored[0].categories, want);
    }

    #[tokio::test]
    async fn duplicate_names_change_nothing() {
        let (db_connection, user) = get_test_state(&[sample_bank("a", 10)]);
        let state = BankState {
            db_connection: db_connection.clone(),
            local_timezone: "Etc/UTC".to_owned(),
        };

        let result = replace_categories_endpoint(
            State(state),
            Extension(user.id),
            Path(BankId::new_unchecked("a")),
            Json(vec![
                sample_category("Rent", "#333", 0),
                sample_category("rent", "#444", 0),
            ]),
        )
        .await;

        assert_eq!(
            result.err(),
            Some(Error::DuplicateCategoryName("rent".to_owned()))
        );
        let stored = load_banks(user.id, &db_connection.lock().unwrap()).unwrap();
        assert_eq!(stored, vec![sample_bank("a", 10)]);
    }
}
