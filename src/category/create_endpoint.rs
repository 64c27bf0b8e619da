//! Adding a category to a bank.

use axum::{
    Extension, extract::{Path, State},
    http::StatusCode,
};

use crate::{
    Error,
    auth::UserID,
    bank::{BankId, BankState, update_bank_store},
    category::{Category, CategoryFormData},
    json::Json,
};

/// Add a category to one of the logged in user's banks and respond with it.
///
/// # Errors
///
/// Responds with:
/// - [Error::BankNotFound] if the user has no bank with the ID.
/// - [Error::EmptyCategoryName], [Error::DuplicateCategoryName] or
///   [Error::InvalidColor] if the category is not valid for the bank.
pub async fn create_category_endpoint(
    State(state): State<BankState>,
    Extension(user_id): Extension<UserID>,
    Path(bank_id): Path<BankId>,
    Json(form): Json<CategoryFormData>,
) -> Result<(StatusCode, Json<Category>), Error> {
    let mut connection = state.lock_connection()?;

    let category = update_bank_store(user_id, &mut connection, |store| {
        store.add_category(&bank_id, &form)
    })?;
    tracing::debug!("Added category {} to bank {bank_id}", category.name);

    Ok((StatusCode::CREATED, Json(category)))
}

#[cfg(test)]
mod create_category_endpoint_tests {
    use axum::{
        Extension, extract::{Path, State},
        http::StatusCode,
    };

    use crate::{
        Error, Money,
        bank::{BankId, BankState, load_banks},
        category::CategoryFormData,
        json::Json,
        test_utils::{get_test_state, sample_bank},
    };

    use super::create_category_endpoint;

    fn form(name: &str, color: &str) -> Json<CategoryFormData> {
        Json(CategoryFormData {
            name: name.to_owned(),
            color: color.to_owned(),
            expenses: Money::ZERO,
        })
    }

    #[tokio::test]
    async fn adds_category_to_bank() {
        let (db_connection, user) = get_test_state(&[sample_bank("a", 10)]);
        let state = BankState {
            db_connection: db_connection.clone(),
            local_timezone: "Etc/UTC".to_owned(),
        };

        let (status, Json(category)) = create_category_endpoint(
            State(state),
            Extension(user.id),
            Path(BankId::new_unchecked("a")),
            form("Travel", "#0ea5e9"),
        )
        .await
        .unwrap();

        assert_eq!(status, StatusCode::CREATED);
        let stored = load_banks(user.id, &db_connection.lock().unwrap()).unwrap();
        assert_eq!(stored[0].categories.last(), Some(&category));
    }

    #[tokio::test]
    async fn duplicate_name_is_rejected() {
        let (db_connection, user) = get_test_state(&[sample_bank("a", 10)]);
        let state = BankState {
            db_connection,
            local_timezone: "Etc/UTC".to_owned(),
        };

        let result = create_category_endpoint(
            State(state),
            Extension(user.id),
            Path(BankId::new_unchecked("a")),
            form(" food", "#0ea5e9"),
        )
        .await;

        assert_eq!(
            result.err(),
            Some(Error::DuplicateCategoryName("food".to_owned()))
        );
    }

    #[tokio::test]
    async fn unknown_bank_is_not_found() {
        let (db_connection, user) = get_test_state(&[sample_bank("a", 10)]);
        let state = BankState {
            db_connection,
            local_timezone: "Etc/UTC".to_owned(),
        };

        let result = create_category_endpoint(
            State(state),
            Extension(user.id),
            Path(BankId::new_unchecked("b")),
            form("Travel", "#0ea5e9"),
        )
        .await;

        assert_eq!(
            result.err(),
            Some(Error::BankNotFound(BankId::new_unchecked("b")))
        );
    }
}
