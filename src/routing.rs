//! Application router configuration with protected and unprotected route definitions.

use axum::{
    Router,
    middleware,
    response::{IntoResponse, Response},
    routing::{delete, get, post},
};

use crate::{
    AppState, Error,
    auth::{auth_guard, get_log_out, get_session, post_log_in, register_user},
    bank::{connect_bank_endpoint, delete_bank_endpoint, get_banks_endpoint, sync_banks_endpoint},
    category::{create_category_endpoint, replace_categories_endpoint},
    endpoints,
    transaction::get_transactions_endpoint,
    transfer::create_transfer_endpoint,
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    let unprotected_routes = Router::new()
        .route(endpoints::USERS, post(register_user))
        .route(endpoints::LOG_IN, post(post_log_in))
        .route(endpoints::LOG_OUT, get(get_log_out));

    let protected_routes = Router::new()
        .route(endpoints::SESSION, get(get_session))
        .route(
            endpoints::BANKS,
            get(get_banks_endpoint).post(connect_bank_endpoint),
        )
        .route(endpoints::SYNC_BANKS, post(sync_banks_endpoint))
        .route(endpoints::BANK, delete(delete_bank_endpoint))
        .route(
            endpoints::BANK_CATEGORIES,
            post(create_category_endpoint).put(replace_categories_endpoint),
        )
        .route(endpoints::TRANSACTIONS, get(get_transactions_endpoint))
        .route(endpoints::TRANSFERS, post(create_transfer_endpoint))
        .layer(middleware::from_fn_with_state(state.clone(), auth_guard));

    protected_routes
        .merge(unprotected_routes)
        .fallback(get_404_not_found)
        .with_state(state)
}

async fn get_404_not_found() -> Response {
    Error::NotFound.into_response()
}
