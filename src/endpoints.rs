//! The API endpoints URIs.
//!
//! For endpoints that take a parameter, e.g., '/api/banks/{bank_id}', use [format_endpoint].

/// The route for registering a new user.
pub const USERS: &str = "/api/users";
/// The route for logging in a user.
pub const LOG_IN: &str = "/api/log_in";
/// The route for the client to log out the current user.
pub const LOG_OUT: &str = "/api/log_out";
/// The route describing the logged in user.
pub const SESSION: &str = "/api/session";
/// The route to list and connect banks.
pub const BANKS: &str = "/api/banks";
/// The route to delete a single bank.
pub const BANK: &str = "/api/banks/{bank_id}";
/// The route for saving the client's copy of all banks.
pub const SYNC_BANKS: &str = "/api/banks/sync";
/// The route to add or replace the categories of a bank.
pub const BANK_CATEGORIES: &str = "/api/banks/{bank_id}/categories";
/// The route to browse transactions across banks.
pub const TRANSACTIONS: &str = "/api/transactions";
/// The route to move money between banks.
pub const TRANSFERS: &str = "/api/transfers";

/// Replace the parameter in `endpoint_path` with `id`.
///
/// A parameter is a string that starts with a left brace, followed by
/// lowercase letters or underscores, and ends with a right brace.
/// For example, in the endpoint path '/banks/{bank_id}', '{bank_id}' is the parameter.
///
/// This function assumes that an endpoint path only contains ASCII characters
/// and a single parameter.
///
/// If no parameter is found in `endpoint_path`, the function returns the
/// the original `endpoint_path`.
pub fn format_endpoint(endpoint_path: &str, id: &str) -> String {
    let Some(param_start) = endpoint_path.find('{') else {
        return endpoint_path.to_owned();
    };

    let param_end = endpoint_path[param_start..]
        .find('}')
        .map(|end| param_start + end + 1)
        .unwrap_or(endpoint_path.len());

    format!(
        "{}{}{}",
        &endpoint_path[..param_start],
        id,
        &endpoint_path[param_end..]
    )
}

// These tests are here so that we know when we call `Uri::from_shared` it will not panic.
#[cfg(test)]
mod endpoints_tests {
    use axum::http::Uri;

    use crate::endpoints;

    use super::format_endpoint;

    fn assert_endpoint_is_valid_uri(uri: &str) {
        assert!(uri.parse::<Uri>().is_ok());
    }

    #[test]
    fn endpoints_are_valid_uris() {
        assert_endpoint_is_valid_uri(endpoints::USERS);
        assert_endpoint_is_valid_uri(endpoints::LOG_IN);
        assert_endpoint_is_valid_uri(endpoints::LOG_OUT);
        assert_endpoint_is_valid_uri(endpoints::SESSION);
        assert_endpoint_is_valid_uri(endpoints::BANKS);
        assert_endpoint_is_valid_uri(endpoints::BANK);
        assert_endpoint_is_valid_uri(endpoints::SYNC_BANKS);
        assert_endpoint_is_valid_uri(endpoints::BANK_CATEGORIES);
        assert_endpoint_is_valid_uri(endpoints::TRANSACTIONS);
        assert_endpoint_is_valid_uri(endpoints::TRANSFERS);
    }

    #[test]
    fn produces_valid_uri() {
        let formatted_path = format_endpoint("/hello/{world_id}", "card-1");

        assert_eq!(formatted_path, "/hello/card-1");
        assert!(formatted_path.parse::<Uri>().is_ok());
    }

    #[test]
    fn returns_original_path_with_no_parameter() {
        let formatted_path = format_endpoint("/hello/world", "1");

        assert_eq!(formatted_path, "/hello/world");
    }

    #[test]
    fn parameter_in_middle() {
        let formatted_path = format_endpoint(endpoints::BANK_CATEGORIES, "card-1");

        assert_eq!(formatted_path, "/api/banks/card-1/categories");
        assert!(formatted_path.parse::<Uri>().is_ok());
    }
}
