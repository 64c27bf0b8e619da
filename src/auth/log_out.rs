use axum::{http::StatusCode, response::IntoResponse};
use axum_extra::extract::PrivateCookieJar;

use crate::auth::invalidate_auth_cookie;

/// Log out the current user by invalidating their session cookie.
pub async fn get_log_out(jar: PrivateCookieJar) -> impl IntoResponse {
    (StatusCode::OK, invalidate_auth_cookie(jar))
}
