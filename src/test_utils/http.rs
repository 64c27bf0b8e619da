use axum::{body::Body, response::Response};

/// Read the `error` field of a JSON error response.
pub(crate) async fn get_error_message(response: Response<Body>) -> String {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Could not get response body");
    let json: serde_json::Value =
        serde_json::from_slice(&body).expect("Could not parse response body as JSON");

    json["error"]
        .as_str()
        .expect("Response body has no error message")
        .to_owned()
}
