//! Error body test helpers
//!
//! Asserts the draw API's error contract without depending on backend types:
//! client errors carry `{success:false, error, code}`, server errors carry
//! `{error, message, code}`, and every response has an `x-trace-id` header.

use actix_web::http::StatusCode;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct ErrorBodyLike {
    success: Option<bool>,
    error: String,
    message: Option<String>,
    code: String,
}

/// Assert that response parts conform to the error contract
///
/// Returns the `error` field so callers can check the human-readable text.
pub fn assert_error_body_from_parts(
    status: StatusCode,
    headers: &actix_web::http::header::HeaderMap,
    body_bytes: &[u8],
    expected_code: &str,
    expected_status: StatusCode,
) -> String {
    assert_eq!(status, expected_status);

    let body: ErrorBodyLike = serde_json::from_slice(body_bytes)
        .expect("Response body should be a JSON error body");

    let trace_id = headers
        .get("x-trace-id")
        .expect("x-trace-id header should be present")
        .to_str()
        .expect("x-trace-id header should be valid UTF-8");
    assert!(!trace_id.is_empty(), "x-trace-id header should not be empty");

    assert_eq!(body.code, expected_code);

    if status.is_client_error() {
        assert_eq!(body.success, Some(false), "client errors carry success=false");
    } else {
        assert!(body.success.is_none(), "server errors do not carry success");
        assert!(
            body.message.as_deref().is_some_and(|m| !m.is_empty()),
            "server errors carry a message"
        );
    }

    body.error
}

/// Assert that a ServiceResponse conforms to the error contract
pub async fn assert_error_body_from_service_response(
    resp: actix_web::dev::ServiceResponse<actix_web::body::BoxBody>,
    expected_code: &str,
    expected_status: StatusCode,
) -> String {
    let status = resp.status();
    let headers = resp.headers().clone();
    let body = actix_web::test::read_body(resp).await;

    assert_error_body_from_parts(status, &headers, &body, expected_code, expected_status)
}
