use actix_web::http::StatusCode;
use actix_web::test;
use backend_test_support::error_body::assert_error_body_from_service_response;
use luckydraw::config::draw::{DrawConfig, DrawScheme};
use luckydraw::state::app_state::AppState;
use serde_json::json;

use crate::support::app_builder::create_test_app;

#[actix_web::test]
async fn draws_without_db_are_503_with_retry_after() {
    let app = create_test_app(AppState::without_db()).await;

    let req = test::TestRequest::post()
        .uri("/api/draw")
        .set_json(json!({ "guest_id": "g-1" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(
        resp.headers()
            .get("retry-after")
            .and_then(|v| v.to_str().ok()),
        Some("5")
    );
    let error = assert_error_body_from_service_response(
        resp,
        "DB_UNAVAILABLE",
        StatusCode::SERVICE_UNAVAILABLE,
    )
    .await;
    assert_eq!(error, "Service Unavailable");

    let req = test::TestRequest::post().uri("/draw").to_request();
    let resp = test::call_service(&app, req).await;
    assert_error_body_from_service_response(resp, "DB_UNAVAILABLE", StatusCode::SERVICE_UNAVAILABLE)
        .await;
}

#[actix_web::test]
async fn validation_runs_before_db_check() {
    let app = create_test_app(AppState::without_db()).await;

    let req = test::TestRequest::post()
        .uri("/api/draw")
        .set_json(json!({}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_error_body_from_service_response(resp, "GUEST_ID_REQUIRED", StatusCode::BAD_REQUEST)
        .await;
}

#[actix_web::test]
async fn pool_scheme_without_db_is_503() {
    let state = AppState::new_without_db(DrawConfig {
        scheme: DrawScheme::Pool,
        ..DrawConfig::default()
    });
    let app = create_test_app(state).await;

    let req = test::TestRequest::post().uri("/api/draw").to_request();
    let resp = test::call_service(&app, req).await;
    assert_error_body_from_service_response(resp, "DB_UNAVAILABLE", StatusCode::SERVICE_UNAVAILABLE)
        .await;
}
