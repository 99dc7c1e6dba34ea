use actix_web::http::StatusCode;
use actix_web::test;
use luckydraw::config::draw::DrawConfig;
use luckydraw::state::app_state::AppState;
use serde_json::{json, Value};

use crate::support::app_builder::create_test_app;
use crate::support::db::memory_state;

#[actix_web::test]
async fn ping_pongs() {
    let app = create_test_app(AppState::without_db()).await;

    let req = test::TestRequest::get().uri("/api/ping").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body, json!({ "msg": "pong" }));
}

#[actix_web::test]
async fn health_reports_db_and_migration() {
    let state = memory_state(DrawConfig::default()).await;
    let app = create_test_app(state).await;

    let req = test::TestRequest::get().uri("/health").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["db"], "ok");
    assert_eq!(body["migrations"], "m20260101_000001_init");
    assert!(body.get("db_error").is_none());
    assert!(body["app_version"].is_string());
    assert!(body["time"].is_string());
}

#[actix_web::test]
async fn health_without_db_is_still_ok_with_error_detail() {
    let app = create_test_app(AppState::without_db()).await;

    let req = test::TestRequest::get().uri("/health").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["db"], "error");
    assert!(body["db_error"].is_string());
}
