use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::test;
use backend_test_support::error_body::assert_error_body_from_service_response;
use backend_test_support::unique_helpers::unique_guest_id;
use luckydraw::config::draw::DrawConfig;
use luckydraw::domain::rng::ScriptedRandom;
use luckydraw::repos::draw_records;
use serde_json::{json, Value};

use crate::support::app_builder::create_test_app;
use crate::support::db::{db, memory_state, memory_state_with};

fn losing_config() -> DrawConfig {
    DrawConfig {
        first_round_win_percent: 0,
        ..DrawConfig::default()
    }
}

#[actix_web::test]
async fn first_draw_loses_then_second_wins() {
    // round-one roll 50 loses at 0%, tier roll 10 => 阳光普照
    let state = memory_state_with(
        losing_config(),
        Arc::new(ScriptedRandom::new(vec![50.0, 10.0])),
    )
    .await;
    let app = create_test_app(state).await;
    let guest = unique_guest_id();

    let req = test::TestRequest::post()
        .uri("/api/draw")
        .set_json(json!({ "guest_id": guest }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.headers().contains_key("x-trace-id"));
    assert!(resp.headers().contains_key("x-request-id"));
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(
        body,
        json!({
            "success": true,
            "won": false,
            "tier": null,
            "drawRound": 1,
            "message": "未中奖，再试一次吧",
            "guestId": guest,
        })
    );

    let req = test::TestRequest::post()
        .uri("/api/draw")
        .set_json(json!({ "guestId": guest }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(
        body,
        json!({
            "success": true,
            "won": true,
            "tier": "阳光普照",
            "drawRound": 2,
            "message": "恭喜中奖！",
            "guestId": guest,
            "prizeImageUrl": null,
        })
    );
}

#[actix_web::test]
async fn header_supplies_guest_id() {
    let state = memory_state(losing_config()).await;
    let app = create_test_app(state).await;
    let guest = unique_guest_id();

    let req = test::TestRequest::post()
        .uri("/api/draw")
        .insert_header(("x-guest-id", guest.as_str()))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["guestId"], guest.as_str());
    assert_eq!(body["drawRound"], 1);
}

#[actix_web::test]
async fn missing_guest_id_is_rejected_before_writing() {
    let state = memory_state(losing_config()).await;
    let conn = db(&state).clone();
    let app = create_test_app(state).await;

    for payload in [json!({}), json!({ "guest_id": "   " }), json!({ "guestId": "" })] {
        let req = test::TestRequest::post()
            .uri("/api/draw")
            .set_json(payload)
            .to_request();
        let resp = test::call_service(&app, req).await;
        let error = assert_error_body_from_service_response(
            resp,
            "GUEST_ID_REQUIRED",
            StatusCode::BAD_REQUEST,
        )
        .await;
        assert_eq!(error, "guest_id is required");
    }

    assert_eq!(draw_records::count_for_guest(&conn, "   ").await.unwrap(), 0);
    assert_eq!(draw_records::count_for_guest(&conn, "").await.unwrap(), 0);
}

#[actix_web::test]
async fn overlong_guest_id_is_rejected() {
    let state = memory_state(losing_config()).await;
    let app = create_test_app(state).await;

    let req = test::TestRequest::post()
        .uri("/api/draw")
        .set_json(json!({ "guest_id": "x".repeat(65) }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_error_body_from_service_response(resp, "GUEST_ID_TOO_LONG", StatusCode::BAD_REQUEST)
        .await;
}

#[actix_web::test]
async fn malformed_body_is_invalid_json() {
    let state = memory_state(losing_config()).await;
    let app = create_test_app(state).await;

    let req = test::TestRequest::post()
        .uri("/api/draw")
        .insert_header(("content-type", "application/json"))
        .set_payload("{\"guest_id\": ")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_error_body_from_service_response(resp, "INVALID_JSON", StatusCode::BAD_REQUEST).await;
}

#[actix_web::test]
async fn plain_text_body_uses_header() {
    let state = memory_state(losing_config()).await;
    let app = create_test_app(state).await;
    let guest = unique_guest_id();

    let req = test::TestRequest::post()
        .uri("/api/draw")
        .insert_header(("content-type", "text/plain"))
        .insert_header(("x-guest-id", guest.as_str()))
        .set_payload("hello")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["guestId"], guest.as_str());
}
