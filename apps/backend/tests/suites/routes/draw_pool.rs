use std::collections::HashSet;

use actix_web::test;
use luckydraw::config::draw::{DrawConfig, DrawScheme};
use serde_json::{json, Value};

use crate::support::app_builder::create_test_app;
use crate::support::db::{memory_state, seed, SMALL_POOL};

fn pool_config() -> DrawConfig {
    DrawConfig {
        scheme: DrawScheme::Pool,
        ..DrawConfig::default()
    }
}

#[actix_web::test]
async fn raw_draw_returns_sign_until_out_of_stock() {
    let state = memory_state(DrawConfig::default()).await;
    seed(&state, &SMALL_POOL).await;
    let app = create_test_app(state).await;

    let mut ids = HashSet::new();
    for _ in 0..5 {
        let req = test::TestRequest::post().uri("/draw").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["status"], "OK");
        let sign = &body["sign"];
        assert!(sign["level"].is_i64());
        assert!(sign["type"].is_string());
        assert!(sign["reward_code"].is_string());
        assert!(ids.insert(sign["id"].as_str().unwrap().to_string()));
    }

    let req = test::TestRequest::post().uri("/draw").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body, json!({ "status": "OUT_OF_STOCK" }));
}

#[actix_web::test]
async fn pool_scheme_serves_display_mapped_api_draw() {
    let state = memory_state(pool_config()).await;
    seed(&state, &SMALL_POOL).await;
    let app = create_test_app(state).await;

    for _ in 0..5 {
        let req = test::TestRequest::post().uri("/api/draw").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["imageUrl"], "");
        match body["level"].as_i64() {
            Some(0) => {
                assert_eq!(body["type"], "Empty");
                assert_eq!(body["title"], "空签");
                assert_eq!(body["description"], "所行皆明，所向皆顺。新年快乐！");
            }
            Some(1) => {
                assert_eq!(body["type"], "Top-Top");
                assert_eq!(body["title"], "上上签");
                assert_eq!(body["description"], "恭喜抽中上上签，祝新年顺遂。");
            }
            other => panic!("unexpected level {other:?}"),
        }
    }

    let req = test::TestRequest::post().uri("/api/draw").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body, json!({ "status": "OUT_OF_STOCK" }));
}

#[actix_web::test]
async fn pool_scheme_ignores_guest_id() {
    let state = memory_state(pool_config()).await;
    seed(&state, &SMALL_POOL).await;
    let app = create_test_app(state).await;

    let req = test::TestRequest::post()
        .uri("/api/draw")
        .set_json(json!({ "guest_id": "" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());
}
