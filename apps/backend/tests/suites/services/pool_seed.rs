use std::sync::Arc;

use luckydraw::config::draw::DrawConfig;
use luckydraw::db::retry::RetryPolicy;
use luckydraw::domain::rng::SeededRandom;
use luckydraw::entities::signs;
use luckydraw::services::pool_allocator::PoolAllocator;
use luckydraw::services::pool_seed::{
    pool_summary, seed_pool, verify_fresh, verify_layout, DEFAULT_POOL_SPEC,
};
use sea_orm::EntityTrait;

use crate::support::db::{db, memory_state, seed, SMALL_POOL};

#[tokio::test]
async fn default_pool_seeds_ten_thousand_signs() {
    let state = memory_state(DrawConfig::default()).await;

    let counts = seed_pool(db(&state), &DEFAULT_POOL_SPEC).await.unwrap();
    assert_eq!(counts.total, 10_000);
    assert_eq!(counts.drawn, 0);
    assert_eq!(counts.distinct_ids, 10_000);
    assert_eq!(counts.count_for_level(0), 9_610);
    assert_eq!(counts.count_for_level(1), 40);
    assert_eq!(counts.count_for_level(2), 200);
    assert_eq!(counts.count_for_level(3), 150);

    let first = signs::Entity::find_by_id("S01-0001".to_string())
        .one(db(&state))
        .await
        .unwrap()
        .expect("first top-top sign");
    assert_eq!(first.sign_type, "Top-Top");
    assert_eq!(first.reward_code, "R01");
    assert!(!first.is_drawn);

    assert!(signs::Entity::find_by_id("S00-9610".to_string())
        .one(db(&state))
        .await
        .unwrap()
        .is_some());
}

#[tokio::test]
async fn reseeding_replaces_drawn_pool() {
    let state = memory_state(DrawConfig::default()).await;
    seed(&state, &SMALL_POOL).await;

    let allocator = PoolAllocator::new(RetryPolicy::default(), Arc::new(SeededRandom::new(3)));
    allocator.allocate(db(&state)).await.unwrap();
    allocator.allocate(db(&state)).await.unwrap();

    let live = pool_summary(db(&state)).await.unwrap();
    assert_eq!(live.drawn, 2);
    assert!(verify_layout(&SMALL_POOL, &live).is_ok());
    assert!(verify_fresh(&SMALL_POOL, &live).is_err());

    let reseeded = seed(&state, &SMALL_POOL).await;
    assert_eq!(reseeded.total, 5);
    assert_eq!(reseeded.drawn, 0);
}

#[tokio::test]
async fn live_pool_checked_against_other_layout_fails() {
    let state = memory_state(DrawConfig::default()).await;
    let counts = seed(&state, &SMALL_POOL).await;

    assert!(verify_layout(&DEFAULT_POOL_SPEC, &counts).is_err());
}
