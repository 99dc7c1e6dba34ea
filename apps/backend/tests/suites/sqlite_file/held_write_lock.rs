use std::sync::Arc;

use backend_test_support::unique_helpers::unique_guest_id;
use luckydraw::config::draw::DrawConfig;
use luckydraw::db::retry::RetryPolicy;
use luckydraw::domain::rng::{ScriptedRandom, SeededRandom};
use luckydraw::errors::ErrorCode;
use luckydraw::repos::draw_records;
use luckydraw::services::draw_orchestrator::DrawOrchestrator;
use luckydraw::services::pool_allocator::{AllocationResult, PoolAllocator};
use luckydraw::services::pool_seed::pool_summary;
use serial_test::serial;

use crate::support::db::{db, seed, SMALL_POOL};
use crate::support::sqlite_file::FileStore;

#[tokio::test]
#[serial]
async fn refused_claim_is_retried_then_out_of_stock_without_mutation() {
    let store = FileStore::open(DrawConfig::default(), Arc::new(SeededRandom::new(1))).await;
    seed(&store.state, &SMALL_POOL).await;
    store.set_busy_timeout_ms(50).await;

    let rng = ScriptedRandom::new(vec![0.0]).with_offsets(vec![0]);
    let allocator = PoolAllocator::new(RetryPolicy::new(2), Arc::new(rng));

    let lock = store.hold_write_lock().await;
    assert_eq!(
        allocator.allocate(db(&store.state)).await.unwrap(),
        AllocationResult::OutOfStock
    );
    let counts = pool_summary(db(&store.state)).await.unwrap();
    assert_eq!(counts.drawn, 0);
    assert_eq!(counts.undrawn(), 5);
    lock.release().await;

    match allocator.allocate(db(&store.state)).await.unwrap() {
        AllocationResult::Allocated(sign) => assert_eq!(sign.id, "S00-0001"),
        AllocationResult::OutOfStock => panic!("lock released, claim should succeed"),
    }
    assert_eq!(pool_summary(db(&store.state)).await.unwrap().drawn, 1);
}

#[tokio::test]
#[serial]
async fn refused_guest_draw_is_409_and_writes_nothing() {
    let config = DrawConfig {
        first_round_win_percent: 0,
        ..DrawConfig::default()
    };
    let store = FileStore::open(config.clone(), Arc::new(SeededRandom::new(1))).await;
    store.set_busy_timeout_ms(50).await;
    let orchestrator = DrawOrchestrator::new(config, Arc::new(SeededRandom::new(3)));
    let guest = unique_guest_id();

    let lock = store.hold_write_lock().await;
    let err = orchestrator
        .draw(db(&store.state), &guest)
        .await
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::ConcurrentDraw);
    assert_eq!(err.status().as_u16(), 409);
    assert_eq!(
        draw_records::count_for_guest(db(&store.state), &guest)
            .await
            .unwrap(),
        0
    );
    lock.release().await;

    let result = orchestrator.draw(db(&store.state), &guest).await.unwrap();
    assert_eq!(result.draw_round, 1);
    assert!(!result.won);
    assert_eq!(
        draw_records::count_for_guest(db(&store.state), &guest)
            .await
            .unwrap(),
        1
    );
}
