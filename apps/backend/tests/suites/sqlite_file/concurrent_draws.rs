use std::collections::HashSet;
use std::sync::Arc;

use backend_test_support::unique_helpers::unique_guest_id;
use futures_util::future::join_all;
use luckydraw::config::draw::DrawConfig;
use luckydraw::db::retry::RetryPolicy;
use luckydraw::domain::rng::SeededRandom;
use luckydraw::domain::rounds::DrawRound;
use luckydraw::repos::draw_records;
use luckydraw::services::draw_orchestrator::DrawOrchestrator;
use luckydraw::services::pool_allocator::{AllocationResult, PoolAllocator};
use luckydraw::services::pool_seed::{pool_summary, PoolSpecEntry};
use serial_test::serial;

use crate::support::db::{db, seed};
use crate::support::sqlite_file::FileStore;

const FIFTY_TOP: [PoolSpecEntry; 1] = [PoolSpecEntry {
    level: 2,
    sign_type: "Top",
    reward_code: "R02",
    count: 50,
}];

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
#[serial]
async fn more_callers_than_signs_get_exact_split() {
    let store = FileStore::open(DrawConfig::default(), Arc::new(SeededRandom::new(5))).await;
    seed(&store.state, &FIFTY_TOP).await;

    let allocator = Arc::new(PoolAllocator::new(
        RetryPolicy::default(),
        Arc::new(SeededRandom::new(17)),
    ));
    let tasks = (0..60).map(|_| {
        let allocator = allocator.clone();
        let conn = db(&store.state).clone();
        tokio::spawn(async move { allocator.allocate(&conn).await })
    });

    let mut ids = HashSet::new();
    let mut out_of_stock = 0;
    for joined in join_all(tasks).await {
        match joined.expect("allocation task panicked").expect("allocation failed") {
            AllocationResult::Allocated(sign) => assert!(ids.insert(sign.id), "sign handed out twice"),
            AllocationResult::OutOfStock => out_of_stock += 1,
        }
    }
    assert_eq!(ids.len(), 50);
    assert_eq!(out_of_stock, 10);

    let counts = pool_summary(db(&store.state)).await.unwrap();
    assert_eq!(counts.drawn, 50);
    assert_eq!(counts.undrawn(), 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
#[serial]
async fn parallel_draws_for_one_guest_all_land_in_sequence() {
    let config = DrawConfig {
        first_round_win_percent: 30,
        ..DrawConfig::default()
    };
    let store = FileStore::open(config.clone(), Arc::new(SeededRandom::new(5))).await;
    let orchestrator = Arc::new(DrawOrchestrator::new(
        config,
        Arc::new(SeededRandom::new(23)),
    ));
    let guest = unique_guest_id();

    let tasks = (0..20).map(|_| {
        let orchestrator = orchestrator.clone();
        let conn = db(&store.state).clone();
        let guest = guest.clone();
        tokio::spawn(async move { orchestrator.draw(&conn, &guest).await })
    });

    for joined in join_all(tasks).await {
        let result = joined.expect("draw task panicked").expect("draw failed");
        assert_eq!(result.guest_id, guest);
    }

    let records = draw_records::list_for_guest(db(&store.state), &guest, 100)
        .await
        .unwrap();
    assert_eq!(records.len(), 20);
    for pair in records.windows(2) {
        let (prev, next) = (&pair[0], &pair[1]);
        let after_loss = prev.round == DrawRound::First && !prev.won;
        assert_eq!(next.round == DrawRound::Second, after_loss);
        assert!(next.round_index >= prev.round_index);
    }
}
