use std::collections::HashSet;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use futures_util::future::join_all;
use luckydraw::config::draw::DrawConfig;
use luckydraw::db::retry::RetryPolicy;
use luckydraw::domain::rng::{RandomSource, ScriptedRandom, SeededRandom};
use luckydraw::services::pool_allocator::{AllocationResult, PoolAllocator};
use luckydraw::services::pool_seed::pool_summary;

use crate::support::db::{db, memory_state, seed, SMALL_POOL};

/// Offsets that land one past the undrawn range, as if another caller had
/// drained a sign between the count and the select. Later calls take offset 0.
struct VanishingOffsets {
    stale_calls: AtomicU32,
}

impl VanishingOffsets {
    fn new(stale_calls: u32) -> Self {
        Self {
            stale_calls: AtomicU32::new(stale_calls),
        }
    }
}

impl RandomSource for VanishingOffsets {
    fn below(&self, upper: u64) -> u64 {
        let stale = self
            .stale_calls
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if stale {
            upper
        } else {
            0
        }
    }

    fn percent(&self) -> f64 {
        0.0
    }
}

fn allocator(seed: u64) -> PoolAllocator {
    PoolAllocator::new(RetryPolicy::default(), Arc::new(SeededRandom::new(seed)))
}

#[tokio::test]
async fn drains_pool_with_distinct_ids_then_out_of_stock() {
    let state = memory_state(DrawConfig::default()).await;
    seed(&state, &SMALL_POOL).await;
    let allocator = allocator(11);

    let mut ids = HashSet::new();
    for _ in 0..5 {
        match allocator.allocate(db(&state)).await.unwrap() {
            AllocationResult::Allocated(sign) => {
                assert!(sign.is_drawn);
                assert!(ids.insert(sign.id), "sign handed out twice");
            }
            AllocationResult::OutOfStock => panic!("pool ran out early"),
        }
    }
    assert_eq!(ids.len(), 5);

    assert_eq!(
        allocator.allocate(db(&state)).await.unwrap(),
        AllocationResult::OutOfStock
    );

    let counts = pool_summary(db(&state)).await.unwrap();
    assert_eq!(counts.drawn, 5);
    assert_eq!(counts.undrawn(), 0);
}

#[tokio::test]
async fn empty_pool_is_out_of_stock() {
    let state = memory_state(DrawConfig::default()).await;

    assert_eq!(
        allocator(1).allocate(db(&state)).await.unwrap(),
        AllocationResult::OutOfStock
    );
    assert_eq!(pool_summary(db(&state)).await.unwrap().total, 0);
}

#[tokio::test]
async fn offset_picks_sign_in_id_order() {
    let state = memory_state(DrawConfig::default()).await;
    seed(&state, &SMALL_POOL).await;

    // offset 0 always takes the lowest undrawn id
    let rng = ScriptedRandom::new(vec![0.0]).with_offsets(vec![0]);
    let allocator = PoolAllocator::new(RetryPolicy::default(), Arc::new(rng));

    let mut drawn = Vec::new();
    for _ in 0..3 {
        if let AllocationResult::Allocated(sign) = allocator.allocate(db(&state)).await.unwrap() {
            drawn.push(sign.id);
        }
    }
    assert_eq!(drawn, vec!["S00-0001", "S00-0002", "S01-0001"]);
}

#[tokio::test]
async fn allocated_sign_carries_full_record() {
    let state = memory_state(DrawConfig::default()).await;
    seed(&state, &SMALL_POOL).await;

    let rng = ScriptedRandom::new(vec![0.0]).with_offsets(vec![4]);
    let allocator = PoolAllocator::new(RetryPolicy::default(), Arc::new(rng));

    match allocator.allocate(db(&state)).await.unwrap() {
        AllocationResult::Allocated(sign) => {
            assert_eq!(sign.id, "S01-0003");
            assert_eq!(sign.level, 1);
            assert_eq!(sign.sign_type, "Top-Top");
            assert_eq!(sign.reward_code, "R01");
        }
        AllocationResult::OutOfStock => panic!("expected a sign"),
    }
}

#[tokio::test]
async fn concurrent_callers_never_share_a_sign() {
    let state = memory_state(DrawConfig::default()).await;
    seed(&state, &SMALL_POOL).await;
    let allocator = allocator(99);

    let results = join_all((0..8).map(|_| allocator.allocate(db(&state)))).await;

    let mut ids = HashSet::new();
    let mut out_of_stock = 0;
    for result in results {
        match result.unwrap() {
            AllocationResult::Allocated(sign) => assert!(ids.insert(sign.id)),
            AllocationResult::OutOfStock => out_of_stock += 1,
        }
    }
    assert_eq!(ids.len(), 5);
    assert_eq!(out_of_stock, 3);
}

#[tokio::test]
async fn conflicting_attempt_is_retried() {
    let state = memory_state(DrawConfig::default()).await;
    seed(&state, &SMALL_POOL).await;
    let allocator =
        PoolAllocator::new(RetryPolicy::new(2), Arc::new(VanishingOffsets::new(1)));

    match allocator.allocate(db(&state)).await.unwrap() {
        AllocationResult::Allocated(sign) => assert_eq!(sign.id, "S00-0001"),
        AllocationResult::OutOfStock => panic!("retry should have claimed a sign"),
    }
    assert_eq!(pool_summary(db(&state)).await.unwrap().drawn, 1);
}

#[tokio::test]
async fn conflict_on_last_attempt_is_out_of_stock_without_mutation() {
    let state = memory_state(DrawConfig::default()).await;
    seed(&state, &SMALL_POOL).await;
    let allocator =
        PoolAllocator::new(RetryPolicy::new(2), Arc::new(VanishingOffsets::new(2)));

    assert_eq!(
        allocator.allocate(db(&state)).await.unwrap(),
        AllocationResult::OutOfStock
    );

    let counts = pool_summary(db(&state)).await.unwrap();
    assert_eq!(counts.drawn, 0);
    assert_eq!(counts.undrawn(), 5);
}
