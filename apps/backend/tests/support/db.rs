use std::sync::Arc;

use luckydraw::config::db::{DbKind, RuntimeEnv};
use luckydraw::config::draw::DrawConfig;
use luckydraw::domain::rng::{RandomSource, SeededRandom};
use luckydraw::infra::state::build_state;
use luckydraw::repos::signs::PoolCounts;
use luckydraw::services::pool_seed::{seed_pool, PoolSpecEntry};
use luckydraw::state::app_state::AppState;
use sea_orm::DatabaseConnection;

/// 3 + 2 signs; small enough to drain in a test.
pub const SMALL_POOL: [PoolSpecEntry; 2] = [
    PoolSpecEntry {
        level: 1,
        sign_type: "Top-Top",
        reward_code: "R01",
        count: 3,
    },
    PoolSpecEntry {
        level: 0,
        sign_type: "Empty",
        reward_code: "EMPTY",
        count: 2,
    },
];

/// Fresh, migrated in-memory SQLite database behind an `AppState`.
pub async fn memory_state_with(config: DrawConfig, rng: Arc<dyn RandomSource>) -> AppState {
    build_state()
        .with_env(RuntimeEnv::Test)
        .with_db(DbKind::SqliteMemory)
        .with_draw_config(config)
        .with_rng(rng)
        .build()
        .await
        .expect("in-memory state should build")
}

pub async fn memory_state(config: DrawConfig) -> AppState {
    memory_state_with(config, Arc::new(SeededRandom::new(7))).await
}

pub fn db(state: &AppState) -> &DatabaseConnection {
    state.db().expect("state should carry a database")
}

pub async fn seed(state: &AppState, spec: &[PoolSpecEntry]) -> PoolCounts {
    seed_pool(db(state), spec)
        .await
        .expect("seeding should succeed")
}
