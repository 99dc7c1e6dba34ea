//! Seeding and verification of the sign pool.

use sea_orm::{ConnectionTrait, DatabaseConnection};
use tracing::info;

use crate::db::txn;
use crate::error::AppError;
use crate::repos::signs::{self, PoolCounts, SignCreate};

pub const SEED_BATCH_SIZE: usize = 500;

/// One line of a pool layout: `count` signs of one level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolSpecEntry {
    pub level: i32,
    pub sign_type: &'static str,
    pub reward_code: &'static str,
    pub count: u32,
}

pub const DEFAULT_POOL_SPEC: [PoolSpecEntry; 4] = [
    PoolSpecEntry {
        level: 1,
        sign_type: "Top-Top",
        reward_code: "R01",
        count: 40,
    },
    PoolSpecEntry {
        level: 2,
        sign_type: "Top",
        reward_code: "R02",
        count: 200,
    },
    PoolSpecEntry {
        level: 3,
        sign_type: "Special",
        reward_code: "R03",
        count: 150,
    },
    PoolSpecEntry {
        level: 0,
        sign_type: "Empty",
        reward_code: "EMPTY",
        count: 9610,
    },
];

/// `S{level:02}-{index:04}` with a 1-based index per level.
pub fn sign_id(level: i32, index: u32) -> String {
    format!("S{level:02}-{index:04}")
}

pub fn expected_total(spec: &[PoolSpecEntry]) -> u64 {
    spec.iter().map(|e| u64::from(e.count)).sum()
}

pub fn build_signs(spec: &[PoolSpecEntry]) -> Vec<SignCreate> {
    spec.iter()
        .flat_map(|entry| {
            (1..=entry.count).map(move |i| {
                SignCreate::new(
                    sign_id(entry.level, i),
                    entry.level,
                    entry.sign_type,
                    entry.reward_code,
                )
            })
        })
        .collect()
}

/// Replace the whole pool with `spec` in one transaction and verify it before
/// committing.
pub async fn seed_pool(
    db: &DatabaseConnection,
    spec: &[PoolSpecEntry],
) -> Result<PoolCounts, AppError> {
    let txn = txn::begin(db).await?;
    let result = async {
        let inserted = signs::replace_all(&txn, build_signs(spec), SEED_BATCH_SIZE).await?;
        info!(inserted, batch_size = SEED_BATCH_SIZE, "sign pool seeded");
        let counts = signs::counts(&txn).await?;
        verify_fresh(spec, &counts)?;
        Ok::<_, AppError>(counts)
    }
    .await;
    txn::finish(txn, result).await
}

pub async fn pool_summary<C: ConnectionTrait + Send + Sync>(
    conn: &C,
) -> Result<PoolCounts, AppError> {
    Ok(signs::counts(conn).await?)
}

/// Check total, per-level counts and id uniqueness against `spec`.
pub fn verify_layout(spec: &[PoolSpecEntry], counts: &PoolCounts) -> Result<(), AppError> {
    let expected = expected_total(spec);
    if counts.total != expected {
        return Err(AppError::config(format!(
            "sign pool total is {}, expected {expected}",
            counts.total
        )));
    }

    for entry in spec {
        let actual = counts.count_for_level(entry.level);
        if actual != u64::from(entry.count) {
            return Err(AppError::config(format!(
                "sign pool level {} has {actual} signs, expected {}",
                entry.level, entry.count
            )));
        }
    }

    if counts.distinct_ids != counts.total {
        return Err(AppError::config(format!(
            "sign pool has {} distinct ids for {} signs",
            counts.distinct_ids, counts.total
        )));
    }

    Ok(())
}

/// `verify_layout` plus: nothing has been drawn yet.
pub fn verify_fresh(spec: &[PoolSpecEntry], counts: &PoolCounts) -> Result<(), AppError> {
    verify_layout(spec, counts)?;
    if counts.drawn != 0 {
        return Err(AppError::config(format!(
            "sign pool already has {} drawn signs",
            counts.drawn
        )));
    }
    Ok(())
}
