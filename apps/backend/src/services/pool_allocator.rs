//! v1 pool allocation: claim one undrawn sign per call.

use std::sync::Arc;

use sea_orm::{DatabaseConnection, DatabaseTransaction};
use tracing::{debug, info, warn};

use crate::db::retry::{AttemptOutcome, RetryOutcome, RetryPolicy};
use crate::db::txn;
use crate::domain::rng::RandomSource;
use crate::error::AppError;
use crate::errors::domain::DomainError;
use crate::repos::signs::{self, Sign};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AllocationResult {
    Allocated(Sign),
    OutOfStock,
}

/// Hands out each sign to exactly one caller.
pub struct PoolAllocator {
    policy: RetryPolicy,
    rng: Arc<dyn RandomSource>,
}

impl PoolAllocator {
    pub fn new(policy: RetryPolicy, rng: Arc<dyn RandomSource>) -> Self {
        Self { policy, rng }
    }

    /// Allocate one sign. A conflict on the final attempt is reported as
    /// `OutOfStock`; an empty pool returns without retrying.
    pub async fn allocate(&self, db: &DatabaseConnection) -> Result<AllocationResult, AppError> {
        let outcome = self
            .policy
            .run("pool_allocate", |attempt| self.attempt(db, attempt))
            .await?;

        Ok(match outcome {
            RetryOutcome::Success(sign) => {
                info!(sign_id = %sign.id, level = sign.level, "sign allocated");
                AllocationResult::Allocated(sign)
            }
            RetryOutcome::Exhausted => {
                info!("sign pool exhausted");
                AllocationResult::OutOfStock
            }
            RetryOutcome::Contended { attempts } => {
                warn!(attempts, "allocation kept conflicting, reporting out of stock");
                AllocationResult::OutOfStock
            }
        })
    }

    async fn attempt(
        &self,
        db: &DatabaseConnection,
        attempt: u32,
    ) -> Result<AttemptOutcome<Sign>, AppError> {
        let txn = txn::begin(db).await?;
        let outcome = match claim_one(&txn, self.rng.as_ref(), attempt).await {
            Ok(outcome) => Ok(outcome),
            Err(e) if e.is_retryable_conflict() => {
                debug!(attempt, error = %e, "store refused the claim");
                Ok(AttemptOutcome::Conflict)
            }
            Err(e) => Err(AppError::from(e)),
        };
        txn::finish_attempt(txn, outcome).await
    }
}

async fn claim_one(
    txn: &DatabaseTransaction,
    rng: &dyn RandomSource,
    attempt: u32,
) -> Result<AttemptOutcome<Sign>, DomainError> {
    let undrawn = signs::count_undrawn(txn).await?;
    if undrawn == 0 {
        return Ok(AttemptOutcome::Exhausted);
    }

    let offset = rng.below(undrawn);
    let Some(sign) = signs::find_undrawn_at_offset_for_update(txn, offset).await? else {
        debug!(attempt, offset, undrawn, "pool shrank after count");
        return Ok(AttemptOutcome::Conflict);
    };

    if !signs::mark_drawn(txn, &sign.id).await? {
        debug!(attempt, sign_id = %sign.id, "sign claimed concurrently");
        return Ok(AttemptOutcome::Conflict);
    }

    Ok(AttemptOutcome::Success(Sign {
        is_drawn: true,
        ..sign
    }))
}
