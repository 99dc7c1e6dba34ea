//! Transaction helpers.
//!
//! Every path that opens a transaction settles it explicitly through one of
//! these helpers. A transaction dropped without settling is rolled back by
//! SeaORM.

use sea_orm::{DatabaseConnection, DatabaseTransaction, DbErr, TransactionTrait};
use tracing::warn;

use crate::db::retry::AttemptOutcome;

pub async fn begin(db: &DatabaseConnection) -> Result<DatabaseTransaction, DbErr> {
    db.begin().await
}

/// Commit on `Ok`, roll back on `Err`. A failed rollback is logged and the
/// original error returned.
pub async fn finish<T, E>(txn: DatabaseTransaction, result: Result<T, E>) -> Result<T, E>
where
    E: From<DbErr>,
{
    match result {
        Ok(value) => {
            txn.commit().await?;
            Ok(value)
        }
        Err(err) => {
            if let Err(rollback_err) = txn.rollback().await {
                warn!(error = %rollback_err, "rollback failed");
            }
            Err(err)
        }
    }
}

/// Settle one retry attempt: commit only on `Success`, roll back otherwise.
pub async fn finish_attempt<T, E>(
    txn: DatabaseTransaction,
    outcome: Result<AttemptOutcome<T>, E>,
) -> Result<AttemptOutcome<T>, E>
where
    E: From<DbErr>,
{
    match outcome {
        Ok(AttemptOutcome::Success(value)) => {
            txn.commit().await?;
            Ok(AttemptOutcome::Success(value))
        }
        other => {
            if let Err(rollback_err) = txn.rollback().await {
                warn!(error = %rollback_err, "rollback failed");
            }
            other
        }
    }
}
