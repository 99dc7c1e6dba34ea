pub mod retry;
pub mod txn;

use sea_orm::DatabaseConnection;

use crate::error::AppError;
use crate::errors::ErrorCode;
use crate::state::app_state::AppState;

/// Borrow the pool from `AppState`, or fail with 503 when the app runs without one.
pub fn require_db(state: &AppState) -> Result<&DatabaseConnection, AppError> {
    state.db().ok_or_else(|| {
        AppError::db_unavailable(ErrorCode::DbUnavailable, "Database is not configured")
    })
}
