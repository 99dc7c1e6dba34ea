//! Database configuration lives in `db-infra` so the migration CLI shares it.

pub use db_infra::config::db::{
    build_connection_settings, build_session_statements, make_conn_spec, validate_db_config,
    ConnectionSettings, DbKind, DbOwner, DbSettings, PoolPurpose, RuntimeEnv,
};

use crate::error::AppError;

/// Storage engine from `LUCKYDRAW_DB_KIND`, defaulting to Postgres.
pub fn db_kind_from_env() -> Result<DbKind, AppError> {
    match std::env::var("LUCKYDRAW_DB_KIND") {
        Ok(raw) if !raw.trim().is_empty() => Ok(raw.parse::<DbKind>()?),
        _ => Ok(DbKind::Postgres),
    }
}
