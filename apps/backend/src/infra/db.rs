//! Application pool bootstrap: migrate with the owner role, then open the
//! runtime pool with per-connection session settings.

use std::str::FromStr;
use std::time::Duration;

use db_infra::{build_admin_pool, orchestrate_migration_internal, sanitize_db_url};
use migration::MigrationCommand;
use sea_orm::{DatabaseConnection, SqlxPostgresConnector, SqlxSqliteConnector};
use sqlx::postgres::PgPoolOptions;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use tracing::{info, trace, warn};

use crate::config::db::{
    build_connection_settings, build_session_statements, make_conn_spec, validate_db_config,
    ConnectionSettings, DbKind, DbOwner, PoolPurpose, RuntimeEnv,
};
use crate::error::AppError;

/// Validate config, bring the schema up to date and return the runtime pool.
///
/// In-memory SQLite databases live and die with their connection, so that
/// kind is migrated on the single-connection runtime pool itself.
pub async fn bootstrap_db(env: RuntimeEnv, db_kind: DbKind) -> Result<DatabaseConnection, AppError> {
    validate_db_config(env, db_kind)?;
    info!(env = ?env, db_kind = ?db_kind, "bootstrap=start");

    let settings = build_connection_settings(env, db_kind, PoolPurpose::Runtime)?;

    let pool = match db_kind {
        DbKind::SqliteMemory => {
            let pool = build_pool(env, db_kind, &settings).await?;
            orchestrate_migration_internal(&pool, env, db_kind, MigrationCommand::Up).await?;
            pool
        }
        DbKind::Postgres | DbKind::SqliteFile => {
            let admin = build_admin_pool(env, db_kind).await?;
            orchestrate_migration_internal(&admin, env, db_kind, MigrationCommand::Up).await?;
            if let Err(e) = admin.close().await {
                warn!(error = %e, "admin pool close failed");
            }
            build_pool(env, db_kind, &settings).await?
        }
    };

    info!("bootstrap=ready");
    Ok(pool)
}

/// Runtime pool built on raw sqlx so session statements run on every new
/// connection.
pub async fn build_pool(
    env: RuntimeEnv,
    db_kind: DbKind,
    pool_cfg: &ConnectionSettings,
) -> Result<DatabaseConnection, AppError> {
    let url = make_conn_spec(env, db_kind, DbOwner::App)?;
    let statements = build_session_statements(db_kind, &pool_cfg.db_settings);

    match db_kind {
        DbKind::SqliteFile | DbKind::SqliteMemory => {
            let connect_opts = SqliteConnectOptions::from_str(&url)
                .map_err(|e| AppError::config(format!("invalid SQLite connection options: {e}")))?
                .create_if_missing(true);

            let mut options = SqlitePoolOptions::new()
                .min_connections(pool_cfg.pool_min)
                .max_connections(pool_cfg.pool_max)
                .acquire_timeout(Duration::from_millis(pool_cfg.acquire_timeout_ms));
            if matches!(db_kind, DbKind::SqliteMemory) {
                // the database vanishes with its last connection
                options = options.idle_timeout(None).max_lifetime(None);
            }

            let pool = options
                .after_connect(move |conn, _meta| {
                    let statements = statements.clone();
                    Box::pin(async move {
                        for stmt in &statements {
                            sqlx::query(stmt).execute(&mut *conn).await?;
                        }
                        trace!("db=sqlite hook=after_connect ok");
                        Ok::<_, sqlx::Error>(())
                    })
                })
                .connect_with(connect_opts)
                .await
                .map_err(|e| AppError::config(format!("failed to create SQLite pool: {e}")))?;

            info!(
                "pool=create engine=sqlite url={} min={} max={} acquire_timeout_ms={}",
                url, pool_cfg.pool_min, pool_cfg.pool_max, pool_cfg.acquire_timeout_ms
            );
            Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
        }
        DbKind::Postgres => {
            let pool = PgPoolOptions::new()
                .min_connections(pool_cfg.pool_min)
                .max_connections(pool_cfg.pool_max)
                .acquire_timeout(Duration::from_millis(pool_cfg.acquire_timeout_ms))
                .idle_timeout(Duration::from_secs(30))
                .after_connect(move |conn, _meta| {
                    let statements = statements.clone();
                    Box::pin(async move {
                        for stmt in &statements {
                            sqlx::query(stmt).execute(&mut *conn).await?;
                        }
                        Ok::<_, sqlx::Error>(())
                    })
                })
                .connect(&url)
                .await
                .map_err(|e| AppError::config(format!("failed to connect to Postgres: {e}")))?;

            info!(
                "pool=create engine=postgres url={} min={} max={} acquire_timeout_ms={}",
                sanitize_db_url(&url),
                pool_cfg.pool_min,
                pool_cfg.pool_max,
                pool_cfg.acquire_timeout_ms
            );
            Ok(SqlxPostgresConnector::from_sqlx_postgres_pool(pool))
        }
    }
}
