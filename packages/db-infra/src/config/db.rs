use std::path::{Path, PathBuf};
use std::str::FromStr;

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use sea_orm::DatabaseBackend;
use tracing::warn;

use crate::error::DbInfraError;

/// Runtime environment the process is configured for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuntimeEnv {
    Prod,
    /// Enforces the `_test` suffix on database names
    Test,
}

/// Storage engine selected by `LUCKYDRAW_DB_KIND`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DbKind {
    Postgres,
    SqliteFile,
    SqliteMemory,
}

impl FromStr for DbKind {
    type Err = DbInfraError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" | "pg" => Ok(DbKind::Postgres),
            "sqlite-file" | "sqlite_file" | "sqlite" => Ok(DbKind::SqliteFile),
            "sqlite-memory" | "sqlite_memory" | "memory" => Ok(DbKind::SqliteMemory),
            other => Err(DbInfraError::config(format!(
                "unknown database kind '{other}' (expected postgres, sqlite-file or sqlite-memory)"
            ))),
        }
    }
}

impl From<DbKind> for DatabaseBackend {
    fn from(kind: DbKind) -> Self {
        match kind {
            DbKind::Postgres => DatabaseBackend::Postgres,
            DbKind::SqliteFile | DbKind::SqliteMemory => DatabaseBackend::Sqlite,
        }
    }
}

/// Which role a connection authenticates as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DbOwner {
    /// Application-level access (limited permissions)
    App,
    /// Owner-level access (full permissions for migrations and seeding)
    Owner,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PoolPurpose {
    Runtime,
    Migration,
}

/// Per-connection session settings, applied on every new pooled connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DbSettings {
    Postgres {
        app_name: String,
        statement_timeout: String,
        idle_in_transaction_timeout: String,
        lock_timeout: Option<String>,
    },
    Sqlite {
        busy_timeout_ms: u64,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionSettings {
    pub pool_min: u32,
    pub pool_max: u32,
    pub acquire_timeout_ms: u64,
    pub db_settings: DbSettings,
}

pub const POOL_MAX_VAR: &str = "LUCKYDRAW_DB_POOL_MAX";
const DEFAULT_SQLITE_DIR: &str = "./data";

/// Characters escaped in the userinfo part of a connection string.
const USERINFO: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b':')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'@')
    .add(b'[')
    .add(b'\\')
    .add(b']')
    .add(b'^')
    .add(b'`')
    .add(b'{')
    .add(b'|')
    .add(b'}');

fn process_env(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

fn must_var(lookup: &dyn Fn(&str) -> Option<String>, name: &str) -> Result<String, DbInfraError> {
    lookup(name)
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| {
            DbInfraError::config(format!("Required environment variable '{name}' is not set"))
        })
}

/// Check that the environment carries everything `make_conn_spec` will need.
pub fn validate_db_config(env: RuntimeEnv, db_kind: DbKind) -> Result<(), DbInfraError> {
    validate_db_config_with(env, db_kind, &process_env)
}

pub fn validate_db_config_with(
    env: RuntimeEnv,
    db_kind: DbKind,
    lookup: &dyn Fn(&str) -> Option<String>,
) -> Result<(), DbInfraError> {
    match db_kind {
        DbKind::Postgres => {
            db_name(env, lookup)?;
            credentials(DbOwner::App, lookup)?;
            credentials(DbOwner::Owner, lookup)?;
            Ok(())
        }
        DbKind::SqliteFile | DbKind::SqliteMemory => Ok(()),
    }
}

fn db_name(env: RuntimeEnv, lookup: &dyn Fn(&str) -> Option<String>) -> Result<String, DbInfraError> {
    match env {
        RuntimeEnv::Prod => must_var(lookup, "PROD_DB"),
        RuntimeEnv::Test => {
            let name = must_var(lookup, "TEST_DB")?;
            if !name.ends_with("_test") {
                return Err(DbInfraError::config(format!(
                    "Test environment requires database name to end with '_test', but got: '{name}'"
                )));
            }
            Ok(name)
        }
    }
}

fn credentials(
    owner: DbOwner,
    lookup: &dyn Fn(&str) -> Option<String>,
) -> Result<(String, String), DbInfraError> {
    let (user_var, password_var) = match owner {
        DbOwner::App => ("APP_DB_USER", "APP_DB_PASSWORD"),
        DbOwner::Owner => ("LUCKYDRAW_OWNER_USER", "LUCKYDRAW_OWNER_PASSWORD"),
    };
    Ok((must_var(lookup, user_var)?, must_var(lookup, password_var)?))
}

fn sqlite_dir(lookup: &dyn Fn(&str) -> Option<String>) -> PathBuf {
    lookup("SQLITE_DB_DIR")
        .filter(|v| !v.trim().is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_SQLITE_DIR))
}

/// Path of the SQLite database file for the given environment.
pub fn sqlite_file_spec(db_kind: DbKind, env: RuntimeEnv) -> Result<String, DbInfraError> {
    sqlite_file_spec_with(db_kind, env, &process_env)
}

pub fn sqlite_file_spec_with(
    db_kind: DbKind,
    env: RuntimeEnv,
    lookup: &dyn Fn(&str) -> Option<String>,
) -> Result<String, DbInfraError> {
    if db_kind != DbKind::SqliteFile {
        return Err(DbInfraError::config(
            "sqlite_file_spec only applies to the sqlite-file database kind",
        ));
    }
    let file = match env {
        RuntimeEnv::Prod => "luckydraw.db",
        RuntimeEnv::Test => "luckydraw_test.db",
    };
    Ok(sqlite_dir(lookup).join(file).to_string_lossy().into_owned())
}

/// Build the connection string for the given environment, engine and role.
/// SQLite ignores the role; Postgres credentials are percent-encoded.
pub fn make_conn_spec(env: RuntimeEnv, db_kind: DbKind, owner: DbOwner) -> Result<String, DbInfraError> {
    let spec = make_conn_spec_with(env, db_kind, owner, &process_env)?;
    if db_kind == DbKind::SqliteFile {
        let file = sqlite_file_spec(db_kind, env)?;
        if let Some(dir) = Path::new(&file).parent() {
            std::fs::create_dir_all(dir).map_err(|e| {
                DbInfraError::config(format!(
                    "failed to create SQLite directory '{}': {e}",
                    dir.display()
                ))
            })?;
        }
    }
    Ok(spec)
}

pub fn make_conn_spec_with(
    env: RuntimeEnv,
    db_kind: DbKind,
    owner: DbOwner,
    lookup: &dyn Fn(&str) -> Option<String>,
) -> Result<String, DbInfraError> {
    match db_kind {
        DbKind::Postgres => {
            let host = lookup("POSTGRES_HOST").unwrap_or_else(|| "localhost".to_string());
            let port = lookup("POSTGRES_PORT").unwrap_or_else(|| "5432".to_string());
            let name = db_name(env, lookup)?;
            let (user, password) = credentials(owner, lookup)?;
            Ok(format!(
                "postgresql://{}:{}@{host}:{port}/{name}",
                utf8_percent_encode(&user, USERINFO),
                utf8_percent_encode(&password, USERINFO),
            ))
        }
        DbKind::SqliteFile => {
            let file = sqlite_file_spec_with(db_kind, env, lookup)?;
            Ok(format!("sqlite://{file}?mode=rwc"))
        }
        DbKind::SqliteMemory => Ok("sqlite::memory:".to_string()),
    }
}

pub fn build_connection_settings(
    env: RuntimeEnv,
    db_kind: DbKind,
    purpose: PoolPurpose,
) -> Result<ConnectionSettings, DbInfraError> {
    build_connection_settings_with(env, db_kind, purpose, &process_env)
}

pub fn build_connection_settings_with(
    env: RuntimeEnv,
    db_kind: DbKind,
    purpose: PoolPurpose,
    lookup: &dyn Fn(&str) -> Option<String>,
) -> Result<ConnectionSettings, DbInfraError> {
    let configured_max = match lookup(POOL_MAX_VAR) {
        Some(raw) => Some(raw.trim().parse::<u32>().ok().filter(|n| *n > 0).ok_or_else(
            || DbInfraError::config(format!("{POOL_MAX_VAR} must be a positive integer, got '{raw}'")),
        )?),
        None => None,
    };

    let acquire_timeout_ms = match env {
        RuntimeEnv::Prod => 5_000,
        RuntimeEnv::Test => 3_000,
    };

    let settings = match (db_kind, purpose) {
        // every in-memory connection is its own database, so the pool is pinned to one
        (DbKind::SqliteMemory, _) => ConnectionSettings {
            pool_min: 1,
            pool_max: 1,
            acquire_timeout_ms,
            db_settings: DbSettings::Sqlite {
                busy_timeout_ms: 5_000,
            },
        },
        (_, PoolPurpose::Migration) => ConnectionSettings {
            pool_min: 1,
            pool_max: 1,
            acquire_timeout_ms,
            db_settings: default_db_settings(db_kind, None),
        },
        // every draw writes and SQLite admits one writer; one connection queues
        // draws in the pool instead of failing them with SQLITE_BUSY
        (DbKind::SqliteFile, PoolPurpose::Runtime) => {
            if let Some(max) = configured_max.filter(|max| *max > 1) {
                warn!(
                    configured = max,
                    "{POOL_MAX_VAR} ignored for sqlite-file; using a single connection"
                );
            }
            ConnectionSettings {
                pool_min: 1,
                pool_max: 1,
                acquire_timeout_ms,
                db_settings: default_db_settings(db_kind, None),
            }
        }
        (DbKind::Postgres, PoolPurpose::Runtime) => {
            let pool_max = configured_max.unwrap_or_else(|| (num_cpus::get() as u32) * 2);
            ConnectionSettings {
                pool_min: 1.min(pool_max),
                pool_max,
                acquire_timeout_ms,
                db_settings: default_db_settings(db_kind, Some("5s".to_string())),
            }
        }
    };

    Ok(settings)
}

fn default_db_settings(db_kind: DbKind, lock_timeout: Option<String>) -> DbSettings {
    match db_kind {
        DbKind::Postgres => DbSettings::Postgres {
            app_name: "luckydraw".to_string(),
            statement_timeout: "15s".to_string(),
            idle_in_transaction_timeout: "15s".to_string(),
            lock_timeout,
        },
        DbKind::SqliteFile | DbKind::SqliteMemory => DbSettings::Sqlite {
            busy_timeout_ms: 5_000,
        },
    }
}

/// Ordered session-level SQL for the given engine and settings.
/// SQLite file prerequisites (journal_mode, synchronous) are applied separately.
pub fn build_session_statements(db_kind: DbKind, settings: &DbSettings) -> Vec<String> {
    match (db_kind, settings) {
        (DbKind::SqliteFile | DbKind::SqliteMemory, DbSettings::Sqlite { busy_timeout_ms }) => {
            vec![
                "PRAGMA foreign_keys = ON;".to_string(),
                format!("PRAGMA busy_timeout = {busy_timeout_ms};"),
            ]
        }
        (
            DbKind::Postgres,
            DbSettings::Postgres {
                app_name,
                statement_timeout,
                idle_in_transaction_timeout,
                lock_timeout,
            },
        ) => {
            let mut stmts = vec![
                format!("SET application_name = '{}';", app_name.replace('\'', "''")),
                "SET timezone = 'UTC';".to_string(),
                format!("SET statement_timeout = '{statement_timeout}';"),
                format!("SET idle_in_transaction_session_timeout = '{idle_in_transaction_timeout}';"),
            ];
            if let Some(lock_timeout) = lock_timeout {
                stmts.push(format!("SET lock_timeout = '{lock_timeout}';"));
            }
            stmts
        }
        _ => Vec::new(),
    }
}
