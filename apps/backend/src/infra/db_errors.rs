//! SeaORM -> DomainError translation helpers.
//!
//! Repos convert `sea_orm::DbErr` into `crate::errors::domain::DomainError`
//! here; higher layers then map `DomainError` to `AppError` via `From`.

use std::io::ErrorKind;

use sea_orm::{ConnAcquireErr, DbErr, RuntimeErr};
use tracing::{error, warn};

use crate::errors::domain::{ConflictKind, ConnectivityCode, DomainError, InfraErrorKind};
use crate::trace_ctx;

/// Prefix adapters use for version-guard failures: `OPTIMISTIC_LOCK:{json}`.
pub const OPTIMISTIC_LOCK_PREFIX: &str = "OPTIMISTIC_LOCK:";

fn mentions_sqlstate(msg: &str, code: &str) -> bool {
    msg.contains(code) || msg.contains(&format!("SQLSTATE({code})"))
}

fn classify_io(kind: ErrorKind) -> Option<ConnectivityCode> {
    match kind {
        ErrorKind::ConnectionRefused => Some(ConnectivityCode::ConnectionRefused),
        ErrorKind::TimedOut => Some(ConnectivityCode::Timeout),
        ErrorKind::ConnectionReset
        | ErrorKind::ConnectionAborted
        | ErrorKind::BrokenPipe
        | ErrorKind::NotConnected
        | ErrorKind::UnexpectedEof => Some(ConnectivityCode::ConnectionReset),
        _ => None,
    }
}

fn classify_database_code(code: &str) -> Option<ConnectivityCode> {
    match code {
        // postgres: invalid_authorization_specification / invalid_password
        "28000" | "28P01" => Some(ConnectivityCode::AccessDenied),
        // postgres: invalid_catalog_name
        "3D000" => Some(ConnectivityCode::UnknownDatabase),
        // postgres: too_many_connections
        "53300" => Some(ConnectivityCode::TooManyConnections),
        // postgres: admin_shutdown / crash_shutdown / cannot_connect_now
        "57P01" | "57P02" | "57P03" => Some(ConnectivityCode::ConnectionReset),
        // sqlite: SQLITE_CANTOPEN
        "14" => Some(ConnectivityCode::UnknownDatabase),
        _ => None,
    }
}

fn classify_message(msg: &str) -> Option<ConnectivityCode> {
    let lower = msg.to_ascii_lowercase();
    if lower.contains("connection refused") {
        Some(ConnectivityCode::ConnectionRefused)
    } else if lower.contains("failed to lookup address")
        || lower.contains("name or service not known")
        || lower.contains("nodename nor servname")
        || lower.contains("no such host")
    {
        Some(ConnectivityCode::HostNotFound)
    } else if lower.contains("timed out") || lower.contains("timeout") {
        Some(ConnectivityCode::Timeout)
    } else if lower.contains("connection reset") || lower.contains("broken pipe") {
        Some(ConnectivityCode::ConnectionReset)
    } else if lower.contains("password authentication failed")
        || lower.contains("authentication failed")
    {
        Some(ConnectivityCode::AccessDenied)
    } else if lower.contains("does not exist") && lower.contains("database") {
        Some(ConnectivityCode::UnknownDatabase)
    } else if lower.contains("too many connections")
        || lower.contains("too many clients")
        || lower.contains("remaining connection slots")
    {
        Some(ConnectivityCode::TooManyConnections)
    } else if lower.contains("unable to open database file") {
        Some(ConnectivityCode::UnknownDatabase)
    } else {
        None
    }
}

fn classify_sqlx(e: &sqlx::Error) -> Option<ConnectivityCode> {
    match e {
        sqlx::Error::Io(io) => classify_io(io.kind()).or_else(|| classify_message(&io.to_string())),
        sqlx::Error::PoolTimedOut => Some(ConnectivityCode::Timeout),
        sqlx::Error::PoolClosed | sqlx::Error::WorkerCrashed => {
            Some(ConnectivityCode::ConnectionReset)
        }
        sqlx::Error::Tls(inner) => classify_message(&inner.to_string()),
        sqlx::Error::Database(db) => db
            .code()
            .and_then(|code| classify_database_code(code.as_ref())),
        _ => None,
    }
}

/// Recognise transient store failures that should surface as 503.
pub fn classify_connectivity(e: &DbErr) -> Option<ConnectivityCode> {
    match e {
        DbErr::ConnectionAcquire(ConnAcquireErr::Timeout) => Some(ConnectivityCode::Timeout),
        DbErr::ConnectionAcquire(ConnAcquireErr::ConnectionClosed) => {
            Some(ConnectivityCode::ConnectionReset)
        }
        DbErr::Conn(RuntimeErr::SqlxError(inner))
        | DbErr::Exec(RuntimeErr::SqlxError(inner))
        | DbErr::Query(RuntimeErr::SqlxError(inner)) => classify_sqlx(inner),
        // a connect failure always means the store is unreachable
        DbErr::Conn(other) => {
            classify_message(&other.to_string()).or(Some(ConnectivityCode::ConnectionRefused))
        }
        _ => None,
    }
}

// sqlite: BUSY, LOCKED, BUSY_RECOVERY, LOCKED_SHAREDCACHE, BUSY_SNAPSHOT
const SQLITE_BUSY_CODES: [&str; 5] = ["5", "6", "261", "262", "517"];

/// SQLite refused the write because another connection holds the lock.
fn is_store_busy(e: &DbErr, msg: &str) -> bool {
    let from_driver = match e {
        DbErr::Conn(RuntimeErr::SqlxError(sqlx::Error::Database(db)))
        | DbErr::Exec(RuntimeErr::SqlxError(sqlx::Error::Database(db)))
        | DbErr::Query(RuntimeErr::SqlxError(sqlx::Error::Database(db))) => db
            .code()
            .is_some_and(|code| SQLITE_BUSY_CODES.contains(&&*code)),
        _ => false,
    };
    from_driver
        || msg.contains("database is locked")
        || msg.contains("database table is locked")
        || msg.contains("SQLITE_BUSY")
}

fn is_unique_violation(e: &DbErr, msg: &str) -> bool {
    let from_driver = match e {
        DbErr::Exec(RuntimeErr::SqlxError(sqlx::Error::Database(db)))
        | DbErr::Query(RuntimeErr::SqlxError(sqlx::Error::Database(db))) => {
            db.is_unique_violation()
        }
        _ => false,
    };
    from_driver
        || mentions_sqlstate(msg, "23505")
        || msg.contains("duplicate key value violates unique constraint")
        || msg.contains("UNIQUE constraint failed")
}

/// Translate a `DbErr` into a `DomainError` with sanitized detail.
pub fn map_db_err(e: DbErr) -> DomainError {
    let error_msg = e.to_string();
    let trace_id = trace_ctx::trace_id();

    if let DbErr::Custom(msg) = &e {
        if let Some(json_str) = msg.strip_prefix(OPTIMISTIC_LOCK_PREFIX) {
            #[derive(serde::Deserialize)]
            struct LockInfo {
                expected: i32,
                actual: i32,
            }

            if let Ok(info) = serde_json::from_str::<LockInfo>(json_str) {
                warn!(
                    trace_id = %trace_id,
                    expected = info.expected,
                    actual = info.actual,
                    "Optimistic lock conflict detected"
                );
                return DomainError::conflict(
                    ConflictKind::OptimisticLock,
                    format!(
                        "Participant state was modified concurrently (expected version {}, actual version {})",
                        info.expected, info.actual
                    ),
                );
            }

            warn!(trace_id = %trace_id, "Optimistic lock conflict detected (version info unavailable)");
            return DomainError::conflict(
                ConflictKind::OptimisticLock,
                "Participant state was modified by another transaction",
            );
        }
    }

    if let DbErr::RecordNotFound(what) = &e {
        error!(trace_id = %trace_id, record = %what, "Expected record is missing");
        return DomainError::infra(InfraErrorKind::DataCorruption, "Expected record is missing");
    }

    if is_store_busy(&e, &error_msg) {
        warn!(trace_id = %trace_id, raw_error = %error_msg, "Store write lock busy");
        return DomainError::conflict(ConflictKind::StoreBusy, "Store is busy with another write");
    }

    if let Some(code) = classify_connectivity(&e) {
        warn!(trace_id = %trace_id, code = code.as_str(), raw_error = %error_msg, "Database unavailable");
        return DomainError::infra(InfraErrorKind::Connectivity(code), "Database unavailable");
    }

    if is_unique_violation(&e, &error_msg) {
        warn!(trace_id = %trace_id, raw_error = %error_msg, "Unique constraint violation");
        return DomainError::conflict(ConflictKind::Unique, "Unique constraint violation");
    }

    error!(trace_id = %trace_id, raw_error = %error_msg, "Unhandled database error");
    DomainError::infra(
        InfraErrorKind::Other("DbErr".into()),
        "Database operation failed",
    )
}

impl From<DbErr> for DomainError {
    fn from(e: DbErr) -> Self {
        map_db_err(e)
    }
}
