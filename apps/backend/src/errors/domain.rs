//! Domain-level error type used across services and repos.
//!
//! This error type is HTTP- and DB-agnostic. Handlers return
//! `Result<T, crate::error::AppError>` and convert from `DomainError`
//! through `From<DomainError> for AppError`.

use std::error::Error;
use std::fmt::{Display, Formatter, Result as FmtResult};

/// Transient store failures that surface as 503.
///
/// The wire codes are the ones clients of the draw API already know
/// (socket errno names and the classic access / unknown-db / too-many codes).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConnectivityCode {
    ConnectionRefused,
    Timeout,
    HostNotFound,
    ConnectionReset,
    AccessDenied,
    UnknownDatabase,
    TooManyConnections,
}

impl ConnectivityCode {
    pub const ALL: [ConnectivityCode; 7] = [
        ConnectivityCode::ConnectionRefused,
        ConnectivityCode::Timeout,
        ConnectivityCode::HostNotFound,
        ConnectivityCode::ConnectionReset,
        ConnectivityCode::AccessDenied,
        ConnectivityCode::UnknownDatabase,
        ConnectivityCode::TooManyConnections,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::ConnectionRefused => "ECONNREFUSED",
            Self::Timeout => "ETIMEDOUT",
            Self::HostNotFound => "ENOTFOUND",
            Self::ConnectionReset => "ECONNRESET",
            Self::AccessDenied => "ER_ACCESS_DENIED_ERROR",
            Self::UnknownDatabase => "ER_BAD_DB_ERROR",
            Self::TooManyConnections => "ER_CON_COUNT_ERROR",
        }
    }
}

/// Infra error kinds to distinguish operational failures
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum InfraErrorKind {
    Connectivity(ConnectivityCode),
    DataCorruption,
    Other(String),
}

/// Rejected input, always detected before any persistence access
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ValidationKind {
    GuestIdRequired,
    GuestIdTooLong,
    InvalidBody,
    Other(String),
}

/// Domain-level conflict kinds
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConflictKind {
    /// A versioned row changed underneath the writer
    OptimisticLock,
    /// Another draw for the same participant kept winning the race
    ConcurrentDraw,
    Unique,
    /// Another connection holds the store's write lock (SQLite busy/locked)
    StoreBusy,
    Other(String),
}

/// Central domain error type
#[derive(Debug, Clone, PartialEq)]
pub enum DomainError {
    Validation(ValidationKind, String),
    Conflict(ConflictKind, String),
    Infra(InfraErrorKind, String),
}

impl Display for DomainError {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            DomainError::Validation(kind, d) => write!(f, "validation error {kind:?}: {d}"),
            DomainError::Conflict(kind, d) => write!(f, "conflict {kind:?}: {d}"),
            DomainError::Infra(kind, d) => write!(f, "infra {kind:?}: {d}"),
        }
    }
}

impl Error for DomainError {}

impl DomainError {
    pub fn validation(kind: ValidationKind, detail: impl Into<String>) -> Self {
        Self::Validation(kind, detail.into())
    }
    pub fn conflict(kind: ConflictKind, detail: impl Into<String>) -> Self {
        Self::Conflict(kind, detail.into())
    }
    pub fn infra(kind: InfraErrorKind, detail: impl Into<String>) -> Self {
        Self::Infra(kind, detail.into())
    }

    /// True for conflicts a fresh transaction may resolve.
    pub fn is_retryable_conflict(&self) -> bool {
        matches!(
            self,
            DomainError::Conflict(
                ConflictKind::OptimisticLock | ConflictKind::Unique | ConflictKind::StoreBusy,
                _
            )
        )
    }
}
