//! Error codes for the draw API.
//!
//! Add new codes here; never pass ad-hoc strings as error codes. Each
//! variant maps 1:1 to the `code` string in HTTP error bodies.

use core::fmt;

use crate::errors::domain::ConnectivityCode;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Request Validation
    /// Guest id missing or blank
    GuestIdRequired,
    /// Guest id longer than the column allows
    GuestIdTooLong,
    /// Body present but not a JSON object
    InvalidJson,
    ValidationError,
    BadRequest,

    // Conflicts
    /// Same participant drew concurrently and retries ran out
    ConcurrentDraw,
    OptimisticLock,
    UniqueViolation,
    /// Store write lock held elsewhere and retries ran out
    StoreBusy,
    Conflict,

    // Store connectivity (503)
    ConnectionRefused,
    ConnectionTimeout,
    HostNotFound,
    ConnectionReset,
    AccessDenied,
    UnknownDatabase,
    TooManyConnections,
    /// No database configured for this process
    DbUnavailable,

    // System Errors
    DbError,
    Internal,
    ConfigError,
    DataCorruption,
}

impl ErrorCode {
    /// The exact string that appears in HTTP responses.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::GuestIdRequired => "GUEST_ID_REQUIRED",
            Self::GuestIdTooLong => "GUEST_ID_TOO_LONG",
            Self::InvalidJson => "INVALID_JSON",
            Self::ValidationError => "VALIDATION_ERROR",
            Self::BadRequest => "BAD_REQUEST",

            Self::ConcurrentDraw => "CONCURRENT_DRAW",
            Self::OptimisticLock => "OPTIMISTIC_LOCK",
            Self::UniqueViolation => "UNIQUE_VIOLATION",
            Self::StoreBusy => "STORE_BUSY",
            Self::Conflict => "CONFLICT",

            Self::ConnectionRefused => ConnectivityCode::ConnectionRefused.as_str(),
            Self::ConnectionTimeout => ConnectivityCode::Timeout.as_str(),
            Self::HostNotFound => ConnectivityCode::HostNotFound.as_str(),
            Self::ConnectionReset => ConnectivityCode::ConnectionReset.as_str(),
            Self::AccessDenied => ConnectivityCode::AccessDenied.as_str(),
            Self::UnknownDatabase => ConnectivityCode::UnknownDatabase.as_str(),
            Self::TooManyConnections => ConnectivityCode::TooManyConnections.as_str(),
            Self::DbUnavailable => "DB_UNAVAILABLE",

            Self::DbError => "DB_ERROR",
            Self::Internal => "INTERNAL",
            Self::ConfigError => "CONFIG_ERROR",
            Self::DataCorruption => "DATA_CORRUPTION",
        }
    }
}

impl From<ConnectivityCode> for ErrorCode {
    fn from(code: ConnectivityCode) -> Self {
        match code {
            ConnectivityCode::ConnectionRefused => Self::ConnectionRefused,
            ConnectivityCode::Timeout => Self::ConnectionTimeout,
            ConnectivityCode::HostNotFound => Self::HostNotFound,
            ConnectivityCode::ConnectionReset => Self::ConnectionReset,
            ConnectivityCode::AccessDenied => Self::AccessDenied,
            ConnectivityCode::UnknownDatabase => Self::UnknownDatabase,
            ConnectivityCode::TooManyConnections => Self::TooManyConnections,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
