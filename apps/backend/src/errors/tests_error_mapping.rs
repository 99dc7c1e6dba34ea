// Unit tests for error mapping - pure domain logic without HTTP or database dependencies
use crate::errors::domain::{
    ConflictKind, ConnectivityCode, DomainError, InfraErrorKind, ValidationKind,
};
use crate::errors::ErrorCode;
use crate::AppError;

#[test]
fn maps_validation_to_400() {
    let de = DomainError::validation(ValidationKind::GuestIdRequired, "guest_id is required");
    let app: AppError = de.into();
    assert_eq!(app.code(), ErrorCode::GuestIdRequired);
    assert_eq!(app.status().as_u16(), 400);

    let too_long = DomainError::validation(ValidationKind::GuestIdTooLong, "too long");
    let app: AppError = too_long.into();
    assert_eq!(app.code(), ErrorCode::GuestIdTooLong);
    assert_eq!(app.status().as_u16(), 400);
}

#[test]
fn maps_conflicts() {
    let race = DomainError::conflict(ConflictKind::ConcurrentDraw, "draw in progress");
    let app: AppError = race.into();
    assert_eq!(app.code().as_str(), "CONCURRENT_DRAW");
    assert_eq!(app.status().as_u16(), 409);

    let lock = DomainError::conflict(ConflictKind::OptimisticLock, "stale");
    let app: AppError = lock.into();
    assert_eq!(app.code().as_str(), "OPTIMISTIC_LOCK");
    assert_eq!(app.status().as_u16(), 409);

    let busy = DomainError::conflict(ConflictKind::StoreBusy, "database is locked");
    let app: AppError = busy.into();
    assert_eq!(app.code().as_str(), "STORE_BUSY");
    assert_eq!(app.status().as_u16(), 409);

    let other = DomainError::conflict(ConflictKind::Other("x".into()), "generic conflict");
    let app: AppError = other.into();
    assert_eq!(app.code().as_str(), "CONFLICT");
}

#[test]
fn maps_every_connectivity_code_to_503() {
    for code in ConnectivityCode::ALL {
        let app: AppError =
            DomainError::infra(InfraErrorKind::Connectivity(code), "store down").into();
        assert_eq!(app.status().as_u16(), 503);
        assert_eq!(app.code().as_str(), code.as_str());
        assert!(matches!(app, AppError::DbUnavailable { .. }));
    }
}

#[test]
fn maps_other_infra_to_500() {
    let app: AppError = DomainError::infra(InfraErrorKind::Other("DbErr".into()), "boom").into();
    assert_eq!(app.code(), ErrorCode::DbError);
    assert_eq!(app.status().as_u16(), 500);

    let app: AppError = DomainError::infra(InfraErrorKind::DataCorruption, "bad row").into();
    assert_eq!(app.code(), ErrorCode::DataCorruption);
    assert_eq!(app.status().as_u16(), 500);
}

#[test]
fn retryable_conflicts() {
    assert!(DomainError::conflict(ConflictKind::OptimisticLock, "").is_retryable_conflict());
    assert!(DomainError::conflict(ConflictKind::Unique, "").is_retryable_conflict());
    assert!(DomainError::conflict(ConflictKind::StoreBusy, "").is_retryable_conflict());
    assert!(!DomainError::conflict(ConflictKind::ConcurrentDraw, "").is_retryable_conflict());
    assert!(!DomainError::validation(ValidationKind::GuestIdRequired, "").is_retryable_conflict());
}
