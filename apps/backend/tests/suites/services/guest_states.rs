use backend_test_support::unique_helpers::unique_guest_id;
use luckydraw::config::draw::DrawConfig;
use luckydraw::domain::rounds::{DrawRound, LastDraw};
use luckydraw::errors::domain::{ConflictKind, DomainError, InfraErrorKind};
use luckydraw::repos::guest_states;

use crate::support::db::{db, memory_state};

fn lost_round_one() -> LastDraw {
    LastDraw {
        round: DrawRound::First,
        won: false,
        round_index: 1,
    }
}

fn won_round_two() -> LastDraw {
    LastDraw {
        round: DrawRound::Second,
        won: true,
        round_index: 1,
    }
}

#[tokio::test]
async fn advance_bumps_version() {
    let state = memory_state(DrawConfig::default()).await;
    let guest = unique_guest_id();

    let created = guest_states::create(db(&state), &guest, lost_round_one())
        .await
        .unwrap();
    assert_eq!(created.version, 1);

    let advanced = guest_states::advance(db(&state), &guest, 1, won_round_two())
        .await
        .unwrap();
    assert_eq!(advanced.version, 2);
    assert_eq!(advanced.last, won_round_two());

    let found = guest_states::find(db(&state), &guest).await.unwrap();
    assert_eq!(found, Some(advanced));
}

#[tokio::test]
async fn stale_version_is_optimistic_lock_conflict() {
    let state = memory_state(DrawConfig::default()).await;
    let guest = unique_guest_id();

    guest_states::create(db(&state), &guest, lost_round_one())
        .await
        .unwrap();
    guest_states::advance(db(&state), &guest, 1, won_round_two())
        .await
        .unwrap();

    let err = guest_states::advance(db(&state), &guest, 1, lost_round_one())
        .await
        .unwrap_err();
    assert!(
        matches!(err, DomainError::Conflict(ConflictKind::OptimisticLock, _)),
        "unexpected error: {err:?}"
    );
    assert!(err.is_retryable_conflict());

    // the stale write left the row untouched
    let found = guest_states::find(db(&state), &guest).await.unwrap().unwrap();
    assert_eq!(found.version, 2);
    assert_eq!(found.last, won_round_two());
}

#[tokio::test]
async fn second_create_is_unique_conflict() {
    let state = memory_state(DrawConfig::default()).await;
    let guest = unique_guest_id();

    guest_states::create(db(&state), &guest, lost_round_one())
        .await
        .unwrap();
    let err = guest_states::create(db(&state), &guest, lost_round_one())
        .await
        .unwrap_err();
    assert!(
        matches!(err, DomainError::Conflict(ConflictKind::Unique, _)),
        "unexpected error: {err:?}"
    );
    assert!(err.is_retryable_conflict());
}

#[tokio::test]
async fn advancing_missing_guest_is_data_corruption() {
    let state = memory_state(DrawConfig::default()).await;

    let err = guest_states::advance(db(&state), "nobody", 1, lost_round_one())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        DomainError::Infra(InfraErrorKind::DataCorruption, _)
    ));
}
