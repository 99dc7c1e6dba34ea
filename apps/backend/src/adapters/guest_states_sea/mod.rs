//! SeaORM adapter for per-guest round state - generic over ConnectionTrait.

use sea_orm::sea_query::Expr;
use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, Set};

use crate::entities::guest_round_states;
use crate::infra::db_errors::OPTIMISTIC_LOCK_PREFIX;

pub mod dto;

pub use dto::{GuestStateCreate, GuestStateUpdate};

pub async fn find<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    guest_id: &str,
) -> Result<Option<guest_round_states::Model>, sea_orm::DbErr> {
    guest_round_states::Entity::find_by_id(guest_id.to_string())
        .one(conn)
        .await
}

/// Insert the first row for a guest at version 1. A concurrent insert for the
/// same guest fails on the primary key.
pub async fn insert_initial<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: GuestStateCreate,
) -> Result<guest_round_states::Model, sea_orm::DbErr> {
    let state = guest_round_states::ActiveModel {
        guest_id: Set(dto.guest_id),
        last_round: Set(dto.last_round),
        last_won: Set(dto.last_won),
        round_index: Set(dto.round_index),
        version: Set(1),
        updated_at: Set(time::OffsetDateTime::now_utc()),
    };

    state.insert(conn).await
}

/// Apply the update only if the stored version matches, bump the version,
/// then refetch.
pub async fn update_with_version<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: GuestStateUpdate,
) -> Result<guest_round_states::Model, sea_orm::DbErr> {
    let now = time::OffsetDateTime::now_utc();

    let result = guest_round_states::Entity::update_many()
        .col_expr(guest_round_states::Column::LastRound, Expr::value(dto.last_round))
        .col_expr(guest_round_states::Column::LastWon, Expr::value(dto.last_won))
        .col_expr(guest_round_states::Column::RoundIndex, Expr::value(dto.round_index))
        .col_expr(guest_round_states::Column::UpdatedAt, Expr::value(now))
        .col_expr(
            guest_round_states::Column::Version,
            Expr::col(guest_round_states::Column::Version).add(1),
        )
        .filter(guest_round_states::Column::GuestId.eq(dto.guest_id.as_str()))
        .filter(guest_round_states::Column::Version.eq(dto.expected_version))
        .exec(conn)
        .await?;

    if result.rows_affected == 0 {
        // distinguish a missing row from a stale version
        return match find(conn, &dto.guest_id).await? {
            Some(current) => Err(sea_orm::DbErr::Custom(format!(
                "{OPTIMISTIC_LOCK_PREFIX}{{\"expected\":{},\"actual\":{}}}",
                dto.expected_version, current.version
            ))),
            None => Err(sea_orm::DbErr::RecordNotFound(
                "Guest round state not found".to_string(),
            )),
        };
    }

    find(conn, &dto.guest_id)
        .await?
        .ok_or_else(|| sea_orm::DbErr::RecordNotFound("Guest round state not found".to_string()))
}
