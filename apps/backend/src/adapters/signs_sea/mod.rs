//! SeaORM adapter for the sign pool - generic over ConnectionTrait.

use sea_orm::sea_query::Expr;
use sea_orm::{
    ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};

use crate::entities::signs;

pub mod dto;

pub use dto::SignCreate;

pub async fn count_undrawn<C: ConnectionTrait + Send + Sync>(
    conn: &C,
) -> Result<u64, sea_orm::DbErr> {
    signs::Entity::find()
        .filter(signs::Column::IsDrawn.eq(false))
        .count(conn)
        .await
}

/// Undrawn sign at `offset` in id order, locked for update.
///
/// SQLite has no row locks; sea-query drops the `FOR UPDATE` clause there and
/// the database-level write lock serialises allocators instead.
pub async fn find_undrawn_at_offset_for_update<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    offset: u64,
) -> Result<Option<signs::Model>, sea_orm::DbErr> {
    signs::Entity::find()
        .filter(signs::Column::IsDrawn.eq(false))
        .order_by_asc(signs::Column::Id)
        .offset(offset)
        .lock_exclusive()
        .one(conn)
        .await
}

/// Flip `is_drawn` only if it is still false. Returns rows affected (0 or 1).
pub async fn mark_drawn<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    sign_id: &str,
) -> Result<u64, sea_orm::DbErr> {
    let result = signs::Entity::update_many()
        .col_expr(signs::Column::IsDrawn, Expr::value(true))
        .filter(signs::Column::Id.eq(sign_id))
        .filter(signs::Column::IsDrawn.eq(false))
        .exec(conn)
        .await?;
    Ok(result.rows_affected)
}

pub async fn insert_batch<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    batch: Vec<SignCreate>,
) -> Result<(), sea_orm::DbErr> {
    if batch.is_empty() {
        return Ok(());
    }

    let rows = batch.into_iter().map(|dto| signs::ActiveModel {
        id: Set(dto.id),
        level: Set(dto.level),
        sign_type: Set(dto.sign_type),
        reward_code: Set(dto.reward_code),
        is_drawn: Set(false),
    });

    signs::Entity::insert_many(rows).exec(conn).await?;
    Ok(())
}

pub async fn delete_all<C: ConnectionTrait + Send + Sync>(conn: &C) -> Result<u64, sea_orm::DbErr> {
    let result = signs::Entity::delete_many().exec(conn).await?;
    Ok(result.rows_affected)
}

pub async fn count_all<C: ConnectionTrait + Send + Sync>(conn: &C) -> Result<u64, sea_orm::DbErr> {
    signs::Entity::find().count(conn).await
}

pub async fn count_drawn<C: ConnectionTrait + Send + Sync>(
    conn: &C,
) -> Result<u64, sea_orm::DbErr> {
    signs::Entity::find()
        .filter(signs::Column::IsDrawn.eq(true))
        .count(conn)
        .await
}

/// `(level, count)` pairs ordered by level.
pub async fn count_by_level<C: ConnectionTrait + Send + Sync>(
    conn: &C,
) -> Result<Vec<(i32, i64)>, sea_orm::DbErr> {
    signs::Entity::find()
        .select_only()
        .column(signs::Column::Level)
        .column_as(Expr::col(signs::Column::Id).count(), "n")
        .group_by(signs::Column::Level)
        .order_by_asc(signs::Column::Level)
        .into_tuple::<(i32, i64)>()
        .all(conn)
        .await
}

pub async fn count_distinct_ids<C: ConnectionTrait + Send + Sync>(
    conn: &C,
) -> Result<i64, sea_orm::DbErr> {
    let n = signs::Entity::find()
        .select_only()
        .column_as(Expr::col(signs::Column::Id).count_distinct(), "n")
        .into_tuple::<i64>()
        .one(conn)
        .await?;
    Ok(n.unwrap_or(0))
}
