//! SeaORM adapter for draw records - generic over ConnectionTrait.
//!
//! Records are append-only; there are no update or delete functions.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, NotSet, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};

use crate::entities::draw_records;

pub mod dto;

pub use dto::DrawRecordCreate;

/// Latest record for a guest by `created_at DESC, id DESC`.
pub async fn latest_for_guest<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    guest_id: &str,
) -> Result<Option<draw_records::Model>, sea_orm::DbErr> {
    draw_records::Entity::find()
        .filter(draw_records::Column::GuestId.eq(guest_id))
        .order_by_desc(draw_records::Column::CreatedAt)
        .order_by_desc(draw_records::Column::Id)
        .one(conn)
        .await
}

pub async fn insert<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: DrawRecordCreate,
) -> Result<draw_records::Model, sea_orm::DbErr> {
    let record = draw_records::ActiveModel {
        id: NotSet,
        guest_id: Set(dto.guest_id),
        draw_round: Set(dto.draw_round),
        won: Set(dto.won),
        tier: Set(dto.tier),
        prize_image_url: Set(dto.prize_image_url),
        created_at: Set(time::OffsetDateTime::now_utc()),
        round_index: Set(dto.round_index),
    };

    record.insert(conn).await
}

/// Records for a guest, oldest first.
pub async fn list_for_guest<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    guest_id: &str,
    limit: u64,
) -> Result<Vec<draw_records::Model>, sea_orm::DbErr> {
    draw_records::Entity::find()
        .filter(draw_records::Column::GuestId.eq(guest_id))
        .order_by_asc(draw_records::Column::CreatedAt)
        .order_by_asc(draw_records::Column::Id)
        .limit(limit)
        .all(conn)
        .await
}

pub async fn count_for_guest<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    guest_id: &str,
) -> Result<u64, sea_orm::DbErr> {
    draw_records::Entity::find()
        .filter(draw_records::Column::GuestId.eq(guest_id))
        .count(conn)
        .await
}
