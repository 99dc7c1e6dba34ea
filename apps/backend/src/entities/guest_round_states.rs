use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "guest_round_states")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false, column_name = "guest_id")]
    pub guest_id: String,
    #[sea_orm(column_name = "last_round", column_type = "SmallInteger")]
    pub last_round: i16,
    #[sea_orm(column_name = "last_won")]
    pub last_won: bool,
    #[sea_orm(column_name = "round_index")]
    pub round_index: i32,
    pub version: i32,
    #[sea_orm(column_name = "updated_at")]
    pub updated_at: OffsetDateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
