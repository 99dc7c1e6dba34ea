use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_query::{ColumnDef, Index, IndexOrder, Table};

#[derive(DeriveMigrationName)]
pub struct Migration;

// ----- Iden enums for tables & columns -----
#[derive(Iden)]
enum Signs {
    Table,
    Id,
    Level,
    Type,
    RewardCode,
    IsDrawn,
}

#[derive(Iden)]
enum DrawRecords {
    Table,
    Id,
    GuestId,
    DrawRound,
    Won,
    Tier,
    PrizeImageUrl,
    CreatedAt,
    RoundIndex,
}

#[derive(Iden)]
enum GuestRoundStates {
    Table,
    GuestId,
    LastRound,
    LastWon,
    RoundIndex,
    Version,
    UpdatedAt,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // signs: finite pool, seeded out of band
        manager
            .create_table(
                Table::create()
                    .table(Signs::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Signs::Id)
                            .string_len(10)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Signs::Level).integer().not_null())
                    .col(ColumnDef::new(Signs::Type).string_len(10).not_null())
                    .col(ColumnDef::new(Signs::RewardCode).string_len(10).not_null())
                    .col(
                        ColumnDef::new(Signs::IsDrawn)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_signs_is_drawn_id")
                    .table(Signs::Table)
                    .col(Signs::IsDrawn)
                    .col(Signs::Id)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        // draw_records: append-only audit trail for the round scheme
        manager
            .create_table(
                Table::create()
                    .table(DrawRecords::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(DrawRecords::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(DrawRecords::GuestId).string_len(64).not_null())
                    .col(ColumnDef::new(DrawRecords::DrawRound).small_integer().not_null())
                    .col(ColumnDef::new(DrawRecords::Won).boolean().not_null())
                    .col(ColumnDef::new(DrawRecords::Tier).string_len(32).null())
                    .col(ColumnDef::new(DrawRecords::PrizeImageUrl).string_len(512).null())
                    .col(
                        ColumnDef::new(DrawRecords::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(DrawRecords::RoundIndex).integer().not_null())
                    .check(Expr::col(DrawRecords::DrawRound).is_in([1, 2]))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_draw_records_guest_created")
                    .table(DrawRecords::Table)
                    .col(DrawRecords::GuestId)
                    .col((DrawRecords::CreatedAt, IndexOrder::Desc))
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        // guest_round_states: one row per participant, guarded by `version`
        manager
            .create_table(
                Table::create()
                    .table(GuestRoundStates::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(GuestRoundStates::GuestId)
                            .string_len(64)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(GuestRoundStates::LastRound)
                            .small_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(GuestRoundStates::LastWon).boolean().not_null())
                    .col(
                        ColumnDef::new(GuestRoundStates::RoundIndex)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(GuestRoundStates::Version)
                            .integer()
                            .not_null()
                            .default(1),
                    )
                    .col(
                        ColumnDef::new(GuestRoundStates::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(
                Table::drop()
                    .table(GuestRoundStates::Table)
                    .if_exists()
                    .to_owned(),
            )
            .await?;
        manager
            .drop_table(Table::drop().table(DrawRecords::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Signs::Table).if_exists().to_owned())
            .await?;
        Ok(())
    }
}
