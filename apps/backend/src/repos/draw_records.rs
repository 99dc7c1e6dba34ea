//! Draw record repository functions.

use sea_orm::ConnectionTrait;

use crate::adapters::draw_records_sea as records_adapter;
use crate::domain::rounds::{DrawRound, LastDraw};
use crate::domain::tier::Tier;
use crate::entities::draw_records;
use crate::errors::domain::{DomainError, InfraErrorKind};

pub use records_adapter::DrawRecordCreate;

/// One stored v2 draw.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawRecord {
    pub id: i64,
    pub guest_id: String,
    pub round: DrawRound,
    pub won: bool,
    pub tier: Option<Tier>,
    pub prize_image_url: Option<String>,
    pub created_at: time::OffsetDateTime,
    pub round_index: i32,
}

impl DrawRecord {
    pub fn as_last_draw(&self) -> LastDraw {
        LastDraw {
            round: self.round,
            won: self.won,
            round_index: self.round_index,
        }
    }
}

impl TryFrom<draw_records::Model> for DrawRecord {
    type Error = DomainError;

    fn try_from(model: draw_records::Model) -> Result<Self, Self::Error> {
        let round = DrawRound::from_i16(model.draw_round).ok_or_else(|| {
            DomainError::infra(
                InfraErrorKind::DataCorruption,
                format!("draw record {} has round {}", model.id, model.draw_round),
            )
        })?;
        let tier = match model.tier.as_deref() {
            None => None,
            Some(label) => Some(Tier::from_label(label).ok_or_else(|| {
                DomainError::infra(
                    InfraErrorKind::DataCorruption,
                    format!("draw record {} has unknown tier {label}", model.id),
                )
            })?),
        };

        Ok(Self {
            id: model.id,
            guest_id: model.guest_id,
            round,
            won: model.won,
            tier,
            prize_image_url: model.prize_image_url,
            created_at: model.created_at,
            round_index: model.round_index,
        })
    }
}

pub async fn latest_for_guest<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    guest_id: &str,
) -> Result<Option<DrawRecord>, DomainError> {
    records_adapter::latest_for_guest(conn, guest_id)
        .await?
        .map(DrawRecord::try_from)
        .transpose()
}

pub async fn insert<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: DrawRecordCreate,
) -> Result<DrawRecord, DomainError> {
    let record = records_adapter::insert(conn, dto).await?;
    DrawRecord::try_from(record)
}

pub async fn list_for_guest<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    guest_id: &str,
    limit: u64,
) -> Result<Vec<DrawRecord>, DomainError> {
    records_adapter::list_for_guest(conn, guest_id, limit)
        .await?
        .into_iter()
        .map(DrawRecord::try_from)
        .collect()
}

pub async fn count_for_guest<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    guest_id: &str,
) -> Result<u64, DomainError> {
    Ok(records_adapter::count_for_guest(conn, guest_id).await?)
}
