//! Per-guest round state repository functions.

use sea_orm::ConnectionTrait;

use crate::adapters::guest_states_sea as states_adapter;
use crate::domain::rounds::{DrawRound, LastDraw};
use crate::entities::guest_round_states;
use crate::errors::domain::{DomainError, InfraErrorKind};

/// A guest's latest draw plus its optimistic lock version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuestState {
    pub guest_id: String,
    pub last: LastDraw,
    pub version: i32,
}

impl TryFrom<guest_round_states::Model> for GuestState {
    type Error = DomainError;

    fn try_from(model: guest_round_states::Model) -> Result<Self, Self::Error> {
        let round = DrawRound::from_i16(model.last_round).ok_or_else(|| {
            DomainError::infra(
                InfraErrorKind::DataCorruption,
                format!(
                    "guest state {} has round {}",
                    model.guest_id, model.last_round
                ),
            )
        })?;

        Ok(Self {
            guest_id: model.guest_id,
            last: LastDraw {
                round,
                won: model.last_won,
                round_index: model.round_index,
            },
            version: model.version,
        })
    }
}

pub async fn find<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    guest_id: &str,
) -> Result<Option<GuestState>, DomainError> {
    states_adapter::find(conn, guest_id)
        .await?
        .map(GuestState::try_from)
        .transpose()
}

pub async fn create<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    guest_id: &str,
    last: LastDraw,
) -> Result<GuestState, DomainError> {
    let dto = states_adapter::GuestStateCreate {
        guest_id: guest_id.to_string(),
        last_round: last.round.as_i16(),
        last_won: last.won,
        round_index: last.round_index,
    };
    GuestState::try_from(states_adapter::insert_initial(conn, dto).await?)
}

/// Record `last` as the guest's latest draw if the stored version is still
/// `expected_version`.
pub async fn advance<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    guest_id: &str,
    expected_version: i32,
    last: LastDraw,
) -> Result<GuestState, DomainError> {
    let dto = states_adapter::GuestStateUpdate {
        guest_id: guest_id.to_string(),
        last_round: last.round.as_i16(),
        last_won: last.won,
        round_index: last.round_index,
        expected_version,
    };
    GuestState::try_from(states_adapter::update_with_version(conn, dto).await?)
}
