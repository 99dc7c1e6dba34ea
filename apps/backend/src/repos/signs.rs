//! Sign pool repository functions.

use sea_orm::ConnectionTrait;

use crate::adapters::signs_sea as signs_adapter;
use crate::entities::signs;
use crate::errors::domain::DomainError;

pub use signs_adapter::SignCreate;

/// A pooled sign as handed to a caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sign {
    pub id: String,
    pub level: i32,
    pub sign_type: String,
    pub reward_code: String,
    pub is_drawn: bool,
}

impl From<signs::Model> for Sign {
    fn from(model: signs::Model) -> Self {
        Self {
            id: model.id,
            level: model.level,
            sign_type: model.sign_type,
            reward_code: model.reward_code,
            is_drawn: model.is_drawn,
        }
    }
}

/// Aggregate counts over the whole pool.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PoolCounts {
    pub total: u64,
    pub drawn: u64,
    pub distinct_ids: u64,
    /// `(level, count)` ordered by level
    pub by_level: Vec<(i32, u64)>,
}

impl PoolCounts {
    pub fn undrawn(&self) -> u64 {
        self.total.saturating_sub(self.drawn)
    }

    pub fn count_for_level(&self, level: i32) -> u64 {
        self.by_level
            .iter()
            .find(|(l, _)| *l == level)
            .map(|(_, n)| *n)
            .unwrap_or(0)
    }
}

pub async fn count_undrawn<C: ConnectionTrait + Send + Sync>(conn: &C) -> Result<u64, DomainError> {
    Ok(signs_adapter::count_undrawn(conn).await?)
}

pub async fn find_undrawn_at_offset_for_update<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    offset: u64,
) -> Result<Option<Sign>, DomainError> {
    let sign = signs_adapter::find_undrawn_at_offset_for_update(conn, offset).await?;
    Ok(sign.map(Sign::from))
}

/// True when this call flipped the sign from undrawn to drawn.
pub async fn mark_drawn<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    sign_id: &str,
) -> Result<bool, DomainError> {
    Ok(signs_adapter::mark_drawn(conn, sign_id).await? == 1)
}

/// Delete every sign, then insert `signs` in batches of `batch_size`.
pub async fn replace_all<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    signs: Vec<SignCreate>,
    batch_size: usize,
) -> Result<u64, DomainError> {
    signs_adapter::delete_all(conn).await?;

    let batch_size = batch_size.max(1);
    let mut inserted = 0u64;
    let mut rest = signs;
    while !rest.is_empty() {
        let tail = rest.split_off(rest.len().min(batch_size));
        inserted += rest.len() as u64;
        signs_adapter::insert_batch(conn, rest).await?;
        rest = tail;
    }
    Ok(inserted)
}

pub async fn counts<C: ConnectionTrait + Send + Sync>(conn: &C) -> Result<PoolCounts, DomainError> {
    let total = signs_adapter::count_all(conn).await?;
    let drawn = signs_adapter::count_drawn(conn).await?;
    let distinct_ids = signs_adapter::count_distinct_ids(conn).await?;
    let by_level = signs_adapter::count_by_level(conn)
        .await?
        .into_iter()
        .map(|(level, n)| (level, u64::try_from(n).unwrap_or(0)))
        .collect();

    Ok(PoolCounts {
        total,
        drawn,
        distinct_ids: u64::try_from(distinct_ids).unwrap_or(0),
        by_level,
    })
}
