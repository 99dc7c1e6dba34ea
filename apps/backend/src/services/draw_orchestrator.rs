//! v2 draws: two rounds per cycle, the second always wins.
//!
//! One draw is one transaction: read the guest's state, decide the round and
//! tier, advance the state row under its version, append one record. Two
//! concurrent draws for the same guest cannot both commit; the loser is
//! retried and fails with 409 if it keeps losing.

use std::sync::Arc;

use sea_orm::{DatabaseConnection, DatabaseTransaction};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::draw::DrawConfig;
use crate::db::retry::{AttemptOutcome, RetryOutcome, RetryPolicy};
use crate::db::txn;
use crate::domain::rng::RandomSource;
use crate::domain::rounds::{decide, outcome_message, DrawDecision};
use crate::domain::tier::Tier;
use crate::error::AppError;
use crate::errors::domain::DomainError;
use crate::errors::ErrorCode;
use crate::repos::draw_records::{self, DrawRecordCreate};
use crate::repos::guest_states;

/// Wire shape of a v2 draw.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DrawResult {
    pub success: bool,
    pub won: bool,
    pub tier: Option<Tier>,
    pub draw_round: i16,
    pub message: &'static str,
    pub guest_id: String,
    /// Absent on a loss; `null` on a win without a configured image base
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prize_image_url: Option<Option<String>>,
}

impl DrawResult {
    fn from_decision(guest_id: &str, decision: &DrawDecision, config: &DrawConfig) -> Self {
        let prize_image_url = decision
            .won
            .then(|| decision.tier.and_then(|tier| config.prize_image_url(tier)));

        Self {
            success: true,
            won: decision.won,
            tier: decision.tier,
            draw_round: decision.round.as_i16(),
            message: outcome_message(decision.won),
            guest_id: guest_id.to_string(),
            prize_image_url,
        }
    }
}

pub struct DrawOrchestrator {
    policy: RetryPolicy,
    config: DrawConfig,
    rng: Arc<dyn RandomSource>,
}

impl DrawOrchestrator {
    pub fn new(config: DrawConfig, rng: Arc<dyn RandomSource>) -> Self {
        Self {
            policy: RetryPolicy::new(config.max_attempts),
            config,
            rng,
        }
    }

    /// Run one draw for `guest_id`. The id must already be validated.
    pub async fn draw(
        &self,
        db: &DatabaseConnection,
        guest_id: &str,
    ) -> Result<DrawResult, AppError> {
        let outcome = self
            .policy
            .run("guest_draw", |attempt| self.attempt(db, guest_id, attempt))
            .await?;

        match outcome {
            RetryOutcome::Success(result) => {
                info!(
                    guest_id,
                    won = result.won,
                    draw_round = result.draw_round,
                    tier = result.tier.map(|t| t.slug()).unwrap_or("none"),
                    "draw recorded"
                );
                Ok(result)
            }
            RetryOutcome::Contended { attempts } => {
                warn!(guest_id, attempts, "concurrent draws for guest");
                Err(AppError::conflict(
                    ErrorCode::ConcurrentDraw,
                    "Another draw for this guest is in progress, please retry",
                ))
            }
            // the round scheme never runs out
            RetryOutcome::Exhausted => Err(AppError::internal(
                ErrorCode::Internal,
                "draw attempt reported exhaustion",
            )),
        }
    }

    async fn attempt(
        &self,
        db: &DatabaseConnection,
        guest_id: &str,
        attempt: u32,
    ) -> Result<AttemptOutcome<DrawResult>, AppError> {
        let txn = txn::begin(db).await?;
        let outcome = match self.record_draw(&txn, guest_id).await {
            Ok(result) => Ok(AttemptOutcome::Success(result)),
            Err(e) if e.is_retryable_conflict() => {
                debug!(guest_id, attempt, error = %e, "guest state changed underneath draw");
                Ok(AttemptOutcome::Conflict)
            }
            Err(e) => Err(AppError::from(e)),
        };
        txn::finish_attempt(txn, outcome).await
    }

    async fn record_draw(
        &self,
        txn: &DatabaseTransaction,
        guest_id: &str,
    ) -> Result<DrawResult, DomainError> {
        let state = guest_states::find(txn, guest_id).await?;
        let last = match &state {
            Some(state) => Some(state.last),
            // records written before state rows existed
            None => draw_records::latest_for_guest(txn, guest_id)
                .await?
                .map(|record| record.as_last_draw()),
        };

        let decision = decide(
            last.as_ref(),
            self.config.first_round_win_percent,
            self.rng.as_ref(),
        );
        let result = DrawResult::from_decision(guest_id, &decision, &self.config);

        match state {
            Some(state) => {
                guest_states::advance(txn, guest_id, state.version, decision.as_last_draw())
                    .await?;
            }
            None => {
                guest_states::create(txn, guest_id, decision.as_last_draw()).await?;
            }
        }

        draw_records::insert(
            txn,
            DrawRecordCreate {
                guest_id: guest_id.to_string(),
                draw_round: decision.round.as_i16(),
                won: decision.won,
                tier: decision.tier.map(|t| t.label().to_string()),
                prize_image_url: result.prize_image_url.clone().flatten(),
                round_index: decision.round_index,
            },
        )
        .await?;

        Ok(result)
    }
}
