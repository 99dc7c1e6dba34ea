//! Round resolution for the two-round scheme.
//!
//! A participant's next draw depends only on their latest draw: after a
//! round-one loss comes a round two that always wins; anything else starts
//! (or restarts) at round one. `round_index` counts completed cycles.

use crate::domain::rng::RandomSource;
use crate::domain::tier::{pick, Tier};

pub const WIN_MESSAGE: &str = "恭喜中奖！";
pub const LOSS_MESSAGE: &str = "未中奖，再试一次吧";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawRound {
    First,
    Second,
}

impl DrawRound {
    pub const fn as_i16(&self) -> i16 {
        match self {
            DrawRound::First => 1,
            DrawRound::Second => 2,
        }
    }

    pub const fn from_i16(value: i16) -> Option<DrawRound> {
        match value {
            1 => Some(DrawRound::First),
            2 => Some(DrawRound::Second),
            _ => None,
        }
    }
}

/// The fields of a participant's latest draw that decide the next one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LastDraw {
    pub round: DrawRound,
    pub won: bool,
    pub round_index: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundState {
    /// Next draw is round one
    Fresh,
    /// Next draw is round two, a guaranteed win
    AwaitingSecond,
}

pub fn state_of(last: Option<&LastDraw>) -> RoundState {
    match last {
        Some(LastDraw {
            round: DrawRound::First,
            won: false,
            ..
        }) => RoundState::AwaitingSecond,
        _ => RoundState::Fresh,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundPlan {
    pub round: DrawRound,
    pub round_index: i32,
}

pub fn plan_next_draw(last: Option<&LastDraw>) -> RoundPlan {
    let Some(last) = last else {
        return RoundPlan {
            round: DrawRound::First,
            round_index: 1,
        };
    };

    match state_of(Some(last)) {
        RoundState::AwaitingSecond => RoundPlan {
            round: DrawRound::Second,
            round_index: last.round_index,
        },
        RoundState::Fresh => RoundPlan {
            round: DrawRound::First,
            round_index: match last.round {
                DrawRound::Second => last.round_index + 1,
                DrawRound::First => last.round_index,
            },
        },
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawDecision {
    pub round: DrawRound,
    pub round_index: i32,
    pub won: bool,
    pub tier: Option<Tier>,
}

impl DrawDecision {
    pub fn as_last_draw(&self) -> LastDraw {
        LastDraw {
            round: self.round,
            won: self.won,
            round_index: self.round_index,
        }
    }
}

/// Resolve the next draw and roll for it.
///
/// Round one consumes one roll for the win check and, on a win, one for the
/// tier. Round two consumes one roll for the tier.
pub fn decide(
    last: Option<&LastDraw>,
    first_round_win_percent: u8,
    rng: &dyn RandomSource,
) -> DrawDecision {
    let plan = plan_next_draw(last);
    let won = match plan.round {
        DrawRound::First => rng.percent() < f64::from(first_round_win_percent),
        DrawRound::Second => true,
    };
    let tier = won.then(|| pick(rng));

    DrawDecision {
        round: plan.round,
        round_index: plan.round_index,
        won,
        tier,
    }
}

pub const fn outcome_message(won: bool) -> &'static str {
    if won {
        WIN_MESSAGE
    } else {
        LOSS_MESSAGE
    }
}
