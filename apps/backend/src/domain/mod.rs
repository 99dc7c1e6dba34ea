//! Domain layer: pure draw logic, no I/O.

pub mod rng;
pub mod rounds;
pub mod sign_level;
pub mod tier;

#[cfg(test)]
mod test_prelude;
#[cfg(test)]
mod tests_props_rounds;

// Re-exports for ergonomics
pub use rng::{RandomSource, ScriptedRandom, SeededRandom, ThreadRandom};
pub use rounds::{decide, plan_next_draw, DrawDecision, DrawRound, LastDraw, RoundPlan, RoundState};
pub use sign_level::{display, SignDisplay, SignLevel};
pub use tier::{pick, tier_for_roll, Tier};
