//! Bounded retry over transactional attempts.
//!
//! An attempt reports one of three outcomes. `Conflict` means another writer
//! won a race and the attempt is worth repeating; `Exhausted` means there is
//! nothing left to do and retrying cannot help.

use std::future::Future;

use tracing::{debug, warn};

pub const DEFAULT_MAX_ATTEMPTS: u32 = 2;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptOutcome<T> {
    Success(T),
    Conflict,
    Exhausted,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetryOutcome<T> {
    Success(T),
    Exhausted,
    /// Every attempt conflicted
    Contended { attempts: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

impl RetryPolicy {
    /// A policy of zero attempts is raised to one.
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Run `attempt` until it succeeds, reports `Exhausted`, errors, or the
    /// attempt budget is spent. The closure receives the 1-based attempt number.
    pub async fn run<T, E, F, Fut>(
        &self,
        op: &'static str,
        mut attempt: F,
    ) -> Result<RetryOutcome<T>, E>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<AttemptOutcome<T>, E>>,
    {
        for n in 1..=self.max_attempts {
            match attempt(n).await? {
                AttemptOutcome::Success(value) => {
                    if n > 1 {
                        debug!(op, attempt = n, "succeeded after retry");
                    }
                    return Ok(RetryOutcome::Success(value));
                }
                AttemptOutcome::Exhausted => return Ok(RetryOutcome::Exhausted),
                AttemptOutcome::Conflict => {
                    warn!(
                        op,
                        attempt = n,
                        max_attempts = self.max_attempts,
                        "attempt conflicted"
                    );
                }
            }
        }

        Ok(RetryOutcome::Contended {
            attempts: self.max_attempts,
        })
    }
}
