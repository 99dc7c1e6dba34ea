//! Injectable randomness.
//!
//! Every random decision in a draw goes through [`RandomSource`], so the
//! engine can run on the thread RNG in production, on a seeded ChaCha stream
//! for reproducible runs, or on a scripted sequence in tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

pub trait RandomSource: Send + Sync {
    /// Uniform integer in `[0, upper)`; returns 0 when `upper` is 0.
    fn below(&self, upper: u64) -> u64;

    /// Uniform real in `[0, 100)`.
    fn percent(&self) -> f64;
}

/// Per-thread OS-seeded generator.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadRandom;

impl RandomSource for ThreadRandom {
    fn below(&self, upper: u64) -> u64 {
        if upper == 0 {
            return 0;
        }
        rand::rng().random_range(0..upper)
    }

    fn percent(&self) -> f64 {
        rand::rng().random::<f64>() * 100.0
    }
}

/// Deterministic stream shared by all workers.
pub struct SeededRandom {
    rng: Mutex<ChaCha8Rng>,
}

impl SeededRandom {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(ChaCha8Rng::seed_from_u64(seed)),
        }
    }
}

impl RandomSource for SeededRandom {
    fn below(&self, upper: u64) -> u64 {
        if upper == 0 {
            return 0;
        }
        self.rng.lock().random_range(0..upper)
    }

    fn percent(&self) -> f64 {
        self.rng.lock().random::<f64>() * 100.0
    }
}

/// Replays fixed values, cycling when a script runs out.
///
/// `percent` walks `rolls`; `below` walks `offsets` and reduces each value
/// modulo `upper`. An empty script yields 0.
#[derive(Debug, Default)]
pub struct ScriptedRandom {
    rolls: Vec<f64>,
    offsets: Vec<u64>,
    roll_cursor: AtomicUsize,
    offset_cursor: AtomicUsize,
}

impl ScriptedRandom {
    pub fn new(rolls: Vec<f64>) -> Self {
        Self {
            rolls,
            ..Self::default()
        }
    }

    pub fn with_offsets(mut self, offsets: Vec<u64>) -> Self {
        self.offsets = offsets;
        self
    }

    /// Number of `percent` calls served so far.
    pub fn rolls_consumed(&self) -> usize {
        self.roll_cursor.load(Ordering::SeqCst)
    }
}

impl RandomSource for ScriptedRandom {
    fn below(&self, upper: u64) -> u64 {
        if upper == 0 || self.offsets.is_empty() {
            return 0;
        }
        let i = self.offset_cursor.fetch_add(1, Ordering::SeqCst);
        self.offsets[i % self.offsets.len()] % upper
    }

    fn percent(&self) -> f64 {
        let i = self.roll_cursor.fetch_add(1, Ordering::SeqCst);
        if self.rolls.is_empty() {
            return 0.0;
        }
        self.rolls[i % self.rolls.len()]
    }
}

/// Seeded stream when a seed is configured, thread RNG otherwise.
pub fn from_seed(seed: Option<u64>) -> Arc<dyn RandomSource> {
    match seed {
        Some(seed) => Arc::new(SeededRandom::new(seed)),
        None => Arc::new(ThreadRandom),
    }
}
