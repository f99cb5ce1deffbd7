//! Blocking policies.
//!
//! After every executed time unit (never before the first unit of a quantum) the
//! dispatcher asks a [`BlockingModel`] whether the running process blocks, and for
//! how long. Implementations provided:
//! 1. **Random:** Fixed probability per unit, driven by a seeded `ChaCha8Rng`.
//! 2. **Never:** Deterministic runs without blocking.
//! 3. **Scripted:** A fixed sequence of decisions, for tests and replays.

use std::collections::VecDeque;
use std::fmt;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::common::ProcessId;

/// Outcome of a blocking decision.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BlockDecision {
    /// Keep running.
    Continue,
    /// Block for `duration` blocked-checks.
    Block {
        /// Value loaded into the block timer.
        duration: u64,
    },
}

impl BlockDecision {
    /// Returns `true` for [`BlockDecision::Block`].
    pub const fn blocks(self) -> bool {
        matches!(self, Self::Block { .. })
    }
}

/// Policy deciding, per executed time unit, whether the running process blocks.
pub trait BlockingModel: fmt::Debug + Send {
    /// Called after `units_executed` units of the current quantum have run for `id`.
    fn decide(&mut self, id: ProcessId, units_executed: u64) -> BlockDecision;
}

/// Blocks with a fixed probability after each unit.
pub struct RandomBlocking {
    probability: f64,
    duration: u64,
    seed: u64,
    rng: ChaCha8Rng,
}

impl RandomBlocking {
    /// Creates a seeded random policy.
    ///
    /// `probability` is clamped to `[0, 1]`.
    pub fn new(probability: f64, duration: u64, seed: u64) -> Self {
        Self {
            probability: probability.clamp(0.0, 1.0),
            duration,
            seed,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Seed the generator was created with.
    pub const fn seed(&self) -> u64 {
        self.seed
    }
}

impl fmt::Debug for RandomBlocking {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RandomBlocking")
            .field("probability", &self.probability)
            .field("duration", &self.duration)
            .field("seed", &self.seed)
            .finish_non_exhaustive()
    }
}

impl BlockingModel for RandomBlocking {
    fn decide(&mut self, _id: ProcessId, _units_executed: u64) -> BlockDecision {
        if self.probability > 0.0 && self.rng.random::<f64>() < self.probability {
            BlockDecision::Block {
                duration: self.duration,
            }
        } else {
            BlockDecision::Continue
        }
    }
}

/// Never blocks.
#[derive(Clone, Copy, Debug, Default)]
pub struct NeverBlock;

impl BlockingModel for NeverBlock {
    fn decide(&mut self, _id: ProcessId, _units_executed: u64) -> BlockDecision {
        BlockDecision::Continue
    }
}

/// Replays a fixed sequence of decisions, then continues forever.
#[derive(Clone, Debug, Default)]
pub struct ScriptedBlocking {
    script: VecDeque<BlockDecision>,
}

impl ScriptedBlocking {
    /// Creates a policy that returns `script` in order.
    pub fn new(script: impl IntoIterator<Item = BlockDecision>) -> Self {
        Self {
            script: script.into_iter().collect(),
        }
    }

    /// Decisions not yet consumed.
    pub fn pending(&self) -> usize {
        self.script.len()
    }
}

impl BlockingModel for ScriptedBlocking {
    fn decide(&mut self, _id: ProcessId, _units_executed: u64) -> BlockDecision {
        self.script.pop_front().unwrap_or(BlockDecision::Continue)
    }
}
