//! Global simulation clock.

use crate::common::{SimError, SimResult};

/// Monotonically increasing integer time counter.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Clock {
    now: u64,
}

impl Clock {
    /// Creates a clock at time zero.
    pub const fn new() -> Self {
        Self { now: 0 }
    }

    /// Current time.
    #[inline(always)]
    pub const fn now(&self) -> u64 {
        self.now
    }

    /// Advances by one time unit and returns the new time.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvariantViolation`] if time would pass `u64::MAX`.
    #[inline]
    pub fn advance(&mut self) -> SimResult<u64> {
        self.now = self
            .now
            .checked_add(1)
            .ok_or_else(|| SimError::invariant("clock overflowed"))?;
        Ok(self.now)
    }

    /// Moves forward to `target`; never moves backwards.
    ///
    /// Returns the number of units skipped.
    pub fn advance_to(&mut self, target: u64) -> u64 {
        let skipped = target.saturating_sub(self.now);
        self.now = self.now.max(target);
        skipped
    }
}
