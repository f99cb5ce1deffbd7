//! Simulated process entity.
//!
//! A [`Process`] couples immutable identity (id, arrival, burst, priority) with the
//! mutable runtime state driven by the dispatcher. It enforces the lifecycle:
//! 1. **Transitions:** Only `Ready -> Blocked`, `Blocked -> Ready` and `Ready -> Terminated`.
//! 2. **Progress:** `remaining` never increases and reaches zero exactly once.
//! 3. **Timestamps:** `start_time` and `end_time` are each written at most once.
//! 4. **History:** Execution intervals are append-only and strictly ordered in time.

/// Ordered process collection and dispatch ordering.
pub mod registry;

use std::fmt;

use serde::Serialize;

use crate::common::{ProcessId, SimError, SimResult};

pub use registry::ProcessRegistry;

/// Scheduling state of a process.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum ProcessState {
    /// Eligible to acquire the CPU.
    Ready,
    /// Waiting for its block timer to expire.
    Blocked,
    /// All required CPU time has been executed.
    Terminated,
}

impl ProcessState {
    /// Short label used by tabular views.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Ready => "Ready",
            Self::Blocked => "Blocked",
            Self::Terminated => "Terminated",
        }
    }
}

impl fmt::Display for ProcessState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One contiguous stretch of execution `[start, end)` and the state it left the process in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct ExecutionInterval {
    /// Clock value when the quantum began.
    pub start: u64,
    /// Clock value when the quantum ended (exclusive).
    pub end: u64,
    /// State of the process after the quantum.
    pub state: ProcessState,
}

impl ExecutionInterval {
    /// Number of time units executed.
    #[inline]
    pub const fn duration(&self) -> u64 {
        self.end - self.start
    }
}

impl fmt::Display for ExecutionInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}-{})", self.start, self.end)
    }
}

/// A simulated process.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Process {
    id: ProcessId,
    arrival: u64,
    burst: u64,
    priority: Option<u32>,

    remaining: u64,
    state: ProcessState,
    start_time: Option<u64>,
    end_time: Option<u64>,
    turnaround: Option<u64>,
    waiting: Option<u64>,
    intervals: Vec<ExecutionInterval>,
    block_time_remaining: u64,
}

impl Process {
    /// Creates a ready process with `remaining == burst` and no timestamps.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidArgument`] if `burst` is zero.
    pub fn new(id: ProcessId, arrival: u64, burst: u64, priority: Option<u32>) -> SimResult<Self> {
        if burst == 0 {
            return Err(SimError::invalid("burst", "must be greater than zero"));
        }
        Ok(Self {
            id,
            arrival,
            burst,
            priority,
            remaining: burst,
            state: ProcessState::Ready,
            start_time: None,
            end_time: None,
            turnaround: None,
            waiting: None,
            intervals: Vec::new(),
            block_time_remaining: 0,
        })
    }

    /// Process identifier.
    pub const fn id(&self) -> ProcessId {
        self.id
    }

    /// Time at which the process becomes eligible to run.
    pub const fn arrival(&self) -> u64 {
        self.arrival
    }

    /// Total CPU time required.
    pub const fn burst(&self) -> u64 {
        self.burst
    }

    /// Scheduling priority; lower values run first.
    pub const fn priority(&self) -> Option<u32> {
        self.priority
    }

    /// CPU time still required.
    pub const fn remaining(&self) -> u64 {
        self.remaining
    }

    /// Current scheduling state.
    pub const fn state(&self) -> ProcessState {
        self.state
    }

    /// Clock value of the first dispatch.
    pub const fn start_time(&self) -> Option<u64> {
        self.start_time
    }

    /// Clock value at completion.
    pub const fn end_time(&self) -> Option<u64> {
        self.end_time
    }

    /// `end_time - arrival`, once terminated.
    pub const fn turnaround(&self) -> Option<u64> {
        self.turnaround
    }

    /// `turnaround - burst`, once terminated.
    pub const fn waiting(&self) -> Option<u64> {
        self.waiting
    }

    /// Block timer; only meaningful while blocked.
    pub const fn block_time_remaining(&self) -> u64 {
        self.block_time_remaining
    }

    /// Executed quanta, in time order.
    pub fn intervals(&self) -> &[ExecutionInterval] {
        &self.intervals
    }

    /// Total time units executed so far.
    pub fn executed(&self) -> u64 {
        self.burst - self.remaining
    }

    /// Returns `true` once all CPU time has been executed.
    #[inline]
    pub const fn is_terminated(&self) -> bool {
        self.remaining == 0
    }

    /// Returns `true` if the process is eligible at clock value `now`.
    #[inline]
    pub const fn has_arrived(&self, now: u64) -> bool {
        self.arrival <= now
    }

    /// Records the first dispatch; later calls are ignored.
    pub(crate) fn mark_started(&mut self, now: u64) {
        if self.start_time.is_none() {
            self.start_time = Some(now.max(self.arrival));
        }
    }

    /// Consumes one time unit of CPU.
    pub(crate) fn execute_unit(&mut self) -> SimResult<()> {
        if self.state != ProcessState::Ready {
            return Err(SimError::invariant(format!(
                "{} executed while {}",
                self.id, self.state
            )));
        }
        self.remaining = self
            .remaining
            .checked_sub(1)
            .ok_or_else(|| SimError::invariant(format!("{} executed past its burst", self.id)))?;
        Ok(())
    }

    /// `Ready -> Blocked` with the given block timer.
    pub(crate) fn block(&mut self, duration: u64) -> SimResult<()> {
        if self.state != ProcessState::Ready || self.is_terminated() {
            return Err(SimError::invariant(format!(
                "{} cannot block from {} with {} units remaining",
                self.id, self.state, self.remaining
            )));
        }
        self.state = ProcessState::Blocked;
        self.block_time_remaining = duration;
        Ok(())
    }

    /// Counts down the block timer; `Blocked -> Ready` when it reaches zero.
    ///
    /// Returns `true` if the process became ready.
    pub(crate) fn tick_blocked(&mut self) -> SimResult<bool> {
        if self.state != ProcessState::Blocked {
            return Err(SimError::invariant(format!(
                "{} block timer ticked while {}",
                self.id, self.state
            )));
        }
        self.block_time_remaining = self.block_time_remaining.saturating_sub(1);
        if self.block_time_remaining == 0 {
            self.state = ProcessState::Ready;
            return Ok(true);
        }
        Ok(false)
    }

    /// `Ready -> Terminated`, deriving the completion metrics.
    pub(crate) fn terminate(&mut self, now: u64) -> SimResult<()> {
        if self.state != ProcessState::Ready || !self.is_terminated() || self.end_time.is_some() {
            return Err(SimError::invariant(format!(
                "{} cannot terminate from {} with {} units remaining",
                self.id, self.state, self.remaining
            )));
        }
        let turnaround = now.checked_sub(self.arrival).ok_or_else(|| {
            SimError::invariant(format!("{} completed before its arrival", self.id))
        })?;
        let waiting = turnaround.checked_sub(self.burst).ok_or_else(|| {
            SimError::invariant(format!("{} turnaround shorter than its burst", self.id))
        })?;
        self.state = ProcessState::Terminated;
        self.end_time = Some(now);
        self.turnaround = Some(turnaround);
        self.waiting = Some(waiting);
        Ok(())
    }

    /// Appends an executed interval; intervals must not overlap earlier ones.
    pub(crate) fn push_interval(&mut self, interval: ExecutionInterval) -> SimResult<()> {
        if interval.start >= interval.end {
            return Err(SimError::invariant(format!(
                "{} empty interval {interval}",
                self.id
            )));
        }
        if let Some(last) = self.intervals.last() {
            if interval.start < last.end {
                return Err(SimError::invariant(format!(
                    "{} interval {interval} overlaps {last}",
                    self.id
                )));
            }
        }
        self.intervals.push(interval);
        Ok(())
    }
}
