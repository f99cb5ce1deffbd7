//! Dispatch cycle.
//!
//! One dispatch cycle is a full pass over the registry's dispatch order. For each
//! unfinished, arrived process the dispatcher either:
//! 1. **Blocked:** Counts down its block timer (no CPU, no clock advance).
//! 2. **Ready:** Acquires the semaphore and runs a quantum of up to `quantum` units,
//!    consulting the blocking model after every unit, then records the executed
//!    interval and releases the semaphore.
//!
//! A process that becomes ready during its blocked-check does not run until the
//! next cycle.

use serde::Serialize;
use tracing::{debug, trace, warn};

use super::blocking::{BlockDecision, BlockingModel};
use super::clock::Clock;
use super::semaphore::{Semaphore, SemaphoreState};
use crate::common::{ProcessId, SimError, SimResult};
use crate::process::{ExecutionInterval, Process, ProcessRegistry, ProcessState};
use crate::stats::SchedStats;
use crate::trace::{IntervalRecord, TraceRecorder};

/// Outcome of one dispatch cycle.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct CycleResult {
    /// Clock value after the cycle.
    pub advanced_to: u64,
    /// Intervals executed during the cycle, in execution order.
    pub events: Vec<IntervalRecord>,
    /// Processes whose block timer expired this cycle.
    pub unblocked: Vec<ProcessId>,
    /// Time units skipped because no process had arrived yet.
    pub idle_units: u64,
}

impl CycleResult {
    /// Returns `true` if the cycle changed nothing.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty() && self.unblocked.is_empty() && self.idle_units == 0
    }
}

/// Mutable engine state a cycle operates on.
///
/// Bundled so the dispatcher can borrow each part independently of the semaphore
/// guard it holds during a quantum.
#[derive(Debug)]
pub struct CycleContext<'a> {
    /// Processes to schedule.
    pub registry: &'a mut ProcessRegistry,
    /// Global clock.
    pub clock: &'a mut Clock,
    /// Blocking policy.
    pub blocking: &'a mut dyn BlockingModel,
    /// Trace sink.
    pub trace: &'a mut TraceRecorder,
    /// Counters.
    pub stats: &'a mut SchedStats,
}

/// Quantum-based Round Robin dispatcher owning the shared execution resource.
#[derive(Debug)]
pub struct Dispatcher {
    quantum: u64,
    semaphore: Semaphore,
}

impl Dispatcher {
    /// Creates a dispatcher with the given quantum.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidArgument`] if `quantum` is zero.
    pub fn new(quantum: u64) -> SimResult<Self> {
        if quantum == 0 {
            return Err(SimError::invalid("quantum", "must be at least 1"));
        }
        Ok(Self {
            quantum,
            semaphore: Semaphore::new(),
        })
    }

    /// Time units per quantum.
    pub const fn quantum(&self) -> u64 {
        self.quantum
    }

    /// Current state of the shared resource.
    pub const fn semaphore(&self) -> SemaphoreState {
        self.semaphore.state()
    }

    /// Total quanta started.
    pub const fn acquisitions(&self) -> u64 {
        self.semaphore.acquisitions()
    }

    /// Runs one full pass over the dispatch order.
    ///
    /// Does nothing when every process has terminated.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvariantViolation`] if a state transition or trace
    /// append breaks an invariant. The simulation must not be continued.
    pub fn run_cycle(&mut self, ctx: CycleContext<'_>) -> SimResult<CycleResult> {
        let CycleContext {
            registry,
            clock,
            blocking,
            trace,
            stats,
        } = ctx;

        let mut result = CycleResult {
            advanced_to: clock.now(),
            ..CycleResult::default()
        };
        if registry.all_terminated() {
            return Ok(result);
        }

        if !registry.any_eligible(clock.now()) {
            if let Some(next) = registry.next_arrival_after(clock.now()) {
                result.idle_units = clock.advance_to(next);
                stats.idle_units += result.idle_units;
                debug!(until = next, idle = result.idle_units, "cpu idle");
            }
        }

        for id in registry.order_for_dispatch() {
            let process = registry
                .get_mut(id)
                .ok_or_else(|| SimError::invariant(format!("{id} vanished from the registry")))?;
            if process.is_terminated() || !process.has_arrived(clock.now()) {
                continue;
            }

            if process.state() == ProcessState::Blocked {
                if process.tick_blocked()? {
                    debug!(%id, "process unblocked");
                    stats.unblocks += 1;
                    result.unblocked.push(id);
                }
                continue;
            }

            let Some(_guard) = self.semaphore.try_acquire(id) else {
                warn!(%id, "semaphore busy, skipping process this cycle");
                continue;
            };
            let record = run_quantum(self.quantum, process, clock, blocking, stats)?;
            trace.record_interval(record)?;
            result.events.push(record);
        }

        stats.cycles += 1;
        result.advanced_to = clock.now();
        Ok(result)
    }
}

/// Executes one quantum for `process`; the caller holds the semaphore.
fn run_quantum(
    quantum: u64,
    process: &mut Process,
    clock: &mut Clock,
    blocking: &mut dyn BlockingModel,
    stats: &mut SchedStats,
) -> SimResult<IntervalRecord> {
    let id = process.id();
    process.mark_started(clock.now());
    let start = clock.now();
    let mut executed = 0;
    let mut block = None;

    while executed < quantum && !process.is_terminated() {
        let now = clock.advance()?;
        process.execute_unit()?;
        executed += 1;
        trace!(%id, now, remaining = process.remaining(), "unit executed");

        if process.is_terminated() {
            break;
        }
        if let BlockDecision::Block { duration } = blocking.decide(id, executed) {
            block = Some(duration);
            break;
        }
    }

    let end = clock.now();
    stats.dispatches += 1;
    stats.busy_units += executed;

    let state = if process.is_terminated() {
        process.terminate(end)?;
        stats.completions += 1;
        ProcessState::Terminated
    } else if let Some(duration) = block {
        process.block(duration)?;
        stats.blocks += 1;
        ProcessState::Blocked
    } else {
        stats.quantum_expirations += 1;
        ProcessState::Ready
    };

    process.push_interval(ExecutionInterval { start, end, state })?;
    debug!(%id, start, end, %state, "quantum finished");
    Ok(IntervalRecord {
        process: id,
        start,
        end,
        state,
    })
}
