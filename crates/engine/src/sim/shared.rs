//! Simulation shared between a worker and a presentation layer.
//!
//! All mutation goes through one lock, so there is exactly one logical writer at a
//! time; readers copy out owned snapshots. [`SharedSimulation::try_tick`] refuses to
//! start a cycle while another holder is mid-cycle, which makes timer-driven
//! stepping safe against re-entrant callbacks.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, TryLockError};

use super::simulator::{Simulation, Tick};
use crate::common::{ProcessId, SimResult};
use crate::trace::{GanttBar, ProcessSnapshot};

/// Cloneable, thread-safe handle to a [`Simulation`].
#[derive(Clone, Debug)]
pub struct SharedSimulation {
    inner: Arc<Mutex<Simulation>>,
}

impl SharedSimulation {
    /// Wraps `sim`.
    pub fn new(sim: Simulation) -> Self {
        Self {
            inner: Arc::new(Mutex::new(sim)),
        }
    }

    // A panic mid-cycle leaves the simulation unusable anyway; readers still get
    // the last state instead of a second panic.
    fn lock(&self) -> MutexGuard<'_, Simulation> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Runs one cycle if no other cycle is in progress.
    ///
    /// Returns `None` when the simulation is currently locked by another caller.
    pub fn try_tick(&self) -> Option<SimResult<Tick>> {
        let mut sim = match self.inner.try_lock() {
            Ok(guard) => guard,
            Err(TryLockError::Poisoned(poisoned)) => poisoned.into_inner(),
            Err(TryLockError::WouldBlock) => return None,
        };
        Some(sim.stepper().tick())
    }

    /// Runs one cycle, waiting for any in-progress cycle to finish first.
    ///
    /// # Errors
    ///
    /// Propagates errors from [`Simulation::run_dispatch_cycle`].
    pub fn tick(&self) -> SimResult<Tick> {
        self.lock().stepper().tick()
    }

    /// Admits a process.
    ///
    /// # Errors
    ///
    /// Same as [`Simulation::admit_process`].
    pub fn admit_process(&self, burst: u64, arrival: u64, priority: Option<u32>) -> SimResult<ProcessId> {
        self.lock().admit_process(burst, arrival, priority)
    }

    /// Returns `true` once every process has terminated.
    pub fn is_complete(&self) -> bool {
        self.lock().is_complete()
    }

    /// Owned snapshot of every process.
    pub fn snapshot(&self) -> Vec<ProcessSnapshot> {
        self.lock().snapshot()
    }

    /// Owned copy of the Gantt bars.
    pub fn gantt_bars(&self) -> Vec<GanttBar> {
        self.lock().gantt_bars()
    }

    /// Runs `f` with read access to the simulation.
    pub fn with<R>(&self, f: impl FnOnce(&Simulation) -> R) -> R {
        f(&self.lock())
    }
}
