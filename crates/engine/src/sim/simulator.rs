//! Simulation: owns every piece of scheduler state side by side.
//!
//! Clock, semaphore, registry, blocking policy, trace and statistics all live in
//! one [`Simulation`] value that is passed explicitly to every operation, so
//! independent simulations never share state and tests are fully deterministic
//! once the blocking policy is.

use tracing::info;

use crate::common::{ProcessId, SimResult};
use crate::config::Config;
use crate::process::{Process, ProcessRegistry};
use crate::sched::blocking::{BlockingModel, RandomBlocking};
use crate::sched::clock::Clock;
use crate::sched::dispatcher::{CycleContext, CycleResult, Dispatcher};
use crate::sched::semaphore::SemaphoreState;
use crate::stats::SchedStats;
use crate::trace::{GanttBar, ProcessSnapshot, TableLayout, TableRow, TraceRecorder};

/// A single, independent scheduling simulation.
#[derive(Debug)]
pub struct Simulation {
    config: Config,
    registry: ProcessRegistry,
    clock: Clock,
    dispatcher: Dispatcher,
    blocking: Box<dyn BlockingModel>,
    trace: TraceRecorder,
    stats: SchedStats,
}

impl Simulation {
    /// Creates a simulation using the random blocking policy described by `config`.
    ///
    /// When `config.seed` is absent a seed is drawn and logged so the run can be
    /// replayed.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidArgument`](crate::SimError::InvalidArgument) if
    /// `config` fails validation.
    pub fn new(config: Config) -> SimResult<Self> {
        let seed = config.seed.unwrap_or_else(|| {
            let seed: u64 = rand::random();
            info!(seed, "no seed configured, drew a fresh one");
            seed
        });
        let blocking = RandomBlocking::new(config.block_probability, config.block_duration, seed);
        Self::with_blocking_model(config, Box::new(blocking))
    }

    /// Creates a simulation with a caller-supplied blocking policy.
    ///
    /// The `block_probability` and `block_duration` fields of `config` are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidArgument`](crate::SimError::InvalidArgument) if
    /// `config` fails validation.
    pub fn with_blocking_model(config: Config, blocking: Box<dyn BlockingModel>) -> SimResult<Self> {
        config.validate()?;
        Ok(Self {
            registry: ProcessRegistry::new(config.scheduling_key),
            clock: Clock::new(),
            dispatcher: Dispatcher::new(config.quantum)?,
            blocking,
            trace: TraceRecorder::new(),
            stats: SchedStats::default(),
            config,
        })
    }

    /// Admits a process and returns its identifier.
    ///
    /// May be called at any time, including between cycles of a running
    /// simulation; the process is considered from the next cycle on.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidArgument`](crate::SimError::InvalidArgument) if
    /// `burst` is zero or `arrival + burst` overflows the clock. The simulation is
    /// left unchanged.
    pub fn admit_process(&mut self, burst: u64, arrival: u64, priority: Option<u32>) -> SimResult<ProcessId> {
        self.registry.admit(arrival, burst, priority)
    }

    /// Admits a process arriving at the current clock value.
    ///
    /// # Errors
    ///
    /// Same as [`Simulation::admit_process`].
    pub fn admit_process_now(&mut self, burst: u64, priority: Option<u32>) -> SimResult<ProcessId> {
        self.admit_process(burst, self.clock.now(), priority)
    }

    /// Runs one dispatch cycle.
    ///
    /// Returns an empty result without touching any state once the simulation is
    /// complete.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvariantViolation`](crate::SimError::InvariantViolation)
    /// if an internal consistency check fails. The simulation must be discarded.
    pub fn run_dispatch_cycle(&mut self) -> SimResult<CycleResult> {
        let was_complete = self.is_complete();
        let result = self.dispatcher.run_cycle(CycleContext {
            registry: &mut self.registry,
            clock: &mut self.clock,
            blocking: &mut *self.blocking,
            trace: &mut self.trace,
            stats: &mut self.stats,
        })?;
        if !was_complete && self.is_complete() {
            info!(
                time = self.clock.now(),
                cycles = self.stats.cycles,
                processes = self.registry.len(),
                "all processes terminated"
            );
        }
        Ok(result)
    }

    /// Runs dispatch cycles until every process has terminated.
    ///
    /// Returns the number of cycles executed by this call.
    ///
    /// # Errors
    ///
    /// Propagates the first error returned by [`Simulation::run_dispatch_cycle`].
    pub fn run_to_completion(&mut self) -> SimResult<u64> {
        let mut cycles = 0;
        while !self.is_complete() {
            let _ = self.run_dispatch_cycle()?;
            cycles += 1;
        }
        Ok(cycles)
    }

    /// Returns a stepped controller that runs one cycle per external tick.
    pub fn stepper(&mut self) -> Stepper<'_> {
        Stepper { sim: self }
    }

    /// Returns `true` once every admitted process has terminated.
    ///
    /// A simulation without processes is complete.
    pub fn is_complete(&self) -> bool {
        self.registry.all_terminated()
    }

    /// Point-in-time view of every process.
    pub fn snapshot(&self) -> Vec<ProcessSnapshot> {
        self.trace.snapshot(&self.registry)
    }

    /// Gantt bars for every executed interval, in execution order.
    pub fn gantt_bars(&self) -> Vec<GanttBar> {
        self.trace.gantt_bars()
    }

    /// Tabular view in the requested layout.
    pub fn table(&self, layout: TableLayout) -> Vec<TableRow> {
        self.trace.table(&self.registry, layout)
    }

    /// Current clock value.
    pub const fn now(&self) -> u64 {
        self.clock.now()
    }

    /// Shared resource state. Always free between cycles.
    pub const fn semaphore(&self) -> SemaphoreState {
        self.dispatcher.semaphore()
    }

    /// Active configuration.
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Admitted processes.
    pub const fn registry(&self) -> &ProcessRegistry {
        &self.registry
    }

    /// Looks up one process.
    pub fn process(&self, id: ProcessId) -> Option<&Process> {
        self.registry.get(id)
    }

    /// Recorded trace.
    pub const fn trace(&self) -> &TraceRecorder {
        &self.trace
    }

    /// Statistics so far.
    pub const fn stats(&self) -> &SchedStats {
        &self.stats
    }
}

/// Result of one stepped tick.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Tick {
    /// A dispatch cycle ran.
    Advanced(CycleResult),
    /// Nothing left to run; no state was changed.
    Finished,
}

impl Tick {
    /// Returns `true` for [`Tick::Finished`].
    pub const fn is_finished(&self) -> bool {
        matches!(self, Self::Finished)
    }
}

/// Stepped execution: one dispatch cycle per call to [`Stepper::tick`].
///
/// The stepper holds the simulation mutably, so no other cycle can start while it
/// is alive; the caller regains control between ticks to redraw.
#[derive(Debug)]
pub struct Stepper<'a> {
    sim: &'a mut Simulation,
}

impl Stepper<'_> {
    /// Runs exactly one dispatch cycle, or reports completion.
    ///
    /// # Errors
    ///
    /// Propagates errors from [`Simulation::run_dispatch_cycle`].
    pub fn tick(&mut self) -> SimResult<Tick> {
        if self.sim.is_complete() {
            return Ok(Tick::Finished);
        }
        self.sim.run_dispatch_cycle().map(Tick::Advanced)
    }

    /// Read access to the simulation between ticks.
    pub fn sim(&self) -> &Simulation {
        self.sim
    }

    /// Admits a process between ticks.
    ///
    /// # Errors
    ///
    /// Same as [`Simulation::admit_process`].
    pub fn admit_process(&mut self, burst: u64, arrival: u64, priority: Option<u32>) -> SimResult<ProcessId> {
        self.sim.admit_process(burst, arrival, priority)
    }
}
