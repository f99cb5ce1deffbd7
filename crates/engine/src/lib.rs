//! Round Robin CPU scheduling simulator library.
//!
//! This crate models preemptive, quantum-based scheduling of simulated processes on a
//! single CPU and produces a time-stepped execution trace. It provides:
//! 1. **Processes:** Per-process state machine, timestamps and derived metrics.
//! 2. **Scheduling:** Clock, shared execution resource, blocking model and dispatcher.
//! 3. **Tracing:** Interval records, per-process snapshots, tables and Gantt bars.
//! 4. **Simulation:** Run-to-completion and stepped controllers, workload generation.
//! 5. **Statistics:** Counters and derived performance metrics.
//!
//! The engine performs no I/O; renderers consume [`Simulation::snapshot`],
//! [`Simulation::gantt_bars`] and the [`CycleResult`] returned by each dispatch cycle.

/// Common types (process identifiers, errors).
pub mod common;
/// Simulator configuration (defaults, scheduling key, workload parameters).
pub mod config;
/// Process entity and the ordered process registry.
pub mod process;
/// Clock, shared resource, blocking model and the dispatch state machine.
pub mod sched;
/// Simulation controllers and workload generation.
pub mod sim;
/// Scheduling statistics collection and reporting.
pub mod stats;
/// Execution trace recording and renderer-facing views.
pub mod trace;

pub use crate::common::{ProcessId, SimError, SimResult};
pub use crate::config::{Config, SchedulingKey};
pub use crate::process::{Process, ProcessState};
pub use crate::sched::dispatcher::CycleResult;
pub use crate::sim::{SharedSimulation, Simulation, Tick};
pub use crate::trace::{GanttBar, IntervalRecord, ProcessSnapshot};
