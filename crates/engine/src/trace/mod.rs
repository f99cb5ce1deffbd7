//! Execution trace.
//!
//! The [`TraceRecorder`] is the only data surface consumed by renderers. It
//! provides:
//! 1. **Interval Log:** Insertion-ordered, non-overlapping [`IntervalRecord`]s.
//! 2. **Snapshots:** Point-in-time [`ProcessSnapshot`]s of every process.
//! 3. **Views:** Gantt bars and tabular rows (see [`view`]).

/// Renderer-facing tabular and Gantt views.
pub mod view;

use serde::Serialize;

use crate::common::{ProcessId, SimError, SimResult};
use crate::process::{ExecutionInterval, Process, ProcessRegistry, ProcessState};

pub use view::{GanttBar, TableLayout, TableRow};

/// One executed quantum.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct IntervalRecord {
    /// Process that held the CPU.
    pub process: ProcessId,
    /// First time unit executed.
    pub start: u64,
    /// End of the interval (exclusive).
    pub end: u64,
    /// State the process was left in.
    pub state: ProcessState,
}

impl IntervalRecord {
    /// Number of time units executed.
    #[inline]
    pub const fn duration(&self) -> u64 {
        self.end - self.start
    }
}

/// Point-in-time view of one process.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ProcessSnapshot {
    /// Process identifier.
    pub id: ProcessId,
    /// Arrival time.
    pub arrival: u64,
    /// Total CPU time required.
    pub burst: u64,
    /// Priority, if any.
    pub priority: Option<u32>,
    /// CPU time still required.
    pub remaining: u64,
    /// Scheduling state.
    pub state: ProcessState,
    /// First dispatch time.
    pub start_time: Option<u64>,
    /// Completion time.
    pub end_time: Option<u64>,
    /// Completion time minus arrival.
    pub turnaround: Option<u64>,
    /// Turnaround minus burst.
    pub waiting: Option<u64>,
    /// Block timer.
    pub block_time_remaining: u64,
    /// Executed intervals.
    pub intervals: Vec<ExecutionInterval>,
}

impl From<&Process> for ProcessSnapshot {
    fn from(p: &Process) -> Self {
        Self {
            id: p.id(),
            arrival: p.arrival(),
            burst: p.burst(),
            priority: p.priority(),
            remaining: p.remaining(),
            state: p.state(),
            start_time: p.start_time(),
            end_time: p.end_time(),
            turnaround: p.turnaround(),
            waiting: p.waiting(),
            block_time_remaining: p.block_time_remaining(),
            intervals: p.intervals().to_vec(),
        }
    }
}

/// Append-only log of executed intervals.
#[derive(Clone, Debug, Default)]
pub struct TraceRecorder {
    records: Vec<IntervalRecord>,
}

impl TraceRecorder {
    /// Creates an empty recorder.
    pub const fn new() -> Self {
        Self {
            records: Vec::new(),
        }
    }

    /// Appends one record.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvariantViolation`] if the interval is empty or starts
    /// before the previous record ended; only one process runs per time unit.
    pub fn record_interval(&mut self, record: IntervalRecord) -> SimResult<()> {
        if record.start >= record.end {
            return Err(SimError::invariant(format!(
                "{} recorded empty interval [{}, {})",
                record.process, record.start, record.end
            )));
        }
        if let Some(last) = self.records.last() {
            if record.start < last.end {
                return Err(SimError::invariant(format!(
                    "{} interval [{}, {}) overlaps {} interval [{}, {})",
                    record.process, record.start, record.end, last.process, last.start, last.end
                )));
            }
        }
        self.records.push(record);
        Ok(())
    }

    /// All records in insertion order.
    pub fn records(&self) -> &[IntervalRecord] {
        &self.records
    }

    /// Records belonging to `id`.
    pub fn records_for(&self, id: ProcessId) -> impl Iterator<Item = &IntervalRecord> + '_ {
        self.records.iter().filter(move |r| r.process == id)
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` if nothing has executed yet.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Snapshot of every process in admission order.
    #[allow(clippy::unused_self)]
    pub fn snapshot(&self, registry: &ProcessRegistry) -> Vec<ProcessSnapshot> {
        registry.iter().map(ProcessSnapshot::from).collect()
    }

    /// One Gantt bar per record.
    pub fn gantt_bars(&self) -> Vec<GanttBar> {
        self.records.iter().map(GanttBar::from).collect()
    }

    /// Tabular view of `registry`.
    pub fn table(&self, registry: &ProcessRegistry, layout: TableLayout) -> Vec<TableRow> {
        view::build_table(self, registry, layout)
    }
}
