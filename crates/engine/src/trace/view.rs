//! Renderer-facing views.
//!
//! Two views are exported to presentation layers:
//! 1. **Gantt:** `{process, start, duration}` bars, one per executed interval.
//! 2. **Table:** One summary row per process, optionally followed by one sub-row
//!    per executed interval with partial turnaround and waiting times.

use std::fmt;

use serde::Serialize;

use super::{IntervalRecord, TraceRecorder};
use crate::common::ProcessId;
use crate::process::{Process, ProcessRegistry};

/// One contiguous execution bar on the timeline.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct GanttBar {
    /// Process that ran.
    pub process: ProcessId,
    /// Start time.
    pub start: u64,
    /// Number of time units.
    pub duration: u64,
}

impl From<&IntervalRecord> for GanttBar {
    fn from(r: &IntervalRecord) -> Self {
        Self {
            process: r.process,
            start: r.start,
            duration: r.duration(),
        }
    }
}

/// Shape of the tabular view.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TableLayout {
    /// One row per process.
    #[default]
    Summary,
    /// Summary row followed by one row per executed interval.
    WithIntervals,
}

/// Whether a row summarizes a process or details one interval.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum RowKind {
    /// Whole-process row.
    Process,
    /// Single executed interval.
    Interval,
}

/// A row of the tabular view. Absent values render as `-`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TableRow {
    /// Summary or interval row.
    pub kind: RowKind,
    /// Process identifier.
    pub id: ProcessId,
    /// Arrival time.
    pub arrival: u64,
    /// Burst.
    pub burst: u64,
    /// Priority.
    pub priority: Option<u32>,
    /// First dispatch (summary) or interval start (sub-row).
    pub start: Option<u64>,
    /// Completion (summary) or interval end (sub-row).
    pub end: Option<u64>,
    /// Turnaround, partial for sub-rows.
    pub turnaround: Option<u64>,
    /// Waiting, partial for sub-rows.
    pub waiting: Option<u64>,
    /// State label.
    pub state: String,
    /// Execution intervals as `(s-e)` text.
    pub execution: String,
}

pub(super) fn build_table(
    trace: &TraceRecorder,
    registry: &ProcessRegistry,
    layout: TableLayout,
) -> Vec<TableRow> {
    let mut rows = Vec::with_capacity(registry.len());
    for p in registry {
        let records: Vec<&IntervalRecord> = trace.records_for(p.id()).collect();
        rows.push(summary_row(p, &records));
        if layout == TableLayout::WithIntervals {
            let mut executed = 0;
            for r in records {
                executed += r.duration();
                rows.push(interval_row(p, r, executed));
            }
        }
    }
    rows
}

fn summary_row(p: &Process, records: &[&IntervalRecord]) -> TableRow {
    let execution = if records.is_empty() {
        "-".to_owned()
    } else {
        records
            .iter()
            .map(|r| format!("({}-{})", r.start, r.end))
            .collect::<Vec<_>>()
            .join(", ")
    };
    TableRow {
        kind: RowKind::Process,
        id: p.id(),
        arrival: p.arrival(),
        burst: p.burst(),
        priority: p.priority(),
        start: p.start_time(),
        end: p.end_time(),
        turnaround: p.turnaround(),
        waiting: p.waiting(),
        state: p.state().label().to_owned(),
        execution,
    }
}

// Partial metrics treat the interval end as if the process had completed there.
fn interval_row(p: &Process, r: &IntervalRecord, executed_so_far: u64) -> TableRow {
    let partial_turnaround = r.end.saturating_sub(p.arrival());
    TableRow {
        kind: RowKind::Interval,
        id: p.id(),
        arrival: p.arrival(),
        burst: p.burst(),
        priority: p.priority(),
        start: Some(r.start),
        end: Some(r.end),
        turnaround: Some(partial_turnaround),
        waiting: Some(partial_turnaround.saturating_sub(executed_so_far)),
        state: r.state.label().to_owned(),
        execution: format!("({}-{})", r.start, r.end),
    }
}

struct Cell(Option<u64>);

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(v) => write!(f, "{v}"),
            None => f.write_str("-"),
        }
    }
}

impl fmt::Display for TableRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prio = Cell(self.priority.map(u64::from));
        write!(
            f,
            "{:<4} {:>7} {:>5} {:>4} {:>6} {:>5} {:>10} {:>7}  {:<10} {}",
            self.id,
            self.arrival,
            self.burst,
            prio,
            Cell(self.start),
            Cell(self.end),
            Cell(self.turnaround),
            Cell(self.waiting),
            self.state,
            self.execution
        )
    }
}

impl TableRow {
    /// Column header matching the [`Display`](fmt::Display) layout of a row.
    pub const HEADER: &'static str =
        "ID   Arrival Burst Prio  Start   End Turnaround Waiting  State      Execution";
}
