//! Scheduling statistics collection and reporting.
//!
//! This module tracks performance metrics for a simulation. It provides:
//! 1. **Counters:** Cycles, busy and idle time units, dispatches, blocks and completions.
//! 2. **Quantum outcomes:** How each quantum ended (expiry, block, termination).
//! 3. **Process metrics:** Average turnaround and waiting time over terminated processes.
//! 4. **Reports:** Human-readable sections for CLI and logging front-ends.

use std::fmt::Write as _;

use serde::Serialize;

use crate::process::ProcessRegistry;

/// Simulation statistics.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SchedStats {
    /// Dispatch cycles that did work.
    pub cycles: u64,
    /// Time units spent executing processes.
    pub busy_units: u64,
    /// Time units skipped with no arrived process.
    pub idle_units: u64,
    /// Quanta started (semaphore acquisitions).
    pub dispatches: u64,
    /// Quanta that ended with the process blocking.
    pub blocks: u64,
    /// Block timers that expired.
    pub unblocks: u64,
    /// Quanta that ran their full length without finishing the process.
    pub quantum_expirations: u64,
    /// Quanta that terminated their process.
    pub completions: u64,
}

/// Section names for selective stats output.
///
/// Valid section identifiers: `"summary"`, `"dispatch"`, `"processes"`.
/// Pass an empty slice to [`SchedStats::render_sections`] to render all sections.
pub const STATS_SECTIONS: &[&str] = &["summary", "dispatch", "processes"];

/// Averages over terminated processes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct ProcessMetrics {
    /// Number of terminated processes.
    pub terminated: usize,
    /// Mean turnaround time.
    pub avg_turnaround: f64,
    /// Mean waiting time.
    pub avg_waiting: f64,
    /// Longest waiting time.
    pub max_waiting: u64,
}

impl ProcessMetrics {
    /// Computes the averages over every terminated process in `registry`.
    pub fn collect(registry: &ProcessRegistry) -> Self {
        let done: Vec<(u64, u64)> = registry
            .iter()
            .filter_map(|p| p.turnaround().zip(p.waiting()))
            .collect();
        if done.is_empty() {
            return Self::default();
        }
        let n = done.len() as f64;
        Self {
            terminated: done.len(),
            avg_turnaround: done.iter().map(|&(t, _)| t as f64).sum::<f64>() / n,
            avg_waiting: done.iter().map(|&(_, w)| w as f64).sum::<f64>() / n,
            max_waiting: done.iter().map(|&(_, w)| w).max().unwrap_or(0),
        }
    }
}

impl SchedStats {
    /// Total simulated time (busy plus idle).
    pub const fn elapsed(&self) -> u64 {
        self.busy_units + self.idle_units
    }

    /// Fraction of elapsed time the CPU was busy, in `[0, 1]`.
    pub fn cpu_utilization(&self) -> f64 {
        let elapsed = self.elapsed();
        if elapsed == 0 {
            return 0.0;
        }
        self.busy_units as f64 / elapsed as f64
    }

    /// Completed processes per time unit.
    pub fn throughput(&self) -> f64 {
        let elapsed = self.elapsed();
        if elapsed == 0 {
            return 0.0;
        }
        self.completions as f64 / elapsed as f64
    }

    /// Mean number of units executed per dispatch.
    pub fn avg_quantum_use(&self) -> f64 {
        if self.dispatches == 0 {
            return 0.0;
        }
        self.busy_units as f64 / self.dispatches as f64
    }

    /// Renders only the requested sections.
    ///
    /// Each element of `sections` should be one of [`STATS_SECTIONS`]. Pass an empty
    /// slice to render everything.
    pub fn render_sections(&self, registry: &ProcessRegistry, sections: &[String]) -> String {
        let want = |s: &str| sections.is_empty() || sections.iter().any(|x| x == s);
        let mut out = String::new();

        // Writing into a String cannot fail.
        let _ = writeln!(out, "==========================================================");
        let _ = writeln!(out, "ROUND ROBIN SCHEDULING STATISTICS");
        let _ = writeln!(out, "==========================================================");
        if want("summary") {
            let _ = writeln!(out, "sim_time                 {}", self.elapsed());
            let _ = writeln!(out, "sim_cycles               {}", self.cycles);
            let _ = writeln!(out, "busy_units               {}", self.busy_units);
            let _ = writeln!(out, "idle_units               {}", self.idle_units);
            let _ = writeln!(
                out,
                "cpu_utilization          {:.2}%",
                self.cpu_utilization() * 100.0
            );
            let _ = writeln!(out, "throughput               {:.4} /unit", self.throughput());
            let _ = writeln!(out, "----------------------------------------------------------");
        }
        if want("dispatch") {
            let pct = |v: u64| {
                if self.dispatches == 0 {
                    0.0
                } else {
                    v as f64 / self.dispatches as f64 * 100.0
                }
            };
            let _ = writeln!(out, "DISPATCH");
            let _ = writeln!(out, "  dispatches             {}", self.dispatches);
            let _ = writeln!(
                out,
                "  end.expired            {} ({:.2}%)",
                self.quantum_expirations,
                pct(self.quantum_expirations)
            );
            let _ = writeln!(
                out,
                "  end.blocked            {} ({:.2}%)",
                self.blocks,
                pct(self.blocks)
            );
            let _ = writeln!(
                out,
                "  end.terminated         {} ({:.2}%)",
                self.completions,
                pct(self.completions)
            );
            let _ = writeln!(out, "  unblocks               {}", self.unblocks);
            let _ = writeln!(out, "  avg_quantum_use        {:.2}", self.avg_quantum_use());
            let _ = writeln!(out, "----------------------------------------------------------");
        }
        if want("processes") {
            let m = ProcessMetrics::collect(registry);
            let _ = writeln!(out, "PROCESSES");
            let _ = writeln!(out, "  admitted               {}", registry.len());
            let _ = writeln!(out, "  terminated             {}", m.terminated);
            let _ = writeln!(out, "  avg_turnaround         {:.2}", m.avg_turnaround);
            let _ = writeln!(out, "  avg_waiting            {:.2}", m.avg_waiting);
            let _ = writeln!(out, "  max_waiting            {}", m.max_waiting);
        }
        let _ = writeln!(out, "==========================================================");
        out
    }

    /// Prints the requested sections to stdout.
    pub fn print_sections(&self, registry: &ProcessRegistry, sections: &[String]) {
        print!("{}", self.render_sections(registry, sections));
    }

    /// Prints all sections to stdout.
    ///
    /// Equivalent to `print_sections(registry, &[])`.
    pub fn print(&self, registry: &ProcessRegistry) {
        self.print_sections(registry, &[]);
    }
}
