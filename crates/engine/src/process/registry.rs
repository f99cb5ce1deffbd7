//! Ordered process collection.
//!
//! Processes are stored in admission order and never removed, so terminated
//! processes remain available for reporting. The dispatch order of each cycle is
//! derived from the configured [`SchedulingKey`].

use tracing::debug;

use super::Process;
use crate::common::{ProcessId, SimError, SimResult};
use crate::config::SchedulingKey;

/// Admission-ordered collection of processes.
#[derive(Clone, Debug, Default)]
pub struct ProcessRegistry {
    processes: Vec<Process>,
    key: SchedulingKey,
}

impl ProcessRegistry {
    /// Creates an empty registry using `key` for dispatch ordering.
    pub const fn new(key: SchedulingKey) -> Self {
        Self {
            processes: Vec::new(),
            key,
        }
    }

    /// Dispatch ordering in effect.
    pub const fn key(&self) -> SchedulingKey {
        self.key
    }

    /// Admits a new ready process and returns its identifier.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidArgument`] if `burst` is zero or `arrival + burst`
    /// does not fit the clock; the registry is left unchanged.
    pub fn admit(&mut self, arrival: u64, burst: u64, priority: Option<u32>) -> SimResult<ProcessId> {
        let next = u32::try_from(self.processes.len() + 1)
            .map_err(|_| SimError::invalid("process", "identifier space exhausted"))?;
        if arrival.checked_add(burst).is_none() {
            return Err(SimError::invalid(
                "arrival",
                format!("{arrival} + burst {burst} exceeds the clock range"),
            ));
        }
        let id = ProcessId::new(next);
        let process = Process::new(id, arrival, burst, priority)?;
        debug!(%id, arrival, burst, ?priority, "process admitted");
        self.processes.push(process);
        Ok(id)
    }

    /// Identifiers in the order they should be offered the CPU this cycle.
    ///
    /// FIFO returns admission order. Priority sorts by ascending
    /// `(priority, arrival)`; processes without a priority go last and ties keep
    /// admission order.
    pub fn order_for_dispatch(&self) -> Vec<ProcessId> {
        let mut order: Vec<&Process> = self.processes.iter().collect();
        if self.key == SchedulingKey::Priority {
            order.sort_by_key(|p| (p.priority().unwrap_or(u32::MAX), p.arrival(), p.id()));
        }
        order.into_iter().map(Process::id).collect()
    }

    /// Looks up a process.
    pub fn get(&self, id: ProcessId) -> Option<&Process> {
        self.index_of(id).map(|i| &self.processes[i])
    }

    pub(crate) fn get_mut(&mut self, id: ProcessId) -> Option<&mut Process> {
        self.index_of(id).map(|i| &mut self.processes[i])
    }

    /// All processes in admission order.
    pub fn iter(&self) -> std::slice::Iter<'_, Process> {
        self.processes.iter()
    }

    /// Number of admitted processes.
    pub fn len(&self) -> usize {
        self.processes.len()
    }

    /// Returns `true` if nothing has been admitted.
    pub fn is_empty(&self) -> bool {
        self.processes.is_empty()
    }

    /// Returns `true` when every admitted process has terminated.
    pub fn all_terminated(&self) -> bool {
        self.processes.iter().all(Process::is_terminated)
    }

    /// Earliest arrival among unfinished processes that have not arrived by `now`.
    pub fn next_arrival_after(&self, now: u64) -> Option<u64> {
        self.processes
            .iter()
            .filter(|p| !p.is_terminated() && !p.has_arrived(now))
            .map(Process::arrival)
            .min()
    }

    /// Returns `true` if some unfinished process has arrived by `now`.
    pub fn any_eligible(&self, now: u64) -> bool {
        self.processes
            .iter()
            .any(|p| !p.is_terminated() && p.has_arrived(now))
    }

    // Ids are dense and assigned from 1, so lookup is positional.
    fn index_of(&self, id: ProcessId) -> Option<usize> {
        let index = (id.val() as usize).checked_sub(1)?;
        (index < self.processes.len()).then_some(index)
    }
}

impl<'a> IntoIterator for &'a ProcessRegistry {
    type Item = &'a Process;
    type IntoIter = std::slice::Iter<'a, Process>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
