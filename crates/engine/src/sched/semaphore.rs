//! Shared execution resource.
//!
//! The semaphore models single-CPU exclusivity: only its holder may advance the
//! clock. Acquisition hands out a [`SemaphoreGuard`] that releases the resource
//! when dropped, so release happens at the end of every quantum regardless of how
//! the quantum ended and the resource is never held across cycles.

use serde::Serialize;
use tracing::trace;

use crate::common::ProcessId;

/// Observable state of the shared resource.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum SemaphoreState {
    /// Nobody holds the CPU.
    Free,
    /// The CPU is held by the given process.
    Busy(ProcessId),
}

/// Binary semaphore guarding the CPU.
#[derive(Debug, Default)]
pub struct Semaphore {
    holder: Option<ProcessId>,
    acquisitions: u64,
}

impl Semaphore {
    /// Creates a free semaphore.
    pub const fn new() -> Self {
        Self {
            holder: None,
            acquisitions: 0,
        }
    }

    /// Current state.
    pub const fn state(&self) -> SemaphoreState {
        match self.holder {
            Some(id) => SemaphoreState::Busy(id),
            None => SemaphoreState::Free,
        }
    }

    /// Returns `true` if nobody holds the resource.
    pub const fn is_free(&self) -> bool {
        self.holder.is_none()
    }

    /// Number of successful acquisitions so far.
    pub const fn acquisitions(&self) -> u64 {
        self.acquisitions
    }

    /// Acquires the resource for `id`, or returns `None` if it is busy.
    pub fn try_acquire(&mut self, id: ProcessId) -> Option<SemaphoreGuard<'_>> {
        if self.holder.is_some() {
            return None;
        }
        self.holder = Some(id);
        self.acquisitions += 1;
        trace!(%id, "semaphore acquired");
        Some(SemaphoreGuard { semaphore: self })
    }
}

/// Proof of ownership of the CPU; releases it on drop.
#[derive(Debug)]
pub struct SemaphoreGuard<'a> {
    semaphore: &'a mut Semaphore,
}

impl SemaphoreGuard<'_> {
    /// Process holding the resource.
    pub fn holder(&self) -> Option<ProcessId> {
        self.semaphore.holder
    }
}

impl Drop for SemaphoreGuard<'_> {
    fn drop(&mut self) {
        if let Some(id) = self.semaphore.holder.take() {
            trace!(%id, "semaphore released");
        }
    }
}
