//! Process identifiers.
//!
//! Identifiers are positive, assigned sequentially at admission time and never
//! reused within a simulation.

use std::fmt;

use serde::Serialize;

/// Identifier of a simulated process.
///
/// The first admitted process receives `ProcessId(1)`; identifiers follow
/// admission order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct ProcessId(pub u32);

impl ProcessId {
    /// Creates a process identifier from its raw value.
    #[inline(always)]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Returns the raw identifier value.
    #[inline(always)]
    pub const fn val(self) -> u32 {
        self.0
    }
}

impl fmt::Display for ProcessId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{}", self.0)
    }
}
