//! Scheduling machinery.
//!
//! This module contains the pieces the dispatcher drives every cycle:
//! 1. **Clock:** Monotonic global time counter.
//! 2. **Semaphore:** The single shared execution resource (CPU exclusivity).
//! 3. **Blocking:** Pluggable policy deciding when a running process blocks.
//! 4. **Dispatcher:** The per-cycle state machine and quantum execution loop.

/// Pluggable blocking policies.
pub mod blocking;

/// Global simulation clock.
pub mod clock;

/// Dispatch cycle and quantum execution.
pub mod dispatcher;

/// Shared execution resource.
pub mod semaphore;

pub use blocking::{BlockDecision, BlockingModel, NeverBlock, RandomBlocking, ScriptedBlocking};
pub use clock::Clock;
pub use dispatcher::{CycleResult, Dispatcher};
pub use semaphore::{Semaphore, SemaphoreState};
