//! Simulation controllers.
//!
//! Provides the engine instance that owns all simulation state, the two execution
//! modes built on it (run-to-completion and stepped), a thread-safe wrapper for a
//! worker/presentation split, and random workload generation.

/// Mutex-guarded simulation shared with a presentation thread.
pub mod shared;

/// Engine instance and execution modes.
pub mod simulator;

/// Random process admission.
pub mod workload;

pub use shared::SharedSimulation;
pub use simulator::{Simulation, Stepper, Tick};
pub use workload::WorkloadGenerator;
