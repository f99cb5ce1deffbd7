//! Unit, scenario and property tests.




/// Randomized invariants over arbitrary workloads.
pub mod properties;

/// Admission and dispatch ordering.
pub mod registry;

/// Worker/presentation sharing.
pub mod shared;




/// Random workload generation.
pub mod workload;
