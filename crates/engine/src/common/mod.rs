//! Common types shared by every component of the scheduler.
//!
//! This module provides:
//! 1. **Identifiers:** A strong type for process identifiers.
//! 2. **Error Handling:** The crate-wide error enum and result alias.

/// Error types for admission, configuration and invariant checks.
pub mod error;

/// Process identifier type.
pub mod id;

pub use error::{SimError, SimResult};
pub use id::ProcessId;
