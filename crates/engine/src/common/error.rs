//! Error definitions.
//!
//! The engine performs no I/O, so every failure is one of:
//! 1. **Input Validation:** Bad admission parameters or configuration values, rejected
//!    synchronously with the simulation state unchanged.
//! 2. **Invariant Violations:** Conditions that are impossible by construction (illegal
//!    state transitions, overlapping intervals, double acquisition of the CPU). Callers
//!    should treat these as fatal programming errors.
//! 3. **Configuration Parsing:** Malformed JSON handed to [`Config::from_json`](crate::Config::from_json).

use thiserror::Error;

/// Errors reported by the scheduling engine.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum SimError {
    /// An admission parameter or configuration value is out of range.
    #[error("invalid argument `{field}`: {reason}")]
    InvalidArgument {
        /// Name of the offending parameter.
        field: &'static str,
        /// Human-readable description of the constraint that was violated.
        reason: String,
    },

    /// An internal consistency check failed.
    ///
    /// This is never a recoverable condition; the simulation state should be
    /// discarded.
    #[error("invariant violation: {0}")]
    InvariantViolation(String),

    /// The JSON configuration could not be deserialized.
    #[error("malformed configuration: {0}")]
    Config(String),
}

impl SimError {
    /// Builds an [`SimError::InvalidArgument`] for `field`.
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            field,
            reason: reason.into(),
        }
    }

    /// Builds an [`SimError::InvariantViolation`].
    pub fn invariant(msg: impl Into<String>) -> Self {
        Self::InvariantViolation(msg.into())
    }

    /// Returns `true` for errors that must abort the simulation.
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::InvariantViolation(_))
    }
}

impl From<serde_json::Error> for SimError {
    fn from(err: serde_json::Error) -> Self {
        Self::Config(err.to_string())
    }
}

/// Result alias used throughout the engine.
pub type SimResult<T> = Result<T, SimError>;
