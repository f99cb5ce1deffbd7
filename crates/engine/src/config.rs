//! Configuration system for the scheduling simulator.
//!
//! This module defines the configuration structures and enums used to parameterize a
//! simulation. It provides:
//! 1. **Defaults:** Baseline constants (quantum, blocking probability, workload ranges).
//! 2. **Structures:** The root [`Config`] and the random [`WorkloadConfig`].
//! 3. **Enums:** Dispatch ordering key and arrival-time policy.
//!
//! Configuration is supplied as JSON (see [`Config::from_json`]) or built from
//! `Config::default()`. Field names accept both `snake_case` and the `camelCase`
//! spelling used by renderer front-ends.

use serde::Deserialize;

use crate::common::{SimError, SimResult};

/// Default configuration constants for the simulator.
mod defaults {
    /// Maximum contiguous time units a process may execute per dispatch.
    pub const QUANTUM: u64 = 5;

    /// Probability that an executed time unit blocks the running process.
    pub const BLOCK_PROBABILITY: f64 = 0.1;

    /// Number of blocked-checks a blocked process waits before becoming ready.
    ///
    /// Zero and one are equivalent: either keeps the process out for one cycle.
    pub const BLOCK_DURATION: u64 = 0;

    /// Smallest burst drawn by the workload generator.
    pub const BURST_MIN: u64 = 5;

    /// Largest burst drawn by the workload generator.
    pub const BURST_MAX: u64 = 15;

    /// Highest priority (lowest value) drawn by the workload generator.
    pub const PRIORITY_MIN: u32 = 1;

    /// Lowest priority (highest value) drawn by the workload generator.
    pub const PRIORITY_MAX: u32 = 5;
}

/// Ordering used to build the dispatch sequence of each cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchedulingKey {
    /// Admission order (plain Round Robin).
    #[default]
    #[serde(alias = "Fifo", alias = "FIFO")]
    Fifo,
    /// Ascending `(priority, arrival)`, re-evaluated every cycle.
    #[serde(alias = "Priority")]
    Priority,
}

/// Arrival time assigned by the workload generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArrivalPolicy {
    /// The n-th admitted process arrives at time `n - 1`.
    #[default]
    #[serde(alias = "AdmissionOrder")]
    AdmissionOrder,
    /// Processes arrive at the simulation clock value at admission.
    #[serde(alias = "Clock")]
    Clock,
}

/// Root configuration structure.
///
/// # Examples
///
/// ```
/// use rrsim_core::config::{Config, SchedulingKey};
///
/// let config = Config::default();
/// assert_eq!(config.quantum, 5);
/// assert_eq!(config.scheduling_key, SchedulingKey::Fifo);
///
/// let json = r#"{ "quantum": 3, "blockProbability": 0.0, "schedulingKey": "priority" }"#;
/// let config = Config::from_json(json).unwrap();
/// assert_eq!(config.quantum, 3);
/// assert_eq!(config.scheduling_key, SchedulingKey::Priority);
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Config {
    /// Time units per quantum
    #[serde(default = "Config::default_quantum")]
    pub quantum: u64,

    /// Per-unit probability of blocking, in `[0, 1]`
    #[serde(default = "Config::default_block_probability", alias = "blockProbability")]
    pub block_probability: f64,

    /// Blocked-checks before a blocked process is ready again
    #[serde(default = "Config::default_block_duration", alias = "blockDuration")]
    pub block_duration: u64,

    /// Dispatch ordering
    #[serde(default, alias = "schedulingKey")]
    pub scheduling_key: SchedulingKey,

    /// Seed for every random source; drawn at startup when absent
    #[serde(default)]
    pub seed: Option<u64>,

    /// Random workload parameters
    #[serde(default)]
    pub workload: WorkloadConfig,
}

impl Config {
    fn default_quantum() -> u64 {
        defaults::QUANTUM
    }

    fn default_block_probability() -> f64 {
        defaults::BLOCK_PROBABILITY
    }

    fn default_block_duration() -> u64 {
        defaults::BLOCK_DURATION
    }

    /// Deserializes and validates a JSON configuration.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Config`] for malformed JSON and
    /// [`SimError::InvalidArgument`] for out-of-range values.
    pub fn from_json(json: &str) -> SimResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks every value against its allowed range.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidArgument`] naming the first offending field.
    pub fn validate(&self) -> SimResult<()> {
        if self.quantum == 0 {
            return Err(SimError::invalid("quantum", "must be at least 1"));
        }
        if !(0.0..=1.0).contains(&self.block_probability) {
            return Err(SimError::invalid(
                "block_probability",
                format!("{} is not in [0, 1]", self.block_probability),
            ));
        }
        self.workload.validate()
    }

    /// Returns a copy with blocking disabled, for deterministic runs.
    pub fn without_blocking(mut self) -> Self {
        self.block_probability = 0.0;
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            quantum: defaults::QUANTUM,
            block_probability: defaults::BLOCK_PROBABILITY,
            block_duration: defaults::BLOCK_DURATION,
            scheduling_key: SchedulingKey::default(),
            seed: None,
            workload: WorkloadConfig::default(),
        }
    }
}

/// Parameters of the random workload generator.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WorkloadConfig {
    /// Smallest burst (inclusive)
    #[serde(default = "WorkloadConfig::default_burst_min")]
    pub burst_min: u64,

    /// Largest burst (inclusive)
    #[serde(default = "WorkloadConfig::default_burst_max")]
    pub burst_max: u64,

    /// Smallest priority value (inclusive)
    #[serde(default = "WorkloadConfig::default_priority_min")]
    pub priority_min: u32,

    /// Largest priority value (inclusive)
    #[serde(default = "WorkloadConfig::default_priority_max")]
    pub priority_max: u32,

    /// How arrival times are assigned
    #[serde(default)]
    pub arrival: ArrivalPolicy,
}

impl WorkloadConfig {
    fn default_burst_min() -> u64 {
        defaults::BURST_MIN
    }

    fn default_burst_max() -> u64 {
        defaults::BURST_MAX
    }

    fn default_priority_min() -> u32 {
        defaults::PRIORITY_MIN
    }

    fn default_priority_max() -> u32 {
        defaults::PRIORITY_MAX
    }

    /// Checks that both ranges are non-empty and bursts are positive.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidArgument`] naming the offending bound.
    pub fn validate(&self) -> SimResult<()> {
        if self.burst_min == 0 {
            return Err(SimError::invalid("workload.burst_min", "must be at least 1"));
        }
        if self.burst_min > self.burst_max {
            return Err(SimError::invalid(
                "workload.burst_max",
                format!("{} is below burst_min {}", self.burst_max, self.burst_min),
            ));
        }
        if self.priority_min > self.priority_max {
            return Err(SimError::invalid(
                "workload.priority_max",
                format!(
                    "{} is below priority_min {}",
                    self.priority_max, self.priority_min
                ),
            ));
        }
        Ok(())
    }
}

impl Default for WorkloadConfig {
    fn default() -> Self {
        Self {
            burst_min: defaults::BURST_MIN,
            burst_max: defaults::BURST_MAX,
            priority_min: defaults::PRIORITY_MIN,
            priority_max: defaults::PRIORITY_MAX,
            arrival: ArrivalPolicy::default(),
        }
    }
}
