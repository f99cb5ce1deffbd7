//! Random workload generation.
//!
//! Admits processes with uniformly drawn bursts (and priorities, under the
//! priority key), the way interactive front-ends populate a simulation one button
//! press at a time. Arrival times follow [`ArrivalPolicy`].

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::debug;

use super::simulator::Simulation;
use crate::common::{ProcessId, SimResult};
use crate::config::{ArrivalPolicy, SchedulingKey, WorkloadConfig};

/// Seeded generator of random processes.
#[derive(Debug, Clone)]
pub struct WorkloadGenerator {
    config: WorkloadConfig,
    rng: ChaCha8Rng,
}

impl WorkloadGenerator {
    /// Creates a generator drawing from `config` ranges.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidArgument`](crate::SimError::InvalidArgument) if a
    /// range is empty or allows a zero burst.
    pub fn new(config: WorkloadConfig, seed: u64) -> SimResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            rng: ChaCha8Rng::seed_from_u64(seed),
        })
    }

    /// Creates a generator from the simulation's own workload configuration.
    ///
    /// The seed is derived from the configured seed so that workload and blocking
    /// decisions use distinct streams.
    ///
    /// # Errors
    ///
    /// Same as [`WorkloadGenerator::new`].
    pub fn for_simulation(sim: &Simulation) -> SimResult<Self> {
        let seed = sim
            .config()
            .seed
            .map_or_else(rand::random::<u64>, |s| s.wrapping_add(0x9E37_79B9_7F4A_7C15));
        Self::new(sim.config().workload.clone(), seed)
    }

    /// Draws a burst and, under the priority key, a priority, then admits the process.
    ///
    /// # Errors
    ///
    /// Propagates admission errors from [`Simulation::admit_process`].
    pub fn admit_next(&mut self, sim: &mut Simulation) -> SimResult<ProcessId> {
        let burst = self
            .rng
            .random_range(self.config.burst_min..=self.config.burst_max);
        let priority = (sim.config().scheduling_key == SchedulingKey::Priority).then(|| {
            self.rng
                .random_range(self.config.priority_min..=self.config.priority_max)
        });
        let arrival = match self.config.arrival {
            ArrivalPolicy::AdmissionOrder => sim.registry().len() as u64,
            ArrivalPolicy::Clock => sim.now(),
        };
        let id = sim.admit_process(burst, arrival, priority)?;
        debug!(%id, burst, arrival, ?priority, "random process generated");
        Ok(id)
    }

    /// Admits `count` random processes.
    ///
    /// # Errors
    ///
    /// Stops at the first admission error.
    pub fn admit_many(&mut self, sim: &mut Simulation, count: usize) -> SimResult<Vec<ProcessId>> {
        (0..count).map(|_| self.admit_next(sim)).collect()
    }
}
