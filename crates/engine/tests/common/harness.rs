use rrsim_core::config::Config;
use rrsim_core::sched::{BlockingModel, NeverBlock};
use rrsim_core::{ProcessId, ProcessState, SchedulingKey, Simulation};
use tracing_subscriber::EnvFilter;

/// Installs a test-writer subscriber once per test binary.
///
/// Honors `RUST_LOG`, so `RUST_LOG=rrsim_core=trace cargo test` shows every unit.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init();
}

/// Flattened interval: `(process, start, end, state)`.
pub type Span = (u32, u64, u64, ProcessState);

/// Owns one simulation and offers builder-style admission.
#[derive(Debug)]
pub struct TestContext {
    pub sim: Simulation,
}

impl TestContext {
    /// FIFO simulation without blocking.
    pub fn new(quantum: u64) -> Self {
        Self::with_model(
            Config {
                quantum,
                ..Config::default()
            },
            NeverBlock,
        )
    }

    /// Priority simulation without blocking.
    pub fn priority(quantum: u64) -> Self {
        Self::with_model(
            Config {
                quantum,
                scheduling_key: SchedulingKey::Priority,
                ..Config::default()
            },
            NeverBlock,
        )
    }

    pub fn with_model(config: Config, model: impl BlockingModel + 'static) -> Self {
        init_tracing();
        let sim = Simulation::with_blocking_model(config, Box::new(model))
            .expect("test configuration is valid");
        Self { sim }
    }

    pub fn with_config(config: Config) -> Self {
        init_tracing();
        let sim = Simulation::new(config).expect("test configuration is valid");
        Self { sim }
    }

    pub fn admit(mut self, burst: u64, arrival: u64) -> Self {
        let _ = self
            .sim
            .admit_process(burst, arrival, None)
            .expect("admission succeeds");
        self
    }

    pub fn admit_with_priority(mut self, burst: u64, arrival: u64, priority: u32) -> Self {
        let _ = self
            .sim
            .admit_process(burst, arrival, Some(priority))
            .expect("admission succeeds");
        self
    }

    /// Runs to completion and returns the number of cycles.
    pub fn run(&mut self) -> u64 {
        self.sim.run_to_completion().expect("simulation completes")
    }

    pub fn spans(&self) -> Vec<Span> {
        self.sim
            .trace()
            .records()
            .iter()
            .map(|r| (r.process.val(), r.start, r.end, r.state))
            .collect()
    }

    /// `(end, turnaround, waiting)` of a terminated process.
    pub fn metrics(&self, id: u32) -> (u64, u64, u64) {
        let p = self
            .sim
            .process(ProcessId::new(id))
            .expect("process exists");
        (
            p.end_time().expect("terminated"),
            p.turnaround().expect("terminated"),
            p.waiting().expect("terminated"),
        )
    }
}
