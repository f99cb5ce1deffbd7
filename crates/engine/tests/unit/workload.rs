//! Workload Generator Unit Tests.
//!
//! Drawn values stay inside the configured ranges, priorities only appear under
//! the priority key, and arrival follows the configured policy.

use pretty_assertions::assert_eq;
use rrsim_core::config::{ArrivalPolicy, Config, WorkloadConfig};
use rrsim_core::sched::NeverBlock;
use rrsim_core::sim::WorkloadGenerator;
use rrsim_core::{SchedulingKey, SimError};

use crate::common::harness::TestContext;

fn context(key: SchedulingKey, arrival: ArrivalPolicy) -> TestContext {
    let config = Config {
        scheduling_key: key,
        seed: Some(11),
        workload: WorkloadConfig {
            arrival,
            ..WorkloadConfig::default()
        },
        ..Config::default()
    };
    TestContext::with_model(config, NeverBlock)
}

#[test]
fn fifo_draws_bursts_without_priorities() {
    let mut tc = context(SchedulingKey::Fifo, ArrivalPolicy::AdmissionOrder);
    let mut generator = WorkloadGenerator::for_simulation(&tc.sim).unwrap();
    let ids = generator.admit_many(&mut tc.sim, 200).unwrap();
    assert_eq!(ids.len(), 200);
    for p in tc.sim.registry() {
        assert!((5..=15).contains(&p.burst()), "burst {}", p.burst());
        assert_eq!(p.priority(), None);
    }
}

#[test]
fn priority_key_draws_priorities_in_range() {
    let mut tc = context(SchedulingKey::Priority, ArrivalPolicy::AdmissionOrder);
    let mut generator = WorkloadGenerator::for_simulation(&tc.sim).unwrap();
    let _ = generator.admit_many(&mut tc.sim, 200).unwrap();
    let priorities: Vec<u32> = tc.sim.registry().iter().filter_map(|p| p.priority()).collect();
    assert_eq!(priorities.len(), 200);
    assert!(priorities.iter().all(|p| (1..=5).contains(p)));
    assert!(priorities.contains(&1) && priorities.contains(&5));
}

#[test]
fn admission_order_arrivals() {
    let mut tc = context(SchedulingKey::Fifo, ArrivalPolicy::AdmissionOrder);
    let mut generator = WorkloadGenerator::for_simulation(&tc.sim).unwrap();
    let _ = generator.admit_many(&mut tc.sim, 4).unwrap();
    let arrivals: Vec<u64> = tc.sim.registry().iter().map(|p| p.arrival()).collect();
    assert_eq!(arrivals, vec![0, 1, 2, 3]);
}

#[test]
fn clock_arrivals_track_simulation_time() {
    let mut tc = context(SchedulingKey::Fifo, ArrivalPolicy::Clock);
    let mut generator = WorkloadGenerator::for_simulation(&tc.sim).unwrap();
    let first = generator.admit_next(&mut tc.sim).unwrap();
    let _ = tc.sim.run_dispatch_cycle().unwrap();
    let now = tc.sim.now();
    let second = generator.admit_next(&mut tc.sim).unwrap();

    assert_eq!(tc.sim.process(first).unwrap().arrival(), 0);
    assert_eq!(tc.sim.process(second).unwrap().arrival(), now);
    assert!(now >= 5);
}

#[test]
fn same_seed_same_workload() {
    let draw = || {
        let mut tc = context(SchedulingKey::Priority, ArrivalPolicy::AdmissionOrder);
        let mut generator = WorkloadGenerator::new(WorkloadConfig::default(), 77).unwrap();
        let _ = generator.admit_many(&mut tc.sim, 20).unwrap();
        tc.sim
            .registry()
            .iter()
            .map(|p| (p.burst(), p.priority()))
            .collect::<Vec<_>>()
    };
    assert_eq!(draw(), draw());
}

#[test]
fn degenerate_range_always_draws_the_bound() {
    let mut tc = context(SchedulingKey::Fifo, ArrivalPolicy::AdmissionOrder);
    let config = WorkloadConfig {
        burst_min: 3,
        burst_max: 3,
        ..WorkloadConfig::default()
    };
    let mut generator = WorkloadGenerator::new(config, 1).unwrap();
    let _ = generator.admit_many(&mut tc.sim, 10).unwrap();
    assert!(tc.sim.registry().iter().all(|p| p.burst() == 3));
}

#[test]
fn invalid_ranges_rejected() {
    let config = WorkloadConfig {
        burst_min: 0,
        ..WorkloadConfig::default()
    };
    let err = WorkloadGenerator::new(config, 1).unwrap_err();
    assert!(matches!(err, SimError::InvalidArgument { .. }));
}
