//! Scheduling Property Tests.
//!
//! Arbitrary workloads, quanta and blocking settings must uphold:
//! - Remaining time never increases and every process terminates
//! - Executed intervals sum to the burst and never overlap globally
//! - `turnaround = end - arrival` and `waiting = turnaround - burst`
//! - Under the priority key, each cycle first runs the best ready process
//! - Cycles after completion change nothing

use proptest::prelude::*;
use rrsim_core::config::Config;
use rrsim_core::{ProcessState, SchedulingKey, Simulation};

use crate::common::harness::init_tracing;

/// `(burst, arrival, priority)`
type Job = (u64, u64, u32);

fn jobs() -> impl Strategy<Value = Vec<Job>> {
    prop::collection::vec((1_u64..20, 0_u64..30, 1_u32..6), 1..8)
}

fn build(jobs: &[Job], quantum: u64, percent: u8, duration: u64, seed: u64, priority: bool) -> Simulation {
    init_tracing();
    let config = Config {
        quantum,
        block_probability: f64::from(percent) / 100.0,
        block_duration: duration,
        scheduling_key: if priority {
            SchedulingKey::Priority
        } else {
            SchedulingKey::Fifo
        },
        seed: Some(seed),
        ..Config::default()
    };
    let mut sim = Simulation::new(config).unwrap();
    for &(burst, arrival, prio) in jobs {
        let _ = sim.admit_process(burst, arrival, Some(prio)).unwrap();
    }
    sim
}

// Every unit either runs or blocks a process; with p < 1 each quantum can block at
// most once per unit, so this bound is generous.
fn cycle_limit(jobs: &[Job]) -> u64 {
    jobs.iter().map(|j| j.0).sum::<u64>() * 4 + 8
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn remaining_monotone_and_all_terminate(
        jobs in jobs(),
        quantum in 1_u64..6,
        percent in 0_u8..=100,
        duration in 0_u64..3,
        seed in any::<u64>(),
        priority in any::<bool>(),
    ) {
        let mut sim = build(&jobs, quantum, percent, duration, seed, priority);
        let mut previous: Vec<u64> = sim.snapshot().iter().map(|p| p.remaining).collect();
        let mut cycles = 0;
        while !sim.is_complete() {
            let _ = sim.run_dispatch_cycle().unwrap();
            cycles += 1;
            prop_assert!(cycles <= cycle_limit(&jobs), "no progress after {} cycles", cycles);
            let current: Vec<u64> = sim.snapshot().iter().map(|p| p.remaining).collect();
            for (before, after) in previous.iter().zip(&current) {
                prop_assert!(after <= before);
            }
            previous = current;
        }
        prop_assert!(sim.snapshot().iter().all(|p| p.state == ProcessState::Terminated));
    }

    #[test]
    fn intervals_and_metrics_consistent(
        jobs in jobs(),
        quantum in 1_u64..6,
        percent in 0_u8..=100,
        duration in 0_u64..3,
        seed in any::<u64>(),
        priority in any::<bool>(),
    ) {
        let mut sim = build(&jobs, quantum, percent, duration, seed, priority);
        let _ = sim.run_to_completion().unwrap();

        let records = sim.trace().records();
        for pair in records.windows(2) {
            prop_assert!(pair[0].end <= pair[1].start, "{:?} overlaps {:?}", pair[0], pair[1]);
        }
        for p in sim.snapshot() {
            let executed: u64 = p.intervals.iter().map(|i| i.end - i.start).sum();
            prop_assert_eq!(executed, p.burst);
            prop_assert!(p.intervals.iter().all(|i| i.start < i.end && i.duration() <= quantum));
            prop_assert!(p.intervals.first().is_some_and(|i| Some(i.start) == p.start_time));
            prop_assert!(p.start_time.is_some_and(|s| s >= p.arrival));

            let end = p.end_time.unwrap();
            prop_assert_eq!(p.intervals.last().map(|i| i.end), Some(end));
            prop_assert_eq!(p.turnaround, Some(end - p.arrival));
            prop_assert_eq!(p.waiting, Some(end - p.arrival - p.burst));
        }
        let busy: u64 = records.iter().map(|r| r.duration()).sum();
        prop_assert_eq!(busy, sim.stats().busy_units);
        prop_assert_eq!(sim.stats().elapsed(), sim.now());
    }

    #[test]
    fn priority_cycle_starts_with_best_ready_process(
        jobs in jobs(),
        quantum in 1_u64..6,
        percent in 0_u8..=60,
        seed in any::<u64>(),
    ) {
        let mut sim = build(&jobs, quantum, percent, 1, seed, true);
        while !sim.is_complete() {
            let now = sim.now();
            let best = sim
                .registry()
                .iter()
                .filter(|p| p.state() == ProcessState::Ready && p.has_arrived(now))
                .min_by_key(|p| (p.priority().unwrap_or(u32::MAX), p.arrival(), p.id()))
                .map(|p| p.id());
            let result = sim.run_dispatch_cycle().unwrap();
            if let (Some(best), Some(first)) = (best, result.events.first()) {
                prop_assert_eq!(first.process, best);
            }
        }
    }

    #[test]
    fn completed_simulation_is_a_fixed_point(
        jobs in jobs(),
        quantum in 1_u64..6,
        percent in 0_u8..=100,
        seed in any::<u64>(),
    ) {
        let mut sim = build(&jobs, quantum, percent, 0, seed, false);
        let _ = sim.run_to_completion().unwrap();
        let snapshot = sim.snapshot();
        let stats = sim.stats().clone();
        for _ in 0..3 {
            let result = sim.run_dispatch_cycle().unwrap();
            prop_assert!(result.is_empty());
        }
        prop_assert_eq!(sim.snapshot(), snapshot);
        prop_assert_eq!(sim.stats(), &stats);
    }
}
