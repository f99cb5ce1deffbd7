//! Shared Simulation Unit Tests.
//!
//! One worker mutates, other threads observe owned snapshots; a cycle is never
//! started while another holder has the lock.

use std::thread;

use pretty_assertions::assert_eq;
use rrsim_core::config::Config;
use rrsim_core::sched::NeverBlock;
use rrsim_core::{SharedSimulation, Simulation, Tick};

use crate::common::harness::init_tracing;

fn shared(quantum: u64) -> SharedSimulation {
    init_tracing();
    let config = Config {
        quantum,
        ..Config::default()
    };
    let sim = Simulation::with_blocking_model(config, Box::new(NeverBlock)).unwrap();
    SharedSimulation::new(sim)
}

#[test]
fn try_tick_refuses_reentry() {
    let sim = shared(5);
    let _ = sim.admit_process(3, 0, None).unwrap();
    let nested = sim.with(|_| sim.try_tick());
    assert!(nested.is_none());
    assert!(!sim.is_complete());

    let tick = sim.try_tick().unwrap().unwrap();
    assert!(matches!(tick, Tick::Advanced(_)));
    assert!(sim.is_complete());
}

#[test]
fn worker_and_observer_threads() {
    let sim = shared(2);
    for burst in [5, 3, 4, 1] {
        let _ = sim.admit_process(burst, 0, None).unwrap();
    }

    let worker = {
        let sim = sim.clone();
        thread::spawn(move || {
            let mut ticks = 0_u32;
            while !sim.tick().unwrap().is_finished() {
                ticks += 1;
            }
            ticks
        })
    };
    let observer = {
        let sim = sim.clone();
        thread::spawn(move || {
            for _ in 0..50 {
                let snap = sim.snapshot();
                assert_eq!(snap.len(), 4);
                assert!(snap.iter().all(|p| p.remaining <= p.burst));
                let bars = sim.gantt_bars();
                assert!(bars.windows(2).all(|w| w[0].start + w[0].duration <= w[1].start));
            }
        })
    };

    let ticks = worker.join().unwrap();
    observer.join().unwrap();
    assert_eq!(ticks, 3);
    assert!(sim.is_complete());
    assert_eq!(sim.gantt_bars().iter().map(|b| b.duration).sum::<u64>(), 13);
}
