//! Process Registry Unit Tests.
//!
//! Admission, identifier assignment and the per-cycle dispatch order for both
//! scheduling keys.

use pretty_assertions::assert_eq;
use rrsim_core::process::ProcessRegistry;
use rrsim_core::{ProcessId, ProcessState, SchedulingKey, SimError};

fn ids(order: &[ProcessId]) -> Vec<u32> {
    order.iter().map(|id| id.val()).collect()
}

#[test]
fn ids_are_sequential_from_one() {
    let mut reg = ProcessRegistry::new(SchedulingKey::Fifo);
    assert_eq!(reg.admit(0, 3, None).unwrap(), ProcessId(1));
    assert_eq!(reg.admit(0, 4, None).unwrap(), ProcessId(2));
    assert_eq!(reg.admit(2, 1, None).unwrap(), ProcessId(3));
    assert_eq!(reg.len(), 3);
}

#[test]
fn admitted_process_starts_ready_with_full_burst() {
    let mut reg = ProcessRegistry::new(SchedulingKey::Fifo);
    let id = reg.admit(4, 9, Some(2)).unwrap();
    let p = reg.get(id).unwrap();
    assert_eq!(p.arrival(), 4);
    assert_eq!(p.burst(), 9);
    assert_eq!(p.remaining(), 9);
    assert_eq!(p.priority(), Some(2));
    assert_eq!(p.state(), ProcessState::Ready);
    assert_eq!(p.start_time(), None);
    assert_eq!(p.end_time(), None);
    assert_eq!(p.turnaround(), None);
    assert_eq!(p.waiting(), None);
    assert!(p.intervals().is_empty());
}

#[test]
fn zero_burst_rejected_without_side_effects() {
    let mut reg = ProcessRegistry::new(SchedulingKey::Fifo);
    let err = reg.admit(0, 0, None).unwrap_err();
    assert!(matches!(err, SimError::InvalidArgument { field: "burst", .. }), "got {err:?}");
    assert!(reg.is_empty());

    // The next valid admission still receives the first identifier.
    assert_eq!(reg.admit(0, 1, None).unwrap(), ProcessId(1));
}

#[test]
fn arrival_past_clock_range_rejected() {
    let mut reg = ProcessRegistry::new(SchedulingKey::Fifo);
    let err = reg.admit(u64::MAX, 2, None).unwrap_err();
    assert!(matches!(err, SimError::InvalidArgument { field: "arrival", .. }), "got {err:?}");
    assert!(reg.is_empty());

    // The last representable instant is still reachable.
    assert_eq!(reg.admit(u64::MAX - 2, 2, None).unwrap(), ProcessId(1));
}

#[test]
fn fifo_order_is_admission_order() {
    let mut reg = ProcessRegistry::new(SchedulingKey::Fifo);
    let _ = reg.admit(5, 1, Some(1)).unwrap();
    let _ = reg.admit(0, 1, Some(5)).unwrap();
    let _ = reg.admit(2, 1, None).unwrap();
    assert_eq!(ids(&reg.order_for_dispatch()), vec![1, 2, 3]);
}

#[test]
fn priority_order_sorts_by_priority_then_arrival() {
    let mut reg = ProcessRegistry::new(SchedulingKey::Priority);
    let _ = reg.admit(0, 1, Some(3)).unwrap(); // P1
    let _ = reg.admit(4, 1, Some(1)).unwrap(); // P2
    let _ = reg.admit(1, 1, Some(1)).unwrap(); // P3
    let _ = reg.admit(0, 1, Some(2)).unwrap(); // P4
    assert_eq!(ids(&reg.order_for_dispatch()), vec![3, 2, 4, 1]);
}

#[test]
fn priority_ties_keep_admission_order() {
    let mut reg = ProcessRegistry::new(SchedulingKey::Priority);
    for _ in 0..4 {
        let _ = reg.admit(0, 1, Some(2)).unwrap();
    }
    assert_eq!(ids(&reg.order_for_dispatch()), vec![1, 2, 3, 4]);
}

#[test]
fn missing_priority_sorts_last() {
    let mut reg = ProcessRegistry::new(SchedulingKey::Priority);
    let _ = reg.admit(0, 1, None).unwrap();
    let _ = reg.admit(3, 1, Some(5)).unwrap();
    let _ = reg.admit(1, 1, Some(1)).unwrap();
    assert_eq!(ids(&reg.order_for_dispatch()), vec![3, 2, 1]);
}

#[test]
fn arrival_queries() {
    let mut reg = ProcessRegistry::new(SchedulingKey::Fifo);
    let _ = reg.admit(3, 1, None).unwrap();
    let _ = reg.admit(7, 1, None).unwrap();
    assert!(!reg.any_eligible(0));
    assert_eq!(reg.next_arrival_after(0), Some(3));
    assert!(reg.any_eligible(3));
    assert_eq!(reg.next_arrival_after(3), Some(7));
    assert_eq!(reg.next_arrival_after(7), None);
}

#[test]
fn empty_registry_is_all_terminated() {
    let reg = ProcessRegistry::new(SchedulingKey::Fifo);
    assert!(reg.all_terminated());
    assert!(reg.order_for_dispatch().is_empty());
    assert_eq!(reg.get(ProcessId(1)), None);
}
