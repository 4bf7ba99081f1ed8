//! Cycle and select scenarios against in-memory endpoints

use group_store::{AudioDevice, DeviceGroup, DeviceId, GroupDevice, GroupId};
use proptest::prelude::*;
use soundshift_state::{
    cycle, next_index, reconcile, select, CycleDecision, CycleError, CycleOutcome, MemoryEndpoints, SelectionError,
    SlotStatus,
};

// ============================================================================
// Test Helpers
// ============================================================================

fn abc_group(current_index: usize) -> DeviceGroup {
    DeviceGroup {
        id: GroupId::new("grp-abc"),
        name: "ABC".to_string(),
        devices: vec![
            GroupDevice::new("A", "Device A"),
            GroupDevice::new("B", "Device B"),
            GroupDevice::new("C", "Device C"),
        ],
        shortcut: None,
        current_index,
    }
}

/// Endpoints with only the listed ids connected
fn endpoints_with(ids: &[&str]) -> MemoryEndpoints {
    MemoryEndpoints::new(
        ids.iter()
            .map(|id| AudioDevice::new(*id, format!("Live {}", id), false))
            .collect(),
    )
}

// ============================================================================
// Scenarios
// ============================================================================

#[tokio::test]
async fn skips_offline_slot_and_wraps() {
    // [A on, B off, C on], current 2 -> 0
    let endpoints = endpoints_with(&["A", "C"]);
    let mut group = abc_group(2);

    let outcome = cycle(&endpoints, &mut group).await.unwrap();

    assert_eq!(
        outcome,
        CycleOutcome::Switched { index: 0, device: GroupDevice::new("A", "Live A") }
    );
    assert_eq!(group.current_index, 0);
    assert_eq!(endpoints.switches(), vec![DeviceId::new("A")]);
}

#[tokio::test]
async fn all_offline_is_a_no_op() {
    let endpoints = endpoints_with(&[]);
    let mut group = abc_group(1);

    let outcome = cycle(&endpoints, &mut group).await.unwrap();

    assert_eq!(outcome, CycleOutcome::NoOnlineDevices);
    assert_eq!(group.current_index, 1);
    assert!(endpoints.switches().is_empty());
}

#[tokio::test]
async fn single_online_device_is_reselected() {
    let endpoints = endpoints_with(&["B"]);
    let mut group = abc_group(1);

    let outcome = cycle(&endpoints, &mut group).await.unwrap();

    assert!(matches!(outcome, CycleOutcome::Switched { index: 1, .. }));
    assert_eq!(endpoints.switches(), vec![DeviceId::new("B")]);
}

#[tokio::test]
async fn failed_switch_leaves_index_unchanged() {
    let endpoints = endpoints_with(&["A", "B", "C"]);
    let mut group = abc_group(0);

    endpoints.fail_next("device busy");
    let err = cycle(&endpoints, &mut group).await.unwrap_err();

    assert!(err.is_retryable());
    assert_eq!(group.current_index, 0);
    assert!(endpoints.switches().is_empty());

    let outcome = cycle(&endpoints, &mut group).await.unwrap();
    assert!(matches!(outcome, CycleOutcome::Switched { index: 1, .. }));
}

#[tokio::test]
async fn failed_enumeration_is_retryable() {
    let endpoints = endpoints_with(&["A"]);
    let mut group = abc_group(0);

    endpoints.fail_next_list("enumeration failed");
    let err = select(&endpoints, &mut group, 0).await.unwrap_err();

    assert!(matches!(err, CycleError::Command(_)));
    assert!(err.is_retryable());
}

#[tokio::test]
async fn select_rejects_offline_and_out_of_range() {
    let endpoints = endpoints_with(&["A", "C"]);
    let mut group = abc_group(0);

    let offline = select(&endpoints, &mut group, 1).await.unwrap_err();
    assert!(matches!(offline, CycleError::Selection(SelectionError::Offline { index: 1, .. })));
    assert!(!offline.is_retryable());

    let out_of_range = select(&endpoints, &mut group, 3).await.unwrap_err();
    assert!(matches!(
        out_of_range,
        CycleError::Selection(SelectionError::OutOfRange { index: 3, len: 3 })
    ));

    assert_eq!(group.current_index, 0);
    assert!(endpoints.switches().is_empty());
}

#[tokio::test]
async fn select_activates_online_slot() {
    let endpoints = endpoints_with(&["A", "C"]);
    let mut group = abc_group(0);

    let device = select(&endpoints, &mut group, 2).await.unwrap();

    assert_eq!(device, GroupDevice::new("C", "Live C"));
    assert_eq!(group.current_index, 2);
    assert_eq!(endpoints.default_device().map(|d| d.id), Some(DeviceId::new("C")));
}

// ============================================================================
// Properties
// ============================================================================

fn slots_strategy() -> impl Strategy<Value = Vec<bool>> {
    proptest::collection::vec(any::<bool>(), 1..8)
}

fn to_slots(online: &[bool]) -> Vec<SlotStatus> {
    let group = DeviceGroup {
        id: GroupId::new("grp"),
        name: "grp".to_string(),
        devices: (0..online.len()).map(|i| GroupDevice::new(format!("d{}", i), "d")).collect(),
        shortcut: None,
        current_index: 0,
    };
    let live: Vec<_> = online
        .iter()
        .enumerate()
        .filter(|(_, on)| **on)
        .map(|(i, _)| AudioDevice::new(format!("d{}", i), "d", false))
        .collect();
    reconcile(&live, &group)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn next_index_lands_on_online_slot(online in slots_strategy(), current in 0usize..8) {
        let slots = to_slots(&online);
        let current = current % slots.len();

        match next_index(current, &slots) {
            CycleDecision::Activate(i) => {
                prop_assert!(i < slots.len());
                prop_assert!(slots[i].online);
            }
            CycleDecision::NoOnlineDevices => prop_assert!(online.iter().all(|on| !on)),
        }
    }

    #[test]
    fn cycling_visits_every_online_slot(online in slots_strategy()) {
        let slots = to_slots(&online);
        let expected: Vec<usize> = online.iter().enumerate().filter(|(_, on)| **on).map(|(i, _)| i).collect();
        prop_assume!(!expected.is_empty());

        let mut current = expected[0];
        let mut visited = vec![current];
        for _ in 1..expected.len() {
            if let CycleDecision::Activate(i) = next_index(current, &slots) {
                current = i;
                visited.push(i);
            }
        }

        prop_assert_eq!(visited, expected);
    }
}
