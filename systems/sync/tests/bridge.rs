use std::{cell::RefCell, rc::Rc};

use snake_arena_core::{decode_snapshot, GridSize, Snapshot};
use snake_arena_system_sync::{PublishOutcome, SnapshotBridge, StalePolicy};

fn snapshot(sequence: u64) -> Snapshot {
    let mut snapshot = Snapshot::empty(GridSize::new(10, 10));
    snapshot.sequence = sequence;
    snapshot.timestamp = sequence * 50;
    snapshot
}

fn recording_observer(bridge: &SnapshotBridge) -> (Rc<RefCell<Vec<Option<u64>>>>, impl Drop) {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    let subscription = bridge.subscribe(move |snapshot| {
        sink.borrow_mut().push(snapshot.map(|s| s.sequence));
    });
    (seen, subscription)
}

#[test]
fn reactive_and_reference_views_agree_after_every_update() {
    let bridge = SnapshotBridge::with_policy(StalePolicy::AlwaysOverwrite);
    let reader = bridge.clone();
    let observed = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&observed);
    let _subscription = bridge.subscribe(move |snapshot| {
        let reference = reader.latest();
        sink.borrow_mut().push((
            snapshot.map(|s| s.sequence),
            reference.as_ref().map(|s| s.sequence),
        ));
    });

    let updates = [
        Some(snapshot(1)),
        Some(snapshot(2)),
        None,
        Some(snapshot(7)),
        Some(snapshot(3)),
        None,
        None,
    ];
    for update in updates {
        let expected = update.as_ref().map(|s| s.sequence);
        let _ = bridge.publish(update);

        let (reactive, reference) = *observed.borrow().last().expect("observer notified");
        assert_eq!(reactive, reference);
        assert_eq!(reactive, expected);
        assert_eq!(bridge.latest().map(|s| s.sequence), expected);
    }
    assert_eq!(observed.borrow().len(), 7);
}

#[test]
fn absence_yields_empty_on_both_views() {
    let bridge = SnapshotBridge::new();
    let (seen, _subscription) = recording_observer(&bridge);

    let _ = bridge.publish(Some(snapshot(4)));
    assert_eq!(bridge.publish(None), PublishOutcome::Cleared);

    assert!(bridge.latest().is_none());
    assert_eq!(*seen.borrow(), vec![Some(4), None]);
}

#[test]
fn absence_is_distinct_from_an_empty_grid() {
    let bridge = SnapshotBridge::new();
    let empty_grid = decode_snapshot(
        r#"{"snakes":[],"food":[],"powerUps":[],"activePowerUps":[],
            "gridSize":{"width":4,"height":4},"timestamp":0,"sequence":0,
            "rngSeed":0,"playerCount":0,"powerUpCounter":0,"playerStats":{}}"#,
    )
    .expect("valid empty snapshot");

    let _ = bridge.publish(Some(empty_grid));
    let held = bridge.latest().expect("empty grid is still data");
    assert!(held.snakes.is_empty());

    let _ = bridge.publish(None);
    assert!(bridge.latest().is_none());
}

#[test]
fn stale_snapshots_do_not_reach_observers() {
    let bridge = SnapshotBridge::new();
    let (seen, _subscription) = recording_observer(&bridge);

    let _ = bridge.publish(Some(snapshot(10)));
    let outcome = bridge.publish(Some(snapshot(8)));
    let _ = bridge.publish(Some(snapshot(11)));

    assert!(matches!(outcome, PublishOutcome::RejectedStale { held: 10, offered: 8 }));
    assert_eq!(*seen.borrow(), vec![Some(10), Some(11)]);
}

#[test]
fn dropped_subscription_stops_receiving() {
    let bridge = SnapshotBridge::new();
    let (seen, subscription) = recording_observer(&bridge);
    let _ = bridge.publish(Some(snapshot(1)));

    drop(subscription);
    let _ = bridge.publish(Some(snapshot(2)));

    assert_eq!(*seen.borrow(), vec![Some(1)]);
    assert_eq!(bridge.observer_count(), 0);
}

#[test]
fn subscription_dropped_by_an_earlier_observer_is_not_called() {
    let bridge = SnapshotBridge::new();
    let victim_slot: Rc<RefCell<Option<snake_arena_system_sync::Subscription>>> =
        Rc::new(RefCell::new(None));
    let slot = Rc::clone(&victim_slot);
    let _killer = bridge.subscribe(move |_| {
        let _ = slot.borrow_mut().take();
    });
    let calls = Rc::new(RefCell::new(0));
    let counter = Rc::clone(&calls);
    *victim_slot.borrow_mut() = Some(bridge.subscribe(move |_| {
        *counter.borrow_mut() += 1;
    }));

    let _ = bridge.publish(Some(snapshot(1)));
    let _ = bridge.publish(Some(snapshot(2)));

    assert_eq!(*calls.borrow(), 0);
    assert_eq!(bridge.observer_count(), 1);
}

#[test]
fn publishing_from_an_observer_never_leaves_others_behind() {
    let bridge = SnapshotBridge::new();
    let relay = bridge.clone();
    let forwarded = Rc::new(RefCell::new(Vec::new()));
    let forwarder_log = Rc::clone(&forwarded);
    let _forwarder = bridge.subscribe(move |current| {
        let sequence = current.map(|s| s.sequence);
        forwarder_log.borrow_mut().push(sequence);
        if sequence == Some(1) {
            let _ = relay.publish(Some(snapshot(2)));
        }
    });
    let (seen, _subscription) = recording_observer(&bridge);

    let _ = bridge.publish(Some(snapshot(1)));

    assert_eq!(*forwarded.borrow(), vec![Some(1), Some(2)]);
    assert_eq!(*seen.borrow(), vec![Some(2)]);
    assert_eq!(
        seen.borrow().last().copied().flatten(),
        bridge.latest().map(|s| s.sequence)
    );
}
