#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Synchronization bridge between the network feed and snapshot consumers.
//!
//! The bridge owns a single slot holding the most recent snapshot (or its
//! absence). It exposes the slot through two read surfaces: observers
//! registered with [`SnapshotBridge::subscribe`] are notified on every
//! applied change, while [`SnapshotBridge::latest`] reads the same slot
//! synchronously without notifying anyone. Both surfaces read one slot, so
//! they can never disagree about which snapshot is current.

mod score;

pub use score::{ScoreChange, ScoreWatcher};

use snake_arena_core::Snapshot;
use std::{
    cell::{Cell, RefCell},
    fmt,
    rc::{Rc, Weak},
};
use tracing::debug;

/// Decides what happens to a snapshot older than the one currently held.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StalePolicy {
    /// Snapshots with a lower `sequence` than the held one are refused.
    #[default]
    RejectOlder,
    /// Every snapshot replaces the held one regardless of its sequence.
    AlwaysOverwrite,
}

/// Result of handing a value to [`SnapshotBridge::publish`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PublishOutcome {
    /// The snapshot became current and observers were notified.
    Applied,
    /// The bridge now holds no data and observers were notified.
    Cleared,
    /// The snapshot was older than the held one and was discarded.
    RejectedStale {
        /// Sequence of the snapshot that stays current.
        held: u64,
        /// Sequence of the refused snapshot.
        offered: u64,
    },
}

type ObserverFn = dyn FnMut(Option<&Snapshot>);

struct ObserverEntry {
    id: u64,
    live: Rc<Cell<bool>>,
    callback: Rc<RefCell<ObserverFn>>,
}

#[derive(Default)]
struct Slot {
    current: Option<Rc<Snapshot>>,
    version: u64,
}

struct Shared {
    policy: StalePolicy,
    slot: RefCell<Slot>,
    observers: RefCell<Vec<ObserverEntry>>,
    next_observer: Cell<u64>,
    notifying: Cell<bool>,
    superseded: Cell<bool>,
}

/// Single-writer relay holding the latest authoritative snapshot.
///
/// Clones share the same slot and observer list.
#[derive(Clone)]
pub struct SnapshotBridge {
    shared: Rc<Shared>,
}

impl Default for SnapshotBridge {
    fn default() -> Self {
        Self::with_policy(StalePolicy::default())
    }
}

impl fmt::Debug for SnapshotBridge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let slot = self.shared.slot.borrow();
        f.debug_struct("SnapshotBridge")
            .field("policy", &self.shared.policy)
            .field("version", &slot.version)
            .field(
                "sequence",
                &slot.current.as_ref().map(|snapshot| snapshot.sequence),
            )
            .field("observers", &self.shared.observers.borrow().len())
            .finish()
    }
}

impl SnapshotBridge {
    /// Creates an empty bridge that refuses out-of-order snapshots.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty bridge using the provided stale-snapshot policy.
    #[must_use]
    pub fn with_policy(policy: StalePolicy) -> Self {
        Self {
            shared: Rc::new(Shared {
                policy,
                slot: RefCell::new(Slot::default()),
                observers: RefCell::new(Vec::new()),
                next_observer: Cell::new(0),
                notifying: Cell::new(false),
                superseded: Cell::new(false),
            }),
        }
    }

    /// Replaces the current value and notifies observers.
    ///
    /// `None` means "no data" (nothing received yet, or the connection was
    /// lost) and always applies. After an absence any sequence is accepted
    /// again, so a restarted source is not locked out.
    pub fn publish(&self, snapshot: Option<Snapshot>) -> PublishOutcome {
        let outcome = {
            let mut slot = self.shared.slot.borrow_mut();
            let outcome = match snapshot {
                None => {
                    slot.current = None;
                    PublishOutcome::Cleared
                }
                Some(snapshot) => {
                    if let Some(held) = self.stale_sequence(&slot, &snapshot) {
                        debug!(
                            held,
                            offered = snapshot.sequence,
                            "discarding out-of-order snapshot"
                        );
                        return PublishOutcome::RejectedStale {
                            held,
                            offered: snapshot.sequence,
                        };
                    }
                    slot.current = Some(Rc::new(snapshot));
                    PublishOutcome::Applied
                }
            };
            slot.version = slot.version.wrapping_add(1);
            outcome
        };

        self.notify();
        outcome
    }

    fn stale_sequence(&self, slot: &Slot, offered: &Snapshot) -> Option<u64> {
        match (self.shared.policy, slot.current.as_ref()) {
            (StalePolicy::RejectOlder, Some(held)) if offered.sequence < held.sequence => {
                Some(held.sequence)
            }
            _ => None,
        }
    }

    /// Current snapshot, read without notifying observers.
    #[must_use]
    pub fn latest(&self) -> Option<Rc<Snapshot>> {
        self.shared.slot.borrow().current.clone()
    }

    /// Counter bumped on every applied change, including clears.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.shared.slot.borrow().version
    }

    /// Registers an observer called with the new value after every applied change.
    ///
    /// The observer stays registered until the returned [`Subscription`] is dropped.
    #[must_use = "dropping the subscription immediately deregisters the observer"]
    pub fn subscribe<F>(&self, observer: F) -> Subscription
    where
        F: FnMut(Option<&Snapshot>) + 'static,
    {
        let id = self.shared.next_observer.get();
        self.shared.next_observer.set(id.wrapping_add(1));
        let live = Rc::new(Cell::new(true));

        let mut observers = self.shared.observers.borrow_mut();
        observers.retain(|entry| entry.live.get());
        observers.push(ObserverEntry {
            id,
            live: Rc::clone(&live),
            callback: Rc::new(RefCell::new(observer)),
        });

        Subscription {
            id,
            live,
            shared: Rc::downgrade(&self.shared),
        }
    }

    /// Number of registered observers.
    #[must_use]
    pub fn observer_count(&self) -> usize {
        self.shared
            .observers
            .borrow()
            .iter()
            .filter(|entry| entry.live.get())
            .count()
    }

    /// Delivers the held value to every live observer.
    ///
    /// A publish made by an observer does not notify recursively. It marks the
    /// running round as superseded, and the round restarts with the newer
    /// value so no observer is left holding an older one than `latest()`.
    fn notify(&self) {
        if self.shared.notifying.replace(true) {
            self.shared.superseded.set(true);
            return;
        }

        loop {
            self.shared.superseded.set(false);
            let current = self.latest();
            let targets: Vec<_> = self
                .shared
                .observers
                .borrow()
                .iter()
                .map(|entry| (Rc::clone(&entry.live), Rc::clone(&entry.callback)))
                .collect();

            for (live, callback) in targets {
                if self.shared.superseded.get() {
                    break;
                }
                if !live.get() {
                    continue;
                }
                if let Ok(mut callback) = callback.try_borrow_mut() {
                    (&mut *callback)(current.as_deref());
                }
            }

            if !self.shared.superseded.get() {
                break;
            }
        }

        self.shared.notifying.set(false);
    }
}

/// Registration of an observer on a [`SnapshotBridge`].
///
/// Dropping it deregisters the observer; it is not called again, even from a
/// notification already in progress.
pub struct Subscription {
    id: u64,
    live: Rc<Cell<bool>>,
    shared: Weak<Shared>,
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("live", &self.live.get())
            .finish()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.live.set(false);
        if let Some(shared) = self.shared.upgrade() {
            if let Ok(mut observers) = shared.observers.try_borrow_mut() {
                observers.retain(|entry| entry.id != self.id);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use snake_arena_core::GridSize;

    fn snapshot(sequence: u64) -> Snapshot {
        let mut snapshot = Snapshot::empty(GridSize::new(10, 10));
        snapshot.sequence = sequence;
        snapshot.timestamp = sequence * 100;
        snapshot
    }

    #[test]
    fn starts_without_data() {
        let bridge = SnapshotBridge::new();

        assert!(bridge.latest().is_none());
        assert_eq!(bridge.version(), 0);
    }

    #[test]
    fn reject_older_keeps_newer_snapshot() {
        let bridge = SnapshotBridge::new();

        assert_eq!(bridge.publish(Some(snapshot(5))), PublishOutcome::Applied);
        assert_eq!(
            bridge.publish(Some(snapshot(4))),
            PublishOutcome::RejectedStale {
                held: 5,
                offered: 4
            }
        );
        assert_eq!(bridge.latest().map(|s| s.sequence), Some(5));
        assert_eq!(bridge.version(), 1);
    }

    #[test]
    fn equal_sequence_is_not_stale() {
        let bridge = SnapshotBridge::new();
        let _ = bridge.publish(Some(snapshot(5)));

        assert_eq!(bridge.publish(Some(snapshot(5))), PublishOutcome::Applied);
    }

    #[test]
    fn always_overwrite_relays_older_snapshots() {
        let bridge = SnapshotBridge::with_policy(StalePolicy::AlwaysOverwrite);
        let _ = bridge.publish(Some(snapshot(5)));

        assert_eq!(bridge.publish(Some(snapshot(2))), PublishOutcome::Applied);
        assert_eq!(bridge.latest().map(|s| s.sequence), Some(2));
    }

    #[test]
    fn absence_resets_sequence_guard() {
        let bridge = SnapshotBridge::new();
        let _ = bridge.publish(Some(snapshot(9)));

        assert_eq!(bridge.publish(None), PublishOutcome::Cleared);
        assert_eq!(bridge.publish(Some(snapshot(1))), PublishOutcome::Applied);
    }

    #[test]
    fn clones_share_the_slot() {
        let bridge = SnapshotBridge::new();
        let reader = bridge.clone();
        let _ = bridge.publish(Some(snapshot(3)));

        assert_eq!(reader.latest().map(|s| s.sequence), Some(3));
    }
}
