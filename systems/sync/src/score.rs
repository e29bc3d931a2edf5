//! Score-delta detection driven by the bridge's synchronous read surface.

use crate::SnapshotBridge;
use snake_arena_core::Snapshot;
use tracing::info;

/// Change in the local player's score between two observed snapshots.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScoreChange {
    /// Score seen before the change.
    pub previous: u32,
    /// Score carried by the current snapshot.
    pub current: u32,
}

impl ScoreChange {
    /// Signed difference between the current and previous score.
    #[must_use]
    pub fn delta(&self) -> i64 {
        i64::from(self.current) - i64::from(self.previous)
    }
}

/// Polls a [`SnapshotBridge`] without subscribing and reports score changes
/// for one player.
#[derive(Clone, Debug)]
pub struct ScoreWatcher {
    player_id: String,
    last_score: Option<u32>,
    seen_version: u64,
}

impl ScoreWatcher {
    /// Creates a watcher for the provided player.
    #[must_use]
    pub fn new(player_id: impl Into<String>) -> Self {
        Self {
            player_id: player_id.into(),
            last_score: None,
            seen_version: 0,
        }
    }

    /// Last score observed for the player.
    #[must_use]
    pub fn last_score(&self) -> Option<u32> {
        self.last_score
    }

    /// Checks the bridge for a new value and returns the score change, if any.
    ///
    /// Absence leaves the remembered score untouched so a dropped connection
    /// does not register as a score loss.
    pub fn poll(&mut self, bridge: &SnapshotBridge) -> Option<ScoreChange> {
        let version = bridge.version();
        if version == self.seen_version {
            return None;
        }
        self.seen_version = version;

        let snapshot = bridge.latest()?;
        let current = score_of(&snapshot, &self.player_id)?;
        let previous = self.last_score.replace(current);

        match previous {
            Some(previous) if previous != current => {
                let change = ScoreChange { previous, current };
                info!(
                    player = %self.player_id,
                    previous,
                    current,
                    delta = change.delta(),
                    "score changed"
                );
                Some(change)
            }
            _ => None,
        }
    }
}

fn score_of(snapshot: &Snapshot, player_id: &str) -> Option<u32> {
    snapshot
        .player_stats
        .get(player_id)
        .map(|stats| stats.score)
        .or_else(|| snapshot.snake(player_id).map(|snake| snake.score))
}

#[cfg(test)]
mod tests {
    use super::*;
    use snake_arena_core::{Direction, GridSize, Point, Snake};

    fn snapshot_with_score(sequence: u64, score: u32) -> Snapshot {
        let mut snapshot = Snapshot::empty(GridSize::new(8, 8));
        snapshot.sequence = sequence;
        snapshot.snakes.push(Snake {
            id: "me".to_owned(),
            color: "#0f0".to_owned(),
            body: vec![Point::new(1, 1)],
            direction: Direction::Up,
            score,
            active_power_ups: Vec::new(),
        });
        snapshot
    }

    #[test]
    fn first_observation_is_a_baseline_not_a_change() {
        let bridge = SnapshotBridge::new();
        let mut watcher = ScoreWatcher::new("me");
        let _ = bridge.publish(Some(snapshot_with_score(1, 5)));

        assert_eq!(watcher.poll(&bridge), None);
        assert_eq!(watcher.last_score(), Some(5));
    }

    #[test]
    fn reports_delta_once_per_new_snapshot() {
        let bridge = SnapshotBridge::new();
        let mut watcher = ScoreWatcher::new("me");
        let _ = bridge.publish(Some(snapshot_with_score(1, 5)));
        let _ = watcher.poll(&bridge);
        let _ = bridge.publish(Some(snapshot_with_score(2, 8)));

        let change = watcher.poll(&bridge).expect("score changed");
        assert_eq!(change.delta(), 3);
        assert_eq!(watcher.poll(&bridge), None);
    }

    #[test]
    fn absence_keeps_last_score() {
        let bridge = SnapshotBridge::new();
        let mut watcher = ScoreWatcher::new("me");
        let _ = bridge.publish(Some(snapshot_with_score(1, 5)));
        let _ = watcher.poll(&bridge);
        let _ = bridge.publish(None);

        assert_eq!(watcher.poll(&bridge), None);
        assert_eq!(watcher.last_score(), Some(5));
    }
}
