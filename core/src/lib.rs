#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Snake Arena client.
//!
//! This crate defines the snapshot schema delivered by the remote simulation
//! and the command surface sent back to it. The simulation publishes whole
//! [`Snapshot`] values, the synchronization bridge relays them to the
//! renderer, and the gesture engine turns player intent into [`Direction`]
//! values that leave the client as [`InputCommand`] payloads through an
//! [`OutboundChannel`].

use std::{collections::BTreeMap, fmt, rc::Rc, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Integer grid coordinate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Point {
    /// Zero-based column of the cell.
    pub x: i32,
    /// Zero-based row of the cell.
    pub y: i32,
}

impl Point {
    /// Creates a new grid coordinate.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Cardinal facing of a snake and the only directional intent a player can express.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Direction {
    /// Toward decreasing screen rows.
    Up,
    /// Toward increasing screen rows.
    Down,
    /// Toward decreasing columns.
    Left,
    /// Toward increasing columns.
    Right,
}

impl Direction {
    /// All directions in a stable order.
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Outbound command that expresses this direction to the simulation.
    #[must_use]
    pub const fn unit_command(self) -> InputCommand {
        match self {
            Direction::Up => InputCommand::new(0, 1),
            Direction::Down => InputCommand::new(0, -1),
            Direction::Left => InputCommand::new(-1, 0),
            Direction::Right => InputCommand::new(1, 0),
        }
    }

    /// Canonical wire name of the direction.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Direction::Up => "UP",
            Direction::Down => "DOWN",
            Direction::Left => "LEFT",
            Direction::Right => "RIGHT",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when text does not name one of the four directions.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("`{input}` is not a direction (expected UP, DOWN, LEFT or RIGHT)")]
pub struct ParseDirectionError {
    input: String,
}

impl FromStr for Direction {
    type Err = ParseDirectionError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Direction::ALL
            .into_iter()
            .find(|direction| direction.as_str().eq_ignore_ascii_case(value))
            .ok_or_else(|| ParseDirectionError {
                input: value.to_owned(),
            })
    }
}

/// Kinds of power-up the simulation can place on the grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PowerUpType {
    /// Temporarily speeds up the collecting snake.
    Speed,
    /// Temporarily slows down the collecting snake.
    Slow,
    /// Temporarily protects the collecting snake from collisions.
    Invincibility,
    /// Temporarily doubles the points awarded to the collecting snake.
    DoubleScore,
    /// Any type this client does not know about yet.
    #[serde(other)]
    Unknown,
}

/// Snake controlled by a single player. Owned by the simulation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snake {
    /// Identifier of the owning player.
    pub id: String,
    /// Fill colour as a CSS-style hex string.
    pub color: String,
    /// Occupied cells, head first.
    pub body: Vec<Point>,
    /// Current facing.
    pub direction: Direction,
    /// Points accumulated by the snake.
    pub score: u32,
    /// Effects currently modifying the snake.
    #[serde(default)]
    pub active_power_ups: Vec<PowerUpType>,
}

impl Snake {
    /// Cell occupied by the head, if the body is not empty.
    #[must_use]
    pub fn head(&self) -> Option<Point> {
        self.body.first().copied()
    }
}

/// Food pellet placed on the grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Food {
    /// Cell containing the pellet.
    pub position: Point,
    /// Points awarded when eaten.
    pub value: u32,
}

/// Power-up pickup waiting on the grid.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PowerUp {
    /// Identifier allocated by the simulation.
    pub id: String,
    /// Effect granted on pickup.
    #[serde(rename = "type")]
    pub power_up_type: PowerUpType,
    /// Cell containing the pickup.
    pub position: Point,
    /// Absolute timestamp after which the pickup leaves the grid.
    pub expires_at: u64,
}

impl PowerUp {
    /// Reports whether the pickup has expired relative to a snapshot timestamp.
    ///
    /// Expiry is judged against the snapshot's own clock, never the local one.
    #[must_use]
    pub const fn is_expired_at(&self, timestamp: u64) -> bool {
        self.expires_at <= timestamp
    }
}

/// Effect currently applied to a player.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivePowerUp {
    /// Effect kind.
    #[serde(rename = "type")]
    pub power_up_type: PowerUpType,
    /// Player the effect applies to. The player may no longer have a live snake.
    pub player_id: String,
    /// Absolute timestamp at which the effect ends.
    pub expires_at: u64,
}

/// Per-player summary that survives the player's snake.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerStats {
    /// Player identifier.
    pub id: String,
    /// Display name, if the player chose one.
    #[serde(default)]
    pub name: Option<String>,
    /// Colour assigned to the player.
    pub color: String,
    /// Current score.
    pub score: u32,
    /// Number of deaths so far.
    pub deaths: u32,
    /// Whether the player is currently connected.
    pub is_connected: bool,
}

/// Dimensions of the play grid measured in cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridSize {
    /// Number of columns.
    pub width: u32,
    /// Number of rows.
    pub height: u32,
}

impl GridSize {
    /// Creates a new grid size.
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// One complete, self-consistent description of the world at an instant.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    /// Live snakes.
    pub snakes: Vec<Snake>,
    /// Food pellets on the grid.
    pub food: Vec<Food>,
    /// Power-up pickups on the grid.
    pub power_ups: Vec<PowerUp>,
    /// Effects currently applied to players.
    pub active_power_ups: Vec<ActivePowerUp>,
    /// Grid dimensions, constant for a session.
    pub grid_size: GridSize,
    /// Simulation clock at which the snapshot was taken.
    pub timestamp: u64,
    /// Monotonic counter assigned by the source.
    pub sequence: u64,
    /// Seed of the simulation's random generator.
    pub rng_seed: u64,
    /// Number of players known to the simulation.
    pub player_count: u32,
    /// Number of power-ups spawned so far.
    pub power_up_counter: u64,
    /// Per-player summaries keyed by player identifier.
    #[serde(default)]
    pub player_stats: BTreeMap<String, PlayerStats>,
}

impl Snapshot {
    /// Creates a snapshot with no entities on a grid of the given size.
    #[must_use]
    pub fn empty(grid_size: GridSize) -> Self {
        Self {
            snakes: Vec::new(),
            food: Vec::new(),
            power_ups: Vec::new(),
            active_power_ups: Vec::new(),
            grid_size,
            timestamp: 0,
            sequence: 0,
            rng_seed: 0,
            player_count: 0,
            power_up_counter: 0,
            player_stats: BTreeMap::new(),
        }
    }

    /// Looks up the live snake owned by a player.
    #[must_use]
    pub fn snake(&self, player_id: &str) -> Option<&Snake> {
        self.snakes.iter().find(|snake| snake.id == player_id)
    }

    /// Effects applied to a player.
    ///
    /// A player without a live snake simply yields its effects; callers treat
    /// the missing snake as "nothing to draw".
    pub fn effects_for<'a>(
        &'a self,
        player_id: &'a str,
    ) -> impl Iterator<Item = &'a ActivePowerUp> + 'a {
        self.active_power_ups
            .iter()
            .filter(move |effect| effect.player_id == player_id)
    }

    /// Power-ups still on the grid at the snapshot's own timestamp.
    pub fn live_power_ups(&self) -> impl Iterator<Item = &PowerUp> {
        let timestamp = self.timestamp;
        self.power_ups
            .iter()
            .filter(move |power_up| !power_up.is_expired_at(timestamp))
    }
}

/// Error produced when a wire payload is not a valid snapshot.
#[derive(Debug, Error)]
pub enum SnapshotDecodeError {
    /// The payload was empty or only whitespace.
    #[error("snapshot payload is empty")]
    Empty,
    /// The payload was not a well-formed snapshot document.
    #[error("snapshot payload is malformed: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Decodes a single JSON snapshot.
pub fn decode_snapshot(payload: &str) -> Result<Snapshot, SnapshotDecodeError> {
    let trimmed = payload.trim();
    if trimmed.is_empty() {
        return Err(SnapshotDecodeError::Empty);
    }
    Ok(serde_json::from_str(trimmed)?)
}

/// Movement request sent to the simulation. Exactly one axis is non-zero.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InputCommand {
    /// Horizontal component, -1, 0 or 1.
    pub dx: i8,
    /// Vertical component, -1, 0 or 1.
    pub dy: i8,
}

impl InputCommand {
    const fn new(dx: i8, dy: i8) -> Self {
        Self { dx, dy }
    }
}

impl From<Direction> for InputCommand {
    fn from(direction: Direction) -> Self {
        direction.unit_command()
    }
}

/// Outbound transport toward the simulation.
///
/// The connection itself is managed elsewhere; the client only asks whether it
/// is usable and hands it commands.
pub trait OutboundChannel {
    /// Whether the channel currently accepts commands.
    fn is_connected(&self) -> bool;

    /// Sends a command. Only called while [`is_connected`](Self::is_connected) is true.
    fn send(&self, command: InputCommand);
}

impl<C: OutboundChannel + ?Sized> OutboundChannel for Rc<C> {
    fn is_connected(&self) -> bool {
        (**self).is_connected()
    }

    fn send(&self, command: InputCommand) {
        (**self).send(command);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SNAPSHOT_JSON: &str = r##"{
        "snakes": [{
            "id": "A",
            "color": "#f00",
            "body": [{"x": 2, "y": 2}, {"x": 1, "y": 2}],
            "direction": "RIGHT",
            "score": 3,
            "activePowerUps": ["SPEED"]
        }],
        "food": [{"position": {"x": 5, "y": 5}, "value": 1}],
        "powerUps": [
            {"id": "p1", "type": "DOUBLE_SCORE", "position": {"x": 7, "y": 1}, "expiresAt": 2000},
            {"id": "p2", "type": "TELEPORT", "position": {"x": 3, "y": 8}, "expiresAt": 900}
        ],
        "activePowerUps": [
            {"type": "SPEED", "playerId": "A", "expiresAt": 1500},
            {"type": "SLOW", "playerId": "gone", "expiresAt": 1500}
        ],
        "gridSize": {"width": 10, "height": 10},
        "timestamp": 1000,
        "sequence": 42,
        "rngSeed": 7,
        "playerCount": 2,
        "powerUpCounter": 2,
        "playerStats": {
            "A": {"id": "A", "name": "alice", "color": "#f00", "score": 3, "deaths": 0, "isConnected": true},
            "gone": {"id": "gone", "color": "#0f0", "score": 9, "deaths": 2, "isConnected": false}
        }
    }"##;

    #[test]
    fn decodes_camel_case_wire_snapshot() {
        let snapshot = decode_snapshot(SNAPSHOT_JSON).expect("valid snapshot");

        assert_eq!(snapshot.grid_size, GridSize::new(10, 10));
        assert_eq!(snapshot.sequence, 42);
        let snake = snapshot.snake("A").expect("snake A present");
        assert_eq!(snake.head(), Some(Point::new(2, 2)));
        assert_eq!(snake.direction, Direction::Right);
        assert_eq!(snake.active_power_ups, vec![PowerUpType::Speed]);
        assert_eq!(snapshot.player_stats["gone"].name, None);
        assert!(!snapshot.player_stats["gone"].is_connected);
    }

    #[test]
    fn unknown_power_up_type_decodes_as_unknown() {
        let snapshot = decode_snapshot(SNAPSHOT_JSON).expect("valid snapshot");

        assert_eq!(snapshot.power_ups[1].power_up_type, PowerUpType::Unknown);
    }

    #[test]
    fn expired_power_ups_are_judged_against_snapshot_clock() {
        let snapshot = decode_snapshot(SNAPSHOT_JSON).expect("valid snapshot");
        let live: Vec<_> = snapshot.live_power_ups().map(|p| p.id.as_str()).collect();

        assert_eq!(live, vec!["p1"]);
    }

    #[test]
    fn effects_for_player_without_snake_are_not_an_error() {
        let snapshot = decode_snapshot(SNAPSHOT_JSON).expect("valid snapshot");

        assert!(snapshot.snake("gone").is_none());
        assert_eq!(snapshot.effects_for("gone").count(), 1);
        assert_eq!(snapshot.effects_for("nobody").count(), 0);
    }

    #[test]
    fn malformed_and_empty_payloads_are_errors() {
        assert!(matches!(
            decode_snapshot("   "),
            Err(SnapshotDecodeError::Empty)
        ));
        assert!(matches!(
            decode_snapshot("{\"snakes\": 4}"),
            Err(SnapshotDecodeError::Malformed(_))
        ));
    }

    #[test]
    fn direction_commands_follow_wire_mapping() {
        assert_eq!(Direction::Up.unit_command(), InputCommand { dx: 0, dy: 1 });
        assert_eq!(Direction::Down.unit_command(), InputCommand { dx: 0, dy: -1 });
        assert_eq!(Direction::Left.unit_command(), InputCommand { dx: -1, dy: 0 });
        assert_eq!(Direction::Right.unit_command(), InputCommand { dx: 1, dy: 0 });

        for direction in Direction::ALL {
            let command = InputCommand::from(direction);
            assert_eq!(command.dx.abs() + command.dy.abs(), 1);
        }
    }

    #[test]
    fn invalid_text_never_produces_a_direction() {
        assert_eq!("up".parse::<Direction>(), Ok(Direction::Up));
        assert_eq!("RIGHT".parse::<Direction>(), Ok(Direction::Right));
        assert!("UP_LEFT".parse::<Direction>().is_err());
        assert!("".parse::<Direction>().is_err());
        assert!("north".parse::<Direction>().is_err());
    }

    #[test]
    fn command_serialises_as_dx_dy_object() {
        let json = serde_json::to_string(&Direction::Left.unit_command()).expect("serialise");

        assert_eq!(json, r#"{"dx":-1,"dy":0}"#);
    }
}
