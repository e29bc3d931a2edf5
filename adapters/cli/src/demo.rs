//! Scripted local world used when no replay is given.
//!
//! It plays just enough of the game for the client to have something to show.
//! Snakes wander, eat, grow, collect power-ups and respawn after collisions.

use rand::{seq::SliceRandom, Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use snake_arena_core::{
    ActivePowerUp, Direction, Food, GridSize, PlayerStats, Point, PowerUp, PowerUpType, Snake,
    Snapshot,
};
use std::collections::BTreeMap;

const GRID: GridSize = GridSize::new(24, 24);
const TICK_MS: u64 = 100;
const FOOD_COUNT: usize = 3;
const START_LENGTH: usize = 3;
const TURN_ODDS: f64 = 0.15;
const POWER_UP_SPAWN_ODDS: f64 = 0.03;
const POWER_UP_LIFETIME_MS: u64 = 8_000;
const EFFECT_DURATION_MS: u64 = 5_000;
const BOT_ID: &str = "bot-1";
const SPAWNABLE_POWER_UPS: [PowerUpType; 4] = [
    PowerUpType::Speed,
    PowerUpType::Slow,
    PowerUpType::Invincibility,
    PowerUpType::DoubleScore,
];

#[derive(Debug)]
struct Player {
    snake: Snake,
    deaths: u32,
}

/// Deterministic world stepped once per emitted snapshot.
#[derive(Debug)]
pub(crate) struct DemoWorld {
    rng: ChaCha8Rng,
    seed: u64,
    players: Vec<Player>,
    food: Vec<Food>,
    power_ups: Vec<PowerUp>,
    effects: Vec<ActivePowerUp>,
    timestamp: u64,
    sequence: u64,
    power_up_counter: u64,
}

impl DemoWorld {
    pub(crate) fn new(seed: u64, local_player_id: &str) -> Self {
        let local = Snake {
            id: local_player_id.to_owned(),
            color: "#4caf50".to_owned(),
            body: straight_body(Point::new(5, 5), Direction::Right),
            direction: Direction::Right,
            score: 0,
            active_power_ups: Vec::new(),
        };
        let bot = Snake {
            id: BOT_ID.to_owned(),
            color: "#e91e63".to_owned(),
            body: straight_body(Point::new(18, 18), Direction::Left),
            direction: Direction::Left,
            score: 0,
            active_power_ups: Vec::new(),
        };

        let mut world = Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
            players: vec![
                Player {
                    snake: local,
                    deaths: 0,
                },
                Player {
                    snake: bot,
                    deaths: 0,
                },
            ],
            food: Vec::new(),
            power_ups: Vec::new(),
            effects: Vec::new(),
            timestamp: 0,
            sequence: 0,
            power_up_counter: 0,
        };
        while world.food.len() < FOOD_COUNT {
            let position = world.free_cell();
            world.food.push(Food { position, value: 1 });
        }
        world
    }

    /// Advances the world by one tick and returns the resulting snapshot.
    pub(crate) fn step(&mut self) -> Snapshot {
        self.timestamp += TICK_MS;
        self.sequence += 1;

        for index in 0..self.players.len() {
            self.advance_player(index);
        }

        let now = self.timestamp;
        self.power_ups.retain(|power_up| !power_up.is_expired_at(now));
        self.effects.retain(|effect| effect.expires_at > now);
        for player in &mut self.players {
            let id = &player.snake.id;
            player.snake.active_power_ups = self
                .effects
                .iter()
                .filter(|effect| &effect.player_id == id)
                .map(|effect| effect.power_up_type)
                .collect();
        }

        if self.rng.gen_bool(POWER_UP_SPAWN_ODDS) {
            self.spawn_power_up();
        }

        self.snapshot()
    }

    fn advance_player(&mut self, index: usize) {
        let direction = self.steer(index);
        let head = match self.players[index].snake.head() {
            Some(head) => head,
            None => return,
        };
        let next = wrap(neighbour(head, direction));

        let collided = self.players.iter().enumerate().any(|(other, player)| {
            let body = &player.snake.body;
            // A snake's own tail moves out of the way this tick.
            let solid = if other == index {
                &body[..body.len().saturating_sub(1)]
            } else {
                &body[..]
            };
            solid.contains(&next)
        });
        let invincible = self.has_effect(index, PowerUpType::Invincibility);
        if collided && !invincible {
            self.respawn(index);
            return;
        }

        let eaten = self.food.iter().position(|food| food.position == next);
        let snake = &mut self.players[index].snake;
        snake.direction = direction;
        snake.body.insert(0, next);

        match eaten {
            Some(food_index) => {
                let value = self.food[food_index].value;
                let multiplier = if self.has_effect(index, PowerUpType::DoubleScore) {
                    2
                } else {
                    1
                };
                self.players[index].snake.score += value * multiplier;
                let relocated = self.free_cell();
                self.food[food_index].position = relocated;
            }
            None => {
                let _ = self.players[index].snake.body.pop();
            }
        }

        let picked = self
            .power_ups
            .iter()
            .position(|power_up| power_up.position == next);
        if let Some(picked) = picked {
            let power_up = self.power_ups.remove(picked);
            self.effects.push(ActivePowerUp {
                power_up_type: power_up.power_up_type,
                player_id: self.players[index].snake.id.clone(),
                expires_at: self.timestamp + EFFECT_DURATION_MS,
            });
        }
    }

    fn has_effect(&self, index: usize, kind: PowerUpType) -> bool {
        let id = &self.players[index].snake.id;
        self.effects
            .iter()
            .any(|effect| &effect.player_id == id && effect.power_up_type == kind)
    }

    /// Occasionally turns left or right; never reverses into the neck.
    fn steer(&mut self, index: usize) -> Direction {
        let current = self.players[index].snake.direction;
        if !self.rng.gen_bool(TURN_ODDS) {
            return current;
        }
        let turns = perpendicular(current);
        turns.choose(&mut self.rng).copied().unwrap_or(current)
    }

    fn respawn(&mut self, index: usize) {
        let start = self.free_cell();
        let direction = Direction::ALL
            .choose(&mut self.rng)
            .copied()
            .unwrap_or(Direction::Right);
        let player = &mut self.players[index];
        player.deaths += 1;
        player.snake.body = straight_body(start, direction)
            .into_iter()
            .map(wrap)
            .collect();
        player.snake.direction = direction;
        player.snake.score = 0;
    }

    fn spawn_power_up(&mut self) {
        let position = self.free_cell();
        let power_up_type = SPAWNABLE_POWER_UPS
            .choose(&mut self.rng)
            .copied()
            .unwrap_or(PowerUpType::Speed);
        self.power_up_counter += 1;
        self.power_ups.push(PowerUp {
            id: format!("power-up-{}", self.power_up_counter),
            power_up_type,
            position,
            expires_at: self.timestamp + POWER_UP_LIFETIME_MS,
        });
    }

    /// Random cell not covered by a snake, food or power-up.
    ///
    /// Falls back to any random cell on a crowded grid.
    fn free_cell(&mut self) -> Point {
        let mut candidate = self.random_cell();
        for _ in 0..64 {
            if !self.is_occupied(candidate) {
                break;
            }
            candidate = self.random_cell();
        }
        candidate
    }

    fn random_cell(&mut self) -> Point {
        Point::new(
            self.rng.gen_range(0..GRID.width as i32),
            self.rng.gen_range(0..GRID.height as i32),
        )
    }

    fn is_occupied(&self, cell: Point) -> bool {
        self.players
            .iter()
            .any(|player| player.snake.body.contains(&cell))
            || self.food.iter().any(|food| food.position == cell)
            || self.power_ups.iter().any(|power_up| power_up.position == cell)
    }

    fn snapshot(&self) -> Snapshot {
        let player_stats: BTreeMap<String, PlayerStats> = self
            .players
            .iter()
            .map(|player| {
                let snake = &player.snake;
                let stats = PlayerStats {
                    id: snake.id.clone(),
                    name: None,
                    color: snake.color.clone(),
                    score: snake.score,
                    deaths: player.deaths,
                    is_connected: true,
                };
                (snake.id.clone(), stats)
            })
            .collect();

        Snapshot {
            snakes: self
                .players
                .iter()
                .map(|player| player.snake.clone())
                .collect(),
            food: self.food.clone(),
            power_ups: self.power_ups.clone(),
            active_power_ups: self.effects.clone(),
            grid_size: GRID,
            timestamp: self.timestamp,
            sequence: self.sequence,
            rng_seed: self.seed,
            player_count: self.players.len() as u32,
            power_up_counter: self.power_up_counter,
            player_stats,
        }
    }
}

/// Neighbouring cell in screen orientation: `Up` decreases the row.
fn neighbour(point: Point, direction: Direction) -> Point {
    match direction {
        Direction::Up => Point::new(point.x, point.y - 1),
        Direction::Down => Point::new(point.x, point.y + 1),
        Direction::Left => Point::new(point.x - 1, point.y),
        Direction::Right => Point::new(point.x + 1, point.y),
    }
}

fn wrap(point: Point) -> Point {
    Point::new(
        point.x.rem_euclid(GRID.width as i32),
        point.y.rem_euclid(GRID.height as i32),
    )
}

fn opposite(direction: Direction) -> Direction {
    match direction {
        Direction::Up => Direction::Down,
        Direction::Down => Direction::Up,
        Direction::Left => Direction::Right,
        Direction::Right => Direction::Left,
    }
}

fn perpendicular(direction: Direction) -> [Direction; 2] {
    match direction {
        Direction::Up | Direction::Down => [Direction::Left, Direction::Right],
        Direction::Left | Direction::Right => [Direction::Up, Direction::Down],
    }
}

/// Head at `head`, body trailing away from `direction`.
fn straight_body(head: Point, direction: Direction) -> Vec<Point> {
    let behind = opposite(direction);
    let mut body = Vec::with_capacity(START_LENGTH);
    let mut cell = head;
    for _ in 0..START_LENGTH {
        body.push(cell);
        cell = neighbour(cell, behind);
    }
    body
}
