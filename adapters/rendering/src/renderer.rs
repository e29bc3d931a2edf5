//! Full-frame snapshot renderer.

use crate::{Color, DrawSurface};
use glam::Vec2;
use snake_arena_core::{Direction, Food, GridSize, Point, PowerUp, PowerUpType, Snake, Snapshot};
use std::f32::consts::{FRAC_PI_2, PI};

/// Side length of one grid cell in surface pixels.
pub const CELL_SIZE: f32 = 20.0;

const STAR_POINTS: usize = 5;
const EFFECT_LIGHTEN: f32 = 0.35;

/// Fixed colors used by [`render_snapshot`].
#[derive(Clone, Copy, Debug)]
pub struct Palette;

impl Palette {
    /// Surface background.
    pub const BACKGROUND: Color = Color::from_rgb_u8(0x1a, 0x1a, 0x2e);
    /// Grid lines between cells.
    pub const GRID: Color = Color::from_rgb_u8(0x2a, 0x2a, 0x4e);
    /// Food body.
    pub const FOOD: Color = Color::from_rgb_u8(0xff, 0x6b, 0x6b);
    /// Highlight accent drawn on top of food.
    pub const FOOD_HIGHLIGHT: Color = Color::new(1.0, 1.0, 1.0, 0.45);
    /// Outline of the local player's snake.
    pub const LOCAL_OUTLINE: Color = Color::from_rgb_u8(0xff, 0xff, 0xff);
    /// Outline of every other snake.
    pub const REMOTE_OUTLINE: Color = Color::from_rgb_u8(0x11, 0x11, 0x22);
    /// Snake fill used when the wire color cannot be parsed.
    pub const FALLBACK_SNAKE: Color = Color::from_rgb_u8(0x88, 0x88, 0x88);
    /// Eye white.
    pub const EYE: Color = Color::from_rgb_u8(0xff, 0xff, 0xff);
    /// Pupil.
    pub const PUPIL: Color = Color::from_rgb_u8(0x00, 0x00, 0x00);
    /// Outline of on-grid power-up stars.
    pub const POWER_UP_OUTLINE: Color = Color::from_rgb_u8(0xff, 0xff, 0xff);
    /// Star fill for power-up kinds without a dedicated color.
    pub const POWER_UP_DEFAULT: Color = Color::from_rgb_u8(0xcc, 0xcc, 0xcc);

    /// Star fill for a power-up kind.
    #[must_use]
    pub const fn power_up(kind: PowerUpType) -> Color {
        match kind {
            PowerUpType::Speed => Color::from_rgb_u8(0xff, 0xd7, 0x00),
            PowerUpType::Slow => Color::from_rgb_u8(0x4f, 0xc3, 0xf7),
            PowerUpType::Invincibility => Color::from_rgb_u8(0xba, 0x68, 0xc8),
            PowerUpType::DoubleScore => Color::from_rgb_u8(0x81, 0xc7, 0x84),
            PowerUpType::Unknown => Self::POWER_UP_DEFAULT,
        }
    }
}

/// Pixel dimensions of a surface holding `grid`.
#[must_use]
pub fn surface_size(grid: GridSize) -> Vec2 {
    Vec2::new(grid.width as f32 * CELL_SIZE, grid.height as f32 * CELL_SIZE)
}

/// Repaints the whole surface from `snapshot`.
///
/// Each call resizes the surface and redraws every layer from scratch, so
/// repeated calls with the same snapshot produce the same picture. The snake
/// owned by `local_player_id` gets a distinct outline, and its body is drawn
/// lighter while one of the player's effects is active.
pub fn render_snapshot<S>(surface: &mut S, snapshot: &Snapshot, local_player_id: &str)
where
    S: DrawSurface + ?Sized,
{
    let size = surface_size(snapshot.grid_size);
    surface.resize(size);
    surface.fill_rect(Vec2::ZERO, size, Palette::BACKGROUND);

    draw_grid(surface, snapshot.grid_size, size);

    for food in &snapshot.food {
        draw_food(surface, food);
    }

    for power_up in snapshot.live_power_ups() {
        draw_power_up(surface, power_up);
    }

    let local_has_effect = snapshot.effects_for(local_player_id).next().is_some();
    for snake in &snapshot.snakes {
        let is_local = snake.id == local_player_id;
        draw_snake(surface, snake, is_local, is_local && local_has_effect);
    }
}

fn cell_origin(point: Point) -> Vec2 {
    Vec2::new(point.x as f32 * CELL_SIZE, point.y as f32 * CELL_SIZE)
}

fn cell_center(point: Point) -> Vec2 {
    cell_origin(point) + Vec2::splat(CELL_SIZE / 2.0)
}

fn draw_grid<S: DrawSurface + ?Sized>(surface: &mut S, grid: GridSize, size: Vec2) {
    for column in 0..=grid.width {
        let x = column as f32 * CELL_SIZE;
        surface.line(Vec2::new(x, 0.0), Vec2::new(x, size.y), 1.0, Palette::GRID);
    }
    for row in 0..=grid.height {
        let y = row as f32 * CELL_SIZE;
        surface.line(Vec2::new(0.0, y), Vec2::new(size.x, y), 1.0, Palette::GRID);
    }
}

fn draw_food<S: DrawSurface + ?Sized>(surface: &mut S, food: &Food) {
    let center = cell_center(food.position);
    let radius = CELL_SIZE / 2.0 - 2.0;
    surface.fill_circle(center, radius, Palette::FOOD);

    let highlight = center - Vec2::splat(radius / 3.0);
    surface.fill_circle(highlight, radius / 3.0, Palette::FOOD_HIGHLIGHT);
}

fn draw_power_up<S: DrawSurface + ?Sized>(surface: &mut S, power_up: &PowerUp) {
    let outer = CELL_SIZE / 2.0 - 2.0;
    let star = star_points(cell_center(power_up.position), outer, outer * 0.5);

    surface.fill_polygon(&star, Palette::power_up(power_up.power_up_type));
    surface.stroke_polygon(&star, 1.0, Palette::POWER_UP_OUTLINE);
}

/// Vertices of a star alternating between outer and inner radius, first tip pointing up.
fn star_points(center: Vec2, outer: f32, inner: f32) -> [Vec2; STAR_POINTS * 2] {
    let step = PI / STAR_POINTS as f32;
    let mut points = [Vec2::ZERO; STAR_POINTS * 2];
    for (index, point) in points.iter_mut().enumerate() {
        let radius = if index % 2 == 0 { outer } else { inner };
        let angle = index as f32 * step - FRAC_PI_2;
        *point = center + Vec2::new(angle.cos(), angle.sin()) * radius;
    }
    points
}

fn draw_snake<S: DrawSurface + ?Sized>(
    surface: &mut S,
    snake: &Snake,
    is_local: bool,
    highlighted: bool,
) {
    let mut fill = Color::parse_hex(&snake.color).unwrap_or(Palette::FALLBACK_SNAKE);
    if highlighted {
        fill = fill.lighten(EFFECT_LIGHTEN);
    }
    let (outline, thickness) = if is_local {
        (Palette::LOCAL_OUTLINE, 2.0)
    } else {
        (Palette::REMOTE_OUTLINE, 1.0)
    };

    let inset = Vec2::splat(1.0);
    let extent = Vec2::splat(CELL_SIZE - 2.0);
    for segment in &snake.body {
        let origin = cell_origin(*segment) + inset;
        surface.fill_rect(origin, extent, fill);
        surface.stroke_rect(origin, extent, thickness, outline);
    }

    if let Some(head) = snake.head() {
        draw_eyes(surface, head, snake.direction);
    }
}

/// Eye centres as fractions of the cell, pushed toward the facing edge.
fn eye_offsets(direction: Direction) -> [Vec2; 2] {
    match direction {
        Direction::Up => [Vec2::new(0.3, 0.25), Vec2::new(0.7, 0.25)],
        Direction::Down => [Vec2::new(0.3, 0.75), Vec2::new(0.7, 0.75)],
        Direction::Left => [Vec2::new(0.25, 0.3), Vec2::new(0.25, 0.7)],
        Direction::Right => [Vec2::new(0.75, 0.3), Vec2::new(0.75, 0.7)],
    }
}

fn draw_eyes<S: DrawSurface + ?Sized>(surface: &mut S, head: Point, direction: Direction) {
    let origin = cell_origin(head);
    for offset in eye_offsets(direction) {
        let center = origin + offset * CELL_SIZE;
        surface.fill_circle(center, CELL_SIZE * 0.12, Palette::EYE);
        surface.fill_circle(center, CELL_SIZE * 0.06, Palette::PUPIL);
    }
}
