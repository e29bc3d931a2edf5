//! Pure state machine turning raw events into directional intents.

use crate::events::{EventTarget, Key, KeyEvent, TouchEvent, TouchPhase};
use glam::Vec2;
use snake_arena_core::Direction;

/// Minimum swipe length, in surface units, for a touch to count as a gesture.
///
/// Swipes of exactly this length are still treated as noise.
pub const SWIPE_THRESHOLD: f32 = 30.0;

/// Recognises one direction per key press or swipe.
///
/// The recognizer tracks at most one contact. It keeps no queue: every call
/// yields at most one direction.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct GestureRecognizer {
    origin: Option<Vec2>,
}

impl GestureRecognizer {
    /// Creates a recognizer with no gesture in progress.
    #[must_use]
    pub const fn new() -> Self {
        Self { origin: None }
    }

    /// Whether a swipe is currently being tracked.
    #[must_use]
    pub const fn is_tracking(&self) -> bool {
        self.origin.is_some()
    }

    /// Handles a key press.
    ///
    /// Arrow keys suppress the host's default scrolling; the alternate
    /// `w`/`a`/`s`/`d` set leaves the default alone. Presses aimed at a text
    /// entry control are ignored entirely.
    pub fn on_key(&mut self, event: &mut KeyEvent) -> Option<Direction> {
        if event.target() == EventTarget::TextEntry {
            return None;
        }

        let (direction, arrow) = match event.key() {
            Key::ArrowUp => (Direction::Up, true),
            Key::ArrowDown => (Direction::Down, true),
            Key::ArrowLeft => (Direction::Left, true),
            Key::ArrowRight => (Direction::Right, true),
            Key::Character('w' | 'W') => (Direction::Up, false),
            Key::Character('s' | 'S') => (Direction::Down, false),
            Key::Character('a' | 'A') => (Direction::Left, false),
            Key::Character('d' | 'D') => (Direction::Right, false),
            Key::Character(_) | Key::Other => return None,
        };

        if arrow {
            event.prevent_default();
        }
        Some(direction)
    }

    /// Handles a touch event.
    pub fn on_touch(&mut self, event: &mut TouchEvent) -> Option<Direction> {
        match event.phase() {
            TouchPhase::Start => {
                self.origin = match event.touches() {
                    [only] => Some(only.position),
                    _ => None,
                };
                None
            }
            TouchPhase::Move => {
                if self.origin.is_some() {
                    event.prevent_default();
                }
                None
            }
            TouchPhase::End => {
                let origin = self.origin.take()?;
                let release = event.changed_touches().first()?.position;
                classify_swipe(origin, release)
            }
            TouchPhase::Cancel => {
                self.origin = None;
                None
            }
        }
    }
}

/// Buckets a swipe into one of four 90° sectors centred on the axes.
///
/// Right covers [-45°, 45°), Down [45°, 135°), Up [-135°, -45°) and Left the
/// remainder.
///
/// Returns `None` when the swipe is not longer than [`SWIPE_THRESHOLD`].
/// Angles follow screen coordinates, so a positive y displacement is `Down`.
#[must_use]
pub fn classify_swipe(origin: Vec2, release: Vec2) -> Option<Direction> {
    let delta = release - origin;
    if delta.length() <= SWIPE_THRESHOLD {
        return None;
    }

    // Sector edges compared exactly: 45° and -135° open their sectors, -45°
    // and 135° close them.
    let Vec2 { x: dx, y: dy } = delta;
    let direction = if dy < dx && dy >= -dx {
        Direction::Right
    } else if dy >= dx && dy > -dx {
        Direction::Down
    } else if dy <= dx && dy < -dx {
        Direction::Up
    } else {
        Direction::Left
    };
    Some(direction)
}
