#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Gesture engine that turns raw key and touch events into directions.
//!
//! Hosts translate native events into [`KeyEvent`] and [`TouchEvent`] values
//! and deliver them through an [`InputSurface`]. A mounted [`GestureEngine`]
//! recognises at most one [`Direction`](snake_arena_core::Direction) per key
//! press or swipe and hands it to a callback, typically a
//! [`CommandDispatcher`] that forwards it to the simulation.

mod dispatch;
mod engine;
mod events;
mod recognizer;
mod surface;

pub use dispatch::{CommandDispatcher, DispatchOutcome};
pub use engine::GestureEngine;
pub use events::{EventTarget, Key, KeyEvent, TouchEvent, TouchPhase, TouchPoint};
pub use recognizer::{classify_swipe, GestureRecognizer, SWIPE_THRESHOLD};
pub use surface::{EventHub, InputListener, InputSurface, ListenerId};
