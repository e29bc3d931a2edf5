#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Frame driver that decouples repaint cadence from snapshot arrival.
//!
//! A [`FrameDriver`] asks a [`FrameScheduler`] for one callback per display
//! refresh and runs the current draw callback each time, for as long as it
//! is active. [`FrameQueue`] is the in-process scheduler hosts pump from
//! their own refresh loop.

mod driver;
mod scheduler;

pub use driver::FrameDriver;
pub use scheduler::{FrameCallback, FrameHandle, FrameQueue, FrameScheduler, FrameTime};
