#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Macroquad-backed host for the Snake Arena client.
//!
//! Macroquad's optional audio stack depends on native ALSA development
//! libraries, which are unavailable in the containerised CI environment, so
//! the dependency is declared without default features.
//!
//! The backend owns the two host facilities the client core needs: a
//! [`FrameQueue`] pumped once per display refresh, and an [`EventHub`] fed
//! with keyboard, touch and mouse-pointer input polled from the window.
//! [`MacroquadSurface`] paints onto the window from inside a frame callback.

mod fps;
mod input;
mod surface;

pub use input::{translate_touches, RawPhase, RawTouch};
pub use surface::MacroquadSurface;

use self::{fps::FpsCounter, input::InputPoller};
use anyhow::Result;
use macroquad::input::{is_key_pressed, simulate_mouse_with_touch, KeyCode};
use snake_arena_rendering::{FrameControl, Presentation, RenderingBackend};
use snake_arena_system_frame_driver::FrameQueue;
use snake_arena_system_gesture::EventHub;
use std::{
    rc::Rc,
    time::{Duration, Instant},
};
use tracing::{debug, info};

/// Rendering backend implemented on top of macroquad.
#[derive(Debug)]
pub struct MacroquadBackend {
    swap_interval: Option<i32>,
    show_fps: bool,
    window_size: (i32, i32),
    input: Rc<EventHub>,
    frames: Rc<FrameQueue>,
}

impl Default for MacroquadBackend {
    fn default() -> Self {
        Self {
            swap_interval: None,
            show_fps: false,
            window_size: (800, 800),
            input: Rc::new(EventHub::new()),
            frames: Rc::new(FrameQueue::new()),
        }
    }
}

impl MacroquadBackend {
    /// Returns a backend that requests the platform's default swap interval.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the backend to request a specific swap interval from the platform.
    #[must_use]
    pub fn with_swap_interval(mut self, swap_interval: Option<i32>) -> Self {
        self.swap_interval = swap_interval;
        self
    }

    /// Configures the backend to either synchronise presentation with the display refresh rate
    /// or to present frames as fast as possible.
    #[must_use]
    pub fn with_vsync(self, enabled: bool) -> Self {
        let swap_interval = if enabled { Some(1) } else { Some(0) };
        self.with_swap_interval(swap_interval)
    }

    /// Configures whether the backend logs frame timing metrics once per second.
    #[must_use]
    pub fn with_show_fps(mut self, show: bool) -> Self {
        self.show_fps = show;
        self
    }

    /// Sets the initial window size in pixels.
    #[must_use]
    pub fn with_window_size(mut self, width: i32, height: i32) -> Self {
        self.window_size = (width.max(1), height.max(1));
        self
    }

    /// Input surface that receives the window's key and touch events.
    #[must_use]
    pub fn input_surface(&self) -> Rc<EventHub> {
        Rc::clone(&self.input)
    }

    /// Scheduler whose callbacks run once per presented frame.
    #[must_use]
    pub fn frame_scheduler(&self) -> Rc<FrameQueue> {
        Rc::clone(&self.frames)
    }
}

impl RenderingBackend for MacroquadBackend {
    fn run<F>(self, presentation: Presentation, mut on_frame: F) -> Result<()>
    where
        F: FnMut(Duration) -> FrameControl + 'static,
    {
        let Self {
            swap_interval,
            show_fps,
            window_size: (window_width, window_height),
            input,
            frames,
        } = self;

        let Presentation {
            window_title,
            clear_color,
        } = presentation;

        let mut config = macroquad::window::Conf {
            window_title,
            window_width,
            window_height,
            ..macroquad::window::Conf::default()
        };
        if let Some(swap_interval) = swap_interval {
            config.platform.swap_interval = Some(swap_interval);
        }
        debug!(?swap_interval, window_width, window_height, "opening window");

        macroquad::Window::from_config(config, async move {
            // Touches are translated explicitly; simulated mouse clicks would double them.
            simulate_mouse_with_touch(false);

            let background = to_macroquad_color(clear_color);
            let started = Instant::now();
            let mut previous = started;
            let mut poller = InputPoller::default();
            let mut fps_counter = FpsCounter::default();

            loop {
                if is_key_pressed(KeyCode::Escape) {
                    info!("escape pressed, closing window");
                    break;
                }

                poller.poll(&input);
                macroquad::window::clear_background(background);

                let now = Instant::now();
                let elapsed = now.duration_since(started);
                let control = on_frame(elapsed);

                let draw_started = Instant::now();
                let _ = frames.run_frame(elapsed);
                let draw = draw_started.elapsed();

                if show_fps {
                    if let Some(metrics) =
                        fps_counter.record_frame(now.duration_since(previous), draw)
                    {
                        info!(
                            fps = metrics.per_second,
                            trailing_fps = metrics.trailing_ten_seconds,
                            draw_ms = metrics.avg_draw.as_secs_f64() * 1_000.0,
                            "frame timing"
                        );
                    }
                }
                previous = now;

                if control == FrameControl::Exit {
                    break;
                }
                macroquad::window::next_frame().await;
            }
        });

        Ok(())
    }
}

pub(crate) fn to_macroquad_color(
    color: snake_arena_rendering::Color,
) -> macroquad::color::Color {
    macroquad::color::Color::new(color.red, color.green, color.blue, color.alpha)
}
