//! Window-less backend that paces a fixed number of frames.

use anyhow::Result;
use snake_arena_rendering::{FrameControl, Presentation, RenderingBackend};
use snake_arena_system_frame_driver::FrameQueue;
use std::{rc::Rc, thread, time::Duration};
use tracing::info;

/// Runs `frames` frames, sleeping `interval` between them like a display would.
#[derive(Debug)]
pub(crate) struct HeadlessBackend {
    frames: u64,
    interval: Duration,
    queue: Rc<FrameQueue>,
}

impl HeadlessBackend {
    pub(crate) fn new(frames: u64, interval: Duration) -> Self {
        Self {
            frames,
            interval,
            queue: Rc::new(FrameQueue::new()),
        }
    }

    pub(crate) fn frame_scheduler(&self) -> Rc<FrameQueue> {
        Rc::clone(&self.queue)
    }
}

impl RenderingBackend for HeadlessBackend {
    fn run<F>(self, presentation: Presentation, mut on_frame: F) -> Result<()>
    where
        F: FnMut(Duration) -> FrameControl + 'static,
    {
        info!(
            title = %presentation.window_title,
            frames = self.frames,
            "running headless"
        );

        for frame in 0..self.frames {
            let elapsed = self.interval.saturating_mul(u32::try_from(frame).unwrap_or(u32::MAX));
            let control = on_frame(elapsed);
            let _ = self.queue.run_frame(elapsed);
            if control == FrameControl::Exit {
                break;
            }
            thread::sleep(self.interval);
        }

        info!(frames_run = self.queue.frames_run(), "headless run finished");
        Ok(())
    }
}
