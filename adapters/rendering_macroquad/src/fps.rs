//! Frame-rate sampling for the optional FPS log.

use std::{collections::VecDeque, time::Duration};

const TRAILING_WINDOW: Duration = Duration::from_secs(10);

#[derive(Debug, Default)]
pub(crate) struct FpsCounter {
    elapsed: Duration,
    frames: u32,
    frame_times: VecDeque<Duration>,
    window_duration: Duration,
    draw_accum: Duration,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct FpsMetrics {
    pub(crate) per_second: f32,
    pub(crate) trailing_ten_seconds: f32,
    pub(crate) avg_draw: Duration,
}

impl FpsCounter {
    /// Records a presented frame and returns averages once a second has elapsed.
    pub(crate) fn record_frame(&mut self, frame: Duration, draw: Duration) -> Option<FpsMetrics> {
        self.elapsed += frame;
        self.frames = self.frames.saturating_add(1);
        self.draw_accum += draw;

        self.frame_times.push_back(frame);
        self.window_duration += frame;
        while self.window_duration > TRAILING_WINDOW {
            let Some(removed) = self.frame_times.pop_front() else {
                break;
            };
            self.window_duration = self.window_duration.saturating_sub(removed);
        }

        if self.elapsed < Duration::from_secs(1) {
            return None;
        }

        let per_second = self.frames as f32 / self.elapsed.as_secs_f32();
        let window_seconds = self.window_duration.as_secs_f32();
        let trailing_ten_seconds = if window_seconds <= f32::EPSILON {
            per_second
        } else {
            self.frame_times.len() as f32 / window_seconds
        };
        let avg_draw = self.draw_accum / self.frames.max(1);

        self.elapsed = Duration::ZERO;
        self.frames = 0;
        self.draw_accum = Duration::ZERO;

        Some(FpsMetrics {
            per_second,
            trailing_ten_seconds,
            avg_draw,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reports_once_per_second() {
        let mut counter = FpsCounter::default();
        let frame = Duration::from_millis(250);

        for _ in 0..3 {
            assert!(counter
                .record_frame(frame, Duration::from_millis(2))
                .is_none());
        }
        let metrics = counter
            .record_frame(frame, Duration::from_millis(2))
            .expect("one second elapsed");

        assert!((metrics.per_second - 4.0).abs() < 1e-4);
        assert!((metrics.trailing_ten_seconds - 4.0).abs() < 1e-4);
        assert_eq!(metrics.avg_draw, Duration::from_millis(2));
        assert!(counter.record_frame(frame, Duration::ZERO).is_none());
    }
}
