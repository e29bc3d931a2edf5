//! [`DrawSurface`] implementation over macroquad's immediate-mode shapes.

use crate::to_macroquad_color;
use glam::Vec2;
use macroquad::math::Vec2 as MacroquadVec2;
use macroquad::shapes::{
    draw_circle, draw_line, draw_rectangle, draw_rectangle_lines, draw_triangle,
};
use snake_arena_rendering::{Color, DrawSurface};

/// Maps logical surface pixels onto the window, letterboxed and centred.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct SurfaceMetrics {
    pub(crate) scale: f32,
    pub(crate) offset: Vec2,
}

impl SurfaceMetrics {
    pub(crate) fn fit(logical: Vec2, screen: Vec2) -> Self {
        let scale = if logical.x <= f32::EPSILON || logical.y <= f32::EPSILON {
            1.0
        } else {
            (screen.x / logical.x).min(screen.y / logical.y)
        };
        let offset = ((screen - logical * scale) * 0.5).max(Vec2::ZERO);

        Self { scale, offset }
    }

    pub(crate) fn point(&self, logical: Vec2) -> MacroquadVec2 {
        let mapped = self.offset + logical * self.scale;
        MacroquadVec2::new(mapped.x, mapped.y)
    }

    pub(crate) fn length(&self, logical: f32) -> f32 {
        logical * self.scale
    }
}

/// Drawing surface backed by the current macroquad window.
#[derive(Debug)]
pub struct MacroquadSurface {
    screen: Vec2,
    metrics: SurfaceMetrics,
}

impl MacroquadSurface {
    /// Acquires the window for drawing.
    ///
    /// Returns `None` while the window has no drawable area, in which case the
    /// caller skips rendering for the frame.
    #[must_use]
    pub fn acquire() -> Option<Self> {
        let screen = Vec2::new(
            macroquad::window::screen_width(),
            macroquad::window::screen_height(),
        );
        if screen.x < 1.0 || screen.y < 1.0 {
            return None;
        }

        Some(Self {
            screen,
            metrics: SurfaceMetrics::fit(screen, screen),
        })
    }
}

impl DrawSurface for MacroquadSurface {
    fn resize(&mut self, size: Vec2) {
        self.metrics = SurfaceMetrics::fit(size, self.screen);
    }

    fn fill_rect(&mut self, origin: Vec2, size: Vec2, color: Color) {
        let origin = self.metrics.point(origin);
        draw_rectangle(
            origin.x,
            origin.y,
            self.metrics.length(size.x),
            self.metrics.length(size.y),
            to_macroquad_color(color),
        );
    }

    fn stroke_rect(&mut self, origin: Vec2, size: Vec2, thickness: f32, color: Color) {
        let origin = self.metrics.point(origin);
        draw_rectangle_lines(
            origin.x,
            origin.y,
            self.metrics.length(size.x),
            self.metrics.length(size.y),
            self.metrics.length(thickness),
            to_macroquad_color(color),
        );
    }

    fn line(&mut self, from: Vec2, to: Vec2, thickness: f32, color: Color) {
        let from = self.metrics.point(from);
        let to = self.metrics.point(to);
        draw_line(
            from.x,
            from.y,
            to.x,
            to.y,
            self.metrics.length(thickness),
            to_macroquad_color(color),
        );
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color) {
        let center = self.metrics.point(center);
        draw_circle(
            center.x,
            center.y,
            self.metrics.length(radius),
            to_macroquad_color(color),
        );
    }

    fn fill_polygon(&mut self, points: &[Vec2], color: Color) {
        if points.len() < 3 {
            return;
        }

        // Fan from the centroid; valid for polygons star-shaped around it.
        let centroid = points.iter().copied().sum::<Vec2>() / points.len() as f32;
        let hub = self.metrics.point(centroid);
        let color = to_macroquad_color(color);
        for (index, point) in points.iter().enumerate() {
            let next = points[(index + 1) % points.len()];
            draw_triangle(hub, self.metrics.point(*point), self.metrics.point(next), color);
        }
    }

    fn stroke_polygon(&mut self, points: &[Vec2], thickness: f32, color: Color) {
        for (index, point) in points.iter().enumerate() {
            let next = points[(index + 1) % points.len()];
            self.line(*point, next, thickness, color);
        }
    }
}
