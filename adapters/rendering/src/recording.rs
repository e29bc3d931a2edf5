//! Draw surface that records commands instead of painting.

use crate::{Color, DrawSurface};
use glam::Vec2;

/// Single drawing call captured by [`RecordingSurface`].
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    /// [`DrawSurface::fill_rect`].
    FillRect {
        /// Top-left corner.
        origin: Vec2,
        /// Width and height.
        size: Vec2,
        /// Fill color.
        color: Color,
    },
    /// [`DrawSurface::stroke_rect`].
    StrokeRect {
        /// Top-left corner.
        origin: Vec2,
        /// Width and height.
        size: Vec2,
        /// Line thickness.
        thickness: f32,
        /// Stroke color.
        color: Color,
    },
    /// [`DrawSurface::line`].
    Line {
        /// Start point.
        from: Vec2,
        /// End point.
        to: Vec2,
        /// Line thickness.
        thickness: f32,
        /// Stroke color.
        color: Color,
    },
    /// [`DrawSurface::fill_circle`].
    FillCircle {
        /// Circle centre.
        center: Vec2,
        /// Circle radius.
        radius: f32,
        /// Fill color.
        color: Color,
    },
    /// [`DrawSurface::fill_polygon`].
    FillPolygon {
        /// Polygon vertices.
        points: Vec<Vec2>,
        /// Fill color.
        color: Color,
    },
    /// [`DrawSurface::stroke_polygon`].
    StrokePolygon {
        /// Polygon vertices.
        points: Vec<Vec2>,
        /// Line thickness.
        thickness: f32,
        /// Stroke color.
        color: Color,
    },
}

/// Surface that records the calls of the latest frame instead of rasterising.
///
/// A resize starts a new frame and discards the previous recording.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RecordingSurface {
    size: Vec2,
    frames: u64,
    commands: Vec<DrawCommand>,
}

impl RecordingSurface {
    /// Creates an empty recording.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Size set by the latest resize.
    #[must_use]
    pub fn size(&self) -> Vec2 {
        self.size
    }

    /// Number of frames started on this surface.
    #[must_use]
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Commands recorded since the latest resize.
    #[must_use]
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }
}

impl DrawSurface for RecordingSurface {
    fn resize(&mut self, size: Vec2) {
        self.size = size;
        self.frames += 1;
        self.commands.clear();
    }

    fn fill_rect(&mut self, origin: Vec2, size: Vec2, color: Color) {
        self.commands.push(DrawCommand::FillRect {
            origin,
            size,
            color,
        });
    }

    fn stroke_rect(&mut self, origin: Vec2, size: Vec2, thickness: f32, color: Color) {
        self.commands.push(DrawCommand::StrokeRect {
            origin,
            size,
            thickness,
            color,
        });
    }

    fn line(&mut self, from: Vec2, to: Vec2, thickness: f32, color: Color) {
        self.commands.push(DrawCommand::Line {
            from,
            to,
            thickness,
            color,
        });
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color) {
        self.commands.push(DrawCommand::FillCircle {
            center,
            radius,
            color,
        });
    }

    fn fill_polygon(&mut self, points: &[Vec2], color: Color) {
        self.commands.push(DrawCommand::FillPolygon {
            points: points.to_vec(),
            color,
        });
    }

    fn stroke_polygon(&mut self, points: &[Vec2], thickness: f32, color: Color) {
        self.commands.push(DrawCommand::StrokePolygon {
            points: points.to_vec(),
            thickness,
            color,
        });
    }
}
