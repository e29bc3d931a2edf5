#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Snake Arena adapters.
//!
//! [`render_snapshot`] paints a whole [`Snapshot`](snake_arena_core::Snapshot)
//! onto any [`DrawSurface`]. Backends implement the surface for their own
//! graphics stack and drive frames through [`RenderingBackend`].

mod recording;
mod renderer;

pub use recording::{DrawCommand, RecordingSurface};
pub use renderer::{render_snapshot, surface_size, Palette, CELL_SIZE};

use anyhow::Result as AnyResult;
use glam::Vec2;
use std::{error::Error, fmt, time::Duration};

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }

    /// Parses a CSS-style hex color (`#rgb` or `#rrggbb`).
    pub fn parse_hex(value: &str) -> Result<Self, RenderingError> {
        let invalid = || RenderingError::InvalidColor {
            value: value.to_owned(),
        };
        let digits = value.trim().strip_prefix('#').ok_or_else(invalid)?;
        if !digits.bytes().all(|byte| byte.is_ascii_hexdigit()) {
            return Err(invalid());
        }

        let channel = |text: &str| u8::from_str_radix(text, 16).map_err(|_| invalid());
        match digits.len() {
            3 => {
                let short = |index: usize| channel(&digits[index..=index]).map(|v| v * 17);
                Ok(Self::from_rgb_u8(short(0)?, short(1)?, short(2)?))
            }
            6 => Ok(Self::from_rgb_u8(
                channel(&digits[0..2])?,
                channel(&digits[2..4])?,
                channel(&digits[4..6])?,
            )),
            _ => Err(invalid()),
        }
    }

    /// Returns a new color lightened towards white by the provided amount.
    #[must_use]
    pub fn lighten(self, amount: f32) -> Self {
        let amount = amount.clamp(0.0, 1.0);

        Self {
            red: lighten_channel(self.red, amount),
            green: lighten_channel(self.green, amount),
            blue: lighten_channel(self.blue, amount),
            alpha: self.alpha,
        }
    }
}

fn lighten_channel(channel: f32, amount: f32) -> f32 {
    channel + (1.0 - channel) * amount
}

/// 2D raster target the renderer paints onto.
///
/// Coordinates are surface pixels with the origin at the top-left corner and
/// y growing downward.
pub trait DrawSurface {
    /// Sets the logical size of the surface. Called at the start of every frame.
    fn resize(&mut self, size: Vec2);

    /// Fills an axis-aligned rectangle.
    fn fill_rect(&mut self, origin: Vec2, size: Vec2, color: Color);

    /// Outlines an axis-aligned rectangle.
    fn stroke_rect(&mut self, origin: Vec2, size: Vec2, thickness: f32, color: Color);

    /// Draws a straight line.
    fn line(&mut self, from: Vec2, to: Vec2, thickness: f32, color: Color);

    /// Fills a circle.
    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color);

    /// Fills a closed polygon that is star-shaped around its centroid.
    fn fill_polygon(&mut self, points: &[Vec2], color: Color);

    /// Outlines a closed polygon.
    fn stroke_polygon(&mut self, points: &[Vec2], thickness: f32, color: Color);
}

/// Instructs a backend whether to keep running after a frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameControl {
    /// Keep presenting frames.
    Continue,
    /// Close the backend after this frame.
    Exit,
}

/// Presentation descriptor consumed by rendering backends.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Title used by the created window.
    pub window_title: String,
    /// Solid color used to clear each frame.
    pub clear_color: Color,
}

impl Presentation {
    /// Constructs a new presentation descriptor.
    #[must_use]
    pub fn new<T>(window_title: T, clear_color: Color) -> Self
    where
        T: Into<String>,
    {
        Self {
            window_title: window_title.into(),
            clear_color,
        }
    }
}

/// Rendering backend that paces frames at the host's refresh rate.
pub trait RenderingBackend {
    /// Runs the rendering backend until it is requested to exit.
    ///
    /// `on_frame` is called once per display refresh with the time elapsed
    /// since the backend started. Painting happens from inside it, typically
    /// by pumping a frame queue.
    fn run<F>(self, presentation: Presentation, on_frame: F) -> AnyResult<()>
    where
        F: FnMut(Duration) -> FrameControl + 'static;
}

/// Errors that can occur when constructing rendering descriptors.
#[derive(Debug, PartialEq, Eq)]
pub enum RenderingError {
    /// A color string was not a `#rgb` or `#rrggbb` hex value.
    InvalidColor {
        /// Text that failed to parse.
        value: String,
    },
}

impl fmt::Display for RenderingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidColor { value } => {
                write!(f, "`{value}` is not a #rgb or #rrggbb color")
            }
        }
    }
}

impl Error for RenderingError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_hex_accepts_short_and_long_forms() {
        assert_eq!(
            Color::parse_hex("#f00").expect("short form"),
            Color::from_rgb_u8(255, 0, 0)
        );
        assert_eq!(
            Color::parse_hex("#1a2B3c").expect("long form"),
            Color::from_rgb_u8(0x1a, 0x2b, 0x3c)
        );
    }

    #[test]
    fn parse_hex_rejects_malformed_values_without_panicking() {
        for value in [
            "", "f00", "#ff00", "#gg0000", "red", "#ééé", "#+f+f+f", "#+ff", "#-1-1-1",
        ] {
            let error = Color::parse_hex(value).expect_err("malformed color must be rejected");
            assert!(matches!(error, RenderingError::InvalidColor { .. }));
        }
    }

    #[test]
    fn lighten_moves_channels_towards_white() {
        let color = Color::from_rgb_u8(0, 0, 0).lighten(0.5);

        assert!((color.red - 0.5).abs() <= f32::EPSILON);
        assert!((color.alpha - 1.0).abs() <= f32::EPSILON);
    }
}
