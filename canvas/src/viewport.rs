#[cfg(test)]
#[path = "viewport_test.rs"]
mod viewport_test;

pub use frames::Point;

use crate::consts::{CANVAS_HEIGHT, CANVAS_WIDTH};

/// Rendered bounding box of the canvas element, in viewport (CSS) pixels.
///
/// Mirrors `getBoundingClientRect()`; the element may be scaled to any size
/// while the logical canvas stays 2048×1024.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ViewRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl ViewRect {
    #[must_use]
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self { left, top, width, height }
    }

    /// Convert a viewport point (e.g. `clientX`/`clientY`) to logical canvas
    /// coordinates, clamped to `[0, width] × [0, height]`.
    ///
    /// A collapsed element has no meaningful mapping and yields the origin.
    #[must_use]
    pub fn to_canvas(&self, client: Point) -> Point {
        if self.width <= 0.0 || self.height <= 0.0 {
            return Point::default();
        }
        let scale_x = CANVAS_WIDTH / self.width;
        let scale_y = CANVAS_HEIGHT / self.height;
        Point {
            x: ((client.x - self.left) * scale_x).clamp(0.0, CANVAS_WIDTH),
            y: ((client.y - self.top) * scale_y).clamp(0.0, CANVAS_HEIGHT),
        }
    }

    /// Convert a logical canvas point back to viewport coordinates.
    #[must_use]
    pub fn to_client(&self, canvas: Point) -> Point {
        Point {
            x: self.left + canvas.x * self.width / CANVAS_WIDTH,
            y: self.top + canvas.y * self.height / CANVAS_HEIGHT,
        }
    }
}
