//! Canvas geometry

use serde::{Deserialize, Serialize};

/// A point on the canvas
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[inline]
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned rectangle `{x1, y1, x2, y2}` on the unbounded canvas
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CanvasPosition {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl CanvasPosition {
    /// Rectangle from its top-left corner and size
    #[inline]
    #[must_use]
    pub fn from_origin(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x1: x,
            y1: y,
            x2: x + width,
            y2: y + height,
        }
    }

    #[inline]
    #[must_use]
    pub fn width(&self) -> f64 {
        self.x2 - self.x1
    }

    #[inline]
    #[must_use]
    pub fn height(&self) -> f64 {
        self.y2 - self.y1
    }

    #[inline]
    #[must_use]
    pub fn center(&self) -> Point {
        Point::new((self.x1 + self.x2) / 2.0, (self.y1 + self.y2) / 2.0)
    }

    /// Same rectangle moved by `(dx, dy)`
    #[inline]
    #[must_use]
    pub fn translated(&self, dx: f64, dy: f64) -> Self {
        Self {
            x1: self.x1 + dx,
            y1: self.y1 + dy,
            x2: self.x2 + dx,
            y2: self.y2 + dy,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rectangle_dimensions() {
        let rect = CanvasPosition::from_origin(10.0, 20.0, 100.0, 50.0);
        assert_eq!(rect.width(), 100.0);
        assert_eq!(rect.height(), 50.0);
        assert_eq!(rect.center(), Point::new(60.0, 45.0));
    }

    #[test]
    fn translate_keeps_size() {
        let rect = CanvasPosition::from_origin(0.0, 0.0, 10.0, 10.0).translated(5.0, -5.0);
        assert_eq!(rect, CanvasPosition::from_origin(5.0, -5.0, 10.0, 10.0));
    }
}
