//! Pixel-space primitives shared by the grid, collision and drag modules.

use serde::{Deserialize, Serialize};

/// Top-left anchor of a module in pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub top: f64,
    pub left: f64,
}

impl Position {
    pub const fn new(top: f64, left: f64) -> Self {
        Self { top, left }
    }
}

/// Total pointer displacement since a drag started.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Delta {
    pub dx: f64,
    pub dy: f64,
}

impl Delta {
    pub const fn new(dx: f64, dy: f64) -> Self {
        Self { dx, dy }
    }
}

/// Axis-aligned rectangle in pixel space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl PixelRect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Strict overlap on both axes; shared edges do not count.
    pub fn overlaps(&self, other: &PixelRect) -> bool {
        let x_overlap = self.x < other.right() && self.right() > other.x;
        let y_overlap = self.y < other.bottom() && self.bottom() > other.y;
        x_overlap && y_overlap
    }

    /// Half-open containment: the left/top edges are inside, right/bottom are not.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn touching_edges_do_not_overlap() {
        let a = PixelRect::new(0.0, 0.0, 10.0, 10.0);
        let b = PixelRect::new(10.0, 0.0, 10.0, 10.0);
        assert!(!a.overlaps(&b));
        assert!(!b.overlaps(&a));
    }

    #[test]
    fn contains_is_half_open() {
        let rect = PixelRect::new(5.0, 5.0, 10.0, 10.0);
        assert!(rect.contains(5.0, 5.0));
        assert!(rect.contains(14.9, 14.9));
        assert!(!rect.contains(15.0, 10.0));
        assert!(!rect.contains(10.0, 15.0));
    }
}
