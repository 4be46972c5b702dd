//! Axis-aligned rectangles in world space

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Rectangle spanning `(x1, y1)` to `(x2, y2)`; y grows downward
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
}

impl Rect {
    /// From top-left corner and size
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            x1: x,
            y1: y,
            x2: x + w,
            y2: y + h,
        }
    }

    pub fn from_center(center: Vec2, half: Vec2) -> Self {
        Self {
            x1: center.x - half.x,
            y1: center.y - half.y,
            x2: center.x + half.x,
            y2: center.y + half.y,
        }
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.x2 - self.x1
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.y2 - self.y1
    }

    /// Shrink by `margin` on every side. Over-insetting yields an inverted
    /// rectangle, which overlaps nothing.
    pub fn inset(&self, margin: f32) -> Self {
        Self {
            x1: self.x1 + margin,
            y1: self.y1 + margin,
            x2: self.x2 - margin,
            y2: self.y2 - margin,
        }
    }

    /// Strict overlap (touching edges do not count)
    #[inline]
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x1 < other.x2 && self.x2 > other.x1 && self.y1 < other.y2 && self.y2 > other.y1
    }

    /// Strict point containment
    #[inline]
    pub fn contains(&self, p: Vec2) -> bool {
        self.x1 < p.x && p.x < self.x2 && self.y1 < p.y && p.y < self.y2
    }

    /// Does `[left, right]` overlap the horizontal extent
    #[inline]
    pub fn spans_x(&self, left: f32, right: f32) -> bool {
        right > self.x1 && left < self.x2
    }

    /// Does `[top, bottom]` overlap the vertical extent
    #[inline]
    pub fn spans_y(&self, top: f32, bottom: f32) -> bool {
        !(bottom <= self.y1 || top >= self.y2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_touching_edges_do_not_overlap() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(10.0, 0.0, 10.0, 10.0);
        assert!(!a.overlaps(&b));
        assert!(a.overlaps(&Rect::new(9.0, 9.0, 5.0, 5.0)));
    }

    #[test]
    fn test_inverted_inset_overlaps_nothing() {
        let small = Rect::from_center(Vec2::new(50.0, 50.0), Vec2::new(10.0, 10.0)).inset(15.0);
        let big = Rect::new(0.0, 0.0, 100.0, 100.0);
        assert!(!small.overlaps(&big));
    }

    #[test]
    fn test_contains_is_strict() {
        let r = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(r.contains(Vec2::new(5.0, 5.0)));
        assert!(!r.contains(Vec2::new(0.0, 5.0)));
    }
}
