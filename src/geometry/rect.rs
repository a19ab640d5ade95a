//! Axis-aligned rectangles in world space
//!
//! Y grows downward, so `top` is the smaller coordinate.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle anchored at its top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge
    pub x: f32,
    /// Top edge
    pub y: f32,
    /// Width
    pub width: f32,
    /// Height
    pub height: f32,
}

impl Rect {
    /// Create a new rectangle from its top-left corner and size
    #[must_use]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Create a rectangle centered on `center`
    #[must_use]
    pub fn from_center(center: Vec2, width: f32, height: f32) -> Self {
        Self::new(center.x - width / 2.0, center.y - height / 2.0, width, height)
    }

    /// Create a rectangle from its four edges
    #[must_use]
    pub fn from_edges(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self::new(left, top, right - left, bottom - top)
    }

    /// Hitbox of a character standing with feet at `feet`.
    #[must_use]
    pub fn standing_at(feet: Vec2, width: f32, height: f32) -> Self {
        Self::new(feet.x - width / 2.0, feet.y - height, width, height)
    }

    #[must_use]
    #[inline]
    pub fn left(&self) -> f32 {
        self.x
    }

    #[must_use]
    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    #[must_use]
    #[inline]
    pub fn top(&self) -> f32 {
        self.y
    }

    #[must_use]
    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Center point
    #[must_use]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Point containment, left/top inclusive and right/bottom exclusive.
    #[must_use]
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.left()
            && point.x < self.right()
            && point.y >= self.top()
            && point.y < self.bottom()
    }

    /// Point containment with every edge inclusive.
    #[must_use]
    pub fn contains_inclusive(&self, point: Vec2) -> bool {
        point.x >= self.left()
            && point.x <= self.right()
            && point.y >= self.top()
            && point.y <= self.bottom()
    }

    /// Strict overlap test. Rectangles that only share an edge do not intersect.
    #[must_use]
    pub fn intersects(&self, other: &Rect) -> bool {
        other.left() < self.right()
            && self.left() < other.right()
            && other.top() < self.bottom()
            && self.top() < other.bottom()
    }
}
