//! Trapezoid hit areas
//!
//! Directional skills sweep a trapezoid out from the caster: narrow at the
//! caster, wider (or narrower) at maximum range. The shape is symmetric about
//! a horizontal axis through the origin, shifted up by `height_offset`.

use std::fmt;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::Rect;

/// Horizontal trapezoid opening in the facing direction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Trapezoid {
    /// Start of the attack
    pub origin: Vec2,
    /// Full vertical extent at the origin
    pub near_width: f32,
    /// Full vertical extent at maximum range
    pub far_width: f32,
    /// Horizontal length
    pub range: f32,
    /// Vertical shift of the axis, positive is up
    pub height_offset: f32,
    /// Opens to the right when true, to the left otherwise
    pub facing_right: bool,
}

impl Trapezoid {
    /// Create a trapezoid with no height offset
    #[must_use]
    pub const fn new(
        origin: Vec2,
        near_width: f32,
        far_width: f32,
        range: f32,
        facing_right: bool,
    ) -> Self {
        Self {
            origin,
            near_width,
            far_width,
            range,
            height_offset: 0.0,
            facing_right,
        }
    }

    /// Set the vertical offset of the axis
    #[must_use]
    pub const fn with_height_offset(mut self, offset: f32) -> Self {
        self.height_offset = offset;
        self
    }

    /// Uniform-width trapezoid covering `rect`, opening in the facing direction.
    #[must_use]
    pub fn from_rect(rect: &Rect, facing_right: bool) -> Self {
        let origin_x = if facing_right { rect.left() } else { rect.right() };
        Self::new(
            Vec2::new(origin_x, rect.y + rect.height / 2.0),
            rect.height,
            rect.height,
            rect.width,
            facing_right,
        )
    }

    /// Cone that grows from `start_width` to `end_width`.
    #[must_use]
    pub const fn cone(
        origin: Vec2,
        start_width: f32,
        end_width: f32,
        range: f32,
        facing_right: bool,
    ) -> Self {
        Self::new(origin, start_width, end_width, range, facing_right)
    }

    #[inline]
    fn axis_y(&self) -> f32 {
        self.origin.y - self.height_offset
    }

    /// Whether `point` lies inside the trapezoid, edges included.
    #[must_use]
    pub fn contains_point(&self, point: Vec2) -> bool {
        let dx = if self.facing_right {
            point.x - self.origin.x
        } else {
            self.origin.x - point.x
        };
        if dx < 0.0 || dx > self.range {
            return false;
        }

        let t = if self.range > 0.0 { dx / self.range } else { 0.0 };
        let width = self.near_width + t * (self.far_width - self.near_width);
        (point.y - self.axis_y()).abs() <= width / 2.0
    }

    /// Approximate rectangle intersection.
    ///
    /// Rejects on bounding boxes, then samples the center, the four corners
    /// and the four edge midpoints of `rect`.
    #[must_use]
    pub fn intersects_rect(&self, rect: &Rect) -> bool {
        let bounds = self.bounding_rect();
        if rect.right() < bounds.left()
            || rect.left() > bounds.right()
            || rect.bottom() < bounds.top()
            || rect.top() > bounds.bottom()
        {
            return false;
        }

        let center = rect.center();
        let samples = [
            center,
            Vec2::new(rect.left(), rect.top()),
            Vec2::new(rect.right(), rect.top()),
            Vec2::new(rect.left(), rect.bottom()),
            Vec2::new(rect.right(), rect.bottom()),
            Vec2::new(center.x, rect.top()),
            Vec2::new(center.x, rect.bottom()),
            Vec2::new(rect.left(), center.y),
            Vec2::new(rect.right(), center.y),
        ];
        samples.into_iter().any(|p| self.contains_point(p))
    }

    /// Smallest axis-aligned rectangle enclosing the trapezoid
    #[must_use]
    pub fn bounding_rect(&self) -> Rect {
        let (min_x, max_x) = if self.facing_right {
            (self.origin.x, self.origin.x + self.range)
        } else {
            (self.origin.x - self.range, self.origin.x)
        };
        let half = self.near_width.max(self.far_width) / 2.0;
        let axis = self.axis_y();
        Rect::from_edges(min_x, axis - half, max_x, axis + half)
    }

    /// Corners as `(near_top, near_bottom, far_top, far_bottom)`
    #[must_use]
    pub fn corners(&self) -> (Vec2, Vec2, Vec2, Vec2) {
        let axis = self.axis_y();
        let far_x = if self.facing_right {
            self.origin.x + self.range
        } else {
            self.origin.x - self.range
        };
        (
            Vec2::new(self.origin.x, axis - self.near_width / 2.0),
            Vec2::new(self.origin.x, axis + self.near_width / 2.0),
            Vec2::new(far_x, axis - self.far_width / 2.0),
            Vec2::new(far_x, axis + self.far_width / 2.0),
        )
    }

    /// Scale widths, range and offset about the origin
    #[must_use]
    pub fn scaled(&self, factor: f32) -> Self {
        Self {
            near_width: self.near_width * factor,
            far_width: self.far_width * factor,
            range: self.range * factor,
            height_offset: self.height_offset * factor,
            ..*self
        }
    }

    /// Translate the origin
    #[must_use]
    pub fn offset(&self, delta: Vec2) -> Self {
        Self {
            origin: self.origin + delta,
            ..*self
        }
    }
}

impl fmt::Display for Trapezoid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Trapezoid(origin=({}, {}), near={}, far={}, range={}, facing={})",
            self.origin.x,
            self.origin.y,
            self.near_width,
            self.far_width,
            self.range,
            if self.facing_right { "R" } else { "L" }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_point_facing_right() {
        let trap = Trapezoid::new(Vec2::ZERO, 20.0, 100.0, 200.0, true);

        assert!(trap.contains_point(Vec2::new(0.0, 10.0)));
        assert!(!trap.contains_point(Vec2::new(0.0, 11.0)));
        // Width 60 at the midpoint
        assert!(trap.contains_point(Vec2::new(100.0, 30.0)));
        assert!(!trap.contains_point(Vec2::new(100.0, 31.0)));
        assert!(!trap.contains_point(Vec2::new(-1.0, 0.0)));
        assert!(!trap.contains_point(Vec2::new(201.0, 0.0)));
    }

    #[test]
    fn test_contains_point_facing_left() {
        let trap = Trapezoid::new(Vec2::new(100.0, 0.0), 50.0, 50.0, 80.0, false);

        assert!(trap.contains_point(Vec2::new(40.0, 0.0)));
        assert!(!trap.contains_point(Vec2::new(110.0, 0.0)));
    }

    #[test]
    fn test_height_offset_moves_axis_up() {
        let trap = Trapezoid::new(Vec2::ZERO, 20.0, 20.0, 100.0, true).with_height_offset(50.0);

        assert!(trap.contains_point(Vec2::new(10.0, -50.0)));
        assert!(!trap.contains_point(Vec2::new(10.0, 0.0)));
    }

    #[test]
    fn test_from_rect_covers_rect() {
        let rect = Rect::new(0.0, 0.0, 100.0, 40.0);
        let trap = Trapezoid::from_rect(&rect, false);

        assert_eq!(trap.origin, Vec2::new(100.0, 20.0));
        assert!(trap.contains_point(Vec2::new(50.0, 5.0)));
        assert_eq!(trap.bounding_rect(), rect);
    }

    #[test]
    fn test_intersects_rect() {
        let trap = Trapezoid::new(Vec2::ZERO, 20.0, 20.0, 100.0, true);

        assert!(trap.intersects_rect(&Rect::new(40.0, -5.0, 10.0, 10.0)));
        assert!(trap.intersects_rect(&Rect::new(90.0, 5.0, 30.0, 30.0)));
        assert!(!trap.intersects_rect(&Rect::new(-50.0, -5.0, 10.0, 10.0)));
        assert!(!trap.intersects_rect(&Rect::new(40.0, 50.0, 10.0, 10.0)));
    }

    #[test]
    fn test_corners_and_transforms() {
        let trap = Trapezoid::new(Vec2::new(10.0, 0.0), 10.0, 30.0, 50.0, true);
        let (near_top, near_bottom, far_top, far_bottom) = trap.corners();

        assert_eq!(near_top, Vec2::new(10.0, -5.0));
        assert_eq!(near_bottom, Vec2::new(10.0, 5.0));
        assert_eq!(far_top, Vec2::new(60.0, -15.0));
        assert_eq!(far_bottom, Vec2::new(60.0, 15.0));

        let big = trap.scaled(2.0).offset(Vec2::new(5.0, 0.0));
        assert_eq!(big.origin, Vec2::new(15.0, 0.0));
        assert_eq!(big.range, 100.0);
        assert_eq!(big.far_width, 60.0);
    }
}
