//! 2D geometry used by spatial queries
//!
//! Rectangles for hitboxes and area skills, trapezoids for directional attacks.

mod rect;
mod trapezoid;

pub use rect::Rect;
pub use trapezoid::Trapezoid;
