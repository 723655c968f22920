//! Coordinate and geometry types shared by the render thread and tile producers.
//!
//! Spaces:
//! - pixel space: physical pixels, origin top-left, +Y down
//! - global space: map units, +Y up, rotated by the current heading
//! - scene space: the ±2 unit box seen by the orthographic projection

mod color;
mod rect;
mod screen;
mod viewport;

pub use color::ColorRgba;
pub use glam::{Mat4, Vec2};
pub use rect::Rect;
pub use screen::{ScreenTransform, GLOBAL_EXTENT};
pub use viewport::Viewport;
