//! Coordinate and geometry types shared by the canvas, the mesh and the GPU surface.
//!
//! Canonical CPU space:
//! - Logical pixels
//! - Origin top-left
//! - +X right, +Y down
//!
//! Vector and matrix math comes from `glam`; this module only adds the rectangle
//! types the canvas and texture APIs speak in.

mod int_rect;
mod rect;

pub use glam::{Mat4, Vec2, Vec3, Vec4};
pub use int_rect::IntRect;
pub use rect::Rect;
