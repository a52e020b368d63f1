//! Paint model shared by the canvas and the renderers.
//!
//! Scope:
//! - 8-bit vertex/brush colors
//! - brush descriptors (solid vertex color, linear/radial/box gradients)
//!
//! Brushes are evaluated on the GPU; nothing here does gradient math.

pub mod brush;
pub mod color;

pub use brush::{Brush, BrushKind};
pub use color::Color32;
