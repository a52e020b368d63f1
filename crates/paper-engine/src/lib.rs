//! Paper engine.
//!
//! Turns recorded canvas frames (vertices, indices, draw calls) into a
//! triangle mesh plus per-batch material state, and presents them with wgpu.
//!
//! The CPU side (`canvas`, `mesh`, `texture`, `render`) has no GPU dependency
//! and can be driven headless through [`render::RetainedSurface`].

pub mod canvas;
pub mod config;
pub mod coords;
pub mod error;
pub mod mesh;
pub mod paint;
pub mod render;
pub mod texture;

pub mod core;
pub mod device;
pub mod gpu;
pub mod logging;
pub mod window;

pub use config::{BrushCarryOver, RendererConfig};
pub use error::RenderError;
