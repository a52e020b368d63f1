//! Canvas frame → mesh + material translation.
//!
//! `CanvasRenderer` is the adapter. It owns a `RenderContext` (texture table and
//! default texture) and a `MeshAccumulator`, and publishes each finished frame to
//! a `DisplaySurface`. GPU-backed surfaces live in `gpu`.

mod ctx;
mod material;
mod renderer;
mod surface;
mod uniforms;

pub use ctx::RenderContext;
pub use material::{DrawBatch, Material};
pub use renderer::CanvasRenderer;
pub use surface::{DisplaySurface, RetainedSurface};
pub use uniforms::UniformState;
