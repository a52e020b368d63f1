//! wgpu presentation of rendered canvas frames.

mod canvas_surface;
mod ctx;

pub use canvas_surface::CanvasSurface;
pub use ctx::{RenderCtx, RenderTarget};
