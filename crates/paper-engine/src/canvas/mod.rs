//! Canvas-side input: the vertex/index buffers and draw calls a frame is made of.
//!
//! The canvas is produced upstream and is read-only to the renderer. `Canvas` is a
//! small recorder for building such frames directly (demos, tests, simple overlays).

mod draw_call;
mod recorder;
mod vertex;

pub use draw_call::{DrawCall, Scissor};
pub use recorder::Canvas;
pub use vertex::Vertex;
