//! winit event loop driving a single window.

mod runtime;

pub use runtime::{Runtime, RuntimeConfig};
