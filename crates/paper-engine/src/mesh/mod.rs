//! Triangle accumulation and the mesh snapshot handed to display surfaces.

mod accumulator;
mod mesh;

pub use accumulator::MeshAccumulator;
pub use mesh::{IndexFormat, Mesh};
