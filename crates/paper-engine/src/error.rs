use thiserror::Error;

use crate::mesh::IndexFormat;
use crate::texture::TextureId;

/// Errors raised while turning a canvas frame into a mesh, or while managing textures.
///
/// All of these are recoverable: a failed frame is skipped and the surface keeps
/// showing whatever it was given last.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    #[error("texture {0:?} was not created by this renderer")]
    UnknownTexture(TextureId),

    #[error("invalid texture size {width}x{height} (each side must be in 1..={max})")]
    InvalidTextureSize { width: u32, height: u32, max: u32 },

    #[error("texture data is {actual} bytes, a {width}x{height} RGBA8 region needs {expected}")]
    TextureDataLength {
        width: u32,
        height: u32,
        expected: u64,
        actual: usize,
    },

    #[error("mesh has {vertices} vertices, {format:?} indices address at most {max}")]
    MeshTooLarge {
        vertices: usize,
        max: usize,
        format: IndexFormat,
    },

    #[error("draw call {call} has element count {count}, which is not a multiple of 3")]
    MalformedDrawCall { call: usize, count: u32 },

    #[error("draw call {call} reads indices {start}..{end} but the canvas has {available}")]
    IndexRangeOutOfBounds {
        call: usize,
        start: usize,
        end: usize,
        available: usize,
    },

    #[error("index {index} refers to vertex {vertex} but the canvas has {available} vertices")]
    VertexOutOfBounds {
        index: usize,
        vertex: u32,
        available: usize,
    },
}
