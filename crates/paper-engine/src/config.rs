use crate::mesh::IndexFormat;

/// What happens to brush uniforms when a draw call has no brush.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub enum BrushCarryOver {
    /// Leave the brush slots untouched; they keep the previous call's values.
    ///
    /// The shader branches on the brush type, so stale values are never sampled.
    #[default]
    Retain,
    /// Reset the brush slots to their initial values.
    Reset,
}

/// Configuration for [`CanvasRenderer`](crate::render::CanvasRenderer).
#[derive(Debug, Clone)]
pub struct RendererConfig {
    /// Vertices reserved up front by the mesh accumulator.
    pub initial_capacity: usize,

    /// Index width of built meshes. Bounds the number of vertices a frame may produce.
    pub index_format: IndexFormat,

    /// Largest accepted texture side, in pixels.
    ///
    /// Matches the wgpu default `max_texture_dimension_2d`.
    pub max_texture_dimension: u32,

    pub brush_carry_over: BrushCarryOver,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            initial_capacity: 1024,
            index_format: IndexFormat::U32,
            max_texture_dimension: 8192,
            brush_carry_over: BrushCarryOver::Retain,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_texture_limit_matches_wgpu_default_limits() {
        assert_eq!(
            RendererConfig::default().max_texture_dimension,
            wgpu::Limits::default().max_texture_dimension_2d
        );
    }
}
