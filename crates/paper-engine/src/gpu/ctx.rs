use crate::coords::Vec2;

/// What a GPU surface needs to record one frame's draws.
///
/// `viewport` is the canvas size in logical pixels; vertex positions are mapped
/// to clip space against it.
pub struct RenderCtx<'a> {
    pub device: &'a wgpu::Device,
    pub queue: &'a wgpu::Queue,
    pub surface_format: wgpu::TextureFormat,
    pub viewport: Vec2,
}

impl<'a> RenderCtx<'a> {
    pub fn new(
        device: &'a wgpu::Device,
        queue: &'a wgpu::Queue,
        surface_format: wgpu::TextureFormat,
        viewport: Vec2,
    ) -> Self {
        Self {
            device,
            queue,
            surface_format,
            viewport,
        }
    }

    /// Viewport with each side at least one unit, safe to divide by.
    #[inline]
    pub fn clamped_viewport(&self) -> Vec2 {
        self.viewport.max(Vec2::ONE)
    }
}

/// Encoder and color attachment the frame's passes are recorded into.
pub struct RenderTarget<'a> {
    pub encoder: &'a mut wgpu::CommandEncoder,
    pub color_view: &'a wgpu::TextureView,
}

impl<'a> RenderTarget<'a> {
    pub fn new(encoder: &'a mut wgpu::CommandEncoder, color_view: &'a wgpu::TextureView) -> Self {
        Self { encoder, color_view }
    }
}
