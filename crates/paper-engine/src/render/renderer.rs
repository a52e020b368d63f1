use crate::canvas::{Canvas, DrawCall, Vertex};
use crate::config::RendererConfig;
use crate::coords::IntRect;
use crate::error::RenderError;
use crate::mesh::MeshAccumulator;
use crate::texture::{TextureId, TextureTable};

use super::{DisplaySurface, Material, RenderContext, UniformState};

/// Turns canvas frames into a mesh plus per-draw uniforms for a [`DisplaySurface`].
///
/// One `render` call is one frame: the accumulator is cleared, every draw call
/// updates the pending [`UniformState`] and appends its triangles, then the mesh is
/// built and handed to the surface together with the frame's [`Material`].
///
/// Frames are all-or-nothing. Any error aborts the frame before the surface is
/// touched.
#[derive(Debug)]
pub struct CanvasRenderer {
    config: RendererConfig,
    ctx: RenderContext,
    accumulator: MeshAccumulator,
    frame_index: u64,
}

impl CanvasRenderer {
    pub fn new(config: RendererConfig) -> Result<Self, RenderError> {
        let ctx = RenderContext::new(config.max_texture_dimension)?;
        let accumulator = MeshAccumulator::with_capacity(config.initial_capacity, config.index_format);

        log::debug!(
            "canvas renderer created (capacity {}, {:?} indices, brush carry-over {:?})",
            config.initial_capacity,
            config.index_format,
            config.brush_carry_over,
        );

        Ok(Self {
            config,
            ctx,
            accumulator,
            frame_index: 0,
        })
    }

    #[inline]
    pub fn config(&self) -> &RendererConfig {
        &self.config
    }

    /// Texture bound by draw calls without a texture.
    #[inline]
    pub fn default_texture(&self) -> TextureId {
        self.ctx.default_texture()
    }

    #[inline]
    pub fn textures(&self) -> &TextureTable {
        self.ctx.textures()
    }

    /// Number of frames successfully handed to a surface.
    #[inline]
    pub fn frame_index(&self) -> u64 {
        self.frame_index
    }

    // ── textures ──────────────────────────────────────────────────────────

    /// Allocates an RGBA8, nearest-sampled texture.
    pub fn create_texture(&mut self, width: u32, height: u32) -> Result<TextureId, RenderError> {
        self.ctx.textures_mut().create(width, height)
    }

    pub fn texture_size(&self, id: TextureId) -> Result<(u32, u32), RenderError> {
        self.ctx.textures().size_of(id)
    }

    /// Resizes `id` to `region`'s size and replaces its pixels with `bytes`.
    pub fn set_texture_data(
        &mut self,
        id: TextureId,
        region: IntRect,
        bytes: &[u8],
    ) -> Result<(), RenderError> {
        self.ctx.textures_mut().resize_and_upload(id, region, bytes)
    }

    // ── frames ────────────────────────────────────────────────────────────

    /// Renders the canvas with its own draw calls.
    pub fn render_canvas<S>(&mut self, canvas: &Canvas, surface: &mut S) -> Result<(), RenderError>
    where
        S: DisplaySurface + ?Sized,
    {
        self.render(canvas.vertices(), canvas.indices(), canvas.draw_calls(), surface)
    }

    /// Renders one frame.
    ///
    /// `draw_calls` consume `indices` back to back starting at 0; each index selects
    /// a vertex from `vertices`.
    pub fn render<S>(
        &mut self,
        vertices: &[Vertex],
        indices: &[u32],
        draw_calls: &[DrawCall],
        surface: &mut S,
    ) -> Result<(), RenderError>
    where
        S: DisplaySurface + ?Sized,
    {
        self.accumulator.clear();

        let default_texture = self.ctx.default_texture();
        let mut uniforms = UniformState::new(default_texture);
        let mut material = Material::default();
        let mut cursor = 0usize;

        for (call_index, call) in draw_calls.iter().enumerate() {
            if call.element_count % 3 != 0 {
                return Err(RenderError::MalformedDrawCall {
                    call: call_index,
                    count: call.element_count,
                });
            }

            let start = cursor;
            let end = start + call.element_count as usize;
            let Some(elements) = indices.get(start..end) else {
                return Err(RenderError::IndexRangeOutOfBounds {
                    call: call_index,
                    start,
                    end,
                    available: indices.len(),
                });
            };

            if let Some(id) = call.texture {
                self.ctx.textures().get(id)?;
            }

            uniforms.apply(call, default_texture, self.config.brush_carry_over);

            let first = self.accumulator.vertex_count() as u32;
            for (offset, tri) in elements.chunks_exact(3).enumerate() {
                let at = start + offset * 3;
                let a = resolve(vertices, tri[0], at)?;
                let b = resolve(vertices, tri[1], at + 1)?;
                let c = resolve(vertices, tri[2], at + 2)?;
                self.accumulator.append(a, b, c);
            }
            let last = self.accumulator.vertex_count() as u32;

            material.push(first..last, uniforms);
            cursor = end;
        }

        let mesh = self.accumulator.build()?;

        log::trace!(
            "frame {}: {} draw calls -> {} triangles in {} batches",
            self.frame_index,
            draw_calls.len(),
            mesh.triangle_count(),
            material.batches().len(),
        );

        surface.set_mesh(mesh);
        surface.set_material(material);
        self.frame_index += 1;

        Ok(())
    }
}

fn resolve(vertices: &[Vertex], vertex: u32, index: usize) -> Result<Vertex, RenderError> {
    vertices
        .get(vertex as usize)
        .copied()
        .ok_or(RenderError::VertexOutOfBounds {
            index,
            vertex,
            available: vertices.len(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::Scissor;
    use crate::config::BrushCarryOver;
    use crate::coords::{Rect, Vec2, Vec3, Vec4};
    use crate::mesh::IndexFormat;
    use crate::paint::{Brush, BrushKind, Color32};
    use crate::render::RetainedSurface;

    fn renderer() -> CanvasRenderer {
        CanvasRenderer::new(RendererConfig::default()).unwrap()
    }

    fn v(x: f32, y: f32, color: Color32) -> Vertex {
        Vertex::new(Vec2::new(x, y), Vec2::new(x / 10.0, y / 10.0), color)
    }

    fn gradient() -> Brush {
        Brush::linear_gradient(Vec2::ZERO, Vec2::new(10.0, 0.0), Color32::RED, Color32::BLUE)
    }

    // ── textures ──────────────────────────────────────────────────────────

    #[test]
    fn created_texture_size_round_trips() {
        let mut r = renderer();
        let id = r.create_texture(4, 4).unwrap();
        assert_eq!(r.texture_size(id), Ok((4, 4)));
    }

    #[test]
    fn texture_from_another_renderer_is_rejected() {
        let mut a = renderer();
        let b = renderer();
        let id = a.create_texture(4, 4).unwrap();
        assert_eq!(b.texture_size(id), Err(RenderError::UnknownTexture(id)));
    }

    #[test]
    fn zero_sized_texture_is_rejected() {
        let mut r = renderer();
        assert!(matches!(
            r.create_texture(0, 4),
            Err(RenderError::InvalidTextureSize { width: 0, height: 4, .. })
        ));
    }

    #[test]
    fn texture_data_is_validated_and_resizes() {
        let mut r = renderer();
        let id = r.create_texture(1, 1).unwrap();

        assert!(matches!(
            r.set_texture_data(id, IntRect::from_size(2, 2), &[0; 12]),
            Err(RenderError::TextureDataLength { expected: 16, actual: 12, .. })
        ));

        r.set_texture_data(id, IntRect::from_size(2, 2), &[7; 16]).unwrap();
        assert_eq!(r.texture_size(id), Ok((2, 2)));
    }

    // ── frames ────────────────────────────────────────────────────────────

    #[test]
    fn single_untextured_call_binds_default_texture() {
        let mut r = renderer();
        let mut surface = RetainedSurface::new();
        let vertices = [
            v(0.0, 0.0, Color32::WHITE),
            v(1.0, 0.0, Color32::WHITE),
            v(0.0, 1.0, Color32::WHITE),
        ];

        r.render(&vertices, &[0, 1, 2], &[DrawCall::new(3)], &mut surface)
            .unwrap();

        let mesh = surface.mesh().unwrap();
        assert_eq!(mesh.triangle_count(), 1);
        assert_eq!(mesh.indices, vec![0, 1, 2]);

        let material = surface.material().unwrap();
        assert_eq!(material.batches().len(), 1);
        assert_eq!(material.batches()[0].uniforms.main_texture, r.default_texture());
        assert_eq!(material.current().unwrap().brush_type, BrushKind::None);
    }

    #[test]
    fn shared_canvas_vertices_are_expanded_per_triangle() {
        let mut r = renderer();
        let mut surface = RetainedSurface::new();
        let mut canvas = Canvas::new();
        canvas.fill_rect(Rect::new(0.0, 0.0, 10.0, 10.0), Color32::BLUE);

        r.render_canvas(&canvas, &mut surface).unwrap();

        let mesh = surface.mesh().unwrap();
        assert_eq!(canvas.vertices().len(), 4);
        assert_eq!(mesh.vertex_count(), 6);
        assert_eq!(mesh.indices, (0..6).collect::<Vec<u32>>());
        // Second triangle is (0, 2, 3) in canvas terms.
        assert_eq!(mesh.positions[3], Vec3::new(0.0, 0.0, 0.0));
        assert_eq!(mesh.positions[4], Vec3::new(10.0, 10.0, 0.0));
        assert_eq!(mesh.positions[5], Vec3::new(0.0, 10.0, 0.0));
        assert!(mesh.colors.iter().all(|&c| c == Color32::BLUE));
    }

    #[test]
    fn brushless_call_carries_previous_brush_uniforms() {
        let mut r = renderer();
        let mut surface = RetainedSurface::new();
        let vertices: Vec<Vertex> = (0..6).map(|i| v(i as f32, 0.0, Color32::WHITE)).collect();
        let calls = [DrawCall::new(3).with_brush(gradient()), DrawCall::new(3)];

        r.render(&vertices, &[0, 1, 2, 3, 4, 5], &calls, &mut surface)
            .unwrap();

        let batches = surface.material().unwrap().batches();
        assert_eq!(batches.len(), 2);
        let (first, second) = (&batches[0].uniforms, &batches[1].uniforms);

        assert_eq!(first.brush_type, BrushKind::LinearGradient);
        assert_eq!(second.brush_type, BrushKind::None);
        assert_eq!(second.brush_matrix, first.brush_matrix);
        assert_eq!(second.brush_color1, first.brush_color1);
        assert_eq!(second.brush_color2, first.brush_color2);
        assert_eq!(second.brush_params, Vec4::new(0.0, 0.0, 10.0, 0.0));
        assert_eq!(second.brush_params2, first.brush_params2);

        assert_eq!(batches[0].indices, 0..3);
        assert_eq!(batches[1].indices, 3..6);
    }

    #[test]
    fn reset_policy_drops_stale_brush() {
        let config = RendererConfig {
            brush_carry_over: BrushCarryOver::Reset,
            ..RendererConfig::default()
        };
        let mut r = CanvasRenderer::new(config).unwrap();
        let mut surface = RetainedSurface::new();
        let vertices: Vec<Vertex> = (0..6).map(|i| v(i as f32, 0.0, Color32::WHITE)).collect();
        let calls = [DrawCall::new(3).with_brush(gradient()), DrawCall::new(3)];

        r.render(&vertices, &[0, 1, 2, 3, 4, 5], &calls, &mut surface)
            .unwrap();

        let second = &surface.material().unwrap().batches()[1].uniforms;
        assert_eq!(second.brush_params, Vec4::ZERO);
        assert_eq!(second.brush_color1, Vec4::ZERO);
    }

    #[test]
    fn brush_state_starts_fresh_each_frame() {
        let mut r = renderer();
        let mut surface = RetainedSurface::new();
        let vertices: Vec<Vertex> = (0..3).map(|i| v(i as f32, 0.0, Color32::WHITE)).collect();

        r.render(&vertices, &[0, 1, 2], &[DrawCall::new(3).with_brush(gradient())], &mut surface)
            .unwrap();
        r.render(&vertices, &[0, 1, 2], &[DrawCall::new(3)], &mut surface)
            .unwrap();

        let uniforms = &surface.material().unwrap().batches()[0].uniforms;
        assert_eq!(uniforms.brush_params, Vec4::ZERO);
        assert_eq!(r.frame_index(), 2);
    }

    #[test]
    fn textured_and_scissored_call_is_forwarded() {
        let mut r = renderer();
        let mut surface = RetainedSurface::new();
        let atlas = r.create_texture(8, 8).unwrap();
        let scissor = Scissor::from_rect(Rect::new(0.0, 0.0, 4.0, 2.0));

        let mut canvas = Canvas::new();
        canvas.set_texture(Some(atlas));
        canvas.set_scissor(Rect::new(0.0, 0.0, 4.0, 2.0));
        canvas.fill_rect(Rect::new(0.0, 0.0, 10.0, 10.0), Color32::WHITE);

        r.render_canvas(&canvas, &mut surface).unwrap();

        let uniforms = surface.material().unwrap().current().unwrap();
        assert_eq!(uniforms.main_texture, atlas);
        assert_eq!(uniforms.scissor_matrix, scissor.matrix.transpose());
        assert_eq!(uniforms.scissor_extents, Vec2::new(2.0, 1.0));
    }

    #[test]
    fn empty_frame_produces_empty_mesh() {
        let mut r = renderer();
        let mut surface = RetainedSurface::new();
        r.render(&[], &[], &[], &mut surface).unwrap();

        assert!(surface.mesh().unwrap().is_empty());
        assert!(surface.material().unwrap().is_empty());
        assert_eq!(surface.frames(), 1);
    }

    // ── failures ──────────────────────────────────────────────────────────

    #[test]
    fn failed_frame_leaves_previous_mesh() {
        let mut r = renderer();
        let mut surface = RetainedSurface::new();
        let vertices = [
            v(0.0, 0.0, Color32::WHITE),
            v(1.0, 0.0, Color32::WHITE),
            v(0.0, 1.0, Color32::WHITE),
        ];
        r.render(&vertices, &[0, 1, 2], &[DrawCall::new(3)], &mut surface)
            .unwrap();

        let err = r
            .render(&vertices, &[0, 1, 9], &[DrawCall::new(3)], &mut surface)
            .unwrap_err();

        assert_eq!(err, RenderError::VertexOutOfBounds { index: 2, vertex: 9, available: 3 });
        assert_eq!(surface.frames(), 1);
        assert_eq!(surface.mesh().unwrap().triangle_count(), 1);
    }

    #[test]
    fn draw_call_with_foreign_texture_fails_the_frame() {
        let mut other = renderer();
        let foreign = other.create_texture(2, 2).unwrap();

        let mut r = renderer();
        let mut surface = RetainedSurface::new();
        let vertices = [
            v(0.0, 0.0, Color32::WHITE),
            v(1.0, 0.0, Color32::WHITE),
            v(0.0, 1.0, Color32::WHITE),
        ];

        let err = r
            .render(
                &vertices,
                &[0, 1, 2],
                &[DrawCall::new(3).with_texture(foreign)],
                &mut surface,
            )
            .unwrap_err();

        assert_eq!(err, RenderError::UnknownTexture(foreign));
        assert_eq!(surface.frames(), 0);
        assert!(surface.mesh().is_none());
    }

    #[test]
    fn draw_call_past_index_buffer_is_rejected() {
        let mut r = renderer();
        let mut surface = RetainedSurface::new();
        let vertices = [v(0.0, 0.0, Color32::WHITE); 3];

        let err = r
            .render(&vertices, &[0, 1, 2], &[DrawCall::new(3), DrawCall::new(3)], &mut surface)
            .unwrap_err();

        assert_eq!(
            err,
            RenderError::IndexRangeOutOfBounds { call: 1, start: 3, end: 6, available: 3 }
        );
        assert!(surface.mesh().is_none());
    }

    #[test]
    fn element_count_must_be_whole_triangles() {
        let mut r = renderer();
        let mut surface = RetainedSurface::new();
        let vertices = [v(0.0, 0.0, Color32::WHITE); 4];

        let err = r
            .render(&vertices, &[0, 1, 2, 3], &[DrawCall::new(4)], &mut surface)
            .unwrap_err();
        assert_eq!(err, RenderError::MalformedDrawCall { call: 0, count: 4 });
    }

    #[test]
    fn oversized_frame_is_reported_not_built() {
        let config = RendererConfig {
            index_format: IndexFormat::U16,
            initial_capacity: 0,
            ..RendererConfig::default()
        };
        let mut r = CanvasRenderer::new(config).unwrap();
        let mut surface = RetainedSurface::new();

        let vertices = [v(0.0, 0.0, Color32::WHITE)];
        let triangles = 21_846u32;
        let indices = vec![0u32; triangles as usize * 3];

        let err = r
            .render(&vertices, &indices, &[DrawCall::new(triangles * 3)], &mut surface)
            .unwrap_err();
        assert!(matches!(err, RenderError::MeshTooLarge { vertices: 65_538, .. }));
        assert!(surface.mesh().is_none());
    }
}
