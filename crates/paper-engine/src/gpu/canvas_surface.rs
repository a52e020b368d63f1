use std::collections::HashMap;

use bytemuck::{Pod, Zeroable};

use crate::mesh::{IndexFormat, Mesh};
use crate::render::{DisplaySurface, Material, UniformState};
use crate::texture::{TextureId, TextureTable};

use super::ctx::{RenderCtx, RenderTarget};

/// wgpu-backed display surface.
///
/// Holds the last mesh and material published by a `CanvasRenderer` and draws
/// them on demand, one indexed draw per batch. GPU resources are created lazily
/// on the first draw and rebuilt when the surface format changes.
///
/// Colors are drawn as authored (straight alpha, no color space conversion).
#[derive(Default)]
pub struct CanvasSurface {
    mesh: Option<Mesh>,
    material: Material,
    mesh_dirty: bool,

    pipeline_format: Option<wgpu::TextureFormat>,
    pipeline: Option<wgpu::RenderPipeline>,
    uniform_bgl: Option<wgpu::BindGroupLayout>,
    texture_bgl: Option<wgpu::BindGroupLayout>,
    sampler: Option<wgpu::Sampler>,

    uniform_ubo: Option<wgpu::Buffer>,
    uniform_bind_group: Option<wgpu::BindGroup>,
    uniform_capacity: usize,
    uniform_stride: u64,

    vertex_vbo: Option<wgpu::Buffer>,
    vertex_capacity: usize,
    index_ibo: Option<wgpu::Buffer>,
    index_capacity: u64,
    index_format: wgpu::IndexFormat,

    textures: HashMap<TextureId, GpuTexture>,
    warned_missing_texture: bool,
}

impl DisplaySurface for CanvasSurface {
    fn set_mesh(&mut self, mesh: Mesh) {
        self.mesh = Some(mesh);
        self.mesh_dirty = true;
    }

    fn set_material(&mut self, material: Material) {
        self.material = material;
    }
}

impl CanvasSurface {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn mesh(&self) -> Option<&Mesh> {
        self.mesh.as_ref()
    }

    #[inline]
    pub fn material(&self) -> &Material {
        &self.material
    }

    /// Draws the current mesh into `target`, loading (not clearing) its contents.
    ///
    /// `textures` must be the table of the renderer that produced the material.
    /// Batches whose texture is missing from it are skipped.
    pub fn draw(
        &mut self,
        ctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
        textures: &TextureTable,
    ) {
        let Some(mesh) = self.mesh.as_ref() else { return };
        if mesh.is_empty() || self.material.is_empty() {
            return;
        }

        self.ensure_pipeline(ctx);
        self.ensure_sampler(ctx);
        self.sync_textures(ctx, textures);
        if self.mesh_dirty {
            self.upload_mesh(ctx);
        }
        self.write_uniforms(ctx);

        let Some(pipeline) = self.pipeline.as_ref() else { return };
        let Some(uniform_bind_group) = self.uniform_bind_group.as_ref() else { return };
        let Some(vbo) = self.vertex_vbo.as_ref() else { return };
        let Some(ibo) = self.index_ibo.as_ref() else { return };

        let mut rpass = target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("paper canvas pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target.color_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        rpass.set_pipeline(pipeline);
        rpass.set_vertex_buffer(0, vbo.slice(..));
        rpass.set_index_buffer(ibo.slice(..), self.index_format);

        let mut skipped = 0usize;
        for (i, batch) in self.material.batches().iter().enumerate() {
            let Some(texture) = self.textures.get(&batch.uniforms.main_texture) else {
                skipped += 1;
                continue;
            };
            let offset = i as u64 * self.uniform_stride;
            rpass.set_bind_group(0, uniform_bind_group, &[offset as u32]);
            rpass.set_bind_group(1, &texture.bind_group, &[]);
            rpass.draw_indexed(batch.indices.clone(), 0, 0..1);
        }

        if skipped > 0 && !self.warned_missing_texture {
            log::warn!("CanvasSurface: {skipped} batch(es) reference unknown textures; skipped");
            self.warned_missing_texture = true;
        }
    }

    fn ensure_pipeline(&mut self, ctx: &RenderCtx<'_>) {
        if self.pipeline_format == Some(ctx.surface_format) && self.pipeline.is_some() {
            return;
        }

        let shader = ctx.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("paper canvas shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/canvas.wgsl").into()),
        });

        let uniform_bgl = ctx
            .device
            .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("paper canvas uniform bgl"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: true,
                        min_binding_size: wgpu::BufferSize::new(BatchUniform::SIZE),
                    },
                    count: None,
                }],
            });

        let texture_bgl = ctx
            .device
            .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("paper canvas texture bgl"),
                entries: &[
                    wgpu::BindGroupLayoutEntry {
                        binding: 0,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Texture {
                            sample_type: wgpu::TextureSampleType::Float { filterable: true },
                            view_dimension: wgpu::TextureViewDimension::D2,
                            multisampled: false,
                        },
                        count: None,
                    },
                    wgpu::BindGroupLayoutEntry {
                        binding: 1,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                        count: None,
                    },
                ],
            });

        let pipeline_layout = ctx
            .device
            .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("paper canvas pipeline layout"),
                bind_group_layouts: &[&uniform_bgl, &texture_bgl],
                immediate_size: 0,
            });

        let pipeline = ctx.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("paper canvas pipeline"),
            layout: Some(&pipeline_layout),

            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[GpuVertex::layout()],
            },

            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: ctx.surface_format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),

            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },

            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        log::debug!("CanvasSurface: pipeline built for {:?}", ctx.surface_format);

        self.pipeline_format = Some(ctx.surface_format);
        self.pipeline = Some(pipeline);
        self.uniform_bgl = Some(uniform_bgl);
        self.texture_bgl = Some(texture_bgl);

        // Everything bound through the old layouts has to be rebuilt.
        self.uniform_ubo = None;
        self.uniform_bind_group = None;
        self.uniform_capacity = 0;
        self.textures.clear();
    }

    fn ensure_sampler(&mut self, ctx: &RenderCtx<'_>) {
        if self.sampler.is_some() {
            return;
        }
        self.sampler = Some(ctx.device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("paper canvas sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Nearest,
            min_filter: wgpu::FilterMode::Nearest,
            mipmap_filter: wgpu::MipmapFilterMode::Nearest,
            ..Default::default()
        }));
    }

    /// Mirrors every texture the material references, re-uploading on generation change.
    fn sync_textures(&mut self, ctx: &RenderCtx<'_>, table: &TextureTable) {
        let Some(bgl) = self.texture_bgl.as_ref() else { return };
        let Some(sampler) = self.sampler.as_ref() else { return };

        for batch in self.material.batches() {
            let id = batch.uniforms.main_texture;
            let Ok(source) = table.get(id) else {
                self.textures.remove(&id);
                continue;
            };
            let (width, height) = source.size();
            if width == 0 || height == 0 {
                self.textures.remove(&id);
                continue;
            }

            let stale = match self.textures.get(&id) {
                Some(gpu) if gpu.generation == source.generation() => continue,
                Some(gpu) => gpu.size != (width, height),
                None => true,
            };

            if stale {
                let gpu = GpuTexture::create(ctx, bgl, sampler, (width, height));
                self.textures.insert(id, gpu);
            }
            if let Some(gpu) = self.textures.get_mut(&id) {
                gpu.upload(ctx, source.pixels());
                gpu.generation = source.generation();
            }
        }
    }

    fn upload_mesh(&mut self, ctx: &RenderCtx<'_>) {
        let Some(mesh) = self.mesh.as_ref() else { return };

        let vertices: Vec<GpuVertex> = mesh
            .positions
            .iter()
            .zip(&mesh.uvs)
            .zip(&mesh.colors)
            .map(|((p, uv), c)| GpuVertex {
                pos: [p.x, p.y],
                uv: [uv.x, uv.y],
                color: c.to_array(),
            })
            .collect();

        let (index_bytes, index_format) = encode_indices(mesh);

        if vertices.len() > self.vertex_capacity || self.vertex_vbo.is_none() {
            let cap = vertices.len().next_power_of_two().max(256);
            self.vertex_vbo = Some(ctx.device.create_buffer(&wgpu::BufferDescriptor {
                label: Some("paper canvas vbo"),
                size: (cap * std::mem::size_of::<GpuVertex>()) as u64,
                usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            }));
            self.vertex_capacity = cap;
        }

        let index_len = index_bytes.len() as u64;
        if index_len > self.index_capacity || self.index_ibo.is_none() {
            let cap = index_len.next_power_of_two().max(1024);
            self.index_ibo = Some(ctx.device.create_buffer(&wgpu::BufferDescriptor {
                label: Some("paper canvas ibo"),
                size: cap,
                usage: wgpu::BufferUsages::INDEX | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            }));
            self.index_capacity = cap;
        }

        if let Some(vbo) = self.vertex_vbo.as_ref() {
            ctx.queue.write_buffer(vbo, 0, bytemuck::cast_slice(&vertices));
        }
        if let Some(ibo) = self.index_ibo.as_ref() {
            ctx.queue.write_buffer(ibo, 0, &index_bytes);
        }
        self.index_format = index_format;
        self.mesh_dirty = false;
    }

    fn write_uniforms(&mut self, ctx: &RenderCtx<'_>) {
        let batches = self.material.batches();

        if self.uniform_stride == 0 {
            let align = ctx.device.limits().min_uniform_buffer_offset_alignment as u64;
            self.uniform_stride = BatchUniform::SIZE.div_ceil(align) * align;
        }

        if batches.len() > self.uniform_capacity || self.uniform_bind_group.is_none() {
            let Some(bgl) = self.uniform_bgl.as_ref() else { return };
            let cap = batches.len().next_power_of_two().max(16);

            let ubo = ctx.device.create_buffer(&wgpu::BufferDescriptor {
                label: Some("paper canvas ubo"),
                size: cap as u64 * self.uniform_stride,
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            });
            let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("paper canvas uniform bind group"),
                layout: bgl,
                entries: &[wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                        buffer: &ubo,
                        offset: 0,
                        size: wgpu::BufferSize::new(BatchUniform::SIZE),
                    }),
                }],
            });

            self.uniform_ubo = Some(ubo);
            self.uniform_bind_group = Some(bind_group);
            self.uniform_capacity = cap;
        }

        let Some(ubo) = self.uniform_ubo.as_ref() else { return };

        let stride = self.uniform_stride as usize;
        let mut staging = vec![0u8; batches.len() * stride];
        for (i, batch) in batches.iter().enumerate() {
            let u = BatchUniform::from_state(&batch.uniforms, ctx);
            let start = i * stride;
            staging[start..start + BatchUniform::SIZE as usize]
                .copy_from_slice(bytemuck::bytes_of(&u));
        }
        ctx.queue.write_buffer(ubo, 0, &staging);
    }
}

/// Index bytes in the mesh's format, padded to the 4-byte copy alignment.
fn encode_indices(mesh: &Mesh) -> (Vec<u8>, wgpu::IndexFormat) {
    match mesh.index_format {
        IndexFormat::U32 => (
            bytemuck::cast_slice(&mesh.indices).to_vec(),
            wgpu::IndexFormat::Uint32,
        ),
        IndexFormat::U16 => {
            let mut narrow: Vec<u16> = mesh.indices.iter().map(|&i| i as u16).collect();
            if narrow.len() % 2 == 1 {
                narrow.push(0);
            }
            (bytemuck::cast_slice(&narrow).to_vec(), wgpu::IndexFormat::Uint16)
        }
    }
}

struct GpuTexture {
    texture: wgpu::Texture,
    bind_group: wgpu::BindGroup,
    size: (u32, u32),
    generation: u64,
}

impl GpuTexture {
    fn create(
        ctx: &RenderCtx<'_>,
        bgl: &wgpu::BindGroupLayout,
        sampler: &wgpu::Sampler,
        size: (u32, u32),
    ) -> Self {
        let texture = ctx.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("paper canvas texture"),
            size: wgpu::Extent3d {
                width: size.0,
                height: size.1,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8Unorm,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("paper canvas texture bind group"),
            layout: bgl,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(sampler),
                },
            ],
        });

        Self {
            texture,
            bind_group,
            size,
            generation: u64::MAX,
        }
    }

    fn upload(&self, ctx: &RenderCtx<'_>, pixels: &[u8]) {
        let (width, height) = self.size;
        ctx.queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &self.texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            pixels,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(width * 4),
                rows_per_image: Some(height),
            },
            wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
        );
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct GpuVertex {
    pos: [f32; 2],
    uv: [f32; 2],
    color: [u8; 4],
}

impl GpuVertex {
    const ATTRS: [wgpu::VertexAttribute; 3] = wgpu::vertex_attr_array![
        0 => Float32x2, // pos
        1 => Float32x2, // uv
        2 => Unorm8x4   // color
    ];

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<GpuVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

/// Per-batch uniform block, laid out to match `CanvasUniforms` in `canvas.wgsl`.
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct BatchUniform {
    scissor_mat: [[f32; 4]; 4],
    brush_mat: [[f32; 4]; 4],
    brush_color1: [f32; 4],
    brush_color2: [f32; 4],
    brush_params: [f32; 4],
    brush_params2: [f32; 4],
    scissor_ext: [f32; 2],
    viewport: [f32; 2],
    brush_type: i32,
    _pad: [i32; 3],
}

impl BatchUniform {
    const SIZE: u64 = std::mem::size_of::<BatchUniform>() as u64;

    fn from_state(state: &UniformState, ctx: &RenderCtx<'_>) -> Self {
        Self {
            scissor_mat: state.scissor_matrix.to_cols_array_2d(),
            brush_mat: state.brush_matrix.to_cols_array_2d(),
            brush_color1: state.brush_color1.to_array(),
            brush_color2: state.brush_color2.to_array(),
            brush_params: state.brush_params.to_array(),
            brush_params2: state.brush_params2.to_array(),
            scissor_ext: state.scissor_extents.to_array(),
            viewport: ctx.clamped_viewport().to_array(),
            brush_type: state.brush_type.tag(),
            _pad: [0; 3],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::{Vec2, Vec3};
    use crate::paint::Color32;

    fn mesh(indices: Vec<u32>, format: IndexFormat) -> Mesh {
        let n = indices.len();
        Mesh {
            positions: vec![Vec3::ZERO; n],
            uvs: vec![Vec2::ZERO; n],
            colors: vec![Color32::WHITE; n],
            indices,
            index_format: format,
        }
    }

    // ── layout ────────────────────────────────────────────────────────────

    #[test]
    fn batch_uniform_matches_shader_block() {
        // 2 mat4 + 4 vec4 + 2 vec2 + i32 padded to 16.
        assert_eq!(BatchUniform::SIZE, 224);
        assert_eq!(std::mem::size_of::<GpuVertex>(), 20);
    }

    // ── indices ───────────────────────────────────────────────────────────

    #[test]
    fn u32_indices_are_copied_verbatim() {
        let (bytes, format) = encode_indices(&mesh(vec![0, 1, 2], IndexFormat::U32));
        assert_eq!(format, wgpu::IndexFormat::Uint32);
        assert_eq!(bytes.len(), 12);
    }

    #[test]
    fn u16_indices_are_padded_to_copy_alignment() {
        let (bytes, format) = encode_indices(&mesh(vec![0, 1, 2], IndexFormat::U16));
        assert_eq!(format, wgpu::IndexFormat::Uint16);
        assert_eq!(bytes.len(), 8);
        assert_eq!(bytes.len() % wgpu::COPY_BUFFER_ALIGNMENT as usize, 0);
    }

    // ── display surface ───────────────────────────────────────────────────

    #[test]
    fn publishing_marks_mesh_for_upload() {
        let mut surface = CanvasSurface::new();
        assert!(surface.mesh().is_none());

        surface.set_mesh(mesh(vec![0, 1, 2], IndexFormat::U32));
        surface.set_material(Material::default());

        assert!(surface.mesh_dirty);
        assert_eq!(surface.mesh().map(Mesh::index_count), Some(3));
        assert!(surface.material().is_empty());
    }
}
