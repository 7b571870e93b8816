use std::collections::HashMap;

use bytemuck::{Pod, Zeroable};
use fontdue::layout::GlyphRasterConfig;
use wgpu::util::DeviceExt;

use crate::render::common::{
    binding_size, linear_clamp_sampler, premul_alpha_blend, sampler_entry, texture_entry,
    triangle_list, uniform_entry, InstanceBuffer, QuadVertex, RenderView, ViewUniform,
    QUAD_INDICES, QUAD_VERTICES,
};
use crate::render::{RenderCtx, RenderTarget};
use crate::scene::{DrawCmd, DrawList};
use crate::text::FontSystem;

// ── atlas constants ────────────────────────────────────────────────────────

const ATLAS_SIZE: u32 = 2048;
const GLYPH_PADDING: u32 = 1; // pixels between glyphs in the atlas

struct CachedGlyph {
    uv_min: [f32; 2],
    uv_max: [f32; 2],
}

// ── renderer ──────────────────────────────────────────────────────────────

/// Renderer for `DrawCmd::Text` as camera-facing quads in world space.
///
/// Glyphs are rasterized on first use via fontdue into a 2048 × 2048 R8Unorm
/// atlas and cached for the renderer's lifetime, keyed by
/// `GlyphRasterConfig` (font, glyph index, pixel size).
///
/// Draws without depth testing; layering follows draw-list order.
pub struct TextRenderer {
    pipeline_format: Option<wgpu::TextureFormat>,
    pipeline: Option<wgpu::RenderPipeline>,
    bind_group_layout: Option<wgpu::BindGroupLayout>,

    bind_group: Option<wgpu::BindGroup>,
    view_ubo: Option<wgpu::Buffer>,
    sampler: Option<wgpu::Sampler>,

    atlas_texture: Option<wgpu::Texture>,
    atlas_view: Option<wgpu::TextureView>,
    atlas_cursor_x: u32,
    atlas_cursor_y: u32,
    atlas_row_height: u32,
    atlas_generation: u64,
    bind_group_generation: u64,
    atlas_full: bool,

    glyph_cache: HashMap<GlyphRasterConfig, CachedGlyph>,

    quad_vbo: Option<wgpu::Buffer>,
    quad_ibo: Option<wgpu::Buffer>,
    instances: InstanceBuffer<GlyphInstance>,
    scratch: Vec<GlyphInstance>,
}

impl Default for TextRenderer {
    fn default() -> Self {
        Self {
            pipeline_format: None,
            pipeline: None,
            bind_group_layout: None,
            bind_group: None,
            view_ubo: None,
            sampler: None,
            atlas_texture: None,
            atlas_view: None,
            atlas_cursor_x: GLYPH_PADDING,
            atlas_cursor_y: GLYPH_PADDING,
            atlas_row_height: 0,
            atlas_generation: 0,
            bind_group_generation: u64::MAX,
            atlas_full: false,
            glyph_cache: HashMap::new(),
            quad_vbo: None,
            quad_ibo: None,
            instances: InstanceBuffer::new("fluid text instance vbo"),
            scratch: Vec::new(),
        }
    }
}

impl TextRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rewinds per-frame instance storage. Call once per frame before any pass.
    #[inline]
    pub fn begin_frame(&mut self) {
        self.instances.begin_frame();
    }

    /// Renders all `DrawCmd::Text` entries in `draw_list` into `target`.
    pub fn render(
        &mut self,
        ctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
        draw_list: &mut DrawList,
        view: &RenderView,
        font_system: &FontSystem,
    ) {
        self.ensure_pipeline(ctx);
        self.ensure_atlas(ctx);
        self.ensure_static_buffers(ctx);

        let mut instances = std::mem::take(&mut self.scratch);
        instances.clear();

        for item in draw_list.iter_in_paint_order() {
            let DrawCmd::Text(cmd) = &item.cmd else { continue; };
            let Some(font_id) = cmd.font else { continue; };
            let Some(font) = font_system.get(font_id) else {
                log::warn!("TextRenderer: unknown FontId {font_id:?}, skipping");
                continue;
            };
            let Some(layout) = font_system.layout(&cmd.text, font_id, cmd.raster_px, cmd.letter_spacing) else {
                continue;
            };

            // Raster pixels (+Y down) to world units (+Y up).
            let world_per_px = cmd.size / layout.raster_px;
            let color = cmd.color.to_array();

            for glyph in &layout.glyphs {
                if !self.glyph_cache.contains_key(&glyph.key) {
                    let (metrics, bitmap) = font.rasterize_config(glyph.key);
                    if metrics.width == 0 || metrics.height == 0 {
                        continue;
                    }
                    if let Some(entry) =
                        self.try_place_glyph(ctx, &bitmap, metrics.width as u32, metrics.height as u32)
                    {
                        self.glyph_cache.insert(glyph.key, entry);
                    }
                }
                let Some(cached) = self.glyph_cache.get(&glyph.key) else { continue; };

                instances.push(GlyphInstance {
                    world_min: [
                        cmd.position.x + glyph.min.x * world_per_px,
                        cmd.position.y - glyph.max.y * world_per_px,
                    ],
                    world_max: [
                        cmd.position.x + glyph.max.x * world_per_px,
                        cmd.position.y - glyph.min.y * world_per_px,
                    ],
                    uv_min: cached.uv_min,
                    uv_max: cached.uv_max,
                    color,
                    depth: [cmd.position.z, 0.0, 0.0, 0.0],
                });
            }
        }

        if !instances.is_empty() {
            self.ensure_bindings(ctx);
            self.write_view_uniform(ctx, view);
            let range = self.instances.append(ctx, &instances);
            if let Some(range) = range {
                self.draw(target, range);
            }
        }

        self.scratch = instances;
    }

    fn draw(&self, target: &mut RenderTarget<'_>, range: std::ops::Range<u32>) {
        let Some(pipeline) = self.pipeline.as_ref() else { return; };
        let Some(bind_group) = self.bind_group.as_ref() else { return; };
        let Some(quad_vbo) = self.quad_vbo.as_ref() else { return; };
        let Some(quad_ibo) = self.quad_ibo.as_ref() else { return; };
        let Some(instance_vbo) = self.instances.buffer() else { return; };

        let mut rpass = target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("fluid text pass"),
            color_attachments: &[Some(target.load_color())],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        rpass.set_pipeline(pipeline);
        rpass.set_bind_group(0, bind_group, &[]);
        rpass.set_vertex_buffer(0, quad_vbo.slice(..));
        rpass.set_vertex_buffer(1, instance_vbo.slice(..));
        rpass.set_index_buffer(quad_ibo.slice(..), wgpu::IndexFormat::Uint16);
        rpass.draw_indexed(0..6, 0, range);
    }

    // ── atlas helpers ──────────────────────────────────────────────────────

    fn try_place_glyph(&mut self, ctx: &RenderCtx<'_>, bitmap: &[u8], w: u32, h: u32) -> Option<CachedGlyph> {
        if self.atlas_full {
            return None;
        }

        // Shelf packing: start a new row when the glyph doesn't fit horizontally.
        if self.atlas_cursor_x + w + GLYPH_PADDING > ATLAS_SIZE {
            self.atlas_cursor_y += self.atlas_row_height + GLYPH_PADDING;
            self.atlas_cursor_x = GLYPH_PADDING;
            self.atlas_row_height = 0;
        }

        if self.atlas_cursor_y + h + GLYPH_PADDING > ATLAS_SIZE {
            log::warn!("TextRenderer: glyph atlas is full; some glyphs will not be rendered");
            self.atlas_full = true;
            return None;
        }

        let (gx, gy) = (self.atlas_cursor_x, self.atlas_cursor_y);
        let atlas = self.atlas_texture.as_ref()?;

        ctx.queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: atlas,
                mip_level: 0,
                origin: wgpu::Origin3d { x: gx, y: gy, z: 0 },
                aspect: wgpu::TextureAspect::All,
            },
            bitmap,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(w),
                rows_per_image: Some(h),
            },
            wgpu::Extent3d { width: w, height: h, depth_or_array_layers: 1 },
        );

        self.atlas_cursor_x += w + GLYPH_PADDING;
        self.atlas_row_height = self.atlas_row_height.max(h);

        let atlas_f = ATLAS_SIZE as f32;
        Some(CachedGlyph {
            uv_min: [gx as f32 / atlas_f, gy as f32 / atlas_f],
            uv_max: [(gx + w) as f32 / atlas_f, (gy + h) as f32 / atlas_f],
        })
    }

    // ── lazy-init helpers ──────────────────────────────────────────────────

    fn ensure_pipeline(&mut self, ctx: &RenderCtx<'_>) {
        if self.pipeline_format == Some(ctx.surface_format) && self.pipeline.is_some() {
            return;
        }

        let shader = ctx.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("fluid text shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/text.wgsl").into()),
        });

        let bgl = ctx.device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("fluid text bgl"),
            entries: &[
                uniform_entry(0, wgpu::ShaderStages::VERTEX, binding_size::<ViewUniform>(), false),
                texture_entry(1),
                sampler_entry(2),
            ],
        });

        let pipeline_layout = ctx.device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("fluid text pipeline layout"),
            bind_group_layouts: &[&bgl],
            immediate_size: 0,
        });

        let pipeline = ctx.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("fluid text pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[QuadVertex::layout(), GlyphInstance::layout()],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: ctx.surface_format,
                    blend: Some(premul_alpha_blend()),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: triangle_list(),
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        self.pipeline_format = Some(ctx.surface_format);
        self.pipeline = Some(pipeline);
        self.bind_group_layout = Some(bgl);
        self.bind_group = None;
        self.view_ubo = None;
        self.bind_group_generation = u64::MAX;
    }

    fn ensure_atlas(&mut self, ctx: &RenderCtx<'_>) {
        if self.atlas_texture.is_some() {
            return;
        }

        let texture = ctx.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("fluid text atlas"),
            size: wgpu::Extent3d {
                width: ATLAS_SIZE,
                height: ATLAS_SIZE,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::R8Unorm,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        self.atlas_view = Some(texture.create_view(&wgpu::TextureViewDescriptor::default()));
        self.atlas_texture = Some(texture);
        self.atlas_generation += 1;
        self.atlas_cursor_x = GLYPH_PADDING;
        self.atlas_cursor_y = GLYPH_PADDING;
        self.atlas_row_height = 0;
        self.atlas_full = false;
        self.glyph_cache.clear();
    }

    fn ensure_bindings(&mut self, ctx: &RenderCtx<'_>) {
        if self.bind_group_generation == self.atlas_generation
            && self.bind_group.is_some()
            && self.view_ubo.is_some()
        {
            return;
        }
        if self.sampler.is_none() {
            self.sampler = Some(linear_clamp_sampler(ctx.device, "fluid text sampler"));
        }

        let Some(bgl) = self.bind_group_layout.as_ref() else { return; };
        let Some(atlas_view) = self.atlas_view.as_ref() else { return; };
        let Some(sampler) = self.sampler.as_ref() else { return; };

        let view_ubo = ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("fluid text view ubo"),
            size: std::mem::size_of::<ViewUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("fluid text bind group"),
            layout: bgl,
            entries: &[
                wgpu::BindGroupEntry { binding: 0, resource: view_ubo.as_entire_binding() },
                wgpu::BindGroupEntry { binding: 1, resource: wgpu::BindingResource::TextureView(atlas_view) },
                wgpu::BindGroupEntry { binding: 2, resource: wgpu::BindingResource::Sampler(sampler) },
            ],
        });

        self.view_ubo = Some(view_ubo);
        self.bind_group = Some(bind_group);
        self.bind_group_generation = self.atlas_generation;
    }

    fn ensure_static_buffers(&mut self, ctx: &RenderCtx<'_>) {
        if self.quad_vbo.is_some() && self.quad_ibo.is_some() {
            return;
        }
        self.quad_vbo = Some(ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("fluid text quad vbo"),
            contents: bytemuck::cast_slice(&QUAD_VERTICES),
            usage: wgpu::BufferUsages::VERTEX,
        }));
        self.quad_ibo = Some(ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("fluid text quad ibo"),
            contents: bytemuck::cast_slice(&QUAD_INDICES),
            usage: wgpu::BufferUsages::INDEX,
        }));
    }

    fn write_view_uniform(&self, ctx: &RenderCtx<'_>, view: &RenderView) {
        let Some(ubo) = self.view_ubo.as_ref() else { return; };
        ctx.queue.write_buffer(ubo, 0, bytemuck::bytes_of(&ViewUniform::new(view)));
    }
}

// ── GPU types ─────────────────────────────────────────────────────────────

/// Instance data layout (64 bytes):
///
///  offset  0  world_min  [f32; 2]   loc 1
///  offset  8  world_max  [f32; 2]   loc 2
///  offset 16  uv_min     [f32; 2]   loc 3
///  offset 24  uv_max     [f32; 2]   loc 4
///  offset 32  color      [f32; 4]   loc 5
///  offset 48  depth      [f32; 4]   loc 6 (z, unused x3)
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct GlyphInstance {
    world_min: [f32; 2],
    world_max: [f32; 2],
    uv_min: [f32; 2],
    uv_max: [f32; 2],
    color: [f32; 4],
    depth: [f32; 4],
}

impl GlyphInstance {
    const ATTRS: [wgpu::VertexAttribute; 6] = wgpu::vertex_attr_array![
        1 => Float32x2,
        2 => Float32x2,
        3 => Float32x2,
        4 => Float32x2,
        5 => Float32x4,
        6 => Float32x4
    ];

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<GlyphInstance>() as u64,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRS,
        }
    }
}
