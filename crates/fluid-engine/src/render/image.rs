use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;

use crate::render::common::{
    binding_size, linear_clamp_sampler, premul_alpha_blend, sampler_entry, texture_entry,
    triangle_list, uniform_entry, InstanceBuffer, QuadVertex, RenderView, ViewUniform,
    QUAD_INDICES, QUAD_VERTICES,
};
use crate::render::{RenderCtx, RenderTarget};
use crate::scene::{DrawCmd, DrawList, ImageId};

/// A registered image. The GPU side is created on first use and dropped when
/// the pipeline is rebuilt.
struct ImageSlot {
    label: String,
    pixels: image::RgbaImage,
    bind_group: Option<wgpu::BindGroup>,
    _texture: Option<wgpu::Texture>,
}

/// Renderer for `DrawCmd::Image`: world-space quads with cover-fit and zoom.
///
/// Images are registered with [`ImageRenderer::add_image`] and uploaded lazily
/// the first frame they are drawn.
pub struct ImageRenderer {
    pipeline_format: Option<wgpu::TextureFormat>,
    pipeline: Option<wgpu::RenderPipeline>,
    view_bgl: Option<wgpu::BindGroupLayout>,
    image_bgl: Option<wgpu::BindGroupLayout>,

    view_ubo: Option<wgpu::Buffer>,
    view_bind_group: Option<wgpu::BindGroup>,
    sampler: Option<wgpu::Sampler>,

    quad_vbo: Option<wgpu::Buffer>,
    quad_ibo: Option<wgpu::Buffer>,
    instances: InstanceBuffer<ImageInstance>,

    images: Vec<ImageSlot>,
}

impl Default for ImageRenderer {
    fn default() -> Self {
        Self {
            pipeline_format: None,
            pipeline: None,
            view_bgl: None,
            image_bgl: None,
            view_ubo: None,
            view_bind_group: None,
            sampler: None,
            quad_vbo: None,
            quad_ibo: None,
            instances: InstanceBuffer::new("fluid image instance vbo"),
            images: Vec::new(),
        }
    }
}

impl ImageRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an image. Pixels are straight-alpha sRGB, as decoded.
    pub fn add_image(&mut self, label: impl Into<String>, pixels: image::RgbaImage) -> ImageId {
        let id = ImageId(self.images.len());
        self.images.push(ImageSlot {
            label: label.into(),
            pixels,
            bind_group: None,
            _texture: None,
        });
        id
    }

    #[inline]
    pub fn begin_frame(&mut self) {
        self.instances.begin_frame();
    }

    /// Renders all `DrawCmd::Image` entries in `draw_list` in paint order.
    pub fn render(
        &mut self,
        ctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
        draw_list: &mut DrawList,
        view: &RenderView,
    ) {
        let mut batch: Vec<(ImageId, ImageInstance)> = Vec::new();
        for item in draw_list.iter_in_paint_order() {
            let DrawCmd::Image(cmd) = &item.cmd else { continue; };
            let Some(slot) = self.images.get(cmd.image.0) else {
                log::warn!("ImageRenderer: unknown ImageId {:?}, skipping", cmd.image);
                continue;
            };
            if cmd.size.x <= 0.0 || cmd.size.y <= 0.0 {
                continue;
            }
            batch.push((cmd.image, ImageInstance {
                center: cmd.center.to_array(),
                zoom: cmd.zoom.max(1e-3),
                size: cmd.size.to_array(),
                image_size: {
                    let (w, h) = slot.pixels.dimensions();
                    [w.max(1) as f32, h.max(1) as f32]
                },
            }));
        }

        if batch.is_empty() {
            return;
        }

        self.ensure_pipeline(ctx);
        self.ensure_shared(ctx);
        for (id, _) in &batch {
            self.ensure_uploaded(ctx, *id);
        }
        self.write_view_uniform(ctx, view);

        let instances: Vec<ImageInstance> = batch.iter().map(|(_, inst)| *inst).collect();
        let Some(range) = self.instances.append(ctx, &instances) else { return; };

        let Some(pipeline) = self.pipeline.as_ref() else { return; };
        let Some(view_bind_group) = self.view_bind_group.as_ref() else { return; };
        let Some(quad_vbo) = self.quad_vbo.as_ref() else { return; };
        let Some(quad_ibo) = self.quad_ibo.as_ref() else { return; };
        let Some(instance_vbo) = self.instances.buffer() else { return; };

        let mut rpass = target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("fluid image pass"),
            color_attachments: &[Some(target.load_color())],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        rpass.set_pipeline(pipeline);
        rpass.set_bind_group(0, view_bind_group, &[]);
        rpass.set_vertex_buffer(0, quad_vbo.slice(..));
        rpass.set_vertex_buffer(1, instance_vbo.slice(..));
        rpass.set_index_buffer(quad_ibo.slice(..), wgpu::IndexFormat::Uint16);

        // One draw per image keeps paint order across differing textures.
        for (i, (id, _)) in batch.iter().enumerate() {
            let Some(bind_group) = self.images.get(id.0).and_then(|s| s.bind_group.as_ref()) else {
                continue;
            };
            let instance = range.start + i as u32;
            rpass.set_bind_group(1, bind_group, &[]);
            rpass.draw_indexed(0..6, 0, instance..instance + 1);
        }
    }

    fn ensure_uploaded(&mut self, ctx: &RenderCtx<'_>, id: ImageId) {
        let Some(image_bgl) = self.image_bgl.as_ref() else { return; };
        let Some(sampler) = self.sampler.as_ref() else { return; };
        let Some(slot) = self.images.get_mut(id.0) else { return; };
        if slot.bind_group.is_some() {
            return;
        }

        let (width, height) = slot.pixels.dimensions();
        let texture = ctx.device.create_texture_with_data(
            ctx.queue,
            &wgpu::TextureDescriptor {
                label: Some(slot.label.as_str()),
                size: wgpu::Extent3d {
                    width: width.max(1),
                    height: height.max(1),
                    depth_or_array_layers: 1,
                },
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format: wgpu::TextureFormat::Rgba8UnormSrgb,
                usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
                view_formats: &[],
            },
            wgpu::util::TextureDataOrder::LayerMajor,
            if width == 0 || height == 0 { &[255, 255, 255, 255] } else { slot.pixels.as_raw() },
        );
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        slot.bind_group = Some(ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("fluid image bind group"),
            layout: image_bgl,
            entries: &[
                wgpu::BindGroupEntry { binding: 0, resource: wgpu::BindingResource::TextureView(&view) },
                wgpu::BindGroupEntry { binding: 1, resource: wgpu::BindingResource::Sampler(sampler) },
            ],
        }));
        slot._texture = Some(texture);
        log::debug!("uploaded image {:?} ({width}x{height})", slot.label);
    }

    // ── lazy-init helpers ──────────────────────────────────────────────────

    fn ensure_pipeline(&mut self, ctx: &RenderCtx<'_>) {
        if self.pipeline_format == Some(ctx.surface_format) && self.pipeline.is_some() {
            return;
        }

        let shader = ctx.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("fluid image shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/image.wgsl").into()),
        });

        let view_bgl = ctx.device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("fluid image view bgl"),
            entries: &[uniform_entry(0, wgpu::ShaderStages::VERTEX, binding_size::<ViewUniform>(), false)],
        });
        let image_bgl = ctx.device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("fluid image texture bgl"),
            entries: &[texture_entry(0), sampler_entry(1)],
        });

        let pipeline_layout = ctx.device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("fluid image pipeline layout"),
            bind_group_layouts: &[&view_bgl, &image_bgl],
            immediate_size: 0,
        });

        let pipeline = ctx.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("fluid image pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[QuadVertex::layout(), ImageInstance::layout()],
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
        self.view_bgl = Some(view_bgl);
        self.image_bgl = Some(image_bgl);
        self.view_ubo = None;
        self.view_bind_group = None;
        // Texture bind groups reference the old layout.
        for slot in &mut self.images {
            slot.bind_group = None;
            slot._texture = None;
        }
    }

    fn ensure_shared(&mut self, ctx: &RenderCtx<'_>) {
        if self.sampler.is_none() {
            self.sampler = Some(linear_clamp_sampler(ctx.device, "fluid image sampler"));
        }
        if self.quad_vbo.is_none() || self.quad_ibo.is_none() {
            self.quad_vbo = Some(ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("fluid image quad vbo"),
                contents: bytemuck::cast_slice(&QUAD_VERTICES),
                usage: wgpu::BufferUsages::VERTEX,
            }));
            self.quad_ibo = Some(ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("fluid image quad ibo"),
                contents: bytemuck::cast_slice(&QUAD_INDICES),
                usage: wgpu::BufferUsages::INDEX,
            }));
        }
        if self.view_bind_group.is_some() {
            return;
        }
        let Some(view_bgl) = self.view_bgl.as_ref() else { return; };

        let view_ubo = ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("fluid image view ubo"),
            size: std::mem::size_of::<ViewUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        self.view_bind_group = Some(ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("fluid image view bind group"),
            layout: view_bgl,
            entries: &[wgpu::BindGroupEntry { binding: 0, resource: view_ubo.as_entire_binding() }],
        }));
        self.view_ubo = Some(view_ubo);
    }

    fn write_view_uniform(&self, ctx: &RenderCtx<'_>, view: &RenderView) {
        let Some(ubo) = self.view_ubo.as_ref() else { return; };
        ctx.queue.write_buffer(ubo, 0, bytemuck::bytes_of(&ViewUniform::new(view)));
    }
}

// ── GPU types ─────────────────────────────────────────────────────────────

/// Instance data layout (32 bytes):
///
///  offset  0  center      [f32; 3]   loc 1
///  offset 12  zoom        f32        loc 2
///  offset 16  size        [f32; 2]   loc 3
///  offset 24  image_size  [f32; 2]   loc 4
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct ImageInstance {
    center: [f32; 3],
    zoom: f32,
    size: [f32; 2],
    image_size: [f32; 2],
}

impl ImageInstance {
    const ATTRS: [wgpu::VertexAttribute; 4] = wgpu::vertex_attr_array![
        1 => Float32x3,
        2 => Float32,
        3 => Float32x2,
        4 => Float32x2
    ];

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<ImageInstance>() as u64,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRS,
        }
    }
}
