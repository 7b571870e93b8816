use crate::render::common::{linear_clamp_sampler, sampler_entry, texture_entry, triangle_list};
use crate::render::{OffscreenBuffer, RenderCtx, RenderTarget};

/// Draws the offscreen buffer over the whole target as the visible backdrop.
///
/// The mesh samples the same texture, so the glass refracts exactly what the
/// backdrop shows behind it.
pub struct BackdropRenderer {
    pipeline_format: Option<wgpu::TextureFormat>,
    pipeline: Option<wgpu::RenderPipeline>,
    bind_group_layout: Option<wgpu::BindGroupLayout>,
    sampler: Option<wgpu::Sampler>,

    bind_group: Option<wgpu::BindGroup>,
    bind_group_generation: u64,
}

impl Default for BackdropRenderer {
    fn default() -> Self {
        Self {
            pipeline_format: None,
            pipeline: None,
            bind_group_layout: None,
            sampler: None,
            bind_group: None,
            bind_group_generation: 0,
        }
    }
}

impl BackdropRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn render(&mut self, ctx: &RenderCtx<'_>, target: &mut RenderTarget<'_>, source: &OffscreenBuffer) {
        self.ensure_pipeline(ctx);
        self.ensure_bindings(ctx, source);

        let Some(pipeline) = self.pipeline.as_ref() else { return; };
        let Some(bind_group) = self.bind_group.as_ref() else { return; };

        let mut rpass = target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("fluid backdrop pass"),
            color_attachments: &[Some(target.load_color())],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        rpass.set_pipeline(pipeline);
        rpass.set_bind_group(0, bind_group, &[]);
        // Fullscreen triangle generated from vertex_index.
        rpass.draw(0..3, 0..1);
    }

    fn ensure_pipeline(&mut self, ctx: &RenderCtx<'_>) {
        if self.pipeline_format == Some(ctx.surface_format) && self.pipeline.is_some() {
            return;
        }

        let shader = ctx.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("fluid backdrop shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/backdrop.wgsl").into()),
        });

        let bgl = ctx.device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("fluid backdrop bgl"),
            entries: &[texture_entry(0), sampler_entry(1)],
        });

        let pipeline_layout = ctx.device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("fluid backdrop pipeline layout"),
            bind_group_layouts: &[&bgl],
            immediate_size: 0,
        });

        let pipeline = ctx.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("fluid backdrop pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: ctx.surface_format,
                    blend: None,
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
        self.bind_group_generation = 0;
    }

    fn ensure_bindings(&mut self, ctx: &RenderCtx<'_>, source: &OffscreenBuffer) {
        if self.bind_group.is_some() && self.bind_group_generation == source.generation() {
            return;
        }
        if self.sampler.is_none() {
            self.sampler = Some(linear_clamp_sampler(ctx.device, "fluid backdrop sampler"));
        }

        let Some(bgl) = self.bind_group_layout.as_ref() else { return; };
        let Some(sampler) = self.sampler.as_ref() else { return; };

        self.bind_group = Some(ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("fluid backdrop bind group"),
            layout: bgl,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(source.view()),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(sampler),
                },
            ],
        }));
        self.bind_group_generation = source.generation();
    }
}
