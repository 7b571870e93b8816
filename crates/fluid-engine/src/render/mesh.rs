use std::collections::{HashMap, HashSet};

use bytemuck::{Pod, Zeroable};
use glam::Mat4;
use wgpu::util::DeviceExt;

use crate::device::DEPTH_FORMAT;
use crate::geometry::{MeshData, MeshId};
use crate::render::common::{
    binding_size, linear_clamp_sampler, sampler_entry, texture_entry, triangle_list, uniform_entry,
    RenderView,
};
use crate::render::{OffscreenBuffer, RenderCtx, RenderTarget};
use crate::scene::{DrawCmd, DrawList, TransmissionParams};

/// Per-draw uniform slot size: `MeshUniform` rounded up to 256 bytes, the
/// WebGPU maximum for `min_uniform_buffer_offset_alignment`.
const UNIFORM_STRIDE: u64 = (std::mem::size_of::<MeshUniform>() as u64).div_ceil(256) * 256;

struct GpuMesh {
    vbo: wgpu::Buffer,
    ibo: wgpu::Buffer,
    index_count: u32,
}

/// Renderer for `DrawCmd::Mesh` with the transmission material.
///
/// Each mesh refracts the offscreen buffer: the color behind a fragment is
/// sampled where the refracted view ray leaves the volume, with per-channel
/// IOR for chromatic aberration, blur from roughness/anisotropy and
/// Beer-Lambert absorption. Depth-tested against the target's depth view.
pub struct MeshRenderer {
    pipeline_format: Option<wgpu::TextureFormat>,
    pipeline: Option<wgpu::RenderPipeline>,
    uniform_bgl: Option<wgpu::BindGroupLayout>,
    source_bgl: Option<wgpu::BindGroupLayout>,
    sampler: Option<wgpu::Sampler>,

    uniform_buffer: Option<wgpu::Buffer>,
    uniform_bind_group: Option<wgpu::BindGroup>,
    uniform_capacity: u64,
    uniform_cursor: u64,

    source_bind_group: Option<wgpu::BindGroup>,
    source_generation: u64,

    meshes: HashMap<MeshId, GpuMesh>,
    used: HashSet<MeshId>,
}

impl Default for MeshRenderer {
    fn default() -> Self {
        Self {
            pipeline_format: None,
            pipeline: None,
            uniform_bgl: None,
            source_bgl: None,
            sampler: None,
            uniform_buffer: None,
            uniform_bind_group: None,
            uniform_capacity: 0,
            uniform_cursor: 0,
            source_bind_group: None,
            source_generation: 0,
            meshes: HashMap::new(),
            used: HashSet::new(),
        }
    }
}

impl MeshRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rewinds uniform slots and evicts meshes not drawn last frame.
    pub fn begin_frame(&mut self) {
        self.uniform_cursor = 0;
        let used = std::mem::take(&mut self.used);
        self.meshes.retain(|id, _| used.contains(id));
    }

    /// Renders all `DrawCmd::Mesh` entries, sampling `source` as the transmitted light.
    pub fn render(
        &mut self,
        ctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
        draw_list: &mut DrawList,
        view: &RenderView,
        source: &OffscreenBuffer,
        time: f32,
    ) {
        let (width, height) = source.size();
        let mut draws: Vec<(MeshId, MeshUniform)> = Vec::new();

        for item in draw_list.iter_in_paint_order() {
            let DrawCmd::Mesh(cmd) = &item.cmd else { continue; };
            if cmd.mesh.is_empty() {
                continue;
            }
            if !self.meshes.contains_key(&cmd.mesh.id()) {
                let gpu = upload_mesh(ctx, &cmd.mesh);
                self.meshes.insert(cmd.mesh.id(), gpu);
            }
            self.used.insert(cmd.mesh.id());
            draws.push((
                cmd.mesh.id(),
                MeshUniform::new(view, cmd.model, &cmd.material, [width as f32, height as f32], time),
            ));
        }

        if draws.is_empty() {
            return;
        }
        let Some(depth_view) = target.depth_view else {
            log::warn!("MeshRenderer: target has no depth view, skipping");
            return;
        };

        self.ensure_pipeline(ctx);
        self.ensure_source_bindings(ctx, source);
        let first_slot = self.uniform_cursor;
        self.ensure_uniform_capacity(ctx, first_slot + draws.len() as u64);

        let Some(uniform_buffer) = self.uniform_buffer.as_ref() else { return; };
        for (i, (_, uniform)) in draws.iter().enumerate() {
            let offset = (first_slot + i as u64) * UNIFORM_STRIDE;
            ctx.queue.write_buffer(uniform_buffer, offset, bytemuck::bytes_of(uniform));
        }
        self.uniform_cursor = first_slot + draws.len() as u64;

        let Some(pipeline) = self.pipeline.as_ref() else { return; };
        let Some(uniform_bind_group) = self.uniform_bind_group.as_ref() else { return; };
        let Some(source_bind_group) = self.source_bind_group.as_ref() else { return; };

        let mut rpass = target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("fluid mesh pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target.color_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: depth_view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        rpass.set_pipeline(pipeline);
        rpass.set_bind_group(1, source_bind_group, &[]);

        for (i, (id, _)) in draws.iter().enumerate() {
            let Some(mesh) = self.meshes.get(id) else { continue; };
            let offset = ((first_slot + i as u64) * UNIFORM_STRIDE) as u32;
            rpass.set_bind_group(0, uniform_bind_group, &[offset]);
            rpass.set_vertex_buffer(0, mesh.vbo.slice(..));
            rpass.set_index_buffer(mesh.ibo.slice(..), wgpu::IndexFormat::Uint32);
            rpass.draw_indexed(0..mesh.index_count, 0, 0..1);
        }
    }

    // ── lazy-init helpers ──────────────────────────────────────────────────

    fn ensure_pipeline(&mut self, ctx: &RenderCtx<'_>) {
        if self.pipeline_format == Some(ctx.surface_format) && self.pipeline.is_some() {
            return;
        }

        let shader = ctx.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("fluid transmission shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/transmission.wgsl").into()),
        });

        let uniform_bgl = ctx.device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("fluid mesh uniform bgl"),
            entries: &[uniform_entry(
                0,
                wgpu::ShaderStages::VERTEX_FRAGMENT,
                binding_size::<MeshUniform>(),
                true,
            )],
        });
        let source_bgl = ctx.device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("fluid mesh source bgl"),
            entries: &[texture_entry(0), sampler_entry(1)],
        });

        let pipeline_layout = ctx.device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("fluid mesh pipeline layout"),
            bind_group_layouts: &[&uniform_bgl, &source_bgl],
            immediate_size: 0,
        });

        let pipeline = ctx.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("fluid mesh pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[MeshVertex::layout()],
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
            // Both faces render so thin or open meshes stay visible.
            primitive: triangle_list(),
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        self.pipeline_format = Some(ctx.surface_format);
        self.pipeline = Some(pipeline);
        self.uniform_bgl = Some(uniform_bgl);
        self.source_bgl = Some(source_bgl);
        self.uniform_buffer = None;
        self.uniform_bind_group = None;
        self.uniform_capacity = 0;
        self.source_bind_group = None;
        self.source_generation = 0;
    }

    fn ensure_source_bindings(&mut self, ctx: &RenderCtx<'_>, source: &OffscreenBuffer) {
        if self.source_bind_group.is_some() && self.source_generation == source.generation() {
            return;
        }
        if self.sampler.is_none() {
            self.sampler = Some(linear_clamp_sampler(ctx.device, "fluid mesh source sampler"));
        }
        let Some(bgl) = self.source_bgl.as_ref() else { return; };
        let Some(sampler) = self.sampler.as_ref() else { return; };

        self.source_bind_group = Some(ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("fluid mesh source bind group"),
            layout: bgl,
            entries: &[
                wgpu::BindGroupEntry { binding: 0, resource: wgpu::BindingResource::TextureView(source.view()) },
                wgpu::BindGroupEntry { binding: 1, resource: wgpu::BindingResource::Sampler(sampler) },
            ],
        }));
        self.source_generation = source.generation();
    }

    fn ensure_uniform_capacity(&mut self, ctx: &RenderCtx<'_>, slots: u64) {
        if slots <= self.uniform_capacity && self.uniform_buffer.is_some() {
            return;
        }
        let Some(bgl) = self.uniform_bgl.as_ref() else { return; };

        // Passes recorded earlier this frame keep the old buffer alive.
        let new_cap = slots.next_power_of_two().max(8);
        let buffer = ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("fluid mesh uniform buffer"),
            size: new_cap * UNIFORM_STRIDE,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        self.uniform_bind_group = Some(ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("fluid mesh uniform bind group"),
            layout: bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                    buffer: &buffer,
                    offset: 0,
                    size: binding_size::<MeshUniform>(),
                }),
            }],
        }));
        self.uniform_buffer = Some(buffer);
        self.uniform_capacity = new_cap;
    }
}

fn upload_mesh(ctx: &RenderCtx<'_>, mesh: &MeshData) -> GpuMesh {
    let vertices: Vec<MeshVertex> = mesh
        .positions
        .iter()
        .zip(&mesh.normals)
        .map(|(p, n)| MeshVertex { position: *p, normal: *n })
        .collect();

    let vbo = ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some("fluid mesh vbo"),
        contents: bytemuck::cast_slice(&vertices),
        usage: wgpu::BufferUsages::VERTEX,
    });
    let ibo = ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some("fluid mesh ibo"),
        contents: bytemuck::cast_slice(&mesh.indices),
        usage: wgpu::BufferUsages::INDEX,
    });

    log::debug!("uploaded mesh {:?} ({} vertices)", mesh.id(), vertices.len());
    GpuMesh { vbo, ibo, index_count: mesh.index_count() }
}

// ── GPU types ─────────────────────────────────────────────────────────────

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct MeshVertex {
    position: [f32; 3],
    normal: [f32; 3],
}

impl MeshVertex {
    const ATTRS: [wgpu::VertexAttribute; 2] = wgpu::vertex_attr_array![
        0 => Float32x3,
        1 => Float32x3
    ];

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<MeshVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

/// Uniform layout (304 bytes), mirrored by `Mesh` in transmission.wgsl.
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct MeshUniform {
    view_proj: [[f32; 4]; 4],
    model: [[f32; 4]; 4],
    normal_matrix: [[f32; 4]; 4],
    eye: [f32; 4],
    /// Offscreen buffer size in pixels, then its reciprocal.
    resolution: [f32; 4],
    /// ior, thickness, roughness, chromatic_aberration
    optics: [f32; 4],
    /// anisotropy, transmission, attenuation_distance (-1 = none), model_scale
    extra: [f32; 4],
    /// distortion, distortion_scale, temporal_distortion, time
    distortion: [f32; 4],
    attenuation_color: [f32; 4],
    color: [f32; 4],
}

impl MeshUniform {
    fn new(view: &RenderView, model: Mat4, m: &TransmissionParams, size: [f32; 2], time: f32) -> Self {
        let attenuation_distance = if m.attenuation_distance.is_finite() && m.attenuation_distance > 0.0 {
            m.attenuation_distance
        } else {
            -1.0
        };

        Self {
            view_proj: view.view_proj.to_cols_array_2d(),
            model: model.to_cols_array_2d(),
            normal_matrix: normal_matrix(model).to_cols_array_2d(),
            eye: view.eye.extend(1.0).to_array(),
            resolution: [size[0], size[1], 1.0 / size[0].max(1.0), 1.0 / size[1].max(1.0)],
            optics: [m.ior.max(1.0), m.thickness.max(0.0), m.roughness.clamp(0.0, 1.0), m.chromatic_aberration],
            extra: [m.anisotropy, m.transmission.clamp(0.0, 1.0), attenuation_distance, model_scale(model)],
            distortion: [m.distortion, m.distortion_scale, m.temporal_distortion, time],
            attenuation_color: m.attenuation_color.to_array(),
            color: m.color.to_array(),
        }
    }
}

/// Inverse-transpose of the model matrix; identity when singular.
fn normal_matrix(model: Mat4) -> Mat4 {
    if model.determinant().abs() <= f32::EPSILON {
        return Mat4::IDENTITY;
    }
    model.inverse().transpose()
}

/// Largest axis scale of `model`, applied to thickness as in object space.
fn model_scale(model: Mat4) -> f32 {
    let (scale, _, _) = model.to_scale_rotation_translation();
    scale.abs().max_element().max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{Quat, Vec3};

    #[test]
    fn uniform_matches_shader_layout() {
        assert_eq!(std::mem::size_of::<MeshUniform>(), 304);
        assert_eq!(UNIFORM_STRIDE, 512);
    }

    #[test]
    fn infinite_attenuation_is_encoded_as_negative() {
        let params = TransmissionParams::default();
        let u = MeshUniform::new(&RenderView::default(), Mat4::IDENTITY, &params, [100.0, 50.0], 0.0);
        assert_eq!(u.extra[2], -1.0);
        assert_eq!(u.resolution, [100.0, 50.0, 0.01, 0.02]);
    }

    #[test]
    fn ior_is_clamped_to_vacuum() {
        let params = TransmissionParams { ior: 0.5, ..Default::default() };
        let u = MeshUniform::new(&RenderView::default(), Mat4::IDENTITY, &params, [1.0, 1.0], 0.0);
        assert_eq!(u.optics[0], 1.0);
    }

    #[test]
    fn model_scale_is_largest_axis() {
        let model = Mat4::from_scale_rotation_translation(
            Vec3::new(0.15, 0.3, 0.15),
            Quat::from_rotation_x(std::f32::consts::FRAC_PI_2),
            Vec3::new(0.0, 0.0, 15.0),
        );
        assert!((model_scale(model) - 0.3).abs() < 1e-5);
    }

    #[test]
    fn singular_model_has_identity_normal_matrix() {
        assert_eq!(normal_matrix(Mat4::from_scale(Vec3::ZERO)), Mat4::IDENTITY);
    }
}
