//! Shared GPU types and utilities used by all renderers.

use std::marker::PhantomData;
use std::ops::Range;

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};

use crate::render::RenderCtx;

// ── view ──────────────────────────────────────────────────────────────────

/// Camera inputs shared by every world-space renderer in a frame.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct RenderView {
    pub view_proj: Mat4,
    pub eye: Vec3,
}

impl Default for RenderView {
    fn default() -> Self {
        Self { view_proj: Mat4::IDENTITY, eye: Vec3::new(0.0, 0.0, 1.0) }
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub(super) struct ViewUniform {
    pub view_proj: [[f32; 4]; 4],
    pub eye: [f32; 4],
}

impl ViewUniform {
    pub(super) fn new(view: &RenderView) -> Self {
        Self {
            view_proj: view.view_proj.to_cols_array_2d(),
            eye: view.eye.extend(1.0).to_array(),
        }
    }
}

/// Minimum binding size for a uniform of type `T`.
#[inline]
pub(super) fn binding_size<T>() -> Option<wgpu::BufferSize> {
    wgpu::BufferSize::new(std::mem::size_of::<T>() as u64)
}

pub(super) fn uniform_entry(
    binding: u32,
    visibility: wgpu::ShaderStages,
    min_binding_size: Option<wgpu::BufferSize>,
    has_dynamic_offset: bool,
) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Uniform,
            has_dynamic_offset,
            min_binding_size,
        },
        count: None,
    }
}

pub(super) fn texture_entry(binding: u32) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::FRAGMENT,
        ty: wgpu::BindingType::Texture {
            sample_type: wgpu::TextureSampleType::Float { filterable: true },
            view_dimension: wgpu::TextureViewDimension::D2,
            multisampled: false,
        },
        count: None,
    }
}

pub(super) fn sampler_entry(binding: u32) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::FRAGMENT,
        ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
        count: None,
    }
}

pub(super) fn linear_clamp_sampler(device: &wgpu::Device, label: &str) -> wgpu::Sampler {
    device.create_sampler(&wgpu::SamplerDescriptor {
        label: Some(label),
        address_mode_u: wgpu::AddressMode::ClampToEdge,
        address_mode_v: wgpu::AddressMode::ClampToEdge,
        address_mode_w: wgpu::AddressMode::ClampToEdge,
        mag_filter: wgpu::FilterMode::Linear,
        min_filter: wgpu::FilterMode::Linear,
        mipmap_filter: wgpu::MipmapFilterMode::Nearest,
        ..Default::default()
    })
}

// ── blend ─────────────────────────────────────────────────────────────────

pub(super) fn premul_alpha_blend() -> wgpu::BlendState {
    wgpu::BlendState::PREMULTIPLIED_ALPHA_BLENDING
}

pub(super) fn triangle_list() -> wgpu::PrimitiveState {
    wgpu::PrimitiveState {
        topology: wgpu::PrimitiveTopology::TriangleList,
        strip_index_format: None,
        front_face: wgpu::FrontFace::Ccw,
        cull_mode: None,
        polygon_mode: wgpu::PolygonMode::Fill,
        unclipped_depth: false,
        conservative: false,
    }
}

// ── quad vertex ───────────────────────────────────────────────────────────

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub(super) struct QuadVertex {
    pub pos: [f32; 2], // 0..1
}

impl QuadVertex {
    const ATTRS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x2];

    pub(super) fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<QuadVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

pub(super) const QUAD_VERTICES: [QuadVertex; 4] = [
    QuadVertex { pos: [0.0, 0.0] },
    QuadVertex { pos: [1.0, 0.0] },
    QuadVertex { pos: [1.0, 1.0] },
    QuadVertex { pos: [0.0, 1.0] },
];

pub(super) const QUAD_INDICES: [u16; 6] = [0, 1, 2, 0, 2, 3];

// ── instance buffer ───────────────────────────────────────────────────────

/// Append-only per-frame instance buffer.
///
/// A renderer may run in several passes of one frame. `queue.write_buffer` calls
/// all land before the frame's commands execute, so each pass appends at its own
/// offset instead of overwriting the previous pass's instances.
pub(super) struct InstanceBuffer<T> {
    label: &'static str,
    buffer: Option<wgpu::Buffer>,
    capacity: usize,
    cursor: usize,
    _marker: PhantomData<T>,
}

impl<T: Pod> InstanceBuffer<T> {
    pub(super) fn new(label: &'static str) -> Self {
        Self { label, buffer: None, capacity: 0, cursor: 0, _marker: PhantomData }
    }

    /// Rewinds to the start of the buffer. Call once per frame.
    #[inline]
    pub(super) fn begin_frame(&mut self) {
        self.cursor = 0;
    }

    /// Uploads `instances` after the ones already written this frame and returns
    /// the instance range to draw.
    ///
    /// Growing replaces the buffer; earlier passes keep the old one alive
    /// through their recorded commands.
    pub(super) fn append(&mut self, ctx: &RenderCtx<'_>, instances: &[T]) -> Option<Range<u32>> {
        if instances.is_empty() {
            return None;
        }

        let required = self.cursor + instances.len();
        if required > self.capacity || self.buffer.is_none() {
            let new_cap = required.next_power_of_two().max(64);
            self.buffer = Some(ctx.device.create_buffer(&wgpu::BufferDescriptor {
                label: Some(self.label),
                size: (new_cap * std::mem::size_of::<T>()) as u64,
                usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            }));
            self.capacity = new_cap;
            self.cursor = 0;
        }

        let buffer = self.buffer.as_ref()?;
        let start = self.cursor;
        ctx.queue.write_buffer(
            buffer,
            (start * std::mem::size_of::<T>()) as u64,
            bytemuck::cast_slice(instances),
        );
        self.cursor = start + instances.len();

        Some(start as u32..self.cursor as u32)
    }

    #[inline]
    pub(super) fn buffer(&self) -> Option<&wgpu::Buffer> {
        self.buffer.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn view_uniform_is_column_major() {
        let view = RenderView {
            view_proj: Mat4::from_translation(Vec3::new(1.0, 2.0, 3.0)),
            eye: Vec3::new(0.0, 0.0, 20.0),
        };
        let u = ViewUniform::new(&view);
        assert_eq!(u.view_proj[3], [1.0, 2.0, 3.0, 1.0]);
        assert_eq!(u.eye, [0.0, 0.0, 20.0, 1.0]);
    }

    #[test]
    fn binding_sizes_are_non_zero() {
        assert_eq!(binding_size::<ViewUniform>().map(|s| s.get()), Some(80));
    }
}
