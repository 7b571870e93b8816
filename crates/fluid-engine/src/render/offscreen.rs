use std::sync::atomic::{AtomicU64, Ordering};

use crate::coords::Viewport;

static NEXT_GENERATION: AtomicU64 = AtomicU64::new(1);

/// Offscreen color buffer the background layer is rendered into each frame.
///
/// Sized to the drawable in physical pixels and sharing the surface format, so
/// every pipeline built for the surface can also target it. Each (re)allocation
/// gets a fresh generation; consumers rebuild bind groups when it changes.
pub struct OffscreenBuffer {
    texture: wgpu::Texture,
    view: wgpu::TextureView,
    format: wgpu::TextureFormat,
    size: (u32, u32),
    generation: u64,
}

impl OffscreenBuffer {
    pub fn new(device: &wgpu::Device, format: wgpu::TextureFormat, size: (u32, u32)) -> Self {
        let (texture, view) = create_color_texture(device, format, size);
        let generation = NEXT_GENERATION.fetch_add(1, Ordering::Relaxed);
        log::debug!("offscreen buffer {}x{} allocated (generation {generation})", size.0, size.1);
        Self { texture, view, format, size, generation }
    }

    /// Creates a buffer matching `viewport` in physical pixels.
    #[inline]
    pub fn for_viewport(device: &wgpu::Device, format: wgpu::TextureFormat, viewport: Viewport) -> Self {
        Self::new(device, format, viewport.physical_size())
    }

    /// Reallocates when the viewport's physical size or the format changed.
    ///
    /// A degenerate viewport keeps the current allocation. Returns `true` when
    /// the texture was replaced.
    pub fn ensure_size(&mut self, device: &wgpu::Device, format: wgpu::TextureFormat, viewport: Viewport) -> bool {
        if !viewport.is_valid() {
            return false;
        }
        let size = viewport.physical_size();
        if size == self.size && format == self.format {
            return false;
        }
        *self = Self::new(device, format, size);
        true
    }

    #[inline]
    pub fn view(&self) -> &wgpu::TextureView {
        &self.view
    }

    #[inline]
    pub fn texture(&self) -> &wgpu::Texture {
        &self.texture
    }

    #[inline]
    pub fn size(&self) -> (u32, u32) {
        self.size
    }

    #[inline]
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

impl Drop for OffscreenBuffer {
    fn drop(&mut self) {
        log::debug!("offscreen buffer released (generation {})", self.generation);
    }
}

fn create_color_texture(
    device: &wgpu::Device,
    format: wgpu::TextureFormat,
    (width, height): (u32, u32),
) -> (wgpu::Texture, wgpu::TextureView) {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("fluid offscreen buffer"),
        size: wgpu::Extent3d {
            width: width.max(1),
            height: height.max(1),
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
        view_formats: &[],
    });
    let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
    (texture, view)
}
