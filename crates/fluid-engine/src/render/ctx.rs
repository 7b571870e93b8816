use crate::coords::Viewport;
use crate::paint::Color;

/// Renderer-facing context: device/queue, target format and logical viewport.
pub struct RenderCtx<'a> {
    pub device: &'a wgpu::Device,
    pub queue: &'a wgpu::Queue,
    /// Format shared by the surface and the offscreen buffer.
    pub surface_format: wgpu::TextureFormat,
    /// Logical viewport plus the scale factor to physical pixels.
    pub viewport: Viewport,
}

impl<'a> RenderCtx<'a> {
    #[inline]
    pub fn new(
        device: &'a wgpu::Device,
        queue: &'a wgpu::Queue,
        surface_format: wgpu::TextureFormat,
        viewport: Viewport,
    ) -> Self {
        Self {
            device,
            queue,
            surface_format,
            viewport,
        }
    }
}

/// Target for drawing: encoder, color view and optional depth view.
pub struct RenderTarget<'a> {
    pub encoder: &'a mut wgpu::CommandEncoder,
    pub color_view: &'a wgpu::TextureView,
    pub depth_view: Option<&'a wgpu::TextureView>,
}

impl<'a> RenderTarget<'a> {
    #[inline]
    pub fn new(
        encoder: &'a mut wgpu::CommandEncoder,
        color_view: &'a wgpu::TextureView,
        depth_view: Option<&'a wgpu::TextureView>,
    ) -> Self {
        Self { encoder, color_view, depth_view }
    }

    /// Re-targets the same encoder at another color view (no depth).
    #[inline]
    pub fn retarget<'b>(&'b mut self, color_view: &'b wgpu::TextureView) -> RenderTarget<'b> {
        RenderTarget {
            encoder: &mut *self.encoder,
            color_view,
            depth_view: None,
        }
    }

    /// Clears color to `color` and depth (when present) to the far plane.
    pub fn clear(&mut self, color: Color) {
        let depth_stencil_attachment = self.depth_view.map(|view| wgpu::RenderPassDepthStencilAttachment {
            view,
            depth_ops: Some(wgpu::Operations {
                load: wgpu::LoadOp::Clear(1.0),
                store: wgpu::StoreOp::Store,
            }),
            stencil_ops: None,
        });

        let _rpass = self.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("fluid clear"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: self.color_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(color.to_wgpu()),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });
    }

    /// Color attachment that keeps prior contents.
    ///
    /// Borrows only the color view, so the encoder stays free for `begin_render_pass`.
    #[inline]
    pub(crate) fn load_color(&self) -> wgpu::RenderPassColorAttachment<'a> {
        wgpu::RenderPassColorAttachment {
            view: self.color_view,
            resolve_target: None,
            ops: wgpu::Operations {
                load: wgpu::LoadOp::Load,
                store: wgpu::StoreOp::Store,
            },
            depth_slice: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn load_pass(target: &mut RenderTarget<'_>) {
        let _rpass = target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("load"),
            color_attachments: &[Some(target.load_color())],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });
    }

    #[test]
    fn load_attachment_leaves_encoder_borrowable() {
        // Compiling `load_pass` is the check; no device is needed.
        let pass: fn(&mut RenderTarget<'_>) = load_pass;
        let _ = pass;
    }
}
