//! GPU rendering subsystem.
//!
//! Renderers consume `scene` draw streams and issue GPU commands via wgpu.
//! Each renderer owns its GPU resources (pipelines, buffers) and begins its
//! own render pass with `LoadOp::Load`.
//!
//! Convention:
//! - geometry is in world units (+Y up), projected with a [`RenderView`]
//! - every pipeline targets the surface format; the offscreen buffer shares it

mod backdrop;
mod common;
mod ctx;
mod image;
mod mesh;
mod offscreen;
mod text;

pub use backdrop::BackdropRenderer;
pub use common::RenderView;
pub use ctx::{RenderCtx, RenderTarget};
pub use self::image::ImageRenderer;
pub use mesh::MeshRenderer;
pub use offscreen::OffscreenBuffer;
pub use text::TextRenderer;
