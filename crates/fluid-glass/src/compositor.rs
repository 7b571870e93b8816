//! Two-target frame composition.
//!
//! The background list is drawn into the offscreen buffer, never into the
//! visible target. The visible target then gets the buffer as a backdrop, the
//! transmissive mesh sampling the same buffer, and the overlay on top.

use fluid_engine::paint::Color;
use fluid_engine::render::{
    BackdropRenderer,
    ImageRenderer,
    MeshRenderer,
    OffscreenBuffer,
    RenderCtx,
    RenderTarget,
    RenderView,
    TextRenderer,
};
use fluid_engine::scene::{DrawList, ImageId, PassTarget};
use fluid_engine::text::FontSystem;

use crate::overlay::NavTarget;

/// Draw lists of one frame.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Layer {
    Background,
    Backdrop,
    Foreground,
    Overlay,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum PassStep {
    Bind(PassTarget),
    /// Clears the bound target (and its depth, when it has one).
    Clear(Color),
    Draw(Layer),
}

/// Fixed per-frame order. Target rebinding is unconditional.
pub const FRAME_SCHEDULE: [PassStep; 8] = [
    PassStep::Bind(PassTarget::Offscreen),
    PassStep::Clear(Color::WHITE),
    PassStep::Draw(Layer::Background),
    PassStep::Bind(PassTarget::Visible),
    PassStep::Clear(Color::WHITE),
    PassStep::Draw(Layer::Backdrop),
    PassStep::Draw(Layer::Foreground),
    PassStep::Draw(Layer::Overlay),
];

/// Everything one tick produces: what to draw and the side effects to dispatch.
#[derive(Debug)]
pub struct FramePlan {
    pub view: RenderView,
    /// Seconds since start, for temporal distortion.
    pub time: f32,
    pub background: DrawList,
    pub foreground: DrawList,
    pub overlay: DrawList,
    /// Pointer is over a clickable nav label.
    pub hovered: bool,
    pub navigations: Vec<NavTarget>,
}

impl FramePlan {
    pub fn new(view: RenderView, time: f32) -> Self {
        Self {
            view,
            time,
            background: DrawList::new(PassTarget::Offscreen),
            foreground: DrawList::new(PassTarget::Visible),
            overlay: DrawList::new(PassTarget::Visible),
            hovered: false,
            navigations: Vec::new(),
        }
    }

    pub fn schedule(&self) -> &'static [PassStep] {
        &FRAME_SCHEDULE
    }

    /// Target the layer's list is tagged for. The backdrop has no list and reads the buffer.
    pub fn layer_target(&self, layer: Layer) -> PassTarget {
        match layer {
            Layer::Background => self.background.target(),
            Layer::Backdrop => PassTarget::Visible,
            Layer::Foreground => self.foreground.target(),
            Layer::Overlay => self.overlay.target(),
        }
    }
}

// ── GPU execution ─────────────────────────────────────────────────────────

/// Owns the offscreen buffer and the renderers, and runs [`FRAME_SCHEDULE`].
#[derive(Default)]
pub struct Compositor {
    offscreen: Option<OffscreenBuffer>,
    backdrop: BackdropRenderer,
    images: ImageRenderer,
    text: TextRenderer,
    mesh: MeshRenderer,
}

impl Compositor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers pixels for image commands. Upload is deferred to first use.
    pub fn add_image(&mut self, label: impl Into<String>, pixels: image::RgbaImage) -> ImageId {
        self.images.add_image(label, pixels)
    }

    pub fn render(
        &mut self,
        ctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
        plan: &mut FramePlan,
        fonts: &FontSystem,
    ) {
        let Self { offscreen, backdrop, images, text, mesh } = self;

        images.begin_frame();
        text.begin_frame();
        mesh.begin_frame();

        match offscreen.as_mut() {
            Some(buffer) => {
                if buffer.ensure_size(ctx.device, ctx.surface_format, ctx.viewport) {
                    let (w, h) = buffer.size();
                    log::info!("offscreen buffer resized to {w}x{h}");
                }
            }
            None => *offscreen = Some(OffscreenBuffer::for_viewport(ctx.device, ctx.surface_format, ctx.viewport)),
        }
        let Some(buffer) = offscreen.as_ref() else { return; };

        let mut bound = PassTarget::Visible;
        for step in FRAME_SCHEDULE {
            match step {
                PassStep::Bind(next) => bound = next,
                PassStep::Clear(color) => match bound {
                    PassTarget::Offscreen => target.retarget(buffer.view()).clear(color),
                    PassTarget::Visible => target.clear(color),
                },
                PassStep::Draw(Layer::Background) => {
                    let mut off = target.retarget(buffer.view());
                    images.render(ctx, &mut off, &mut plan.background, &plan.view);
                    text.render(ctx, &mut off, &mut plan.background, &plan.view, fonts);
                }
                PassStep::Draw(Layer::Backdrop) => backdrop.render(ctx, target, buffer),
                PassStep::Draw(Layer::Foreground) => {
                    mesh.render(ctx, target, &mut plan.foreground, &plan.view, buffer, plan.time);
                }
                PassStep::Draw(Layer::Overlay) => {
                    text.render(ctx, target, &mut plan.overlay, &plan.view, fonts);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn position(step: PassStep) -> usize {
        FRAME_SCHEDULE.iter().position(|s| *s == step).unwrap()
    }

    #[test]
    fn background_goes_offscreen_before_anything_visible() {
        let off = position(PassStep::Bind(PassTarget::Offscreen));
        let bg = position(PassStep::Draw(Layer::Background));
        let visible = position(PassStep::Bind(PassTarget::Visible));
        assert!(off < bg && bg < visible);
        assert!(visible < position(PassStep::Draw(Layer::Backdrop)));
    }

    #[test]
    fn every_bind_is_followed_by_a_white_clear() {
        for (i, step) in FRAME_SCHEDULE.iter().enumerate() {
            if matches!(step, PassStep::Bind(_)) {
                assert_eq!(FRAME_SCHEDULE[i + 1], PassStep::Clear(Color::WHITE));
            }
        }
    }

    #[test]
    fn empty_background_leaves_only_the_clear() {
        // Nothing between the offscreen clear and the rebind but the (empty) background list.
        let plan = FramePlan::new(RenderView::default(), 0.0);
        assert!(plan.background.is_empty());
        assert!(plan.foreground.is_empty() && plan.overlay.is_empty());
        assert_eq!(plan.background.target(), PassTarget::Offscreen);
        let clear = position(PassStep::Bind(PassTarget::Offscreen)) + 1;
        let rebind = position(PassStep::Bind(PassTarget::Visible));
        assert_eq!(&FRAME_SCHEDULE[clear..rebind], &[
            PassStep::Clear(Color::WHITE),
            PassStep::Draw(Layer::Background),
        ]);
    }

    #[test]
    fn mesh_draws_before_overlay() {
        assert!(position(PassStep::Draw(Layer::Foreground)) < position(PassStep::Draw(Layer::Overlay)));
    }

    #[test]
    fn lists_are_tagged_by_target() {
        let plan = FramePlan::new(RenderView::default(), 0.0);
        assert_eq!(plan.layer_target(Layer::Background), PassTarget::Offscreen);
        assert_eq!(plan.layer_target(Layer::Foreground), PassTarget::Visible);
        assert_eq!(plan.layer_target(Layer::Overlay), PassTarget::Visible);
        assert_eq!(plan.schedule().len(), FRAME_SCHEDULE.len());
    }
}
