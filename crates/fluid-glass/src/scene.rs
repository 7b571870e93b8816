//! The per-frame tick: inputs in, [`FramePlan`] out.

use fluid_engine::coords::{Vec2, Viewport};
use fluid_engine::paint::Color;
use fluid_engine::scene::{ImageId, TextCmd, ZIndex};
use fluid_engine::text::{FontId, FontSystem};

use crate::compositor::FramePlan;
use crate::config::ConfigHandle;
use crate::controller::MeshController;
use crate::geometry::GeometryProvider;
use crate::mode::ModeConfig;
use crate::overlay::headline::headline;
use crate::overlay::nav::NAV_COLOR;
use crate::overlay::{NavLabel, NavTarget, SCROLL_IMAGES, hit_test, layout_images, layout_nav};
use crate::scroll::ScrollState;
use crate::viewport::{Camera, ViewportClass, ViewportState, pointer_ndc};

/// Everything a tick reads from the outside world.
#[derive(Debug, Clone, Copy)]
pub struct FrameInputs<'a> {
    pub dt: f32,
    pub elapsed: f32,
    pub screen: Viewport,
    /// Logical pixels; `None` while the pointer is outside the window.
    pub pointer_px: Option<Vec2>,
    /// Page pixels; positive scrolls down.
    pub wheel: Vec2,
    pub clicks: &'a [Vec2],
}

pub struct GlassScene {
    config: ConfigHandle,
    geometry: Box<dyn GeometryProvider>,
    camera: Camera,
    mode_config: ModeConfig,
    controller: MeshController,
    scroll: ScrollState,
    /// One slot per entry of [`SCROLL_IMAGES`]; `None` draws nothing.
    images: Vec<Option<ImageId>>,
    font: Option<FontId>,
    /// Last known pointer; kept while the pointer is outside the window.
    pointer: Vec2,
    class: Option<ViewportClass>,
}

impl GlassScene {
    pub fn new(config: ConfigHandle, geometry: Box<dyn GeometryProvider>) -> Self {
        let mode_config = ModeConfig::for_mode(config.mode());
        Self {
            config,
            geometry,
            camera: Camera::default(),
            mode_config,
            controller: MeshController::new(),
            scroll: ScrollState::default(),
            images: vec![None; SCROLL_IMAGES.len()],
            font: None,
            pointer: Vec2::ZERO,
            class: None,
        }
    }

    pub fn set_font(&mut self, font: Option<FontId>) {
        self.font = font;
    }

    pub fn set_image(&mut self, index: usize, image: ImageId) {
        if let Some(slot) = self.images.get_mut(index) {
            *slot = Some(image);
        }
    }

    pub fn config(&self) -> &ConfigHandle {
        &self.config
    }

    pub fn scroll_mut(&mut self) -> &mut ScrollState {
        &mut self.scroll
    }

    pub fn tick(&mut self, inputs: &FrameInputs<'_>, fonts: &FontSystem) -> FramePlan {
        let config = self.config.snapshot();
        if self.mode_config.mode != config.mode {
            self.mode_config = ModeConfig::for_mode(config.mode);
        }

        if let Some(px) = inputs.pointer_px {
            self.pointer = pointer_ndc(px, inputs.screen);
        }
        let viewport = ViewportState::new(&self.camera, inputs.screen, self.pointer);
        if self.class != Some(viewport.class) {
            log::debug!("viewport class {:?} at {}px", viewport.class, inputs.screen.width);
            self.class = Some(viewport.class);
        }

        if inputs.wheel.y != 0.0 {
            self.scroll.scroll_by(inputs.wheel.y, inputs.screen.height);
        }
        self.scroll.tick(inputs.dt);

        let mut plan = FramePlan::new(self.camera.render_view(inputs.screen.aspect()), inputs.elapsed);

        // ── background ──
        let lift = self.scroll.group_offset(viewport.content.y);
        for placement in layout_images(&SCROLL_IMAGES, viewport.content.y, viewport.class.compact, &self.scroll, lift) {
            let Some(Some(image)) = self.images.get(placement.index) else { continue; };
            plan.background.push_image(
                ZIndex::from_depth(placement.center.z),
                *image,
                placement.center,
                placement.size,
                placement.zoom,
            );
        }
        let title = headline(self.font, viewport.class.compact, lift);
        plan.background.push_text(ZIndex::from_depth(title.position.z), title);

        // ── foreground ──
        let props = config.props(config.mode);
        if let Some(frame) = self.controller.tick(
            &self.mode_config,
            &props.material,
            self.geometry.as_ref(),
            &viewport,
            inputs.dt,
        ) {
            let z = ZIndex::from_depth(frame.transform.position.z);
            let model = frame.model();
            plan.foreground.push_mesh(z, frame.mesh, model, frame.material);
        }

        // ── overlay ──
        if self.mode_config.shows_nav {
            let labels = layout_nav(&config.nav_items(), &viewport);
            self.dispatch_nav(&labels, inputs, fonts, &mut plan);
            let color = Color::from_hex(NAV_COLOR).unwrap_or(Color::BLACK);
            for label in labels {
                let cmd = TextCmd::new(label.label, self.font, label.font_size, color, label.position);
                plan.overlay.push_text(ZIndex::from_depth(label.position.z), cmd);
            }
        }

        plan
    }

    fn dispatch_nav(&self, labels: &[NavLabel], inputs: &FrameInputs<'_>, fonts: &FontSystem, plan: &mut FramePlan) {
        let font = self.font;
        let measure = |text: &str, em: f32| match font {
            Some(id) => fonts.measure(text, id, em, 0.0, 48.0),
            None => Vec2::new(text.chars().count() as f32 * 0.6 * em, 1.2 * em),
        };

        if let Some(px) = inputs.pointer_px {
            plan.hovered = hit_test(labels, &self.camera, inputs.screen, px, measure).is_some();
        }
        for click in inputs.clicks {
            let Some(index) = hit_test(labels, &self.camera, inputs.screen, *click, measure) else { continue; };
            if let Some(target) = NavTarget::from_link(&labels[index].link) {
                plan.navigations.push(target);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use fluid_engine::scene::{DrawCmd, PassTarget};

    use super::*;
    use crate::compositor::Compositor;
    use crate::config::GlassConfig;
    use crate::geometry::BuiltinGeometry;
    use crate::mode::Mode;
    use crate::overlay::NavItem;
    use crate::overlay::images::placeholder;

    fn inputs(clicks: &[Vec2]) -> FrameInputs<'_> {
        FrameInputs {
            dt: 1.0 / 60.0,
            elapsed: 0.0,
            screen: Viewport::new(1280.0, 800.0),
            pointer_px: None,
            wheel: Vec2::ZERO,
            clicks,
        }
    }

    fn scene(config: GlassConfig) -> GlassScene {
        GlassScene::new(ConfigHandle::new(config), Box::new(BuiltinGeometry::new()))
    }

    #[test]
    fn lens_frame_has_mesh_and_headline_but_no_nav() {
        let mut scene = scene(GlassConfig::default());
        let plan = scene.tick(&inputs(&[]), &FontSystem::new());
        assert_eq!(plan.foreground.len(), 1);
        assert_eq!(plan.background.len(), 1);
        assert!(plan.overlay.is_empty());
    }

    #[test]
    fn background_without_images_holds_only_the_headline_each_frame() {
        let mut scene = scene(GlassConfig::default());
        for _ in 0..3 {
            let plan = scene.tick(&inputs(&[]), &FontSystem::new());
            assert_eq!(plan.background.target(), PassTarget::Offscreen);
            assert_eq!(plan.background.len(), 1);
            assert!(matches!(plan.background.items()[0].cmd, DrawCmd::Text(_)));
        }
    }

    #[test]
    fn registered_images_land_in_background() {
        let mut compositor = Compositor::new();
        let mut scene = scene(GlassConfig::default());
        scene.set_image(0, compositor.add_image("first", placeholder(0)));
        scene.set_image(4, compositor.add_image("last", placeholder(4)));
        scene.set_image(99, compositor.add_image("ignored", placeholder(1)));
        let plan = scene.tick(&inputs(&[]), &FontSystem::new());
        let images = plan.background.items().iter().filter(|i| matches!(i.cmd, DrawCmd::Image(_))).count();
        assert_eq!(images, 2);
    }

    #[test]
    fn bar_mode_shows_nav_labels() {
        let mut scene = scene(GlassConfig { mode: Mode::Bar, ..GlassConfig::default() });
        let plan = scene.tick(&inputs(&[]), &FontSystem::new());
        assert_eq!(plan.overlay.len(), 3);
    }

    #[test]
    fn host_mode_switch_applies_next_tick() {
        let mut scene = scene(GlassConfig::default());
        scene.tick(&inputs(&[]), &FontSystem::new());
        scene.config().set_mode(Mode::Bar);
        let plan = scene.tick(&inputs(&[]), &FontSystem::new());
        assert_eq!(plan.overlay.len(), 3);
        let DrawCmd::Mesh(mesh) = &plan.foreground.items()[0].cmd else { panic!("expected mesh") };
        assert_eq!(mesh.material.ior, 1.15);
    }

    #[test]
    fn clicking_a_label_dispatches_its_link() {
        let mut config = GlassConfig { mode: Mode::Bar, ..GlassConfig::default() };
        config.bar_props.nav_items = Some(vec![NavItem::new("Home", ""), NavItem::new("Work", "#work")]);
        let mut scene = scene(config);

        let camera = Camera::default();
        let screen = Viewport::new(1280.0, 800.0);
        let vp = ViewportState::new(&camera, screen, Vec2::ZERO);
        let labels = layout_nav(&scene.config().snapshot().nav_items(), &vp);
        let home = camera.project(labels[0].position, screen).unwrap();
        let work = camera.project(labels[1].position, screen).unwrap();

        let clicks = [home, work];
        let plan = scene.tick(&inputs(&clicks), &FontSystem::new());
        assert_eq!(plan.navigations, vec![NavTarget::Anchor("#work".into())]);
    }

    #[test]
    fn wheel_lifts_the_scroll_group() {
        let mut scene = scene(GlassConfig::default());
        let rest = scene.tick(&inputs(&[]), &FontSystem::new());
        let DrawCmd::Text(before) = &rest.background.items()[0].cmd else { panic!("expected headline") };
        let before = before.position;

        let mut scrolled = inputs(&[]);
        scrolled.wheel = Vec2::new(0.0, 400.0);
        scrolled.dt = 0.25;
        let plan = scene.tick(&scrolled, &FontSystem::new());
        let DrawCmd::Text(after) = &plan.background.items()[0].cmd else { panic!("expected headline") };
        assert!(after.position.y > before.y);
        assert_eq!(after.position.x, 0.0);
    }
}
