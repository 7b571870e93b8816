use std::path::PathBuf;

use fluid_engine::core::{App as EngineApp, AppControl, FrameCtx};
use fluid_engine::device::GpuInit;
use fluid_engine::input::{InputFrame, Key, WheelDelta};
use fluid_engine::text::{FontId, FontSystem};
use fluid_engine::window::{CursorIcon, Runtime, RuntimeConfig};
use winit::dpi::LogicalSize;

use crate::compositor::Compositor;
use crate::config::{ConfigHandle, GlassConfig};
use crate::geometry::{BuiltinGeometry, GeometryProvider};
use crate::mode::Mode;
use crate::overlay::NavTarget;
use crate::overlay::images::load_image;
use crate::overlay::SCROLL_IMAGES;
use crate::presets::Preset;
use crate::scene::{FrameInputs, GlassScene};

/// Navigation side-effect handler.
pub type NavigateFn = Box<dyn FnMut(&NavTarget)>;

// ── GlassApp ──────────────────────────────────────────────────────────────

/// Top-level builder: configure window, fonts, assets and handlers, then [`run`](Self::run).
///
/// ```rust,ignore
/// GlassApp::new()
///     .title("Fluid Glass")
///     .font("body", load_font())
///     .config(GlassConfig::showcase(1280.0))
///     .image_dir("assets/demo")
///     .on_navigate(|target| println!("{target:?}"))
///     .run()?;
/// ```
pub struct GlassApp {
    title:       String,
    width:       f64,
    height:      f64,
    fonts:       Vec<(String, Vec<u8>)>,
    image_dir:   Option<PathBuf>,
    geometry:    Box<dyn GeometryProvider>,
    on_navigate: Option<NavigateFn>,
    /// Created early so host code can hold on to it before `run`.
    config:      ConfigHandle,
}

impl GlassApp {
    pub fn new() -> Self {
        Self {
            title:       "Fluid Glass".to_string(),
            width:       1280.0,
            height:      800.0,
            fonts:       Vec::new(),
            image_dir:   None,
            geometry:    Box::new(BuiltinGeometry::new()),
            on_navigate: None,
            config:      ConfigHandle::default(),
        }
    }

    pub fn title(mut self, t: impl Into<String>) -> Self {
        self.title = t.into();
        self
    }

    /// Initial window size in logical pixels.
    pub fn size(mut self, width: f64, height: f64) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Registers a named font. The first one that loads is used for all text.
    pub fn font(mut self, name: impl Into<String>, data: Vec<u8>) -> Self {
        self.fonts.push((name.into(), data));
        self
    }

    /// Replaces the current config values. Handles taken earlier see the change.
    pub fn config(self, config: GlassConfig) -> Self {
        self.config.update(|cfg| *cfg = config);
        self
    }

    /// Shared config the running app reads every frame.
    pub fn config_handle(&self) -> ConfigHandle {
        self.config.clone()
    }

    /// Directory holding the parallax images. Missing files get placeholders.
    pub fn image_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.image_dir = Some(dir.into());
        self
    }

    pub fn geometry(mut self, provider: impl GeometryProvider + 'static) -> Self {
        self.geometry = Box::new(provider);
        self
    }

    pub fn on_navigate(mut self, f: impl FnMut(&NavTarget) + 'static) -> Self {
        self.on_navigate = Some(Box::new(f));
        self
    }

    /// Opens the window and blocks until it closes.
    pub fn run(self) -> anyhow::Result<()> {
        let config = RuntimeConfig {
            title:        self.title.clone(),
            initial_size: LogicalSize::new(self.width, self.height),
        };
        let state = GlassState::new(self);
        Runtime::run(config, GpuInit::default(), state)
    }
}

impl Default for GlassApp {
    fn default() -> Self {
        Self::new()
    }
}

// ── GlassState ────────────────────────────────────────────────────────────

/// Implements the engine app contract. Never exposed.
struct GlassState {
    scene:       GlassScene,
    fonts:       FontSystem,
    compositor:  Compositor,
    on_navigate: Option<NavigateFn>,
    /// Last cursor applied, so the window is only told about changes.
    hovering:    Option<bool>,
}

impl GlassState {
    fn new(app: GlassApp) -> Self {
        let mut fonts = FontSystem::new();
        let mut default_font: Option<FontId> = None;
        for (name, bytes) in &app.fonts {
            match fonts.load_font(bytes) {
                Ok(id) if default_font.is_none() => default_font = Some(id),
                Ok(_) => {}
                Err(err) => log::warn!("failed to load font '{name}': {err}"),
            }
        }
        if default_font.is_none() {
            log::warn!("no usable font registered, text will not render");
        }

        let mut compositor = Compositor::new();
        let mut scene = GlassScene::new(app.config, app.geometry);
        scene.set_font(default_font);
        for (index, image) in SCROLL_IMAGES.iter().enumerate() {
            let pixels = load_image(app.image_dir.as_deref(), image.file, index);
            scene.set_image(index, compositor.add_image(image.file, pixels));
        }

        Self {
            scene,
            fonts,
            compositor,
            on_navigate: app.on_navigate,
            hovering: None,
        }
    }

    fn handle_keys(&mut self, frame: &InputFrame, page_height: f32) -> AppControl {
        let config = self.scene.config().clone();
        for key in &frame.keys_pressed {
            match key {
                Key::Escape => return AppControl::Exit,
                Key::Digit(1) => config.set_mode(Mode::Lens),
                Key::Digit(2) => config.set_mode(Mode::Bar),
                Key::Digit(3) => config.set_mode(Mode::Cube),
                Key::Letter('r') => config.apply_preset(Preset::Reset),
                Key::Letter('e') => config.apply_preset(Preset::Extreme),
                Key::ArrowDown => self.scene.scroll_mut().scroll_by(WheelDelta::LINE_PX, page_height),
                Key::ArrowUp => self.scene.scroll_mut().scroll_by(-WheelDelta::LINE_PX, page_height),
                Key::PageDown | Key::Space => self.scene.scroll_mut().scroll_by(page_height * 0.9, page_height),
                Key::PageUp => self.scene.scroll_mut().scroll_by(-page_height * 0.9, page_height),
                Key::Home => self.scene.scroll_mut().set_target(0.0),
                Key::End => self.scene.scroll_mut().set_target(1.0),
                _ => {}
            }
        }
        AppControl::Continue
    }

    fn navigate(&mut self, target: NavTarget) {
        log::info!("navigate: {target:?}");
        if let Some(handler) = self.on_navigate.as_mut() {
            handler(&target);
        }
    }
}

impl EngineApp for GlassState {
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        let screen = ctx.window.viewport();

        if self.handle_keys(ctx.input_frame, screen.height) == AppControl::Exit {
            return AppControl::Exit;
        }

        let inputs = FrameInputs {
            dt:         ctx.time.dt,
            elapsed:    ctx.time.elapsed,
            screen,
            pointer_px: ctx.input.pointer_pos,
            wheel:      ctx.input_frame.wheel,
            clicks:     &ctx.input_frame.clicks,
        };
        let mut plan = self.scene.tick(&inputs, &self.fonts);

        if self.hovering != Some(plan.hovered) {
            ctx.window.set_cursor(if plan.hovered { CursorIcon::Pointer } else { CursorIcon::Default });
            self.hovering = Some(plan.hovered);
        }
        for target in std::mem::take(&mut plan.navigations) {
            self.navigate(target);
        }

        // ── Render ────────────────────────────────────────────────────────
        let compositor = &mut self.compositor;
        let fonts = &self.fonts;
        ctx.render(|rctx, target| compositor.render(rctx, target, &mut plan, fonts))
    }
}
