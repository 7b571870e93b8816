//! Drives the transmissive mesh: target transform, damped follow and auto-fit.

use std::collections::HashSet;
use std::f32::consts::FRAC_PI_2;
use std::sync::Arc;

use fluid_engine::geometry::MeshData;
use fluid_engine::scene::TransmissionParams;
use glam::{Mat4, Quat, Vec3};

use crate::damp::damp3;
use crate::geometry::GeometryProvider;
use crate::material::{MaterialParams, log_passthrough_once};
use crate::mode::{Mode, ModeConfig};
use crate::viewport::{GLASS_DEPTH, ViewportClass, ViewportState};

/// Position follow half-life, in seconds.
pub const FOLLOW_HALF_LIFE: f32 = 0.15;
/// Distance from the bottom edge for bottom-locked modes, in world units.
pub const BOTTOM_MARGIN: f32 = 0.2;
/// Auto-fit keeps the mesh within this share of the visible width.
pub const FIT_FRACTION: f32 = 0.9;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct MeshTransform {
    pub position: Vec3,
    pub scale: f32,
    pub rotation: Quat,
}

impl MeshTransform {
    pub fn model(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(Vec3::splat(self.scale), self.rotation, self.position)
    }
}

/// Scale used when no explicit scale is set and auto-fit has nothing to go on.
pub fn device_default_scale(class: ViewportClass) -> f32 {
    if class.compact { 0.18 } else { 0.15 }
}

/// Where the mesh wants to be this frame.
pub fn target_position(config: &ModeConfig, viewport: &ViewportState) -> Vec3 {
    let follow = config.follow_pointer && !viewport.class.compact;
    let half = viewport.world * 0.5;
    let x = if follow { viewport.pointer.x * half.x } else { 0.0 };
    let y = if config.lock_to_bottom {
        -half.y + BOTTOM_MARGIN
    } else if follow {
        viewport.pointer.y * half.y
    } else {
        0.0
    };
    Vec3::new(x, y, GLASS_DEPTH)
}

/// Explicit scale verbatim, else the device default capped to fit the width.
pub fn resolve_scale(explicit: Option<f32>, native_width: Option<f32>, viewport: &ViewportState) -> f32 {
    if let Some(scale) = explicit {
        return scale;
    }
    let default = device_default_scale(viewport.class);
    match native_width {
        Some(g) if g > 0.0 && g.is_finite() => default.min(FIT_FRACTION * viewport.world.x / g),
        _ => default,
    }
}

/// What the mesh pass draws this frame.
#[derive(Debug, Clone)]
pub struct MeshFrame {
    pub mesh: Arc<MeshData>,
    pub transform: MeshTransform,
    pub material: TransmissionParams,
}

impl MeshFrame {
    #[inline]
    pub fn model(&self) -> Mat4 {
        self.transform.model()
    }
}

/// Per-activation state of the foreground mesh.
#[derive(Debug, Default)]
pub struct MeshController {
    active: Option<Mode>,
    transform: Option<MeshTransform>,
    /// Measured once per activation, after the geometry first resolves.
    native_width: Option<f32>,
    warned_missing: bool,
    seen_passthrough: HashSet<String>,
}

impl MeshController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active_mode(&self) -> Option<Mode> {
        self.active
    }

    pub fn transform(&self) -> Option<MeshTransform> {
        self.transform
    }

    /// Advances one frame. `None` skips the mesh draw (geometry not loaded).
    pub fn tick(
        &mut self,
        config: &ModeConfig,
        overrides: &MaterialParams,
        geometry: &dyn GeometryProvider,
        viewport: &ViewportState,
        dt: f32,
    ) -> Option<MeshFrame> {
        if self.active != Some(config.mode) {
            self.activate(config.mode);
        }

        let Some(mesh) = geometry.mesh(config.geometry) else {
            if !self.warned_missing {
                log::warn!(
                    "geometry {}#{} not available, skipping mesh",
                    config.geometry.asset,
                    config.geometry.node
                );
                self.warned_missing = true;
            }
            return None;
        };

        if self.native_width.is_none() {
            let width = mesh.bounds().map(|b| b.size().x).unwrap_or(0.0);
            log::debug!("native width of {}#{}: {width}", config.geometry.asset, config.geometry.node);
            self.native_width = Some(width);
        }

        let params = MaterialParams::layered([&config.defaults, overrides]);
        log_passthrough_once(&params, &mut self.seen_passthrough);

        let target = target_position(config, viewport);
        let scale = resolve_scale(params.scale(), self.native_width, viewport);
        let rotation = Quat::from_rotation_x(FRAC_PI_2);

        let position = match self.transform {
            Some(t) => damp3(t.position, target, FOLLOW_HALF_LIFE, dt),
            None => target,
        };
        let transform = MeshTransform { position, scale, rotation };
        self.transform = Some(transform);

        Some(MeshFrame { mesh, transform, material: params.to_transmission() })
    }

    fn activate(&mut self, mode: Mode) {
        if let Some(prev) = self.active {
            log::info!("mode switch: {prev} -> {mode}");
        } else {
            log::info!("mode: {mode}");
        }
        *self = Self { active: Some(mode), ..Self::default() };
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use fluid_engine::coords::{Vec2, Viewport};

    use super::*;
    use crate::geometry::{BuiltinGeometry, cuboid};
    use crate::mode::GeometryRef;
    use crate::viewport::Camera;

    fn viewport(width: f32, pointer: Vec2) -> ViewportState {
        ViewportState::new(&Camera::default(), Viewport::new(width, 800.0), pointer)
    }

    #[test]
    fn follows_pointer_on_wide_screens() {
        let vp = viewport(1280.0, Vec2::new(1.0, -0.5));
        let target = target_position(&ModeConfig::for_mode(Mode::Lens), &vp);
        assert!((target.x - vp.world.x / 2.0).abs() < 1e-5);
        assert!((target.y + vp.world.y / 4.0).abs() < 1e-5);
        assert_eq!(target.z, GLASS_DEPTH);
    }

    #[test]
    fn compact_layout_centers() {
        let vp = viewport(600.0, Vec2::new(1.0, 1.0));
        assert_eq!(target_position(&ModeConfig::for_mode(Mode::Cube), &vp), Vec3::new(0.0, 0.0, GLASS_DEPTH));
    }

    #[test]
    fn bar_locks_to_bottom() {
        let vp = viewport(1280.0, Vec2::new(0.7, 0.7));
        let target = target_position(&ModeConfig::for_mode(Mode::Bar), &vp);
        assert_eq!(target.x, 0.0);
        assert!((target.y - (-vp.world.y / 2.0 + BOTTOM_MARGIN)).abs() < 1e-5);
    }

    #[test]
    fn auto_fit_respects_width_and_default() {
        for width in [320.0, 500.0, 700.0, 1024.0, 1920.0] {
            let vp = viewport(width, Vec2::ZERO);
            for g in [0.5, 2.0, 20.0, 80.0] {
                let scale = resolve_scale(None, Some(g), &vp);
                assert!(scale * g <= FIT_FRACTION * vp.world.x + 1e-5);
                assert!(scale <= device_default_scale(vp.class));
            }
        }
    }

    #[test]
    fn explicit_scale_is_verbatim() {
        let vp = viewport(1280.0, Vec2::ZERO);
        assert_eq!(resolve_scale(Some(3.0), Some(20.0), &vp), 3.0);
    }

    #[test]
    fn zero_native_width_uses_device_default() {
        let vp = viewport(500.0, Vec2::ZERO);
        assert_eq!(resolve_scale(None, Some(0.0), &vp), 0.18);
        assert_eq!(resolve_scale(None, None, &vp), 0.18);
    }

    #[test]
    fn first_frame_snaps_then_damps() {
        let geometry = BuiltinGeometry::new();
        let cfg = ModeConfig::for_mode(Mode::Lens);
        let mut ctl = MeshController::new();

        let first = ctl.tick(&cfg, &MaterialParams::new(), &geometry, &viewport(1280.0, Vec2::ONE), 0.016).unwrap();
        assert_eq!(first.transform.position, target_position(&cfg, &viewport(1280.0, Vec2::ONE)));

        let vp = viewport(1280.0, Vec2::ZERO);
        let before = first.transform.position;
        let next = ctl.tick(&cfg, &MaterialParams::new(), &geometry, &vp, 0.016).unwrap();
        let target = target_position(&cfg, &vp);
        assert!((target - next.transform.position).length() < (target - before).length());
        assert!(next.transform.position != target);
    }

    #[test]
    fn scale_applies_without_damping() {
        let geometry = BuiltinGeometry::new();
        let cfg = ModeConfig::for_mode(Mode::Lens);
        let vp = viewport(1280.0, Vec2::ZERO);
        let mut ctl = MeshController::new();
        ctl.tick(&cfg, &MaterialParams::new().with("scale", 0.25), &geometry, &vp, 0.016);
        let frame = ctl.tick(&cfg, &MaterialParams::new().with("scale", 0.6), &geometry, &vp, 0.016).unwrap();
        assert_eq!(frame.transform.scale, 0.6);
    }

    #[test]
    fn mode_switch_replaces_parameters_next_frame() {
        let geometry = BuiltinGeometry::new();
        let vp = viewport(1280.0, Vec2::ZERO);
        let mut ctl = MeshController::new();

        let bar = ctl.tick(&ModeConfig::for_mode(Mode::Bar), &MaterialParams::new(), &geometry, &vp, 0.016).unwrap();
        assert_eq!(bar.material.ior, 1.15);
        assert_eq!(bar.material.attenuation_distance, 0.25);

        let lens = ctl.tick(&ModeConfig::for_mode(Mode::Lens), &MaterialParams::new(), &geometry, &vp, 0.016).unwrap();
        assert_eq!(ctl.active_mode(), Some(Mode::Lens));
        assert_eq!(lens.material.ior, 1.05);
        assert!(lens.material.attenuation_distance.is_infinite());
        // Fresh activation snaps to the new target instead of damping from the bar.
        assert_eq!(lens.transform.position, target_position(&ModeConfig::for_mode(Mode::Lens), &vp));
    }

    #[test]
    fn missing_geometry_skips_the_draw() {
        let empty: HashMap<GeometryRef, Arc<MeshData>> = HashMap::new();
        let vp = viewport(1280.0, Vec2::ZERO);
        let mut ctl = MeshController::new();
        let cfg = ModeConfig::for_mode(Mode::Cube);
        assert!(ctl.tick(&cfg, &MaterialParams::new(), &empty, &vp, 0.016).is_none());
        assert!(ctl.transform().is_none());

        let mut loaded = HashMap::new();
        loaded.insert(cfg.geometry, Arc::new(cuboid(Vec3::ONE)));
        let frame = ctl.tick(&cfg, &MaterialParams::new(), &loaded, &vp, 0.016).unwrap();
        assert_eq!(frame.transform.position, target_position(&cfg, &vp));
    }

    #[test]
    fn native_width_is_measured_once() {
        let cfg = ModeConfig::for_mode(Mode::Cube);
        let vp = viewport(1280.0, Vec2::ZERO);
        let mut ctl = MeshController::new();

        let mut provider = HashMap::new();
        provider.insert(cfg.geometry, Arc::new(cuboid(Vec3::splat(100.0))));
        let first = ctl.tick(&cfg, &MaterialParams::new(), &provider, &vp, 0.016).unwrap();

        provider.insert(cfg.geometry, Arc::new(cuboid(Vec3::splat(0.01))));
        let swapped = ctl.tick(&cfg, &MaterialParams::new(), &provider, &vp, 0.016).unwrap();
        assert_eq!(first.transform.scale, swapped.transform.scale);
    }
}
