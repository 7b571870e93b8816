//! Camera, device classification and the per-frame viewport snapshot.

use fluid_engine::coords::{Vec2, Viewport};
use fluid_engine::render::RenderView;
use glam::{Mat4, Vec3};

/// Depth plane the glass object lives on.
pub const GLASS_DEPTH: f32 = 15.0;

// ── device classification ─────────────────────────────────────────────────

/// Breakpoint class of the window width (logical px).
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum DeviceClass {
    Mobile,
    Tablet,
    Desktop,
}

/// Shared classification of the window width.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct ViewportClass {
    pub device: DeviceClass,
    /// Narrow layout (≤ 768 px): pointer following off, tighter images and type.
    pub compact: bool,
}

impl ViewportClass {
    pub const MOBILE_MAX: f32 = 639.0;
    pub const TABLET_MAX: f32 = 1023.0;
    pub const COMPACT_MAX: f32 = 768.0;

    /// The one place window widths are mapped to layout classes.
    pub fn classify(width: f32) -> Self {
        let device = if width <= Self::MOBILE_MAX {
            DeviceClass::Mobile
        } else if width <= Self::TABLET_MAX {
            DeviceClass::Tablet
        } else {
            DeviceClass::Desktop
        };
        Self { device, compact: width <= Self::COMPACT_MAX }
    }
}

// ── camera ────────────────────────────────────────────────────────────────

/// Perspective camera looking down -Z.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Camera {
    pub position: Vec3,
    /// Vertical field of view in degrees.
    pub fov_y: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self { position: Vec3::new(0.0, 0.0, 20.0), fov_y: 15.0, near: 0.1, far: 1000.0 }
    }
}

impl Camera {
    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.position - Vec3::Z, Vec3::Y)
    }

    pub fn projection(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh(self.fov_y.to_radians(), aspect.max(1e-4), self.near, self.far)
    }

    pub fn render_view(&self, aspect: f32) -> RenderView {
        RenderView { view_proj: self.projection(aspect) * self.view(), eye: self.position }
    }

    /// Visible world extent on the plane `z = depth`.
    pub fn world_size_at(&self, depth: f32, aspect: f32) -> Vec2 {
        let distance = (self.position.z - depth).abs();
        let height = 2.0 * distance * (self.fov_y.to_radians() * 0.5).tan();
        Vec2::new(height * aspect, height)
    }

    /// Projects a world point to logical pixels (origin top-left). `None` behind the camera.
    pub fn project(&self, world: Vec3, screen: Viewport) -> Option<Vec2> {
        let clip = self.render_view(screen.aspect()).view_proj * world.extend(1.0);
        if clip.w <= 0.0 {
            return None;
        }
        let ndc = clip.truncate() / clip.w;
        Some(Vec2::new(
            (ndc.x * 0.5 + 0.5) * screen.width,
            (0.5 - ndc.y * 0.5) * screen.height,
        ))
    }

    /// Logical pixels per world unit on the plane `z = depth`.
    pub fn pixels_per_unit(&self, depth: f32, screen: Viewport) -> f32 {
        let world = self.world_size_at(depth, screen.aspect());
        if world.y > 0.0 { screen.height / world.y } else { 0.0 }
    }
}

// ── viewport state ────────────────────────────────────────────────────────

/// Pointer in `[-1, 1]²`, +Y up, from logical pixels.
pub fn pointer_ndc(pointer_px: Vec2, screen: Viewport) -> Vec2 {
    if !screen.is_valid() {
        return Vec2::ZERO;
    }
    let x = pointer_px.x / screen.width * 2.0 - 1.0;
    let y = 1.0 - pointer_px.y / screen.height * 2.0;
    Vec2::new(x, y).clamp(Vec2::splat(-1.0), Vec2::splat(1.0))
}

/// Per-frame snapshot of the window geometry. Rebuilt every tick, never stored.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ViewportState {
    pub screen: Viewport,
    /// World extent on the glass plane.
    pub world: Vec2,
    /// World extent on the `z = 0` content plane.
    pub content: Vec2,
    pub class: ViewportClass,
    pub pointer: Vec2,
}

impl ViewportState {
    pub fn new(camera: &Camera, screen: Viewport, pointer: Vec2) -> Self {
        let aspect = screen.aspect();
        Self {
            screen,
            world: camera.world_size_at(GLASS_DEPTH, aspect),
            content: camera.world_size_at(0.0, aspect),
            class: ViewportClass::classify(screen.width),
            pointer,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-3
    }

    #[test]
    fn classifies_breakpoints() {
        assert_eq!(ViewportClass::classify(639.0).device, DeviceClass::Mobile);
        assert_eq!(ViewportClass::classify(640.0).device, DeviceClass::Tablet);
        assert_eq!(ViewportClass::classify(1023.0).device, DeviceClass::Tablet);
        assert_eq!(ViewportClass::classify(1024.0).device, DeviceClass::Desktop);
        assert!(ViewportClass::classify(768.0).compact);
        assert!(!ViewportClass::classify(769.0).compact);
    }

    #[test]
    fn world_height_at_glass_plane() {
        let cam = Camera::default();
        let size = cam.world_size_at(GLASS_DEPTH, 2.0);
        let expected = 2.0 * 5.0 * (7.5f32).to_radians().tan();
        assert!(close(size.y, expected));
        assert!(close(size.x, expected * 2.0));
    }

    #[test]
    fn projects_origin_to_center() {
        let cam = Camera::default();
        let screen = Viewport::new(800.0, 600.0);
        let p = cam.project(Vec3::new(0.0, 0.0, GLASS_DEPTH), screen).unwrap();
        assert!(close(p.x, 400.0) && close(p.y, 300.0));
    }

    #[test]
    fn projects_plane_edges_to_screen_edges() {
        let cam = Camera::default();
        let screen = Viewport::new(1000.0, 500.0);
        let world = cam.world_size_at(GLASS_DEPTH, screen.aspect());
        let top_right = cam.project(Vec3::new(world.x / 2.0, world.y / 2.0, GLASS_DEPTH), screen).unwrap();
        assert!(close(top_right.x, 1000.0));
        assert!(close(top_right.y, 0.0));
    }

    #[test]
    fn pointer_maps_to_ndc_with_y_up() {
        let screen = Viewport::new(200.0, 100.0);
        assert_eq!(pointer_ndc(Vec2::new(100.0, 50.0), screen), Vec2::ZERO);
        assert_eq!(pointer_ndc(Vec2::new(200.0, 0.0), screen), Vec2::new(1.0, 1.0));
        assert_eq!(pointer_ndc(Vec2::new(-50.0, 500.0), screen), Vec2::new(-1.0, -1.0));
    }

    #[test]
    fn viewport_state_classifies_from_width() {
        let state = ViewportState::new(&Camera::default(), Viewport::new(500.0, 900.0), Vec2::ZERO);
        assert_eq!(state.class.device, DeviceClass::Mobile);
        assert!(state.content.y > state.world.y);
    }
}
