use fluid_engine::coords::{Rect, Vec2, Viewport};
use glam::Vec3;
use serde::Deserialize;

use crate::controller::BOTTOM_MARGIN;
use crate::viewport::{Camera, DeviceClass, ViewportState};

/// Label drawn over the bar.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NavItem {
    pub label: String,
    #[serde(default)]
    pub link: String,
}

impl NavItem {
    pub fn new(label: impl Into<String>, link: impl Into<String>) -> Self {
        Self { label: label.into(), link: link.into() }
    }
}

pub fn default_nav_items() -> Vec<NavItem> {
    vec![NavItem::new("Home", ""), NavItem::new("About", ""), NavItem::new("Contact", "")]
}

/// Just in front of the glass so labels sit on the bar.
pub const NAV_DEPTH: f32 = 15.1;
pub const NAV_COLOR: &str = "#333333";

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct NavStyle {
    pub spacing: f32,
    pub font_size: f32,
}

impl NavStyle {
    pub fn for_device(device: DeviceClass) -> Self {
        match device {
            DeviceClass::Mobile => Self { spacing: 0.2, font_size: 0.035 },
            DeviceClass::Tablet => Self { spacing: 0.24, font_size: 0.045 },
            DeviceClass::Desktop => Self { spacing: 0.3, font_size: 0.045 },
        }
    }
}

/// Evenly spaced offsets centered on zero.
pub fn nav_offsets(count: usize, spacing: f32) -> Vec<f32> {
    let mid = (count as f32 - 1.0) / 2.0;
    (0..count).map(|i| (i as f32 - mid) * spacing).collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct NavLabel {
    pub label: String,
    pub link: String,
    pub position: Vec3,
    pub font_size: f32,
}

/// Positions `items` along the bottom edge for this frame's viewport.
pub fn layout_nav(items: &[NavItem], viewport: &ViewportState) -> Vec<NavLabel> {
    let style = NavStyle::for_device(viewport.class.device);
    let y = -viewport.world.y / 2.0 + BOTTOM_MARGIN;
    items
        .iter()
        .zip(nav_offsets(items.len(), style.spacing))
        .map(|(item, x)| NavLabel {
            label: item.label.clone(),
            link: item.link.clone(),
            position: Vec3::new(x, y, NAV_DEPTH),
            font_size: style.font_size,
        })
        .collect()
}

/// Index of the label under `pointer_px`.
///
/// `measure` returns a label's world-space size for a given em size.
pub fn hit_test(
    labels: &[NavLabel],
    camera: &Camera,
    screen: Viewport,
    pointer_px: Vec2,
    measure: impl Fn(&str, f32) -> Vec2,
) -> Option<usize> {
    const SLOP_PX: f32 = 4.0;
    let px_per_unit = camera.pixels_per_unit(NAV_DEPTH, screen);
    labels.iter().position(|label| {
        let Some(center) = camera.project(label.position, screen) else {
            return false;
        };
        let size = measure(&label.label, label.font_size) * px_per_unit;
        Rect::from_center_size(center, size).inflate(SLOP_PX).contains(pointer_px)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-5
    }

    fn state(width: f32) -> ViewportState {
        ViewportState::new(&Camera::default(), Viewport::new(width, 800.0), Vec2::ZERO)
    }

    // Rough fixed-advance measure: 0.6 em per char, 1.2 em tall.
    fn measure(text: &str, em: f32) -> Vec2 {
        Vec2::new(text.chars().count() as f32 * 0.6 * em, 1.2 * em)
    }

    #[test]
    fn four_items_at_desktop_spacing() {
        let offsets = nav_offsets(4, 0.3);
        let expected = [-0.45, -0.15, 0.15, 0.45];
        assert_eq!(offsets.len(), 4);
        for (a, b) in offsets.iter().zip(expected) {
            assert!(close(*a, b));
        }
    }

    #[test]
    fn single_item_is_centered() {
        assert_eq!(nav_offsets(1, 0.3), vec![0.0]);
        assert!(nav_offsets(0, 0.3).is_empty());
    }

    #[test]
    fn resize_recomputes_offsets() {
        let items = vec![
            NavItem::new("Home", "#home"),
            NavItem::new("About", "#about"),
            NavItem::new("Portfolio", "#portfolio"),
            NavItem::new("Contact", "#contact"),
        ];
        let desktop = layout_nav(&items, &state(1440.0));
        assert!(close(desktop[0].position.x, -0.45));
        assert_eq!(desktop[0].font_size, 0.045);

        let mobile = layout_nav(&items, &state(390.0));
        assert!(close(mobile[0].position.x, -0.3));
        assert_eq!(mobile[0].font_size, 0.035);
        assert_eq!(mobile[0].position.z, NAV_DEPTH);
    }

    #[test]
    fn labels_sit_near_the_bottom_edge() {
        let vp = state(1280.0);
        let labels = layout_nav(&default_nav_items(), &vp);
        assert!(close(labels[1].position.y, -vp.world.y / 2.0 + BOTTOM_MARGIN));
        assert!(close(labels[1].position.x, 0.0));
    }

    #[test]
    fn hit_test_finds_label_under_pointer() {
        let camera = Camera::default();
        let screen = Viewport::new(1280.0, 800.0);
        let vp = ViewportState::new(&camera, screen, Vec2::ZERO);
        let labels = layout_nav(&default_nav_items(), &vp);

        let about = camera.project(labels[1].position, screen).unwrap();
        assert_eq!(hit_test(&labels, &camera, screen, about, measure), Some(1));

        let far = Vec2::new(10.0, 10.0);
        assert_eq!(hit_test(&labels, &camera, screen, far, measure), None);
    }
}
