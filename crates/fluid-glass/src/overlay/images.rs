use std::path::Path;

use glam::{Vec2, Vec3};

use super::windowed_range;
use crate::scroll::ScrollSource;

/// Extent of an image quad in world units.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum ImageExtent {
    Square(f32),
    Rect(f32, f32),
    /// Width factor, height as `content_height / divisor`.
    ScreenTall(f32, f32),
}

/// One parallax image of the background page.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ScrollImage {
    pub file: &'static str,
    /// Horizontal offset, multiplied by the compact position factor.
    pub x: f32,
    /// Vertical offset in content heights below the top of the page.
    pub y: f32,
    pub z: f32,
    pub extent: ImageExtent,
    pub window: (f32, f32),
    pub zoom_divisor: f32,
}

impl ScrollImage {
    /// 1 before the window opens, rising to `1 + 1/divisor` once it closes.
    pub fn zoom(&self, local_progress: f32) -> f32 {
        1.0 + (1.0 - local_progress.clamp(0.0, 1.0)) / self.zoom_divisor
    }
}

pub const SCROLL_IMAGES: [ScrollImage; 5] = [
    ScrollImage { file: "cs1.webp", x: -2.0, y: 0.8, z: 0.0, extent: ImageExtent::ScreenTall(3.0, 1.3), window: (0.4, 0.3), zoom_divisor: 3.0 },
    ScrollImage { file: "cs2.webp", x: 2.0, y: 0.9, z: 3.0, extent: ImageExtent::Square(3.0), window: (0.5, 0.3), zoom_divisor: 3.0 },
    ScrollImage { file: "cs3.webp", x: -2.05, y: 1.5, z: 6.0, extent: ImageExtent::Rect(1.0, 3.0), window: (0.6, 0.3), zoom_divisor: 2.0 },
    ScrollImage { file: "cs4.webp", x: -0.6, y: 1.8, z: 9.0, extent: ImageExtent::Rect(1.0, 2.0), window: (0.7, 0.3), zoom_divisor: 2.0 },
    ScrollImage { file: "cs5.webp", x: 0.75, y: 2.0, z: 10.5, extent: ImageExtent::Square(1.5), window: (0.8, 0.2), zoom_divisor: 2.0 },
];

const COMPACT_SCALE: f32 = 0.75;
const COMPACT_POSITION: f32 = 0.4;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ImagePlacement {
    pub index: usize,
    pub center: Vec3,
    pub size: Vec2,
    pub zoom: f32,
}

/// Places every image for the current scroll state. `lift` is the scroll group offset.
pub fn layout_images(
    images: &[ScrollImage],
    content_height: f32,
    compact: bool,
    scroll: &dyn ScrollSource,
    lift: f32,
) -> Vec<ImagePlacement> {
    let (s, m) = if compact { (COMPACT_SCALE, COMPACT_POSITION) } else { (1.0, 1.0) };
    images
        .iter()
        .enumerate()
        .map(|(index, img)| {
            let size = match img.extent {
                ImageExtent::Square(k) => Vec2::splat(k * s),
                ImageExtent::Rect(w, h) => Vec2::new(w * s, h * s),
                ImageExtent::ScreenTall(w, divisor) => Vec2::new(w * s, content_height / divisor),
            };
            let (start, width) = img.window;
            ImagePlacement {
                index,
                center: Vec3::new(img.x * m, -content_height * img.y + lift, img.z),
                size,
                zoom: img.zoom(windowed_range(scroll, start, width)),
            }
        })
        .collect()
}

/// Loads `file` from `dir`, or a generated placeholder when that fails.
pub fn load_image(dir: Option<&Path>, file: &str, index: usize) -> image::RgbaImage {
    let Some(dir) = dir else {
        return placeholder(index);
    };
    let path = dir.join(file);
    match image::open(&path) {
        Ok(img) => img.to_rgba8(),
        Err(err) => {
            log::warn!("failed to load image '{}': {err}", path.display());
            placeholder(index)
        }
    }
}

/// Soft diagonal gradient, tinted per slot.
pub fn placeholder(index: usize) -> image::RgbaImage {
    const TINTS: [[f32; 3]; 5] = [
        [0.82, 0.74, 0.66],
        [0.62, 0.72, 0.80],
        [0.74, 0.80, 0.66],
        [0.80, 0.66, 0.72],
        [0.70, 0.68, 0.82],
    ];
    let tint = TINTS[index % TINTS.len()];
    image::RgbaImage::from_fn(256, 256, |x, y| {
        let t = (x + y) as f32 / 510.0;
        let shade = 0.75 + 0.25 * t;
        let [r, g, b] = tint.map(|c| ((c * shade).clamp(0.0, 1.0) * 255.0) as u8);
        image::Rgba([r, g, b, 255])
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scroll::FixedScroll;

    fn zoom_at(p: f32) -> f32 {
        layout_images(&SCROLL_IMAGES, 5.0, false, &FixedScroll(p), 0.0)[0].zoom
    }

    #[test]
    fn zoom_follows_window_edges() {
        let first = SCROLL_IMAGES[0];
        assert_eq!(first.window, (0.4, 0.3));
        assert!((zoom_at(0.4) - first.zoom(1.0)).abs() < 1e-6);
        assert_eq!(zoom_at(0.7), first.zoom(0.0));
        assert_eq!(zoom_at(0.0), zoom_at(0.4));
        assert_eq!(zoom_at(1.0), zoom_at(0.7));
    }

    #[test]
    fn compact_layout_shrinks_and_pulls_in() {
        let wide = layout_images(&SCROLL_IMAGES, 5.0, false, &FixedScroll(0.0), 0.0);
        let compact = layout_images(&SCROLL_IMAGES, 5.0, true, &FixedScroll(0.0), 0.0);
        assert_eq!(wide[1].size, Vec2::splat(3.0));
        assert_eq!(compact[1].size, Vec2::splat(2.25));
        assert!((compact[1].center.x - 0.8).abs() < 1e-6);
        // Screen-tall height does not depend on the compact scale.
        assert_eq!(compact[0].size.y, wide[0].size.y);
    }

    #[test]
    fn lift_moves_every_image() {
        let rest = layout_images(&SCROLL_IMAGES, 5.0, false, &FixedScroll(0.0), 0.0);
        let lifted = layout_images(&SCROLL_IMAGES, 5.0, false, &FixedScroll(0.0), 2.0);
        for (a, b) in rest.iter().zip(&lifted) {
            assert!((b.center.y - a.center.y - 2.0).abs() < 1e-6);
        }
    }

    #[test]
    fn missing_directory_yields_placeholder() {
        let img = load_image(None, "cs1.webp", 0);
        assert_eq!(img.dimensions(), (256, 256));
        let img = load_image(Some(Path::new("/nonexistent/dir")), "cs1.webp", 7);
        assert_eq!(img.dimensions(), (256, 256));
    }
}
