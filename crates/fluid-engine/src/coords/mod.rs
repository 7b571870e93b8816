//! Coordinate and geometry types shared across renderers and the glass layer.
//!
//! Two spaces coexist:
//! - screen space: logical pixels, origin top-left, +X right, +Y down
//! - world space: camera-relative units, +X right, +Y up, +Z toward the viewer
//!
//! Screen-space types live here. World-space math uses `glam` directly.

mod rect;
mod viewport;

pub use glam::Vec2;
pub use rect::Rect;
pub use viewport::Viewport;
