//! Glass refraction over a scroll-linked background.
//!
//! Each frame the background (parallax images and headline) is rendered into an
//! offscreen buffer, shown as the backdrop, and refracted through a transmissive
//! mesh that follows the pointer. Three modes pick the mesh: `lens`, `cube` and
//! `bar` (a bottom-locked nav bar with clickable labels).
//!
//! [`GlassApp`] wires it all to a window; [`scene::GlassScene`] is the
//! renderer-free per-frame core.

pub mod app;
pub mod compositor;
pub mod config;
pub mod controller;
pub mod damp;
pub mod geometry;
pub mod material;
pub mod mode;
pub mod overlay;
pub mod presets;
pub mod scene;
pub mod scroll;
pub mod viewport;

pub use app::GlassApp;
pub use config::{ConfigError, ConfigHandle, GlassConfig, ModeProps};
pub use mode::Mode;
pub use overlay::NavTarget;
