//! Fluid engine crate.
//!
//! Platform + GPU runtime, world-space draw streams and the renderers that
//! higher layers compose into frames.

pub mod core;
pub mod device;
pub mod input;
pub mod time;
pub mod window;

pub mod coords;
pub mod geometry;
pub mod logging;
pub mod paint;
pub mod render;
pub mod scene;
pub mod text;
