//! Font loading, measurement and layout for world-space text.

mod font_system;

pub use font_system::{FontId, FontLoadError, FontSystem, GlyphQuad, TextLayout};
