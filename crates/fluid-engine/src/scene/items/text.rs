use glam::Vec3;

use crate::paint::Color;
use crate::scene::{DrawCmd, DrawList, ZIndex};
use crate::text::FontId;

/// World-space text payload, anchored at its horizontal and vertical center.
#[derive(Debug, Clone, PartialEq)]
pub struct TextCmd {
    pub text: String,
    /// `None` draws nothing (font failed to load).
    pub font: Option<FontId>,
    /// Em height in world units.
    pub size: f32,
    pub color: Color,
    /// Anchor position (center/middle) in world units.
    pub position: Vec3,
    /// Extra advance between glyphs, in em.
    pub letter_spacing: f32,
    /// Pixel size glyphs are rasterized at.
    pub raster_px: f32,
}

impl TextCmd {
    pub fn new(
        text: impl Into<String>,
        font: Option<FontId>,
        size: f32,
        color: Color,
        position: Vec3,
    ) -> Self {
        Self {
            text: text.into(),
            font,
            size,
            color,
            position,
            letter_spacing: 0.0,
            raster_px: 48.0,
        }
    }

    pub fn letter_spacing(mut self, em: f32) -> Self {
        self.letter_spacing = em;
        self
    }

    /// Sets the raster size, quantized to whole pixels in `[8, 256]`.
    pub fn raster_px(mut self, px: f32) -> Self {
        self.raster_px = if px.is_finite() { px.round().clamp(8.0, 256.0) } else { 48.0 };
        self
    }
}

impl DrawList {
    /// Records a text draw command.
    #[inline]
    pub fn push_text(&mut self, z: ZIndex, cmd: TextCmd) {
        self.push(z, DrawCmd::Text(cmd));
    }
}
