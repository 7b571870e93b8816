use std::fmt;

use fontdue::layout::{CoordinateSystem, GlyphRasterConfig, Layout, LayoutSettings, TextStyle};

use crate::coords::Vec2;

/// Error returned by [`FontSystem::load_font`].
#[derive(Debug, Clone)]
pub struct FontLoadError(pub String);

impl fmt::Display for FontLoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "font load error: {}", self.0)
    }
}

impl std::error::Error for FontLoadError {}

/// Opaque handle to a font loaded into a [`FontSystem`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct FontId(pub(crate) usize);

/// One positioned glyph, in raster pixels relative to the text center (+Y down).
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct GlyphQuad {
    pub key: GlyphRasterConfig,
    pub min: Vec2,
    pub max: Vec2,
}

/// Laid-out single line of text at a raster size.
#[derive(Debug, Clone, PartialEq)]
pub struct TextLayout {
    pub glyphs: Vec<GlyphQuad>,
    /// Advance extent x line height, in raster pixels.
    pub size_px: Vec2,
    pub raster_px: f32,
}

impl TextLayout {
    /// Extent in units where one em equals `em_size`.
    #[inline]
    pub fn scaled_size(&self, em_size: f32) -> Vec2 {
        self.size_px * (em_size / self.raster_px.max(1.0))
    }
}

/// Owns a collection of loaded fonts. Fonts are immutable after loading.
pub struct FontSystem {
    fonts: Vec<fontdue::Font>,
}

impl FontSystem {
    pub fn new() -> Self {
        Self { fonts: Vec::new() }
    }

    /// Parses and stores a TrueType or OpenType font from raw bytes.
    pub fn load_font(&mut self, bytes: &[u8]) -> Result<FontId, FontLoadError> {
        let font = fontdue::Font::from_bytes(bytes, fontdue::FontSettings::default())
            .map_err(|e| FontLoadError(e.to_string()))?;
        let id = FontId(self.fonts.len());
        self.fonts.push(font);
        Ok(id)
    }

    pub(crate) fn get(&self, id: FontId) -> Option<&fontdue::Font> {
        self.fonts.get(id.0)
    }

    /// Lays out `text` on one line, centered on both axes.
    ///
    /// `letter_spacing` is extra advance per glyph in em (negative tightens).
    /// Returns `None` for an unknown font.
    pub fn layout(&self, text: &str, id: FontId, raster_px: f32, letter_spacing: f32) -> Option<TextLayout> {
        let font = self.get(id)?;
        let px = raster_px.max(1.0);

        let mut layout: Layout<()> = Layout::new(CoordinateSystem::PositiveYDown);
        layout.reset(&LayoutSettings::default());
        layout.append(&[font], &TextStyle::new(text, px, 0));

        let spacing = letter_spacing * px;
        let mut glyphs = Vec::new();
        let mut advance_end = 0.0f32;

        for (i, g) in layout.glyphs().iter().enumerate() {
            let shift = spacing * i as f32;
            let m = font.metrics_indexed(g.key.glyph_index, px);
            advance_end = advance_end.max(g.x - m.xmin as f32 + m.advance_width + shift);

            if g.char_data.rasterize() && g.width > 0 && g.height > 0 {
                let min = Vec2::new(g.x + shift, g.y);
                glyphs.push(GlyphQuad {
                    key: g.key,
                    min,
                    max: min + Vec2::new(g.width as f32, g.height as f32),
                });
            }
        }

        let line_height = font
            .horizontal_line_metrics(px)
            .map(|lm| lm.ascent - lm.descent)
            .unwrap_or(px * 1.2);

        // Spacing is applied between glyphs only, never after the last one.
        let width = advance_end.max(0.0);

        let center = Vec2::new(width * 0.5, line_height * 0.5);
        for g in &mut glyphs {
            g.min -= center;
            g.max -= center;
        }

        Some(TextLayout {
            glyphs,
            size_px: Vec2::new(width, line_height),
            raster_px: px,
        })
    }

    /// Measures `text` with one em equal to `em_size` units.
    ///
    /// Unknown fonts measure as zero width and one line of height.
    #[must_use]
    pub fn measure(&self, text: &str, id: FontId, em_size: f32, letter_spacing: f32, raster_px: f32) -> Vec2 {
        match self.layout(text, id, raster_px, letter_spacing) {
            Some(layout) => layout.scaled_size(em_size),
            None => Vec2::new(0.0, em_size * 1.2),
        }
    }
}

impl Default for FontSystem {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_garbage_font_bytes() {
        let mut fonts = FontSystem::new();
        assert!(fonts.load_font(b"definitely not a font").is_err());
    }

    #[test]
    fn unknown_font_measures_one_line() {
        let fonts = FontSystem::new();
        let size = fonts.measure("Home", FontId(3), 0.1, 0.0, 48.0);
        assert_eq!(size.x, 0.0);
        assert!((size.y - 0.12).abs() < 1e-6);
        assert!(fonts.layout("Home", FontId(3), 48.0, 0.0).is_none());
    }

    #[test]
    fn scaled_size_maps_raster_pixels_to_em_units() {
        let layout = TextLayout { glyphs: Vec::new(), size_px: Vec2::new(96.0, 48.0), raster_px: 48.0 };
        assert_eq!(layout.scaled_size(0.5), Vec2::new(1.0, 0.5));
    }
}
