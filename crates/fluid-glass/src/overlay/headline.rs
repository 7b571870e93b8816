use fluid_engine::paint::Color;
use fluid_engine::scene::TextCmd;
use fluid_engine::text::FontId;
use glam::Vec3;

pub const HEADLINE: &str = "Meet Wabi.";
pub const HEADLINE_DEPTH: f32 = 5.0;
const LETTER_SPACING: f32 = -0.05;

pub fn headline_size(compact: bool) -> f32 {
    if compact { 0.12 } else { 0.22 }
}

/// Headline text command, moved with the scroll group by `lift`.
pub fn headline(font: Option<FontId>, compact: bool, lift: f32) -> TextCmd {
    TextCmd::new(HEADLINE, font, headline_size(compact), Color::BLACK, Vec3::new(0.0, lift, HEADLINE_DEPTH))
        .letter_spacing(LETTER_SPACING)
        .raster_px(96.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compact_headline_is_smaller() {
        assert!(headline(None, true, 0.0).size < headline(None, false, 0.0).size);
    }

    #[test]
    fn follows_scroll_lift() {
        let cmd = headline(None, false, 1.5);
        assert_eq!(cmd.position, Vec3::new(0.0, 1.5, HEADLINE_DEPTH));
        assert_eq!(cmd.letter_spacing, -0.05);
    }
}
