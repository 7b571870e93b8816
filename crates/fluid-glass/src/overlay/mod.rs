//! Scroll-linked items around the glass: parallax images, headline and nav labels.

pub mod headline;
pub mod images;
pub mod nav;

pub use images::{ImagePlacement, SCROLL_IMAGES, ScrollImage, layout_images};
pub use nav::{NavItem, NavLabel, NavStyle, default_nav_items, hit_test, layout_nav, nav_offsets};

use crate::scroll::ScrollSource;

/// Share of the scroll window `[start, start + width]` still ahead: 1 at its start, 0 at its end.
pub fn windowed_range(scroll: &dyn ScrollSource, start: f32, width: f32) -> f32 {
    (1.0 - scroll.range(start, width)).clamp(0.0, 1.0)
}

/// Side effect of clicking a nav label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavTarget {
    /// In-page jump; holds the link including its leading `#`.
    Anchor(String),
    /// Full navigation to another location.
    Href(String),
}

impl NavTarget {
    /// `None` for an empty link.
    pub fn from_link(link: &str) -> Option<Self> {
        let link = link.trim();
        if link.is_empty() {
            None
        } else if link.starts_with('#') {
            Some(Self::Anchor(link.to_string()))
        } else {
            Some(Self::Href(link.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scroll::FixedScroll;

    #[test]
    fn windowed_range_runs_from_one_to_zero() {
        assert_eq!(windowed_range(&FixedScroll(0.4), 0.4, 0.3), 1.0);
        assert_eq!(windowed_range(&FixedScroll(0.7), 0.4, 0.3), 0.0);
        assert!((windowed_range(&FixedScroll(0.55), 0.4, 0.3) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn windowed_range_clamps_outside() {
        assert_eq!(windowed_range(&FixedScroll(0.0), 0.4, 0.3), 1.0);
        assert_eq!(windowed_range(&FixedScroll(1.0), 0.4, 0.3), 0.0);
    }

    #[test]
    fn links_classify() {
        assert_eq!(NavTarget::from_link(""), None);
        assert_eq!(NavTarget::from_link("#about"), Some(NavTarget::Anchor("#about".into())));
        assert_eq!(
            NavTarget::from_link("https://example.com"),
            Some(NavTarget::Href("https://example.com".into()))
        );
    }
}
