//! Damped page scroll and the `range` windows overlay items read from it.

use crate::damp::damp;

/// Read side of the scroll state.
pub trait ScrollSource {
    /// Displayed offset in `[0, 1]`.
    fn offset(&self) -> f32;

    /// Rises from 0 at `start` to 1 at `start + width`, clamped outside.
    fn range(&self, start: f32, width: f32) -> f32 {
        let p = self.offset();
        if width <= 0.0 {
            return if p < start { 0.0 } else { 1.0 };
        }
        let t = (p - start) / width;
        if t <= RANGE_EDGE_EPS {
            0.0
        } else if t >= 1.0 - RANGE_EDGE_EPS {
            1.0
        } else {
            t
        }
    }
}

/// Window positions within this of an edge read as the edge itself.
const RANGE_EDGE_EPS: f32 = 1e-6;

/// Scroll controls of the background page.
#[derive(Debug, Clone, PartialEq)]
pub struct ScrollState {
    /// Page count the background spans.
    pub pages: f32,
    /// Share of the window height one page of scrolling covers.
    pub distance: f32,
    /// Half-life of the displayed offset, in seconds.
    pub damping: f32,
    target: f32,
    offset: f32,
}

impl Default for ScrollState {
    fn default() -> Self {
        Self::new(3.0, 0.4, 0.2)
    }
}

impl ScrollState {
    pub fn new(pages: f32, distance: f32, damping: f32) -> Self {
        Self { pages: pages.max(1.0), distance: distance.max(0.0), damping, target: 0.0, offset: 0.0 }
    }

    pub fn target(&self) -> f32 {
        self.target
    }

    /// Scrollable height in logical pixels for a window `window_height` tall.
    pub fn scroll_extent(&self, window_height: f32) -> f32 {
        (self.pages - 1.0) * self.distance * window_height.max(0.0)
    }

    /// Moves the target by `delta_px` (positive scrolls down the page).
    pub fn scroll_by(&mut self, delta_px: f32, window_height: f32) {
        let extent = self.scroll_extent(window_height);
        if extent <= 0.0 || !delta_px.is_finite() {
            return;
        }
        self.set_target(self.target + delta_px / extent);
    }

    pub fn set_target(&mut self, target: f32) {
        self.target = target.clamp(0.0, 1.0);
    }

    /// Damps the displayed offset toward the target.
    pub fn tick(&mut self, dt: f32) {
        self.offset = damp(self.offset, self.target, self.damping, dt);
        if (self.offset - self.target).abs() < 1e-5 {
            self.offset = self.target;
        }
    }

    /// World-space lift of the scroll group for content `world_height` tall per page.
    pub fn group_offset(&self, world_height: f32) -> f32 {
        world_height * (self.pages - 1.0) * self.offset
    }
}

impl ScrollSource for ScrollState {
    fn offset(&self) -> f32 {
        self.offset
    }
}

/// Fixed scroll progress, mostly for layout code and tests.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FixedScroll(pub f32);

impl ScrollSource for FixedScroll {
    fn offset(&self) -> f32 {
        self.0.clamp(0.0, 1.0)
    }
}
