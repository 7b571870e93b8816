/// Drawable area in logical pixels.
///
/// `scale_factor` converts logical pixels to physical pixels; offscreen targets
/// are sized from [`Viewport::physical_size`].
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
    pub scale_factor: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self { width: 0.0, height: 0.0, scale_factor: 1.0 }
    }
}

impl Viewport {
    #[inline]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height, scale_factor: 1.0 }
    }

    #[inline]
    pub const fn with_scale_factor(mut self, scale_factor: f32) -> Self {
        self.scale_factor = scale_factor;
        self
    }

    #[inline]
    pub fn is_valid(self) -> bool {
        self.width > 0.0 && self.height > 0.0 && self.width.is_finite() && self.height.is_finite()
    }

    /// Width / height, or `1.0` for a degenerate viewport.
    #[inline]
    pub fn aspect(self) -> f32 {
        if self.is_valid() { self.width / self.height } else { 1.0 }
    }

    /// Size in physical pixels, never smaller than 1×1.
    pub fn physical_size(self) -> (u32, u32) {
        let s = if self.scale_factor.is_finite() && self.scale_factor > 0.0 {
            self.scale_factor
        } else {
            1.0
        };
        let w = (self.width * s).round().max(1.0) as u32;
        let h = (self.height * s).round().max(1.0) as u32;
        (w, h)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aspect_of_degenerate_viewport_is_one() {
        assert_eq!(Viewport::new(0.0, 0.0).aspect(), 1.0);
        assert_eq!(Viewport::new(800.0, 0.0).aspect(), 1.0);
    }

    #[test]
    fn physical_size_applies_scale_factor() {
        let vp = Viewport::new(640.0, 360.0).with_scale_factor(2.0);
        assert_eq!(vp.physical_size(), (1280, 720));
    }

    #[test]
    fn physical_size_is_at_least_one_pixel() {
        assert_eq!(Viewport::new(0.0, 0.0).physical_size(), (1, 1));
    }
}
