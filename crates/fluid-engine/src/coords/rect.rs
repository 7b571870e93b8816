use glam::Vec2;

/// Screen-space hit box in logical pixels, stored as corners.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Rect {
    pub min: Vec2,
    pub max: Vec2,
}

impl Rect {
    /// Box spanning `a` and `b` in any corner order.
    #[inline]
    pub fn from_corners(a: Vec2, b: Vec2) -> Self {
        Self { min: a.min(b), max: a.max(b) }
    }

    /// Box of `size` centered on `center`. Negative sizes are mirrored.
    #[inline]
    pub fn from_center_size(center: Vec2, size: Vec2) -> Self {
        let half = size.abs() * 0.5;
        Self { min: center - half, max: center + half }
    }

    #[inline]
    pub fn size(self) -> Vec2 {
        self.max - self.min
    }

    #[inline]
    pub fn center(self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    /// Edges count as inside.
    #[inline]
    pub fn contains(self, p: Vec2) -> bool {
        p.cmpge(self.min).all() && p.cmple(self.max).all()
    }

    /// Pads every side by `amount` pixels; a negative amount shrinks, never past the center.
    #[inline]
    pub fn inflate(self, amount: f32) -> Self {
        let center = self.center();
        let min = (self.min - Vec2::splat(amount)).min(center);
        let max = (self.max + Vec2::splat(amount)).max(center);
        Self { min, max }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corners_in_any_order() {
        let r = Rect::from_corners(Vec2::new(10.0, 2.0), Vec2::new(4.0, 8.0));
        assert_eq!(r.min, Vec2::new(4.0, 2.0));
        assert_eq!(r.size(), Vec2::new(6.0, 6.0));
    }

    #[test]
    fn centered_box_keeps_its_center() {
        let r = Rect::from_center_size(Vec2::new(50.0, 20.0), Vec2::new(30.0, -10.0));
        assert_eq!(r.min, Vec2::new(35.0, 15.0));
        assert_eq!(r.center(), Vec2::new(50.0, 20.0));
    }

    #[test]
    fn edges_are_inside() {
        let r = Rect::from_corners(Vec2::ZERO, Vec2::splat(10.0));
        assert!(r.contains(Vec2::ZERO));
        assert!(r.contains(Vec2::splat(10.0)));
        assert!(!r.contains(Vec2::new(10.5, 5.0)));
    }

    #[test]
    fn inflate_pads_and_clamps() {
        let r = Rect::from_corners(Vec2::splat(10.0), Vec2::splat(14.0));
        assert_eq!(r.inflate(2.0), Rect::from_corners(Vec2::splat(8.0), Vec2::splat(16.0)));
        assert_eq!(r.inflate(-5.0).size(), Vec2::ZERO);
    }
}
