/// Z-ordering key for draw items. Higher values paint on top.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Default)]
pub struct ZIndex(pub i32);

impl ZIndex {
    /// Resolution used when deriving a z-index from world depth.
    const DEPTH_STEPS_PER_UNIT: f32 = 1000.0;

    #[inline]
    pub const fn new(v: i32) -> Self {
        Self(v)
    }

    /// Orders items by world Z (camera looks down -Z, so larger Z is nearer).
    ///
    /// Used for back-to-front painting of translucent layers without a depth buffer.
    #[inline]
    pub fn from_depth(z: f32) -> Self {
        let steps = (z * Self::DEPTH_STEPS_PER_UNIT).round();
        Self(steps.clamp(i32::MIN as f32, i32::MAX as f32) as i32)
    }

    /// Returns a z-index `n` layers above `self`.
    #[inline]
    pub const fn above(self, n: i32) -> Self {
        Self(self.0.saturating_add(n))
    }
}

/// Stable sort key for draw items.
///
/// Field order matters: derived ordering compares `z` first (back-to-front),
/// then `order` (insertion order within the same layer).
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct SortKey {
    pub z: ZIndex,
    pub order: u32,
}

impl SortKey {
    #[inline]
    pub const fn new(z: ZIndex, order: u32) -> Self {
        Self { z, order }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_depth_preserves_depth_order() {
        assert!(ZIndex::from_depth(0.0) < ZIndex::from_depth(3.0));
        assert!(ZIndex::from_depth(9.0) < ZIndex::from_depth(10.5));
        assert!(ZIndex::from_depth(-1.0) < ZIndex::from_depth(0.0));
    }

    #[test]
    fn sort_key_breaks_ties_by_insertion() {
        let a = SortKey::new(ZIndex(5), 1);
        let b = SortKey::new(ZIndex(5), 0);
        let c = SortKey::new(ZIndex(4), 9);
        let mut keys = [a, b, c];
        keys.sort();
        assert_eq!(keys, [c, b, a]);
    }

    #[test]
    fn above_saturates() {
        assert_eq!(ZIndex(i32::MAX).above(1), ZIndex(i32::MAX));
        assert_eq!(ZIndex(1).above(2), ZIndex(3));
    }
}
