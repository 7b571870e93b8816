use super::{DrawCmd, SortKey, ZIndex};

/// Render destination a draw list is recorded for.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum PassTarget {
    /// The offscreen color buffer sampled by transmissive materials.
    Offscreen,
    /// The presented surface.
    Visible,
}

/// A single draw item: sort key + command.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawItem {
    pub key: SortKey,
    pub cmd: DrawCmd,
}

/// Recorded draw stream for one pass of a frame.
///
/// Performance characteristics:
/// - `push()` is O(1)
/// - paint-order iteration reuses an internal index buffer; no per-frame allocation once warmed
#[derive(Debug)]
pub struct DrawList {
    target: PassTarget,
    items: Vec<DrawItem>,
    next_order: u32,

    sorted_indices: Vec<usize>,
    sorted_dirty: bool,
}

impl DrawList {
    #[inline]
    pub fn new(target: PassTarget) -> Self {
        Self {
            target,
            items: Vec::new(),
            next_order: 0,
            sorted_indices: Vec::new(),
            sorted_dirty: false,
        }
    }

    #[inline]
    pub fn target(&self) -> PassTarget {
        self.target
    }

    /// Clears recorded items. Keeps allocated capacity for reuse.
    #[inline]
    pub fn clear(&mut self) {
        self.items.clear();
        self.next_order = 0;
        self.sorted_indices.clear();
        self.sorted_dirty = true;
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns items in insertion order.
    #[inline]
    pub fn items(&self) -> &[DrawItem] {
        &self.items
    }

    /// Pushes a draw command with the given z-index.
    #[inline]
    pub fn push(&mut self, z: ZIndex, cmd: DrawCmd) {
        let order = self.next_order;
        self.next_order = self.next_order.wrapping_add(1);
        self.items.push(DrawItem { key: SortKey::new(z, order), cmd });
        self.sorted_dirty = true;
    }

    /// Iterates items in paint order (back-to-front) without cloning draw commands.
    pub fn iter_in_paint_order(&mut self) -> impl Iterator<Item = &DrawItem> {
        if self.sorted_dirty {
            self.rebuild_sorted_indices();
        }
        self.sorted_indices.iter().map(|&i| &self.items[i])
    }

    fn rebuild_sorted_indices(&mut self) {
        self.sorted_indices.clear();
        self.sorted_indices.extend(0..self.items.len());

        // Stable ordering is ensured by SortKey including insertion order.
        let items = &self.items;
        self.sorted_indices.sort_by(|&a, &b| items[a].key.cmp(&items[b].key));

        self.sorted_dirty = false;
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::*;
    use crate::paint::Color;
    use crate::scene::TextCmd;

    fn text(label: &str) -> DrawCmd {
        DrawCmd::Text(TextCmd::new(label, None, 0.1, Color::BLACK, Vec3::ZERO))
    }

    fn labels(list: &mut DrawList) -> Vec<String> {
        list.iter_in_paint_order()
            .filter_map(|item| match &item.cmd {
                DrawCmd::Text(t) => Some(t.text.clone()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn paint_order_sorts_by_z_then_insertion() {
        let mut list = DrawList::new(PassTarget::Offscreen);
        list.push(ZIndex(10), text("front"));
        list.push(ZIndex(0), text("back-a"));
        list.push(ZIndex(0), text("back-b"));

        assert_eq!(labels(&mut list), ["back-a", "back-b", "front"]);
    }

    #[test]
    fn clear_resets_items_but_keeps_target() {
        let mut list = DrawList::new(PassTarget::Visible);
        list.push(ZIndex(1), text("a"));
        list.clear();

        assert!(list.is_empty());
        assert_eq!(list.target(), PassTarget::Visible);
        assert!(labels(&mut list).is_empty());
    }

    #[test]
    fn resorts_after_push_following_iteration() {
        let mut list = DrawList::new(PassTarget::Offscreen);
        list.push(ZIndex(5), text("mid"));
        assert_eq!(labels(&mut list), ["mid"]);

        list.push(ZIndex(1), text("back"));
        assert_eq!(labels(&mut list), ["back", "mid"]);
    }
}
