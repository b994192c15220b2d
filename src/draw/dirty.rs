//! Refresh tracking for incremental rendering.
//!
//! Collects the nodes whose footprint changed since the last frame, or a
//! sentinel that forces a full repaint, and merges their regions into one
//! pixel-aligned rectangle.

use crate::math::BBox;
use crate::scene::NodeId;

/// One pending change.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RefreshEntry {
    /// A node still in the tree.
    Node(NodeId),
    /// A node that left the tree; keeps the bbox it was last drawn with.
    Removed(Option<BBox>),
}

/// What the next frame has to do.
#[derive(Debug, Clone, PartialEq)]
pub enum Refresh {
    Idle,
    Full,
    Partial(Vec<RefreshEntry>),
}

/// Tracks pending refreshes between frames.
#[derive(Debug, Default)]
pub struct RefreshTracker {
    entries: Vec<RefreshEntry>,
    force_full: bool,
}

impl RefreshTracker {
    /// Creates a new, empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces everything pending with a full repaint.
    pub fn mark_full(&mut self) {
        self.force_full = true;
        self.entries.clear();
    }

    /// Queues a changed node unless a full repaint is already pending.
    pub fn mark_node(&mut self, node: NodeId) {
        if self.force_full {
            return;
        }
        self.entries.push(RefreshEntry::Node(node));
    }

    /// Queues the footprint of a node that is leaving the tree.
    pub fn mark_removed(&mut self, drawn_bbox: Option<BBox>) {
        if self.force_full || drawn_bbox.is_none() {
            return;
        }
        self.entries.push(RefreshEntry::Removed(drawn_bbox));
    }

    pub fn is_full(&self) -> bool {
        self.force_full
    }

    pub fn is_empty(&self) -> bool {
        !self.force_full && self.entries.is_empty()
    }

    /// Drains what has been gathered so far.
    pub fn take(&mut self) -> Refresh {
        if self.force_full {
            self.force_full = false;
            self.entries.clear();
            Refresh::Full
        } else if self.entries.is_empty() {
            Refresh::Idle
        } else {
            Refresh::Partial(std::mem::take(&mut self.entries))
        }
    }

    /// Drops everything pending.
    pub fn clear(&mut self) {
        self.force_full = false;
        self.entries.clear();
    }
}

/// Region a single node has to repaint: where it was and where it is now.
///
/// Boxes without area are ignored.
pub fn refresh_region(previous: Option<BBox>, current: Option<BBox>) -> Option<BBox> {
    BBox::merge([previous, current].into_iter().flatten().filter(BBox::is_valid))
}

/// Merges regions, clips them to the view, and snaps outward to whole pixels.
pub fn merge_regions<I>(regions: I, view: &BBox) -> Option<BBox>
where
    I: IntoIterator<Item = BBox>,
{
    let merged = BBox::merge(regions.into_iter().filter(BBox::is_valid))?;
    let clipped = merged.intersection(view)?;
    let snapped = clipped.snap_out();
    snapped.is_valid().then_some(snapped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use slotmap::SlotMap;

    #[test]
    fn full_takes_precedence() {
        let mut ids: SlotMap<NodeId, ()> = SlotMap::with_key();
        let id = ids.insert(());
        let mut tracker = RefreshTracker::new();
        tracker.mark_node(id);
        tracker.mark_full();
        tracker.mark_node(id);
        assert_eq!(tracker.take(), Refresh::Full);
        assert_eq!(tracker.take(), Refresh::Idle);
    }

    #[test]
    fn removed_without_bbox_is_ignored() {
        let mut tracker = RefreshTracker::new();
        tracker.mark_removed(None);
        assert!(tracker.is_empty());
        tracker.mark_removed(Some(BBox::new(0.0, 0.0, 1.0, 1.0)));
        assert!(matches!(tracker.take(), Refresh::Partial(entries) if entries.len() == 1));
    }

    #[test]
    fn moved_node_repaints_old_and_new_footprint() {
        let a = BBox::new(10.0, 10.0, 20.0, 20.0);
        let b = BBox::new(50.0, 15.0, 20.0, 20.0);
        assert_eq!(refresh_region(Some(a), Some(b)), Some(a.union(&b)));
        assert_eq!(refresh_region(None, Some(b)), Some(b));
        assert_eq!(refresh_region(None, None), None);
    }

    #[test]
    fn merged_region_is_clipped_and_snapped() {
        let view = BBox::new(0.0, 0.0, 100.0, 100.0);
        let merged = merge_regions(
            [BBox::new(-5.0, 10.2, 20.0, 5.0), BBox::new(90.5, 90.5, 20.0, 20.0)],
            &view,
        );
        assert_eq!(merged, Some(BBox::from_min_max(0.0, 10.0, 100.0, 100.0)));
    }

    #[test]
    fn regions_outside_view_are_dropped() {
        let view = BBox::new(0.0, 0.0, 100.0, 100.0);
        assert_eq!(merge_regions([BBox::new(200.0, 200.0, 5.0, 5.0)], &view), None);
        assert_eq!(merge_regions([BBox::new(5.0, 5.0, 0.0, 5.0)], &view), None);
    }
}
