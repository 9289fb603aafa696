//! Spatial map for pointer hit testing.
//!
//! [`SpatialMap`] holds the absolute rects of painted, mouse-reachable
//! segments in paint order: ascending `z_index`, then pre-order. Later
//! entries are in front.

use crate::geometry::{Point, Rect};
use crate::segment::{SegmentId, SegmentTree};

use super::result::LayoutResult;

/// One hit-testable rect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpatialEntry {
    pub segment: SegmentId,
    pub rect: Rect,
    pub z_index: i32,
}

/// Paint-ordered segment rects (last = frontmost).
#[derive(Debug, Clone, Default)]
pub struct SpatialMap {
    entries: Vec<SpatialEntry>,
}

impl SpatialMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a layout, skipping unpainted and mouse-transparent
    /// segments. Descendants of a mouse-transparent segment stay reachable.
    pub fn from_layout(root: &LayoutResult, tree: &SegmentTree) -> Self {
        let mut entries = Vec::with_capacity(root.count());
        root.visit(&mut |result, rect| {
            let Some(seg) = tree.get(result.segment) else {
                return;
            };
            if !result.painted || seg.interaction().mouse_transparent {
                return;
            }
            entries.push(SpatialEntry { segment: result.segment, rect, z_index: seg.layout().z_index });
        });
        // Stable: equal z keeps pre-order.
        entries.sort_by_key(|e| e.z_index);
        Self { entries }
    }

    /// Replace the contents with `(segment, rect)` pairs already in paint
    /// order, all at z-index 0.
    pub fn update_ordered(&mut self, entries: &[(SegmentId, Rect)]) {
        self.entries.clear();
        self.entries
            .extend(entries.iter().map(|&(segment, rect)| SpatialEntry { segment, rect, z_index: 0 }));
    }

    /// All segments containing `point`, front to back.
    pub fn hit_test(&self, point: Point) -> Vec<SegmentId> {
        self.entries.iter().rev().filter(|e| e.rect.contains(point)).map(|e| e.segment).collect()
    }

    /// The frontmost segment containing `point`.
    pub fn segment_at(&self, point: Point) -> Option<SegmentId> {
        self.entries.iter().rev().find(|e| e.rect.contains(point)).map(|e| e.segment)
    }

    /// All segments overlapping `rect`, front to back.
    pub fn segments_in_rect(&self, rect: &Rect) -> Vec<SegmentId> {
        self.entries.iter().rev().filter(|e| e.rect.overlaps(*rect)).map(|e| e.segment).collect()
    }

    pub fn entries(&self) -> &[SpatialEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
