//! Cursor positions and selections.

use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::segment::SegmentPath;

/// A caret location: a segment path, an offset local to that segment, and
/// the denormalized global offset.
///
/// The local offset is a code-point index for text, 0 or 1 for atomic
/// segments, and a child index for containers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CursorPosition {
    pub path: SegmentPath,
    pub local_offset: usize,
    pub global_offset: usize,
}

impl CursorPosition {
    pub fn new(path: SegmentPath, local_offset: usize, global_offset: usize) -> Self {
        Self { path, local_offset, global_offset }
    }

    /// Offset 0 addressed through the root.
    pub fn document_start() -> Self {
        Self::default()
    }

    /// Same segment and local offset; the cached global offset is ignored.
    pub fn same_place(&self, other: &CursorPosition) -> bool {
        self.path == other.path && self.local_offset == other.local_offset
    }
}

/// An anchor/focus pair. `start` need not precede `end`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Selection {
    pub start: CursorPosition,
    pub end: CursorPosition,
}

impl Selection {
    pub fn new(start: CursorPosition, end: CursorPosition) -> Self {
        Self { start, end }
    }

    /// An empty selection at `position`.
    pub fn collapsed(position: CursorPosition) -> Self {
        Self { start: position.clone(), end: position }
    }

    /// Empty when both ends name the same segment and local offset.
    pub fn is_empty(&self) -> bool {
        self.start.same_place(&self.end)
    }

    /// Ends ordered by ascending global offset. Equal offsets keep their
    /// order, so normalizing twice is the same as normalizing once.
    pub fn normalized(&self) -> Selection {
        if self.start.global_offset <= self.end.global_offset {
            self.clone()
        } else {
            Selection { start: self.end.clone(), end: self.start.clone() }
        }
    }

    /// Whether `end` precedes `start`.
    pub fn is_backward(&self) -> bool {
        self.end.global_offset < self.start.global_offset
    }

    /// Global offset range covered, from the cached offsets.
    pub fn global_range(&self) -> Range<usize> {
        let n = self.normalized();
        n.start.global_offset..n.end.global_offset
    }
}
