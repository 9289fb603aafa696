//! Offset <-> position conversion and cursor traversal.
//!
//! All operations clamp out-of-range input instead of failing.

use tracing::warn;

use crate::segment::{SegmentId, SegmentKind, SegmentTree};
use crate::text::words;

use super::cache::{OffsetCache, OffsetEntry};
use super::position::{CursorPosition, Selection};

/// Stand-in character for non-text segments in extracted text.
pub const OBJECT_REPLACEMENT: char = '\u{FFFC}';

/// Read-only cursor queries over a current [`OffsetCache`].
#[derive(Clone, Copy)]
pub struct CursorNavigator<'a> {
    tree: &'a SegmentTree,
    cache: &'a OffsetCache,
}

impl OffsetCache {
    /// Bring the cache up to date and borrow a navigator over it.
    pub fn navigator<'a>(&'a mut self, tree: &'a SegmentTree) -> CursorNavigator<'a> {
        self.ensure(tree);
        CursorNavigator { tree, cache: self }
    }
}

impl<'a> CursorNavigator<'a> {
    pub fn total_length(&self) -> usize {
        self.cache.total_length()
    }

    /// Offset entry of a displayed segment.
    pub fn entry(&self, segment: SegmentId) -> Option<&'a OffsetEntry> {
        self.cache.entry(segment)
    }

    // -- conversion ------------------------------------------------------------

    /// Resolve a global offset to the addressable segment with the highest
    /// start not past it whose end reaches it. Equal starts resolve to the
    /// later segment in document order.
    pub fn global_offset_to_position(&self, offset: usize) -> CursorPosition {
        let target = offset.min(self.cache.total_length());
        let count = self.cache.addressable().len();

        // First addressable entry starting past `target`.
        let (mut lo, mut hi) = (0, count);
        while lo < hi {
            let mid = (lo + hi) / 2;
            match self.cache.addressable_at(mid) {
                Some(e) if e.start <= target => lo = mid + 1,
                _ => hi = mid,
            }
        }

        let found = (0..lo).rev().filter_map(|i| self.cache.addressable_at(i)).find(|e| e.end() >= target);
        match found {
            Some(entry) => position_in(entry, target),
            None => {
                warn!(offset, "no segment covers offset, falling back to document start");
                CursorPosition::document_start()
            }
        }
    }

    /// Global offset of `position`. Falls back to its cached global offset
    /// (clamped) when the path is not in the document.
    pub fn position_to_global_offset(&self, position: &CursorPosition) -> usize {
        let Some(entry) = self.cache.entry_for_path(&position.path) else {
            return position.global_offset.min(self.cache.total_length());
        };
        if entry.kind == SegmentKind::Container {
            let child_count = self.tree.children(entry.segment).len();
            return (position.local_offset..child_count)
                .find_map(|i| self.cache.entry_for_path(&entry.path.child(i)).map(|c| c.start))
                .unwrap_or(entry.end());
        }
        entry.start + position.local_offset.min(entry.length)
    }

    /// `position` with its global offset recomputed and local offset clamped.
    pub fn refresh(&self, position: &CursorPosition) -> CursorPosition {
        match self.cache.entry_for_path(&position.path) {
            Some(entry) if entry.kind != SegmentKind::Container => {
                let local = position.local_offset.min(entry.length);
                CursorPosition::new(entry.path.clone(), local, entry.start + local)
            }
            _ => self.global_offset_to_position(self.position_to_global_offset(position)),
        }
    }

    // -- character steps ---------------------------------------------------------

    /// One code point (or one atomic segment) forward.
    pub fn move_forward(&self, position: &CursorPosition) -> CursorPosition {
        let global = self.position_to_global_offset(position);
        if let Some(entry) = self.leaf_entry(position) {
            let local = position.local_offset.min(entry.length);
            if local < entry.length {
                return CursorPosition::new(entry.path.clone(), local + 1, global + 1);
            }
        }
        self.global_offset_to_position(global + 1)
    }

    /// One code point (or one atomic segment) backward.
    pub fn move_backward(&self, position: &CursorPosition) -> CursorPosition {
        let global = self.position_to_global_offset(position);
        if let Some(entry) = self.leaf_entry(position) {
            let local = position.local_offset.min(entry.length);
            if local > 0 {
                return CursorPosition::new(entry.path.clone(), local - 1, global - 1);
            }
        }
        self.global_offset_to_position(global.saturating_sub(1))
    }

    fn leaf_entry(&self, position: &CursorPosition) -> Option<&'a OffsetEntry> {
        self.cache
            .entry_for_path(&position.path)
            .filter(|e| e.kind != SegmentKind::Container)
    }

    // -- word steps --------------------------------------------------------------

    /// Flattened document text; non-text segments appear as U+FFFC.
    pub fn document_chars(&self) -> Vec<char> {
        let mut chars = Vec::with_capacity(self.cache.total_length());
        for entry in self.cache.addressable() {
            self.push_chars(entry, entry.start, entry.end(), &mut chars);
        }
        chars
    }

    /// To the end of the next word.
    pub fn move_word_forward(&self, position: &CursorPosition) -> CursorPosition {
        let global = self.position_to_global_offset(position);
        let chars = self.document_chars();
        self.global_offset_to_position(words::next_word_end(&chars, global))
    }

    /// To the start of the previous word.
    pub fn move_word_backward(&self, position: &CursorPosition) -> CursorPosition {
        let global = self.position_to_global_offset(position);
        let chars = self.document_chars();
        self.global_offset_to_position(words::previous_word_start(&chars, global))
    }

    /// Selection spanning the word under `position` (empty between words).
    pub fn word_at(&self, position: &CursorPosition) -> Selection {
        let global = self.position_to_global_offset(position);
        let chars = self.document_chars();
        let (start, end) = words::word_range_at(&chars, global);
        Selection::new(self.global_offset_to_position(start), self.global_offset_to_position(end))
    }

    // -- focus -------------------------------------------------------------------

    fn is_focus_target(&self, entry: &OffsetEntry) -> bool {
        self.tree.get(entry.segment).is_some_and(|seg| {
            let interaction = seg.interaction();
            interaction.focusable && !interaction.keyboard_transparent && !self.tree.is_hidden(entry.segment)
        })
    }

    fn current_addressable(&self, position: &CursorPosition) -> usize {
        self.cache.addressable_index(&position.path).unwrap_or_else(|| {
            let resolved = self.global_offset_to_position(self.position_to_global_offset(position));
            self.cache.addressable_index(&resolved.path).unwrap_or(0)
        })
    }

    /// Start of the next focusable segment, wrapping once past the end. The
    /// current segment is the last candidate; with none found, `position`
    /// is returned unchanged.
    pub fn move_to_next_focusable(&self, position: &CursorPosition) -> CursorPosition {
        self.scan_focusable(position, true)
    }

    /// Start of the previous focusable segment, wrapping once past the start.
    pub fn move_to_previous_focusable(&self, position: &CursorPosition) -> CursorPosition {
        self.scan_focusable(position, false)
    }

    fn scan_focusable(&self, position: &CursorPosition, forward: bool) -> CursorPosition {
        let count = self.cache.addressable().len();
        if count == 0 {
            return position.clone();
        }
        let current = self.current_addressable(position);
        for step in 1..=count {
            let i = if forward { (current + step) % count } else { (current + count - step % count) % count };
            if let Some(entry) = self.cache.addressable_at(i).filter(|e| self.is_focus_target(e)) {
                return CursorPosition::new(entry.path.clone(), 0, entry.start);
            }
        }
        position.clone()
    }

    // -- capabilities ------------------------------------------------------------

    /// Text segments that are editable and visible.
    pub fn can_edit_at(&self, position: &CursorPosition) -> bool {
        let Some(entry) = self.cache.entry_for_path(&position.path) else {
            return false;
        };
        entry.kind == SegmentKind::Text
            && self
                .tree
                .get(entry.segment)
                .is_some_and(|s| s.interaction().editable && !self.tree.is_hidden(entry.segment))
    }

    /// Selectable and visible segments of any kind.
    pub fn can_select_at(&self, position: &CursorPosition) -> bool {
        let Some(entry) = self.cache.entry_for_path(&position.path) else {
            return false;
        };
        self.tree
            .get(entry.segment)
            .is_some_and(|s| s.interaction().selectable && !self.tree.is_hidden(entry.segment))
    }

    // -- text extraction ---------------------------------------------------------

    /// Text between the ends of `selection`, in document order. Non-text
    /// segments contribute U+FFFC.
    pub fn get_text_in_range(&self, selection: &Selection) -> String {
        let a = self.position_to_global_offset(&selection.start);
        let b = self.position_to_global_offset(&selection.end);
        self.text_between(a.min(b), a.max(b)).into_iter().collect()
    }

    /// Code points in the global range `[start, end)`.
    pub fn text_between(&self, start: usize, end: usize) -> Vec<char> {
        let mut chars = Vec::new();
        for entry in self.cache.addressable() {
            if entry.end() <= start || entry.start >= end {
                continue;
            }
            self.push_chars(entry, start.max(entry.start), end.min(entry.end()), &mut chars);
        }
        chars
    }

    fn push_chars(&self, entry: &OffsetEntry, from: usize, to: usize, out: &mut Vec<char>) {
        if from >= to {
            return;
        }
        match self.tree.get(entry.segment).and_then(|s| s.as_text()) {
            Some(text) => out.extend_from_slice(&text.chars()[from - entry.start..to - entry.start]),
            None => out.extend(std::iter::repeat(OBJECT_REPLACEMENT).take(to - from)),
        }
    }

    /// Entries overlapping `[start, end)`; atomic entries count only when
    /// their single offset is inside.
    pub(crate) fn entries_in_range(&self, start: usize, end: usize) -> Vec<&'a OffsetEntry> {
        self.cache
            .addressable()
            .filter(|e| e.length > 0 && e.start < end && e.end() > start)
            .collect()
    }
}

fn position_in(entry: &OffsetEntry, target: usize) -> CursorPosition {
    let local = match entry.kind {
        SegmentKind::Container => 0,
        _ => target - entry.start,
    };
    CursorPosition::new(entry.path.clone(), local, target)
}
