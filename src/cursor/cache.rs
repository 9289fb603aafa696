//! Offset cache: segment -> global start offset and content length.
//!
//! Built by one pre-order traversal over the displayed segments and kept
//! consistent across text inserts/deletes by shifting entries in place.
//! Any structural change to the tree (detected through
//! [`SegmentTree::structure_version`]) makes the cache stale; it is rebuilt
//! on the next [`OffsetCache::ensure`].

use std::collections::HashMap;

use tracing::{debug, trace};

use crate::segment::{Display, SegmentId, SegmentKind, SegmentPath, SegmentTree};

use super::position::CursorPosition;

/// One displayed segment in the offset space.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OffsetEntry {
    pub segment: SegmentId,
    pub path: SegmentPath,
    pub kind: SegmentKind,
    pub start: usize,
    pub length: usize,
    /// Leaves, and containers without displayed children: the segments a
    /// cursor position resolves to.
    pub addressable: bool,
}

impl OffsetEntry {
    pub fn end(&self) -> usize {
        self.start + self.length
    }
}

/// Pre-ordered offset entries with id and path indexes.
#[derive(Debug, Clone, Default)]
pub struct OffsetCache {
    entries: Vec<OffsetEntry>,
    by_id: HashMap<SegmentId, usize>,
    by_path: HashMap<SegmentPath, usize>,
    /// Indices into `entries` of addressable entries, in pre-order.
    addressable: Vec<usize>,
    total: usize,
    /// Tree structure version the entries were built from; `None` when stale.
    built_for: Option<u64>,
}

impl OffsetCache {
    /// An empty, stale cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a fresh cache for `tree`.
    pub fn build(tree: &SegmentTree) -> Self {
        let mut cache = Self::new();
        cache.rebuild(tree);
        cache
    }

    /// Whether the entries still describe `tree`'s structure.
    pub fn is_valid_for(&self, tree: &SegmentTree) -> bool {
        self.built_for == Some(tree.structure_version())
    }

    /// Mark stale; the next [`ensure`](Self::ensure) rebuilds.
    pub fn invalidate(&mut self) {
        if self.built_for.take().is_some() {
            trace!("offset cache invalidated");
        }
    }

    /// Rebuild if stale.
    pub fn ensure(&mut self, tree: &SegmentTree) {
        if !self.is_valid_for(tree) {
            self.rebuild(tree);
        }
    }

    /// Discard all entries and traverse `tree` again.
    pub fn rebuild(&mut self, tree: &SegmentTree) {
        self.entries.clear();
        self.by_id.clear();
        self.by_path.clear();
        self.addressable.clear();
        self.total = self.visit(tree, tree.root(), SegmentPath::root(), 0);
        for (i, entry) in self.entries.iter().enumerate() {
            self.by_id.insert(entry.segment, i);
            self.by_path.insert(entry.path.clone(), i);
            if entry.addressable {
                self.addressable.push(i);
            }
        }
        self.built_for = Some(tree.structure_version());
        debug!(entries = self.entries.len(), total = self.total, "offset cache rebuilt");
    }

    /// Push the entry for `id` and its displayed descendants; returns its length.
    fn visit(&mut self, tree: &SegmentTree, id: SegmentId, path: SegmentPath, start: usize) -> usize {
        let Some(seg) = tree.get(id) else {
            return 0;
        };
        if seg.display() == Display::None {
            return 0;
        }
        let index = self.entries.len();
        self.entries.push(OffsetEntry {
            segment: id,
            path: path.clone(),
            kind: seg.kind(),
            start,
            length: 0,
            addressable: true,
        });
        let length = if seg.is_container() {
            let mut length = 0;
            let mut any_displayed = false;
            for (i, &child) in tree.children(id).iter().enumerate() {
                if tree.get(child).is_some_and(|c| c.display() != Display::None) {
                    any_displayed = true;
                }
                length += self.visit(tree, child, path.child(i), start + length);
            }
            self.entries[index].addressable = !any_displayed;
            length
        } else {
            tree.content_length(id)
        };
        self.entries[index].length = length;
        length
    }

    // -- incremental updates -------------------------------------------------

    /// Account for `length` code points inserted into the text segment at
    /// `position`. The edited entry and its ancestors grow; every entry after
    /// it in document order shifts.
    pub fn notify_text_insert(&mut self, tree: &SegmentTree, position: &CursorPosition, length: usize) {
        let Some(index) = self.edited_entry(tree, position) else {
            self.invalidate();
            return;
        };
        self.resize_entry(index, &position.path, |len| Some(len + length), |start| start + length);
        self.total += length;
        trace!(path = %position.path, length, total = self.total, "offset cache shifted for insert");
    }

    /// Account for `length` code points deleted from the text segment at
    /// `position`. Deleting more than the entry holds invalidates instead.
    pub fn notify_text_delete(&mut self, tree: &SegmentTree, position: &CursorPosition, length: usize) {
        let Some(index) = self.edited_entry(tree, position) else {
            self.invalidate();
            return;
        };
        if self.entries[index].length < length {
            self.invalidate();
            return;
        }
        self.resize_entry(index, &position.path, |len| len.checked_sub(length), |start| start.saturating_sub(length));
        self.total = self.total.saturating_sub(length);
        trace!(path = %position.path, length, total = self.total, "offset cache shifted for delete");
    }

    /// The text entry at `position.path`, if the cache is current.
    fn edited_entry(&self, tree: &SegmentTree, position: &CursorPosition) -> Option<usize> {
        if !self.is_valid_for(tree) {
            return None;
        }
        let index = *self.by_path.get(&position.path)?;
        (self.entries[index].kind == SegmentKind::Text).then_some(index)
    }

    fn resize_entry(
        &mut self,
        index: usize,
        path: &SegmentPath,
        resize: impl Fn(usize) -> Option<usize>,
        shift: impl Fn(usize) -> usize,
    ) {
        let mut ancestor = Some(path.clone());
        while let Some(p) = ancestor {
            if let Some(&i) = self.by_path.get(&p) {
                let entry = &mut self.entries[i];
                entry.length = resize(entry.length).unwrap_or(0);
            }
            ancestor = p.parent();
        }
        for entry in &mut self.entries[index + 1..] {
            entry.start = shift(entry.start);
        }
    }

    // -- lookups ---------------------------------------------------------------

    pub fn total_length(&self) -> usize {
        self.total
    }

    pub fn entries(&self) -> &[OffsetEntry] {
        &self.entries
    }

    pub fn entry(&self, id: SegmentId) -> Option<&OffsetEntry> {
        self.by_id.get(&id).map(|&i| &self.entries[i])
    }

    pub fn entry_for_path(&self, path: &SegmentPath) -> Option<&OffsetEntry> {
        self.by_path.get(path).map(|&i| &self.entries[i])
    }

    /// Addressable entries in document order.
    pub fn addressable(&self) -> impl DoubleEndedIterator<Item = &OffsetEntry> + ExactSizeIterator + '_ {
        self.addressable.iter().map(move |&i| &self.entries[i])
    }

    /// Position of `path` in the addressable sequence.
    pub(crate) fn addressable_index(&self, path: &SegmentPath) -> Option<usize> {
        let entry_index = *self.by_path.get(path)?;
        self.addressable.binary_search(&entry_index).ok()
    }

    /// The `i`-th addressable entry.
    pub(crate) fn addressable_at(&self, i: usize) -> Option<&OffsetEntry> {
        self.addressable.get(i).map(|&e| &self.entries[e])
    }

    /// Start/length pairs in pre-order, for comparing against a rebuild.
    pub fn snapshot(&self) -> Vec<(SegmentId, usize, usize)> {
        self.entries.iter().map(|e| (e.segment, e.start, e.length)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::segment::{ImageContent, Segment};
    use pretty_assertions::assert_eq;

    /// root: [ "abc", container[ image, "de" ], "" (none), "fg" ]
    fn sample() -> (SegmentTree, Vec<SegmentId>) {
        let mut tree = SegmentTree::with_root(Segment::container()).unwrap();
        let root = tree.root();
        let abc = tree.append_child(root, Segment::text("abc")).unwrap();
        let inner = tree.append_child(root, Segment::container()).unwrap();
        let img = tree.append_child(inner, Segment::image(ImageContent::new(vec![]))).unwrap();
        let de = tree.append_child(inner, Segment::text("de")).unwrap();
        let gone = tree.append_child(root, Segment::text("zz").with_display(Display::None)).unwrap();
        let fg = tree.append_child(root, Segment::text("fg")).unwrap();
        (tree, vec![root, abc, inner, img, de, gone, fg])
    }

    #[test]
    fn rebuild_assigns_pre_order_offsets() {
        let (tree, ids) = sample();
        let cache = OffsetCache::build(&tree);
        assert_eq!(cache.total_length(), 8);
        assert_eq!(
            cache.snapshot(),
            vec![(ids[0], 0, 8), (ids[1], 0, 3), (ids[2], 3, 3), (ids[3], 3, 1), (ids[4], 4, 2), (ids[6], 6, 2)]
        );
        assert!(cache.entry(ids[5]).is_none());
    }

    #[test]
    fn addressable_excludes_non_empty_containers() {
        let (tree, ids) = sample();
        let cache = OffsetCache::build(&tree);
        let addressable: Vec<SegmentId> = cache.addressable().map(|e| e.segment).collect();
        assert_eq!(addressable, vec![ids[1], ids[3], ids[4], ids[6]]);
    }

    #[test]
    fn path_lookup() {
        let (tree, ids) = sample();
        let cache = OffsetCache::build(&tree);
        let entry = cache.entry_for_path(&SegmentPath::new(vec![1, 1])).unwrap();
        assert_eq!(entry.segment, ids[4]);
        assert_eq!(entry.end(), 6);
    }

    #[test]
    fn insert_matches_rebuild() {
        let (mut tree, ids) = sample();
        let mut cache = OffsetCache::build(&tree);
        let pos = CursorPosition::new(SegmentPath::new(vec![1, 1]), 1, 5);
        let n = tree.insert_text(ids[4], 1, "xyz").unwrap();
        cache.notify_text_insert(&tree, &pos, n);
        assert!(cache.is_valid_for(&tree));
        assert_eq!(cache.snapshot(), OffsetCache::build(&tree).snapshot());
        assert_eq!(cache.total_length(), 11);
    }

    #[test]
    fn delete_matches_rebuild() {
        let (mut tree, ids) = sample();
        let mut cache = OffsetCache::build(&tree);
        let pos = CursorPosition::new(SegmentPath::new(vec![0]), 0, 0);
        tree.delete_text(ids[1], 0..2).unwrap();
        cache.notify_text_delete(&tree, &pos, 2);
        assert_eq!(cache.snapshot(), OffsetCache::build(&tree).snapshot());
        assert_eq!(cache.total_length(), 6);
    }

    #[test]
    fn oversized_delete_invalidates() {
        let (tree, _) = sample();
        let mut cache = OffsetCache::build(&tree);
        let pos = CursorPosition::new(SegmentPath::new(vec![0]), 0, 0);
        cache.notify_text_delete(&tree, &pos, 10);
        assert!(!cache.is_valid_for(&tree));
    }

    #[test]
    fn notify_on_non_text_invalidates() {
        let (tree, _) = sample();
        let mut cache = OffsetCache::build(&tree);
        let pos = CursorPosition::new(SegmentPath::new(vec![1, 0]), 0, 3);
        cache.notify_text_insert(&tree, &pos, 1);
        assert!(!cache.is_valid_for(&tree));
    }

    #[test]
    fn structural_change_makes_stale_and_ensure_rebuilds() {
        let (mut tree, ids) = sample();
        let mut cache = OffsetCache::build(&tree);
        tree.append_child(ids[2], Segment::text("new")).unwrap();
        assert!(!cache.is_valid_for(&tree));
        cache.ensure(&tree);
        assert!(cache.is_valid_for(&tree));
        assert_eq!(cache.total_length(), 11);
    }

    #[test]
    fn empty_container_is_addressable() {
        let tree = SegmentTree::with_root(Segment::container()).unwrap();
        let cache = OffsetCache::build(&tree);
        assert_eq!(cache.addressable().len(), 1);
        assert_eq!(cache.total_length(), 0);
    }
}
