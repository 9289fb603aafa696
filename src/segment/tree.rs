//! The segment tree: a slotmap arena with parent/child links.

use std::ops::Range;

use slotmap::{SecondaryMap, SlotMap};

use super::error::SegmentError;
use super::node::{ImageContent, Segment, SegmentContent, SegmentId, SegmentKind, TextContent};
use super::path::SegmentPath;
use super::props::{Display, InteractionProps, LayoutProps, TextStyle};
use super::span::{self, RichTextSpan};

/// Empty slice returned for segments without children.
const NO_CHILDREN: &[SegmentId] = &[];

/// The content tree owned by a document.
///
/// All segments live in one `SlotMap`; parent/child relationships are stored
/// in secondary maps. The root is always a container and cannot be removed.
///
/// `structure_version` increases on every change to the shape of the global
/// offset space other than in-place text edits: child insertion and removal,
/// and display toggles to or from [`Display::None`]. Offset caches compare it
/// to detect structural edits they were not told about.
#[derive(Debug, Clone)]
pub struct SegmentTree {
    segments: SlotMap<SegmentId, Segment>,
    children: SecondaryMap<SegmentId, Vec<SegmentId>>,
    parent: SecondaryMap<SegmentId, SegmentId>,
    root: SegmentId,
    structure_version: u64,
}

impl SegmentTree {
    /// Create a tree with an empty block container as root.
    pub fn new() -> Self {
        Self::with_root_segment(Segment::container())
    }

    /// Create a tree whose root is `root`, which must be a container.
    pub fn with_root(root: Segment) -> Result<Self, SegmentError> {
        if !root.is_container() {
            return Err(SegmentError::RootNotContainer);
        }
        Ok(Self::with_root_segment(root))
    }

    fn with_root_segment(root: Segment) -> Self {
        let mut segments = SlotMap::with_key();
        let root_id = segments.insert(root);
        let mut children = SecondaryMap::new();
        children.insert(root_id, Vec::new());
        Self {
            segments,
            children,
            parent: SecondaryMap::new(),
            root: root_id,
            structure_version: 0,
        }
    }

    // -- lookup --------------------------------------------------------------

    pub fn root(&self) -> SegmentId {
        self.root
    }

    pub fn get(&self, id: SegmentId) -> Option<&Segment> {
        self.segments.get(id)
    }

    /// Like [`get`](Self::get) but reports a missing segment as an error.
    pub fn segment(&self, id: SegmentId) -> Result<&Segment, SegmentError> {
        self.segments.get(id).ok_or(SegmentError::UnknownSegment(id))
    }

    fn segment_mut(&mut self, id: SegmentId) -> Result<&mut Segment, SegmentError> {
        self.segments.get_mut(id).ok_or(SegmentError::UnknownSegment(id))
    }

    pub fn contains(&self, id: SegmentId) -> bool {
        self.segments.contains_key(id)
    }

    /// Number of segments, root included.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Always false: the tree keeps its root.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn parent(&self, id: SegmentId) -> Option<SegmentId> {
        self.parent.get(id).copied()
    }

    /// Children of a segment; empty for leaves and unknown ids.
    pub fn children(&self, id: SegmentId) -> &[SegmentId] {
        self.children.get(id).map(Vec::as_slice).unwrap_or(NO_CHILDREN)
    }

    pub fn structure_version(&self) -> u64 {
        self.structure_version
    }

    // -- structural edits ----------------------------------------------------

    /// Append `segment` as the last child of `parent`.
    pub fn append_child(&mut self, parent: SegmentId, segment: Segment) -> Result<SegmentId, SegmentError> {
        let len = self.container_children(parent)?.len();
        self.insert_child(parent, len, segment)
    }

    /// Insert `segment` at `index` among the children of `parent`.
    pub fn insert_child(
        &mut self,
        parent: SegmentId,
        index: usize,
        segment: Segment,
    ) -> Result<SegmentId, SegmentError> {
        let len = self.container_children(parent)?.len();
        if index > len {
            return Err(SegmentError::ChildIndexOutOfBounds { index, len });
        }
        let is_container = segment.is_container();
        let id = self.segments.insert(segment);
        if is_container {
            self.children.insert(id, Vec::new());
        }
        self.parent.insert(id, parent);
        if let Some(kids) = self.children.get_mut(parent) {
            kids.insert(index, id);
        }
        self.structure_changed(parent);
        Ok(id)
    }

    /// Remove a segment and its whole subtree, returning the removed segment.
    pub fn remove(&mut self, id: SegmentId) -> Result<Segment, SegmentError> {
        if id == self.root {
            return Err(SegmentError::RootRemoval);
        }
        if !self.segments.contains_key(id) {
            return Err(SegmentError::UnknownSegment(id));
        }
        let parent = self.parent.remove(id);
        if let Some(parent) = parent {
            if let Some(siblings) = self.children.get_mut(parent) {
                siblings.retain(|&child| child != id);
            }
        }

        let mut stack = vec![id];
        let mut removed = None;
        while let Some(current) = stack.pop() {
            if let Some(kids) = self.children.remove(current) {
                stack.extend(kids);
            }
            self.parent.remove(current);
            let data = self.segments.remove(current);
            if current == id {
                removed = data;
            }
        }

        if let Some(parent) = parent {
            self.structure_changed(parent);
        }
        removed.ok_or(SegmentError::UnknownSegment(id))
    }

    /// Remove the `index`-th child of `parent`.
    pub fn remove_child(&mut self, parent: SegmentId, index: usize) -> Result<Segment, SegmentError> {
        let kids = self.container_children(parent)?;
        let child = *kids
            .get(index)
            .ok_or(SegmentError::ChildIndexOutOfBounds { index, len: kids.len() })?;
        self.remove(child)
    }

    /// Remove every child of `parent`.
    pub fn clear_children(&mut self, parent: SegmentId) -> Result<(), SegmentError> {
        let kids = self.container_children(parent)?.to_vec();
        for kid in kids {
            self.remove(kid)?;
        }
        self.structure_changed(parent);
        Ok(())
    }

    fn container_children(&self, id: SegmentId) -> Result<&[SegmentId], SegmentError> {
        let seg = self.segment(id)?;
        if !seg.is_container() {
            return Err(SegmentError::NotAContainer { kind: seg.kind() });
        }
        Ok(self.children(id))
    }

    fn structure_changed(&mut self, at: SegmentId) {
        self.structure_version += 1;
        self.mark_dirty(at);
    }

    // -- content edits -------------------------------------------------------

    fn text_mut(&mut self, id: SegmentId) -> Result<&mut TextContent, SegmentError> {
        let seg = self.segment_mut(id)?;
        match &mut seg.content {
            SegmentContent::Text(text) => Ok(text),
            other => Err(SegmentError::NotText { kind: other.kind() }),
        }
    }

    /// Replace the text of a text segment. Spans that no longer fit are
    /// clipped to the new length; spans left empty are dropped.
    pub fn set_text(&mut self, id: SegmentId, text: &str) -> Result<(), SegmentError> {
        let content = self.text_mut(id)?;
        content.chars = text.chars().collect();
        let len = content.chars.len();
        for s in content.spans.iter_mut() {
            s.start = s.start.min(len);
            s.end = s.end.min(len);
        }
        content.spans.retain(|s| !s.is_empty());
        self.mark_dirty(id);
        Ok(())
    }

    /// Insert `text` at code-point offset `at`. Returns the number of code
    /// points inserted.
    pub fn insert_text(&mut self, id: SegmentId, at: usize, text: &str) -> Result<usize, SegmentError> {
        let content = self.text_mut(id)?;
        let len = content.chars.len();
        if at > len {
            return Err(SegmentError::TextRangeOutOfBounds { start: at, end: at, len });
        }
        let inserted: Vec<char> = text.chars().collect();
        let count = inserted.len();
        content.chars.splice(at..at, inserted);
        span::shift_for_insert(&mut content.spans, at, count);
        self.mark_dirty(id);
        Ok(count)
    }

    /// Delete the code points in `range`.
    pub fn delete_text(&mut self, id: SegmentId, range: Range<usize>) -> Result<(), SegmentError> {
        let content = self.text_mut(id)?;
        let len = content.chars.len();
        if range.start > range.end || range.end > len {
            return Err(SegmentError::TextRangeOutOfBounds { start: range.start, end: range.end, len });
        }
        content.chars.drain(range.clone());
        span::collapse_for_delete(&mut content.spans, range);
        self.mark_dirty(id);
        Ok(())
    }

    /// Replace the spans of a text segment.
    pub fn set_spans(&mut self, id: SegmentId, spans: Vec<RichTextSpan>) -> Result<(), SegmentError> {
        let content = self.text_mut(id)?;
        TextContent::validate_spans(&spans, content.len())?;
        content.spans = spans;
        self.mark_dirty(id);
        Ok(())
    }

    /// Append one span to a text segment.
    pub fn add_span(&mut self, id: SegmentId, new_span: RichTextSpan) -> Result<(), SegmentError> {
        let content = self.text_mut(id)?;
        TextContent::validate_spans(std::slice::from_ref(&new_span), content.len())?;
        content.spans.push(new_span);
        self.mark_dirty(id);
        Ok(())
    }

    /// Replace the payload of an image segment.
    pub fn set_image(&mut self, id: SegmentId, image: ImageContent) -> Result<(), SegmentError> {
        let seg = self.segment_mut(id)?;
        match &mut seg.content {
            SegmentContent::Image(current) => *current = image,
            other => return Err(SegmentError::NotImage { kind: other.kind() }),
        }
        self.mark_dirty(id);
        Ok(())
    }

    // -- property edits ------------------------------------------------------

    /// Edit layout properties in place. Toggling `display` to or from
    /// [`Display::None`] reshapes the offset space and counts as structural.
    pub fn update_layout(
        &mut self,
        id: SegmentId,
        edit: impl FnOnce(&mut LayoutProps),
    ) -> Result<(), SegmentError> {
        let seg = self.segment_mut(id)?;
        let was_none = seg.layout.display == Display::None;
        edit(&mut seg.layout);
        let is_none = seg.layout.display == Display::None;
        if was_none != is_none {
            self.structure_version += 1;
        }
        self.mark_dirty(id);
        Ok(())
    }

    /// Edit interaction flags. These do not affect geometry.
    pub fn update_interaction(
        &mut self,
        id: SegmentId,
        edit: impl FnOnce(&mut InteractionProps),
    ) -> Result<(), SegmentError> {
        edit(&mut self.segment_mut(id)?.interaction);
        Ok(())
    }

    /// Edit the text style. Fonts change measured widths, so this dirties.
    pub fn update_style(&mut self, id: SegmentId, edit: impl FnOnce(&mut TextStyle)) -> Result<(), SegmentError> {
        edit(&mut self.segment_mut(id)?.style);
        self.mark_dirty(id);
        Ok(())
    }

    // -- dirty tracking ------------------------------------------------------

    /// Mark a segment and all of its ancestors dirty.
    fn mark_dirty(&mut self, id: SegmentId) {
        let mut current = Some(id);
        while let Some(node) = current {
            if let Some(seg) = self.segments.get_mut(node) {
                seg.dirty = true;
            }
            current = self.parent.get(node).copied();
        }
    }

    pub fn is_dirty(&self, id: SegmentId) -> bool {
        self.segments.get(id).is_some_and(|s| s.dirty)
    }

    /// Whether anything in the tree changed since the last [`take_dirty`](Self::take_dirty).
    pub fn any_dirty(&self) -> bool {
        self.is_dirty(self.root)
    }

    /// Clear every dirty flag, returning the ids that were dirty.
    pub fn take_dirty(&mut self) -> Vec<SegmentId> {
        let mut dirty = Vec::new();
        for (id, seg) in self.segments.iter_mut() {
            if seg.dirty {
                seg.dirty = false;
                dirty.push(id);
            }
        }
        dirty
    }

    // -- queries -------------------------------------------------------------

    /// Content length of a segment: code points for text, the sum of
    /// displayed children for containers, 1 for atomic kinds, and 0 for
    /// anything with `display: none` or not in the tree.
    pub fn content_length(&self, id: SegmentId) -> usize {
        let Some(seg) = self.segments.get(id) else {
            return 0;
        };
        if seg.layout.display == Display::None {
            return 0;
        }
        if seg.is_container() {
            self.children(id).iter().map(|&c| self.content_length(c)).sum()
        } else {
            seg.own_length()
        }
    }

    /// Total length of the document.
    pub fn total_length(&self) -> usize {
        self.content_length(self.root)
    }

    /// Whether the segment and all of its ancestors are displayed.
    pub fn is_displayed(&self, id: SegmentId) -> bool {
        let mut current = Some(id);
        while let Some(node) = current {
            match self.segments.get(node) {
                Some(seg) if seg.layout.display != Display::None => {}
                _ => return false,
            }
            current = self.parent.get(node).copied();
        }
        true
    }

    /// Whether any ancestor-or-self has `display: hidden`.
    pub fn is_hidden(&self, id: SegmentId) -> bool {
        let mut current = Some(id);
        while let Some(node) = current {
            if self.segments.get(node).is_some_and(|s| s.layout.display == Display::Hidden) {
                return true;
            }
            current = self.parent.get(node).copied();
        }
        false
    }

    /// Index path from the root to `id`.
    pub fn path_of(&self, id: SegmentId) -> Option<SegmentPath> {
        if !self.segments.contains_key(id) {
            return None;
        }
        let mut indices = Vec::new();
        let mut current = id;
        while let Some(parent) = self.parent.get(current).copied() {
            let index = self.children(parent).iter().position(|&c| c == current)?;
            indices.push(index);
            current = parent;
        }
        indices.reverse();
        Some(SegmentPath::new(indices))
    }

    /// Follow a path from the root. Returns `None` if any index is past the
    /// end of a children list.
    pub fn resolve_path(&self, path: &SegmentPath) -> Option<SegmentId> {
        let mut current = self.root;
        for &index in path.indices() {
            current = *self.children(current).get(index)?;
        }
        Some(current)
    }

    /// Pre-order traversal of every segment under `start`, inclusive.
    pub fn walk_pre_order(&self, start: SegmentId) -> Vec<SegmentId> {
        self.walk(start, false)
    }

    /// Pre-order traversal skipping `display: none` subtrees.
    pub fn walk_displayed(&self, start: SegmentId) -> Vec<SegmentId> {
        self.walk(start, true)
    }

    fn walk(&self, start: SegmentId, displayed_only: bool) -> Vec<SegmentId> {
        let mut result = Vec::new();
        let mut stack = vec![start];
        while let Some(current) = stack.pop() {
            let Some(seg) = self.segments.get(current) else {
                continue;
            };
            if displayed_only && seg.layout.display == Display::None {
                continue;
            }
            result.push(current);
            for &child in self.children(current).iter().rev() {
                stack.push(child);
            }
        }
        result
    }

    /// The text of a text segment.
    pub fn text_of(&self, id: SegmentId) -> Option<String> {
        self.segments.get(id)?.as_text().map(TextContent::text)
    }

    /// Kind of a segment, if present.
    pub fn kind_of(&self, id: SegmentId) -> Option<SegmentKind> {
        self.segments.get(id).map(Segment::kind)
    }
}

impl Default for SegmentTree {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::segment::props::Dimension;

    /// ```text
    ///        root
    ///      /   |   \
    ///    a(c)  img  b("xyz")
    ///   /   \
    /// "hello" "wo"
    /// ```
    fn build() -> (SegmentTree, SegmentId, SegmentId, SegmentId, SegmentId, SegmentId) {
        let mut tree = SegmentTree::new();
        let root = tree.root();
        let a = tree.append_child(root, Segment::container()).unwrap();
        let hello = tree.append_child(a, Segment::text("hello")).unwrap();
        let wo = tree.append_child(a, Segment::text("wo")).unwrap();
        let _img = tree.append_child(root, Segment::image(ImageContent::new(vec![0]))).unwrap();
        let b = tree.append_child(root, Segment::text("xyz")).unwrap();
        (tree, root, a, hello, wo, b)
    }

    #[test]
    fn new_tree_has_container_root() {
        let tree = SegmentTree::new();
        assert_eq!(tree.len(), 1);
        assert_eq!(tree.kind_of(tree.root()), Some(SegmentKind::Container));
        assert_eq!(tree.total_length(), 0);
    }

    #[test]
    fn with_root_rejects_leaf() {
        assert_eq!(
            SegmentTree::with_root(Segment::text("x")).unwrap_err(),
            SegmentError::RootNotContainer
        );
    }

    #[test]
    fn content_length_sums_recursively() {
        let (tree, root, a, hello, _wo, b) = build();
        assert_eq!(tree.content_length(hello), 5);
        assert_eq!(tree.content_length(a), 7);
        assert_eq!(tree.content_length(b), 3);
        assert_eq!(tree.content_length(root), 11);
    }

    #[test]
    fn display_none_excluded_from_length() {
        let (mut tree, root, a, ..) = build();
        tree.update_layout(a, |l| l.display = Display::None).unwrap();
        assert_eq!(tree.content_length(root), 4);
        assert_eq!(tree.content_length(a), 0);
    }

    #[test]
    fn display_toggle_bumps_structure_version() {
        let (mut tree, _root, a, ..) = build();
        let before = tree.structure_version();
        tree.update_layout(a, |l| l.width = Dimension::Pixels(3.0)).unwrap();
        assert_eq!(tree.structure_version(), before);
        tree.update_layout(a, |l| l.display = Display::None).unwrap();
        assert_eq!(tree.structure_version(), before + 1);
    }

    #[test]
    fn children_only_on_containers() {
        let (mut tree, .., b) = build();
        let err = tree.append_child(b, Segment::text("nope")).unwrap_err();
        assert_eq!(err, SegmentError::NotAContainer { kind: SegmentKind::Text });
    }

    #[test]
    fn insert_child_at_index() {
        let (mut tree, root, a, ..) = build();
        let first = tree.insert_child(root, 0, Segment::spacer(1.0, 1.0)).unwrap();
        assert_eq!(tree.children(root)[0], first);
        assert_eq!(tree.children(root)[1], a);
    }

    #[test]
    fn insert_child_out_of_bounds() {
        let (mut tree, root, ..) = build();
        let err = tree.insert_child(root, 9, Segment::container()).unwrap_err();
        assert_eq!(err, SegmentError::ChildIndexOutOfBounds { index: 9, len: 3 });
    }

    #[test]
    fn remove_subtree() {
        let (mut tree, root, a, hello, wo, b) = build();
        tree.remove(a).unwrap();
        assert!(!tree.contains(a));
        assert!(!tree.contains(hello));
        assert!(!tree.contains(wo));
        assert_eq!(tree.children(root).len(), 2);
        assert_eq!(tree.children(root)[1], b);
    }

    #[test]
    fn root_cannot_be_removed() {
        let mut tree = SegmentTree::new();
        let root = tree.root();
        assert_eq!(tree.remove(root).unwrap_err(), SegmentError::RootRemoval);
    }

    #[test]
    fn remove_child_by_index() {
        let (mut tree, root, ..) = build();
        let removed = tree.remove_child(root, 1).unwrap();
        assert_eq!(removed.kind(), SegmentKind::Image);
        assert_eq!(tree.total_length(), 10);
    }

    #[test]
    fn clear_children_empties_container() {
        let (mut tree, _root, a, ..) = build();
        tree.clear_children(a).unwrap();
        assert!(tree.children(a).is_empty());
        assert_eq!(tree.content_length(a), 0);
    }

    #[test]
    fn set_text_on_container_fails() {
        let (mut tree, _root, a, ..) = build();
        assert_eq!(
            tree.set_text(a, "x").unwrap_err(),
            SegmentError::NotText { kind: SegmentKind::Container }
        );
    }

    #[test]
    fn insert_and_delete_text() {
        let (mut tree, .., b) = build();
        assert_eq!(tree.insert_text(b, 1, "--").unwrap(), 2);
        assert_eq!(tree.text_of(b).unwrap(), "x--yz");
        tree.delete_text(b, 0..3).unwrap();
        assert_eq!(tree.text_of(b).unwrap(), "yz");
    }

    #[test]
    fn delete_text_out_of_range() {
        let (mut tree, .., b) = build();
        let err = tree.delete_text(b, 1..9).unwrap_err();
        assert_eq!(err, SegmentError::TextRangeOutOfBounds { start: 1, end: 9, len: 3 });
    }

    #[test]
    fn text_edits_move_spans() {
        let (mut tree, .., b) = build();
        tree.set_spans(b, vec![RichTextSpan::new(1, 3, TextStyle::new().with_bold(true))]).unwrap();
        tree.insert_text(b, 0, "ab").unwrap();
        let spans = tree.get(b).unwrap().as_text().unwrap().spans().to_vec();
        assert_eq!(spans[0].range(), 3..5);
    }

    #[test]
    fn set_text_clips_spans() {
        let (mut tree, .., b) = build();
        tree.set_spans(b, vec![RichTextSpan::new(1, 3, TextStyle::new())]).unwrap();
        tree.set_text(b, "q").unwrap();
        assert!(tree.get(b).unwrap().as_text().unwrap().spans().is_empty());
    }

    #[test]
    fn paths_resolve_both_ways() {
        let (tree, root, a, _hello, wo, b) = build();
        assert_eq!(tree.path_of(root), Some(SegmentPath::root()));
        assert_eq!(tree.path_of(wo), Some(SegmentPath::new(vec![0, 1])));
        assert_eq!(tree.path_of(b), Some(SegmentPath::new(vec![2])));
        assert_eq!(tree.resolve_path(&SegmentPath::new(vec![0])), Some(a));
        assert_eq!(tree.resolve_path(&SegmentPath::new(vec![0, 7])), None);
    }

    #[test]
    fn walks() {
        let (mut tree, root, a, hello, wo, b) = build();
        let img = tree.children(root)[1];
        assert_eq!(tree.walk_pre_order(root), vec![root, a, hello, wo, img, b]);
        tree.update_layout(a, |l| l.display = Display::None).unwrap();
        assert_eq!(tree.walk_displayed(root), vec![root, img, b]);
    }

    #[test]
    fn dirty_propagates_to_ancestors() {
        let (mut tree, root, a, hello, ..) = build();
        tree.take_dirty();
        assert!(!tree.any_dirty());
        tree.insert_text(hello, 0, "x").unwrap();
        assert!(tree.is_dirty(hello));
        assert!(tree.is_dirty(a));
        assert!(tree.is_dirty(root));
    }

    #[test]
    fn interaction_edits_do_not_dirty() {
        let (mut tree, root, ..) = build();
        tree.take_dirty();
        tree.update_interaction(root, |i| i.focusable = false).unwrap();
        assert!(!tree.any_dirty());
    }

    #[test]
    fn displayed_and_hidden() {
        let (mut tree, _root, a, hello, ..) = build();
        tree.update_layout(a, |l| l.display = Display::Hidden).unwrap();
        assert!(tree.is_displayed(hello));
        assert!(tree.is_hidden(hello));
        tree.update_layout(a, |l| l.display = Display::None).unwrap();
        assert!(!tree.is_displayed(hello));
    }

    #[test]
    fn set_image_requires_image() {
        let (mut tree, .., b) = build();
        let err = tree.set_image(b, ImageContent::default()).unwrap_err();
        assert_eq!(err, SegmentError::NotImage { kind: SegmentKind::Text });
    }
}
