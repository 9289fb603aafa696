//! Text edits addressed by cursor position, keeping the offset cache current.

use tracing::debug;

use crate::segment::{SegmentError, SegmentId, SegmentKind, SegmentPath, SegmentTree};

use super::cache::OffsetCache;
use super::position::{CursorPosition, Selection};

/// Insert `text` at `position`. Returns the caret after the inserted text.
///
/// The segment must be an editable, visible text segment. The offset cache
/// is shifted in place rather than rebuilt.
pub fn insert_text(
    tree: &mut SegmentTree,
    cache: &mut OffsetCache,
    position: &CursorPosition,
    text: &str,
) -> Result<CursorPosition, SegmentError> {
    let target = cache.navigator(tree).refresh(position);
    let entry = cache
        .entry_for_path(&target.path)
        .ok_or_else(|| SegmentError::NotEditable { path: target.path.clone() })?;
    if entry.kind != SegmentKind::Text {
        return Err(SegmentError::NotText { kind: entry.kind });
    }
    let id = entry.segment;
    ensure_editable(tree, id, &target.path)?;

    let count = tree.insert_text(id, target.local_offset, text)?;
    cache.notify_text_insert(tree, &target, count);
    Ok(CursorPosition::new(
        target.path,
        target.local_offset + count,
        target.global_offset + count,
    ))
}

/// Delete the content between the ends of `selection`. Returns the caret at
/// the start of the removed range.
///
/// Every segment touched must be editable, otherwise nothing changes. Text
/// segments lose the overlapping code points; atomic segments in range are
/// removed. Text segments emptied entirely are removed too, except the first
/// one, which keeps the caret.
pub fn delete_range(
    tree: &mut SegmentTree,
    cache: &mut OffsetCache,
    selection: &Selection,
) -> Result<CursorPosition, SegmentError> {
    let nav = cache.navigator(tree);
    let a = nav.position_to_global_offset(&selection.start);
    let b = nav.position_to_global_offset(&selection.end);
    let (start, end) = (a.min(b), a.max(b));
    if start == end {
        return Ok(nav.global_offset_to_position(start));
    }

    let affected: Vec<Affected> = nav
        .entries_in_range(start, end)
        .into_iter()
        .map(|e| Affected { segment: e.segment, path: e.path.clone(), kind: e.kind, start: e.start, length: e.length })
        .collect();
    for item in &affected {
        ensure_editable(tree, item.segment, &item.path)?;
    }

    if let [only] = affected.as_slice() {
        if only.kind == SegmentKind::Text {
            let local = start - only.start;
            tree.delete_text(only.segment, local..end - only.start)?;
            let at = CursorPosition::new(only.path.clone(), local, start);
            cache.notify_text_delete(tree, &at, end - start);
            return Ok(at);
        }
    }

    let mut removals = Vec::new();
    for (i, item) in affected.iter().enumerate() {
        if item.kind != SegmentKind::Text {
            removals.push(item.segment);
            continue;
        }
        let from = start.max(item.start) - item.start;
        let to = end.min(item.start + item.length) - item.start;
        tree.delete_text(item.segment, from..to)?;
        if i > 0 && from == 0 && to == item.length {
            removals.push(item.segment);
        }
    }
    for id in &removals {
        tree.remove(*id)?;
    }
    debug!(start, end, segments = affected.len(), removed = removals.len(), "deleted range");

    cache.invalidate();
    Ok(cache.navigator(tree).global_offset_to_position(start))
}

/// Replace the selected content with `text`.
pub fn replace_range(
    tree: &mut SegmentTree,
    cache: &mut OffsetCache,
    selection: &Selection,
    text: &str,
) -> Result<CursorPosition, SegmentError> {
    let caret = delete_range(tree, cache, selection)?;
    if text.is_empty() {
        return Ok(caret);
    }
    insert_text(tree, cache, &caret, text)
}

struct Affected {
    segment: SegmentId,
    path: SegmentPath,
    kind: SegmentKind,
    start: usize,
    length: usize,
}

fn ensure_editable(tree: &SegmentTree, id: SegmentId, path: &SegmentPath) -> Result<(), SegmentError> {
    let segment = tree.segment(id)?;
    if segment.interaction().editable && !tree.is_hidden(id) {
        Ok(())
    } else {
        Err(SegmentError::NotEditable { path: path.clone() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::segment::{Display, ImageContent, InteractionProps, Segment};
    use pretty_assertions::assert_eq;

    fn pos(path: Vec<usize>, local: usize, global: usize) -> CursorPosition {
        CursorPosition::new(SegmentPath::new(path), local, global)
    }

    fn texts(tree: &SegmentTree) -> Vec<String> {
        tree.children(tree.root()).iter().map(|&c| tree.text_of(c).unwrap_or_else(|| "#".into())).collect()
    }

    fn three_words() -> SegmentTree {
        let mut tree = SegmentTree::with_root(Segment::container()).unwrap();
        let root = tree.root();
        tree.append_child(root, Segment::text("one")).unwrap();
        tree.append_child(root, Segment::image(ImageContent::new(vec![]))).unwrap();
        tree.append_child(root, Segment::text("two")).unwrap();
        tree.append_child(root, Segment::text("three")).unwrap();
        tree
    }

    #[test]
    fn insert_moves_caret_and_shifts_cache() {
        let mut tree = three_words();
        let mut cache = OffsetCache::build(&tree);
        let caret = insert_text(&mut tree, &mut cache, &pos(vec![0], 1, 1), "XY").unwrap();
        assert_eq!(caret, pos(vec![0], 3, 3));
        assert_eq!(tree.text_of(tree.children(tree.root())[0]).unwrap(), "oXYne");
        assert_eq!(cache.snapshot(), OffsetCache::build(&tree).snapshot());
        assert_eq!(cache.total_length(), 14);
    }

    #[test]
    fn insert_clamps_local_offset() {
        let mut tree = three_words();
        let mut cache = OffsetCache::build(&tree);
        let caret = insert_text(&mut tree, &mut cache, &pos(vec![0], 99, 99), "!").unwrap();
        assert_eq!(caret, pos(vec![0], 4, 4));
        assert_eq!(texts(&tree)[0], "one!");
    }

    #[test]
    fn insert_rejects_non_text_and_locked() {
        let mut tree = three_words();
        let root = tree.root();
        let locked = InteractionProps { editable: false, ..InteractionProps::default() };
        tree.append_child(root, Segment::text("ro").with_interaction(locked)).unwrap();
        let mut cache = OffsetCache::new();
        let err = insert_text(&mut tree, &mut cache, &pos(vec![1], 0, 3), "x").unwrap_err();
        assert_eq!(err, SegmentError::NotText { kind: SegmentKind::Image });
        let err = insert_text(&mut tree, &mut cache, &pos(vec![4], 0, 12), "x").unwrap_err();
        assert_eq!(err, SegmentError::NotEditable { path: SegmentPath::new(vec![4]) });
    }

    #[test]
    fn delete_within_one_segment() {
        let mut tree = three_words();
        let mut cache = OffsetCache::build(&tree);
        let sel = Selection::new(pos(vec![3], 4, 11), pos(vec![3], 1, 8));
        let caret = delete_range(&mut tree, &mut cache, &sel).unwrap();
        assert_eq!(caret, pos(vec![3], 1, 8));
        assert_eq!(texts(&tree), vec!["one", "#", "two", "te"]);
        assert_eq!(cache.snapshot(), OffsetCache::build(&tree).snapshot());
    }

    #[test]
    fn delete_across_segments() {
        let mut tree = three_words();
        let mut cache = OffsetCache::build(&tree);
        // "o|ne", image, "two", "th|ree"
        let sel = Selection::new(pos(vec![0], 1, 1), pos(vec![3], 2, 9));
        let caret = delete_range(&mut tree, &mut cache, &sel).unwrap();
        assert_eq!(texts(&tree), vec!["o", "ree"]);
        assert_eq!(caret.global_offset, 1);
        cache.ensure(&tree);
        assert_eq!(cache.total_length(), 4);
    }

    #[test]
    fn delete_refuses_locked_segment_in_range() {
        let mut tree = SegmentTree::with_root(Segment::container()).unwrap();
        let root = tree.root();
        let locked = InteractionProps { editable: false, ..InteractionProps::default() };
        tree.append_child(root, Segment::text("ab")).unwrap();
        tree.append_child(root, Segment::text("cd").with_interaction(locked)).unwrap();
        let mut cache = OffsetCache::new();
        let sel = Selection::new(pos(vec![0], 1, 1), pos(vec![1], 1, 3));
        let err = delete_range(&mut tree, &mut cache, &sel).unwrap_err();
        assert_eq!(err, SegmentError::NotEditable { path: SegmentPath::new(vec![1]) });
        assert_eq!(texts(&tree), vec!["ab", "cd"]);
    }

    #[test]
    fn empty_selection_deletes_nothing() {
        let mut tree = three_words();
        let mut cache = OffsetCache::new();
        let caret = delete_range(&mut tree, &mut cache, &Selection::collapsed(pos(vec![2], 1, 5))).unwrap();
        assert_eq!(caret, pos(vec![2], 1, 5));
        assert_eq!(texts(&tree), vec!["one", "#", "two", "three"]);
    }

    #[test]
    fn hidden_text_is_not_editable() {
        let mut tree = SegmentTree::with_root(Segment::container()).unwrap();
        let root = tree.root();
        tree.append_child(root, Segment::text("shh").with_display(Display::Hidden)).unwrap();
        let mut cache = OffsetCache::new();
        assert!(insert_text(&mut tree, &mut cache, &pos(vec![0], 0, 0), "x").is_err());
    }

    #[test]
    fn replace_selection() {
        let mut tree = three_words();
        let mut cache = OffsetCache::new();
        let sel = Selection::new(pos(vec![2], 0, 4), pos(vec![2], 3, 7));
        let caret = replace_range(&mut tree, &mut cache, &sel, "2").unwrap();
        assert_eq!(texts(&tree), vec!["one", "#", "2", "three"]);
        assert_eq!(caret, pos(vec![2], 1, 5));
    }
}
