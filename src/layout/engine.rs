//! Flow layout: block stacking, inline line-wrapping, and global offsets.
//!
//! [`LayoutEngine`] walks the displayed segment tree once, producing a
//! [`LayoutResult`] per segment. Containers with grid properties delegate
//! their children to [`GridLayoutEngine`]; everything else flows:
//!
//! - Block (and hidden) children stack vertically and fill the width
//! - Inline and inline-block children flow left to right and wrap when the
//!   next box would overflow a bounded width
//!
//! Global offsets are assigned in pre-order during the same walk.

use tracing::{debug, trace, warn};

use crate::config::EngineConfig;
use crate::geometry::{Rect, Size};
use crate::segment::{Display, Segment, SegmentContent, SegmentId, SegmentTree, TextContent};
use crate::text::TextMeasurer;
use crate::text::words::is_word_char;

use super::constraints::Constraints;
use super::grid::GridLayoutEngine;
use super::resolve::{apply_aspect_ratio, resolve_dimension, resolve_size, ResolvedSize};
use super::result::{LayoutOutput, LayoutResult};

/// Computes geometry for a [`SegmentTree`].
///
/// The engine borrows everything it needs; construct one per layout pass.
pub struct LayoutEngine<'a> {
    tree: &'a SegmentTree,
    measurer: &'a dyn TextMeasurer,
    config: &'a EngineConfig,
}

impl<'a> LayoutEngine<'a> {
    pub fn new(tree: &'a SegmentTree, measurer: &'a dyn TextMeasurer, config: &'a EngineConfig) -> Self {
        Self { tree, measurer, config }
    }

    pub fn tree(&self) -> &'a SegmentTree {
        self.tree
    }

    pub fn config(&self) -> &'a EngineConfig {
        self.config
    }

    /// Lay out the whole tree inside `constraints`.
    ///
    /// The root is treated as a block: it fills the available width unless
    /// it declares its own, and sits at its top/left margin.
    pub fn layout(&self, constraints: Constraints) -> LayoutOutput {
        let root = self.tree.root();
        let mut offset = 0;
        let mut result = self.layout_segment(root, constraints, true, true, &mut offset);
        let margin = self.tree.get(root).map(|s| s.layout().margin).unwrap_or_default();
        result.rect.x = margin.left;
        result.rect.y = margin.top;
        let content_size = Size::new(result.rect.right() + margin.right, result.rect.bottom() + margin.bottom);
        debug!(
            results = result.count(),
            total_length = offset,
            width = content_size.width,
            height = content_size.height,
            "layout complete"
        );
        LayoutOutput { root: result, content_size }
    }

    /// Lay out one segment at the origin of its parent's border box.
    ///
    /// `fill_width` selects block sizing for an `auto` width. `painted` is
    /// inherited from the parent and cleared by `display: hidden`.
    pub(crate) fn layout_segment(
        &self,
        id: SegmentId,
        available: Constraints,
        fill_width: bool,
        painted: bool,
        offset: &mut usize,
    ) -> LayoutResult {
        let start = *offset;
        let Some(seg) = self.tree.get(id) else {
            return LayoutResult::new(id, Rect::EMPTY, start, start);
        };
        let props = seg.layout();
        if props.display == Display::None {
            let mut result = LayoutResult::new(id, Rect::EMPTY, start, start);
            result.painted = false;
            return result;
        }
        let painted = painted && props.display != Display::Hidden;
        let inset = props.inset();

        let empty_container = seg.is_container() && !self.has_displayed_children(id);
        let mut resolved = resolve_size(props, available, fill_width && !empty_container);
        if let SegmentContent::Image(image) = seg.content() {
            if props.aspect_ratio.is_none() {
                if let Some(natural) = image.natural_size.filter(|s| s.width > 0 && s.height > 0) {
                    let ratio = natural.width as f64 / natural.height as f64;
                    resolved = apply_aspect_ratio(resolved, Some(ratio));
                }
            }
        }

        let inner = self.inner_constraints(seg, resolved, available);
        let mut children = Vec::new();
        let mut grid = None;
        let content = match seg.content() {
            SegmentContent::Text(text) => {
                *offset += text.len();
                self.text_size(seg, text, inner.max_width)
            }
            SegmentContent::Image(image) => {
                *offset += 1;
                match image.natural_size {
                    Some(size) => size,
                    None => {
                        warn!(?id, "image without natural size, using placeholder");
                        self.config.image_placeholder_size
                    }
                }
            }
            SegmentContent::Spacer => {
                *offset += 1;
                Size::ZERO
            }
            SegmentContent::Component(_) => {
                *offset += 1;
                self.config.component_size
            }
            SegmentContent::Container => match &props.grid {
                Some(grid_props) => {
                    let arranged = GridLayoutEngine::arrange(self, id, grid_props, inner, painted, offset);
                    children = arranged.children;
                    let mut geometry = arranged.geometry;
                    geometry.origin = inset.top_left();
                    grid = Some(geometry);
                    arranged.content_size
                }
                None => {
                    let (size, flowed) = self.arrange_flow(id, inner, painted, offset);
                    children = flowed;
                    size
                }
            },
        };

        let (width, height) = if empty_container {
            (resolved.width.unwrap_or(0), resolved.height.unwrap_or(0))
        } else {
            (
                resolved.width.unwrap_or(content.width + inset.horizontal()),
                resolved.height.unwrap_or(content.height + inset.vertical()),
            )
        };

        let shift = inset.top_left();
        for child in &mut children {
            child.rect = child.rect.translate(shift);
        }

        let mut result = LayoutResult::new(id, Rect::new(0, 0, width.max(0), height.max(0)), start, *offset);
        result.painted = painted;
        result.children = children;
        result.grid = grid;
        trace!(?id, kind = %seg.kind(), width, height, start, end = *offset, "segment laid out");
        result
    }

    /// Content-box constraints for a segment's children or text.
    fn inner_constraints(&self, seg: &Segment, resolved: ResolvedSize, available: Constraints) -> Constraints {
        let props = seg.layout();
        let inset = props.inset();
        let max_width = match resolved.width {
            Some(w) => Some((w - inset.horizontal()).max(0)),
            None => available
                .max_width
                .map(|w| (w - props.margin.horizontal() - inset.horizontal()).max(0)),
        };
        let max_height = resolved.height.map(|h| (h - inset.vertical()).max(0));
        Constraints::new(max_width, max_height)
    }

    fn has_displayed_children(&self, id: SegmentId) -> bool {
        self.tree
            .children(id)
            .iter()
            .any(|&c| self.tree.get(c).is_some_and(|s| s.display() != Display::None))
    }

    /// Text box: one line at intrinsic width, or `ceil(width / available)`
    /// lines at the available width when it overflows.
    fn text_size(&self, seg: &Segment, text: &TextContent, available_width: Option<i32>) -> Size {
        let font = seg.style().font(&self.config.default_font);
        let line_height = self.measurer.metrics(&font).line_height;
        if text.is_empty() {
            return Size::new(0, line_height);
        }
        let intrinsic = self.measurer.measure(&text.text(), &font);
        match available_width {
            Some(aw) if aw > 0 && intrinsic > aw => {
                let lines = (intrinsic + aw - 1) / aw;
                Size::new(aw, lines * line_height)
            }
            _ => Size::new(intrinsic, line_height),
        }
    }

    /// Flow the displayed children of a container inside its content box.
    ///
    /// Returns the content size and the children positioned relative to the
    /// content box origin.
    fn arrange_flow(
        &self,
        id: SegmentId,
        inner: Constraints,
        painted: bool,
        offset: &mut usize,
    ) -> (Size, Vec<LayoutResult>) {
        let mut results = Vec::new();
        let mut y = 0;
        let mut x = 0;
        let mut line_height = 0;
        let mut max_width = 0;

        for &child in self.tree.children(id) {
            let Some(seg) = self.tree.get(child) else {
                continue;
            };
            let display = seg.display();
            if display == Display::None {
                continue;
            }
            let margin = seg.layout().margin;
            if display.is_inline() {
                let mut r = self.layout_segment(child, inner, false, painted, offset);
                let outer_w = margin.horizontal() + r.rect.width;
                let outer_h = margin.vertical() + r.rect.height;
                if let Some(cw) = inner.max_width {
                    if x > 0 && x + outer_w > cw {
                        y += line_height;
                        x = 0;
                        line_height = 0;
                    }
                }
                r.rect.x = x + margin.left;
                r.rect.y = y + margin.top;
                x += outer_w;
                line_height = line_height.max(outer_h);
                max_width = max_width.max(x);
                results.push(r);
            } else {
                if x > 0 || line_height > 0 {
                    y += line_height;
                    x = 0;
                    line_height = 0;
                }
                let mut r = self.layout_segment(child, inner, true, painted, offset);
                r.rect.x = margin.left;
                r.rect.y = y + margin.top;
                y += margin.vertical() + r.rect.height;
                max_width = max_width.max(margin.horizontal() + r.rect.width);
                results.push(r);
            }
        }
        y += line_height;
        (Size::new(max_width, y), results)
    }

    /// Border-box size of a segment laid out in `available`, without
    /// affecting any offsets.
    pub(crate) fn measure(&self, id: SegmentId, available: Constraints, fill_width: bool) -> Size {
        let mut scratch = 0;
        self.layout_segment(id, available, fill_width, true, &mut scratch).rect.size()
    }

    /// Narrowest border-box width the segment can take: the widest word for
    /// text, the widest child for containers, the natural width otherwise.
    pub(crate) fn min_content_width(&self, id: SegmentId) -> i32 {
        let Some(seg) = self.tree.get(id) else {
            return 0;
        };
        let props = seg.layout();
        if let Some(w) = resolve_dimension(props.width, None) {
            return w;
        }
        let inset = props.inset().horizontal();
        match seg.content() {
            SegmentContent::Text(text) => {
                let font = seg.style().font(&self.config.default_font);
                let widest = text
                    .chars()
                    .split(|c| !is_word_char(*c))
                    .filter(|w| !w.is_empty())
                    .map(|w| self.measurer.measure(&w.iter().collect::<String>(), &font))
                    .max()
                    .unwrap_or(0);
                widest + inset
            }
            SegmentContent::Container if props.grid.is_none() => {
                let widest = self
                    .tree
                    .children(id)
                    .iter()
                    .filter(|&&c| self.tree.get(c).is_some_and(|s| s.display() != Display::None))
                    .map(|&c| {
                        let margin = self.tree.get(c).map(|s| s.layout().margin.horizontal()).unwrap_or(0);
                        self.min_content_width(c) + margin
                    })
                    .max()
                    .unwrap_or(0);
                widest + inset
            }
            _ => self.measure(id, Constraints::UNBOUNDED, false).width,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Edges;
    use crate::segment::{Dimension, ImageContent};
    use crate::testing::{layout_to_string, FixedWidthMeasurer};
    use pretty_assertions::assert_eq;

    fn run(tree: &SegmentTree, width: i32) -> LayoutOutput {
        let measurer = FixedWidthMeasurer::default();
        let config = EngineConfig::default();
        LayoutEngine::new(tree, &measurer, &config).layout(Constraints::width(width))
    }

    fn root_tree() -> SegmentTree {
        SegmentTree::with_root(Segment::container()).unwrap()
    }

    #[test]
    fn blocks_stack_vertically() {
        let mut tree = root_tree();
        let root = tree.root();
        tree.append_child(root, Segment::text("hello")).unwrap();
        tree.append_child(root, Segment::text("world!")).unwrap();
        let out = run(&tree, 300);
        let kids = &out.root.children;
        assert_eq!(kids[0].rect, Rect::new(0, 0, 300, 20));
        assert_eq!(kids[1].rect, Rect::new(0, 20, 300, 20));
        assert_eq!(out.root.rect, Rect::new(0, 0, 300, 40));
    }

    #[test]
    fn long_block_text_wraps_to_three_lines() {
        let mut tree = root_tree();
        let root = tree.root();
        let text = "x".repeat(50);
        tree.append_child(root, Segment::text(&text)).unwrap();
        let out = run(&tree, 200);
        assert_eq!(out.root.children[0].rect.height, 60);
        assert_eq!(out.root.children[0].rect.width, 200);
    }

    #[test]
    fn inline_children_wrap() {
        let mut tree = root_tree();
        let root = tree.root();
        for word in ["aaaa", "bbbb", "cccc"] {
            tree.append_child(root, Segment::text(word).with_display(Display::Inline)).unwrap();
        }
        let out = run(&tree, 100);
        let rects: Vec<Rect> = out.root.children.iter().map(|c| c.rect).collect();
        assert_eq!(
            rects,
            vec![Rect::new(0, 0, 40, 20), Rect::new(40, 0, 40, 20), Rect::new(0, 20, 40, 20)]
        );
        assert_eq!(out.root.rect.height, 40);
    }

    #[test]
    fn first_inline_never_wraps() {
        let mut tree = root_tree();
        let root = tree.root();
        tree.append_child(root, Segment::spacer(500.0, 10.0).with_display(Display::Inline)).unwrap();
        let out = run(&tree, 100);
        assert_eq!(out.root.children[0].rect, Rect::new(0, 0, 500, 10));
    }

    #[test]
    fn offsets_are_pre_order() {
        let mut tree = root_tree();
        let root = tree.root();
        tree.append_child(root, Segment::text("abc")).unwrap();
        let inner = tree.append_child(root, Segment::container()).unwrap();
        tree.append_child(inner, Segment::image(ImageContent::new(vec![]))).unwrap();
        tree.append_child(inner, Segment::text("de")).unwrap();
        let out = run(&tree, 100);
        let mut ranges = Vec::new();
        out.root.visit(&mut |r, _| ranges.push((r.global_start, r.global_end)));
        assert_eq!(ranges, vec![(0, 6), (0, 3), (3, 6), (3, 4), (4, 6)]);
    }

    #[test]
    fn display_none_has_no_result() {
        let mut tree = root_tree();
        let root = tree.root();
        tree.append_child(root, Segment::text("gone").with_display(Display::None)).unwrap();
        tree.append_child(root, Segment::text("kept")).unwrap();
        let out = run(&tree, 100);
        assert_eq!(out.root.children.len(), 1);
        assert_eq!(out.root.global_end, 4);
    }

    #[test]
    fn hidden_occupies_space_unpainted() {
        let mut tree = root_tree();
        let root = tree.root();
        tree.append_child(root, Segment::text("ghost").with_display(Display::Hidden)).unwrap();
        let out = run(&tree, 100);
        let ghost = &out.root.children[0];
        assert!(!ghost.painted);
        assert_eq!(ghost.rect.height, 20);
        assert_eq!((ghost.global_start, ghost.global_end), (0, 5));
    }

    #[test]
    fn empty_container_is_zero_size() {
        let mut tree = root_tree();
        let root = tree.root();
        tree.append_child(root, Segment::container()).unwrap();
        let out = run(&tree, 100);
        assert_eq!(out.root.children[0].rect.size(), Size::ZERO);
        assert!(out.root.children[0].children.is_empty());
    }

    #[test]
    fn padding_and_margin_offset_children() {
        let mut tree = SegmentTree::with_root(Segment::container().with_padding(Edges::all(5))).unwrap();
        let root = tree.root();
        tree.append_child(root, Segment::text("ab").with_margin(Edges::new(2, 0, 3, 4))).unwrap();
        let out = run(&tree, 100);
        assert_eq!(out.root.children[0].rect, Rect::new(9, 7, 86, 20));
        assert_eq!(out.root.rect, Rect::new(0, 0, 100, 35));
    }

    #[test]
    fn percent_width_uses_parent_content_box() {
        let mut tree = SegmentTree::with_root(Segment::container().with_padding(Edges::symmetric(0, 10))).unwrap();
        let root = tree.root();
        tree.append_child(root, Segment::text("a").with_width(Dimension::Percent(50.0))).unwrap();
        let out = run(&tree, 201);
        // content box 181 wide
        assert_eq!(out.root.children[0].rect.width, 90);
    }

    #[test]
    fn image_placeholder_and_natural_ratio() {
        let mut tree = root_tree();
        let root = tree.root();
        tree.append_child(root, Segment::image(ImageContent::new(vec![1])).with_display(Display::Inline))
            .unwrap();
        let natural = ImageContent::new(vec![2]).with_natural_size(Size::new(40, 20));
        tree.append_child(root, Segment::image(natural).with_width(Dimension::Pixels(80.0))).unwrap();
        let out = run(&tree, 300);
        assert_eq!(out.root.children[0].rect.size(), Size::new(32, 32));
        assert_eq!(out.root.children[1].rect.size(), Size::new(80, 40));
    }

    #[test]
    fn component_default_size() {
        let mut tree = root_tree();
        let root = tree.root();
        tree.append_child(root, Segment::component("chart").with_display(Display::InlineBlock)).unwrap();
        let out = run(&tree, 300);
        assert_eq!(out.root.children[0].rect.size(), Size::new(100, 24));
    }

    #[test]
    fn min_content_is_widest_word() {
        let mut tree = root_tree();
        let root = tree.root();
        let id = tree.append_child(root, Segment::text("ab abcd a")).unwrap();
        let measurer = FixedWidthMeasurer::default();
        let config = EngineConfig::default();
        let engine = LayoutEngine::new(&tree, &measurer, &config);
        assert_eq!(engine.min_content_width(id), 40);
    }

    #[test]
    fn snapshot_nested_flow() {
        let mut tree = root_tree();
        let root = tree.root();
        tree.append_child(root, Segment::text("title")).unwrap();
        let para = tree.append_child(root, Segment::container().with_padding(Edges::all(2))).unwrap();
        tree.append_child(para, Segment::text("one").with_display(Display::Inline)).unwrap();
        tree.append_child(para, Segment::spacer(8.0, 8.0).with_display(Display::Inline)).unwrap();
        tree.append_child(para, Segment::text("two").with_display(Display::Inline)).unwrap();
        let out = run(&tree, 60);
        insta::assert_snapshot!(layout_to_string(&out.root, &tree), @r"
        container [0,12) 0,0 60x64
          text [0,5) 0,0 60x20
          container [5,12) 0,20 60x44
            text [5,8) 2,2 30x20
            spacer [8,9) 32,2 8x8
            text [9,12) 2,22 30x20
        ");
    }
}
