//! The document: one segment tree together with everything derived from it.
//!
//! [`Document`] owns the tree, the measurer, the offset cache, the last
//! layout and the per-segment glyph caches. Every mutation goes through it
//! so the caches are notified or invalidated, and every query brings them up
//! to date before reading.

use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::config::EngineConfig;
use crate::cursor::{self, CursorNavigator, CursorPosition, OffsetCache, Selection};
use crate::geometry::{Point, Rect};
use crate::layout::grid::{apply_track_resize, ResizeError, TrackSize};
use crate::layout::{Constraints, LayoutEngine, LayoutOutput, SpatialMap};
use crate::segment::{CodecError, SegmentError, SegmentId, SegmentKind, SegmentPath, SegmentTree};
use crate::text::{CachedMeasurer, GlyphBoundaryCache, TextMeasurer};

/// Errors from document operations.
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error(transparent)]
    Segment(#[from] SegmentError),
    #[error(transparent)]
    Resize(#[from] ResizeError),
    #[error(transparent)]
    Codec(#[from] CodecError),
    #[error("segment {0:?} is not a grid container")]
    NotAGrid(SegmentId),
    #[error("segment {0:?} is not laid out")]
    NotLaidOut(SegmentId),
    #[error("no segment at path {0}")]
    UnknownPath(SegmentPath),
}

/// One line of a painted leaf, in absolute coordinates. Wrapped text yields
/// one box per line; every other leaf yields a single box.
#[derive(Debug, Clone, Copy)]
struct LineBox {
    segment: SegmentId,
    rect: Rect,
    line: usize,
    /// Line width of wrapped text.
    wrap_width: Option<i32>,
}

/// Whether `rect` covers the pixel row `y`. Zero-height rects cover their
/// own top row.
fn on_row(rect: Rect, y: i32) -> bool {
    rect.y <= y && y < rect.bottom().max(rect.y + 1)
}

fn nearest_box<'b>(boxes: impl Iterator<Item = &'b LineBox>, point: Point) -> Option<LineBox> {
    boxes
        .min_by_key(|b| (b.rect.vertical_distance(point.y), b.rect.horizontal_distance(point.x)))
        .copied()
}

/// A segment tree with its offset cache, layout and glyph caches.
pub struct Document {
    tree: SegmentTree,
    measurer: CachedMeasurer<Box<dyn TextMeasurer + Send>>,
    config: EngineConfig,
    offsets: OffsetCache,
    layout: Option<LayoutOutput>,
    constraints: Constraints,
    glyphs: HashMap<SegmentId, GlyphBoundaryCache>,
}

impl Document {
    /// Wrap `tree`. Layout widths from `measurer` are memoized per
    /// `(text, font)` in a bounded cache.
    pub fn new<M: TextMeasurer + Send + 'static>(tree: SegmentTree, measurer: M) -> Self {
        let measurer: Box<dyn TextMeasurer + Send> = Box::new(measurer);
        Self {
            tree,
            measurer: CachedMeasurer::new(measurer),
            config: EngineConfig::default(),
            offsets: OffsetCache::new(),
            layout: None,
            constraints: Constraints::UNBOUNDED,
            glyphs: HashMap::new(),
        }
    }

    /// Decode a tree from JSON and wrap it.
    pub fn from_json<M: TextMeasurer + Send + 'static>(json: &str, measurer: M) -> Result<Self, DocumentError> {
        Ok(Self::new(SegmentTree::from_json(json)?, measurer))
    }

    /// Set the configuration (builder).
    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.set_config(config);
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The memoizing measurer used for layout.
    pub fn measurer(&self) -> &CachedMeasurer<Box<dyn TextMeasurer + Send>> {
        &self.measurer
    }

    pub fn set_config(&mut self, config: EngineConfig) {
        self.config = config;
        self.layout = None;
        self.glyphs.clear();
    }

    pub fn tree(&self) -> &SegmentTree {
        &self.tree
    }

    /// Mutable access to the tree. Direct text edits do not go through the
    /// incremental path, so the offset cache is dropped.
    pub fn tree_mut(&mut self) -> &mut SegmentTree {
        self.offsets.invalidate();
        self.layout = None;
        &mut self.tree
    }

    /// Navigator over an up-to-date offset cache.
    pub fn navigator(&mut self) -> CursorNavigator<'_> {
        self.offsets.navigator(&self.tree)
    }

    pub fn total_length(&mut self) -> usize {
        self.navigator().total_length()
    }

    /// The whole document as text, non-text segments as U+FFFC.
    pub fn text(&mut self) -> String {
        self.navigator().document_chars().into_iter().collect()
    }

    pub fn text_in_range(&mut self, selection: &Selection) -> String {
        self.navigator().get_text_in_range(selection)
    }

    // -- editing ---------------------------------------------------------------

    /// Insert into an editable text segment; returns the caret after it.
    pub fn insert_text(&mut self, position: &CursorPosition, text: &str) -> Result<CursorPosition, DocumentError> {
        Ok(cursor::insert_text(&mut self.tree, &mut self.offsets, position, text)?)
    }

    /// Delete the selected content; returns the caret at its start.
    pub fn delete_range(&mut self, selection: &Selection) -> Result<CursorPosition, DocumentError> {
        Ok(cursor::delete_range(&mut self.tree, &mut self.offsets, selection)?)
    }

    pub fn replace_range(&mut self, selection: &Selection, text: &str) -> Result<CursorPosition, DocumentError> {
        Ok(cursor::replace_range(&mut self.tree, &mut self.offsets, selection, text)?)
    }

    // -- layout ----------------------------------------------------------------

    /// Lay out the tree inside `constraints` and keep the result.
    pub fn layout(&mut self, constraints: Constraints) -> &LayoutOutput {
        let output = LayoutEngine::new(&self.tree, &self.measurer, &self.config).layout(constraints);
        let dirty = self.tree.take_dirty().len();
        let tree = &self.tree;
        self.glyphs.retain(|id, _| tree.contains(*id));
        debug!(dirty, glyph_caches = self.glyphs.len(), "document laid out");
        self.constraints = constraints;
        self.layout.insert(output)
    }

    /// The last layout, if it is still current.
    pub fn layout_output(&self) -> Option<&LayoutOutput> {
        self.layout.as_ref().filter(|_| !self.tree.any_dirty())
    }

    /// Lay out again inside the last constraints.
    pub fn relayout(&mut self) -> &LayoutOutput {
        self.layout(self.constraints)
    }

    /// Relayout when the tree changed since the last pass.
    fn ensure_layout(&mut self) {
        if self.layout.is_none() || self.tree.any_dirty() {
            self.relayout();
        }
    }

    /// Resolve a path to a segment id.
    pub fn resolve_path(&self, path: &SegmentPath) -> Result<SegmentId, DocumentError> {
        self.tree.resolve_path(path).ok_or_else(|| DocumentError::UnknownPath(path.clone()))
    }

    /// Glyph boundaries of a text segment, rebuilt when its text or font
    /// changed. Prefix widths bypass the width cache: they are only needed
    /// once per build.
    pub fn glyph_cache(&mut self, id: SegmentId) -> Option<&GlyphBoundaryCache> {
        let seg = self.tree.get(id)?;
        let text = seg.as_text()?;
        let font = seg.style().font(&self.config.default_font);
        let fresh = self.glyphs.get(&id).is_some_and(|g| g.is_valid_for(text.chars(), &font));
        if !fresh {
            let built = GlyphBoundaryCache::build(text.chars(), &font, self.measurer.inner());
            self.glyphs.insert(id, built);
        }
        self.glyphs.get(&id)
    }

    // -- hit testing -----------------------------------------------------------

    /// Frontmost segment under `point`, by paint order.
    pub fn segment_at_point(&mut self, point: Point) -> Option<SegmentId> {
        self.ensure_layout();
        let output = self.layout.as_ref()?;
        SpatialMap::from_layout(&output.root, &self.tree).segment_at(point)
    }

    /// Caret position for a pointer at `point`.
    ///
    /// The deepest segment under the point that is not mouse-transparent is
    /// preferred; otherwise the nearest leaf line wins (vertical distance
    /// first). Text positions snap to the closest character boundary.
    pub fn position_at_point(&mut self, point: Point) -> CursorPosition {
        self.ensure_layout();
        let boxes: Vec<LineBox> = self
            .line_boxes()
            .into_iter()
            .filter(|b| self.tree.get(b.segment).is_some_and(|s| !s.interaction().mouse_transparent))
            .collect();

        let scope = self.hit_scope(point);
        let chosen = scope
            .and_then(|ids| nearest_box(boxes.iter().filter(|b| ids.contains(&b.segment)), point))
            .or_else(|| nearest_box(boxes.iter(), point));
        match chosen {
            Some(line) => {
                let local = self.local_at(&line, point.x);
                self.position_for(line.segment, local)
            }
            None => self.navigator().global_offset_to_position(0),
        }
    }

    /// Segments in the subtree of the deepest hit under `point`.
    fn hit_scope(&self, point: Point) -> Option<HashSet<SegmentId>> {
        let output = self.layout.as_ref()?;
        let tree = &self.tree;
        let accept = |id: SegmentId| tree.get(id).is_some_and(|s| !s.interaction().mouse_transparent);
        let (hit, _) = output.root.hit_test_point(point, &accept)?;
        let mut ids = HashSet::new();
        hit.visit(&mut |r, _| {
            ids.insert(r.segment);
        });
        Some(ids)
    }

    /// Caret rectangle (1px wide, one line tall) for `position`.
    pub fn caret_rect(&mut self, position: &CursorPosition) -> Option<Rect> {
        self.ensure_layout();
        let pos = {
            let nav = self.offsets.navigator(&self.tree);
            nav.global_offset_to_position(nav.position_to_global_offset(position))
        };
        let id = self.offsets.entry_for_path(&pos.path)?.segment;
        let boxes: Vec<LineBox> = self.line_boxes().into_iter().filter(|b| b.segment == id).collect();
        let first = *boxes.first()?;

        if self.tree.kind_of(id)? != SegmentKind::Text {
            let x = if pos.local_offset > 0 { first.rect.right() } else { first.rect.x };
            return Some(Rect::new(x, first.rect.y, 1, first.rect.height.max(1)));
        }
        let x = self.glyph_cache(id)?.x_for_character(pos.local_offset);
        let rect = match first.wrap_width {
            Some(width) if width > 0 => {
                let line = ((x / width) as usize).min(boxes.len() - 1);
                let b = boxes[line];
                Rect::new(b.rect.x + x - line as i32 * width, b.rect.y, 1, b.rect.height)
            }
            _ => Rect::new(first.rect.x + x, first.rect.y, 1, first.rect.height),
        };
        Some(rect)
    }

    // -- line navigation -------------------------------------------------------

    /// Same horizontal position on the nearest line below, or the document
    /// end from the last line.
    pub fn move_line_down(&mut self, position: &CursorPosition) -> CursorPosition {
        let Some(caret) = self.caret_rect(position) else {
            return self.navigator().refresh(position);
        };
        let boxes = self.line_boxes();
        let below: Vec<&LineBox> = boxes.iter().filter(|b| b.rect.y >= caret.bottom()).collect();
        let Some(top) = below.iter().map(|b| b.rect.y).min() else {
            let nav = self.navigator();
            return nav.global_offset_to_position(nav.total_length());
        };
        self.snap_to_row(below.into_iter().filter(|b| on_row(b.rect, top)), Point::new(caret.x, top), position)
    }

    /// Same horizontal position on the nearest line above, or the document
    /// start from the first line.
    pub fn move_line_up(&mut self, position: &CursorPosition) -> CursorPosition {
        let Some(caret) = self.caret_rect(position) else {
            return self.navigator().refresh(position);
        };
        let boxes = self.line_boxes();
        let above: Vec<&LineBox> = boxes.iter().filter(|b| b.rect.bottom() <= caret.y).collect();
        let Some(bottom) = above.iter().map(|b| b.rect.bottom()).max() else {
            return self.navigator().global_offset_to_position(0);
        };
        let row = bottom - 1;
        self.snap_to_row(above.into_iter().filter(|b| on_row(b.rect, row)), Point::new(caret.x, row), position)
    }

    /// Start of the visual line holding `position`.
    pub fn move_line_start(&mut self, position: &CursorPosition) -> CursorPosition {
        self.line_edge(position, false)
    }

    /// End of the visual line holding `position`.
    pub fn move_line_end(&mut self, position: &CursorPosition) -> CursorPosition {
        self.line_edge(position, true)
    }

    fn line_edge(&mut self, position: &CursorPosition, end: bool) -> CursorPosition {
        let Some(caret) = self.caret_rect(position) else {
            return self.navigator().refresh(position);
        };
        let mid = caret.y + caret.height / 2;
        let boxes = self.line_boxes();
        let row = boxes.iter().filter(|b| on_row(b.rect, mid));
        let edge = if end { row.max_by_key(|b| b.rect.right()) } else { row.min_by_key(|b| b.rect.x) };
        match edge.copied() {
            Some(line) => {
                let x = if end { line.rect.right() } else { line.rect.x };
                let local = self.local_at(&line, x);
                self.position_for(line.segment, local)
            }
            None => self.navigator().refresh(position),
        }
    }

    fn snap_to_row<'b>(
        &mut self,
        row: impl Iterator<Item = &'b LineBox>,
        target: Point,
        fallback: &CursorPosition,
    ) -> CursorPosition {
        match nearest_box(row, target) {
            Some(line) => {
                let local = self.local_at(&line, target.x);
                self.position_for(line.segment, local)
            }
            None => self.navigator().refresh(fallback),
        }
    }

    /// Line boxes of every painted leaf in the current layout, pre-order.
    fn line_boxes(&self) -> Vec<LineBox> {
        let Some(output) = &self.layout else {
            return Vec::new();
        };
        let mut boxes = Vec::new();
        output.root.visit(&mut |result, abs| {
            if !result.painted || !result.children.is_empty() {
                return;
            }
            let Some(seg) = self.tree.get(result.segment) else {
                return;
            };
            let Some(text) = seg.as_text() else {
                boxes.push(LineBox { segment: result.segment, rect: abs, line: 0, wrap_width: None });
                return;
            };
            let content = abs.shrink(seg.layout().inset());
            let font = seg.style().font(&self.config.default_font);
            let line_height = self.measurer.metrics(&font).line_height.max(1);
            let intrinsic = self.measurer.measure(&text.text(), &font);
            let lines = if content.width > 0 && intrinsic > content.width {
                ((intrinsic + content.width - 1) / content.width) as usize
            } else {
                1
            };
            let wrap_width = (lines > 1).then_some(content.width);
            for line in 0..lines {
                let y = content.y + line as i32 * line_height;
                let rect = Rect::new(content.x, y, content.width, line_height);
                boxes.push(LineBox { segment: result.segment, rect, line, wrap_width });
            }
        });
        boxes
    }

    /// Local offset for absolute `x` on a line box.
    fn local_at(&mut self, line: &LineBox, x: i32) -> usize {
        let relative = x - line.rect.x;
        match self.tree.kind_of(line.segment) {
            Some(SegmentKind::Text) => {
                let flat = match line.wrap_width {
                    Some(width) => line.line as i32 * width + relative.clamp(0, width),
                    None => relative,
                };
                self.glyph_cache(line.segment).map_or(0, |g| g.find_character_at(flat))
            }
            Some(SegmentKind::Container) | None => 0,
            Some(_) if line.rect.width > 0 => usize::from(relative >= line.rect.width / 2),
            Some(_) => usize::from(relative > 0),
        }
    }

    fn position_for(&mut self, segment: SegmentId, local: usize) -> CursorPosition {
        self.offsets.ensure(&self.tree);
        match self.offsets.entry(segment) {
            Some(entry) => {
                let local = local.min(entry.length);
                CursorPosition::new(entry.path.clone(), local, entry.start + local)
            }
            None => CursorPosition::document_start(),
        }
    }

    // -- grid resizing ---------------------------------------------------------

    /// Drag the grid track boundary under `from` to `to` (document
    /// coordinates). Returns the new track definition, or `None` when `from`
    /// is not on a resizable boundary.
    pub fn resize_grid_track(
        &mut self,
        container: SegmentId,
        from: Point,
        to: Point,
    ) -> Result<Option<TrackSize>, DocumentError> {
        self.tree.segment(container)?;
        self.ensure_layout();
        let output = self.layout.as_ref().ok_or(DocumentError::NotLaidOut(container))?;
        let (result, abs) = output.root.find(container).ok_or(DocumentError::NotLaidOut(container))?;
        let geometry = result.grid.clone().ok_or(DocumentError::NotAGrid(container))?;
        let origin = abs.origin();

        let props = self.tree.segment(container)?.layout().grid.clone().ok_or(DocumentError::NotAGrid(container))?;
        let Some(handle) = geometry.handle_at(from - origin, &props, self.config.resize_handle_threshold) else {
            return Ok(None);
        };
        let Some(size) = geometry.dragged_size(handle, to - origin) else {
            return Ok(None);
        };

        let min = self.config.min_track_size;
        let mut applied = None;
        self.tree.update_layout(container, |layout| {
            if let Some(grid) = layout.grid.as_mut() {
                applied = Some(apply_track_resize(grid, handle, size, min));
            }
        })?;
        let track = applied.ok_or(DocumentError::NotAGrid(container))??;
        debug!(?container, ?handle, size, track = %track, "grid track resized");
        Ok(Some(track))
    }
}

impl std::fmt::Debug for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Document")
            .field("segments", &self.tree.len())
            .field("laid_out", &self.layout.is_some())
            .field("glyph_caches", &self.glyphs.len())
            .finish()
    }
}
