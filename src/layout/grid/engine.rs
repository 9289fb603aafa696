//! Grid layout: item placement, track sizing, and cell alignment.
//!
//! Runs in three steps for a grid container's displayed children:
//!
//! 1. Place every item in a cell (explicit positions first, then auto-flow)
//! 2. Size column tracks from item widths, then row tracks from item heights
//!    measured at their column width
//! 3. Lay out each item inside its cell and align it

use tracing::trace;

use crate::geometry::{Point, Rect, Size};
use crate::layout::constraints::Constraints;
use crate::layout::engine::LayoutEngine;
use crate::layout::resolve::resolve_dimension;
use crate::layout::result::LayoutResult;
use crate::segment::{Display, SegmentId, SegmentTree};

use super::props::{AlignItems, GridDirection, GridItemProperties, GridLayoutProperties, GridOverflow, JustifyContent};
use super::track::{TrackSize, TrackUnit};

// ---------------------------------------------------------------------------
// Geometry
// ---------------------------------------------------------------------------

/// Cell occupied by a grid item, in track indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridCell {
    pub row: usize,
    pub column: usize,
    pub row_span: usize,
    pub column_span: usize,
}

/// Computed track positions of a grid container.
///
/// Track starts are relative to the container's content box; `origin` is
/// the content box offset inside the container's border box.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GridGeometry {
    pub origin: Point,
    pub column_starts: Vec<i32>,
    pub column_sizes: Vec<i32>,
    pub row_starts: Vec<i32>,
    pub row_sizes: Vec<i32>,
    pub column_gap: i32,
    pub row_gap: i32,
}

fn track_starts(sizes: &[i32], gap: i32) -> Vec<i32> {
    let mut pos = 0;
    sizes
        .iter()
        .map(|&size| {
            let start = pos;
            pos += size + gap;
            start
        })
        .collect()
}

fn span_extent(starts: &[i32], sizes: &[i32], first: usize, span: usize) -> (i32, i32) {
    if first >= sizes.len() {
        return (0, 0);
    }
    let last = (first + span.max(1) - 1).min(sizes.len() - 1);
    let start = starts[first];
    (start, starts[last] + sizes[last] - start)
}

fn axis_extent(sizes: &[i32], gap: i32) -> i32 {
    if sizes.is_empty() {
        return 0;
    }
    sizes.iter().sum::<i32>() + gap * (sizes.len() as i32 - 1)
}

impl GridGeometry {
    pub fn new(column_sizes: Vec<i32>, row_sizes: Vec<i32>, column_gap: i32, row_gap: i32) -> Self {
        Self {
            origin: Point::ZERO,
            column_starts: track_starts(&column_sizes, column_gap),
            row_starts: track_starts(&row_sizes, row_gap),
            column_sizes,
            row_sizes,
            column_gap,
            row_gap,
        }
    }

    pub fn column_count(&self) -> usize {
        self.column_sizes.len()
    }

    pub fn row_count(&self) -> usize {
        self.row_sizes.len()
    }

    /// Rect of a cell area relative to the content box.
    pub fn cell_rect(&self, cell: &GridCell) -> Rect {
        let (x, width) = span_extent(&self.column_starts, &self.column_sizes, cell.column, cell.column_span);
        let (y, height) = span_extent(&self.row_starts, &self.row_sizes, cell.row, cell.row_span);
        Rect::new(x, y, width, height)
    }

    /// Total size of all tracks and the gaps between them.
    pub fn extent(&self) -> Size {
        Size::new(
            axis_extent(&self.column_sizes, self.column_gap),
            axis_extent(&self.row_sizes, self.row_gap),
        )
    }
}

// ---------------------------------------------------------------------------
// Placement
// ---------------------------------------------------------------------------

/// Occupancy matrix addressed as (major, minor), where the major axis is
/// the one auto-flow advances along after filling the minor axis.
struct Occupancy {
    cells: Vec<Vec<bool>>,
}

impl Occupancy {
    fn new() -> Self {
        Self { cells: Vec::new() }
    }

    fn is_free(&self, major: usize, minor: usize, major_span: usize, minor_span: usize) -> bool {
        (major..major + major_span).all(|m| {
            (minor..minor + minor_span).all(|n| !self.cells.get(m).and_then(|row| row.get(n)).copied().unwrap_or(false))
        })
    }

    fn occupy(&mut self, major: usize, minor: usize, major_span: usize, minor_span: usize) {
        for m in major..major + major_span {
            if self.cells.len() <= m {
                self.cells.resize_with(m + 1, Vec::new);
            }
            let row = &mut self.cells[m];
            if row.len() < minor + minor_span {
                row.resize(minor + minor_span, false);
            }
            for n in minor..minor + minor_span {
                row[n] = true;
            }
        }
    }
}

/// Item placement in major/minor coordinates.
#[derive(Clone, Copy)]
struct Slot {
    major: usize,
    minor: usize,
    major_span: usize,
    minor_span: usize,
}

/// Result of placing all items.
struct Placement {
    cells: Vec<Option<GridCell>>,
    rows: usize,
    columns: usize,
}

fn place_items(tree: &SegmentTree, items: &[SegmentId], props: &GridLayoutProperties) -> Placement {
    let explicit_rows = props.rows.len().max(1);
    let explicit_columns = props.columns.len().max(1);
    let row_major = props.direction == GridDirection::Row;
    let (major_limit, explicit_minor) =
        if row_major { (explicit_rows, explicit_columns) } else { (explicit_columns, explicit_rows) };
    // `Wrap` extends the flow axis to hold every item on one line.
    let minor_count = if props.overflow == GridOverflow::Wrap {
        explicit_minor.max(items.len())
    } else {
        explicit_minor
    };
    let hidden = props.overflow == GridOverflow::Hidden;
    let major_cap = if hidden { Some(major_limit) } else { None };

    let item_props: Vec<GridItemProperties> = items
        .iter()
        .map(|&id| tree.get(id).and_then(|s| s.layout().grid_item).unwrap_or_default())
        .collect();

    // Translate row/column fields into major/minor terms.
    let to_slot_request = |p: &GridItemProperties| {
        let (major, minor) = if row_major { (p.row, p.column) } else { (p.column, p.row) };
        let (major_span, minor_span) =
            if row_major { (p.row_span, p.column_span) } else { (p.column_span, p.row_span) };
        (major, minor, major_span.max(1), minor_span.max(1))
    };

    let fits_caps = |slot: &Slot| {
        let major_ok = major_cap.map_or(true, |cap| slot.major + slot.major_span <= cap);
        let minor_ok = !hidden || slot.minor + slot.minor_span <= minor_count;
        major_ok && minor_ok
    };

    let mut occupancy = Occupancy::new();
    let mut slots: Vec<Option<Slot>> = vec![None; items.len()];

    // Pass 1: fully pinned items.
    for (i, p) in item_props.iter().enumerate() {
        if let (Some(major), Some(minor), major_span, minor_span) = to_slot_request(p) {
            let slot = Slot { major, minor, major_span, minor_span };
            if fits_caps(&slot) {
                occupancy.occupy(major, minor, major_span, minor_span);
                slots[i] = Some(slot);
            }
        }
    }

    // Pass 2: auto-flow, with a cursor that only moves forward.
    let mut cursor = (0usize, 0usize);
    for (i, p) in item_props.iter().enumerate() {
        let (major, minor, major_span, minor_span) = to_slot_request(p);
        if major.is_some() && minor.is_some() {
            continue;
        }
        let minor_span = minor_span.min(minor_count);
        let found = match (major, minor) {
            (None, Some(minor)) => (0..)
                .take_while(|&m| major_cap.map_or(true, |cap| m + major_span <= cap))
                .find(|&m| occupancy.is_free(m, minor, major_span, minor_span))
                .map(|m| Slot { major: m, minor, major_span, minor_span })
                .filter(|s| fits_caps(s)),
            (Some(major), None) => (0..)
                .take_while(|&n| !hidden || n + minor_span <= minor_count)
                .find(|&n| occupancy.is_free(major, n, major_span, minor_span))
                .map(|n| Slot { major, minor: n, major_span, minor_span })
                .filter(|s| fits_caps(s)),
            _ => {
                let mut found = None;
                let (mut m, mut n) = cursor;
                loop {
                    if major_cap.is_some_and(|cap| m + major_span > cap) {
                        break;
                    }
                    if n + minor_span > minor_count {
                        m += 1;
                        n = 0;
                        continue;
                    }
                    if occupancy.is_free(m, n, major_span, minor_span) {
                        found = Some(Slot { major: m, minor: n, major_span, minor_span });
                        cursor = (m, n + minor_span);
                        break;
                    }
                    n += 1;
                }
                found
            }
        };
        if let Some(slot) = found {
            occupancy.occupy(slot.major, slot.minor, slot.major_span, slot.minor_span);
            slots[i] = Some(slot);
        }
    }

    let mut majors = major_limit;
    let mut minors = minor_count;
    for slot in slots.iter().flatten() {
        majors = majors.max(slot.major + slot.major_span);
        minors = minors.max(slot.minor + slot.minor_span);
    }

    let cells = slots
        .into_iter()
        .map(|slot| {
            slot.map(|s| {
                if row_major {
                    GridCell { row: s.major, column: s.minor, row_span: s.major_span, column_span: s.minor_span }
                } else {
                    GridCell { row: s.minor, column: s.major, row_span: s.minor_span, column_span: s.major_span }
                }
            })
        })
        .collect();
    let (rows, columns) = if row_major { (majors, minors) } else { (minors, majors) };
    Placement { cells, rows, columns }
}

/// Explicit definitions extended to `count` tracks.
///
/// `Wrap` repeats the last explicit definition; otherwise implicit tracks
/// are `auto`.
fn track_definitions(explicit: &[TrackSize], count: usize, overflow: GridOverflow) -> Vec<TrackSize> {
    let implicit = match (overflow, explicit.last()) {
        (GridOverflow::Wrap, Some(last)) => *last,
        _ => TrackSize::auto(),
    };
    (0..count).map(|i| explicit.get(i).copied().unwrap_or(implicit)).collect()
}

// ---------------------------------------------------------------------------
// Track sizing
// ---------------------------------------------------------------------------

/// Largest (min-content, max-content) contribution of the items in a track.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TrackContribution {
    pub min: i32,
    pub max: i32,
}

/// Size tracks along one axis.
///
/// Fixed, percentage, and content-sized tracks are resolved first. The
/// remaining space (after gaps) is split among `fr` tracks by weight. With
/// no available space, `fr` tracks size like `auto`. Every size is clamped
/// by the track's min/max and truncated to whole pixels.
pub fn size_tracks(
    definitions: &[TrackSize],
    available: Option<i32>,
    gap: i32,
    contributions: &[TrackContribution],
) -> Vec<i32> {
    let contribution = |i: usize| contributions.get(i).copied().unwrap_or_default();
    let mut sizes = vec![0.0f64; definitions.len()];
    let mut consumed = 0.0;
    let mut total_fr = 0.0;

    for (i, def) in definitions.iter().enumerate() {
        let base = match def.unit {
            TrackUnit::Px(v) => v,
            TrackUnit::Percent(p) => match available {
                Some(a) => a as f64 * p / 100.0,
                None => contribution(i).max as f64,
            },
            TrackUnit::Auto | TrackUnit::MaxContent => contribution(i).max as f64,
            TrackUnit::MinContent => contribution(i).min as f64,
            TrackUnit::Fr(f) if available.is_some() => {
                total_fr += f.max(0.0);
                continue;
            }
            TrackUnit::Fr(_) => contribution(i).max as f64,
        };
        sizes[i] = def.clamp(base);
        consumed += sizes[i];
    }

    if let Some(available) = available {
        let gaps = gap as f64 * definitions.len().saturating_sub(1) as f64;
        let remaining = (available as f64 - consumed - gaps).max(0.0);
        for (i, def) in definitions.iter().enumerate() {
            if let TrackUnit::Fr(f) = def.unit {
                let share = if total_fr > 0.0 { f.max(0.0) * remaining / total_fr } else { 0.0 };
                sizes[i] = def.clamp(share);
            }
        }
    }

    sizes.into_iter().map(|s| s as i32).collect()
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// Output of arranging a grid container's children.
#[derive(Debug, Clone, PartialEq)]
pub struct GridArrangement {
    /// Results positioned relative to the container's content box, in
    /// document order.
    pub children: Vec<LayoutResult>,
    /// Cell of each displayed child, `None` for dropped items.
    pub cells: Vec<Option<GridCell>>,
    pub content_size: Size,
    pub geometry: GridGeometry,
}

/// Lays out the children of grid containers.
pub struct GridLayoutEngine;

impl GridLayoutEngine {
    /// Arrange the displayed children of `container` inside `inner`, the
    /// container's content-box constraints.
    pub fn arrange(
        engine: &LayoutEngine<'_>,
        container: SegmentId,
        props: &GridLayoutProperties,
        inner: Constraints,
        painted: bool,
        offset: &mut usize,
    ) -> GridArrangement {
        let tree = engine.tree();
        let items: Vec<SegmentId> = tree
            .children(container)
            .iter()
            .copied()
            .filter(|&c| tree.get(c).is_some_and(|s| s.display() != Display::None))
            .collect();

        let placement = place_items(tree, &items, props);
        let column_defs = track_definitions(&props.columns, placement.columns, props.overflow);
        let row_defs = track_definitions(&props.rows, placement.rows, props.overflow);

        // Columns from intrinsic widths.
        let mut column_contrib = vec![TrackContribution::default(); placement.columns];
        for (&item, cell) in items.iter().zip(&placement.cells) {
            let Some(cell) = cell.filter(|c| c.column_span == 1) else {
                continue;
            };
            let margin = tree.get(item).map(|s| s.layout().margin).unwrap_or_default();
            let natural = engine.measure(item, inner, false).width + margin.horizontal();
            let narrowest = engine.min_content_width(item) + margin.horizontal();
            let slot = &mut column_contrib[cell.column];
            slot.max = slot.max.max(natural);
            slot.min = slot.min.max(narrowest.min(natural));
        }
        let column_sizes = size_tracks(&column_defs, inner.max_width, props.column_gap, &column_contrib);
        let column_starts = track_starts(&column_sizes, props.column_gap);

        // Rows from heights at the resolved column widths.
        let mut row_contrib = vec![TrackContribution::default(); placement.rows];
        for (&item, cell) in items.iter().zip(&placement.cells) {
            let Some(cell) = cell.filter(|c| c.row_span == 1) else {
                continue;
            };
            let margin = tree.get(item).map(|s| s.layout().margin).unwrap_or_default();
            let (_, width) = span_extent(&column_starts, &column_sizes, cell.column, cell.column_span);
            let available = Constraints::new(Some((width - margin.horizontal()).max(0)), None);
            let height = engine.measure(item, available, false).height + margin.vertical();
            let slot = &mut row_contrib[cell.row];
            slot.max = slot.max.max(height);
            slot.min = slot.min.max(height);
        }
        let row_sizes = size_tracks(&row_defs, inner.max_height, props.row_gap, &row_contrib);

        let geometry = GridGeometry::new(column_sizes, row_sizes, props.column_gap, props.row_gap);
        trace!(
            ?container,
            columns = ?geometry.column_sizes,
            rows = ?geometry.row_sizes,
            "grid tracks sized"
        );

        let mut children = Vec::with_capacity(items.len());
        for (&item, cell) in items.iter().zip(&placement.cells) {
            let result = match cell {
                Some(cell) => Self::layout_item(engine, item, props, &geometry, cell, painted, offset),
                None => {
                    let mut dropped = engine.layout_segment(item, Constraints::fixed(0, 0), false, false, offset);
                    collapse(&mut dropped);
                    dropped
                }
            };
            children.push(result);
        }

        GridArrangement { children, cells: placement.cells, content_size: geometry.extent(), geometry }
    }

    fn layout_item(
        engine: &LayoutEngine<'_>,
        item: SegmentId,
        props: &GridLayoutProperties,
        geometry: &GridGeometry,
        cell: &GridCell,
        painted: bool,
        offset: &mut usize,
    ) -> LayoutResult {
        let area = geometry.cell_rect(cell);
        let Some(seg) = engine.tree().get(item) else {
            return LayoutResult::new(item, Rect::EMPTY, *offset, *offset);
        };
        let layout = seg.layout();
        let margin = layout.margin;
        let item_props = layout.grid_item.unwrap_or_default();
        let available = Constraints::fixed(
            (area.width - margin.horizontal()).max(0),
            (area.height - margin.vertical()).max(0),
        );
        let auto_height = resolve_dimension(layout.height, available.max_height).is_none();

        let mut result = engine.layout_segment(item, available, false, painted, offset);
        let justify = item_props.justify_self.unwrap_or(props.justify_content);
        let align = item_props.align_self.unwrap_or(props.align_items);

        let outer_w = result.rect.width + margin.horizontal();
        result.rect.x = area.x
            + margin.left
            + match justify {
                JustifyContent::End => area.width - outer_w,
                JustifyContent::Center => (area.width - outer_w) / 2,
                _ => 0,
            };

        if align == AlignItems::Stretch && auto_height {
            result.rect.height = result.rect.height.max(available.max_height.unwrap_or(0));
        }
        let outer_h = result.rect.height + margin.vertical();
        result.rect.y = area.y
            + margin.top
            + match align {
                AlignItems::End => area.height - outer_h,
                AlignItems::Center => (area.height - outer_h) / 2,
                _ => 0,
            };
        result
    }
}

/// Zero the geometry of a dropped item's subtree and mark it unpainted.
fn collapse(result: &mut LayoutResult) {
    result.rect = Rect::EMPTY;
    result.painted = false;
    for child in &mut result.children {
        collapse(child);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::segment::{Dimension, Segment};
    use crate::testing::FixedWidthMeasurer;
    use pretty_assertions::assert_eq;

    fn contributions(n: usize) -> Vec<TrackContribution> {
        vec![TrackContribution::default(); n]
    }

    #[test]
    fn fr_tracks_share_remaining_space() {
        let defs = [TrackSize::fr(1.0), TrackSize::fr(2.0), TrackSize::px(50.0)];
        assert_eq!(size_tracks(&defs, Some(350), 0, &contributions(3)), vec![100, 200, 50]);
    }

    #[test]
    fn gaps_reduce_fr_space() {
        let defs = [TrackSize::fr(1.0), TrackSize::fr(1.0)];
        assert_eq!(size_tracks(&defs, Some(110), 10, &contributions(2)), vec![50, 50]);
    }

    #[test]
    fn percent_and_content_tracks() {
        let defs = [TrackSize::percent(25.0), TrackSize::auto(), TrackSize::min_content()];
        let contrib = [
            TrackContribution::default(),
            TrackContribution { min: 10, max: 70 },
            TrackContribution { min: 15, max: 90 },
        ];
        assert_eq!(size_tracks(&defs, Some(400), 0, &contrib), vec![100, 70, 15]);
    }

    #[test]
    fn fr_clamped_by_min() {
        let defs = [TrackSize::fr(1.0).with_min(80.0), TrackSize::px(90.0)];
        assert_eq!(size_tracks(&defs, Some(100), 0, &contributions(2)), vec![80, 90]);
    }

    #[test]
    fn fr_without_space_sizes_like_auto() {
        let defs = [TrackSize::fr(1.0)];
        let contrib = [TrackContribution { min: 5, max: 42 }];
        assert_eq!(size_tracks(&defs, None, 0, &contrib), vec![42]);
    }

    #[test]
    fn geometry_cells_and_extent() {
        let g = GridGeometry::new(vec![10, 20, 30], vec![5, 5], 2, 1);
        assert_eq!(g.column_starts, vec![0, 12, 34]);
        let cell = GridCell { row: 1, column: 1, row_span: 1, column_span: 2 };
        assert_eq!(g.cell_rect(&cell), Rect::new(12, 6, 52, 5));
        assert_eq!(g.extent(), Size::new(64, 11));
    }

    fn grid_tree(props: GridLayoutProperties, items: Vec<Segment>) -> (SegmentTree, Vec<SegmentId>) {
        let mut tree = SegmentTree::with_root(Segment::container().with_grid(props)).unwrap();
        let root = tree.root();
        let ids = items.into_iter().map(|s| tree.append_child(root, s).unwrap()).collect();
        (tree, ids)
    }

    fn arrange(tree: &SegmentTree, inner: Constraints) -> GridArrangement {
        let measurer = FixedWidthMeasurer::default();
        let config = EngineConfig::default();
        let engine = LayoutEngine::new(tree, &measurer, &config);
        let root = tree.root();
        let props = tree.get(root).and_then(|s| s.layout().grid.clone()).unwrap();
        let mut offset = 0;
        GridLayoutEngine::arrange(&engine, root, &props, inner, true, &mut offset)
    }

    fn cell(row: usize, column: usize) -> Option<GridCell> {
        Some(GridCell { row, column, row_span: 1, column_span: 1 })
    }

    #[test]
    fn auto_flow_row_major() {
        let props = GridLayoutProperties::new().with_columns(vec![TrackSize::fr(1.0), TrackSize::fr(1.0)]);
        let items = (0..3).map(|_| Segment::text("ab")).collect();
        let (tree, _) = grid_tree(props, items);
        let out = arrange(&tree, Constraints::width(200));
        assert_eq!(out.cells, vec![cell(0, 0), cell(0, 1), cell(1, 0)]);
        assert_eq!(out.geometry.column_sizes, vec![100, 100]);
        assert_eq!(out.geometry.row_sizes, vec![20, 20]);
        assert_eq!(out.children[2].rect, Rect::new(0, 20, 20, 20));
    }

    #[test]
    fn auto_flow_column_major() {
        let props = GridLayoutProperties::new()
            .with_rows(vec![TrackSize::px(30.0), TrackSize::px(30.0)])
            .with_direction(GridDirection::Column);
        let items = (0..3).map(|_| Segment::text("x")).collect();
        let (tree, _) = grid_tree(props, items);
        let out = arrange(&tree, Constraints::width(200));
        assert_eq!(out.cells, vec![cell(0, 0), cell(1, 0), cell(0, 1)]);
        assert_eq!(out.geometry.column_count(), 2);
    }

    #[test]
    fn hidden_overflow_drops_extra_items() {
        let props = GridLayoutProperties::new()
            .with_columns(vec![TrackSize::px(40.0)])
            .with_rows(vec![TrackSize::px(20.0)])
            .with_overflow(GridOverflow::Hidden);
        let items = vec![Segment::text("a"), Segment::text("bc")];
        let (tree, _) = grid_tree(props, items);
        let out = arrange(&tree, Constraints::width(200));
        assert_eq!(out.cells, vec![cell(0, 0), None]);
        assert!(!out.children[1].painted);
        assert_eq!(out.children[1].rect, Rect::EMPTY);
        assert_eq!((out.children[1].global_start, out.children[1].global_end), (1, 3));
    }

    #[test]
    fn wrap_overflow_grows_columns_in_row_direction() {
        let props = GridLayoutProperties::new()
            .with_columns(vec![TrackSize::px(40.0)])
            .with_rows(vec![TrackSize::px(25.0)])
            .with_overflow(GridOverflow::Wrap);
        let items = vec![Segment::text("a"), Segment::text("b"), Segment::text("c")];
        let (tree, _) = grid_tree(props, items);
        let out = arrange(&tree, Constraints::width(200));
        assert_eq!(out.cells, vec![cell(0, 0), cell(0, 1), cell(0, 2)]);
        assert_eq!(out.geometry.column_sizes, vec![40, 40, 40]);
        assert_eq!(out.geometry.row_sizes, vec![25]);
    }

    #[test]
    fn wrap_overflow_grows_rows_in_column_direction() {
        let props = GridLayoutProperties::new()
            .with_columns(vec![TrackSize::px(40.0)])
            .with_rows(vec![TrackSize::px(25.0)])
            .with_direction(GridDirection::Column)
            .with_overflow(GridOverflow::Wrap);
        let items = vec![Segment::text("a"), Segment::text("b")];
        let (tree, _) = grid_tree(props, items);
        let out = arrange(&tree, Constraints::width(200));
        assert_eq!(out.cells, vec![cell(0, 0), cell(1, 0)]);
        assert_eq!(out.geometry.row_sizes, vec![25, 25]);
        assert_eq!(out.geometry.column_sizes, vec![40]);
    }

    #[test]
    fn visible_overflow_adds_auto_rows() {
        let props = GridLayoutProperties::new()
            .with_columns(vec![TrackSize::px(40.0)])
            .with_rows(vec![TrackSize::px(25.0)]);
        let items = vec![Segment::text("a"), Segment::text("b")];
        let (tree, _) = grid_tree(props, items);
        let out = arrange(&tree, Constraints::width(200));
        assert_eq!(out.geometry.row_sizes, vec![25, 20]);
    }

    #[test]
    fn explicit_placement_and_span() {
        let props = GridLayoutProperties::new().with_columns(vec![TrackSize::px(30.0); 3]);
        let items = vec![
            Segment::text("a").with_grid_item(GridItemProperties::new().at(0, 1).span(1, 2)),
            Segment::text("b"),
            Segment::text("c"),
        ];
        let (tree, _) = grid_tree(props, items);
        let out = arrange(&tree, Constraints::width(200));
        assert_eq!(
            out.cells,
            vec![
                Some(GridCell { row: 0, column: 1, row_span: 1, column_span: 2 }),
                cell(0, 0),
                cell(1, 0),
            ]
        );
        assert_eq!(out.children[0].rect.x, 30);
    }

    #[test]
    fn alignment_in_cell() {
        let props = GridLayoutProperties::new()
            .with_columns(vec![TrackSize::px(100.0)])
            .with_rows(vec![TrackSize::px(50.0)])
            .with_justify_content(JustifyContent::Center)
            .with_align_items(AlignItems::End);
        let (tree, _) = grid_tree(props, vec![Segment::text("abcd")]);
        let out = arrange(&tree, Constraints::width(200));
        assert_eq!(out.children[0].rect, Rect::new(30, 30, 40, 20));
    }

    #[test]
    fn stretch_fills_row_height() {
        let props = GridLayoutProperties::new()
            .with_columns(vec![TrackSize::px(100.0)])
            .with_rows(vec![TrackSize::px(50.0)]);
        let (tree, _) = grid_tree(props, vec![Segment::text("ab")]);
        let out = arrange(&tree, Constraints::width(200));
        assert_eq!(out.children[0].rect.height, 50);
    }

    #[test]
    fn explicit_height_is_not_stretched() {
        let props = GridLayoutProperties::new()
            .with_columns(vec![TrackSize::px(100.0)])
            .with_rows(vec![TrackSize::px(50.0)]);
        let item = Segment::text("ab").with_height(Dimension::Pixels(10.0));
        let (tree, _) = grid_tree(props, vec![item]);
        let out = arrange(&tree, Constraints::width(200));
        assert_eq!(out.children[0].rect.height, 10);
    }

    #[test]
    fn row_height_uses_column_width() {
        let props = GridLayoutProperties::new().with_columns(vec![TrackSize::px(50.0)]);
        let (tree, _) = grid_tree(props, vec![Segment::text(&"w".repeat(12))]);
        let out = arrange(&tree, Constraints::width(500));
        assert_eq!(out.geometry.row_sizes, vec![60]);
    }
}
