//! Grid container and grid item properties.

use serde::{Deserialize, Serialize};

use super::template::{parse_track_list, TemplateError};
use super::track::TrackSize;

/// Auto-flow direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GridDirection {
    /// Fill a row left to right, then move down.
    #[default]
    Row,
    /// Fill a column top to bottom, then move right.
    Column,
}

/// What happens to items that do not fit the explicit tracks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GridOverflow {
    /// Extra items are kept in implicit `auto` tracks.
    #[default]
    Visible,
    /// Extra items are dropped: laid out at zero size and not painted.
    Hidden,
    /// The flow axis (columns for `Row`, rows for `Column`) grows to hold
    /// every item; implicit tracks repeat its last explicit definition.
    Wrap,
}

/// Horizontal placement of an item inside its cell.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum JustifyContent {
    #[default]
    Start,
    End,
    Center,
    /// Degrades to `Start` for a single item per cell.
    SpaceBetween,
    /// Degrades to `Start` for a single item per cell.
    SpaceAround,
    /// Degrades to `Start` for a single item per cell.
    SpaceEvenly,
}

/// Vertical placement of an item inside its cell.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AlignItems {
    Start,
    End,
    Center,
    #[default]
    Stretch,
    /// Treated as `Start`; no baseline alignment is performed.
    Baseline,
}

/// Properties of a container that lays out its children in grid tracks.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridLayoutProperties {
    pub rows: Vec<TrackSize>,
    pub columns: Vec<TrackSize>,
    pub direction: GridDirection,
    pub overflow: GridOverflow,
    pub row_gap: i32,
    pub column_gap: i32,
    pub justify_content: JustifyContent,
    pub align_items: AlignItems,
    pub resizable_rows: bool,
    pub resizable_columns: bool,
}

impl GridLayoutProperties {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from CSS-like track lists, e.g. `"1fr 2fr 50px"`.
    pub fn from_templates(columns: &str, rows: &str) -> Result<Self, TemplateError> {
        Ok(Self {
            columns: parse_track_list(columns)?,
            rows: parse_track_list(rows)?,
            ..Self::default()
        })
    }

    pub fn with_columns(mut self, columns: Vec<TrackSize>) -> Self {
        self.columns = columns;
        self
    }

    pub fn with_rows(mut self, rows: Vec<TrackSize>) -> Self {
        self.rows = rows;
        self
    }

    pub fn with_direction(mut self, direction: GridDirection) -> Self {
        self.direction = direction;
        self
    }

    pub fn with_overflow(mut self, overflow: GridOverflow) -> Self {
        self.overflow = overflow;
        self
    }

    /// Set both row and column gaps (builder).
    pub fn with_gap(mut self, gap: i32) -> Self {
        self.row_gap = gap;
        self.column_gap = gap;
        self
    }

    pub fn with_justify_content(mut self, justify: JustifyContent) -> Self {
        self.justify_content = justify;
        self
    }

    pub fn with_align_items(mut self, align: AlignItems) -> Self {
        self.align_items = align;
        self
    }

    /// Allow dragging track boundaries (builder).
    pub fn with_resizable(mut self, rows: bool, columns: bool) -> Self {
        self.resizable_rows = rows;
        self.resizable_columns = columns;
        self
    }
}

/// Per-item placement overrides inside a grid container.
///
/// `row`/`column` are zero-based track indices. An item with neither set is
/// auto-placed; with one set, it is auto-placed along the other axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct GridItemProperties {
    pub row: Option<usize>,
    pub column: Option<usize>,
    pub row_span: usize,
    pub column_span: usize,
    pub justify_self: Option<JustifyContent>,
    pub align_self: Option<AlignItems>,
}

impl Default for GridItemProperties {
    fn default() -> Self {
        Self { row: None, column: None, row_span: 1, column_span: 1, justify_self: None, align_self: None }
    }
}

impl GridItemProperties {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pin to a cell (builder).
    pub fn at(mut self, row: usize, column: usize) -> Self {
        self.row = Some(row);
        self.column = Some(column);
        self
    }

    /// Span several tracks (builder). Spans below 1 are treated as 1.
    pub fn span(mut self, rows: usize, columns: usize) -> Self {
        self.row_span = rows.max(1);
        self.column_span = columns.max(1);
        self
    }

    pub fn with_justify_self(mut self, justify: JustifyContent) -> Self {
        self.justify_self = Some(justify);
        self
    }

    pub fn with_align_self(mut self, align: AlignItems) -> Self {
        self.align_self = Some(align);
        self
    }
}
