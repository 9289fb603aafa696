//! Events emitted by the document service.

use serde::{Deserialize, Serialize};

use crate::cursor::{CursorPosition, Selection};
use crate::geometry::Point;
use crate::segment::SegmentPath;

/// Something observable changed in the document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum DocumentEvent {
    CursorMoved { position: CursorPosition },
    SelectionChanged { selection: Selection },
    /// `removed` offsets starting at `start` were replaced by `inserted`.
    TextChanged { start: usize, removed: usize, inserted: usize, total_length: usize },
    SegmentClicked { path: SegmentPath, point: Point },
    LayoutComplete { width: i32, height: i32, segments: usize },
    /// A command could not be applied; the document is unchanged.
    CommandFailed { command: String, message: String },
}
