//! Commands accepted by the document service.

use serde::{Deserialize, Serialize};

use crate::cursor::{CursorPosition, Selection};
use crate::geometry::Point;
use crate::layout::Constraints;
use crate::segment::{SegmentPath, SegmentRecord};

/// Caret movement granularity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CursorMovement {
    Forward,
    Backward,
    WordForward,
    WordBackward,
    LineUp,
    LineDown,
    LineStart,
    LineEnd,
    NextFocusable,
    PreviousFocusable,
    DocumentStart,
    DocumentEnd,
}

/// A request to edit, navigate or lay out the document.
///
/// Editing commands act on the current selection: a non-empty selection is
/// replaced or deleted, an empty one edits at the caret.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum DocumentCommand {
    InsertText { text: String },
    DeleteBackward,
    DeleteForward,
    DeleteSelection,
    MoveCursor {
        movement: CursorMovement,
        /// Keep the anchor and move only the focus.
        #[serde(default)]
        extend: bool,
    },
    SetCursor { position: CursorPosition },
    Select { selection: Selection },
    SelectWord,
    Click {
        point: Point,
        #[serde(default)]
        extend: bool,
    },
    AppendSegment { parent: SegmentPath, segment: SegmentRecord },
    RemoveSegment { path: SegmentPath },
    SetText { path: SegmentPath, text: String },
    Layout { constraints: Constraints },
    ResizeTrack { container: SegmentPath, from: Point, to: Point },
}

impl DocumentCommand {
    /// Short name for logging.
    pub fn name(&self) -> &'static str {
        match self {
            Self::InsertText { .. } => "insert_text",
            Self::DeleteBackward => "delete_backward",
            Self::DeleteForward => "delete_forward",
            Self::DeleteSelection => "delete_selection",
            Self::MoveCursor { .. } => "move_cursor",
            Self::SetCursor { .. } => "set_cursor",
            Self::Select { .. } => "select",
            Self::SelectWord => "select_word",
            Self::Click { .. } => "click",
            Self::AppendSegment { .. } => "append_segment",
            Self::RemoveSegment { .. } => "remove_segment",
            Self::SetText { .. } => "set_text",
            Self::Layout { .. } => "layout",
            Self::ResizeTrack { .. } => "resize_track",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn json_shape() {
        let cmd = DocumentCommand::MoveCursor { movement: CursorMovement::WordForward, extend: true };
        let json = serde_json::to_string(&cmd).unwrap();
        assert_eq!(json, r#"{"command":"move_cursor","movement":"word_forward","extend":true}"#);
    }

    #[test]
    fn extend_defaults_to_false() {
        let cmd: DocumentCommand = serde_json::from_str(r#"{"command":"move_cursor","movement":"line_end"}"#).unwrap();
        assert_eq!(cmd, DocumentCommand::MoveCursor { movement: CursorMovement::LineEnd, extend: false });
        assert_eq!(cmd.name(), "move_cursor");
    }

    #[test]
    fn unit_commands_decode() {
        let cmd: DocumentCommand = serde_json::from_str(r#"{"command":"delete_backward"}"#).unwrap();
        assert_eq!(cmd, DocumentCommand::DeleteBackward);
    }
}
