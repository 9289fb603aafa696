//! The document service: applies commands to a document and reports events.
//!
//! [`DocumentService::apply`] is the synchronous core. [`DocumentService::run`]
//! drives it from a `tokio` mpsc command channel and forwards the resulting
//! events, so a UI thread can talk to the document without sharing it.

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, trace, warn};

use crate::cursor::{CursorPosition, Selection};
use crate::document::{Document, DocumentError};
use crate::geometry::Point;
use crate::layout::LayoutOutput;
use crate::segment::SegmentId;

use super::command::{CursorMovement, DocumentCommand};
use super::event::DocumentEvent;

fn layout_complete(output: &LayoutOutput) -> DocumentEvent {
    DocumentEvent::LayoutComplete {
        width: output.content_size.width,
        height: output.content_size.height,
        segments: output.root.count(),
    }
}

/// A document plus the user's selection.
#[derive(Debug)]
pub struct DocumentService {
    document: Document,
    /// `start` is the anchor, `end` the caret.
    selection: Selection,
}

impl DocumentService {
    /// Wrap `document` with the caret at its start.
    pub fn new(mut document: Document) -> Self {
        let start = document.navigator().global_offset_to_position(0);
        Self { document, selection: Selection::collapsed(start) }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    pub fn into_document(self) -> Document {
        self.document
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn caret(&self) -> &CursorPosition {
        &self.selection.end
    }

    /// Apply one command. On error nothing observable changed.
    pub fn apply(&mut self, command: DocumentCommand) -> Result<Vec<DocumentEvent>, DocumentError> {
        trace!(command = command.name(), "applying command");
        match command {
            DocumentCommand::InsertText { text } => self.insert(&text),
            DocumentCommand::DeleteBackward => self.delete_adjacent(false),
            DocumentCommand::DeleteForward => self.delete_adjacent(true),
            DocumentCommand::DeleteSelection => self.delete_selection(),
            DocumentCommand::MoveCursor { movement, extend } => {
                let target = self.moved(movement);
                Ok(self.place(target, extend))
            }
            DocumentCommand::SetCursor { position } => {
                let target = self.document.navigator().refresh(&position);
                Ok(self.place(target, false))
            }
            DocumentCommand::Select { selection } => {
                let nav = self.document.navigator();
                let refreshed = Selection::new(nav.refresh(&selection.start), nav.refresh(&selection.end));
                Ok(self.set_selection(refreshed))
            }
            DocumentCommand::SelectWord => {
                let word = self.document.navigator().word_at(&self.selection.end);
                Ok(self.set_selection(word))
            }
            DocumentCommand::Click { point, extend } => Ok(self.click(point, extend)),
            DocumentCommand::AppendSegment { parent, segment } => {
                let parent = self.document.resolve_path(&parent)?;
                let before = self.selection_offsets();
                let id = self.document.tree_mut().append_record(parent, segment)?;
                let (start, inserted) = self.span_of(id);
                Ok(self.after_structure_change(before, start, 0, inserted))
            }
            DocumentCommand::RemoveSegment { path } => {
                let id = self.document.resolve_path(&path)?;
                let (start, removed) = self.span_of(id);
                let before = self.selection_offsets();
                self.document.tree_mut().remove(id)?;
                Ok(self.after_structure_change(before, start, removed, 0))
            }
            DocumentCommand::SetText { path, text } => {
                let id = self.document.resolve_path(&path)?;
                let (start, removed) = self.span_of(id);
                let before = self.selection_offsets();
                self.document.tree_mut().set_text(id, &text)?;
                let (_, inserted) = self.span_of(id);
                Ok(self.after_structure_change(before, start, removed, inserted))
            }
            DocumentCommand::Layout { constraints } => Ok(vec![layout_complete(self.document.layout(constraints))]),
            DocumentCommand::ResizeTrack { container, from, to } => {
                let id = self.document.resolve_path(&container)?;
                match self.document.resize_grid_track(id, from, to)? {
                    Some(_) => Ok(vec![layout_complete(self.document.relayout())]),
                    None => Ok(Vec::new()),
                }
            }
        }
    }

    // -- editing ---------------------------------------------------------------

    fn insert(&mut self, text: &str) -> Result<Vec<DocumentEvent>, DocumentError> {
        let (start, removed) = self.selected_range();
        let caret = if removed > 0 {
            self.document.replace_range(&self.selection, text)?
        } else {
            self.document.insert_text(&self.selection.end, text)?
        };
        Ok(self.after_edit(caret, start, removed, text.chars().count()))
    }

    fn delete_adjacent(&mut self, forward: bool) -> Result<Vec<DocumentEvent>, DocumentError> {
        if !self.selection.is_empty() {
            return self.delete_selection();
        }
        let nav = self.document.navigator();
        let caret = &self.selection.end;
        let other = if forward { nav.move_forward(caret) } else { nav.move_backward(caret) };
        let from = nav.position_to_global_offset(caret);
        let to = nav.position_to_global_offset(&other);
        if from == to {
            return Ok(Vec::new());
        }
        let range = Selection::new(caret.clone(), other);
        let caret = self.document.delete_range(&range)?;
        Ok(self.after_edit(caret, from.min(to), from.abs_diff(to), 0))
    }

    fn delete_selection(&mut self) -> Result<Vec<DocumentEvent>, DocumentError> {
        let (start, removed) = self.selected_range();
        if removed == 0 {
            return Ok(Vec::new());
        }
        let caret = self.document.delete_range(&self.selection)?;
        Ok(self.after_edit(caret, start, removed, 0))
    }

    /// Start and length of the selection in global offsets.
    fn selected_range(&mut self) -> (usize, usize) {
        let (a, b) = self.selection_offsets();
        (a.min(b), a.abs_diff(b))
    }

    fn selection_offsets(&mut self) -> (usize, usize) {
        let nav = self.document.navigator();
        (
            nav.position_to_global_offset(&self.selection.start),
            nav.position_to_global_offset(&self.selection.end),
        )
    }

    fn after_edit(&mut self, caret: CursorPosition, start: usize, removed: usize, inserted: usize) -> Vec<DocumentEvent> {
        let had_selection = !self.selection.is_empty();
        self.selection = Selection::collapsed(caret.clone());
        let total_length = self.document.total_length();
        let mut events = vec![
            DocumentEvent::TextChanged { start, removed, inserted, total_length },
            DocumentEvent::CursorMoved { position: caret },
        ];
        if had_selection {
            events.push(DocumentEvent::SelectionChanged { selection: self.selection.clone() });
        }
        events
    }

    // -- structure ---------------------------------------------------------------

    /// Start and length of a displayed segment, `(0, 0)` otherwise.
    fn span_of(&mut self, id: SegmentId) -> (usize, usize) {
        self.document.navigator().entry(id).map_or((0, 0), |e| (e.start, e.length))
    }

    /// Re-resolve the selection after `removed` offsets at `start` became
    /// `inserted` ones. Ends inside the replaced range collapse to `start`.
    fn after_structure_change(
        &mut self,
        (anchor, caret): (usize, usize),
        start: usize,
        removed: usize,
        inserted: usize,
    ) -> Vec<DocumentEvent> {
        let remap = |g: usize| {
            if g <= start {
                g
            } else if g < start + removed {
                start
            } else {
                g - removed + inserted
            }
        };
        let nav = self.document.navigator();
        let total_length = nav.total_length();
        self.selection = Selection::new(nav.global_offset_to_position(remap(anchor)), nav.global_offset_to_position(remap(caret)));
        let mut events = vec![
            DocumentEvent::TextChanged { start, removed, inserted, total_length },
            DocumentEvent::CursorMoved { position: self.selection.end.clone() },
        ];
        if !self.selection.is_empty() {
            events.push(DocumentEvent::SelectionChanged { selection: self.selection.clone() });
        }
        events
    }

    // -- navigation --------------------------------------------------------------

    fn moved(&mut self, movement: CursorMovement) -> CursorPosition {
        let from = self.selection.end.clone();
        let doc = &mut self.document;
        match movement {
            CursorMovement::Forward => doc.navigator().move_forward(&from),
            CursorMovement::Backward => doc.navigator().move_backward(&from),
            CursorMovement::WordForward => doc.navigator().move_word_forward(&from),
            CursorMovement::WordBackward => doc.navigator().move_word_backward(&from),
            CursorMovement::LineUp => doc.move_line_up(&from),
            CursorMovement::LineDown => doc.move_line_down(&from),
            CursorMovement::LineStart => doc.move_line_start(&from),
            CursorMovement::LineEnd => doc.move_line_end(&from),
            CursorMovement::NextFocusable => doc.navigator().move_to_next_focusable(&from),
            CursorMovement::PreviousFocusable => doc.navigator().move_to_previous_focusable(&from),
            CursorMovement::DocumentStart => doc.navigator().global_offset_to_position(0),
            CursorMovement::DocumentEnd => {
                let nav = doc.navigator();
                nav.global_offset_to_position(nav.total_length())
            }
        }
    }

    /// Move the caret; `extend` keeps the anchor.
    fn place(&mut self, target: CursorPosition, extend: bool) -> Vec<DocumentEvent> {
        let had_selection = !self.selection.is_empty();
        if extend {
            self.selection.end = target;
        } else {
            self.selection = Selection::collapsed(target);
        }
        let mut events = vec![DocumentEvent::CursorMoved { position: self.selection.end.clone() }];
        if extend || had_selection {
            events.push(DocumentEvent::SelectionChanged { selection: self.selection.clone() });
        }
        events
    }

    fn set_selection(&mut self, selection: Selection) -> Vec<DocumentEvent> {
        self.selection = selection;
        vec![
            DocumentEvent::SelectionChanged { selection: self.selection.clone() },
            DocumentEvent::CursorMoved { position: self.selection.end.clone() },
        ]
    }

    fn click(&mut self, point: Point, extend: bool) -> Vec<DocumentEvent> {
        let target = self.document.position_at_point(point);
        let mut events = Vec::new();
        if let Some(path) = self.document.segment_at_point(point).and_then(|id| self.document.tree().path_of(id)) {
            events.push(DocumentEvent::SegmentClicked { path, point });
        }
        events.extend(self.place(target, extend));
        events
    }

    // -- async -------------------------------------------------------------------

    /// Apply commands until the channel closes or the event receiver is
    /// dropped, then hand the service back. Failed commands are reported as
    /// [`DocumentEvent::CommandFailed`].
    pub async fn run(
        mut self,
        mut commands: mpsc::UnboundedReceiver<DocumentCommand>,
        events: mpsc::UnboundedSender<DocumentEvent>,
    ) -> Self {
        while let Some(command) = commands.recv().await {
            let name = command.name();
            let emitted = match self.apply(command) {
                Ok(emitted) => emitted,
                Err(err) => {
                    warn!(command = name, error = %err, "command failed");
                    vec![DocumentEvent::CommandFailed { command: name.to_string(), message: err.to_string() }]
                }
            };
            for event in emitted {
                if events.send(event).is_err() {
                    debug!("event receiver dropped, stopping document service");
                    return self;
                }
            }
        }
        debug!("command channel closed, stopping document service");
        self
    }

    /// Run on the current tokio runtime. Returns the command sender, the
    /// event receiver and a handle resolving to the service once it stops.
    pub fn spawn(
        self,
    ) -> (mpsc::UnboundedSender<DocumentCommand>, mpsc::UnboundedReceiver<DocumentEvent>, JoinHandle<Self>) {
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let handle = tokio::spawn(self.run(command_rx, event_tx));
        (command_tx, event_rx, handle)
    }
}
