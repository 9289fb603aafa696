//! Command/event bridge between a UI and a [`Document`](crate::document::Document).
//!
//! Commands and events are plain serde values so they can cross a thread,
//! process or wire boundary unchanged.

pub mod command;
pub mod event;
pub mod service;

pub use command::{CursorMovement, DocumentCommand};
pub use event::DocumentEvent;
pub use service::DocumentService;
