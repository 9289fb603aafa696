//! Cursor model: the global offset space over displayed segments.
//!
//! Text contributes one offset per code point, other leaves contribute one,
//! and containers contribute the sum of their displayed children.
//! [`OffsetCache`] indexes that space; [`CursorNavigator`] converts between
//! offsets and [`CursorPosition`]s and moves through them; [`edit`] mutates
//! text through positions.

pub mod cache;
pub mod edit;
pub mod navigator;
pub mod position;

pub use cache::{OffsetCache, OffsetEntry};
pub use edit::{delete_range, insert_text, replace_range};
pub use navigator::{CursorNavigator, OBJECT_REPLACEMENT};
pub use position::{CursorPosition, Selection};
