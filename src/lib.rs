//! # segflow
//!
//! A layout and cursor-addressing engine for rich-content editors.
//!
//! Content lives in a tree of typed segments (text, containers, images,
//! spacers, embedded components). segflow computes pixel geometry for that
//! tree under box-model rules and maps every caret location to a single
//! global offset and back, which is what cursor movement, selection and
//! editing are built on.
//!
//! ## Core Systems
//!
//! - **[`segment`]**: slotmap-backed segment tree, properties, rich spans, serde records
//! - **[`text`]**: the measurement capability, memoized widths, glyph boundary caches
//! - **[`layout`]**: block/inline flow, grid tracks, hit testing, spatial map
//! - **[`cursor`]**: offset cache, position conversion, navigation, editing
//! - **[`document`]**: a tree together with all of its derived caches
//! - **[`bridge`]**: serde commands and events with a tokio service loop
//! - **[`config`]**: engine configuration
//! - **[`geometry`]**: Point, Size, Rect, Edges primitives
//! - **[`testing`]**: deterministic measurer and layout dumps

// Foundation
pub mod config;
pub mod geometry;

// Content model
pub mod segment;
pub mod text;

// Geometry and addressing
pub mod cursor;
pub mod layout;

// Integration
pub mod bridge;
pub mod document;

// Test support
pub mod testing;

pub use document::{Document, DocumentError};
