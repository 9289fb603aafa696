//! Text measurement, glyph boundary caching, and word boundaries.

pub mod glyph_cache;
pub mod measure;
pub mod words;

pub use glyph_cache::GlyphBoundaryCache;
pub use measure::{CachedMeasurer, FontMetrics, TextMeasurer};
