//! Testing utilities: a deterministic measurer and layout dumps.
//!
//! - [`FixedWidthMeasurer`] gives every code point the same advance width
//! - [`layout_to_string`] renders a layout tree as indented text for snapshots

pub mod snapshot;

pub use snapshot::layout_to_string;

use crate::segment::FontDescriptor;
use crate::text::{FontMetrics, TextMeasurer};

/// Monospace measurer: `width = code points × char_width`, independent of font.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedWidthMeasurer {
    pub char_width: i32,
    pub line_height: i32,
}

impl FixedWidthMeasurer {
    pub fn new(char_width: i32, line_height: i32) -> Self {
        Self { char_width, line_height }
    }
}

impl Default for FixedWidthMeasurer {
    fn default() -> Self {
        Self::new(10, 20)
    }
}

impl TextMeasurer for FixedWidthMeasurer {
    fn measure(&self, text: &str, _font: &FontDescriptor) -> i32 {
        text.chars().count() as i32 * self.char_width
    }

    fn metrics(&self, _font: &FontDescriptor) -> FontMetrics {
        let ascent = self.line_height * 4 / 5;
        FontMetrics { ascent, descent: self.line_height - ascent, line_height: self.line_height }
    }
}
