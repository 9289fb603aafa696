//! Cumulative glyph boundaries for sub-character hit-testing.

use super::measure::TextMeasurer;
use crate::segment::FontDescriptor;

/// Pixel x-offsets of every character boundary in one string.
///
/// For `N` code points there are `N + 1` boundaries: `boundaries[0] == 0` and
/// `boundaries[i]` is the measured width of the first `i` code points. Building
/// costs `N` measurements; queries afterwards are O(log N) or O(1).
#[derive(Debug, Clone, PartialEq)]
pub struct GlyphBoundaryCache {
    text: Vec<char>,
    font: FontDescriptor,
    boundaries: Vec<i32>,
}

impl GlyphBoundaryCache {
    /// Measure every prefix of `text`.
    pub fn build(text: &[char], font: &FontDescriptor, measurer: &dyn TextMeasurer) -> Self {
        let mut boundaries = Vec::with_capacity(text.len() + 1);
        boundaries.push(0);
        let mut prefix = String::with_capacity(text.len() * 4);
        for &ch in text {
            prefix.push(ch);
            boundaries.push(measurer.measure(&prefix, font));
        }
        Self { text: text.to_vec(), font: font.clone(), boundaries }
    }

    /// Build directly from precomputed boundaries.
    pub fn from_boundaries(text: &[char], font: &FontDescriptor, boundaries: Vec<i32>) -> Self {
        debug_assert_eq!(boundaries.len(), text.len() + 1);
        Self { text: text.to_vec(), font: font.clone(), boundaries }
    }

    /// Number of code points covered.
    pub fn len(&self) -> usize {
        self.boundaries.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Total width of the string.
    pub fn width(&self) -> i32 {
        self.boundaries.last().copied().unwrap_or(0)
    }

    pub fn boundaries(&self) -> &[i32] {
        &self.boundaries
    }

    /// Character boundary closest to `x`, relative to the start of the text.
    ///
    /// Binary-searches the boundaries and snaps to whichever of the two
    /// bracketing boundaries is nearer; ties go to the earlier one. Points
    /// before the text yield 0, points past it yield `len()`.
    pub fn find_character_at(&self, x: i32) -> usize {
        let n = self.len();
        if x <= 0 {
            return 0;
        }
        if x >= self.width() {
            return n;
        }
        // First boundary strictly greater than x; it is in 1..=n here.
        let upper = self.boundaries.partition_point(|&b| b <= x);
        let lower = upper - 1;
        if x - self.boundaries[lower] <= self.boundaries[upper] - x {
            lower
        } else {
            upper
        }
    }

    /// X offset of the boundary before character `index`, clamped to the text.
    pub fn x_for_character(&self, index: usize) -> i32 {
        self.boundaries[index.min(self.len())]
    }

    /// Whether this cache still describes `text` set in `font`.
    pub fn is_valid_for(&self, text: &[char], font: &FontDescriptor) -> bool {
        self.font == *font && self.text == text
    }
}
