//! Rich-text spans and their maintenance across text edits.

use std::ops::Range;

use serde::{Deserialize, Serialize};

use super::props::TextStyle;

/// A styled sub-range of a text segment, in code points local to the segment.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RichTextSpan {
    pub start: usize,
    pub end: usize,
    pub style: TextStyle,
}

impl RichTextSpan {
    pub fn new(start: usize, end: usize, style: TextStyle) -> Self {
        Self { start, end, style }
    }

    /// Whether `0 <= start <= end <= len`.
    pub fn is_valid_for(&self, len: usize) -> bool {
        self.start <= self.end && self.end <= len
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Shift spans for `count` code points inserted at `at`.
///
/// Spans that start after the insertion point move right. An insertion inside
/// a span, or at its end, extends the span.
pub(crate) fn shift_for_insert(spans: &mut [RichTextSpan], at: usize, count: usize) {
    for span in spans.iter_mut() {
        if at < span.start {
            span.start += count;
            span.end += count;
        } else if at <= span.end {
            span.end += count;
        }
    }
}

/// Collapse spans for the code points in `removed` being deleted.
///
/// Bounds inside the removed range snap to its start; bounds after it move
/// left. Spans that become empty are dropped.
pub(crate) fn collapse_for_delete(spans: &mut Vec<RichTextSpan>, removed: Range<usize>) {
    let len = removed.end - removed.start;
    let map = |x: usize| {
        if x <= removed.start {
            x
        } else if x >= removed.end {
            x - len
        } else {
            removed.start
        }
    };
    for span in spans.iter_mut() {
        span.start = map(span.start);
        span.end = map(span.end);
    }
    spans.retain(|s| !s.is_empty());
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span(start: usize, end: usize) -> RichTextSpan {
        RichTextSpan::new(start, end, TextStyle::new().with_bold(true))
    }

    #[test]
    fn validity() {
        assert!(span(0, 0).is_valid_for(0));
        assert!(span(1, 3).is_valid_for(3));
        assert!(!span(1, 4).is_valid_for(3));
        assert!(!span(3, 1).is_valid_for(5));
    }

    #[test]
    fn insert_before_span_shifts_it() {
        let mut spans = vec![span(2, 4)];
        shift_for_insert(&mut spans, 1, 3);
        assert_eq!(spans[0].range(), 5..7);
    }

    #[test]
    fn insert_inside_span_extends_it() {
        let mut spans = vec![span(2, 4)];
        shift_for_insert(&mut spans, 3, 2);
        assert_eq!(spans[0].range(), 2..6);
    }

    #[test]
    fn insert_at_span_end_extends_it() {
        let mut spans = vec![span(2, 4)];
        shift_for_insert(&mut spans, 4, 1);
        assert_eq!(spans[0].range(), 2..5);
    }

    #[test]
    fn insert_after_span_leaves_it() {
        let mut spans = vec![span(0, 2)];
        shift_for_insert(&mut spans, 5, 3);
        assert_eq!(spans[0].range(), 0..2);
    }

    #[test]
    fn delete_overlapping_start() {
        let mut spans = vec![span(2, 6)];
        collapse_for_delete(&mut spans, 0..4);
        assert_eq!(spans[0].range(), 0..2);
    }

    #[test]
    fn delete_inside_span() {
        let mut spans = vec![span(2, 8)];
        collapse_for_delete(&mut spans, 3..5);
        assert_eq!(spans[0].range(), 2..6);
    }

    #[test]
    fn delete_covering_span_drops_it() {
        let mut spans = vec![span(2, 4), span(6, 8)];
        collapse_for_delete(&mut spans, 1..5);
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].range(), 2..4);
    }
}
