//! Layout output: a tree of positioned boxes mirroring the displayed segments.

use crate::geometry::{Point, Rect, Size};
use crate::segment::SegmentId;

use super::grid::GridGeometry;

/// Geometry of one displayed segment.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutResult {
    pub segment: SegmentId,
    /// Border box relative to the parent's border box (the document origin
    /// for the root).
    pub rect: Rect,
    /// First global offset covered by this segment.
    pub global_start: usize,
    /// One past the last global offset covered by this segment.
    pub global_end: usize,
    /// `false` inside `display: hidden` subtrees and for grid items dropped
    /// by `overflow: hidden`.
    pub painted: bool,
    pub children: Vec<LayoutResult>,
    /// Track geometry, present when the segment is a grid container.
    pub grid: Option<GridGeometry>,
}

impl LayoutResult {
    pub fn new(segment: SegmentId, rect: Rect, global_start: usize, global_end: usize) -> Self {
        Self { segment, rect, global_start, global_end, painted: true, children: Vec::new(), grid: None }
    }

    /// Half-open containment: `global_start <= offset < global_end`.
    pub fn contains_offset(&self, offset: usize) -> bool {
        self.global_start <= offset && offset < self.global_end
    }

    /// Number of results in this subtree, inclusive.
    pub fn count(&self) -> usize {
        1 + self.children.iter().map(LayoutResult::count).sum::<usize>()
    }

    /// Visit every result in pre-order with its absolute rect.
    pub fn visit<'a>(&'a self, f: &mut dyn FnMut(&'a LayoutResult, Rect)) {
        self.visit_from(Point::ZERO, f);
    }

    fn visit_from<'a>(&'a self, origin: Point, f: &mut dyn FnMut(&'a LayoutResult, Rect)) {
        let abs = self.rect.translate(origin);
        f(self, abs);
        for child in &self.children {
            child.visit_from(abs.origin(), f);
        }
    }

    /// Find the result for a segment together with its absolute rect.
    pub fn find(&self, segment: SegmentId) -> Option<(&LayoutResult, Rect)> {
        self.find_from(segment, Point::ZERO)
    }

    fn find_from(&self, segment: SegmentId, origin: Point) -> Option<(&LayoutResult, Rect)> {
        let abs = self.rect.translate(origin);
        if self.segment == segment {
            return Some((self, abs));
        }
        self.children.iter().find_map(|c| c.find_from(segment, abs.origin()))
    }

    /// Absolute rect of a segment, if it was laid out.
    pub fn absolute_rect(&self, segment: SegmentId) -> Option<Rect> {
        self.find(segment).map(|(_, rect)| rect)
    }

    /// The deepest result whose offset range contains `offset`. Among
    /// siblings the latest match wins.
    pub fn hit_test_offset(&self, offset: usize) -> Option<&LayoutResult> {
        if !self.contains_offset(offset) {
            return None;
        }
        self.children.iter().rev().find_map(|c| c.hit_test_offset(offset)).or(Some(self))
    }

    /// The deepest painted result under `point` that `accept` allows, with
    /// its absolute rect. Later siblings are tested first.
    pub fn hit_test_point(&self, point: Point, accept: &dyn Fn(SegmentId) -> bool) -> Option<(&LayoutResult, Rect)> {
        self.hit_test_from(point, Point::ZERO, accept)
    }

    fn hit_test_from(
        &self,
        point: Point,
        origin: Point,
        accept: &dyn Fn(SegmentId) -> bool,
    ) -> Option<(&LayoutResult, Rect)> {
        let abs = self.rect.translate(origin);
        if let Some(hit) = self
            .children
            .iter()
            .rev()
            .find_map(|c| c.hit_test_from(point, abs.origin(), accept))
        {
            return Some(hit);
        }
        (self.painted && abs.contains(point) && accept(self.segment)).then_some((self, abs))
    }
}

/// Result of a full layout pass.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutOutput {
    pub root: LayoutResult,
    /// Extent of the root's margin box.
    pub content_size: Size,
}
