//! Pixel geometry: Point, Size, Rect, Edges.
//!
//! All layout output is expressed in whole pixels. Rectangles returned by the
//! layout engine are relative to their parent's border box.

use std::ops::{Add, Sub};

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Point
// ---------------------------------------------------------------------------

/// A 2D position in pixels.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    /// The origin.
    pub const ZERO: Point = Point { x: 0, y: 0 };

    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl Add for Point {
    type Output = Point;
    #[inline]
    fn add(self, rhs: Point) -> Point {
        Point { x: self.x + rhs.x, y: self.y + rhs.y }
    }
}

impl Sub for Point {
    type Output = Point;
    #[inline]
    fn sub(self, rhs: Point) -> Point {
        Point { x: self.x - rhs.x, y: self.y - rhs.y }
    }
}

// ---------------------------------------------------------------------------
// Size
// ---------------------------------------------------------------------------

/// A width/height pair in pixels.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Size {
    pub width: i32,
    pub height: i32,
}

impl Size {
    /// A zero-sized size.
    pub const ZERO: Size = Size { width: 0, height: 0 };

    #[inline]
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    /// Clamp both dimensions to be non-negative.
    #[inline]
    pub fn clamp_non_negative(self) -> Size {
        Size { width: self.width.max(0), height: self.height.max(0) }
    }
}

// ---------------------------------------------------------------------------
// Rect
// ---------------------------------------------------------------------------

/// An axis-aligned rectangle defined by position and size.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    /// An empty rect at the origin.
    pub const EMPTY: Rect = Rect { x: 0, y: 0, width: 0, height: 0 };

    #[inline]
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self { x, y, width, height }
    }

    /// Build a rect from an origin and a size.
    #[inline]
    pub const fn from_origin_size(origin: Point, size: Size) -> Self {
        Self { x: origin.x, y: origin.y, width: size.width, height: size.height }
    }

    /// The right edge (exclusive).
    #[inline]
    pub const fn right(self) -> i32 {
        self.x + self.width
    }

    /// The bottom edge (exclusive).
    #[inline]
    pub const fn bottom(self) -> i32 {
        self.y + self.height
    }

    #[inline]
    pub const fn origin(self) -> Point {
        Point { x: self.x, y: self.y }
    }

    #[inline]
    pub const fn size(self) -> Size {
        Size { width: self.width, height: self.height }
    }

    /// Whether the point lies inside this rect. Zero-sized rects contain nothing.
    #[inline]
    pub const fn contains(self, point: Point) -> bool {
        point.x >= self.x && point.x < self.right() && point.y >= self.y && point.y < self.bottom()
    }

    /// Whether the vertical band `[y, bottom)` contains `y`.
    #[inline]
    pub const fn contains_y(self, y: i32) -> bool {
        y >= self.y && y < self.bottom()
    }

    /// Translate by a point.
    #[inline]
    pub const fn translate(self, by: Point) -> Rect {
        Rect { x: self.x + by.x, y: self.y + by.y, width: self.width, height: self.height }
    }

    /// Whether the two rects share any area. Zero-sized rects overlap nothing.
    pub const fn overlaps(self, other: Rect) -> bool {
        self.width > 0
            && self.height > 0
            && other.width > 0
            && other.height > 0
            && self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    /// Smallest rect containing both. An empty `self` yields `other`.
    pub fn union(self, other: Rect) -> Rect {
        if self.width == 0 && self.height == 0 {
            return other;
        }
        let x1 = self.x.min(other.x);
        let y1 = self.y.min(other.y);
        let x2 = self.right().max(other.right());
        let y2 = self.bottom().max(other.bottom());
        Rect { x: x1, y: y1, width: x2 - x1, height: y2 - y1 }
    }

    /// Contract inward by `edges`, clamping size at zero.
    pub fn shrink(self, edges: Edges) -> Rect {
        Rect {
            x: self.x + edges.left,
            y: self.y + edges.top,
            width: (self.width - edges.horizontal()).max(0),
            height: (self.height - edges.vertical()).max(0),
        }
    }

    /// Horizontal distance from `x` to this rect (0 when inside the span).
    pub fn horizontal_distance(self, x: i32) -> i32 {
        if x < self.x {
            self.x - x
        } else if x >= self.right() {
            x - self.right() + 1
        } else {
            0
        }
    }

    /// Vertical distance from `y` to this rect (0 when inside the band).
    pub fn vertical_distance(self, y: i32) -> i32 {
        if y < self.y {
            self.y - y
        } else if y >= self.bottom() {
            y - self.bottom() + 1
        } else {
            0
        }
    }
}

// ---------------------------------------------------------------------------
// Edges
// ---------------------------------------------------------------------------

/// Four-sided pixel spacing (margin, padding, border widths).
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Edges {
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
    pub left: i32,
}

impl Edges {
    /// No spacing.
    pub const ZERO: Edges = Edges { top: 0, right: 0, bottom: 0, left: 0 };

    #[inline]
    pub const fn new(top: i32, right: i32, bottom: i32, left: i32) -> Self {
        Self { top, right, bottom, left }
    }

    /// Same value on all four sides.
    #[inline]
    pub const fn all(v: i32) -> Self {
        Self { top: v, right: v, bottom: v, left: v }
    }

    /// Vertical and horizontal values, CSS shorthand order.
    #[inline]
    pub const fn symmetric(vertical: i32, horizontal: i32) -> Self {
        Self { top: vertical, right: horizontal, bottom: vertical, left: horizontal }
    }

    /// `left + right`.
    #[inline]
    pub const fn horizontal(self) -> i32 {
        self.left + self.right
    }

    /// `top + bottom`.
    #[inline]
    pub const fn vertical(self) -> i32 {
        self.top + self.bottom
    }

    /// Top-left offset as a point.
    #[inline]
    pub const fn top_left(self) -> Point {
        Point { x: self.left, y: self.top }
    }
}

impl Add for Edges {
    type Output = Edges;
    #[inline]
    fn add(self, rhs: Edges) -> Edges {
        Edges {
            top: self.top + rhs.top,
            right: self.right + rhs.right,
            bottom: self.bottom + rhs.bottom,
            left: self.left + rhs.left,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rect_edges() {
        let r = Rect::new(10, 20, 30, 40);
        assert_eq!(r.right(), 40);
        assert_eq!(r.bottom(), 60);
        assert_eq!(r.origin(), Point::new(10, 20));
        assert_eq!(r.size(), Size::new(30, 40));
    }

    #[test]
    fn rect_contains_is_half_open() {
        let r = Rect::new(5, 5, 10, 10);
        assert!(r.contains(Point::new(5, 5)));
        assert!(r.contains(Point::new(14, 14)));
        assert!(!r.contains(Point::new(15, 14)));
        assert!(!r.contains(Point::new(4, 5)));
    }

    #[test]
    fn zero_size_rect_contains_nothing() {
        assert!(!Rect::new(3, 3, 0, 0).contains(Point::new(3, 3)));
    }

    #[test]
    fn union_with_empty_returns_other() {
        let r = Rect::new(4, 4, 2, 2);
        assert_eq!(Rect::EMPTY.union(r), r);
    }

    #[test]
    fn union_spans_both() {
        let a = Rect::new(0, 0, 10, 10);
        let b = Rect::new(5, 20, 10, 5);
        assert_eq!(a.union(b), Rect::new(0, 0, 15, 25));
    }

    #[test]
    fn shrink_clamps_to_zero() {
        let r = Rect::new(0, 0, 4, 4).shrink(Edges::all(3));
        assert_eq!(r, Rect::new(3, 3, 0, 0));
    }

    #[test]
    fn horizontal_distance() {
        let r = Rect::new(10, 0, 10, 10);
        assert_eq!(r.horizontal_distance(5), 5);
        assert_eq!(r.horizontal_distance(12), 0);
        assert_eq!(r.horizontal_distance(25), 6);
    }

    #[test]
    fn vertical_distance() {
        let r = Rect::new(0, 20, 10, 20);
        assert_eq!(r.vertical_distance(0), 20);
        assert_eq!(r.vertical_distance(39), 0);
        assert_eq!(r.vertical_distance(40), 1);
    }

    #[test]
    fn edges_sums() {
        let e = Edges::new(1, 2, 3, 4);
        assert_eq!(e.horizontal(), 6);
        assert_eq!(e.vertical(), 4);
        assert_eq!(e.top_left(), Point::new(4, 1));
        assert_eq!(e + Edges::all(1), Edges::new(2, 3, 4, 5));
    }

    #[test]
    fn symmetric_edges() {
        assert_eq!(Edges::symmetric(1, 2), Edges::new(1, 2, 1, 2));
    }

    #[test]
    fn size_clamp() {
        assert_eq!(Size::new(-3, 4).clamp_non_negative(), Size::new(0, 4));
    }

    #[test]
    fn overlap_is_strict() {
        let a = Rect::new(0, 0, 10, 10);
        assert!(a.overlaps(Rect::new(9, 9, 5, 5)));
        assert!(!a.overlaps(Rect::new(10, 0, 5, 5)));
        assert!(!a.overlaps(Rect::new(3, 3, 0, 0)));
    }
}
