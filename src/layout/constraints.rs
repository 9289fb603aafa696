//! Available-space constraints passed down the layout tree.

use serde::{Deserialize, Serialize};

/// Maximum width/height available to a segment. `None` means unbounded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Constraints {
    pub max_width: Option<i32>,
    pub max_height: Option<i32>,
}

impl Constraints {
    /// No limit on either axis.
    pub const UNBOUNDED: Constraints = Constraints { max_width: None, max_height: None };

    pub const fn new(max_width: Option<i32>, max_height: Option<i32>) -> Self {
        Self { max_width, max_height }
    }

    /// Bounded width, unbounded height: the usual document viewport.
    pub const fn width(max_width: i32) -> Self {
        Self { max_width: Some(max_width), max_height: None }
    }

    /// Both axes bounded.
    pub const fn fixed(max_width: i32, max_height: i32) -> Self {
        Self { max_width: Some(max_width), max_height: Some(max_height) }
    }

    /// Shrink both bounded axes by the given amounts, flooring at zero.
    pub fn shrink(self, horizontal: i32, vertical: i32) -> Self {
        Self {
            max_width: self.max_width.map(|w| (w - horizontal).max(0)),
            max_height: self.max_height.map(|h| (h - vertical).max(0)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shrink_floors_at_zero() {
        let c = Constraints::fixed(10, 5).shrink(4, 8);
        assert_eq!(c, Constraints::fixed(6, 0));
    }

    #[test]
    fn shrink_keeps_unbounded() {
        assert_eq!(Constraints::width(100).shrink(10, 10), Constraints::width(90));
        assert_eq!(Constraints::UNBOUNDED.shrink(1, 1), Constraints::UNBOUNDED);
    }
}
