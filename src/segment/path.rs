//! Segment paths: child-index sequences from the root.

use std::fmt;

use serde::{Deserialize, Serialize};

/// An ordered list of child indices from the root to a segment.
///
/// The derived ordering is document (pre-order) order: sequences compare
/// lexicographically, and a proper prefix (an ancestor) sorts before every
/// path it prefixes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SegmentPath(Vec<usize>);

impl SegmentPath {
    /// The path of the root segment.
    pub fn root() -> Self {
        Self(Vec::new())
    }

    pub fn new(indices: Vec<usize>) -> Self {
        Self(indices)
    }

    pub fn indices(&self) -> &[usize] {
        &self.0
    }

    /// Number of steps from the root.
    pub fn depth(&self) -> usize {
        self.0.len()
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// The path of the `index`-th child of this segment.
    pub fn child(&self, index: usize) -> SegmentPath {
        let mut indices = self.0.clone();
        indices.push(index);
        SegmentPath(indices)
    }

    /// The parent path, or `None` for the root.
    pub fn parent(&self) -> Option<SegmentPath> {
        if self.0.is_empty() {
            None
        } else {
            Some(SegmentPath(self.0[..self.0.len() - 1].to_vec()))
        }
    }

    /// Whether `self` is a proper ancestor of `other`.
    pub fn is_ancestor_of(&self, other: &SegmentPath) -> bool {
        self.0.len() < other.0.len() && other.0.starts_with(&self.0)
    }
}

impl From<Vec<usize>> for SegmentPath {
    fn from(indices: Vec<usize>) -> Self {
        Self(indices)
    }
}

impl fmt::Display for SegmentPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("/")?;
        for (i, index) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("/")?;
            }
            write!(f, "{index}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(v: &[usize]) -> SegmentPath {
        SegmentPath::new(v.to_vec())
    }

    #[test]
    fn prefix_sorts_first() {
        assert!(p(&[0]) < p(&[0, 1]));
        assert!(SegmentPath::root() < p(&[0]));
    }

    #[test]
    fn lexicographic_order() {
        assert!(p(&[0, 5]) < p(&[1]));
        assert!(p(&[1, 0]) < p(&[1, 1]));
        assert!(p(&[2]) > p(&[1, 9, 9]));
    }

    #[test]
    fn ancestry() {
        assert!(p(&[1]).is_ancestor_of(&p(&[1, 2])));
        assert!(SegmentPath::root().is_ancestor_of(&p(&[0])));
        assert!(!p(&[1]).is_ancestor_of(&p(&[1])));
        assert!(!p(&[1]).is_ancestor_of(&p(&[2, 0])));
    }

    #[test]
    fn child_and_parent() {
        let c = p(&[3]).child(1);
        assert_eq!(c, p(&[3, 1]));
        assert_eq!(c.parent(), Some(p(&[3])));
        assert_eq!(SegmentPath::root().parent(), None);
    }

    #[test]
    fn display_format() {
        assert_eq!(SegmentPath::root().to_string(), "/");
        assert_eq!(p(&[0, 2, 1]).to_string(), "/0/2/1");
    }
}
