//! Invalid-operation errors raised by the segment model.

use super::node::{SegmentId, SegmentKind};
use super::path::SegmentPath;

/// An operation was applied to a segment that cannot support it.
///
/// These indicate a broken caller invariant. Navigation never produces them;
/// it clamps instead.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SegmentError {
    #[error("segment {0:?} is not in the tree")]
    UnknownSegment(SegmentId),
    #[error("{kind} segment cannot have children")]
    NotAContainer { kind: SegmentKind },
    #[error("{kind} segment has no text content")]
    NotText { kind: SegmentKind },
    #[error("{kind} segment has no image payload")]
    NotImage { kind: SegmentKind },
    #[error("child index {index} out of bounds for {len} children")]
    ChildIndexOutOfBounds { index: usize, len: usize },
    #[error("text range {start}..{end} out of bounds for length {len}")]
    TextRangeOutOfBounds { start: usize, end: usize, len: usize },
    #[error("span {start}..{end} invalid for text of length {len}")]
    InvalidSpan { start: usize, end: usize, len: usize },
    #[error("the root segment must be a container")]
    RootNotContainer,
    #[error("the root segment cannot be removed")]
    RootRemoval,
    #[error("segment at {path} is not editable")]
    NotEditable { path: SegmentPath },
}
