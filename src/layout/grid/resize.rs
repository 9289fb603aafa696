//! Interactive track resizing: boundary hit-testing and drag application.

use serde::{Deserialize, Serialize};

use crate::geometry::Point;

use super::engine::GridGeometry;
use super::props::GridLayoutProperties;
use super::track::{TrackSize, TrackUnit};

/// Which set of tracks a handle belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TrackAxis {
    Row,
    Column,
}

/// The trailing boundary of one track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResizeHandle {
    pub axis: TrackAxis,
    pub track: usize,
}

/// Errors from [`apply_track_resize`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResizeError {
    #[error("{0:?} tracks are not resizable")]
    NotResizable(TrackAxis),
}

impl GridGeometry {
    /// Start of a track relative to the container's border box.
    pub fn track_start(&self, axis: TrackAxis, track: usize) -> Option<i32> {
        match axis {
            TrackAxis::Column => self.column_starts.get(track).map(|s| s + self.origin.x),
            TrackAxis::Row => self.row_starts.get(track).map(|s| s + self.origin.y),
        }
    }

    /// Find a resizable track boundary within `threshold` pixels of
    /// `point` (relative to the container's border box). Column handles are
    /// checked before row handles.
    pub fn handle_at(&self, point: Point, props: &GridLayoutProperties, threshold: i32) -> Option<ResizeHandle> {
        let extent = self.extent();
        let inside_rows = point.y >= self.origin.y && point.y < self.origin.y + extent.height;
        let inside_columns = point.x >= self.origin.x && point.x < self.origin.x + extent.width;

        if props.resizable_columns && inside_rows {
            let found = boundary_near(
                &self.column_starts,
                &self.column_sizes,
                self.column_gap,
                point.x - self.origin.x,
                threshold,
            );
            if let Some(track) = found {
                return Some(ResizeHandle { axis: TrackAxis::Column, track });
            }
        }
        if props.resizable_rows && inside_columns {
            let found = boundary_near(&self.row_starts, &self.row_sizes, self.row_gap, point.y - self.origin.y, threshold);
            if let Some(track) = found {
                return Some(ResizeHandle { axis: TrackAxis::Row, track });
            }
        }
        None
    }

    /// Size a track would take if its trailing boundary were dragged to
    /// `point`, before the minimum is applied.
    pub fn dragged_size(&self, handle: ResizeHandle, point: Point) -> Option<i32> {
        let start = self.track_start(handle.axis, handle.track)?;
        Some(match handle.axis {
            TrackAxis::Column => point.x - start,
            TrackAxis::Row => point.y - start,
        })
    }
}

/// The closest track whose trailing boundary (gap midpoint) lies within
/// `threshold` of `pos`.
fn boundary_near(starts: &[i32], sizes: &[i32], gap: i32, pos: i32, threshold: i32) -> Option<usize> {
    starts
        .iter()
        .zip(sizes)
        .enumerate()
        .map(|(i, (start, size))| (i, (start + size + gap / 2 - pos).abs()))
        .filter(|&(_, distance)| distance <= threshold)
        .min_by_key(|&(_, distance)| distance)
        .map(|(i, _)| i)
}

/// Set a track to a fixed pixel size of at least `min_size`, keeping its
/// min/max clamps. Implicit tracks before `handle.track` are made explicit
/// as `auto`. Returns the new definition.
pub fn apply_track_resize(
    props: &mut GridLayoutProperties,
    handle: ResizeHandle,
    size: i32,
    min_size: i32,
) -> Result<TrackSize, ResizeError> {
    let (resizable, tracks) = match handle.axis {
        TrackAxis::Column => (props.resizable_columns, &mut props.columns),
        TrackAxis::Row => (props.resizable_rows, &mut props.rows),
    };
    if !resizable {
        return Err(ResizeError::NotResizable(handle.axis));
    }
    if tracks.len() <= handle.track {
        tracks.resize(handle.track + 1, TrackSize::auto());
    }
    let old = tracks[handle.track];
    let updated = TrackSize { unit: TrackUnit::Px(size.max(min_size) as f64), ..old };
    tracks[handle.track] = updated;
    Ok(updated)
}
