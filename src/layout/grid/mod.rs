//! Grid layout: track definitions, templates, sizing, and resizing.

pub mod engine;
pub mod props;
pub mod resize;
pub mod template;
pub mod track;

pub use engine::{size_tracks, GridArrangement, GridCell, GridGeometry, GridLayoutEngine, TrackContribution};
pub use props::{AlignItems, GridDirection, GridItemProperties, GridLayoutProperties, GridOverflow, JustifyContent};
pub use resize::{apply_track_resize, ResizeError, ResizeHandle, TrackAxis};
pub use template::{parse_track_list, TemplateError, MAX_TRACKS};
pub use track::{TrackSize, TrackUnit};
