//! Layout: flow and grid engines, dimension resolution, hit testing.

pub mod constraints;
pub mod engine;
pub mod grid;
pub mod resolve;
pub mod result;
pub mod spatial;

pub use constraints::Constraints;
pub use engine::LayoutEngine;
pub use grid::{GridGeometry, GridItemProperties, GridLayoutEngine, GridLayoutProperties};
pub use result::{LayoutOutput, LayoutResult};
pub use spatial::SpatialMap;
