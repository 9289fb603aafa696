//! Segment model: typed content nodes in a slotmap-backed tree.

pub mod error;
pub mod node;
pub mod path;
pub mod props;
pub mod serial;
pub mod span;
pub mod tree;

pub use error::SegmentError;
pub use node::{ComponentContent, ImageContent, Segment, SegmentContent, SegmentId, SegmentKind, TextContent};
pub use path::SegmentPath;
pub use props::{Border, Color, Dimension, Display, FontDescriptor, InteractionProps, LayoutProps, TextStyle};
pub use serial::{CodecError, ContentRecord, SegmentRecord};
pub use span::RichTextSpan;
pub use tree::SegmentTree;
