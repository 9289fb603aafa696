//! Nested-record form of a segment tree, for persistence and for mirroring a
//! tree across a process boundary.
//!
//! The arena form is not serialized directly: ids are local to one tree. A
//! [`SegmentRecord`] nests children inline, preserving kind, every property,
//! text, spans and child order.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::error::SegmentError;
use super::node::{ComponentContent, ImageContent, Segment, SegmentContent, SegmentId, TextContent};
use super::props::{InteractionProps, LayoutProps, TextStyle};
use super::span::RichTextSpan;
use super::tree::SegmentTree;

/// Errors from the JSON codec.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("malformed segment document: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid segment document: {0}")]
    Segment(#[from] SegmentError),
}

/// A segment with its subtree, as a plain nested value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentRecord {
    #[serde(flatten)]
    pub content: ContentRecord,
    #[serde(default)]
    pub layout: LayoutProps,
    #[serde(default)]
    pub interaction: InteractionProps,
    #[serde(default)]
    pub style: TextStyle,
}

/// Kind-tagged payload of a [`SegmentRecord`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ContentRecord {
    Text {
        text: String,
        #[serde(default)]
        spans: Vec<RichTextSpan>,
    },
    Container {
        #[serde(default)]
        children: Vec<SegmentRecord>,
    },
    Image(ImageContent),
    Spacer,
    Component(ComponentContent),
}

impl SegmentRecord {
    /// A text record with default properties.
    pub fn text(text: impl Into<String>) -> Self {
        Self::with_content(ContentRecord::Text { text: text.into(), spans: Vec::new() })
    }

    /// A container record with default properties.
    pub fn container(children: Vec<SegmentRecord>) -> Self {
        Self::with_content(ContentRecord::Container { children })
    }

    fn with_content(content: ContentRecord) -> Self {
        Self {
            content,
            layout: LayoutProps::default(),
            interaction: InteractionProps::default(),
            style: TextStyle::default(),
        }
    }

    /// Split into a detached segment and its child records.
    fn into_segment(self) -> Result<(Segment, Vec<SegmentRecord>), SegmentError> {
        let (content, children) = match self.content {
            ContentRecord::Text { text, spans } => {
                let mut content = TextContent::new(&text);
                content.spans = spans;
                (SegmentContent::Text(content), Vec::new())
            }
            ContentRecord::Container { children } => (SegmentContent::Container, children),
            ContentRecord::Image(image) => (SegmentContent::Image(image), Vec::new()),
            ContentRecord::Spacer => (SegmentContent::Spacer, Vec::new()),
            ContentRecord::Component(component) => (SegmentContent::Component(component), Vec::new()),
        };
        let segment = Segment::from_parts(content, self.layout, self.interaction, self.style)?;
        Ok((segment, children))
    }

    /// Encode as JSON.
    pub fn to_json(&self) -> Result<String, CodecError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Decode from JSON. Spans are validated when the record is turned into
    /// segments, not here.
    pub fn from_json(json: &str) -> Result<Self, CodecError> {
        Ok(serde_json::from_str(json)?)
    }
}

impl SegmentTree {
    /// Build a tree from a record whose root must be a container.
    pub fn from_record(record: SegmentRecord) -> Result<SegmentTree, SegmentError> {
        let (root, children) = record.into_segment()?;
        let mut tree = SegmentTree::with_root(root)?;
        let root_id = tree.root();
        for child in children {
            tree.append_record(root_id, child)?;
        }
        debug!(segments = tree.len(), "segment tree decoded");
        Ok(tree)
    }

    /// Append a record and its subtree under `parent`, returning the new id.
    pub fn append_record(&mut self, parent: SegmentId, record: SegmentRecord) -> Result<SegmentId, SegmentError> {
        let index = self.children(parent).len();
        self.insert_record(parent, index, record)
    }

    /// Insert a record and its subtree at `index` under `parent`.
    pub fn insert_record(
        &mut self,
        parent: SegmentId,
        index: usize,
        record: SegmentRecord,
    ) -> Result<SegmentId, SegmentError> {
        let (segment, children) = record.into_segment()?;
        let id = self.insert_child(parent, index, segment)?;
        for child in children {
            self.append_record(id, child)?;
        }
        Ok(id)
    }

    /// Snapshot a subtree as a record.
    pub fn to_record(&self, id: SegmentId) -> Result<SegmentRecord, SegmentError> {
        let seg = self.segment(id)?;
        let content = match seg.content() {
            SegmentContent::Text(text) => ContentRecord::Text {
                text: text.text(),
                spans: text.spans().to_vec(),
            },
            SegmentContent::Container => ContentRecord::Container {
                children: self
                    .children(id)
                    .iter()
                    .map(|&c| self.to_record(c))
                    .collect::<Result<_, _>>()?,
            },
            SegmentContent::Image(image) => ContentRecord::Image(image.clone()),
            SegmentContent::Spacer => ContentRecord::Spacer,
            SegmentContent::Component(component) => ContentRecord::Component(component.clone()),
        };
        Ok(SegmentRecord {
            content,
            layout: seg.layout().clone(),
            interaction: *seg.interaction(),
            style: seg.style().clone(),
        })
    }

    /// Encode the whole tree as JSON.
    pub fn to_json(&self) -> Result<String, CodecError> {
        self.to_record(self.root())?.to_json()
    }

    /// Decode a whole tree from JSON.
    pub fn from_json(json: &str) -> Result<SegmentTree, CodecError> {
        Ok(SegmentTree::from_record(SegmentRecord::from_json(json)?)?)
    }
}
