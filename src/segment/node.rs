//! Segment types: SegmentId, SegmentKind, SegmentContent, Segment.

use std::fmt;

use serde::{Deserialize, Serialize};
use slotmap::new_key_type;

use super::error::SegmentError;
use super::props::{Dimension, Display, InteractionProps, LayoutProps, TextStyle};
use super::span::RichTextSpan;
use crate::geometry::{Edges, Size};
use crate::layout::grid::{GridItemProperties, GridLayoutProperties};

new_key_type! {
    /// Stable identifier for a segment in a [`SegmentTree`](super::SegmentTree).
    /// Survives sibling insertions and removals, unlike an index path.
    pub struct SegmentId;
}

/// The kind discriminant of a segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SegmentKind {
    Text,
    Container,
    Image,
    Spacer,
    Component,
}

impl fmt::Display for SegmentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SegmentKind::Text => "text",
            SegmentKind::Container => "container",
            SegmentKind::Image => "image",
            SegmentKind::Spacer => "spacer",
            SegmentKind::Component => "component",
        };
        f.write_str(name)
    }
}

// ---------------------------------------------------------------------------
// Content payloads
// ---------------------------------------------------------------------------

/// Text payload: code points plus styled spans.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextContent {
    pub(crate) chars: Vec<char>,
    pub(crate) spans: Vec<RichTextSpan>,
}

impl TextContent {
    pub fn new(text: &str) -> Self {
        Self { chars: text.chars().collect(), spans: Vec::new() }
    }

    /// Code points of the text.
    pub fn chars(&self) -> &[char] {
        &self.chars
    }

    pub fn spans(&self) -> &[RichTextSpan] {
        &self.spans
    }

    /// Code-point count.
    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    /// The text as an owned string.
    pub fn text(&self) -> String {
        self.chars.iter().collect()
    }

    /// Substring over a code-point range, clamped to the text.
    pub fn slice(&self, start: usize, end: usize) -> String {
        let end = end.min(self.chars.len());
        let start = start.min(end);
        self.chars[start..end].iter().collect()
    }

    pub(crate) fn validate_spans(spans: &[RichTextSpan], len: usize) -> Result<(), SegmentError> {
        match spans.iter().find(|s| !s.is_valid_for(len)) {
            Some(bad) => Err(SegmentError::InvalidSpan { start: bad.start, end: bad.end, len }),
            None => Ok(()),
        }
    }
}

/// Opaque image payload. Decoding happens outside the engine; when it has
/// succeeded the caller records the natural size here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImageContent {
    pub data: Vec<u8>,
    pub natural_size: Option<Size>,
}

impl ImageContent {
    pub fn new(data: Vec<u8>) -> Self {
        Self { data, natural_size: None }
    }

    /// Record the decoded size (builder).
    pub fn with_natural_size(mut self, size: Size) -> Self {
        self.natural_size = Some(size);
        self
    }
}

/// An embedded component, opaque to layout beyond its box.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentContent {
    pub name: String,
}

/// Kind-specific payload of a segment.
///
/// Container children live in the owning tree's arena, so the `Container`
/// variant carries no data here.
#[derive(Debug, Clone, PartialEq)]
pub enum SegmentContent {
    Text(TextContent),
    Container,
    Image(ImageContent),
    Spacer,
    Component(ComponentContent),
}

impl SegmentContent {
    pub fn kind(&self) -> SegmentKind {
        match self {
            SegmentContent::Text(_) => SegmentKind::Text,
            SegmentContent::Container => SegmentKind::Container,
            SegmentContent::Image(_) => SegmentKind::Image,
            SegmentContent::Spacer => SegmentKind::Spacer,
            SegmentContent::Component(_) => SegmentKind::Component,
        }
    }
}

// ---------------------------------------------------------------------------
// Segment
// ---------------------------------------------------------------------------

/// A node in the content tree.
///
/// Segments are built with the kind constructors and `with_*` builders, then
/// handed to a [`SegmentTree`](super::SegmentTree). Once inside a tree, all
/// mutation goes through the tree so dirty flags and versions stay correct.
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    pub(crate) content: SegmentContent,
    pub(crate) layout: LayoutProps,
    pub(crate) interaction: InteractionProps,
    pub(crate) style: TextStyle,
    pub(crate) dirty: bool,
}

impl Segment {
    fn with_content(content: SegmentContent) -> Self {
        Self {
            content,
            layout: LayoutProps::default(),
            interaction: InteractionProps::default(),
            style: TextStyle::default(),
            dirty: true,
        }
    }

    /// A text segment.
    pub fn text(text: &str) -> Self {
        Self::with_content(SegmentContent::Text(TextContent::new(text)))
    }

    /// An empty container.
    pub fn container() -> Self {
        Self::with_content(SegmentContent::Container)
    }

    /// An image with an opaque payload.
    pub fn image(content: ImageContent) -> Self {
        Self::with_content(SegmentContent::Image(content))
    }

    /// A spacer. Its size comes from its declared width and height.
    pub fn spacer(width: f64, height: f64) -> Self {
        let mut seg = Self::with_content(SegmentContent::Spacer);
        seg.layout.width = Dimension::Pixels(width);
        seg.layout.height = Dimension::Pixels(height);
        seg
    }

    /// An embedded component identified by name.
    pub fn component(name: impl Into<String>) -> Self {
        Self::with_content(SegmentContent::Component(ComponentContent { name: name.into() }))
    }

    /// Build a segment from raw parts, validating text spans.
    pub fn from_parts(
        content: SegmentContent,
        layout: LayoutProps,
        interaction: InteractionProps,
        style: TextStyle,
    ) -> Result<Self, SegmentError> {
        if let SegmentContent::Text(text) = &content {
            TextContent::validate_spans(&text.spans, text.len())?;
        }
        Ok(Self { content, layout, interaction, style, dirty: true })
    }

    // -- builders ------------------------------------------------------------

    /// Attach spans to a text segment (builder).
    pub fn with_spans(mut self, spans: Vec<RichTextSpan>) -> Result<Self, SegmentError> {
        match &mut self.content {
            SegmentContent::Text(text) => {
                TextContent::validate_spans(&spans, text.len())?;
                text.spans = spans;
                Ok(self)
            }
            other => Err(SegmentError::NotText { kind: other.kind() }),
        }
    }

    pub fn with_display(mut self, display: Display) -> Self {
        self.layout.display = display;
        self
    }

    pub fn with_width(mut self, width: Dimension) -> Self {
        self.layout.width = width;
        self
    }

    pub fn with_height(mut self, height: Dimension) -> Self {
        self.layout.height = height;
        self
    }

    pub fn with_margin(mut self, margin: Edges) -> Self {
        self.layout.margin = margin;
        self
    }

    pub fn with_padding(mut self, padding: Edges) -> Self {
        self.layout.padding = padding;
        self
    }

    pub fn with_aspect_ratio(mut self, ratio: f64) -> Self {
        self.layout.aspect_ratio = Some(ratio);
        self
    }

    pub fn with_z_index(mut self, z: i32) -> Self {
        self.layout.z_index = z;
        self
    }

    /// Turn this segment into a grid container (builder). Only meaningful on
    /// containers; other kinds ignore grid properties during layout.
    pub fn with_grid(mut self, grid: GridLayoutProperties) -> Self {
        self.layout.grid = Some(grid);
        self
    }

    pub fn with_grid_item(mut self, item: GridItemProperties) -> Self {
        self.layout.grid_item = Some(item);
        self
    }

    pub fn with_layout(mut self, layout: LayoutProps) -> Self {
        self.layout = layout;
        self
    }

    pub fn with_interaction(mut self, interaction: InteractionProps) -> Self {
        self.interaction = interaction;
        self
    }

    pub fn with_style(mut self, style: TextStyle) -> Self {
        self.style = style;
        self
    }

    // -- accessors -----------------------------------------------------------

    pub fn kind(&self) -> SegmentKind {
        self.content.kind()
    }

    pub fn content(&self) -> &SegmentContent {
        &self.content
    }

    pub fn layout(&self) -> &LayoutProps {
        &self.layout
    }

    pub fn interaction(&self) -> &InteractionProps {
        &self.interaction
    }

    pub fn style(&self) -> &TextStyle {
        &self.style
    }

    pub fn display(&self) -> Display {
        self.layout.display
    }

    /// Text payload, if this is a text segment.
    pub fn as_text(&self) -> Option<&TextContent> {
        match &self.content {
            SegmentContent::Text(t) => Some(t),
            _ => None,
        }
    }

    pub fn is_container(&self) -> bool {
        matches!(self.content, SegmentContent::Container)
    }

    pub fn is_text(&self) -> bool {
        matches!(self.content, SegmentContent::Text(_))
    }

    /// Whether geometry-affecting state changed since the flag was last cleared.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Length of this segment alone: code points for text, 1 for atomic
    /// kinds. Containers report 0 here; the tree sums their children.
    pub(crate) fn own_length(&self) -> usize {
        if self.layout.display == Display::None {
            return 0;
        }
        match &self.content {
            SegmentContent::Text(t) => t.len(),
            SegmentContent::Container => 0,
            SegmentContent::Image(_) | SegmentContent::Spacer | SegmentContent::Component(_) => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::segment::props::TextStyle;

    #[test]
    fn constructors_fix_kind() {
        assert_eq!(Segment::text("hi").kind(), SegmentKind::Text);
        assert_eq!(Segment::container().kind(), SegmentKind::Container);
        assert_eq!(Segment::image(ImageContent::new(vec![1])).kind(), SegmentKind::Image);
        assert_eq!(Segment::spacer(4.0, 4.0).kind(), SegmentKind::Spacer);
        assert_eq!(Segment::component("chart").kind(), SegmentKind::Component);
    }

    #[test]
    fn own_length_by_kind() {
        assert_eq!(Segment::text("héllo").own_length(), 5);
        assert_eq!(Segment::container().own_length(), 0);
        assert_eq!(Segment::spacer(1.0, 1.0).own_length(), 1);
        assert_eq!(Segment::component("x").own_length(), 1);
    }

    #[test]
    fn display_none_has_no_length() {
        let seg = Segment::text("abc").with_display(Display::None);
        assert_eq!(seg.own_length(), 0);
    }

    #[test]
    fn spans_on_non_text_fail() {
        let err = Segment::container()
            .with_spans(vec![RichTextSpan::new(0, 0, TextStyle::new())])
            .unwrap_err();
        assert_eq!(err, SegmentError::NotText { kind: SegmentKind::Container });
    }

    #[test]
    fn out_of_range_span_rejected() {
        let err = Segment::text("ab")
            .with_spans(vec![RichTextSpan::new(1, 3, TextStyle::new())])
            .unwrap_err();
        assert_eq!(err, SegmentError::InvalidSpan { start: 1, end: 3, len: 2 });
    }

    #[test]
    fn spacer_declares_size() {
        let seg = Segment::spacer(10.0, 20.0);
        assert_eq!(seg.layout().width, Dimension::Pixels(10.0));
        assert_eq!(seg.layout().height, Dimension::Pixels(20.0));
    }

    #[test]
    fn new_segments_start_dirty() {
        assert!(Segment::text("x").is_dirty());
    }

    #[test]
    fn text_slice_clamps() {
        let t = TextContent::new("hello");
        assert_eq!(t.slice(1, 3), "el");
        assert_eq!(t.slice(3, 99), "lo");
        assert_eq!(t.slice(9, 99), "");
    }

    #[test]
    fn segment_id_is_copy() {
        fn assert_copy<T: Copy>() {}
        assert_copy::<SegmentId>();
    }
}
