//! Layout, interaction and text-style properties carried by every segment.

use serde::{Deserialize, Serialize};

use crate::geometry::Edges;
use crate::layout::grid::{GridItemProperties, GridLayoutProperties};

// ---------------------------------------------------------------------------
// Display / Dimension
// ---------------------------------------------------------------------------

/// How a segment participates in flow layout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Display {
    /// Occupies a full line; stacks vertically.
    #[default]
    Block,
    /// Flows on the current line, wrapping when it would overflow.
    Inline,
    /// Flows like `Inline` but is sized like a block.
    InlineBlock,
    /// Removed from layout and from the global offset space.
    None,
    /// Takes up space like `Block` but is not painted.
    Hidden,
}

impl Display {
    /// Whether the segment takes part in the inline line-box path.
    pub fn is_inline(self) -> bool {
        matches!(self, Display::Inline | Display::InlineBlock)
    }
}

/// A width or height specification.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    /// Absolute pixels.
    Pixels(f64),
    /// Percentage of the parent's available space.
    Percent(f64),
    /// Content-based or, for block widths, the full available width.
    #[default]
    Auto,
}

impl Dimension {
    pub fn is_auto(self) -> bool {
        matches!(self, Dimension::Auto)
    }
}

// ---------------------------------------------------------------------------
// Color / Border
// ---------------------------------------------------------------------------

/// An RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);

    /// Opaque color from red, green and blue channels.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }
}

/// A uniform border drawn around a segment's padding box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Border {
    pub width: i32,
    pub color: Color,
}

// ---------------------------------------------------------------------------
// LayoutProps
// ---------------------------------------------------------------------------

/// Box-model properties consumed by the layout engines.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutProps {
    pub display: Display,
    pub width: Dimension,
    pub height: Dimension,
    pub margin: Edges,
    pub padding: Edges,
    pub background: Option<Color>,
    pub border: Option<Border>,
    /// Width divided by height, applied when exactly one dimension is known.
    pub aspect_ratio: Option<f64>,
    pub z_index: i32,
    /// Present on containers that arrange their children in grid tracks.
    pub grid: Option<GridLayoutProperties>,
    /// Placement overrides used when the parent is a grid container.
    pub grid_item: Option<GridItemProperties>,
}

impl LayoutProps {
    /// Border widths as edges (zero when there is no border).
    pub fn border_edges(&self) -> Edges {
        self.border.map(|b| Edges::all(b.width.max(0))).unwrap_or(Edges::ZERO)
    }

    /// Padding plus border: the inset from border box to content box.
    pub fn inset(&self) -> Edges {
        self.padding + self.border_edges()
    }
}

// ---------------------------------------------------------------------------
// InteractionProps
// ---------------------------------------------------------------------------

/// Editing and input capabilities of a segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct InteractionProps {
    pub editable: bool,
    pub selectable: bool,
    pub focusable: bool,
    /// Pointer hit-testing passes through this segment.
    pub mouse_transparent: bool,
    /// Keyboard focus traversal skips this segment.
    pub keyboard_transparent: bool,
}

impl Default for InteractionProps {
    fn default() -> Self {
        Self {
            editable: true,
            selectable: true,
            focusable: true,
            mouse_transparent: false,
            keyboard_transparent: false,
        }
    }
}

// ---------------------------------------------------------------------------
// Fonts and text style
// ---------------------------------------------------------------------------

/// A fully resolved font, handed to the text measurer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FontDescriptor {
    pub family: String,
    /// Pixel size.
    pub size: u32,
    pub bold: bool,
    pub italic: bool,
}

impl FontDescriptor {
    pub fn new(family: impl Into<String>, size: u32) -> Self {
        Self { family: family.into(), size, bold: false, italic: false }
    }
}

impl Default for FontDescriptor {
    fn default() -> Self {
        Self::new("sans-serif", 16)
    }
}

/// Text styling. Every field is optional so the same type serves both as a
/// segment's own style and as a span override layered on top of it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct TextStyle {
    pub family: Option<String>,
    pub size: Option<u32>,
    pub bold: Option<bool>,
    pub italic: Option<bool>,
    pub color: Option<Color>,
}

impl TextStyle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the font family (builder).
    pub fn with_family(mut self, family: impl Into<String>) -> Self {
        self.family = Some(family.into());
        self
    }

    /// Set the pixel size (builder).
    pub fn with_size(mut self, size: u32) -> Self {
        self.size = Some(size);
        self
    }

    /// Set bold (builder).
    pub fn with_bold(mut self, bold: bool) -> Self {
        self.bold = Some(bold);
        self
    }

    /// Set italic (builder).
    pub fn with_italic(mut self, italic: bool) -> Self {
        self.italic = Some(italic);
        self
    }

    /// Set the text color (builder).
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    /// Layer `over` on top of `self`; fields set in `over` win.
    pub fn merged(&self, over: &TextStyle) -> TextStyle {
        TextStyle {
            family: over.family.clone().or_else(|| self.family.clone()),
            size: over.size.or(self.size),
            bold: over.bold.or(self.bold),
            italic: over.italic.or(self.italic),
            color: over.color.or(self.color),
        }
    }

    /// Resolve to a concrete font, filling unset fields from `fallback`.
    pub fn font(&self, fallback: &FontDescriptor) -> FontDescriptor {
        FontDescriptor {
            family: self.family.clone().unwrap_or_else(|| fallback.family.clone()),
            size: self.size.unwrap_or(fallback.size),
            bold: self.bold.unwrap_or(fallback.bold),
            italic: self.italic.unwrap_or(fallback.italic),
        }
    }
}
