//! Engine configuration: default font, placeholder sizes, grid resize tuning.

use serde::{Deserialize, Serialize};

use crate::geometry::Size;
use crate::segment::FontDescriptor;

/// Errors from loading a configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid engine config: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration shared by the layout engines and the document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Font used where a segment's style leaves fields unset.
    pub default_font: FontDescriptor,
    /// Size of an image whose payload has not been decoded (or failed to).
    pub image_placeholder_size: Size,
    /// Size of an embedded component without declared dimensions.
    pub component_size: Size,
    /// Distance in pixels within which a pointer grabs a grid track boundary.
    pub resize_handle_threshold: i32,
    /// Smallest size a dragged grid track may be resized to.
    pub min_track_size: i32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_font: FontDescriptor::default(),
            image_placeholder_size: Size::new(32, 32),
            component_size: Size::new(100, 24),
            resize_handle_threshold: 4,
            min_track_size: 20,
        }
    }
}

impl EngineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load from JSON; missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Set the default font (builder).
    pub fn with_default_font(mut self, font: FontDescriptor) -> Self {
        self.default_font = font;
        self
    }

    /// Set the image placeholder size (builder).
    pub fn with_image_placeholder_size(mut self, size: Size) -> Self {
        self.image_placeholder_size = size;
        self
    }

    /// Set the default component size (builder).
    pub fn with_component_size(mut self, size: Size) -> Self {
        self.component_size = size;
        self
    }

    /// Set the resize handle threshold (builder).
    pub fn with_resize_handle_threshold(mut self, px: i32) -> Self {
        self.resize_handle_threshold = px;
        self
    }

    /// Set the minimum dragged track size (builder).
    pub fn with_min_track_size(mut self, px: i32) -> Self {
        self.min_track_size = px;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let c = EngineConfig::default();
        assert_eq!(c.image_placeholder_size, Size::new(32, 32));
        assert_eq!(c.resize_handle_threshold, 4);
        assert_eq!(c.min_track_size, 20);
    }

    #[test]
    fn builders() {
        let c = EngineConfig::new()
            .with_min_track_size(5)
            .with_resize_handle_threshold(2)
            .with_component_size(Size::new(1, 2));
        assert_eq!(c.min_track_size, 5);
        assert_eq!(c.resize_handle_threshold, 2);
        assert_eq!(c.component_size, Size::new(1, 2));
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let c = EngineConfig::from_json(r#"{"min_track_size": 8}"#).unwrap();
        assert_eq!(c.min_track_size, 8);
        assert_eq!(c.resize_handle_threshold, 4);
    }

    #[test]
    fn invalid_json_errors() {
        assert!(EngineConfig::from_json("[1]").is_err());
    }
}
