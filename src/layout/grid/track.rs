//! Grid track size definitions.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The sizing unit of one grid track.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TrackUnit {
    /// Fixed pixels.
    Px(f64),
    /// Percentage of the container's available space on this axis.
    Percent(f64),
    /// Proportional share of the space left after all other tracks.
    Fr(f64),
    /// Sized to the largest item in the track.
    Auto,
    /// Sized to the largest minimum-content contribution in the track.
    MinContent,
    /// Sized to the largest maximum-content contribution in the track.
    MaxContent,
}

/// A track definition: unit plus optional min/max clamps in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrackSize {
    pub unit: TrackUnit,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
}

impl TrackSize {
    pub fn new(unit: TrackUnit) -> Self {
        Self { unit, min: None, max: None }
    }

    pub fn px(v: f64) -> Self {
        Self::new(TrackUnit::Px(v))
    }

    pub fn percent(v: f64) -> Self {
        Self::new(TrackUnit::Percent(v))
    }

    pub fn fr(v: f64) -> Self {
        Self::new(TrackUnit::Fr(v))
    }

    pub fn auto() -> Self {
        Self::new(TrackUnit::Auto)
    }

    pub fn min_content() -> Self {
        Self::new(TrackUnit::MinContent)
    }

    pub fn max_content() -> Self {
        Self::new(TrackUnit::MaxContent)
    }

    /// Set the lower clamp (builder).
    pub fn with_min(mut self, min: f64) -> Self {
        self.min = Some(min);
        self
    }

    /// Set the upper clamp (builder).
    pub fn with_max(mut self, max: f64) -> Self {
        self.max = Some(max);
        self
    }

    pub fn is_fr(&self) -> bool {
        matches!(self.unit, TrackUnit::Fr(_))
    }

    /// Apply the min/max clamps. `min` wins when the two conflict.
    pub fn clamp(&self, size: f64) -> f64 {
        let mut size = size;
        if let Some(max) = self.max {
            size = size.min(max);
        }
        if let Some(min) = self.min {
            size = size.max(min);
        }
        size.max(0.0)
    }
}

impl Default for TrackSize {
    fn default() -> Self {
        Self::auto()
    }
}

fn fmt_number(f: &mut fmt::Formatter<'_>, v: f64, suffix: &str) -> fmt::Result {
    if v.fract() == 0.0 {
        write!(f, "{}{suffix}", v as i64)
    } else {
        write!(f, "{v}{suffix}")
    }
}

impl fmt::Display for TrackUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            TrackUnit::Px(v) => fmt_number(f, v, "px"),
            TrackUnit::Percent(v) => fmt_number(f, v, "%"),
            TrackUnit::Fr(v) => fmt_number(f, v, "fr"),
            TrackUnit::Auto => f.write_str("auto"),
            TrackUnit::MinContent => f.write_str("min-content"),
            TrackUnit::MaxContent => f.write_str("max-content"),
        }
    }
}

impl fmt::Display for TrackSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.min, self.max) {
            (None, None) => write!(f, "{}", self.unit),
            (Some(min), None) => {
                f.write_str("minmax(")?;
                fmt_number(f, min, "px")?;
                write!(f, ", {})", self.unit)
            }
            (min, Some(max)) => {
                write!(f, "{}[", self.unit)?;
                if let Some(min) = min {
                    fmt_number(f, min, "px")?;
                }
                f.write_str("..")?;
                fmt_number(f, max, "px")?;
                f.write_str("]")
            }
        }
    }
}
