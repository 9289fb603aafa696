//! Box dimension resolution: declared [`Dimension`]s to integer pixels.
//!
//! Percentages resolve against the parent's content box on the same axis
//! and truncate toward zero. A percentage against an unbounded axis behaves
//! like `auto`.

use crate::segment::{Dimension, LayoutProps};

use super::constraints::Constraints;

/// Resolve one dimension against a base length.
///
/// - `Pixels(v)` -> `v` truncated, floored at zero
/// - `Percent(p)` -> `base * p / 100`, or `None` when `base` is unbounded
/// - `Auto` -> `None`
pub fn resolve_dimension(dimension: Dimension, base: Option<i32>) -> Option<i32> {
    match dimension {
        Dimension::Pixels(v) => Some(v.max(0.0) as i32),
        Dimension::Percent(p) => base.map(|b| (b as f64 * p / 100.0).max(0.0) as i32),
        Dimension::Auto => None,
    }
}

/// Border-box size known before measuring content. `None` on an axis means
/// the size comes from content.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolvedSize {
    pub width: Option<i32>,
    pub height: Option<i32>,
}

/// Resolve declared width/height for a segment placed in `available`.
///
/// With `fill_width`, an `auto` width takes the available width minus
/// horizontal margins (block behavior). The aspect ratio then fills in
/// whichever single dimension is still unknown.
pub fn resolve_size(props: &LayoutProps, available: Constraints, fill_width: bool) -> ResolvedSize {
    let mut width = resolve_dimension(props.width, available.max_width);
    let height = resolve_dimension(props.height, available.max_height);
    if width.is_none() && fill_width {
        width = available.max_width.map(|w| (w - props.margin.horizontal()).max(0));
    }
    apply_aspect_ratio(ResolvedSize { width, height }, props.aspect_ratio)
}

/// Fill the missing dimension from `ratio = width / height` when exactly one
/// dimension is known. Non-positive or non-finite ratios are ignored.
pub fn apply_aspect_ratio(size: ResolvedSize, ratio: Option<f64>) -> ResolvedSize {
    let Some(ratio) = ratio.filter(|r| r.is_finite() && *r > 0.0) else {
        return size;
    };
    match (size.width, size.height) {
        (Some(w), None) => ResolvedSize { width: Some(w), height: Some((w as f64 / ratio) as i32) },
        (None, Some(h)) => ResolvedSize { width: Some((h as f64 * ratio) as i32), height: Some(h) },
        _ => size,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Edges;

    #[test]
    fn pixels_truncate() {
        assert_eq!(resolve_dimension(Dimension::Pixels(12.9), None), Some(12));
        assert_eq!(resolve_dimension(Dimension::Pixels(-3.0), None), Some(0));
    }

    #[test]
    fn percent_needs_bounded_base() {
        assert_eq!(resolve_dimension(Dimension::Percent(50.0), Some(201)), Some(100));
        assert_eq!(resolve_dimension(Dimension::Percent(50.0), None), None);
    }

    #[test]
    fn auto_is_unresolved() {
        assert_eq!(resolve_dimension(Dimension::Auto, Some(100)), None);
    }

    #[test]
    fn fill_width_subtracts_margins() {
        let props = LayoutProps { margin: Edges::symmetric(0, 10), ..LayoutProps::default() };
        let size = resolve_size(&props, Constraints::width(200), true);
        assert_eq!(size, ResolvedSize { width: Some(180), height: None });
    }

    #[test]
    fn inline_auto_width_stays_unresolved() {
        let size = resolve_size(&LayoutProps::default(), Constraints::width(200), false);
        assert_eq!(size.width, None);
    }

    #[test]
    fn aspect_ratio_from_width() {
        let props = LayoutProps {
            width: Dimension::Pixels(160.0),
            aspect_ratio: Some(2.0),
            ..LayoutProps::default()
        };
        let size = resolve_size(&props, Constraints::UNBOUNDED, false);
        assert_eq!(size, ResolvedSize { width: Some(160), height: Some(80) });
    }

    #[test]
    fn aspect_ratio_from_height() {
        let size = apply_aspect_ratio(ResolvedSize { width: None, height: Some(30) }, Some(1.5));
        assert_eq!(size.width, Some(45));
    }

    #[test]
    fn aspect_ratio_ignored_when_both_known_or_invalid() {
        let both = ResolvedSize { width: Some(10), height: Some(10) };
        assert_eq!(apply_aspect_ratio(both, Some(3.0)), both);
        let one = ResolvedSize { width: Some(10), height: None };
        assert_eq!(apply_aspect_ratio(one, Some(0.0)), one);
    }
}
