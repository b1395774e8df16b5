//! Geometry primitives for viewport intersection
//!
//! Rectangles are in document coordinates (CSS pixels, y grows downward).
//! The viewport is the rectangle `(0, scroll_offset, width, height)`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Axis-aligned rectangle in CSS pixels
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    /// Create a new rectangle
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Right edge
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Bottom edge
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Area, zero for degenerate rectangles
    pub fn area(&self) -> f32 {
        self.width.max(0.0) * self.height.max(0.0)
    }

    /// Intersection of two rectangles
    ///
    /// Edge-adjacent rectangles intersect with zero area, matching how the
    /// browser treats a zero-height element sitting on the viewport edge.
    pub fn intersect(&self, other: &Rect) -> Option<Rect> {
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        if right < x || bottom < y {
            return None;
        }
        Some(Rect::new(x, y, right - x, bottom - y))
    }
}

/// Size of the viewport in CSS pixels
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Fraction of `target` visible inside `root`, in `[0, 1]`
///
/// Returns `None` when the rectangles do not touch at all. A zero-area
/// target that touches the root counts as fully visible.
pub fn intersection_ratio(target: &Rect, root: &Rect) -> Option<f32> {
    let overlap = target.intersect(root)?;
    let area = target.area();
    if area <= 0.0 {
        return Some(1.0);
    }
    Some((overlap.area() / area).clamp(0.0, 1.0))
}

/// Error parsing a root margin string
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MarginParseError {
    /// Wrong number of components (expected 1 to 4)
    #[error("root margin must have 1 to 4 components, got {0}")]
    Arity(usize),

    /// A component was not a pixel length
    #[error("invalid root margin component '{0}' (expected a px length)")]
    Component(String),
}

/// Margin applied to the viewport before intersection checks
///
/// Uses the CSS shorthand order (top, right, bottom, left). Positive values
/// grow the viewport, negative values shrink it. The default pulls the
/// bottom edge up by 50px.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RootMargin {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

impl Default for RootMargin {
    fn default() -> Self {
        Self {
            top: 0.0,
            right: 0.0,
            bottom: -50.0,
            left: 0.0,
        }
    }
}

impl RootMargin {
    /// Margin of zero on every side
    pub const ZERO: RootMargin = RootMargin {
        top: 0.0,
        right: 0.0,
        bottom: 0.0,
        left: 0.0,
    };

    /// Apply the margin to a viewport rectangle
    pub fn apply(&self, viewport: &Rect) -> Rect {
        Rect::new(
            viewport.x - self.left,
            viewport.y - self.top,
            viewport.width + self.left + self.right,
            viewport.height + self.top + self.bottom,
        )
    }

    /// CSS shorthand form, as accepted by `IntersectionObserver`
    pub fn to_css(&self) -> String {
        format!(
            "{}px {}px {}px {}px",
            self.top, self.right, self.bottom, self.left
        )
    }
}

fn parse_px(component: &str) -> Result<f32, MarginParseError> {
    let number = component.strip_suffix("px").unwrap_or(component);
    // Unitless values are only valid for zero in CSS.
    if number.len() == component.len() && component.parse::<f32>().ok() != Some(0.0) {
        return Err(MarginParseError::Component(component.to_string()));
    }
    number
        .parse::<f32>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| MarginParseError::Component(component.to_string()))
}

impl FromStr for RootMargin {
    type Err = MarginParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let values = s
            .split_whitespace()
            .map(parse_px)
            .collect::<Result<Vec<_>, _>>()?;
        let (top, right, bottom, left) = match values.as_slice() {
            [all] => (*all, *all, *all, *all),
            [vertical, horizontal] => (*vertical, *horizontal, *vertical, *horizontal),
            [top, horizontal, bottom] => (*top, *horizontal, *bottom, *horizontal),
            [top, right, bottom, left] => (*top, *right, *bottom, *left),
            other => return Err(MarginParseError::Arity(other.len())),
        };
        Ok(Self {
            top,
            right,
            bottom,
            left,
        })
    }
}

impl TryFrom<String> for RootMargin {
    type Error = MarginParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<RootMargin> for String {
    fn from(margin: RootMargin) -> Self {
        margin.to_css()
    }
}

impl fmt::Display for RootMargin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_css())
    }
}

/// Scroll position and extents used by the ambient scroll handlers
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ScrollMetrics {
    /// Current vertical scroll offset
    pub offset: f32,
    /// Full scrollable height of the document
    pub document_height: f32,
    /// Height of the viewport
    pub viewport_height: f32,
}

impl ScrollMetrics {
    /// Scroll progress in `[0, 1]`
    ///
    /// A document that cannot scroll reports zero.
    pub fn progress(&self) -> f32 {
        let scrollable = self.document_height - self.viewport_height;
        if scrollable <= 0.0 || !scrollable.is_finite() {
            return 0.0;
        }
        (self.offset / scrollable).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intersection_ratio_partial() {
        let viewport = Rect::new(0.0, 0.0, 100.0, 100.0);
        let target = Rect::new(0.0, 80.0, 100.0, 100.0);
        let ratio = intersection_ratio(&target, &viewport).unwrap();
        assert!((ratio - 0.2).abs() < 1e-6);
    }

    #[test]
    fn test_intersection_ratio_disjoint() {
        let viewport = Rect::new(0.0, 0.0, 100.0, 100.0);
        let target = Rect::new(0.0, 150.0, 100.0, 10.0);
        assert_eq!(intersection_ratio(&target, &viewport), None);
    }

    #[test]
    fn test_zero_area_target_touching_counts_as_visible() {
        let viewport = Rect::new(0.0, 0.0, 100.0, 100.0);
        let divider = Rect::new(0.0, 50.0, 100.0, 0.0);
        assert_eq!(intersection_ratio(&divider, &viewport), Some(1.0));
    }

    #[test]
    fn test_default_margin_shrinks_bottom() {
        let viewport = Rect::new(0.0, 0.0, 1280.0, 800.0);
        let root = RootMargin::default().apply(&viewport);
        assert_eq!(root, Rect::new(0.0, 0.0, 1280.0, 750.0));
    }

    #[test]
    fn test_parse_margin_shorthands() {
        assert_eq!(
            "0px 0px -50px 0px".parse::<RootMargin>().unwrap(),
            RootMargin::default()
        );
        let uniform: RootMargin = "10px".parse().unwrap();
        assert_eq!(uniform.left, 10.0);
        assert_eq!(uniform.bottom, 10.0);
        let pair: RootMargin = "5px 0".parse().unwrap();
        assert_eq!((pair.top, pair.right, pair.bottom, pair.left), (5.0, 0.0, 5.0, 0.0));
    }

    #[test]
    fn test_parse_margin_rejects_percent_and_arity() {
        assert!(matches!(
            "10%".parse::<RootMargin>(),
            Err(MarginParseError::Component(_))
        ));
        assert!(matches!(
            "12".parse::<RootMargin>(),
            Err(MarginParseError::Component(_))
        ));
        assert_eq!(
            "1px 2px 3px 4px 5px".parse::<RootMargin>(),
            Err(MarginParseError::Arity(5))
        );
        assert_eq!("".parse::<RootMargin>(), Err(MarginParseError::Arity(0)));
    }

    #[test]
    fn test_margin_css_round_trips_through_display() {
        let margin = RootMargin::default();
        assert_eq!(margin.to_string(), "0px 0px -50px 0px");
    }

    #[test]
    fn test_progress_clamps_and_handles_short_documents() {
        let metrics = ScrollMetrics {
            offset: 600.0,
            document_height: 2000.0,
            viewport_height: 800.0,
        };
        assert!((metrics.progress() - 0.5).abs() < 1e-6);

        let short = ScrollMetrics {
            offset: 0.0,
            document_height: 500.0,
            viewport_height: 800.0,
        };
        assert_eq!(short.progress(), 0.0);

        let overscrolled = ScrollMetrics {
            offset: 1500.0,
            ..metrics
        };
        assert_eq!(overscrolled.progress(), 1.0);
    }
}
