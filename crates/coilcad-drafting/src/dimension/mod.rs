//! Dimension annotations.
//!
//! A dimension sits on one side of its view's bounding box. Tier 0 is the
//! line nearest the geometry; every further tier moves out by
//! [`TIER_STEP`]. Generators put local spans on low tiers and aggregate spans
//! on high tiers so stacked lines never cross.

mod views;

pub use views::{
    generate_front_dimensions, generate_header_dimensions, generate_return_dimensions,
    generate_top_dimensions,
};

use nalgebra::Translation2;
use serde::{Deserialize, Serialize};

use crate::types::{BoundingBox2D, Point2D, TextAlign, TextLabel};

/// Distance from the bounding edge to the tier-0 dimension line (mm).
pub const STANDOFF: f64 = 12.0;
/// Extra offset per tier (mm).
pub const TIER_STEP: f64 = 13.0;
/// Arrowhead length (mm).
pub const ARROW_LENGTH: f64 = 3.0;
/// Arrowhead half-angle (degrees).
pub const ARROW_HALF_ANGLE: f64 = 25.0;
/// Dimension text height (mm).
pub const TEXT_HEIGHT: f64 = 3.0;
/// Gap between the dimension line and its text (mm).
pub const TEXT_GAP: f64 = 1.5;
/// Gap between the bounding edge and the start of an extension line (mm).
pub const EXTENSION_GAP: f64 = 2.0;
/// Extension line overshoot past the dimension line (mm).
pub const EXTENSION_OVERSHOOT: f64 = 3.0;

/// Which side of the view a dimension sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    /// Below the view, measuring along X.
    Bottom,
    /// Above the view, measuring along X.
    Top,
    /// Left of the view, measuring along Y.
    Left,
    /// Right of the view, measuring along Y.
    Right,
}

impl Side {
    /// Whether dimensions on this side measure along X.
    pub fn is_horizontal(self) -> bool {
        matches!(self, Side::Bottom | Side::Top)
    }

    fn outward(self) -> f64 {
        match self {
            Side::Bottom | Side::Left => -1.0,
            Side::Top | Side::Right => 1.0,
        }
    }

    fn edge(self, bounds: &BoundingBox2D) -> f64 {
        match self {
            Side::Bottom => bounds.min_y,
            Side::Top => bounds.max_y,
            Side::Left => bounds.min_x,
            Side::Right => bounds.max_x,
        }
    }
}

/// A straight segment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    /// First endpoint.
    pub start: Point2D,
    /// Second endpoint.
    pub end: Point2D,
}

impl Segment {
    /// Create a segment.
    pub fn new(start: Point2D, end: Point2D) -> Self {
        Self { start, end }
    }

    fn translated(&self, t: &Translation2<f64>) -> Self {
        Self::new(self.start.translated(t), self.end.translated(t))
    }
}

/// An open arrowhead drawn as two wing strokes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Arrowhead {
    /// Point of the arrow.
    pub tip: Point2D,
    /// Direction the arrow points, in degrees.
    pub angle: f64,
}

impl Arrowhead {
    /// The two wing strokes, each running from the tip backwards.
    pub fn wings(&self) -> [Segment; 2] {
        let half = ARROW_HALF_ANGLE.to_radians();
        let a = self.angle.to_radians();
        [a + half, a - half].map(|w| {
            let back = Point2D::new(
                self.tip.x - ARROW_LENGTH * w.cos(),
                self.tip.y - ARROW_LENGTH * w.sin(),
            );
            Segment::new(self.tip, back)
        })
    }
}

/// Render a measured value: integers without decimals, otherwise one decimal.
pub fn format_value(value: f64) -> String {
    if (value - value.round()).abs() < 1e-6 {
        format!("{:.0}", value.round())
    } else {
        format!("{value:.1}")
    }
}

/// One linear dimension: two extension lines, a dimension line with an
/// arrowhead at each end and the measured value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DimensionAnnotation {
    /// Side of the view it sits on.
    pub side: Side,
    /// Stacking tier, 0 nearest the geometry.
    pub tier: u32,
    /// Measured span (mm). The label is always formatted from this.
    pub value: f64,
    /// Feature to dimension line, one per end.
    pub extension_lines: [Segment; 2],
    /// The dimension line itself.
    pub dimension_line: Segment,
    /// Arrowheads at the two ends of the dimension line, pointing outward.
    pub arrows: [Arrowhead; 2],
    /// Value text.
    pub label: TextLabel,
}

impl DimensionAnnotation {
    /// Dimension the span `from..to` (X for top/bottom, Y for left/right)
    /// on `side` of `bounds`.
    pub fn new(bounds: &BoundingBox2D, side: Side, tier: u32, from: f64, to: f64) -> Self {
        let (lo, hi) = if from <= to { (from, to) } else { (to, from) };
        let value = hi - lo;
        let sign = side.outward();
        let edge = side.edge(bounds);
        let line_at = edge + sign * (STANDOFF + f64::from(tier) * TIER_STEP);
        let ext_start = edge + sign * EXTENSION_GAP;
        let ext_end = line_at + sign * EXTENSION_OVERSHOOT;
        let mid = (lo + hi) / 2.0;
        let text = format_value(value);

        if side.is_horizontal() {
            Self {
                side,
                tier,
                value,
                extension_lines: [lo, hi].map(|x| {
                    Segment::new(Point2D::new(x, ext_start), Point2D::new(x, ext_end))
                }),
                dimension_line: Segment::new(Point2D::new(lo, line_at), Point2D::new(hi, line_at)),
                arrows: [
                    Arrowhead {
                        tip: Point2D::new(lo, line_at),
                        angle: 180.0,
                    },
                    Arrowhead {
                        tip: Point2D::new(hi, line_at),
                        angle: 0.0,
                    },
                ],
                label: TextLabel::new(Point2D::new(mid, line_at + TEXT_GAP), text, TEXT_HEIGHT)
                    .aligned(TextAlign::Center),
            }
        } else {
            Self {
                side,
                tier,
                value,
                extension_lines: [lo, hi].map(|y| {
                    Segment::new(Point2D::new(ext_start, y), Point2D::new(ext_end, y))
                }),
                dimension_line: Segment::new(Point2D::new(line_at, lo), Point2D::new(line_at, hi)),
                arrows: [
                    Arrowhead {
                        tip: Point2D::new(line_at, lo),
                        angle: 270.0,
                    },
                    Arrowhead {
                        tip: Point2D::new(line_at, hi),
                        angle: 90.0,
                    },
                ],
                label: TextLabel::new(Point2D::new(line_at - TEXT_GAP, mid), text, TEXT_HEIGHT)
                    .aligned(TextAlign::Center)
                    .rotated(90.0),
            }
        }
    }

    /// Append a qualifier such as `(FL)` to the value text.
    pub fn with_suffix(mut self, suffix: &str) -> Self {
        self.label.text = format!("{} {}", format_value(self.value), suffix);
        self
    }

    /// Extent of every stroke and the estimated text.
    pub fn bounds(&self) -> BoundingBox2D {
        let mut bb = BoundingBox2D::empty();
        for seg in self.extension_lines.iter().chain([&self.dimension_line]) {
            bb.include_point(seg.start);
            bb.include_point(seg.end);
        }
        bb.include_box(&self.label.bounds());
        bb
    }

    /// This annotation moved by `t`.
    pub fn translated(&self, t: &Translation2<f64>) -> Self {
        Self {
            side: self.side,
            tier: self.tier,
            value: self.value,
            extension_lines: self.extension_lines.map(|s| s.translated(t)),
            dimension_line: self.dimension_line.translated(t),
            arrows: self.arrows.map(|a| Arrowhead {
                tip: a.tip.translated(t),
                angle: a.angle,
            }),
            label: TextLabel {
                anchor: self.label.anchor.translated(t),
                ..self.label.clone()
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn unit_box() -> BoundingBox2D {
        BoundingBox2D::from_rect(Point2D::ORIGIN, 100.0, 50.0)
    }

    #[test]
    fn test_format_value() {
        assert_eq!(format_value(1330.0), "1330");
        assert_eq!(format_value(38.235294), "38.2");
        assert_eq!(format_value(207.6), "207.6");
        assert_eq!(format_value(34.6), "34.6");
    }

    #[test]
    fn test_bottom_dimension_geometry() {
        let dim = DimensionAnnotation::new(&unit_box(), Side::Bottom, 1, 80.0, 20.0);
        assert_eq!(dim.value, 60.0);
        assert_eq!(dim.label.text, "60");

        let y = -(STANDOFF + TIER_STEP);
        assert_eq!(dim.dimension_line.start, Point2D::new(20.0, y));
        assert_eq!(dim.dimension_line.end, Point2D::new(80.0, y));

        // Extension lines start clear of the outline and pass the line.
        for ext in &dim.extension_lines {
            assert_eq!(ext.start.y, -EXTENSION_GAP);
            assert_eq!(ext.end.y, y - EXTENSION_OVERSHOOT);
        }
        assert!(dim.bounds().max_y < 0.0);
    }

    #[test]
    fn test_right_dimension_is_vertical() {
        let dim = DimensionAnnotation::new(&unit_box(), Side::Right, 0, 0.0, 50.0)
            .with_suffix("(FH)");
        assert_eq!(dim.dimension_line.start.x, 100.0 + STANDOFF);
        assert_eq!(dim.label.text, "50 (FH)");
        assert_eq!(dim.label.rotation, 90.0);
        assert!(dim.bounds().min_x > 100.0);
    }

    #[test]
    fn test_arrows_point_outward() {
        let dim = DimensionAnnotation::new(&unit_box(), Side::Top, 0, 10.0, 90.0);
        let [left, right] = dim.arrows;
        // Wings trail back into the span.
        for wing in left.wings() {
            assert!(wing.end.x > left.tip.x);
            assert_relative_eq!(wing.start.distance(&wing.end), ARROW_LENGTH, epsilon = 1e-12);
        }
        for wing in right.wings() {
            assert!(wing.end.x < right.tip.x);
        }
        let [a, b] = left.wings();
        assert_relative_eq!(a.end.y - left.tip.y, -(b.end.y - left.tip.y), epsilon = 1e-12);
    }
}
