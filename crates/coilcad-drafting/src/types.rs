//! Core types for 2D coil drawings.

use nalgebra::{Point2, Translation2};
use serde::{Deserialize, Serialize};

/// Approximate glyph advance as a fraction of text height, used to estimate
/// label extents for layout.
pub const CHAR_WIDTH_FACTOR: f64 = 0.6;

/// A point in millimetres, Y up.
///
/// Plain `x`/`y` fields keep the JSON sheet readable; convert to
/// `nalgebra::Point2` for transforms.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point2D {
    /// X coordinate.
    pub x: f64,
    /// Y coordinate.
    pub y: f64,
}

impl Point2D {
    /// Create a new 2D point.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Origin point (0, 0).
    pub const ORIGIN: Self = Self { x: 0.0, y: 0.0 };

    /// Distance to another point.
    pub fn distance(&self, other: &Self) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }

    /// Reflection across the vertical line `x = axis_x`.
    pub fn mirror_x(&self, axis_x: f64) -> Self {
        Self::new(2.0 * axis_x - self.x, self.y)
    }

    /// This point moved by `t`.
    pub fn translated(&self, t: &Translation2<f64>) -> Self {
        t.transform_point(&Point2::from(*self)).into()
    }
}

impl Default for Point2D {
    fn default() -> Self {
        Self::ORIGIN
    }
}

impl From<Point2<f64>> for Point2D {
    fn from(p: Point2<f64>) -> Self {
        Self { x: p.x, y: p.y }
    }
}

impl From<Point2D> for Point2<f64> {
    fn from(p: Point2D) -> Self {
        Point2::new(p.x, p.y)
    }
}

/// 2D axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox2D {
    /// Minimum X coordinate.
    pub min_x: f64,
    /// Minimum Y coordinate.
    pub min_y: f64,
    /// Maximum X coordinate.
    pub max_x: f64,
    /// Maximum Y coordinate.
    pub max_y: f64,
}

impl BoundingBox2D {
    /// Create an empty bounding box.
    pub fn empty() -> Self {
        Self {
            min_x: f64::INFINITY,
            min_y: f64::INFINITY,
            max_x: f64::NEG_INFINITY,
            max_y: f64::NEG_INFINITY,
        }
    }

    /// Box from an origin corner and a size.
    pub fn from_rect(origin: Point2D, width: f64, height: f64) -> Self {
        Self {
            min_x: origin.x,
            min_y: origin.y,
            max_x: origin.x + width,
            max_y: origin.y + height,
        }
    }

    /// Expand the bounding box to include a point.
    pub fn include_point(&mut self, p: Point2D) {
        self.min_x = self.min_x.min(p.x);
        self.min_y = self.min_y.min(p.y);
        self.max_x = self.max_x.max(p.x);
        self.max_y = self.max_y.max(p.y);
    }

    /// Expand the bounding box to include another box.
    pub fn include_box(&mut self, other: &BoundingBox2D) {
        if other.is_valid() {
            self.include_point(Point2D::new(other.min_x, other.min_y));
            self.include_point(Point2D::new(other.max_x, other.max_y));
        }
    }

    /// The box grown by `margin` on every side.
    pub fn expanded(&self, margin: f64) -> Self {
        Self {
            min_x: self.min_x - margin,
            min_y: self.min_y - margin,
            max_x: self.max_x + margin,
            max_y: self.max_y + margin,
        }
    }

    /// The box moved by `t`.
    pub fn translated(&self, t: &Translation2<f64>) -> Self {
        let min = self.min().translated(t);
        let max = self.max().translated(t);
        Self {
            min_x: min.x,
            min_y: min.y,
            max_x: max.x,
            max_y: max.y,
        }
    }

    /// Lower-left corner.
    pub fn min(&self) -> Point2D {
        Point2D::new(self.min_x, self.min_y)
    }

    /// Upper-right corner.
    pub fn max(&self) -> Point2D {
        Point2D::new(self.max_x, self.max_y)
    }

    /// Width of the bounding box.
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    /// Height of the bounding box.
    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    /// Center of the bounding box.
    pub fn center(&self) -> Point2D {
        Point2D::new(
            (self.min_x + self.max_x) / 2.0,
            (self.min_y + self.max_y) / 2.0,
        )
    }

    /// Check if the bounding box is valid (non-empty).
    pub fn is_valid(&self) -> bool {
        self.min_x <= self.max_x && self.min_y <= self.max_y
    }

    /// Whether the two boxes share interior area.
    pub fn overlaps(&self, other: &BoundingBox2D) -> bool {
        self.min_x < other.max_x
            && other.min_x < self.max_x
            && self.min_y < other.max_y
            && other.min_y < self.max_y
    }
}

impl Default for BoundingBox2D {
    fn default() -> Self {
        Self::empty()
    }
}

/// Styling and export group of a primitive. Has no effect on geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Layer {
    /// Casing and end-plate outlines.
    Casing,
    /// Fin pack and tube field outlines.
    Coil,
    /// Tube holes and tube lines.
    Tube,
    /// Return bends.
    Bend,
    /// Representative fin lines.
    Fin,
    /// Plate reference and sheet-thickness lines.
    Plate,
    /// Connection pipes, fittings and stubs.
    Pipe,
    /// View labels and captions.
    Label,
    /// Dimension annotations.
    Dimension,
    /// Notes block.
    Note,
    /// Title block.
    TitleBlock,
}

impl Layer {
    /// Every layer, in export order.
    pub const ALL: [Layer; 11] = [
        Layer::Casing,
        Layer::Coil,
        Layer::Tube,
        Layer::Bend,
        Layer::Fin,
        Layer::Plate,
        Layer::Pipe,
        Layer::Label,
        Layer::Dimension,
        Layer::Note,
        Layer::TitleBlock,
    ];

    /// Layer name used by exporters.
    pub fn name(self) -> &'static str {
        match self {
            Layer::Casing => "CASING",
            Layer::Coil => "COIL",
            Layer::Tube => "TUBES",
            Layer::Bend => "BENDS",
            Layer::Fin => "FINS",
            Layer::Plate => "PLATES",
            Layer::Pipe => "PIPES",
            Layer::Label => "LABELS",
            Layer::Dimension => "DIMS",
            Layer::Note => "NOTES",
            Layer::TitleBlock => "TITLEBLOCK",
        }
    }
}

/// Horizontal justification of a text label about its anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TextAlign {
    /// Anchor at the start of the text.
    #[default]
    Left,
    /// Anchor at the middle of the text.
    Center,
    /// Anchor at the end of the text.
    Right,
}

/// A single line of text. The anchor lies on the baseline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextLabel {
    /// Baseline anchor point.
    pub anchor: Point2D,
    /// Text content.
    pub text: String,
    /// Cap height (mm).
    pub height: f64,
    /// Justification about the anchor.
    pub align: TextAlign,
    /// Counter-clockwise rotation in degrees.
    pub rotation: f64,
}

impl TextLabel {
    /// Horizontal, left-aligned text.
    pub fn new(anchor: Point2D, text: impl Into<String>, height: f64) -> Self {
        Self {
            anchor,
            text: text.into(),
            height,
            align: TextAlign::Left,
            rotation: 0.0,
        }
    }

    /// Set the justification.
    pub fn aligned(mut self, align: TextAlign) -> Self {
        self.align = align;
        self
    }

    /// Set the rotation in degrees.
    pub fn rotated(mut self, degrees: f64) -> Self {
        self.rotation = degrees;
        self
    }

    /// Estimated advance width of the text.
    pub fn estimated_width(&self) -> f64 {
        self.text.chars().count() as f64 * self.height * CHAR_WIDTH_FACTOR
    }

    /// Estimated extent of the rendered text.
    ///
    /// Only axis-aligned rotations (0 and 90 degrees) are estimated exactly;
    /// anything else is treated as horizontal.
    pub fn bounds(&self) -> BoundingBox2D {
        let w = self.estimated_width();
        let (start, end) = match self.align {
            TextAlign::Left => (0.0, w),
            TextAlign::Center => (-w / 2.0, w / 2.0),
            TextAlign::Right => (-w, 0.0),
        };
        let a = self.anchor;
        if (self.rotation - 90.0).abs() < 1e-9 {
            BoundingBox2D {
                min_x: a.x - self.height,
                min_y: a.y + start,
                max_x: a.x,
                max_y: a.y + end,
            }
        } else {
            BoundingBox2D {
                min_x: a.x + start,
                min_y: a.y,
                max_x: a.x + end,
                max_y: a.y + self.height,
            }
        }
    }

    fn translated(&self, t: &Translation2<f64>) -> Self {
        Self {
            anchor: self.anchor.translated(t),
            ..self.clone()
        }
    }
}

/// The geometric part of a primitive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Shape {
    /// Axis-aligned rectangle.
    Rect {
        /// Lower-left corner.
        origin: Point2D,
        /// Extent along X.
        width: f64,
        /// Extent along Y.
        height: f64,
    },
    /// Full circle.
    Circle {
        /// Centre.
        center: Point2D,
        /// Radius.
        radius: f64,
    },
    /// Straight segment.
    Line {
        /// First endpoint.
        start: Point2D,
        /// Second endpoint.
        end: Point2D,
    },
    /// Counter-clockwise arc from `start_angle` to `end_angle` (degrees).
    Arc {
        /// Centre.
        center: Point2D,
        /// Radius.
        radius: f64,
        /// Start angle in degrees.
        start_angle: f64,
        /// End angle in degrees.
        end_angle: f64,
    },
    /// Text label.
    Text(TextLabel),
}

/// A tagged geometric shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Primitive {
    /// Export/styling group.
    pub layer: Layer,
    /// Geometry.
    pub shape: Shape,
}

impl Primitive {
    /// Rectangle primitive.
    pub fn rect(layer: Layer, x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            layer,
            shape: Shape::Rect {
                origin: Point2D::new(x, y),
                width,
                height,
            },
        }
    }

    /// Circle primitive.
    pub fn circle(layer: Layer, center: Point2D, radius: f64) -> Self {
        Self {
            layer,
            shape: Shape::Circle { center, radius },
        }
    }

    /// Line primitive.
    pub fn line(layer: Layer, start: Point2D, end: Point2D) -> Self {
        Self {
            layer,
            shape: Shape::Line { start, end },
        }
    }

    /// Arc primitive; angles in degrees, counter-clockwise.
    pub fn arc(layer: Layer, center: Point2D, radius: f64, start_angle: f64, end_angle: f64) -> Self {
        Self {
            layer,
            shape: Shape::Arc {
                center,
                radius,
                start_angle,
                end_angle,
            },
        }
    }

    /// Text primitive.
    pub fn text(layer: Layer, label: TextLabel) -> Self {
        Self {
            layer,
            shape: Shape::Text(label),
        }
    }

    /// Whether this primitive is a text label.
    pub fn is_text(&self) -> bool {
        matches!(self.shape, Shape::Text(_))
    }

    /// Extent of the primitive. Text extents are estimates.
    pub fn bounds(&self) -> BoundingBox2D {
        let mut bb = BoundingBox2D::empty();
        match &self.shape {
            Shape::Rect {
                origin,
                width,
                height,
            } => {
                bb = BoundingBox2D::from_rect(*origin, *width, *height);
            }
            Shape::Circle { center, radius } | Shape::Arc { center, radius, .. } => {
                // Arcs use the full circle; close enough for layout.
                bb.include_point(Point2D::new(center.x - radius, center.y - radius));
                bb.include_point(Point2D::new(center.x + radius, center.y + radius));
            }
            Shape::Line { start, end } => {
                bb.include_point(*start);
                bb.include_point(*end);
            }
            Shape::Text(label) => bb = label.bounds(),
        }
        bb
    }

    /// This primitive moved by `t`.
    pub fn translated(&self, t: &Translation2<f64>) -> Self {
        let shape = match &self.shape {
            Shape::Rect {
                origin,
                width,
                height,
            } => Shape::Rect {
                origin: origin.translated(t),
                width: *width,
                height: *height,
            },
            Shape::Circle { center, radius } => Shape::Circle {
                center: center.translated(t),
                radius: *radius,
            },
            Shape::Line { start, end } => Shape::Line {
                start: start.translated(t),
                end: end.translated(t),
            },
            Shape::Arc {
                center,
                radius,
                start_angle,
                end_angle,
            } => Shape::Arc {
                center: center.translated(t),
                radius: *radius,
                start_angle: *start_angle,
                end_angle: *end_angle,
            },
            Shape::Text(label) => Shape::Text(label.translated(t)),
        };
        Self {
            layer: self.layer,
            shape,
        }
    }
}

/// The four fixed views of a coil drawing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ViewKind {
    /// Looking at the fin face.
    Front,
    /// Plan view from above.
    Top,
    /// Header end plate.
    Header,
    /// Return end plate.
    Return,
}

impl ViewKind {
    /// Caption printed under the placed view.
    pub fn caption(self) -> &'static str {
        match self {
            ViewKind::Front => "FRONT VIEW",
            ViewKind::Top => "TOP VIEW",
            ViewKind::Header => "HEADER SIDE VIEW",
            ViewKind::Return => "RETURN END SIDE VIEW",
        }
    }
}

/// A named collection of primitives in its own local frame.
///
/// `bounds` covers the drawn geometry only; text labels are excluded so that
/// dimension placement measures from real edges.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct View {
    /// Which view this is.
    pub kind: ViewKind,
    /// Primitives in draw order.
    pub primitives: Vec<Primitive>,
    /// Bounding box of the non-text primitives.
    pub bounds: BoundingBox2D,
}

impl View {
    /// Create a new empty view.
    pub fn new(kind: ViewKind) -> Self {
        Self {
            kind,
            primitives: Vec::new(),
            bounds: BoundingBox2D::empty(),
        }
    }

    /// Add a primitive and update the bounding box.
    pub fn push(&mut self, primitive: Primitive) {
        if !primitive.is_text() {
            self.bounds.include_box(&primitive.bounds());
        }
        self.primitives.push(primitive);
    }

    /// Primitives on one layer.
    pub fn on_layer(&self, layer: Layer) -> impl Iterator<Item = &Primitive> {
        self.primitives.iter().filter(move |p| p.layer == layer)
    }

    /// Extent of everything in the view, text included.
    pub fn extent(&self) -> BoundingBox2D {
        let mut bb = self.bounds;
        for p in self.primitives.iter().filter(|p| p.is_text()) {
            bb.include_box(&p.bounds());
        }
        bb
    }
}
