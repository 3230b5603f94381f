//! SVG rendering of a drawing sheet, at 1 user unit per millimetre.
//!
//! Sheet coordinates are y-up; SVG is y-down, so every point goes through
//! `(x - min_x, max_y - y)`. Each layer becomes one `<g>` element carrying
//! its stroke colour, so layers can be toggled in any SVG viewer.

use std::collections::BTreeMap;
use std::fmt::Write;

use coilcad_drafting::{
    BoundingBox2D, DimensionAnnotation, DrawingSink, Layer, Point2D, Primitive, Shape, Sheet,
    TextAlign, TextLabel,
};

/// Stroke colour for a layer, matching the DXF colour table on a white page.
fn layer_stroke(layer: Layer) -> &'static str {
    match layer {
        Layer::Casing => "#c00000",
        Layer::Coil | Layer::Pipe | Layer::TitleBlock => "#000000",
        Layer::Tube => "#008000",
        Layer::Bend => "#a000a0",
        Layer::Fin => "#909090",
        Layer::Plate => "#0000c0",
        Layer::Label | Layer::Note => "#806000",
        Layer::Dimension => "#007080",
    }
}

fn stroke_width(layer: Layer) -> f64 {
    match layer {
        Layer::Casing | Layer::TitleBlock => 0.7,
        Layer::Fin | Layer::Dimension => 0.25,
        _ => 0.5,
    }
}

fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Collects a sheet into per-layer SVG groups.
#[derive(Debug, Default)]
pub struct SvgWriter {
    bounds: Option<BoundingBox2D>,
    layers: BTreeMap<Layer, String>,
    output: String,
}

impl SvgWriter {
    /// Empty writer.
    pub fn new() -> Self {
        Self::default()
    }

    /// The finished document. Empty until the sheet has been visited.
    pub fn finish(self) -> String {
        self.output
    }

    fn map(&self, p: Point2D) -> (f64, f64) {
        match &self.bounds {
            Some(b) => (p.x - b.min_x, b.max_y - p.y),
            None => (p.x, -p.y),
        }
    }

    fn buffer(&mut self, layer: Layer) -> &mut String {
        self.layers.entry(layer).or_default()
    }

    fn line(&mut self, layer: Layer, start: Point2D, end: Point2D) -> std::fmt::Result {
        let (x1, y1) = self.map(start);
        let (x2, y2) = self.map(end);
        writeln!(
            self.buffer(layer),
            r#"    <line x1="{x1:.3}" y1="{y1:.3}" x2="{x2:.3}" y2="{y2:.3}"/>"#
        )
    }

    fn text(&mut self, layer: Layer, label: &TextLabel) -> std::fmt::Result {
        let (x, y) = self.map(label.anchor);
        let anchor = match label.align {
            TextAlign::Left => "start",
            TextAlign::Center => "middle",
            TextAlign::Right => "end",
        };
        let mut attrs = format!(
            r#"x="{x:.3}" y="{y:.3}" font-size="{:.3}" text-anchor="{anchor}""#,
            label.height
        );
        if label.rotation != 0.0 {
            // Counter-clockwise in sheet space is negative once y is flipped.
            write!(
                attrs,
                r#" transform="rotate({:.3} {x:.3} {y:.3})""#,
                -label.rotation
            )?;
        }
        let text = escape_xml(&label.text);
        writeln!(self.buffer(layer), r#"    <text {attrs}>{text}</text>"#)
    }
}

impl DrawingSink for SvgWriter {
    type Error = std::fmt::Error;

    fn begin(&mut self, bounds: &BoundingBox2D) -> std::fmt::Result {
        self.bounds = Some(*bounds);
        self.layers.clear();
        self.output.clear();
        Ok(())
    }

    fn primitive(&mut self, primitive: &Primitive) -> std::fmt::Result {
        let layer = primitive.layer;
        match &primitive.shape {
            Shape::Rect {
                origin,
                width,
                height,
            } => {
                // Top-left corner after the flip.
                let (x, y) = self.map(Point2D::new(origin.x, origin.y + height));
                writeln!(
                    self.buffer(layer),
                    r#"    <rect x="{x:.3}" y="{y:.3}" width="{width:.3}" height="{height:.3}"/>"#
                )
            }
            Shape::Circle { center, radius } => {
                let (cx, cy) = self.map(*center);
                writeln!(
                    self.buffer(layer),
                    r#"    <circle cx="{cx:.3}" cy="{cy:.3}" r="{radius:.3}"/>"#
                )
            }
            Shape::Line { start, end } => self.line(layer, *start, *end),
            Shape::Arc {
                center,
                radius,
                start_angle,
                end_angle,
            } => {
                let point_at = |deg: f64| {
                    let rad = deg.to_radians();
                    Point2D::new(center.x + radius * rad.cos(), center.y + radius * rad.sin())
                };
                let (x1, y1) = self.map(point_at(*start_angle));
                let (x2, y2) = self.map(point_at(*end_angle));
                let span = (end_angle - start_angle).rem_euclid(360.0);
                let large = if span > 180.0 { 1 } else { 0 };
                // CCW in sheet space is sweep-flag 0 in the flipped frame.
                writeln!(
                    self.buffer(layer),
                    r#"    <path d="M {x1:.3} {y1:.3} A {radius:.3} {radius:.3} 0 {large} 0 {x2:.3} {y2:.3}"/>"#
                )
            }
            Shape::Text(label) => self.text(layer, label),
        }
    }

    fn dimension(&mut self, dim: &DimensionAnnotation) -> std::fmt::Result {
        let layer = Layer::Dimension;
        for ext in &dim.extension_lines {
            self.line(layer, ext.start, ext.end)?;
        }
        self.line(layer, dim.dimension_line.start, dim.dimension_line.end)?;
        for arrow in &dim.arrows {
            for wing in arrow.wings() {
                self.line(layer, wing.start, wing.end)?;
            }
        }
        self.text(layer, &dim.label)
    }

    fn end(&mut self) -> std::fmt::Result {
        let (w, h) = match &self.bounds {
            Some(b) => (b.width(), b.height()),
            None => (0.0, 0.0),
        };
        let mut svg = String::new();
        writeln!(
            svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w:.3}mm" height="{h:.3}mm" viewBox="0 0 {w:.3} {h:.3}">"#
        )?;
        writeln!(
            svg,
            r#"  <rect x="0" y="0" width="{w:.3}" height="{h:.3}" fill="white"/>"#
        )?;
        for (layer, body) in &self.layers {
            let stroke = layer_stroke(*layer);
            writeln!(
                svg,
                r#"  <g id="{}" stroke="{stroke}" stroke-width="{}" fill="none" font-family="sans-serif">"#,
                layer.name(),
                stroke_width(*layer)
            )?;
            svg.push_str(body);
            writeln!(svg, "  </g>")?;
        }
        writeln!(svg, "</svg>")?;
        self.output = svg;
        Ok(())
    }
}

/// Render a sheet as a standalone SVG document.
pub fn render_svg(sheet: &Sheet) -> Result<String, std::fmt::Error> {
    let mut writer = SvgWriter::new();
    sheet.visit(&mut writer)?;
    Ok(writer.finish())
}
