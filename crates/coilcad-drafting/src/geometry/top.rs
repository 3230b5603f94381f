use coilcad_params::{CoilParameters, ConnectionSide};

use super::LABEL_HEIGHT;
use crate::types::{Layer, Point2D, Primitive, TextAlign, TextLabel, View, ViewKind};

/// Gap between a pipe tip and its IN/OUT label.
const PIPE_LABEL_GAP: f64 = 15.0;

/// Key coordinates of the top view, shared with its dimensions.
#[derive(Debug, Clone, PartialEq)]
pub struct TopLayout {
    /// Casing width (view X extent of the casing).
    pub casing_width: f64,
    /// Top of the header zone / bottom of the coil zone.
    pub coil_start: f64,
    /// Top of the coil zone / bottom of the return zone.
    pub coil_end: f64,
    /// Total depth (header + coil + return).
    pub total_depth: f64,
    /// The IN and OUT pipes.
    pub pipes: [ConnectionPipe; 2],
}

/// One connection pipe in the top view.
#[derive(Debug, Clone, PartialEq)]
pub struct ConnectionPipe {
    /// `IN` or `OUT`.
    pub label: &'static str,
    /// Pipe centre line Y.
    pub y: f64,
    /// X of the free end outside the casing.
    pub tip_x: f64,
    /// X where the pipe enters the header block.
    pub inner_x: f64,
}

impl TopLayout {
    /// Coordinates for the given parameters.
    pub fn new(params: &CoilParameters) -> Self {
        let cw = params.casing_width();
        let coil_start = params.header_depth();
        let coil_end = coil_start + params.coil_depth();
        let centre_y = coil_start + params.coil_depth() / 2.0;
        let half_gap = params.connection_vertical_gap() / 2.0;

        // Computed for RHS, then reflected so LHS is an exact mirror image.
        let tip_x = cw + params.connection_extension();
        let inner_x = cw - params.header_block_length();
        let mirror = |x: f64| match params.connection_side() {
            ConnectionSide::Rhs => x,
            ConnectionSide::Lhs => Point2D::new(x, 0.0).mirror_x(cw / 2.0).x,
        };

        let pipe = |label, y| ConnectionPipe {
            label,
            y,
            tip_x: mirror(tip_x),
            inner_x: mirror(inner_x),
        };

        Self {
            casing_width: cw,
            coil_start,
            coil_end,
            total_depth: coil_end + params.return_depth(),
            pipes: [pipe("IN", centre_y - half_gap), pipe("OUT", centre_y + half_gap)],
        }
    }
}

/// Pipe features for RHS, in draw order.
fn rhs_pipe_primitives(params: &CoilParameters, y: f64, label: &str) -> Vec<Primitive> {
    let cw = params.casing_width();
    let r = params.tube_radius();
    let tip = cw + params.connection_extension();
    let inner = cw - params.header_block_length();
    let stub_centre = tip - params.pipe_stub_center_offset();
    let half_stub = params.pipe_stub_spacing() / 2.0;

    let mut out = vec![
        Primitive::line(Layer::Pipe, Point2D::new(inner, y), Point2D::new(tip, y)),
        Primitive::circle(
            Layer::Pipe,
            Point2D::new(tip - params.pipe_fitting_outer_offset(), y),
            r,
        ),
        Primitive::circle(
            Layer::Pipe,
            Point2D::new(inner + params.pipe_fitting_inner_offset(), y),
            r,
        ),
    ];
    for x in [stub_centre - half_stub, stub_centre + half_stub] {
        out.push(Primitive::line(
            Layer::Pipe,
            Point2D::new(x, y - r),
            Point2D::new(x, y + r),
        ));
    }
    out.push(Primitive::text(
        Layer::Label,
        TextLabel::new(
            Point2D::new(tip + PIPE_LABEL_GAP, y - LABEL_HEIGHT / 2.0),
            label,
            LABEL_HEIGHT,
        ),
    ));
    out
}

fn mirror_primitive(p: &Primitive, axis_x: f64) -> Primitive {
    use crate::types::Shape;

    let shape = match &p.shape {
        Shape::Line { start, end } => Shape::Line {
            start: start.mirror_x(axis_x),
            end: end.mirror_x(axis_x),
        },
        Shape::Circle { center, radius } => Shape::Circle {
            center: center.mirror_x(axis_x),
            radius: *radius,
        },
        Shape::Rect {
            origin,
            width,
            height,
        } => Shape::Rect {
            origin: Point2D::new(2.0 * axis_x - origin.x - width, origin.y),
            width: *width,
            height: *height,
        },
        Shape::Arc {
            center,
            radius,
            start_angle,
            end_angle,
        } => Shape::Arc {
            center: center.mirror_x(axis_x),
            radius: *radius,
            start_angle: 180.0 - end_angle,
            end_angle: 180.0 - start_angle,
        },
        Shape::Text(label) => {
            let align = match label.align {
                TextAlign::Left => TextAlign::Right,
                TextAlign::Center => TextAlign::Center,
                TextAlign::Right => TextAlign::Left,
            };
            Shape::Text(TextLabel {
                anchor: label.anchor.mirror_x(axis_x),
                align,
                ..label.clone()
            })
        }
    };
    Primitive {
        layer: p.layer,
        shape,
    }
}

/// Plan view: casing, zone dividers, tube rows, return bends and the
/// connection pipes on the configured side.
pub fn generate_top_geometry(params: &CoilParameters) -> View {
    let mut view = View::new(ViewKind::Top);
    let layout = TopLayout::new(params);

    let cw = layout.casing_width;
    let cl = params.casing_left();
    let fl = params.fin_length();
    let cd = params.coil_depth();
    let rp = params.row_pitch();
    let r = params.tube_radius();

    view.push(Primitive::rect(Layer::Casing, 0.0, 0.0, cw, layout.total_depth));
    view.push(Primitive::rect(Layer::Coil, cl, layout.coil_start, fl, cd));

    for y in [layout.coil_start, layout.coil_end] {
        view.push(Primitive::line(
            Layer::Casing,
            Point2D::new(0.0, y),
            Point2D::new(cw, y),
        ));
    }

    let row_y = |row: u32| layout.coil_start + rp / 2.0 + f64::from(row) * rp;
    for row in 0..params.no_of_rows() {
        let yc = row_y(row);
        for y in [yc - r, yc + r] {
            view.push(Primitive::line(
                Layer::Tube,
                Point2D::new(cl, y),
                Point2D::new(cl + fl, y),
            ));
        }
    }

    // Return bends join rows (0,1), (2,3), ... at the fin-pack end.
    let bend_x = cl + fl;
    for row in (0..params.no_of_rows().saturating_sub(1)).step_by(2) {
        let mid = (row_y(row) + row_y(row + 1)) / 2.0;
        view.push(Primitive::arc(
            Layer::Bend,
            Point2D::new(bend_x, mid),
            rp / 2.0,
            -90.0,
            90.0,
        ));
    }

    let axis = cw / 2.0;
    for pipe in &layout.pipes {
        for p in rhs_pipe_primitives(params, pipe.y, pipe.label) {
            match params.connection_side() {
                ConnectionSide::Rhs => view.push(p),
                ConnectionSide::Lhs => view.push(mirror_primitive(&p, axis)),
            }
        }
    }

    view
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Shape;
    use coilcad_params::RawParameters;

    fn params(side: &str) -> CoilParameters {
        let mut raw = RawParameters::default();
        raw.connection_side = side.to_string();
        raw.validate().unwrap()
    }

    #[test]
    fn test_extent_stacks_three_zones() {
        let p = params("LHS");
        let view = generate_top_geometry(&p);
        let casing = view.on_layer(Layer::Casing).next().unwrap();
        assert_eq!(
            casing.bounds().height(),
            p.header_depth() + p.coil_depth() + p.return_depth()
        );
        assert_eq!(casing.bounds().width(), p.casing_width());
        // Two dividers plus the outline.
        assert_eq!(view.on_layer(Layer::Casing).count(), 3);
    }

    #[test]
    fn test_tube_rows_and_bends() {
        let p = params("RHS");
        let view = generate_top_geometry(&p);
        assert_eq!(view.on_layer(Layer::Tube).count(), 12);
        assert_eq!(view.on_layer(Layer::Bend).count(), 3);

        let mut odd = RawParameters::default();
        odd.no_of_rows = 5;
        let view = generate_top_geometry(&odd.validate().unwrap());
        assert_eq!(view.on_layer(Layer::Bend).count(), 2);
    }

    #[test]
    fn test_lhs_pipes_mirror_rhs_exactly() {
        let lhs = generate_top_geometry(&params("LHS"));
        let rhs = generate_top_geometry(&params("RHS"));
        let axis = params("RHS").casing_width() / 2.0;

        let pipes = |v: &View| -> Vec<Primitive> { v.on_layer(Layer::Pipe).cloned().collect() };
        let lhs_pipes = pipes(&lhs);
        let rhs_pipes = pipes(&rhs);
        assert_eq!(lhs_pipes.len(), 10);
        assert_eq!(lhs_pipes.len(), rhs_pipes.len());
        for (l, r) in lhs_pipes.iter().zip(&rhs_pipes) {
            assert_eq!(*l, mirror_primitive(r, axis));
        }

        // Everything that is not a pipe is unaffected by the side.
        let rest = |v: &View| -> Vec<Primitive> {
            v.primitives
                .iter()
                .filter(|p| p.layer != Layer::Pipe && !p.is_text())
                .cloned()
                .collect()
        };
        assert_eq!(rest(&lhs), rest(&rhs));
    }

    #[test]
    fn test_lhs_pipes_extend_left_of_casing() {
        let p = params("LHS");
        let view = generate_top_geometry(&p);
        assert_eq!(view.bounds.min_x, -p.connection_extension());

        let layout = TopLayout::new(&p);
        assert_eq!(layout.pipes[0].tip_x, -p.connection_extension());
        assert_eq!(layout.pipes[0].inner_x, p.header_block_length());
        assert_eq!(layout.pipes[1].y - layout.pipes[0].y, p.connection_vertical_gap());
    }

    #[test]
    fn test_pipe_labels_face_outward() {
        let view = generate_top_geometry(&params("LHS"));
        let labels: Vec<&TextLabel> = view
            .on_layer(Layer::Label)
            .filter_map(|p| match &p.shape {
                Shape::Text(t) => Some(t),
                _ => None,
            })
            .collect();
        assert_eq!(labels.len(), 2);
        assert!(labels.iter().all(|t| t.align == TextAlign::Right));
        assert_eq!(labels[0].text, "IN");
        assert_eq!(labels[1].text, "OUT");
    }
}
