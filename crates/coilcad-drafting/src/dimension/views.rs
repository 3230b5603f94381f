//! Per-view dimension generators.

use coilcad_params::{CoilParameters, ConnectionSide};

use super::{format_value, DimensionAnnotation, Side};
use crate::geometry::{TopLayout, TubeField};
use crate::types::{View, ViewKind};

/// `(n x VP)` qualifier for a pitch span.
fn pitch_suffix(params: &CoilParameters) -> String {
    format!(
        "({} x {})",
        params.tubes_per_row() - 1,
        format_value(params.vertical_pitch())
    )
}

/// Front view: casing margins, FL and casing width below; casing margins,
/// FH and casing height on the right; plate offsets and pitch span on the
/// left.
pub fn generate_front_dimensions(params: &CoilParameters, view: &View) -> Vec<DimensionAnnotation> {
    debug_assert_eq!(view.kind, ViewKind::Front);
    let b = &view.bounds;

    let cl = params.casing_left();
    let cb = params.casing_bottom();
    let fin_right = cl + params.fin_length();
    let fin_top = cb + params.fin_height();
    let bottom_line = cb + params.bottom_plate();
    let top_line = fin_top - params.top_plate();

    vec![
        DimensionAnnotation::new(b, Side::Bottom, 0, 0.0, cl),
        DimensionAnnotation::new(b, Side::Bottom, 0, fin_right, params.casing_width()),
        DimensionAnnotation::new(b, Side::Bottom, 1, cl, fin_right).with_suffix("(FL)"),
        DimensionAnnotation::new(b, Side::Bottom, 2, 0.0, params.casing_width()),
        DimensionAnnotation::new(b, Side::Right, 0, 0.0, cb),
        DimensionAnnotation::new(b, Side::Right, 0, fin_top, params.casing_height()),
        DimensionAnnotation::new(b, Side::Right, 1, cb, fin_top).with_suffix("(FH)"),
        DimensionAnnotation::new(b, Side::Right, 2, 0.0, params.casing_height()),
        DimensionAnnotation::new(b, Side::Left, 0, cb, bottom_line),
        DimensionAnnotation::new(b, Side::Left, 0, top_line, fin_top),
        DimensionAnnotation::new(b, Side::Left, 1, bottom_line, top_line)
            .with_suffix(&pitch_suffix(params)),
    ]
}

fn plate_dimensions(params: &CoilParameters, view: &View, depth: f64) -> Vec<DimensionAnnotation> {
    let b = &view.bounds;
    let field = TubeField::new(params, depth, view.kind == ViewKind::Return);
    let height = params.casing_height();
    let mut dims = Vec::new();

    if params.no_of_rows() >= 2 {
        dims.push(DimensionAnnotation::new(
            b,
            Side::Bottom,
            0,
            field.column_x(0),
            field.column_x(1),
        ));
    }
    dims.push(DimensionAnnotation::new(
        b,
        Side::Bottom,
        1,
        field.origin.x,
        field.origin.x + field.width,
    ));
    dims.push(DimensionAnnotation::new(b, Side::Bottom, 2, 0.0, depth));

    dims.push(DimensionAnnotation::new(b, Side::Right, 0, 0.0, field.bottom_line));
    dims.push(DimensionAnnotation::new(b, Side::Right, 0, field.top_line, height));
    dims.push(
        DimensionAnnotation::new(b, Side::Right, 1, field.bottom_line, field.top_line)
            .with_suffix(&pitch_suffix(params)),
    );
    dims.push(DimensionAnnotation::new(b, Side::Right, 2, 0.0, height));

    let base = field.column_base_y(0);
    dims.push(DimensionAnnotation::new(
        b,
        Side::Left,
        0,
        base,
        base + params.vertical_pitch(),
    ));

    dims
}

/// Header plate: row pitch, coil depth and plate depth below; plate offsets,
/// pitch span and height on the right; vertical pitch on the left.
pub fn generate_header_dimensions(params: &CoilParameters, view: &View) -> Vec<DimensionAnnotation> {
    debug_assert_eq!(view.kind, ViewKind::Header);
    plate_dimensions(params, view, params.header_depth())
}

/// Return plate, dimensioned like the header plate.
pub fn generate_return_dimensions(params: &CoilParameters, view: &View) -> Vec<DimensionAnnotation> {
    debug_assert_eq!(view.kind, ViewKind::Return);
    plate_dimensions(params, view, params.return_depth())
}

/// Top view: casing chain, FL, casing width and overall length below; pipe
/// run above; pipe gap on the connection side; zone depths on the other.
pub fn generate_top_dimensions(params: &CoilParameters, view: &View) -> Vec<DimensionAnnotation> {
    debug_assert_eq!(view.kind, ViewKind::Top);
    let b = &view.bounds;
    let layout = TopLayout::new(params);

    let cw = layout.casing_width;
    let cl = params.casing_left();
    let fin_right = cl + params.fin_length();
    let [pipe_in, pipe_out] = &layout.pipes;
    let tip = pipe_in.tip_x;

    let (near_edge, pipe_side, other_side) = match params.connection_side() {
        ConnectionSide::Lhs => (0.0, Side::Left, Side::Right),
        ConnectionSide::Rhs => (cw, Side::Right, Side::Left),
    };

    vec![
        DimensionAnnotation::new(b, Side::Bottom, 0, 0.0, cl),
        DimensionAnnotation::new(b, Side::Bottom, 0, fin_right, cw),
        DimensionAnnotation::new(b, Side::Bottom, 1, cl, fin_right).with_suffix("(FL)"),
        DimensionAnnotation::new(b, Side::Bottom, 2, 0.0, cw),
        DimensionAnnotation::new(b, Side::Bottom, 3, tip.min(0.0), tip.max(cw)),
        DimensionAnnotation::new(b, Side::Top, 0, tip, near_edge),
        DimensionAnnotation::new(b, Side::Top, 1, tip, pipe_in.inner_x),
        DimensionAnnotation::new(b, pipe_side, 0, pipe_in.y, pipe_out.y),
        DimensionAnnotation::new(b, other_side, 0, 0.0, layout.coil_start),
        DimensionAnnotation::new(b, other_side, 0, layout.coil_start, layout.coil_end),
        DimensionAnnotation::new(b, other_side, 0, layout.coil_end, layout.total_depth),
        DimensionAnnotation::new(b, other_side, 1, 0.0, layout.total_depth),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{
        generate_front_geometry, generate_header_geometry, generate_return_geometry,
        generate_top_geometry,
    };
    use approx::assert_relative_eq;
    use coilcad_params::RawParameters;

    fn defaults() -> CoilParameters {
        RawParameters::default().validate().unwrap()
    }

    /// On every side, each tier measures at least as much as any tier inside it.
    fn assert_local_to_global(dims: &[DimensionAnnotation]) {
        for side in [Side::Bottom, Side::Top, Side::Left, Side::Right] {
            let on_side: Vec<_> = dims.iter().filter(|d| d.side == side).collect();
            for inner in &on_side {
                for outer in on_side.iter().filter(|d| d.tier > inner.tier) {
                    assert!(
                        outer.value >= inner.value,
                        "{side:?}: tier {} ({}) inside tier {} ({})",
                        inner.tier,
                        inner.value,
                        outer.tier,
                        outer.value
                    );
                }
            }
        }
    }

    fn labels(dims: &[DimensionAnnotation]) -> Vec<&str> {
        dims.iter().map(|d| d.label.text.as_str()).collect()
    }

    #[test]
    fn test_front_dimensions() {
        let p = defaults();
        let dims = generate_front_dimensions(&p, &generate_front_geometry(&p));
        assert_local_to_global(&dims);
        let text = labels(&dims);
        assert!(text.contains(&"1330 (FL)"));
        assert!(text.contains(&"1400 (FH)"));
        assert!(text.contains(&"1430"));
        assert!(text.contains(&"1300 (34 x 38.2)"));
    }

    #[test]
    fn test_dimensions_stay_off_the_geometry() {
        for side in ["LHS", "RHS"] {
            for (rows, tubes) in [(6, 35), (1, 2)] {
                let mut raw = RawParameters::default();
                raw.connection_side = side.to_string();
                raw.no_of_rows = rows;
                raw.tubes_per_row = tubes;
                let p = raw.validate().unwrap();

                for kind in [ViewKind::Front, ViewKind::Top, ViewKind::Header, ViewKind::Return] {
                    let annotated = crate::annotate(&p, kind);
                    assert!(!annotated.dimensions.is_empty());
                    for dim in &annotated.dimensions {
                        assert!(
                            !dim.bounds().overlaps(&annotated.view.bounds),
                            "{side} {rows}x{tubes} {kind:?}: {:?}",
                            dim.label.text
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn test_header_and_return_dimensions() {
        let p = defaults();
        for (view, dims) in [
            {
                let v = generate_header_geometry(&p);
                let d = generate_header_dimensions(&p, &v);
                (v, d)
            },
            {
                let v = generate_return_geometry(&p);
                let d = generate_return_dimensions(&p, &v);
                (v, d)
            },
        ] {
            assert_local_to_global(&dims);
            let text = labels(&dims);
            assert!(text.contains(&"34.6"), "{:?}: {text:?}", view.kind);
            assert!(text.contains(&"207.6"));
            assert!(text.contains(&"320"));
            let vp = dims.iter().find(|d| d.side == Side::Left).unwrap();
            assert_relative_eq!(vp.value, p.vertical_pitch(), epsilon = 1e-9);
        }
    }

    #[test]
    fn test_single_row_has_no_row_pitch() {
        let mut raw = RawParameters::default();
        raw.no_of_rows = 1;
        let p = raw.validate().unwrap();
        let dims = generate_header_dimensions(&p, &generate_header_geometry(&p));
        assert!(dims
            .iter()
            .all(|d| !(d.side == Side::Bottom && d.tier == 0)));
    }

    #[test]
    fn test_top_dimensions_follow_connection_side() {
        for (side, pipe_side) in [("LHS", Side::Left), ("RHS", Side::Right)] {
            let mut raw = RawParameters::default();
            raw.connection_side = side.to_string();
            let p = raw.validate().unwrap();
            let dims = generate_top_dimensions(&p, &generate_top_geometry(&p));
            assert_local_to_global(&dims);

            let gap: Vec<_> = dims.iter().filter(|d| d.side == pipe_side).collect();
            assert_eq!(gap.len(), 1);
            assert_eq!(gap[0].label.text, "75");

            let overall = dims
                .iter()
                .find(|d| d.side == Side::Bottom && d.tier == 3)
                .unwrap();
            assert_eq!(overall.value, p.connection_extension() + p.casing_width());

            let run: Vec<_> = dims.iter().filter(|d| d.side == Side::Top).collect();
            assert_eq!(run[0].value, 170.0);
            assert_eq!(run[1].value, 350.0);
        }
    }
}
