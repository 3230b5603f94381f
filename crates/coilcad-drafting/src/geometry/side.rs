use coilcad_params::CoilParameters;

use crate::types::{Layer, Point2D, Primitive, View, ViewKind};

/// Placement of the staggered tube-hole grid on an end plate.
///
/// Columns are the tube rows seen end on, centred horizontally on the plate.
/// Even columns put their tubes exactly on `bottom_line + j * VP`, spanning
/// the plate reference lines; odd columns sit half a pitch higher. The field
/// box is `coil_depth` wide and encloses every hole with its radius.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TubeField {
    /// Lower-left corner of the field box.
    pub origin: Point2D,
    /// Field width (coil depth).
    pub width: f64,
    /// Field height, from the lowest hole edge to the highest.
    pub height: f64,
    /// Bottom plate reference line; centre of the first tube in even columns.
    pub bottom_line: f64,
    /// Top plate reference line; centre of the last tube in even columns.
    pub top_line: f64,
    columns: u32,
    tubes_per_column: u32,
    row_pitch: f64,
    vertical_pitch: f64,
    mirrored: bool,
}

impl TubeField {
    /// Tube field for a plate of the given depth. `mirrored` numbers columns
    /// from the right, as seen from the return end.
    pub fn new(params: &CoilParameters, plate_depth: f64, mirrored: bool) -> Self {
        let vp = params.vertical_pitch();
        let bottom_line = params.casing_bottom() + params.bottom_plate();
        let top_line = params.casing_bottom() + params.fin_height() - params.top_plate();
        let width = params.coil_depth();
        let radius = params.tube_radius();
        let stagger = if params.no_of_rows() > 1 { vp / 2.0 } else { 0.0 };
        let height = top_line - bottom_line + stagger + 2.0 * radius;

        Self {
            origin: Point2D::new((plate_depth - width) / 2.0, bottom_line - radius),
            width,
            height,
            bottom_line,
            top_line,
            columns: params.no_of_rows(),
            tubes_per_column: params.tubes_per_row(),
            row_pitch: params.row_pitch(),
            vertical_pitch: vp,
            mirrored,
        }
    }

    /// X of the tube centres in column `c`.
    pub fn column_x(&self, c: u32) -> f64 {
        let along = self.row_pitch / 2.0 + f64::from(c) * self.row_pitch;
        if self.mirrored {
            self.origin.x + self.width - along
        } else {
            self.origin.x + along
        }
    }

    /// Y of the lowest tube centre in column `c`.
    pub fn column_base_y(&self, c: u32) -> f64 {
        if c % 2 == 0 {
            self.bottom_line
        } else {
            self.bottom_line + self.vertical_pitch / 2.0
        }
    }

    /// Number of holes, `NR * TPR`, computed in `usize` so it cannot wrap.
    pub fn hole_count(&self) -> usize {
        (self.columns as usize).saturating_mul(self.tubes_per_column as usize)
    }

    /// Every tube centre, column by column, bottom to top.
    pub fn hole_centers(&self) -> Vec<Point2D> {
        let mut centers = Vec::with_capacity(self.hole_count());
        for c in 0..self.columns {
            let x = self.column_x(c);
            let base = self.column_base_y(c);
            for j in 0..self.tubes_per_column {
                centers.push(Point2D::new(x, base + f64::from(j) * self.vertical_pitch));
            }
        }
        centers
    }
}

fn generate_plate_view(kind: ViewKind, params: &CoilParameters, depth: f64) -> View {
    let mut view = View::new(kind);
    let height = params.casing_height();
    let t = params.casing_thickness();

    view.push(Primitive::rect(Layer::Casing, 0.0, 0.0, depth, height));
    if depth > 2.0 * t && height > 2.0 * t {
        view.push(Primitive::rect(
            Layer::Plate,
            t,
            t,
            depth - 2.0 * t,
            height - 2.0 * t,
        ));
    }

    let field = TubeField::new(params, depth, kind == ViewKind::Return);

    for y in [field.bottom_line, field.top_line] {
        view.push(Primitive::line(
            Layer::Plate,
            Point2D::new(0.0, y),
            Point2D::new(depth, y),
        ));
    }

    view.push(Primitive::rect(
        Layer::Coil,
        field.origin.x,
        field.origin.y,
        field.width,
        field.height,
    ));

    let radius = params.tube_radius();
    for center in field.hole_centers() {
        view.push(Primitive::circle(Layer::Tube, center, radius));
    }

    view
}

/// Header end plate with the staggered tube holes.
pub fn generate_header_geometry(params: &CoilParameters) -> View {
    generate_plate_view(ViewKind::Header, params, params.header_depth())
}

/// Return end plate, seen from the return end.
pub fn generate_return_geometry(params: &CoilParameters) -> View {
    generate_plate_view(ViewKind::Return, params, params.return_depth())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Shape;
    use approx::assert_relative_eq;
    use coilcad_params::RawParameters;

    fn hole_centres(view: &View) -> Vec<Point2D> {
        view.on_layer(Layer::Tube)
            .map(|p| match p.shape {
                Shape::Circle { center, .. } => center,
                ref other => panic!("unexpected tube primitive {other:?}"),
            })
            .collect()
    }

    #[test]
    fn test_hole_count_is_rows_times_tubes() {
        let params = RawParameters::default().validate().unwrap();
        assert_eq!(hole_centres(&generate_header_geometry(&params)).len(), 210);
        assert_eq!(hole_centres(&generate_return_geometry(&params)).len(), 210);
    }

    #[test]
    fn test_adjacent_columns_are_staggered_by_half_pitch() {
        let params = RawParameters::default().validate().unwrap();
        let tpr = params.tubes_per_row() as usize;
        let holes = hole_centres(&generate_header_geometry(&params));
        let vp = params.vertical_pitch();

        for c in 0..params.no_of_rows() as usize - 1 {
            for j in 0..tpr {
                let a = holes[c * tpr + j];
                let b = holes[(c + 1) * tpr + j];
                assert_relative_eq!((b.y - a.y).abs(), vp / 2.0, epsilon = 1e-9);
                assert_relative_eq!(b.x - a.x, params.row_pitch(), epsilon = 1e-9);
            }
        }
    }

    #[test]
    fn test_even_columns_sit_on_plate_lines() {
        let params = RawParameters::default().validate().unwrap();
        let tpr = params.tubes_per_row() as usize;
        let field = TubeField::new(&params, params.header_depth(), false);
        let holes = hole_centres(&generate_header_geometry(&params));

        assert_eq!(holes[0].y, field.bottom_line);
        assert_relative_eq!(holes[tpr - 1].y, field.top_line, epsilon = 1e-9);
        assert_relative_eq!(
            holes[tpr - 1].y - holes[0].y,
            params.pitch_span(),
            epsilon = 1e-9
        );
        assert_relative_eq!(holes[tpr].y, field.bottom_line + params.vertical_pitch() / 2.0);
    }

    #[test]
    fn test_holes_stay_on_the_plate() {
        for (rows, tubes) in [(1, 2), (2, 12), (6, 35), (5, 20)] {
            let mut raw = RawParameters::default();
            raw.no_of_rows = rows;
            raw.tubes_per_row = tubes;
            let params = raw.validate().unwrap();
            let r = params.tube_radius();
            for view in [generate_header_geometry(&params), generate_return_geometry(&params)] {
                let field = view.on_layer(Layer::Coil).next().unwrap().bounds();
                for c in hole_centres(&view) {
                    assert!(
                        c.y - r >= 0.0 && c.y + r <= params.casing_height(),
                        "{rows}x{tubes}: {c:?}"
                    );
                    assert!(c.y - r >= field.min_y - 1e-9 && c.y + r <= field.max_y + 1e-9);
                }
            }
        }
    }

    #[test]
    fn test_two_tube_column_positions() {
        let mut raw = RawParameters::default();
        raw.no_of_rows = 1;
        raw.tubes_per_row = 2;
        let params = raw.validate().unwrap();
        let ys: Vec<f64> = hole_centres(&generate_header_geometry(&params))
            .iter()
            .map(|c| c.y)
            .collect();
        assert_eq!(ys, vec![15.0 + 35.0, 15.0 + 1400.0 - 65.0]);
    }

    #[test]
    fn test_field_is_centred_across_the_plate() {
        let params = RawParameters::default().validate().unwrap();
        let field = TubeField::new(&params, params.header_depth(), false);
        assert_eq!(field.hole_count(), 210);
        assert_relative_eq!(
            field.origin.x + field.width / 2.0,
            params.header_depth() / 2.0,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_return_view_mirrors_columns() {
        let params = RawParameters::default().validate().unwrap();
        let header = TubeField::new(&params, params.header_depth(), false);
        let ret = TubeField::new(&params, params.return_depth(), true);
        for c in 0..params.no_of_rows() {
            assert_relative_eq!(
                ret.column_x(c),
                params.return_depth() - header.column_x(c),
                epsilon = 1e-9
            );
            assert_eq!(ret.column_base_y(c), header.column_base_y(c));
        }
    }

    #[test]
    fn test_single_row_has_one_column() {
        let mut raw = RawParameters::default();
        raw.no_of_rows = 1;
        raw.tubes_per_row = 2;
        let params = raw.validate().unwrap();
        let holes = hole_centres(&generate_header_geometry(&params));
        assert_eq!(holes.len(), 2);
        assert_eq!(holes[0].x, holes[1].x);
        assert_relative_eq!(holes[0].x, params.header_depth() / 2.0, epsilon = 1e-9);
    }
}
