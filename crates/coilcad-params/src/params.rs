//! The validated, immutable coil parameter set.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Field, Rule, ValidationError, Violation};
use crate::raw::RawParameters;
use crate::tube::tube_label_for_diameter;

/// Which end of the coil carries the IN/OUT connections in the top view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ConnectionSide {
    /// Left-hand side.
    #[default]
    #[serde(rename = "LHS")]
    Lhs,
    /// Right-hand side.
    #[serde(rename = "RHS")]
    Rhs,
}

impl ConnectionSide {
    /// The opposite side.
    pub fn mirrored(self) -> Self {
        match self {
            ConnectionSide::Lhs => ConnectionSide::Rhs,
            ConnectionSide::Rhs => ConnectionSide::Lhs,
        }
    }

    /// Short code used in titles.
    pub fn code(self) -> &'static str {
        match self {
            ConnectionSide::Lhs => "LHS",
            ConnectionSide::Rhs => "RHS",
        }
    }
}

impl fmt::Display for ConnectionSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for ConnectionSide {
    type Err = Rule;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "LHS" => Ok(ConnectionSide::Lhs),
            "RHS" => Ok(ConnectionSide::Rhs),
            _ => Err(Rule::UnknownConnectionSide(s.to_string())),
        }
    }
}

/// A validated parameter set for one drawing.
///
/// Only [`validate`] builds one, so every instance satisfies the coil
/// invariants. Derived quantities are computed once at construction and
/// exposed read-only. To change a value, edit [`to_raw`](Self::to_raw) and
/// validate again.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoilParameters {
    fin_length: f64,
    fin_height: f64,
    tube_diameter: f64,
    tube_label: String,
    tube_label_explicit: bool,
    no_of_rows: u32,
    tubes_per_row: u32,
    fpi: u32,
    no_of_circuits: u32,
    top_plate: f64,
    bottom_plate: f64,
    casing_left: f64,
    casing_right: f64,
    casing_top: f64,
    casing_bottom: f64,
    casing_thickness: f64,
    coil_depth: f64,
    header_depth: f64,
    return_depth: f64,
    connection_side: ConnectionSide,
    connection_extension: f64,
    connection_vertical_gap: f64,
    header_block_length: f64,
    pipe_fitting_outer_offset: f64,
    pipe_fitting_inner_offset: f64,
    pipe_stub_center_offset: f64,
    pipe_stub_spacing: f64,
    fin_material: String,
    fin_thickness: f64,
    tube_wall_thickness: f64,

    // Derived
    casing_width: f64,
    casing_height: f64,
    vertical_pitch: f64,
    row_pitch: f64,
    drawing_title: String,
}

/// Most rows a coil may have.
pub const MAX_ROWS: u32 = 24;
/// Most tubes a single row may have.
pub const MAX_TUBES_PER_ROW: u32 = 200;
/// Most tube holes per end plate (rows x tubes per row).
pub const MAX_TUBES: u64 = 2_400;
/// Highest fin density.
pub const MAX_FPI: u32 = 40;
/// Most circuits.
pub const MAX_CIRCUITS: u32 = 1_000;

/// Validate raw input against every coil invariant.
///
/// All violations are collected; the error lists each offending field with
/// the rule it broke.
pub fn validate(raw: &RawParameters) -> Result<CoilParameters, ValidationError> {
    let mut violations = Vec::new();

    for (field, value) in raw.lengths() {
        if !value.is_finite() {
            violations.push(Violation::new(field, Rule::MustBeFinite { value }));
        } else if value <= 0.0 {
            violations.push(Violation::new(field, Rule::MustBePositive { value }));
        }
    }

    let no_of_rows =
        check_count(&mut violations, Field::NoOfRows, raw.no_of_rows, 1, MAX_ROWS);
    let tubes_per_row = check_count(
        &mut violations,
        Field::TubesPerRow,
        raw.tubes_per_row,
        2,
        MAX_TUBES_PER_ROW,
    );
    let fpi = check_count(&mut violations, Field::Fpi, raw.fpi, 1, MAX_FPI);
    let no_of_circuits = check_count(
        &mut violations,
        Field::NoOfCircuits,
        raw.no_of_circuits,
        1,
        MAX_CIRCUITS,
    );

    if let (Some(nr), Some(tpr)) = (no_of_rows, tubes_per_row) {
        let tubes = u64::from(nr) * u64::from(tpr);
        if tubes > MAX_TUBES {
            violations.push(Violation::new(
                Field::TubesPerRow,
                Rule::TooManyTubes {
                    rows: nr,
                    tubes_per_row: tpr,
                    max: MAX_TUBES,
                },
            ));
        }
    }

    let connection_side = match raw.connection_side.parse::<ConnectionSide>() {
        Ok(side) => Some(side),
        Err(rule) => {
            violations.push(Violation::new(Field::ConnectionSide, rule));
            None
        }
    };

    let plates = raw.top_plate + raw.bottom_plate;
    if plates >= raw.fin_height {
        violations.push(Violation::new(
            Field::TopPlate,
            Rule::PlatesExceedFinHeight {
                plates,
                fin_height: raw.fin_height,
            },
        ));
    }

    let plate_depth = raw.header_depth.min(raw.return_depth);
    if raw.coil_depth > plate_depth {
        violations.push(Violation::new(
            Field::CoilDepth,
            Rule::ExceedsPlateDepth {
                coil_depth: raw.coil_depth,
                plate_depth,
            },
        ));
    }

    let casing_width = raw.casing_left + raw.fin_length + raw.casing_right;
    if raw.header_block_length > casing_width {
        violations.push(Violation::new(
            Field::HeaderBlockLength,
            Rule::ExceedsCasingWidth {
                length: raw.header_block_length,
                casing_width,
            },
        ));
    }

    if let (true, Some(nr), Some(tpr)) = (violations.is_empty(), no_of_rows, tubes_per_row) {
        check_tube_holes(&mut violations, raw, nr, tpr);
    }

    match (
        violations.is_empty(),
        no_of_rows,
        tubes_per_row,
        fpi,
        no_of_circuits,
        connection_side,
    ) {
        (true, Some(nr), Some(tpr), Some(fpi), Some(nc), Some(side)) => {
            Ok(CoilParameters::from_checked(raw, nr, tpr, fpi, nc, side))
        }
        _ => Err(ValidationError::new(violations)),
    }
}

fn check_count(
    violations: &mut Vec<Violation>,
    field: Field,
    value: i64,
    min: i64,
    max: u32,
) -> Option<u32> {
    if value < min {
        violations.push(Violation::new(field, Rule::TooFew { min, value }));
        return None;
    }
    match u32::try_from(value) {
        Ok(v) if v <= max => Some(v),
        _ => {
            let max = i64::from(max);
            violations.push(Violation::new(field, Rule::TooMany { max, value }));
            None
        }
    }
}

/// Every end-plate hole, radius included, must lie within the plate height.
///
/// Even columns span the pitch band exactly; odd columns sit half a pitch
/// higher, so with more than one row the top hole is at `top_line + VP/2`.
fn check_tube_holes(violations: &mut Vec<Violation>, raw: &RawParameters, nr: u32, tpr: u32) {
    let radius = raw.tube_diameter / 2.0;
    let casing_height = raw.casing_bottom + raw.fin_height + raw.casing_top;
    let bottom_line = raw.casing_bottom + raw.bottom_plate;
    let top_line = raw.casing_bottom + raw.fin_height - raw.top_plate;
    let vp = (top_line - bottom_line) / f64::from(tpr - 1);

    let outside = |y: f64| Rule::TubeOutsidePlate {
        y,
        radius,
        casing_height,
    };
    if bottom_line - radius < 0.0 {
        violations.push(Violation::new(Field::BottomPlate, outside(bottom_line)));
    }
    if top_line + radius > casing_height {
        violations.push(Violation::new(Field::TopPlate, outside(top_line)));
    } else if nr > 1 && top_line + vp / 2.0 + radius > casing_height {
        violations.push(Violation::new(Field::TubesPerRow, outside(top_line + vp / 2.0)));
    }
}

impl CoilParameters {
    fn from_checked(
        raw: &RawParameters,
        no_of_rows: u32,
        tubes_per_row: u32,
        fpi: u32,
        no_of_circuits: u32,
        connection_side: ConnectionSide,
    ) -> Self {
        // Validation guarantees both divisors; reaching here without them is a bug.
        assert!(tubes_per_row >= 2, "vertical pitch needs at least two tubes per row");
        assert!(no_of_rows >= 1, "row pitch needs at least one row");

        let casing_width = raw.casing_left + raw.fin_length + raw.casing_right;
        let casing_height = raw.casing_bottom + raw.fin_height + raw.casing_top;
        let vertical_pitch =
            (raw.fin_height - raw.top_plate - raw.bottom_plate) / f64::from(tubes_per_row - 1);
        let row_pitch = raw.coil_depth / f64::from(no_of_rows);

        let (tube_label, tube_label_explicit) = match &raw.tube_od_inch {
            Some(label) if !label.trim().is_empty() => {
                (label.trim().trim_end_matches('"').to_string(), true)
            }
            _ => (tube_label_for_diameter(raw.tube_diameter), false),
        };

        let drawing_title = format!(
            "{}\"x{:.0}FLx{:.0}FHx{}Rx{}TPRx{}FPIx{}NC - {}",
            tube_label,
            raw.fin_length,
            raw.fin_height,
            no_of_rows,
            tubes_per_row,
            fpi,
            no_of_circuits,
            connection_side
        );

        Self {
            fin_length: raw.fin_length,
            fin_height: raw.fin_height,
            tube_diameter: raw.tube_diameter,
            tube_label,
            tube_label_explicit,
            no_of_rows,
            tubes_per_row,
            fpi,
            no_of_circuits,
            top_plate: raw.top_plate,
            bottom_plate: raw.bottom_plate,
            casing_left: raw.casing_left,
            casing_right: raw.casing_right,
            casing_top: raw.casing_top,
            casing_bottom: raw.casing_bottom,
            casing_thickness: raw.casing_thickness,
            coil_depth: raw.coil_depth,
            header_depth: raw.header_depth,
            return_depth: raw.return_depth,
            connection_side,
            connection_extension: raw.connection_extension,
            connection_vertical_gap: raw.connection_vertical_gap,
            header_block_length: raw.header_block_length,
            pipe_fitting_outer_offset: raw.pipe_fitting_outer_offset,
            pipe_fitting_inner_offset: raw.pipe_fitting_inner_offset,
            pipe_stub_center_offset: raw.pipe_stub_center_offset,
            pipe_stub_spacing: raw.pipe_stub_spacing,
            fin_material: raw.fin_material.clone(),
            fin_thickness: raw.fin_thickness,
            tube_wall_thickness: raw.tube_wall_thickness,
            casing_width,
            casing_height,
            vertical_pitch,
            row_pitch,
            drawing_title,
        }
    }

    /// The raw form of these parameters, for editing and revalidation.
    pub fn to_raw(&self) -> RawParameters {
        RawParameters {
            fin_length: self.fin_length,
            fin_height: self.fin_height,
            tube_diameter: self.tube_diameter,
            tube_od_inch: self
                .tube_label_explicit
                .then(|| self.tube_label.clone()),
            no_of_rows: i64::from(self.no_of_rows),
            tubes_per_row: i64::from(self.tubes_per_row),
            fpi: i64::from(self.fpi),
            no_of_circuits: i64::from(self.no_of_circuits),
            top_plate: self.top_plate,
            bottom_plate: self.bottom_plate,
            casing_left: self.casing_left,
            casing_right: self.casing_right,
            casing_top: self.casing_top,
            casing_bottom: self.casing_bottom,
            casing_thickness: self.casing_thickness,
            coil_depth: self.coil_depth,
            header_depth: self.header_depth,
            return_depth: self.return_depth,
            connection_side: self.connection_side.code().to_string(),
            connection_extension: self.connection_extension,
            connection_vertical_gap: self.connection_vertical_gap,
            header_block_length: self.header_block_length,
            pipe_fitting_outer_offset: self.pipe_fitting_outer_offset,
            pipe_fitting_inner_offset: self.pipe_fitting_inner_offset,
            pipe_stub_center_offset: self.pipe_stub_center_offset,
            pipe_stub_spacing: self.pipe_stub_spacing,
            fin_material: self.fin_material.clone(),
            fin_thickness: self.fin_thickness,
            tube_wall_thickness: self.tube_wall_thickness,
        }
    }

    // ── Inputs ──────────────────────────────────────────────────────────

    /// Fin length, FL (mm).
    pub fn fin_length(&self) -> f64 {
        self.fin_length
    }
    /// Fin height, FH (mm).
    pub fn fin_height(&self) -> f64 {
        self.fin_height
    }
    /// Tube outer diameter (mm).
    pub fn tube_diameter(&self) -> f64 {
        self.tube_diameter
    }
    /// Tube outer radius (mm).
    pub fn tube_radius(&self) -> f64 {
        self.tube_diameter / 2.0
    }
    /// Tube size label in inches, without the inch mark (e.g. `5/8`).
    pub fn tube_label(&self) -> &str {
        &self.tube_label
    }
    /// Number of rows, NR.
    pub fn no_of_rows(&self) -> u32 {
        self.no_of_rows
    }
    /// Tubes per row, TPR.
    pub fn tubes_per_row(&self) -> u32 {
        self.tubes_per_row
    }
    /// Fins per inch.
    pub fn fpi(&self) -> u32 {
        self.fpi
    }
    /// Number of circuits.
    pub fn no_of_circuits(&self) -> u32 {
        self.no_of_circuits
    }
    /// Top plate offset (mm).
    pub fn top_plate(&self) -> f64 {
        self.top_plate
    }
    /// Bottom plate offset (mm).
    pub fn bottom_plate(&self) -> f64 {
        self.bottom_plate
    }
    /// Casing extension, header side (mm).
    pub fn casing_left(&self) -> f64 {
        self.casing_left
    }
    /// Casing extension, return side (mm).
    pub fn casing_right(&self) -> f64 {
        self.casing_right
    }
    /// Casing extension above the fins (mm).
    pub fn casing_top(&self) -> f64 {
        self.casing_top
    }
    /// Casing extension below the fins (mm).
    pub fn casing_bottom(&self) -> f64 {
        self.casing_bottom
    }
    /// Casing sheet thickness (mm).
    pub fn casing_thickness(&self) -> f64 {
        self.casing_thickness
    }
    /// Fin pack depth (mm).
    pub fn coil_depth(&self) -> f64 {
        self.coil_depth
    }
    /// Header plate depth (mm).
    pub fn header_depth(&self) -> f64 {
        self.header_depth
    }
    /// Return plate depth (mm).
    pub fn return_depth(&self) -> f64 {
        self.return_depth
    }
    /// Connection side.
    pub fn connection_side(&self) -> ConnectionSide {
        self.connection_side
    }
    /// Pipe run beyond the casing (mm).
    pub fn connection_extension(&self) -> f64 {
        self.connection_extension
    }
    /// IN/OUT centre spacing (mm).
    pub fn connection_vertical_gap(&self) -> f64 {
        self.connection_vertical_gap
    }
    /// Pipe entry depth into the header (mm).
    pub fn header_block_length(&self) -> f64 {
        self.header_block_length
    }
    /// Pipe tip to outer fitting (mm).
    pub fn pipe_fitting_outer_offset(&self) -> f64 {
        self.pipe_fitting_outer_offset
    }
    /// Header block end to inner fitting (mm).
    pub fn pipe_fitting_inner_offset(&self) -> f64 {
        self.pipe_fitting_inner_offset
    }
    /// Pipe tip to stub pair centre (mm).
    pub fn pipe_stub_center_offset(&self) -> f64 {
        self.pipe_stub_center_offset
    }
    /// Stub tick spacing (mm).
    pub fn pipe_stub_spacing(&self) -> f64 {
        self.pipe_stub_spacing
    }
    /// Fin material.
    pub fn fin_material(&self) -> &str {
        &self.fin_material
    }
    /// Fin thickness (mm).
    pub fn fin_thickness(&self) -> f64 {
        self.fin_thickness
    }
    /// Tube wall thickness (mm).
    pub fn tube_wall_thickness(&self) -> f64 {
        self.tube_wall_thickness
    }

    // ── Derived ─────────────────────────────────────────────────────────

    /// `casing_left + FL + casing_right`.
    pub fn casing_width(&self) -> f64 {
        self.casing_width
    }

    /// `casing_bottom + FH + casing_top`.
    pub fn casing_height(&self) -> f64 {
        self.casing_height
    }

    /// Centre-to-centre tube spacing in the height direction:
    /// `(FH - top_plate - bottom_plate) / (TPR - 1)`.
    pub fn vertical_pitch(&self) -> f64 {
        self.vertical_pitch
    }

    /// Centre-to-centre row spacing in the depth direction: `coil_depth / NR`.
    pub fn row_pitch(&self) -> f64 {
        self.row_pitch
    }

    /// Span between the bottom and top tube centres: `(TPR - 1) * VP`.
    pub fn pitch_span(&self) -> f64 {
        self.fin_height - self.top_plate - self.bottom_plate
    }

    /// Fin spacing along the fin length (mm): `25.4 / FPI`.
    pub fn fin_spacing(&self) -> f64 {
        25.4 / f64::from(self.fpi)
    }

    /// Drawing title, e.g. `5/8"x1330FLx1400FHx6Rx35TPRx13FPIx35NC - LHS`.
    pub fn drawing_title(&self) -> &str {
        &self.drawing_title
    }
}
