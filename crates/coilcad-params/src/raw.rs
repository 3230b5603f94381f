//! Raw, unvalidated parameter input.

use serde::{Deserialize, Serialize};

use crate::error::{Field, ParamError, Result, Rule, ValidationError};
use crate::params::CoilParameters;
use crate::tube::diameter_for_label;

/// Parameter values as they arrive from a form, a TOML file, or the command
/// line. Nothing here is trusted; turn it into [`CoilParameters`] with
/// [`RawParameters::validate`].
///
/// Counts are signed so that a negative or zero entry survives parsing and is
/// reported as a violation instead of a parse failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RawParameters {
    /// Fin length, FL (mm).
    pub fin_length: f64,
    /// Fin height, FH (mm).
    pub fin_height: f64,
    /// Tube outer diameter (mm).
    pub tube_diameter: f64,
    /// Display label for the tube size (e.g. `5/8`). Looked up from the
    /// diameter when absent.
    pub tube_od_inch: Option<String>,
    /// Number of tube rows, NR (depth direction).
    pub no_of_rows: i64,
    /// Tubes per row, TPR (height direction).
    pub tubes_per_row: i64,
    /// Fins per inch.
    pub fpi: i64,
    /// Number of refrigerant circuits.
    pub no_of_circuits: i64,
    /// Distance from the top of FH to the top tube centre (mm).
    pub top_plate: f64,
    /// Distance from the bottom of FH to the bottom tube centre (mm).
    pub bottom_plate: f64,
    /// Casing extension on the header side (mm).
    pub casing_left: f64,
    /// Casing extension on the return side (mm).
    pub casing_right: f64,
    /// Casing extension above the fin pack (mm).
    pub casing_top: f64,
    /// Casing extension below the fin pack (mm).
    pub casing_bottom: f64,
    /// Casing sheet-metal thickness (mm).
    pub casing_thickness: f64,
    /// Fin pack depth (mm).
    pub coil_depth: f64,
    /// Header plate depth (mm).
    pub header_depth: f64,
    /// Return plate depth (mm).
    pub return_depth: f64,
    /// `LHS` or `RHS`.
    pub connection_side: String,
    /// Pipe run beyond the casing in the top view (mm).
    pub connection_extension: f64,
    /// IN/OUT pipe centre spacing (mm).
    pub connection_vertical_gap: f64,
    /// Distance from the casing edge to where the pipes enter the header (mm).
    pub header_block_length: f64,
    /// Pipe tip to outer fitting centre (mm).
    pub pipe_fitting_outer_offset: f64,
    /// Header block end to inner fitting centre (mm).
    pub pipe_fitting_inner_offset: f64,
    /// Pipe tip to stub pair centre (mm).
    pub pipe_stub_center_offset: f64,
    /// Distance between the two stub ticks (mm).
    pub pipe_stub_spacing: f64,
    /// Fin material, printed in the notes.
    pub fin_material: String,
    /// Fin thickness (mm).
    pub fin_thickness: f64,
    /// Copper tube wall thickness (mm).
    pub tube_wall_thickness: f64,
}

impl Default for RawParameters {
    fn default() -> Self {
        Self {
            fin_length: 1330.0,
            fin_height: 1400.0,
            tube_diameter: 15.875,
            tube_od_inch: None,
            no_of_rows: 6,
            tubes_per_row: 35,
            fpi: 13,
            no_of_circuits: 35,
            top_plate: 65.0,
            bottom_plate: 35.0,
            casing_left: 35.0,
            casing_right: 65.0,
            casing_top: 15.0,
            casing_bottom: 15.0,
            casing_thickness: 1.5,
            coil_depth: 207.6,
            header_depth: 320.0,
            return_depth: 320.0,
            connection_side: "LHS".to_string(),
            connection_extension: 170.0,
            connection_vertical_gap: 75.0,
            header_block_length: 180.0,
            pipe_fitting_outer_offset: 50.0,
            pipe_fitting_inner_offset: 25.0,
            pipe_stub_center_offset: 50.0,
            pipe_stub_spacing: 12.0,
            fin_material: "Plain Aluminium".to_string(),
            fin_thickness: 0.11,
            tube_wall_thickness: 0.4,
        }
    }
}

impl RawParameters {
    /// Parse a flat TOML table of parameter keys. Missing keys keep their
    /// defaults; unknown keys are rejected.
    pub fn from_toml_str(input: &str) -> Result<Self> {
        Ok(toml::from_str(input)?)
    }

    /// Render as a TOML table (round-trips through [`from_toml_str`](Self::from_toml_str)).
    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string(self)?)
    }

    /// Apply one `key=value` style override, the way a form field would.
    ///
    /// Numeric fields must parse; a malformed number is reported as a
    /// [`Rule::NotANumber`] violation on that field.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let field =
            Field::from_name(key.trim()).ok_or_else(|| ParamError::UnknownField(key.to_string()))?;
        let value = value.trim();

        match field {
            Field::ConnectionSide => self.connection_side = value.to_string(),
            Field::FinMaterial => self.fin_material = value.to_string(),
            Field::TubeOdInch => {
                if value.is_empty() {
                    self.tube_od_inch = None;
                } else {
                    if let Some(od) = diameter_for_label(value) {
                        self.tube_diameter = od;
                    }
                    self.tube_od_inch = Some(value.trim_end_matches('"').to_string());
                }
            }
            Field::NoOfRows => self.no_of_rows = parse_count(field, value)?,
            Field::TubesPerRow => self.tubes_per_row = parse_count(field, value)?,
            Field::Fpi => self.fpi = parse_count(field, value)?,
            Field::NoOfCircuits => self.no_of_circuits = parse_count(field, value)?,
            _ => {
                let v = parse_length(field, value)?;
                if let Some(slot) = self.length_mut(field) {
                    *slot = v;
                }
            }
        }
        Ok(())
    }

    /// Validate into an immutable [`CoilParameters`].
    pub fn validate(&self) -> std::result::Result<CoilParameters, ValidationError> {
        crate::validate(self)
    }

    fn length_mut(&mut self, field: Field) -> Option<&mut f64> {
        Some(match field {
            Field::FinLength => &mut self.fin_length,
            Field::FinHeight => &mut self.fin_height,
            Field::TubeDiameter => &mut self.tube_diameter,
            Field::TopPlate => &mut self.top_plate,
            Field::BottomPlate => &mut self.bottom_plate,
            Field::CasingLeft => &mut self.casing_left,
            Field::CasingRight => &mut self.casing_right,
            Field::CasingTop => &mut self.casing_top,
            Field::CasingBottom => &mut self.casing_bottom,
            Field::CasingThickness => &mut self.casing_thickness,
            Field::CoilDepth => &mut self.coil_depth,
            Field::HeaderDepth => &mut self.header_depth,
            Field::ReturnDepth => &mut self.return_depth,
            Field::ConnectionExtension => &mut self.connection_extension,
            Field::ConnectionVerticalGap => &mut self.connection_vertical_gap,
            Field::HeaderBlockLength => &mut self.header_block_length,
            Field::PipeFittingOuterOffset => &mut self.pipe_fitting_outer_offset,
            Field::PipeFittingInnerOffset => &mut self.pipe_fitting_inner_offset,
            Field::PipeStubCenterOffset => &mut self.pipe_stub_center_offset,
            Field::PipeStubSpacing => &mut self.pipe_stub_spacing,
            Field::FinThickness => &mut self.fin_thickness,
            Field::TubeWallThickness => &mut self.tube_wall_thickness,
            _ => return None,
        })
    }

    /// Every length field with its value, in input order.
    pub(crate) fn lengths(&self) -> [(Field, f64); 22] {
        [
            (Field::FinLength, self.fin_length),
            (Field::FinHeight, self.fin_height),
            (Field::TubeDiameter, self.tube_diameter),
            (Field::TopPlate, self.top_plate),
            (Field::BottomPlate, self.bottom_plate),
            (Field::CasingLeft, self.casing_left),
            (Field::CasingRight, self.casing_right),
            (Field::CasingTop, self.casing_top),
            (Field::CasingBottom, self.casing_bottom),
            (Field::CasingThickness, self.casing_thickness),
            (Field::CoilDepth, self.coil_depth),
            (Field::HeaderDepth, self.header_depth),
            (Field::ReturnDepth, self.return_depth),
            (Field::ConnectionExtension, self.connection_extension),
            (Field::ConnectionVerticalGap, self.connection_vertical_gap),
            (Field::HeaderBlockLength, self.header_block_length),
            (Field::PipeFittingOuterOffset, self.pipe_fitting_outer_offset),
            (Field::PipeFittingInnerOffset, self.pipe_fitting_inner_offset),
            (Field::PipeStubCenterOffset, self.pipe_stub_center_offset),
            (Field::PipeStubSpacing, self.pipe_stub_spacing),
            (Field::FinThickness, self.fin_thickness),
            (Field::TubeWallThickness, self.tube_wall_thickness),
        ]
    }
}

fn parse_length(field: Field, value: &str) -> Result<f64> {
    value
        .trim_end_matches("mm")
        .trim()
        .parse::<f64>()
        .map_err(|_| ValidationError::single(field, Rule::NotANumber(value.to_string())).into())
}

fn parse_count(field: Field, value: &str) -> Result<i64> {
    value
        .parse::<i64>()
        .map_err(|_| ValidationError::single(field, Rule::NotANumber(value.to_string())).into())
}
