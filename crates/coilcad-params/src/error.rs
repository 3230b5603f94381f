//! Error types for parameter validation.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// An input field of the coil parameter set.
///
/// Every validation failure names one of these so a caller can point at the
/// exact offending input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[allow(missing_docs)]
pub enum Field {
    FinLength,
    FinHeight,
    TubeDiameter,
    NoOfRows,
    TubesPerRow,
    Fpi,
    NoOfCircuits,
    TopPlate,
    BottomPlate,
    CasingLeft,
    CasingRight,
    CasingTop,
    CasingBottom,
    CasingThickness,
    CoilDepth,
    HeaderDepth,
    ReturnDepth,
    ConnectionSide,
    ConnectionExtension,
    ConnectionVerticalGap,
    HeaderBlockLength,
    PipeFittingOuterOffset,
    PipeFittingInnerOffset,
    PipeStubCenterOffset,
    PipeStubSpacing,
    FinThickness,
    TubeWallThickness,
    FinMaterial,
    TubeOdInch,
}

impl Field {
    /// All fields, in input order.
    pub const ALL: [Field; 29] = [
        Field::FinLength,
        Field::FinHeight,
        Field::TubeDiameter,
        Field::NoOfRows,
        Field::TubesPerRow,
        Field::Fpi,
        Field::NoOfCircuits,
        Field::TopPlate,
        Field::BottomPlate,
        Field::CasingLeft,
        Field::CasingRight,
        Field::CasingTop,
        Field::CasingBottom,
        Field::CasingThickness,
        Field::CoilDepth,
        Field::HeaderDepth,
        Field::ReturnDepth,
        Field::ConnectionSide,
        Field::ConnectionExtension,
        Field::ConnectionVerticalGap,
        Field::HeaderBlockLength,
        Field::PipeFittingOuterOffset,
        Field::PipeFittingInnerOffset,
        Field::PipeStubCenterOffset,
        Field::PipeStubSpacing,
        Field::FinThickness,
        Field::TubeWallThickness,
        Field::FinMaterial,
        Field::TubeOdInch,
    ];

    /// The input key for this field (as used in TOML files and `--set`).
    pub fn name(self) -> &'static str {
        match self {
            Field::FinLength => "fin_length",
            Field::FinHeight => "fin_height",
            Field::TubeDiameter => "tube_diameter",
            Field::NoOfRows => "no_of_rows",
            Field::TubesPerRow => "tubes_per_row",
            Field::Fpi => "fpi",
            Field::NoOfCircuits => "no_of_circuits",
            Field::TopPlate => "top_plate",
            Field::BottomPlate => "bottom_plate",
            Field::CasingLeft => "casing_left",
            Field::CasingRight => "casing_right",
            Field::CasingTop => "casing_top",
            Field::CasingBottom => "casing_bottom",
            Field::CasingThickness => "casing_thickness",
            Field::CoilDepth => "coil_depth",
            Field::HeaderDepth => "header_depth",
            Field::ReturnDepth => "return_depth",
            Field::ConnectionSide => "connection_side",
            Field::ConnectionExtension => "connection_extension",
            Field::ConnectionVerticalGap => "connection_vertical_gap",
            Field::HeaderBlockLength => "header_block_length",
            Field::PipeFittingOuterOffset => "pipe_fitting_outer_offset",
            Field::PipeFittingInnerOffset => "pipe_fitting_inner_offset",
            Field::PipeStubCenterOffset => "pipe_stub_center_offset",
            Field::PipeStubSpacing => "pipe_stub_spacing",
            Field::FinThickness => "fin_thickness",
            Field::TubeWallThickness => "tube_wall_thickness",
            Field::FinMaterial => "fin_material",
            Field::TubeOdInch => "tube_od_inch",
        }
    }

    /// Look up a field by its input key.
    pub fn from_name(name: &str) -> Option<Field> {
        Field::ALL.into_iter().find(|f| f.name() == name)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The rule a field value broke.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Rule {
    /// A length must be a finite number.
    #[error("must be a finite number (got {value})")]
    MustBeFinite {
        /// Offending value.
        value: f64,
    },
    /// A length must be strictly positive.
    #[error("must be positive (got {value})")]
    MustBePositive {
        /// Offending value.
        value: f64,
    },
    /// A count is below its minimum.
    #[error("must be at least {min} (got {value})")]
    TooFew {
        /// Smallest accepted count.
        min: i64,
        /// Offending value.
        value: i64,
    },
    /// A count is above its maximum.
    #[error("must be at most {max} (got {value})")]
    TooMany {
        /// Largest accepted count.
        max: i64,
        /// Offending value.
        value: i64,
    },
    /// Rows x tubes per row exceeds the drawable hole count.
    #[error("{rows} rows x {tubes_per_row} tubes exceeds {max} tube holes")]
    TooManyTubes {
        /// Number of rows.
        rows: u32,
        /// Tubes per row.
        tubes_per_row: u32,
        /// Largest accepted hole count.
        max: u64,
    },
    /// Top plate + bottom plate leave no room for tubes.
    #[error("top plate + bottom plate ({plates}) must be less than fin height ({fin_height})")]
    PlatesExceedFinHeight {
        /// Sum of the two plate offsets.
        plates: f64,
        /// Fin height.
        fin_height: f64,
    },
    /// A tube hole would cross the edge of an end plate.
    #[error("tube hole at y = {y} with radius {radius} falls outside the end plate (0..{casing_height})")]
    TubeOutsidePlate {
        /// Hole centre height.
        y: f64,
        /// Hole radius.
        radius: f64,
        /// End plate height.
        casing_height: f64,
    },
    /// The tube field is deeper than an end plate.
    #[error("coil depth ({coil_depth}) must not exceed the end plate depth ({plate_depth})")]
    ExceedsPlateDepth {
        /// Coil depth.
        coil_depth: f64,
        /// Depth of the smaller end plate.
        plate_depth: f64,
    },
    /// A top-view feature runs past the casing.
    #[error("length ({length}) must not exceed the casing width ({casing_width})")]
    ExceedsCasingWidth {
        /// Feature length.
        length: f64,
        /// Casing width.
        casing_width: f64,
    },
    /// Connection side is neither LHS nor RHS.
    #[error("unknown connection side {0:?} (expected LHS or RHS)")]
    UnknownConnectionSide(String),
    /// A raw string did not parse as a number.
    #[error("{0:?} is not a number")]
    NotANumber(String),
}

/// One broken invariant: which field, which rule.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{field}: {rule}")]
pub struct Violation {
    /// The offending field.
    pub field: Field,
    /// The rule it broke.
    pub rule: Rule,
}

impl Violation {
    /// Create a violation.
    pub fn new(field: Field, rule: Rule) -> Self {
        Self { field, rule }
    }
}

/// Every invariant a raw parameter set broke.
///
/// Never empty: a successful validation returns the parameters instead.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("invalid coil parameters{}", bullet_list(.violations))]
pub struct ValidationError {
    violations: Vec<Violation>,
}

fn bullet_list(violations: &[Violation]) -> String {
    violations.iter().map(|v| format!("\n  - {v}")).collect()
}

impl ValidationError {
    /// Build from a non-empty list of violations.
    pub(crate) fn new(violations: Vec<Violation>) -> Self {
        debug_assert!(!violations.is_empty());
        Self { violations }
    }

    /// A single-violation error.
    pub fn single(field: Field, rule: Rule) -> Self {
        Self::new(vec![Violation::new(field, rule)])
    }

    /// All violations, in field order.
    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    /// The distinct offending fields.
    pub fn fields(&self) -> Vec<Field> {
        let mut fields: Vec<Field> = Vec::new();
        for v in &self.violations {
            if !fields.contains(&v.field) {
                fields.push(v.field);
            }
        }
        fields
    }

    /// Whether `field` is among the offenders.
    pub fn has(&self, field: Field) -> bool {
        self.violations.iter().any(|v| v.field == field)
    }
}

/// Errors raised while reading raw parameters.
#[derive(Error, Debug)]
pub enum ParamError {
    /// The parameters broke one or more invariants.
    #[error(transparent)]
    Invalid(#[from] ValidationError),

    /// An override named a key that does not exist.
    #[error("unknown parameter `{0}`")]
    UnknownField(String),

    /// TOML input could not be parsed.
    #[error("config parse error: {0}")]
    Parse(#[from] toml::de::Error),

    /// TOML output could not be produced.
    #[error("config write error: {0}")]
    Write(#[from] toml::ser::Error),
}

/// Result type for parameter operations.
pub type Result<T> = std::result::Result<T, ParamError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_names_round_trip() {
        for field in Field::ALL {
            assert_eq!(Field::from_name(field.name()), Some(field));
        }
        assert_eq!(Field::from_name("fin_width"), None);
    }

    #[test]
    fn test_validation_error_display_lists_every_violation() {
        let err = ValidationError::new(vec![
            Violation::new(Field::FinLength, Rule::MustBePositive { value: -1.0 }),
            Violation::new(Field::TubesPerRow, Rule::TooFew { min: 2, value: 1 }),
        ]);
        let text = err.to_string();
        assert!(text.contains("fin_length: must be positive"));
        assert!(text.contains("tubes_per_row: must be at least 2"));
        assert_eq!(err.fields(), vec![Field::FinLength, Field::TubesPerRow]);
        assert_eq!(text.lines().count(), 3);
    }

    #[test]
    fn test_rule_is_an_error() {
        let rule: &dyn std::error::Error = &Rule::TooMany { max: 200, value: 201 };
        assert_eq!(rule.to_string(), "must be at most 200 (got 201)");
        let v = Violation::new(Field::Fpi, Rule::NotANumber("x".to_string()));
        assert_eq!(v.to_string(), "fpi: \"x\" is not a number");
    }
}
