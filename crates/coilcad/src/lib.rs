#![warn(missing_docs)]

//! coilcad: parametric finned-tube coil drawings.
//!
//! Validated coil parameters go through geometry, dimensioning and layout
//! to produce a [`Sheet`], which can then be written as DXF, SVG or JSON.
//!
//! # Example
//!
//! ```rust,no_run
//! use coilcad::{generate_from_raw, RawParameters, TitleBlockInfo};
//!
//! let mut raw = RawParameters::default();
//! raw.no_of_rows = 4;
//! let drawing = generate_from_raw(&raw, &TitleBlockInfo::default()).unwrap();
//! println!("{}", drawing.sheet.title);
//! drawing.write_dxf("coil.dxf").unwrap();
//! ```

use std::path::Path;

use serde::Serialize;

pub mod config;
pub mod export;

pub use coilcad_drafting::{
    BoundingBox2D, DimensionAnnotation, DrawingSink, Layer, Point2D, Primitive, Shape, Sheet,
    TitleBlockInfo, View, ViewKind,
};
pub use coilcad_params::{
    CoilParameters, ConnectionSide, Field, ParamError, RawParameters, Rule, ValidationError,
    Violation,
};
pub use config::{ConfigError, DrawingConfig};
pub use export::{export_sheet, ExportError, ExportFormat};

/// A generated drawing: the parameters it came from and the finished sheet.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Drawing {
    /// Validated parameters.
    pub params: CoilParameters,
    /// The laid-out sheet.
    pub sheet: Sheet,
}

impl Drawing {
    /// Write the sheet as DXF.
    pub fn write_dxf(&self, path: impl AsRef<Path>) -> Result<(), ExportError> {
        export_sheet(&self.sheet, path, ExportFormat::Dxf)
    }

    /// Write the sheet as SVG.
    pub fn write_svg(&self, path: impl AsRef<Path>) -> Result<(), ExportError> {
        export_sheet(&self.sheet, path, ExportFormat::Svg)
    }

    /// Write in the format implied by the file extension.
    pub fn write(&self, path: impl AsRef<Path>) -> Result<(), ExportError> {
        let path = path.as_ref();
        export_sheet(&self.sheet, path, ExportFormat::from_path(path)?)
    }

    /// SVG document text.
    pub fn to_svg(&self) -> Result<String, ExportError> {
        Ok(export::render_svg(&self.sheet)?)
    }

    /// Parameters and sheet as pretty JSON.
    pub fn to_json(&self) -> Result<String, ExportError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Run the drawing pipeline for validated parameters.
pub fn generate(params: &CoilParameters, info: &TitleBlockInfo) -> Drawing {
    let _span = tracing::debug_span!("generate", title = params.drawing_title()).entered();

    let front = coilcad_drafting::annotate(params, ViewKind::Front);
    let top = coilcad_drafting::annotate(params, ViewKind::Top);
    let header = coilcad_drafting::annotate(params, ViewKind::Header);
    let ret = coilcad_drafting::annotate(params, ViewKind::Return);
    tracing::debug!(
        primitives = front.view.primitives.len()
            + top.view.primitives.len()
            + header.view.primitives.len()
            + ret.view.primitives.len(),
        "views generated"
    );

    let sheet = coilcad_drafting::assemble(front, top, header, ret, params, info);
    tracing::debug!(
        width = sheet.bounds.width(),
        height = sheet.bounds.height(),
        "sheet assembled"
    );

    Drawing {
        params: params.clone(),
        sheet,
    }
}

/// Validate raw parameters, then generate.
pub fn generate_from_raw(
    raw: &RawParameters,
    info: &TitleBlockInfo,
) -> Result<Drawing, ValidationError> {
    let params = raw.validate()?;
    Ok(generate(&params, info))
}

/// Regenerates on every parameter change, keeping the last valid drawing
/// when a change is rejected.
#[derive(Debug, Clone, Default)]
pub struct DrawingSession {
    info: TitleBlockInfo,
    current: Option<Drawing>,
}

impl DrawingSession {
    /// Session with no drawing yet.
    pub fn new(info: TitleBlockInfo) -> Self {
        Self {
            info,
            current: None,
        }
    }

    /// Validate and redraw. On rejection the previous drawing stays current.
    pub fn regenerate(&mut self, raw: &RawParameters) -> Result<&Drawing, ValidationError> {
        match raw.validate() {
            Ok(params) => {
                let drawing = generate(&params, &self.info);
                Ok(self.current.insert(drawing))
            }
            Err(err) => {
                tracing::warn!(violations = err.violations().len(), "parameters rejected: {err}");
                Err(err)
            }
        }
    }

    /// The last successfully generated drawing.
    pub fn current(&self) -> Option<&Drawing> {
        self.current.as_ref()
    }

    /// Title block used for every redraw.
    pub fn title_block(&self) -> &TitleBlockInfo {
        &self.info
    }
}
