//! Sheet exporters: DXF drawing files, SVG print documents and JSON.
//!
//! Exporters are [`DrawingSink`](coilcad_drafting::DrawingSink)s; they read
//! the sheet and never change it.

pub mod dxf;
pub mod svg;

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use coilcad_drafting::Sheet;
use thiserror::Error;

pub use dxf::{export_dxf, export_dxf_to_writer, layer_color, DxfWriter};
pub use svg::{render_svg, SvgWriter};

/// Errors raised while exporting a sheet.
#[derive(Error, Debug)]
pub enum ExportError {
    /// An I/O error occurred during export.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// SVG text could not be formatted.
    #[error("SVG formatting error")]
    Svg(#[from] std::fmt::Error),

    /// The output path has no recognised extension.
    #[error("unsupported output format `{0}` (expected .dxf, .svg or .json)")]
    UnsupportedFormat(String),
}

/// Output formats, chosen by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// DXF R12 drawing file.
    Dxf,
    /// SVG print document.
    Svg,
    /// The sheet as JSON.
    Json,
}

impl ExportFormat {
    /// Format for a path, from its extension (case-insensitive).
    pub fn from_path(path: &Path) -> Result<Self, ExportError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        match ext.as_str() {
            "dxf" => Ok(ExportFormat::Dxf),
            "svg" => Ok(ExportFormat::Svg),
            "json" => Ok(ExportFormat::Json),
            _ => Err(ExportError::UnsupportedFormat(path.display().to_string())),
        }
    }

    /// Conventional file extension.
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Dxf => "dxf",
            ExportFormat::Svg => "svg",
            ExportFormat::Json => "json",
        }
    }
}

/// Write `sheet` to `path` in `format`.
pub fn export_sheet(sheet: &Sheet, path: impl AsRef<Path>, format: ExportFormat) -> Result<(), ExportError> {
    let path = path.as_ref();
    match format {
        ExportFormat::Dxf => export_dxf(sheet, path)?,
        ExportFormat::Svg => {
            let text = render_svg(sheet)?;
            std::fs::write(path, text)?;
        }
        ExportFormat::Json => {
            let mut writer = BufWriter::new(File::create(path)?);
            serde_json::to_writer_pretty(&mut writer, sheet)?;
            writer.flush()?;
        }
    }
    tracing::info!(path = %path.display(), ?format, "exported sheet");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_extension() {
        assert_eq!(ExportFormat::from_path(Path::new("a.DXF")).unwrap(), ExportFormat::Dxf);
        assert_eq!(ExportFormat::from_path(Path::new("a/b.svg")).unwrap(), ExportFormat::Svg);
        assert_eq!(ExportFormat::from_path(Path::new("c.json")).unwrap(), ExportFormat::Json);
        assert!(matches!(
            ExportFormat::from_path(Path::new("drawing.pdf")),
            Err(ExportError::UnsupportedFormat(_))
        ));
        assert!(ExportFormat::from_path(Path::new("noext")).is_err());
    }
}
