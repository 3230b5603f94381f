//! DXF export for coil drawing sheets.
//!
//! Writes ASCII DXF R12 in millimetres. Every primitive lands on the layer
//! named after its [`Layer`] tag, coloured from a fixed table so the file
//! opens in third-party CAD tools with the same grouping as the on-screen
//! drawing:
//!
//! | Layer | ACI colour |
//! |-------|------------|
//! | CASING | 1 (red) |
//! | COIL | 7 (white/black) |
//! | TUBES | 3 (green) |
//! | BENDS | 6 (magenta) |
//! | FINS | 8 (grey) |
//! | PLATES | 5 (blue) |
//! | PIPES | 7 |
//! | LABELS | 2 (yellow) |
//! | DIMS | 4 (cyan) |
//! | NOTES | 2 |
//! | TITLEBLOCK | 7 |
//!
//! The header carries `$EXTMIN/$EXTMAX` and `$LIMMIN/$LIMMAX` taken from the
//! sheet bounding box.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use coilcad_drafting::{
    BoundingBox2D, DimensionAnnotation, DrawingSink, Layer, Point2D, Primitive, Shape, TextAlign,
    TextLabel,
};

/// AutoCAD colour index for a layer.
pub fn layer_color(layer: Layer) -> u8 {
    match layer {
        Layer::Casing => 1,
        Layer::Coil => 7,
        Layer::Tube => 3,
        Layer::Bend => 6,
        Layer::Fin => 8,
        Layer::Plate => 5,
        Layer::Pipe => 7,
        Layer::Label => 2,
        Layer::Dimension => 4,
        Layer::Note => 2,
        Layer::TitleBlock => 7,
    }
}

/// Streaming DXF writer. Feed it a sheet with
/// [`Sheet::visit`](coilcad_drafting::Sheet::visit).
pub struct DxfWriter<W: Write> {
    writer: W,
    entities: usize,
}

impl<W: Write> DxfWriter<W> {
    /// Wrap a writer.
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            entities: 0,
        }
    }

    /// Number of entities written so far.
    pub fn num_entities(&self) -> usize {
        self.entities
    }

    /// Give back the inner writer.
    pub fn into_inner(self) -> W {
        self.writer
    }

    fn write_header(&mut self, bounds: &BoundingBox2D) -> std::io::Result<()> {
        let w = &mut self.writer;
        writeln!(w, "0")?;
        writeln!(w, "SECTION")?;
        writeln!(w, "2")?;
        writeln!(w, "HEADER")?;

        // AutoCAD version
        writeln!(w, "9")?;
        writeln!(w, "$ACADVER")?;
        writeln!(w, "1")?;
        writeln!(w, "AC1009")?; // DXF R12

        // Units = millimeters
        writeln!(w, "9")?;
        writeln!(w, "$INSUNITS")?;
        writeln!(w, "70")?;
        writeln!(w, "4")?;

        for (name, p) in [
            ("$EXTMIN", bounds.min()),
            ("$EXTMAX", bounds.max()),
            ("$LIMMIN", bounds.min()),
            ("$LIMMAX", bounds.max()),
        ] {
            writeln!(w, "9")?;
            writeln!(w, "{name}")?;
            writeln!(w, "10")?;
            writeln!(w, "{:.6}", p.x)?;
            writeln!(w, "20")?;
            writeln!(w, "{:.6}", p.y)?;
        }

        writeln!(w, "0")?;
        writeln!(w, "ENDSEC")?;
        Ok(())
    }

    fn write_tables(&mut self) -> std::io::Result<()> {
        let w = &mut self.writer;
        writeln!(w, "0")?;
        writeln!(w, "SECTION")?;
        writeln!(w, "2")?;
        writeln!(w, "TABLES")?;

        // Linetype table
        writeln!(w, "0")?;
        writeln!(w, "TABLE")?;
        writeln!(w, "2")?;
        writeln!(w, "LTYPE")?;
        writeln!(w, "70")?;
        writeln!(w, "1")?;
        writeln!(w, "0")?;
        writeln!(w, "LTYPE")?;
        writeln!(w, "2")?;
        writeln!(w, "CONTINUOUS")?;
        writeln!(w, "70")?;
        writeln!(w, "0")?;
        writeln!(w, "3")?;
        writeln!(w, "Solid line")?;
        writeln!(w, "72")?;
        writeln!(w, "65")?;
        writeln!(w, "73")?;
        writeln!(w, "0")?;
        writeln!(w, "40")?;
        writeln!(w, "0.0")?;
        writeln!(w, "0")?;
        writeln!(w, "ENDTAB")?;

        // Layer table
        writeln!(w, "0")?;
        writeln!(w, "TABLE")?;
        writeln!(w, "2")?;
        writeln!(w, "LAYER")?;
        writeln!(w, "70")?;
        writeln!(w, "{}", Layer::ALL.len())?;
        for layer in Layer::ALL {
            writeln!(w, "0")?;
            writeln!(w, "LAYER")?;
            writeln!(w, "2")?;
            writeln!(w, "{}", layer.name())?;
            writeln!(w, "70")?;
            writeln!(w, "0")?;
            writeln!(w, "62")?;
            writeln!(w, "{}", layer_color(layer))?;
            writeln!(w, "6")?;
            writeln!(w, "CONTINUOUS")?;
        }
        writeln!(w, "0")?;
        writeln!(w, "ENDTAB")?;

        writeln!(w, "0")?;
        writeln!(w, "ENDSEC")?;
        Ok(())
    }

    fn write_line(&mut self, layer: Layer, start: Point2D, end: Point2D) -> std::io::Result<()> {
        self.entities += 1;
        let w = &mut self.writer;
        writeln!(w, "0")?;
        writeln!(w, "LINE")?;
        writeln!(w, "8")?;
        writeln!(w, "{}", layer.name())?;
        writeln!(w, "10")?;
        writeln!(w, "{:.6}", start.x)?;
        writeln!(w, "20")?;
        writeln!(w, "{:.6}", start.y)?;
        writeln!(w, "11")?;
        writeln!(w, "{:.6}", end.x)?;
        writeln!(w, "21")?;
        writeln!(w, "{:.6}", end.y)?;
        Ok(())
    }

    fn write_rect(
        &mut self,
        layer: Layer,
        origin: Point2D,
        width: f64,
        height: f64,
    ) -> std::io::Result<()> {
        self.entities += 1;
        let (x1, y1) = (origin.x, origin.y);
        let (x2, y2) = (origin.x + width, origin.y + height);
        let w = &mut self.writer;

        // LWPOLYLINE (lightweight polyline)
        writeln!(w, "0")?;
        writeln!(w, "LWPOLYLINE")?;
        writeln!(w, "8")?;
        writeln!(w, "{}", layer.name())?;
        writeln!(w, "90")?;
        writeln!(w, "4")?; // 4 vertices
        writeln!(w, "70")?;
        writeln!(w, "1")?; // Closed polyline
        for (x, y) in [(x1, y1), (x2, y1), (x2, y2), (x1, y2)] {
            writeln!(w, "10")?;
            writeln!(w, "{:.6}", x)?;
            writeln!(w, "20")?;
            writeln!(w, "{:.6}", y)?;
        }
        Ok(())
    }

    fn write_circle(&mut self, layer: Layer, center: Point2D, radius: f64) -> std::io::Result<()> {
        self.entities += 1;
        let w = &mut self.writer;
        writeln!(w, "0")?;
        writeln!(w, "CIRCLE")?;
        writeln!(w, "8")?;
        writeln!(w, "{}", layer.name())?;
        writeln!(w, "10")?;
        writeln!(w, "{:.6}", center.x)?;
        writeln!(w, "20")?;
        writeln!(w, "{:.6}", center.y)?;
        writeln!(w, "40")?;
        writeln!(w, "{:.6}", radius)?;
        Ok(())
    }

    fn write_arc(
        &mut self,
        layer: Layer,
        center: Point2D,
        radius: f64,
        start_angle: f64,
        end_angle: f64,
    ) -> std::io::Result<()> {
        self.entities += 1;
        let w = &mut self.writer;
        writeln!(w, "0")?;
        writeln!(w, "ARC")?;
        writeln!(w, "8")?;
        writeln!(w, "{}", layer.name())?;
        writeln!(w, "10")?;
        writeln!(w, "{:.6}", center.x)?;
        writeln!(w, "20")?;
        writeln!(w, "{:.6}", center.y)?;
        writeln!(w, "40")?;
        writeln!(w, "{:.6}", radius)?;
        writeln!(w, "50")?;
        writeln!(w, "{:.6}", start_angle.rem_euclid(360.0))?;
        writeln!(w, "51")?;
        writeln!(w, "{:.6}", end_angle.rem_euclid(360.0))?;
        Ok(())
    }

    fn write_text(&mut self, layer: Layer, label: &TextLabel) -> std::io::Result<()> {
        self.entities += 1;
        let halign = match label.align {
            TextAlign::Left => 0,
            TextAlign::Center => 1,
            TextAlign::Right => 2,
        };
        let w = &mut self.writer;
        writeln!(w, "0")?;
        writeln!(w, "TEXT")?;
        writeln!(w, "8")?;
        writeln!(w, "{}", layer.name())?;
        writeln!(w, "10")?;
        writeln!(w, "{:.6}", label.anchor.x)?;
        writeln!(w, "20")?;
        writeln!(w, "{:.6}", label.anchor.y)?;
        writeln!(w, "40")?;
        writeln!(w, "{:.6}", label.height)?;
        writeln!(w, "1")?;
        writeln!(w, "{}", dxf_text(&label.text))?;
        if label.rotation != 0.0 {
            writeln!(w, "50")?;
            writeln!(w, "{:.6}", label.rotation)?;
        }
        if halign != 0 {
            // Justified text is positioned by the second alignment point.
            writeln!(w, "72")?;
            writeln!(w, "{halign}")?;
            writeln!(w, "11")?;
            writeln!(w, "{:.6}", label.anchor.x)?;
            writeln!(w, "21")?;
            writeln!(w, "{:.6}", label.anchor.y)?;
        }
        Ok(())
    }
}

/// R12 has no Unicode; use the control codes AutoCAD understands.
fn dxf_text(text: &str) -> String {
    text.replace('\u{b1}', "%%p").replace('\u{b0}', "%%d")
}

impl<W: Write> DrawingSink for DxfWriter<W> {
    type Error = std::io::Error;

    fn begin(&mut self, bounds: &BoundingBox2D) -> std::io::Result<()> {
        self.write_header(bounds)?;
        self.write_tables()?;
        writeln!(self.writer, "0")?;
        writeln!(self.writer, "SECTION")?;
        writeln!(self.writer, "2")?;
        writeln!(self.writer, "ENTITIES")?;
        Ok(())
    }

    fn primitive(&mut self, primitive: &Primitive) -> std::io::Result<()> {
        let layer = primitive.layer;
        match &primitive.shape {
            Shape::Rect {
                origin,
                width,
                height,
            } => self.write_rect(layer, *origin, *width, *height),
            Shape::Circle { center, radius } => self.write_circle(layer, *center, *radius),
            Shape::Line { start, end } => self.write_line(layer, *start, *end),
            Shape::Arc {
                center,
                radius,
                start_angle,
                end_angle,
            } => self.write_arc(layer, *center, *radius, *start_angle, *end_angle),
            Shape::Text(label) => self.write_text(layer, label),
        }
    }

    fn dimension(&mut self, dim: &DimensionAnnotation) -> std::io::Result<()> {
        let layer = Layer::Dimension;
        for ext in &dim.extension_lines {
            self.write_line(layer, ext.start, ext.end)?;
        }
        self.write_line(layer, dim.dimension_line.start, dim.dimension_line.end)?;
        for arrow in &dim.arrows {
            for wing in arrow.wings() {
                self.write_line(layer, wing.start, wing.end)?;
            }
        }
        self.write_text(layer, &dim.label)
    }

    fn end(&mut self) -> std::io::Result<()> {
        writeln!(self.writer, "0")?;
        writeln!(self.writer, "ENDSEC")?;

        // End of file
        writeln!(self.writer, "0")?;
        writeln!(self.writer, "EOF")?;
        self.writer.flush()
    }
}

/// Export a sheet to a DXF file.
pub fn export_dxf(sheet: &coilcad_drafting::Sheet, path: impl AsRef<Path>) -> std::io::Result<()> {
    let file = File::create(path)?;
    export_dxf_to_writer(sheet, BufWriter::new(file))
}

/// Export a sheet to any writer.
pub fn export_dxf_to_writer(
    sheet: &coilcad_drafting::Sheet,
    writer: impl Write,
) -> std::io::Result<()> {
    let mut dxf = DxfWriter::new(writer);
    sheet.visit(&mut dxf)?;
    tracing::debug!(entities = dxf.num_entities(), "wrote DXF entities");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use coilcad_drafting::{draw_sheet, TitleBlockInfo};
    use coilcad_params::RawParameters;
    use std::fs;

    fn sheet() -> coilcad_drafting::Sheet {
        let params = RawParameters::default().validate().unwrap();
        draw_sheet(&params, &TitleBlockInfo::default())
    }

    fn to_string(sheet: &coilcad_drafting::Sheet) -> String {
        let mut buf = Vec::new();
        export_dxf_to_writer(sheet, &mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_dxf_structure_and_layers() {
        let content = to_string(&sheet());

        assert!(content.starts_with("0\nSECTION\n2\nHEADER\n"));
        assert!(content.contains("AC1009"));
        assert!(content.contains("TABLES"));
        assert!(content.contains("ENTITIES"));
        assert!(content.ends_with("0\nEOF\n"));

        for layer in Layer::ALL {
            let entry = format!("0\nLAYER\n2\n{}\n70\n0\n62\n{}\n", layer.name(), layer_color(layer));
            assert!(content.contains(&entry), "missing layer entry for {}", layer.name());
        }
    }

    #[test]
    fn test_dxf_extents_match_sheet_bounds() {
        let sheet = sheet();
        let content = to_string(&sheet);
        let expected = format!(
            "9\n$EXTMAX\n10\n{:.6}\n20\n{:.6}\n",
            sheet.bounds.max_x, sheet.bounds.max_y
        );
        assert!(content.contains(&expected));
        assert!(content.contains("$LIMMIN"));
    }

    #[test]
    fn test_dxf_entity_counts() {
        let sheet = sheet();
        let content = to_string(&sheet);
        let circles = content.matches("0\nCIRCLE\n8\nTUBES\n").count();
        assert_eq!(circles, 420);
        assert_eq!(content.matches("0\nARC\n8\nBENDS\n").count(), 3);
        assert!(content.contains("GENERAL TOLERANCE : %%p2MM"));
        assert!(content.contains(&sheet.title));
    }

    #[test]
    fn test_dxf_file_export() {
        let path = "/tmp/test_coil_sheet.dxf";
        export_dxf(&sheet(), path).unwrap();
        let content = fs::read_to_string(path).unwrap();
        assert!(content.contains("LWPOLYLINE"));
        assert!(content.contains("EOF"));
    }
}
