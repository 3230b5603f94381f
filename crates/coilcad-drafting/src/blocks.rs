//! Notes block and title block.

use coilcad_params::CoilParameters;
use serde::{Deserialize, Serialize};

use crate::types::{BoundingBox2D, Layer, Point2D, Primitive, TextAlign, TextLabel};

/// Title block frame width (mm).
pub const TITLE_BLOCK_WIDTH: f64 = 350.0;
/// Title block frame height (mm).
pub const TITLE_BLOCK_HEIGHT: f64 = 80.0;

const NOTE_HEADING_HEIGHT: f64 = 3.5;
const NOTE_HEIGHT: f64 = 3.0;
const FOOTER_HEIGHT: f64 = 2.5;
const LINE_SPACING: f64 = 6.0;

/// Company and sheet fields printed in the title block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TitleBlockInfo {
    /// Company name.
    pub company_name: String,
    /// Second company line.
    pub company_sub: String,
    /// Tag line.
    pub company_tag: String,
    /// Scale text.
    pub scale: String,
    /// Quantity text.
    pub quantity: String,
}

impl Default for TitleBlockInfo {
    fn default() -> Self {
        Self {
            company_name: "alpine coils".to_string(),
            company_sub: "industry l.l.c".to_string(),
            company_tag: "air cooling experts".to_string(),
            scale: "NTS".to_string(),
            quantity: "1 NO.".to_string(),
        }
    }
}

/// A fixed group of primitives in its own frame, origin bottom-left.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    /// Primitives in draw order.
    pub primitives: Vec<Primitive>,
    /// Extent, text included.
    pub bounds: BoundingBox2D,
}

impl Block {
    fn new(primitives: Vec<Primitive>) -> Self {
        let mut bounds = BoundingBox2D::empty();
        for p in &primitives {
            bounds.include_box(&p.bounds());
        }
        Self { primitives, bounds }
    }

    /// Text of every label, in draw order.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.primitives.iter().filter_map(|p| match &p.shape {
            crate::types::Shape::Text(t) => Some(t.text.as_str()),
            _ => None,
        })
    }
}

/// Manufacturing notes and the standard footer.
pub fn note_lines(params: &CoilParameters) -> (Vec<String>, Vec<&'static str>) {
    let notes = vec![
        "NOTE:".to_string(),
        format!(
            "1. FIN MATERIAL SHOULD BE {} ({}MM THICKNESS) & WITHOUT ANY COATING.",
            params.fin_material().to_uppercase(),
            params.fin_thickness()
        ),
        format!(
            "2. CASING MATERIAL SHOULD BE G.I. - {}MM THICKNESS.",
            params.casing_thickness()
        ),
        format!(
            "3. {}\" COPPER TUBE WALL THICKNESS SHOULD BE {} MM.",
            params.tube_label(),
            params.tube_wall_thickness()
        ),
    ];
    let footer = vec![
        "ALL DIMENSIONS ARE IN MM,",
        "UNLESS OTHERWISE SPECIFIED.",
        "GENERAL TOLERANCE : \u{b1}2MM",
        "THIRD ANGLE PROJECTION",
    ];
    (notes, footer)
}

/// Notes block, laid out top-down and shifted so its bottom sits at y = 0.
pub fn generate_notes(params: &CoilParameters) -> Block {
    let (notes, footer) = note_lines(params);

    let mut rows: Vec<(String, f64)> = Vec::new();
    for (i, line) in notes.into_iter().enumerate() {
        let height = if i == 0 { NOTE_HEADING_HEIGHT } else { NOTE_HEIGHT };
        rows.push((line, height));
    }
    let footer_start = rows.len();
    rows.extend(footer.into_iter().map(|l| (l.to_string(), FOOTER_HEIGHT)));

    // One blank row between the notes and the footer.
    let total_rows = rows.len() + 1;
    let top = (total_rows - 1) as f64 * LINE_SPACING;

    let primitives = rows
        .into_iter()
        .enumerate()
        .map(|(i, (text, height))| {
            let slot = if i >= footer_start { i + 1 } else { i };
            let y = top - slot as f64 * LINE_SPACING;
            Primitive::text(Layer::Note, TextLabel::new(Point2D::new(0.0, y), text, height))
        })
        .collect();

    Block::new(primitives)
}

/// Title block frame, dividers and fields.
pub fn generate_title_block(params: &CoilParameters, info: &TitleBlockInfo) -> Block {
    const W: f64 = TITLE_BLOCK_WIDTH;
    const H: f64 = TITLE_BLOCK_HEIGHT;
    const COMPANY_W: f64 = 120.0;
    const STRIP_H: f64 = 20.0;
    const SCALE_W: f64 = 115.0;

    let line = |x0, y0, x1, y1| {
        Primitive::line(Layer::TitleBlock, Point2D::new(x0, y0), Point2D::new(x1, y1))
    };
    let text = |x, y, s: &str, h, align| {
        Primitive::text(
            Layer::TitleBlock,
            TextLabel::new(Point2D::new(x, y), s, h).aligned(align),
        )
    };

    let company_mid = COMPANY_W / 2.0;
    let title_mid = COMPANY_W + (W - COMPANY_W) / 2.0;

    let primitives = vec![
        Primitive::rect(Layer::TitleBlock, 0.0, 0.0, W, H),
        line(COMPANY_W, 0.0, COMPANY_W, H),
        line(COMPANY_W, STRIP_H, W, STRIP_H),
        line(COMPANY_W + SCALE_W, 0.0, COMPANY_W + SCALE_W, STRIP_H),
        text(company_mid, 50.0, &info.company_name, 5.0, TextAlign::Center),
        text(company_mid, 40.0, &info.company_sub, 3.0, TextAlign::Center),
        text(company_mid, 30.0, &info.company_tag, 2.5, TextAlign::Center),
        text(COMPANY_W + 5.0, H - 10.0, "DRAWING TITLE:", 2.5, TextAlign::Left),
        text(title_mid, 45.0, params.drawing_title(), 3.5, TextAlign::Center),
        text(
            COMPANY_W + 5.0,
            7.5,
            &format!("SCALE: {}", info.scale),
            2.5,
            TextAlign::Left,
        ),
        text(
            COMPANY_W + SCALE_W + 5.0,
            7.5,
            &format!("QTY: {}", info.quantity),
            2.5,
            TextAlign::Left,
        ),
    ];

    Block::new(primitives)
}
