#![warn(missing_docs)]

//! 2D drafting for finned-tube coil drawings.
//!
//! This crate turns validated [`CoilParameters`] into a complete drawing
//! sheet:
//!
//! - **Geometry**: front, top, header and return views as tagged primitives
//! - **Dimensions**: tiered linear dimensions placed outside each view
//! - **Blocks**: manufacturing notes and the title block
//! - **Layout**: third-angle arrangement of everything on one [`Sheet`]
//! - **Sinks**: the [`DrawingSink`] seam renderers and exporters implement
//!
//! Every stage is a pure function of its inputs.
//!
//! # Example
//!
//! ```
//! use coilcad_drafting::{draw_sheet, TitleBlockInfo, ViewKind};
//! use coilcad_params::RawParameters;
//!
//! let params = RawParameters::default().validate().unwrap();
//! let sheet = draw_sheet(&params, &TitleBlockInfo::default());
//!
//! let header = sheet.view(ViewKind::Header).unwrap();
//! println!("header view at ({}, {})", header.offset.x, header.offset.y);
//! for dim in sheet.dimensions() {
//!     println!("{}", dim.label.text);
//! }
//! ```

pub mod blocks;
pub mod dimension;
pub mod geometry;
pub mod layout;
pub mod sink;
pub mod types;

pub use blocks::{generate_notes, generate_title_block, Block, TitleBlockInfo};
pub use dimension::{
    generate_front_dimensions, generate_header_dimensions, generate_return_dimensions,
    generate_top_dimensions, Arrowhead, DimensionAnnotation, Segment, Side,
};
pub use geometry::{
    generate_front_geometry, generate_header_geometry, generate_return_geometry,
    generate_top_geometry,
};
pub use layout::{assemble, AnnotatedView, PlacedBlock, PlacedView, Sheet};
pub use sink::DrawingSink;
pub use types::{BoundingBox2D, Layer, Point2D, Primitive, Shape, TextAlign, TextLabel, View, ViewKind};

use coilcad_params::CoilParameters;

/// Geometry and dimensions for one view.
pub fn annotate(params: &CoilParameters, kind: ViewKind) -> AnnotatedView {
    let view = match kind {
        ViewKind::Front => generate_front_geometry(params),
        ViewKind::Top => generate_top_geometry(params),
        ViewKind::Header => generate_header_geometry(params),
        ViewKind::Return => generate_return_geometry(params),
    };
    let dimensions = match kind {
        ViewKind::Front => generate_front_dimensions(params, &view),
        ViewKind::Top => generate_top_dimensions(params, &view),
        ViewKind::Header => generate_header_dimensions(params, &view),
        ViewKind::Return => generate_return_dimensions(params, &view),
    };
    tracing::trace!(
        view = ?kind,
        primitives = view.primitives.len(),
        dimensions = dimensions.len(),
        "annotated view"
    );
    AnnotatedView { view, dimensions }
}

/// Run geometry, dimensions and layout for one parameter set.
pub fn draw_sheet(params: &CoilParameters, info: &TitleBlockInfo) -> Sheet {
    assemble(
        annotate(params, ViewKind::Front),
        annotate(params, ViewKind::Top),
        annotate(params, ViewKind::Header),
        annotate(params, ViewKind::Return),
        params,
        info,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use coilcad_params::RawParameters;

    #[test]
    fn test_full_workflow() {
        let params = RawParameters::default().validate().unwrap();
        let sheet = draw_sheet(&params, &TitleBlockInfo::default());

        assert_eq!(sheet.views.len(), 4);
        assert!(sheet.bounds.is_valid());
        assert_eq!(
            sheet.title,
            "5/8\"x1330FLx1400FHx6Rx35TPRx13FPIx35NC - LHS"
        );

        for kind in [ViewKind::Header, ViewKind::Return] {
            let holes = sheet.view(kind).unwrap().view.on_layer(Layer::Tube).count();
            assert_eq!(holes, 210, "{kind:?}");
        }
    }

    #[test]
    fn test_pipeline_is_deterministic() {
        let params = RawParameters::default().validate().unwrap();
        let info = TitleBlockInfo::default();
        let a = serde_json::to_string(&draw_sheet(&params, &info)).unwrap();
        let b = serde_json::to_string(&draw_sheet(&params, &info)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_minimum_coil() {
        let mut raw = RawParameters::default();
        raw.no_of_rows = 1;
        raw.tubes_per_row = 2;
        raw.fpi = 1;
        let params = raw.validate().unwrap();
        let sheet = draw_sheet(&params, &TitleBlockInfo::default());
        let top = sheet.view(ViewKind::Top).unwrap();
        assert_eq!(top.view.on_layer(Layer::Bend).count(), 0);
        assert_eq!(top.view.on_layer(Layer::Tube).count(), 2);
    }
}
