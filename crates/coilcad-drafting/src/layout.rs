//! Sheet layout in third-angle projection.
//!
//! ```text
//!                   TOP
//!   HEADER  |  FRONT  |  RETURN
//!   NOTES                TITLE BLOCK
//! ```
//!
//! The header, front and return views share one vertical offset so their
//! geometry lines up, and the top view shares the front view's horizontal
//! offset. Spacing between neighbours is [`VIEW_GAP`] measured between full
//! extents (geometry, dimensions, labels and caption).

use coilcad_params::CoilParameters;
use nalgebra::Translation2;
use serde::{Deserialize, Serialize};

use crate::blocks::{generate_notes, generate_title_block, Block, TitleBlockInfo};
use crate::dimension::DimensionAnnotation;
use crate::types::{BoundingBox2D, Layer, Point2D, Primitive, TextAlign, TextLabel, View, ViewKind};

/// Gap between neighbouring views and blocks (mm).
pub const VIEW_GAP: f64 = 80.0;
/// Margin added around everything on the sheet (mm).
pub const SHEET_MARGIN: f64 = 20.0;
/// View caption text height (mm).
pub const CAPTION_HEIGHT: f64 = 5.0;
/// Gap between a view's extent and its caption (mm).
pub const CAPTION_GAP: f64 = 10.0;

/// A view together with its dimensions, still in the view's local frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotatedView {
    /// The view geometry.
    pub view: View,
    /// Its dimensions.
    pub dimensions: Vec<DimensionAnnotation>,
}

/// A view placed on the sheet. Content stays in local coordinates; `offset`
/// maps it into sheet space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacedView {
    /// The view geometry.
    pub view: View,
    /// Its dimensions.
    pub dimensions: Vec<DimensionAnnotation>,
    /// Caption below the view.
    pub caption: TextLabel,
    /// Local-to-sheet offset.
    pub offset: Point2D,
}

impl PlacedView {
    fn unplaced(annotated: AnnotatedView) -> Self {
        let AnnotatedView { view, dimensions } = annotated;
        let mut ext = view.extent();
        for dim in &dimensions {
            ext.include_box(&dim.bounds());
        }
        let caption = TextLabel::new(
            Point2D::new(ext.center().x, ext.min_y - CAPTION_GAP - CAPTION_HEIGHT),
            view.kind.caption(),
            CAPTION_HEIGHT,
        )
        .aligned(TextAlign::Center);

        Self {
            view,
            dimensions,
            caption,
            offset: Point2D::ORIGIN,
        }
    }

    /// Which view this is.
    pub fn kind(&self) -> ViewKind {
        self.view.kind
    }

    /// Local-to-sheet translation.
    pub fn translation(&self) -> Translation2<f64> {
        Translation2::new(self.offset.x, self.offset.y)
    }

    /// Extent of everything drawn for this view, in local coordinates.
    pub fn local_extent(&self) -> BoundingBox2D {
        let mut ext = self.view.extent();
        for dim in &self.dimensions {
            ext.include_box(&dim.bounds());
        }
        ext.include_box(&self.caption.bounds());
        ext
    }

    /// Extent in sheet coordinates.
    pub fn extent(&self) -> BoundingBox2D {
        self.local_extent().translated(&self.translation())
    }

    /// Geometry and caption in sheet coordinates.
    pub fn primitives(&self) -> impl Iterator<Item = Primitive> + '_ {
        let t = self.translation();
        self.view
            .primitives
            .iter()
            .map(move |p| p.translated(&t))
            .chain(std::iter::once(
                Primitive::text(Layer::Label, self.caption.clone()).translated(&t),
            ))
    }

    /// Dimensions in sheet coordinates.
    pub fn world_dimensions(&self) -> impl Iterator<Item = DimensionAnnotation> + '_ {
        let t = self.translation();
        self.dimensions.iter().map(move |d| d.translated(&t))
    }
}

/// A notes or title block placed on the sheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacedBlock {
    /// Block content in its own frame.
    pub block: Block,
    /// Local-to-sheet offset.
    pub offset: Point2D,
}

impl PlacedBlock {
    /// Local-to-sheet translation.
    pub fn translation(&self) -> Translation2<f64> {
        Translation2::new(self.offset.x, self.offset.y)
    }

    /// Extent in sheet coordinates.
    pub fn extent(&self) -> BoundingBox2D {
        self.block.bounds.translated(&self.translation())
    }

    /// Primitives in sheet coordinates.
    pub fn primitives(&self) -> impl Iterator<Item = Primitive> + '_ {
        let t = self.translation();
        self.block.primitives.iter().map(move |p| p.translated(&t))
    }
}

/// The composed drawing: four placed views, notes, title block and the
/// overall bounding box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sheet {
    /// Drawing title.
    pub title: String,
    /// Views in placement order: header, front, return, top.
    pub views: Vec<PlacedView>,
    /// Notes block.
    pub notes: PlacedBlock,
    /// Title block.
    pub title_block: PlacedBlock,
    /// Union of every extent plus [`SHEET_MARGIN`]. Exporters size their
    /// page from this.
    pub bounds: BoundingBox2D,
}

impl Sheet {
    /// The placed view of the given kind.
    pub fn view(&self, kind: ViewKind) -> Option<&PlacedView> {
        self.views.iter().find(|v| v.kind() == kind)
    }

    /// Every primitive in sheet coordinates: views (with captions), then
    /// notes, then title block.
    pub fn primitives(&self) -> impl Iterator<Item = Primitive> + '_ {
        self.views
            .iter()
            .flat_map(|v| v.primitives())
            .chain(self.notes.primitives())
            .chain(self.title_block.primitives())
    }

    /// Every dimension in sheet coordinates, view by view.
    pub fn dimensions(&self) -> impl Iterator<Item = DimensionAnnotation> + '_ {
        self.views.iter().flat_map(|v| v.world_dimensions())
    }
}

/// Place the four annotated views, the notes block and the title block.
pub fn assemble(
    front: AnnotatedView,
    top: AnnotatedView,
    header: AnnotatedView,
    ret: AnnotatedView,
    params: &CoilParameters,
    info: &TitleBlockInfo,
) -> Sheet {
    for (av, kind) in [
        (&front, ViewKind::Front),
        (&top, ViewKind::Top),
        (&header, ViewKind::Header),
        (&ret, ViewKind::Return),
    ] {
        assert_eq!(av.view.kind, kind, "view passed in the wrong slot");
    }

    let notes = generate_notes(params);
    let title_block = generate_title_block(params, info);
    let blocks_height = notes.bounds.height().max(title_block.bounds.height());

    let mut row = [
        PlacedView::unplaced(header),
        PlacedView::unplaced(front),
        PlacedView::unplaced(ret),
    ];
    let mut top = PlacedView::unplaced(top);

    // Bottom row: one shared Y offset keeps the three views in projection.
    let row_min_y = row
        .iter()
        .map(|v| v.local_extent().min_y)
        .fold(f64::INFINITY, f64::min);
    let row_y = blocks_height + VIEW_GAP - row_min_y;

    let mut cursor = 0.0;
    for view in &mut row {
        let ext = view.local_extent();
        view.offset = Point2D::new(cursor - ext.min_x, row_y);
        cursor += ext.width() + VIEW_GAP;
    }
    let row_right = cursor - VIEW_GAP;
    let row_top = row
        .iter()
        .map(|v| v.extent().max_y)
        .fold(f64::NEG_INFINITY, f64::max);

    // Top view sits above, aligned with the front view.
    let front_x = row[1].offset.x;
    top.offset = Point2D::new(front_x, row_top + VIEW_GAP - top.local_extent().min_y);

    let notes = PlacedBlock {
        offset: Point2D::new(-notes.bounds.min_x, -notes.bounds.min_y),
        block: notes,
    };
    let notes_right = notes.extent().max_x;
    let title_x = (row_right - title_block.bounds.width()).max(notes_right + VIEW_GAP);
    let title_block = PlacedBlock {
        offset: Point2D::new(
            title_x - title_block.bounds.min_x,
            -title_block.bounds.min_y,
        ),
        block: title_block,
    };

    let views: Vec<PlacedView> = row.into_iter().chain(std::iter::once(top)).collect();

    let mut bounds = BoundingBox2D::empty();
    for v in &views {
        bounds.include_box(&v.extent());
    }
    bounds.include_box(&notes.extent());
    bounds.include_box(&title_block.extent());

    Sheet {
        title: params.drawing_title().to_string(),
        views,
        notes,
        title_block,
        bounds: bounds.expanded(SHEET_MARGIN),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw_sheet;
    use coilcad_params::RawParameters;

    fn sheet_for(side: &str) -> Sheet {
        let mut raw = RawParameters::default();
        raw.connection_side = side.to_string();
        draw_sheet(&raw.validate().unwrap(), &TitleBlockInfo::default())
    }

    #[test]
    fn test_projection_alignment() {
        let sheet = sheet_for("LHS");
        let header = sheet.view(ViewKind::Header).unwrap();
        let front = sheet.view(ViewKind::Front).unwrap();
        let ret = sheet.view(ViewKind::Return).unwrap();
        let top = sheet.view(ViewKind::Top).unwrap();

        assert_eq!(header.offset.y, front.offset.y);
        assert_eq!(ret.offset.y, front.offset.y);
        assert_eq!(top.offset.x, front.offset.x);

        assert!(header.extent().max_x + VIEW_GAP <= front.extent().min_x + 1e-9);
        assert!(front.extent().max_x + VIEW_GAP <= ret.extent().min_x + 1e-9);
        assert!(top.extent().min_y >= front.extent().max_y + VIEW_GAP - 1e-9);
    }

    #[test]
    fn test_nothing_overlaps() {
        for side in ["LHS", "RHS"] {
            let sheet = sheet_for(side);
            let mut extents: Vec<BoundingBox2D> = sheet.views.iter().map(|v| v.extent()).collect();
            extents.push(sheet.notes.extent());
            extents.push(sheet.title_block.extent());
            for (i, a) in extents.iter().enumerate() {
                for b in &extents[i + 1..] {
                    assert!(!a.overlaps(b), "{side}: {a:?} overlaps {b:?}");
                }
            }
        }
    }

    #[test]
    fn test_blocks_sit_below_the_views() {
        let sheet = sheet_for("LHS");
        let notes = sheet.notes.extent();
        let title = sheet.title_block.extent();
        assert_eq!(notes.min_x, 0.0);
        assert_eq!(notes.min_y, 0.0);
        let row_right = sheet.view(ViewKind::Return).unwrap().extent().max_x;
        assert!((title.max_x - row_right).abs() < 1e-9);
        for v in &sheet.views {
            assert!(v.extent().min_y >= notes.max_y.max(title.max_y) + VIEW_GAP - 1e-9);
        }
    }

    #[test]
    fn test_bounds_cover_everything_with_margin() {
        let sheet = sheet_for("RHS");
        let mut all = BoundingBox2D::empty();
        for p in sheet.primitives() {
            all.include_box(&p.bounds());
        }
        for d in sheet.dimensions() {
            all.include_box(&d.bounds());
        }
        assert!((sheet.bounds.min_x - (all.min_x - SHEET_MARGIN)).abs() < 1e-9);
        assert!((sheet.bounds.min_y - (all.min_y - SHEET_MARGIN)).abs() < 1e-9);
        assert!((sheet.bounds.max_x - (all.max_x + SHEET_MARGIN)).abs() < 1e-9);
        assert!((sheet.bounds.max_y - (all.max_y + SHEET_MARGIN)).abs() < 1e-9);
    }

    #[test]
    fn test_captions() {
        let sheet = sheet_for("LHS");
        let captions: Vec<String> = sheet.views.iter().map(|v| v.caption.text.clone()).collect();
        assert_eq!(
            captions,
            ["HEADER SIDE VIEW", "FRONT VIEW", "RETURN END SIDE VIEW", "TOP VIEW"]
        );
    }

    #[test]
    #[should_panic(expected = "wrong slot")]
    fn test_swapped_views_panic() {
        let params = RawParameters::default().validate().unwrap();
        let a = crate::annotate(&params, ViewKind::Front);
        let b = crate::annotate(&params, ViewKind::Top);
        let c = crate::annotate(&params, ViewKind::Header);
        let d = crate::annotate(&params, ViewKind::Return);
        assemble(b, a, c, d, &params, &TitleBlockInfo::default());
    }
}
