//! Read-only consumers of a finished sheet.

use crate::dimension::DimensionAnnotation;
use crate::layout::Sheet;
use crate::types::{BoundingBox2D, Primitive};

/// Something that draws or writes a sheet: a renderer or a file exporter.
///
/// Sinks receive sheet-space copies and never feed back into the sheet.
pub trait DrawingSink {
    /// Error raised by the sink.
    type Error;

    /// Called once before anything else with the sheet bounding box.
    fn begin(&mut self, bounds: &BoundingBox2D) -> Result<(), Self::Error>;

    /// One primitive.
    fn primitive(&mut self, primitive: &Primitive) -> Result<(), Self::Error>;

    /// One dimension annotation.
    fn dimension(&mut self, dimension: &DimensionAnnotation) -> Result<(), Self::Error>;

    /// Called once after everything else.
    fn end(&mut self) -> Result<(), Self::Error>;
}

impl Sheet {
    /// Feed the whole sheet to `sink` in a fixed order: each view's geometry,
    /// caption and dimensions, then the notes, then the title block.
    pub fn visit<S: DrawingSink>(&self, sink: &mut S) -> Result<(), S::Error> {
        sink.begin(&self.bounds)?;
        for view in &self.views {
            for p in view.primitives() {
                sink.primitive(&p)?;
            }
            for d in view.world_dimensions() {
                sink.dimension(&d)?;
            }
        }
        for p in self.notes.primitives().chain(self.title_block.primitives()) {
            sink.primitive(&p)?;
        }
        sink.end()
    }
}
