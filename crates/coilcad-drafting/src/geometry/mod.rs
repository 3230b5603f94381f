//! Geometry generators, one per view.
//!
//! Each generator is a pure function of the validated parameters. All views
//! use a Y-up local frame with the origin at the bottom-left corner of the
//! primary outline (casing for front and top, end plate for header and
//! return). Features such as connection pipes may extend past it.

mod front;
mod side;
mod top;

pub use front::{fin_sample_positions, generate_front_geometry, MAX_FIN_SAMPLES};
pub use side::{generate_header_geometry, generate_return_geometry, TubeField};
pub use top::{generate_top_geometry, ConnectionPipe, TopLayout};

/// Height of in-view labels such as `13 FPI` and `IN`/`OUT` (mm).
pub const LABEL_HEIGHT: f64 = 4.0;
