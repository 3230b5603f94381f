#![warn(missing_docs)]

//! Parameter model for finned-tube coil drawings.
//!
//! Input arrives as [`RawParameters`] (from a form, a TOML file or
//! `key=value` overrides) and is turned into an immutable
//! [`CoilParameters`] by [`validate`]. Every later drawing stage reads the
//! validated set, so the coil invariants hold everywhere downstream:
//!
//! - all lengths are strictly positive
//! - `no_of_rows >= 1`, `tubes_per_row >= 2`, `fpi >= 1`, `no_of_circuits >= 1`
//! - `top_plate + bottom_plate < fin_height`
//! - the tube field fits inside both end plates
//!
//! # Example
//!
//! ```
//! use coilcad_params::{validate, RawParameters};
//!
//! let mut raw = RawParameters::default();
//! raw.set("no_of_rows", "4").unwrap();
//! let params = validate(&raw).unwrap();
//! assert_eq!(params.row_pitch(), 207.6 / 4.0);
//! ```

pub mod error;
mod params;
mod raw;
pub mod tube;

pub use error::{Field, ParamError, Result, Rule, ValidationError, Violation};
pub use params::{
    validate, CoilParameters, ConnectionSide, MAX_CIRCUITS, MAX_FPI, MAX_ROWS, MAX_TUBES,
    MAX_TUBES_PER_ROW,
};
pub use raw::RawParameters;
