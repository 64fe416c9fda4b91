//! Gaussian grids.
//!
//! Rows sit on the Gaussian quadrature latitudes of a spectral model with
//! Gaussian number N (2N rows, symmetric about the equator). The regular
//! variant has 4N columns in every row; the reduced variant thins the rows
//! towards the poles. Longitudes start at 0°E and cell centers are the grid
//! points themselves, so center coordinates come straight from the row table.

pub mod quadrature;
mod reduced;
mod regular;
mod table;

pub use reduced::ReducedGaussianGrid;
pub use regular::RegularGaussianGrid;
pub use table::{gaussian_number, GaussianRowTable, SUPPORTED_N};

/// Longitude sample in [0, 360) reported as a center longitude in [-180, 180).
#[inline]
pub(crate) fn signed_lon(lon: f64) -> f64 {
    if lon >= 180.0 {
        lon - 360.0
    } else {
        lon
    }
}
