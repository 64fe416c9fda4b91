//! Plate-carrée grid in a rotated-pole coordinate system.

use crate::error::GridResult;
use crate::grid::{GeoPoint, PlanetaryGrid};
use crate::lat_lon::RegularLatLonGrid;
use crate::rotation::PoleRotation;
use tracing::debug;

/// A [`RegularLatLonGrid`] laid out in a rotated coordinate system.
///
/// Coordinates are rotated into the grid's native frame before the lookup,
/// and cell centers are rotated back to geographic coordinates. The row
/// layout is the one of the wrapped grid.
#[derive(Debug, Clone)]
pub struct RotatedLatLonGrid {
    grid: RegularLatLonGrid,
    rotation: PoleRotation,
}

impl RotatedLatLonGrid {
    /// Create a rotated grid with `num_rows` rows whose north pole sits at
    /// (`pole_lat`, `pole_lon`).
    pub fn new(num_rows: usize, pole_lat: f64, pole_lon: f64) -> GridResult<Self> {
        let rotation = PoleRotation::new(pole_lat, pole_lon)?;
        let grid = RegularLatLonGrid::new(num_rows)?;
        debug!(num_rows, pole_lat, pole_lon, "Built rotated plate-carree grid");
        Ok(Self { grid, rotation })
    }

    /// Wrap an existing grid with a rotation.
    pub fn with_rotation(grid: RegularLatLonGrid, rotation: PoleRotation) -> Self {
        Self { grid, rotation }
    }

    pub fn rotation(&self) -> &PoleRotation {
        &self.rotation
    }

    /// The unrotated grid answering the lookups.
    pub fn inner(&self) -> &RegularLatLonGrid {
        &self.grid
    }
}

impl PlanetaryGrid for RotatedLatLonGrid {
    /// The geographic longitude is clamped to [-180, 180] before rotating,
    /// like the unrotated grids.
    fn bin_index(&self, lat: f64, lon: f64) -> u64 {
        let native = self.rotation.rotate(lat, lon.clamp(-180.0, 180.0));
        self.grid.bin_index(native.lat, native.lon)
    }

    fn row_index(&self, bin_index: u64) -> GridResult<usize> {
        self.grid.row_index(bin_index)
    }

    fn num_bins(&self) -> u64 {
        self.grid.num_bins()
    }

    fn num_rows(&self) -> usize {
        self.grid.num_rows()
    }

    fn num_cols(&self, row: usize) -> GridResult<usize> {
        self.grid.num_cols(row)
    }

    fn first_bin_index(&self, row: usize) -> GridResult<u64> {
        self.grid.first_bin_index(row)
    }

    /// Center latitude of a row in the rotated frame.
    fn center_lat(&self, row: usize) -> GridResult<f64> {
        self.grid.center_lat(row)
    }

    fn center_lat_lon(&self, bin_index: u64) -> GridResult<GeoPoint> {
        let native = self.grid.center_lat_lon(bin_index)?;
        Ok(self.rotation.unrotate(native.lat, native.lon))
    }

    fn name(&self) -> &'static str {
        "rotated-plate-carree"
    }
}
