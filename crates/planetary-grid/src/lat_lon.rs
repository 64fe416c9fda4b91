//! Regular plate-carrée grid.
//!
//! Every row has `2 · num_rows` columns, so cells are square in degrees and
//! the row of a bin is a plain division.

use crate::error::GridResult;
use crate::grid::{
    check_bin, check_even_rows, check_row, uniform_center_lat, uniform_center_lon,
    uniform_col_for_lon, uniform_row_for_lat, GeoPoint, PlanetaryGrid,
};
use tracing::debug;

/// Plate-carrée planetary grid with a constant column count.
#[derive(Debug, Clone)]
pub struct RegularLatLonGrid {
    num_rows: usize,
    num_cols: usize,
    num_bins: u64,
}

impl RegularLatLonGrid {
    /// Create a grid with `num_rows` rows and `2 · num_rows` columns.
    pub fn new(num_rows: usize) -> GridResult<Self> {
        check_even_rows("plate-carree grid", num_rows)?;
        let num_cols = 2 * num_rows;
        let num_bins = num_rows as u64 * num_cols as u64;

        debug!(num_rows, num_cols, num_bins, "Built plate-carree grid");

        Ok(Self {
            num_rows,
            num_cols,
            num_bins,
        })
    }

    /// Cell size in degrees.
    pub fn pixel_size(&self) -> f64 {
        360.0 / self.num_cols as f64
    }

    /// Row containing a latitude (clamped to the pole rows).
    pub fn row_index_for_lat(&self, lat: f64) -> usize {
        uniform_row_for_lat(lat, self.num_rows)
    }

    /// Column containing a longitude (clamped to the edge columns).
    pub fn col_index(&self, lon: f64) -> usize {
        uniform_col_for_lon(lon, self.num_cols)
    }

    /// Center longitude of a column.
    pub fn center_lon(&self, col: usize) -> GridResult<f64> {
        check_bin(col as u64, self.num_cols as u64)?;
        Ok(uniform_center_lon(col, self.num_cols))
    }
}

impl PlanetaryGrid for RegularLatLonGrid {
    fn bin_index(&self, lat: f64, lon: f64) -> u64 {
        let row = self.row_index_for_lat(lat) as u64;
        row * self.num_cols as u64 + self.col_index(lon) as u64
    }

    fn row_index(&self, bin_index: u64) -> GridResult<usize> {
        check_bin(bin_index, self.num_bins)?;
        Ok((bin_index / self.num_cols as u64) as usize)
    }

    fn num_bins(&self) -> u64 {
        self.num_bins
    }

    fn num_rows(&self) -> usize {
        self.num_rows
    }

    fn num_cols(&self, row: usize) -> GridResult<usize> {
        check_row(row, self.num_rows)?;
        Ok(self.num_cols)
    }

    fn first_bin_index(&self, row: usize) -> GridResult<u64> {
        check_row(row, self.num_rows)?;
        Ok(row as u64 * self.num_cols as u64)
    }

    fn center_lat(&self, row: usize) -> GridResult<f64> {
        check_row(row, self.num_rows)?;
        Ok(uniform_center_lat(row, self.num_rows))
    }

    fn center_lat_lon(&self, bin_index: u64) -> GridResult<GeoPoint> {
        let row = self.row_index(bin_index)?;
        let col = (bin_index % self.num_cols as u64) as usize;
        Ok(GeoPoint::new(
            uniform_center_lat(row, self.num_rows),
            uniform_center_lon(col, self.num_cols),
        ))
    }

    fn name(&self) -> &'static str {
        "plate-carree"
    }
}
