use super::signed_lon;
use super::table::{gaussian_number, nearest_column, GaussianRowTable};
use crate::error::GridResult;
use crate::grid::{check_bin, check_row, GeoPoint, PlanetaryGrid};
use std::sync::Arc;
use tracing::debug;

/// Regular Gaussian grid: 2N Gaussian latitudes with 4N columns each.
#[derive(Debug, Clone)]
pub struct RegularGaussianGrid {
    table: Arc<GaussianRowTable>,
    num_cols: usize,
    num_bins: u64,
}

impl RegularGaussianGrid {
    /// Create the grid with `num_rows` (= 2N) latitude rows.
    pub fn new(num_rows: usize) -> GridResult<Self> {
        let table = GaussianRowTable::load(gaussian_number(num_rows)?)?;
        let num_cols = table.regular_num_cols();
        let num_bins = num_rows as u64 * num_cols as u64;
        debug!(num_rows, num_cols, num_bins, "Built regular Gaussian grid");
        Ok(Self {
            table,
            num_cols,
            num_bins,
        })
    }

    /// Gaussian number N.
    pub fn gaussian_number(&self) -> usize {
        self.table.n()
    }

    pub fn table(&self) -> &GaussianRowTable {
        &self.table
    }
}

impl PlanetaryGrid for RegularGaussianGrid {
    fn bin_index(&self, lat: f64, lon: f64) -> u64 {
        let row = self.table.nearest_row(lat) as u64;
        let col = nearest_column(self.table.regular_lons(), lon) as u64;
        row * self.num_cols as u64 + col
    }

    fn row_index(&self, bin_index: u64) -> GridResult<usize> {
        check_bin(bin_index, self.num_bins)?;
        Ok((bin_index / self.num_cols as u64) as usize)
    }

    fn num_bins(&self) -> u64 {
        self.num_bins
    }

    fn num_rows(&self) -> usize {
        self.table.num_rows()
    }

    fn num_cols(&self, row: usize) -> GridResult<usize> {
        check_row(row, self.num_rows())?;
        Ok(self.num_cols)
    }

    fn first_bin_index(&self, row: usize) -> GridResult<u64> {
        check_row(row, self.num_rows())?;
        Ok(row as u64 * self.num_cols as u64)
    }

    fn center_lat(&self, row: usize) -> GridResult<f64> {
        check_row(row, self.num_rows())?;
        Ok(self.table.latitudes()[row])
    }

    fn center_lat_lon(&self, bin_index: u64) -> GridResult<GeoPoint> {
        let row = self.row_index(bin_index)?;
        let col = (bin_index % self.num_cols as u64) as usize;
        Ok(GeoPoint::new(
            self.table.latitudes()[row],
            signed_lon(self.table.regular_lons()[col]),
        ))
    }

    fn name(&self) -> &'static str {
        "regular-gaussian"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GridError;

    #[test]
    fn test_n32_layout() {
        let grid = RegularGaussianGrid::new(64).unwrap();
        assert_eq!(grid.gaussian_number(), 32);
        assert_eq!(grid.num_rows(), 64);
        assert_eq!(grid.num_cols(0).unwrap(), 128);
        assert_eq!(grid.num_bins(), 64 * 128);
        assert_eq!(grid.first_bin_index(1).unwrap(), 128);
        assert!(grid.num_cols(64).is_err());
    }

    #[test]
    fn test_unsupported_sizes() {
        assert!(matches!(
            RegularGaussianGrid::new(66),
            Err(GridError::UnsupportedGaussianSize(66))
        ));
        assert!(RegularGaussianGrid::new(32).is_err());
    }

    #[test]
    fn test_bin_index_nearest_point() {
        let grid = RegularGaussianGrid::new(64).unwrap();
        // Greenwich on the first row.
        assert_eq!(grid.bin_index(90.0, 0.0), 0);
        // Longitudes just west of 0 wrap onto column 0.
        assert_eq!(grid.bin_index(90.0, -1.0), 0);
        // 2.8125° spacing, so -2.8125 is the last column.
        assert_eq!(grid.bin_index(90.0, -2.8125), 127);
        assert_eq!(grid.bin_index(-90.0, 180.0), 63 * 128 + 64);
    }

    #[test]
    fn test_center_round_trip() {
        let grid = RegularGaussianGrid::new(64).unwrap();
        for bin in 0..grid.num_bins() {
            let center = grid.center_lat_lon(bin).unwrap();
            assert!((-180.0..180.0).contains(&center.lon));
            assert_eq!(grid.bin_index(center.lat, center.lon), bin);
        }
    }

    #[test]
    fn test_row_index() {
        let grid = RegularGaussianGrid::new(64).unwrap();
        assert_eq!(grid.row_index(127).unwrap(), 0);
        assert_eq!(grid.row_index(128).unwrap(), 1);
        assert!(grid.row_index(grid.num_bins()).is_err());
    }
}
