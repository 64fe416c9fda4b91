//! Sinusoidal equal-area grid (the SeaDAS / SeaWiFS level-3 binning grid).
//!
//! Rows are bands of equal latitude height. Each row holds
//! `round(2 · num_rows · cos(lat))` columns, so every cell covers roughly
//! the same surface area: polar rows have a handful of wide cells while the
//! equatorial rows have `2 · num_rows` narrow ones.
//!
//! ```text
//!   row 0   |  0  |  1  |  2  |                      (3 cols, 75°N)
//!   row 1   | 3 | 4 | 5 | 6 | 7 | 8 | 9 |10 |        (8 cols, 45°N)
//!   row 2   |11|12|13|14|15|16|17|18|19|20|21|22|    (12 cols, 15°N)
//!   ...
//! ```

use crate::error::{GridError, GridResult};
use crate::grid::{
    check_bin, check_even_rows, check_row, first_bin_offsets, search_row, uniform_center_lat,
    uniform_center_lon, uniform_col_for_lon, uniform_row_for_lat, GeoPoint, PlanetaryGrid,
    MAX_NUM_ROWS,
};
use tracing::debug;

/// Mean earth radius in km used by the SeaDAS resolution formulas.
pub const SEADAS_EARTH_RADIUS_KM: f64 = 6378.145;

/// Row count of the standard 9.28 km SeaDAS grid.
pub const DEFAULT_NUM_ROWS: usize = 2160;

/// Sinusoidal equal-area planetary grid.
#[derive(Debug, Clone)]
pub struct EqualAreaGrid {
    num_rows: usize,
    num_bins: u64,
    cols: Vec<usize>,
    first_bins: Vec<u64>,
    center_lats: Vec<f64>,
}

impl EqualAreaGrid {
    /// Create a grid with `num_rows` latitude bands.
    ///
    /// `num_rows` must be even and at least 2.
    pub fn new(num_rows: usize) -> GridResult<Self> {
        check_even_rows("equal-area grid", num_rows)?;
        let grid = Self::build(num_rows);
        debug!(num_rows, num_bins = grid.num_bins, "Built equal-area grid");
        Ok(grid)
    }

    fn build(num_rows: usize) -> Self {
        let center_lats: Vec<f64> = (0..num_rows)
            .map(|row| uniform_center_lat(row, num_rows))
            .collect();
        let cols: Vec<usize> = center_lats
            .iter()
            .map(|lat| (2.0 * num_rows as f64 * lat.to_radians().cos()).round() as usize)
            .collect();
        let (first_bins, num_bins) = first_bin_offsets(&cols);

        Self {
            num_rows,
            num_bins,
            cols,
            first_bins,
            center_lats,
        }
    }

    /// Create the grid whose bin height is closest to `resolution_km`.
    pub fn from_resolution_km(resolution_km: f64) -> GridResult<Self> {
        Self::new(num_rows_for_resolution(resolution_km)?)
    }

    /// Approximate bin height in km.
    pub fn resolution_km(&self) -> f64 {
        resolution_for_num_rows(self.num_rows)
    }

    /// Row containing a latitude (clamped to the pole rows).
    pub fn row_index_for_lat(&self, lat: f64) -> usize {
        uniform_row_for_lat(lat, self.num_rows)
    }

    /// Column of a longitude within a row (clamped to the edge columns).
    pub fn col_index(&self, lon: f64, row: usize) -> GridResult<usize> {
        Ok(uniform_col_for_lon(lon, self.num_cols(row)?))
    }

    /// Center longitude of a cell.
    pub fn center_lon(&self, row: usize, col: usize) -> GridResult<f64> {
        let num_cols = self.num_cols(row)?;
        check_bin(col as u64, num_cols as u64)?;
        Ok(uniform_center_lon(col, num_cols))
    }
}

impl Default for EqualAreaGrid {
    fn default() -> Self {
        Self::build(DEFAULT_NUM_ROWS)
    }
}

impl PlanetaryGrid for EqualAreaGrid {
    fn bin_index(&self, lat: f64, lon: f64) -> u64 {
        let row = self.row_index_for_lat(lat);
        let col = uniform_col_for_lon(lon, self.cols[row]);
        self.first_bins[row] + col as u64
    }

    fn row_index(&self, bin_index: u64) -> GridResult<usize> {
        check_bin(bin_index, self.num_bins)?;
        Ok(search_row(&self.first_bins, bin_index))
    }

    fn num_bins(&self) -> u64 {
        self.num_bins
    }

    fn num_rows(&self) -> usize {
        self.num_rows
    }

    fn num_cols(&self, row: usize) -> GridResult<usize> {
        check_row(row, self.num_rows)?;
        Ok(self.cols[row])
    }

    fn first_bin_index(&self, row: usize) -> GridResult<u64> {
        check_row(row, self.num_rows)?;
        Ok(self.first_bins[row])
    }

    fn center_lat(&self, row: usize) -> GridResult<f64> {
        check_row(row, self.num_rows)?;
        Ok(self.center_lats[row])
    }

    fn center_lat_lon(&self, bin_index: u64) -> GridResult<GeoPoint> {
        let row = self.row_index(bin_index)?;
        let col = (bin_index - self.first_bins[row]) as usize;
        Ok(GeoPoint::new(
            self.center_lats[row],
            uniform_center_lon(col, self.cols[row]),
        ))
    }

    fn name(&self) -> &'static str {
        "equal-area"
    }
}

/// Even row count whose bin height is closest to `resolution_km`.
pub fn num_rows_for_resolution(resolution_km: f64) -> GridResult<usize> {
    if !resolution_km.is_finite() || resolution_km <= 0.0 {
        return Err(GridError::invalid_config(format!(
            "resolution must be a positive number of km, got {resolution_km}"
        )));
    }
    let height = SEADAS_EARTH_RADIUS_KM * std::f64::consts::PI / resolution_km;
    let num_rows = if height < MAX_NUM_ROWS as f64 {
        Some(height as usize + 1)
    } else {
        None
    };
    let num_rows = num_rows
        .and_then(|n| n.checked_add(n % 2))
        .filter(|&n| n <= MAX_NUM_ROWS)
        .ok_or_else(|| {
            GridError::invalid_config(format!(
                "resolution of {resolution_km} km needs more than {MAX_NUM_ROWS} rows"
            ))
        })?;
    Ok(num_rows)
}

/// Bin height in km of a grid with `num_rows` rows.
pub fn resolution_for_num_rows(num_rows: usize) -> f64 {
    SEADAS_EARTH_RADIUS_KM * std::f64::consts::PI / (num_rows as f64 - 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toy_grid_layout() {
        let grid = EqualAreaGrid::new(6).unwrap();
        let cols: Vec<usize> = (0..6).map(|r| grid.num_cols(r).unwrap()).collect();
        assert_eq!(cols, vec![3, 8, 12, 12, 8, 3]);
        assert_eq!(grid.num_bins(), 46);
        assert_eq!(grid.first_bin_index(5).unwrap(), 43);
    }

    #[test]
    fn test_invalid_row_counts() {
        assert!(EqualAreaGrid::new(0).is_err());
        assert!(EqualAreaGrid::new(1).is_err());
        assert!(EqualAreaGrid::new(7).is_err());
        assert!(matches!(
            EqualAreaGrid::new(MAX_NUM_ROWS + 2),
            Err(GridError::InvalidConfig(_))
        ));
        assert!(EqualAreaGrid::new(usize::MAX - 1).is_err());
    }

    #[test]
    fn test_resolution_too_fine() {
        for km in [1e-300, 1e-3, f64::MIN_POSITIVE] {
            assert!(
                matches!(num_rows_for_resolution(km), Err(GridError::InvalidConfig(_))),
                "{km} km"
            );
        }
        assert!(num_rows_for_resolution(0.02).unwrap() <= MAX_NUM_ROWS);
    }

    #[test]
    fn test_row_index_at_row_boundaries() {
        let grid = EqualAreaGrid::new(6).unwrap();
        assert_eq!(grid.row_index(0).unwrap(), 0);
        assert_eq!(grid.row_index(2).unwrap(), 0);
        assert_eq!(grid.row_index(3).unwrap(), 1);
        assert_eq!(grid.row_index(42).unwrap(), 4);
        assert_eq!(grid.row_index(43).unwrap(), 5);
        assert_eq!(grid.row_index(45).unwrap(), 5);
        assert!(grid.row_index(46).is_err());
    }

    #[test]
    fn test_bin_index_of_toy_grid() {
        let grid = EqualAreaGrid::new(6).unwrap();
        assert_eq!(grid.bin_index(90.0, -180.0), 0);
        assert_eq!(grid.bin_index(80.0, 179.0), 2);
        assert_eq!(grid.bin_index(-89.0, 179.0), 45);
        assert_eq!(grid.bin_index(10.0, 0.0), 11 + 6);
    }

    #[test]
    fn test_default_grid() {
        let grid = EqualAreaGrid::default();
        assert_eq!(grid.num_rows(), DEFAULT_NUM_ROWS);
        assert_eq!(grid.num_bins(), EqualAreaGrid::new(DEFAULT_NUM_ROWS).unwrap().num_bins());
        assert_eq!(grid.num_bins(), 5_940_422);
    }

    #[test]
    fn test_resolution_round_trip() {
        assert_eq!(num_rows_for_resolution(9.28).unwrap(), 2160);
        let grid = EqualAreaGrid::from_resolution_km(9.28).unwrap();
        assert!((grid.resolution_km() - 9.28).abs() < 0.01);
        assert!(num_rows_for_resolution(0.0).is_err());
        assert!(num_rows_for_resolution(f64::NAN).is_err());
    }

    #[test]
    fn test_center_lon() {
        let grid = EqualAreaGrid::new(6).unwrap();
        assert_eq!(grid.center_lon(0, 0).unwrap(), -120.0);
        assert_eq!(grid.center_lon(0, 2).unwrap(), 120.0);
        assert!(grid.center_lon(0, 3).is_err());
    }
}
