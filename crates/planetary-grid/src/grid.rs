//! The planetary grid abstraction shared by every tessellation.

use crate::error::{GridError, GridResult};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// A geographic coordinate in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// A partition of the sphere into numbered cells ("bins").
///
/// Bins are numbered row-major starting with the northernmost, westernmost
/// cell. Rows run north to south, columns west to east. Every implementation
/// is immutable after construction and safe to query from many threads.
///
/// Coordinate queries never fail: latitudes beyond the poles and longitudes
/// beyond the antimeridian clamp to the nearest cell. Index queries fail with
/// [`GridError::RowOutOfRange`] or [`GridError::BinOutOfRange`] rather than
/// returning a plausible but wrong cell.
pub trait PlanetaryGrid: Send + Sync + std::fmt::Debug {
    /// Index of the bin containing the given coordinate.
    fn bin_index(&self, lat: f64, lon: f64) -> u64;

    /// Row containing the given bin.
    fn row_index(&self, bin_index: u64) -> GridResult<usize>;

    /// Total number of bins.
    fn num_bins(&self) -> u64;

    /// Total number of rows.
    fn num_rows(&self) -> usize;

    /// Number of bins in a row.
    fn num_cols(&self, row: usize) -> GridResult<usize>;

    /// Index of the westernmost bin of a row.
    fn first_bin_index(&self, row: usize) -> GridResult<u64>;

    /// Center latitude of a row.
    fn center_lat(&self, row: usize) -> GridResult<f64>;

    /// Center coordinate of a bin.
    fn center_lat_lon(&self, bin_index: u64) -> GridResult<GeoPoint>;

    /// Short human-readable name of the tessellation.
    fn name(&self) -> &'static str {
        "planetary-grid"
    }

    /// Exclusive upper bound of the values `bin_index` can return.
    ///
    /// Equal to [`num_bins`](Self::num_bins) for densely numbered grids.
    fn bin_index_bound(&self) -> u64 {
        self.num_bins()
    }

    /// Layout summary for logging and reporting.
    fn summary(&self) -> GridLayoutSummary {
        GridLayoutSummary::of(self)
    }
}

impl<G: PlanetaryGrid + ?Sized> PlanetaryGrid for Box<G> {
    fn bin_index(&self, lat: f64, lon: f64) -> u64 {
        (**self).bin_index(lat, lon)
    }
    fn row_index(&self, bin_index: u64) -> GridResult<usize> {
        (**self).row_index(bin_index)
    }
    fn num_bins(&self) -> u64 {
        (**self).num_bins()
    }
    fn num_rows(&self) -> usize {
        (**self).num_rows()
    }
    fn num_cols(&self, row: usize) -> GridResult<usize> {
        (**self).num_cols(row)
    }
    fn first_bin_index(&self, row: usize) -> GridResult<u64> {
        (**self).first_bin_index(row)
    }
    fn center_lat(&self, row: usize) -> GridResult<f64> {
        (**self).center_lat(row)
    }
    fn center_lat_lon(&self, bin_index: u64) -> GridResult<GeoPoint> {
        (**self).center_lat_lon(bin_index)
    }
    fn name(&self) -> &'static str {
        (**self).name()
    }
    fn bin_index_bound(&self) -> u64 {
        (**self).bin_index_bound()
    }
}

impl<G: PlanetaryGrid + ?Sized> PlanetaryGrid for Arc<G> {
    fn bin_index(&self, lat: f64, lon: f64) -> u64 {
        (**self).bin_index(lat, lon)
    }
    fn row_index(&self, bin_index: u64) -> GridResult<usize> {
        (**self).row_index(bin_index)
    }
    fn num_bins(&self) -> u64 {
        (**self).num_bins()
    }
    fn num_rows(&self) -> usize {
        (**self).num_rows()
    }
    fn num_cols(&self, row: usize) -> GridResult<usize> {
        (**self).num_cols(row)
    }
    fn first_bin_index(&self, row: usize) -> GridResult<u64> {
        (**self).first_bin_index(row)
    }
    fn center_lat(&self, row: usize) -> GridResult<f64> {
        (**self).center_lat(row)
    }
    fn center_lat_lon(&self, bin_index: u64) -> GridResult<GeoPoint> {
        (**self).center_lat_lon(bin_index)
    }
    fn name(&self) -> &'static str {
        (**self).name()
    }
    fn bin_index_bound(&self) -> u64 {
        (**self).bin_index_bound()
    }
}

/// Serializable description of a grid's layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridLayoutSummary {
    pub name: String,
    pub num_rows: usize,
    pub num_bins: u64,
    pub bin_index_bound: u64,
    pub min_cols: usize,
    pub max_cols: usize,
}

impl GridLayoutSummary {
    /// Summarize any grid by walking its rows once.
    pub fn of<G: PlanetaryGrid + ?Sized>(grid: &G) -> Self {
        let (min_cols, max_cols) = (0..grid.num_rows())
            .filter_map(|row| grid.num_cols(row).ok())
            .fold((usize::MAX, 0), |(lo, hi), n| (lo.min(n), hi.max(n)));

        Self {
            name: grid.name().to_string(),
            num_rows: grid.num_rows(),
            num_bins: grid.num_bins(),
            bin_index_bound: grid.bin_index_bound(),
            min_cols: if max_cols == 0 { 0 } else { min_cols },
            max_cols,
        }
    }
}

// ============================================================================
// Shared layout helpers
// ============================================================================

/// Fail with `RowOutOfRange` unless `row < num_rows`.
#[inline]
pub(crate) fn check_row(row: usize, num_rows: usize) -> GridResult<()> {
    if row < num_rows {
        Ok(())
    } else {
        Err(GridError::RowOutOfRange { row, num_rows })
    }
}

/// Fail with `BinOutOfRange` unless `bin < bound`.
#[inline]
pub(crate) fn check_bin(bin: u64, bound: u64) -> GridResult<()> {
    if bin < bound {
        Ok(())
    } else {
        Err(GridError::BinOutOfRange { bin, bound })
    }
}

/// Largest row count accepted by the row-parameterized grids.
///
/// Keeps `2 * num_rows²` bins well inside `u64` and bounds the per-row
/// tables the equal-area grid allocates.
pub const MAX_NUM_ROWS: usize = 1 << 20;

/// Validate a row count that must be even, at least 2 and at most
/// [`MAX_NUM_ROWS`].
pub(crate) fn check_even_rows(grid: &str, num_rows: usize) -> GridResult<()> {
    if num_rows < 2 || num_rows % 2 != 0 {
        return Err(GridError::invalid_config(format!(
            "{grid}: num_rows must be even and >= 2, got {num_rows}"
        )));
    }
    if num_rows > MAX_NUM_ROWS {
        return Err(GridError::invalid_config(format!(
            "{grid}: num_rows must be at most {MAX_NUM_ROWS}, got {num_rows}"
        )));
    }
    Ok(())
}

/// Running sum of column counts: `offsets[r]` is the first bin of row `r`.
pub(crate) fn first_bin_offsets(cols: &[usize]) -> (Vec<u64>, u64) {
    let mut offsets = Vec::with_capacity(cols.len());
    let mut total = 0u64;
    for &n in cols {
        offsets.push(total);
        total += n as u64;
    }
    (offsets, total)
}

/// Row owning `bin` given monotonically increasing first-bin offsets.
///
/// The caller guarantees `bin < num_bins`.
#[inline]
pub(crate) fn search_row(offsets: &[u64], bin: u64) -> usize {
    offsets.partition_point(|&first| first <= bin) - 1
}

/// Row of a latitude in a grid of `num_rows` equally spaced latitude bands.
#[inline]
pub(crate) fn uniform_row_for_lat(lat: f64, num_rows: usize) -> usize {
    let band = ((90.0 + lat) * num_rows as f64 / 180.0).floor();
    let row = (num_rows as f64 - 1.0) - band;
    clamp_index(row, num_rows)
}

/// Column of a longitude in a row of `num_cols` equally spaced columns
/// starting at -180.
#[inline]
pub(crate) fn uniform_col_for_lon(lon: f64, num_cols: usize) -> usize {
    let col = ((180.0 + lon) * num_cols as f64 / 360.0).floor();
    clamp_index(col, num_cols)
}

/// Center latitude of row `row` in a grid of `num_rows` equally spaced bands.
#[inline]
pub(crate) fn uniform_center_lat(row: usize, num_rows: usize) -> f64 {
    90.0 - (row as f64 + 0.5) * 180.0 / num_rows as f64
}

/// Center longitude of column `col` in a row of `num_cols` columns.
#[inline]
pub(crate) fn uniform_center_lon(col: usize, num_cols: usize) -> f64 {
    -180.0 + (col as f64 + 0.5) * 360.0 / num_cols as f64
}

/// Clamp a floating index into `0..len`; NaN maps to 0.
#[inline]
pub(crate) fn clamp_index(value: f64, len: usize) -> usize {
    if value.is_nan() || value <= 0.0 {
        0
    } else if value >= (len - 1) as f64 {
        len - 1
    } else {
        value as usize
    }
}
