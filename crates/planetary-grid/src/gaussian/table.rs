//! Tabulated row layouts of the Gaussian grids.
//!
//! One table is packaged per supported Gaussian number N. Each is a
//! tab-separated text resource with one record per latitude (2N records):
//!
//! ```text
//! # comment lines and blank lines are ignored
//! <reduced column count> \t <1-based row> \t <latitude in degrees>
//! ```
//!
//! Tables are parsed at most once per N and shared between all grids through
//! a process-wide cache.
//!
//! The packaged reduced column counts are generated by the rule in
//! [`super::quadrature`], not copied from the ECMWF/WMO reduced Gaussian
//! tables. They are close to the published layouts but not identical (the
//! N32 table here totals 6096 bins), so reduced-grid bins do not line up with
//! GRIB reduced-grid points. Latitudes are the true Gaussian latitudes and
//! the regular grids are unaffected.

use crate::error::{GridError, GridResult};
use crate::grid::first_bin_offsets;
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};
use tracing::info;

/// Gaussian numbers with a packaged row table.
pub const SUPPORTED_N: [usize; 11] = [32, 48, 80, 128, 160, 200, 256, 320, 400, 512, 640];

/// Cache of parsed row tables, keyed by Gaussian number.
static TABLE_CACHE: Lazy<RwLock<HashMap<usize, Arc<GaussianRowTable>>>> =
    Lazy::new(|| RwLock::new(HashMap::new()));

/// Packaged resource text for Gaussian number `n`.
fn resource(n: usize) -> Option<&'static str> {
    let text = match n {
        32 => include_str!("../../resources/gaussian/n32.tsv"),
        48 => include_str!("../../resources/gaussian/n48.tsv"),
        80 => include_str!("../../resources/gaussian/n80.tsv"),
        128 => include_str!("../../resources/gaussian/n128.tsv"),
        160 => include_str!("../../resources/gaussian/n160.tsv"),
        200 => include_str!("../../resources/gaussian/n200.tsv"),
        256 => include_str!("../../resources/gaussian/n256.tsv"),
        320 => include_str!("../../resources/gaussian/n320.tsv"),
        400 => include_str!("../../resources/gaussian/n400.tsv"),
        512 => include_str!("../../resources/gaussian/n512.tsv"),
        640 => include_str!("../../resources/gaussian/n640.tsv"),
        _ => return None,
    };
    Some(text)
}

/// Gaussian number for a grid with `num_rows` rows, if a table exists for it.
pub fn gaussian_number(num_rows: usize) -> GridResult<usize> {
    let n = num_rows / 2;
    if num_rows % 2 == 0 && SUPPORTED_N.contains(&n) {
        Ok(n)
    } else {
        Err(GridError::UnsupportedGaussianSize(num_rows))
    }
}

/// Row layout of a Gaussian grid with Gaussian number N.
#[derive(Debug, Clone)]
pub struct GaussianRowTable {
    n: usize,
    latitudes: Vec<f64>,
    reduced_cols: Vec<usize>,
    reduced_first_bins: Vec<u64>,
    reduced_num_bins: u64,
    regular_lons: Vec<f64>,
    reduced_lons: Vec<Vec<f64>>,
}

impl GaussianRowTable {
    /// Shared table for Gaussian number `n`, parsed on first use.
    pub fn load(n: usize) -> GridResult<Arc<Self>> {
        {
            let cache = TABLE_CACHE.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(table) = cache.get(&n) {
                return Ok(Arc::clone(table));
            }
        }

        let mut cache = TABLE_CACHE.write().unwrap_or_else(PoisonError::into_inner);

        // Another thread may have loaded it while we waited for the lock.
        if let Some(table) = cache.get(&n) {
            return Ok(Arc::clone(table));
        }

        let text = resource(n).ok_or(GridError::UnsupportedGaussianSize(2 * n))?;
        let table = Arc::new(Self::parse(n, text)?);
        info!(
            n,
            rows = table.num_rows(),
            reduced_bins = table.reduced_num_bins(),
            "Loaded Gaussian row table"
        );
        cache.insert(n, Arc::clone(&table));
        Ok(table)
    }

    /// Parse a row table for Gaussian number `n` from resource text.
    pub fn parse(n: usize, text: &str) -> GridResult<Self> {
        if n == 0 {
            return Err(GridError::table_load(n, "Gaussian number must be positive"));
        }
        let num_rows = 2 * n;
        let max_cols = 4 * n;
        let mut latitudes = Vec::with_capacity(num_rows);
        let mut reduced_cols = Vec::with_capacity(num_rows);

        for (line_no, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let fields: Vec<&str> = line.split('\t').map(str::trim).collect();
            if fields.len() < 3 {
                return Err(GridError::table_load(
                    n,
                    format!("line {}: expected 3 tab-separated fields, found {}", line_no + 1, fields.len()),
                ));
            }

            let cols: usize = fields[0].parse().map_err(|_| {
                GridError::table_load(n, format!("line {}: invalid column count '{}'", line_no + 1, fields[0]))
            })?;
            let lat: f64 = fields[2].parse().map_err(|_| {
                GridError::table_load(n, format!("line {}: invalid latitude '{}'", line_no + 1, fields[2]))
            })?;

            if cols == 0 || cols > max_cols {
                return Err(GridError::table_load(
                    n,
                    format!("line {}: column count {} outside 1..={}", line_no + 1, cols, max_cols),
                ));
            }
            if !(-90.0..=90.0).contains(&lat) {
                return Err(GridError::table_load(
                    n,
                    format!("line {}: latitude {} outside [-90, 90]", line_no + 1, lat),
                ));
            }
            if latitudes.last().is_some_and(|&prev: &f64| lat >= prev) {
                return Err(GridError::table_load(
                    n,
                    format!("line {}: latitudes must strictly decrease", line_no + 1),
                ));
            }

            reduced_cols.push(cols);
            latitudes.push(lat);
        }

        if latitudes.len() != num_rows {
            return Err(GridError::table_load(
                n,
                format!("expected {} records, found {}", num_rows, latitudes.len()),
            ));
        }

        let (reduced_first_bins, reduced_num_bins) = first_bin_offsets(&reduced_cols);
        let regular_lons = even_longitudes(max_cols);
        let reduced_lons = reduced_cols.iter().map(|&cols| even_longitudes(cols)).collect();

        Ok(Self {
            n,
            latitudes,
            reduced_cols,
            reduced_first_bins,
            reduced_num_bins,
            regular_lons,
            reduced_lons,
        })
    }

    /// Gaussian number N.
    pub fn n(&self) -> usize {
        self.n
    }

    /// Number of latitude rows (2N).
    pub fn num_rows(&self) -> usize {
        2 * self.n
    }

    /// Column count of every row of the regular grid (4N).
    pub fn regular_num_cols(&self) -> usize {
        4 * self.n
    }

    /// Row latitudes in degrees, north to south.
    pub fn latitudes(&self) -> &[f64] {
        &self.latitudes
    }

    /// Column counts of the reduced grid.
    pub fn reduced_cols(&self) -> &[usize] {
        &self.reduced_cols
    }

    /// First-bin offsets of the reduced grid.
    pub fn reduced_first_bins(&self) -> &[u64] {
        &self.reduced_first_bins
    }

    /// Total number of bins of the reduced grid.
    pub fn reduced_num_bins(&self) -> u64 {
        self.reduced_num_bins
    }

    /// Longitudes of the regular grid columns in [0, 360).
    pub fn regular_lons(&self) -> &[f64] {
        &self.regular_lons
    }

    /// Longitudes of a reduced row's columns in [0, 360).
    ///
    /// Callers pass a row already checked against [`num_rows`](Self::num_rows).
    pub fn reduced_lons(&self, row: usize) -> &[f64] {
        &self.reduced_lons[row]
    }

    /// Row whose latitude is nearest to `lat`; ties go to the northern row.
    pub fn nearest_row(&self, lat: f64) -> usize {
        let lats = &self.latitudes;
        if lat.is_nan() {
            return 0;
        }
        let i = lats.partition_point(|&v| v > lat);
        if i == 0 {
            return 0;
        }
        if i == lats.len() {
            return lats.len() - 1;
        }
        if lats[i - 1] - lat <= lat - lats[i] {
            i - 1
        } else {
            i
        }
    }
}

/// `count` evenly spaced longitudes starting at 0°.
fn even_longitudes(count: usize) -> Vec<f64> {
    let step = 360.0 / count as f64;
    (0..count).map(|i| i as f64 * step).collect()
}

/// Column whose longitude sample is nearest to `lon`.
///
/// `lons` are ascending samples in [0, 360) starting at 0. `lon` is clamped
/// to [-180, 180] like every other grid, then mapped onto the sample circle;
/// the search wraps past the last sample to column 0, and ties go to the
/// lower column index.
pub(crate) fn nearest_column(lons: &[f64], lon: f64) -> usize {
    if lon.is_nan() {
        return 0;
    }
    let x = lon.clamp(-180.0, 180.0).rem_euclid(360.0);
    let len = lons.len();
    let i = lons.partition_point(|&v| v < x);

    // Candidate above (wrapping to column 0 at 360°) and below.
    let (above, above_dist) = if i < len {
        (i, lons[i] - x)
    } else {
        (0, 360.0 - x)
    };
    let (below, below_dist) = if i > 0 {
        (i - 1, x - lons[i - 1])
    } else {
        (len - 1, x + 360.0 - lons[len - 1])
    };

    if above_dist < below_dist || (above_dist == below_dist && above < below) {
        above
    } else {
        below
    }
}
