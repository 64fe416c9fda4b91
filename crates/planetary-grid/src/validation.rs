//! Consistency checks for grid layouts and index round trips.
//!
//! These walk a grid the way a binning job would and report what they find
//! instead of stopping at the first problem. Round-trip checks run on the
//! rayon thread pool.

use crate::grid::PlanetaryGrid;
use crate::legacy::LegacyIndexAdapter;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Failures kept per report; the rest are only counted.
pub const MAX_REPORTED_FAILURES: usize = 20;

/// Result of [`check_row_layout`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LayoutReport {
    pub num_rows: usize,
    pub num_bins: u64,
    /// Sum of the per-row column counts.
    pub counted_bins: u64,
    pub errors: Vec<String>,
}

impl LayoutReport {
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

/// A bin that did not survive a round trip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundTripFailure {
    pub bin: u64,
    pub message: String,
}

/// Result of a round-trip check.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RoundTripReport {
    pub checked: u64,
    pub failed: u64,
    /// First failures in bin order.
    pub failures: Vec<RoundTripFailure>,
}

impl RoundTripReport {
    pub fn is_ok(&self) -> bool {
        self.failed == 0
    }

    fn collect(checked: u64, mut failures: Vec<RoundTripFailure>) -> Self {
        failures.sort_by_key(|f| f.bin);
        let failed = failures.len() as u64;
        failures.truncate(MAX_REPORTED_FAILURES);
        Self {
            checked,
            failed,
            failures,
        }
    }
}

/// Check that rows tile the bin range without gaps or overlaps.
///
/// For densely numbered grids the first bin of each row must equal the
/// running column sum and `row_index` must map both ends of every row back
/// to it. Sparse grids (where `bin_index_bound() != num_bins()`) only get the
/// column-sum and first-bin checks.
pub fn check_row_layout<G: PlanetaryGrid + ?Sized>(grid: &G) -> LayoutReport {
    let num_rows = grid.num_rows();
    let num_bins = grid.num_bins();
    let dense = grid.bin_index_bound() == num_bins;
    let mut report = LayoutReport {
        num_rows,
        num_bins,
        ..Default::default()
    };

    let mut expected_first = 0u64;
    for row in 0..num_rows {
        let (cols, first) = match (grid.num_cols(row), grid.first_bin_index(row)) {
            (Ok(cols), Ok(first)) => (cols as u64, first),
            (Err(e), _) | (_, Err(e)) => {
                report.errors.push(format!("row {row}: {e}"));
                continue;
            }
        };
        report.counted_bins += cols;

        if cols == 0 {
            report.errors.push(format!("row {row}: no columns"));
            continue;
        }
        if dense && first != expected_first {
            report
                .errors
                .push(format!("row {row}: first bin {first}, expected {expected_first}"));
        }
        expected_first += cols;

        let ends = if dense { vec![first, first + cols - 1] } else { vec![first] };
        for bin in ends {
            match grid.row_index(bin) {
                Ok(r) if r == row => {}
                Ok(r) => report.errors.push(format!("bin {bin}: row_index {r}, expected {row}")),
                Err(e) => report.errors.push(format!("bin {bin}: {e}")),
            }
        }
    }

    if report.counted_bins != num_bins {
        report.errors.push(format!(
            "column counts sum to {}, grid reports {num_bins} bins",
            report.counted_bins
        ));
    }
    report
}

/// Check that the center of each bin maps back to the bin.
pub fn check_center_round_trip<G: PlanetaryGrid + ?Sized>(grid: &G, bins: &[u64]) -> RoundTripReport {
    let failures: Vec<RoundTripFailure> = bins
        .par_iter()
        .filter_map(|&bin| {
            let message = match grid.center_lat_lon(bin) {
                Ok(center) => {
                    let back = grid.bin_index(center.lat, center.lon);
                    if back == bin {
                        return None;
                    }
                    format!("center ({:.6}, {:.6}) maps to bin {back}", center.lat, center.lon)
                }
                Err(e) => e.to_string(),
            };
            Some(RoundTripFailure { bin, message })
        })
        .collect();
    RoundTripReport::collect(bins.len() as u64, failures)
}

/// Check that native → legacy → native is the identity on `bins`.
pub fn check_legacy_round_trip<G: PlanetaryGrid>(
    adapter: &LegacyIndexAdapter<G>,
    bins: &[u64],
) -> RoundTripReport {
    let failures: Vec<RoundTripFailure> = bins
        .par_iter()
        .filter_map(|&bin| {
            let message = match adapter.convert_bin(bin).and_then(|l| adapter.reverse_bin(l).map(|n| (l, n))) {
                Ok((_, native)) if native == bin => return None,
                Ok((legacy, native)) => format!("legacy bin {legacy} maps back to {native}"),
                Err(e) => e.to_string(),
            };
            Some(RoundTripFailure { bin, message })
        })
        .collect();
    RoundTripReport::collect(bins.len() as u64, failures)
}

/// Up to `count` evenly spaced bins in `0..num_bins`, always including the
/// first and last bin when `count >= 2`.
pub fn sample_bins(num_bins: u64, count: usize) -> Vec<u64> {
    if num_bins == 0 || count == 0 {
        return Vec::new();
    }
    if count as u64 >= num_bins {
        return (0..num_bins).collect();
    }
    if count == 1 {
        return vec![0];
    }

    let last = num_bins - 1;
    let steps = (count - 1) as u128;
    let mut bins: Vec<u64> = (0..count as u128)
        .map(|i| (i * last as u128 / steps) as u64)
        .collect();
    bins.dedup();
    bins
}
