use super::signed_lon;
use super::table::{gaussian_number, nearest_column, GaussianRowTable};
use crate::error::GridResult;
use crate::grid::{check_bin, check_row, search_row, GeoPoint, PlanetaryGrid};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::debug;

/// Memo word meaning "nothing resolved yet".
const EMPTY_MEMO: u64 = u64::MAX;

/// Bits of the memo word holding the row.
const ROW_BITS: u32 = 16;
const ROW_MASK: u64 = (1 << ROW_BITS) - 1;

/// Reduced Gaussian grid: 2N Gaussian latitudes with tabulated column counts
/// that shrink towards the poles.
///
/// `row_index` remembers the last resolved `(bin, row)` pair. Sequential
/// scans, which ask for the same bin or its neighbours, skip the binary
/// search. The memo is a single atomic word, so the grid stays `Sync` and
/// concurrent callers at worst overwrite each other's hint.
#[derive(Debug)]
pub struct ReducedGaussianGrid {
    table: Arc<GaussianRowTable>,
    last_row: AtomicU64,
}

impl ReducedGaussianGrid {
    /// Create the grid with `num_rows` (= 2N) latitude rows.
    pub fn new(num_rows: usize) -> GridResult<Self> {
        let table = GaussianRowTable::load(gaussian_number(num_rows)?)?;
        debug!(
            num_rows,
            num_bins = table.reduced_num_bins(),
            "Built reduced Gaussian grid"
        );
        Ok(Self {
            table,
            last_row: AtomicU64::new(EMPTY_MEMO),
        })
    }

    /// Gaussian number N.
    pub fn gaussian_number(&self) -> usize {
        self.table.n()
    }

    pub fn table(&self) -> &GaussianRowTable {
        &self.table
    }

    /// Row from the memo if `bin` is the remembered bin or one of its
    /// neighbours.
    fn memo_row(&self, bin: u64) -> Option<usize> {
        let word = self.last_row.load(Ordering::Relaxed);
        if word == EMPTY_MEMO {
            return None;
        }
        let last_bin = word >> ROW_BITS;
        let row = (word & ROW_MASK) as usize;
        let first = self.table.reduced_first_bins();
        let end = first.get(row + 1).copied().unwrap_or(self.table.reduced_num_bins());

        if bin == last_bin {
            return Some(row);
        }
        if bin == last_bin + 1 {
            // Still in the same row, or the first bin of the next one.
            return Some(if bin < end { row } else { row + 1 });
        }
        if bin + 1 == last_bin {
            return Some(if bin >= first[row] { row } else { row - 1 });
        }
        None
    }

    fn remember(&self, bin: u64, row: usize) {
        self.last_row
            .store((bin << ROW_BITS) | row as u64, Ordering::Relaxed);
    }
}

impl Clone for ReducedGaussianGrid {
    fn clone(&self) -> Self {
        Self {
            table: Arc::clone(&self.table),
            last_row: AtomicU64::new(EMPTY_MEMO),
        }
    }
}

impl PlanetaryGrid for ReducedGaussianGrid {
    fn bin_index(&self, lat: f64, lon: f64) -> u64 {
        let row = self.table.nearest_row(lat);
        let col = nearest_column(self.table.reduced_lons(row), lon);
        self.table.reduced_first_bins()[row] + col as u64
    }

    fn row_index(&self, bin_index: u64) -> GridResult<usize> {
        check_bin(bin_index, self.table.reduced_num_bins())?;
        let row = match self.memo_row(bin_index) {
            Some(row) => row,
            None => search_row(self.table.reduced_first_bins(), bin_index),
        };
        self.remember(bin_index, row);
        Ok(row)
    }

    fn num_bins(&self) -> u64 {
        self.table.reduced_num_bins()
    }

    fn num_rows(&self) -> usize {
        self.table.num_rows()
    }

    fn num_cols(&self, row: usize) -> GridResult<usize> {
        check_row(row, self.num_rows())?;
        Ok(self.table.reduced_cols()[row])
    }

    fn first_bin_index(&self, row: usize) -> GridResult<u64> {
        check_row(row, self.num_rows())?;
        Ok(self.table.reduced_first_bins()[row])
    }

    fn center_lat(&self, row: usize) -> GridResult<f64> {
        check_row(row, self.num_rows())?;
        Ok(self.table.latitudes()[row])
    }

    fn center_lat_lon(&self, bin_index: u64) -> GridResult<GeoPoint> {
        let row = self.row_index(bin_index)?;
        let col = (bin_index - self.table.reduced_first_bins()[row]) as usize;
        Ok(GeoPoint::new(
            self.table.latitudes()[row],
            signed_lon(self.table.reduced_lons(row)[col]),
        ))
    }

    fn name(&self) -> &'static str {
        "reduced-gaussian"
    }
}
