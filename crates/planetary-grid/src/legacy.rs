//! South-to-north, 1-based bin numbering for legacy consumers.
//!
//! Older binned products number rows from the south pole and bins from 1,
//! in 32-bit signed integers. [`LegacyIndexAdapter`] converts between that
//! convention and a grid's native one. Within a row, columns keep their
//! west-to-east order.

use crate::error::{GridError, GridResult};
use crate::grid::PlanetaryGrid;

/// Converts native bin and row indices to the legacy numbering and back.
#[derive(Debug, Clone)]
pub struct LegacyIndexAdapter<G: PlanetaryGrid> {
    grid: G,
    num_bins: u64,
    num_rows: usize,
}

impl<G: PlanetaryGrid> LegacyIndexAdapter<G> {
    /// Wrap a densely numbered grid whose bins fit in an `i32`.
    pub fn new(grid: G) -> GridResult<Self> {
        let bound = grid.bin_index_bound();
        let num_bins = grid.num_bins();
        if bound > i32::MAX as u64 || bound != num_bins {
            return Err(GridError::LegacyRangeExceeded { bound });
        }
        let num_rows = grid.num_rows();
        Ok(Self {
            grid,
            num_bins,
            num_rows,
        })
    }

    pub fn grid(&self) -> &G {
        &self.grid
    }

    pub fn into_inner(self) -> G {
        self.grid
    }

    pub fn num_bins(&self) -> u64 {
        self.num_bins
    }

    /// Legacy row of a native row: rows are counted from the south.
    pub fn convert_row(&self, row: usize) -> GridResult<usize> {
        if row >= self.num_rows {
            return Err(GridError::RowOutOfRange {
                row,
                num_rows: self.num_rows,
            });
        }
        Ok(self.num_rows - row - 1)
    }

    /// Legacy bin number of a native bin.
    pub fn convert_bin(&self, bin: u64) -> GridResult<i32> {
        let row = self.grid.row_index(bin)?;
        let col = bin - self.grid.first_bin_index(row)?;
        let legacy = self.legacy_row_start(row)? + col + 1;
        // Bounded by num_bins, which `new` checked against i32::MAX.
        Ok(legacy as i32)
    }

    /// Native bin of a legacy bin number.
    pub fn reverse_bin(&self, legacy: i32) -> GridResult<u64> {
        if legacy < 1 || legacy as u64 > self.num_bins {
            return Err(GridError::InvalidLegacyBin {
                bin: legacy as i64,
                num_bins: self.num_bins,
            });
        }
        let b = legacy as u64 - 1;
        // The legacy layout is the native one read back to front row by row,
        // so the mirrored position lands in the right native row.
        let row = self.grid.row_index(self.num_bins - 1 - b)?;
        let col = b - self.legacy_row_start(row)?;
        Ok(self.grid.first_bin_index(row)? + col)
    }

    /// Zero-based legacy offset of the first bin of native `row`.
    fn legacy_row_start(&self, row: usize) -> GridResult<u64> {
        let end = if row + 1 < self.num_rows {
            self.grid.first_bin_index(row + 1)?
        } else {
            self.num_bins
        };
        Ok(self.num_bins - end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::equal_area::EqualAreaGrid;
    use crate::isin::TiledSinusoidalGrid;
    use crate::lat_lon::RegularLatLonGrid;

    fn toy() -> LegacyIndexAdapter<EqualAreaGrid> {
        LegacyIndexAdapter::new(EqualAreaGrid::new(6).unwrap()).unwrap()
    }

    #[test]
    fn test_toy_grid_anchors() {
        let adapter = toy();
        assert_eq!(adapter.num_bins(), 46);
        assert_eq!(adapter.convert_bin(0).unwrap(), 44);
        assert_eq!(adapter.convert_bin(45).unwrap(), 3);
        assert_eq!(adapter.convert_bin(43).unwrap(), 1);
        assert_eq!(adapter.convert_bin(2).unwrap(), 46);
    }

    #[test]
    fn test_convert_row() {
        let adapter = toy();
        assert_eq!(adapter.convert_row(0).unwrap(), 5);
        assert_eq!(adapter.convert_row(5).unwrap(), 0);
        assert!(adapter.convert_row(6).is_err());
    }

    #[test]
    fn test_toy_grid_round_trip_is_a_bijection() {
        let adapter = toy();
        let mut seen = vec![false; 46];
        for bin in 0..46 {
            let legacy = adapter.convert_bin(bin).unwrap();
            assert!((1..=46).contains(&legacy));
            assert!(!seen[legacy as usize - 1]);
            seen[legacy as usize - 1] = true;
            assert_eq!(adapter.reverse_bin(legacy).unwrap(), bin);
        }
    }

    #[test]
    fn test_invalid_legacy_bins() {
        let adapter = toy();
        assert!(matches!(
            adapter.reverse_bin(0),
            Err(GridError::InvalidLegacyBin { bin: 0, num_bins: 46 })
        ));
        assert!(adapter.reverse_bin(47).is_err());
        assert!(adapter.reverse_bin(-3).is_err());
        assert!(adapter.convert_bin(46).is_err());
    }

    #[test]
    fn test_rejects_sparse_and_oversized_grids() {
        let isin = TiledSinusoidalGrid::new(21_600).unwrap();
        assert!(matches!(
            LegacyIndexAdapter::new(isin),
            Err(GridError::LegacyRangeExceeded { .. })
        ));
        // 2 · 40000² = 3.2e9 bins.
        let huge = RegularLatLonGrid::new(40_000).unwrap();
        assert!(LegacyIndexAdapter::new(huge).is_err());
    }

    #[test]
    fn test_wraps_boxed_grids() {
        let grid: Box<dyn PlanetaryGrid> = Box::new(RegularLatLonGrid::new(4).unwrap());
        let adapter = LegacyIndexAdapter::new(grid).unwrap();
        // Row 0 (north) becomes the last legacy row.
        assert_eq!(adapter.convert_bin(0).unwrap(), 25);
        assert_eq!(adapter.reverse_bin(25).unwrap(), 0);
    }
}
