//! Integerized sinusoidal (ISIN) tiled grid.
//!
//! The sinusoidal plane is cut into 18 × 36 square tiles, each subdivided into
//! `tile_size × tile_size` pixels. Bin indices are decimal-packed tile and
//! pixel coordinates:
//!
//! ```text
//!   bin = 10_000_000_000·tile_row + 100_000_000·tile_col + 10_000·pixel_row + pixel_col
//! ```
//!
//! so the index space is sparse. [`PlanetaryGrid::num_bins`] reports the
//! number of cells and [`PlanetaryGrid::bin_index_bound`] the largest packed
//! value plus one.

use crate::error::{GridError, GridResult};
use crate::grid::{check_row, GeoPoint, PlanetaryGrid};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Tile rows, north to south.
pub const TILE_ROWS: usize = 18;
/// Tile columns, west to east.
pub const TILE_COLS: usize = 36;

/// Row counts with a defined tile size (1 km, 500 m and 250 m products).
pub const SUPPORTED_NUM_ROWS: [usize; 3] = [21_600, 43_200, 86_400];

const TILE_ROW_FACTOR: u64 = 10_000_000_000;
const TILE_COL_FACTOR: u64 = 100_000_000;
const PIXEL_ROW_FACTOR: u64 = 10_000;

/// Sphere radius of the MODIS sinusoidal projection in meters.
pub const ISIN_EARTH_RADIUS_M: f64 = 6_371_007.181;
/// Width and height of one tile in projection meters.
pub const ISIN_TILE_SPAN_M: f64 = 1_111_950.519_766_5;

/// Tile and pixel coordinates of an ISIN cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IsinPoint {
    pub tile_row: usize,
    pub tile_col: usize,
    pub pixel_row: usize,
    pub pixel_col: usize,
}

impl IsinPoint {
    pub fn new(tile_row: usize, tile_col: usize, pixel_row: usize, pixel_col: usize) -> Self {
        Self {
            tile_row,
            tile_col,
            pixel_row,
            pixel_col,
        }
    }

    /// Decimal-packed bin index.
    pub fn pack(&self) -> u64 {
        self.tile_row as u64 * TILE_ROW_FACTOR
            + self.tile_col as u64 * TILE_COL_FACTOR
            + self.pixel_row as u64 * PIXEL_ROW_FACTOR
            + self.pixel_col as u64
    }

    /// Split a packed index back into its fields. No range checks.
    pub fn unpack(bin: u64) -> Self {
        let tile_row = bin / TILE_ROW_FACTOR;
        let rest = bin % TILE_ROW_FACTOR;
        let tile_col = rest / TILE_COL_FACTOR;
        let rest = rest % TILE_COL_FACTOR;
        Self {
            tile_row: tile_row as usize,
            tile_col: tile_col as usize,
            pixel_row: (rest / PIXEL_ROW_FACTOR) as usize,
            pixel_col: (rest % PIXEL_ROW_FACTOR) as usize,
        }
    }

    /// True if every field is inside an 18 × 36 tiling of `tile_size` pixels.
    pub fn is_valid(&self, tile_size: usize) -> bool {
        self.tile_row < TILE_ROWS
            && self.tile_col < TILE_COLS
            && self.pixel_row < tile_size
            && self.pixel_col < tile_size
    }
}

/// Maps geographic coordinates onto the ISIN tiling.
pub trait TileProjection: Send + Sync + std::fmt::Debug {
    /// Cell containing (`lat`, `lon`) for tiles of `tile_size` pixels.
    /// Must clamp to a valid cell.
    fn locate(&self, lat: f64, lon: f64, tile_size: usize) -> IsinPoint;
}

/// The spherical sinusoidal projection used by the MODIS land tiles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IsinProjection {
    radius: f64,
    tile_span: f64,
}

impl Default for IsinProjection {
    fn default() -> Self {
        Self {
            radius: ISIN_EARTH_RADIUS_M,
            tile_span: ISIN_TILE_SPAN_M,
        }
    }
}

impl IsinProjection {
    /// Western edge of the tiling in projection meters.
    pub fn x_min(&self) -> f64 {
        -(TILE_COLS as f64 / 2.0) * self.tile_span
    }

    /// Northern edge of the tiling in projection meters.
    pub fn y_max(&self) -> f64 {
        (TILE_ROWS as f64 / 2.0) * self.tile_span
    }

    /// Sinusoidal projection coordinates in meters.
    pub fn forward(&self, lat: f64, lon: f64) -> (f64, f64) {
        let phi = lat.clamp(-90.0, 90.0).to_radians();
        let lambda = lon.clamp(-180.0, 180.0).to_radians();
        (self.radius * lambda * phi.cos(), self.radius * phi)
    }

    /// Geographic coordinate of a projection coordinate.
    ///
    /// Points outside the sinusoidal envelope get their longitude clamped to
    /// [-180, 180]. At the poles the longitude is 0.
    pub fn inverse(&self, x: f64, y: f64) -> GeoPoint {
        let phi = (y / self.radius).clamp(-std::f64::consts::FRAC_PI_2, std::f64::consts::FRAC_PI_2);
        let cos_phi = phi.cos();
        let lon = if cos_phi.abs() < 1e-15 {
            0.0
        } else {
            (x / (self.radius * cos_phi)).to_degrees().clamp(-180.0, 180.0)
        };
        GeoPoint::new(phi.to_degrees(), lon)
    }

    /// Geographic center of an ISIN cell.
    pub fn cell_center(&self, point: &IsinPoint, tile_size: usize) -> GeoPoint {
        let pixel = self.tile_span / tile_size as f64;
        let x = self.x_min() + (point.tile_col * tile_size + point.pixel_col) as f64 * pixel + pixel / 2.0;
        let y = self.y_max() - (point.tile_row * tile_size + point.pixel_row) as f64 * pixel - pixel / 2.0;
        self.inverse(x, y)
    }
}

impl TileProjection for IsinProjection {
    fn locate(&self, lat: f64, lon: f64, tile_size: usize) -> IsinPoint {
        let (x, y) = self.forward(lat, lon);
        let pixel = self.tile_span / tile_size as f64;
        let col = clamp_pixel((x - self.x_min()) / pixel, TILE_COLS * tile_size);
        let row = clamp_pixel((self.y_max() - y) / pixel, TILE_ROWS * tile_size);
        IsinPoint::new(row / tile_size, col / tile_size, row % tile_size, col % tile_size)
    }
}

fn clamp_pixel(value: f64, len: usize) -> usize {
    let value = value.floor();
    if value.is_nan() || value <= 0.0 {
        0
    } else if value >= (len - 1) as f64 {
        len - 1
    } else {
        value as usize
    }
}

/// Tile size in pixels for a supported row count.
pub fn tile_size_for_rows(num_rows: usize) -> GridResult<usize> {
    if SUPPORTED_NUM_ROWS.contains(&num_rows) {
        Ok(num_rows / TILE_ROWS)
    } else {
        Err(GridError::invalid_config(format!(
            "tiled sinusoidal grid: num_rows must be one of {SUPPORTED_NUM_ROWS:?}, got {num_rows}"
        )))
    }
}

/// ISIN grid of 18 × 36 tiles with decimal-packed bin indices.
#[derive(Debug, Clone)]
pub struct TiledSinusoidalGrid<P: TileProjection = IsinProjection> {
    projection: P,
    num_rows: usize,
    tile_size: usize,
}

impl TiledSinusoidalGrid<IsinProjection> {
    /// Create the grid with `num_rows` pixel rows using the MODIS projection.
    pub fn new(num_rows: usize) -> GridResult<Self> {
        Self::with_projection(num_rows, IsinProjection::default())
    }

    /// Geographic center of a packed bin.
    ///
    /// Not part of the [`PlanetaryGrid`] contract: ISIN cells near the
    /// sinusoidal envelope have no well-defined geographic center.
    pub fn cell_center(&self, bin_index: u64) -> GridResult<GeoPoint> {
        let point = self.decode(bin_index)?;
        Ok(self.projection.cell_center(&point, self.tile_size))
    }
}

impl<P: TileProjection> TiledSinusoidalGrid<P> {
    /// Create the grid with a custom projection collaborator.
    pub fn with_projection(num_rows: usize, projection: P) -> GridResult<Self> {
        let tile_size = tile_size_for_rows(num_rows)?;
        debug!(num_rows, tile_size, "Built tiled sinusoidal grid");
        Ok(Self {
            projection,
            num_rows,
            tile_size,
        })
    }

    /// Pixels along each tile edge.
    pub fn tile_size(&self) -> usize {
        self.tile_size
    }

    pub fn projection(&self) -> &P {
        &self.projection
    }

    /// Tile and pixel coordinates of a (`lat`, `lon`) point.
    pub fn locate(&self, lat: f64, lon: f64) -> IsinPoint {
        self.projection.locate(lat, lon, self.tile_size)
    }

    /// Unpack and validate a bin index.
    pub fn decode(&self, bin_index: u64) -> GridResult<IsinPoint> {
        let point = IsinPoint::unpack(bin_index);
        if bin_index >= self.bin_index_bound() || !point.is_valid(self.tile_size) {
            return Err(GridError::BinOutOfRange {
                bin: bin_index,
                bound: self.bin_index_bound(),
            });
        }
        Ok(point)
    }
}

impl<P: TileProjection> PlanetaryGrid for TiledSinusoidalGrid<P> {
    fn bin_index(&self, lat: f64, lon: f64) -> u64 {
        self.locate(lat, lon).pack()
    }

    fn row_index(&self, bin_index: u64) -> GridResult<usize> {
        let point = self.decode(bin_index)?;
        Ok(point.tile_row * self.tile_size + point.pixel_row)
    }

    fn num_bins(&self) -> u64 {
        let cells_per_tile = self.tile_size as u64 * self.tile_size as u64;
        (TILE_ROWS * TILE_COLS) as u64 * cells_per_tile
    }

    fn num_rows(&self) -> usize {
        self.num_rows
    }

    fn num_cols(&self, row: usize) -> GridResult<usize> {
        check_row(row, self.num_rows)?;
        Ok(TILE_COLS * self.tile_size)
    }

    /// Packed index of the westernmost cell of a row. Rows are not contiguous
    /// in the packed index space.
    fn first_bin_index(&self, row: usize) -> GridResult<u64> {
        check_row(row, self.num_rows)?;
        Ok(IsinPoint::new(row / self.tile_size, 0, row % self.tile_size, 0).pack())
    }

    fn center_lat(&self, _row: usize) -> GridResult<f64> {
        Err(GridError::unsupported("center latitude of a tiled sinusoidal row"))
    }

    fn center_lat_lon(&self, _bin_index: u64) -> GridResult<GeoPoint> {
        Err(GridError::unsupported("center coordinate of a tiled sinusoidal bin"))
    }

    fn name(&self) -> &'static str {
        "tiled-sinusoidal"
    }

    fn bin_index_bound(&self) -> u64 {
        let last = self.tile_size - 1;
        IsinPoint::new(TILE_ROWS - 1, TILE_COLS - 1, last, last).pack() + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pack_origin() {
        assert_eq!(IsinPoint::new(0, 0, 0, 0).pack(), 0);
    }

    #[test]
    fn test_pack_round_trip_at_extremes() {
        let point = IsinPoint::new(17, 35, 4799, 4799);
        assert_eq!(point.pack(), 173_500_000_000 + 47_990_000 + 4799);
        assert_eq!(IsinPoint::unpack(point.pack()), point);
    }

    #[test]
    fn test_supported_row_counts() {
        assert_eq!(TiledSinusoidalGrid::new(21_600).unwrap().tile_size(), 1200);
        assert_eq!(TiledSinusoidalGrid::new(43_200).unwrap().tile_size(), 2400);
        assert_eq!(TiledSinusoidalGrid::new(86_400).unwrap().tile_size(), 4800);
        assert!(TiledSinusoidalGrid::new(2160).is_err());
    }

    #[test]
    fn test_counts_and_bound() {
        let grid = TiledSinusoidalGrid::new(21_600).unwrap();
        assert_eq!(grid.num_bins(), 18 * 36 * 1200 * 1200);
        assert_eq!(grid.bin_index_bound(), IsinPoint::new(17, 35, 1199, 1199).pack() + 1);
        assert_eq!(grid.num_cols(0).unwrap(), 43_200);
        assert!(grid.num_cols(21_600).is_err());
    }

    #[test]
    fn test_row_index_decodes_fields() {
        let grid = TiledSinusoidalGrid::new(21_600).unwrap();
        let bin = IsinPoint::new(3, 20, 17, 5).pack();
        assert_eq!(grid.row_index(bin).unwrap(), 3 * 1200 + 17);
        // Pixel row beyond the tile size.
        assert!(grid.row_index(IsinPoint::new(0, 0, 1200, 0).pack()).is_err());
        // Tile column beyond 35.
        assert!(grid.row_index(IsinPoint::new(0, 36, 0, 0).pack()).is_err());
        assert!(grid.row_index(grid.bin_index_bound()).is_err());
    }

    #[test]
    fn test_first_bin_index() {
        let grid = TiledSinusoidalGrid::new(21_600).unwrap();
        assert_eq!(grid.first_bin_index(0).unwrap(), 0);
        assert_eq!(grid.first_bin_index(1201).unwrap(), IsinPoint::new(1, 0, 1, 0).pack());
        let first = grid.first_bin_index(21_599).unwrap();
        assert_eq!(grid.row_index(first).unwrap(), 21_599);
    }

    #[test]
    fn test_locate_known_tiles() {
        let grid = TiledSinusoidalGrid::new(21_600).unwrap();
        // Just north-east of (0, 0) is tile h18v08, bottom-left pixel.
        assert_eq!(grid.locate(0.001, 0.001), IsinPoint::new(8, 18, 1199, 0));
        // Just south-west of (0, 0) is tile h17v09, top-right pixel.
        assert_eq!(grid.locate(-0.001, -0.001), IsinPoint::new(9, 17, 0, 1199));
        // Poles and the antimeridian clamp.
        assert_eq!(grid.locate(91.0, 0.0).tile_row, 0);
        assert_eq!(grid.locate(-91.0, 0.0).tile_row, 17);
        assert_eq!(grid.locate(0.0, 181.0).tile_col, 35);
        assert_eq!(grid.locate(0.0, -181.0).tile_col, 0);
    }

    #[test]
    fn test_center_queries_unsupported() {
        let grid = TiledSinusoidalGrid::new(21_600).unwrap();
        assert!(matches!(grid.center_lat(0), Err(GridError::Unsupported(_))));
        assert!(matches!(grid.center_lat_lon(0), Err(GridError::Unsupported(_))));
    }

    #[test]
    fn test_cell_center_round_trip() {
        let grid = TiledSinusoidalGrid::new(21_600).unwrap();
        for (lat, lon) in [(45.3, 10.7), (-33.9, 151.2), (0.2, -0.2), (64.1, -21.9)] {
            let bin = grid.bin_index(lat, lon);
            let center = grid.cell_center(bin).unwrap();
            assert_eq!(grid.bin_index(center.lat, center.lon), bin);
        }
    }
}
