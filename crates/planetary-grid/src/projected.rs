//! Uniform pixel grid in a map projection.
//!
//! Unlike the global grids, a projected grid covers a rectangular extent in
//! projection coordinates (a model domain such as HRRR CONUS). Rows run from
//! the top of the extent down and columns from its left edge, with square
//! pixels. Points outside the extent clamp to the nearest edge pixel.

use crate::bbox::BoundingBox;
use crate::error::{GridError, GridResult};
use crate::grid::{check_bin, check_row, clamp_index, GeoPoint, PlanetaryGrid};
use crate::projection::{LambertConformal, MapProjection};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Boundary samples per edge when projecting a geographic region.
const REGION_EDGE_SAMPLES: usize = 64;

/// A rectangle of pixels: `x` is the first column, `y` the first row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileRect {
    pub x: usize,
    pub y: usize,
    pub width: usize,
    pub height: usize,
}

/// Square-pixel grid over a rectangle in projection coordinates.
#[derive(Debug, Clone)]
pub struct ProjectedGrid<P: MapProjection> {
    projection: P,
    bounds: BoundingBox,
    pixel_size: f64,
    num_rows: usize,
    num_cols: usize,
}

impl<P: MapProjection> ProjectedGrid<P> {
    /// Create a grid over `bounds` (projection units) with square pixels of
    /// `pixel_size` units.
    pub fn new(projection: P, bounds: BoundingBox, pixel_size: f64) -> GridResult<Self> {
        if !pixel_size.is_finite() || pixel_size <= 0.0 {
            return Err(GridError::invalid_config(format!(
                "projected grid: pixel size must be positive, got {pixel_size}"
            )));
        }
        if bounds.is_empty() {
            return Err(GridError::invalid_config(format!(
                "projected grid: empty bounds {bounds:?}"
            )));
        }

        let num_cols = pixel_count(bounds.width(), pixel_size);
        let num_rows = pixel_count(bounds.height(), pixel_size);
        debug!(
            projection = projection.name(),
            num_rows, num_cols, pixel_size, "Built projected grid"
        );

        Ok(Self {
            projection,
            bounds,
            pixel_size,
            num_rows,
            num_cols,
        })
    }

    pub fn projection(&self) -> &P {
        &self.projection
    }

    pub fn bounds(&self) -> &BoundingBox {
        &self.bounds
    }

    pub fn pixel_size(&self) -> f64 {
        self.pixel_size
    }

    /// Columns in every row.
    pub fn width(&self) -> usize {
        self.num_cols
    }

    /// Fractional (`col`, `row`) pixel position of a projection coordinate,
    /// unclamped.
    fn pixel_position(&self, x: f64, y: f64) -> (f64, f64) {
        (
            (x - self.bounds.min_x) / self.pixel_size,
            (self.bounds.max_y - y) / self.pixel_size,
        )
    }

    /// Projection coordinate of a pixel center.
    fn pixel_center(&self, row: usize, col: usize) -> (f64, f64) {
        (
            self.bounds.min_x + (col as f64 + 0.5) * self.pixel_size,
            self.bounds.max_y - (row as f64 + 0.5) * self.pixel_size,
        )
    }

    /// Pixel rectangles covering a geographic region, split into tiles of at
    /// most `tile_size × tile_size` pixels aligned to multiples of `tile_size`.
    ///
    /// `region` holds longitudes in `x` and latitudes in `y`. Its boundary is
    /// densified and projected, so curved edges in the projection are
    /// covered. The projected extent is clipped to the grid bounds; a region
    /// that misses the grid yields no tiles.
    pub fn tile_rectangles(&self, region: &BoundingBox, tile_size: usize) -> GridResult<Vec<TileRect>> {
        if tile_size == 0 {
            return Err(GridError::invalid_config("tile size must be positive"));
        }

        let projected = region
            .boundary_points(REGION_EDGE_SAMPLES)
            .into_iter()
            .map(|(lon, lat)| self.projection.forward(lat, lon));
        let Some(extent) = BoundingBox::enclosing(projected).and_then(|e| e.intersection(&self.bounds))
        else {
            return Ok(Vec::new());
        };

        let (left, top) = self.pixel_position(extent.min_x, extent.max_y);
        let (right, bottom) = self.pixel_position(extent.max_x, extent.min_y);
        let col0 = clamp_index(left.floor(), self.num_cols);
        let row0 = clamp_index(top.floor(), self.num_rows);
        let col1 = (right.ceil() as usize).min(self.num_cols);
        let row1 = (bottom.ceil() as usize).min(self.num_rows);
        if col0 >= col1 || row0 >= row1 {
            return Ok(Vec::new());
        }

        let mut tiles = Vec::new();
        let mut y = row0;
        while y < row1 {
            let y_end = ((y / tile_size + 1) * tile_size).min(row1);
            let mut x = col0;
            while x < col1 {
                let x_end = ((x / tile_size + 1) * tile_size).min(col1);
                tiles.push(TileRect {
                    x,
                    y,
                    width: x_end - x,
                    height: y_end - y,
                });
                x = x_end;
            }
            y = y_end;
        }
        Ok(tiles)
    }
}

impl ProjectedGrid<LambertConformal> {
    /// The 1799 × 1059 HRRR CONUS domain at 3 km.
    pub fn hrrr() -> GridResult<Self> {
        let projection = LambertConformal::hrrr();
        let (x0, y0) = projection.forward(21.138123, -122.719528);
        // First grid point is a pixel center.
        let half = 1500.0;
        let bounds = BoundingBox::new(
            x0 - half,
            y0 - half,
            x0 - half + 1799.0 * 3000.0,
            y0 - half + 1059.0 * 3000.0,
        );
        Self::new(projection, bounds, 3000.0)
    }
}

/// Pixels needed to cover `extent`, tolerating rounding in exact multiples.
fn pixel_count(extent: f64, pixel_size: f64) -> usize {
    let count = (extent / pixel_size - 1e-9).ceil();
    (count as usize).max(1)
}

impl<P: MapProjection> PlanetaryGrid for ProjectedGrid<P> {
    fn bin_index(&self, lat: f64, lon: f64) -> u64 {
        let (x, y) = self.projection.forward(lat, lon);
        let (col, row) = self.pixel_position(x, y);
        let col = clamp_index(col.floor(), self.num_cols);
        let row = clamp_index(row.floor(), self.num_rows);
        row as u64 * self.num_cols as u64 + col as u64
    }

    fn row_index(&self, bin_index: u64) -> GridResult<usize> {
        check_bin(bin_index, self.num_bins())?;
        Ok((bin_index / self.num_cols as u64) as usize)
    }

    fn num_bins(&self) -> u64 {
        self.num_rows as u64 * self.num_cols as u64
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

    /// Latitude of the row's middle pixel. Rows of a conic projection are not
    /// parallels, so this is representative only.
    fn center_lat(&self, row: usize) -> GridResult<f64> {
        check_row(row, self.num_rows)?;
        let (x, y) = self.pixel_center(row, self.num_cols / 2);
        Ok(self.projection.inverse(x, y).0)
    }

    fn center_lat_lon(&self, bin_index: u64) -> GridResult<GeoPoint> {
        let row = self.row_index(bin_index)?;
        let col = (bin_index % self.num_cols as u64) as usize;
        let (x, y) = self.pixel_center(row, col);
        let (lat, lon) = self.projection.inverse(x, y);
        Ok(GeoPoint::new(lat, lon))
    }

    fn name(&self) -> &'static str {
        "projected"
    }
}
