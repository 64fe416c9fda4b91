//! Reference layouts, sample coordinates and config documents.

/// The 6-row equal-area grid used throughout the tests.
pub mod toy_grid {
    pub const NUM_ROWS: usize = 6;

    /// Columns per row, north to south.
    pub const COLS: [usize; 6] = [3, 8, 12, 12, 8, 3];

    /// First bin of each row.
    pub const FIRST_BINS: [u64; 6] = [0, 3, 11, 23, 35, 43];

    pub const NUM_BINS: u64 = 46;

    /// (native bin, legacy bin) pairs with known values.
    pub const LEGACY_ANCHORS: [(u64, i32); 4] = [(0, 44), (2, 46), (43, 1), (45, 3)];
}

/// Named coordinates as `(lat, lon)` in degrees.
pub mod points {
    pub const NORTH_POLE: (f64, f64) = (90.0, 0.0);
    pub const SOUTH_POLE: (f64, f64) = (-90.0, 0.0);
    pub const NULL_ISLAND: (f64, f64) = (0.0, 0.0);
    pub const ANTIMERIDIAN_EAST: (f64, f64) = (0.0, 180.0);
    pub const ANTIMERIDIAN_WEST: (f64, f64) = (0.0, -180.0);

    pub const KANSAS_CITY: (f64, f64) = (39.0997, -94.5786);
    pub const REYKJAVIK: (f64, f64) = (64.1466, -21.9426);
    pub const SYDNEY: (f64, f64) = (-33.8688, 151.2093);
    pub const MCMURDO: (f64, f64) = (-77.8419, 166.6863);

    /// Cities spread over both hemispheres and both sides of Greenwich.
    pub const CITIES: [(f64, f64); 4] = [KANSAS_CITY, REYKJAVIK, SYDNEY, MCMURDO];

    /// Coordinates outside the nominal lat/lon domain.
    pub const OUT_OF_RANGE: [(f64, f64); 4] = [(91.0, 0.0), (-95.0, 10.0), (10.0, 181.0), (-10.0, -200.0)];
}

/// YAML config documents.
pub mod configs {
    pub const EQUAL_AREA: &str = "grid:\n  type: equal_area\n  num_rows: 2160\n";

    pub const EQUAL_AREA_BY_RESOLUTION: &str = "grid:\n  type: equal_area\n  resolution_km: 4.64\n";

    pub const ROTATED: &str = "\
grid:
  type: rotated_lat_lon
  num_rows: 180
  pole_lat: 40.0
  pole_lon: -170.0
legacy_index: true
";

    pub const REDUCED_GAUSSIAN: &str = "grid:\n  type: reduced_gaussian\n  num_rows: 64\n";

    pub const ISIN: &str = "grid:\n  type: tiled_sinusoidal\n  num_rows: 21600\n";

    pub const HRRR: &str = "\
grid:
  type: projected
  projection:
    type: hrrr
  bounds:
    min_x: -2699020.0
    min_y: -1588806.0
    max_x: 2697980.0
    max_y: 1588194.0
  pixel_size: 3000.0
";

    pub const ODD_ROWS: &str = "grid:\n  type: regular_lat_lon\n  num_rows: 181\n";

    pub const UNKNOWN_TYPE: &str = "grid:\n  type: hexagonal\n  num_rows: 10\n";
}
