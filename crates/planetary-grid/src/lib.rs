//! Planetary spatial-binning grids.
//!
//! Every grid partitions the sphere into numbered cells ("bins") and answers
//! the same questions through the [`PlanetaryGrid`] trait: which bin holds a
//! coordinate, which row holds a bin, and where a bin's center is.
//!
//! - **Equal-area**: the SeaDAS level-3 grid, fewer columns towards the poles
//! - **Plate-carrée**: regular lat/lon, optionally in a rotated-pole frame
//! - **Gaussian**: regular and reduced grids on Gaussian quadrature latitudes
//! - **Tiled sinusoidal**: the MODIS ISIN tiling with decimal-packed indices
//! - **Projected**: square pixels over a map-projection extent (e.g. HRRR)
//!
//! # Architecture
//!
//! ```text
//! GridConfig (YAML / env)
//!      │
//!      ▼
//! build_grid() ──► Box<dyn PlanetaryGrid>
//!                        │
//!                        ├─► bin_index(lat, lon)     coordinates → bin (clamps)
//!                        ├─► row_index(bin)          bin → row (checked)
//!                        ├─► center_lat_lon(bin)     bin → center
//!                        │
//!                        └─► LegacyIndexAdapter      1-based, south-to-north i32 bins
//! ```
//!
//! # Example
//!
//! ```
//! use planetary_grid::{EqualAreaGrid, PlanetaryGrid};
//!
//! let grid = EqualAreaGrid::new(2160).unwrap();
//! let bin = grid.bin_index(45.0, -120.0);
//! let center = grid.center_lat_lon(bin).unwrap();
//! assert_eq!(grid.bin_index(center.lat, center.lon), bin);
//! ```

pub mod bbox;
pub mod config;
pub mod equal_area;
pub mod error;
pub mod factory;
pub mod gaussian;
pub mod grid;
pub mod isin;
pub mod lat_lon;
pub mod legacy;
pub mod projected;
pub mod projection;
pub mod rotated;
pub mod rotation;
pub mod validation;

// Re-export commonly used types at crate root
pub use bbox::BoundingBox;
pub use config::{GridConfig, GridKind, ProjectionConfig};
pub use equal_area::EqualAreaGrid;
pub use error::{GridError, GridResult};
pub use factory::{build_grid, build_legacy_adapter, build_projected_grid};
pub use gaussian::{GaussianRowTable, ReducedGaussianGrid, RegularGaussianGrid};
pub use grid::{GeoPoint, GridLayoutSummary, PlanetaryGrid, MAX_NUM_ROWS};
pub use isin::{IsinPoint, IsinProjection, TileProjection, TiledSinusoidalGrid};
pub use lat_lon::RegularLatLonGrid;
pub use legacy::LegacyIndexAdapter;
pub use projected::{ProjectedGrid, TileRect};
pub use projection::{Geographic, LambertConformal, MapProjection};
pub use rotated::RotatedLatLonGrid;
pub use rotation::PoleRotation;
pub use validation::{LayoutReport, RoundTripReport};
