//! Grid configuration from YAML files and environment variables.
//!
//! ```yaml
//! grid:
//!   type: rotated_lat_lon
//!   num_rows: 360
//!   pole_lat: 40.0
//!   pole_lon: -170.0
//! legacy_index: false
//! ```

use crate::bbox::BoundingBox;
use crate::equal_area::{num_rows_for_resolution, DEFAULT_NUM_ROWS};
use crate::error::{GridError, GridResult};
use crate::gaussian::gaussian_number;
use crate::grid::check_even_rows;
use crate::isin::tile_size_for_rows;
use crate::projection::NCEP_EARTH_RADIUS_M;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::warn;

/// A grid definition plus export options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridConfig {
    pub grid: GridKind,

    /// Export bins in the legacy south-to-north, 1-based numbering.
    #[serde(default)]
    pub legacy_index: bool,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            grid: GridKind::EqualArea {
                num_rows: Some(DEFAULT_NUM_ROWS),
                resolution_km: None,
            },
            legacy_index: false,
        }
    }
}

/// The tessellation to build and its parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GridKind {
    /// Equal-area grid, sized by row count or by resolution.
    EqualArea {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        num_rows: Option<usize>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        resolution_km: Option<f64>,
    },
    RegularLatLon {
        num_rows: usize,
    },
    RotatedLatLon {
        num_rows: usize,
        pole_lat: f64,
        pole_lon: f64,
    },
    RegularGaussian {
        num_rows: usize,
    },
    ReducedGaussian {
        num_rows: usize,
    },
    TiledSinusoidal {
        num_rows: usize,
    },
    Projected {
        projection: ProjectionConfig,
        /// Extent in projection units.
        bounds: BoundingBox,
        pixel_size: f64,
    },
}

/// Map projection of a [`GridKind::Projected`] grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProjectionConfig {
    Geographic,
    LambertConformal {
        lat0: f64,
        lon0: f64,
        latin1: f64,
        latin2: f64,
        #[serde(default = "default_earth_radius")]
        earth_radius: f64,
    },
    /// The HRRR CONUS Lambert projection.
    Hrrr,
}

fn default_earth_radius() -> f64 {
    NCEP_EARTH_RADIUS_M
}

impl GridKind {
    /// Build a grid kind from a type name and row count.
    ///
    /// Names are case-insensitive and accept `-` for `_`. Rotated grids get
    /// an unrotated pole. Projected grids need explicit bounds and cannot be
    /// named this way.
    pub fn parse_name(name: &str, num_rows: usize) -> GridResult<Self> {
        let normalized = name.trim().to_lowercase().replace('-', "_");
        let kind = match normalized.as_str() {
            "equal_area" | "seagrid" | "sea_grid" | "seadas" | "isea" => Self::EqualArea {
                num_rows: Some(num_rows),
                resolution_km: None,
            },
            "regular_lat_lon" | "lat_lon" | "latlon" | "plate_carree" | "platecarree" | "regular" => {
                Self::RegularLatLon { num_rows }
            }
            "rotated_lat_lon" | "rotated" | "rotated_plate_carree" => Self::RotatedLatLon {
                num_rows,
                pole_lat: 90.0,
                pole_lon: 0.0,
            },
            "regular_gaussian" | "gaussian" | "full_gaussian" => Self::RegularGaussian { num_rows },
            "reduced_gaussian" | "reduced" | "octahedral_free_reduced" => {
                Self::ReducedGaussian { num_rows }
            }
            "tiled_sinusoidal" | "isin" | "sinusoidal" | "modis" => Self::TiledSinusoidal { num_rows },
            _ => {
                return Err(GridError::invalid_config(format!("unknown grid type '{name}'")));
            }
        };
        Ok(kind)
    }

    /// The `type` tag of this kind.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::EqualArea { .. } => "equal_area",
            Self::RegularLatLon { .. } => "regular_lat_lon",
            Self::RotatedLatLon { .. } => "rotated_lat_lon",
            Self::RegularGaussian { .. } => "regular_gaussian",
            Self::ReducedGaussian { .. } => "reduced_gaussian",
            Self::TiledSinusoidal { .. } => "tiled_sinusoidal",
            Self::Projected { .. } => "projected",
        }
    }
}

impl GridConfig {
    pub fn new(grid: GridKind) -> Self {
        Self {
            grid,
            legacy_index: false,
        }
    }

    /// Parse and validate a YAML document.
    pub fn from_yaml_str(yaml: &str) -> GridResult<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a YAML file.
    pub fn from_file(path: impl AsRef<Path>) -> GridResult<Self> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        Self::from_yaml_str(&contents)
    }

    /// Load configuration from environment variables.
    ///
    /// | Variable | Meaning | Default |
    /// |---|---|---|
    /// | `GRID_TYPE` | grid type name (see [`GridKind::parse_name`]) | `equal_area` |
    /// | `GRID_NUM_ROWS` | row count | 2160 |
    /// | `GRID_RESOLUTION_KM` | equal-area resolution, overrides the row count | |
    /// | `GRID_POLE_LAT`, `GRID_POLE_LON` | rotated pole | 90, 0 |
    /// | `GRID_LEGACY_INDEX` | `true`/`1` to export legacy bins | false |
    pub fn from_env() -> GridResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// [`from_env`](Self::from_env) with a custom variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> GridResult<Self> {
        let num_rows = parse_var(&lookup, "GRID_NUM_ROWS").unwrap_or(DEFAULT_NUM_ROWS);
        let type_name = lookup("GRID_TYPE").unwrap_or_else(|| "equal_area".to_string());
        let mut grid = GridKind::parse_name(&type_name, num_rows)?;

        match &mut grid {
            GridKind::EqualArea {
                num_rows,
                resolution_km,
            } => {
                if let Some(km) = parse_var(&lookup, "GRID_RESOLUTION_KM") {
                    *num_rows = None;
                    *resolution_km = Some(km);
                }
            }
            GridKind::RotatedLatLon {
                pole_lat, pole_lon, ..
            } => {
                if let Some(lat) = parse_var(&lookup, "GRID_POLE_LAT") {
                    *pole_lat = lat;
                }
                if let Some(lon) = parse_var(&lookup, "GRID_POLE_LON") {
                    *pole_lon = lon;
                }
            }
            _ => {}
        }

        let legacy_index = lookup("GRID_LEGACY_INDEX")
            .map(|val| val.to_lowercase() == "true" || val == "1")
            .unwrap_or(false);

        let config = Self { grid, legacy_index };
        config.validate()?;
        Ok(config)
    }

    /// Check parameters without building the grid.
    pub fn validate(&self) -> GridResult<()> {
        match &self.grid {
            GridKind::EqualArea {
                num_rows,
                resolution_km,
            } => match (num_rows, resolution_km) {
                (Some(_), Some(_)) => Err(GridError::invalid_config(
                    "equal_area: set either num_rows or resolution_km, not both",
                )),
                (Some(rows), None) => check_even_rows("equal_area", *rows),
                (None, Some(km)) => num_rows_for_resolution(*km).map(|_| ()),
                (None, None) => Ok(()),
            },
            GridKind::RegularLatLon { num_rows } => {
                check_even_rows("regular_lat_lon", *num_rows)
            }
            GridKind::RotatedLatLon {
                num_rows,
                pole_lat,
                pole_lon,
            } => {
                check_even_rows("rotated_lat_lon", *num_rows)?;
                if !pole_lat.is_finite() || !pole_lon.is_finite() || pole_lat.abs() > 90.0 {
                    return Err(GridError::invalid_config(format!(
                        "rotated_lat_lon: invalid pole ({pole_lat}, {pole_lon})"
                    )));
                }
                Ok(())
            }
            GridKind::RegularGaussian { num_rows } | GridKind::ReducedGaussian { num_rows } => {
                gaussian_number(*num_rows).map(|_| ())
            }
            GridKind::TiledSinusoidal { num_rows } => tile_size_for_rows(*num_rows).map(|_| ()),
            GridKind::Projected {
                bounds, pixel_size, ..
            } => {
                if !pixel_size.is_finite() || *pixel_size <= 0.0 {
                    return Err(GridError::invalid_config(format!(
                        "projected: pixel_size must be positive, got {pixel_size}"
                    )));
                }
                if bounds.is_empty() {
                    return Err(GridError::invalid_config("projected: bounds must have positive area"));
                }
                Ok(())
            }
        }
    }
}

/// Parse an optional variable, ignoring (with a warning) values that do not parse.
fn parse_var<T: std::str::FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!(key, value = %raw, "Ignoring unparsable grid setting");
            None
        }
    }
}
