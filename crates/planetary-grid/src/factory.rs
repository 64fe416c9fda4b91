//! Build grids from configuration.
//!
//! # Example
//!
//! ```rust,ignore
//! use planetary_grid::{build_grid, GridConfig};
//!
//! let config = GridConfig::from_file("grid.yaml")?;
//! let grid = build_grid(&config)?;
//! let bin = grid.bin_index(45.0, -120.0);
//! ```

use crate::config::{GridConfig, GridKind, ProjectionConfig};
use crate::equal_area::{EqualAreaGrid, DEFAULT_NUM_ROWS};
use crate::error::{GridError, GridResult};
use crate::gaussian::{ReducedGaussianGrid, RegularGaussianGrid};
use crate::grid::PlanetaryGrid;
use crate::isin::TiledSinusoidalGrid;
use crate::lat_lon::RegularLatLonGrid;
use crate::legacy::LegacyIndexAdapter;
use crate::projected::ProjectedGrid;
use crate::projection::{Geographic, LambertConformal, MapProjection};
use crate::rotated::RotatedLatLonGrid;
use tracing::info;

/// Build the grid described by `config`.
pub fn build_grid(config: &GridConfig) -> GridResult<Box<dyn PlanetaryGrid>> {
    config.validate()?;

    let grid: Box<dyn PlanetaryGrid> = match &config.grid {
        GridKind::EqualArea {
            num_rows,
            resolution_km,
        } => match (num_rows, resolution_km) {
            (None, Some(km)) => Box::new(EqualAreaGrid::from_resolution_km(*km)?),
            (rows, _) => Box::new(EqualAreaGrid::new(rows.unwrap_or(DEFAULT_NUM_ROWS))?),
        },
        GridKind::RegularLatLon { num_rows } => Box::new(RegularLatLonGrid::new(*num_rows)?),
        GridKind::RotatedLatLon {
            num_rows,
            pole_lat,
            pole_lon,
        } => Box::new(RotatedLatLonGrid::new(*num_rows, *pole_lat, *pole_lon)?),
        GridKind::RegularGaussian { num_rows } => Box::new(RegularGaussianGrid::new(*num_rows)?),
        GridKind::ReducedGaussian { num_rows } => Box::new(ReducedGaussianGrid::new(*num_rows)?),
        GridKind::TiledSinusoidal { num_rows } => Box::new(TiledSinusoidalGrid::new(*num_rows)?),
        GridKind::Projected { .. } => Box::new(build_projected_grid(config)?),
    };

    let summary = grid.summary();
    info!(
        grid = %summary.name,
        num_rows = summary.num_rows,
        num_bins = summary.num_bins,
        min_cols = summary.min_cols,
        max_cols = summary.max_cols,
        legacy_index = config.legacy_index,
        "Built planetary grid"
    );

    Ok(grid)
}

/// Build a projected grid, keeping access to its projection and tiling.
///
/// Fails with [`GridError::Unsupported`] for the global grid kinds.
pub fn build_projected_grid(config: &GridConfig) -> GridResult<ProjectedGrid<Box<dyn MapProjection>>> {
    let GridKind::Projected {
        projection,
        bounds,
        pixel_size,
    } = &config.grid
    else {
        return Err(GridError::unsupported(format!(
            "{} grid has no projected extent",
            config.grid.type_name()
        )));
    };

    let projection: Box<dyn MapProjection> = match projection {
        ProjectionConfig::Geographic => Box::new(Geographic),
        ProjectionConfig::LambertConformal {
            lat0,
            lon0,
            latin1,
            latin2,
            earth_radius,
        } => Box::new(LambertConformal::new(*lat0, *lon0, *latin1, *latin2, *earth_radius)?),
        ProjectionConfig::Hrrr => Box::new(LambertConformal::hrrr()),
    };
    ProjectedGrid::new(projection, *bounds, *pixel_size)
}

/// Build the grid described by `config` wrapped in a legacy index adapter.
pub fn build_legacy_adapter(config: &GridConfig) -> GridResult<LegacyIndexAdapter<Box<dyn PlanetaryGrid>>> {
    LegacyIndexAdapter::new(build_grid(config)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bbox::BoundingBox;

    #[test]
    fn test_build_every_kind() {
        let kinds = [
            (GridKind::EqualArea { num_rows: Some(180), resolution_km: None }, "equal-area"),
            (GridKind::RegularLatLon { num_rows: 180 }, "plate-carree"),
            (
                GridKind::RotatedLatLon { num_rows: 180, pole_lat: 40.0, pole_lon: -170.0 },
                "rotated-plate-carree",
            ),
            (GridKind::RegularGaussian { num_rows: 64 }, "regular-gaussian"),
            (GridKind::ReducedGaussian { num_rows: 64 }, "reduced-gaussian"),
            (GridKind::TiledSinusoidal { num_rows: 21_600 }, "tiled-sinusoidal"),
            (
                GridKind::Projected {
                    projection: ProjectionConfig::Geographic,
                    bounds: BoundingBox::new(-10.0, -10.0, 10.0, 10.0),
                    pixel_size: 1.0,
                },
                "projected",
            ),
        ];
        for (kind, name) in kinds {
            let grid = build_grid(&GridConfig::new(kind)).unwrap();
            assert_eq!(grid.name(), name);
        }
    }

    #[test]
    fn test_build_from_resolution() {
        let config = GridConfig::new(GridKind::EqualArea {
            num_rows: None,
            resolution_km: Some(9.28),
        });
        assert_eq!(build_grid(&config).unwrap().num_rows(), DEFAULT_NUM_ROWS);
    }

    #[test]
    fn test_build_rejects_invalid_config() {
        let config = GridConfig::new(GridKind::ReducedGaussian { num_rows: 65 });
        assert!(matches!(build_grid(&config), Err(GridError::UnsupportedGaussianSize(65))));
    }

    #[test]
    fn test_legacy_adapter() {
        let adapter = build_legacy_adapter(&GridConfig::new(GridKind::EqualArea {
            num_rows: Some(6),
            resolution_km: None,
        }))
        .unwrap();
        assert_eq!(adapter.convert_bin(0).unwrap(), 44);

        let isin = GridConfig::new(GridKind::TiledSinusoidal { num_rows: 21_600 });
        assert!(matches!(
            build_legacy_adapter(&isin),
            Err(GridError::LegacyRangeExceeded { .. })
        ));
    }

    #[test]
    fn test_build_projected_grid() {
        let config = GridConfig::new(GridKind::Projected {
            projection: ProjectionConfig::Hrrr,
            bounds: BoundingBox::new(-300_000.0, -150_000.0, 300_000.0, 150_000.0),
            pixel_size: 3000.0,
        });
        let grid = build_projected_grid(&config).unwrap();
        assert_eq!(grid.width(), 200);
        assert_eq!(grid.num_rows(), 100);
        assert_eq!(grid.projection().name(), "lambert-conformal");
        // The projection origin sits on the corner shared by four pixels.
        assert_eq!(grid.bin_index(38.5 + 1e-6, -97.5 + 1e-6), 49 * 200 + 100);

        let global = GridConfig::new(GridKind::RegularLatLon { num_rows: 180 });
        assert!(matches!(build_projected_grid(&global), Err(GridError::Unsupported(_))));
    }
}
