//! Projected grids: Lambert conformal domains and tile coverage.

use planetary_grid::validation::{check_center_round_trip, check_row_layout, sample_bins};
use planetary_grid::{
    BoundingBox, Geographic, LambertConformal, MapProjection, PlanetaryGrid, ProjectedGrid,
};
use test_utils::assert_lat_lon_close;
use test_utils::fixtures::points;
use test_utils::generators::coordinate_lattice;

#[test]
fn test_secant_lambert_round_trip_over_conus() {
    let proj = LambertConformal::new(23.0, -96.0, 33.0, 45.0, 6_371_229.0).unwrap();
    for (lat, lon) in coordinate_lattice(20, 30) {
        // Keep to the hemisphere the cone opens towards.
        if lat < -60.0 || (lon + 96.0).abs() > 150.0 {
            continue;
        }
        let (x, y) = proj.forward(lat, lon);
        let (lat2, lon2) = proj.inverse(x, y);
        assert_lat_lon_close!((lat2, lon2), (lat, lon), 1e-8);
    }
}

#[test]
fn test_hrrr_domain_layout() {
    let grid = ProjectedGrid::hrrr().unwrap();
    assert_eq!(grid.width(), 1799);
    assert_eq!(grid.num_rows(), 1059);
    assert_eq!(grid.num_bins(), 1799 * 1059);
    assert!(check_row_layout(&grid).is_ok());
}

#[test]
fn test_hrrr_locates_kansas_city() {
    let grid = ProjectedGrid::hrrr().unwrap();
    let (lat, lon) = points::KANSAS_CITY;
    let bin = grid.bin_index(lat, lon);
    assert_eq!(bin, 505 * 1799 + 983);

    let center = grid.center_lat_lon(bin).unwrap();
    assert!((center.lat - lat).abs() < 0.03);
    assert!((center.lon - lon).abs() < 0.03);
}

#[test]
fn test_hrrr_center_round_trip() {
    let grid = ProjectedGrid::hrrr().unwrap();
    let bins = sample_bins(grid.num_bins(), 20_000);
    let report = check_center_round_trip(&grid, &bins);
    assert!(report.is_ok(), "{:?}", report.failures);
}

#[test]
fn test_points_outside_domain_clamp() {
    let grid = ProjectedGrid::hrrr().unwrap();
    // Sydney projects far outside CONUS but still lands on an edge pixel.
    let (lat, lon) = points::SYDNEY;
    let bin = grid.bin_index(lat, lon);
    assert!(bin < grid.num_bins());
    let row = grid.row_index(bin).unwrap();
    let col = bin - grid.first_bin_index(row).unwrap();
    assert!(row == 0 || row == 1058 || col == 0 || col == 1798);
}

#[test]
fn test_extreme_longitudes_terminate() {
    let grid = ProjectedGrid::hrrr().unwrap();
    for lon in [f64::INFINITY, f64::NEG_INFINITY, 1e300, -1e300, f64::MAX] {
        assert!(grid.bin_index(40.0, lon) < grid.num_bins(), "lon {lon}");
    }
    // A full turn east of the central meridian is the central meridian.
    assert_eq!(grid.bin_index(40.0, -97.5 + 720.0), grid.bin_index(40.0, -97.5));
}

#[test]
fn test_tiles_cover_whole_domain() {
    let grid = ProjectedGrid::hrrr().unwrap();
    let region = BoundingBox::new(-140.0, 10.0, -50.0, 60.0);
    let tiles = grid.tile_rectangles(&region, 256).unwrap();

    assert_eq!(tiles.len(), 8 * 5);
    let area: usize = tiles.iter().map(|t| t.width * t.height).sum();
    assert_eq!(area as u64, grid.num_bins());
    for tile in &tiles {
        assert!(tile.x % 256 == 0 && tile.y % 256 == 0, "{tile:?}");
        assert!(tile.x + tile.width <= 1799 && tile.y + tile.height <= 1059);
    }
}

#[test]
fn test_tiles_for_a_state() {
    let grid = ProjectedGrid::hrrr().unwrap();
    // Kansas, roughly.
    let region = BoundingBox::new(-102.05, 36.99, -94.59, 40.0);
    let tiles = grid.tile_rectangles(&region, 64).unwrap();
    assert!(!tiles.is_empty());

    // Every corner of the region falls inside some tile.
    for (lon, lat) in [(-102.05, 36.99), (-94.59, 36.99), (-102.05, 40.0), (-94.59, 40.0)] {
        let bin = grid.bin_index(lat, lon);
        let row = grid.row_index(bin).unwrap();
        let col = (bin - grid.first_bin_index(row).unwrap()) as usize;
        assert!(
            tiles.iter().any(|t| (t.x..t.x + t.width).contains(&col) && (t.y..t.y + t.height).contains(&row)),
            "({lat}, {lon}) not covered"
        );
    }

    // Tiles never overlap.
    for (i, a) in tiles.iter().enumerate() {
        for b in &tiles[i + 1..] {
            let disjoint = a.x + a.width <= b.x
                || b.x + b.width <= a.x
                || a.y + a.height <= b.y
                || b.y + b.height <= a.y;
            assert!(disjoint, "{a:?} overlaps {b:?}");
        }
    }
}

#[test]
fn test_region_outside_domain() {
    let grid = ProjectedGrid::hrrr().unwrap();
    let region = BoundingBox::new(0.0, 0.0, 10.0, 10.0);
    assert!(grid.tile_rectangles(&region, 256).unwrap().is_empty());
    assert!(grid.tile_rectangles(&region, 0).is_err());
}

#[test]
fn test_boxed_projection() {
    let projection: Box<dyn MapProjection> = Box::new(Geographic);
    let grid = ProjectedGrid::new(projection, BoundingBox::new(-180.0, -90.0, 180.0, 90.0), 1.0).unwrap();
    assert_eq!(grid.num_bins(), 360 * 180);
    assert_eq!(grid.bin_index(89.5, -179.5), 0);
    assert_eq!(grid.projection().name(), "geographic");
}
