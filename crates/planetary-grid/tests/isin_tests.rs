//! MODIS integerized sinusoidal (ISIN) grid.

use planetary_grid::validation::check_row_layout;
use planetary_grid::{GridError, IsinPoint, PlanetaryGrid, TiledSinusoidalGrid};
use test_utils::fixtures::points;
use test_utils::generators::scattered_points;

#[test]
fn test_known_tiles_at_500m() {
    let grid = TiledSinusoidalGrid::new(43_200).unwrap();
    let cases = [
        (points::KANSAS_CITY, IsinPoint::new(5, 10, 216, 1584)),
        (points::REYKJAVIK, IsinPoint::new(2, 17, 1404, 103)),
        (points::SYDNEY, IsinPoint::new(12, 30, 928, 1332)),
        (points::MCMURDO, IsinPoint::new(16, 21, 1882, 1225)),
    ];
    for ((lat, lon), expected) in cases {
        assert_eq!(grid.locate(lat, lon), expected, "({lat}, {lon})");
        assert_eq!(grid.bin_index(lat, lon), expected.pack());
    }
}

#[test]
fn test_packing_is_decimal() {
    // Tile h10v05, pixel (216, 1584).
    assert_eq!(IsinPoint::new(5, 10, 216, 1584).pack(), 51_002_161_584);
    assert_eq!(IsinPoint::unpack(51_002_161_584), IsinPoint::new(5, 10, 216, 1584));
}

#[test]
fn test_bins_decode_and_stay_in_range() {
    for num_rows in [21_600, 43_200, 86_400] {
        let grid = TiledSinusoidalGrid::new(num_rows).unwrap();
        let ts = grid.tile_size();
        for (lat, lon) in scattered_points(2_000, 7) {
            let bin = grid.bin_index(lat, lon);
            assert!(bin < grid.bin_index_bound());
            let point = grid.decode(bin).unwrap();
            assert!(point.is_valid(ts));
            assert_eq!(grid.row_index(bin).unwrap(), point.tile_row * ts + point.pixel_row);
        }
    }
}

#[test]
fn test_rows_increase_southward() {
    let grid = TiledSinusoidalGrid::new(21_600).unwrap();
    let mut previous = 0;
    for lat in [89.9, 60.0, 30.0, 0.0, -30.0, -60.0, -89.9] {
        let row = grid.row_index(grid.bin_index(lat, 0.0)).unwrap();
        assert!(row >= previous, "lat {lat}: row {row} < {previous}");
        previous = row;
    }
    assert_eq!(grid.row_index(grid.bin_index(90.0, 0.0)).unwrap(), 0);
    assert_eq!(grid.row_index(grid.bin_index(-90.0, 0.0)).unwrap(), 21_599);
}

#[test]
fn test_row_layout_is_sparse_but_consistent() {
    let grid = TiledSinusoidalGrid::new(21_600).unwrap();
    assert!(grid.bin_index_bound() > grid.num_bins());

    let report = check_row_layout(&grid);
    assert!(report.is_ok(), "{:?}", report.errors);
    assert_eq!(report.counted_bins, grid.num_bins());
}

#[test]
fn test_first_bin_of_row() {
    let grid = TiledSinusoidalGrid::new(21_600).unwrap();
    assert_eq!(grid.first_bin_index(0).unwrap(), 0);
    assert_eq!(grid.first_bin_index(1).unwrap(), 10_000);
    assert_eq!(grid.first_bin_index(1200).unwrap(), 10_000_000_000);
    assert_eq!(grid.first_bin_index(21_599).unwrap(), 170_011_990_000);
    assert!(grid.first_bin_index(21_600).is_err());
}

#[test]
fn test_rejects_malformed_bins() {
    let grid = TiledSinusoidalGrid::new(21_600).unwrap();
    // Pixel column 1200 does not exist in 1200-pixel tiles.
    let bad_pixel = IsinPoint::new(0, 0, 0, 1200).pack();
    assert!(matches!(grid.decode(bad_pixel), Err(GridError::BinOutOfRange { .. })));
    assert!(grid.row_index(grid.bin_index_bound()).is_err());
}

#[test]
fn test_centers() {
    let grid = TiledSinusoidalGrid::new(43_200).unwrap();
    let bin = grid.bin_index(points::KANSAS_CITY.0, points::KANSAS_CITY.1);
    assert!(matches!(grid.center_lat_lon(bin), Err(GridError::Unsupported(_))));
    assert!(matches!(grid.center_lat(0), Err(GridError::Unsupported(_))));

    let center = grid.cell_center(bin).unwrap();
    assert!((center.lat - points::KANSAS_CITY.0).abs() < 0.01);
    assert!((center.lon - points::KANSAS_CITY.1).abs() < 0.01);
    assert_eq!(grid.bin_index(center.lat, center.lon), bin);
}
