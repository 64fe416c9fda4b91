//! Test support for the planetary-grid workspace.
//!
//! - [`paths`]: locating `testdata/` YAML documents and writing temporary ones
//! - [`fixtures`]: the 6-row reference grid, named coordinates, config texts
//! - [`generators`]: deterministic coordinates and bin samples
//!
//! Pulled in as a dev-dependency:
//!
//! ```toml
//! [dev-dependencies]
//! test-utils = { path = "../test-utils" }
//! ```

pub mod fixtures;
pub mod generators;
pub mod paths;

pub use fixtures::*;
pub use generators::*;
pub use paths::*;

/// Resolve one or more test data files, or skip the test.
///
/// With one name it evaluates to a `PathBuf`; with several, to a
/// `Vec<PathBuf>` in argument order. If any file is missing the enclosing
/// test prints a notice and returns.
///
/// ```ignore
/// let config = require_test_file!("rotated.yaml");
/// let both = require_test_file!("reduced_gaussian.yaml", "isin_500m.yaml");
/// ```
#[macro_export]
macro_rules! require_test_file {
    ($name:expr) => {{
        match $crate::find_test_file($name) {
            Some(path) => path,
            None => {
                eprintln!("SKIPPED: test data '{}' not found (set TEST_DATA_DIR)", $name);
                return;
            }
        }
    }};
    ($($name:expr),+ $(,)?) => {{
        let mut found = Vec::new();
        $( found.push($crate::require_test_file!($name)); )+
        found
    }};
}

/// Assert that two floats differ by at most `tolerance`.
#[macro_export]
macro_rules! assert_approx_eq {
    ($actual:expr, $expected:expr, $tolerance:expr) => {{
        let (actual, expected, tolerance) = ($actual as f64, $expected as f64, $tolerance as f64);
        if !((actual - expected).abs() <= tolerance) {
            panic!(
                "assertion failed: {} = {:?}, expected {:?} within {:?}",
                stringify!($actual),
                actual,
                expected,
                tolerance
            );
        }
    }};
}

/// Assert that two `(lat, lon)` pairs agree within `tolerance` degrees.
///
/// Longitudes are compared modulo 360, so `-180` and `180` are equal.
#[macro_export]
macro_rules! assert_lat_lon_close {
    (($lat1:expr, $lon1:expr), ($lat2:expr, $lon2:expr), $tolerance:expr) => {{
        let tolerance = $tolerance as f64;
        $crate::assert_approx_eq!($lat1, $lat2, tolerance);
        let dlon = ($lon1 as f64 - $lon2 as f64).rem_euclid(360.0);
        if dlon > tolerance && 360.0 - dlon > tolerance {
            panic!(
                "assertion failed: longitude {:?} vs {:?} differs by {:?}",
                $lon1,
                $lon2,
                dlon.min(360.0 - dlon)
            );
        }
    }};
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_approx_eq_within_tolerance() {
        assert_approx_eq!(89.5001, 89.5, 1e-3);
        assert_approx_eq!(-0.0, 0.0, 0.0);
    }

    #[test]
    #[should_panic(expected = "assertion failed")]
    fn test_approx_eq_outside_tolerance() {
        assert_approx_eq!(1.1, 1.0, 1e-3);
    }

    #[test]
    fn test_lat_lon_close_across_antimeridian() {
        assert_lat_lon_close!((10.0, 179.9999), (10.0, -180.0), 1e-3);
        assert_lat_lon_close!((-45.0, 0.0), (-45.0, 360.0), 1e-9);
    }

    #[test]
    #[should_panic(expected = "longitude")]
    fn test_lat_lon_close_detects_longitude() {
        assert_lat_lon_close!((10.0, 20.0), (10.0, 21.0), 0.5);
    }
}
