//! Deterministic coordinate and bin generators.
//!
//! Everything here is reproducible so that failing cases can be replayed.

/// A `rows × cols` lattice of `(lat, lon)` points strictly inside the
/// lat/lon domain, north to south and west to east.
///
/// Points sit at the centers of an equal-angle subdivision, so they avoid the
/// poles and the antimeridian.
///
/// ```
/// use test_utils::coordinate_lattice;
///
/// let points = coordinate_lattice(2, 4);
/// assert_eq!(points.len(), 8);
/// assert_eq!(points[0], (45.0, -135.0));
/// assert_eq!(points[7], (-45.0, 135.0));
/// ```
pub fn coordinate_lattice(rows: usize, cols: usize) -> Vec<(f64, f64)> {
    let mut points = Vec::with_capacity(rows * cols);
    for r in 0..rows {
        let lat = 90.0 - (r as f64 + 0.5) * 180.0 / rows as f64;
        for c in 0..cols {
            let lon = -180.0 + (c as f64 + 0.5) * 360.0 / cols as f64;
            points.push((lat, lon));
        }
    }
    points
}

/// Pseudo-random `(lat, lon)` points from a fixed seed.
///
/// Uses a 64-bit linear congruential generator so the sequence is the same
/// on every platform.
pub fn scattered_points(count: usize, seed: u64) -> Vec<(f64, f64)> {
    let mut state = seed;
    let mut next = move || {
        state = state
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);
        (state >> 11) as f64 / (1u64 << 53) as f64
    };
    (0..count)
        .map(|_| {
            let lat = next() * 180.0 - 90.0;
            let lon = next() * 360.0 - 180.0;
            (lat, lon)
        })
        .collect()
}

/// `count` evenly spaced bins in `0..num_bins`, ending at the last bin.
pub fn spaced_bins(num_bins: u64, count: usize) -> Vec<u64> {
    if num_bins == 0 || count == 0 {
        return Vec::new();
    }
    let step = (num_bins / count as u64).max(1);
    let mut bins: Vec<u64> = (0..num_bins).step_by(step as usize).take(count).collect();
    if bins.last() != Some(&(num_bins - 1)) {
        bins.push(num_bins - 1);
    }
    bins
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lattice_stays_inside_domain() {
        for (lat, lon) in coordinate_lattice(18, 36) {
            assert!(lat > -90.0 && lat < 90.0);
            assert!(lon > -180.0 && lon < 180.0);
        }
    }

    #[test]
    fn test_scattered_points_are_reproducible() {
        let a = scattered_points(100, 42);
        let b = scattered_points(100, 42);
        assert_eq!(a, b);
        assert_ne!(a, scattered_points(100, 43));
        for (lat, lon) in a {
            assert!((-90.0..90.0).contains(&lat));
            assert!((-180.0..180.0).contains(&lon));
        }
    }

    #[test]
    fn test_spaced_bins() {
        assert_eq!(spaced_bins(10, 5), vec![0, 2, 4, 6, 8, 9]);
        assert_eq!(spaced_bins(3, 10), vec![0, 1, 2]);
        assert!(spaced_bins(0, 3).is_empty());
    }
}
