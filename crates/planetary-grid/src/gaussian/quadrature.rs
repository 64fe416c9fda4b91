//! Gaussian quadrature latitudes and the reduced-grid column rule.
//!
//! The packaged row tables under `resources/gaussian/` are produced by these
//! functions (see the `generate-gaussian-tables` binary).

use std::f64::consts::PI;
use std::fmt::Write;

/// Fewest columns any reduced row may have.
pub const MIN_REDUCED_COLS: usize = 20;

/// Extra columns added to `4N · cos(lat)` before rounding to an FFT size.
const REDUCED_COL_PADDING: f64 = 14.0;

/// Gaussian latitudes in degrees for Gaussian number `n`, north to south.
///
/// These are the arcsines of the `2n` roots of the Legendre polynomial
/// `P_2n`, found by Newton iteration from the Tricomi initial guess. The
/// southern half mirrors the northern half exactly.
pub fn gaussian_latitudes(n: usize) -> Vec<f64> {
    let degree = 2 * n;
    let mut north = Vec::with_capacity(n);

    for i in 1..=n {
        let mut x = (PI * (i as f64 - 0.25) / (degree as f64 + 0.5)).cos();
        for _ in 0..100 {
            let (p, dp) = legendre(degree, x);
            let dx = p / dp;
            x -= dx;
            if dx.abs() < 1e-16 {
                break;
            }
        }
        north.push(x.asin().to_degrees());
    }

    let mut lats = north.clone();
    lats.extend(north.iter().rev().map(|lat| -lat));
    lats
}

/// `P_n(x)` and its derivative.
fn legendre(n: usize, x: f64) -> (f64, f64) {
    let (mut p0, mut p1) = (1.0, x);
    for k in 2..=n {
        let k = k as f64;
        let p2 = ((2.0 * k - 1.0) * x * p1 - (k - 1.0) * p0) / k;
        p0 = p1;
        p1 = p2;
    }
    let dp = n as f64 * (x * p1 - p0) / (x * x - 1.0);
    (p1, dp)
}

/// Column count of a reduced Gaussian row at `lat_deg` for Gaussian number `n`.
///
/// The smallest 2^a·3^b·5^c not below `max(20, 4n·cos(lat) + 14)`, capped at
/// the regular column count `4n`.
pub fn reduced_col_count(n: usize, lat_deg: f64) -> usize {
    let target = (4.0 * n as f64 * lat_deg.to_radians().cos() + REDUCED_COL_PADDING)
        .max(MIN_REDUCED_COLS as f64);
    next_fft_size(target.ceil() as usize).min(4 * n)
}

/// Smallest integer `>= value` whose only prime factors are 2, 3 and 5.
pub fn next_fft_size(value: usize) -> usize {
    let mut candidate = value.max(1);
    loop {
        let mut m = candidate;
        for p in [2, 3, 5] {
            while m % p == 0 {
                m /= p;
            }
        }
        if m == 1 {
            return candidate;
        }
        candidate += 1;
    }
}

/// Render the row table resource for Gaussian number `n`.
pub fn format_table(n: usize) -> String {
    let lats = gaussian_latitudes(n);
    let mut out = String::with_capacity(lats.len() * 24);

    // Writing to a String cannot fail.
    let _ = writeln!(
        out,
        "# Gaussian grid N{}: {} latitudes, regular longitude count {}",
        n,
        2 * n,
        4 * n
    );
    let _ = writeln!(out, "# reduced_cols\trow\tlatitude_deg");

    let north: Vec<usize> = lats[..n].iter().map(|&lat| reduced_col_count(n, lat)).collect();
    let cols = north.iter().chain(north.iter().rev());
    for (row, (cols, lat)) in cols.zip(&lats).enumerate() {
        let _ = writeln!(out, "{}\t{}\t{:.9}", cols, row + 1, lat);
    }
    out
}
