//! Spherical Lambert Conformal Conic projection.
//!
//! Projection coordinates are meters from the central meridian (`x`) and
//! from the origin latitude (`y`).

use super::MapProjection;
use crate::error::{GridError, GridResult};
use std::f64::consts::{FRAC_PI_2, FRAC_PI_4, PI};

/// Earth radius used by NCEP models (meters).
pub const NCEP_EARTH_RADIUS_M: f64 = 6_371_229.0;

/// Lambert Conformal Conic projection on a sphere, tangent or secant.
#[derive(Debug, Clone, PartialEq)]
pub struct LambertConformal {
    /// Central meridian (LoV) in radians
    lon0: f64,
    /// Origin latitude in radians
    lat0: f64,
    latin1: f64,
    latin2: f64,
    earth_radius: f64,
    /// Cone constant
    n: f64,
    f: f64,
    /// Rho at the origin latitude
    rho0: f64,
}

impl LambertConformal {
    /// Create a projection from degrees.
    ///
    /// Equal standard parallels give a tangent cone.
    pub fn new(
        lat0_deg: f64,
        lon0_deg: f64,
        latin1_deg: f64,
        latin2_deg: f64,
        earth_radius: f64,
    ) -> GridResult<Self> {
        let params = [lat0_deg, lon0_deg, latin1_deg, latin2_deg, earth_radius];
        if params.iter().any(|v| !v.is_finite()) || earth_radius <= 0.0 {
            return Err(GridError::invalid_config(
                "Lambert conformal parameters must be finite with a positive earth radius",
            ));
        }
        if [lat0_deg, latin1_deg, latin2_deg].iter().any(|v| v.abs() >= 90.0) {
            return Err(GridError::invalid_config(
                "Lambert conformal latitudes must lie strictly between the poles",
            ));
        }

        let proj = Self::build(lat0_deg, lon0_deg, latin1_deg, latin2_deg, earth_radius);
        if !proj.n.is_finite() || proj.n.abs() < 1e-10 {
            return Err(GridError::invalid_config(format!(
                "degenerate Lambert conformal standard parallels {latin1_deg} and {latin2_deg}"
            )));
        }
        Ok(proj)
    }

    /// HRRR CONUS projection: LoV -97.5°, tangent at 38.5°N, origin 38.5°N.
    pub fn hrrr() -> Self {
        Self::build(38.5, -97.5, 38.5, 38.5, NCEP_EARTH_RADIUS_M)
    }

    fn build(lat0_deg: f64, lon0_deg: f64, latin1_deg: f64, latin2_deg: f64, earth_radius: f64) -> Self {
        let lat0 = lat0_deg.to_radians();
        let latin1 = latin1_deg.to_radians();
        let latin2 = latin2_deg.to_radians();

        let n = if (latin1 - latin2).abs() < 1e-10 {
            // Tangent cone
            latin1.sin()
        } else {
            let ln_ratio = (latin1.cos() / latin2.cos()).ln();
            let tan_ratio = ((FRAC_PI_4 + latin2 / 2.0).tan() / (FRAC_PI_4 + latin1 / 2.0).tan()).ln();
            ln_ratio / tan_ratio
        };
        let f = latin1.cos() * (FRAC_PI_4 + latin1 / 2.0).tan().powf(n) / n;
        let rho0 = earth_radius * f / (FRAC_PI_4 + lat0 / 2.0).tan().powf(n);

        Self {
            lon0: lon0_deg.to_radians(),
            lat0,
            latin1,
            latin2,
            earth_radius,
            n,
            f,
            rho0,
        }
    }

    /// Cone constant.
    pub fn cone_constant(&self) -> f64 {
        self.n
    }

    pub fn central_meridian(&self) -> f64 {
        self.lon0.to_degrees()
    }

    pub fn origin_lat(&self) -> f64 {
        self.lat0.to_degrees()
    }

    pub fn standard_parallels(&self) -> (f64, f64) {
        (self.latin1.to_degrees(), self.latin2.to_degrees())
    }

    fn rho(&self, lat: f64) -> f64 {
        self.earth_radius * self.f / (FRAC_PI_4 + lat / 2.0).tan().powf(self.n)
    }
}

/// Wrap an angle in radians to [-π, π). Infinite angles clamp to ±π.
fn wrap_pi(angle: f64) -> f64 {
    if angle.is_infinite() {
        return angle.clamp(-PI, PI);
    }
    (angle + PI).rem_euclid(2.0 * PI) - PI
}

impl MapProjection for LambertConformal {
    fn forward(&self, lat: f64, lon: f64) -> (f64, f64) {
        let lat = lat.clamp(-90.0, 90.0).to_radians();
        let theta = self.n * wrap_pi(lon.to_radians() - self.lon0);
        let rho = self.rho(lat);
        (rho * theta.sin(), self.rho0 - rho * theta.cos())
    }

    fn inverse(&self, x: f64, y: f64) -> (f64, f64) {
        let sign = self.n.signum();
        let dy = self.rho0 - y;
        let rho = sign * (x * x + dy * dy).sqrt();
        let theta = (sign * x).atan2(sign * dy);

        let lat = if rho == 0.0 {
            sign * FRAC_PI_2
        } else {
            2.0 * (self.earth_radius * self.f / rho).powf(1.0 / self.n).atan() - FRAC_PI_2
        };
        let lon = wrap_pi(self.lon0 + theta / self.n);
        (lat.to_degrees(), lon.to_degrees())
    }

    fn name(&self) -> &'static str {
        "lambert-conformal"
    }
}
