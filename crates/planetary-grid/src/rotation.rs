//! Rotated-pole coordinate transform.
//!
//! A rotated lat/lon system is defined by the geographic position of its
//! north pole. The forward transform is the 3-D rotation that carries that
//! position onto the geographic north pole:
//!
//! ```text
//!   R = Ry(pole_lat - 90°) · Rz(-pole_lon)
//! ```
//!
//! and the inverse transform is its transpose.

use crate::error::{GridError, GridResult};
use crate::grid::GeoPoint;
use nalgebra::{Rotation3, Vector3};

/// Rotation of the sphere that moves a given pole onto the north pole.
#[derive(Debug, Clone, PartialEq)]
pub struct PoleRotation {
    pole_lat: f64,
    pole_lon: f64,
    forward: Rotation3<f64>,
    inverse: Rotation3<f64>,
}

impl PoleRotation {
    /// Create the rotation for a pole at (`pole_lat`, `pole_lon`) in degrees.
    pub fn new(pole_lat: f64, pole_lon: f64) -> GridResult<Self> {
        if !pole_lat.is_finite() || !pole_lon.is_finite() || pole_lat.abs() > 90.0 {
            return Err(GridError::invalid_config(format!(
                "rotated pole must have finite lon and lat in [-90, 90], got ({pole_lat}, {pole_lon})"
            )));
        }

        let tilt = Rotation3::from_axis_angle(&Vector3::y_axis(), (pole_lat - 90.0).to_radians());
        let spin = Rotation3::from_axis_angle(&Vector3::z_axis(), -pole_lon.to_radians());
        let forward = tilt * spin;

        Ok(Self {
            pole_lat,
            pole_lon,
            inverse: forward.inverse(),
            forward,
        })
    }

    /// The identity rotation (pole at 90°N).
    pub fn identity() -> Self {
        Self {
            pole_lat: 90.0,
            pole_lon: 0.0,
            forward: Rotation3::identity(),
            inverse: Rotation3::identity(),
        }
    }

    pub fn pole_lat(&self) -> f64 {
        self.pole_lat
    }

    pub fn pole_lon(&self) -> f64 {
        self.pole_lon
    }

    /// Geographic coordinate → rotated coordinate.
    pub fn rotate(&self, lat: f64, lon: f64) -> GeoPoint {
        from_unit_vector(&(self.forward * to_unit_vector(lat, lon)))
    }

    /// Rotated coordinate → geographic coordinate.
    pub fn unrotate(&self, lat: f64, lon: f64) -> GeoPoint {
        from_unit_vector(&(self.inverse * to_unit_vector(lat, lon)))
    }
}

fn to_unit_vector(lat: f64, lon: f64) -> Vector3<f64> {
    let (sin_lat, cos_lat) = lat.clamp(-90.0, 90.0).to_radians().sin_cos();
    let (sin_lon, cos_lon) = lon.to_radians().sin_cos();
    Vector3::new(cos_lat * cos_lon, cos_lat * sin_lon, sin_lat)
}

fn from_unit_vector(v: &Vector3<f64>) -> GeoPoint {
    let lat = v.z.clamp(-1.0, 1.0).asin().to_degrees();
    let lon = v.y.atan2(v.x).to_degrees();
    GeoPoint::new(lat, lon)
}
