//! Map projections for [`ProjectedGrid`](crate::projected::ProjectedGrid).

mod lambert;

pub use lambert::{LambertConformal, NCEP_EARTH_RADIUS_M};

/// A map projection between geographic coordinates (degrees) and planar
/// projection coordinates.
pub trait MapProjection: Send + Sync + std::fmt::Debug {
    /// Geographic (`lat`, `lon`) to projection (`x`, `y`).
    fn forward(&self, lat: f64, lon: f64) -> (f64, f64);

    /// Projection (`x`, `y`) to geographic (`lat`, `lon`).
    fn inverse(&self, x: f64, y: f64) -> (f64, f64);

    fn name(&self) -> &'static str;
}

/// Identity projection: `x` is longitude, `y` is latitude, both in degrees.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Geographic;

impl MapProjection for Geographic {
    fn forward(&self, lat: f64, lon: f64) -> (f64, f64) {
        (lon, lat)
    }

    fn inverse(&self, x: f64, y: f64) -> (f64, f64) {
        (y, x)
    }

    fn name(&self) -> &'static str {
        "geographic"
    }
}

impl<P: MapProjection + ?Sized> MapProjection for Box<P> {
    fn forward(&self, lat: f64, lon: f64) -> (f64, f64) {
        (**self).forward(lat, lon)
    }

    fn inverse(&self, x: f64, y: f64) -> (f64, f64) {
        (**self).inverse(x, y)
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}
