//! Axis-aligned bounding boxes.

use crate::error::{GridError, GridResult};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// A geographic or projected bounding box.
///
/// Geographic boxes hold longitudes in `x` and latitudes in `y`, in degrees.
/// Projected boxes hold projection units (meters for Lambert grids).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl BoundingBox {
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Parse `"minx,miny,maxx,maxy"`.
    pub fn from_csv(s: &str) -> GridResult<Self> {
        let parts: Vec<&str> = s.split(',').map(str::trim).collect();
        if parts.len() != 4 {
            return Err(GridError::invalid_config(format!(
                "invalid bounding box '{s}': expected 'minx,miny,maxx,maxy'"
            )));
        }

        let mut values = [0.0; 4];
        for (value, part) in values.iter_mut().zip(&parts) {
            *value = part.parse().map_err(|_| {
                GridError::invalid_config(format!("invalid number in bounding box: '{part}'"))
            })?;
        }
        Ok(Self::new(values[0], values[1], values[2], values[3]))
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    /// True if the box has no area or a non-finite corner.
    pub fn is_empty(&self) -> bool {
        let finite = [self.min_x, self.min_y, self.max_x, self.max_y]
            .iter()
            .all(|v| v.is_finite());
        !finite || self.width() <= 0.0 || self.height() <= 0.0
    }

    pub fn intersects(&self, other: &BoundingBox) -> bool {
        self.min_x < other.max_x
            && self.max_x > other.min_x
            && self.min_y < other.max_y
            && self.max_y > other.min_y
    }

    pub fn intersection(&self, other: &BoundingBox) -> Option<BoundingBox> {
        if !self.intersects(other) {
            return None;
        }

        Some(BoundingBox {
            min_x: self.min_x.max(other.min_x),
            min_y: self.min_y.max(other.min_y),
            max_x: self.max_x.min(other.max_x),
            max_y: self.max_y.min(other.max_y),
        })
    }

    /// Points along the boundary, `samples_per_edge` per edge, counter-clockwise
    /// from the lower-left corner.
    pub fn boundary_points(&self, samples_per_edge: usize) -> Vec<(f64, f64)> {
        let n = samples_per_edge.max(1);
        let mut points = Vec::with_capacity(4 * n);
        for i in 0..n {
            let t = i as f64 / n as f64;
            points.push((self.min_x + t * self.width(), self.min_y));
        }
        for i in 0..n {
            let t = i as f64 / n as f64;
            points.push((self.max_x, self.min_y + t * self.height()));
        }
        for i in 0..n {
            let t = i as f64 / n as f64;
            points.push((self.max_x - t * self.width(), self.max_y));
        }
        for i in 0..n {
            let t = i as f64 / n as f64;
            points.push((self.min_x, self.max_y - t * self.height()));
        }
        points
    }

    /// Smallest box containing all `points`, or `None` if there are no finite
    /// points.
    pub fn enclosing(points: impl IntoIterator<Item = (f64, f64)>) -> Option<Self> {
        let mut bbox: Option<Self> = None;
        for (x, y) in points {
            if !x.is_finite() || !y.is_finite() {
                continue;
            }
            bbox = Some(match bbox {
                None => Self::new(x, y, x, y),
                Some(b) => Self::new(b.min_x.min(x), b.min_y.min(y), b.max_x.max(x), b.max_y.max(y)),
            });
        }
        bbox
    }
}

impl FromStr for BoundingBox {
    type Err = GridError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_csv(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_csv() {
        let bbox: BoundingBox = "-125.0, 24.0,-66.0,50.0".parse().unwrap();
        assert_eq!(bbox, BoundingBox::new(-125.0, 24.0, -66.0, 50.0));
        assert!(BoundingBox::from_csv("1,2,3").is_err());
        assert!(BoundingBox::from_csv("1,2,x,4").is_err());
    }

    #[test]
    fn test_intersection() {
        let a = BoundingBox::new(0.0, 0.0, 10.0, 10.0);
        let b = BoundingBox::new(5.0, 5.0, 15.0, 15.0);
        let c = BoundingBox::new(20.0, 20.0, 30.0, 30.0);

        assert!(a.intersects(&b));
        assert!(!a.intersects(&c));
        assert_eq!(a.intersection(&b), Some(BoundingBox::new(5.0, 5.0, 10.0, 10.0)));
        assert_eq!(a.intersection(&c), None);
    }

    #[test]
    fn test_is_empty() {
        assert!(!BoundingBox::new(0.0, 0.0, 1.0, 1.0).is_empty());
        assert!(BoundingBox::new(0.0, 0.0, 0.0, 1.0).is_empty());
        assert!(BoundingBox::new(0.0, 0.0, f64::NAN, 1.0).is_empty());
    }

    #[test]
    fn test_boundary_points_and_enclosing() {
        let bbox = BoundingBox::new(-10.0, -5.0, 10.0, 5.0);
        let points = bbox.boundary_points(4);
        assert_eq!(points.len(), 16);
        assert_eq!(BoundingBox::enclosing(points), Some(bbox));
        assert_eq!(BoundingBox::enclosing([(f64::NAN, 0.0)]), None);
    }
}
