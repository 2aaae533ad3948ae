use super::{is_finite_point, BoundingBox, Polygon, EPS};
use crate::error::GroundingError;
use crate::types::Vec2;
use serde::Serialize;

/// Segments used when a circle has to be treated as a polygon.
pub(crate) const CIRCLE_POLYGON_SIDES: usize = 64;

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Circle {
    pub center: Vec2,
    pub radius: f64,
}

impl Circle {
    pub fn new(center: Vec2, radius: f64) -> Result<Self, GroundingError> {
        if !is_finite_point(&center) || !radius.is_finite() || radius < 0.0 {
            return Err(GroundingError::InvalidGeometry(format!(
                "circle needs a finite centre and non-negative radius, got r={radius}"
            )));
        }
        Ok(Self { center, radius })
    }

    pub fn distance_to_point(&self, p: &Vec2) -> f64 {
        ((p - self.center).norm() - self.radius).max(0.0)
    }

    pub fn contains_point(&self, p: &Vec2) -> bool {
        (p - self.center).norm() <= self.radius + EPS
    }

    /// Identity inside the disc, nearest boundary point outside.
    pub fn project_point(&self, p: &Vec2) -> Vec2 {
        let v = p - self.center;
        let d = v.norm();
        if d <= self.radius {
            *p
        } else {
            self.center + v * (self.radius / d)
        }
    }

    pub fn bounding_box(&self) -> BoundingBox {
        let r = Vec2::new(self.radius, self.radius);
        BoundingBox::new(self.center - r, self.center + r)
    }

    /// Extreme points along the axes: right, top, left, bottom.
    pub fn extreme_points(&self) -> [Vec2; 4] {
        let r = self.radius;
        [
            self.center + Vec2::new(r, 0.0),
            self.center + Vec2::new(0.0, r),
            self.center - Vec2::new(r, 0.0),
            self.center - Vec2::new(0.0, r),
        ]
    }

    pub fn to_polygon(&self) -> Option<Polygon> {
        if self.radius <= EPS {
            return None;
        }
        Polygon::regular(self.center, self.radius, CIRCLE_POLYGON_SIDES).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::vec2;

    #[test]
    fn negative_radius_is_rejected() {
        assert!(Circle::new(vec2(0.0, 0.0), -1.0).is_err());
    }

    #[test]
    fn distance_and_projection() {
        let c = Circle::new(vec2(1.0, 1.0), 1.0).expect("circle");
        assert_eq!(c.distance_to_point(&vec2(1.5, 1.0)), 0.0);
        assert!((c.distance_to_point(&vec2(4.0, 5.0)) - 4.0).abs() < 1e-12);
        assert!((c.project_point(&vec2(4.0, 1.0)) - vec2(2.0, 1.0)).norm() < 1e-12);
        assert_eq!(c.project_point(&vec2(1.2, 1.1)), vec2(1.2, 1.1));
        assert!(c.contains_point(&vec2(2.0, 1.0)));
    }
}
