use super::{is_finite_point, polygon_area, BoundingBox, Segment, EPS};
use crate::error::GroundingError;
use crate::types::{cross, Vec2};
use serde::Serialize;
use std::f64::consts::TAU;

/// Simple polygon given by its vertices in order (either winding).
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Polygon {
    points: Vec<Vec2>,
}

impl Polygon {
    /// Builds a polygon, failing fast on fewer than three vertices or
    /// non-finite coordinates.
    pub fn new(points: Vec<Vec2>) -> Result<Self, GroundingError> {
        if points.len() < 3 {
            return Err(GroundingError::DegeneratePolygon {
                points: points.len(),
            });
        }
        if !points.iter().all(is_finite_point) {
            return Err(GroundingError::InvalidGeometry(
                "polygon vertex has non-finite coordinates".into(),
            ));
        }
        Ok(Self { points })
    }

    /// Regular `n`-gon inscribed in the circle of `radius` around `center`.
    pub fn regular(center: Vec2, radius: f64, n: usize) -> Result<Self, GroundingError> {
        let points = (0..n)
            .map(|i| {
                let t = TAU * i as f64 / n as f64;
                center + Vec2::new(t.cos(), t.sin()) * radius
            })
            .collect();
        Self::new(points)
    }

    pub fn points(&self) -> &[Vec2] {
        &self.points
    }

    /// Boundary edges, closing the ring.
    pub fn edges(&self) -> impl Iterator<Item = Segment> + '_ {
        let n = self.points.len();
        (0..n).map(move |i| Segment::new(self.points[i], self.points[(i + 1) % n]))
    }

    /// Unsigned area.
    pub fn area(&self) -> f64 {
        polygon_area(&self.points).abs()
    }

    /// Area centroid; falls back to the vertex mean for zero-area rings.
    pub fn centroid(&self) -> Vec2 {
        let mut a2 = 0.0;
        let mut c = Vec2::zeros();
        for e in self.edges() {
            let w = cross(&e.p0, &e.p1);
            a2 += w;
            c += (e.p0 + e.p1) * w;
        }
        if a2.abs() <= EPS {
            let sum: Vec2 = self.points.iter().sum();
            return sum / self.points.len() as f64;
        }
        c / (3.0 * a2)
    }

    pub fn bounding_box(&self) -> BoundingBox {
        // Non-empty by construction.
        BoundingBox::from_points(&self.points).unwrap_or(BoundingBox {
            min: self.points[0],
            max: self.points[0],
        })
    }

    pub fn on_boundary(&self, p: &Vec2) -> bool {
        self.edges().any(|e| e.contains_point(p))
    }

    /// Boundary-inclusive point-in-polygon test (even-odd rule).
    pub fn contains_point(&self, p: &Vec2) -> bool {
        if self.on_boundary(p) {
            return true;
        }
        let mut inside = false;
        for e in self.edges() {
            let (a, b) = (e.p0, e.p1);
            if (a.y > p.y) != (b.y > p.y) {
                let x = a.x + (p.y - a.y) * (b.x - a.x) / (b.y - a.y);
                if p.x < x {
                    inside = !inside;
                }
            }
        }
        inside
    }

    /// Nearest boundary point.
    pub fn project_to_boundary(&self, p: &Vec2) -> Vec2 {
        let mut best = self.points[0];
        let mut best_d = f64::INFINITY;
        for e in self.edges() {
            let q = e.project(p);
            let d = (q - p).norm_squared();
            if d < best_d {
                best_d = d;
                best = q;
            }
        }
        best
    }

    /// Identity for points inside, nearest boundary point otherwise.
    pub fn project_point(&self, p: &Vec2) -> Vec2 {
        if self.contains_point(p) {
            *p
        } else {
            self.project_to_boundary(p)
        }
    }

    pub fn is_ccw(&self) -> bool {
        polygon_area(&self.points) > 0.0
    }

    pub fn is_convex(&self) -> bool {
        let n = self.points.len();
        let mut sign = 0.0f64;
        for i in 0..n {
            let a = self.points[i];
            let b = self.points[(i + 1) % n];
            let c = self.points[(i + 2) % n];
            let z = cross(&(b - a), &(c - b));
            if z.abs() <= EPS {
                continue;
            }
            if sign == 0.0 {
                sign = z.signum();
            } else if z.signum() != sign {
                return false;
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::vec2;

    fn square() -> Polygon {
        Polygon::new(vec![
            vec2(0.0, 0.0),
            vec2(2.0, 0.0),
            vec2(2.0, 2.0),
            vec2(0.0, 2.0),
        ])
        .expect("square")
    }

    #[test]
    fn fewer_than_three_points_fail_fast() {
        let err = Polygon::new(vec![vec2(0.0, 0.0), vec2(1.0, 0.0)]).unwrap_err();
        assert_eq!(err, GroundingError::DegeneratePolygon { points: 2 });
    }

    #[test]
    fn centroid_and_area() {
        let sq = square();
        assert!((sq.area() - 4.0).abs() < 1e-12);
        assert!((sq.centroid() - vec2(1.0, 1.0)).norm() < 1e-12);
        let tri = Polygon::new(vec![vec2(0.0, 0.0), vec2(3.0, 0.0), vec2(0.0, 3.0)]).expect("tri");
        assert!((tri.centroid() - vec2(1.0, 1.0)).norm() < 1e-12);
    }

    #[test]
    fn containment_is_boundary_inclusive() {
        let sq = square();
        assert!(sq.contains_point(&vec2(1.0, 1.0)));
        assert!(sq.contains_point(&vec2(2.0, 1.0)));
        assert!(sq.contains_point(&vec2(0.0, 0.0)));
        assert!(!sq.contains_point(&vec2(2.5, 1.0)));
    }

    #[test]
    fn convexity() {
        assert!(square().is_convex());
        let dart = Polygon::new(vec![
            vec2(0.0, 0.0),
            vec2(2.0, 1.0),
            vec2(0.0, 2.0),
            vec2(0.7, 1.0),
        ])
        .expect("dart");
        assert!(!dart.is_convex());
    }
}
