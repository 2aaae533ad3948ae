use super::{Polygon, Segment, EPS};
use crate::types::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box. `min` is always component-wise ≤ `max`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min: Vec2,
    pub max: Vec2,
}

impl BoundingBox {
    /// Box spanned by two opposite corners given in any order.
    pub fn new(a: Vec2, b: Vec2) -> Self {
        Self {
            min: Vec2::new(a.x.min(b.x), a.y.min(b.y)),
            max: Vec2::new(a.x.max(b.x), a.y.max(b.y)),
        }
    }

    /// Tight box around a point set; `None` for an empty set.
    pub fn from_points<'a, I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a Vec2>,
    {
        let mut iter = points.into_iter();
        let first = *iter.next()?;
        let mut bbox = Self {
            min: first,
            max: first,
        };
        for p in iter {
            bbox.min.x = bbox.min.x.min(p.x);
            bbox.min.y = bbox.min.y.min(p.y);
            bbox.max.x = bbox.max.x.max(p.x);
            bbox.max.y = bbox.max.y.max(p.y);
        }
        Some(bbox)
    }

    pub fn union(&self, other: &Self) -> Self {
        Self {
            min: Vec2::new(self.min.x.min(other.min.x), self.min.y.min(other.min.y)),
            max: Vec2::new(self.max.x.max(other.max.x), self.max.y.max(other.max.y)),
        }
    }

    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }

    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    /// Grows the box by `amount` in total along each axis, keeping it centred.
    pub fn inflate(&self, amount: Vec2) -> Self {
        let half = amount * 0.5;
        Self::new(self.min - half, self.max + half)
    }

    /// Grows each side of the box by `fraction` of its own extent in total.
    pub fn inflate_fraction(&self, fraction: f64) -> Self {
        self.inflate(Vec2::new(self.width(), self.height()) * fraction)
    }

    pub fn contains_point(&self, p: &Vec2) -> bool {
        p.x >= self.min.x - EPS
            && p.x <= self.max.x + EPS
            && p.y >= self.min.y - EPS
            && p.y <= self.max.y + EPS
    }

    /// Corners in counter-clockwise order starting at `min`.
    pub fn corners(&self) -> [Vec2; 4] {
        [
            self.min,
            Vec2::new(self.max.x, self.min.y),
            self.max,
            Vec2::new(self.min.x, self.max.y),
        ]
    }

    /// Boundary edges in counter-clockwise order.
    pub fn edges(&self) -> [Segment; 4] {
        let c = self.corners();
        [
            Segment::new(c[0], c[1]),
            Segment::new(c[1], c[2]),
            Segment::new(c[2], c[3]),
            Segment::new(c[3], c[0]),
        ]
    }

    /// Polygon view of the box. A collapsed box (zero width or height) has no
    /// polygon view.
    pub fn to_polygon(&self) -> Option<Polygon> {
        if self.width() <= EPS || self.height() <= EPS {
            return None;
        }
        Polygon::new(self.corners().to_vec()).ok()
    }

    /// Nearest point of the closed box, identity for points inside.
    pub fn clamp_point(&self, p: &Vec2) -> Vec2 {
        Vec2::new(
            p.x.clamp(self.min.x, self.max.x),
            p.y.clamp(self.min.y, self.max.y),
        )
    }

    /// Nearest point on the boundary. Points outside map to the clamped
    /// point; points inside map to the closest edge.
    pub fn project_to_boundary(&self, p: &Vec2) -> Vec2 {
        let mut best = self.clamp_point(p);
        let mut best_d = f64::INFINITY;
        for edge in self.edges() {
            let q = edge.project(p);
            let d = (q - p).norm_squared();
            if d < best_d {
                best_d = d;
                best = q;
            }
        }
        best
    }

    pub fn distance_to_point(&self, p: &Vec2) -> f64 {
        (p - self.clamp_point(p)).norm()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::vec2;

    #[test]
    fn new_orders_corners() {
        let b = BoundingBox::new(vec2(2.0, -1.0), vec2(0.0, 3.0));
        assert_eq!(b.min, vec2(0.0, -1.0));
        assert_eq!(b.max, vec2(2.0, 3.0));
        assert_eq!(b.center(), vec2(1.0, 1.0));
    }

    #[test]
    fn inflate_fraction_is_centred() {
        let b = BoundingBox::new(vec2(0.0, 0.0), vec2(2.0, 4.0)).inflate_fraction(0.5);
        assert_eq!(b.min, vec2(-0.5, -1.0));
        assert_eq!(b.max, vec2(2.5, 5.0));
    }

    #[test]
    fn distance_and_containment() {
        let b = BoundingBox::new(vec2(0.0, 0.0), vec2(1.0, 1.0));
        assert!(b.contains_point(&vec2(1.0, 0.5)));
        assert!(!b.contains_point(&vec2(1.1, 0.5)));
        assert_eq!(b.distance_to_point(&vec2(0.5, 0.5)), 0.0);
        assert!((b.distance_to_point(&vec2(4.0, 5.0)) - 5.0).abs() < 1e-12);
        let q = b.project_to_boundary(&vec2(0.5, 0.9));
        assert!((q - vec2(0.5, 1.0)).norm() < 1e-12);
    }
}
