use super::{BoundingBox, Line, EPS};
use crate::types::Vec2;
use serde::Serialize;

/// Closed line segment between `p0` and `p1`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Segment {
    pub p0: Vec2,
    pub p1: Vec2,
}

impl Segment {
    pub fn new(p0: Vec2, p1: Vec2) -> Self {
        Self { p0, p1 }
    }

    pub fn midpoint(&self) -> Vec2 {
        (self.p0 + self.p1) * 0.5
    }

    pub fn vector(&self) -> Vec2 {
        self.p1 - self.p0
    }

    pub fn length(&self) -> f64 {
        self.vector().norm()
    }

    pub fn length_sq(&self) -> f64 {
        self.vector().norm_squared()
    }

    /// Unit direction from `p0` to `p1`, zero for a degenerate segment.
    pub fn direction(&self) -> Vec2 {
        let len = self.length();
        if len > 0.0 {
            self.vector() / len
        } else {
            Vec2::zeros()
        }
    }

    /// Supporting infinite line, `None` for a degenerate segment.
    pub fn line(&self) -> Option<Line> {
        Line::through(self.p0, self.p1)
    }

    /// Parameter in [0, 1] of the closest point on the segment to `p`.
    pub fn closest_param(&self, p: &Vec2) -> f64 {
        let len_sq = self.length_sq();
        if len_sq <= EPS * EPS {
            return 0.0;
        }
        ((p - self.p0).dot(&self.vector()) / len_sq).clamp(0.0, 1.0)
    }

    /// Point at parameter `t` along the segment.
    pub fn at(&self, t: f64) -> Vec2 {
        self.p0 + self.vector() * t
    }

    /// Closest point on the segment to `p`.
    pub fn project(&self, p: &Vec2) -> Vec2 {
        self.at(self.closest_param(p))
    }

    pub fn distance_to_point(&self, p: &Vec2) -> f64 {
        (p - self.project(p)).norm()
    }

    pub fn contains_point(&self, p: &Vec2) -> bool {
        self.distance_to_point(p) <= EPS
    }

    pub fn bounding_box(&self) -> BoundingBox {
        BoundingBox::new(self.p0, self.p1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::vec2;

    #[test]
    fn projection_clamps_to_endpoints() {
        let seg = Segment::new(vec2(0.0, 0.0), vec2(2.0, 0.0));
        assert_eq!(seg.project(&vec2(1.0, 3.0)), vec2(1.0, 0.0));
        assert_eq!(seg.project(&vec2(-4.0, 1.0)), vec2(0.0, 0.0));
        assert_eq!(seg.project(&vec2(9.0, -1.0)), vec2(2.0, 0.0));
        assert!((seg.distance_to_point(&vec2(5.0, 4.0)) - 5.0).abs() < 1e-12);
    }

    #[test]
    fn degenerate_segment_behaves_like_point() {
        let seg = Segment::new(vec2(1.0, 1.0), vec2(1.0, 1.0));
        assert_eq!(seg.direction(), Vec2::zeros());
        assert!(seg.line().is_none());
        assert!((seg.distance_to_point(&vec2(4.0, 5.0)) - 5.0).abs() < 1e-12);
        assert!(seg.contains_point(&vec2(1.0, 1.0)));
    }
}
