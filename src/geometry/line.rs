use super::EPS;
use crate::angle::signed_angle_between;
use crate::types::{cross, Vec2};
use serde::Serialize;

/// Infinite line through `origin` with unit `direction`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Line {
    origin: Vec2,
    direction: Vec2,
}

impl Line {
    /// Line through `origin` along `direction`; `None` if the direction is
    /// (numerically) zero.
    pub fn new(origin: Vec2, direction: Vec2) -> Option<Self> {
        let norm = direction.norm();
        if !(norm > EPS) || !norm.is_finite() {
            return None;
        }
        Some(Self {
            origin,
            direction: direction / norm,
        })
    }

    /// Line through two distinct points.
    pub fn through(a: Vec2, b: Vec2) -> Option<Self> {
        Self::new(a, b - a)
    }

    pub fn horizontal(through: Vec2) -> Self {
        Self {
            origin: through,
            direction: Vec2::new(1.0, 0.0),
        }
    }

    pub fn vertical(through: Vec2) -> Self {
        Self {
            origin: through,
            direction: Vec2::new(0.0, 1.0),
        }
    }

    pub fn origin(&self) -> Vec2 {
        self.origin
    }

    pub fn direction(&self) -> Vec2 {
        self.direction
    }

    /// Orthogonal projection of `p` onto the line.
    pub fn project(&self, p: &Vec2) -> Vec2 {
        self.origin + self.direction * (p - self.origin).dot(&self.direction)
    }

    pub fn distance_to_point(&self, p: &Vec2) -> f64 {
        cross(&self.direction, &(p - self.origin)).abs()
    }

    pub fn contains_point(&self, p: &Vec2, tolerance: f64) -> bool {
        self.distance_to_point(p) <= tolerance
    }

    /// Line with the same direction passing through `p`.
    pub fn parallel_through(&self, p: Vec2) -> Self {
        Self {
            origin: p,
            direction: self.direction,
        }
    }

    /// Line perpendicular to this one passing through `p`.
    pub fn perpendicular_through(&self, p: Vec2) -> Self {
        Self {
            origin: p,
            direction: Vec2::new(-self.direction.y, self.direction.x),
        }
    }
}

/// Half-line starting at `anchor` along unit `direction`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Ray {
    anchor: Vec2,
    direction: Vec2,
}

impl Ray {
    /// Ray from `anchor` through `through`; `None` when the points coincide.
    pub fn from_points(anchor: Vec2, through: Vec2) -> Option<Self> {
        let line = Line::through(anchor, through)?;
        Some(Self {
            anchor,
            direction: line.direction,
        })
    }

    pub fn anchor(&self) -> Vec2 {
        self.anchor
    }

    pub fn direction(&self) -> Vec2 {
        self.direction
    }

    /// Signed angle (counter-clockwise positive) from the ray direction to the
    /// vector from the anchor to `p`.
    pub fn angle_to_point(&self, p: &Vec2) -> f64 {
        signed_angle_between(&self.direction, &(p - self.anchor))
    }
}
