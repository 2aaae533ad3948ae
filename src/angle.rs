//! Angle utilities shared by the orientation relations and the viewpoint code.

use crate::types::{cross, Vec2};
use std::f64::consts::{PI, TAU};

/// Wraps an angle into the half-open range (-π, π].
#[inline]
pub fn wrap_pi(angle: f64) -> f64 {
    let wrapped = (angle + PI).rem_euclid(TAU) - PI;
    if wrapped <= -PI {
        wrapped + TAU
    } else {
        wrapped
    }
}

/// Smallest unsigned difference between two directions on the circle.
/// Returns a value in [0, π]; 359° and 1° are 2° apart.
#[inline]
pub fn circular_difference(a: f64, b: f64) -> f64 {
    wrap_pi(a - b).abs()
}

/// Signed angle (counter-clockwise positive) rotating `from` onto `to`.
/// Returns a value in (-π, π]; zero when either vector is degenerate.
#[inline]
pub fn signed_angle_between(from: &Vec2, to: &Vec2) -> f64 {
    let c = cross(from, to);
    let d = from.dot(to);
    if c == 0.0 && d == 0.0 {
        return 0.0;
    }
    wrap_pi(c.atan2(d))
}

/// Unsigned angle between two vectors in radians, in [0, π].
#[inline]
pub fn angle_between(a: &Vec2, b: &Vec2) -> f64 {
    let na = a.norm().max(1e-12);
    let nb = b.norm().max(1e-12);
    (a.dot(b) / (na * nb)).clamp(-1.0, 1.0).acos()
}
