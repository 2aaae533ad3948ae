//! Directional kernel and reference-ray construction for front/behind/
//! left/right.

use crate::angle::circular_difference;
use crate::error::GroundingError;
use crate::geometry::{Line, Ray};
use crate::shape::Shape;
use crate::types::Vec2;
use serde::{Deserialize, Serialize};
use std::f64::consts::{FRAC_PI_2, PI};
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    Front,
    Behind,
    Left,
    Right,
}

impl Orientation {
    pub const ALL: [Orientation; 4] = [
        Orientation::Front,
        Orientation::Behind,
        Orientation::Left,
        Orientation::Right,
    ];

    /// Angle from the reference ray (pointing at the viewer), counter-clockwise
    /// positive.
    pub fn canonical_angle(self) -> f64 {
        match self {
            Orientation::Front => 0.0,
            Orientation::Behind => PI,
            Orientation::Left => -FRAC_PI_2,
            Orientation::Right => FRAC_PI_2,
        }
    }

    pub(crate) fn phrase(self) -> &'static str {
        match self {
            Orientation::Front => "in front of",
            Orientation::Behind => "behind",
            Orientation::Left => "to the left of",
            Orientation::Right => "to the right of",
        }
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.phrase())
    }
}

/// Von Mises style kernel `exp(kappa * (cos(angle - mu) - 1))`; 1 at the
/// canonical angle, wrapping smoothly across ±π.
#[inline]
pub fn direction_kernel(angle: f64, direction: Orientation, kappa: f64) -> f64 {
    let delta = circular_difference(angle, direction.canonical_angle());
    (kappa * (delta.cos() - 1.0)).exp()
}

/// The single axis of `axes` containing `perspective`.
pub fn viewing_axis<'a>(
    axes: &'a [Line],
    perspective: &Vec2,
    tolerance: f64,
) -> Result<&'a Line, GroundingError> {
    let mut matching = axes
        .iter()
        .filter(|axis| axis.contains_point(perspective, tolerance));
    let first = matching.next().ok_or(GroundingError::MissingPrimaryAxis)?;
    let extra = matching.count();
    if extra > 0 {
        return Err(GroundingError::AmbiguousPrimaryAxis {
            matches: extra + 1,
        });
    }
    Ok(first)
}

/// Ray from the landmark's middle toward the perspective, after moving the
/// perspective onto the viewing axis' parallel through that middle.
///
/// `axes` are the primary axes of the landmark's top-level shape.
pub fn reference_ray(
    axes: &[Line],
    landmark_shape: &Shape,
    perspective: &Vec2,
    tolerance: f64,
) -> Result<Ray, GroundingError> {
    if axes.is_empty() {
        return Err(GroundingError::MissingPrimaryAxis);
    }
    let axis = viewing_axis(axes, perspective, tolerance)?;
    let middle = landmark_shape.middle();
    let projected = axis.parallel_through(middle).project(perspective);
    Ray::from_points(middle, projected).ok_or(GroundingError::DegenerateViewpoint)
}
