use super::measurement::Measurement;
use super::orientation::{direction_kernel, reference_ray, Orientation};
use super::params::RelationParams;
use super::Relation;
use crate::error::GroundingError;
use crate::geometry::Ray;
use crate::landmark::{composed_distance, Scene};
use crate::shape::Shape;
use crate::types::{LandmarkId, Vec2};
use serde::Serialize;

/// Result of evaluating one relation against one trajector.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Evaluation {
    /// Plausibility in [0, 1].
    pub applicability: f64,
    /// Distance the score was computed from: the frame-aware landmark
    /// distance, or the distance along the direction for orientations.
    pub measured_distance: f64,
}

impl Evaluation {
    const ZERO: Evaluation = Evaluation {
        applicability: 0.0,
        measured_distance: 0.0,
    };
}

/// Directional part of an orientation relation at one target.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrientationScore {
    pub direction: Orientation,
    /// Raw kernel value, no distance term.
    pub kernel: f64,
    /// Distance travelled along the direction, clamped at 0.
    pub along: f64,
}

/// A relation instantiated for a landmark, perspective and trajector.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoundRelation {
    pub relation: Relation,
    pub landmark: LandmarkId,
    pub perspective: Vec2,
    pub trajector_middle: Vec2,
    pub applicability: f64,
    pub measured_distance: f64,
}

/// What a relation is evaluated against.
#[derive(Clone, Copy)]
enum Target<'a> {
    Point(Vec2),
    Shape(&'a Shape),
}

impl Target<'_> {
    fn middle(&self) -> Vec2 {
        match self {
            Target::Point(p) => *p,
            Target::Shape(s) => s.middle(),
        }
    }
}

/// Stateless evaluator of the relation set.
#[derive(Clone, Debug, Default)]
pub struct RelationModel {
    params: RelationParams,
}

impl RelationModel {
    pub fn new(params: RelationParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &RelationParams {
        &self.params
    }

    /// Resolves everything that depends only on the landmark and the
    /// perspective, so repeated evaluations (grids) skip the tree walks.
    ///
    /// Orientation preconditions are checked lazily: a perspective that fits
    /// no primary axis only fails orientation evaluations.
    pub fn frame<'a>(
        &'a self,
        scene: &'a Scene,
        landmark: LandmarkId,
        perspective: Vec2,
    ) -> Result<LandmarkFrame<'a>, GroundingError> {
        let node = scene.fetch_landmark(landmark)?;
        let top = scene.top_parent_shape(landmark)?;
        let axes = top.primary_axes();
        let ray = reference_ray(&axes, &node.shape, &perspective, self.params.axis_tolerance);
        Ok(LandmarkFrame {
            params: &self.params,
            landmark,
            perspective,
            shape: &node.shape,
            parent: scene.parent_shape(landmark)?,
            top,
            is_root: node.is_root(),
            ray,
        })
    }

    pub fn evaluate(
        &self,
        scene: &Scene,
        landmark: LandmarkId,
        relation: &Relation,
        perspective: Vec2,
        trajector: &Shape,
    ) -> Result<Evaluation, GroundingError> {
        self.frame(scene, landmark, perspective)?
            .evaluate(relation, trajector)
    }

    /// Instantiates `relation` for the given landmark and trajector.
    pub fn bind(
        &self,
        scene: &Scene,
        landmark: LandmarkId,
        relation: Relation,
        perspective: Vec2,
        trajector: &Shape,
    ) -> Result<BoundRelation, GroundingError> {
        let eval = self.evaluate(scene, landmark, &relation, perspective, trajector)?;
        Ok(BoundRelation {
            relation,
            landmark,
            perspective,
            trajector_middle: trajector.middle(),
            applicability: eval.applicability,
            measured_distance: eval.measured_distance,
        })
    }
}

/// Landmark-and-perspective-specific evaluation context.
#[derive(Clone, Debug)]
pub struct LandmarkFrame<'a> {
    params: &'a RelationParams,
    landmark: LandmarkId,
    perspective: Vec2,
    shape: &'a Shape,
    parent: Option<&'a Shape>,
    top: &'a Shape,
    is_root: bool,
    ray: Result<Ray, GroundingError>,
}

impl LandmarkFrame<'_> {
    pub fn landmark(&self) -> LandmarkId {
        self.landmark
    }

    pub fn perspective(&self) -> Vec2 {
        self.perspective
    }

    /// Reference ray used by orientation relations.
    pub fn reference_ray(&self) -> Result<Ray, GroundingError> {
        self.ray.clone()
    }

    pub fn evaluate(&self, relation: &Relation, trajector: &Shape) -> Result<Evaluation, GroundingError> {
        self.evaluate_target(relation, Target::Shape(trajector))
    }

    /// Applicability at a bare point; the grid hot path.
    pub fn evaluate_point(&self, relation: &Relation, p: &Vec2) -> Result<f64, GroundingError> {
        Ok(self.evaluate_target(relation, Target::Point(*p))?.applicability)
    }

    /// Kernel and along-distance of every direction at the trajector's middle.
    pub fn orientation_profile(
        &self,
        trajector: &Shape,
    ) -> Result<[OrientationScore; 4], GroundingError> {
        let ray = self.reference_ray()?;
        let projected = self.project(&trajector.middle());
        let angle = ray.angle_to_point(&projected);
        let d = self.distance_to_point(&projected);
        Ok(Orientation::ALL.map(|direction| OrientationScore {
            direction,
            kernel: direction_kernel(angle, direction, self.params.kappa),
            along: along_distance(d, angle, direction),
        }))
    }

    /// Frame-aware distance to a point.
    pub fn distance_to_point(&self, p: &Vec2) -> f64 {
        composed_distance(self.shape, self.parent, self.top, p)
    }

    fn distance(&self, target: Target<'_>) -> f64 {
        match target {
            Target::Shape(s) if self.is_root => self.shape.distance_to(s),
            other => self.distance_to_point(&other.middle()),
        }
    }

    fn contains(&self, target: Target<'_>) -> bool {
        match target {
            Target::Point(p) => self.shape.contains_point(&p),
            Target::Shape(s) => self.shape.contains(s),
        }
    }

    /// Projects into the frame the landmark hangs off; identity for roots.
    fn project(&self, p: &Vec2) -> Vec2 {
        match self.parent {
            Some(parent) => parent.project_point(p),
            None => *p,
        }
    }

    fn evaluate_target(
        &self,
        relation: &Relation,
        target: Target<'_>,
    ) -> Result<Evaluation, GroundingError> {
        match relation {
            Relation::Distance(m) => Ok(self.measure(m, target)),
            Relation::Containment => {
                let applicability = match target {
                    Target::Point(p) => {
                        if self.shape.contains_point(&p) {
                            1.0
                        } else {
                            0.0
                        }
                    }
                    Target::Shape(s) => s.overlap_fraction_in(self.shape),
                };
                Ok(Evaluation {
                    applicability,
                    measured_distance: self.distance(target),
                })
            }
            Relation::Orientation { direction, degree } => {
                if self.shape.is_surface() {
                    return Ok(Evaluation::ZERO);
                }
                let ray = self.ray.as_ref().map_err(Clone::clone)?;
                let projected = self.project(&target.middle());
                let angle = ray.angle_to_point(&projected);
                let kernel = direction_kernel(angle, *direction, self.params.kappa);
                let along = along_distance(self.distance_to_point(&projected), angle, *direction);
                let applicability = match degree {
                    None => kernel,
                    Some(degree) => {
                        Measurement::far(*degree).applicability(along, self.params) * kernel
                    }
                };
                Ok(Evaluation {
                    applicability,
                    measured_distance: along,
                })
            }
        }
    }

    fn measure(&self, m: &Measurement, target: Target<'_>) -> Evaluation {
        if self.shape.is_surface() || self.contains(target) {
            return Evaluation::ZERO;
        }
        let d = self.distance(target);
        Evaluation {
            applicability: m.applicability(d, self.params),
            measured_distance: d,
        }
    }
}

#[inline]
fn along_distance(distance: f64, angle: f64, direction: Orientation) -> f64 {
    (distance * (angle - direction.canonical_angle()).cos()).max(0.0)
}
