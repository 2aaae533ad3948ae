use super::params::GroundingParams;
use crate::error::GroundingError;
use crate::landmark::Scene;
use crate::shape::Shape;
use crate::types::LandmarkId;

/// Roots in name order, each followed by its descendants down to
/// `max_level`. The excluded landmark and everything below it are skipped.
pub(crate) fn collect(
    scene: &Scene,
    exclude: Option<LandmarkId>,
    max_level: i32,
) -> Result<Vec<LandmarkId>, GroundingError> {
    let mut out = Vec::new();
    for (_, root) in scene.roots() {
        if Some(root) == exclude {
            continue;
        }
        out.push(root);
        for id in scene.landmarks_below(root, max_level)? {
            if !is_within(scene, id, exclude)? {
                out.push(id);
            }
        }
    }
    Ok(out)
}

fn is_within(
    scene: &Scene,
    id: LandmarkId,
    ancestor: Option<LandmarkId>,
) -> Result<bool, GroundingError> {
    let Some(ancestor) = ancestor else {
        return Ok(false);
    };
    let mut node = scene.fetch_landmark(id)?;
    loop {
        if node.id == ancestor {
            return Ok(true);
        }
        match node.parent {
            Some(link) => node = scene.fetch_landmark(link.landmark)?,
            None => return Ok(false),
        }
    }
}

/// Kernel score `exp(-(d/std)^2)` of a landmark for a trajector.
///
/// Surfaces never score. Rectangles that contain the trajector use the
/// fixed bonus distance instead of their (zero) positional distance.
pub(crate) fn landmark_score(
    scene: &Scene,
    params: &GroundingParams,
    id: LandmarkId,
    trajector: &Shape,
) -> Result<f64, GroundingError> {
    let shape = &scene.fetch_landmark(id)?.shape;
    if shape.is_surface() {
        return Ok(0.0);
    }
    let distance = if shape.is_rectangular() && shape.contains(trajector) {
        params.contained_bonus_distance
    } else {
        scene.distance_to(id, trajector)?
    };
    let z = distance / params.landmark_std;
    Ok((-z * z).exp())
}
