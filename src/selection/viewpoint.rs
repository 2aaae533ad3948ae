use super::cache::SceneCache;
use crate::error::GroundingError;
use crate::geometry::EPS;
use crate::landmark::Scene;
use crate::relation::{Orientation, RelationModel};
use crate::shape::Shape;
use crate::types::{LandmarkId, Vec2};
use log::warn;

/// Perspective moved onto the nearest primary axis of the landmark's top
/// shape. Shapes without axes leave the perspective unchanged.
pub(crate) fn head_on_viewpoint(
    scene: &Scene,
    landmark: LandmarkId,
    perspective: Vec2,
) -> Result<Vec2, GroundingError> {
    let axes = scene.primary_axes(landmark)?;
    let nearest = axes.iter().min_by(|a, b| {
        a.distance_to_point(&perspective)
            .total_cmp(&b.distance_to_point(&perspective))
    });
    match nearest {
        Some(axis) => Ok(axis.project(&perspective)),
        None => {
            warn!(
                "viewpoint: top shape of landmark {landmark} has no primary axes, using the raw perspective"
            );
            Ok(perspective)
        }
    }
}

/// Orientations a sub-landmark adds over its parent, e.g. the far edge of a
/// table is "behind" while its own corners add nothing further.
///
/// Roots have none. Results are memoised per landmark and perspective.
pub(crate) fn active_orientations(
    model: &RelationModel,
    scene: &Scene,
    landmark: LandmarkId,
    perspective: Vec2,
    cache: &mut SceneCache,
) -> Result<Vec<Orientation>, GroundingError> {
    if let Some(hit) = cache.orientations(landmark, &perspective) {
        return Ok(hit.to_vec());
    }
    let active = match scene.fetch_landmark(landmark)?.parent {
        None => Vec::new(),
        Some(link) => {
            let inherited = active_orientations(model, scene, link.landmark, perspective, cache)?;
            orientations_from_parent(model, scene, landmark, link.landmark, perspective)?
                .into_iter()
                .filter(|o| !inherited.contains(o))
                .collect()
        }
    };
    cache.store_orientations(landmark, &perspective, active.clone());
    Ok(active)
}

/// Directions whose raw kernel from the parent's middle toward the child's
/// middle reaches the activity threshold.
fn orientations_from_parent(
    model: &RelationModel,
    scene: &Scene,
    landmark: LandmarkId,
    parent: LandmarkId,
    perspective: Vec2,
) -> Result<Vec<Orientation>, GroundingError> {
    if scene.primary_axes(parent)?.is_empty() {
        return Ok(Vec::new());
    }
    let middle = scene.fetch_landmark(landmark)?.shape.middle();
    let anchor = scene.fetch_landmark(parent)?.shape.middle();
    if (middle - anchor).norm() <= EPS {
        return Ok(Vec::new());
    }
    let frame = model.frame(scene, parent, perspective)?;
    let threshold = model.params().active_threshold;
    Ok(frame
        .orientation_profile(&Shape::Point(middle))?
        .iter()
        .filter(|score| score.kernel >= threshold)
        .map(|score| score.direction)
        .collect())
}
