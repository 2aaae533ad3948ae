use crate::error::GroundingError;
use crate::landmark::Scene;
use crate::relation::Orientation;
use crate::types::{LandmarkId, SceneId, Vec2};
use std::collections::HashMap;

type CandidateKey = (Option<LandmarkId>, i32);
type OrientationKey = (LandmarkId, [u64; 2]);

/// Caller-owned memo for one scene.
///
/// The cache binds to the first scene it is used with and rejects every
/// other scene; create a new cache per scene. Entries are never invalidated
/// because scenes are immutable once built.
#[derive(Clone, Debug, Default)]
pub struct SceneCache {
    scene: Option<SceneId>,
    candidates: HashMap<CandidateKey, Vec<LandmarkId>>,
    orientations: HashMap<OrientationKey, Vec<Orientation>>,
}

impl SceneCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scene this cache is bound to, if any.
    pub fn scene_id(&self) -> Option<SceneId> {
        self.scene
    }

    pub(crate) fn bind(&mut self, scene: &Scene) -> Result<(), GroundingError> {
        match self.scene {
            None => {
                self.scene = Some(scene.id());
                Ok(())
            }
            Some(id) if id == scene.id() => Ok(()),
            Some(_) => Err(GroundingError::CacheSceneMismatch),
        }
    }

    pub(crate) fn candidates(&self, exclude: Option<LandmarkId>, max_level: i32) -> Option<&[LandmarkId]> {
        self.candidates.get(&(exclude, max_level)).map(Vec::as_slice)
    }

    pub(crate) fn store_candidates(
        &mut self,
        exclude: Option<LandmarkId>,
        max_level: i32,
        ids: Vec<LandmarkId>,
    ) {
        self.candidates.insert((exclude, max_level), ids);
    }

    pub(crate) fn orientations(&self, landmark: LandmarkId, perspective: &Vec2) -> Option<&[Orientation]> {
        self.orientations
            .get(&orientation_key(landmark, perspective))
            .map(Vec::as_slice)
    }

    pub(crate) fn store_orientations(
        &mut self,
        landmark: LandmarkId,
        perspective: &Vec2,
        active: Vec<Orientation>,
    ) {
        self.orientations
            .insert(orientation_key(landmark, perspective), active);
    }

    /// Number of memoised entries across all tables.
    pub fn len(&self) -> usize {
        self.candidates.len() + self.orientations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn orientation_key(landmark: LandmarkId, perspective: &Vec2) -> OrientationKey {
    (landmark, [perspective.x.to_bits(), perspective.y.to_bits()])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn binds_to_first_scene() {
        let a = Scene::new();
        let b = Scene::new();
        let mut cache = SceneCache::new();
        assert!(cache.scene_id().is_none());
        cache.bind(&a).expect("bind");
        cache.bind(&a).expect("same scene");
        assert_eq!(cache.bind(&b), Err(GroundingError::CacheSceneMismatch));
        assert_eq!(cache.scene_id(), Some(a.id()));
    }

    #[test]
    fn memo_tables_are_keyed() {
        let mut cache = SceneCache::new();
        cache.store_candidates(None, 2, vec![LandmarkId(0), LandmarkId(3)]);
        assert_eq!(cache.candidates(None, 2), Some(&[LandmarkId(0), LandmarkId(3)][..]));
        assert!(cache.candidates(None, 1).is_none());
        assert!(cache.candidates(Some(LandmarkId(0)), 2).is_none());

        let p = Vec2::new(0.5, -1.0);
        cache.store_orientations(LandmarkId(4), &p, vec![Orientation::Behind]);
        assert_eq!(cache.orientations(LandmarkId(4), &p), Some(&[Orientation::Behind][..]));
        assert!(cache.orientations(LandmarkId(4), &Vec2::new(0.5, -2.0)).is_none());
        assert_eq!(cache.len(), 2);
    }
}
