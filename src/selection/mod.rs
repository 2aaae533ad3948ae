//! Selection engine: picks a landmark and a relation describing where a
//! trajector is.
//!
//! Stages
//! - CandidateCollection: roots plus sub-landmarks down to `max_level`,
//!   excluding the trajector's own subtree. Memoised in [`SceneCache`].
//! - LandmarkSelection: kernel score `exp(-(d/std)^2)` on the frame-aware
//!   distance, normalised into a [`Distribution`] and sampled (or argmax).
//! - RelationSelection: the relation set scored against the head-on
//!   viewpoint for the chosen landmark, each normalised against its grid
//!   mass, then sampled the same way.
//! - Instantiated: the chosen relation bound to landmark, viewpoint and
//!   trajector.
//!
//! Auxiliary queries (joint meaning probabilities, heatmaps, point sampling)
//! reuse the same scoring and never feed back into selection.

mod cache;
mod candidates;
mod distribution;
mod grid;
mod heatmap;
mod params;
mod relations;
mod viewpoint;

pub use cache::SceneCache;
pub use distribution::{entropy, Distribution};
pub use grid::{CancelToken, Grid};
pub use heatmap::{Heatmaps, LandmarkHeatmap, RelationHeatmap};
pub use params::{GroundingParams, ParallelGridOptions, SelectionMode};
pub use relations::RelationDistribution;

use crate::diagnostics::{elapsed_ms, ScoredLandmark, ScoredRelation, SelectionReport};
use crate::error::GroundingError;
use crate::geometry::BoundingBox;
use crate::landmark::Scene;
use crate::relation::{BoundRelation, Orientation, Relation, RelationModel};
use crate::shape::Shape;
use crate::types::{LandmarkId, Vec2};
use log::{debug, warn};
use rand::Rng;
use serde::Serialize;
use std::time::Instant;

/// States of the selection pipeline, also used to tag zero-mass failures.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SelectionStage {
    CandidateCollection,
    LandmarkSelection,
    RelationSelection,
    Instantiated,
    /// Auxiliary: sampling a point trajector for a given meaning.
    TrajectorSampling,
}

/// The thing being located: a free shape or an existing landmark.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Trajector {
    pub shape: Shape,
    /// Set when the trajector is itself a scene landmark; its subtree is
    /// then excluded from the candidates.
    pub landmark: Option<LandmarkId>,
}

impl Trajector {
    pub fn point(p: Vec2) -> Self {
        Self::shape(Shape::Point(p))
    }

    pub fn shape(shape: Shape) -> Self {
        Self {
            shape,
            landmark: None,
        }
    }

    pub fn from_landmark(scene: &Scene, id: LandmarkId) -> Result<Self, GroundingError> {
        Ok(Self {
            shape: scene.fetch_landmark(id)?.shape.clone(),
            landmark: Some(id),
        })
    }
}

/// Selected landmark together with the distribution it was drawn from.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LandmarkChoice {
    pub landmark: LandmarkId,
    pub probability: f64,
    pub entropy: f64,
}

/// Terminal state: a bound (landmark, relation) pair and its viewpoint.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Meaning {
    pub landmark: LandmarkId,
    pub relation: BoundRelation,
    /// Head-on viewpoint the relation was resolved against.
    pub perspective: Vec2,
    pub landmark_probability: f64,
    pub landmark_entropy: f64,
    pub relation_probability: f64,
    pub relation_entropy: f64,
    /// Directions the landmark itself denotes within its parent (e.g. the
    /// far edge is "behind").
    pub active_orientations: Vec<Orientation>,
}

/// Joint probability of one (landmark, relation) pair.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MeaningProbability {
    pub landmark: LandmarkId,
    pub relation: Relation,
    pub perspective: Vec2,
    pub probability: f64,
}

/// Entry point of the selection engine.
#[derive(Clone, Debug, Default)]
pub struct Grounder {
    params: GroundingParams,
    model: RelationModel,
    cancel: Option<CancelToken>,
}

impl Grounder {
    pub fn new(params: GroundingParams) -> Self {
        let model = RelationModel::new(params.relations.clone());
        Self {
            params,
            model,
            cancel: None,
        }
    }

    /// Grid evaluations observe `token` and fail with
    /// [`GroundingError::Cancelled`] once it is set.
    pub fn with_cancel_token(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    pub fn params(&self) -> &GroundingParams {
        &self.params
    }

    pub fn model(&self) -> &RelationModel {
        &self.model
    }

    fn scene_grid(&self, scene: &Scene) -> Result<Grid, GroundingError> {
        Grid::for_scene(scene, self.params.grid_step, self.params.inflate_fraction)
    }

    /// Candidate landmarks for `trajector`, memoised per scene.
    pub fn collect_candidates(
        &self,
        scene: &Scene,
        trajector: &Trajector,
        cache: &mut SceneCache,
    ) -> Result<Vec<LandmarkId>, GroundingError> {
        cache.bind(scene)?;
        let max_level = self.params.max_level;
        if let Some(hit) = cache.candidates(trajector.landmark, max_level) {
            return Ok(hit.to_vec());
        }
        let ids = candidates::collect(scene, trajector.landmark, max_level)?;
        debug!(
            "candidates: {} landmark(s) at max_level {max_level}",
            ids.len()
        );
        cache.store_candidates(trajector.landmark, max_level, ids.clone());
        Ok(ids)
    }

    /// Raw kernel score per candidate.
    pub fn landmark_scores(
        &self,
        scene: &Scene,
        trajector: &Trajector,
        candidates: &[LandmarkId],
    ) -> Result<Vec<f64>, GroundingError> {
        candidates
            .iter()
            .map(|&id| candidates::landmark_score(scene, &self.params, id, &trajector.shape))
            .collect()
    }

    pub fn landmark_distribution(
        &self,
        scene: &Scene,
        trajector: &Trajector,
        candidates: &[LandmarkId],
    ) -> Result<Distribution, GroundingError> {
        let scores = self.landmark_scores(scene, trajector, candidates)?;
        Distribution::from_scores(&scores, SelectionStage::LandmarkSelection)
    }

    /// Collects candidates and draws one landmark; `None` when nothing but
    /// the trajector is in the scene.
    pub fn select_landmark<R: Rng + ?Sized>(
        &self,
        scene: &Scene,
        trajector: &Trajector,
        cache: &mut SceneCache,
        rng: &mut R,
    ) -> Result<Option<LandmarkChoice>, GroundingError> {
        let candidates = self.collect_candidates(scene, trajector, cache)?;
        if candidates.is_empty() {
            return Ok(None);
        }
        let dist = self.landmark_distribution(scene, trajector, &candidates)?;
        let index = dist.select(self.params.mode, rng);
        Ok(Some(LandmarkChoice {
            landmark: candidates[index],
            probability: dist.probability(index),
            entropy: dist.entropy(),
        }))
    }

    /// Perspective projected onto the nearest primary axis of the landmark's
    /// top shape.
    pub fn head_on_viewpoint(
        &self,
        scene: &Scene,
        landmark: LandmarkId,
        perspective: Vec2,
    ) -> Result<Vec2, GroundingError> {
        viewpoint::head_on_viewpoint(scene, landmark, perspective)
    }

    /// Orientations the landmark denotes relative to its parent.
    pub fn active_orientations(
        &self,
        scene: &Scene,
        landmark: LandmarkId,
        perspective: Vec2,
        cache: &mut SceneCache,
    ) -> Result<Vec<Orientation>, GroundingError> {
        cache.bind(scene)?;
        viewpoint::active_orientations(&self.model, scene, landmark, perspective, cache)
    }

    /// `t / (sum(grid) + t)` for a single relation; `perspective` is used
    /// as given.
    pub fn relation_likelihood(
        &self,
        scene: &Scene,
        landmark: LandmarkId,
        relation: &Relation,
        perspective: Vec2,
        trajector: &Trajector,
    ) -> Result<f64, GroundingError> {
        let grid = self.scene_grid(scene)?;
        let frame = self.model.frame(scene, landmark, perspective)?;
        relations::likelihood(
            &frame,
            relation,
            &trajector.shape,
            &grid,
            &self.params.parallel,
            self.cancel.as_ref(),
        )
    }

    /// Relation candidates for `landmark`, resolved against the head-on
    /// viewpoint derived from `perspective`.
    pub fn relation_distribution(
        &self,
        scene: &Scene,
        landmark: LandmarkId,
        perspective: Vec2,
        trajector: &Trajector,
    ) -> Result<RelationDistribution, GroundingError> {
        let grid = self.scene_grid(scene)?;
        self.relation_distribution_on(scene, landmark, perspective, trajector, &grid)
    }

    fn relation_distribution_on(
        &self,
        scene: &Scene,
        landmark: LandmarkId,
        perspective: Vec2,
        trajector: &Trajector,
        grid: &Grid,
    ) -> Result<RelationDistribution, GroundingError> {
        let view = self.head_on_viewpoint(scene, landmark, perspective)?;
        let frame = self.model.frame(scene, landmark, view)?;
        let has_axes = !scene.primary_axes(landmark)?.is_empty();
        relations::distribution(
            &frame,
            has_axes,
            &trajector.shape,
            grid,
            self.params.relations.orientation_cutoff,
            &self.params.parallel,
            self.cancel.as_ref(),
        )
    }

    /// Draws a relation for `landmark` and binds it.
    pub fn select_relation<R: Rng + ?Sized>(
        &self,
        scene: &Scene,
        landmark: LandmarkId,
        perspective: Vec2,
        trajector: &Trajector,
        rng: &mut R,
    ) -> Result<(BoundRelation, f64, f64), GroundingError> {
        let dist = self.relation_distribution(scene, landmark, perspective, trajector)?;
        let index = dist.distribution.select(self.params.mode, rng);
        let bound = self.model.bind(
            scene,
            landmark,
            dist.relations[index],
            dist.perspective,
            &trajector.shape,
        )?;
        Ok((
            bound,
            dist.distribution.probability(index),
            dist.distribution.entropy(),
        ))
    }

    /// Runs the full pipeline. `Ok(None)` means the scene offers no
    /// candidate besides the trajector.
    pub fn sample_meaning<R: Rng + ?Sized>(
        &self,
        scene: &Scene,
        trajector: &Trajector,
        perspective: Vec2,
        cache: &mut SceneCache,
        rng: &mut R,
    ) -> Result<Option<Meaning>, GroundingError> {
        self.sample_meaning_with_diagnostics(scene, trajector, perspective, cache, rng)
            .map(|(meaning, _)| meaning)
    }

    /// Same as [`Grounder::sample_meaning`], also returning the scored
    /// candidates and per-stage timings.
    pub fn sample_meaning_with_diagnostics<R: Rng + ?Sized>(
        &self,
        scene: &Scene,
        trajector: &Trajector,
        perspective: Vec2,
        cache: &mut SceneCache,
        rng: &mut R,
    ) -> Result<(Option<Meaning>, SelectionReport), GroundingError> {
        let total_start = Instant::now();
        let mut report = SelectionReport {
            scene_landmarks: scene.len(),
            ..SelectionReport::default()
        };

        let stage_start = Instant::now();
        let candidates = self.collect_candidates(scene, trajector, cache)?;
        report.timings.record("candidates", stage_start);
        report.candidates = candidates.len();
        if candidates.is_empty() {
            debug!("selection: no candidate landmarks");
            report.timings.total_ms = elapsed_ms(total_start);
            return Ok((None, report));
        }

        let stage_start = Instant::now();
        let scores = self.landmark_scores(scene, trajector, &candidates)?;
        let landmark_dist = Distribution::from_scores(&scores, SelectionStage::LandmarkSelection)?;
        let index = landmark_dist.select(self.params.mode, rng);
        let landmark = candidates[index];
        report.timings.record("landmark_selection", stage_start);
        report.landmarks = candidates
            .iter()
            .zip(scores.iter().zip(landmark_dist.probabilities()))
            .map(|(&id, (&score, &probability))| -> Result<_, GroundingError> {
                Ok(ScoredLandmark {
                    landmark: id,
                    name: scene.qualified_name(id)?,
                    score,
                    probability,
                })
            })
            .collect::<Result<_, GroundingError>>()?;
        report.landmark_entropy = Some(landmark_dist.entropy());
        report.chosen_landmark = Some(scene.qualified_name(landmark)?);
        debug!(
            "selection: landmark {} (p = {:.3})",
            scene.qualified_name(landmark)?,
            landmark_dist.probability(index)
        );

        let stage_start = Instant::now();
        let relation_dist = self.relation_distribution(scene, landmark, perspective, trajector)?;
        let rel_index = relation_dist.distribution.select(self.params.mode, rng);
        let relation = relation_dist.relations[rel_index];
        report.timings.record("relation_selection", stage_start);
        report.viewpoint = Some(relation_dist.perspective);
        report.relations = relation_dist
            .relations
            .iter()
            .zip(relation_dist.scores.iter())
            .zip(relation_dist.distribution.probabilities())
            .map(|((&relation, &score), &probability)| ScoredRelation {
                relation,
                label: relation.to_string(),
                score,
                probability,
            })
            .collect();
        report.relation_entropy = Some(relation_dist.distribution.entropy());
        report.chosen_relation = Some(relation);
        debug!("selection: relation `{relation}`");

        let stage_start = Instant::now();
        let bound = self.model.bind(
            scene,
            landmark,
            relation,
            relation_dist.perspective,
            &trajector.shape,
        )?;
        let active = self.active_orientations(scene, landmark, relation_dist.perspective, cache)?;
        report.timings.record("instantiate", stage_start);
        report.active_orientations = active.clone();
        report.timings.total_ms = elapsed_ms(total_start);

        let meaning = Meaning {
            landmark,
            relation: bound,
            perspective: relation_dist.perspective,
            landmark_probability: landmark_dist.probability(index),
            landmark_entropy: landmark_dist.entropy(),
            relation_probability: relation_dist.distribution.probability(rel_index),
            relation_entropy: relation_dist.distribution.entropy(),
            active_orientations: active,
        };
        Ok((Some(meaning), report))
    }

    /// Joint probability `P(landmark) * P(relation | landmark)` of every
    /// pair, most probable first. Landmarks with zero probability are
    /// skipped.
    pub fn all_meaning_probs(
        &self,
        scene: &Scene,
        trajector: &Trajector,
        perspective: Vec2,
        cache: &mut SceneCache,
    ) -> Result<Vec<MeaningProbability>, GroundingError> {
        let candidates = self.collect_candidates(scene, trajector, cache)?;
        if candidates.is_empty() {
            return Ok(Vec::new());
        }
        let landmark_dist = self.landmark_distribution(scene, trajector, &candidates)?;
        let grid = self.scene_grid(scene)?;
        let mut out = Vec::new();
        for (i, &landmark) in candidates.iter().enumerate() {
            let p_landmark = landmark_dist.probability(i);
            if p_landmark <= 0.0 {
                continue;
            }
            let dist = self.relation_distribution_on(scene, landmark, perspective, trajector, &grid)?;
            out.extend(dist.entries().map(|(relation, p)| MeaningProbability {
                landmark,
                relation,
                perspective: dist.perspective,
                probability: p_landmark * p,
            }));
        }
        out.sort_by(|a, b| b.probability.total_cmp(&a.probability));
        debug!("meanings: {} weighted pair(s)", out.len());
        Ok(out)
    }

    /// Landmark and relation probability fields over the scene grid.
    ///
    /// Per landmark, the point-trajector kernel is normalised over the grid
    /// and then across landmarks at each point. Relation fields are
    /// normalised over the grid, then across relations at each point, and
    /// weighted by the landmark field.
    ///
    /// Landmarks whose top shape has no primary axes get no orientation
    /// fields. An ambiguous or degenerate viewpoint fails the whole query,
    /// as it does in [`Grounder::relation_distribution`].
    pub fn heatmaps(
        &self,
        scene: &Scene,
        perspective: Vec2,
        cache: &mut SceneCache,
    ) -> Result<Heatmaps, GroundingError> {
        let start = Instant::now();
        let grid = self.scene_grid(scene)?;
        let landmarks = self.collect_candidates(scene, &Trajector::point(perspective), cache)?;
        let parallel = &self.params.parallel;
        let cancel = self.cancel.as_ref();

        let mut landmark_fields = Vec::with_capacity(landmarks.len());
        for &id in &landmarks {
            let mut field = grid.evaluate(
                |p| candidates::landmark_score(scene, &self.params, id, &Shape::Point(*p)),
                parallel,
                cancel,
            )?;
            heatmap::normalize_over_points(&mut field);
            landmark_fields.push(field);
        }
        let empty_points = heatmap::normalize_across(&mut landmark_fields);
        if empty_points > 0 {
            warn!("heatmaps: {empty_points} grid point(s) carry no landmark mass");
        }

        let mut out = Vec::with_capacity(landmarks.len());
        for (&id, landmark_field) in landmarks.iter().zip(landmark_fields) {
            let view = self.head_on_viewpoint(scene, id, perspective)?;
            let frame = self.model.frame(scene, id, view)?;
            let has_axes = !scene.primary_axes(id)?.is_empty();
            if has_axes {
                frame.reference_ray()?;
            } else {
                warn!("heatmaps: landmark {id} has no primary axes, skipping orientations");
            }
            let relations: Vec<Relation> = Relation::all()
                .into_iter()
                .filter(|r| has_axes || r.orientation().is_none())
                .collect();

            let mut fields = Vec::with_capacity(relations.len());
            for relation in &relations {
                let mut field = grid.evaluate(|p| frame.evaluate_point(relation, p), parallel, cancel)?;
                heatmap::normalize_over_points(&mut field);
                fields.push(field);
            }
            heatmap::normalize_across(&mut fields);
            for field in &mut fields {
                for (v, w) in field.iter_mut().zip(&landmark_field) {
                    *v *= w;
                }
            }
            out.push(LandmarkHeatmap {
                landmark: id,
                perspective: view,
                probability: landmark_field,
                relations: relations
                    .into_iter()
                    .zip(fields)
                    .map(|(relation, probability)| RelationHeatmap {
                        relation,
                        probability,
                    })
                    .collect(),
            });
        }
        debug!(
            "heatmaps: {} landmark(s) over {} point(s) in {:.1} ms",
            out.len(),
            grid.len(),
            elapsed_ms(start)
        );
        Ok(Heatmaps {
            grid,
            landmarks: out,
        })
    }

    /// Samples a grid point with probability proportional to the relation's
    /// applicability. `bounds` defaults to the inflated scene box.
    pub fn sample_point_trajector<R: Rng + ?Sized>(
        &self,
        scene: &Scene,
        landmark: LandmarkId,
        relation: &Relation,
        perspective: Vec2,
        bounds: Option<BoundingBox>,
        rng: &mut R,
    ) -> Result<Vec2, GroundingError> {
        let grid = match bounds {
            Some(b) => Grid::over(b, self.params.grid_step)?,
            None => self.scene_grid(scene)?,
        };
        let frame = self.model.frame(scene, landmark, perspective)?;
        let scores = grid.evaluate(
            |p| frame.evaluate_point(relation, p),
            &self.params.parallel,
            self.cancel.as_ref(),
        )?;
        let dist = Distribution::from_scores(&scores, SelectionStage::TrajectorSampling)?;
        Ok(grid.points()[dist.sample(rng)])
    }
}
