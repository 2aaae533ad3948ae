//! Relation scoring for a chosen landmark.
//!
//! Each relation's applicability at the trajector is normalised against the
//! same relation integrated over the scene grid:
//! `p = t / (sum(grid) + t)`. Orientations are special-cased: only
//! directions whose raw kernel reaches the activity cutoff compete, and when
//! exactly two do, the one with the shorter along-distance is scaled by
//! `short / long`.

use super::distribution::Distribution;
use super::grid::{CancelToken, Grid};
use super::params::ParallelGridOptions;
use super::SelectionStage;
use crate::error::GroundingError;
use crate::geometry::EPS;
use crate::relation::{LandmarkFrame, Orientation, OrientationScore, Relation};
use crate::shape::Shape;
use crate::types::{LandmarkId, Vec2};
use log::{debug, warn};
use serde::Serialize;

/// Relation candidates for one landmark with their scores and distribution.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RelationDistribution {
    pub landmark: LandmarkId,
    /// Head-on viewpoint the orientations were resolved against.
    pub perspective: Vec2,
    pub relations: Vec<Relation>,
    /// Likelihoods after the orientation rescale, before normalisation.
    pub scores: Vec<f64>,
    pub distribution: Distribution,
}

impl RelationDistribution {
    pub fn probability_of(&self, relation: &Relation) -> Option<f64> {
        self.relations
            .iter()
            .position(|r| r == relation)
            .map(|i| self.distribution.probability(i))
    }

    pub fn score_of(&self, relation: &Relation) -> Option<f64> {
        self.relations
            .iter()
            .position(|r| r == relation)
            .map(|i| self.scores[i])
    }

    /// `(relation, probability)` pairs in evaluation order.
    pub fn entries(&self) -> impl Iterator<Item = (Relation, f64)> + '_ {
        self.relations
            .iter()
            .copied()
            .zip(self.distribution.probabilities().iter().copied())
    }
}

/// Trajector applicability normalised against the grid mass of the same
/// relation. Zero when the relation does not hold at the trajector at all.
pub(crate) fn likelihood(
    frame: &LandmarkFrame<'_>,
    relation: &Relation,
    trajector: &Shape,
    grid: &Grid,
    parallel: &ParallelGridOptions,
    cancel: Option<&CancelToken>,
) -> Result<f64, GroundingError> {
    let t = frame.evaluate(relation, trajector)?.applicability;
    if t <= 0.0 {
        return Ok(0.0);
    }
    let total = grid.integrate(|p| frame.evaluate_point(relation, p), parallel, cancel)?;
    Ok(t / (total + t))
}

/// Multiplier per direction; `None` marks a direction that does not compete.
pub(crate) fn orientation_weights(
    profile: &[OrientationScore; 4],
    cutoff: f64,
) -> [Option<f64>; 4] {
    let mut weights = [None; 4];
    let active: Vec<usize> = (0..4).filter(|&i| profile[i].kernel >= cutoff).collect();
    for &i in &active {
        weights[i] = Some(1.0);
    }
    if let [a, b] = active[..] {
        let (short, long) = if profile[a].along <= profile[b].along {
            (a, b)
        } else {
            (b, a)
        };
        if profile[long].along > EPS {
            weights[short] = Some(profile[short].along / profile[long].along);
        }
    }
    weights
}

fn direction_index(direction: Orientation) -> usize {
    match direction {
        Orientation::Front => 0,
        Orientation::Behind => 1,
        Orientation::Left => 2,
        Orientation::Right => 3,
    }
}

/// Scores the registered relation set for the landmark behind `frame`.
pub(crate) fn distribution(
    frame: &LandmarkFrame<'_>,
    has_axes: bool,
    trajector: &Shape,
    grid: &Grid,
    cutoff: f64,
    parallel: &ParallelGridOptions,
    cancel: Option<&CancelToken>,
) -> Result<RelationDistribution, GroundingError> {
    let weights = if has_axes {
        Some(orientation_weights(&frame.orientation_profile(trajector)?, cutoff))
    } else {
        warn!(
            "relations: landmark {} has no primary axes, skipping orientations",
            frame.landmark()
        );
        None
    };

    let mut relations = Vec::new();
    let mut scores = Vec::new();
    for relation in Relation::all() {
        let weight = match relation.orientation() {
            None => 1.0,
            Some(direction) => match weights.and_then(|w| w[direction_index(direction)]) {
                Some(w) => w,
                None => continue,
            },
        };
        let p = likelihood(frame, &relation, trajector, grid, parallel, cancel)?;
        relations.push(relation);
        scores.push(p * weight);
    }

    let distribution = Distribution::from_scores(&scores, SelectionStage::RelationSelection)?;
    debug!(
        "relations: {} candidate(s) for landmark {}, entropy {:.3}",
        relations.len(),
        frame.landmark(),
        distribution.entropy()
    );
    Ok(RelationDistribution {
        landmark: frame.landmark(),
        perspective: frame.perspective(),
        relations,
        scores,
        distribution,
    })
}
