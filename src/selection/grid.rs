//! Regular evaluation grid and batch evaluation over it.
//!
//! Every grid point is scored independently, so a batch fans out with Rayon
//! (when the `parallel` feature and the runtime toggle allow) and is combined
//! only by the caller. A [`CancelToken`] abandons a batch; partial results
//! are dropped.

use super::params::ParallelGridOptions;
use crate::error::GroundingError;
use crate::geometry::BoundingBox;
use crate::landmark::Scene;
use crate::types::Vec2;
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Shared flag used to abandon an in-flight grid evaluation.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Points `min + i * step` along each axis, `ceil(extent / step)` per axis,
/// laid out with x as the outer loop.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Grid {
    bounds: BoundingBox,
    step: f64,
    nx: usize,
    ny: usize,
    points: Vec<Vec2>,
}

fn axis_count(extent: f64, step: f64) -> usize {
    let n = (extent / step).ceil();
    if n.is_finite() && n > 0.0 {
        n as usize
    } else {
        0
    }
}

impl Grid {
    pub fn over(bounds: BoundingBox, step: f64) -> Result<Self, GroundingError> {
        if !step.is_finite() || step <= 0.0 {
            return Err(GroundingError::InvalidGridStep(step));
        }
        let nx = axis_count(bounds.width(), step);
        let ny = axis_count(bounds.height(), step);
        if nx == 0 || ny == 0 {
            return Err(GroundingError::EmptyGrid);
        }
        let mut points = Vec::with_capacity(nx * ny);
        for i in 0..nx {
            let x = bounds.min.x + i as f64 * step;
            for j in 0..ny {
                points.push(Vec2::new(x, bounds.min.y + j as f64 * step));
            }
        }
        Ok(Self {
            bounds,
            step,
            nx,
            ny,
            points,
        })
    }

    /// Grid over the scene's bounding box grown by `inflate_fraction`.
    pub fn for_scene(scene: &Scene, step: f64, inflate_fraction: f64) -> Result<Self, GroundingError> {
        let bounds = scene.bounding_box().ok_or(GroundingError::EmptyGrid)?;
        Self::over(bounds.inflate_fraction(inflate_fraction), step)
    }

    pub fn bounds(&self) -> &BoundingBox {
        &self.bounds
    }

    pub fn step(&self) -> f64 {
        self.step
    }

    /// Number of columns (x) and rows (y).
    pub fn dims(&self) -> (usize, usize) {
        (self.nx, self.ny)
    }

    pub fn points(&self) -> &[Vec2] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Scores every point with `score`, preserving point order.
    pub fn evaluate<F>(
        &self,
        score: F,
        parallel: &ParallelGridOptions,
        cancel: Option<&CancelToken>,
    ) -> Result<Vec<f64>, GroundingError>
    where
        F: Fn(&Vec2) -> Result<f64, GroundingError> + Sync,
    {
        let guarded = |p: &Vec2| {
            if cancel.is_some_and(CancelToken::is_cancelled) {
                return Err(GroundingError::Cancelled);
            }
            score(p)
        };

        if parallel.should_parallelize(self.points.len()) {
            #[cfg(feature = "parallel")]
            {
                use rayon::prelude::*;
                return self.points.par_iter().map(guarded).collect();
            }
        }

        self.points.iter().map(guarded).collect()
    }

    /// Sum of `score` over the grid.
    pub fn integrate<F>(
        &self,
        score: F,
        parallel: &ParallelGridOptions,
        cancel: Option<&CancelToken>,
    ) -> Result<f64, GroundingError>
    where
        F: Fn(&Vec2) -> Result<f64, GroundingError> + Sync,
    {
        Ok(self.evaluate(score, parallel, cancel)?.iter().sum())
    }
}
