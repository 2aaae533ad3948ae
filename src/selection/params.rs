use crate::relation::RelationParams;
use serde::{Deserialize, Serialize};

/// How a distribution is turned into a single choice.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionMode {
    /// Categorical (inverse-CDF) sampling.
    #[default]
    Sample,
    /// Most probable entry; ties resolve to the first.
    Best,
}

/// Controls whether grid evaluation runs sequentially or with Rayon.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParallelGridOptions {
    pub enabled: bool,
    pub min_points_for_parallel: usize,
}

impl ParallelGridOptions {
    pub fn new(enabled: bool, min_points_for_parallel: usize) -> Self {
        Self {
            enabled,
            min_points_for_parallel: min_points_for_parallel.max(1),
        }
    }

    /// Disable parallel evaluation regardless of grid size.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            min_points_for_parallel: usize::MAX,
        }
    }

    /// Returns true when a grid of `point_count` points should fan out.
    pub fn should_parallelize(&self, point_count: usize) -> bool {
        self.enabled && point_count >= self.min_points_for_parallel
    }
}

impl Default for ParallelGridOptions {
    fn default() -> Self {
        Self {
            enabled: cfg!(feature = "parallel"),
            min_points_for_parallel: 256,
        }
    }
}

/// Parameters of the selection engine.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GroundingParams {
    /// Depth of sub-landmark expansion below each root; negative means
    /// unbounded, 0 keeps roots only.
    pub max_level: i32,
    /// Spacing of the evaluation grid in scene units.
    pub grid_step: f64,
    /// The scene bounding box grows by this fraction of its size (centred)
    /// before the grid is laid out.
    pub inflate_fraction: f64,
    /// Width of the landmark kernel `exp(-(d/std)^2)`.
    pub landmark_std: f64,
    /// Distance substituted for rectangles that contain the trajector.
    pub contained_bonus_distance: f64,
    pub mode: SelectionMode,
    pub parallel: ParallelGridOptions,
    pub relations: RelationParams,
}

impl Default for GroundingParams {
    fn default() -> Self {
        Self {
            max_level: 2,
            grid_step: 0.1,
            inflate_fraction: 0.5,
            landmark_std: 0.1,
            contained_bonus_distance: 0.18,
            mode: SelectionMode::Sample,
            parallel: ParallelGridOptions::default(),
            relations: RelationParams::default(),
        }
    }
}
