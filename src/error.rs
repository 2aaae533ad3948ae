use crate::selection::SelectionStage;
use crate::types::LandmarkId;
use thiserror::Error;

/// Errors surfaced by the grounding core.
///
/// Precondition violations are fatal for the operation that hit them; they
/// are never coerced into a default score. An empty candidate set is not an
/// error (see [`crate::Grounder::sample_meaning`]).
#[derive(Clone, Debug, PartialEq, Error)]
pub enum GroundingError {
    #[error("degenerate polygon: {points} point(s), need at least 3")]
    DegeneratePolygon { points: usize },

    #[error("invalid geometry: {0}")]
    InvalidGeometry(String),

    #[error("group needs at least {needed} landmarks, got {found}")]
    EmptyGroup { needed: usize, found: usize },

    #[error("unknown landmark {0}")]
    UnknownLandmark(LandmarkId),

    #[error("a landmark named `{0}` already exists in the scene")]
    DuplicateLandmark(String),

    #[error("no primary axis of the landmark's top shape contains the perspective")]
    MissingPrimaryAxis,

    #[error("perspective lies on {matches} primary axes, viewing axis is ambiguous")]
    AmbiguousPrimaryAxis { matches: usize },

    #[error("projected perspective coincides with the landmark middle")]
    DegenerateViewpoint,

    #[error("all scores are zero during {stage:?}, nothing to sample")]
    ZeroMass { stage: SelectionStage },

    #[error("score #{index} is not a finite non-negative number ({value})")]
    InvalidScore { index: usize, value: f64 },

    #[error("grid step must be finite and positive, got {0}")]
    InvalidGridStep(f64),

    #[error("grid over the requested bounds has no points")]
    EmptyGrid,

    #[error("grid evaluation cancelled")]
    Cancelled,

    #[error("scene cache is bound to a different scene")]
    CacheSceneMismatch,

    #[error("{0}")]
    Config(String),
}
