//! Diagnostics data model exposed by the grounder and the demo.
//!
//! [`SelectionReport`] is returned by
//! [`Grounder::sample_meaning_with_diagnostics`](crate::Grounder) and bundles
//! the scored candidates of every stage together with per-stage timings. All
//! structures serialise to camelCase JSON.

pub mod report;
pub mod timing;

pub use report::{ScoredLandmark, ScoredRelation, SelectionReport};
pub use timing::{elapsed_ms, StageTiming, TimingBreakdown};
