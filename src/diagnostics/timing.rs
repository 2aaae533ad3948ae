use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Timing entry describing a single selection stage or auxiliary query.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StageTiming {
    pub label: String,
    pub elapsed_ms: f64,
}

impl StageTiming {
    pub fn new(label: impl Into<String>, elapsed_ms: f64) -> Self {
        Self {
            label: label.into(),
            elapsed_ms,
        }
    }
}

/// Aggregated timing trace for one grounding run.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimingBreakdown {
    pub total_ms: f64,
    pub stages: Vec<StageTiming>,
}

impl TimingBreakdown {
    pub fn push(&mut self, label: impl Into<String>, elapsed_ms: f64) {
        self.stages.push(StageTiming::new(label, elapsed_ms));
    }

    /// Records the time since `start` under `label` and returns it.
    pub fn record(&mut self, label: impl Into<String>, start: Instant) -> f64 {
        let ms = elapsed_ms(start);
        self.push(label, ms);
        ms
    }

    pub fn stage(&self, label: &str) -> Option<&StageTiming> {
        self.stages.iter().find(|s| s.label == label)
    }
}

#[inline]
pub fn elapsed_ms(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0
}
