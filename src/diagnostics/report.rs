use super::TimingBreakdown;
use crate::relation::{Orientation, Relation};
use crate::types::{LandmarkId, Vec2};
use serde::Serialize;

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoredLandmark {
    pub landmark: LandmarkId,
    /// Path from the root, e.g. `table/f_edge`.
    pub name: String,
    pub score: f64,
    pub probability: f64,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoredRelation {
    pub relation: Relation,
    pub label: String,
    pub score: f64,
    pub probability: f64,
}

/// Trace of one `sample_meaning` run.
#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionReport {
    pub scene_landmarks: usize,
    pub candidates: usize,
    pub landmarks: Vec<ScoredLandmark>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub landmark_entropy: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chosen_landmark: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub viewpoint: Option<Vec2>,
    pub relations: Vec<ScoredRelation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relation_entropy: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chosen_relation: Option<Relation>,
    pub active_orientations: Vec<Orientation>,
    pub timings: TimingBreakdown,
}

fn format_optional(val: Option<f64>) -> String {
    val.map(|v| format!("{:.3}", v))
        .unwrap_or_else(|| "-".to_string())
}

impl SelectionReport {
    /// Short human-readable summary used by the demo.
    pub fn summary_lines(&self) -> Vec<String> {
        let mut lines = vec![format!(
            "candidates: {} of {} landmark node(s)",
            self.candidates, self.scene_landmarks
        )];
        lines.push(format!(
            "landmark: {} (entropy {})",
            self.chosen_landmark.as_deref().unwrap_or("-"),
            format_optional(self.landmark_entropy)
        ));
        lines.push(format!(
            "relation: {} (entropy {})",
            self.chosen_relation
                .map(|r| r.to_string())
                .unwrap_or_else(|| "-".to_string()),
            format_optional(self.relation_entropy)
        ));
        for stage in &self.timings.stages {
            lines.push(format!("  {:<22} {:>8.2} ms", stage.label, stage.elapsed_ms));
        }
        lines.push(format!("  {:<22} {:>8.2} ms", "total", self.timings.total_ms));
        lines
    }

    /// The `n` most probable landmarks, most probable first.
    pub fn top_landmarks(&self, n: usize) -> Vec<&ScoredLandmark> {
        let mut sorted: Vec<&ScoredLandmark> = self.landmarks.iter().collect();
        sorted.sort_by(|a, b| b.probability.total_cmp(&a.probability));
        sorted.truncate(n);
        sorted
    }
}
