use super::grid::Grid;
use crate::relation::Relation;
use crate::types::{LandmarkId, Vec2};
use serde::Serialize;

/// Per-landmark and per-relation probability fields over one grid.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Heatmaps {
    pub grid: Grid,
    pub landmarks: Vec<LandmarkHeatmap>,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LandmarkHeatmap {
    pub landmark: LandmarkId,
    /// Head-on viewpoint used for this landmark's orientations.
    pub perspective: Vec2,
    /// P(landmark | point), aligned with the grid points.
    pub probability: Vec<f64>,
    pub relations: Vec<RelationHeatmap>,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RelationHeatmap {
    pub relation: Relation,
    /// P(landmark, relation | point).
    pub probability: Vec<f64>,
}

impl Heatmaps {
    pub fn landmark(&self, id: LandmarkId) -> Option<&LandmarkHeatmap> {
        self.landmarks.iter().find(|h| h.landmark == id)
    }
}

impl LandmarkHeatmap {
    pub fn relation(&self, relation: &Relation) -> Option<&RelationHeatmap> {
        self.relations.iter().find(|h| &h.relation == relation)
    }
}

/// Scales `field` to unit sum; all-zero fields are left untouched.
/// Returns whether the field had mass.
pub(crate) fn normalize_over_points(field: &mut [f64]) -> bool {
    let total: f64 = field.iter().sum();
    if total > 0.0 {
        field.iter_mut().for_each(|v| *v /= total);
        true
    } else {
        false
    }
}

/// Normalises each point (column) across `fields` to unit sum, leaving
/// zero columns as zeros. Returns the number of zero columns.
pub(crate) fn normalize_across(fields: &mut [Vec<f64>]) -> usize {
    let Some(len) = fields.first().map(Vec::len) else {
        return 0;
    };
    let mut zero_columns = 0;
    for i in 0..len {
        let total: f64 = fields.iter().map(|f| f[i]).sum();
        if total > 0.0 {
            for f in fields.iter_mut() {
                f[i] /= total;
            }
        } else {
            zero_columns += 1;
        }
    }
    zero_columns
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalisation_leaves_zero_mass_alone() {
        let mut f = vec![0.0, 2.0, 6.0];
        assert!(normalize_over_points(&mut f));
        assert_eq!(f, vec![0.0, 0.25, 0.75]);
        let mut z = vec![0.0; 3];
        assert!(!normalize_over_points(&mut z));
        assert_eq!(z, vec![0.0; 3]);
    }

    #[test]
    fn columns_sum_to_one_or_zero() {
        let mut fields = vec![vec![1.0, 0.0, 3.0], vec![1.0, 0.0, 1.0]];
        assert_eq!(normalize_across(&mut fields), 1);
        assert_eq!(fields[0], vec![0.5, 0.0, 0.75]);
        assert_eq!(fields[1], vec![0.5, 0.0, 0.25]);
        assert_eq!(normalize_across(&mut []), 0);
    }
}
