use serde::{Deserialize, Serialize};

/// Mean and spread of a cumulative-Gaussian distance curve.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CurveParams {
    pub mean: f64,
    pub std: f64,
}

/// Mean multipliers per degree modifier.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DegreeMultipliers {
    pub none: f64,
    pub somewhat: f64,
    pub very: f64,
}

impl Default for DegreeMultipliers {
    fn default() -> Self {
        Self {
            none: 1.0,
            somewhat: 0.75,
            very: 1.5,
        }
    }
}

/// Parameters of the relation applicability model.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RelationParams {
    /// Curve for "far from"; applicability rises with distance.
    pub far: CurveParams,
    /// Curve for "near to"; applicability is the complement of the CDF.
    pub near: CurveParams,
    pub degrees: DegreeMultipliers,
    /// Concentration of the directional kernel around an orientation's
    /// canonical angle.
    pub kappa: f64,
    /// Raw kernel value at which an orientation counts as competing during
    /// relation selection.
    pub orientation_cutoff: f64,
    /// Kernel value at which an orientation is recorded as an active
    /// orientation of a sub-landmark.
    pub active_threshold: f64,
    /// Distance tolerance for "primary axis contains the perspective".
    pub axis_tolerance: f64,
}

impl Default for RelationParams {
    fn default() -> Self {
        Self {
            far: CurveParams {
                mean: 0.55,
                std: 0.05,
            },
            near: CurveParams {
                mean: 0.15,
                std: 0.05,
            },
            degrees: DegreeMultipliers::default(),
            kappa: 6.66,
            orientation_cutoff: 0.01,
            active_threshold: 0.5,
            axis_tolerance: 1e-6,
        }
    }
}
