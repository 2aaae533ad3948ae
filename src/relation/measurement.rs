use super::params::{CurveParams, RelationParams};
use serde::{Deserialize, Serialize};
use std::f64::consts::SQRT_2;
use std::fmt;

/// Intensity modifier scaling a distance curve's mean.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Degree {
    None,
    Somewhat,
    Very,
}

impl Degree {
    pub const ALL: [Degree; 3] = [Degree::Somewhat, Degree::None, Degree::Very];

    pub fn multiplier(self, params: &RelationParams) -> f64 {
        match self {
            Degree::None => params.degrees.none,
            Degree::Somewhat => params.degrees.somewhat,
            Degree::Very => params.degrees.very,
        }
    }

    fn prefix(self) -> &'static str {
        match self {
            Degree::None => "",
            Degree::Somewhat => "somewhat ",
            Degree::Very => "very ",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistanceClass {
    Near,
    Far,
}

impl DistanceClass {
    /// Exponent applied to the degree multiplier: "very far" pushes the mean
    /// out, "very near" pulls it in.
    pub fn sign(self) -> i32 {
        match self {
            DistanceClass::Far => 1,
            DistanceClass::Near => -1,
        }
    }

    pub fn curve(self, params: &RelationParams) -> CurveParams {
        match self {
            DistanceClass::Far => params.far,
            DistanceClass::Near => params.near,
        }
    }
}

/// Distance curve of one class at one degree.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Measurement {
    pub class: DistanceClass,
    pub degree: Degree,
}

impl Measurement {
    pub fn new(class: DistanceClass, degree: Degree) -> Self {
        Self { class, degree }
    }

    pub fn far(degree: Degree) -> Self {
        Self::new(DistanceClass::Far, degree)
    }

    pub fn near(degree: Degree) -> Self {
        Self::new(DistanceClass::Near, degree)
    }

    /// Curve mean: the class mean times `multiplier^sign`.
    pub fn mean(&self, params: &RelationParams) -> f64 {
        let curve = self.class.curve(params);
        curve.mean * self.degree.multiplier(params).powi(self.class.sign())
    }

    /// Cumulative Gaussian at `distance`, complemented for the near class.
    pub fn applicability(&self, distance: f64, params: &RelationParams) -> f64 {
        let std = self.class.curve(params).std;
        let z = (distance - self.mean(params)) / std;
        let cdf = 0.5 * (1.0 + libm::erf(z / SQRT_2));
        let value = match self.class {
            DistanceClass::Far => cdf,
            DistanceClass::Near => 1.0 - cdf,
        };
        value.clamp(0.0, 1.0)
    }
}

impl fmt::Display for Measurement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let class = match self.class {
            DistanceClass::Far => "far from",
            DistanceClass::Near => "near to",
        };
        write!(f, "{}{}", self.degree.prefix(), class)
    }
}

impl fmt::Display for Degree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.prefix().trim_end())
    }
}
