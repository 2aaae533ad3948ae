//! Relation model: how well a spatial relation holds between a landmark and a
//! trajector.
//!
//! Overview
//! - Distance relations ([`Measurement`]) score a cumulative Gaussian of the
//!   frame-aware landmark distance; "near" uses the complement. Degree
//!   modifiers scale the curve mean.
//! - Containment scores the fraction of the trajector inside the landmark.
//! - Orientation relations compare the trajector's bearing against a
//!   reference ray pointing from the landmark toward the (projected)
//!   perspective, through a circular kernel. With a degree attached the
//!   kernel is multiplied by a far-curve on the distance travelled along the
//!   relation's direction.
//!
//! Applicability values live in [0, 1] but are not probabilities; the
//! selection engine normalises them.

mod measurement;
mod model;
mod orientation;
mod params;

pub use measurement::{Degree, DistanceClass, Measurement};
pub use model::{BoundRelation, Evaluation, LandmarkFrame, OrientationScore, RelationModel};
pub use orientation::{direction_kernel, reference_ray, viewing_axis, Orientation};
pub use params::{CurveParams, DegreeMultipliers, RelationParams};

use serde::{Deserialize, Serialize};
use std::fmt;

/// A spatial relation with its parameters. Stateless and cheap to copy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "family", rename_all = "snake_case")]
pub enum Relation {
    Distance(Measurement),
    /// "on" / "in": fraction of the trajector inside the landmark.
    Containment,
    /// Without a degree the relation is purely directional.
    Orientation {
        direction: Orientation,
        degree: Option<Degree>,
    },
}

/// Coarse grouping used by diagnostics.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum RelationFamily {
    Distance,
    Containment,
    Orientation,
}

impl Relation {
    /// The registered relation set, in evaluation order.
    pub fn all() -> Vec<Relation> {
        let mut out = Vec::with_capacity(23);
        for degree in Degree::ALL {
            out.push(Relation::Distance(Measurement::far(degree)));
        }
        for degree in Degree::ALL {
            out.push(Relation::Distance(Measurement::near(degree)));
        }
        out.push(Relation::Containment);
        for direction in Orientation::ALL {
            out.push(Relation::Orientation {
                direction,
                degree: None,
            });
            for degree in Degree::ALL {
                out.push(Relation::Orientation {
                    direction,
                    degree: Some(degree),
                });
            }
        }
        out
    }

    pub fn family(&self) -> RelationFamily {
        match self {
            Relation::Distance(_) => RelationFamily::Distance,
            Relation::Containment => RelationFamily::Containment,
            Relation::Orientation { .. } => RelationFamily::Orientation,
        }
    }

    pub fn orientation(&self) -> Option<Orientation> {
        match self {
            Relation::Orientation { direction, .. } => Some(*direction),
            _ => None,
        }
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Relation::Distance(m) => m.fmt(f),
            Relation::Containment => f.write_str("on"),
            Relation::Orientation {
                direction,
                degree: None,
            } => direction.fmt(f),
            Relation::Orientation {
                direction,
                degree: Some(Degree::None),
            } => write!(f, "far {direction}"),
            Relation::Orientation {
                direction,
                degree: Some(degree),
            } => write!(f, "{degree} far {direction}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn registered_set_is_complete_and_unique() {
        let all = Relation::all();
        assert_eq!(all.len(), 23);
        let unique: HashSet<_> = all.iter().collect();
        assert_eq!(unique.len(), 23);
        assert_eq!(all[6], Relation::Containment);
        assert_eq!(
            all.iter()
                .filter(|r| r.family() == RelationFamily::Orientation)
                .count(),
            16
        );
    }

    #[test]
    fn relation_names() {
        let names: Vec<String> = Relation::all().iter().map(|r| r.to_string()).collect();
        assert!(names.contains(&"somewhat near to".to_string()));
        assert!(names.contains(&"behind".to_string()));
        assert!(names.contains(&"very far to the left of".to_string()));
        assert!(names.contains(&"far in front of".to_string()));
    }

    #[test]
    fn serde_uses_family_tags() {
        let json = serde_json::to_string(&Relation::Containment).expect("json");
        assert_eq!(json, r#"{"family":"containment"}"#);
        let back: Relation = serde_json::from_str(
            r#"{"family":"orientation","direction":"left","degree":"very"}"#,
        )
        .expect("parse");
        assert_eq!(
            back,
            Relation::Orientation {
                direction: Orientation::Left,
                degree: Some(Degree::Very)
            }
        );
    }
}
