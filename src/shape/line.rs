use super::{Shape, SubLandmarkSpec};
use crate::geometry::Segment;
use crate::landmark::LandmarkRole;
use serde::Serialize;

/// Aspect ratio from which a line is long enough to have a described middle.
pub const MIDDLE_ASPECT_LIMIT: f64 = 2.0;

/// Line segment shape. `aspect` is the length-to-thickness ratio of the
/// object the line was derived from (e.g. a table edge), `None` for lines
/// with no owning area.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LineShape {
    pub segment: Segment,
    pub aspect: Option<f64>,
}

impl LineShape {
    pub fn new(segment: Segment, aspect: Option<f64>) -> Self {
        Self { segment, aspect }
    }

    /// Long lines get `start`, `middle` and `end`; short, near-square ones
    /// only `start` and `end`.
    pub fn has_middle(&self) -> bool {
        self.aspect.map_or(true, |r| r >= MIDDLE_ASPECT_LIMIT)
    }

    pub(crate) fn sub_landmarks(&self) -> Vec<SubLandmarkSpec> {
        let seg = &self.segment;
        if self.has_middle() {
            vec![
                SubLandmarkSpec::new("start", LandmarkRole::End, Shape::Point(seg.p0)),
                SubLandmarkSpec::new("middle", LandmarkRole::Middle, Shape::Point(seg.midpoint())),
                SubLandmarkSpec::new("end", LandmarkRole::End, Shape::Point(seg.p1)),
            ]
        } else {
            vec![
                SubLandmarkSpec::new("start", LandmarkRole::Side, Shape::Point(seg.p0)),
                SubLandmarkSpec::new("end", LandmarkRole::Side, Shape::Point(seg.p1)),
            ]
        }
    }
}
