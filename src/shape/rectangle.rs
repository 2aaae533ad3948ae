use super::{LineShape, Shape, SubLandmarkSpec};
use crate::geometry::{BoundingBox, Segment, EPS};
use crate::landmark::LandmarkRole;
use crate::types::Vec2;
use serde::{Deserialize, Serialize};

/// Named parts a rectangle can materialise as sub-landmarks.
///
/// Naming follows a top-down view with the viewer at the bottom: `l`/`r`
/// are left/right, `n`/`f` near/far, `ll` lower-left and so on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RectPart {
    LlCorner,
    UrCorner,
    LrCorner,
    UlCorner,
    Middle,
    LEdge,
    REdge,
    NEdge,
    FEdge,
    LSurf,
    RSurf,
    NSurf,
    FSurf,
    MSurf,
}

impl RectPart {
    pub const ALL: [RectPart; 14] = [
        RectPart::LlCorner,
        RectPart::UrCorner,
        RectPart::LrCorner,
        RectPart::UlCorner,
        RectPart::Middle,
        RectPart::LEdge,
        RectPart::REdge,
        RectPart::NEdge,
        RectPart::FEdge,
        RectPart::LSurf,
        RectPart::RSurf,
        RectPart::NSurf,
        RectPart::FSurf,
        RectPart::MSurf,
    ];

    pub fn name(self) -> &'static str {
        match self {
            RectPart::LlCorner => "ll_corner",
            RectPart::UrCorner => "ur_corner",
            RectPart::LrCorner => "lr_corner",
            RectPart::UlCorner => "ul_corner",
            RectPart::Middle => "middle",
            RectPart::LEdge => "l_edge",
            RectPart::REdge => "r_edge",
            RectPart::NEdge => "n_edge",
            RectPart::FEdge => "f_edge",
            RectPart::LSurf => "l_surf",
            RectPart::RSurf => "r_surf",
            RectPart::NSurf => "n_surf",
            RectPart::FSurf => "f_surf",
            RectPart::MSurf => "m_surf",
        }
    }
}

/// Axis-aligned rectangle together with the parts it exposes.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RectangleShape {
    pub bbox: BoundingBox,
    pub parts: Vec<RectPart>,
    /// Whether the horizontal and vertical medial lines are offered as
    /// alternate representations.
    pub medial_axes: bool,
}

fn ratio(num: f64, den: f64) -> f64 {
    if den.abs() <= EPS {
        f64::INFINITY
    } else {
        num / den
    }
}

impl RectangleShape {
    /// Rectangle with every part and both medial axes.
    pub fn new(bbox: BoundingBox) -> Self {
        Self {
            bbox,
            parts: RectPart::ALL.to_vec(),
            medial_axes: true,
        }
    }

    pub fn with_parts(mut self, parts: &[RectPart]) -> Self {
        self.parts = parts.to_vec();
        self
    }

    pub fn without_medial_axes(mut self) -> Self {
        self.medial_axes = false;
        self
    }

    /// Height over width; how elongated the vertical edges are.
    pub fn vertical_ratio(&self) -> f64 {
        ratio(self.bbox.height(), self.bbox.width())
    }

    pub fn horizontal_ratio(&self) -> f64 {
        ratio(self.bbox.width(), self.bbox.height())
    }

    fn corner(&self, part: RectPart) -> Vec2 {
        let b = &self.bbox;
        match part {
            RectPart::UrCorner => b.max,
            RectPart::LrCorner => Vec2::new(b.max.x, b.min.y),
            RectPart::UlCorner => Vec2::new(b.min.x, b.max.y),
            _ => b.min,
        }
    }

    fn half(&self, part: RectPart) -> RectangleShape {
        let b = &self.bbox;
        let mid = b.center();
        let (bbox, parts) = match part {
            RectPart::LSurf => (
                BoundingBox::new(b.min, Vec2::new(mid.x, b.max.y)),
                [RectPart::LlCorner, RectPart::UlCorner, RectPart::LEdge],
            ),
            RectPart::RSurf => (
                BoundingBox::new(Vec2::new(mid.x, b.min.y), b.max),
                [RectPart::LrCorner, RectPart::UrCorner, RectPart::REdge],
            ),
            RectPart::NSurf => (
                BoundingBox::new(b.min, Vec2::new(b.max.x, mid.y)),
                [RectPart::LlCorner, RectPart::LrCorner, RectPart::NEdge],
            ),
            _ => (
                BoundingBox::new(Vec2::new(b.min.x, mid.y), b.max),
                [RectPart::UlCorner, RectPart::UrCorner, RectPart::FEdge],
            ),
        };
        RectangleShape::new(bbox).with_parts(&parts).without_medial_axes()
    }

    fn part_spec(&self, part: RectPart) -> SubLandmarkSpec {
        let name = part.name();
        let edge = |a: RectPart, b: RectPart, aspect: f64| {
            Shape::Line(LineShape::new(
                Segment::new(self.corner(a), self.corner(b)),
                Some(aspect),
            ))
        };
        match part {
            RectPart::LlCorner | RectPart::UrCorner | RectPart::LrCorner | RectPart::UlCorner => {
                SubLandmarkSpec::new(name, LandmarkRole::Corner, Shape::Point(self.corner(part)))
            }
            RectPart::Middle => {
                SubLandmarkSpec::new(name, LandmarkRole::Middle, Shape::Point(self.bbox.center()))
            }
            RectPart::LEdge => SubLandmarkSpec::new(
                name,
                LandmarkRole::Edge,
                edge(RectPart::LlCorner, RectPart::UlCorner, self.vertical_ratio()),
            ),
            RectPart::REdge => SubLandmarkSpec::new(
                name,
                LandmarkRole::Edge,
                edge(RectPart::LrCorner, RectPart::UrCorner, self.vertical_ratio()),
            ),
            RectPart::NEdge => SubLandmarkSpec::new(
                name,
                LandmarkRole::Edge,
                edge(RectPart::LlCorner, RectPart::LrCorner, self.horizontal_ratio()),
            ),
            RectPart::FEdge => SubLandmarkSpec::new(
                name,
                LandmarkRole::Edge,
                edge(RectPart::UlCorner, RectPart::UrCorner, self.horizontal_ratio()),
            ),
            RectPart::LSurf | RectPart::RSurf | RectPart::NSurf | RectPart::FSurf => {
                SubLandmarkSpec::new(name, LandmarkRole::Half, Shape::Surface(self.half(part)))
            }
            RectPart::MSurf => {
                let inset = Vec2::new(self.bbox.width(), self.bbox.height()) * 0.25;
                let bbox = BoundingBox::new(self.bbox.min + inset, self.bbox.max - inset);
                SubLandmarkSpec::new(
                    name,
                    LandmarkRole::Middle,
                    Shape::Surface(
                        RectangleShape::new(bbox)
                            .with_parts(&[])
                            .without_medial_axes(),
                    ),
                )
            }
        }
    }

    pub(crate) fn sub_landmarks(&self) -> Vec<SubLandmarkSpec> {
        self.parts.iter().map(|&p| self.part_spec(p)).collect()
    }

    /// Horizontal and vertical medial lines.
    pub fn medial_lines(&self) -> [LineShape; 2] {
        let b = &self.bbox;
        let c = b.center();
        [
            LineShape::new(
                Segment::new(Vec2::new(b.min.x, c.y), Vec2::new(b.max.x, c.y)),
                Some(self.horizontal_ratio()),
            ),
            LineShape::new(
                Segment::new(Vec2::new(c.x, b.min.y), Vec2::new(c.x, b.max.y)),
                Some(self.vertical_ratio()),
            ),
        ]
    }
}
