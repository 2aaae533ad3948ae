//! Representation hierarchy: the closed set of shapes landmarks are built on.
//!
//! Every variant exposes the same capability set (distance, containment,
//! projection, primary axes, sub-landmarks, alternates). Binary operations
//! dispatch on both operands through [`Geometry`], the primitive a shape
//! reduces to, so adding a variant means touching each `match` below.

mod group;
mod line;
mod rectangle;

#[cfg(test)]
mod tests;

pub use group::{GroupLineShape, GroupRectangleShape, MIN_GROUP_SIZE};
pub use line::{LineShape, MIDDLE_ASPECT_LIMIT};
pub use rectangle::{RectPart, RectangleShape};

use crate::error::GroundingError;
use crate::geometry::{
    box_to_box_distance, box_to_polygon_distance, box_to_segment_distance, clip_convex,
    is_finite_point, polygon_area, polygon_to_point_distance, polygon_to_polygon_distance,
    polygon_to_segment_distance, segment_fraction_in_circle, segment_fraction_in_polygon,
    segment_to_segment_distance, BoundingBox, Circle, Line, Polygon, Segment, EPS,
};
use crate::landmark::LandmarkRole;
use crate::types::{LandmarkId, Vec2};
use serde::Serialize;

/// Geometric representation of a landmark.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum Shape {
    Point(Vec2),
    Line(LineShape),
    Circle(Circle),
    Rectangle(RectangleShape),
    /// Rectangle used as a bare surface: never described as near or far and
    /// never chosen as a landmark directly.
    Surface(RectangleShape),
    Polygon(Polygon),
    GroupLine(GroupLineShape),
    GroupRectangle(GroupRectangleShape),
}

/// Primitive a shape reduces to for distance and containment.
#[derive(Clone, Copy, Debug)]
pub enum Geometry<'a> {
    Point(Vec2),
    Segment(Segment),
    Box(&'a BoundingBox),
    Polygon(&'a Polygon),
    Circle(&'a Circle),
}

/// A sub-landmark a shape owns, materialised by the scene.
#[derive(Clone, Debug, PartialEq)]
pub struct SubLandmarkSpec {
    pub name: &'static str,
    pub role: LandmarkRole,
    pub shape: Shape,
}

impl SubLandmarkSpec {
    pub(crate) fn new(name: &'static str, role: LandmarkRole, shape: Shape) -> Self {
        Self { name, role, shape }
    }
}

/// Lower-dimensional view of the same object.
#[derive(Clone, Debug, PartialEq)]
pub struct AlternateSpec {
    pub name: &'static str,
    pub shape: Shape,
}

fn check_box(bbox: &BoundingBox) -> Result<(), GroundingError> {
    if !is_finite_point(&bbox.min) || !is_finite_point(&bbox.max) {
        return Err(GroundingError::InvalidGeometry(
            "rectangle has non-finite corners".into(),
        ));
    }
    if bbox.width() <= EPS || bbox.height() <= EPS {
        return Err(GroundingError::InvalidGeometry(format!(
            "rectangle must have positive extent, got {}x{}",
            bbox.width(),
            bbox.height()
        )));
    }
    Ok(())
}

impl Shape {
    pub fn point(p: Vec2) -> Result<Self, GroundingError> {
        if !is_finite_point(&p) {
            return Err(GroundingError::InvalidGeometry(
                "point has non-finite coordinates".into(),
            ));
        }
        Ok(Shape::Point(p))
    }

    pub fn line(p0: Vec2, p1: Vec2) -> Result<Self, GroundingError> {
        if !is_finite_point(&p0) || !is_finite_point(&p1) {
            return Err(GroundingError::InvalidGeometry(
                "line has non-finite endpoints".into(),
            ));
        }
        Ok(Shape::Line(LineShape::new(Segment::new(p0, p1), None)))
    }

    /// Rectangle with all parts and medial axes materialised.
    pub fn rectangle(bbox: BoundingBox) -> Result<Self, GroundingError> {
        Self::custom_rectangle(RectangleShape::new(bbox))
    }

    /// Rectangle with a caller-chosen part set.
    pub fn custom_rectangle(rect: RectangleShape) -> Result<Self, GroundingError> {
        check_box(&rect.bbox)?;
        Ok(Shape::Rectangle(rect))
    }

    /// Small object footprint: a rectangle with no parts and no alternates.
    pub fn object_box(bbox: BoundingBox) -> Result<Self, GroundingError> {
        Self::custom_rectangle(
            RectangleShape::new(bbox)
                .with_parts(&[])
                .without_medial_axes(),
        )
    }

    /// Bare surface with no parts.
    pub fn surface(bbox: BoundingBox) -> Result<Self, GroundingError> {
        check_box(&bbox)?;
        Ok(Shape::Surface(
            RectangleShape::new(bbox)
                .with_parts(&[])
                .without_medial_axes(),
        ))
    }

    pub fn circle(center: Vec2, radius: f64) -> Result<Self, GroundingError> {
        Ok(Shape::Circle(Circle::new(center, radius)?))
    }

    pub fn polygon(points: Vec<Vec2>) -> Result<Self, GroundingError> {
        Ok(Shape::Polygon(Polygon::new(points)?))
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Shape::Point(_) => "point",
            Shape::Line(_) => "line",
            Shape::Circle(_) => "circle",
            Shape::Rectangle(_) => "rectangle",
            Shape::Surface(_) => "surface",
            Shape::Polygon(_) => "polygon",
            Shape::GroupLine(_) => "group_line",
            Shape::GroupRectangle(_) => "group_rectangle",
        }
    }

    /// Dimensionality: 0 for points, 1 for lines, 2 for areas.
    pub fn rank(&self) -> u8 {
        match self {
            Shape::Point(_) => 0,
            Shape::Line(_) | Shape::GroupLine(_) => 1,
            Shape::Circle(_)
            | Shape::Rectangle(_)
            | Shape::Surface(_)
            | Shape::Polygon(_)
            | Shape::GroupRectangle(_) => 2,
        }
    }

    pub fn is_surface(&self) -> bool {
        matches!(self, Shape::Surface(_))
    }

    /// Rectangle-backed shapes, which earn the "on the table" bonus when
    /// they contain the trajector.
    pub fn is_rectangular(&self) -> bool {
        matches!(
            self,
            Shape::Rectangle(_) | Shape::Surface(_) | Shape::GroupRectangle(_)
        )
    }

    /// Members of a group shape, empty for everything else.
    pub fn group_members(&self) -> &[LandmarkId] {
        match self {
            Shape::GroupLine(g) => &g.members,
            Shape::GroupRectangle(g) => &g.members,
            _ => &[],
        }
    }

    pub fn geometry(&self) -> Geometry<'_> {
        match self {
            Shape::Point(p) => Geometry::Point(*p),
            Shape::Line(l) => Geometry::Segment(l.segment),
            Shape::GroupLine(g) => Geometry::Segment(g.line.segment),
            Shape::Circle(c) => Geometry::Circle(c),
            Shape::Rectangle(r) | Shape::Surface(r) => Geometry::Box(&r.bbox),
            Shape::GroupRectangle(g) => Geometry::Box(&g.rect.bbox),
            Shape::Polygon(p) => Geometry::Polygon(p),
        }
    }

    /// Reference point used for orientation and group fitting.
    pub fn middle(&self) -> Vec2 {
        match self.geometry() {
            Geometry::Point(p) => p,
            Geometry::Segment(s) => s.midpoint(),
            Geometry::Box(b) => b.center(),
            Geometry::Polygon(p) => p.centroid(),
            Geometry::Circle(c) => c.center,
        }
    }

    pub fn bounding_box(&self) -> BoundingBox {
        match self.geometry() {
            Geometry::Point(p) => BoundingBox::new(p, p),
            Geometry::Segment(s) => s.bounding_box(),
            Geometry::Box(b) => *b,
            Geometry::Polygon(p) => p.bounding_box(),
            Geometry::Circle(c) => c.bounding_box(),
        }
    }

    /// Characteristic points: the point itself, segment endpoints, box and
    /// polygon vertices, or a circle's four axis-extreme points.
    pub fn points(&self) -> Vec<Vec2> {
        match self.geometry() {
            Geometry::Point(p) => vec![p],
            Geometry::Segment(s) => vec![s.p0, s.p1],
            Geometry::Box(b) => b.corners().to_vec(),
            Geometry::Polygon(p) => p.points().to_vec(),
            Geometry::Circle(c) => c.extreme_points().to_vec(),
        }
    }

    /// Canonical symmetry lines used to anchor orientation. Polygons have none.
    pub fn primary_axes(&self) -> Vec<Line> {
        match self.geometry() {
            Geometry::Point(p) => vec![Line::horizontal(p), Line::vertical(p)],
            Geometry::Circle(c) => vec![Line::horizontal(c.center), Line::vertical(c.center)],
            Geometry::Segment(s) => match s.line() {
                Some(line) => {
                    let perp = line.perpendicular_through(s.midpoint());
                    vec![line, perp]
                }
                None => vec![Line::horizontal(s.p0), Line::vertical(s.p0)],
            },
            Geometry::Box(b) => {
                let c = b.center();
                vec![Line::horizontal(c), Line::vertical(c)]
            }
            Geometry::Polygon(_) => Vec::new(),
        }
    }

    pub fn distance_to(&self, other: &Shape) -> f64 {
        geometry_distance(self.geometry(), other.geometry())
    }

    pub fn distance_to_point(&self, p: &Vec2) -> f64 {
        geometry_distance(self.geometry(), Geometry::Point(*p))
    }

    pub fn contains_point(&self, p: &Vec2) -> bool {
        match self.geometry() {
            Geometry::Point(q) => (q - p).norm() <= EPS,
            Geometry::Segment(s) => s.contains_point(p),
            Geometry::Box(b) => b.contains_point(p),
            Geometry::Polygon(poly) => poly.contains_point(p),
            Geometry::Circle(c) => c.contains_point(p),
        }
    }

    /// True when `other` lies entirely within this shape. A shape never
    /// contains one of strictly higher rank.
    pub fn contains(&self, other: &Shape) -> bool {
        if other.rank() > self.rank() {
            return false;
        }
        match (self.geometry(), other.geometry()) {
            (Geometry::Circle(a), Geometry::Circle(b)) => {
                (a.center - b.center).norm() + b.radius <= a.radius + EPS
            }
            _ => other.points().iter().all(|p| self.contains_point(p)),
        }
    }

    /// Maps `p` onto this shape: identity for points already inside an
    /// area, nearest point otherwise.
    pub fn project_point(&self, p: &Vec2) -> Vec2 {
        match self.geometry() {
            Geometry::Point(q) => q,
            Geometry::Segment(s) => s.project(p),
            Geometry::Box(b) => b.clamp_point(p),
            Geometry::Polygon(poly) => poly.project_point(p),
            Geometry::Circle(c) => c.project_point(p),
        }
    }

    /// Closed ring describing an area shape, `None` for points and lines.
    fn area_ring(&self) -> Option<Vec<Vec2>> {
        match self.geometry() {
            Geometry::Box(b) => b.to_polygon().map(|p| p.points().to_vec()),
            Geometry::Polygon(p) => Some(p.points().to_vec()),
            Geometry::Circle(c) => c.to_polygon().map(|p| p.points().to_vec()),
            Geometry::Point(_) | Geometry::Segment(_) => None,
        }
    }

    /// Fraction of this shape lying inside `container`, in [0, 1].
    ///
    /// Points score 0 or 1, lines by clipped length, areas by clipped area
    /// with the container used as a convex clip region.
    pub fn overlap_fraction_in(&self, container: &Shape) -> f64 {
        match self.geometry() {
            Geometry::Point(p) => indicator(container.contains_point(&p)),
            Geometry::Segment(seg) => match container.geometry() {
                Geometry::Box(b) => match b.to_polygon() {
                    Some(poly) => segment_fraction_in_polygon(&seg, &poly),
                    None => indicator(container.contains(self)),
                },
                Geometry::Polygon(poly) => segment_fraction_in_polygon(&seg, poly),
                Geometry::Circle(c) => segment_fraction_in_circle(&seg, c),
                Geometry::Point(_) | Geometry::Segment(_) => {
                    indicator(container.contains(self))
                }
            },
            Geometry::Box(_) | Geometry::Polygon(_) | Geometry::Circle(_) => {
                let Some(subject) = self.area_ring() else {
                    return indicator(container.contains_point(&self.middle()));
                };
                let area = polygon_area(&subject).abs();
                if area <= EPS {
                    return indicator(container.contains_point(&self.middle()));
                }
                match container.area_ring() {
                    Some(clip) => {
                        (polygon_area(&clip_convex(&subject, &clip)).abs() / area).clamp(0.0, 1.0)
                    }
                    None => 0.0,
                }
            }
        }
    }

    /// Sub-landmarks this shape owns, in a stable order.
    pub fn sub_landmarks(&self) -> Vec<SubLandmarkSpec> {
        match self {
            Shape::Point(_) => Vec::new(),
            Shape::Line(l) => l.sub_landmarks(),
            Shape::GroupLine(g) => g.line.sub_landmarks(),
            Shape::Circle(c) => vec![SubLandmarkSpec::new(
                "middle",
                LandmarkRole::Middle,
                Shape::Point(c.center),
            )],
            Shape::Rectangle(r) | Shape::Surface(r) => r.sub_landmarks(),
            Shape::GroupRectangle(g) => g.rect.sub_landmarks(),
            Shape::Polygon(p) => vec![SubLandmarkSpec::new(
                "middle",
                LandmarkRole::Middle,
                Shape::Point(p.centroid()),
            )],
        }
    }

    /// Lower-dimensional views: medial lines of a rectangle, the midpoint of
    /// a line, the centre of a circle.
    pub fn alternates(&self) -> Vec<AlternateSpec> {
        match self {
            Shape::Rectangle(r) if r.medial_axes => {
                let [h, v] = r.medial_lines();
                vec![
                    AlternateSpec {
                        name: "h_axis",
                        shape: Shape::Line(h),
                    },
                    AlternateSpec {
                        name: "v_axis",
                        shape: Shape::Line(v),
                    },
                ]
            }
            Shape::Line(l) => vec![AlternateSpec {
                name: "mid_point",
                shape: Shape::Point(l.segment.midpoint()),
            }],
            Shape::GroupLine(g) => vec![AlternateSpec {
                name: "mid_point",
                shape: Shape::Point(g.line.segment.midpoint()),
            }],
            Shape::Circle(c) => vec![AlternateSpec {
                name: "center",
                shape: Shape::Point(c.center),
            }],
            _ => Vec::new(),
        }
    }
}

#[inline]
fn indicator(flag: bool) -> f64 {
    if flag {
        1.0
    } else {
        0.0
    }
}

/// Symmetric distance between two primitives.
fn geometry_distance(a: Geometry<'_>, b: Geometry<'_>) -> f64 {
    use Geometry as G;
    match (a, b) {
        (G::Point(p), G::Point(q)) => (p - q).norm(),
        (G::Point(p), G::Segment(s)) => s.distance_to_point(&p),
        (G::Point(p), G::Box(bb)) => bb.distance_to_point(&p),
        (G::Point(p), G::Polygon(poly)) => polygon_to_point_distance(poly, &p),
        (G::Point(p), G::Circle(c)) => c.distance_to_point(&p),
        (G::Segment(s), G::Segment(t)) => segment_to_segment_distance(&s, &t),
        (G::Segment(s), G::Box(bb)) => box_to_segment_distance(bb, &s),
        (G::Segment(s), G::Polygon(poly)) => polygon_to_segment_distance(poly, &s),
        (G::Segment(s), G::Circle(c)) => (s.distance_to_point(&c.center) - c.radius).max(0.0),
        (G::Box(x), G::Box(y)) => box_to_box_distance(x, y),
        (G::Box(bb), G::Polygon(poly)) => box_to_polygon_distance(bb, poly),
        (G::Box(bb), G::Circle(c)) => (bb.distance_to_point(&c.center) - c.radius).max(0.0),
        (G::Polygon(x), G::Polygon(y)) => polygon_to_polygon_distance(x, y),
        (G::Polygon(poly), G::Circle(c)) => {
            (polygon_to_point_distance(poly, &c.center) - c.radius).max(0.0)
        }
        (G::Circle(x), G::Circle(y)) => {
            ((x.center - y.center).norm() - x.radius - y.radius).max(0.0)
        }
        // Remaining pairs are mirror images of the arms above.
        (x, y) => geometry_distance(y, x),
    }
}
