//! Geometry kernel: primitives and the distance / intersection / clipping
//! routines the representation hierarchy is built on.
//!
//! All routines are pure and total over well-formed inputs. Well-formedness
//! is enforced where the primitives are constructed (e.g. [`Polygon::new`]
//! rejects fewer than three vertices), so the distance functions themselves
//! never fail.
//!
//! Conventions
//! - Containment tests are boundary-inclusive with an absolute tolerance of
//!   [`EPS`].
//! - [`segments_intersect`] uses the strict orientation test and reports
//!   `false` for collinear overlaps and endpoint touches. The distance
//!   routines still return 0 in those cases because the endpoint-to-segment
//!   distances vanish.

mod bbox;
mod circle;
mod distance;
mod fit;
mod line;
mod overlap;
mod polygon;
mod segment;

pub use bbox::BoundingBox;
pub use circle::Circle;
pub use distance::{
    box_to_box_distance, box_to_polygon_distance, box_to_segment_distance,
    polygon_to_point_distance, polygon_to_polygon_distance,
    polygon_to_segment_distance, segment_to_segment_distance, segments_intersect,
};
pub use fit::{fit_line_through, LineFit};
pub use line::{Line, Ray};
pub use overlap::{
    clip_convex, polygon_area, segment_fraction_in_circle, segment_fraction_in_polygon,
};
pub use polygon::Polygon;
pub use segment::Segment;

/// Absolute tolerance used by containment and degeneracy checks.
pub const EPS: f64 = 1e-9;

#[inline]
pub(crate) fn is_finite_point(p: &crate::types::Vec2) -> bool {
    p.x.is_finite() && p.y.is_finite()
}
