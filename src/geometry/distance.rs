//! Distance and intersection routines between the kernel primitives.

use super::{BoundingBox, Polygon, Segment};
use crate::types::{cross, Vec2};

#[inline]
fn orientation(a: &Vec2, b: &Vec2, c: &Vec2) -> f64 {
    cross(&(b - a), &(c - a))
}

/// True iff the two segments properly cross.
///
/// Uses the strict orientation-sign test: collinear overlaps and touching
/// endpoints report `false`.
pub fn segments_intersect(a: &Segment, b: &Segment) -> bool {
    let d1 = orientation(&b.p0, &b.p1, &a.p0);
    let d2 = orientation(&b.p0, &b.p1, &a.p1);
    let d3 = orientation(&a.p0, &a.p1, &b.p0);
    let d4 = orientation(&a.p0, &a.p1, &b.p1);
    ((d1 > 0.0 && d2 < 0.0) || (d1 < 0.0 && d2 > 0.0))
        && ((d3 > 0.0 && d4 < 0.0) || (d3 < 0.0 && d4 > 0.0))
}

/// Zero when the segments cross, else the smallest endpoint-to-segment
/// distance.
pub fn segment_to_segment_distance(a: &Segment, b: &Segment) -> f64 {
    if segments_intersect(a, b) {
        return 0.0;
    }
    a.distance_to_point(&b.p0)
        .min(a.distance_to_point(&b.p1))
        .min(b.distance_to_point(&a.p0))
        .min(b.distance_to_point(&a.p1))
}

/// Euclidean gap between two axis-aligned boxes; zero when they overlap.
pub fn box_to_box_distance(a: &BoundingBox, b: &BoundingBox) -> f64 {
    let gap = |lo_a: f64, hi_a: f64, lo_b: f64, hi_b: f64| {
        if hi_a < lo_b {
            lo_b - hi_a
        } else if hi_b < lo_a {
            lo_a - hi_b
        } else {
            0.0
        }
    };
    let dx = gap(a.min.x, a.max.x, b.min.x, b.max.x);
    let dy = gap(a.min.y, a.max.y, b.min.y, b.max.y);
    (dx * dx + dy * dy).sqrt()
}

pub fn polygon_to_point_distance(poly: &Polygon, p: &Vec2) -> f64 {
    if poly.contains_point(p) {
        return 0.0;
    }
    poly.edges()
        .map(|e| e.distance_to_point(p))
        .fold(f64::INFINITY, f64::min)
}

pub fn polygon_to_segment_distance(poly: &Polygon, seg: &Segment) -> f64 {
    if poly.contains_point(&seg.p0) || poly.contains_point(&seg.p1) {
        return 0.0;
    }
    poly.edges()
        .map(|e| segment_to_segment_distance(&e, seg))
        .fold(f64::INFINITY, f64::min)
}

pub fn polygon_to_polygon_distance(a: &Polygon, b: &Polygon) -> f64 {
    if a.points().iter().any(|p| b.contains_point(p))
        || b.points().iter().any(|p| a.contains_point(p))
    {
        return 0.0;
    }
    let mut best = f64::INFINITY;
    for ea in a.edges() {
        for eb in b.edges() {
            best = best.min(segment_to_segment_distance(&ea, &eb));
            if best == 0.0 {
                return 0.0;
            }
        }
    }
    best
}

/// Distance between an axis-aligned box and a segment; zero when an endpoint
/// lies in the box. Collapsed boxes are handled through their edges.
pub fn box_to_segment_distance(bbox: &BoundingBox, seg: &Segment) -> f64 {
    if bbox.contains_point(&seg.p0) || bbox.contains_point(&seg.p1) {
        return 0.0;
    }
    bbox.edges()
        .iter()
        .map(|e| segment_to_segment_distance(e, seg))
        .fold(f64::INFINITY, f64::min)
}

pub fn box_to_polygon_distance(bbox: &BoundingBox, poly: &Polygon) -> f64 {
    if poly.points().iter().any(|p| bbox.contains_point(p))
        || bbox.corners().iter().any(|p| poly.contains_point(p))
    {
        return 0.0;
    }
    let mut best = f64::INFINITY;
    for ea in bbox.edges() {
        for eb in poly.edges() {
            best = best.min(segment_to_segment_distance(&ea, &eb));
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::vec2;

    fn seg(ax: f64, ay: f64, bx: f64, by: f64) -> Segment {
        Segment::new(vec2(ax, ay), vec2(bx, by))
    }

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn crossing_segments_intersect() {
        let a = seg(0.0, 0.0, 2.0, 2.0);
        let b = seg(0.0, 2.0, 2.0, 0.0);
        assert!(segments_intersect(&a, &b));
        assert_eq!(segment_to_segment_distance(&a, &b), 0.0);
    }

    #[test]
    fn collinear_overlap_is_not_an_intersection() {
        let a = seg(0.0, 0.0, 2.0, 0.0);
        let b = seg(1.0, 0.0, 3.0, 0.0);
        assert!(!segments_intersect(&a, &b));
        // Still at zero distance through the endpoint checks.
        assert_eq!(segment_to_segment_distance(&a, &b), 0.0);
    }

    #[test]
    fn segment_distance_is_symmetric() {
        let a = seg(0.0, 0.0, 1.0, 0.0);
        let b = seg(2.0, 1.0, 3.0, 4.0);
        let d = segment_to_segment_distance(&a, &b);
        assert!(approx_eq(d, 2f64.sqrt()));
        assert!(approx_eq(d, segment_to_segment_distance(&b, &a)));
    }

    #[test]
    fn box_gaps() {
        let a = BoundingBox::new(vec2(0.0, 0.0), vec2(1.0, 1.0));
        let b = BoundingBox::new(vec2(4.0, 5.0), vec2(6.0, 6.0));
        assert!(approx_eq(box_to_box_distance(&a, &b), 5.0));
        assert!(approx_eq(box_to_box_distance(&b, &a), 5.0));
        let c = BoundingBox::new(vec2(0.5, 3.0), vec2(2.0, 4.0));
        assert!(approx_eq(box_to_box_distance(&a, &c), 2.0));
        let d = BoundingBox::new(vec2(0.5, 0.5), vec2(2.0, 2.0));
        assert_eq!(box_to_box_distance(&a, &d), 0.0);
    }

    #[test]
    fn polygon_distances() {
        let sq = Polygon::new(vec![
            vec2(0.0, 0.0),
            vec2(1.0, 0.0),
            vec2(1.0, 1.0),
            vec2(0.0, 1.0),
        ])
        .expect("square");
        assert_eq!(polygon_to_point_distance(&sq, &vec2(0.5, 0.5)), 0.0);
        assert!(approx_eq(polygon_to_point_distance(&sq, &vec2(3.0, 0.5)), 2.0));
        assert!(approx_eq(
            polygon_to_segment_distance(&sq, &seg(2.0, -1.0, 2.0, 3.0)),
            1.0
        ));
        let tri = Polygon::new(vec![vec2(3.0, 0.0), vec2(4.0, 0.0), vec2(3.0, 1.0)])
            .expect("triangle");
        assert!(approx_eq(polygon_to_polygon_distance(&sq, &tri), 2.0));
        assert!(approx_eq(polygon_to_polygon_distance(&tri, &sq), 2.0));
        let inner = Polygon::new(vec![vec2(0.2, 0.2), vec2(0.4, 0.2), vec2(0.3, 0.4)])
            .expect("inner");
        assert_eq!(polygon_to_polygon_distance(&sq, &inner), 0.0);
    }
}
