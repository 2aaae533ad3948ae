//! Overlap measures used by the containment relation.

use super::{Circle, Polygon, Segment, EPS};
use crate::types::{cross, Vec2};

/// Signed shoelace area, positive for counter-clockwise rings.
pub fn polygon_area(points: &[Vec2]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }
    let twice: f64 = (0..n)
        .map(|i| cross(&points[i], &points[(i + 1) % n]))
        .sum();
    0.5 * twice
}

/// Fraction of the segment's length that lies inside `poly`.
pub fn segment_fraction_in_polygon(seg: &Segment, poly: &Polygon) -> f64 {
    if seg.length() <= EPS {
        return if poly.contains_point(&seg.p0) { 1.0 } else { 0.0 };
    }
    let v = seg.vector();
    let mut breaks = vec![0.0, 1.0];
    for edge in poly.edges() {
        let w = edge.vector();
        let denom = cross(&v, &w);
        if denom.abs() <= EPS {
            continue;
        }
        let ap = edge.p0 - seg.p0;
        let t = cross(&ap, &w) / denom;
        let s = cross(&ap, &v) / denom;
        if (-EPS..=1.0 + EPS).contains(&s) && t > 0.0 && t < 1.0 {
            breaks.push(t);
        }
    }
    breaks.sort_by(|a, b| a.total_cmp(b));
    let inside: f64 = breaks
        .windows(2)
        .filter(|w| w[1] - w[0] > 0.0)
        .filter(|w| poly.contains_point(&seg.at(0.5 * (w[0] + w[1]))))
        .map(|w| w[1] - w[0])
        .sum();
    inside.clamp(0.0, 1.0)
}

/// Fraction of the segment's length that lies inside the closed disc.
pub fn segment_fraction_in_circle(seg: &Segment, circle: &Circle) -> f64 {
    let v = seg.vector();
    let a = v.norm_squared();
    if a <= EPS * EPS {
        return if circle.contains_point(&seg.p0) { 1.0 } else { 0.0 };
    }
    let f = seg.p0 - circle.center;
    let b = 2.0 * f.dot(&v);
    let c = f.norm_squared() - circle.radius * circle.radius;
    let disc = b * b - 4.0 * a * c;
    if disc <= 0.0 {
        return 0.0;
    }
    let root = disc.sqrt();
    let t0 = ((-b - root) / (2.0 * a)).max(0.0);
    let t1 = ((-b + root) / (2.0 * a)).min(1.0);
    (t1 - t0).clamp(0.0, 1.0)
}

/// Sutherland–Hodgman clip of `subject` against the convex region `clip`.
///
/// The clip ring may be given in either winding; the result is empty when
/// the two regions do not overlap.
pub fn clip_convex(subject: &[Vec2], clip: &[Vec2]) -> Vec<Vec2> {
    if clip.len() < 3 || subject.len() < 3 {
        return Vec::new();
    }
    let mut region: Vec<Vec2> = clip.to_vec();
    if polygon_area(&region) < 0.0 {
        region.reverse();
    }
    let inside = |a: &Vec2, b: &Vec2, p: &Vec2| cross(&(b - a), &(p - a)) >= -EPS;
    let intersect = |a: &Vec2, b: &Vec2, p: &Vec2, q: &Vec2| -> Vec2 {
        let r = q - p;
        let s = b - a;
        let denom = cross(&r, &s);
        if denom.abs() <= f64::EPSILON {
            return *q;
        }
        let t = cross(&(a - p), &s) / denom;
        p + r * t
    };

    let mut output = subject.to_vec();
    let n = region.len();
    for i in 0..n {
        if output.is_empty() {
            break;
        }
        let a = region[i];
        let b = region[(i + 1) % n];
        let input = std::mem::take(&mut output);
        let m = input.len();
        for j in 0..m {
            let p = input[(j + m - 1) % m];
            let q = input[j];
            match (inside(&a, &b, &p), inside(&a, &b, &q)) {
                (true, true) => output.push(q),
                (true, false) => output.push(intersect(&a, &b, &p, &q)),
                (false, true) => {
                    output.push(intersect(&a, &b, &p, &q));
                    output.push(q);
                }
                (false, false) => {}
            }
        }
    }
    output
}
