use super::*;
use crate::types::vec2;

fn table() -> Shape {
    Shape::rectangle(BoundingBox::new(vec2(0.0, 0.0), vec2(1.0, 2.0))).expect("table")
}

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

fn sample_shapes() -> Vec<Shape> {
    vec![
        Shape::Point(vec2(3.0, 1.0)),
        Shape::line(vec2(-2.0, -1.0), vec2(-2.0, 4.0)).expect("line"),
        Shape::circle(vec2(4.0, 4.0), 0.5).expect("circle"),
        table(),
        Shape::surface(BoundingBox::new(vec2(2.0, -3.0), vec2(3.0, -2.0))).expect("surface"),
        Shape::polygon(vec![vec2(-3.0, 3.0), vec2(-1.0, 3.0), vec2(-2.0, 5.0)]).expect("polygon"),
    ]
}

#[test]
fn points_inside_rectangle_have_zero_distance() {
    let t = table();
    for p in [vec2(0.5, 1.0), vec2(0.0, 0.0), vec2(1.0, 2.0), vec2(0.2, 1.9)] {
        assert!(t.contains_point(&p), "{p:?} should be inside");
        assert_eq!(t.distance_to_point(&p), 0.0);
    }
    assert!(approx_eq(t.distance_to_point(&vec2(4.0, 6.0)), 5.0));
}

#[test]
fn distance_is_symmetric_across_variants() {
    let shapes = sample_shapes();
    for a in &shapes {
        for b in &shapes {
            let ab = a.distance_to(b);
            let ba = b.distance_to(a);
            assert!(
                approx_eq(ab, ba),
                "{} -> {} = {ab}, reverse = {ba}",
                a.kind(),
                b.kind()
            );
            assert!(ab >= 0.0);
        }
    }
}

#[test]
fn containment_respects_rank() {
    let t = table();
    let inner = Shape::line(vec2(0.1, 0.1), vec2(0.9, 1.9)).expect("line");
    assert!(t.contains(&inner));
    assert!(!inner.contains(&t));
    let p = Shape::Point(vec2(0.5, 0.5));
    assert!(t.contains(&p));
    assert!(!p.contains(&inner));
    assert!(p.contains(&Shape::Point(vec2(0.5, 0.5))));

    let big = Shape::circle(vec2(0.0, 0.0), 2.0).expect("circle");
    let small = Shape::circle(vec2(0.5, 0.0), 1.0).expect("circle");
    assert!(big.contains(&small));
    assert!(!small.contains(&big));
}

#[test]
fn rectangle_materialises_all_parts() {
    let subs = table().sub_landmarks();
    let names: Vec<&str> = subs.iter().map(|s| s.name).collect();
    assert_eq!(names.len(), 14);
    for name in ["ll_corner", "ur_corner", "middle", "l_edge", "f_edge", "f_surf", "m_surf"] {
        assert!(names.contains(&name), "missing {name}");
    }
    let f_edge = subs.iter().find(|s| s.name == "f_edge").expect("f_edge");
    match &f_edge.shape {
        Shape::Line(l) => {
            assert_eq!(l.segment.p0, vec2(0.0, 2.0));
            assert_eq!(l.segment.p1, vec2(1.0, 2.0));
            // Width over height of a 1x2 table: a short edge.
            assert!(!l.has_middle());
        }
        other => panic!("f_edge should be a line, got {}", other.kind()),
    }
    let l_edge = subs.iter().find(|s| s.name == "l_edge").expect("l_edge");
    assert_eq!(l_edge.shape.sub_landmarks().len(), 3);

    let f_surf = subs.iter().find(|s| s.name == "f_surf").expect("f_surf");
    assert!(f_surf.shape.is_surface());
    assert_eq!(f_surf.shape.bounding_box().min, vec2(0.0, 1.0));
    let f_surf_parts: Vec<&str> = f_surf.shape.sub_landmarks().iter().map(|s| s.name).collect();
    assert_eq!(f_surf_parts, vec!["ul_corner", "ur_corner", "f_edge"]);

    let m_surf = subs.iter().find(|s| s.name == "m_surf").expect("m_surf");
    assert_eq!(m_surf.shape.bounding_box().min, vec2(0.25, 0.5));
    assert_eq!(m_surf.shape.bounding_box().max, vec2(0.75, 1.5));
    assert!(m_surf.shape.sub_landmarks().is_empty());
}

#[test]
fn rectangle_alternates_are_medial_lines() {
    let alts = table().alternates();
    assert_eq!(alts.len(), 2);
    assert_eq!(alts[0].name, "h_axis");
    assert_eq!(alts[1].name, "v_axis");
    match &alts[1].shape {
        Shape::Line(l) => {
            assert_eq!(l.segment.p0, vec2(0.5, 0.0));
            assert_eq!(l.segment.p1, vec2(0.5, 2.0));
            assert!(l.has_middle());
        }
        other => panic!("v_axis should be a line, got {}", other.kind()),
    }
    let surface = Shape::surface(BoundingBox::new(vec2(0.0, 0.0), vec2(1.0, 1.0))).expect("surface");
    assert!(surface.alternates().is_empty());
    let cup = Shape::object_box(BoundingBox::new(vec2(0.0, 0.0), vec2(0.07, 0.07))).expect("cup");
    assert!(cup.alternates().is_empty());
    assert!(cup.sub_landmarks().is_empty());
}

#[test]
fn degenerate_inputs_fail_fast() {
    assert!(Shape::rectangle(BoundingBox::new(vec2(0.0, 0.0), vec2(0.0, 1.0))).is_err());
    assert!(matches!(
        Shape::polygon(vec![vec2(0.0, 0.0), vec2(1.0, 1.0)]),
        Err(GroundingError::DegeneratePolygon { points: 2 })
    ));
    assert!(Shape::point(vec2(f64::NAN, 0.0)).is_err());
}

#[test]
fn projection_contract() {
    let t = table();
    assert_eq!(t.project_point(&vec2(0.3, 0.3)), vec2(0.3, 0.3));
    assert_eq!(t.project_point(&vec2(2.0, 1.0)), vec2(1.0, 1.0));
    let l = Shape::line(vec2(0.0, 0.0), vec2(2.0, 0.0)).expect("line");
    assert_eq!(l.project_point(&vec2(1.0, 5.0)), vec2(1.0, 0.0));
    let c = Shape::circle(vec2(0.0, 0.0), 1.0).expect("circle");
    assert!((c.project_point(&vec2(0.0, 3.0)) - vec2(0.0, 1.0)).norm() < 1e-12);
}

#[test]
fn primary_axes_per_variant() {
    assert_eq!(table().primary_axes().len(), 2);
    let axes = table().primary_axes();
    assert!(axes[1].contains_point(&vec2(0.5, -3.0), 1e-9));
    assert!(axes[0].contains_point(&vec2(-7.0, 1.0), 1e-9));
    let poly = Shape::polygon(vec![vec2(0.0, 0.0), vec2(1.0, 0.0), vec2(0.0, 1.0)]).expect("tri");
    assert!(poly.primary_axes().is_empty());
    let line = Shape::line(vec2(0.0, 0.0), vec2(2.0, 0.0)).expect("line");
    let axes = line.primary_axes();
    assert!(axes[0].contains_point(&vec2(5.0, 0.0), 1e-9));
    assert!(axes[1].contains_point(&vec2(1.0, 7.0), 1e-9));
}

#[test]
fn overlap_fraction_per_rank() {
    let t = table();
    assert_eq!(Shape::Point(vec2(0.5, 0.5)).overlap_fraction_in(&t), 1.0);
    assert_eq!(Shape::Point(vec2(5.0, 0.5)).overlap_fraction_in(&t), 0.0);
    let half_line = Shape::line(vec2(0.5, 1.0), vec2(1.5, 1.0)).expect("line");
    assert!(approx_eq(half_line.overlap_fraction_in(&t), 0.5));
    let quarter = Shape::rectangle(BoundingBox::new(vec2(0.5, 1.5), vec2(1.5, 2.5))).expect("rect");
    assert!(approx_eq(quarter.overlap_fraction_in(&t), 0.25));
    let inside = Shape::object_box(BoundingBox::new(vec2(0.1, 0.1), vec2(0.2, 0.2))).expect("box");
    assert!(approx_eq(inside.overlap_fraction_in(&t), 1.0));
    // Areas never fit inside points or lines.
    assert_eq!(inside.overlap_fraction_in(&half_line), 0.0);
}

#[test]
fn group_shapes_fit_their_members() {
    let members = [
        (LandmarkId(3), vec2(2.0, 2.0)),
        (LandmarkId(1), vec2(0.0, 0.0)),
        (LandmarkId(2), vec2(1.0, 1.0)),
    ];
    let group = GroupLineShape::fit(&members).expect("group line");
    assert_eq!(group.members, vec![LandmarkId(1), LandmarkId(2), LandmarkId(3)]);
    let shape = Shape::GroupLine(group);
    assert!(approx_eq(shape.middle().x, 1.0));
    assert_eq!(shape.sub_landmarks().len(), 3);

    let boxes = [
        (LandmarkId(0), BoundingBox::new(vec2(0.0, 0.0), vec2(1.0, 1.0))),
        (LandmarkId(1), BoundingBox::new(vec2(2.0, 3.0), vec2(2.5, 3.5))),
    ];
    let rect = GroupRectangleShape::enclose(&boxes).expect("group rect");
    assert_eq!(rect.rect.bbox.max, vec2(2.5, 3.5));
    let shape = Shape::GroupRectangle(rect);
    let names: Vec<&str> = shape.sub_landmarks().iter().map(|s| s.name).collect();
    assert_eq!(names, vec!["middle"]);
    assert!(shape.alternates().is_empty());

    assert!(matches!(
        GroupLineShape::fit(&members[..1]),
        Err(GroundingError::EmptyGroup { needed: 2, found: 1 })
    ));
}
