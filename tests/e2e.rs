mod common;

use common::approx_eq;
use common::scenes::{ambiguity_box, table_scene, table_with_cup};
use rand::rngs::StdRng;
use rand::SeedableRng;
use spatial_grounding::relation::Measurement;
use spatial_grounding::selection::{CancelToken, SelectionMode};
use spatial_grounding::types::vec2;
use spatial_grounding::{
    Degree, DistanceClass, GroundingError, Grounder, GroundingParams, Orientation, Relation,
    Scene, SceneCache, Trajector,
};

fn grounder() -> Grounder {
    Grounder::new(GroundingParams::default())
}

#[test]
fn point_near_far_edge_is_described_by_far_side_landmarks() {
    let (scene, _) = table_scene();
    let grounder = grounder();
    let mut cache = SceneCache::new();
    let mut rng = StdRng::seed_from_u64(11);
    let trajector = Trajector::point(vec2(0.5, 1.9));
    let near_edge = scene.resolve("table/n_edge").expect("n_edge");

    let runs = 1000;
    let mut far_side = 0usize;
    let mut near_edge_hits = 0usize;
    for _ in 0..runs {
        let candidates = grounder
            .collect_candidates(&scene, &trajector, &mut cache)
            .expect("candidates");
        let dist = grounder
            .landmark_distribution(&scene, &trajector, &candidates)
            .expect("distribution");
        let landmark = candidates[dist.sample(&mut rng)];
        let middle = scene.fetch_landmark(landmark).expect("landmark").shape.middle();
        if (middle.y - 2.0).abs() <= 0.15 {
            far_side += 1;
        }
        if landmark == near_edge {
            near_edge_hits += 1;
        }
    }

    let far_rate = far_side as f64 / runs as f64;
    let near_rate = near_edge_hits as f64 / runs as f64;
    assert!(far_rate > 0.6, "far-side landmarks chosen only {far_rate:.3}");
    assert!(near_rate < 0.05, "near edge chosen {near_rate:.3}");
}

#[test]
fn sampled_meanings_near_the_far_edge_use_near_or_containment() {
    let (scene, _) = table_scene();
    let grounder = grounder();
    let mut cache = SceneCache::new();
    let mut rng = StdRng::seed_from_u64(17);
    let trajector = Trajector::point(vec2(0.5, 1.9));

    let runs = 300;
    let mut far_side = 0usize;
    let mut near_or_on = 0usize;
    for _ in 0..runs {
        let (meaning, report) = grounder
            .sample_meaning_with_diagnostics(&scene, &trajector, vec2(0.5, -1.0), &mut cache, &mut rng)
            .expect("sample");
        let meaning = meaning.expect("table scene has candidates");
        let middle = scene.fetch_landmark(meaning.landmark).expect("landmark").shape.middle();
        if (middle.y - 2.0).abs() <= 0.15 {
            far_side += 1;
        }
        match report.chosen_relation.expect("chosen relation") {
            Relation::Distance(m) if m.class == DistanceClass::Near => near_or_on += 1,
            Relation::Containment => near_or_on += 1,
            _ => {}
        }
    }

    let far_rate = far_side as f64 / runs as f64;
    let near_rate = near_or_on as f64 / runs as f64;
    assert!(far_rate > 0.6, "far-side landmarks chosen only {far_rate:.3}");
    assert!(near_rate > 0.8, "near/containment relations chosen only {near_rate:.3}");
}

#[test]
fn near_relations_dominate_next_to_an_edge() {
    let (scene, _) = table_scene();
    let grounder = grounder();
    let f_edge = scene.resolve("table/f_edge").expect("f_edge");
    let dist = grounder
        .relation_distribution(&scene, f_edge, vec2(0.5, -1.0), &Trajector::point(vec2(0.5, 1.9)))
        .expect("relations");

    let total: f64 = dist.distribution.probabilities().iter().sum();
    assert!(approx_eq(total, 1.0, 1e-9));

    let mass = |class: DistanceClass| -> f64 {
        dist.entries()
            .filter(|(r, _)| matches!(r, Relation::Distance(m) if m.class == class))
            .map(|(_, p)| p)
            .sum()
    };
    assert!(
        mass(DistanceClass::Near) > mass(DistanceClass::Far),
        "near {:.3} vs far {:.3}",
        mass(DistanceClass::Near),
        mass(DistanceClass::Far)
    );
    assert_eq!(dist.probability_of(&Relation::Containment), Some(0.0));
}

#[test]
fn competing_orientations_rescale_the_shorter_direction() {
    let (scene, block) = ambiguity_box();
    let grounder = grounder();
    let perspective = vec2(0.5, -2.0);
    let trajector = Trajector::point(vec2(-1.0, 2.5));

    let dist = grounder
        .relation_distribution(&scene, block, perspective, &trajector)
        .expect("relations");
    assert_eq!(dist.perspective, perspective);

    let plain = |direction| Relation::Orientation {
        direction,
        degree: None,
    };
    assert!(dist.score_of(&plain(Orientation::Behind)).is_some());
    assert!(dist.score_of(&plain(Orientation::Left)).is_some());
    assert!(dist.score_of(&plain(Orientation::Front)).is_none());
    assert!(dist.score_of(&plain(Orientation::Right)).is_none());
    assert_eq!(dist.relations.len(), 7 + 8);

    let behind = grounder
        .relation_likelihood(&scene, block, &plain(Orientation::Behind), perspective, &trajector)
        .expect("behind likelihood");
    let left = grounder
        .relation_likelihood(&scene, block, &plain(Orientation::Left), perspective, &trajector)
        .expect("left likelihood");
    let left_score = dist.score_of(&plain(Orientation::Left)).expect("left");
    let behind_score = dist.score_of(&plain(Orientation::Behind)).expect("behind");
    assert!(approx_eq(behind_score, behind, 1e-12));
    assert!(
        approx_eq(left_score, 0.75 * left, 1e-6 * left.max(1e-12)),
        "left {left_score} vs {}",
        0.75 * left
    );

    let total: f64 = dist.distribution.probabilities().iter().sum();
    assert!(approx_eq(total, 1.0, 1e-9));
}

#[test]
fn sample_meaning_binds_landmark_relation_and_viewpoint() {
    let (scene, table) = table_scene();
    let grounder = grounder();
    let mut cache = SceneCache::new();
    let mut rng = StdRng::seed_from_u64(3);
    let trajector = Trajector::point(vec2(0.5, 1.9));

    let (meaning, report) = grounder
        .sample_meaning_with_diagnostics(&scene, &trajector, vec2(0.2, -1.0), &mut cache, &mut rng)
        .expect("sample");
    let meaning = meaning.expect("table scene has candidates");

    assert_eq!(scene.top_parent(meaning.landmark).expect("top"), table);
    assert_eq!(meaning.relation.landmark, meaning.landmark);
    assert_eq!(meaning.relation.trajector_middle, vec2(0.5, 1.9));
    // head-on: snapped onto the vertical medial axis
    assert!(approx_eq(meaning.perspective.x, 0.5, 1e-12));
    assert!(approx_eq(meaning.perspective.y, -1.0, 1e-12));
    assert!(meaning.landmark_probability > 0.0 && meaning.landmark_probability <= 1.0);
    assert!(meaning.relation_probability > 0.0 && meaning.relation_probability <= 1.0);
    assert!(meaning.landmark_entropy >= 0.0);

    assert_eq!(report.scene_landmarks, scene.len());
    assert_eq!(report.landmarks.len(), report.candidates);
    assert_eq!(
        report.chosen_landmark.as_deref(),
        Some(scene.qualified_name(meaning.landmark).expect("name").as_str())
    );
    assert_eq!(report.chosen_relation, Some(meaning.relation.relation));
    assert!(report.timings.stage("landmark_selection").is_some());
    assert!(report.timings.stage("relation_selection").is_some());
    let json = serde_json::to_string(&report).expect("report json");
    assert!(json.contains("\"chosenLandmark\""));
}

#[test]
fn best_mode_is_deterministic() {
    let (scene, _) = table_scene();
    let grounder = Grounder::new(GroundingParams {
        mode: SelectionMode::Best,
        ..GroundingParams::default()
    });
    let trajector = Trajector::point(vec2(0.5, 1.9));
    let mut cache = SceneCache::new();
    let mut first = None;
    for seed in 0..3 {
        let mut rng = StdRng::seed_from_u64(seed);
        let meaning = grounder
            .sample_meaning(&scene, &trajector, vec2(0.5, -1.0), &mut cache, &mut rng)
            .expect("sample")
            .expect("meaning");
        let key = (meaning.landmark, meaning.relation.relation);
        match first {
            None => first = Some(key),
            Some(prev) => assert_eq!(prev, key),
        }
    }
}

#[test]
fn empty_candidate_sets_yield_no_meaning() {
    let grounder = grounder();
    let mut rng = StdRng::seed_from_u64(0);

    let empty = Scene::new();
    let mut cache = SceneCache::new();
    let none = grounder
        .sample_meaning(&empty, &Trajector::point(vec2(0.0, 0.0)), vec2(0.0, -1.0), &mut cache, &mut rng)
        .expect("empty scene is not an error");
    assert!(none.is_none());

    let (scene, table) = table_scene();
    let mut cache = SceneCache::new();
    let itself = Trajector::from_landmark(&scene, table).expect("trajector");
    let none = grounder
        .sample_meaning(&scene, &itself, vec2(0.5, -1.0), &mut cache, &mut rng)
        .expect("only the trajector's own subtree");
    assert!(none.is_none());
}

#[test]
fn landmark_trajectors_exclude_their_own_subtree() {
    let (scene, table, cup) = table_with_cup();
    let grounder = grounder();
    let mut cache = SceneCache::new();
    let trajector = Trajector::from_landmark(&scene, cup).expect("cup trajector");
    let candidates = grounder
        .collect_candidates(&scene, &trajector, &mut cache)
        .expect("candidates");

    assert!(candidates.contains(&table));
    for id in &candidates {
        assert_ne!(scene.top_parent(*id).expect("top"), cup);
    }

    let mut rng = StdRng::seed_from_u64(5);
    let meaning = grounder
        .sample_meaning(&scene, &trajector, vec2(0.5, -1.0), &mut cache, &mut rng)
        .expect("sample")
        .expect("meaning");
    assert_eq!(scene.top_parent(meaning.landmark).expect("top"), table);
}

#[test]
fn caches_reject_a_second_scene() {
    let grounder = grounder();
    let (first, _) = table_scene();
    let (second, _) = ambiguity_box();
    let mut cache = SceneCache::new();
    let trajector = Trajector::point(vec2(0.5, 0.5));

    grounder
        .collect_candidates(&first, &trajector, &mut cache)
        .expect("first scene binds");
    assert_eq!(cache.scene_id(), Some(first.id()));
    assert_eq!(
        grounder.collect_candidates(&second, &trajector, &mut cache),
        Err(GroundingError::CacheSceneMismatch)
    );
}

#[test]
fn meaning_probabilities_form_a_distribution() {
    let (scene, _) = table_scene();
    let grounder = grounder();
    let mut cache = SceneCache::new();
    let meanings = grounder
        .all_meaning_probs(&scene, &Trajector::point(vec2(0.5, 1.9)), vec2(0.5, -1.0), &mut cache)
        .expect("meanings");

    assert!(!meanings.is_empty());
    let total: f64 = meanings.iter().map(|m| m.probability).sum();
    assert!(approx_eq(total, 1.0, 1e-6), "total {total}");
    for pair in meanings.windows(2) {
        assert!(pair[0].probability >= pair[1].probability);
    }
}

#[test]
fn heatmap_columns_never_exceed_unit_mass() {
    let (scene, block) = ambiguity_box();
    let grounder = Grounder::new(GroundingParams {
        max_level: 1,
        grid_step: 0.25,
        ..GroundingParams::default()
    });
    let mut cache = SceneCache::new();
    let maps = grounder
        .heatmaps(&scene, vec2(0.5, -2.0), &mut cache)
        .expect("heatmaps");

    let n = maps.grid.len();
    assert!(n > 0);
    assert!(maps.landmark(block).is_some());
    for i in 0..n {
        let column: f64 = maps.landmarks.iter().map(|l| l.probability[i]).sum();
        assert!(column <= 1.0 + 1e-9, "landmark column {i} sums to {column}");
        for landmark in &maps.landmarks {
            let rel: f64 = landmark.relations.iter().map(|r| r.probability[i]).sum();
            assert!(rel <= landmark.probability[i] + 1e-9);
        }
    }
    let root = maps.landmark(block).expect("root heatmap");
    assert_eq!(root.relations.len(), Relation::all().len());
}

#[test]
fn ambiguous_viewpoints_fail_heatmaps_like_relation_scoring() {
    let (scene, block) = ambiguity_box();
    let grounder = Grounder::new(GroundingParams {
        max_level: 0,
        grid_step: 0.25,
        ..GroundingParams::default()
    });
    // the box centre lies on both medial axes
    let centre = vec2(0.5, 0.5);
    let expected = Err(GroundingError::AmbiguousPrimaryAxis { matches: 2 });

    let relations = grounder.relation_distribution(&scene, block, centre, &Trajector::point(vec2(2.0, 2.0)));
    assert_eq!(relations.map(|d| d.relations.len()), expected.clone());

    let mut cache = SceneCache::new();
    let maps = grounder.heatmaps(&scene, centre, &mut cache);
    assert_eq!(maps.map(|m| m.landmarks.len()), expected);
}

#[test]
fn sampled_point_trajectors_follow_the_relation() {
    let (scene, _) = table_scene();
    let grounder = grounder();
    let f_edge = scene.resolve("table/f_edge").expect("f_edge");
    let near = Relation::Distance(Measurement::near(Degree::None));
    let mut rng = StdRng::seed_from_u64(21);
    let bounds = scene
        .bounding_box()
        .expect("bounds")
        .inflate_fraction(0.5);

    for _ in 0..20 {
        let p = grounder
            .sample_point_trajector(&scene, f_edge, &near, vec2(0.5, -1.0), None, &mut rng)
            .expect("point");
        assert!(bounds.contains_point(&p));
        let d = scene.distance_to_point(f_edge, &p).expect("distance");
        assert!(d < 0.45, "sampled point {p:?} is {d:.3} away from the far edge");
    }
}

#[test]
fn cancelled_grids_abort_the_query() {
    let (scene, table) = table_scene();
    let token = CancelToken::new();
    let grounder = grounder().with_cancel_token(token.clone());
    // just outside the far edge, so the trajector term is non-zero
    let trajector = Trajector::point(vec2(0.5, 2.05));
    let near = Relation::Distance(Measurement::near(Degree::Very));

    assert!(grounder
        .relation_likelihood(&scene, table, &near, vec2(0.5, -1.0), &trajector)
        .is_ok());
    token.cancel();
    assert_eq!(
        grounder.relation_likelihood(&scene, table, &near, vec2(0.5, -1.0), &trajector),
        Err(GroundingError::Cancelled)
    );
}

#[test]
fn active_orientations_name_the_far_edge_behind() {
    let (scene, _) = table_scene();
    let grounder = grounder();
    let mut cache = SceneCache::new();
    let view = vec2(0.5, -1.0);
    let f_edge = scene.resolve("table/f_edge").expect("f_edge");
    let corner = scene.resolve("table/f_surf/ul_corner").expect("corner");

    assert_eq!(
        grounder.active_orientations(&scene, f_edge, view, &mut cache).expect("f_edge"),
        vec![Orientation::Behind]
    );
    let corner_dirs = grounder
        .active_orientations(&scene, corner, view, &mut cache)
        .expect("corner");
    assert!(!corner_dirs.contains(&Orientation::Behind));
    assert!(!cache.is_empty());
}
