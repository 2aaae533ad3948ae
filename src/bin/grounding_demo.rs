use rand::rngs::StdRng;
use rand::SeedableRng;
use spatial_grounding::config::{self, GroundingConfig};
use spatial_grounding::diagnostics::SelectionReport;
use spatial_grounding::geometry::BoundingBox;
use spatial_grounding::landmark::{Color, ObjectClass};
use spatial_grounding::selection::GroundingParams;
use spatial_grounding::types::vec2;
use spatial_grounding::{
    GroundingError, Grounder, LandmarkTags, Scene, SceneCache, Shape, Trajector, Vec2,
};
use std::collections::BTreeMap;
use std::env;
use std::path::Path;

const CUP_SIZE: f64 = 0.07;

fn main() {
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), GroundingError> {
    let config = match env::args().nth(1) {
        Some(path) => config::load_config(Path::new(&path))?,
        None => default_config(),
    };

    let scene = tabletop_scene()?;
    let grounder = Grounder::new(config.params.clone());
    let mut cache = SceneCache::new();
    let mut rng = StdRng::seed_from_u64(config.seed.unwrap_or(0));
    let trajector = Trajector::point(config.trajector);

    let mut first_report: Option<SelectionReport> = None;
    let mut tally: BTreeMap<String, usize> = BTreeMap::new();
    for _ in 0..config.samples.max(1) {
        let (meaning, report) = grounder.sample_meaning_with_diagnostics(
            &scene,
            &trajector,
            config.perspective,
            &mut cache,
            &mut rng,
        )?;
        if let Some(meaning) = meaning {
            let phrase = format!(
                "{} {}",
                meaning.relation.relation,
                scene.qualified_name(meaning.landmark)?
            );
            *tally.entry(phrase).or_default() += 1;
        }
        first_report.get_or_insert(report);
    }

    println!(
        "Trajector {} seen from {}",
        fmt_point(&config.trajector),
        fmt_point(&config.perspective)
    );
    if let Some(report) = &first_report {
        println!("First sample");
        for line in report.summary_lines() {
            println!("  {line}");
        }
        println!("  most likely landmarks:");
        for scored in report.top_landmarks(5) {
            println!("    {:<28} p = {:.3}", scored.name, scored.probability);
        }
    }

    let total: usize = tally.values().sum();
    let mut ranked: Vec<(&String, &usize)> = tally.iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));
    println!("Descriptions over {total} sample(s)");
    for (phrase, count) in ranked.iter().take(10) {
        println!(
            "  {:>5.1}%  the point is {phrase}",
            100.0 * **count as f64 / total.max(1) as f64
        );
    }

    if let (Some(path), Some(report)) = (&config.json_out, &first_report) {
        config::write_json_file(path, report)?;
        println!("JSON report written to {}", path.display());
    }
    Ok(())
}

fn default_config() -> GroundingConfig {
    GroundingConfig {
        perspective: vec2(0.0, 0.0),
        trajector: vec2(0.05, 1.5),
        samples: 200,
        seed: Some(0),
        json_out: None,
        params: GroundingParams::default(),
    }
}

/// A table in front of the speaker with five coloured cups on it.
fn tabletop_scene() -> Result<Scene, GroundingError> {
    let mut scene = Scene::new();
    scene.add_landmark(
        "table",
        Shape::rectangle(BoundingBox::new(vec2(-0.4, 0.4), vec2(0.4, 1.6)))?,
        LandmarkTags::new(ObjectClass::Table, None),
    )?;
    let cups = [
        ("red_cup", vec2(0.05, 0.9), Color::Red),
        ("green_cup", vec2(0.05, 0.7), Color::Green),
        ("blue_cup", vec2(0.0, 0.55), Color::Blue),
        ("yellow_cup", vec2(-0.3, 0.7), Color::Yellow),
        ("purple_cup", vec2(0.3, 0.7), Color::Purple),
    ];
    for (name, center, color) in cups {
        let half = vec2(CUP_SIZE, CUP_SIZE) * 0.5;
        scene.add_landmark(
            name,
            Shape::object_box(BoundingBox::new(center - half, center + half))?,
            LandmarkTags::new(ObjectClass::Cup, Some(color)),
        )?;
    }
    Ok(scene)
}

fn fmt_point(p: &Vec2) -> String {
    format!("({:.2}, {:.2})", p.x, p.y)
}
