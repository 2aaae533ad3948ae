use spatial_grounding::geometry::BoundingBox;
use spatial_grounding::landmark::{Color, ObjectClass};
use spatial_grounding::types::vec2;
use spatial_grounding::{LandmarkId, LandmarkTags, Scene, Shape};

/// A 1 x 2 table with its near edge on the x axis; the speaker usually sits
/// at (0.5, -1), straight in front of it.
pub fn table_scene() -> (Scene, LandmarkId) {
    let mut scene = Scene::new();
    let table = Shape::rectangle(BoundingBox::new(vec2(0.0, 0.0), vec2(1.0, 2.0)))
        .expect("table shape");
    let id = scene
        .add_landmark("table", table, LandmarkTags::new(ObjectClass::Table, None))
        .expect("add table");
    (scene, id)
}

/// The table plus a small red cup standing near its right edge.
pub fn table_with_cup() -> (Scene, LandmarkId, LandmarkId) {
    let (mut scene, table) = table_scene();
    let cup = Shape::object_box(BoundingBox::new(vec2(0.8, 1.0), vec2(0.9, 1.1)))
        .expect("cup shape");
    let cup = scene
        .add_landmark("cup", cup, LandmarkTags::new(ObjectClass::Cup, Some(Color::Red)))
        .expect("add cup");
    (scene, table, cup)
}

/// Unit box seen from (0.5, -2); a trajector at (-1, 2.5) sits between its
/// "behind" and "left" directions.
pub fn ambiguity_box() -> (Scene, LandmarkId) {
    let mut scene = Scene::new();
    let shape = Shape::rectangle(BoundingBox::new(vec2(0.0, 0.0), vec2(1.0, 1.0)))
        .expect("box shape");
    let id = scene
        .add_landmark("box", shape, LandmarkTags::new(ObjectClass::Box, None))
        .expect("add box");
    (scene, id)
}
