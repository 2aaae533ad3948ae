#![doc = include_str!("../README.md")]

// Public modules (stable-ish surface)
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod landmark;
pub mod relation;
pub mod selection;
pub mod shape;
pub mod types;

// Lower-level building blocks, public for tools and tests.
pub mod angle;
pub mod geometry;

// --- High-level re-exports -------------------------------------------------

pub use crate::error::GroundingError;
pub use crate::landmark::{Landmark, LandmarkTags, Scene};
pub use crate::relation::{Degree, DistanceClass, Orientation, Relation, RelationModel};
pub use crate::selection::{Grounder, GroundingParams, Meaning, SceneCache, Trajector};
pub use crate::shape::Shape;
pub use crate::types::{LandmarkId, Vec2};

// --- Prelude ---------------------------------------------------------------

/// Small prelude for quick experiments.
///
/// ```no_run
/// use spatial_grounding::prelude::*;
/// use rand::SeedableRng;
///
/// # fn main() -> Result<(), GroundingError> {
/// let mut scene = Scene::new();
/// let table = Shape::rectangle(BoundingBox::new(vec2(0.0, 0.0), vec2(1.0, 2.0)))?;
/// scene.add_landmark("table", table, LandmarkTags::default())?;
///
/// let grounder = Grounder::new(GroundingParams::default());
/// let mut cache = SceneCache::new();
/// let mut rng = rand::rngs::StdRng::seed_from_u64(7);
/// let trajector = Trajector::point(vec2(0.5, 1.9));
/// if let Some(meaning) =
///     grounder.sample_meaning(&scene, &trajector, vec2(0.5, -1.0), &mut cache, &mut rng)?
/// {
///     println!("{} {}", meaning.relation.relation, scene.qualified_name(meaning.landmark)?);
/// }
/// # Ok(())
/// # }
/// ```
pub mod prelude {
    pub use crate::geometry::BoundingBox;
    pub use crate::types::vec2;
    pub use crate::{
        GroundingError, Grounder, GroundingParams, LandmarkTags, Scene, SceneCache, Shape,
        Trajector, Vec2,
    };
}
