//! Landmark tree: named nodes wrapping shapes, stored in a per-scene arena.
//!
//! Root landmarks are the scene's objects. Every shape's sub-landmarks
//! (corners, edges, halves, ...) become child nodes, and so do the
//! sub-landmarks of its alternate representations (e.g. the `end` of a
//! table's vertical medial line). Parent links are arena indices, so the
//! tree has no reference cycles and is immutable once built.
//!
//! Distances to a sub-landmark are composed across frames: the offset
//! inside the immediate parent frame is combined in quadrature with the
//! root object's own distance, see [`Scene::distance_to`].

mod scene;
mod tags;

pub(crate) use scene::composed_distance;
pub use scene::Scene;
pub use tags::{Color, LandmarkRole, LandmarkTags, ObjectClass};

use crate::shape::Shape;
use crate::types::LandmarkId;
use serde::Serialize;

/// Which representation of the parent a child hangs off.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Frame {
    /// The parent's own shape.
    Primary,
    /// The parent's alternate representation with this index.
    Alternate(usize),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct ParentLink {
    pub landmark: LandmarkId,
    pub frame: Frame,
}

/// Alternate representation of a landmark together with the sub-landmarks
/// it contributes.
#[derive(Clone, Debug, PartialEq)]
pub struct Alternate {
    pub name: &'static str,
    pub shape: Shape,
    pub children: Vec<LandmarkId>,
}

/// Node of the landmark tree.
#[derive(Clone, Debug, PartialEq)]
pub struct Landmark {
    pub id: LandmarkId,
    pub name: String,
    pub shape: Shape,
    pub parent: Option<ParentLink>,
    pub role: LandmarkRole,
    pub tags: LandmarkTags,
    /// Sub-landmarks of the primary shape.
    pub children: Vec<LandmarkId>,
    pub alternates: Vec<Alternate>,
}

impl Landmark {
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// Children across the primary shape and every alternate.
    pub fn all_children(&self) -> impl Iterator<Item = LandmarkId> + '_ {
        self.children
            .iter()
            .chain(self.alternates.iter().flat_map(|a| a.children.iter()))
            .copied()
    }
}
