use nalgebra::Vector2;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Point or displacement in scene coordinates.
pub type Vec2 = Vector2<f64>;

#[inline]
pub fn vec2(x: f64, y: f64) -> Vec2 {
    Vec2::new(x, y)
}

/// 2D cross product (z component of the 3D cross product).
#[inline]
pub fn cross(a: &Vec2, b: &Vec2) -> f64 {
    a.x * b.y - a.y * b.x
}

/// Index of a landmark inside the arena of the scene that created it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LandmarkId(pub u32);

impl LandmarkId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for LandmarkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Process-unique identity of a scene, used to scope caches to one scene.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct SceneId(u64);

impl SceneId {
    pub(crate) fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        SceneId(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}
