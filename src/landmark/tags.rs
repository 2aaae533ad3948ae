use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of physical object a root landmark stands for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectClass {
    Table,
    Chair,
    Cup,
    Bottle,
    Prism,
    Box,
    Cylinder,
    Sphere,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    Red,
    Green,
    Purple,
    Blue,
    Pink,
    Orange,
    Yellow,
    Black,
    White,
}

/// Descriptive tags attached to a root landmark. Opaque to the grounding
/// core; carried through for surface realisation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LandmarkTags {
    pub object_class: Option<ObjectClass>,
    pub color: Option<Color>,
}

impl LandmarkTags {
    pub fn new(object_class: ObjectClass, color: Option<Color>) -> Self {
        Self {
            object_class: Some(object_class),
            color,
        }
    }
}

/// Part a landmark plays with respect to its parent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LandmarkRole {
    /// A root object in the scene.
    Object,
    Corner,
    Edge,
    Middle,
    Half,
    /// Endpoint of an elongated line.
    End,
    /// Endpoint of a short line, which reads as a side rather than an end.
    Side,
}

impl fmt::Display for LandmarkRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LandmarkRole::Object => "object",
            LandmarkRole::Corner => "corner",
            LandmarkRole::Edge => "edge",
            LandmarkRole::Middle => "middle",
            LandmarkRole::Half => "half",
            LandmarkRole::End => "end",
            LandmarkRole::Side => "side",
        };
        f.write_str(s)
    }
}
