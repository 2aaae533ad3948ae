//! Ad hoc groups of landmarks treated as a single landmark.

use super::{LineShape, RectangleShape};
use crate::error::GroundingError;
use crate::geometry::{fit_line_through, BoundingBox};
use crate::types::{LandmarkId, Vec2};
use serde::Serialize;

/// Minimum members for a group shape.
pub const MIN_GROUP_SIZE: usize = 2;

/// Members arranged along a least-squares line through their middles.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GroupLineShape {
    pub line: LineShape,
    /// Members ordered by their position along `line`.
    pub members: Vec<LandmarkId>,
}

impl GroupLineShape {
    /// `members` pairs each landmark with its middle point.
    pub fn fit(members: &[(LandmarkId, Vec2)]) -> Result<Self, GroundingError> {
        if members.len() < MIN_GROUP_SIZE {
            return Err(GroundingError::EmptyGroup {
                needed: MIN_GROUP_SIZE,
                found: members.len(),
            });
        }
        let middles: Vec<Vec2> = members.iter().map(|(_, m)| *m).collect();
        let fit = fit_line_through(&middles)?;
        Ok(Self {
            line: LineShape::new(fit.segment, None),
            members: fit.order.iter().map(|&i| members[i].0).collect(),
        })
    }
}

/// Members enclosed by the bounding box of their geometries.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GroupRectangleShape {
    pub rect: RectangleShape,
    pub members: Vec<LandmarkId>,
}

impl GroupRectangleShape {
    /// `members` pairs each landmark with its bounding box.
    pub fn enclose(members: &[(LandmarkId, BoundingBox)]) -> Result<Self, GroundingError> {
        if members.len() < MIN_GROUP_SIZE {
            return Err(GroundingError::EmptyGroup {
                needed: MIN_GROUP_SIZE,
                found: members.len(),
            });
        }
        let bbox = members
            .iter()
            .skip(1)
            .fold(members[0].1, |acc, (_, b)| acc.union(b));
        Ok(Self {
            rect: RectangleShape::new(bbox)
                .with_parts(&[super::RectPart::Middle])
                .without_medial_axes(),
            members: members.iter().map(|(id, _)| *id).collect(),
        })
    }
}
