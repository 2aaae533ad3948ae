use super::{Alternate, Frame, Landmark, LandmarkRole, LandmarkTags, ParentLink};
use crate::error::GroundingError;
use crate::geometry::{BoundingBox, Line};
use crate::shape::{GroupLineShape, GroupRectangleShape, Shape};
use crate::types::{LandmarkId, SceneId, Vec2};
use log::debug;
use std::collections::BTreeMap;

/// Arena owning every landmark of one scene.
///
/// Landmarks are only ever added, never mutated or removed, so ids stay
/// valid for the lifetime of the scene.
#[derive(Clone, Debug)]
pub struct Scene {
    id: SceneId,
    arena: Vec<Landmark>,
    roots: BTreeMap<String, LandmarkId>,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    pub fn new() -> Self {
        Self {
            id: SceneId::next(),
            arena: Vec::new(),
            roots: BTreeMap::new(),
        }
    }

    pub fn id(&self) -> SceneId {
        self.id
    }

    /// Total number of landmarks, sub-landmarks included.
    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    /// Adds a root landmark and materialises its whole sub-landmark tree.
    pub fn add_landmark(
        &mut self,
        name: impl Into<String>,
        shape: Shape,
        tags: LandmarkTags,
    ) -> Result<LandmarkId, GroundingError> {
        let name = name.into();
        if self.roots.contains_key(&name) {
            return Err(GroundingError::DuplicateLandmark(name));
        }
        let before = self.arena.len();
        let kind = shape.kind();
        let id = self.materialize(name.clone(), shape, LandmarkRole::Object, tags, None);
        debug!(
            "scene: added {kind} landmark `{name}` ({} nodes)",
            self.arena.len() - before
        );
        self.roots.insert(name, id);
        Ok(id)
    }

    /// Adds a root landmark for a line of existing landmarks.
    pub fn add_group_line(
        &mut self,
        name: impl Into<String>,
        members: &[LandmarkId],
        tags: LandmarkTags,
    ) -> Result<LandmarkId, GroundingError> {
        let middles = members
            .iter()
            .map(|&id| Ok((id, self.fetch_landmark(id)?.shape.middle())))
            .collect::<Result<Vec<_>, GroundingError>>()?;
        let group = GroupLineShape::fit(&middles)?;
        self.add_landmark(name, Shape::GroupLine(group), tags)
    }

    /// Adds a root landmark enclosing existing landmarks.
    pub fn add_group_rectangle(
        &mut self,
        name: impl Into<String>,
        members: &[LandmarkId],
        tags: LandmarkTags,
    ) -> Result<LandmarkId, GroundingError> {
        let boxes = members
            .iter()
            .map(|&id| Ok((id, self.fetch_landmark(id)?.shape.bounding_box())))
            .collect::<Result<Vec<_>, GroundingError>>()?;
        let group = GroupRectangleShape::enclose(&boxes)?;
        self.add_landmark(name, Shape::GroupRectangle(group), tags)
    }

    fn next_id(&self) -> LandmarkId {
        LandmarkId(self.arena.len() as u32)
    }

    fn materialize(
        &mut self,
        name: String,
        shape: Shape,
        role: LandmarkRole,
        tags: LandmarkTags,
        parent: Option<ParentLink>,
    ) -> LandmarkId {
        let id = self.next_id();
        let subs = shape.sub_landmarks();
        let alts = shape.alternates();
        self.arena.push(Landmark {
            id,
            name,
            shape,
            parent,
            role,
            tags,
            children: Vec::new(),
            alternates: Vec::new(),
        });

        let primary = ParentLink {
            landmark: id,
            frame: Frame::Primary,
        };
        let children: Vec<LandmarkId> = subs
            .into_iter()
            .map(|s| {
                self.materialize(s.name.to_string(), s.shape, s.role, tags, Some(primary))
            })
            .collect();

        let mut alternates = Vec::with_capacity(alts.len());
        for (i, alt) in alts.into_iter().enumerate() {
            let link = ParentLink {
                landmark: id,
                frame: Frame::Alternate(i),
            };
            let alt_children = alt
                .shape
                .sub_landmarks()
                .into_iter()
                .map(|s| self.materialize(s.name.to_string(), s.shape, s.role, tags, Some(link)))
                .collect();
            alternates.push(Alternate {
                name: alt.name,
                shape: alt.shape,
                children: alt_children,
            });
        }

        let node = &mut self.arena[id.index()];
        node.children = children;
        node.alternates = alternates;
        id
    }

    pub fn get(&self, id: LandmarkId) -> Option<&Landmark> {
        self.arena.get(id.index())
    }

    pub fn fetch_landmark(&self, id: LandmarkId) -> Result<&Landmark, GroundingError> {
        self.get(id).ok_or(GroundingError::UnknownLandmark(id))
    }

    /// Every landmark in arena order.
    pub fn landmarks(&self) -> impl Iterator<Item = &Landmark> {
        self.arena.iter()
    }

    pub fn root(&self, name: &str) -> Option<LandmarkId> {
        self.roots.get(name).copied()
    }

    /// Root landmarks ordered by name.
    pub fn roots(&self) -> impl Iterator<Item = (&str, LandmarkId)> {
        self.roots.iter().map(|(n, id)| (n.as_str(), *id))
    }

    /// Looks up a descendant by a `/`-separated path relative to `id`.
    /// Alternate representations appear as path segments of their own,
    /// e.g. `v_axis/end`.
    pub fn sub_landmark(&self, id: LandmarkId, path: &str) -> Option<LandmarkId> {
        let mut current = self.get(id)?;
        let mut segments = path.split('/').filter(|s| !s.is_empty());
        while let Some(seg) = segments.next() {
            let next = match self.child_named(&current.children, seg) {
                Some(child) => child,
                None => {
                    let alt = current.alternates.iter().find(|a| a.name == seg)?;
                    let inner = segments.next()?;
                    self.child_named(&alt.children, inner)?
                }
            };
            current = self.get(next)?;
        }
        Some(current.id)
    }

    /// Resolves a full path starting with a root name, e.g. `table/f_edge`.
    pub fn resolve(&self, path: &str) -> Option<LandmarkId> {
        let (root, rest) = path.split_once('/').unwrap_or((path, ""));
        let root = self.root(root)?;
        self.sub_landmark(root, rest)
    }

    fn child_named(&self, children: &[LandmarkId], name: &str) -> Option<LandmarkId> {
        children
            .iter()
            .copied()
            .find(|&c| self.get(c).is_some_and(|l| l.name == name))
    }

    /// Path from the root, the inverse of [`Scene::resolve`].
    pub fn qualified_name(&self, id: LandmarkId) -> Result<String, GroundingError> {
        let mut parts = Vec::new();
        let mut node = self.fetch_landmark(id)?;
        loop {
            parts.push(node.name.as_str());
            let Some(link) = node.parent else { break };
            let parent = self.fetch_landmark(link.landmark)?;
            if let Frame::Alternate(i) = link.frame {
                if let Some(alt) = parent.alternates.get(i) {
                    parts.push(alt.name);
                }
            }
            node = parent;
        }
        parts.reverse();
        Ok(parts.join("/"))
    }

    /// Shape of the frame `id` hangs off, `None` for roots.
    pub fn parent_shape(&self, id: LandmarkId) -> Result<Option<&Shape>, GroundingError> {
        let Some(link) = self.fetch_landmark(id)?.parent else {
            return Ok(None);
        };
        let parent = self.fetch_landmark(link.landmark)?;
        let shape = match link.frame {
            Frame::Primary => &parent.shape,
            Frame::Alternate(i) => parent
                .alternates
                .get(i)
                .map(|a| &a.shape)
                .ok_or(GroundingError::UnknownLandmark(link.landmark))?,
        };
        Ok(Some(shape))
    }

    /// Root ancestor of `id` (itself for roots).
    pub fn top_parent(&self, id: LandmarkId) -> Result<LandmarkId, GroundingError> {
        let mut node = self.fetch_landmark(id)?;
        while let Some(link) = node.parent {
            node = self.fetch_landmark(link.landmark)?;
        }
        Ok(node.id)
    }

    pub fn top_parent_shape(&self, id: LandmarkId) -> Result<&Shape, GroundingError> {
        let top = self.top_parent(id)?;
        Ok(&self.fetch_landmark(top)?.shape)
    }

    /// Length of the parent chain; 0 for roots.
    pub fn ancestor_count(&self, id: LandmarkId) -> Result<usize, GroundingError> {
        let mut node = self.fetch_landmark(id)?;
        let mut count = 0;
        while let Some(link) = node.parent {
            count += 1;
            node = self.fetch_landmark(link.landmark)?;
        }
        Ok(count)
    }

    /// Primary axes of the root object `id` belongs to.
    pub fn primary_axes(&self, id: LandmarkId) -> Result<Vec<Line>, GroundingError> {
        Ok(self.top_parent_shape(id)?.primary_axes())
    }

    /// Descendants of `id` down to `max_level` levels; negative means
    /// unbounded, 0 yields nothing. Direct children come first, followed by
    /// each child's own descendants.
    pub fn landmarks_below(
        &self,
        id: LandmarkId,
        max_level: i32,
    ) -> Result<Vec<LandmarkId>, GroundingError> {
        let mut out = Vec::new();
        self.collect_below(id, max_level, &mut out)?;
        Ok(out)
    }

    fn collect_below(
        &self,
        id: LandmarkId,
        max_level: i32,
        out: &mut Vec<LandmarkId>,
    ) -> Result<(), GroundingError> {
        if max_level == 0 {
            return Ok(());
        }
        let node = self.fetch_landmark(id)?;
        let children: Vec<LandmarkId> = node.all_children().collect();
        out.extend_from_slice(&children);
        for child in children {
            self.collect_below(child, max_level - 1, out)?;
        }
        Ok(())
    }

    /// Bounding box of all root landmarks, `None` for an empty scene.
    pub fn bounding_box(&self) -> Option<BoundingBox> {
        self.roots
            .values()
            .filter_map(|&id| self.get(id))
            .map(|l| l.shape.bounding_box())
            .reduce(|a, b| a.union(&b))
    }

    /// Projects `p` into the frame `id` hangs off; identity for roots.
    pub fn project_point(&self, id: LandmarkId, p: &Vec2) -> Result<Vec2, GroundingError> {
        Ok(match self.parent_shape(id)? {
            Some(parent) => parent.project_point(p),
            None => *p,
        })
    }

    /// Frame-aware distance from landmark `id` to a point.
    ///
    /// For a sub-landmark the point is first projected into its immediate
    /// parent frame; the local distance to that projection is combined in
    /// quadrature with the root object's distance to the point.
    pub fn distance_to_point(&self, id: LandmarkId, p: &Vec2) -> Result<f64, GroundingError> {
        let landmark = self.fetch_landmark(id)?;
        let parent = self.parent_shape(id)?;
        let top = self.top_parent_shape(id)?;
        Ok(composed_distance(&landmark.shape, parent, top, p))
    }

    /// Frame-aware distance from landmark `id` to a shape.
    ///
    /// Roots use the plain shape-to-shape distance. Sub-landmarks reduce the
    /// shape to its middle and follow [`Scene::distance_to_point`].
    pub fn distance_to(&self, id: LandmarkId, other: &Shape) -> Result<f64, GroundingError> {
        let landmark = self.fetch_landmark(id)?;
        if landmark.is_root() {
            return Ok(landmark.shape.distance_to(other));
        }
        self.distance_to_point(id, &other.middle())
    }
}

/// `sqrt(d_local² + d_top²)` where `d_local` is measured from the projection
/// of `p` into the parent frame. Roots (no parent) use the plain distance.
pub(crate) fn composed_distance(
    shape: &Shape,
    parent: Option<&Shape>,
    top: &Shape,
    p: &Vec2,
) -> f64 {
    match parent {
        None => shape.distance_to_point(p),
        Some(parent) => {
            let d_top = top.distance_to_point(p);
            let d_local = shape.distance_to_point(&parent.project_point(p));
            d_local.hypot(d_top)
        }
    }
}
