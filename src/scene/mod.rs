mod effect;
mod part;

pub use effect::{Effect, FaceCulling, PolygonOffset};
pub use part::{Drawable, Part, SourceInfo, TextLabel, ALL_BITS, FAULT_BIT, MESH_FAULT_BIT};

use slotmap::SlotMap;

use crate::error::SceneError;
use crate::math::{Aabb, Matrix4, Point3, Vector3};

slotmap::new_key_type! {
    /// Unique identifier for a part in the scene store.
    pub struct PartId;
}

slotmap::new_key_type! {
    /// Unique identifier for a transform in the scene store.
    pub struct TransformId;
}

/// A model-to-world transform shared by several parts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub matrix: Matrix4,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            matrix: Matrix4::identity(),
        }
    }
}

impl Transform {
    /// A non-uniform scale, typically used for vertical exaggeration.
    #[must_use]
    pub fn scaling(scale: Vector3) -> Self {
        Self {
            matrix: Matrix4::new_nonuniform_scaling(&scale),
        }
    }

    #[must_use]
    pub fn transform_point(&self, p: &Point3) -> Point3 {
        self.matrix.transform_point(p)
    }
}

/// Central arena that owns all parts and transforms.
///
/// Managers and scene models refer to entries through generational IDs, so a
/// handle to a part that was regenerated resolves to an error instead of
/// stale geometry.
#[derive(Debug, Default)]
pub struct SceneStore {
    parts: SlotMap<PartId, Part>,
    transforms: SlotMap<TransformId, Transform>,
}

impl SceneStore {
    /// Creates a new, empty scene store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // --- Part operations ---

    /// Inserts a part and returns its ID.
    pub fn add_part(&mut self, part: Part) -> PartId {
        self.parts.insert(part)
    }

    /// Returns a reference to the part, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the part is not in the store.
    pub fn part(&self, id: PartId) -> Result<&Part, SceneError> {
        self.parts
            .get(id)
            .ok_or_else(|| SceneError::EntityNotFound("part".into()))
    }

    /// Returns a mutable reference to the part, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the part is not in the store.
    pub fn part_mut(&mut self, id: PartId) -> Result<&mut Part, SceneError> {
        self.parts
            .get_mut(id)
            .ok_or_else(|| SceneError::EntityNotFound("part".into()))
    }

    /// Removes a part, returning it if it was present.
    pub fn remove_part(&mut self, id: PartId) -> Option<Part> {
        self.parts.remove(id)
    }

    #[must_use]
    pub fn contains_part(&self, id: PartId) -> bool {
        self.parts.contains_key(id)
    }

    #[must_use]
    pub fn part_count(&self) -> usize {
        self.parts.len()
    }

    // --- Transform operations ---

    /// Inserts a transform and returns its ID.
    pub fn add_transform(&mut self, transform: Transform) -> TransformId {
        self.transforms.insert(transform)
    }

    /// Returns a reference to the transform, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the transform is not in the store.
    pub fn transform(&self, id: TransformId) -> Result<&Transform, SceneError> {
        self.transforms
            .get(id)
            .ok_or_else(|| SceneError::EntityNotFound("transform".into()))
    }

    /// Returns a mutable reference to the transform, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the transform is not in the store.
    pub fn transform_mut(&mut self, id: TransformId) -> Result<&mut Transform, SceneError> {
        self.transforms
            .get_mut(id)
            .ok_or_else(|| SceneError::EntityNotFound("transform".into()))
    }
}

/// An ordered list of parts to draw. Holds handles only; parts stay owned by
/// the [`SceneStore`].
#[derive(Debug, Clone, Default)]
pub struct SceneModel {
    parts: Vec<PartId>,
}

impl SceneModel {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_part(&mut self, id: PartId) {
        self.parts.push(id);
    }

    #[must_use]
    pub fn part_ids(&self) -> &[PartId] {
        &self.parts
    }

    #[must_use]
    pub fn part_count(&self) -> usize {
        self.parts.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    #[must_use]
    pub fn contains(&self, id: PartId) -> bool {
        self.parts.contains(&id)
    }

    pub fn clear(&mut self) {
        self.parts.clear();
    }

    /// Parts sorted by draw priority; ties keep insertion order.
    ///
    /// # Errors
    ///
    /// Returns an error if a handle no longer resolves in `store`.
    pub fn draw_order<'s>(&self, store: &'s SceneStore) -> Result<Vec<&'s Part>, SceneError> {
        let mut parts = self
            .parts
            .iter()
            .map(|&id| store.part(id))
            .collect::<Result<Vec<_>, _>>()?;
        parts.sort_by_key(|p| p.priority);
        Ok(parts)
    }

    /// Bounding box of all parts, with their transforms applied.
    ///
    /// # Errors
    ///
    /// Returns an error if a part or transform handle no longer resolves.
    pub fn bounding_box(&self, store: &SceneStore) -> Result<Aabb, SceneError> {
        let mut bb = Aabb::empty();
        for &id in &self.parts {
            let part = store.part(id)?;
            let part_bb = part.bounding_box();
            if !part_bb.is_valid() {
                continue;
            }
            match part.transform {
                Some(tid) => {
                    let t = store.transform(tid)?;
                    bb.add_point(&t.transform_point(&part_bb.min));
                    bb.add_point(&t.transform_point(&part_bb.max));
                }
                None => bb.add_box(&part_bb),
            }
        }
        Ok(bb)
    }
}
