use crate::grid::FaceType;
use crate::math::{Aabb, Color3, Point3};
use crate::tessellation::{LineMesh, TriangleMesh};

use super::{Effect, TransformId};

/// Enable-mask bit of fault surfaces.
pub const FAULT_BIT: u32 = 0x0000_0004;
/// Enable-mask bit of fault mesh lines.
pub const MESH_FAULT_BIT: u32 = 0x0000_0008;
/// Default enable mask.
pub const ALL_BITS: u32 = 0xFFFF_FFFF;

/// A screen-aligned text drawn at a model position.
#[derive(Debug, Clone, PartialEq)]
pub struct TextLabel {
    pub text: String,
    pub position: Point3,
    pub color: Color3,
}

/// The geometry of a part.
#[derive(Debug, Clone)]
pub enum Drawable {
    Triangles(TriangleMesh),
    Lines(LineMesh),
    Text(TextLabel),
}

impl Drawable {
    #[must_use]
    pub fn bounding_box(&self) -> Aabb {
        match self {
            Self::Triangles(mesh) => mesh.bounding_box(),
            Self::Lines(lines) => lines.bounding_box(),
            Self::Text(label) => Aabb::new(label.position, label.position),
        }
    }

    #[must_use]
    pub fn vertices(&self) -> &[Point3] {
        match self {
            Self::Triangles(mesh) => &mesh.vertices,
            Self::Lines(lines) => &lines.vertices,
            Self::Text(label) => std::slice::from_ref(&label.position),
        }
    }

    #[must_use]
    pub fn as_triangles(&self) -> Option<&TriangleMesh> {
        match self {
            Self::Triangles(mesh) => Some(mesh),
            _ => None,
        }
    }

    pub fn as_triangles_mut(&mut self) -> Option<&mut TriangleMesh> {
        match self {
            Self::Triangles(mesh) => Some(mesh),
            _ => None,
        }
    }
}

/// Maps triangles of a part back to what they were generated from.
#[derive(Debug, Clone, PartialEq)]
pub enum SourceInfo {
    /// Triangle `t` came from face `face_types[t]` of cell `cell_indices[t]`.
    Cells {
        cell_indices: Vec<usize>,
        face_types: Vec<FaceType>,
    },
    /// Triangle `t` came from non-neighbor connection `nnc_indices[t]`.
    Nnc { nnc_indices: Vec<usize> },
}

impl SourceInfo {
    #[must_use]
    pub fn triangle_count(&self) -> usize {
        match self {
            Self::Cells { cell_indices, .. } => cell_indices.len(),
            Self::Nnc { nnc_indices } => nnc_indices.len(),
        }
    }
}

/// A renderable unit: geometry, effect and draw-order metadata.
#[derive(Debug, Clone)]
pub struct Part {
    pub name: String,
    /// Grid index, used when resolving picks.
    pub id: usize,
    pub drawable: Drawable,
    pub effect: Effect,
    /// Lower priorities draw first.
    pub priority: i32,
    pub enable_mask: u32,
    pub transform: Option<TransformId>,
    pub source_info: Option<SourceInfo>,
    bounding_box: Aabb,
}

impl Part {
    #[must_use]
    pub fn new(name: impl Into<String>, drawable: Drawable) -> Self {
        let bounding_box = drawable.bounding_box();
        Self {
            name: name.into(),
            id: 0,
            drawable,
            effect: Effect::Default,
            priority: 0,
            enable_mask: ALL_BITS,
            transform: None,
            source_info: None,
            bounding_box,
        }
    }

    /// Bounding box of the drawable when the part was created.
    #[must_use]
    pub fn bounding_box(&self) -> Aabb {
        self.bounding_box
    }
}
