use tracing::debug;

use crate::color::{quad_texture_coordinates, ScalarMapper, VERTICES_PER_QUAD};
use crate::fault::FaultFace;
use crate::grid::{CellVisibility, FaceType, GridTopology};
use crate::math::{Point3, TexCoord};
use crate::results::ScalarDataAccessor;

use super::{LineMesh, TriangleMesh};

/// Which of the two cells touching a fault face a surface is built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaultSide {
    /// The cell the fault face was defined on.
    Native,
    /// The cell across the fault face.
    Opposite,
}

/// Builds the quad surface of one side of a fault.
///
/// Each visible fault face becomes one quad of four unshared vertices and
/// two triangles `(0, 1, 2)` and `(0, 2, 3)`. The quad maps describe the
/// quads of the last [`FaultGeometryGenerator::generate_surface`] call.
#[derive(Debug, Clone)]
pub struct FaultGeometryGenerator {
    faces: Vec<FaultFace>,
    side: FaultSide,
    cell_visibility: Option<CellVisibility>,
    quad_vertices: Vec<Point3>,
    quad_to_cell: Vec<usize>,
    quad_to_face: Vec<FaceType>,
}

impl FaultGeometryGenerator {
    #[must_use]
    pub fn new(faces: Vec<FaultFace>, side: FaultSide) -> Self {
        Self {
            faces,
            side,
            cell_visibility: None,
            quad_vertices: Vec::new(),
            quad_to_cell: Vec::new(),
            quad_to_face: Vec::new(),
        }
    }

    #[must_use]
    pub fn side(&self) -> FaultSide {
        self.side
    }

    /// Restricts generation to visible cells. Without a mask every cell is
    /// included.
    pub fn set_cell_visibility(&mut self, visibility: CellVisibility) {
        self.cell_visibility = Some(visibility);
    }

    /// The cell and face this side's quad is built from.
    fn side_cell_face(&self, face: &FaultFace) -> Option<(usize, FaceType)> {
        match self.side {
            FaultSide::Native => Some((face.native_cell, face.native_face)),
            FaultSide::Opposite => face.opposite_cell.map(|cell| (cell, face.opposite_face())),
        }
    }

    fn compute_arrays(&mut self, grid: &impl GridTopology) {
        self.quad_vertices.clear();
        self.quad_to_cell.clear();
        self.quad_to_face.clear();

        let offset = grid.display_model_offset();
        for fault_face in &self.faces {
            let Some((cell, face)) = self.side_cell_face(fault_face) else {
                continue;
            };
            if let Some(vis) = &self.cell_visibility {
                if !vis.is_visible(cell) {
                    continue;
                }
            }
            let Some(corners) = grid.face_corners(cell, face) else {
                continue;
            };

            self.quad_vertices.extend(corners.iter().map(|p| p - offset));
            self.quad_to_cell.push(cell);
            self.quad_to_face.push(face);
        }
    }

    /// Generates the triangulated surface, or `None` if no face is visible.
    pub fn generate_surface(&mut self, grid: &impl GridTopology) -> Option<TriangleMesh> {
        self.compute_arrays(grid);
        if self.quad_to_cell.is_empty() {
            debug!(side = ?self.side, "no visible fault faces");
            return None;
        }

        let mut indices = Vec::with_capacity(self.quad_to_cell.len() * 2);
        for quad in 0..self.quad_to_cell.len() {
            #[allow(clippy::cast_possible_truncation)]
            let base = (quad * VERTICES_PER_QUAD) as u32;
            indices.push([base, base + 1, base + 2]);
            indices.push([base, base + 2, base + 3]);
        }

        let mut mesh = TriangleMesh {
            vertices: self.quad_vertices.clone(),
            indices,
            ..TriangleMesh::default()
        };
        mesh.compute_normals();
        Some(mesh)
    }

    /// Outlines of the quads from the last generated surface.
    #[must_use]
    pub fn create_mesh_drawable(&self) -> Option<LineMesh> {
        if self.quad_to_cell.is_empty() {
            return None;
        }

        let mut segments = Vec::with_capacity(self.quad_to_cell.len() * 4);
        for quad in 0..self.quad_to_cell.len() {
            #[allow(clippy::cast_possible_truncation)]
            let base = (quad * VERTICES_PER_QUAD) as u32;
            for edge in 0..4u32 {
                segments.push([base + edge, base + (edge + 1) % 4]);
            }
        }

        Some(LineMesh {
            vertices: self.quad_vertices.clone(),
            segments,
        })
    }

    /// Source cell of each triangle.
    #[must_use]
    pub fn triangle_to_cell_map(&self) -> Vec<usize> {
        self.quad_to_cell.iter().flat_map(|&c| [c, c]).collect()
    }

    /// Source face of each triangle.
    #[must_use]
    pub fn triangle_to_face_map(&self) -> Vec<FaceType> {
        self.quad_to_face.iter().flat_map(|&f| [f, f]).collect()
    }

    #[must_use]
    pub fn quad_to_cell_indices(&self) -> &[usize] {
        &self.quad_to_cell
    }

    #[must_use]
    pub fn quad_to_face(&self) -> &[FaceType] {
        &self.quad_to_face
    }

    /// Per-vertex texture coordinates of the last generated surface.
    #[must_use]
    pub fn texture_coordinates(
        &self,
        accessor: &dyn ScalarDataAccessor,
        mapper: &dyn ScalarMapper,
    ) -> Vec<TexCoord> {
        quad_texture_coordinates(
            self.quad_to_cell.iter().map(|&cell| accessor.value_at(cell)),
            mapper,
        )
    }
}
