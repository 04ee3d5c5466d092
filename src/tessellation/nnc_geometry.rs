use tracing::debug;

use crate::color::{texture_coord, ScalarMapper};
use crate::grid::{CellVisibility, GridTopology};
use crate::math::TexCoord;

use super::TriangleMesh;

/// Builds the surface of a subset of a grid's non-neighbor connections.
///
/// Each connection polygon is fan triangulated; every triangle owns three
/// unshared vertices.
#[derive(Debug, Clone)]
pub struct NncGeometryGenerator {
    connection_indices: Vec<usize>,
    cell_visibility: Option<CellVisibility>,
    triangle_to_nnc: Vec<usize>,
}

impl NncGeometryGenerator {
    /// `connection_indices` index into the grid's [`crate::grid::NncData`].
    #[must_use]
    pub fn new(connection_indices: Vec<usize>) -> Self {
        Self {
            connection_indices,
            cell_visibility: None,
            triangle_to_nnc: Vec::new(),
        }
    }

    /// A connection is included when either of its cells is visible.
    pub fn set_cell_visibility(&mut self, visibility: CellVisibility) {
        self.cell_visibility = Some(visibility);
    }

    #[must_use]
    pub fn connection_indices(&self) -> &[usize] {
        &self.connection_indices
    }

    /// Generates the triangulated surface, or `None` if no connection is
    /// visible.
    pub fn generate_surface(&mut self, grid: &impl GridTopology) -> Option<TriangleMesh> {
        self.triangle_to_nnc.clear();
        let nnc_data = grid.nnc_data();
        let offset = grid.display_model_offset();

        let mut vertices = Vec::new();
        for &nnc_idx in &self.connection_indices {
            let Some(conn) = nnc_data.get(nnc_idx) else {
                continue;
            };
            if let Some(vis) = &self.cell_visibility {
                if !vis.is_visible(conn.cell1) && !vis.is_visible(conn.cell2) {
                    continue;
                }
            }
            if conn.polygon.len() < 3 {
                continue;
            }

            let anchor = conn.polygon[0] - offset;
            for pair in conn.polygon[1..].windows(2) {
                vertices.extend([anchor, pair[0] - offset, pair[1] - offset]);
                self.triangle_to_nnc.push(nnc_idx);
            }
        }

        if self.triangle_to_nnc.is_empty() {
            debug!("no visible non-neighbor connections");
            return None;
        }

        #[allow(clippy::cast_possible_truncation)]
        let indices = (0..self.triangle_to_nnc.len() as u32)
            .map(|t| [3 * t, 3 * t + 1, 3 * t + 2])
            .collect();

        let mut mesh = TriangleMesh {
            vertices,
            indices,
            ..TriangleMesh::default()
        };
        mesh.compute_normals();
        Some(mesh)
    }

    /// NNC index of each triangle of the last generated surface.
    #[must_use]
    pub fn triangle_to_nnc_index(&self) -> &[usize] {
        &self.triangle_to_nnc
    }

    /// Texture coordinates from each connection's transmissibility.
    #[must_use]
    pub fn texture_coordinates(
        &self,
        grid: &impl GridTopology,
        mapper: &dyn ScalarMapper,
    ) -> Vec<TexCoord> {
        let nnc_data = grid.nnc_data();
        let mut coords = Vec::with_capacity(self.triangle_to_nnc.len() * 3);
        for &nnc_idx in &self.triangle_to_nnc {
            let value = nnc_data
                .get(nnc_idx)
                .map_or(crate::results::UNDEFINED_VALUE, |c| c.transmissibility);
            coords.extend([texture_coord(value, mapper); 3]);
        }
        coords
    }
}
