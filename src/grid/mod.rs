pub mod face;
pub mod main_grid;
pub mod nnc;
pub mod visibility;

pub use face::FaceType;
pub use main_grid::MainGrid;
pub use nnc::{NncConnection, NncData};
pub use visibility::CellVisibility;

use std::collections::HashSet;

use crate::fault::Fault;
use crate::math::{Point3, Vector3};

/// Read access to a structured grid's geometry and fault topology.
///
/// Cells are addressed by a global index `i + j * ni + k * ni * nj`.
pub trait GridTopology {
    fn cell_count_i(&self) -> usize;
    fn cell_count_j(&self) -> usize;
    fn cell_count_k(&self) -> usize;

    /// Index of this grid among the grids of a case. The main grid is 0.
    fn grid_index(&self) -> usize;

    /// `true` if the face corner winding of [`FaceType::corner_indices`]
    /// produces normals pointing out of the cell.
    fn face_normals_outwards(&self) -> bool;

    /// Offset subtracted from model coordinates before display.
    fn display_model_offset(&self) -> Vector3;

    /// The eight corners of a cell, or `None` for an out-of-range index.
    fn cell_corners(&self, cell: usize) -> Option<[Point3; 8]>;

    fn nnc_data(&self) -> &NncData;

    fn cell_count(&self) -> usize {
        self.cell_count_i() * self.cell_count_j() * self.cell_count_k()
    }

    fn cell_index(&self, i: usize, j: usize, k: usize) -> Option<usize> {
        let (ni, nj, nk) = (self.cell_count_i(), self.cell_count_j(), self.cell_count_k());
        (i < ni && j < nj && k < nk).then(|| i + j * ni + k * ni * nj)
    }

    fn ijk_from_cell_index(&self, cell: usize) -> Option<(usize, usize, usize)> {
        if cell >= self.cell_count() {
            return None;
        }
        let ni = self.cell_count_i();
        let nij = ni * self.cell_count_j();
        Some((cell % ni, (cell % nij) / ni, cell / nij))
    }

    /// The cell across `face`, if it lies inside the grid.
    fn neighbor_cell(&self, cell: usize, face: FaceType) -> Option<usize> {
        let (i, j, k) = self.ijk_from_cell_index(cell)?;
        let (di, dj, dk) = face.ijk_offset();
        let i = i.checked_add_signed(di)?;
        let j = j.checked_add_signed(dj)?;
        let k = k.checked_add_signed(dk)?;
        self.cell_index(i, j, k)
    }

    /// The four corners of one cell face, in [`FaceType::corner_indices`] order.
    fn face_corners(&self, cell: usize, face: FaceType) -> Option<[Point3; 4]> {
        let corners = self.cell_corners(cell)?;
        Some(face.corner_indices().map(|c| corners[c]))
    }

    /// Indices into [`GridTopology::nnc_data`] of the connections crossing
    /// one of `fault`'s faces.
    ///
    /// A connection belongs to the fault when its `(cell1, face)` is a native
    /// fault face, or `(cell2, face.opposite())` is.
    fn connection_indices_for_fault(&self, fault: &Fault) -> Vec<usize> {
        let fault_faces: HashSet<(usize, FaceType)> = fault
            .faces
            .iter()
            .map(|f| (f.native_cell, f.native_face))
            .collect();

        self.nnc_data()
            .connections()
            .iter()
            .enumerate()
            .filter(|(_, conn)| {
                fault_faces.contains(&(conn.cell1, conn.face))
                    || fault_faces.contains(&(conn.cell2, conn.face.opposite()))
            })
            .map(|(idx, _)| idx)
            .collect()
    }
}
