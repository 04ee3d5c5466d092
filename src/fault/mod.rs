mod collection;

pub use collection::{FaultCollection, FaultDisplaySettings, FaultFaceCulling};

use crate::grid::{FaceType, GridTopology};
use crate::math::Color3;

/// One cell face on a fault, seen from the native side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FaultFace {
    pub native_cell: usize,
    pub native_face: FaceType,
    /// The cell across the face, if the face is not on the grid boundary.
    pub opposite_cell: Option<usize>,
}

impl FaultFace {
    /// The face of the opposite cell that touches this fault face.
    #[must_use]
    pub fn opposite_face(&self) -> FaceType {
        self.native_face.opposite()
    }
}

/// A named fault: a fixed set of cell faces plus display attributes.
#[derive(Debug, Clone)]
pub struct Fault {
    pub name: String,
    pub faces: Vec<FaultFace>,
    pub color: Color3,
    pub show_fault: bool,
}

impl Fault {
    /// Creates a visible fault with the default gray color.
    #[must_use]
    pub fn new(name: impl Into<String>, faces: Vec<FaultFace>) -> Self {
        Self {
            name: name.into(),
            faces,
            color: Color3::GRAY,
            show_fault: true,
        }
    }

    #[must_use]
    pub fn with_color(mut self, color: Color3) -> Self {
        self.color = color;
        self
    }

    /// Appends the `face` of every cell in the inclusive zero-based IJK box.
    ///
    /// Cells outside the grid are skipped. Returns the number of faces added.
    pub fn add_ijk_box(
        &mut self,
        grid: &impl GridTopology,
        i: (usize, usize),
        j: (usize, usize),
        k: (usize, usize),
        face: FaceType,
    ) -> usize {
        let before = self.faces.len();
        for kk in k.0..=k.1 {
            for jj in j.0..=j.1 {
                for ii in i.0..=i.1 {
                    let Some(cell) = grid.cell_index(ii, jj, kk) else {
                        continue;
                    };
                    self.faces.push(FaultFace {
                        native_cell: cell,
                        native_face: face,
                        opposite_cell: grid.neighbor_cell(cell, face),
                    });
                }
            }
        }
        self.faces.len() - before
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::grid::MainGrid;
    use crate::math::{Point3, Vector3};

    #[test]
    fn ijk_box_links_opposite_cells() {
        let grid =
            MainGrid::regular(2, 2, 1, Point3::origin(), Vector3::new(1.0, 1.0, 1.0)).unwrap();
        let mut fault = Fault::new("F1", Vec::new());
        let added = fault.add_ijk_box(&grid, (0, 0), (0, 1), (0, 0), FaceType::PosI);
        assert_eq!(added, 2);
        assert_eq!(fault.faces[0].native_cell, 0);
        assert_eq!(fault.faces[0].opposite_cell, Some(1));
        assert_eq!(fault.faces[1].native_cell, 2);
        assert_eq!(fault.faces[1].opposite_cell, Some(3));
        assert_eq!(fault.faces[1].opposite_face(), FaceType::NegI);
    }

    #[test]
    fn boundary_face_has_no_opposite() {
        let grid =
            MainGrid::regular(1, 1, 1, Point3::origin(), Vector3::new(1.0, 1.0, 1.0)).unwrap();
        let mut fault = Fault::new("edge", Vec::new());
        fault.add_ijk_box(&grid, (0, 3), (0, 0), (0, 0), FaceType::NegJ);
        assert_eq!(fault.faces.len(), 1);
        assert_eq!(fault.faces[0].opposite_cell, None);
    }
}
