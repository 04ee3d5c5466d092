//! Resolution of picked triangles back to grid cells and connections.

use std::fmt;

use tracing::debug;

use crate::error::{GridError, Result, SceneError};
use crate::grid::{FaceType, GridTopology};
use crate::scene::{PartId, SceneStore, SourceInfo};

/// What a picked triangle was generated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickedItem {
    /// A face of a grid cell.
    Cell {
        grid_index: usize,
        cell: usize,
        face: FaceType,
        /// Zero-based `(i, j, k)` of `cell`.
        ijk: (usize, usize, usize),
    },
    /// A non-neighbor connection.
    Nnc {
        grid_index: usize,
        nnc_index: usize,
        cells: (usize, usize),
    },
}

impl PickedItem {
    /// Grid and cell index of a picked cell face.
    #[must_use]
    pub fn cell_and_grid_index(&self) -> Option<(usize, usize)> {
        match *self {
            Self::Cell {
                grid_index, cell, ..
            } => Some((grid_index, cell)),
            Self::Nnc { .. } => None,
        }
    }
}

impl fmt::Display for PickedItem {
    /// One-based IJK, as shown to users.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cell {
                grid_index,
                face,
                ijk: (i, j, k),
                ..
            } => write!(
                f,
                "Grid {grid_index}, cell [{}, {}, {}], face {face:?}",
                i + 1,
                j + 1,
                k + 1
            ),
            Self::Nnc {
                nnc_index,
                cells: (c1, c2),
                ..
            } => write!(f, "NNC {nnc_index} between cells {c1} and {c2}"),
        }
    }
}

/// Looks up the source of `triangle` in `part`.
///
/// Returns `Ok(None)` for parts without source information, such as mesh
/// lines and labels, and for connections no longer in the grid.
///
/// # Errors
///
/// Returns an error if `part` is not in `store`, `triangle` is beyond the
/// part's source map, or the mapped cell is outside `grid`.
pub fn source_of_triangle(
    store: &SceneStore,
    part: PartId,
    triangle: usize,
    grid: &impl GridTopology,
) -> Result<Option<PickedItem>> {
    let part = store.part(part)?;
    let Some(source) = &part.source_info else {
        return Ok(None);
    };
    let out_of_range = || SceneError::TriangleOutOfRange {
        part: part.name.clone(),
        triangle,
    };

    let grid_index = part.id;
    match source {
        SourceInfo::Cells {
            cell_indices,
            face_types,
        } => {
            let (Some(&cell), Some(&face)) = (cell_indices.get(triangle), face_types.get(triangle))
            else {
                return Err(out_of_range().into());
            };
            let ijk = grid
                .ijk_from_cell_index(cell)
                .ok_or(GridError::CellOutOfRange(cell))?;
            Ok(Some(PickedItem::Cell {
                grid_index,
                cell,
                face,
                ijk,
            }))
        }
        SourceInfo::Nnc { nnc_indices } => {
            let &nnc_index = nnc_indices.get(triangle).ok_or_else(out_of_range)?;
            let Some(conn) = grid.nnc_data().get(nnc_index) else {
                debug!(nnc_index, "picked connection is not in the grid");
                return Ok(None);
            };
            Ok(Some(PickedItem::Nnc {
                grid_index,
                nnc_index,
                cells: (conn.cell1, conn.cell2),
            }))
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::config::Preferences;
    use crate::error::Error;
    use crate::fault::{Fault, FaultCollection};
    use crate::grid::{MainGrid, NncConnection};
    use crate::math::{Point3, Vector3};
    use crate::visualization::FaultPartManager;

    fn setup() -> (MainGrid, FaultCollection) {
        let mut grid =
            MainGrid::regular(2, 2, 2, Point3::origin(), Vector3::new(1.0, 1.0, 1.0)).unwrap();
        grid.add_nnc(NncConnection {
            cell1: 2,
            cell2: 3,
            face: FaceType::PosI,
            polygon: vec![
                Point3::new(1.0, 1.0, 0.0),
                Point3::new(1.0, 2.0, 0.0),
                Point3::new(1.0, 2.0, 1.0),
            ],
            transmissibility: 1.0,
        });
        let mut fault = Fault::new("F", Vec::new());
        fault.add_ijk_box(&grid, (0, 0), (1, 1), (0, 1), FaceType::PosI);
        (grid, FaultCollection::new(vec![fault]))
    }

    #[test]
    fn picked_triangle_resolves_to_cell_face() {
        let (grid, collection) = setup();
        let mut store = SceneStore::new();
        let mgr =
            FaultPartManager::new(&grid, &collection, 0, Preferences::default(), &mut store)
                .unwrap();

        // Triangles 2 and 3 belong to the second quad, cell (0, 1, 1).
        let picked = source_of_triangle(&store, mgr.native_faces().unwrap(), 3, &grid)
            .unwrap()
            .unwrap();
        assert_eq!(
            picked,
            PickedItem::Cell {
                grid_index: 0,
                cell: 6,
                face: FaceType::PosI,
                ijk: (0, 1, 1),
            }
        );
        assert_eq!(picked.cell_and_grid_index(), Some((0, 6)));
        assert_eq!(picked.to_string(), "Grid 0, cell [1, 2, 2], face PosI");

        let opposite = source_of_triangle(&store, mgr.opposite_faces().unwrap(), 0, &grid)
            .unwrap()
            .unwrap();
        assert_eq!(opposite.cell_and_grid_index(), Some((0, 3)));
    }

    #[test]
    fn picked_nnc_triangle() {
        let (grid, collection) = setup();
        let mut store = SceneStore::new();
        let mgr =
            FaultPartManager::new(&grid, &collection, 0, Preferences::default(), &mut store)
                .unwrap();

        let picked = source_of_triangle(&store, mgr.nnc_faces().unwrap(), 0, &grid)
            .unwrap()
            .unwrap();
        assert_eq!(
            picked,
            PickedItem::Nnc {
                grid_index: 0,
                nnc_index: 0,
                cells: (2, 3),
            }
        );
        assert_eq!(picked.cell_and_grid_index(), None);
    }

    #[test]
    fn parts_without_source_and_bad_triangles() {
        let (grid, collection) = setup();
        let mut store = SceneStore::new();
        let mgr =
            FaultPartManager::new(&grid, &collection, 0, Preferences::default(), &mut store)
                .unwrap();

        let lines = mgr.native_grid_lines().unwrap();
        assert!(source_of_triangle(&store, lines, 0, &grid).unwrap().is_none());

        let err = source_of_triangle(&store, mgr.native_faces().unwrap(), 99, &grid).unwrap_err();
        assert!(matches!(
            err,
            Error::Scene(SceneError::TriangleOutOfRange { triangle: 99, .. })
        ));
    }

    #[test]
    fn mismatched_cell_maps_are_out_of_range() {
        let (grid, collection) = setup();
        let mut store = SceneStore::new();
        let mgr =
            FaultPartManager::new(&grid, &collection, 0, Preferences::default(), &mut store)
                .unwrap();
        let id = mgr.native_faces().unwrap();
        let part = store.part_mut(id).unwrap();
        if let Some(SourceInfo::Cells { face_types, .. }) = &mut part.source_info {
            face_types.truncate(1);
        }

        assert!(source_of_triangle(&store, id, 0, &grid).unwrap().is_some());
        let err = source_of_triangle(&store, id, 1, &grid).unwrap_err();
        assert!(matches!(
            err,
            Error::Scene(SceneError::TriangleOutOfRange { triangle: 1, .. })
        ));
    }
}
