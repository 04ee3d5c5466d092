use tracing::debug;

use crate::error::{GridError, Result};
use crate::math::{Aabb, Point3, Vector3, TOLERANCE};

use super::{FaceType, GridTopology, NncConnection, NncData};

/// A corner-point grid with eight explicit corners per cell.
#[derive(Debug, Clone)]
pub struct MainGrid {
    ni: usize,
    nj: usize,
    nk: usize,
    nodes: Vec<Point3>,
    active: Vec<bool>,
    nnc: NncData,
    map_axes: Option<[f64; 6]>,
    display_model_offset: Vector3,
    face_normals_outwards: bool,
}

impl MainGrid {
    /// Creates a grid from `8 * ni * nj * nk` corner nodes in cell order.
    ///
    /// # Errors
    ///
    /// Returns an error if a dimension is zero or the node count is wrong.
    pub fn new(ni: usize, nj: usize, nk: usize, nodes: Vec<Point3>) -> Result<Self> {
        if ni == 0 || nj == 0 || nk == 0 {
            return Err(GridError::InvalidDimensions { ni, nj, nk }.into());
        }
        let cell_count = ni * nj * nk;
        if nodes.len() != 8 * cell_count {
            return Err(GridError::SizeMismatch {
                keyword: "nodes",
                expected: 8 * cell_count,
                actual: nodes.len(),
            }
            .into());
        }

        let bb = Aabb::from_points(&nodes);
        let mut grid = Self {
            ni,
            nj,
            nk,
            nodes,
            active: vec![true; cell_count],
            nnc: NncData::new(),
            map_axes: None,
            display_model_offset: bb.min.coords,
            face_normals_outwards: true,
        };
        grid.face_normals_outwards = grid.compute_face_normals_outwards();
        debug!(
            ni,
            nj,
            nk,
            outwards = grid.face_normals_outwards,
            "created main grid"
        );
        Ok(grid)
    }

    /// Creates an axis-aligned regular grid with `k` increasing along +z.
    ///
    /// # Errors
    ///
    /// Returns an error if a dimension is zero.
    pub fn regular(
        ni: usize,
        nj: usize,
        nk: usize,
        origin: Point3,
        cell_size: Vector3,
    ) -> Result<Self> {
        let mut nodes = Vec::with_capacity(8 * ni * nj * nk);
        for k in 0..nk {
            for j in 0..nj {
                for i in 0..ni {
                    #[allow(clippy::cast_precision_loss)]
                    let base = origin
                        + Vector3::new(
                            i as f64 * cell_size.x,
                            j as f64 * cell_size.y,
                            k as f64 * cell_size.z,
                        );
                    for dk in [0.0, 1.0] {
                        for (di, dj) in [(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)] {
                            nodes.push(
                                base + Vector3::new(
                                    di * cell_size.x,
                                    dj * cell_size.y,
                                    dk * cell_size.z,
                                ),
                            );
                        }
                    }
                }
            }
        }
        Self::new(ni, nj, nk, nodes)
    }

    /// Builds a grid from Eclipse corner-point keywords.
    ///
    /// `coord` holds `6 * (ni + 1) * (nj + 1)` pillar values (top xyz, bottom
    /// xyz) and `zcorn` holds `8 * ni * nj * nk` depths. Depths are converted
    /// to elevations (z = -depth), so K increases downwards.
    ///
    /// # Errors
    ///
    /// Returns an error if the keyword sizes do not match the dimensions.
    pub fn from_corner_point(
        ni: usize,
        nj: usize,
        nk: usize,
        coord: &[f64],
        zcorn: &[f64],
        actnum: Option<&[i32]>,
    ) -> Result<Self> {
        if ni == 0 || nj == 0 || nk == 0 {
            return Err(GridError::InvalidDimensions { ni, nj, nk }.into());
        }
        let pillar_count = (ni + 1) * (nj + 1);
        if coord.len() != 6 * pillar_count {
            return Err(GridError::SizeMismatch {
                keyword: "COORD",
                expected: 6 * pillar_count,
                actual: coord.len(),
            }
            .into());
        }
        let cell_count = ni * nj * nk;
        if zcorn.len() != 8 * cell_count {
            return Err(GridError::SizeMismatch {
                keyword: "ZCORN",
                expected: 8 * cell_count,
                actual: zcorn.len(),
            }
            .into());
        }
        if let Some(actnum) = actnum {
            if actnum.len() != cell_count {
                return Err(GridError::SizeMismatch {
                    keyword: "ACTNUM",
                    expected: cell_count,
                    actual: actnum.len(),
                }
                .into());
            }
        }

        let pillar_point = |pi: usize, pj: usize, depth: f64| -> Point3 {
            let p = 6 * (pj * (ni + 1) + pi);
            let (top, bottom) = (&coord[p..p + 3], &coord[p + 3..p + 6]);
            let dz = bottom[2] - top[2];
            let t = if dz.abs() < TOLERANCE { 0.0 } else { (depth - top[2]) / dz };
            Point3::new(
                top[0] + t * (bottom[0] - top[0]),
                top[1] + t * (bottom[1] - top[1]),
                -depth,
            )
        };

        let mut nodes = Vec::with_capacity(8 * cell_count);
        for k in 0..nk {
            for j in 0..nj {
                for i in 0..ni {
                    for dk in 0..2 {
                        for (di, dj) in [(0, 0), (1, 0), (1, 1), (0, 1)] {
                            let z_idx = k * 8 * ni * nj
                                + dk * 4 * ni * nj
                                + j * 4 * ni
                                + dj * 2 * ni
                                + i * 2
                                + di;
                            nodes.push(pillar_point(i + di, j + dj, zcorn[z_idx]));
                        }
                    }
                }
            }
        }

        let mut grid = Self::new(ni, nj, nk, nodes)?;
        if let Some(actnum) = actnum {
            grid.active = actnum.iter().map(|&a| a > 0).collect();
        }
        Ok(grid)
    }

    #[must_use]
    pub fn is_cell_active(&self, cell: usize) -> bool {
        self.active.get(cell).copied().unwrap_or(false)
    }

    #[must_use]
    pub fn active_cells(&self) -> &[bool] {
        &self.active
    }

    /// Registers a non-neighbor connection and returns its index.
    pub fn add_nnc(&mut self, connection: NncConnection) -> usize {
        self.nnc.push(connection)
    }

    pub fn set_map_axes(&mut self, map_axes: [f64; 6]) {
        self.map_axes = Some(map_axes);
    }

    #[must_use]
    pub fn map_axes(&self) -> Option<&[f64; 6]> {
        self.map_axes.as_ref()
    }

    #[must_use]
    pub fn bounding_box(&self) -> Aabb {
        Aabb::from_points(&self.nodes)
    }

    #[must_use]
    pub fn cell_center(&self, cell: usize) -> Option<Point3> {
        let corners = self.cell_corners(cell)?;
        let sum = corners.iter().fold(Vector3::zeros(), |acc, p| acc + p.coords);
        Some(Point3::from(sum / 8.0))
    }

    /// Checks the winding of the first non-degenerate cell's `PosI` face
    /// against the direction from the cell center to the face center.
    fn compute_face_normals_outwards(&self) -> bool {
        for cell in 0..self.cell_count() {
            let (Some(center), Some(face)) =
                (self.cell_center(cell), self.face_corners(cell, FaceType::PosI))
            else {
                continue;
            };
            let normal = (face[2] - face[0]).cross(&(face[3] - face[1]));
            let face_center = Point3::from(
                face.iter().fold(Vector3::zeros(), |acc, p| acc + p.coords) / 4.0,
            );
            let out = face_center - center;
            let dot = normal.dot(&out);
            if dot.abs() > TOLERANCE {
                return dot > 0.0;
            }
        }
        true
    }
}

impl GridTopology for MainGrid {
    fn cell_count_i(&self) -> usize {
        self.ni
    }

    fn cell_count_j(&self) -> usize {
        self.nj
    }

    fn cell_count_k(&self) -> usize {
        self.nk
    }

    fn grid_index(&self) -> usize {
        0
    }

    fn face_normals_outwards(&self) -> bool {
        self.face_normals_outwards
    }

    fn display_model_offset(&self) -> Vector3 {
        self.display_model_offset
    }

    fn cell_corners(&self, cell: usize) -> Option<[Point3; 8]> {
        let base = cell.checked_mul(8)?;
        let slice = self.nodes.get(base..base + 8)?;
        let mut corners = [Point3::origin(); 8];
        corners.copy_from_slice(slice);
        Some(corners)
    }

    fn nnc_data(&self) -> &NncData {
        &self.nnc
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn unit_grid(ni: usize, nj: usize, nk: usize) -> MainGrid {
        MainGrid::regular(ni, nj, nk, Point3::origin(), Vector3::new(1.0, 1.0, 1.0)).unwrap()
    }

    #[test]
    fn zero_dimension_is_rejected() {
        assert!(MainGrid::regular(0, 1, 1, Point3::origin(), Vector3::new(1.0, 1.0, 1.0)).is_err());
    }

    #[test]
    fn index_round_trip() {
        let grid = unit_grid(3, 4, 5);
        let cell = grid.cell_index(2, 1, 3).unwrap();
        assert_eq!(cell, 2 + 3 + 3 * 12);
        assert_eq!(grid.ijk_from_cell_index(cell), Some((2, 1, 3)));
        assert_eq!(grid.cell_index(3, 0, 0), None);
        assert_eq!(grid.ijk_from_cell_index(60), None);
    }

    #[test]
    fn neighbors_stay_inside_grid() {
        let grid = unit_grid(2, 2, 2);
        let origin_cell = grid.cell_index(0, 0, 0).unwrap();
        assert_eq!(grid.neighbor_cell(origin_cell, FaceType::NegI), None);
        assert_eq!(
            grid.neighbor_cell(origin_cell, FaceType::PosI),
            grid.cell_index(1, 0, 0)
        );
        assert_eq!(
            grid.neighbor_cell(origin_cell, FaceType::PosK),
            grid.cell_index(0, 0, 1)
        );
    }

    #[test]
    fn regular_grid_normals_point_outwards() {
        assert!(unit_grid(2, 1, 1).face_normals_outwards());
    }

    #[test]
    fn pos_i_face_lies_on_max_x() {
        let grid = unit_grid(1, 1, 1);
        let face = grid.face_corners(0, FaceType::PosI).unwrap();
        for p in face {
            assert_relative_eq!(p.x, 1.0);
        }
    }

    #[test]
    fn corner_point_depths_invert_normals() {
        // Single vertical pillar column, depth 1000..1010.
        let coord = [
            0.0, 0.0, 1000.0, 0.0, 0.0, 1010.0, //
            1.0, 0.0, 1000.0, 1.0, 0.0, 1010.0, //
            0.0, 1.0, 1000.0, 0.0, 1.0, 1010.0, //
            1.0, 1.0, 1000.0, 1.0, 1.0, 1010.0,
        ];
        let mut zcorn = vec![1000.0; 4];
        zcorn.extend([1010.0; 4]);
        let grid = MainGrid::from_corner_point(1, 1, 1, &coord, &zcorn, Some(&[1])).unwrap();
        let corners = grid.cell_corners(0).unwrap();
        assert_relative_eq!(corners[0].z, -1000.0);
        assert_relative_eq!(corners[6].z, -1010.0);
        assert_relative_eq!(corners[2].x, 1.0);
        assert!(!grid.face_normals_outwards());
        assert!(grid.is_cell_active(0));
    }

    #[test]
    fn corner_point_size_mismatch() {
        let result = MainGrid::from_corner_point(1, 1, 1, &[0.0; 23], &[0.0; 8], None);
        assert!(result.is_err());
    }

    #[test]
    fn display_offset_is_min_corner() {
        let grid =
            MainGrid::regular(1, 1, 1, Point3::new(10.0, 20.0, -5.0), Vector3::new(1.0, 1.0, 1.0))
                .unwrap();
        assert_relative_eq!(grid.display_model_offset(), Vector3::new(10.0, 20.0, -5.0));
    }
}
