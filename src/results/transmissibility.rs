use crate::grid::{FaceType, GridTopology};

use super::{CaseResults, CellScalarAccessor, PorosityModel, ScalarDataAccessor, UNDEFINED_VALUE};

/// Per-face transmissibility built from the `TRANX`, `TRANY` and `TRANZ`
/// cell results.
///
/// A cell's `TRANX` value describes the connection across its `PosI` face,
/// so the value of a `NegI` face is read from the neighbor in -I.
pub struct CombinedTransmissibilityAccessor<'a, G: GridTopology> {
    grid: &'a G,
    tran_x: Option<CellScalarAccessor<'a>>,
    tran_y: Option<CellScalarAccessor<'a>>,
    tran_z: Option<CellScalarAccessor<'a>>,
}

impl<'a, G: GridTopology> CombinedTransmissibilityAccessor<'a, G> {
    /// Looks up the three transmissibility results. Missing ones read as
    /// undefined.
    #[must_use]
    pub fn new(grid: &'a G, results: &'a CaseResults, porosity: PorosityModel) -> Self {
        Self {
            grid,
            tran_x: results.static_accessor_by_name(porosity, "TRANX"),
            tran_y: results.static_accessor_by_name(porosity, "TRANY"),
            tran_z: results.static_accessor_by_name(porosity, "TRANZ"),
        }
    }

    /// Transmissibility across `face` of `cell`.
    #[must_use]
    pub fn cell_face_value(&self, cell: usize, face: FaceType) -> f64 {
        let accessor = match face {
            FaceType::PosI | FaceType::NegI => self.tran_x.as_ref(),
            FaceType::PosJ | FaceType::NegJ => self.tran_y.as_ref(),
            FaceType::PosK | FaceType::NegK => self.tran_z.as_ref(),
        };
        let Some(accessor) = accessor else {
            return UNDEFINED_VALUE;
        };

        match face {
            FaceType::PosI | FaceType::PosJ | FaceType::PosK => accessor.value_at(cell),
            FaceType::NegI | FaceType::NegJ | FaceType::NegK => self
                .grid
                .neighbor_cell(cell, face)
                .map_or(UNDEFINED_VALUE, |neighbor| accessor.value_at(neighbor)),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::grid::MainGrid;
    use crate::math::{Point3, Vector3};
    use crate::results::{is_undefined, ResultType};

    fn setup() -> (MainGrid, CaseResults) {
        let grid =
            MainGrid::regular(2, 1, 1, Point3::origin(), Vector3::new(1.0, 1.0, 1.0)).unwrap();
        let mut case = CaseResults::new();
        let results = case.cell_results_mut(PorosityModel::Matrix);
        let idx = results.add_empty_scalar_result(ResultType::Static, "TRANX");
        results
            .cell_scalar_results_mut(idx)
            .unwrap()
            .push(vec![10.0, 20.0]);
        (grid, case)
    }

    #[test]
    fn positive_face_reads_own_cell() {
        let (grid, case) = setup();
        let acc = CombinedTransmissibilityAccessor::new(&grid, &case, PorosityModel::Matrix);
        assert!((acc.cell_face_value(0, FaceType::PosI) - 10.0).abs() < f64::EPSILON);
    }

    #[test]
    fn negative_face_reads_neighbor() {
        let (grid, case) = setup();
        let acc = CombinedTransmissibilityAccessor::new(&grid, &case, PorosityModel::Matrix);
        assert!((acc.cell_face_value(1, FaceType::NegI) - 10.0).abs() < f64::EPSILON);
        assert!(is_undefined(acc.cell_face_value(0, FaceType::NegI)));
    }

    #[test]
    fn missing_result_is_undefined() {
        let (grid, case) = setup();
        let acc = CombinedTransmissibilityAccessor::new(&grid, &case, PorosityModel::Matrix);
        assert!(is_undefined(acc.cell_face_value(0, FaceType::PosJ)));
    }
}
