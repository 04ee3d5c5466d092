use crate::color::ScalarMapper;
use crate::results::{CaseResults, PorosityModel, ResultKind, WellPipeVisibility};

/// The cell result currently selected for coloring, with everything needed
/// to look up its values.
#[derive(Clone, Copy)]
pub struct CellResultSlot<'a> {
    pub kind: ResultKind,
    /// Static results have one time step; every request reads step 0.
    pub is_static: bool,
    /// Index of the result in the porosity model's result set. Not needed
    /// for combined transmissibility.
    pub scalar_set_index: Option<usize>,
    pub porosity_model: PorosityModel,
    pub mapper: &'a dyn ScalarMapper,
    pub results: &'a CaseResults,
    pub wells: &'a dyn WellPipeVisibility,
}

impl<'a> CellResultSlot<'a> {
    /// Selects `result_name`, resolving its kind, set index and static flag
    /// once.
    #[must_use]
    pub fn new(
        result_name: &str,
        porosity_model: PorosityModel,
        mapper: &'a dyn ScalarMapper,
        results: &'a CaseResults,
        wells: &'a dyn WellPipeVisibility,
    ) -> Self {
        let kind = ResultKind::from_result_name(result_name);
        let cell_results = results.cell_results(porosity_model);
        let scalar_set_index = cell_results.find_scalar_result_index(result_name);
        let is_static = match kind {
            ResultKind::CombinedTransmissibility => true,
            ResultKind::Scalar => scalar_set_index
                .and_then(|idx| cell_results.result(idx))
                .is_some_and(crate::results::ScalarResult::is_static),
        };
        Self {
            kind,
            is_static,
            scalar_set_index,
            porosity_model,
            mapper,
            results,
            wells,
        }
    }

    /// The time step actually read when `requested` is asked for.
    #[must_use]
    pub fn result_time_step(&self, requested: usize) -> usize {
        if self.is_static {
            0
        } else {
            requested
        }
    }
}

impl std::fmt::Debug for CellResultSlot<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CellResultSlot")
            .field("kind", &self.kind)
            .field("is_static", &self.is_static)
            .field("scalar_set_index", &self.scalar_set_index)
            .field("porosity_model", &self.porosity_model)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::color::LinearScalarMapper;
    use crate::results::{ResultType, WellPipeTable, COMBINED_TRANSMISSIBILITY_RESULT_NAME};

    #[test]
    fn static_results_always_read_first_step() {
        let mut case = CaseResults::new();
        let results = case.cell_results_mut(PorosityModel::Matrix);
        results.add_empty_scalar_result(ResultType::Static, "PORO");
        results.add_empty_scalar_result(ResultType::Dynamic, "SOIL");
        let mapper = LinearScalarMapper::continuous(0.0, 1.0, Vec::new());
        let wells = WellPipeTable::default();

        let poro = CellResultSlot::new("PORO", PorosityModel::Matrix, &mapper, &case, &wells);
        assert!(poro.is_static);
        assert_eq!(poro.scalar_set_index, Some(0));
        assert_eq!(poro.result_time_step(5), 0);

        let soil = CellResultSlot::new("SOIL", PorosityModel::Matrix, &mapper, &case, &wells);
        assert!(!soil.is_static);
        assert_eq!(soil.result_time_step(5), 5);
    }

    #[test]
    fn combined_transmissibility_is_resolved_once() {
        let case = CaseResults::new();
        let mapper = LinearScalarMapper::continuous(0.0, 1.0, Vec::new());
        let wells = WellPipeTable::default();
        let slot = CellResultSlot::new(
            &COMBINED_TRANSMISSIBILITY_RESULT_NAME.to_uppercase(),
            PorosityModel::Matrix,
            &mapper,
            &case,
            &wells,
        );
        assert_eq!(slot.kind, ResultKind::CombinedTransmissibility);
        assert_eq!(slot.scalar_set_index, None);
    }
}
