use tracing::debug;

use super::{CellScalarAccessor, PorosityModel};

/// Origin of a scalar result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultType {
    Dynamic,
    Static,
    Input,
    Generated,
}

/// A named result with one value array per time step.
#[derive(Debug, Clone)]
pub struct ScalarResult {
    pub result_type: ResultType,
    pub name: String,
    pub values: Vec<Vec<f64>>,
}

impl ScalarResult {
    /// Static and input results have a single, time-invariant array.
    #[must_use]
    pub fn is_static(&self) -> bool {
        matches!(self.result_type, ResultType::Static | ResultType::Input)
    }
}

/// The scalar results of one porosity model.
#[derive(Debug, Clone, Default)]
pub struct CellResults {
    results: Vec<ScalarResult>,
}

impl CellResults {
    #[must_use]
    pub fn find_scalar_result_index(&self, name: &str) -> Option<usize> {
        self.results.iter().position(|r| r.name == name)
    }

    /// Adds an empty result, or returns the index of an existing one with
    /// the same name.
    pub fn add_empty_scalar_result(&mut self, result_type: ResultType, name: &str) -> usize {
        if let Some(idx) = self.find_scalar_result_index(name) {
            return idx;
        }
        self.results.push(ScalarResult {
            result_type,
            name: name.to_owned(),
            values: Vec::new(),
        });
        debug!(name, "added scalar result");
        self.results.len() - 1
    }

    /// Returns `name`, or `name_N` with the smallest `N` not yet in use.
    #[must_use]
    pub fn make_result_name_unique(&self, name: &str) -> String {
        if self.find_scalar_result_index(name).is_none() {
            return name.to_owned();
        }
        (1..)
            .map(|n| format!("{name}_{n}"))
            .find(|candidate| self.find_scalar_result_index(candidate).is_none())
            .unwrap_or_else(|| name.to_owned())
    }

    #[must_use]
    pub fn result(&self, index: usize) -> Option<&ScalarResult> {
        self.results.get(index)
    }

    pub fn cell_scalar_results_mut(&mut self, index: usize) -> Option<&mut Vec<Vec<f64>>> {
        self.results.get_mut(index).map(|r| &mut r.values)
    }

    #[must_use]
    pub fn result_count(&self) -> usize {
        self.results.len()
    }

    /// Accessor for `index` at `time_step`, if that array exists and is not
    /// empty.
    #[must_use]
    pub fn data_accessor(&self, index: usize, time_step: usize) -> Option<CellScalarAccessor<'_>> {
        let values = self.results.get(index)?.values.get(time_step)?;
        (!values.is_empty()).then(|| CellScalarAccessor::new(values))
    }
}

/// All scalar results of a case, split by porosity model.
///
/// Results are stored for the main grid only, indexed by global cell index.
#[derive(Debug, Clone, Default)]
pub struct CaseResults {
    matrix: CellResults,
    fracture: CellResults,
}

impl CaseResults {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn cell_results(&self, porosity: PorosityModel) -> &CellResults {
        match porosity {
            PorosityModel::Matrix => &self.matrix,
            PorosityModel::Fracture => &self.fracture,
        }
    }

    pub fn cell_results_mut(&mut self, porosity: PorosityModel) -> &mut CellResults {
        match porosity {
            PorosityModel::Matrix => &mut self.matrix,
            PorosityModel::Fracture => &mut self.fracture,
        }
    }

    /// Looks up the data of one result set at one time step of one grid.
    #[must_use]
    pub fn data_accessor(
        &self,
        grid_index: usize,
        porosity: PorosityModel,
        time_step: usize,
        scalar_set_index: usize,
    ) -> Option<CellScalarAccessor<'_>> {
        if grid_index != 0 {
            return None;
        }
        self.cell_results(porosity)
            .data_accessor(scalar_set_index, time_step)
    }

    /// Accessor for the first time step of a result looked up by name.
    #[must_use]
    pub fn static_accessor_by_name(
        &self,
        porosity: PorosityModel,
        name: &str,
    ) -> Option<CellScalarAccessor<'_>> {
        let results = self.cell_results(porosity);
        results.data_accessor(results.find_scalar_result_index(name)?, 0)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::results::ScalarDataAccessor;

    fn case_with_poro() -> (CaseResults, usize) {
        let mut case = CaseResults::new();
        let results = case.cell_results_mut(PorosityModel::Matrix);
        let idx = results.add_empty_scalar_result(ResultType::Input, "PORO");
        results
            .cell_scalar_results_mut(idx)
            .unwrap()
            .push(vec![0.1, 0.2, 0.3]);
        (case, idx)
    }

    #[test]
    fn add_existing_returns_same_index() {
        let mut results = CellResults::default();
        let a = results.add_empty_scalar_result(ResultType::Input, "PERMX");
        let b = results.add_empty_scalar_result(ResultType::Input, "PERMX");
        assert_eq!(a, b);
        assert_eq!(results.result_count(), 1);
    }

    #[test]
    fn unique_names_get_suffix() {
        let mut results = CellResults::default();
        results.add_empty_scalar_result(ResultType::Input, "PORO");
        results.add_empty_scalar_result(ResultType::Input, "PORO_1");
        assert_eq!(results.make_result_name_unique("PORO"), "PORO_2");
        assert_eq!(results.make_result_name_unique("NTG"), "NTG");
    }

    #[test]
    fn accessor_lookup() {
        let (case, idx) = case_with_poro();
        let acc = case
            .data_accessor(0, PorosityModel::Matrix, 0, idx)
            .unwrap();
        assert!((acc.value_at(2) - 0.3).abs() < f64::EPSILON);
        assert!(case.data_accessor(0, PorosityModel::Matrix, 1, idx).is_none());
        assert!(case.data_accessor(1, PorosityModel::Matrix, 0, idx).is_none());
        assert!(case.data_accessor(0, PorosityModel::Fracture, 0, idx).is_none());
    }

    #[test]
    fn input_results_are_static() {
        let (case, idx) = case_with_poro();
        let result = case.cell_results(PorosityModel::Matrix).result(idx).unwrap();
        assert!(result.is_static());
    }
}
