mod case_results;
mod transmissibility;
mod wells;

pub use case_results::{CaseResults, CellResults, ResultType, ScalarResult};
pub use transmissibility::CombinedTransmissibilityAccessor;
pub use wells::{WellPipeTable, WellPipeVisibility};

/// Reserved name of the pseudo-result built from `TRANX`, `TRANY`, `TRANZ`.
pub const COMBINED_TRANSMISSIBILITY_RESULT_NAME: &str = "Combined Transmissibility";

/// Value stored for cells that have no result.
pub const UNDEFINED_VALUE: f64 = f64::INFINITY;

/// Returns `true` for the undefined sentinel and for NaN.
#[must_use]
pub fn is_undefined(value: f64) -> bool {
    value == UNDEFINED_VALUE || value.is_nan()
}

/// Porosity model of a dual-porosity case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PorosityModel {
    #[default]
    Matrix,
    Fracture,
}

/// How a selected result is turned into colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultKind {
    /// One scalar per cell.
    Scalar,
    /// Per-face transmissibility assembled from `TRANX`, `TRANY` and `TRANZ`.
    CombinedTransmissibility,
}

impl ResultKind {
    /// Resolves the kind of a result from its variable name.
    #[must_use]
    pub fn from_result_name(name: &str) -> Self {
        if name.eq_ignore_ascii_case(COMBINED_TRANSMISSIBILITY_RESULT_NAME) {
            Self::CombinedTransmissibility
        } else {
            Self::Scalar
        }
    }
}

/// Per-cell scalar lookup for one result at one time step.
pub trait ScalarDataAccessor {
    /// The value of `cell`, or [`UNDEFINED_VALUE`].
    fn value_at(&self, cell: usize) -> f64;
}

/// A [`ScalarDataAccessor`] over a slice of values indexed by cell.
#[derive(Debug, Clone, Copy)]
pub struct CellScalarAccessor<'a> {
    values: &'a [f64],
}

impl<'a> CellScalarAccessor<'a> {
    #[must_use]
    pub fn new(values: &'a [f64]) -> Self {
        Self { values }
    }
}

impl ScalarDataAccessor for CellScalarAccessor<'_> {
    fn value_at(&self, cell: usize) -> f64 {
        self.values.get(cell).copied().unwrap_or(UNDEFINED_VALUE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn combined_transmissibility_name_is_case_insensitive() {
        assert_eq!(
            ResultKind::from_result_name("combined TRANSMISSIBILITY"),
            ResultKind::CombinedTransmissibility
        );
        assert_eq!(ResultKind::from_result_name("PORO"), ResultKind::Scalar);
    }

    #[test]
    fn accessor_out_of_range_is_undefined() {
        let values = [1.0, 2.0];
        let acc = CellScalarAccessor::new(&values);
        assert!((acc.value_at(1) - 2.0).abs() < f64::EPSILON);
        assert!(is_undefined(acc.value_at(2)));
        assert!(is_undefined(f64::NAN));
    }
}
