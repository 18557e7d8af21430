//! Regime-switching (Markov transition) models

use nalgebra::RealField;

use crate::types::regime::RegimeSwitchMatrix;
use crate::{ModelError, Result};

/// Trait for the discrete regime transition matrix.
///
/// Fills an `R x R` row-stochastic matrix. `kind` is a host-defined
/// transition type tag; [`StaticRegimes`] ignores it.
pub trait RegimeSwitchModel<T: RealField> {
    /// Writes the transition probabilities at time index `t` into `out`.
    fn transition_probabilities(
        &self,
        t: usize,
        kind: usize,
        params: &[T],
        covariates: &[T],
        out: &mut RegimeSwitchMatrix<T>,
    ) -> Result<()>;
}

/// Regimes never switch: every regime maps to itself with probability one.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticRegimes;

impl<T: RealField> RegimeSwitchModel<T> for StaticRegimes {
    fn transition_probabilities(
        &self,
        _t: usize,
        _kind: usize,
        _params: &[T],
        _covariates: &[T],
        out: &mut RegimeSwitchMatrix<T>,
    ) -> Result<()> {
        if out.nrows() != out.ncols() {
            return Err(ModelError::ShapeMismatch {
                what: "regime switch matrix columns",
                expected: out.nrows(),
                got: out.ncols(),
            });
        }
        out.fill_with_identity();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::DMatrix;

    #[test]
    fn test_static_regimes_identity() {
        let mut out = DMatrix::from_element(3, 3, 0.5_f64);
        StaticRegimes
            .transition_probabilities(4, 0, &[1.0, 2.0], &[], &mut out)
            .unwrap();
        assert_eq!(out, DMatrix::identity(3, 3));
    }

    #[test]
    fn test_transition_kind_ignored() {
        let mut within = DMatrix::from_element(2, 2, 0.5_f64);
        let mut at_start = DMatrix::from_element(2, 2, 0.5_f64);
        StaticRegimes
            .transition_probabilities(3, 0, &[], &[], &mut within)
            .unwrap();
        StaticRegimes
            .transition_probabilities(3, 7, &[], &[], &mut at_start)
            .unwrap();
        assert_eq!(within, at_start);
    }

    #[test]
    fn test_non_square_rejected() {
        let mut out = DMatrix::<f64>::zeros(2, 3);
        let err = StaticRegimes
            .transition_probabilities(0, 0, &[], &[], &mut out)
            .unwrap_err();
        assert!(matches!(err, ModelError::ShapeMismatch { .. }));
    }
}
