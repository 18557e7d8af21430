//! Measurement models
//!
//! Describes how observed variables relate to the latent state:
//! y = H * x, where H is the (possibly regime- and parameter-dependent)
//! loading matrix.

use nalgebra::RealField;

use crate::types::regime::Regime;
use crate::types::spaces::{Measurement, StateVector};
use crate::types::transforms::ObservationMatrix;
use crate::{ModelError, Result};

/// Trait for linear measurement models.
pub trait MeasurementModel<T: RealField + Copy, const N: usize, const M: usize> {
    /// Returns the loading matrix at time index `t` under `regime`.
    fn loading_matrix(
        &self,
        t: usize,
        regime: Regime,
        params: &[T],
        covariates: &[T],
    ) -> Result<ObservationMatrix<T, M, N>>;

    /// Returns the loading matrix together with the predicted observation `H * x`.
    fn observe(
        &self,
        t: usize,
        regime: Regime,
        params: &[T],
        state: &StateVector<T, N>,
        covariates: &[T],
    ) -> Result<(ObservationMatrix<T, M, N>, Measurement<T, M>)> {
        let h = self.loading_matrix(t, regime, params, covariates)?;
        let y = h.observe(state);
        Ok((h, y))
    }
}

/// Observes `M` of the `N` latent variables directly, without noise scaling.
///
/// Row `i` of the loading matrix has a single one in column `observed[i]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartialIdentityLoading<const M: usize, const N: usize> {
    observed: [usize; M],
}

impl<const M: usize, const N: usize> PartialIdentityLoading<M, N> {
    /// Creates a loading that reads latent index `observed[i]` into observed row `i`.
    pub fn new(observed: [usize; M]) -> Result<Self> {
        if let Some(&bad) = observed.iter().find(|&&col| col >= N) {
            return Err(ModelError::ShapeMismatch {
                what: "observed latent index",
                expected: N,
                got: bad + 1,
            });
        }
        Ok(Self { observed })
    }

    /// Observes the first `M` latent variables.
    ///
    /// Returns an error if `M > N`.
    pub fn leading() -> Result<Self> {
        let mut observed = [0; M];
        for (i, o) in observed.iter_mut().enumerate() {
            *o = i;
        }
        Self::new(observed)
    }

    /// Latent index read by each observed row.
    pub fn observed(&self) -> &[usize; M] {
        &self.observed
    }
}

impl<T: RealField + Copy, const M: usize, const N: usize> MeasurementModel<T, N, M>
    for PartialIdentityLoading<M, N>
{
    fn loading_matrix(
        &self,
        _t: usize,
        _regime: Regime,
        _params: &[T],
        _covariates: &[T],
    ) -> Result<ObservationMatrix<T, M, N>> {
        let mut h = nalgebra::SMatrix::<T, M, N>::zeros();
        for (row, &col) in self.observed.iter().enumerate() {
            h[(row, col)] = T::one();
        }
        Ok(ObservationMatrix::from_matrix(h))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leading_partial_identity() {
        let loading = PartialIdentityLoading::<3, 4>::leading().unwrap();
        let h: ObservationMatrix<f64, 3, 4> =
            loading.loading_matrix(0, Regime::new(0), &[], &[]).unwrap();

        assert_eq!(
            h.as_matrix(),
            &nalgebra::matrix![
                1.0, 0.0, 0.0, 0.0;
                0.0, 1.0, 0.0, 0.0;
                0.0, 0.0, 1.0, 0.0
            ]
        );
    }

    #[test]
    fn test_observe_drops_latent_only_variable() {
        let loading = PartialIdentityLoading::<3, 4>::leading().unwrap();
        let state = StateVector::from_array([1.0, 2.0, 3.0, 4.0]);

        let (_, y) = loading.observe(0, Regime::new(0), &[], &state, &[]).unwrap();

        assert_eq!(y.as_slice(), &[1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_custom_selection() {
        let loading = PartialIdentityLoading::<2, 4>::new([3, 1]).unwrap();
        let state = StateVector::from_array([1.0, 2.0, 3.0, 4.0]);

        let (_, y) = loading.observe(5, Regime::new(0), &[], &state, &[]).unwrap();

        assert_eq!(y.as_slice(), &[4.0, 2.0]);
    }

    #[test]
    fn test_out_of_range_index_rejected() {
        let err = PartialIdentityLoading::<2, 3>::new([0, 3]).unwrap_err();
        assert_eq!(
            err,
            ModelError::ShapeMismatch {
                what: "observed latent index",
                expected: 3,
                got: 4
            }
        );
        assert!(PartialIdentityLoading::<4, 3>::leading().is_err());
    }
}
