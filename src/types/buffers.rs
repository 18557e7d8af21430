//! Initial-condition buffers
//!
//! The host allocates the initial-condition outputs and hands them over by
//! mutable reference. Sizing is implied by the buffers themselves:
//!
//! - one probability vector per unit, each of length `R`
//! - one mean buffer per regime, holding all units back to back (`units * N`)
//! - one covariance per regime

use nalgebra::{DVector, RealField, Scalar};

use super::regime::RegimeProbabilities;
use super::spaces::StateCovariance;
use crate::config::ModelConfig;
use crate::{ModelError, Result};

/// Counts derived from initial-condition buffer shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InitialShape {
    /// Number of regimes.
    pub regimes: usize,
    /// Number of units.
    pub units: usize,
}

/// Borrowed initial-condition outputs.
#[derive(Debug)]
pub struct InitialConditionBuffers<'a, T: Scalar, const N: usize> {
    /// Regime probabilities, one vector per unit.
    pub probabilities: &'a mut [RegimeProbabilities<T>],
    /// Initial means, one concatenated buffer per regime.
    pub means: &'a mut [DVector<T>],
    /// Initial covariances, one per regime.
    pub covariances: &'a mut [StateCovariance<T, N>],
}

impl<'a, T: Scalar, const N: usize> InitialConditionBuffers<'a, T, N> {
    /// Wraps host-owned buffers.
    pub fn new(
        probabilities: &'a mut [RegimeProbabilities<T>],
        means: &'a mut [DVector<T>],
        covariances: &'a mut [StateCovariance<T, N>],
    ) -> Self {
        Self {
            probabilities,
            means,
            covariances,
        }
    }

    /// Derives the regime and unit counts and checks every buffer agrees.
    ///
    /// Regimes come from the first probability vector's length and units from
    /// the first mean buffer's length divided by `N`.
    pub fn shape(&self) -> Result<InitialShape> {
        let regimes = match self.probabilities.first() {
            Some(p) => p.len(),
            None => {
                return Err(ModelError::ShapeMismatch {
                    what: "regime probability vectors",
                    expected: 1,
                    got: 0,
                })
            }
        };
        let first_mean = self.means.first().map_or(0, |m| m.len());
        if N == 0 || first_mean % N != 0 {
            return Err(ModelError::ShapeMismatch {
                what: "initial mean buffer length",
                expected: (first_mean / N.max(1) + 1) * N,
                got: first_mean,
            });
        }
        let units = first_mean / N;

        check("initial mean buffers", regimes, self.means.len())?;
        check("initial covariances", regimes, self.covariances.len())?;
        check("regime probability vectors", units, self.probabilities.len())?;
        for p in self.probabilities.iter() {
            check("regime probability vector length", regimes, p.len())?;
        }
        for m in self.means.iter() {
            check("initial mean buffer length", units * N, m.len())?;
        }

        Ok(InitialShape { regimes, units })
    }
}

fn check(what: &'static str, expected: usize, got: usize) -> Result<()> {
    if expected != got {
        return Err(ModelError::ShapeMismatch {
            what,
            expected,
            got,
        });
    }
    Ok(())
}

/// Owned initial-condition buffers sized from a [`ModelConfig`].
#[derive(Debug, Clone, PartialEq)]
pub struct InitialConditionStorage<T: Scalar, const N: usize> {
    /// Regime probabilities, one vector per unit.
    pub probabilities: Vec<RegimeProbabilities<T>>,
    /// Initial means, one concatenated buffer per regime.
    pub means: Vec<DVector<T>>,
    /// Initial covariances, one per regime.
    pub covariances: Vec<StateCovariance<T, N>>,
}

impl<T: RealField + Copy, const N: usize> InitialConditionStorage<T, N> {
    /// Allocates zeroed buffers for `config`.
    pub fn allocate(config: &ModelConfig) -> Self {
        let regimes = config.num_regimes();
        let units = config.num_units();
        Self {
            probabilities: vec![DVector::zeros(regimes); units],
            means: vec![DVector::zeros(units * N); regimes],
            covariances: vec![StateCovariance::zeros(); regimes],
        }
    }

    /// Borrows the storage as host buffers.
    pub fn buffers(&mut self) -> InitialConditionBuffers<'_, T, N> {
        InitialConditionBuffers::new(&mut self.probabilities, &mut self.means, &mut self.covariances)
    }

    /// Initial mean of `unit` under `regime`, if both are in range.
    pub fn mean(&self, regime: usize, unit: usize) -> Option<&[T]> {
        let buffer = self.means.get(regime)?;
        buffer.as_slice().get(unit * N..(unit + 1) * N)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allocated_shape() {
        let config = ModelConfig::new().with_num_regimes(2).with_num_units(3);
        let mut storage = InitialConditionStorage::<f64, 4>::allocate(&config);

        let shape = storage.buffers().shape().unwrap();

        assert_eq!(shape, InitialShape { regimes: 2, units: 3 });
        assert_eq!(storage.means[0].len(), 12);
        assert_eq!(storage.mean(1, 2).map(|m| m.len()), Some(4));
        assert!(storage.mean(2, 0).is_none());
        assert!(storage.mean(0, 3).is_none());
    }

    #[test]
    fn test_ragged_mean_buffer_rejected() {
        let mut probabilities = vec![DVector::<f64>::zeros(1)];
        let mut means = vec![DVector::<f64>::zeros(7)];
        let mut covariances = vec![StateCovariance::<f64, 4>::zeros()];
        let buffers = InitialConditionBuffers::new(&mut probabilities, &mut means, &mut covariances);

        let err = buffers.shape().unwrap_err();
        assert_eq!(
            err,
            ModelError::ShapeMismatch {
                what: "initial mean buffer length",
                expected: 8,
                got: 7
            }
        );
    }

    #[test]
    fn test_unit_count_disagreement_rejected() {
        let mut probabilities = vec![DVector::<f64>::zeros(1); 3];
        let mut means = vec![DVector::<f64>::zeros(8)];
        let mut covariances = vec![StateCovariance::<f64, 4>::zeros()];
        let buffers = InitialConditionBuffers::new(&mut probabilities, &mut means, &mut covariances);

        let err = buffers.shape().unwrap_err();
        assert_eq!(
            err,
            ModelError::ShapeMismatch {
                what: "regime probability vectors",
                expected: 2,
                got: 3
            }
        );
    }

    #[test]
    fn test_missing_covariance_rejected() {
        let mut probabilities = vec![DVector::<f64>::zeros(2)];
        let mut means = vec![DVector::<f64>::zeros(4); 2];
        let mut covariances = vec![StateCovariance::<f64, 4>::zeros()];
        let buffers = InitialConditionBuffers::new(&mut probabilities, &mut means, &mut covariances);

        assert_eq!(
            buffers.shape().unwrap_err(),
            ModelError::ShapeMismatch {
                what: "initial covariances",
                expected: 2,
                got: 1
            }
        );
    }

    #[test]
    fn test_empty_probabilities_rejected() {
        let mut probabilities: Vec<DVector<f64>> = Vec::new();
        let mut means = vec![DVector::<f64>::zeros(4)];
        let mut covariances = vec![StateCovariance::<f64, 4>::zeros()];
        let buffers = InitialConditionBuffers::new(&mut probabilities, &mut means, &mut covariances);

        assert!(buffers.shape().is_err());
    }
}
