//! Initial condition models
//!
//! Seeds the filter at the start of each unit: regime occupancy logits,
//! initial latent mean, and initial latent covariance.

use nalgebra::RealField;
use num_traits::Float;

use crate::types::params::{require_len, SymmetricLayout};
use crate::types::regime::Regime;
use crate::types::spaces::{StateCovariance, StateVector};
use crate::{ModelError, Result};

/// Starting value of the latent coupling coefficient in the coupled model.
pub const COUPLING_INITIAL_VALUE: f64 = -0.712563008706848;

/// Trait for initial condition models.
pub trait InitialConditionModel<T: RealField, const N: usize> {
    /// Returns the initial latent mean of `unit` under `regime`.
    fn initial_mean(
        &self,
        regime: Regime,
        unit: usize,
        params: &[T],
        covariates: &[T],
    ) -> Result<StateVector<T, N>>;

    /// Returns the initial latent covariance under `regime`.
    fn initial_covariance(&self, regime: Regime, params: &[T]) -> Result<StateCovariance<T, N>>;

    /// Writes the regime-occupancy logits of `unit` into `logits`, one per regime.
    fn initial_logits(&self, unit: usize, params: &[T], covariates: &[T], logits: &mut [T]) -> Result<()>;
}

/// Where one entry of the initial mean comes from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MeanSource<T> {
    /// Read from the parameter vector at this index.
    Parameter(usize),
    /// A structural constant.
    Fixed(T),
}

/// Initial condition read from the parameter vector.
///
/// Every unit and regime shares the same mean and covariance. Regime logits
/// are a baseline (1 for the first regime, 0 for the rest) plus per-regime
/// intercepts, which default to zero; with those defaults the occupancy split
/// does not depend on the parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterizedInitialCondition<T, const N: usize> {
    mean: [MeanSource<T>; N],
    covariance: SymmetricLayout<N>,
    logit_intercepts: Vec<T>,
}

impl<T: RealField + Float + Copy, const N: usize> ParameterizedInitialCondition<T, N> {
    /// Creates an initial condition model.
    pub fn new(mean: [MeanSource<T>; N], covariance: SymmetricLayout<N>) -> Self {
        Self {
            mean,
            covariance,
            logit_intercepts: Vec::new(),
        }
    }

    /// Sets additive per-regime logit intercepts.
    pub fn with_logit_intercepts(mut self, intercepts: Vec<T>) -> Self {
        self.logit_intercepts = intercepts;
        self
    }

    /// Mean entry sources.
    pub fn mean_sources(&self) -> &[MeanSource<T>; N] {
        &self.mean
    }

    fn required_len(&self) -> usize {
        let mean_len = self
            .mean
            .iter()
            .filter_map(|source| match source {
                MeanSource::Parameter(index) => Some(index + 1),
                MeanSource::Fixed(_) => None,
            })
            .max()
            .unwrap_or(0);
        mean_len.max(self.covariance.required_len())
    }
}

impl<T: RealField + Float + Copy, const N: usize> InitialConditionModel<T, N>
    for ParameterizedInitialCondition<T, N>
{
    fn initial_mean(
        &self,
        _regime: Regime,
        _unit: usize,
        params: &[T],
        _covariates: &[T],
    ) -> Result<StateVector<T, N>> {
        require_len(params, self.required_len())?;
        let mut mean = [T::zero(); N];
        for (m, source) in mean.iter_mut().zip(&self.mean) {
            *m = match *source {
                MeanSource::Parameter(index) => params[index],
                MeanSource::Fixed(value) => value,
            };
        }
        Ok(StateVector::from_array(mean))
    }

    fn initial_covariance(&self, _regime: Regime, params: &[T]) -> Result<StateCovariance<T, N>> {
        self.covariance.fill(params)
    }

    fn initial_logits(&self, _unit: usize, _params: &[T], _covariates: &[T], logits: &mut [T]) -> Result<()> {
        if !self.logit_intercepts.is_empty() && self.logit_intercepts.len() != logits.len() {
            return Err(ModelError::ShapeMismatch {
                what: "regime logit intercepts",
                expected: logits.len(),
                got: self.logit_intercepts.len(),
            });
        }
        for (r, logit) in logits.iter_mut().enumerate() {
            let baseline = if r == 0 { T::one() } else { T::zero() };
            let intercept = self.logit_intercepts.get(r).copied().unwrap_or_else(T::zero);
            *logit = baseline + intercept;
        }
        Ok(())
    }
}
