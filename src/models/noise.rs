//! Noise covariance models
//!
//! Supplies the process-noise covariance (latent space) and the
//! observation-noise covariance (observed space) for a regime.
//!
//! # Encoding
//!
//! Each covariance declares how the host reads its diagonal:
//!
//! - observation noise defaults to [`NoiseEncoding::LogVariance`]: the host
//!   exponentiates diagonal entries, so [`LOG_NEAR_ZERO_VARIANCE`] stands for
//!   a variance of `1e-6`, i.e. near-noiseless observation
//! - process noise defaults to [`NoiseEncoding::Variance`]: entries are the
//!   covariance itself, taken from the parameter vector
//!
//! Off-diagonal entries are never encoded; they are covariances as written.

use nalgebra::RealField;
use num_traits::Float;

use crate::types::params::SymmetricLayout;
use crate::types::regime::Regime;
use crate::types::spaces::{MeasurementCovariance, StateCovariance};
use crate::Result;

/// `ln(1e-6)`: log-variance of a near-zero observation noise.
pub const LOG_NEAR_ZERO_VARIANCE: f64 = -13.8155105579643;

/// How the host interprets the diagonal entries of a noise covariance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NoiseEncoding {
    /// Diagonal entries are log-variances.
    #[default]
    LogVariance,
    /// Diagonal entries are variances.
    Variance,
}

impl NoiseEncoding {
    /// Converts an encoded diagonal entry to a variance.
    ///
    /// Off-diagonal entries pass through unchanged under either encoding.
    #[inline]
    pub fn decode<T: Float>(self, value: T) -> T {
        match self {
            NoiseEncoding::LogVariance => value.exp(),
            NoiseEncoding::Variance => value,
        }
    }

    /// Converts a variance to its encoded diagonal entry.
    #[inline]
    pub fn encode<T: Float>(self, variance: T) -> T {
        match self {
            NoiseEncoding::LogVariance => variance.ln(),
            NoiseEncoding::Variance => variance,
        }
    }
}

/// Trait for regime-conditional noise covariances.
pub trait NoiseModel<T: RealField, const N: usize, const M: usize> {
    /// Returns the observation-noise covariance.
    fn observation_noise(
        &self,
        t: usize,
        regime: Regime,
        params: &[T],
    ) -> Result<MeasurementCovariance<T, M>>;

    /// Returns the process-noise covariance.
    fn process_noise(&self, t: usize, regime: Regime, params: &[T]) -> Result<StateCovariance<T, N>>;

    /// Encoding of the observation-noise diagonal.
    fn observation_encoding(&self) -> NoiseEncoding {
        NoiseEncoding::LogVariance
    }

    /// Encoding of the process-noise diagonal.
    fn process_encoding(&self) -> NoiseEncoding {
        NoiseEncoding::Variance
    }
}

/// Process noise read from the parameter vector, observation noise fixed.
///
/// The same covariances apply in every regime. Process entries are raw
/// covariances; the observation diagonal is encoded per
/// [`NoiseModel::observation_encoding`].
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterizedNoise<T, const N: usize, const M: usize> {
    process: SymmetricLayout<N>,
    observation_diagonal: T,
    observation_encoding: NoiseEncoding,
}

impl<T: RealField + Float + Copy, const N: usize, const M: usize> ParameterizedNoise<T, N, M> {
    /// Creates a noise model with the given process-noise layout and a
    /// constant encoded value on every observation diagonal entry.
    pub fn new(process: SymmetricLayout<N>, observation_diagonal: T) -> Self {
        Self {
            process,
            observation_diagonal,
            observation_encoding: NoiseEncoding::LogVariance,
        }
    }

    /// Observation noise of `1e-6` variance under log-variance encoding.
    pub fn near_noiseless(process: SymmetricLayout<N>) -> Self {
        Self::new(process, nalgebra::convert(LOG_NEAR_ZERO_VARIANCE))
    }

    /// Overrides the declared encoding of the observation diagonal.
    pub fn with_observation_encoding(mut self, encoding: NoiseEncoding) -> Self {
        self.observation_encoding = encoding;
        self
    }

    /// Process-noise layout.
    pub fn process_layout(&self) -> &SymmetricLayout<N> {
        &self.process
    }

    /// Encoded observation diagonal value.
    pub fn observation_diagonal(&self) -> T {
        self.observation_diagonal
    }
}

impl<T: RealField + Float + Copy, const N: usize, const M: usize> NoiseModel<T, N, M>
    for ParameterizedNoise<T, N, M>
{
    fn observation_noise(
        &self,
        _t: usize,
        _regime: Regime,
        _params: &[T],
    ) -> Result<MeasurementCovariance<T, M>> {
        Ok(MeasurementCovariance::from_diagonal(
            &nalgebra::SVector::<T, M>::repeat(self.observation_diagonal),
        ))
    }

    fn process_noise(&self, _t: usize, _regime: Regime, params: &[T]) -> Result<StateCovariance<T, N>> {
        self.process.fill(params)
    }

    fn observation_encoding(&self) -> NoiseEncoding {
        self.observation_encoding
    }
}
