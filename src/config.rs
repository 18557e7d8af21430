//! Model configuration.
//!
//! Sizing the host negotiates out of band (regime count, unit count,
//! parameter count) is stated here once and validated when a
//! [`SwitchingModel`](crate::model::SwitchingModel) is built, instead of being
//! re-derived from buffer shapes on every call.

use crate::types::params::COUPLED_PARAMETER_COUNT;
use crate::{ModelError, Result};

/// Which softmax the initial-condition hook uses for regime probabilities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SoftmaxKind {
    /// Exponentiate and normalize, no max shift.
    #[default]
    Plain,
    /// Subtract the largest logit first; safe for large logits.
    MaxShifted,
}

/// Configuration for a switching model.
///
/// # Example
///
/// ```
/// use regime_ssm::config::{ModelConfig, SoftmaxKind};
///
/// let config = ModelConfig::new()
///     .with_num_units(12)
///     .with_softmax(SoftmaxKind::MaxShifted);
///
/// assert!(config.validate().is_ok());
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct ModelConfig {
    num_regimes: usize,
    num_units: usize,
    num_parameters: usize,
    softmax: SoftmaxKind,
    check_finite: bool,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl ModelConfig {
    /// Creates a configuration with defaults.
    ///
    /// Defaults: one regime, one unit, the coupled model's 28 parameters,
    /// plain softmax, finite-output checks on.
    pub fn new() -> Self {
        Self {
            num_regimes: 1,
            num_units: 1,
            num_parameters: COUPLED_PARAMETER_COUNT,
            softmax: SoftmaxKind::Plain,
            check_finite: true,
        }
    }

    /// Sets the number of regimes.
    pub fn with_num_regimes(mut self, n: usize) -> Self {
        self.num_regimes = n;
        self
    }

    /// Sets the number of units (subjects).
    pub fn with_num_units(mut self, n: usize) -> Self {
        self.num_units = n;
        self
    }

    /// Sets the expected parameter vector length.
    pub fn with_num_parameters(mut self, n: usize) -> Self {
        self.num_parameters = n;
        self
    }

    /// Sets the softmax variant.
    pub fn with_softmax(mut self, softmax: SoftmaxKind) -> Self {
        self.softmax = softmax;
        self
    }

    /// Enables or disables rejection of non-finite hook outputs.
    ///
    /// Covers every hook output, regime probabilities included. When off,
    /// non-finite values are written through to the host buffers.
    pub fn with_check_finite(mut self, check: bool) -> Self {
        self.check_finite = check;
        self
    }

    // --- Accessors ---

    /// Returns the number of regimes.
    pub fn num_regimes(&self) -> usize {
        self.num_regimes
    }

    /// Returns the number of units.
    pub fn num_units(&self) -> usize {
        self.num_units
    }

    /// Returns the expected parameter vector length.
    pub fn num_parameters(&self) -> usize {
        self.num_parameters
    }

    /// Returns the softmax variant.
    pub fn softmax(&self) -> SoftmaxKind {
        self.softmax
    }

    /// Returns whether non-finite outputs are rejected.
    pub fn check_finite(&self) -> bool {
        self.check_finite
    }

    /// Validates this configuration.
    ///
    /// All counts must be positive.
    #[tracing::instrument(level = "debug", skip(self), fields(regimes = self.num_regimes, units = self.num_units))]
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("num_regimes", self.num_regimes),
            ("num_units", self.num_units),
            ("num_parameters", self.num_parameters),
        ] {
            if value == 0 {
                return Err(ModelError::InvalidConfig {
                    reason: format!("{name} must be positive"),
                });
            }
        }
        Ok(())
    }
}
