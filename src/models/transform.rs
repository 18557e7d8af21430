//! Parameter transforms
//!
//! Maps the optimizer's unconstrained parameter vector, in place, onto the
//! constrained values the other components read.

use nalgebra::RealField;
use num_traits::Float;

use crate::types::params::require_len;
use crate::utils::logistic;
use crate::{ModelError, Result};

/// Trait for in-place parameter reparameterization.
pub trait ParameterTransform<T> {
    /// Transforms `params` in place.
    fn apply(&self, params: &mut [T]) -> Result<()>;
}

/// Leaves parameters untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityTransform;

impl<T> ParameterTransform<T> for IdentityTransform {
    fn apply(&self, _params: &mut [T]) -> Result<()> {
        Ok(())
    }
}

/// Constraint applied to a single parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Constraint<T> {
    /// `exp(x)`, in `(0, inf)`.
    Positive,
    /// `logistic(x)`, in `(0, 1)`.
    UnitInterval,
    /// `lower + (upper - lower) * logistic(x)`.
    Bounded {
        /// Lower bound.
        lower: T,
        /// Upper bound.
        upper: T,
    },
}

impl<T: Float> Constraint<T> {
    /// Maps an unconstrained value into the constrained range.
    #[inline]
    pub fn apply(&self, x: T) -> T {
        match *self {
            Constraint::Positive => x.exp(),
            Constraint::UnitInterval => logistic(x),
            Constraint::Bounded { lower, upper } => lower + (upper - lower) * logistic(x),
        }
    }
}

/// Applies per-index constraints.
///
/// Noise covariance entries should not be listed here: the host applies its
/// own encoding to those (see [`NoiseEncoding`](crate::models::NoiseEncoding)).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ConstrainedTransform<T> {
    rules: Vec<(usize, Constraint<T>)>,
}

impl<T: RealField + Float + Copy> ConstrainedTransform<T> {
    /// Creates a transform with no rules.
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// Adds a rule for parameter `index`.
    ///
    /// Fails if `index` already has a rule or a bounded rule has `lower >= upper`.
    pub fn with_rule(mut self, index: usize, constraint: Constraint<T>) -> Result<Self> {
        if self.rules.iter().any(|&(i, _)| i == index) {
            return Err(ModelError::InvalidConfig {
                reason: format!("parameter {index} already has a constraint"),
            });
        }
        if let Constraint::Bounded { lower, upper } = constraint {
            if Float::is_nan(lower) || Float::is_nan(upper) || lower >= upper {
                return Err(ModelError::InvalidConfig {
                    reason: format!("parameter {index}: lower bound must be below upper bound"),
                });
            }
        }
        self.rules.push((index, constraint));
        Ok(self)
    }

    /// Registered rules.
    pub fn rules(&self) -> &[(usize, Constraint<T>)] {
        &self.rules
    }
}

impl<T: RealField + Float + Copy> ParameterTransform<T> for ConstrainedTransform<T> {
    fn apply(&self, params: &mut [T]) -> Result<()> {
        let needed = self.rules.iter().map(|&(i, _)| i + 1).max().unwrap_or(0);
        require_len(params, needed)?;
        for &(index, constraint) in &self.rules {
            params[index] = constraint.apply(params[index]);
        }
        Ok(())
    }
}
