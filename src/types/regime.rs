//! Regime tags and regime-level containers

use ::core::fmt;

use nalgebra::{DMatrix, DVector};

/// Discrete regime tag in `0..num_regimes`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Regime(usize);

impl Regime {
    /// Creates a regime tag.
    #[inline]
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    /// Returns the tag as a zero-based index.
    #[inline]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl From<usize> for Regime {
    #[inline]
    fn from(index: usize) -> Self {
        Self(index)
    }
}

impl fmt::Display for Regime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Markov transition matrix between regimes, `R x R`.
///
/// Entry `(i, j)` is the probability of moving from regime `i` to regime `j`.
pub type RegimeSwitchMatrix<T> = DMatrix<T>;

/// Regime occupancy probabilities for one unit, length `R`.
pub type RegimeProbabilities<T> = DVector<T>;
