//! Parameter vector layout
//!
//! The host hands every hook the same flat parameter vector. Each index has a
//! fixed meaning; the constants below name the layout of the coupled model
//! and [`SymmetricLayout`] maps parameter indices onto covariance cells.

use nalgebra::RealField;

use crate::types::spaces::Covariance;
use crate::{ModelError, Result};

/// Intercepts of the three dynamic equations.
pub const INTERCEPTS: [usize; 3] = [0, 1, 2];

/// Weight of `x0` in the `x0` equation.
pub const COEF_X0_FROM_X0: usize = 3;
/// Weight of `x2` in the `x0` equation.
pub const COEF_X0_FROM_X2: usize = 4;
/// Weights of `x0`, `x1`, `x2` in the `x1` equation.
pub const COEFS_X1: [usize; 3] = [5, 6, 7];
/// Weights of `x0`, `x1`, `x2` in the `x2` equation.
pub const COEFS_X2: [usize; 3] = [8, 9, 10];

/// Process-noise entries, lower triangle of the 3x3 block then `(3, 3)`.
pub const PROCESS_NOISE: [(usize, usize, usize); 7] = [
    (0, 0, 11),
    (1, 0, 12),
    (2, 0, 13),
    (1, 1, 14),
    (2, 1, 15),
    (2, 2, 16),
    (3, 3, 17),
];

/// Initial means of `x0`, `x1`, `x2`.
pub const INITIAL_MEANS: [usize; 3] = [18, 19, 20];

/// Initial covariance entries, same cell order as [`PROCESS_NOISE`].
pub const INITIAL_COVARIANCE: [(usize, usize, usize); 7] = [
    (0, 0, 21),
    (1, 0, 22),
    (2, 0, 23),
    (1, 1, 24),
    (2, 1, 25),
    (2, 2, 26),
    (3, 3, 27),
];

/// Length of the coupled model's parameter vector.
pub const COUPLED_PARAMETER_COUNT: usize = 28;

/// Fails with [`ModelError::ParameterCount`] unless `params` holds at least `needed` entries.
#[inline]
pub fn require_len<T>(params: &[T], needed: usize) -> Result<()> {
    if params.len() < needed {
        return Err(ModelError::ParameterCount {
            expected: needed,
            got: params.len(),
        });
    }
    Ok(())
}

/// Maps parameter indices onto cells of an `N x N` symmetric matrix.
///
/// Each entry `(row, col, index)` names one cell; its mirror is implied.
/// Cells without an entry are zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymmetricLayout<const N: usize> {
    entries: Vec<(usize, usize, usize)>,
}

impl<const N: usize> SymmetricLayout<N> {
    /// Creates a layout, rejecting out-of-range cells and cells named twice
    /// (including through their mirror).
    pub fn new(entries: &[(usize, usize, usize)]) -> Result<Self> {
        let mut seen = Vec::with_capacity(entries.len());
        for &(row, col, _) in entries {
            if row >= N || col >= N {
                return Err(ModelError::ShapeMismatch {
                    what: "symmetric layout cell",
                    expected: N,
                    got: row.max(col) + 1,
                });
            }
            let cell = (row.max(col), row.min(col));
            if seen.contains(&cell) {
                return Err(ModelError::InvalidConfig {
                    reason: format!("covariance cell ({row}, {col}) is assigned twice"),
                });
            }
            seen.push(cell);
        }
        Ok(Self {
            entries: entries.to_vec(),
        })
    }

    /// Returns the layout entries.
    pub fn entries(&self) -> &[(usize, usize, usize)] {
        &self.entries
    }

    /// Minimum parameter vector length this layout reads from.
    pub fn required_len(&self) -> usize {
        self.entries
            .iter()
            .map(|&(_, _, index)| index + 1)
            .max()
            .unwrap_or(0)
    }

    /// Fills a covariance matrix from `params`.
    pub fn fill<T: RealField + Copy, Space>(&self, params: &[T]) -> Result<Covariance<T, N, Space>> {
        require_len(params, self.required_len())?;
        let mut cov = Covariance::zeros();
        for &(row, col, index) in &self.entries {
            cov.set_symmetric(row, col, params[index]);
        }
        Ok(cov)
    }
}
