//! Space-tagged vectors and covariances
//!
//! Latent-state quantities and observed quantities live in different spaces;
//! the marker parameter keeps them from being mixed up at the hook boundary.

use ::core::marker::PhantomData;
use ::core::ops::{Add, Sub};
use nalgebra::{RealField, SMatrix, SVector, Scalar};

/// Latent state space.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateSpace;

/// Observed-variable space.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MeasurementSpace;

// ============================================================================
// Vectors
// ============================================================================

/// Fixed-size vector living in `Space`.
#[repr(transparent)]
#[derive(Debug, Clone, PartialEq)]
pub struct Vector<T: Scalar, const N: usize, Space> {
    inner: SVector<T, N>,
    _space: PhantomData<Space>,
}

/// Latent state `x`.
pub type StateVector<T, const N: usize> = Vector<T, N, StateSpace>;

/// Observation `y` or its prediction `H x`.
pub type Measurement<T, const M: usize> = Vector<T, M, MeasurementSpace>;

impl<T: Scalar, const N: usize, Space> Vector<T, N, Space> {
    /// Wraps an nalgebra vector in this space.
    #[inline]
    pub fn from_svector(inner: SVector<T, N>) -> Self {
        Self {
            inner,
            _space: PhantomData,
        }
    }

    /// Builds a vector from its components.
    #[inline]
    pub fn from_array(data: [T; N]) -> Self {
        Self::from_svector(SVector::from(data))
    }

    /// Borrows the underlying nalgebra vector.
    #[inline]
    pub fn as_svector(&self) -> &SVector<T, N> {
        &self.inner
    }

    /// Unwraps into the underlying nalgebra vector.
    #[inline]
    pub fn into_svector(self) -> SVector<T, N> {
        self.inner
    }

    /// Components in index order.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        self.inner.as_slice()
    }

    /// Component `i`.
    ///
    /// # Panics
    /// Panics if `i >= N`.
    #[inline]
    #[allow(clippy::should_implement_trait)]
    pub fn index(&self, i: usize) -> &T {
        &self.inner[i]
    }
}

impl<T: Scalar + Copy, const N: usize, Space: Clone> Copy for Vector<T, N, Space> {}

impl<T: RealField + Copy, const N: usize, Space> Vector<T, N, Space> {
    /// All-zero value.
    #[inline]
    pub fn zeros() -> Self {
        Self::from_svector(SVector::zeros())
    }

    /// No NaN or infinite component.
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.inner.iter().all(|v| v.is_finite())
    }
}

impl<T: RealField + Copy, const N: usize, Space> Add for Vector<T, N, Space> {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self::from_svector(self.inner + rhs.inner)
    }
}

impl<T: RealField + Copy, const N: usize, Space> Sub for Vector<T, N, Space> {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self::from_svector(self.inner - rhs.inner)
    }
}

// ============================================================================
// Covariances
// ============================================================================

/// `N x N` covariance over `Space`.
///
/// Entry-level writes go through [`Covariance::set_symmetric`], which fills
/// the mirrored cell in the same call, so anything built that way is exactly
/// symmetric. [`Covariance::from_matrix`] takes the matrix as given.
#[repr(transparent)]
#[derive(Debug, Clone, PartialEq)]
pub struct Covariance<T: Scalar, const N: usize, Space> {
    inner: SMatrix<T, N, N>,
    _space: PhantomData<Space>,
}

/// Covariance of the latent state (process noise, initial and predicted covariance).
pub type StateCovariance<T, const N: usize> = Covariance<T, N, StateSpace>;

/// Covariance in observed space (observation noise, innovation covariance).
pub type MeasurementCovariance<T, const M: usize> = Covariance<T, M, MeasurementSpace>;

impl<T: Scalar, const N: usize, Space> Covariance<T, N, Space> {
    /// Wraps an nalgebra matrix as given, without checking symmetry.
    #[inline]
    pub fn from_matrix(inner: SMatrix<T, N, N>) -> Self {
        Self {
            inner,
            _space: PhantomData,
        }
    }

    /// Borrows the underlying nalgebra matrix.
    #[inline]
    pub fn as_matrix(&self) -> &SMatrix<T, N, N> {
        &self.inner
    }

    /// Entry `(row, col)`, or `None` outside the matrix.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> Option<&T> {
        self.inner.get((row, col))
    }
}

impl<T: Scalar + Copy, const N: usize, Space: Clone> Copy for Covariance<T, N, Space> where
    SMatrix<T, N, N>: Copy
{
}

impl<T: RealField + Copy, const N: usize, Space> Covariance<T, N, Space> {
    /// All-zero value.
    #[inline]
    pub fn zeros() -> Self {
        Self::from_matrix(SMatrix::zeros())
    }

    /// Identity covariance.
    #[inline]
    pub fn identity() -> Self {
        Self::from_matrix(SMatrix::identity())
    }

    /// Diagonal matrix with `diag` on the diagonal.
    #[inline]
    pub fn from_diagonal(diag: &SVector<T, N>) -> Self {
        Self::from_matrix(SMatrix::from_diagonal(diag))
    }

    /// Zero matrix with each `(row, col, value)` written to both triangles.
    ///
    /// # Panics
    /// Panics if a row or column is out of bounds.
    pub fn from_symmetric_entries(entries: &[(usize, usize, T)]) -> Self {
        let mut cov = Self::zeros();
        for &(row, col, value) in entries {
            cov.set_symmetric(row, col, value);
        }
        cov
    }

    /// Writes `value` to `(row, col)` and `(col, row)`.
    ///
    /// # Panics
    /// Panics if a row or column is out of bounds.
    #[inline]
    pub fn set_symmetric(&mut self, row: usize, col: usize, value: T) {
        self.inner[(row, col)] = value;
        self.inner[(col, row)] = value;
    }

    /// Every mirrored pair is exactly equal.
    pub fn is_symmetric(&self) -> bool {
        (0..N).all(|row| ((row + 1)..N).all(|col| self.inner[(row, col)] == self.inner[(col, row)]))
    }

    /// No NaN or infinite entry.
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.inner.iter().all(|v| v.is_finite())
    }

    /// Lower Cholesky factor, or `None` when not positive definite.
    #[inline]
    pub fn cholesky(&self) -> Option<SMatrix<T, N, N>> {
        nalgebra::Cholesky::new(self.inner).map(|c| c.l())
    }
}

impl<T: RealField + Copy, const N: usize, Space> Add for Covariance<T, N, Space> {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self::from_matrix(self.inner + rhs.inner)
    }
}
