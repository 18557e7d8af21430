//! Matrices between spaces
//!
//! The transition Jacobian maps latent state to latent state and the loading
//! matrix maps latent state to observed space. Both carry their source and
//! target spaces in the type.

use ::core::marker::PhantomData;
use nalgebra::{RealField, SMatrix, Scalar};

use super::spaces::{
    Measurement, MeasurementCovariance, MeasurementSpace, StateCovariance, StateSpace,
    StateVector,
};

/// `ROWS x COLS` matrix taking `From`-space vectors to `To`-space vectors.
#[repr(transparent)]
#[derive(Debug, Clone, PartialEq)]
pub struct Transform<T: Scalar, const ROWS: usize, const COLS: usize, To, From> {
    inner: SMatrix<T, ROWS, COLS>,
    _spaces: PhantomData<(To, From)>,
}

/// Transition Jacobian `F`, latent to latent.
pub type TransitionMatrix<T, const N: usize> = Transform<T, N, N, StateSpace, StateSpace>;

/// Loading matrix `H`, latent to observed.
pub type ObservationMatrix<T, const M: usize, const N: usize> =
    Transform<T, M, N, MeasurementSpace, StateSpace>;

impl<T: Scalar, const ROWS: usize, const COLS: usize, To, From> Transform<T, ROWS, COLS, To, From> {
    /// Wraps an nalgebra matrix.
    #[inline]
    pub fn from_matrix(inner: SMatrix<T, ROWS, COLS>) -> Self {
        Self {
            inner,
            _spaces: PhantomData,
        }
    }

    /// Borrows the underlying nalgebra matrix.
    #[inline]
    pub fn as_matrix(&self) -> &SMatrix<T, ROWS, COLS> {
        &self.inner
    }
}

impl<T: Scalar + Copy, const ROWS: usize, const COLS: usize, To: Clone, From: Clone> Copy
    for Transform<T, ROWS, COLS, To, From>
where
    SMatrix<T, ROWS, COLS>: Copy,
{
}

impl<T: RealField + Copy, const ROWS: usize, const COLS: usize, To, From>
    Transform<T, ROWS, COLS, To, From>
{
    /// All-zero matrix; the starting value of a host buffer.
    #[inline]
    pub fn zeros() -> Self {
        Self::from_matrix(SMatrix::zeros())
    }

    /// No NaN or infinite entry.
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.inner.iter().all(|v| v.is_finite())
    }
}

impl<T: RealField + Copy, const N: usize> TransitionMatrix<T, N> {
    /// `F x`: the first-order prediction of a state.
    #[inline]
    pub fn apply_state(&self, state: &StateVector<T, N>) -> StateVector<T, N> {
        StateVector::from_svector(self.inner * state.as_svector())
    }

    /// `F P F^T`.
    #[inline]
    pub fn propagate_covariance(&self, cov: &StateCovariance<T, N>) -> StateCovariance<T, N> {
        StateCovariance::from_matrix(self.inner * cov.as_matrix() * self.inner.transpose())
    }
}

impl<T: RealField + Copy, const M: usize, const N: usize> ObservationMatrix<T, M, N> {
    /// `H x`.
    #[inline]
    pub fn observe(&self, state: &StateVector<T, N>) -> Measurement<T, M> {
        Measurement::from_svector(self.inner * state.as_svector())
    }

    /// `H P H^T`.
    #[inline]
    pub fn project_covariance(&self, cov: &StateCovariance<T, N>) -> MeasurementCovariance<T, M> {
        MeasurementCovariance::from_matrix(self.inner * cov.as_matrix() * self.inner.transpose())
    }
}
