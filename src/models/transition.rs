//! Regime-conditional transition models
//!
//! Each regime owns one [`RegimeDynamics`] handler supplying the next-state
//! mean and its Jacobian. Handlers are kept in a [`RegimeRegistry`] and looked
//! up by regime tag; a tag with no handler is an error, never a no-op.

use ::core::fmt;

use nalgebra::RealField;
use num_traits::Float;
use tracing::{debug, warn};

use crate::types::params::{
    require_len, COEFS_X1, COEFS_X2, COEF_X0_FROM_X0, COEF_X0_FROM_X2, INTERCEPTS,
};
use crate::types::regime::Regime;
use crate::types::spaces::StateVector;
use crate::types::transforms::TransitionMatrix;
use crate::{ModelError, Result};

/// Dynamics of the latent state within one regime.
///
/// `x_{tend} = f(tstart, tend, x_{tstart}, params, covariates)`
///
/// Time and covariates are part of the signature so time-varying or
/// covariate-driven dynamics fit without interface changes; handlers that do
/// not need them ignore them.
pub trait RegimeDynamics<T: RealField, const N: usize> {
    /// Returns the predicted state at `tend`.
    fn predict(
        &self,
        tstart: T,
        tend: T,
        state: &StateVector<T, N>,
        params: &[T],
        covariates: &[T],
    ) -> Result<StateVector<T, N>>;

    /// Returns the Jacobian of [`RegimeDynamics::predict`] with respect to the
    /// state, evaluated at `state`.
    fn jacobian(
        &self,
        tstart: T,
        tend: T,
        state: &StateVector<T, N>,
        params: &[T],
        covariates: &[T],
    ) -> Result<TransitionMatrix<T, N>>;
}

type Handler<T, const N: usize> = Box<dyn RegimeDynamics<T, N> + Send + Sync>;

/// Regime dynamics indexed by regime tag.
///
/// Handlers are registered in tag order: the first one answers regime 0.
pub struct RegimeRegistry<T: RealField, const N: usize> {
    handlers: Vec<Handler<T, N>>,
}

impl<T: RealField, const N: usize> RegimeRegistry<T, N> {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            handlers: Vec::new(),
        }
    }

    /// Registers `handler` under the next free tag and returns that tag.
    pub fn register<D>(&mut self, handler: D) -> Regime
    where
        D: RegimeDynamics<T, N> + Send + Sync + 'static,
    {
        let regime = Regime::new(self.handlers.len());
        self.handlers.push(Box::new(handler));
        debug!(regime = regime.index(), "registered regime dynamics");
        regime
    }

    /// Builder form of [`RegimeRegistry::register`].
    pub fn with_regime<D>(mut self, handler: D) -> Self
    where
        D: RegimeDynamics<T, N> + Send + Sync + 'static,
    {
        self.register(handler);
        self
    }

    /// Looks up the handler for `regime`.
    pub fn get(&self, regime: Regime) -> Result<&(dyn RegimeDynamics<T, N> + Send + Sync)> {
        match self.handlers.get(regime.index()) {
            Some(handler) => Ok(handler.as_ref()),
            None => {
                warn!(regime = regime.index(), registered = self.handlers.len(), "no dynamics for regime");
                Err(ModelError::UnhandledRegime {
                    component: "dynamics",
                    regime: regime.index(),
                })
            }
        }
    }

    /// Number of registered regimes.
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Returns true if no regime is registered.
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl<T: RealField, const N: usize> Default for RegimeRegistry<T, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: RealField, const N: usize> fmt::Debug for RegimeRegistry<T, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegimeRegistry")
            .field("regimes", &self.handlers.len())
            .finish()
    }
}

// ============================================================================
// Coupled dynamics
// ============================================================================

/// Three dynamic variables with a latent, time-invariant coupling coefficient.
///
/// State: `[x0, x1, x2, c]` where `c` scales the effect of `x1` on `x0` and
/// is carried forward unchanged:
///
/// - x0' = p0 + p3·x0 + c·x1 + p4·x2
/// - x1' = p1 + p5·x0 + p6·x1 + p7·x2
/// - x2' = p2 + p8·x0 + p9·x1 + p10·x2
/// - c'  = c
///
/// The `c·x1` product makes the map bilinear in the state, so filters must
/// linearize through [`RegimeDynamics::jacobian`].
#[derive(Debug, Clone, Copy, Default)]
pub struct LatentCouplingDynamics;

impl LatentCouplingDynamics {
    /// Minimum parameter vector length read by this model.
    pub const REQUIRED_PARAMS: usize = COEFS_X2[2] + 1;

    /// Creates the coupled dynamics.
    pub fn new() -> Self {
        Self
    }
}

impl<T: RealField + Float + Copy> RegimeDynamics<T, 4> for LatentCouplingDynamics {
    fn predict(
        &self,
        _tstart: T,
        _tend: T,
        state: &StateVector<T, 4>,
        params: &[T],
        _covariates: &[T],
    ) -> Result<StateVector<T, 4>> {
        require_len(params, Self::REQUIRED_PARAMS)?;
        let p = |i: usize| params[i];
        let x0 = *state.index(0);
        let x1 = *state.index(1);
        let x2 = *state.index(2);
        let c = *state.index(3);

        Ok(StateVector::from_array([
            p(INTERCEPTS[0]) + p(COEF_X0_FROM_X0) * x0 + c * x1 + p(COEF_X0_FROM_X2) * x2,
            p(INTERCEPTS[1]) + p(COEFS_X1[0]) * x0 + p(COEFS_X1[1]) * x1 + p(COEFS_X1[2]) * x2,
            p(INTERCEPTS[2]) + p(COEFS_X2[0]) * x0 + p(COEFS_X2[1]) * x1 + p(COEFS_X2[2]) * x2,
            c,
        ]))
    }

    fn jacobian(
        &self,
        _tstart: T,
        _tend: T,
        state: &StateVector<T, 4>,
        params: &[T],
        _covariates: &[T],
    ) -> Result<TransitionMatrix<T, 4>> {
        require_len(params, Self::REQUIRED_PARAMS)?;
        let p = |i: usize| params[i];
        let x1 = *state.index(1);
        let c = *state.index(3);
        let one = T::one();
        let zero = T::zero();

        Ok(TransitionMatrix::from_matrix(nalgebra::matrix![
            p(COEF_X0_FROM_X0), c, p(COEF_X0_FROM_X2), x1;
            p(COEFS_X1[0]), p(COEFS_X1[1]), p(COEFS_X1[2]), zero;
            p(COEFS_X2[0]), p(COEFS_X2[1]), p(COEFS_X2[2]), zero;
            zero, zero, zero, one
        ]))
    }
}
