//! Host hook boundary
//!
//! [`SwitchingModel`] bundles the regime dynamics and the other model
//! components behind one method per hook the host filter calls. Each hook
//! reads its inputs, validates regime tags, parameter length and buffer
//! shapes against the [`ModelConfig`], and writes into a host-owned buffer.
//!
//! Hooks keep no state between calls, so a host may call them concurrently
//! for different units, time steps, or regimes as long as output buffers are
//! disjoint.

use nalgebra::RealField;
use num_traits::Float;
use tracing::{debug, warn};

use crate::config::{ModelConfig, SoftmaxKind};
use crate::models::{
    InitialConditionModel, MeasurementModel, NoiseEncoding, NoiseModel, ParameterTransform,
    RegimeRegistry, RegimeSwitchModel,
};
use crate::types::buffers::{InitialConditionBuffers, InitialConditionStorage};
use crate::types::params::require_len;
use crate::types::regime::{Regime, RegimeSwitchMatrix};
use crate::types::spaces::{Measurement, MeasurementCovariance, StateCovariance, StateVector};
use crate::types::transforms::{ObservationMatrix, TransitionMatrix};
use crate::utils::{softmax_into, stable_softmax_into};
use crate::{ModelError, Result};

/// Components other than the regime dynamics.
#[derive(Debug, Clone)]
pub struct ModelParts<Obs, Nz, Init, Sw, Xf> {
    /// Measurement model.
    pub measurement: Obs,
    /// Noise covariance model.
    pub noise: Nz,
    /// Initial condition model.
    pub initial: Init,
    /// Regime switching model.
    pub switching: Sw,
    /// Parameter transform.
    pub transform: Xf,
}

/// A regime-switching state-space model as seen by the host filter.
///
/// # Type Parameters
///
/// - `T`: Scalar type
/// - `Obs`: Measurement model
/// - `Nz`: Noise covariance model
/// - `Init`: Initial condition model
/// - `Sw`: Regime switching model
/// - `Xf`: Parameter transform
/// - `N`: Latent dimension
/// - `M`: Observed dimension
pub struct SwitchingModel<T, Obs, Nz, Init, Sw, Xf, const N: usize, const M: usize>
where
    T: RealField,
{
    config: ModelConfig,
    dynamics: RegimeRegistry<T, N>,
    /// Measurement model
    pub measurement_model: Obs,
    /// Noise covariance model
    pub noise_model: Nz,
    /// Initial condition model
    pub initial_model: Init,
    /// Regime switching model
    pub switch_model: Sw,
    /// Parameter transform
    pub param_transform: Xf,
}

impl<T, Obs, Nz, Init, Sw, Xf, const N: usize, const M: usize>
    SwitchingModel<T, Obs, Nz, Init, Sw, Xf, N, M>
where
    T: RealField + Float + Copy,
    Obs: MeasurementModel<T, N, M>,
    Nz: NoiseModel<T, N, M>,
    Init: InitialConditionModel<T, N>,
    Sw: RegimeSwitchModel<T>,
    Xf: ParameterTransform<T>,
{
    /// Builds a model, checking the configuration and that every configured
    /// regime has registered dynamics.
    pub fn new(
        config: ModelConfig,
        dynamics: RegimeRegistry<T, N>,
        parts: ModelParts<Obs, Nz, Init, Sw, Xf>,
    ) -> Result<Self> {
        config.validate()?;
        if dynamics.len() != config.num_regimes() {
            return Err(ModelError::ShapeMismatch {
                what: "registered regime dynamics",
                expected: config.num_regimes(),
                got: dynamics.len(),
            });
        }
        debug!(
            regimes = config.num_regimes(),
            units = config.num_units(),
            parameters = config.num_parameters(),
            latent_dim = N,
            observed_dim = M,
            "switching model ready"
        );

        let ModelParts {
            measurement,
            noise,
            initial,
            switching,
            transform,
        } = parts;

        Ok(Self {
            config,
            dynamics,
            measurement_model: measurement,
            noise_model: noise,
            initial_model: initial,
            switch_model: switching,
            param_transform: transform,
        })
    }

    /// Returns the configuration.
    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    /// Returns the regime dynamics registry.
    pub fn registry(&self) -> &RegimeRegistry<T, N> {
        &self.dynamics
    }

    /// Encoding of the observation-noise diagonal written by [`Self::noise_covariance`].
    pub fn observation_encoding(&self) -> NoiseEncoding {
        self.noise_model.observation_encoding()
    }

    /// Encoding of the process-noise diagonal written by [`Self::noise_covariance`].
    pub fn process_encoding(&self) -> NoiseEncoding {
        self.noise_model.process_encoding()
    }

    /// Allocates initial-condition buffers matching the configuration.
    pub fn initial_storage(&self) -> InitialConditionStorage<T, N> {
        InitialConditionStorage::allocate(&self.config)
    }

    /// Applies the parameter transform in place.
    ///
    /// The vector is modified even when the result is then rejected as non-finite.
    pub fn transform(&self, params: &mut [T]) -> Result<()> {
        self.check_params(params)?;
        self.param_transform.apply(params)?;
        self.ensure_finite(
            "parameter transform",
            params.iter().all(|&v| Float::is_finite(v)),
        )
    }

    /// Writes the predicted state at `tend` under `regime` into `out`.
    #[allow(clippy::too_many_arguments)]
    pub fn dynamics(
        &self,
        tstart: T,
        tend: T,
        regime: Regime,
        state: &StateVector<T, N>,
        params: &[T],
        covariates: &[T],
        out: &mut StateVector<T, N>,
    ) -> Result<()> {
        self.check_params(params)?;
        let next = self
            .dynamics
            .get(regime)?
            .predict(tstart, tend, state, params, covariates)?;
        self.ensure_finite("dynamics", next.is_finite())?;
        *out = next;
        Ok(())
    }

    /// Writes the transition Jacobian at `state` under `regime` into `out`.
    #[allow(clippy::too_many_arguments)]
    pub fn jacobian(
        &self,
        tstart: T,
        tend: T,
        regime: Regime,
        state: &StateVector<T, N>,
        params: &[T],
        covariates: &[T],
        out: &mut TransitionMatrix<T, N>,
    ) -> Result<()> {
        self.check_params(params)?;
        let jac = self
            .dynamics
            .get(regime)?
            .jacobian(tstart, tend, state, params, covariates)?;
        self.ensure_finite("jacobian", jac.is_finite())?;
        *out = jac;
        Ok(())
    }

    /// Writes the loading matrix into `loading` and `loading * state` into `predicted`.
    #[allow(clippy::too_many_arguments)]
    pub fn measurement(
        &self,
        t: usize,
        regime: Regime,
        params: &[T],
        state: &StateVector<T, N>,
        covariates: &[T],
        loading: &mut ObservationMatrix<T, M, N>,
        predicted: &mut Measurement<T, M>,
    ) -> Result<()> {
        self.check_regime("measurement", regime)?;
        self.check_params(params)?;
        let (h, y) = self
            .measurement_model
            .observe(t, regime, params, state, covariates)?;
        self.ensure_finite("measurement", h.is_finite() && y.is_finite())?;
        *loading = h;
        *predicted = y;
        Ok(())
    }

    /// Writes the observation- and process-noise covariances.
    pub fn noise_covariance(
        &self,
        t: usize,
        regime: Regime,
        params: &[T],
        observation: &mut MeasurementCovariance<T, M>,
        process: &mut StateCovariance<T, N>,
    ) -> Result<()> {
        self.check_regime("noise covariance", regime)?;
        self.check_params(params)?;
        let r = self.noise_model.observation_noise(t, regime, params)?;
        let q = self.noise_model.process_noise(t, regime, params)?;
        self.ensure_finite("noise covariance", r.is_finite() && q.is_finite())?;
        *observation = r;
        *process = q;
        Ok(())
    }

    /// Fills regime probabilities, initial means, and initial covariances for
    /// every unit and regime.
    ///
    /// `unit_covariates[u]` is handed to the model for unit `u`; missing
    /// entries mean no covariates.
    #[tracing::instrument(
        level = "debug",
        skip_all,
        fields(regimes = self.config.num_regimes(), units = self.config.num_units())
    )]
    pub fn initial_condition(
        &self,
        params: &[T],
        unit_covariates: &[&[T]],
        buffers: &mut InitialConditionBuffers<'_, T, N>,
    ) -> Result<()> {
        let shape = buffers.shape()?;
        if shape.regimes != self.config.num_regimes() {
            return Err(ModelError::ShapeMismatch {
                what: "initial condition regimes",
                expected: self.config.num_regimes(),
                got: shape.regimes,
            });
        }
        if shape.units != self.config.num_units() {
            return Err(ModelError::ShapeMismatch {
                what: "initial condition units",
                expected: self.config.num_units(),
                got: shape.units,
            });
        }
        self.check_params(params)?;

        let covariates_of = |unit: usize| unit_covariates.get(unit).copied().unwrap_or(&[]);

        for r in 0..shape.regimes {
            let regime = Regime::new(r);
            for unit in 0..shape.units {
                let mean = self
                    .initial_model
                    .initial_mean(regime, unit, params, covariates_of(unit))?;
                self.ensure_finite("initial mean", mean.is_finite())?;
                let offset = unit * N;
                for (k, &v) in mean.as_slice().iter().enumerate() {
                    buffers.means[r][offset + k] = v;
                }
            }
            let cov = self.initial_model.initial_covariance(regime, params)?;
            self.ensure_finite("initial covariance", cov.is_finite())?;
            buffers.covariances[r] = cov;
        }

        let mut logits = vec![T::zero(); shape.regimes];
        for unit in 0..shape.units {
            self.initial_model
                .initial_logits(unit, params, covariates_of(unit), &mut logits)?;
            let out = buffers.probabilities[unit].as_mut_slice();
            let written = match self.config.softmax() {
                SoftmaxKind::Plain => softmax_into(&logits, out),
                SoftmaxKind::MaxShifted => stable_softmax_into(&logits, out),
            };
            match written {
                Err(ModelError::NonFinite { .. }) => {
                    self.ensure_finite("regime probabilities", false)?
                }
                other => other?,
            }
        }
        Ok(())
    }

    /// Fills the `R x R` regime transition matrix.
    pub fn regime_switch(
        &self,
        t: usize,
        kind: usize,
        params: &[T],
        covariates: &[T],
        out: &mut RegimeSwitchMatrix<T>,
    ) -> Result<()> {
        let regimes = self.config.num_regimes();
        if out.nrows() != regimes {
            return Err(ModelError::ShapeMismatch {
                what: "regime switch matrix rows",
                expected: regimes,
                got: out.nrows(),
            });
        }
        if out.ncols() != regimes {
            return Err(ModelError::ShapeMismatch {
                what: "regime switch matrix columns",
                expected: regimes,
                got: out.ncols(),
            });
        }
        self.check_params(params)?;
        self.switch_model
            .transition_probabilities(t, kind, params, covariates, out)?;
        self.ensure_finite(
            "regime switch",
            out.iter().all(|&v| Float::is_finite(v)),
        )
    }

    fn check_params(&self, params: &[T]) -> Result<()> {
        require_len(params, self.config.num_parameters())
    }

    fn check_regime(&self, component: &'static str, regime: Regime) -> Result<()> {
        if regime.index() >= self.config.num_regimes() {
            warn!(component, regime = regime.index(), "regime outside configured range");
            return Err(ModelError::UnhandledRegime {
                component,
                regime: regime.index(),
            });
        }
        Ok(())
    }

    fn ensure_finite(&self, component: &'static str, finite: bool) -> Result<()> {
        if finite || !self.config.check_finite() {
            return Ok(());
        }
        warn!(component, "non-finite output rejected");
        Err(ModelError::NonFinite { component })
    }
}
