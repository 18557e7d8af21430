//! Preset: four latent variables, three observed, one regime
//!
//! Latent state `[x0, x1, x2, c]`: three dynamic variables observed directly
//! plus a latent coupling coefficient `c` (see [`LatentCouplingDynamics`]).
//! Parameter layout follows [`crate::types::params`].

use nalgebra::RealField;
use num_traits::Float;

use crate::config::ModelConfig;
use crate::model::{ModelParts, SwitchingModel};
use crate::models::{
    IdentityTransform, LatentCouplingDynamics, MeanSource, ParameterizedInitialCondition,
    ParameterizedNoise, PartialIdentityLoading, RegimeRegistry, StaticRegimes,
    COUPLING_INITIAL_VALUE,
};
use crate::types::params::{SymmetricLayout, INITIAL_COVARIANCE, INITIAL_MEANS, PROCESS_NOISE};
use crate::Result;

/// Latent dimension of the coupled model.
pub const COUPLED_LATENT_DIM: usize = 4;

/// Observed dimension of the coupled model.
pub const COUPLED_OBSERVED_DIM: usize = 3;

/// The coupled model's concrete [`SwitchingModel`].
pub type CoupledModel<T> = SwitchingModel<
    T,
    PartialIdentityLoading<COUPLED_OBSERVED_DIM, COUPLED_LATENT_DIM>,
    ParameterizedNoise<T, COUPLED_LATENT_DIM, COUPLED_OBSERVED_DIM>,
    ParameterizedInitialCondition<T, COUPLED_LATENT_DIM>,
    StaticRegimes,
    IdentityTransform,
    COUPLED_LATENT_DIM,
    COUPLED_OBSERVED_DIM,
>;

/// Builds the coupled model.
///
/// Only regime 0 has dynamics, so `config` must ask for a single regime.
pub fn coupled_model<T: RealField + Float + Copy>(config: ModelConfig) -> Result<CoupledModel<T>> {
    let registry = RegimeRegistry::new().with_regime(LatentCouplingDynamics::new());

    let parts = ModelParts {
        measurement: PartialIdentityLoading::leading()?,
        noise: ParameterizedNoise::near_noiseless(SymmetricLayout::new(&PROCESS_NOISE)?),
        initial: ParameterizedInitialCondition::new(
            [
                MeanSource::Parameter(INITIAL_MEANS[0]),
                MeanSource::Parameter(INITIAL_MEANS[1]),
                MeanSource::Parameter(INITIAL_MEANS[2]),
                MeanSource::Fixed(nalgebra::convert(COUPLING_INITIAL_VALUE)),
            ],
            SymmetricLayout::new(&INITIAL_COVARIANCE)?,
        ),
        switching: StaticRegimes,
        transform: IdentityTransform,
    };

    SwitchingModel::new(config, registry, parts)
}
