//! regime-ssm: regime-switching state-space models for EKF hosts
//!
//! Supplies the *model* half of an extended Kalman filter: how a latent state
//! evolves under each discrete regime, how it is observed, how its noise and
//! initial uncertainty are parameterized, and how regimes switch. The host
//! engine owns every buffer and runs the filter recursion; this crate only
//! fills the buffers it is handed.
//!
//! # Features
//!
//! - **Type Safety**: State and measurement spaces are encoded in the type system
//! - **Explicit Regimes**: Regime dispatch goes through a registry, never a silent fallthrough
//! - **Symmetric Covariances**: Covariance entries are mirrored on every write
//!
//! # Example
//!
//! ```
//! use regime_ssm::prelude::*;
//!
//! let model = coupled_model::<f64>(ModelConfig::new()).unwrap();
//!
//! let mut params = [0.0; COUPLED_PARAMETER_COUNT];
//! params[3] = 1.0;
//!
//! let x = StateVector::from_array([1.0, 2.0, 3.0, 4.0]);
//! let mut next = StateVector::zeros();
//! model
//!     .dynamics(0.0, 1.0, Regime::new(0), &x, &params, &[], &mut next)
//!     .unwrap();
//!
//! assert_eq!(next.as_slice(), &[9.0, 0.0, 0.0, 4.0]);
//! ```

pub mod config;
pub mod coupled;
pub mod model;
pub mod models;
pub mod types;
pub mod utils;

pub mod prelude {
    pub use crate::config::*;
    pub use crate::coupled::*;
    pub use crate::model::*;
    pub use crate::models::*;
    pub use crate::types::buffers::*;
    pub use crate::types::params::*;
    pub use crate::types::regime::*;
    pub use crate::types::spaces::*;
    pub use crate::types::transforms::*;
    pub use crate::utils::*;
    pub use crate::{ModelError, Result};
}

/// Error types for the library
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ModelError {
    /// A component was asked to evaluate a regime it has no case for
    #[error("{component}: no handler for regime {regime}")]
    UnhandledRegime {
        /// Component that rejected the tag.
        component: &'static str,
        /// The offending regime tag.
        regime: usize,
    },

    /// Buffer or vector sizes disagree with each other or with the configuration
    #[error("shape mismatch in {what}: expected {expected}, got {got}")]
    ShapeMismatch {
        /// Which quantity was measured.
        what: &'static str,
        /// Expected size.
        expected: usize,
        /// Observed size.
        got: usize,
    },

    /// A component produced NaN or infinity
    #[error("{component} produced non-finite values")]
    NonFinite {
        /// Component whose output was rejected.
        component: &'static str,
    },

    /// The parameter vector is too short for the indices a component reads
    #[error("parameter vector too short: need {expected} entries, got {got}")]
    ParameterCount {
        /// Minimum length required.
        expected: usize,
        /// Length provided.
        got: usize,
    },

    /// Model configuration is invalid
    #[error("invalid configuration: {reason}")]
    InvalidConfig {
        /// Description of the problem.
        reason: String,
    },
}

pub type Result<T> = ::core::result::Result<T, ModelError>;
