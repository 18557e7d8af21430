//! Shared helpers for integration tests

#![allow(dead_code)]

use regime_ssm::prelude::*;

/// Parameter vector of the coupled model with every entry zero except `entries`.
pub fn params_with(entries: &[(usize, f64)]) -> Vec<f64> {
    let mut params = vec![0.0; COUPLED_PARAMETER_COUNT];
    for &(i, v) in entries {
        params[i] = v;
    }
    params
}

/// A stable parameter set with a positive-definite process covariance.
pub fn stable_params() -> Vec<f64> {
    params_with(&[
        (0, 0.1),
        (1, -0.2),
        (2, 0.05),
        (3, 0.5),
        (4, 0.1),
        (5, 0.1),
        (6, 0.4),
        (7, 0.0),
        (8, -0.1),
        (9, 0.1),
        (10, 0.3),
        (11, 0.04),
        (12, 0.01),
        (13, 0.0),
        (14, 0.04),
        (15, 0.005),
        (16, 0.04),
        (17, 1e-8),
        (18, 0.5),
        (19, -0.5),
        (20, 0.25),
        (21, 1.0),
        (22, 0.1),
        (23, 0.0),
        (24, 1.0),
        (25, 0.1),
        (26, 1.0),
        (27, 0.01),
    ])
}

/// The coupled model with a default single-regime configuration.
pub fn default_model() -> CoupledModel<f64> {
    coupled_model(ModelConfig::new()).unwrap()
}
