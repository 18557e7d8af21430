//! End-to-end scenarios for the coupled four-state model

mod common;

use approx::assert_relative_eq;
use common::{default_model, params_with, stable_params};
use nalgebra::DMatrix;
use proptest::prelude::*;
use regime_ssm::prelude::*;

#[test]
fn test_single_weight_transition() {
    let model = default_model();
    let params = params_with(&[(3, 1.0)]);
    let x = StateVector::from_array([1.0, 2.0, 3.0, 4.0]);
    let mut next = StateVector::zeros();

    model
        .dynamics(0.0, 1.0, Regime::new(0), &x, &params, &[], &mut next)
        .unwrap();

    assert_eq!(next.as_slice(), &[9.0, 0.0, 0.0, 4.0]);
}

#[test]
fn test_jacobian_matches_bilinear_term() {
    let model = default_model();
    let params = stable_params();
    let x = StateVector::from_array([1.0, 2.0, 3.0, 4.0]);
    let mut jac = TransitionMatrix::zeros();

    model
        .jacobian(0.0, 1.0, Regime::new(0), &x, &params, &[], &mut jac)
        .unwrap();

    let m = jac.as_matrix();
    assert_eq!(m[(0, 0)], 0.5);
    assert_eq!(m[(0, 1)], 4.0);
    assert_eq!(m[(0, 2)], 0.1);
    assert_eq!(m[(0, 3)], 2.0);
    assert_eq!(m.row(3).iter().copied().collect::<Vec<_>>(), vec![0.0, 0.0, 0.0, 1.0]);
}

#[test]
fn test_initial_condition_single_unit() {
    let model = default_model();
    let params = params_with(&[(18, 0.1), (19, 0.2), (20, 0.3)]);
    let mut storage = model.initial_storage();

    model
        .initial_condition(&params, &[], &mut storage.buffers())
        .unwrap();

    assert_eq!(
        storage.mean(0, 0).unwrap(),
        &[0.1, 0.2, 0.3, -0.712563008706848]
    );
    assert_eq!(storage.probabilities[0].as_slice(), &[1.0]);
}

#[test]
fn test_initial_condition_host_buffers() {
    let model = coupled_model::<f64>(ModelConfig::new().with_num_units(3)).unwrap();
    let params = stable_params();

    let mut probabilities = vec![RegimeProbabilities::zeros(1); 3];
    let mut means = vec![nalgebra::DVector::zeros(12)];
    let mut covariances = vec![StateCovariance::zeros()];
    let mut buffers = InitialConditionBuffers::new(&mut probabilities, &mut means, &mut covariances);

    model.initial_condition(&params, &[], &mut buffers).unwrap();

    for unit in 0..3 {
        let mean = &means[0].as_slice()[unit * 4..unit * 4 + 4];
        assert_eq!(mean, &[0.5, -0.5, 0.25, COUPLING_INITIAL_VALUE]);
        assert_eq!(probabilities[unit][0], 1.0);
    }
    assert!(covariances[0].is_symmetric());
    assert!(covariances[0].cholesky().is_some());
}

#[test]
fn test_initial_condition_rejects_undersized_host_buffers() {
    let model = coupled_model::<f64>(ModelConfig::new().with_num_units(2)).unwrap();
    let params = stable_params();

    let mut probabilities = vec![RegimeProbabilities::zeros(1); 2];
    let mut means = vec![nalgebra::DVector::zeros(6)];
    let mut covariances = vec![StateCovariance::zeros()];
    let mut buffers = InitialConditionBuffers::new(&mut probabilities, &mut means, &mut covariances);

    let err = model.initial_condition(&params, &[], &mut buffers).unwrap_err();

    assert!(matches!(err, ModelError::ShapeMismatch { .. }));
    assert_eq!(means[0].as_slice(), &[0.0; 6]);
}

#[test]
fn test_measurement_partial_identity() {
    let model = default_model();
    let params = stable_params();
    let x = StateVector::from_array([1.0, 2.0, 3.0, 4.0]);
    let mut h = ObservationMatrix::zeros();
    let mut y = Measurement::zeros();

    model
        .measurement(0, Regime::new(0), &params, &x, &[], &mut h, &mut y)
        .unwrap();

    assert_eq!(y.as_slice(), &[1.0, 2.0, 3.0]);
    assert_eq!(h.as_matrix().column(3).iter().copied().sum::<f64>(), 0.0);
}

#[test]
fn test_noise_covariance_encoding() {
    let model = default_model();
    let params = stable_params();
    let mut r = MeasurementCovariance::zeros();
    let mut q = StateCovariance::zeros();

    model
        .noise_covariance(0, Regime::new(0), &params, &mut r, &mut q)
        .unwrap();

    assert_eq!(model.observation_encoding(), NoiseEncoding::LogVariance);
    for i in 0..3 {
        assert_relative_eq!(
            model.observation_encoding().decode(r.as_matrix()[(i, i)]),
            1e-6,
            max_relative = 1e-10
        );
    }
    assert_eq!(q.as_matrix()[(1, 0)], 0.01);
    assert_eq!(q.as_matrix()[(0, 1)], 0.01);
    assert_eq!(q.as_matrix()[(3, 3)], 1e-8);
}

#[test]
fn test_process_noise_decodes_to_parameter_variances() {
    let model = default_model();
    let params = stable_params();
    let mut r = MeasurementCovariance::zeros();
    let mut q = StateCovariance::zeros();

    model
        .noise_covariance(0, Regime::new(0), &params, &mut r, &mut q)
        .unwrap();

    let encoding = model.process_encoding();
    assert_eq!(encoding, NoiseEncoding::Variance);
    assert_eq!(encoding.decode(q.as_matrix()[(0, 0)]), params[11]);
    assert_eq!(encoding.decode(q.as_matrix()[(3, 3)]), params[17]);
    assert_eq!(encoding.decode(q.as_matrix()[(2, 1)]), params[15]);
}

#[test]
fn test_regime_switch_identity() {
    let model = default_model();
    let params = stable_params();
    let mut switch = DMatrix::from_element(1, 1, 0.3);

    model
        .regime_switch(0, 0, &params, &[], &mut switch)
        .unwrap();

    assert_eq!(switch, DMatrix::identity(1, 1));
}

#[test]
fn test_transform_is_identity() {
    let model = default_model();
    let mut params = stable_params();
    let before = params.clone();

    model.transform(&mut params).unwrap();

    assert_eq!(params, before);
}

proptest! {
    #[test]
    fn prop_noise_and_initial_covariances_symmetric(
        p in prop::collection::vec(-5.0_f64..5.0, COUPLED_PARAMETER_COUNT),
    ) {
        let model = default_model();
        let mut r = MeasurementCovariance::zeros();
        let mut q = StateCovariance::zeros();
        model.noise_covariance(3, Regime::new(0), &p, &mut r, &mut q).unwrap();

        let mut storage = model.initial_storage();
        model.initial_condition(&p, &[], &mut storage.buffers()).unwrap();

        prop_assert!(q.is_symmetric());
        prop_assert!(r.is_symmetric());
        prop_assert!(storage.covariances[0].is_symmetric());
    }

    #[test]
    fn prop_pass_through_and_identity_row(
        x in prop::array::uniform4(-100.0_f64..100.0),
        p in prop::collection::vec(-5.0_f64..5.0, COUPLED_PARAMETER_COUNT),
        tstart in 0.0_f64..10.0,
    ) {
        let model = default_model();
        let state = StateVector::from_array(x);
        let mut next = StateVector::zeros();
        let mut jac = TransitionMatrix::zeros();

        model.dynamics(tstart, tstart + 1.0, Regime::new(0), &state, &p, &[], &mut next).unwrap();
        model.jacobian(tstart, tstart + 1.0, Regime::new(0), &state, &p, &[], &mut jac).unwrap();

        prop_assert_eq!(*next.index(3), x[3]);
        for col in 0..4 {
            let expected = if col == 3 { 1.0 } else { 0.0 };
            prop_assert_eq!(jac.as_matrix()[(3, col)], expected);
        }
    }

    #[test]
    fn prop_regime_switch_is_identity(
        p in prop::collection::vec(-5.0_f64..5.0, COUPLED_PARAMETER_COUNT),
        t in 0usize..500,
        kind in 0usize..3,
    ) {
        let model = default_model();
        let mut switch = DMatrix::from_element(1, 1, 0.0);
        model.regime_switch(t, kind, &p, &[1.0, 2.0], &mut switch).unwrap();
        prop_assert_eq!(switch, DMatrix::identity(1, 1));
    }
}
