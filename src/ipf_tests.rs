pub(crate) use super::*;
use crate::error::AjustarError;

fn demand_matrix() -> Matrix<f64> {
    Matrix::from_vec(2, 2, vec![1.0, 3.0, 2.0, 4.0]).expect("2*2=4 elements")
}

#[test]
fn test_fit_converges_to_targets() {
    let mut mtx = demand_matrix();
    let outcome = Ipf::new()
        .fit(&mut mtx, &[4.0, 6.0], &[3.0, 7.0])
        .expect("valid inputs");

    assert!(outcome.converged);
    assert!(outcome.iterations <= 100);
    assert!(outcome.residual < 1e-3);

    let rows = mtx.row_sums();
    let cols = mtx.col_sums();
    assert!((rows[0] - 4.0).abs() < 1e-3);
    assert!((rows[1] - 6.0).abs() < 1e-3);
    assert!((cols[0] - 3.0).abs() < 1e-3);
    assert!((cols[1] - 7.0).abs() < 1e-3);
}

#[test]
fn test_fit_empty_matrix() {
    let mut mtx = Matrix::<f64>::from_vec(0, 0, vec![]).expect("0 elements");
    let err = Ipf::new().fit(&mut mtx, &[], &[]).unwrap_err();
    assert_eq!(err, AjustarError::EmptyMatrix);
}

#[test]
fn test_fit_row_sum_length_mismatch() {
    let mut mtx = demand_matrix();
    let before = mtx.clone();
    let err = Ipf::new().fit(&mut mtx, &[4.0, 6.0, 1.0], &[3.0, 7.0]).unwrap_err();
    assert!(matches!(err, AjustarError::DimensionMismatch { .. }));
    assert_eq!(mtx, before);
}

#[test]
fn test_fit_col_sum_length_mismatch() {
    let mut mtx = demand_matrix();
    let before = mtx.clone();
    let err = Ipf::new().fit(&mut mtx, &[4.0, 6.0], &[3.0]).unwrap_err();
    assert!(matches!(err, AjustarError::DimensionMismatch { .. }));
    assert_eq!(mtx, before);
}

#[test]
fn test_fit_negative_matrix_entry() {
    let mut mtx = Matrix::from_vec(2, 2, vec![1.0, -3.0, 2.0, 4.0]).expect("4 elements");
    let before = mtx.clone();
    let err = Ipf::new().fit(&mut mtx, &[4.0, 6.0], &[3.0, 7.0]).unwrap_err();
    assert!(matches!(err, AjustarError::NegativeValue { .. }));
    assert_eq!(mtx, before);
}

#[test]
fn test_fit_negative_row_target() {
    let mut mtx = demand_matrix();
    let err = Ipf::new().fit(&mut mtx, &[-4.0, 6.0], &[3.0, 7.0]).unwrap_err();
    assert!(matches!(err, AjustarError::NegativeValue { .. }));
}

#[test]
fn test_fit_negative_col_target() {
    let mut mtx = demand_matrix();
    let err = Ipf::new().fit(&mut mtx, &[4.0, 6.0], &[3.0, -7.0]).unwrap_err();
    assert!(matches!(err, AjustarError::NegativeValue { .. }));
}

#[test]
fn test_fit_rejects_non_positive_tol() {
    let mut mtx = demand_matrix();
    let err = Ipf::new()
        .with_tol(0.0)
        .fit(&mut mtx, &[4.0, 6.0], &[3.0, 7.0])
        .unwrap_err();
    assert!(matches!(err, AjustarError::InvalidHyperparameter { .. }));
}

#[test]
fn test_fit_rejects_zero_max_iter() {
    let mut mtx = demand_matrix();
    let err = Ipf::new()
        .with_max_iter(0)
        .fit(&mut mtx, &[4.0, 6.0], &[3.0, 7.0])
        .unwrap_err();
    assert!(matches!(err, AjustarError::InvalidHyperparameter { .. }));
}

#[test]
fn test_fit_budget_exhaustion_is_not_an_error() {
    // Inconsistent totals (rows sum to 10, columns to 20): the L1 error can
    // never drop below |10 - T| + |20 - T| >= 10.
    let mut mtx = Matrix::from_vec(2, 2, vec![1.0, 1.0, 1.0, 1.0]).expect("4 elements");
    let outcome = Ipf::new()
        .with_max_iter(5)
        .fit(&mut mtx, &[5.0, 5.0], &[10.0, 10.0])
        .expect("precondition checks pass");

    assert!(!outcome.converged);
    assert_eq!(outcome.iterations, 5);
    assert!(outcome.residual >= 10.0);
    assert!(mtx.as_slice().iter().all(|&v| v >= 0.0));
}

#[test]
fn test_fit_is_idempotent_once_converged() {
    let mut mtx = demand_matrix();
    let first = Ipf::new()
        .fit(&mut mtx, &[4.0, 6.0], &[3.0, 7.0])
        .expect("valid inputs");
    assert!(first.converged);

    let after_first = mtx.clone();
    let second = Ipf::new()
        .fit(&mut mtx, &[4.0, 6.0], &[3.0, 7.0])
        .expect("valid inputs");

    assert!(second.converged);
    assert_eq!(second.iterations, 0);
    assert_eq!(mtx, after_first);
}

#[test]
fn test_fit_zero_row_with_zero_target() {
    let mut mtx = Matrix::from_vec(2, 2, vec![0.0, 0.0, 1.0, 3.0]).expect("4 elements");
    let outcome = Ipf::new()
        .fit(&mut mtx, &[0.0, 4.0], &[2.0, 2.0])
        .expect("zero target over zero marginal is satisfiable");

    assert!(outcome.converged);
    assert!((mtx.get(0, 0)).abs() < 1e-12);
    assert!((mtx.get(0, 1)).abs() < 1e-12);
    let cols = mtx.col_sums();
    assert!((cols[0] - 2.0).abs() < 1e-3);
    assert!((cols[1] - 2.0).abs() < 1e-3);
}

#[test]
fn test_fit_zero_row_with_nonzero_target_is_degenerate() {
    let mut mtx = Matrix::from_vec(2, 2, vec![0.0, 0.0, 1.0, 1.0]).expect("4 elements");
    let err = Ipf::new().fit(&mut mtx, &[1.0, 1.0], &[1.0, 1.0]).unwrap_err();
    assert!(matches!(
        err,
        AjustarError::DegenerateMarginal { index: 0, .. }
    ));
}

#[test]
fn test_fit_zero_column_with_nonzero_target_is_degenerate() {
    let mut mtx = Matrix::from_vec(2, 2, vec![1.0, 0.0, 1.0, 0.0]).expect("4 elements");
    let err = Ipf::new().fit(&mut mtx, &[1.0, 1.0], &[1.0, 1.0]).unwrap_err();
    match err {
        AjustarError::DegenerateMarginal { axis, index, .. } => {
            assert_eq!(axis, "column");
            assert_eq!(index, 1);
        }
        other => panic!("expected DegenerateMarginal, got {other:?}"),
    }
}

#[test]
fn test_l1_error_exact_match_is_zero() {
    let mtx = demand_matrix();
    assert!(l1_error(&mtx, &[4.0, 6.0], &[3.0, 7.0]) < 1e-12);
}

#[test]
fn test_l1_error_sums_row_and_column_deviations() {
    let mtx = demand_matrix();
    // Rows off by 1 + 0, columns off by 2 + 1.
    let err = l1_error(&mtx, &[5.0, 6.0], &[1.0, 8.0]);
    assert!((err - 4.0).abs() < 1e-12);
}

#[test]
fn test_builder_and_getters() {
    let fitter = Ipf::new().with_tol(1e-6).with_max_iter(250);
    assert!((fitter.tol() - 1e-6).abs() < 1e-18);
    assert_eq!(fitter.max_iter(), 250);

    let default = Ipf::default();
    assert!((default.tol() - 1e-3).abs() < 1e-12);
    assert_eq!(default.max_iter(), 100);
}

#[test]
fn test_fit_outcome_serde_round_trip() {
    let outcome = FitOutcome {
        converged: true,
        iterations: 7,
        residual: 4.2e-4,
    };
    let json = serde_json::to_string(&outcome).expect("outcome serializes");
    let back: FitOutcome = serde_json::from_str(&json).expect("outcome deserializes");
    assert_eq!(back, outcome);
}
