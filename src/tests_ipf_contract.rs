// =========================================================================
// FALSIFY-IPF: iterative proportional fitting kernel contract (ajustar ipf)
//
// References:
//   - Deming & Stephan (1940) "On a Least Squares Adjustment of a Sampled
//     Frequency Table When the Expected Marginal Totals are Known"
//   - Fienberg (1970) "An Iterative Procedure for Estimation in
//     Contingency Tables"
// =========================================================================

use super::*;
use crate::error::AjustarError;

/// FALSIFY-IPF-001: Converged fit meets both marginal targets within tol
#[test]
fn falsify_ipf_001_marginals_within_tolerance() {
    let mut mtx =
        Matrix::from_vec(3, 2, vec![2.0, 1.0, 1.0, 4.0, 3.0, 1.0]).expect("valid matrix");
    let row_targets = [4.0, 5.0, 3.0];
    let col_targets = [7.0, 5.0];

    let outcome = Ipf::new()
        .fit(&mut mtx, &row_targets, &col_targets)
        .expect("valid inputs");
    assert!(outcome.converged, "FALSIFIED IPF-001: budget exhausted");

    for (i, (&achieved, &target)) in mtx.row_sums().iter().zip(row_targets.iter()).enumerate() {
        assert!(
            (achieved - target).abs() < 1e-3,
            "FALSIFIED IPF-001: row {i} sum {achieved}, target {target}"
        );
    }
    for (j, (&achieved, &target)) in mtx.col_sums().iter().zip(col_targets.iter()).enumerate() {
        assert!(
            (achieved - target).abs() < 1e-3,
            "FALSIFIED IPF-001: column {j} sum {achieved}, target {target}"
        );
    }
}

/// FALSIFY-IPF-002: Fitting never produces a negative entry
#[test]
fn falsify_ipf_002_non_negativity_preserved() {
    let mut mtx =
        Matrix::from_vec(2, 3, vec![0.5, 0.0, 2.5, 1.0, 3.0, 0.25]).expect("valid matrix");
    let outcome = Ipf::new()
        .fit(&mut mtx, &[3.0, 4.0], &[2.0, 2.0, 3.0])
        .expect("valid inputs");

    for (k, &v) in mtx.as_slice().iter().enumerate() {
        assert!(
            v >= 0.0,
            "FALSIFIED IPF-002: entry {k} = {v} after fit (converged={})",
            outcome.converged
        );
    }
}

/// FALSIFY-IPF-003: Refitting a converged matrix is a no-op
#[test]
fn falsify_ipf_003_idempotent_refit() {
    let mut mtx = Matrix::from_vec(2, 2, vec![1.0, 3.0, 2.0, 4.0]).expect("valid matrix");
    let fitter = Ipf::new();
    let first = fitter.fit(&mut mtx, &[4.0, 6.0], &[3.0, 7.0]).expect("valid inputs");
    assert!(first.converged, "FALSIFIED IPF-003: first fit did not converge");

    let snapshot = mtx.clone();
    let second = fitter.fit(&mut mtx, &[4.0, 6.0], &[3.0, 7.0]).expect("valid inputs");
    assert!(second.converged, "FALSIFIED IPF-003: refit diverged");
    assert_eq!(
        second.iterations, 0,
        "FALSIFIED IPF-003: refit performed scaling passes"
    );
    assert_eq!(mtx, snapshot, "FALSIFIED IPF-003: refit mutated the matrix");
}

/// FALSIFY-IPF-004: Converged fit conserves total mass to the target total
#[test]
fn falsify_ipf_004_mass_conservation() {
    let mut mtx =
        Matrix::from_vec(2, 2, vec![0.9, 0.1, 0.4, 0.6]).expect("valid matrix");
    let row_targets = [2.0, 3.0];
    let col_targets = [1.5, 3.5];

    let outcome = Ipf::new()
        .fit(&mut mtx, &row_targets, &col_targets)
        .expect("valid inputs");
    assert!(outcome.converged, "FALSIFIED IPF-004: budget exhausted");

    let target_total: f64 = row_targets.iter().sum();
    assert!(
        (mtx.sum() - target_total).abs() < 1e-3,
        "FALSIFIED IPF-004: total {} drifted from {target_total}",
        mtx.sum()
    );
}

/// FALSIFY-IPF-005: Precondition failures leave the input untouched
#[test]
fn falsify_ipf_005_no_mutation_on_rejection() {
    let mut mtx = Matrix::from_vec(2, 2, vec![1.0, 3.0, 2.0, 4.0]).expect("valid matrix");
    let snapshot = mtx.clone();

    let err = Ipf::new().fit(&mut mtx, &[4.0], &[3.0, 7.0]).unwrap_err();
    assert!(
        matches!(err, AjustarError::DimensionMismatch { .. }),
        "FALSIFIED IPF-005: wrong rejection kind: {err:?}"
    );
    assert_eq!(mtx, snapshot, "FALSIFIED IPF-005: rejected call mutated input");
}

/// FALSIFY-IPF-006: Reported residual equals the L1 error of the result
#[test]
fn falsify_ipf_006_residual_matches_l1_error() {
    let mut mtx =
        Matrix::from_vec(2, 2, vec![1.0, 1.0, 1.0, 1.0]).expect("valid matrix");
    let row_targets = [5.0, 5.0];
    let col_targets = [10.0, 10.0];

    // Inconsistent totals: never converges, residual stays meaningful.
    let outcome = Ipf::new()
        .with_max_iter(3)
        .fit(&mut mtx, &row_targets, &col_targets)
        .expect("valid inputs");

    let recomputed = l1_error(&mtx, &row_targets, &col_targets);
    assert!(
        (outcome.residual - recomputed).abs() < 1e-12,
        "FALSIFIED IPF-006: residual {} != l1_error {recomputed}",
        outcome.residual
    );
}
