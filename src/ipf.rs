//! Iterative proportional fitting (IPF).
//!
//! Scales a non-negative matrix in place until its row and column sums
//! converge to prescribed targets. Also known as biproportional fitting or
//! the RAS algorithm; the entropically regularized cousin is Sinkhorn
//! iteration.
//!
//! # References
//!
//! - Deming, W. E., & Stephan, F. F. (1940). On a Least Squares Adjustment
//!   of a Sampled Frequency Table When the Expected Marginal Totals are
//!   Known. Annals of Mathematical Statistics.
//! - Fienberg, S. E. (1970). An Iterative Procedure for Estimation in
//!   Contingency Tables. Annals of Mathematical Statistics.

use serde::{Deserialize, Serialize};

use crate::error::{AjustarError, Result};
use crate::primitives::Matrix;

/// Outcome of a fitting run.
///
/// Budget exhaustion is reported here rather than as an error: the
/// partially-scaled matrix is still usable best-effort output, and callers
/// branch on [`converged`](FitOutcome::converged) instead of catching an
/// exception-like failure.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FitOutcome {
    /// Whether the L1 marginal error dropped below tolerance.
    pub converged: bool,
    /// Number of scaling passes actually performed.
    pub iterations: usize,
    /// Final L1 marginal error.
    pub residual: f64,
}

/// Iterative proportional fitting of a matrix to row/column sum targets.
///
/// # Algorithm
///
/// 1. Compute the L1 marginal error (see [`l1_error`]); stop if below `tol`
/// 2. For each row, refresh the current row and column sums, then scale each
///    cell toward its row target and immediately toward its column target
/// 3. Repeat until convergence or the iteration budget is exhausted
///
/// Marginals are refreshed once per row, so the column ratios applied while
/// processing row `i` already reflect the rescaling of rows `0..i` within
/// the same pass.
///
/// # Examples
///
/// ```
/// use ajustar::ipf::Ipf;
/// use ajustar::primitives::Matrix;
///
/// let mut mtx = Matrix::from_vec(2, 2, vec![
///     1.0, 3.0,
///     2.0, 4.0,
/// ]).expect("data length matches rows * cols");
///
/// let outcome = Ipf::new()
///     .fit(&mut mtx, &[4.0, 6.0], &[3.0, 7.0])
///     .expect("inputs are non-negative and well-shaped");
/// assert!(outcome.converged);
///
/// let rows = mtx.row_sums();
/// assert!((rows[0] - 4.0).abs() < 1e-3);
/// assert!((rows[1] - 6.0).abs() < 1e-3);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ipf {
    /// Convergence tolerance on the summed L1 marginal error.
    tol: f64,
    /// Maximum number of scaling passes.
    max_iter: usize,
}

impl Default for Ipf {
    fn default() -> Self {
        Self::new()
    }
}

impl Ipf {
    /// Creates a fitter with tolerance `1e-3` and an iteration budget of 100.
    #[must_use]
    pub fn new() -> Self {
        Self {
            tol: 1e-3,
            max_iter: 100,
        }
    }

    /// Sets the convergence tolerance.
    #[must_use]
    pub fn with_tol(mut self, tol: f64) -> Self {
        self.tol = tol;
        self
    }

    /// Sets the maximum number of scaling passes.
    #[must_use]
    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    /// Returns the convergence tolerance.
    #[must_use]
    pub fn tol(&self) -> f64 {
        self.tol
    }

    /// Returns the iteration budget.
    #[must_use]
    pub fn max_iter(&self) -> usize {
        self.max_iter
    }

    /// Scales `matrix` in place so its row and column sums approach
    /// `row_sums` and `col_sums`.
    ///
    /// All precondition checks run before any mutation; a precondition
    /// failure leaves `matrix` untouched. Exhausting the iteration budget is
    /// not an error: the matrix holds the best-effort fit and the outcome
    /// reports `converged: false`.
    ///
    /// # Errors
    ///
    /// - [`AjustarError::InvalidHyperparameter`] if `tol <= 0` or
    ///   `max_iter == 0`
    /// - [`AjustarError::EmptyMatrix`] if either dimension of `matrix` is zero
    /// - [`AjustarError::DimensionMismatch`] if a target slice's length does
    ///   not match the corresponding matrix dimension
    /// - [`AjustarError::NegativeValue`] if any target or matrix entry is
    ///   negative
    /// - [`AjustarError::DegenerateMarginal`] if a current marginal sum is
    ///   zero while its target is non-zero; this arises mid-iteration, so
    ///   the matrix may be left partially scaled
    pub fn fit(
        &self,
        matrix: &mut Matrix<f64>,
        row_sums: &[f64],
        col_sums: &[f64],
    ) -> Result<FitOutcome> {
        self.validate(matrix, row_sums, col_sums)?;

        let mut iterations = 0;
        let mut residual = l1_error(matrix, row_sums, col_sums);
        while iterations < self.max_iter {
            if residual < self.tol {
                return Ok(FitOutcome {
                    converged: true,
                    iterations,
                    residual,
                });
            }
            sweep(matrix, row_sums, col_sums)?;
            iterations += 1;
            residual = l1_error(matrix, row_sums, col_sums);
        }

        Ok(FitOutcome {
            converged: residual < self.tol,
            iterations,
            residual,
        })
    }

    fn validate(&self, matrix: &Matrix<f64>, row_sums: &[f64], col_sums: &[f64]) -> Result<()> {
        if self.tol <= 0.0 {
            return Err(AjustarError::InvalidHyperparameter {
                param: "tol".to_string(),
                value: self.tol.to_string(),
                constraint: "> 0".to_string(),
            });
        }
        if self.max_iter == 0 {
            return Err(AjustarError::InvalidHyperparameter {
                param: "max_iter".to_string(),
                value: "0".to_string(),
                constraint: ">= 1".to_string(),
            });
        }
        if matrix.is_empty() {
            return Err(AjustarError::EmptyMatrix);
        }

        let (m, n) = matrix.shape();
        if row_sums.len() != m {
            return Err(AjustarError::DimensionMismatch {
                expected: format!("{m} row sums"),
                actual: row_sums.len().to_string(),
            });
        }
        if col_sums.len() != n {
            return Err(AjustarError::DimensionMismatch {
                expected: format!("{n} column sums"),
                actual: col_sums.len().to_string(),
            });
        }

        for (i, &target) in row_sums.iter().enumerate() {
            if target < 0.0 {
                return Err(AjustarError::NegativeValue {
                    location: format!("row sum target {i}"),
                    value: target,
                });
            }
        }
        for (j, &target) in col_sums.iter().enumerate() {
            if target < 0.0 {
                return Err(AjustarError::NegativeValue {
                    location: format!("column sum target {j}"),
                    value: target,
                });
            }
        }
        for i in 0..m {
            for j in 0..n {
                let value = matrix.get(i, j);
                if value < 0.0 {
                    return Err(AjustarError::NegativeValue {
                        location: format!("matrix entry ({i}, {j})"),
                        value,
                    });
                }
            }
        }

        Ok(())
    }
}

/// One full row-major scaling pass.
fn sweep(matrix: &mut Matrix<f64>, row_sums: &[f64], col_sums: &[f64]) -> Result<()> {
    let (m, n) = matrix.shape();
    for i in 0..m {
        // Marginals are refreshed per row, not per pass.
        let current_rows = matrix.row_sums();
        let current_cols = matrix.col_sums();

        let row_ratio = scale_ratio(row_sums[i], current_rows[i], "row", i)?;
        for j in 0..n {
            let col_ratio = scale_ratio(col_sums[j], current_cols[j], "column", j)?;
            let mut cell = matrix.get(i, j);
            cell *= row_ratio;
            cell *= col_ratio;
            matrix.set(i, j, cell);
        }
    }
    Ok(())
}

/// Ratio scaling a marginal toward its target.
///
/// A zero marginal with a zero target yields ratio 0: the cells it covers
/// are already zero and the constraint is already satisfied. A zero marginal
/// with a non-zero target has no defined ratio and fails.
fn scale_ratio(target: f64, current: f64, axis: &str, index: usize) -> Result<f64> {
    if current == 0.0 {
        if target == 0.0 {
            return Ok(0.0);
        }
        return Err(AjustarError::DegenerateMarginal {
            axis: axis.to_string(),
            index,
            target,
        });
    }
    Ok(target / current)
}

/// L1 marginal error: summed absolute deviation of the matrix's row and
/// column sums from their targets.
///
/// This is the fitter's convergence statistic, exposed as a pure helper for
/// diagnostics. Target slices are expected to match the matrix dimensions.
///
/// # Examples
///
/// ```
/// use ajustar::ipf::l1_error;
/// use ajustar::primitives::Matrix;
///
/// let mtx = Matrix::from_vec(2, 2, vec![
///     1.0, 3.0,
///     2.0, 4.0,
/// ]).expect("data length matches rows * cols");
///
/// // Row sums are [4, 6] and column sums are [3, 7]: a perfect match.
/// assert!(l1_error(&mtx, &[4.0, 6.0], &[3.0, 7.0]) < 1e-12);
/// // One unit short on the first row target.
/// assert!((l1_error(&mtx, &[5.0, 6.0], &[3.0, 7.0]) - 1.0).abs() < 1e-12);
/// ```
#[must_use]
pub fn l1_error(matrix: &Matrix<f64>, row_sums: &[f64], col_sums: &[f64]) -> f64 {
    let row_err: f64 = matrix
        .row_sums()
        .iter()
        .zip(row_sums.iter())
        .map(|(&current, &target)| (target - current).abs())
        .sum();
    let col_err: f64 = matrix
        .col_sums()
        .iter()
        .zip(col_sums.iter())
        .map(|(&current, &target)| (target - current).abs())
        .sum();
    row_err + col_err
}

#[cfg(test)]
#[path = "ipf_tests.rs"]
mod tests;

#[cfg(test)]
#[path = "tests_ipf_contract.rs"]
mod tests_contract;
