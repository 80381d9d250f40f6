//! Spherically additive noise model.
//!
//! Noise is added on the square-root ("amplitude") scale of each cell and
//! squared back, so samples stay non-negative for any noise strength or
//! sign. Each sample is then re-projected onto the predicted marginals.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::error::{AjustarError, Result};
use crate::ipf::Ipf;
use crate::primitives::Matrix;

/// Spherically additive noise generator for synthetic traffic matrices.
///
/// Holds an immutable predicted matrix together with its row and column
/// sums, computed once at construction. Every generated sample perturbs the
/// predicted matrix cell-wise with `(sqrt(predicted) + beta * z)^2` for
/// standard-normal `z`, then fits the result back to the cached marginals.
///
/// With `beta = 0` a sample reproduces the predicted matrix up to
/// floating-point rounding; larger `beta` increases cell-level variance
/// while row and column totals stay pinned.
///
/// # Algorithm
///
/// 1. Allocate a fresh matrix of the predicted shape
/// 2. Per cell, draw `z ~ N(0, 1)` and set `(sqrt(predicted[i,j]) + beta*z)^2`
/// 3. Re-fit the sample to the predicted row/column sums with IPF
///
/// # Examples
///
/// ```
/// use ajustar::primitives::Matrix;
/// use ajustar::synthetic::SphericalNoise;
///
/// let predicted = Matrix::from_vec(2, 2, vec![
///     0.2, 0.4,
///     0.2, 0.9,
/// ]).expect("data length matches rows * cols");
///
/// let model = SphericalNoise::new(predicted)
///     .expect("predicted matrix is non-negative")
///     .with_random_state(7);
///
/// let sample = model.generate(0.1).expect("marginals are non-degenerate");
/// let totals = sample.row_sums();
/// assert!((totals[0] - 0.6).abs() < 1e-3);
/// assert!((totals[1] - 1.1).abs() < 1e-3);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SphericalNoise {
    /// Predicted matrix the samples are centred on.
    predicted: Matrix<f64>,
    /// Row sums of the predicted matrix, fixed at construction.
    row_sums: Vec<f64>,
    /// Column sums of the predicted matrix, fixed at construction.
    col_sums: Vec<f64>,
    /// Fitter used to restore the marginal constraints.
    fitter: Ipf,
    /// Random seed for reproducible samples.
    random_state: Option<u64>,
}

impl SphericalNoise {
    /// Creates a generator around `predicted` and caches its marginals.
    ///
    /// # Errors
    ///
    /// Returns [`AjustarError::EmptyMatrix`] if either dimension of
    /// `predicted` is zero, or [`AjustarError::NegativeValue`] if any entry
    /// is negative.
    pub fn new(predicted: Matrix<f64>) -> Result<Self> {
        if predicted.is_empty() {
            return Err(AjustarError::EmptyMatrix);
        }
        let (m, n) = predicted.shape();
        for i in 0..m {
            for j in 0..n {
                let value = predicted.get(i, j);
                if value < 0.0 {
                    return Err(AjustarError::NegativeValue {
                        location: format!("predicted entry ({i}, {j})"),
                        value,
                    });
                }
            }
        }

        let row_sums = predicted.row_sums();
        let col_sums = predicted.col_sums();
        Ok(Self {
            predicted,
            row_sums,
            col_sums,
            fitter: Ipf::new(),
            random_state: None,
        })
    }

    /// Sets the convergence tolerance handed to the fitting step.
    #[must_use]
    pub fn with_tol(mut self, tol: f64) -> Self {
        self.fitter = self.fitter.with_tol(tol);
        self
    }

    /// Sets the random seed.
    ///
    /// With a seed, every `generate` call starts from the same RNG state and
    /// returns the same sample; `generate_many` draws its whole batch from
    /// one stream, so the batch is reproducible while samples within it
    /// differ.
    #[must_use]
    pub fn with_random_state(mut self, seed: u64) -> Self {
        self.random_state = Some(seed);
        self
    }

    /// Returns the predicted matrix.
    #[must_use]
    pub fn predicted(&self) -> &Matrix<f64> {
        &self.predicted
    }

    /// Returns the cached row sums of the predicted matrix.
    #[must_use]
    pub fn row_sums(&self) -> &[f64] {
        &self.row_sums
    }

    /// Returns the cached column sums of the predicted matrix.
    #[must_use]
    pub fn col_sums(&self) -> &[f64] {
        &self.col_sums
    }

    /// Generates one synthetic matrix with noise strength `beta`.
    ///
    /// Each call allocates and returns a fresh matrix; the generator itself
    /// is never mutated, so concurrent calls may share it read-only.
    /// Non-convergence of the fitting step is not an error: the sample is
    /// returned best-effort, as close to the marginals as the iteration
    /// budget allowed.
    ///
    /// # Errors
    ///
    /// Returns [`AjustarError::DegenerateMarginal`] if the fitting step runs
    /// into a zero marginal with a non-zero target.
    pub fn generate(&self, beta: f64) -> Result<Matrix<f64>> {
        let mut rng = self.rng();
        self.sample(beta, &mut rng)
    }

    /// Generates `count` synthetic matrices from one RNG stream.
    ///
    /// # Errors
    ///
    /// Same failure mode as [`generate`](Self::generate); the first failure
    /// aborts the batch.
    pub fn generate_many(&self, beta: f64, count: usize) -> Result<Vec<Matrix<f64>>> {
        let mut rng = self.rng();
        (0..count).map(|_| self.sample(beta, &mut rng)).collect()
    }

    fn rng(&self) -> StdRng {
        match self.random_state {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }

    fn sample(&self, beta: f64, rng: &mut StdRng) -> Result<Matrix<f64>> {
        let (m, n) = self.predicted.shape();
        let mut sample = Matrix::zeros(m, n);
        for i in 0..m {
            for j in 0..n {
                let amplitude = self.predicted.get(i, j).sqrt() + beta * standard_normal(rng);
                sample.set(i, j, amplitude * amplitude);
            }
        }

        self.fitter.fit(&mut sample, &self.row_sums, &self.col_sums)?;
        Ok(sample)
    }
}

/// Standard normal sample via the Box-Muller transform
/// (avoids a rand_distr dependency).
fn standard_normal(rng: &mut StdRng) -> f64 {
    let u1: f64 = rng.gen_range(1e-10..1.0);
    let u2: f64 = rng.gen_range(0.0..1.0);
    (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos()
}

#[cfg(test)]
#[path = "spherical_tests.rs"]
mod tests;
