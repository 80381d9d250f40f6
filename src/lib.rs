//! Ajustar: synthetic traffic matrix generation in pure Rust.
//!
//! Ajustar synthesizes plausible non-negative traffic/demand matrices from a
//! predicted matrix when only the marginal totals (row and column sums) are
//! trusted. The core is an iterative proportional fitting (IPF) kernel that
//! rescales a matrix in place until its marginals match prescribed targets;
//! on top of it sits a spherically additive noise generator that perturbs a
//! predicted matrix cell by cell and re-projects every sample onto the
//! predicted marginals.
//!
//! # Quick Start
//!
//! ```
//! use ajustar::prelude::*;
//!
//! // A predicted 2x2 demand matrix.
//! let predicted = Matrix::from_vec(2, 2, vec![
//!     0.2, 0.4,
//!     0.2, 0.9,
//! ]).expect("data length matches rows * cols");
//!
//! // Generate one synthetic sample with noise strength 0.1. Row and column
//! // totals stay pinned to the predicted marginals.
//! let model = SphericalNoise::new(predicted)
//!     .expect("predicted matrix is non-negative")
//!     .with_random_state(42);
//! let sample = model.generate(0.1).expect("marginals are non-degenerate");
//! assert_eq!(sample.shape(), (2, 2));
//! ```
//!
//! # Modules
//!
//! - [`primitives`]: Core Matrix type
//! - [`ipf`]: Iterative proportional fitting of matrices to marginal targets
//! - [`synthetic`]: Synthetic matrix generation (spherical additive noise)

pub mod error;
pub mod ipf;
pub mod prelude;
pub mod primitives;
pub mod synthetic;
