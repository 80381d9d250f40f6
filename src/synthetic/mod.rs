//! Synthetic traffic matrix generation.
//!
//! Produces plausible non-negative demand matrices centred on a predicted
//! matrix while keeping aggregate row and column totals pinned to the
//! predicted marginals. Cell-level variance is controlled by a noise
//! strength parameter; marginal consistency is restored after perturbation
//! by iterative proportional fitting.
//!
//! # References
//!
//! - Tune, P., & Roughan, M. (2015). Spatiotemporal Traffic Matrix
//!   Synthesis. ACM SIGCOMM.
//! - Roughan, M. (2005). Simplifying the Synthesis of Internet Traffic
//!   Matrices. ACM SIGCOMM Computer Communication Review.

mod spherical;

pub use spherical::SphericalNoise;
