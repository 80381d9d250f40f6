//! Convenience re-exports for common usage.
//!
//! # Usage
//!
//! ```
//! use ajustar::prelude::*;
//! ```

pub use crate::error::{AjustarError, Result};
pub use crate::ipf::{l1_error, FitOutcome, Ipf};
pub use crate::primitives::Matrix;
pub use crate::synthetic::SphericalNoise;
