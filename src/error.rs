//! Error types for Ajustar operations.
//!
//! Provides rich error context for library consumers.

use std::fmt;

/// Main error type for Ajustar operations.
///
/// Provides detailed context about failures including empty inputs,
/// dimension mismatches, negative entries, and degenerate marginals.
///
/// Exhausting the iteration budget is deliberately *not* an error: the
/// fitter reports it through [`crate::ipf::FitOutcome`] alongside the
/// best-effort result.
///
/// # Examples
///
/// ```
/// use ajustar::error::AjustarError;
///
/// let err = AjustarError::DimensionMismatch {
///     expected: "4 row sums".to_string(),
///     actual: "3".to_string(),
/// };
/// assert!(err.to_string().contains("dimension mismatch"));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum AjustarError {
    /// Input matrix has no rows or no columns.
    EmptyMatrix,

    /// Matrix/target dimensions don't match for the operation.
    DimensionMismatch {
        /// Expected dimensions description
        expected: String,
        /// Actual dimensions found
        actual: String,
    },

    /// A negative entry was found where only non-negative values are valid.
    NegativeValue {
        /// Where the entry was found (e.g. "matrix entry (1, 2)")
        location: String,
        /// The offending value
        value: f64,
    },

    /// A marginal sum is zero while its target is non-zero, leaving the
    /// scaling ratio undefined.
    DegenerateMarginal {
        /// Which marginal ("row" or "column")
        axis: String,
        /// Index of the degenerate marginal
        index: usize,
        /// The non-zero target it cannot reach
        target: f64,
    },

    /// Invalid hyperparameter value provided.
    InvalidHyperparameter {
        /// Parameter name
        param: String,
        /// Provided value
        value: String,
        /// Constraint description
        constraint: String,
    },
}

impl fmt::Display for AjustarError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AjustarError::EmptyMatrix => {
                write!(f, "Empty matrix: at least one row and one column required")
            }
            AjustarError::DimensionMismatch { expected, actual } => {
                write!(
                    f,
                    "Matrix dimension mismatch: expected {expected}, got {actual}"
                )
            }
            AjustarError::NegativeValue { location, value } => {
                write!(f, "Negative value in {location}: {value}")
            }
            AjustarError::DegenerateMarginal {
                axis,
                index,
                target,
            } => {
                write!(
                    f,
                    "Degenerate {axis} marginal at index {index}: current sum is zero but target is {target}"
                )
            }
            AjustarError::InvalidHyperparameter {
                param,
                value,
                constraint,
            } => {
                write!(
                    f,
                    "Invalid hyperparameter: {param} = {value}, expected {constraint}"
                )
            }
        }
    }
}

impl std::error::Error for AjustarError {}

/// Convenience Result type for Ajustar operations.
pub type Result<T> = std::result::Result<T, AjustarError>;
