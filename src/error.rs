//! Error taxonomy for graph construction, binding and evaluation.

use thiserror::Error;

/// Errors raised by adgraph.
///
/// Every error is detected eagerly where the violation happens (construction,
/// binding, or a single node's evaluation) and returned to the caller of the
/// triggering operation. A failed [`compute`](crate::Expr::compute) leaves the
/// sub-graph's values and derivatives partially updated; treat them as invalid
/// until the next successful compute.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AdError {
    /// Malformed construction input, e.g. an empty or non-identifier variable name.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A bound value has the wrong shape for its variable, or two operands
    /// cannot be broadcast against each other.
    #[error("type mismatch: {0}")]
    TypeMismatch(String),

    /// The input mapping's keys differ from the target's free variable names.
    #[error("input not recognized (missing: {missing:?}, unexpected: {unexpected:?})")]
    UnrecognizedInput {
        /// Free variables with no input.
        missing: Vec<String>,
        /// Input keys that name no free variable.
        unexpected: Vec<String>,
    },

    /// A value or derivative was read before any successful bind or compute.
    #[error("no value: {0}")]
    NoValue(String),

    /// A division, tangent, inverse-trig or logarithm evaluation hit a zero denominator.
    #[error("division by zero in {0}")]
    DivisionByZero(&'static str),

    /// A derivative term is undefined at the evaluation point
    /// (only raised under [`LogTermPolicy::Error`](crate::LogTermPolicy::Error)).
    #[error("domain error: {0}")]
    DomainError(String),
}

/// Result alias used across the crate.
pub type Result<T, E = AdError> = std::result::Result<T, E>;
