use std::fmt;

/// Result of a root-finding run.
#[derive(Debug, Clone, PartialEq)]
pub struct RootResult<F> {
    /// Last iterate.
    pub root: F,
    /// Number of Newton steps taken.
    pub iterations: usize,
    /// Reason for termination.
    pub termination: TerminationReason,
}

impl<F> RootResult<F> {
    /// True if the step size fell below tolerance.
    pub fn converged(&self) -> bool {
        self.termination == TerminationReason::Converged
    }
}

/// Why the solver stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminationReason {
    /// `|x_{k+1} - x_k|` fell below tolerance.
    Converged,
    /// Reached the maximum number of iterations.
    MaxIterations,
    /// The derivative at the current iterate is zero or not finite.
    ZeroDerivative,
}

impl fmt::Display for TerminationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TerminationReason::Converged => write!(f, "step size below tolerance"),
            TerminationReason::MaxIterations => write!(f, "maximum iterations reached"),
            TerminationReason::ZeroDerivative => write!(f, "zero derivative"),
        }
    }
}
